//! Top bar with the application name and the sample workbook link.

use leptos::*;

use crate::{sample_url, SAMPLE_FILE_NAME};

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header>
            <div class="header-left">
                <a href="#" class="logo">"COMBOGEN"</a>
                <span class="badge">".xls / .xlsx"</span>
            </div>
            <div class="header-right">
                <a class="sample-link" href=sample_url() download=SAMPLE_FILE_NAME>
                    "📥 Example workbook"
                </a>
            </div>
        </header>
    }
}
