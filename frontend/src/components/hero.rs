//! Hero section component

use leptos::*;

use crate::APP_NAME;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>{APP_NAME}</h1>
            <p class="subtitle">
                "Upload a workbook with Prompts, Values, Models and Parameters sheets. "
                "Every prompt is filled with its values and crossed with every model and parameter set."
            </p>
        </div>
    }
}
