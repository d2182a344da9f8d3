//! Validation outcome banner.

use leptos::*;

use crate::UploadResponse;

/// Success banner, the itemised validation messages, or the structural error.
#[component]
pub fn ValidationBanner(response: UploadResponse) -> impl IntoView {
    if response.is_ready() {
        return view! {
            <div class="banner banner-success">"✅ Validation Passed!"</div>
        }
        .into_view();
    }

    if !response.validation_errors.is_empty() {
        return view! {
            <div class="banner banner-error">
                <strong>"Validation Error:"</strong>
                <ul>
                    {response
                        .validation_errors
                        .into_iter()
                        .map(|msg| view! { <li>{msg}</li> })
                        .collect_view()}
                </ul>
            </div>
        }
        .into_view();
    }

    let message = response.error.unwrap_or_else(|| "Unknown error".to_string());
    view! {
        <div class="banner banner-error">"❌ " {message}</div>
    }
    .into_view()
}
