//! Generated table preview with CSV and JSON downloads.

use leptos::*;

use super::DataTable;
use crate::services::download_text;
use crate::{UploadResponse, CSV_FILE_NAME, CSV_MIME, JSON_FILE_NAME, JSON_MIME};

#[component]
pub fn ResultsSection(response: UploadResponse) -> impl IntoView {
    let Some(result) = response.result else {
        return ().into_view();
    };
    let downloads = response.downloads.unwrap_or_default();
    let (download_error, set_download_error) = create_signal(None::<String>);

    let csv = downloads.csv;
    let json = downloads.json;
    let on_csv = move |_| {
        if let Err(e) = download_text(CSV_FILE_NAME, CSV_MIME, &csv) {
            set_download_error.set(Some(e.to_string()));
        }
    };
    let on_json = move |_| {
        if let Err(e) = download_text(JSON_FILE_NAME, JSON_MIME, &json) {
            set_download_error.set(Some(e.to_string()));
        }
    };

    let shown = result.rows.len();
    let total = result.row_count;

    view! {
        <div class="results-section">
            <h3>"Generated Combinations"</h3>
            <div class="results-count">
                {format!("{} rows", total)}
                {(shown < total).then(|| format!(" (showing first {})", shown))}
            </div>
            <DataTable columns=result.columns rows=result.rows/>
            <div class="download-buttons">
                <button class="download-button" on:click=on_csv>"Download CSV"</button>
                <button class="download-button" on:click=on_json>"Download JSON"</button>
            </div>
            <Show
                when=move || download_error.get().is_some()
                fallback=|| view! { }
            >
                <div class="error-message">{move || download_error.get().unwrap_or_default()}</div>
            </Show>
        </div>
    }
    .into_view()
}
