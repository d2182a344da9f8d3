//! Workbook upload component.
//!
//! Handles file selection, the size check, the upload to the backend and
//! hands the response to the rest of the page.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlInputElement};

use super::logs::{open_job_log_stream, JobLogStream};
use crate::services::upload_workbook;
use crate::{LogEntry, LogLevel, UploadResponse, ACCEPTED_EXTENSIONS, BACKEND_URL, MAX_FILE_SIZE};

#[component]
pub fn UploadSection(
    is_processing: ReadSignal<bool>,
    set_is_processing: WriteSignal<bool>,
    set_response: WriteSignal<Option<UploadResponse>>,
    set_logs: WriteSignal<Vec<LogEntry>>,
) -> impl IntoView {
    let (error, set_error) = create_signal(None::<String>);
    let (file_name, set_file_name) = create_signal(None::<String>);
    // replacing it closes the previous upload's stream
    let log_stream = store_value(None::<JobLogStream>);

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // Allow re-selecting the same file
        input.set_value("");

        set_error.set(None);
        set_response.set(None);
        set_logs.set(Vec::new());
        set_file_name.set(Some(file.name()));

        if let Err(msg) = check_file(&file.name(), file.size()) {
            add_log(set_logs, LogLevel::Error, &format!("❌ {}", msg));
            set_error.set(Some(msg));
            return;
        }

        let job_id = uuid::Uuid::new_v4().to_string();
        set_is_processing.set(true);
        add_log(set_logs, LogLevel::Info, "📤 Uploading workbook...");

        let start_upload = {
            let job_id = job_id.clone();
            move || {
                spawn_local(async move {
                    match upload_workbook(file, &job_id, BACKEND_URL).await {
                        Ok(response) => {
                            if response.is_ready() {
                                let rows = response.result.as_ref().map(|r| r.row_count).unwrap_or(0);
                                add_log(set_logs, LogLevel::Success, &format!("✅ {} combinations generated", rows));
                            } else {
                                add_log(set_logs, LogLevel::Warning, "⚠️ Workbook did not pass validation");
                            }
                            set_response.set(Some(response));
                        }
                        Err(e) => {
                            add_log(set_logs, LogLevel::Error, &format!("❌ Upload failed: {}", e));
                            set_error.set(Some(e.to_string()));
                        }
                    }

                    set_is_processing.set(false);
                });
            }
        };

        log_stream.set_value(None);
        log_stream.set_value(open_job_log_stream(&job_id, set_logs, start_upload));
    };

    let trigger_file_input = move |_| {
        if is_processing.get_untracked() {
            return;
        }
        if let Some(input) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("fileInput"))
        {
            if let Some(html_input) = input.dyn_ref::<HtmlInputElement>() {
                html_input.click();
            }
        }
    };

    view! {
        <div
            class="upload-section"
            id="uploadZone"
            on:click=trigger_file_input
        >
            <div class="upload-icon">"📤"</div>
            <div class="upload-text">
                {move || if is_processing.get() {
                    "⏳ Validating and generating...".to_string()
                } else {
                    file_name.get().unwrap_or_else(|| "Choose an Excel workbook".to_string())
                }}
            </div>

            <Show
                when=move || !is_processing.get()
                fallback=|| view! { }
            >
                <div class="upload-hint">"Accepted formats: .xls, .xlsx (50 MB max)"</div>
            </Show>

            <Show
                when=move || error.get().is_some()
                fallback=|| view! { }
            >
                <div class="error-message">
                    {move || error.get().unwrap_or_default()}
                </div>
            </Show>

            <input
                type="file"
                id="fileInput"
                accept=ACCEPTED_EXTENSIONS
                style="display:none"
                on:change=on_file_change
                on:click=|ev| ev.stop_propagation()
            />
        </div>
    }
}

/// Reject files the backend would refuse anyway.
fn check_file(name: &str, size: f64) -> Result<(), String> {
    let lower = name.to_lowercase();
    let accepted = ACCEPTED_EXTENSIONS
        .split(',')
        .any(|ext| lower.ends_with(ext));
    if !accepted {
        return Err(format!("Unsupported file type: {} (expected {})", name, ACCEPTED_EXTENSIONS));
    }
    if size > MAX_FILE_SIZE {
        return Err(format!("File too large: {:.1} MB (max 50 MB)", size / (1024.0 * 1024.0)));
    }
    Ok(())
}

fn add_log(set_logs: WriteSignal<Vec<LogEntry>>, level: LogLevel, message: &str) {
    let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();

    set_logs.update(|logs| {
        logs.push(LogEntry {
            level,
            message: message.to_string(),
            timestamp,
            indent: 0,
        });
    });

    log::info!("{}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_file() {
        assert!(check_file("prompts.xlsx", 1024.0).is_ok());
        assert!(check_file("OLD.XLS", 1024.0).is_ok());
        assert!(check_file("data.csv", 1024.0).is_err());
        assert!(check_file("big.xlsx", MAX_FILE_SIZE + 1.0).is_err());
    }
}
