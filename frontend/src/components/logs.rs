//! Real-time log streaming using Server-Sent Events (SSE).
//!
//! Each upload opens its own stream on `/api/logs?job=<id>`, so the panel
//! only shows entries of the upload made from this page.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventSource, MessageEvent};

use crate::{LogEntry, LogLevel, BACKEND_URL, MAX_LOG_ENTRIES};

type Pending = Rc<RefCell<Option<Box<dyn FnOnce()>>>>;

/// Run `f` after the next paint.
fn request_animation_frame(f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(f);
    if window.request_animation_frame(closure.as_ref().unchecked_ref()).is_ok() {
        closure.forget();
    }
}

/// Parse one SSE payload from the backend.
fn parse_sse_log(json: &str) -> Option<LogEntry> {
    let value: serde_json::Value = serde_json::from_str(json).ok()?;
    let level = LogLevel::from_backend(value.get("level")?.as_str()?);
    let message = value.get("message")?.as_str()?.to_string();
    let indent = value.get("indent").and_then(|i| i.as_u64()).unwrap_or(0).min(u8::MAX as u64) as u8;
    let timestamp = value
        .get("timestamp")
        .and_then(|t| t.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| chrono::Local::now().format("%H:%M:%S").to_string());

    Some(LogEntry {
        level,
        message,
        timestamp,
        indent,
    })
}

fn logs_url(job_id: &str) -> String {
    format!("{}/api/logs?job={}", BACKEND_URL, job_id)
}

/// Run the pending callback once; later calls do nothing.
fn fire(pending: &Pending) {
    let callback = pending.borrow_mut().take();
    if let Some(callback) = callback {
        callback();
    }
}

/// Open SSE stream for one upload.
///
/// Closing it (dropping) detaches every handler.
pub struct JobLogStream {
    source: EventSource,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_open: Closure<dyn FnMut(web_sys::Event)>,
    _on_error: Closure<dyn FnMut(web_sys::Event)>,
}

impl Drop for JobLogStream {
    fn drop(&mut self) {
        self.source.set_onmessage(None);
        self.source.set_onopen(None);
        self.source.set_onerror(None);
        self.source.close();
    }
}

/// Subscribe to the logs of `job_id`, then call `on_ready`.
///
/// `on_ready` runs once the stream is open, or right away when it cannot
/// be opened, so the upload never waits on the log stream.
pub fn open_job_log_stream(
    job_id: &str,
    set_logs: WriteSignal<Vec<LogEntry>>,
    on_ready: impl FnOnce() + 'static,
) -> Option<JobLogStream> {
    let source = match EventSource::new(&logs_url(job_id)) {
        Ok(source) => source,
        Err(e) => {
            log::error!("Failed to create EventSource: {:?}", e);
            on_ready();
            return None;
        }
    };

    let pending: Pending = Rc::new(RefCell::new(Some(Box::new(on_ready))));

    let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
        let Some(entry) = event.data().as_string().as_deref().and_then(parse_sse_log) else {
            return;
        };
        set_logs.update(|logs| {
            logs.push(entry);
            if logs.len() > MAX_LOG_ENTRIES {
                logs.remove(0);
            }
        });
    }) as Box<dyn FnMut(MessageEvent)>);

    let on_open = {
        let pending = pending.clone();
        Closure::wrap(Box::new(move |_: web_sys::Event| {
            log::info!("📡 SSE connected to job log stream");
            fire(&pending);
        }) as Box<dyn FnMut(web_sys::Event)>)
    };

    let on_error = Closure::wrap(Box::new(move |_: web_sys::Event| {
        log::warn!("SSE connection error - will auto-reconnect");
        fire(&pending);
    }) as Box<dyn FnMut(web_sys::Event)>);

    source.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    source.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    source.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    Some(JobLogStream {
        source,
        _on_message: on_message,
        _on_open: on_open,
        _on_error: on_error,
    })
}

/// Processing logs panel; the stream itself is opened by the upload.
#[component]
pub fn LogsPanel(logs: ReadSignal<Vec<LogEntry>>, set_logs: WriteSignal<Vec<LogEntry>>) -> impl IntoView {
    let logs_container = create_node_ref::<leptos::html::Div>();

    // keep the newest entry in view
    create_effect(move |_| {
        let _ = logs.get();
        if let Some(container) = logs_container.get() {
            request_animation_frame(move || {
                container.set_scroll_top(container.scroll_height());
            });
        }
    });

    view! {
        <div class="logs-panel">
            <div class="logs-header">
                <span class="logs-title">"📋 Processing Logs"</span>
                <button class="logs-clear" on:click=move |_| set_logs.set(vec![])>
                    "Clear"
                </button>
            </div>
            <div class="logs-content" node_ref=logs_container>
                <For
                    each=move || logs.get().into_iter().enumerate()
                    key=|(i, _)| *i
                    children=move |(_, entry)| {
                        let class = format!("log-entry {}", entry.level.css_class());
                        let padding = format!("padding-left: {}em", entry.indent as f32 * 1.5);
                        view! {
                            <div class=class style=padding>
                                <span class="log-time">"[" {entry.timestamp} "] "</span>
                                {entry.message}
                            </div>
                        }
                    }
                />
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_entry() {
        let entry = parse_sse_log(
            r#"{"level":"warning","message":"Prompt p3 has no Values rows","indent":1,"timestamp":"12:00:01","jobId":"j1"}"#,
        )
        .unwrap();
        assert_eq!(entry.level, LogLevel::Warning);
        assert_eq!(entry.indent, 1);
        assert_eq!(entry.timestamp, "12:00:01");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_sse_log("keep-alive").is_none());
        assert!(parse_sse_log(r#"{"level":"info"}"#).is_none());
    }

    #[test]
    fn test_logs_url_names_the_job() {
        assert_eq!(logs_url("abc"), format!("{}/api/logs?job=abc", BACKEND_URL));
    }

    #[test]
    fn test_pending_callback_fires_once() {
        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();
        let pending: Pending = Rc::new(RefCell::new(Some(Box::new(move || *counter.borrow_mut() += 1))));
        fire(&pending);
        fire(&pending);
        assert_eq!(*count.borrow(), 1);
    }
}
