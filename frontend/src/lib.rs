//! Combogen - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for uploading prompt workbooks, reviewing
//! validation results and downloading the generated combinations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (title, sample workbook link)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title, description)                              │
//! │  ├── UploadSection                                          │
//! │  ├── ValidationBanner (after upload)                        │
//! │  ├── SheetPreviews (expandable)                             │
//! │  ├── ResultsSection (when ready)                            │
//! │  └── LogsPanel (when logs exist)                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Common types (LogEntry, UploadResponse, etc.)
//! - [`components`] - UI components (Header, Upload, Results, etc.)
//! - [`services`] - Backend communication and downloads

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Logs
    LogEntry, LogLevel,
    // API
    UploadResponse, SheetPreview, ResultPreview, Downloads,
    // Errors
    AppError, AppResult,
};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application
// =============================================================================

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=APP_NAME/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    // Global state for the application
    let (response, set_response) = create_signal(None::<UploadResponse>);
    let (is_processing, set_is_processing) = create_signal(false);
    // filled by the upload's own log stream
    let (logs, set_logs) = create_signal(Vec::<LogEntry>::new());

    view! {
        <Header/>

        <div class="container">
            <Hero/>

            <UploadSection
                is_processing=is_processing
                set_is_processing=set_is_processing
                set_response=set_response
                set_logs=set_logs
            />

            {move || response.get().map(|resp| view! {
                <ValidationBanner response=resp.clone()/>
                <SheetPreviews sheets=resp.sheets.clone()/>
                {resp.is_ready().then(|| view! { <ResultsSection response=resp.clone()/> })}
            })}

            <Show
                when=move || !logs.get().is_empty()
                fallback=|| view! { }
            >
                <LogsPanel logs=logs set_logs=set_logs/>
            </Show>
        </div>

        <Footer/>
    }
}
