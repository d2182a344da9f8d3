//! Expandable previews of the uploaded sheets.

use leptos::*;

use super::DataTable;
use crate::SheetPreview;

#[component]
pub fn SheetPreviews(sheets: Vec<SheetPreview>) -> impl IntoView {
    if sheets.is_empty() {
        return ().into_view();
    }

    let (expanded, set_expanded) = create_signal(false);

    view! {
        <div class="sheets-section">
            <button class="expander" on:click=move |_| set_expanded.update(|e| *e = !*e)>
                {move || if expanded.get() { "▾ Uploaded sheets" } else { "▸ Uploaded sheets" }}
            </button>
            {move || expanded.get().then(|| {
                sheets
                    .clone()
                    .into_iter()
                    .map(|sheet| {
                        let more = sheet.total_rows.saturating_sub(sheet.rows.len());
                        view! {
                            <div class="sheet-preview">
                                <h4>{format!("{} Sheet", sheet.name)}</h4>
                                <DataTable columns=sheet.columns rows=sheet.rows/>
                                {(more > 0).then(|| view! {
                                    <div class="table-more">{format!("+{} more rows", more)}</div>
                                })}
                            </div>
                        }
                    })
                    .collect_view()
            })}
        </div>
    }
    .into_view()
}
