//! Browser downloads for generated content.

use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::types::{AppError, AppResult};

/// Offer `content` to the user as a file named `file_name`.
pub fn download_text(file_name: &str, mime: &str, content: &str) -> AppResult<()> {
    let parts = js_sys::Array::of1(&content.into());
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| AppError::Download(format!("Failed to create Blob: {:?}", e)))?;

    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|e| AppError::Download(format!("Failed to create URL: {:?}", e)))?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| AppError::Download("No document available".to_string()))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| AppError::Download(format!("Failed to create link: {:?}", e)))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| AppError::Download("Element is not an anchor".to_string()))?;

    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    Url::revoke_object_url(&url).map_err(|e| AppError::Download(format!("Failed to revoke URL: {:?}", e)))?;
    log::info!("💾 Downloaded {}", file_name);
    Ok(())
}
