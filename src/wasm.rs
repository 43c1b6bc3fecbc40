//! WASM bindings for formatting articles in the browser.

use wasm_bindgen::prelude::*;

use crate::formatter::{Article, Formatter, IdmlFormatter};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Format an HTML article body into IDML package bytes.
///
/// `published_seq_num` is accepted for parity with the native API; the
/// returned bytes are the package only.
#[wasm_bindgen]
pub fn format_body(body_html: &str, published_seq_num: &str) -> Result<Vec<u8>, JsValue> {
    let item = IdmlFormatter::new()
        .format(&Article::new(body_html), published_seq_num)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(item.encoded_item)
}
