//! The `mimetype` entry.

pub const IDML_MIMETYPE: &str = "application/vnd.adobe.indesign-idml-package";

/// First entry of every package, stored uncompressed so readers can sniff it
/// at a fixed offset.
#[derive(Debug, Clone, Default)]
pub struct Mimetype;

impl Mimetype {
    pub fn filename(&self) -> String {
        "mimetype".to_string()
    }

    pub fn render(&self) -> String {
        IDML_MIMETYPE.to_string()
    }
}
