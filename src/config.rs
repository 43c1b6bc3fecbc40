//! Formatter configuration.
//!
//! Defaults reproduce an A4 portrait page with 50pt margins and the
//! point sizes used for article body tags.

use crate::error::{Error, Result};
use crate::geometry::PageGeometry;

/// Point size assigned to each block-level tag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct TagStyles {
    pub p: f64,
    pub h1: f64,
    pub h2: f64,
    pub h3: f64,
    pub h4: f64,
    pub h5: f64,
    pub h6: f64,
    pub table: f64,
}

impl Default for TagStyles {
    fn default() -> Self {
        Self {
            p: 12.0,
            h1: 30.0,
            h2: 20.0,
            h3: 14.0,
            h4: 11.0,
            h5: 10.0,
            h6: 9.0,
            table: 10.0,
        }
    }
}

impl TagStyles {
    /// Point size for a block tag, or `None` if the tag is not a block we lay out.
    pub fn point_size(&self, tag: &str) -> Option<f64> {
        match tag {
            "p" => Some(self.p),
            "h1" => Some(self.h1),
            "h2" => Some(self.h2),
            "h3" => Some(self.h3),
            "h4" => Some(self.h4),
            "h5" => Some(self.h5),
            "h6" => Some(self.h6),
            "table" => Some(self.table),
            _ => None,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("p", self.p),
            ("h1", self.h1),
            ("h2", self.h2),
            ("h3", self.h3),
            ("h4", self.h4),
            ("h5", self.h5),
            ("h6", self.h6),
            ("table", self.table),
        ]
        .into_iter()
    }
}

/// Configuration for IDML formatting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct FormatterConfig {
    pub page: PageGeometry,
    /// Gap between stacked frames.
    pub vertical_margin: f64,
    /// Frames are never shorter than this.
    pub min_frame_height: f64,
    /// Estimated height of every table frame.
    pub table_height: f64,
    pub styles: TagStyles,
    /// Deflate level for package entries. `None` stores everything.
    /// `mimetype` is always stored.
    pub compression_level: Option<i64>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            page: PageGeometry::default(),
            vertical_margin: 10.0,
            min_frame_height: 20.0,
            table_height: 300.0,
            styles: TagStyles::default(),
            compression_level: None,
        }
    }
}

impl FormatterConfig {
    /// Reject values that would make layout meaningless.
    pub fn validate(&self) -> Result<()> {
        let page = &self.page;
        if !(page.width > 0.0 && page.height > 0.0) {
            return Err(Error::malformed(format!(
                "page size must be positive, got {}x{}",
                page.width, page.height
            )));
        }
        let m = &page.margins;
        if [m.top, m.bottom, m.left, m.right].iter().any(|v| !(*v >= 0.0)) {
            return Err(Error::malformed("page margins must not be negative"));
        }
        if m.left + m.right >= page.width || m.top + m.bottom >= page.height {
            return Err(Error::malformed("page margins leave no inner area"));
        }
        if !(self.vertical_margin >= 0.0 && self.min_frame_height >= 0.0) {
            return Err(Error::malformed(format!(
                "frame spacing must not be negative, got vertical_margin {} and min_frame_height {}",
                self.vertical_margin, self.min_frame_height
            )));
        }
        if !(self.table_height > 0.0) {
            return Err(Error::malformed(format!(
                "table height must be positive, got {}",
                self.table_height
            )));
        }
        for (tag, size) in self.styles.iter() {
            if !(size > 0.0) {
                return Err(Error::malformed(format!(
                    "point size for <{tag}> must be positive, got {size}"
                )));
            }
        }
        if let Some(level) = self.compression_level
            && !(0..=9).contains(&level)
        {
            return Err(Error::malformed(format!(
                "compression level must be 0-9, got {level}"
            )));
        }
        Ok(())
    }
}
