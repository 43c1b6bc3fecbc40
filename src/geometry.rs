//! Page coordinates and frame placement math.
//!
//! IDML places the origin of a spread at the center of its page when facing
//! pages are off. Frames are stacked top to bottom, each one positioned by an
//! item transform whose linear part is always the identity.

use std::fmt;

/// Page margins, measured inward from each page edge.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Margins {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }
}

/// Document page size plus the margins every new page gets.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
}

impl Default for PageGeometry {
    /// A4 portrait in points with 50pt margins.
    fn default() -> Self {
        Self {
            width: 595.2755905488,
            height: 841.8897637776,
            margins: Margins::uniform(50.0),
        }
    }
}

impl PageGeometry {
    pub fn inner_width(&self) -> f64 {
        self.width - self.margins.left - self.margins.right
    }

    pub fn inner_height(&self) -> f64 {
        self.height - self.margins.top - self.margins.bottom
    }

    /// Transform of the first frame on a page: its top-left corner sits on the
    /// top margin.
    pub fn initial_transform(&self) -> ItemTransform {
        ItemTransform::translation(
            -self.width / 2.0 + self.margins.right,
            -self.height / 2.0 + self.margins.top,
        )
    }

    /// Lowest y coordinate a frame may reach. Only valid for a single page
    /// per spread without facing pages.
    pub fn bottom_limit(&self) -> f64 {
        self.inner_height() / 2.0
    }

    /// Whether a frame of `height` starting at `transform` plus the trailing
    /// gap stays within the bottom margin.
    pub fn fits(&self, transform: &ItemTransform, height: f64, vertical_margin: f64) -> bool {
        self.bottom_limit() >= transform.ty + height + vertical_margin
    }

    /// Rectangle path of a frame of `height` spanning the inner page width.
    pub fn frame_rect(&self, height: f64) -> FrameRect {
        FrameRect {
            width: self.inner_width(),
            height,
        }
    }
}

/// 2x3 affine matrix `[a b c d tx ty]` as used by IDML `ItemTransform`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl ItemTransform {
    pub const IDENTITY: ItemTransform = ItemTransform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    /// Compose with a translation by `(dx, dy)`.
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            tx: self.tx + self.a * dx + self.c * dy,
            ty: self.ty + self.b * dx + self.d * dy,
            ..self
        }
    }

    /// Transform for the frame stacked under a frame of `height` placed at
    /// `self`, leaving `gap` between them.
    pub fn below(self, height: f64, gap: f64) -> Self {
        self.translate(0.0, gap).translate(0.0, height)
    }
}

impl fmt::Display for ItemTransform {
    /// The linear part is written as integers, the translation in full.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.0} {:.0} {:.0} {:.0} {} {}",
            self.a, self.b, self.c, self.d, self.tx, self.ty
        )
    }
}

/// Axis-aligned frame rectangle in frame-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRect {
    pub width: f64,
    pub height: f64,
}

impl FrameRect {
    /// Corner anchors in path order: top-left, bottom-left, bottom-right,
    /// top-right.
    pub fn path_points(&self) -> [(f64, f64); 4] {
        [
            (0.0, 0.0),
            (0.0, self.height),
            (self.width, self.height),
            (self.width, 0.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_inner_dimensions() {
        let page = PageGeometry::default();
        assert!((page.inner_width() - 495.2755905488).abs() < EPSILON);
        assert!((page.inner_height() - 741.8897637776).abs() < EPSILON);
    }

    #[test]
    fn test_initial_transform_sits_on_margins() {
        let page = PageGeometry::default();
        let t = page.initial_transform();
        assert!((t.tx - (-297.6377952744 + 50.0)).abs() < EPSILON);
        assert!((t.ty - (-420.9448818888 + 50.0)).abs() < EPSILON);
        assert_eq!((t.a, t.b, t.c, t.d), (1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_below_moves_down_only() {
        let t = ItemTransform::translation(-10.0, -100.0).below(40.0, 10.0);
        assert_eq!(t.tx, -10.0);
        assert_eq!(t.ty, -50.0);
    }

    #[test]
    fn test_fits_boundary() {
        let page = PageGeometry::default();
        let start = page.initial_transform();
        let capacity = page.bottom_limit() - start.ty - 10.0;
        assert!(page.fits(&start, capacity, 10.0));
        assert!(!page.fits(&start, capacity + 1.0, 10.0));
    }

    #[test]
    fn test_display_format() {
        let t = ItemTransform::translation(-247.5, 12.0);
        assert_eq!(t.to_string(), "1 0 0 1 -247.5 12");
    }

    #[test]
    fn test_path_points_order() {
        let rect = FrameRect {
            width: 100.0,
            height: 30.0,
        };
        assert_eq!(
            rect.path_points(),
            [(0.0, 0.0), (0.0, 30.0), (100.0, 30.0), (100.0, 0.0)]
        );
    }
}
