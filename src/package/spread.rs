//! Spreads: `Spreads/Spread_<id>.xml`.
//!
//! A spread holds one page and the text frames stacked on it. Placement is
//! tracked with typed transforms; the XML tree is produced on render.

use crate::error::{Error, Result};
use crate::geometry::{ItemTransform, Margins, PageGeometry};

use super::attrs::{AttrSet, Merge, attribute_groups};
use super::xml::{self, XmlElement};

attribute_groups! {
    pub struct SpreadAttributes {
        spread,
        text_frame,
        geometry_path,
    }
}

impl SpreadAttributes {
    pub fn defaults() -> Self {
        Self {
            spread: AttrSet::from_pairs(&[
                ("FlattenerOverride", "Default"),
                ("ShowMasterItems", "true"),
                ("PageCount", "1"),
                ("BindingLocation", "0"),
                ("AllowPageShuffle", "true"),
                ("ItemTransform", "1 0 0 1 0 0"),
                ("PageTransitionType", "None"),
                ("PageTransitionDirection", "NotApplicable"),
                ("PageTransitionDuration", "Medium"),
            ]),
            text_frame: AttrSet::from_pairs(&[
                ("ItemTransform", "1 0 0 1 0 0"),
                ("ContentType", "TextType"),
            ]),
            geometry_path: AttrSet::from_pairs(&[("PathOpen", "false")]),
        }
    }
}

attribute_groups! {
    pub struct PageAttributes {
        page,
        margin_preference,
    }
}

impl PageAttributes {
    pub fn defaults() -> Self {
        Self {
            page: AttrSet::from_pairs(&[
                ("AppliedTrapPreset", "TrapPreset/$ID/kDefaultTrapStyleName"),
                ("AppliedMaster", "n"),
                ("OverrideList", ""),
                ("TabOrder", ""),
                ("GridStartingPoint", "TopOutside"),
                ("UseMasterGrid", "true"),
            ]),
            margin_preference: AttrSet::from_pairs(&[
                ("ColumnCount", "1"),
                ("ColumnGutter", "12"),
                ("Top", "36"),
                ("Bottom", "36"),
                ("Left", "36"),
                ("Right", "36"),
                ("ColumnDirection", "Horizontal"),
                ("ColumnsPositions", "0 540"),
            ]),
        }
    }
}

/// Spacing rules for frames stacked on a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLayout {
    /// Gap below every frame.
    pub vertical_margin: f64,
    /// Frames are never shorter than this.
    pub min_frame_height: f64,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            vertical_margin: 10.0,
            min_frame_height: 20.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    pub self_id: String,
    pub margins: Margins,
    attrs: PageAttributes,
}

/// A text frame placed on a spread.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedFrame {
    pub self_id: String,
    /// `self_id` of the story shown in the frame.
    pub parent_story: String,
    pub height: f64,
    pub transform: ItemTransform,
}

#[derive(Debug, Clone)]
pub struct Spread {
    self_id: String,
    page_width: f64,
    page_height: f64,
    layout: FrameLayout,
    attrs: SpreadAttributes,
    page: Option<Page>,
    frames: Vec<PlacedFrame>,
}

impl Spread {
    pub fn new(
        self_id: impl Into<String>,
        page_width: f64,
        page_height: f64,
        layout: FrameLayout,
        overrides: &SpreadAttributes,
    ) -> Self {
        Self {
            self_id: self_id.into(),
            page_width,
            page_height,
            layout,
            attrs: SpreadAttributes::defaults().merge(overrides),
            page: None,
            frames: Vec::new(),
        }
    }

    pub fn self_id(&self) -> &str {
        &self.self_id
    }

    pub fn filename(&self) -> String {
        format!("Spreads/Spread_{}.xml", self.self_id)
    }

    /// Attach the page. A spread holds a single page; returns `false` and
    /// leaves the spread untouched if it already has one.
    pub fn add_page(
        &mut self,
        page_id: impl Into<String>,
        margins: Margins,
        overrides: &PageAttributes,
    ) -> bool {
        if self.page.is_some() {
            return false;
        }
        let page_id = page_id.into();
        let mut attrs = PageAttributes::defaults().merge(overrides);
        attrs.page.insert("Self", page_id.as_str());
        attrs.page.insert("Name", page_id.as_str());
        attrs.page.insert("UseMasterGrid", "false");
        attrs.margin_preference.insert("Top", margins.top.to_string());
        attrs.margin_preference.insert("Bottom", margins.bottom.to_string());
        attrs.margin_preference.insert("Left", margins.left.to_string());
        attrs.margin_preference.insert("Right", margins.right.to_string());

        self.page = Some(Page {
            self_id: page_id,
            margins,
            attrs,
        });
        true
    }

    pub fn has_page(&self) -> bool {
        self.page.is_some()
    }

    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    pub fn frames(&self) -> &[PlacedFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Page geometry with the page's own margins.
    pub fn geometry(&self) -> Result<PageGeometry> {
        let page = self.page.as_ref().ok_or_else(|| {
            Error::StructuralPrecondition(format!(
                "{} has no page, so its margins are unknown",
                self.self_id
            ))
        })?;
        Ok(PageGeometry {
            width: self.page_width,
            height: self.page_height,
            margins: page.margins,
        })
    }

    /// Frame height after applying the minimum.
    pub fn clamp_height(&self, height: f64) -> f64 {
        height.max(self.layout.min_frame_height)
    }

    /// Where the next frame would go: on the top margin for an empty page,
    /// otherwise under the last frame.
    pub fn next_transform(&self) -> Result<ItemTransform> {
        let geometry = self.geometry()?;
        Ok(match self.frames.last() {
            Some(last) => last
                .transform
                .below(last.height, self.layout.vertical_margin),
            None => geometry.initial_transform(),
        })
    }

    /// Whether a frame of `height` can be stacked under the existing ones
    /// without crossing the bottom margin.
    pub fn check_if_fits(&self, height: f64) -> Result<bool> {
        let geometry = self.geometry()?;
        let next = self.next_transform()?;
        Ok(geometry.fits(
            &next,
            self.clamp_height(height),
            self.layout.vertical_margin,
        ))
    }

    /// Stack a frame showing `parent_story` under the existing ones.
    ///
    /// No fit check happens here; the caller decides whether to open a new
    /// spread first.
    pub fn place_text_frame(
        &mut self,
        frame_id: impl Into<String>,
        parent_story: impl Into<String>,
        height: f64,
    ) -> Result<&PlacedFrame> {
        let transform = self.next_transform()?;
        let height = self.clamp_height(height);
        self.frames.push(PlacedFrame {
            self_id: frame_id.into(),
            parent_story: parent_story.into(),
            height,
            transform,
        });
        Ok(&self.frames[self.frames.len() - 1])
    }

    pub fn tree(&self) -> Result<XmlElement> {
        let geometry = self.geometry()?;

        let mut spread = XmlElement::new("Spread")
            .attrs(&self.attrs.spread)
            .attr("Self", self.self_id.as_str());

        if let Some(page) = &self.page {
            spread.push(
                XmlElement::new("Page")
                    .attrs(&page.attrs.page)
                    .child(XmlElement::new("MarginPreference").attrs(&page.attrs.margin_preference)),
            );
        }

        for frame in &self.frames {
            spread.push(self.frame_tree(frame, &geometry));
        }

        Ok(XmlElement::package_root("Spread").child(spread))
    }

    fn frame_tree(&self, frame: &PlacedFrame, geometry: &PageGeometry) -> XmlElement {
        let mut point_array = XmlElement::new("PathPointArray");
        for (x, y) in geometry.frame_rect(frame.height).path_points() {
            let anchor = format!("{x} {y}");
            point_array.push(
                XmlElement::new("PathPoint")
                    .attr("Anchor", anchor.as_str())
                    .attr("LeftDirection", anchor.as_str())
                    .attr("RightDirection", anchor.as_str()),
            );
        }

        let path_geometry = XmlElement::new("PathGeometry").child(
            XmlElement::new("GeometryPath")
                .attrs(&self.attrs.geometry_path)
                .child(point_array),
        );

        XmlElement::new("TextFrame")
            .attrs(&self.attrs.text_frame)
            .attr("Self", frame.self_id.as_str())
            .attr("ParentStory", frame.parent_story.as_str())
            .attr("ItemTransform", frame.transform.to_string())
            .child(XmlElement::new("Properties").child(path_geometry))
    }

    pub fn render(&self) -> Result<String> {
        Ok(xml::document(&self.tree()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn spread_with_page() -> Spread {
        let page = PageGeometry::default();
        let mut spread = Spread::new(
            "spread_0",
            page.width,
            page.height,
            FrameLayout::default(),
            &SpreadAttributes::default(),
        );
        assert!(spread.add_page("page_0", page.margins, &PageAttributes::default()));
        spread
    }

    #[test]
    fn test_geometry_without_page_is_precondition_error() {
        let spread = Spread::new(
            "spread_9",
            600.0,
            800.0,
            FrameLayout::default(),
            &SpreadAttributes::default(),
        );
        let err = spread.check_if_fits(10.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralPrecondition);
        assert!(err.to_string().contains("spread_9"));

        let mut spread = spread;
        assert!(spread.place_text_frame("textframe_0", "story_0", 10.0).is_err());
        assert!(spread.render().is_err());
    }

    #[test]
    fn test_second_page_is_rejected() {
        let mut spread = spread_with_page();
        assert!(!spread.add_page("page_1", Margins::uniform(0.0), &PageAttributes::default()));
        assert_eq!(spread.page().unwrap().self_id, "page_0");
    }

    #[test]
    fn test_frames_stack_downwards() {
        let mut spread = spread_with_page();
        let first = spread.place_text_frame("textframe_0", "story_0", 40.0).unwrap().clone();
        let second = spread.place_text_frame("textframe_1", "story_1", 25.0).unwrap().clone();

        assert!((first.transform.ty - (-370.9448818888)).abs() < 1e-9);
        assert!((second.transform.ty - (first.transform.ty + 10.0 + 40.0)).abs() < 1e-9);
        assert_eq!(second.transform.tx, first.transform.tx);
    }

    #[test]
    fn test_minimum_height_is_applied() {
        let mut spread = spread_with_page();
        let frame = spread.place_text_frame("textframe_0", "story_0", 3.0).unwrap();
        assert_eq!(frame.height, 20.0);
    }

    #[test]
    fn test_check_if_fits_fills_page() {
        let mut spread = spread_with_page();
        // 741.88 inner height: four 140pt frames plus gaps fit, a fifth does not.
        for i in 0..4 {
            assert!(spread.check_if_fits(140.0).unwrap(), "frame {i} should fit");
            spread.place_text_frame(format!("textframe_{i}"), "story", 140.0).unwrap();
        }
        assert!(!spread.check_if_fits(140.0).unwrap());
    }

    #[test]
    fn test_render() {
        let mut spread = spread_with_page();
        spread.place_text_frame("textframe_0", "story_0", 30.0).unwrap();
        let rendered = spread.render().unwrap();

        assert!(rendered.contains("<idPkg:Spread "));
        assert!(rendered.contains("Self=\"spread_0\""));
        assert!(rendered.contains("Self=\"page_0\" Name=\"page_0\""));
        assert!(rendered.contains("Top=\"50\""));
        assert!(rendered.contains("UseMasterGrid=\"false\""));
        assert!(rendered.contains("ParentStory=\"story_0\""));
        assert!(rendered.contains("ItemTransform=\"1 0 0 1 -247.6377952744 -370.9448818888\""));
        assert!(rendered.contains("<PathPoint Anchor=\"0 30\" LeftDirection=\"0 30\" RightDirection=\"0 30\"/>"));
        assert_eq!(spread.filename(), "Spreads/Spread_spread_0.xml");
    }
}
