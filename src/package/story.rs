//! Text stories: `Stories/Story_<id>.xml`.

use crate::dom::{Dom, NodeId};
use crate::error::{Error, Result};
use crate::estimate::HeightEstimator;

use super::attrs::{AttrSet, Merge, attribute_groups};
use super::xml::{self, XmlElement};

attribute_groups! {
    /// Attribute sets of a story part.
    pub struct StoryAttributes {
        story,
        paragraph_style_range,
        character_style_range,
        story_preference,
    }
}

impl StoryAttributes {
    pub fn defaults() -> Self {
        Self {
            story: AttrSet::from_pairs(&[
                ("AppliedNamedGrid", "n"),
                ("AppliedTOCStyle", "n"),
                ("TrackChanges", "false"),
                ("StoryTitle", "$ID/"),
            ]),
            paragraph_style_range: AttrSet::from_pairs(&[(
                "AppliedParagraphStyle",
                "ParagraphStyle/$ID/NormalParagraphStyle",
            )]),
            character_style_range: AttrSet::from_pairs(&[
                ("AppliedCharacterStyle", "CharacterStyle/$ID/[No character style]"),
                ("PointSize", DEFAULT_POINT_SIZE),
            ]),
            story_preference: AttrSet::from_pairs(&[
                ("OpticalMarginAlignment", "false"),
                ("OpticalMarginSize", "12"),
                ("FrameType", "TextFrameType"),
                ("StoryOrientation", "Horizontal"),
                ("StoryDirection", "LeftToRightDirection"),
            ]),
        }
    }

    /// Overrides that only set the character point size.
    pub fn with_point_size(point_size: f64) -> Self {
        Self {
            character_style_range: AttrSet::new().with("PointSize", point_size),
            ..Self::default()
        }
    }
}

/// Point size the height heuristic is calibrated against.
pub const DEFAULT_POINT_SIZE: &str = "12";

/// Behaviour shared by every story variant the paginator places.
pub trait StoryContent {
    /// Identity referenced by a text frame's `ParentStory`.
    fn self_id(&self) -> &str;

    /// Character count of the story text.
    fn length(&self) -> Result<usize>;

    /// Height the story is expected to occupy on the page.
    fn estimate_height(&self, estimator: &HeightEstimator) -> f64;
}

/// One paragraph or heading.
#[derive(Debug, Clone)]
pub struct Story {
    self_id: String,
    node: NodeId,
    text: String,
    point_size: f64,
    leading: f64,
    tree: XmlElement,
}

impl Story {
    /// Build the story for `node`, whose full text becomes the content.
    pub fn new(
        self_id: impl Into<String>,
        dom: &Dom,
        node: NodeId,
        overrides: &StoryAttributes,
    ) -> Result<Self> {
        let self_id = self_id.into();
        let attrs = StoryAttributes::defaults().merge(overrides);
        let text = dom.text_content(node);

        let point_size_attr = attrs
            .character_style_range
            .get("PointSize")
            .unwrap_or(DEFAULT_POINT_SIZE)
            .to_string();
        let point_size = parse_points(&point_size_attr)?;
        // Leading is written with the same text as the point size.
        let leading = point_size;

        let character_style_range = XmlElement::new("CharacterStyleRange")
            .attrs(&attrs.character_style_range)
            .child(
                XmlElement::new("Properties").child(
                    XmlElement::new("Leading")
                        .attr("type", "unit")
                        .text(point_size_attr),
                ),
            )
            .child(XmlElement::new("Content").text(text.as_str()));

        let story = XmlElement::new("Story")
            .attrs(&attrs.story)
            .attr("Self", self_id.as_str())
            .child(
                XmlElement::new("ParagraphStyleRange")
                    .attrs(&attrs.paragraph_style_range)
                    .child(character_style_range),
            )
            .child(XmlElement::new("StoryPreference").attrs(&attrs.story_preference));

        Ok(Self {
            self_id,
            node,
            text,
            point_size,
            leading,
            tree: XmlElement::package_root("Story").child(story),
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn point_size(&self) -> f64 {
        self.point_size
    }

    pub fn leading(&self) -> f64 {
        self.leading
    }

    pub fn filename(&self) -> String {
        story_filename(&self.self_id)
    }

    pub fn tree(&self) -> &XmlElement {
        &self.tree
    }

    pub fn render(&self) -> String {
        xml::document(&self.tree)
    }
}

impl StoryContent for Story {
    fn self_id(&self) -> &str {
        &self.self_id
    }

    fn length(&self) -> Result<usize> {
        Ok(self.text.chars().count())
    }

    fn estimate_height(&self, estimator: &HeightEstimator) -> f64 {
        estimator.text_height(self.text.chars().count(), self.point_size, self.leading)
    }
}

pub(crate) fn story_filename(self_id: &str) -> String {
    format!("Stories/Story_{self_id}.xml")
}

pub(crate) fn parse_points(value: &str) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if v > 0.0 && v.is_finite() => Ok(v),
        _ => Err(Error::malformed(format!("invalid point size {value:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_body;

    fn first_story(html: &str, overrides: &StoryAttributes) -> Result<Story> {
        let body = parse_body(html).unwrap();
        Story::new("story_0", &body.dom, body.blocks[0].node, overrides)
    }

    #[test]
    fn test_structure() {
        let story = first_story("<p>Hello <em>there</em></p>", &StoryAttributes::default()).unwrap();
        let tree = story.tree();
        let inner = tree.find("Story").unwrap();
        assert_eq!(inner.get_attr("Self"), Some("story_0"));
        assert_eq!(inner.get_attr("TrackChanges"), Some("false"));

        let csr = tree.find("CharacterStyleRange").unwrap();
        assert_eq!(csr.get_attr("PointSize"), Some("12"));
        assert!(tree.find("StoryPreference").is_some());

        let rendered = story.render();
        assert!(rendered.contains("<Content>Hello there</Content>"));
        assert!(rendered.contains("<Leading type=\"unit\">12</Leading>"));
        assert_eq!(story.filename(), "Stories/Story_story_0.xml");
    }

    #[test]
    fn test_point_size_override_drives_leading() {
        let story = first_story("<h1>Title</h1>", &StoryAttributes::with_point_size(30.0)).unwrap();
        assert_eq!(story.point_size(), 30.0);
        assert_eq!(story.leading(), 30.0);
        assert!(story.render().contains("<Leading type=\"unit\">30</Leading>"));
    }

    #[test]
    fn test_length_counts_characters() {
        let story = first_story("<p>naïve café</p>", &StoryAttributes::default()).unwrap();
        assert_eq!(story.length().unwrap(), 10);
    }

    #[test]
    fn test_bad_point_size_is_malformed() {
        let overrides = StoryAttributes {
            character_style_range: AttrSet::from_pairs(&[("PointSize", "large")]),
            ..StoryAttributes::default()
        };
        let err = first_story("<p>x</p>", &overrides).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }
}
