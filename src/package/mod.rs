//! IDML package parts.
//!
//! Every file in the archive is a [`PackageElement`]. Elements share a small
//! capability set through [`ContentElement`] (a filename inside the archive
//! and a rendered body); the [`Package`] collection is queried by
//! [`ElementKind`] instead of by concrete type.

mod attrs;
mod designmap;
mod mimetype;
mod preferences;
mod spread;
mod story;
mod story_table;
mod writer;
pub(crate) mod xml;

pub use attrs::{AttrSet, Merge};
pub use designmap::{AID_INSTRUCTION, DESIGNMAP_FILENAME, Designmap, DesignmapEntry};
pub use mimetype::{IDML_MIMETYPE, Mimetype};
pub use preferences::{Preferences, PreferencesAttributes};
pub use spread::{FrameLayout, Page, PageAttributes, PlacedFrame, Spread, SpreadAttributes};
pub use story::{DEFAULT_POINT_SIZE, Story, StoryAttributes, StoryContent};
pub use story_table::{StoryTable, StoryTableAttributes, TableGrid};
pub use writer::{PackageWriter, write_package};
pub use xml::{XmlElement, XmlNode};

use crate::error::Result;

/// Concrete kind of a package part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Mimetype,
    Preferences,
    Spread,
    Story,
    StoryTable,
    Designmap,
}

impl ElementKind {
    /// Element name used for this kind in `designmap.xml`, or `None` for
    /// parts the manifest does not list.
    ///
    /// Table stories are ordinary stories as far as InDesign is concerned.
    pub fn designmap_tag(self) -> Option<&'static str> {
        match self {
            ElementKind::Preferences => Some("Preferences"),
            ElementKind::Spread => Some("Spread"),
            ElementKind::Story | ElementKind::StoryTable => Some("Story"),
            ElementKind::Mimetype | ElementKind::Designmap => None,
        }
    }
}

/// A file in the package.
pub trait ContentElement {
    fn kind(&self) -> ElementKind;

    /// Path inside the archive.
    fn filename(&self) -> String;

    /// File contents.
    fn render(&self) -> Result<String>;
}

impl ContentElement for Mimetype {
    fn kind(&self) -> ElementKind {
        ElementKind::Mimetype
    }

    fn filename(&self) -> String {
        Mimetype::filename(self)
    }

    fn render(&self) -> Result<String> {
        Ok(Mimetype::render(self))
    }
}

impl ContentElement for Preferences {
    fn kind(&self) -> ElementKind {
        ElementKind::Preferences
    }

    fn filename(&self) -> String {
        Preferences::filename(self)
    }

    fn render(&self) -> Result<String> {
        Ok(Preferences::render(self))
    }
}

impl ContentElement for Spread {
    fn kind(&self) -> ElementKind {
        ElementKind::Spread
    }

    fn filename(&self) -> String {
        Spread::filename(self)
    }

    fn render(&self) -> Result<String> {
        Spread::render(self)
    }
}

impl ContentElement for Story {
    fn kind(&self) -> ElementKind {
        ElementKind::Story
    }

    fn filename(&self) -> String {
        Story::filename(self)
    }

    fn render(&self) -> Result<String> {
        Ok(Story::render(self))
    }
}

impl ContentElement for StoryTable {
    fn kind(&self) -> ElementKind {
        ElementKind::StoryTable
    }

    fn filename(&self) -> String {
        StoryTable::filename(self)
    }

    fn render(&self) -> Result<String> {
        Ok(StoryTable::render(self))
    }
}

impl ContentElement for Designmap {
    fn kind(&self) -> ElementKind {
        ElementKind::Designmap
    }

    fn filename(&self) -> String {
        Designmap::filename(self).to_string()
    }

    fn render(&self) -> Result<String> {
        Ok(Designmap::render(self))
    }
}

/// A package part of any kind.
#[derive(Debug, Clone)]
pub enum PackageElement {
    Mimetype(Mimetype),
    Preferences(Preferences),
    Spread(Spread),
    Story(Story),
    StoryTable(StoryTable),
    Designmap(Designmap),
}

impl PackageElement {
    fn as_element(&self) -> &dyn ContentElement {
        match self {
            PackageElement::Mimetype(e) => e,
            PackageElement::Preferences(e) => e,
            PackageElement::Spread(e) => e,
            PackageElement::Story(e) => e,
            PackageElement::StoryTable(e) => e,
            PackageElement::Designmap(e) => e,
        }
    }

    /// The story behind this element, for either story variant.
    pub fn as_story_content(&self) -> Option<&dyn StoryContent> {
        match self {
            PackageElement::Story(s) => Some(s as &dyn StoryContent),
            PackageElement::StoryTable(t) => Some(t as &dyn StoryContent),
            _ => None,
        }
    }

    pub fn as_spread(&self) -> Option<&Spread> {
        match self {
            PackageElement::Spread(s) => Some(s),
            _ => None,
        }
    }
}

impl ContentElement for PackageElement {
    fn kind(&self) -> ElementKind {
        self.as_element().kind()
    }

    fn filename(&self) -> String {
        self.as_element().filename()
    }

    fn render(&self) -> Result<String> {
        self.as_element().render()
    }
}

impl From<Spread> for PackageElement {
    fn from(spread: Spread) -> Self {
        PackageElement::Spread(spread)
    }
}

impl From<Story> for PackageElement {
    fn from(story: Story) -> Self {
        PackageElement::Story(story)
    }
}

impl From<StoryTable> for PackageElement {
    fn from(table: StoryTable) -> Self {
        PackageElement::StoryTable(table)
    }
}

/// Ordered working set of one formatting call.
#[derive(Debug, Clone, Default)]
pub struct Package {
    elements: Vec<PackageElement>,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: impl Into<PackageElement>) {
        self.elements.push(element.into());
    }

    pub fn elements(&self) -> &[PackageElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements of one kind, in insertion order.
    pub fn of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &PackageElement> {
        self.elements.iter().filter(move |e| e.kind() == kind)
    }

    pub fn spreads(&self) -> impl Iterator<Item = &Spread> {
        self.elements.iter().filter_map(PackageElement::as_spread)
    }

    /// Manifest listing every element kind-major: preferences, spreads,
    /// stories, then table stories.
    pub fn designmap(&self) -> Designmap {
        let mut designmap = Designmap::new();
        for kind in [
            ElementKind::Preferences,
            ElementKind::Spread,
            ElementKind::Story,
            ElementKind::StoryTable,
        ] {
            let Some(tag) = kind.designmap_tag() else {
                continue;
            };
            for element in self.of_kind(kind) {
                designmap.add_element(tag, element.filename());
            }
        }
        designmap
    }
}

impl From<Mimetype> for PackageElement {
    fn from(mimetype: Mimetype) -> Self {
        PackageElement::Mimetype(mimetype)
    }
}

impl From<Preferences> for PackageElement {
    fn from(preferences: Preferences) -> Self {
        PackageElement::Preferences(preferences)
    }
}

impl From<Designmap> for PackageElement {
    fn from(designmap: Designmap) -> Self {
        PackageElement::Designmap(designmap)
    }
}
