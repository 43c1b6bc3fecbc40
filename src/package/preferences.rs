//! `Resources/Preferences.xml`.

use super::attrs::{AttrSet, Merge, attribute_groups};
use super::xml::{self, XmlElement};

attribute_groups! {
    pub struct PreferencesAttributes {
        document_preference,
    }
}

impl PreferencesAttributes {
    pub fn defaults() -> Self {
        Self {
            document_preference: AttrSet::from_pairs(&[
                ("PageHeight", "792"),
                ("PageWidth", "612"),
                ("PagesPerDocument", "1"),
                ("FacingPages", "true"),
                ("DocumentBleedTopOffset", "0"),
                ("DocumentBleedBottomOffset", "0"),
                ("DocumentBleedInsideOrLeftOffset", "0"),
                ("DocumentBleedOutsideOrRightOffset", "0"),
                ("DocumentBleedUniformSize", "true"),
                ("SlugTopOffset", "0"),
                ("SlugBottomOffset", "0"),
                ("SlugInsideOrLeftOffset", "0"),
                ("SlugRightOrOutsideOffset", "0"),
                ("DocumentSlugUniformSize", "false"),
                ("PreserveLayoutWhenShuffling", "true"),
                ("AllowPageShuffle", "true"),
                ("OverprintBlack", "true"),
                ("PageBinding", "LeftToRight"),
                ("ColumnDirection", "Horizontal"),
                ("Intent", "PrintIntent"),
            ]),
        }
    }
}

/// Document-wide preferences: page size, bleed, slug and guide colors.
#[derive(Debug, Clone)]
pub struct Preferences {
    tree: XmlElement,
}

impl Preferences {
    pub fn new(overrides: &PreferencesAttributes) -> Self {
        let attrs = PreferencesAttributes::defaults().merge(overrides);

        let properties = XmlElement::new("Properties")
            .child(
                XmlElement::new("ColumnGuideColor")
                    .attr("type", "enumeration")
                    .text("Violet"),
            )
            .child(
                XmlElement::new("MarginGuideColor")
                    .attr("type", "enumeration")
                    .text("Magenta"),
            );

        let tree = XmlElement::package_root("Preferences").child(
            XmlElement::new("DocumentPreference")
                .attrs(&attrs.document_preference)
                .child(properties),
        );

        Self { tree }
    }

    /// Preferences for a single-page, non-facing document of the given size.
    pub fn for_page(width: f64, height: f64) -> Self {
        Self::new(&PreferencesAttributes {
            document_preference: AttrSet::new()
                .with("PageHeight", height)
                .with("PageWidth", width)
                .with("PagesPerDocument", 1)
                .with("FacingPages", false),
        })
    }

    pub fn filename(&self) -> String {
        "Resources/Preferences.xml".to_string()
    }

    pub fn tree(&self) -> &XmlElement {
        &self.tree
    }

    pub fn render(&self) -> String {
        xml::document(&self.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_overrides_defaults() {
        let prefs = Preferences::for_page(595.5, 842.0);
        let doc_pref = prefs.tree().find("DocumentPreference").unwrap();
        assert_eq!(doc_pref.get_attr("PageWidth"), Some("595.5"));
        assert_eq!(doc_pref.get_attr("PageHeight"), Some("842"));
        assert_eq!(doc_pref.get_attr("FacingPages"), Some("false"));
        assert_eq!(doc_pref.get_attr("Intent"), Some("PrintIntent"));
    }

    #[test]
    fn test_render_contains_guide_colors() {
        let rendered = Preferences::for_page(100.0, 200.0).render();
        assert!(rendered.contains("<ColumnGuideColor type=\"enumeration\">Violet</ColumnGuideColor>"));
        assert!(rendered.contains("<MarginGuideColor type=\"enumeration\">Magenta</MarginGuideColor>"));
        assert!(rendered.starts_with("<?xml"));
    }
}
