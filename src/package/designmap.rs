//! The package manifest, `designmap.xml`.

use super::xml::{self, DOM_VERSION, XMLNS_IDPKG, XmlElement};

/// Processing instruction InDesign expects right after the declaration.
pub const AID_INSTRUCTION: &str =
    r#"<?aid style="50" type="document" readerVersion="6.0" featureSet="257"?>"#;

pub const DESIGNMAP_FILENAME: &str = "designmap.xml";

/// One `idPkg:<tag> src="..."` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignmapEntry {
    pub tag: String,
    pub src: String,
}

/// Manifest listing every other part of the package.
#[derive(Debug, Clone, Default)]
pub struct Designmap {
    entries: Vec<DesignmapEntry>,
}

impl Designmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference the part at `src` as `<idPkg:{tag} src="{src}"/>`.
    pub fn add_element(&mut self, tag: impl Into<String>, src: impl Into<String>) {
        self.entries.push(DesignmapEntry {
            tag: tag.into(),
            src: src.into(),
        });
    }

    pub fn entries(&self) -> &[DesignmapEntry] {
        &self.entries
    }

    pub fn filename(&self) -> &'static str {
        DESIGNMAP_FILENAME
    }

    /// The `Document` root. Unlike the other parts it is not an `idPkg:`
    /// element, but it still declares the packaging namespace.
    pub fn tree(&self) -> XmlElement {
        let mut document = XmlElement::new("Document")
            .attr("xmlns:idPkg", XMLNS_IDPKG)
            .attr("DOMVersion", DOM_VERSION);
        for entry in &self.entries {
            document.push(
                XmlElement::new(format!("idPkg:{}", entry.tag)).attr("src", entry.src.as_str()),
            );
        }
        document
    }

    pub fn render(&self) -> String {
        let body = xml::document(&self.tree());
        match body.split_once('\n') {
            Some((declaration, rest)) => format!("{declaration}\n{AID_INSTRUCTION}\n{rest}"),
            None => body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let mut map = Designmap::new();
        map.add_element("Preferences", "Resources/Preferences.xml");
        map.add_element("Spread", "Spreads/Spread_spread_0.xml");
        map.add_element("Story", "Stories/Story_story_0.xml");

        let expected = concat!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
            "<?aid style=\"50\" type=\"document\" readerVersion=\"6.0\" featureSet=\"257\"?>\n",
            "<Document xmlns:idPkg=\"http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging\" DOMVersion=\"13.1\">\n",
            "  <idPkg:Preferences src=\"Resources/Preferences.xml\"/>\n",
            "  <idPkg:Spread src=\"Spreads/Spread_spread_0.xml\"/>\n",
            "  <idPkg:Story src=\"Stories/Story_story_0.xml\"/>\n",
            "</Document>\n",
        );
        assert_eq!(map.render(), expected);
    }

    #[test]
    fn test_empty_document_self_closes() {
        let rendered = Designmap::new().render();
        assert!(rendered.ends_with("DOMVersion=\"13.1\"/>\n"));
        assert_eq!(rendered.lines().count(), 3);
    }
}
