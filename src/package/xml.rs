//! Minimal XML element tree with indented rendering.

use quick_xml::escape::{escape, partial_escape};

use super::attrs::AttrSet;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;
pub const XMLNS_IDPKG: &str = "http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging";
pub const DOM_VERSION: &str = "13.1";

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    attrs: AttrSet,
    children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: AttrSet::new(),
            children: Vec::new(),
        }
    }

    /// Root element of a package part: `idPkg:<name>` with the packaging
    /// namespace and DOM version.
    pub fn package_root(name: &str) -> Self {
        Self::new(format!("idPkg:{name}"))
            .attr("xmlns:idPkg", XMLNS_IDPKG)
            .attr("DOMVersion", DOM_VERSION)
    }

    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(key, value);
        self
    }

    pub fn attrs(mut self, attrs: &AttrSet) -> Self {
        for (k, v) in attrs.iter() {
            self.attrs.insert(k, v);
        }
        self
    }

    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key)
    }

    pub fn children(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Depth-first search for the first element called `name`.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        if self.name == name {
            return Some(self);
        }
        self.children().find_map(|c| c.find(name))
    }

    /// Render as an indented document body, one element per line.
    ///
    /// Elements whose only children are text stay on one line; empty
    /// elements self-close.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out, 0);
        out
    }

    fn write_to(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&format!("{indent}<{}", self.name));
        for (k, v) in self.attrs.iter() {
            out.push_str(&format!(" {k}=\"{}\"", escape(v)));
        }

        if self.children.is_empty() {
            out.push_str("/>\n");
            return;
        }

        let text_only = self
            .children
            .iter()
            .all(|c| matches!(c, XmlNode::Text(_)));
        if text_only {
            out.push('>');
            for child in &self.children {
                if let XmlNode::Text(t) = child {
                    out.push_str(&partial_escape(t.as_str()));
                }
            }
            out.push_str(&format!("</{}>\n", self.name));
            return;
        }

        out.push_str(">\n");
        for child in &self.children {
            match child {
                XmlNode::Element(e) => e.write_to(out, depth + 1),
                XmlNode::Text(t) => {
                    out.push_str(&format!("{indent}  {}\n", partial_escape(t.as_str())));
                }
            }
        }
        out.push_str(&format!("{indent}</{}>\n", self.name));
    }
}

/// Declaration line followed by the rendered tree.
pub fn document(root: &XmlElement) -> String {
    format!("{XML_DECLARATION}\n{}", root.render())
}
