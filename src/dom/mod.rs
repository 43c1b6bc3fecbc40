//! Article body parsing.
//!
//! The body is parsed leniently with html5ever into an arena [`Dom`]; the
//! top-level children of `<body>` are then classified into layout blocks.

mod arena;
mod tree_sink;

pub use arena::{Children, Dom, Node, NodeData, NodeId};
pub use tree_sink::{DomSink, NodeHandle};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use crate::error::{Error, Result};

/// Kind of a top-level body element the formatter lays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    /// Heading level 1-6.
    Heading(u8),
    Table,
}

impl BlockKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "p" => Some(BlockKind::Paragraph),
            "h1" => Some(BlockKind::Heading(1)),
            "h2" => Some(BlockKind::Heading(2)),
            "h3" => Some(BlockKind::Heading(3)),
            "h4" => Some(BlockKind::Heading(4)),
            "h5" => Some(BlockKind::Heading(5)),
            "h6" => Some(BlockKind::Heading(6)),
            "table" => Some(BlockKind::Table),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "p",
            BlockKind::Heading(1) => "h1",
            BlockKind::Heading(2) => "h2",
            BlockKind::Heading(3) => "h3",
            BlockKind::Heading(4) => "h4",
            BlockKind::Heading(5) => "h5",
            BlockKind::Heading(_) => "h6",
            BlockKind::Table => "table",
        }
    }
}

/// One top-level body element, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub node: NodeId,
    pub kind: BlockKind,
}

/// A parsed article body.
pub struct Body {
    pub dom: Dom,
    pub blocks: Vec<Block>,
}

/// Parse article markup and collect its layout blocks.
///
/// Elements other than paragraphs, headings and tables are skipped with a
/// warning; stray text directly inside `<body>` is skipped the same way.
pub fn parse_body(html: &str) -> Result<Body> {
    if html.trim().is_empty() {
        return Err(Error::malformed("article body is empty"));
    }

    let sink = parse_document(DomSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes());
    if sink.error_count() > 0 {
        log::debug!("recovered from {} markup errors", sink.error_count());
    }
    let dom = sink.into_dom();

    let body = dom
        .find_by_tag("body")
        .ok_or_else(|| Error::malformed("markup has no body element"))?;

    let mut blocks = Vec::new();
    for child in dom.children(body) {
        match dom.element_name(child) {
            Some(tag) => match BlockKind::from_tag(tag) {
                Some(kind) => blocks.push(Block { node: child, kind }),
                None => log::warn!("skipping unsupported body element <{}>", tag),
            },
            None => {
                if let Some(text) = dom.text(child)
                    && !text.trim().is_empty()
                {
                    log::warn!("skipping bare text outside of a block element");
                }
            }
        }
    }

    if blocks.is_empty() {
        return Err(Error::malformed(
            "article body has no paragraphs, headings or tables",
        ));
    }

    Ok(Body { dom, blocks })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_in_document_order() {
        let body = parse_body("<h2>Sub</h2><p>One</p><table><tr><td>x</td></tr></table><p>Two</p>")
            .unwrap();
        let kinds: Vec<_> = body.blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Heading(2),
                BlockKind::Paragraph,
                BlockKind::Table,
                BlockKind::Paragraph
            ]
        );
    }

    #[test]
    fn test_unsupported_elements_are_skipped() {
        let body = parse_body("<div>ignored</div><p>kept</p><ul><li>no</li></ul>").unwrap();
        assert_eq!(body.blocks.len(), 1);
        assert_eq!(body.dom.text_content(body.blocks[0].node), "kept");
    }

    #[test]
    fn test_empty_body_is_malformed() {
        let err = parse_body("   \n").err().unwrap();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn test_body_without_blocks_is_malformed() {
        let err = parse_body("<div>x</div><ul><li>y</li></ul>").err().unwrap();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert!(err.to_string().contains("no paragraphs"));
    }

    #[test]
    fn test_tag_roundtrip() {
        for tag in ["p", "h1", "h2", "h3", "h4", "h5", "h6", "table"] {
            assert_eq!(BlockKind::from_tag(tag).unwrap().tag(), tag);
        }
        assert_eq!(BlockKind::from_tag("div"), None);
    }
}
