//! The IDML formatter: article in, packaged bytes out.

use log::info;

use crate::config::FormatterConfig;
use crate::dom::{BlockKind, parse_body};
use crate::error::{Error, Result};
use crate::layout::{Counters, paginate};
use crate::package::{
    Mimetype, Package, PackageElement, Preferences, Story, StoryAttributes, StoryContent,
    StoryTable, StoryTableAttributes, write_package,
};
use crate::util::Stopwatch;

/// Format type string this formatter answers to.
pub const FORMAT_TYPE: &str = "idml";

/// An article as handed over for publishing.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
pub struct Article {
    #[cfg_attr(feature = "cli", serde(default))]
    pub guid: String,
    #[cfg_attr(feature = "cli", serde(default))]
    pub headline: Option<String>,
    #[cfg_attr(feature = "cli", serde(default))]
    pub language: Option<String>,
    /// Block-level HTML: paragraphs, headings and tables.
    pub body_html: String,
}

impl Article {
    pub fn new(body_html: impl Into<String>) -> Self {
        Self {
            body_html: body_html.into(),
            ..Self::default()
        }
    }
}

/// Output of one formatting call.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedItem {
    /// Passed through unchanged from the caller.
    pub published_seq_num: String,
    /// The zipped package.
    pub encoded_item: Vec<u8>,
    /// Text rendition; always empty for binary formats.
    pub formatted_item: String,
}

/// A publishing output format.
pub trait Formatter {
    /// Whether this formatter handles `format_type` for `article`.
    fn can_format(&self, format_type: &str, article: &Article) -> bool;

    /// Format `article` into a publishable item.
    fn format(&self, article: &Article, published_seq_num: &str) -> Result<FormattedItem>;

    /// Format `article` as a plain string for export.
    fn export(&self, article: &Article) -> Result<String>;
}

/// Formats articles into IDML packages.
///
/// # Example
///
/// ```no_run
/// use idmlpack::{Article, Formatter, IdmlFormatter};
///
/// let article = Article::new("<h1>Title</h1><p>Body text.</p>");
/// let item = IdmlFormatter::new().format(&article, "1000")?;
/// std::fs::write("article.idml", &item.encoded_item)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct IdmlFormatter {
    config: FormatterConfig,
}

impl IdmlFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: FormatterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Build the full package for `body_html` without serializing it.
    ///
    /// Element order: mimetype, preferences, stories in document order,
    /// spreads, designmap.
    pub fn build_package(&self, body_html: &str) -> Result<Package> {
        self.config.validate()?;
        let body = parse_body(body_html)?;
        let styles = &self.config.styles;
        let page = &self.config.page;

        // Fresh counters per call; nothing is shared between articles.
        let mut counters = Counters::new();

        let mut stories = Vec::with_capacity(body.blocks.len());
        for block in &body.blocks {
            let self_id = counters.next_story_id();
            let story: PackageElement = match block.kind {
                BlockKind::Table => StoryTable::new(
                    self_id,
                    &body.dom,
                    block.node,
                    page.inner_width(),
                    &StoryTableAttributes::with_point_size(styles.table),
                )?
                .into(),
                kind => {
                    let point_size = styles.point_size(kind.tag()).unwrap_or(styles.p);
                    Story::new(
                        self_id,
                        &body.dom,
                        block.node,
                        &StoryAttributes::with_point_size(point_size),
                    )?
                    .into()
                }
            };
            stories.push(story);
        }

        let placeable: Vec<&dyn StoryContent> = stories
            .iter()
            .filter_map(PackageElement::as_story_content)
            .collect();
        let spreads = paginate(&placeable, &self.config, &mut counters)?;

        let mut package = Package::new();
        package.push(Mimetype);
        package.push(Preferences::for_page(page.width, page.height));
        for story in stories {
            package.push(story);
        }
        for spread in spreads {
            package.push(spread);
        }
        let designmap = package.designmap();
        package.push(designmap);

        Ok(package)
    }

    /// Build and serialize the package for `body_html`.
    pub fn format_body(&self, body_html: &str) -> Result<Vec<u8>> {
        let watch = Stopwatch::start();
        let package = self.build_package(body_html)?;
        let bytes = write_package(&package, self.config.compression_level)?;

        info!(
            "formatted {} stories onto {} spreads: {} bytes{}",
            package.elements().iter().filter_map(PackageElement::as_story_content).count(),
            package.spreads().count(),
            bytes.len(),
            watch.elapsed().map(|d| format!(" in {d:.2?}")).unwrap_or_default()
        );
        Ok(bytes)
    }
}

impl Formatter for IdmlFormatter {
    fn can_format(&self, format_type: &str, _article: &Article) -> bool {
        format_type == FORMAT_TYPE
    }

    fn format(&self, article: &Article, published_seq_num: &str) -> Result<FormattedItem> {
        Ok(FormattedItem {
            published_seq_num: published_seq_num.to_string(),
            encoded_item: self.format_body(&article.body_html)?,
            formatted_item: String::new(),
        })
    }

    fn export(&self, _article: &Article) -> Result<String> {
        Err(Error::UnsupportedOperation(
            "IDML packages are binary; export as a string is not available",
        ))
    }
}

/// Format `article` for `format_type`, checking capability first.
///
/// Fails with [`Error::UnsupportedFormat`] instead of producing nothing when
/// the formatter does not handle the request.
pub fn format_article<F: Formatter>(
    formatter: &F,
    format_type: &str,
    article: &Article,
    published_seq_num: &str,
) -> Result<FormattedItem> {
    if !formatter.can_format(format_type, article) {
        return Err(Error::UnsupportedFormat(format_type.to_string()));
    }
    formatter.format(article, published_seq_num)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::package::{ContentElement, ElementKind};

    #[test]
    fn test_can_format() {
        let formatter = IdmlFormatter::new();
        let article = Article::new("<p>x</p>");
        assert!(formatter.can_format("idml", &article));
        assert!(!formatter.can_format("ninjs", &article));
    }

    #[test]
    fn test_unsupported_format_type_is_rejected() {
        let err = format_article(&IdmlFormatter::new(), "nitf", &Article::new("<p>x</p>"), "1")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
        assert!(err.to_string().contains("nitf"));
    }

    #[test]
    fn test_export_is_unsupported() {
        let err = IdmlFormatter::new().export(&Article::new("<p>x</p>")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    }

    #[test]
    fn test_sequence_number_passes_through() {
        let item = IdmlFormatter::new()
            .format(&Article::new("<p>hello</p>"), "1000")
            .unwrap();
        assert_eq!(item.published_seq_num, "1000");
        assert_eq!(item.formatted_item, "");
        assert_eq!(&item.encoded_item[..2], b"PK");
    }

    #[test]
    fn test_package_order() {
        let package = IdmlFormatter::new()
            .build_package("<h1>T</h1><table><tr><td>a</td></tr></table><p>x</p>")
            .unwrap();
        let kinds: Vec<_> = package.elements().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ElementKind::Mimetype,
                ElementKind::Preferences,
                ElementKind::Story,
                ElementKind::StoryTable,
                ElementKind::Story,
                ElementKind::Spread,
                ElementKind::Designmap,
            ]
        );
    }

    #[test]
    fn test_heading_point_size_is_applied() {
        let package = IdmlFormatter::new().build_package("<h2>Sub</h2>").unwrap();
        let story = package.of_kind(ElementKind::Story).next().unwrap();
        assert!(story.render().unwrap().contains("PointSize=\"20\""));
    }

    #[test]
    fn test_invalid_config_aborts() {
        let mut config = FormatterConfig::default();
        config.styles.h1 = 0.0;
        let err = IdmlFormatter::new()
            .with_config(config)
            .format_body("<p>x</p>")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_malformed_table_aborts_before_layout() {
        let err = IdmlFormatter::new()
            .format_body("<table><tr><td>1</td><td>2</td></tr><tr><td>3</td></tr></table>")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }
}
