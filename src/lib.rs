//! # idmlpack
//!
//! Lays out an article body written in HTML as an InDesign Markup Language
//! (IDML) package: a zip archive holding one XML file per story and spread
//! plus the preferences and manifest that tie them together.
//!
//! ## Quick Start
//!
//! ```no_run
//! use idmlpack::{Article, Formatter, IdmlFormatter};
//!
//! let article = Article::new("<h1>Budget passes</h1><p>The council voted...</p>");
//! let item = IdmlFormatter::new().format(&article, "1000")?;
//! std::fs::write("budget.idml", &item.encoded_item)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Pipeline
//!
//! 1. [`dom::parse_body`] parses the body and collects paragraphs, headings
//!    and tables in document order.
//! 2. Each block becomes a [`package::Story`] or [`package::StoryTable`].
//! 3. [`layout::paginate`] estimates every block's height and stacks frames
//!    onto [`package::Spread`]s, opening a new spread when a block no longer
//!    fits.
//! 4. [`package::write_package`] zips everything with `mimetype` first and
//!    `designmap.xml` last.
//!
//! Layout is a heuristic: heights are estimated from character counts, and
//! tables get a fixed height. Output is deterministic for a given input and
//! configuration.

pub mod config;
pub mod dom;
pub mod error;
pub mod estimate;
pub mod formatter;
pub mod geometry;
pub mod layout;
pub mod package;
pub mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{FormatterConfig, TagStyles};
pub use error::{Error, ErrorKind, Result};
pub use formatter::{Article, FORMAT_TYPE, FormattedItem, Formatter, IdmlFormatter, format_article};
pub use geometry::{ItemTransform, Margins, PageGeometry};
pub use layout::{Counters, Paginator};
pub use package::{ContentElement, ElementKind, Package, PackageElement};
