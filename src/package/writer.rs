//! Zip serialization of a [`Package`].

use std::io::{Cursor, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::{Error, Result};

use super::{ContentElement, ElementKind, Package};

/// Writes package parts into a zip archive.
///
/// `mimetype` is always stored; other parts are stored too unless a deflate
/// level is configured. Timestamps are pinned so identical input produces
/// identical bytes.
///
/// Dropping the writer without calling [`PackageWriter::finish`] still closes
/// the underlying [`ZipWriter`], so a failed element never leaves the archive
/// open.
pub struct PackageWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    stored: SimpleFileOptions,
    content: SimpleFileOptions,
    written: Vec<String>,
}

impl PackageWriter<Cursor<Vec<u8>>> {
    /// Writer into an in-memory buffer.
    pub fn new(compression_level: Option<i64>) -> Self {
        Self::with_writer(Cursor::new(Vec::new()), compression_level)
    }

    /// Close the archive and return its bytes.
    pub fn finish_bytes(self) -> Result<Vec<u8>> {
        Ok(self.finish()?.into_inner())
    }
}

impl<W: Write + Seek> PackageWriter<W> {
    pub fn with_writer(writer: W, compression_level: Option<i64>) -> Self {
        let stored = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .last_modified_time(DateTime::default());
        let content = match compression_level {
            Some(level) => SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(level))
                .last_modified_time(DateTime::default()),
            None => stored,
        };

        Self {
            zip: ZipWriter::new(writer),
            stored,
            content,
            written: Vec::new(),
        }
    }

    /// Render `element` and add it under its filename.
    ///
    /// The mimetype must be the first entry of the archive.
    pub fn add_element(&mut self, element: &dyn ContentElement) -> Result<()> {
        let is_mimetype = element.kind() == ElementKind::Mimetype;
        if is_mimetype != self.written.is_empty() {
            return Err(Error::malformed(format!(
                "{} cannot be entry {} of the package; mimetype goes first",
                element.filename(),
                self.written.len()
            )));
        }

        let body = element.render()?;
        let options = if is_mimetype { self.stored } else { self.content };
        self.add_file(&element.filename(), body.as_bytes(), options)
    }

    fn add_file(&mut self, path: &str, content: &[u8], options: SimpleFileOptions) -> Result<()> {
        self.zip.start_file(path, options)?;
        self.zip.write_all(content)?;
        self.written.push(path.to_string());
        Ok(())
    }

    /// Entry names written so far, in archive order.
    pub fn written(&self) -> &[String] {
        &self.written
    }

    /// Write the central directory and hand back the underlying writer.
    pub fn finish(self) -> Result<W> {
        Ok(self.zip.finish()?)
    }
}

/// Serialize every element of `package`: mimetype first, the designmap last
/// and everything else in package order between them.
pub fn write_package(package: &Package, compression_level: Option<i64>) -> Result<Vec<u8>> {
    let mut writer = PackageWriter::new(compression_level);

    let elements = package.elements();
    let ordered = elements
        .iter()
        .filter(|e| e.kind() == ElementKind::Mimetype)
        .chain(elements.iter().filter(|e| {
            !matches!(e.kind(), ElementKind::Mimetype | ElementKind::Designmap)
        }))
        .chain(elements.iter().filter(|e| e.kind() == ElementKind::Designmap));

    for element in ordered {
        writer.add_element(element)?;
    }

    log::debug!("wrote {} package entries", writer.written().len());
    writer.finish_bytes()
}
