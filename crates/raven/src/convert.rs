//! Single-file conversion between binary and text forms.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;
use raven_text::Layout;
use raven_xmlb::{Node, XmlbDecoder, XmlbEncoder};
use tempfile::NamedTempFile;

use crate::{Error, Result};

/// On-disk form of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// XMLB binary.
    Binary,
    /// JSON text.
    Json,
    /// XML text.
    Xml,
}

impl Format {
    /// File extensions used for XMLB binaries, including the
    /// language-specific string tables.
    pub const BINARY_EXTENSIONS: &'static [&'static str] = &["xmlb", "engb", "freb", "gerb", "itab"];

    /// Detect a format from a path's extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            ext if Self::BINARY_EXTENSIONS.contains(&ext) => Some(Self::Binary),
            _ => None,
        }
    }

    /// Text format for a path: XML for `.xml`, JSON for anything else.
    pub fn text_from_path(path: &Path) -> Self {
        match Self::from_path(path) {
            Some(Self::Xml) => Self::Xml,
            _ => Self::Json,
        }
    }
}

/// Conversion direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Text to binary.
    Compile,
    /// Binary to text.
    Decompile,
}

impl Direction {
    /// Source and target formats for converting `input` into `output`.
    pub fn formats(self, input: &Path, output: &Path) -> (Format, Format) {
        match self {
            Self::Compile => (Format::text_from_path(input), Format::Binary),
            Self::Decompile => (Format::Binary, Format::text_from_path(output)),
        }
    }
}

/// Options for writing converted files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// Layout of written text files.
    pub layout: Layout,
}

/// Read and parse a tree from a file in the given format.
pub fn read_tree(path: &Path, format: Format) -> Result<Node> {
    let data = fs::read(path).map_err(Error::io(path))?;

    match format {
        Format::Binary => XmlbDecoder::new(&data)
            .and_then(|decoder| decoder.decode())
            .map_err(Error::xmlb(path)),
        Format::Json => raven_text::json::from_slice(&data).map_err(Error::text(path)),
        Format::Xml => raven_text::xml::from_slice(&data).map_err(Error::text(path)),
    }
}

/// Write a tree to a file in the given format.
///
/// Parent directories are created as needed. The file is written to a
/// temporary sibling and renamed into place, so a failed conversion never
/// leaves a partial file behind.
pub fn write_tree(node: &Node, path: &Path, format: Format, options: &ConvertOptions) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(Error::io(dir))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(Error::io(dir))?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        match format {
            Format::Binary => XmlbEncoder::new(node)
                .write_to(&mut writer)
                .map_err(Error::xmlb(path))?,
            Format::Json => raven_text::json::to_writer(node, &mut writer, options.layout)
                .map_err(Error::text(path))?,
            Format::Xml => raven_text::xml::to_writer(node, &mut writer, options.layout)
                .map_err(Error::text(path))?,
        }
        writer.flush().map_err(Error::io(path))?;
    }

    temp.persist(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// Convert one file.
///
/// Compiling reads JSON, or XML when `input` ends in `.xml`, and writes
/// XMLB. Decompiling reads XMLB and writes XML when `output` ends in
/// `.xml`, JSON otherwise.
pub fn convert_file(
    input: &Path,
    output: &Path,
    direction: Direction,
    options: &ConvertOptions,
) -> Result<()> {
    let (source, target) = direction.formats(input, output);
    debug!(
        "{} ({:?}) -> {} ({:?})",
        input.display(),
        source,
        output.display(),
        target
    );

    let node = read_tree(input, source)?;
    debug!(
        "{}: {} elements, depth {}",
        input.display(),
        node.element_count(),
        node.depth()
    );
    write_tree(&node, output, target, options)
}
