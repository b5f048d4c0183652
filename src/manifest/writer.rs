//! Encoding a [`Manifest`] as `.nuspec` XML

use super::model::{Manifest, Metadata};
use crate::{Config, NuspecError, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

/// Declaration written ahead of every encoded manifest
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

impl Manifest {
    /// Encode the manifest as XML bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_with(&Config::default())
    }

    /// Encode the manifest as XML bytes using the given configuration
    pub fn to_bytes_with(&self, config: &Config) -> Result<Vec<u8>> {
        config.validate()?;
        let body = Encoder::new(config).encode(self)?;
        let body = if config.self_close {
            self_close(&body)
        } else {
            body
        };

        let mut out = Vec::with_capacity(XML_DECLARATION.len() + body.len());
        out.extend_from_slice(XML_DECLARATION.as_bytes());
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// Encode the manifest into a writer
    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes()?)?;
        Ok(())
    }

    /// Write the manifest to a file, creating parent directories as needed
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_file_with(path, &Config::default())
    }

    /// Write the manifest to a file using the given configuration
    pub fn to_file_with(&self, path: impl AsRef<Path>, config: &Config) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let bytes = self.to_bytes_with(config)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Writing manifest");
        std::fs::write(path, bytes)?;

        Ok(())
    }
}

/// Rewrite every `<tag ...></tag>` pair with nothing between the tags as `<tag ... />`
///
/// Runs as one left-to-right pass: a closing tag collapses only into the
/// opening tag written immediately before it, and only when the names
/// match. Comments and CDATA sections are copied untouched. The output is a
/// fixed point, so applying this twice gives the same bytes as once.
pub fn self_close(xml: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(xml.len());
    // Position of the last written opening tag's '>' and its name, while
    // nothing has been written after it
    let mut pending: Option<(usize, &[u8])> = None;
    let mut pos = 0;

    while pos < xml.len() {
        if xml[pos] != b'<' {
            out.push(xml[pos]);
            pending = None;
            pos += 1;
            continue;
        }

        let end = match markup_end(xml, pos) {
            Some(end) => end,
            None => {
                out.extend_from_slice(&xml[pos..]);
                break;
            }
        };
        let tag = &xml[pos..end];

        if let Some(name) = closing_name(tag) {
            if let Some((gt, open)) = pending.take() {
                if open == name {
                    out.truncate(gt);
                    while out.last().is_some_and(|b| b.is_ascii_whitespace()) {
                        out.pop();
                    }
                    out.extend_from_slice(b" />");
                    pos = end;
                    continue;
                }
            }
            out.extend_from_slice(tag);
        } else {
            out.extend_from_slice(tag);
            pending = opening_name(tag).map(|name| (out.len() - 1, name));
        }
        pos = end;
    }

    out
}

/// Index one past the end of the markup starting at `start`
fn markup_end(xml: &[u8], start: usize) -> Option<usize> {
    let rest = &xml[start..];
    let sections: [(&[u8], &[u8]); 2] = [(b"<!--", b"-->"), (b"<![CDATA[", b"]]>")];
    for (open, close) in sections {
        if rest.starts_with(open) {
            return find(&rest[open.len()..], close).map(|i| start + open.len() + i + close.len());
        }
    }

    let mut quote = None;
    for (i, &b) in rest.iter().enumerate().skip(1) {
        match (quote, b) {
            (None, b'"' | b'\'') => quote = Some(b),
            (Some(q), _) if q == b => quote = None,
            (None, b'>') => return Some(start + i + 1),
            _ => {}
        }
    }
    None
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn closing_name(tag: &[u8]) -> Option<&[u8]> {
    let inner = tag.strip_prefix(b"</")?.strip_suffix(b">")?;
    Some(inner.trim_ascii())
}

fn opening_name(tag: &[u8]) -> Option<&[u8]> {
    if tag.starts_with(b"<?") || tag.starts_with(b"<!") || tag.ends_with(b"/>") {
        return None;
    }
    let inner = tag.strip_prefix(b"<")?.strip_suffix(b">")?;
    let len = inner
        .iter()
        .position(|b| b.is_ascii_whitespace() || *b == b'/')
        .unwrap_or(inner.len());
    (len > 0).then(|| &inner[..len])
}

/// Replace characters XML 1.0 does not allow with U+FFFD
fn xml_chars(value: &str) -> Cow<'_, str> {
    if value.chars().all(is_xml_char) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .chars()
            .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
            .collect(),
    )
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Streams a manifest through a quick-xml writer in schema order
///
/// Elements without children are written as `<tag></tag>`; collapsing them
/// is left to [`self_close`].
struct Encoder<'c> {
    config: &'c Config,
    writer: Writer<Vec<u8>>,
}

impl<'c> Encoder<'c> {
    fn new(config: &'c Config) -> Self {
        let writer = if config.indent > 0 {
            Writer::new_with_indent(Vec::new(), b' ', config.indent)
        } else {
            Writer::new(Vec::new())
        };
        Self { config, writer }
    }

    fn encode(mut self, manifest: &Manifest) -> Result<Vec<u8>> {
        let mut root = BytesStart::new("package");
        if !manifest.xmlns.is_empty() {
            root.push_attribute(("xmlns", &*xml_chars(&manifest.xmlns)));
        }
        self.open(root)?;

        self.metadata(&manifest.metadata)?;

        self.open(BytesStart::new("files"))?;
        for file in &manifest.files {
            let mut element = BytesStart::new("file");
            element.push_attribute(("src", &*xml_chars(&file.source)));
            element.push_attribute(("target", &*xml_chars(&file.target)));
            self.text_element(element, "")?;
        }
        self.close("files", manifest.files.is_empty())?;

        self.close("package", false)?;

        tracing::trace!(
            id = %manifest.metadata.id,
            dependencies = manifest.metadata.dependencies.len(),
            files = manifest.files.len(),
            "Encoded manifest"
        );

        Ok(self.writer.into_inner())
    }

    fn metadata(&mut self, metadata: &Metadata) -> Result<()> {
        let config = self.config;

        self.open(BytesStart::new("metadata"))?;
        self.field("id", &metadata.id)?;
        self.field("version", &metadata.version)?;
        self.optional_field("title", &metadata.title)?;
        self.field("authors", &metadata.authors)?;
        self.optional_field("owners", &metadata.owners)?;
        self.optional_field("licenseUrl", &metadata.license_url)?;
        if let Some(license) = &metadata.license {
            let mut element = BytesStart::new("license");
            element.push_attribute(("type", &*xml_chars(&license.kind)));
            self.text_element(element, &license.text)?;
        }
        self.optional_field("projectUrl", &metadata.project_url)?;
        self.optional_field("iconUrl", &metadata.icon_url)?;
        self.field(
            "requireLicenseAcceptance",
            if metadata.require_license_acceptance {
                "true"
            } else {
                "false"
            },
        )?;
        self.field("description", &metadata.description)?;
        self.optional_field("releaseNotes", &metadata.release_notes)?;
        self.optional_field("copyright", &metadata.copyright)?;
        self.optional_field("summary", &metadata.summary)?;
        self.optional_field("language", &metadata.language)?;
        self.optional_field("tags", &metadata.tags)?;

        self.open(BytesStart::new("dependencies"))?;
        for dependency in &metadata.dependencies {
            let mut element = BytesStart::new(config.dependency_element.as_str());
            element.push_attribute(("id", &*xml_chars(&dependency.id)));
            element.push_attribute(("version", &*xml_chars(&dependency.version)));
            self.text_element(element, "")?;
        }
        self.close("dependencies", metadata.dependencies.is_empty())?;

        self.close("metadata", false)
    }

    fn field(&mut self, name: &str, value: &str) -> Result<()> {
        self.text_element(BytesStart::new(name), value)
    }

    fn optional_field(&mut self, name: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        self.field(name, value)
    }

    /// Write `<name attrs>text</name>` on one line
    fn text_element(&mut self, start: BytesStart, text: &str) -> Result<()> {
        let end = BytesEnd::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
        self.write(Event::Start(start))?;
        self.write(Event::Text(BytesText::new(&xml_chars(text))))?;
        self.write(Event::End(end))
    }

    fn open(&mut self, start: BytesStart) -> Result<()> {
        self.write(Event::Start(start))
    }

    /// Close a container; an empty one keeps its closing tag on the same line
    fn close(&mut self, name: &str, empty: bool) -> Result<()> {
        if empty {
            self.write(Event::Text(BytesText::new("")))?;
        }
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn write(&mut self, event: Event) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| NuspecError::Encode(e.to_string()))
    }
}
