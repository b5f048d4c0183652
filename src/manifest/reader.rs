//! Decoding `.nuspec` XML into a [`Manifest`]

use super::model::{Dependency, FileEntry, License, Manifest, Metadata};
use crate::{Config, NuspecError, Result};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

const ROOT: &str = "package";

impl Manifest {
    /// Read a manifest from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with(path, &Config::default())
    }

    /// Read a manifest from a file using the given configuration
    pub fn from_file_with(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Reading manifest");

        let bytes = std::fs::read(path)?;
        Self::from_bytes_with(&bytes, config)
    }

    /// Read a manifest from a stream, consuming it to the end
    ///
    /// Pass `&mut reader` to keep using the stream afterwards.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with(reader, &Config::default())
    }

    /// Read a manifest from a stream using the given configuration
    pub fn from_reader_with<R: Read>(mut reader: R, config: &Config) -> Result<Self> {
        config.validate()?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes_with(&bytes, config)
    }

    /// Parse a manifest from XML bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(bytes, &Config::default())
    }

    /// Parse a manifest from XML bytes using the given configuration
    pub fn from_bytes_with(bytes: &[u8], config: &Config) -> Result<Self> {
        config.validate()?;
        let xml = std::str::from_utf8(bytes)
            .map_err(|e| NuspecError::Parse(format!("Manifest is not valid UTF-8: {}", e)))?;
        Decoder::new(config).decode(xml)
    }
}

impl FromStr for Manifest {
    type Err = NuspecError;

    fn from_str(xml: &str) -> Result<Self> {
        Decoder::new(&Config::default()).decode(xml)
    }
}

/// Event-driven decoder tracking the open element path
struct Decoder<'c> {
    config: &'c Config,
    manifest: Manifest,
    stack: Vec<String>,
    text: String,
    seen_root: bool,
}

impl<'c> Decoder<'c> {
    fn new(config: &'c Config) -> Self {
        Self {
            config,
            manifest: Manifest::default(),
            stack: Vec::new(),
            text: String::new(),
            seen_root: false,
        }
    }

    fn decode(mut self, xml: &str) -> Result<Manifest> {
        let mut reader = Reader::from_str(xml);

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => self.open(e)?,
                Ok(Event::Empty(ref e)) => {
                    // <tag/> behaves like <tag></tag>
                    self.open(e)?;
                    self.close()?;
                }
                Ok(Event::End(_)) => self.close()?,
                Ok(Event::Text(ref e)) => {
                    let raw = utf8(e)?;
                    let text = unescape(raw)
                        .map_err(|e| NuspecError::Parse(format!("Invalid text content: {}", e)))?;
                    self.push_text(&text);
                }
                Ok(Event::CData(ref e)) => {
                    let text = utf8(e)?;
                    self.push_text(text);
                }
                Ok(Event::GeneralRef(ref e)) => {
                    let entity = format!("&{};", utf8(e)?);
                    let text = unescape(&entity).map_err(|e| {
                        NuspecError::Parse(format!("Invalid entity reference {}: {}", entity, e))
                    })?;
                    self.push_text(&text);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(NuspecError::Parse(format!(
                        "Error parsing manifest XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                }
                _ => {}
            }
        }

        if let Some(open) = self.stack.last() {
            return Err(NuspecError::Parse(format!(
                "Unexpected end of document inside <{}>",
                open
            )));
        }
        if !self.seen_root {
            return Err(NuspecError::Parse(format!(
                "No <{}> root element found",
                ROOT
            )));
        }

        tracing::trace!(
            id = %self.manifest.metadata.id,
            dependencies = self.manifest.metadata.dependencies.len(),
            files = self.manifest.files.len(),
            "Decoded manifest"
        );

        Ok(self.manifest)
    }

    fn open(&mut self, e: &BytesStart) -> Result<()> {
        let name = utf8(e.local_name().as_ref())?.to_string();

        if self.stack.is_empty() {
            if name != ROOT {
                return Err(NuspecError::Parse(format!(
                    "Expected <{}> root element, found <{}>",
                    ROOT, name
                )));
            }
            if self.seen_root {
                return Err(NuspecError::Parse(
                    "Document has more than one root element".to_string(),
                ));
            }
            self.seen_root = true;
            if let Some(xmlns) = get_attr(e, b"xmlns")? {
                self.manifest.xmlns = xmlns;
            }
        } else if self.at(&[ROOT, "metadata"]) && name == "license" {
            self.manifest.metadata.license = Some(License {
                kind: get_attr(e, b"type")?.unwrap_or_default(),
                text: String::new(),
            });
        } else if self.at(&[ROOT, "metadata", "dependencies"])
            && name == self.config.dependency_element
        {
            self.manifest.metadata.dependencies.push(Dependency {
                id: get_attr(e, b"id")?.unwrap_or_default(),
                version: get_attr(e, b"version")?.unwrap_or_default(),
            });
        } else if self.at(&[ROOT, "files"]) && name == "file" {
            self.manifest.files.push(FileEntry {
                source: get_attr(e, b"src")?.unwrap_or_default(),
                target: get_attr(e, b"target")?.unwrap_or_default(),
            });
        }

        if self.stack.len() == 2 {
            self.text.clear();
        }
        self.stack.push(name);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let name = self
            .stack
            .pop()
            .ok_or_else(|| NuspecError::Parse("Unexpected closing tag".to_string()))?;

        // Only direct children of <metadata> carry text we keep
        if self.stack.len() != 2 || self.stack[1] != "metadata" {
            return Ok(());
        }

        let text = std::mem::take(&mut self.text);
        let metadata = &mut self.manifest.metadata;
        if name == "license" {
            if let Some(license) = metadata.license.as_mut() {
                license.text = text;
            }
            return Ok(());
        }
        assign_field(metadata, &name, text)
    }

    /// Whether the open element path is exactly `path`
    fn at(&self, path: &[&str]) -> bool {
        self.stack.len() == path.len()
            && self.stack.iter().zip(path).all(|(open, p)| open.as_str() == *p)
    }

    fn push_text(&mut self, text: &str) {
        if self.stack.len() == 3 && self.stack[1] == "metadata" {
            self.text.push_str(text);
        }
    }
}

fn assign_field(metadata: &mut Metadata, name: &str, text: String) -> Result<()> {
    match name {
        "id" => metadata.id = text,
        "version" => metadata.version = text,
        "title" => metadata.title = text,
        "authors" => metadata.authors = text,
        "owners" => metadata.owners = text,
        "licenseUrl" => metadata.license_url = text,
        "projectUrl" => metadata.project_url = text,
        "iconUrl" => metadata.icon_url = text,
        "requireLicenseAcceptance" => metadata.require_license_acceptance = parse_bool(&text)?,
        "description" => metadata.description = text,
        "releaseNotes" => metadata.release_notes = text,
        "copyright" => metadata.copyright = text,
        "summary" => metadata.summary = text,
        "language" => metadata.language = text,
        "tags" => metadata.tags = text,
        _ => {}
    }
    Ok(())
}

/// Parse a boolean element value; an empty element means false
fn parse_bool(value: &str) -> Result<bool> {
    match value.trim() {
        "" | "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        other => Err(NuspecError::Parse(format!(
            "Invalid boolean value for requireLicenseAcceptance: {:?}",
            other
        ))),
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| NuspecError::Parse(format!("Invalid UTF-8 in manifest: {}", e)))
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| NuspecError::Parse(format!("Invalid attribute: {}", e)))?;
        if attr.key.as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| NuspecError::Parse(format!("Invalid attribute value: {}", e)))?;
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}
