//! nuspec - Read and write NuGet package manifests
//!
//! Parses `.nuspec` XML from a file, a byte buffer or a stream into a
//! [`Manifest`], and writes it back in the compact form produced by the
//! NuGet tooling (two-space indentation, `<tag />` for empty elements).
//!
//! ```
//! use nuspec::Manifest;
//!
//! let mut manifest = Manifest::new();
//! manifest.metadata.id = "Contoso.Utility".to_string();
//! manifest.metadata.version = "1.0.0".to_string();
//! manifest.add_dependency("Newtonsoft.Json", "13.0.1");
//!
//! let bytes = manifest.to_bytes()?;
//! assert_eq!(Manifest::from_bytes(&bytes)?, manifest);
//! # Ok::<(), nuspec::NuspecError>(())
//! ```
//!
//! # Architecture
//!
//! - **manifest**: data model, reader and writer
//! - **config**: codec options shared by reader and writer
//! - **logging**: tracing subscriber setup for binaries

pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;

// Re-exports
pub use config::Config;
pub use error::{NuspecError, Result};
pub use manifest::{Dependency, FileEntry, License, Manifest, Metadata, NUSPEC_NAMESPACE};
