//! NuGet package manifest (`.nuspec`) model, reader and writer
//!
//! # Example Manifest
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <package xmlns="http://schemas.microsoft.com/packaging/2010/07/nuspec.xsd">
//!   <metadata>
//!     <id>Contoso.Utility</id>
//!     <version>1.4.0</version>
//!     <authors>Contoso</authors>
//!     <requireLicenseAcceptance>false</requireLicenseAcceptance>
//!     <description>Helpers</description>
//!     <dependencies>
//!       <dependency id="Newtonsoft.Json" version="13.0.1" />
//!     </dependencies>
//!   </metadata>
//!   <files>
//!     <file src="bin/Release/*.dll" target="lib/net45" />
//!   </files>
//! </package>
//! ```
//!
//! Decoding is strict about the document itself (well-formed XML with a
//! `<package>` root) and lenient about content: unknown elements and
//! attributes are skipped and missing fields keep their zero values.

mod model;
mod reader;
mod writer;

pub use model::{Dependency, FileEntry, License, Manifest, Metadata, NUSPEC_NAMESPACE};
pub use writer::{self_close, XML_DECLARATION};
