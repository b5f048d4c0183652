//! In-memory model of a `.nuspec` document

/// Namespace declared on the root element of newly created manifests
pub const NUSPEC_NAMESPACE: &str = "http://schemas.microsoft.com/packaging/2010/07/nuspec.xsd";

/// A parsed or to-be-written `.nuspec` manifest (`<package>`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Value of the root `xmlns` attribute; omitted on output when empty
    pub xmlns: String,

    /// Package identity and descriptive metadata (`<metadata>`)
    pub metadata: Metadata,

    /// File layout of the package (`<files>`)
    pub files: Vec<FileEntry>,
}

/// Package identity and descriptive metadata
///
/// Field order is serialization order. Empty optional strings are left out
/// of the written document; `id`, `version`, `authors`, `description`,
/// `require_license_acceptance` and `dependencies` are always written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Package id, e.g. "Contoso.Utility" (`<id>`)
    pub id: String,

    /// Package version (`<version>`)
    pub version: String,

    /// Human-friendly title (`<title>`)
    pub title: String,

    /// Comma-separated list of authors (`<authors>`)
    pub authors: String,

    /// Comma-separated list of owners on the package feed (`<owners>`)
    pub owners: String,

    /// URL of the license (`<licenseUrl>`)
    pub license_url: String,

    /// Structured license declaration (`<license type="...">`)
    pub license: Option<License>,

    /// Project home page (`<projectUrl>`)
    pub project_url: String,

    /// URL of the package icon (`<iconUrl>`)
    pub icon_url: String,

    /// Whether consumers must accept the license before installing (`<requireLicenseAcceptance>`)
    pub require_license_acceptance: bool,

    /// Long description (`<description>`)
    pub description: String,

    /// Notes for this release (`<releaseNotes>`)
    pub release_notes: String,

    /// Copyright notice (`<copyright>`)
    pub copyright: String,

    /// Short description (`<summary>`)
    pub summary: String,

    /// Locale of the package, e.g. "en-US" (`<language>`)
    pub language: String,

    /// Space-separated search tags (`<tags>`)
    pub tags: String,

    /// Packages this package depends on (`<dependencies>`)
    pub dependencies: Vec<Dependency>,
}

/// Structured `<license type="...">` declaration
///
/// Newer manifests use this in place of (or next to) `licenseUrl`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct License {
    /// License type, usually `expression` or `file`
    pub kind: String,

    /// SPDX expression or path to the license file inside the package
    pub text: String,
}

/// A dependency on another package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependency {
    /// Package id of the dependency
    pub id: String,

    /// Version range, e.g. "1.2.3" or "[1.0,2.0)"
    pub version: String,
}

/// A source-to-target mapping for files placed in the package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileEntry {
    /// Path or glob relative to the package root (`src` attribute)
    pub source: String,

    /// Destination path inside the package (`target` attribute)
    pub target: String,
}

impl Manifest {
    /// Create a blank manifest carrying the nuspec namespace
    pub fn new() -> Self {
        Self {
            xmlns: NUSPEC_NAMESPACE.to_string(),
            ..Self::default()
        }
    }

    /// Append a dependency
    pub fn add_dependency(&mut self, id: impl Into<String>, version: impl Into<String>) -> &mut Self {
        self.metadata.dependencies.push(Dependency::new(id, version));
        self
    }

    /// Append a file entry
    pub fn add_file(&mut self, source: impl Into<String>, target: impl Into<String>) -> &mut Self {
        self.files.push(FileEntry::new(source, target));
        self
    }

    /// Get the first dependency with the given id
    pub fn dependency(&self, id: &str) -> Option<&Dependency> {
        self.metadata.dependencies.iter().find(|d| d.id == id)
    }
}

impl License {
    /// An SPDX license expression, e.g. "MIT OR Apache-2.0"
    pub fn expression(text: impl Into<String>) -> Self {
        Self {
            kind: "expression".to_string(),
            text: text.into(),
        }
    }

    /// A license file shipped inside the package
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            kind: "file".to_string(),
            text: path.into(),
        }
    }
}

impl Dependency {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }
}

impl FileEntry {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}
