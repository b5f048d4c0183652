//! Integration tests for nuspec
//!
//! These tests exercise the public API end to end: files on disk, streams,
//! and encode/decode round trips.

use nuspec::{Config, License, Manifest, NuspecError, NUSPEC_NAMESPACE};
use std::fs;
use tempfile::TempDir;

/// Helper to create a manifest with every field populated
fn create_full_manifest() -> Manifest {
    let mut manifest = Manifest::new();
    let meta = &mut manifest.metadata;
    meta.id = "Contoso.Utility".to_string();
    meta.version = "2.1.0-rc.1".to_string();
    meta.title = "Contoso Utility".to_string();
    meta.authors = "Contoso, Ltd.".to_string();
    meta.owners = "contoso".to_string();
    meta.license_url = "https://licenses.nuget.org/MIT".to_string();
    meta.license = Some(License::expression("MIT"));
    meta.project_url = "https://example.com/utility".to_string();
    meta.icon_url = "https://example.com/icon.png".to_string();
    meta.require_license_acceptance = true;
    meta.description = "Helpers for <Contoso> & friends".to_string();
    meta.release_notes = "First line\nSecond line".to_string();
    meta.copyright = "Copyright (c) Contoso".to_string();
    meta.summary = "Helpers".to_string();
    meta.language = "en-US".to_string();
    meta.tags = "utility helpers".to_string();

    manifest
        .add_dependency("PackageA", "1.2.3")
        .add_dependency("PackageB", "[2.0,3.0)")
        .add_file(r"bin\Release\Contoso.Utility.dll", r"lib\net45")
        .add_file("content/**/*.txt", "content");
    manifest
}

mod round_trip_tests {
    use super::*;

    #[test]
    fn test_full_manifest_round_trip() {
        let manifest = create_full_manifest();
        let bytes = manifest.to_bytes().unwrap();
        let decoded = Manifest::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, manifest);
    }

    #[test]
    fn test_blank_manifest_round_trip() {
        let manifest = Manifest::new();
        let decoded = Manifest::from_bytes(&manifest.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, manifest);
    }

    #[test]
    fn test_round_trip_without_namespace_or_indent() {
        let config = Config {
            indent: 0,
            ..Config::default()
        };
        let mut manifest = create_full_manifest();
        manifest.xmlns.clear();

        let bytes = manifest.to_bytes_with(&config).unwrap();
        assert!(!String::from_utf8_lossy(&bytes).contains("xmlns"));
        assert_eq!(Manifest::from_bytes_with(&bytes, &config).unwrap(), manifest);
    }

    #[test]
    fn test_reencoding_is_stable() {
        let first = create_full_manifest().to_bytes().unwrap();
        let second = Manifest::from_bytes(&first).unwrap().to_bytes().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_license_text_round_trip() {
        let mut manifest = Manifest::new();
        manifest.metadata.license = Some(License::file(""));

        let bytes = manifest.to_bytes().unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("<license type=\"file\" />"));
        assert_eq!(Manifest::from_bytes(&bytes).unwrap(), manifest);
    }
}

mod output_format_tests {
    use super::*;

    #[test]
    fn test_dependency_attribute_mapping() {
        let mut manifest = Manifest::new();
        manifest.add_dependency("PackageA", "1.2.3");

        let output = String::from_utf8(manifest.to_bytes().unwrap()).unwrap();
        assert!(output.contains("<dependency id=\"PackageA\" version=\"1.2.3\" />"));
    }

    #[test]
    fn test_empty_lists_all_self_close() {
        let output = String::from_utf8(Manifest::new().to_bytes().unwrap()).unwrap();
        assert!(output.contains("<dependencies />"));
        assert!(output.contains("<files />"));
        assert!(!output.contains("></"));
    }

    #[test]
    fn test_declaration_comes_first() {
        let output = String::from_utf8(create_full_manifest().to_bytes().unwrap()).unwrap();
        assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<package "));
        assert!(output.contains(&format!("xmlns=\"{}\"", NUSPEC_NAMESPACE)));
    }

    #[test]
    fn test_self_close_idempotent_on_encoded_output() {
        let bytes = create_full_manifest().to_bytes().unwrap();
        assert_eq!(nuspec::manifest::self_close(&bytes), bytes);
    }
}

mod file_tests {
    use super::*;

    #[test]
    fn test_to_file_and_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pkg").join("Contoso.Utility.nuspec");

        let manifest = create_full_manifest();
        manifest.to_file(&path).unwrap();

        assert_eq!(fs::read(&path).unwrap(), manifest.to_bytes().unwrap());
        assert_eq!(Manifest::from_file(&path).unwrap(), manifest);
    }

    #[test]
    fn test_from_file_not_found() {
        let err = Manifest::from_file("/nonexistent/file.xml").unwrap_err();
        assert!(matches!(err, NuspecError::Io(_)));
    }

    #[test]
    fn test_from_file_with_garbage_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.nuspec");
        fs::write(&path, "not xml").unwrap();

        let err = Manifest::from_file(&path).unwrap_err();
        assert!(matches!(err, NuspecError::Parse(_)));
    }

    #[test]
    fn test_from_file_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = Manifest::from_file(temp_dir.path()).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_from_reader_file_handle() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Contoso.Utility.nuspec");
        create_full_manifest().to_file(&path).unwrap();

        let file = fs::File::open(&path).unwrap();
        let manifest = Manifest::from_reader(file).unwrap();
        assert_eq!(manifest.metadata.id, "Contoso.Utility");
    }

    #[test]
    fn test_config_file_drives_codec() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nuspec.yaml");
        fs::write(&config_path, "indent: 4\nself_close: false\n").unwrap();

        let config = Config::load(&config_path).unwrap();
        let output = String::from_utf8(Manifest::new().to_bytes_with(&config).unwrap()).unwrap();

        assert!(output.contains("\n    <metadata>\n        <id></id>\n"));
        assert!(output.contains("<files></files>"));
    }
}

mod decode_tests {
    use super::*;

    #[test]
    fn test_decode_reference_tool_output() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd">
  <metadata minClientVersion="3.3">
    <id>Serilog</id>
    <version>2.10.0</version>
    <authors>Serilog Contributors</authors>
    <license type="expression">Apache-2.0</license>
    <licenseUrl>https://licenses.nuget.org/Apache-2.0</licenseUrl>
    <icon>images\icon.png</icon>
    <projectUrl>https://serilog.net/</projectUrl>
    <description>Simple .NET logging with fully-structured events</description>
    <tags>serilog logging semantic structured</tags>
    <repository type="git" url="https://github.com/serilog/serilog.git" />
    <dependencies>
      <dependency id="System.Diagnostics.DiagnosticSource" version="4.7.1" exclude="Build,Analyzers" />
    </dependencies>
  </metadata>
</package>"#;

        let manifest = Manifest::from_bytes(xml.as_bytes()).unwrap();
        let meta = &manifest.metadata;

        assert_eq!(
            manifest.xmlns,
            "http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd"
        );
        assert_eq!(meta.id, "Serilog");
        assert_eq!(meta.license, Some(License::expression("Apache-2.0")));
        assert_eq!(meta.license_url, "https://licenses.nuget.org/Apache-2.0");
        assert!(!meta.require_license_acceptance);
        assert_eq!(meta.dependencies.len(), 1);
        assert_eq!(meta.dependencies[0].version, "4.7.1");
        assert!(manifest.files.is_empty());
    }

    #[test]
    fn test_failed_decode_returns_no_manifest() {
        let result = Manifest::from_bytes(b"not xml");
        assert!(matches!(result, Err(NuspecError::Parse(_))));
    }
}
