//! nuspec - NuGet package manifest tool
//!
//! Main entry point for the nuspec CLI.

use clap::{Parser, Subcommand};
use nuspec::{Config, Manifest, NuspecError};
use std::io::Write;
use std::path::PathBuf;
use std::process;

/// nuspec - Create, inspect and format NuGet package manifests
#[derive(Parser, Debug)]
#[command(name = "nuspec")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a YAML codec config file
    #[arg(short, long, env = "NUSPEC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new manifest
    New {
        /// Package id (e.g., Contoso.Utility)
        id: String,

        /// Package version
        #[arg(default_value = "1.0.0")]
        version: String,

        /// Package authors
        #[arg(short, long, default_value = "")]
        authors: String,

        /// Package description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the contents of a manifest
    Show {
        /// Path to the .nuspec file
        path: PathBuf,
    },

    /// Check that manifests can be read
    Check {
        /// Paths to .nuspec files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Rewrite a manifest in canonical form
    Fmt {
        /// Path to the .nuspec file
        path: PathBuf,

        /// Write the result back to the file instead of stdout
        #[arg(short, long)]
        write: bool,
    },
}

fn main() {
    if let Err(e) = nuspec::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> nuspec::Result<()> {
    let config = match cli.config {
        Some(ref path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::New {
            id,
            version,
            authors,
            description,
            output,
        } => {
            let mut manifest = Manifest::new();
            manifest.metadata.id = id;
            manifest.metadata.version = version;
            manifest.metadata.authors = authors;
            manifest.metadata.description = description;

            match output {
                Some(path) => {
                    manifest.to_file_with(&path, &config)?;
                    println!("Created {}", path.display());
                }
                None => write_stdout(&manifest.to_bytes_with(&config)?)?,
            }
        }
        Commands::Show { path } => {
            let manifest = Manifest::from_file_with(&path, &config)?;
            print_manifest(&manifest);
        }
        Commands::Check { paths } => {
            let mut failed = 0;
            for path in &paths {
                match Manifest::from_file_with(path, &config) {
                    Ok(manifest) => println!(
                        "ok    {} ({} {})",
                        path.display(),
                        manifest.metadata.id,
                        manifest.metadata.version
                    ),
                    Err(e) => {
                        failed += 1;
                        println!("error {}: {}", path.display(), e);
                    }
                }
            }
            check_summary(failed, paths.len())?;
        }
        Commands::Fmt { path, write } => {
            let manifest = Manifest::from_file_with(&path, &config)?;
            if write {
                manifest.to_file_with(&path, &config)?;
                tracing::info!(path = %path.display(), "Formatted manifest");
            } else {
                write_stdout(&manifest.to_bytes_with(&config)?)?;
            }
        }
    }

    Ok(())
}

/// Fail the run when any checked manifest failed, whatever the cause
fn check_summary(failed: usize, total: usize) -> nuspec::Result<()> {
    if failed > 0 {
        return Err(NuspecError::Other(format!(
            "{} of {} manifests failed to load",
            failed, total
        )));
    }
    Ok(())
}

fn write_stdout(bytes: &[u8]) -> nuspec::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn print_manifest(manifest: &Manifest) {
    let meta = &manifest.metadata;

    println!("{} {}", meta.id, meta.version);
    if !meta.title.is_empty() {
        println!("  Title:       {}", meta.title);
    }
    println!("  Authors:     {}", meta.authors);
    if !meta.owners.is_empty() {
        println!("  Owners:      {}", meta.owners);
    }
    if let Some(ref license) = meta.license {
        println!("  License:     {} ({})", license.text, license.kind);
    }
    if !meta.license_url.is_empty() {
        println!("  License URL: {}", meta.license_url);
    }
    if !meta.project_url.is_empty() {
        println!("  Project URL: {}", meta.project_url);
    }
    if meta.require_license_acceptance {
        println!("  Requires license acceptance");
    }
    if !meta.description.is_empty() {
        println!("  Description: {}", meta.description);
    }
    if !meta.tags.is_empty() {
        println!("  Tags:        {}", meta.tags);
    }

    println!();
    println!("Dependencies ({}):", meta.dependencies.len());
    for dep in &meta.dependencies {
        println!("  {} {}", dep.id, dep.version);
    }

    println!();
    println!("Files ({}):", manifest.files.len());
    for file in &manifest.files {
        if file.target.is_empty() {
            println!("  {}", file.source);
        } else {
            println!("  {} -> {}", file.source, file.target);
        }
    }
}
