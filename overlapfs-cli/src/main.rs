//! overlapfs CLI - Browse several directories or ZIP archives as one tree.
//!
//! Usage:
//!   overlapfs -l <layer> [-l <layer>...] [--root DIR] <command>
//!
//! Layers are listed lowest precedence first; each later layer shadows the
//! ones before it.
//!
//! Examples:
//!   overlapfs -l assets.zip -l ./local ls              # Merged root listing
//!   overlapfs -l assets.zip -l ./local cat hello.txt   # Read from the top-most layer that has it
//!   overlapfs -l assets.zip -l ./local glob 'docs/*.md'
//!   overlapfs -l base -l patch --root site stat index.html --json

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use overlapfs_core::{read_file, DirFs, DirEntry, OverlapFs, ReadFs, SubFs, ZipFs};

/// Overlay filesystem CLI
#[derive(Parser, Debug)]
#[command(name = "overlapfs")]
#[command(about = "Inspect layered directories and ZIP archives as one tree")]
struct Args {
    /// Directories or .zip archives, lowest precedence first
    #[arg(short, long = "layer", required = true)]
    layers: Vec<PathBuf>,

    /// Only expose this sub-directory of the merged tree
    #[arg(long)]
    root: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a file
    Cat { path: String },

    /// Show file metadata
    Stat {
        path: String,
        #[arg(long)]
        json: bool,
    },

    /// List a directory
    Ls {
        #[arg(default_value = ".")]
        path: String,
        #[arg(long)]
        json: bool,
    },

    /// List paths matching a pattern
    Glob { pattern: String },
}

type Layer = Box<dyn ReadFs>;

/// Open one layer: directories are read from disk, .zip files are extracted.
fn open_layer(path: &Path) -> Result<Layer, Box<dyn std::error::Error>> {
    if path.is_dir() {
        let fs = DirFs::new(path);
        debug!(layer = %fs.root().display(), "directory layer");
        return Ok(Box::new(fs));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_uppercase();

    if ext == "ZIP" {
        let fs = ZipFs::from_path(path)?;
        if fs.is_empty() {
            warn!(layer = %path.display(), "zip layer contains no files");
        }
        debug!(layer = %path.display(), files = fs.len(), "zip layer");
        Ok(Box::new(fs))
    } else {
        Err(format!("Unknown layer type: {} (expected directory or .zip)", path.display()).into())
    }
}

/// Stack layers so that each one overlays everything before it.
fn stack_layers(paths: &[PathBuf]) -> Result<Layer, Box<dyn std::error::Error>> {
    let mut layers = paths.iter().map(|p| open_layer(p));
    let mut fs = layers.next().ok_or("No layers given")??;
    for layer in layers {
        fs = Box::new(OverlapFs::new(fs, layer?));
    }
    Ok(fs)
}

fn format_entry(entry: &DirEntry) -> String {
    if entry.is_dir {
        format!("{:>10}  {}/", "-", entry.name)
    } else {
        format!("{:>10}  {}", entry.size, entry.name)
    }
}

fn run(fs: &dyn ReadFs, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Cat { path } => {
            let content = read_file(fs, &path)?;
            out.write_all(&content)?;
        }
        Command::Stat { path, json } => {
            let meta = fs.stat(&path)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&meta)?)?;
            } else {
                writeln!(out, "name:  {}", meta.name)?;
                writeln!(out, "size:  {}", meta.size)?;
                writeln!(out, "type:  {}", if meta.is_dir { "directory" } else { "file" })?;
            }
        }
        Command::Ls { path, json } => {
            let entries = fs.read_dir(&path)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
            } else {
                for entry in &entries {
                    writeln!(out, "{}", format_entry(entry))?;
                }
            }
        }
        Command::Glob { pattern } => {
            for path in fs.glob(&pattern)? {
                writeln!(out, "{}", path)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let fs = match stack_layers(&args.layers) {
        Ok(fs) => fs,
        Err(e) => {
            error!("Failed to load layers: {}", e);
            return Err(e);
        }
    };

    let result = match args.root.as_deref() {
        Some(dir) => SubFs::new(&fs, dir)
            .map_err(Into::into)
            .and_then(|sub| run(&sub, args.command)),
        None => run(&fs, args.command),
    };

    if let Err(e) = &result {
        error!("{}", e);
    }
    result
}
