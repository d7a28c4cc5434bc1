//! Compressor CLI: builds ZIP archives with adaptive BPE/DEFLATE
//! compression.
//!
//! Usage follows zip(1): `bpezip [-0|-9] [-rqvmjy] archive[.zip] file...`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;

use bpezip::{Archive, Compressor};

#[derive(Parser, Debug)]
#[command(name = "bpezip")]
#[command(version)]
#[command(about = "Compress files into ZIP archives with adaptive BPE compression", long_about = None)]
#[command(after_help = "Examples:\n  \
  bpezip archive document.txt        compress document.txt into archive.zip\n  \
  bpezip -0 backup.zip data.bin      store without compression\n  \
  bpezip -r src.zip src/             compress a directory tree\n  \
  bpezip -v -m docs.zip readme.txt   verbose, delete original after")]
struct Cli {
    /// Output archive path (.zip appended if no extension)
    #[arg(value_name = "ARCHIVE")]
    archive: String,

    /// Input files or directories
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<String>,

    /// Store only (no compression)
    #[arg(short = '0')]
    store_only: bool,

    /// Best compression (default)
    #[arg(short = '9')]
    best: bool,

    /// Recurse into directories
    #[arg(short = 'r')]
    recurse: bool,

    /// Store symlinks as links instead of following them
    #[arg(short = 'y')]
    store_symlinks: bool,

    /// Quiet operation
    #[arg(short = 'q')]
    quiet: bool,

    /// Verbose operation
    #[arg(short = 'v')]
    verbose: bool,

    /// Move into archive (delete input files after)
    #[arg(short = 'm')]
    move_inputs: bool,

    /// Junk directory names (store only the file name)
    #[arg(short = 'j')]
    junk_paths: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let archive_path = if cli.archive.ends_with(".zip") || cli.archive.ends_with(".bpz") {
        cli.archive.clone()
    } else {
        format!("{}.zip", cli.archive)
    };

    let compressor = Compressor::with_default_vocabulary();
    let mut archive = Archive::new(&compressor);
    let mut added_files: Vec<PathBuf> = Vec::new();

    for input in &cli.inputs {
        add_path(&mut archive, &cli, Path::new(input), &mut added_files)?;
    }

    if archive.is_empty() {
        bail!("nothing to do");
    }

    let bytes = archive.emit().context("building archive")?;
    fs::write(&archive_path, &bytes)
        .with_context(|| format!("cannot write '{archive_path}'"))?;

    if !cli.quiet {
        report(&bytes)?;
    }
    if cli.verbose {
        let total_in: u64 = added_files
            .iter()
            .filter_map(|p| fs::metadata(p).ok())
            .map(|m| m.len())
            .sum();
        eprintln!(
            "  {} bytes -> {} bytes ({:.1}%)",
            total_in,
            bytes.len(),
            if total_in > 0 {
                bytes.len() as f64 * 100.0 / total_in as f64
            } else {
                0.0
            }
        );
    }

    if cli.move_inputs {
        for path in &added_files {
            if let Err(err) = fs::remove_file(path) {
                eprintln!("bpezip: cannot remove '{}': {err}", path.display());
            }
        }
    }

    Ok(())
}

/// Add one path to the archive, recursing into directories with -r.
fn add_path(
    archive: &mut Archive<'_>,
    cli: &Cli,
    path: &Path,
    added_files: &mut Vec<PathBuf>,
) -> Result<()> {
    let meta = fs::symlink_metadata(path)
        .with_context(|| format!("cannot access '{}'", path.display()))?;
    let mod_time = modified_time(path);
    let stored_name = stored_name(path, cli.junk_paths);

    if meta.file_type().is_symlink() && cli.store_symlinks {
        let target = fs::read_link(path)
            .with_context(|| format!("cannot read link '{}'", path.display()))?;
        archive
            .add_symlink(&stored_name, &target.to_string_lossy(), mod_time, unix_mode(&meta))
            .context("adding symlink")?;
        return Ok(());
    }

    // Without -y, symlinks are followed; use the target's metadata.
    let meta = fs::metadata(path)
        .with_context(|| format!("cannot access '{}'", path.display()))?;
    let mode = unix_mode(&meta);

    if meta.is_dir() {
        archive
            .add_directory(&stored_name, mod_time, mode)
            .context("adding directory")?;
        if cli.recurse {
            let mut children: Vec<PathBuf> = fs::read_dir(path)
                .with_context(|| format!("cannot read directory '{}'", path.display()))?
                .filter_map(|e| e.ok().map(|e| e.path()))
                .collect();
            children.sort();
            for child in children {
                add_path(archive, cli, &child, added_files)?;
            }
        }
        return Ok(());
    }

    let data =
        fs::read(path).with_context(|| format!("cannot read '{}'", path.display()))?;

    if cli.store_only {
        archive.add_stored(&data, &stored_name, mod_time, mode)?;
    } else {
        archive.add_auto(&data, &stored_name, mod_time, mode)?;
    }
    added_files.push(path.to_path_buf());

    Ok(())
}

/// Print the per-entry adding lines from the finished archive.
fn report(bytes: &[u8]) -> Result<()> {
    for info in bpezip::list_files(bytes)? {
        if info.is_directory() {
            eprintln!("  adding: {}", info.name);
            continue;
        }
        let ratio = if info.size > 0 {
            100_i64 - (info.comp_size as i64 * 100 / info.size as i64)
        } else {
            0
        };
        eprintln!(
            "  adding: {} ({} {}%)",
            info.name,
            info.method.to_string().to_lowercase(),
            ratio.max(0)
        );
    }
    Ok(())
}

fn stored_name(path: &Path, junk_paths: bool) -> String {
    let name = if junk_paths {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string())
    } else {
        path.to_string_lossy().to_string()
    };
    // Archive names always use forward slashes.
    name.trim_start_matches("./").replace('\\', "/")
}

fn modified_time(path: &Path) -> Option<DateTime<Utc>> {
    fs::symlink_metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

#[cfg(unix)]
fn unix_mode(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    meta.mode()
}

#[cfg(not(unix))]
fn unix_mode(meta: &fs::Metadata) -> u32 {
    if meta.is_dir() {
        0o755
    } else {
        0o644
    }
}
