//! Extractor CLI: lists, tests and extracts ZIP archives, including the
//! proprietary BPE methods.
//!
//! Usage follows unzip(1): `bpeunzip [-lvtqonpj] [-d DIR] archive [file...]`

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use bpezip::{is_valid_format, list_files, Compressor, FileInfo};

#[derive(Parser, Debug)]
#[command(name = "bpeunzip")]
#[command(version)]
#[command(about = "Extract ZIP archives, including BPE-compressed entries", long_about = None)]
#[command(after_help = "Examples:\n  \
  bpeunzip archive.zip               extract all files\n  \
  bpeunzip -l archive.zip            list contents\n  \
  bpeunzip -t archive.zip            test archive integrity\n  \
  bpeunzip -p archive.zip f.txt      extract f.txt to stdout\n  \
  bpeunzip -d /tmp archive.zip       extract into /tmp")]
struct Cli {
    /// Archive path
    #[arg(value_name = "ARCHIVE")]
    archive: String,

    /// Names or glob patterns to extract (default: all)
    #[arg(value_name = "FILES")]
    files: Vec<String>,

    /// List files (short format)
    #[arg(short = 'l')]
    list: bool,

    /// List files (verbose format)
    #[arg(short = 'v')]
    list_verbose: bool,

    /// Test archive integrity
    #[arg(short = 't')]
    test: bool,

    /// Quiet operation
    #[arg(short = 'q')]
    quiet: bool,

    /// Overwrite files without prompting
    #[arg(short = 'o')]
    overwrite: bool,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    never_overwrite: bool,

    /// Extract to stdout (pipe)
    #[arg(short = 'p')]
    pipe: bool,

    /// Junk paths (extract into the current directory)
    #[arg(short = 'j')]
    junk_paths: bool,

    /// Extract files into DIR
    #[arg(short = 'd', value_name = "DIR")]
    dest_dir: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let data = fs::read(&cli.archive)
        .with_context(|| format!("cannot open '{}'", cli.archive))?;

    if !is_valid_format(&data) {
        bail!("'{}' is not a valid ZIP archive", cli.archive);
    }

    let entries = list_files(&data).context("reading central directory")?;

    if cli.list || cli.list_verbose {
        print_listing(&cli.archive, &entries, cli.list_verbose);
        return Ok(());
    }

    let compressor = Compressor::with_default_vocabulary();

    if cli.test {
        return test_archive(&cli, &compressor, &data, &entries);
    }

    let selected: Vec<&FileInfo> = entries
        .iter()
        .filter(|info| !info.is_directory() && matches_filters(&cli.files, &info.name))
        .collect();

    for info in selected {
        extract_entry(&cli, &compressor, &data, info)?;
    }

    Ok(())
}

/// Print the archive listing in unzip-style short or verbose format.
fn print_listing(archive: &str, entries: &[FileInfo], verbose: bool) {
    println!("Archive:  {archive}");

    let mut total_size = 0u64;
    let mut total_comp = 0u64;
    let mut file_count = 0usize;

    if verbose {
        println!(" Length   Method     Size  Cmpr    Date    Time   CRC-32   Name");
        println!("--------  ------  -------- ---- ---------- ----- --------  ----");
    } else {
        println!("  Length      Date    Time    Name");
        println!("---------  ---------- -----   ----");
    }

    for info in entries {
        let (date, time) = match info.mod_time {
            Some(t) => (t.format("%Y-%m-%d").to_string(), t.format("%H:%M").to_string()),
            None => ("----------".to_string(), "-----".to_string()),
        };

        if verbose {
            let ratio = if info.size > 0 {
                (100 - (info.comp_size * 100 / info.size) as i64).max(0)
            } else {
                0
            };
            println!(
                "{:>8}  {:<6}  {:>8} {:>3}% {} {} {:08x}  {}",
                info.size, info.method.to_string(), info.comp_size, ratio, date, time,
                info.crc32, info.name
            );
        } else {
            println!("{:>9}  {} {}   {}", info.size, date, time, info.name);
        }

        if !info.is_directory() {
            total_size += info.size;
            total_comp += info.comp_size;
            file_count += 1;
        }
    }

    if verbose {
        let ratio = if total_size > 0 {
            (100 - (total_comp * 100 / total_size) as i64).max(0)
        } else {
            0
        };
        println!("--------          -------- ----                            -------");
        println!(
            "{:>8}          {:>8} {:>3}%                            {} files",
            total_size, total_comp, ratio, file_count
        );
    } else {
        println!("---------                     -------");
        println!("{:>9}                     {} files", total_size, file_count);
    }
}

/// Decode every entry and verify its CRC without writing anything.
fn test_archive(
    cli: &Cli,
    compressor: &Compressor,
    data: &[u8],
    entries: &[FileInfo],
) -> Result<()> {
    for info in entries {
        if info.is_directory() {
            continue;
        }
        if !cli.quiet {
            print!("    testing: {:<40} ", info.name);
        }
        match compressor.decompress_file(data, info) {
            Ok(_) => {
                if !cli.quiet {
                    println!("OK");
                }
            }
            Err(err) => {
                if !cli.quiet {
                    println!("error");
                }
                bail!("test of '{}' failed: {err}", info.name);
            }
        }
    }

    println!("No errors detected in compressed data of {}", cli.archive);
    Ok(())
}

/// Extract one entry to stdout or the filesystem.
fn extract_entry(
    cli: &Cli,
    compressor: &Compressor,
    data: &[u8],
    info: &FileInfo,
) -> Result<()> {
    let output = compressor
        .decompress_file(data, info)
        .with_context(|| format!("extracting '{}'", info.name))?;

    if cli.pipe {
        std::io::stdout().write_all(&output)?;
        return Ok(());
    }

    let output_path = output_path(cli, &info.name);

    if output_path.exists() {
        if cli.never_overwrite {
            if !cli.quiet {
                eprintln!("  skipping: {} (file exists)", info.name);
            }
            return Ok(());
        }
        if !cli.overwrite && !prompt_overwrite(&output_path)? {
            if !cli.quiet {
                eprintln!("  skipping: {}", info.name);
            }
            return Ok(());
        }
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating '{}'", parent.display()))?;
        }
    }

    #[cfg(unix)]
    if bpezip::zip::structures::mode_is_symlink(info.mode) {
        let target = String::from_utf8_lossy(&output).to_string();
        // Replace any stale link so extraction is repeatable.
        let _ = fs::remove_file(&output_path);
        std::os::unix::fs::symlink(&target, &output_path)
            .with_context(|| format!("creating symlink '{}'", output_path.display()))?;
        if !cli.quiet {
            println!("    linking: {} -> {target}", info.name);
        }
        return Ok(());
    }

    if !cli.quiet {
        println!("  inflating: {}", info.name);
    }
    fs::write(&output_path, &output)
        .with_context(|| format!("writing '{}'", output_path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perm = info.mode & 0o7777;
        if perm != 0 {
            let _ = fs::set_permissions(&output_path, fs::Permissions::from_mode(perm));
        }
    }

    Ok(())
}

fn output_path(cli: &Cli, name: &str) -> PathBuf {
    let file_name = if cli.junk_paths {
        Path::new(name)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| name.to_string())
    } else {
        name.to_string()
    };

    match &cli.dest_dir {
        Some(dir) => PathBuf::from(dir).join(file_name),
        None => PathBuf::from(file_name),
    }
}

fn prompt_overwrite(path: &Path) -> Result<bool> {
    eprint!("replace {}? [y]es, [n]o: ", path.display());
    let mut response = String::new();
    std::io::stdin().read_line(&mut response)?;
    let response = response.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// True when `name` matches any of the requested files or patterns; an
/// empty request list matches everything.
fn matches_filters(filters: &[String], name: &str) -> bool {
    if filters.is_empty() {
        return true;
    }
    filters.iter().any(|f| {
        if f.contains('*') || f.contains('?') {
            glob_match(f, name)
        } else {
            let basename = Path::new(name)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            name == f || basename == *f
        }
    })
}

/// Simple glob matching supporting `*` and `?`.
fn glob_match(pattern: &str, text: &str) -> bool {
    fn matches(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            (Some('*'), _) => {
                matches(&pattern[1..], text)
                    || (!text.is_empty() && matches(pattern, &text[1..]))
            }
            (Some('?'), Some(_)) => matches(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if p == t => matches(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    matches(&pattern, &text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_matching() {
        assert!(glob_match("*.txt", "readme.txt"));
        assert!(glob_match("file?.dat", "file1.dat"));
        assert!(!glob_match("*.txt", "readme.md"));
        assert!(glob_match("src/*.rs", "src/main.rs"));
    }

    #[test]
    fn filter_matching() {
        let filters = vec!["a.txt".to_string(), "*.rs".to_string()];
        assert!(matches_filters(&filters, "dir/a.txt"));
        assert!(matches_filters(&filters, "lib.rs"));
        assert!(!matches_filters(&filters, "b.txt"));
        assert!(matches_filters(&[], "anything"));
    }
}
