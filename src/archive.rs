//! Multi-file archive builder.
//!
//! Entries accumulate in insertion order — regular files, directories
//! and symbolic links — and [`Archive::emit`] serializes them once:
//! every local header plus payload in order, then the central directory,
//! then the end record. Archives are immutable after emission.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::pipeline::Compressor;
use crate::zip::structures::{
    make_extended_timestamp, make_vocab_info, time_to_dos, FLAG_UTF8, UNIX_MODE_DIR,
    UNIX_MODE_REGULAR, UNIX_MODE_SYMLINK, UNIX_MODE_TYPE_MASK,
};
use crate::zip::writer::{
    name_needs_utf8_flag, write_central_dir_entry, write_end_central_dir, write_local_header,
};
use crate::zip::{Method, VocabInfo};

struct ArchiveEntry {
    name: String,
    original_len: usize,
    compressed: Vec<u8>,
    method: Method,
    crc: u32,
    mod_time: Option<DateTime<Utc>>,
    mode: u32,
    vocab: VocabInfo,
}

/// Accumulates entries and emits a complete ZIP archive.
pub struct Archive<'a> {
    compressor: &'a Compressor,
    entries: Vec<ArchiveEntry>,
}

impl<'a> Archive<'a> {
    /// Create an empty archive builder backed by `compressor`.
    pub fn new(compressor: &'a Compressor) -> Self {
        Self {
            compressor,
            entries: Vec::new(),
        }
    }

    /// Number of entries added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries have been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a regular file, auto-selecting the compression method.
    pub fn add_auto(
        &mut self,
        data: &[u8],
        name: &str,
        mod_time: Option<DateTime<Utc>>,
        mode: u32,
    ) -> Result<()> {
        if data.len() > u32::MAX as usize {
            return Err(Error::FileTooLarge);
        }

        let selection = self.compressor.select(data)?;
        if selection.data.len() > u32::MAX as usize {
            return Err(Error::FileTooLarge);
        }

        self.entries.push(ArchiveEntry {
            name: name.to_string(),
            original_len: data.len(),
            crc: crc32fast::hash(data),
            compressed: selection.data,
            method: selection.method,
            mod_time,
            mode: regular_mode(mode),
            vocab: selection.vocab,
        });
        Ok(())
    }

    /// Add a regular file without compression (method 0).
    pub fn add_stored(
        &mut self,
        data: &[u8],
        name: &str,
        mod_time: Option<DateTime<Utc>>,
        mode: u32,
    ) -> Result<()> {
        if data.len() > u32::MAX as usize {
            return Err(Error::FileTooLarge);
        }

        self.entries.push(ArchiveEntry {
            name: name.to_string(),
            original_len: data.len(),
            compressed: data.to_vec(),
            method: Method::Store,
            crc: crc32fast::hash(data),
            mod_time,
            mode: regular_mode(mode),
            vocab: VocabInfo::default(),
        });
        Ok(())
    }

    /// Add a directory entry. The stored name gains a trailing `/` and
    /// the entry carries no data.
    pub fn add_directory(
        &mut self,
        name: &str,
        mod_time: Option<DateTime<Utc>>,
        mode: u32,
    ) -> Result<()> {
        let name = if name.ends_with('/') {
            name.to_string()
        } else {
            format!("{name}/")
        };

        self.entries.push(ArchiveEntry {
            name,
            original_len: 0,
            compressed: Vec::new(),
            method: Method::Store,
            crc: 0,
            mod_time,
            mode: (mode & !UNIX_MODE_TYPE_MASK) | UNIX_MODE_DIR,
            vocab: VocabInfo::default(),
        });
        Ok(())
    }

    /// Add a symbolic link. The link target is stored as the entry's
    /// content and the Unix mode carries the symlink type bit.
    pub fn add_symlink(
        &mut self,
        name: &str,
        target: &str,
        mod_time: Option<DateTime<Utc>>,
        mode: u32,
    ) -> Result<()> {
        let target_bytes = target.as_bytes();

        self.entries.push(ArchiveEntry {
            name: name.to_string(),
            original_len: target_bytes.len(),
            compressed: target_bytes.to_vec(),
            method: Method::Store,
            crc: crc32fast::hash(target_bytes),
            mod_time,
            mode: (mode & !UNIX_MODE_TYPE_MASK) | UNIX_MODE_SYMLINK,
            vocab: VocabInfo::default(),
        });
        Ok(())
    }

    /// Serialize every entry and return the complete archive bytes.
    pub fn emit(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let mut central_dir = Vec::new();

        for entry in &self.entries {
            let (dos_time, dos_date) = time_to_dos(entry.mod_time);
            let mut flags = 0u16;
            if name_needs_utf8_flag(&entry.name) {
                flags |= FLAG_UTF8;
            }

            let mut extra = make_extended_timestamp(entry.mod_time);
            if matches!(entry.method, Method::Unzlate | Method::Bpelate) {
                extra.extend(make_vocab_info(entry.vocab));
            }

            let external_attrs = entry.mode << 16;

            let local_offset = buf.len();
            if local_offset > u32::MAX as usize {
                return Err(Error::FileTooLarge);
            }

            write_local_header(
                &mut buf,
                &entry.name,
                entry.method,
                flags,
                dos_time,
                dos_date,
                entry.crc,
                entry.compressed.len() as u32,
                entry.original_len as u32,
                &extra,
            );
            buf.extend_from_slice(&entry.compressed);

            write_central_dir_entry(
                &mut central_dir,
                &entry.name,
                entry.method,
                flags,
                dos_time,
                dos_date,
                entry.crc,
                entry.compressed.len() as u32,
                entry.original_len as u32,
                local_offset as u32,
                external_attrs,
                &extra,
            );
        }

        let cd_offset = buf.len();
        buf.extend_from_slice(&central_dir);
        let cd_size = buf.len() - cd_offset;

        write_end_central_dir(
            &mut buf,
            self.entries.len() as u16,
            cd_size as u32,
            cd_offset as u32,
        );

        Ok(buf)
    }
}

/// Ensure a plain permission value gets the regular-file type bits.
fn regular_mode(mode: u32) -> u32 {
    if mode & UNIX_MODE_TYPE_MASK == 0 {
        mode | UNIX_MODE_REGULAR
    } else {
        mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zip::{self, structures};

    #[test]
    fn entries_listed_in_insertion_order() {
        let comp = Compressor::with_default_vocabulary();
        let mut archive = Archive::new(&comp);
        archive.add_directory("dir", None, 0o755).unwrap();
        archive.add_auto(b"Content of A", "a.txt", None, 0o644).unwrap();
        archive.add_stored(b"Content of B", "b.txt", None, 0o644).unwrap();
        archive.add_symlink("link", "a.txt", None, 0o777).unwrap();

        let bytes = archive.emit().unwrap();
        assert!(zip::is_valid_format(&bytes));

        let files = zip::list_files(&bytes).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["dir/", "a.txt", "b.txt", "link"]);
    }

    #[test]
    fn directory_entries_have_no_data() {
        let comp = Compressor::with_default_vocabulary();
        let mut archive = Archive::new(&comp);
        archive.add_directory("nested/dir/", None, 0o755).unwrap();
        let bytes = archive.emit().unwrap();

        let files = zip::list_files(&bytes).unwrap();
        assert_eq!(files[0].name, "nested/dir/");
        assert!(files[0].is_directory());
        assert_eq!(files[0].size, 0);
        assert_eq!(files[0].crc32, 0);
        assert!(structures::mode_is_dir(files[0].mode));
    }

    #[test]
    fn symlink_mode_and_target() {
        let comp = Compressor::with_default_vocabulary();
        let mut archive = Archive::new(&comp);
        archive
            .add_symlink("current", "releases/v3", None, 0o777)
            .unwrap();
        let bytes = archive.emit().unwrap();

        let files = zip::list_files(&bytes).unwrap();
        assert!(structures::mode_is_symlink(files[0].mode));
        assert_eq!(
            comp.decompress_file(&bytes, &files[0]).unwrap(),
            b"releases/v3"
        );
    }

    #[test]
    fn empty_archive_emits_bare_eocd() {
        let comp = Compressor::with_default_vocabulary();
        let archive = Archive::new(&comp);
        let bytes = archive.emit().unwrap();
        assert_eq!(bytes.len(), structures::EOCD_SIZE);
        assert_eq!(zip::list_files(&bytes).unwrap().len(), 0);
    }
}
