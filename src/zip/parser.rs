//! Low-level ZIP archive parsing.
//!
//! ZIP files are read from the end: find the end-of-central-directory
//! record, follow its offset to the central directory, and walk the
//! entries in order. Extraction then seeks to each entry's local header,
//! whose variable-length fields may legitimately differ from the central
//! copies, to locate the file data.

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Error, Result};

use super::structures::*;

/// Check the leading local-file-header signature.
pub fn is_valid_format(data: &[u8]) -> bool {
    data.len() >= LOCAL_HEADER_SIZE
        && u32::from_le_bytes([data[0], data[1], data[2], data[3]]) == SIG_LOCAL_FILE
}

/// Find the end-of-central-directory record.
///
/// Tries the common no-comment position first, then searches backwards
/// through the last 64 KiB (the maximum comment size) for a signature
/// whose comment-length field is consistent with its position.
fn find_eocd(data: &[u8]) -> Result<usize> {
    if data.len() < EOCD_SIZE {
        return Err(Error::TooShort);
    }

    let no_comment = data.len() - EOCD_SIZE;
    if read_u32_at(data, no_comment) == SIG_END_CENTRAL_DIR
        && data[no_comment + 20..no_comment + 22] == [0, 0]
    {
        return Ok(no_comment);
    }

    let search_start = data.len().saturating_sub(MAX_COMMENT_SIZE + EOCD_SIZE);
    for offset in (search_start..=no_comment).rev() {
        if read_u32_at(data, offset) == SIG_END_CENTRAL_DIR {
            let comment_len =
                usize::from(u16::from_le_bytes([data[offset + 20], data[offset + 21]]));
            if comment_len == data.len() - offset - EOCD_SIZE {
                return Ok(offset);
            }
        }
    }

    Err(Error::InvalidFormat)
}

fn read_u32_at(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// List all entries in an archive by walking its central directory.
///
/// Any malformed entry fails the whole walk with [`Error::Corrupted`];
/// partial listings are never returned.
pub fn list_files(data: &[u8]) -> Result<Vec<FileInfo>> {
    let eocd_offset = find_eocd(data)?;

    let num_entries =
        usize::from(u16::from_le_bytes([data[eocd_offset + 10], data[eocd_offset + 11]]));
    let cd_offset = read_u32_at(data, eocd_offset + 16) as usize;

    if cd_offset > eocd_offset {
        return Err(Error::Corrupted);
    }

    let mut cursor = Cursor::new(&data[cd_offset..eocd_offset]);
    let mut files = Vec::with_capacity(num_entries);

    for _ in 0..num_entries {
        files.push(parse_central_entry(&mut cursor)?);
    }

    Ok(files)
}

/// Parse one central-directory entry at the cursor.
fn parse_central_entry(cursor: &mut Cursor<&[u8]>) -> Result<FileInfo> {
    let sig = cursor.read_u32::<LittleEndian>().map_err(|_| Error::Corrupted)?;
    if sig != SIG_CENTRAL_DIR {
        return Err(Error::Corrupted);
    }

    let read = |c: &mut Cursor<&[u8]>| -> std::io::Result<FileInfo> {
        let version_made_by = c.read_u16::<LittleEndian>()?;
        let _version_needed = c.read_u16::<LittleEndian>()?;
        let _flags = c.read_u16::<LittleEndian>()?;
        let method = c.read_u16::<LittleEndian>()?;
        let dos_time = c.read_u16::<LittleEndian>()?;
        let dos_date = c.read_u16::<LittleEndian>()?;
        let crc32 = c.read_u32::<LittleEndian>()?;
        let comp_size = c.read_u32::<LittleEndian>()?;
        let uncomp_size = c.read_u32::<LittleEndian>()?;
        let name_len = usize::from(c.read_u16::<LittleEndian>()?);
        let extra_len = usize::from(c.read_u16::<LittleEndian>()?);
        let comment_len = usize::from(c.read_u16::<LittleEndian>()?);
        let _disk_number = c.read_u16::<LittleEndian>()?;
        let _internal_attrs = c.read_u16::<LittleEndian>()?;
        let external_attrs = c.read_u32::<LittleEndian>()?;
        let local_offset = c.read_u32::<LittleEndian>()?;

        let mut name_bytes = vec![0u8; name_len];
        c.read_exact(&mut name_bytes)?;
        // Lossy conversion keeps non-UTF-8 names listable.
        let name = String::from_utf8_lossy(&name_bytes).to_string();

        let mut extra = vec![0u8; extra_len];
        c.read_exact(&mut extra)?;

        let mut comment = vec![0u8; comment_len];
        c.read_exact(&mut comment)?;

        let mut mod_time = dos_to_time(dos_time, dos_date);
        let mut vocab = VocabInfo::default();
        if !extra.is_empty() {
            if let Some(t) = parse_extended_timestamp(&extra) {
                mod_time = Some(t);
            }
            if let Some(v) = parse_vocab_info(&extra) {
                vocab = v;
            }
        }

        // External attributes carry a Unix mode only for Unix archives.
        let mut mode = 0o644;
        if version_made_by >> 8 == 3 {
            mode = external_attrs >> 16;
        }
        if name.ends_with('/') && !mode_is_dir(mode) {
            mode = (mode & !UNIX_MODE_TYPE_MASK) | UNIX_MODE_DIR;
        }

        Ok(FileInfo {
            name,
            size: u64::from(uncomp_size),
            comp_size: u64::from(comp_size),
            method: Method::from_u16(method),
            crc32,
            mod_time,
            mode,
            offset: u64::from(local_offset),
            vocab,
        })
    };

    read(cursor).map_err(|_| Error::Corrupted)
}

/// Read metadata from the first local header of an archive.
///
/// The local header does not carry the Unix mode, so the central
/// directory is consulted for it when reachable.
pub fn get_file_info(data: &[u8]) -> Result<FileInfo> {
    if data.len() < LOCAL_HEADER_SIZE {
        return Err(Error::TooShort);
    }

    let mut cursor = Cursor::new(data);
    let sig = cursor.read_u32::<LittleEndian>().map_err(|_| Error::TooShort)?;
    if sig != SIG_LOCAL_FILE {
        return Err(Error::InvalidFormat);
    }

    let read = |c: &mut Cursor<&[u8]>| -> std::io::Result<FileInfo> {
        let _version_needed = c.read_u16::<LittleEndian>()?;
        let _flags = c.read_u16::<LittleEndian>()?;
        let method = c.read_u16::<LittleEndian>()?;
        let dos_time = c.read_u16::<LittleEndian>()?;
        let dos_date = c.read_u16::<LittleEndian>()?;
        let crc32 = c.read_u32::<LittleEndian>()?;
        let comp_size = c.read_u32::<LittleEndian>()?;
        let uncomp_size = c.read_u32::<LittleEndian>()?;
        let name_len = usize::from(c.read_u16::<LittleEndian>()?);
        let extra_len = usize::from(c.read_u16::<LittleEndian>()?);

        let mut name_bytes = vec![0u8; name_len];
        c.read_exact(&mut name_bytes)?;
        let name = String::from_utf8_lossy(&name_bytes).to_string();

        let mut extra = vec![0u8; extra_len];
        c.read_exact(&mut extra)?;

        let mut mod_time = dos_to_time(dos_time, dos_date);
        let mut vocab = VocabInfo::default();
        if !extra.is_empty() {
            if let Some(t) = parse_extended_timestamp(&extra) {
                mod_time = Some(t);
            }
            if let Some(v) = parse_vocab_info(&extra) {
                vocab = v;
            }
        }

        Ok(FileInfo {
            name,
            size: u64::from(uncomp_size),
            comp_size: u64::from(comp_size),
            method: Method::from_u16(method),
            crc32,
            mod_time,
            mode: 0o644,
            offset: 0,
            vocab,
        })
    };

    let mut info = read(&mut cursor).map_err(|_| Error::Corrupted)?;

    if let Some(mode) = central_directory_mode(data) {
        info.mode = mode;
    }

    Ok(info)
}

/// Locate the compressed payload of an entry.
///
/// Re-reads the entry's local header because its name/extra lengths may
/// differ from the central directory copies, then bounds-checks the
/// payload.
pub fn entry_data<'a>(data: &'a [u8], info: &FileInfo) -> Result<&'a [u8]> {
    let offset = info.offset as usize;
    if offset + LOCAL_HEADER_SIZE > data.len() {
        return Err(Error::Corrupted);
    }

    if read_u32_at(data, offset) != SIG_LOCAL_FILE {
        return Err(Error::Corrupted);
    }

    let name_len = usize::from(u16::from_le_bytes([data[offset + 26], data[offset + 27]]));
    let extra_len = usize::from(u16::from_le_bytes([data[offset + 28], data[offset + 29]]));
    let data_offset = offset + LOCAL_HEADER_SIZE + name_len + extra_len;

    let comp_size = info.comp_size as usize;
    if data_offset + comp_size > data.len() {
        return Err(Error::Corrupted);
    }

    Ok(&data[data_offset..data_offset + comp_size])
}

/// Fish the first entry's Unix mode out of the central directory, when
/// an EOCD and a Unix-made entry are present.
fn central_directory_mode(data: &[u8]) -> Option<u32> {
    let eocd_offset = find_eocd(data).ok()?;
    let cd_offset = read_u32_at(data, eocd_offset + 16) as usize;
    if cd_offset + CENTRAL_HEADER_SIZE > data.len() {
        return None;
    }

    let cd = &data[cd_offset..];
    if read_u32_at(cd, 0) != SIG_CENTRAL_DIR {
        return None;
    }

    let version_made_by = u16::from_le_bytes([cd[4], cd[5]]);
    if version_made_by >> 8 != 3 {
        return None;
    }

    let external_attrs = read_u32_at(cd, 38);
    let mode = external_attrs >> 16;
    if mode == 0 {
        return None;
    }
    Some(mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_format_checks() {
        assert!(!is_valid_format(b""));
        assert!(!is_valid_format(b"PK"));
        assert!(!is_valid_format(&[0u8; 64]));
    }

    #[test]
    fn too_short_inputs() {
        assert!(matches!(list_files(&[1, 2, 3]), Err(Error::TooShort)));
        assert!(matches!(get_file_info(&[1, 2, 3]), Err(Error::TooShort)));
    }

    #[test]
    fn garbage_has_no_eocd() {
        let data = vec![0xAB; 1024];
        assert!(matches!(list_files(&data), Err(Error::InvalidFormat)));
    }

    #[test]
    fn wrong_leading_signature() {
        let data = vec![0u8; 64];
        assert!(matches!(get_file_info(&data), Err(Error::InvalidFormat)));
    }
}
