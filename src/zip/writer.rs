//! Low-level ZIP record emission.
//!
//! These helpers append bit-exact PKZIP records to an in-memory buffer.
//! The higher-level [`Archive`](crate::Archive) builder and the
//! single-file paths in [`Compressor`](crate::Compressor) drive them.

use super::structures::*;

/// True if the name needs the UTF-8 flag (any byte above 0x7E).
pub fn name_needs_utf8_flag(name: &str) -> bool {
    name.bytes().any(|b| b > 0x7E)
}

/// Append a local file header: 30 fixed bytes, then the name, then the
/// extra fields.
#[allow(clippy::too_many_arguments)]
pub fn write_local_header(
    buf: &mut Vec<u8>,
    name: &str,
    method: Method,
    flags: u16,
    dos_time: u16,
    dos_date: u16,
    crc: u32,
    comp_size: u32,
    uncomp_size: u32,
    extra: &[u8],
) {
    buf.extend_from_slice(&SIG_LOCAL_FILE.to_le_bytes());
    buf.extend_from_slice(&ZIP_VERSION.to_le_bytes());
    buf.extend_from_slice(&flags.to_le_bytes());
    buf.extend_from_slice(&method.as_u16().to_le_bytes());
    buf.extend_from_slice(&dos_time.to_le_bytes());
    buf.extend_from_slice(&dos_date.to_le_bytes());
    buf.extend_from_slice(&crc.to_le_bytes());
    buf.extend_from_slice(&comp_size.to_le_bytes());
    buf.extend_from_slice(&uncomp_size.to_le_bytes());
    buf.extend_from_slice(&(name.len() as u16).to_le_bytes());
    buf.extend_from_slice(&(extra.len() as u16).to_le_bytes());
    buf.extend_from_slice(name.as_bytes());
    buf.extend_from_slice(extra);
}

/// Append a central directory entry: 46 fixed bytes, then the name,
/// then the extra fields. Comments are never written.
#[allow(clippy::too_many_arguments)]
pub fn write_central_dir_entry(
    buf: &mut Vec<u8>,
    name: &str,
    method: Method,
    flags: u16,
    dos_time: u16,
    dos_date: u16,
    crc: u32,
    comp_size: u32,
    uncomp_size: u32,
    local_offset: u32,
    external_attrs: u32,
    extra: &[u8],
) {
    buf.extend_from_slice(&SIG_CENTRAL_DIR.to_le_bytes());
    buf.extend_from_slice(&ZIP_VERSION_UNIX.to_le_bytes());
    buf.extend_from_slice(&ZIP_VERSION.to_le_bytes());
    buf.extend_from_slice(&flags.to_le_bytes());
    buf.extend_from_slice(&method.as_u16().to_le_bytes());
    buf.extend_from_slice(&dos_time.to_le_bytes());
    buf.extend_from_slice(&dos_date.to_le_bytes());
    buf.extend_from_slice(&crc.to_le_bytes());
    buf.extend_from_slice(&comp_size.to_le_bytes());
    buf.extend_from_slice(&uncomp_size.to_le_bytes());
    buf.extend_from_slice(&(name.len() as u16).to_le_bytes());
    buf.extend_from_slice(&(extra.len() as u16).to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes()); // comment length
    buf.extend_from_slice(&0u16.to_le_bytes()); // disk number
    buf.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
    buf.extend_from_slice(&external_attrs.to_le_bytes());
    buf.extend_from_slice(&local_offset.to_le_bytes());
    buf.extend_from_slice(name.as_bytes());
    buf.extend_from_slice(extra);
}

/// Append the end-of-central-directory record.
pub fn write_end_central_dir(buf: &mut Vec<u8>, num_entries: u16, cd_size: u32, cd_offset: u32) {
    buf.extend_from_slice(&SIG_END_CENTRAL_DIR.to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes()); // disk number
    buf.extend_from_slice(&0u16.to_le_bytes()); // disk with central dir
    buf.extend_from_slice(&num_entries.to_le_bytes());
    buf.extend_from_slice(&num_entries.to_le_bytes());
    buf.extend_from_slice(&cd_size.to_le_bytes());
    buf.extend_from_slice(&cd_offset.to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes()); // comment length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_header_layout() {
        let mut buf = Vec::new();
        write_local_header(
            &mut buf,
            "a.txt",
            Method::Deflate,
            0,
            0x1234,
            0x5678,
            0xDEADBEEF,
            10,
            20,
            &[],
        );
        assert_eq!(buf.len(), LOCAL_HEADER_SIZE + 5);
        assert_eq!(&buf[0..4], &SIG_LOCAL_FILE.to_le_bytes());
        assert_eq!(u16::from_le_bytes([buf[8], buf[9]]), 8); // method
        assert_eq!(
            u32::from_le_bytes([buf[14], buf[15], buf[16], buf[17]]),
            0xDEADBEEF
        );
        assert_eq!(&buf[30..35], b"a.txt");
    }

    #[test]
    fn eocd_layout() {
        let mut buf = Vec::new();
        write_end_central_dir(&mut buf, 3, 100, 500);
        assert_eq!(buf.len(), EOCD_SIZE);
        assert_eq!(&buf[0..4], &SIG_END_CENTRAL_DIR.to_le_bytes());
        assert_eq!(u16::from_le_bytes([buf[8], buf[9]]), 3);
        assert_eq!(u16::from_le_bytes([buf[10], buf[11]]), 3);
        assert_eq!(u32::from_le_bytes([buf[16], buf[17], buf[18], buf[19]]), 500);
    }

    #[test]
    fn utf8_flag_detection() {
        assert!(!name_needs_utf8_flag("plain.txt"));
        assert!(name_needs_utf8_flag("naïve.txt"));
        assert!(name_needs_utf8_flag("日本語.txt"));
    }
}
