//! Small-file reads from sysfs
//!
//! Power-supply attributes are short ASCII values, usually newline
//! terminated. Every read opens the file, pulls at most a fixed number of
//! bytes, and closes it again before returning.

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Buffer size for boolean flags such as `online`
pub const FLAG_CAPACITY: usize = 16;

/// Buffer size for numeric and textual attributes (`capacity`, `status`, `ec_dock`)
pub const VALUE_CAPACITY: usize = 128;

/// Buffer size for the power-supply `type` attribute
pub const TYPE_CAPACITY: usize = 20;

/// Read up to `capacity` bytes from `path` with trailing newlines removed.
///
/// Returns `None` when no path was resolved or the file cannot be opened or
/// read. Content longer than `capacity` is truncated without notice. An empty
/// file yields `Some` of an empty buffer, which callers treat as "no data".
pub fn read_from_file(path: Option<&Path>, capacity: usize) -> Option<Vec<u8>> {
    let path = path?;

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not open attribute");
            return None;
        }
    };

    let mut buf = Vec::with_capacity(capacity);
    if let Err(e) = file.take(capacity as u64).read_to_end(&mut buf) {
        tracing::warn!(path = %path.display(), error = %e, "Could not read attribute");
        return None;
    }

    trim_trailing_newlines(&mut buf);
    Some(buf)
}

fn trim_trailing_newlines(buf: &mut Vec<u8>) {
    while buf.last() == Some(&b'\n') {
        buf.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_attr(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_unset_path_fails() {
        assert!(read_from_file(None, FLAG_CAPACITY).is_none());
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("online");
        assert!(read_from_file(Some(&path), FLAG_CAPACITY).is_none());
    }

    #[test]
    fn test_strips_every_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = write_attr(&dir, "status", b"Charging\n\n\n");

        let value = read_from_file(Some(&path), VALUE_CAPACITY).unwrap();
        assert_eq!(value, b"Charging");
        assert_eq!(value.len(), "Charging".len());
    }

    #[test]
    fn test_keeps_content_without_newline() {
        let dir = TempDir::new().unwrap();
        let path = write_attr(&dir, "capacity", b"87");

        assert_eq!(read_from_file(Some(&path), VALUE_CAPACITY).unwrap(), b"87");
    }

    #[test]
    fn test_inner_newlines_survive() {
        let dir = TempDir::new().unwrap();
        let path = write_attr(&dir, "status", b"a\nb\n");

        assert_eq!(read_from_file(Some(&path), VALUE_CAPACITY).unwrap(), b"a\nb");
    }

    #[test]
    fn test_truncates_to_capacity() {
        let dir = TempDir::new().unwrap();
        let path = write_attr(&dir, "type", b"DockBatteryWithAVeryLongName\n");

        let value = read_from_file(Some(&path), TYPE_CAPACITY).unwrap();
        assert_eq!(value.len(), TYPE_CAPACITY);
        assert_eq!(value, b"DockBatteryWithAVery");
    }

    #[test]
    fn test_empty_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_attr(&dir, "online", b"\n");

        assert_eq!(read_from_file(Some(&path), FLAG_CAPACITY).unwrap(), b"");
    }
}
