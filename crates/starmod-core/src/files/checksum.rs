use crate::core::{ModError, ModResult};
use adler2::Adler32;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Adler-32 value of zero bytes of input
pub const ADLER32_SEED: u64 = 1;

const BUFFER_SIZE: usize = 64 * 1024;

/// Calculate the Adler-32 checksum of a file.
///
/// The file is streamed through a fixed buffer rather than read whole. The
/// digest is not integrity-grade; it exists for cheap change and duplicate
/// detection. Unlike signature verification, I/O failures are returned.
pub fn checksum(path: &Path) -> ModResult<u64> {
    let file = File::open(path).map_err(|e| ModError::io(path, e))?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let mut adler = Adler32::new();
    let mut buf = vec![0u8; BUFFER_SIZE];

    loop {
        let read = reader.read(&mut buf).map_err(|e| ModError::io(path, e))?;
        if read == 0 {
            break;
        }
        adler.write_slice(&buf[..read]);
    }

    let checksum = u64::from(adler.checksum());
    tracing::info!(path = %path.display(), checksum, "Checksum created");

    Ok(checksum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_checksum_known_value() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("wiki.txt");
        fs::write(&path, b"Wikipedia").unwrap();

        assert_eq!(checksum(&path).unwrap(), 0x11E6_0398);
    }

    #[test]
    fn test_checksum_empty_file_is_seed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.bin");
        fs::write(&path, b"").unwrap();

        assert_eq!(checksum(&path).unwrap(), ADLER32_SEED);
    }

    #[test]
    fn test_checksum_is_deterministic_across_buffer_boundaries() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("large.bin");
        let data: Vec<u8> = (0..(BUFFER_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &data).unwrap();

        let first = checksum(&path).unwrap();
        let second = checksum(&path).unwrap();
        assert_eq!(first, second);

        let mut whole = Adler32::new();
        whole.write_slice(&data);
        assert_eq!(first, u64::from(whole.checksum()));
    }

    #[test]
    fn test_checksum_changes_with_content() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.bin");
        let b = temp.path().join("b.bin");
        fs::write(&a, b"abc").unwrap();
        fs::write(&b, b"abd").unwrap();

        assert_ne!(checksum(&a).unwrap(), checksum(&b).unwrap());
    }

    #[test]
    fn test_checksum_missing_file_errors() {
        let temp = TempDir::new().unwrap();
        let err = checksum(&temp.path().join("nope.zip")).unwrap_err();
        assert!(err.is_not_found());
    }
}
