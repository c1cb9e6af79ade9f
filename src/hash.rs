//! BLAKE3 content hashing for bundle artifacts
//!
//! Hashes are bare lowercase hex, 64 characters long.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;

use crate::error::{Result, fs};

/// Algorithm prefix accepted, and ignored, by [`verify_hash`]
pub const HASH_PREFIX: &str = "blake3:";

/// Calculate BLAKE3 hash of a file
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| fs::read_failed(path, e))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| fs::read_failed(path, e))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

/// Verify a hash matches the expected value
pub fn verify_hash(expected: &str, actual: &str) -> bool {
    let normalize = |h: &str| h.strip_prefix(HASH_PREFIX).unwrap_or(h).to_ascii_lowercase();

    normalize(expected) == normalize(actual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::create_temp_dir;

    #[test]
    fn test_hash_file() {
        let temp = create_temp_dir();
        let file_path = temp.path().join("bundle.eszip");
        std::fs::write(&file_path, "test content").unwrap();

        let hash = hash_file(&file_path).unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_file_not_found() {
        let result = hash_file(Path::new("/nonexistent/file.eszip"));
        assert!(result.is_err());
    }

    #[test]
    fn test_hash_file_deterministic() {
        let temp = create_temp_dir();
        let a = temp.path().join("a.eszip");
        let b = temp.path().join("b.eszip");
        std::fs::write(&a, "same bytes").unwrap();
        std::fs::write(&b, "same bytes").unwrap();

        assert_eq!(hash_file(&a).unwrap(), hash_file(&b).unwrap());

        std::fs::write(&b, "other bytes").unwrap();
        assert_ne!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
    }

    #[test]
    fn test_verify_hash() {
        assert!(verify_hash("abc123", "abc123"));
        assert!(verify_hash(&format!("{HASH_PREFIX}abc123"), "abc123"));
        assert!(verify_hash("ABC123", "abc123"));
        assert!(!verify_hash("abc123", &format!("{HASH_PREFIX}def456")));
    }
}
