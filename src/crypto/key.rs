//! Archive key material
//!
//! One random AES-256 key encrypts every entry of an archive. It is stored
//! as raw bytes in its own file, separate from the archive.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{PeridotError, PeridotResult};

/// Length of an archive key in bytes
pub const KEY_SIZE: usize = 32;

/// Symmetric key for an archive, zeroed on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ArchiveKey {
    key: [u8; KEY_SIZE],
}

impl ArchiveKey {
    /// Generate a fresh random key
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut key);
        Self { key }
    }

    /// Build a key from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> PeridotResult<Self> {
        let key: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| {
            PeridotError::Encryption(format!(
                "Invalid key length: expected {}, got {}",
                KEY_SIZE,
                bytes.len()
            ))
        })?;
        Ok(Self { key })
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }

    /// Load a key from a key file
    ///
    /// A missing file is reported as [`PeridotError::KeyMissing`].
    pub fn load(path: &Path) -> PeridotResult<Self> {
        if !path.exists() {
            return Err(PeridotError::KeyMissing(path.to_path_buf()));
        }

        let mut bytes = fs::read(path).map_err(|e| {
            PeridotError::Io(format!("Failed to read key file {}: {}", path.display(), e))
        })?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    /// Load the key at `path`, or generate and save one if the file is absent
    ///
    /// Returns the key and whether it was freshly generated.
    pub fn load_or_generate(path: &Path) -> PeridotResult<(Self, bool)> {
        match Self::load(path) {
            Ok(key) => Ok((key, false)),
            Err(PeridotError::KeyMissing(_)) => {
                let key = Self::generate();
                key.save(path)?;
                Ok((key, true))
            }
            Err(e) => Err(e),
        }
    }

    /// Write the raw key bytes to `path`, replacing any previous key
    pub fn save(&self, path: &Path) -> PeridotResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PeridotError::Io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path).map_err(|e| {
            PeridotError::Io(format!("Failed to open key file {}: {}", path.display(), e))
        })?;
        file.write_all(&self.key)
            .and_then(|_| file.sync_all())
            .map_err(|e| PeridotError::Io(format!("Failed to write key file: {}", e)))?;

        Ok(())
    }
}

// Don't print the key in Debug output
impl fmt::Debug for ArchiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveKey").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generated_keys_differ() {
        let a = ArchiveKey::generate();
        let b = ArchiveKey::generate();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("peridot_key.key");

        let key = ArchiveKey::generate();
        key.save(&path).unwrap();

        let loaded = ArchiveKey::load(&path).unwrap();
        assert_eq!(key.as_bytes(), loaded.as_bytes());
        assert_eq!(fs::read(&path).unwrap().len(), KEY_SIZE);
    }

    #[cfg(unix)]
    #[test]
    fn test_key_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("key");
        ArchiveKey::generate().save(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_load_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.key");

        let err = ArchiveKey::load(&path).unwrap_err();
        assert!(matches!(err, PeridotError::KeyMissing(_)));
    }

    #[test]
    fn test_load_wrong_length() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("short.key");
        fs::write(&path, b"too short").unwrap();

        let err = ArchiveKey::load(&path).unwrap_err();
        assert!(matches!(err, PeridotError::Encryption(_)));
    }

    #[test]
    fn test_load_or_generate_reuses_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("key");

        let (first, generated) = ArchiveKey::load_or_generate(&path).unwrap();
        assert!(generated);

        let (second, generated) = ArchiveKey::load_or_generate(&path).unwrap();
        assert!(!generated);
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_debug_hides_key() {
        let key = ArchiveKey::from_bytes(&[7u8; KEY_SIZE]).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("ArchiveKey"));
        assert!(!debug.contains('7'));
    }
}
