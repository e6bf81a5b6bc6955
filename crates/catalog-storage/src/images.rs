//! Content-addressed image storage on the local filesystem.
//!
//! Every image is stored once under `{base_dir}/{sha256-hex}{ext}`. The key
//! is derived from the bytes, so uploading the same picture twice (under
//! any file name) resolves to the same object.

use std::io::Write;
use std::path::{Path, PathBuf};

use catalog_core::{Error, Result};
use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
const HASH_HEX_LEN: usize = 64;

/// Filesystem manager for uploaded images.
#[derive(Debug, Clone)]
pub struct ImageStore {
    base_dir: PathBuf,
}

impl ImageStore {
    /// Open the store rooted at `base_dir`, creating the directory if needed.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)
            .map_err(|e| Error::storage_write(base_dir.display(), e))?;
        tracing::debug!("Image store ready at {}", base_dir.display());
        Ok(Self { base_dir })
    }

    /// Store `content` and return its key.
    ///
    /// `ext` is appended verbatim and must be empty or start with a dot.
    /// Writing a key that already exists replaces it with identical bytes.
    pub fn put(&self, content: &[u8], ext: &str) -> Result<String> {
        validate_ext(ext)?;
        let key = format!("{}{}", compute_hash(content), ext);
        let path = self.base_dir.join(&key);

        // Write beside the target and rename so readers never see a partial file.
        let mut tmp = tempfile::NamedTempFile::new_in(&self.base_dir)
            .map_err(|e| Error::storage_write(path.display(), e))?;
        tmp.write_all(content)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| Error::storage_write(path.display(), e))?;
        tmp.persist(&path)
            .map_err(|e| Error::storage_write(path.display(), e.error))?;

        tracing::debug!(key = %key, bytes = content.len(), "Stored image");
        Ok(key)
    }

    /// Read the bytes stored under `key`.
    pub fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::not_found("image", key))
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    /// Whether an object is stored under `key`.
    pub fn exists(&self, key: &str) -> bool {
        self.path_for(key).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Filesystem path for `key`.
    ///
    /// Anything that is not a well-formed key is reported as not found, so
    /// callers can never address files outside the image directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        if !is_valid_key(key) {
            return Err(Error::not_found("image", key));
        }
        Ok(self.base_dir.join(key))
    }
}

/// Hex-encoded SHA-256 digest of `data`.
pub fn compute_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// The `.ext` suffix of an uploaded file name, or an empty string.
pub fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

fn validate_ext(ext: &str) -> Result<()> {
    if ext.is_empty() {
        return Ok(());
    }
    if !ext.starts_with('.') || ext.contains(['/', '\\', '\0']) {
        return Err(Error::InvalidArgument(format!(
            "invalid image extension {ext:?}"
        )));
    }
    Ok(())
}

fn is_valid_key(key: &str) -> bool {
    if key.len() < HASH_HEX_LEN || !key.is_char_boundary(HASH_HEX_LEN) {
        return false;
    }
    let (hash, ext) = key.split_at(HASH_HEX_LEN);
    hash.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) && validate_ext(ext).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_hash_is_full_sha256_hex() {
        let hash = compute_hash(b"");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn compute_hash_different_data() {
        assert_ne!(compute_hash(b"data1"), compute_hash(b"data2"));
    }

    #[test]
    fn extension_of_file_names() {
        assert_eq!(extension_of("shoe.jpg"), ".jpg");
        assert_eq!(extension_of("photo.JPG"), ".JPG");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of(""), "");
    }

    #[test]
    fn put_uses_hash_plus_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::open(dir.path().join("images")).unwrap();

        let key = store.put(b"jpeg bytes", ".jpg").unwrap();
        assert_eq!(key, format!("{}.jpg", compute_hash(b"jpeg bytes")));
        assert!(dir.path().join("images").join(&key).is_file());
        assert_eq!(store.get(&key).unwrap(), b"jpeg bytes");
    }

    #[test]
    fn put_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::open(dir.path()).unwrap();

        let first = store.put(b"same", ".png").unwrap();
        let second = store.put(b"same", ".png").unwrap();
        assert_eq!(first, second);
        assert_eq!(store.get(&first).unwrap(), b"same");

        // Only the object itself remains; no temp files linger.
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn put_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::open(dir.path()).unwrap();
        let key = store.put(b"raw", "").unwrap();
        assert_eq!(key.len(), HASH_HEX_LEN);
        assert!(store.exists(&key));
    }

    #[test]
    fn put_rejects_bad_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::open(dir.path()).unwrap();
        for ext in ["jpg", "./../x", ".a/b", ".a\\b"] {
            let err = store.put(b"x", ext).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{ext}");
        }
    }

    #[test]
    fn put_into_vanished_directory_is_storage_write() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        let store = ImageStore::open(images.clone()).unwrap();
        std::fs::remove_dir_all(&images).unwrap();

        let err = store.put(b"x", ".jpg").unwrap_err();
        assert!(matches!(err, Error::StorageWrite { .. }));
        assert!(!images.exists());
    }

    #[test]
    fn get_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::open(dir.path()).unwrap();
        let key = format!("{}.jpg", compute_hash(b"never stored"));
        assert!(matches!(store.get(&key), Err(Error::NotFound { .. })));
        assert!(!store.exists(&key));
    }

    #[test]
    fn malformed_keys_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::open(dir.path()).unwrap();
        for key in ["../etc/passwd", "abc.jpg", "", &"A".repeat(64)] {
            assert!(
                matches!(store.get(key), Err(Error::NotFound { .. })),
                "{key}"
            );
        }
        let traversal = format!("{}/../../secret", compute_hash(b"x"));
        assert!(matches!(store.path_for(&traversal), Err(Error::NotFound { .. })));
    }
}
