use std::path::Path;

use zeroize::Zeroize;

use super::encryption::EncryptedData;
use super::CryptoError;

pub const KEY_LENGTH: usize = 32; // AES-256

/// Symmetric encryption key, zeroed on drop.
///
/// Generated once on first run, persisted to the key file with restrictive
/// permissions, and reused on every subsequent start.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SecretKey {
    pub(super) key_bytes: [u8; KEY_LENGTH],
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("key_bytes", &"[REDACTED]")
            .finish()
    }
}

impl SecretKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut key_bytes = [0u8; KEY_LENGTH];
        rand::thread_rng().fill_bytes(&mut key_bytes);
        Self { key_bytes }
    }

    /// Load the key from `path`, creating and persisting a new one if the
    /// file does not exist yet. The key file is written `0o600` on Unix.
    pub fn load_or_create(path: &Path) -> Result<Self, CryptoError> {
        if path.exists() {
            let bytes = std::fs::read(path)?;
            if bytes.len() != KEY_LENGTH {
                return Err(CryptoError::BadKeyLength {
                    expected: KEY_LENGTH,
                    actual: bytes.len(),
                });
            }
            let mut key_bytes = [0u8; KEY_LENGTH];
            key_bytes.copy_from_slice(&bytes);
            return Ok(Self { key_bytes });
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let key = Self::generate();
        std::fs::write(path, key.key_bytes)?;
        restrict_permissions(path)?;
        tracing::info!(path = %path.display(), "Encryption key generated");
        Ok(key)
    }

    /// Encrypt data using AES-256-GCM
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedData, CryptoError> {
        EncryptedData::encrypt(&self.key_bytes, plaintext)
    }

    /// Decrypt data using AES-256-GCM
    pub fn decrypt(&self, encrypted: &EncryptedData) -> Result<Vec<u8>, CryptoError> {
        encrypted.decrypt(&self.key_bytes)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), CryptoError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), CryptoError> {
    Ok(())
}
