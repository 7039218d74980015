pub mod encryption;
pub mod keys;

pub use encryption::*;
pub use keys::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Integrity check failed: ciphertext tampered with or wrong key")]
    Integrity,

    #[error("Corrupted ciphertext framing")]
    CorruptedData,

    #[error("Key file has wrong length: expected {expected} bytes, got {actual}")]
    BadKeyLength { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
