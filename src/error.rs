// Error types shared by the RSA core and the file layer

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RsaError {
    #[error("cannot open `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("stream error: {0}")]
    Stream(#[from] io::Error),

    #[error("invalid hex token `{token}` on line {line}")]
    Parse { line: usize, token: String },

    #[error("missing {field} on line {line}")]
    MissingField { line: usize, field: &'static str },

    #[error("owner `{0}` is not a base-62 string")]
    InvalidOwner(String),

    #[error("owner value does not fit below the modulus")]
    OwnerTooLarge,

    #[error("key size of {0} bits is too small")]
    InvalidKeySize(u64),

    #[error("Miller-Rabin needs at least one round, got {0}")]
    InvalidIterations(u64),

    #[error("cannot draw a prime of {0} bits")]
    InvalidPrimeBits(u64),

    #[error("no modular inverse exists")]
    NoInverse,

    #[error("signature verification failed for `{owner}`")]
    VerificationFailed { owner: String },

    #[error("block on line {line} does not start with the marker byte")]
    BadBlockMarker { line: usize },

    #[error("ciphertext on line {line} is not below the modulus")]
    CiphertextOutOfRange { line: usize },
}

pub type Result<T> = std::result::Result<T, RsaError>;
