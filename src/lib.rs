//! Textbook RSA from first principles: Miller-Rabin prime generation, key
//! generation with an owner signature, and a line-oriented block-stream
//! codec for encrypting and decrypting files.
//!
//! There is no padding scheme and nothing here is constant time; this is
//! not suitable for protecting real data.

pub mod error;
pub mod rsa;
pub mod util;

pub use error::{Result, RsaError};
