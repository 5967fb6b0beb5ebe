// RSA Encryption Implementation
// Raw RSA on single blocks plus the block-stream file encoder

use std::io::{Read, Write};

use log::{debug, trace};

use super::bigint::{pow_mod, RsaBigInt};
use super::block::{payload_capacity, read_block};
use super::keygen::RsaPublicKey;
use crate::error::Result;

/// c = m^e mod n
pub fn encrypt(m: &RsaBigInt, e: &RsaBigInt, n: &RsaBigInt) -> RsaBigInt {
    pow_mod(m, e, n)
}

/// Accept iff s^e mod n == m
pub fn verify(m: &RsaBigInt, s: &RsaBigInt, e: &RsaBigInt, n: &RsaBigInt) -> bool {
    pow_mod(s, e, n) == *m
}

/// Encrypt `input` block by block, writing one lowercase hex ciphertext per
/// line to `output`.
///
/// Each block holds up to `k - 1` bytes behind the marker byte, where
/// `k = floor((bitlen(n) - 1) / 8)`. Returns the number of blocks written;
/// an empty input writes nothing.
pub fn encrypt_file<R, W>(input: &mut R, output: &mut W, n: &RsaBigInt, e: &RsaBigInt) -> Result<usize>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let capacity = payload_capacity(n)?;
    let mut blocks = 0usize;

    while let Some(block) = read_block(input, capacity)? {
        trace!("block {}: {}", blocks, hex::encode(block.payload()));

        let c = encrypt(&block.to_integer(), e, n);
        writeln!(output, "{:x}", c)?;
        blocks += 1;
    }

    output.flush()?;
    debug!("encrypted {} blocks of up to {} bytes", blocks, capacity);
    Ok(blocks)
}

/// Encrypt bytes in memory; returns the ciphertext stream
pub fn encrypt_bytes(plaintext: &[u8], public_key: &RsaPublicKey) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut input = plaintext;
    public_key.encrypt_file(&mut input, &mut output)?;
    Ok(output)
}

/// Encrypt a string using RSA public key
pub fn encrypt_string(plaintext: &str, public_key: &RsaPublicKey) -> Result<Vec<u8>> {
    encrypt_bytes(plaintext.as_bytes(), public_key)
}
