// Block Framing
// Maps plaintext chunks to integers below the modulus and back. Each block
// carries a leading marker byte so leading zero bytes in the payload
// survive the integer conversion.

use std::io::{self, ErrorKind, Read};

use super::bigint::{bit_length, from_bytes, to_bytes, RsaBigInt};
use crate::error::{Result, RsaError};

/// Leading byte of every framed block
pub const MARKER: u8 = 0xFF;

/// One plaintext block: the marker plus up to `k - 1` payload bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    marker: u8,
    payload: Vec<u8>,
}

impl Block {
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            marker: MARKER,
            payload,
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Big-endian integer of `marker || payload`
    pub fn to_integer(&self) -> RsaBigInt {
        let mut framed = Vec::with_capacity(self.payload.len() + 1);
        framed.push(self.marker);
        framed.extend_from_slice(&self.payload);
        from_bytes(&framed)
    }

    /// Split a decrypted integer back into marker and payload.
    /// Returns `None` when the leading byte is not the marker.
    pub fn from_integer(m: &RsaBigInt) -> Option<Self> {
        let bytes = to_bytes(m);
        match bytes.split_first() {
            Some((&MARKER, payload)) => Some(Self::new(payload.to_vec())),
            _ => None,
        }
    }
}

/// Block size `k = floor((bitlen(n) - 1) / 8)`
pub fn block_size(n: &RsaBigInt) -> usize {
    (bit_length(n).saturating_sub(1) / 8) as usize
}

/// Payload bytes per block (`k - 1`); the modulus must leave room for at
/// least one byte after the marker.
pub fn payload_capacity(n: &RsaBigInt) -> Result<usize> {
    let k = block_size(n);
    if k < 2 {
        return Err(RsaError::InvalidKeySize(bit_length(n)));
    }
    Ok(k - 1)
}

/// Read up to `capacity` bytes, stopping early only at end of stream.
/// Returns `None` when the stream is already exhausted.
pub fn read_block<R: Read + ?Sized>(reader: &mut R, capacity: usize) -> io::Result<Option<Block>> {
    let mut payload = vec![0u8; capacity];
    let mut filled = 0;

    while filled < capacity {
        match reader.read(&mut payload[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    if filled == 0 {
        return Ok(None);
    }

    payload.truncate(filled);
    Ok(Some(Block::new(payload)))
}
