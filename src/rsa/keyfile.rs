// Key File Format
// Public key: n, e, signature as lowercase hex lines, then the owner name.
// Private key: n, d as lowercase hex lines.

use std::io::{BufRead, Write};

use num_traits::One;

use super::bigint::{bit_length, parse_hex, RsaBigInt};
use super::keygen::{RsaPrivateKey, RsaPublicKey};
use crate::error::{Result, RsaError};

/// Write a public key in the four-line text format
pub fn write_pub<W: Write + ?Sized>(key: &RsaPublicKey, out: &mut W) -> Result<()> {
    writeln!(out, "{:x}", key.n)?;
    writeln!(out, "{:x}", key.e)?;
    writeln!(out, "{:x}", key.signature)?;
    writeln!(out, "{}", key.owner)?;
    out.flush()?;
    Ok(())
}

/// Read a public key written by `write_pub`
pub fn read_pub<R: BufRead + ?Sized>(input: &mut R) -> Result<RsaPublicKey> {
    let mut lines = LineReader::new(input);

    let n = lines.next_modulus()?;
    let e = lines.next_hex("public exponent")?;
    let signature = lines.next_hex("signature")?;
    let owner = lines.next_token("owner")?;

    Ok(RsaPublicKey {
        n,
        e,
        signature,
        owner,
    })
}

/// Write a private key in the two-line text format
pub fn write_priv<W: Write + ?Sized>(key: &RsaPrivateKey, out: &mut W) -> Result<()> {
    writeln!(out, "{:x}", key.n)?;
    writeln!(out, "{:x}", key.d)?;
    out.flush()?;
    Ok(())
}

/// Read a private key written by `write_priv`
pub fn read_priv<R: BufRead + ?Sized>(input: &mut R) -> Result<RsaPrivateKey> {
    let mut lines = LineReader::new(input);

    let n = lines.next_modulus()?;
    let d = lines.next_hex("private exponent")?;

    Ok(RsaPrivateKey { n, d })
}

struct LineReader<'a, R: ?Sized> {
    input: &'a mut R,
    line_no: usize,
    buf: String,
}

impl<'a, R: BufRead + ?Sized> LineReader<'a, R> {
    fn new(input: &'a mut R) -> Self {
        Self {
            input,
            line_no: 0,
            buf: String::new(),
        }
    }

    fn next_token(&mut self, field: &'static str) -> Result<String> {
        self.buf.clear();
        self.line_no += 1;

        let read = self.input.read_line(&mut self.buf)?;
        let token = self.buf.trim();
        if read == 0 || token.is_empty() {
            return Err(RsaError::MissingField {
                line: self.line_no,
                field,
            });
        }

        Ok(token.to_string())
    }

    fn next_hex(&mut self, field: &'static str) -> Result<RsaBigInt> {
        let token = self.next_token(field)?;
        parse_hex(token.as_bytes()).ok_or(RsaError::Parse {
            line: self.line_no,
            token,
        })
    }

    // A modulus of 0 or 1 leaves no residues to work with
    fn next_modulus(&mut self) -> Result<RsaBigInt> {
        let n = self.next_hex("modulus")?;
        if n <= RsaBigInt::one() {
            return Err(RsaError::InvalidKeySize(bit_length(&n)));
        }
        Ok(n)
    }
}
