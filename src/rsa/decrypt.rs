// RSA Decryption Implementation
// Raw RSA decryption and signing plus the block-stream file decoder

use std::io::{BufRead, Write};

use log::{debug, trace};

use super::bigint::{parse_hex, pow_mod, RsaBigInt};
use super::block::Block;
use super::keygen::RsaPrivateKey;
use crate::error::{Result, RsaError};

/// m = c^d mod n
pub fn decrypt(c: &RsaBigInt, d: &RsaBigInt, n: &RsaBigInt) -> RsaBigInt {
    pow_mod(c, d, n)
}

/// s = m^d mod n; the same operation as `decrypt` with the key in the signing role
pub fn sign(m: &RsaBigInt, d: &RsaBigInt, n: &RsaBigInt) -> RsaBigInt {
    pow_mod(m, d, n)
}

/// Decrypt a ciphertext stream of one hex integer per line, writing the
/// recovered bytes to `output`.
///
/// Blank lines are skipped. A token that is not hex, a ciphertext not below
/// `n`, or a block without the marker byte aborts with the 1-based line
/// number. Returns the number of blocks decoded.
pub fn decrypt_file<R, W>(input: &mut R, output: &mut W, n: &RsaBigInt, d: &RsaBigInt) -> Result<usize>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let mut blocks = 0usize;

    for (idx, line) in input.split(b'\n').enumerate() {
        let line = line?;
        let line_no = idx + 1;

        let token = line.trim_ascii();
        if token.is_empty() {
            continue;
        }

        let c = parse_hex(token).ok_or_else(|| RsaError::Parse {
            line: line_no,
            token: String::from_utf8_lossy(token).into_owned(),
        })?;
        if &c >= n {
            return Err(RsaError::CiphertextOutOfRange { line: line_no });
        }

        let m = decrypt(&c, d, n);
        let block = Block::from_integer(&m).ok_or(RsaError::BadBlockMarker { line: line_no })?;
        trace!("block {}: {}", blocks, hex::encode(block.payload()));

        output.write_all(block.payload())?;
        blocks += 1;
    }

    output.flush()?;
    debug!("decrypted {} blocks", blocks);
    Ok(blocks)
}

/// Decrypt an in-memory ciphertext stream
pub fn decrypt_bytes(ciphertext: &[u8], private_key: &RsaPrivateKey) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut input = ciphertext;
    private_key.decrypt_file(&mut input, &mut output)?;
    Ok(output)
}

/// Decrypt ciphertext to a string
pub fn decrypt_to_string(ciphertext: &[u8], private_key: &RsaPrivateKey) -> Result<String> {
    let plaintext = decrypt_bytes(ciphertext, private_key)?;
    Ok(String::from_utf8_lossy(&plaintext).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use crate::rsa::block::payload_capacity;
    use crate::rsa::encrypt::{encrypt, encrypt_bytes, verify};
    use crate::rsa::keygen::{generate_keypair, KeygenConfig, RsaKeyPair};

    fn test_keypair(seed: u64) -> RsaKeyPair {
        let config = KeygenConfig::default().with_bits(128).with_iters(20).with_seed(seed);
        generate_keypair(&config, "alice", &mut config.rand_state()).unwrap()
    }

    fn test_roundtrip(keypair: &RsaKeyPair, message: &[u8]) {
        let ciphertext = encrypt_bytes(message, &keypair.public_key).unwrap();
        let decrypted = decrypt_bytes(&ciphertext, &keypair.private_key).unwrap();
        assert_eq!(message, decrypted.as_slice());
    }

    #[test]
    fn test_decrypt_textbook() {
        let m = decrypt(&from_u64(2790), &from_u64(2753), &from_u64(3233));
        assert_eq!(m, from_u64(65));
    }

    #[test]
    fn test_sign_verify() {
        let keypair = test_keypair(41);
        let (public_key, private_key) = (&keypair.public_key, &keypair.private_key);

        let m = from_u64(0x1234_5678);
        let s = sign(&m, &private_key.d, &private_key.n);
        assert!(verify(&m, &s, &public_key.e, &public_key.n));
        assert!(!verify(&from_u64(0x1234_5679), &s, &public_key.e, &public_key.n));
    }

    #[test]
    fn test_decrypt_string() {
        let keypair = test_keypair(42);
        let message = "Test message for RSA decryption";

        let ciphertext = encrypt_bytes(message.as_bytes(), &keypair.public_key).unwrap();
        let decrypted = decrypt_to_string(&ciphertext, &keypair.private_key).unwrap();

        assert_eq!(message, decrypted);
    }

    #[test]
    fn test_roundtrip_various_sizes() {
        let keypair = test_keypair(43);
        let capacity = payload_capacity(&keypair.public_key.n).unwrap();

        let test_cases: Vec<Vec<u8>> = vec![
            Vec::new(),
            b"A".to_vec(),
            vec![0u8],
            vec![0x00, 0x01, 0x02],
            vec![0u8; capacity],
            vec![0xffu8; capacity],
            vec![0x5au8; capacity + 1],
            (0..=255u8).collect(),
            b"Hello, World!\n\n".to_vec(),
        ];

        for message in test_cases {
            test_roundtrip(&keypair, &message);
        }
    }

    #[test]
    fn test_decrypt_tolerates_crlf_and_blank_lines() {
        let keypair = test_keypair(44);
        let ciphertext = encrypt_bytes(b"crlf", &keypair.public_key).unwrap();
        let text = String::from_utf8(ciphertext).unwrap().replace('\n', "\r\n");
        let padded = format!("\n{}\n", text);

        let decrypted = decrypt_bytes(padded.as_bytes(), &keypair.private_key).unwrap();
        assert_eq!(decrypted, b"crlf");
    }

    #[test]
    fn test_decrypt_bad_token() {
        let keypair = test_keypair(45);
        let mut ciphertext = encrypt_bytes(b"abc", &keypair.public_key).unwrap();
        ciphertext.extend_from_slice(b"not-hex\n");

        let result = decrypt_bytes(&ciphertext, &keypair.private_key);
        match result {
            Err(RsaError::Parse { line, token }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "not-hex");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_decrypt_rejects_separators() {
        let keypair = test_keypair(50);

        for token in ["a_e6", "+ae6"] {
            let stream = format!("{}\n", token);
            match decrypt_bytes(stream.as_bytes(), &keypair.private_key) {
                Err(RsaError::Parse { line, token: t }) => {
                    assert_eq!(line, 1);
                    assert_eq!(t, token);
                }
                other => panic!("unexpected result for {}: {:?}", token, other),
            }
        }
    }

    #[test]
    fn test_decrypt_zero_modulus() {
        let key = RsaPrivateKey {
            n: from_u64(0),
            d: from_u64(2753),
        };
        let result = decrypt_bytes(b"ae6\n", &key);
        assert!(matches!(
            result,
            Err(RsaError::CiphertextOutOfRange { line: 1 })
        ));
        assert_eq!(sign(&from_u64(65), &key.d, &key.n), from_u64(0));
    }

    #[test]
    fn test_decrypt_out_of_range() {
        let keypair = test_keypair(46);
        let token = format!("{:x}\n", &keypair.private_key.n + 1u8);

        let result = decrypt_bytes(token.as_bytes(), &keypair.private_key);
        assert!(matches!(
            result,
            Err(RsaError::CiphertextOutOfRange { line: 1 })
        ));
    }

    #[test]
    fn test_decrypt_missing_marker() {
        let keypair = test_keypair(47);
        // A value encrypted without the marker byte
        let c = encrypt(&from_u64(0x0102), &keypair.public_key.e, &keypair.public_key.n);
        let token = format!("{:x}\n", c);

        let result = decrypt_bytes(token.as_bytes(), &keypair.private_key);
        assert!(matches!(result, Err(RsaError::BadBlockMarker { line: 1 })));
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let keypair1 = test_keypair(48);
        let keypair2 = test_keypair(49);

        let message = vec![0x42u8; 64];
        let ciphertext = encrypt_bytes(&message, &keypair1.public_key).unwrap();

        match decrypt_bytes(&ciphertext, &keypair2.private_key) {
            Ok(plaintext) => assert_ne!(plaintext, message),
            Err(_) => {}
        }
    }
}
