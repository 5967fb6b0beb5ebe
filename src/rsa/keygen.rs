// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use std::io::{BufRead, Read, Write};

use log::{debug, warn};
use num_traits::One;

use super::bigint::{bit_length, from_base62, gcd, make_prime, mod_inverse, RsaBigInt};
use super::decrypt::{decrypt_file, sign};
use super::encrypt::{encrypt_file, verify};
use super::randstate::{clock_seed, RandState};
use crate::error::{Result, RsaError};

/// Smallest modulus size accepted by `KeygenConfig::validate`
pub const MIN_KEY_BITS: u64 = 32;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq)]
pub struct RsaPublicKey {
    pub n: RsaBigInt,         // Modulus
    pub e: RsaBigInt,         // Public exponent
    pub signature: RsaBigInt, // Owner signed with the private exponent
    pub owner: String,
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq)]
pub struct RsaPrivateKey {
    pub n: RsaBigInt, // Modulus (same as public)
    pub d: RsaBigInt, // Private exponent
}

/// Output of `make_pub`: the primes are kept only long enough to derive `d`
#[derive(Debug, Clone)]
pub struct PublicParams {
    pub p: RsaBigInt,
    pub q: RsaBigInt,
    pub n: RsaBigInt,
    pub e: RsaBigInt,
}

/// RSA Key Pair (both public and private keys)
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
    // Ephemeral primes, never written to a key file
    pub p: RsaBigInt,
    pub q: RsaBigInt,
}

/// Parameters for a key generation run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeygenConfig {
    /// Minimum bit length of the modulus
    pub bits: u64,
    /// Miller-Rabin rounds per candidate
    pub iters: u64,
    /// Fixed seed; the wall clock is used when absent
    pub seed: Option<u64>,
}

impl Default for KeygenConfig {
    fn default() -> Self {
        Self {
            bits: 256,
            iters: 50,
            seed: None,
        }
    }
}

impl KeygenConfig {
    pub fn with_bits(mut self, bits: u64) -> Self {
        self.bits = bits;
        self
    }

    pub fn with_iters(mut self, iters: u64) -> Self {
        self.iters = iters;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.bits < MIN_KEY_BITS {
            return Err(RsaError::InvalidKeySize(self.bits));
        }
        if self.iters == 0 {
            return Err(RsaError::InvalidIterations(self.iters));
        }
        Ok(())
    }

    /// Random state for this run, seeded from `seed` or the clock
    pub fn rand_state(&self) -> RandState {
        RandState::new(self.seed.unwrap_or_else(clock_seed))
    }
}

impl RsaPublicKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        bit_length(&self.n)
    }

    /// Numeric value of the owner name (base 62)
    pub fn owner_value(&self) -> Result<RsaBigInt> {
        from_base62(&self.owner).ok_or_else(|| RsaError::InvalidOwner(self.owner.clone()))
    }

    /// Check the embedded signature against the owner name
    pub fn verify_owner(&self) -> Result<()> {
        let m = self.owner_value()?;
        if verify(&m, &self.signature, &self.e, &self.n) {
            Ok(())
        } else {
            Err(RsaError::VerificationFailed {
                owner: self.owner.clone(),
            })
        }
    }

    /// Encrypt a byte stream into a ciphertext stream.
    /// Returns the number of blocks written.
    pub fn encrypt_file<R: Read, W: Write>(&self, input: &mut R, output: &mut W) -> Result<usize> {
        encrypt_file(input, output, &self.n, &self.e)
    }
}

impl RsaPrivateKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        bit_length(&self.n)
    }

    /// Decrypt a ciphertext stream back into bytes.
    /// Returns the number of blocks read.
    pub fn decrypt_file<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> Result<usize> {
        decrypt_file(input, output, &self.n, &self.d)
    }
}

impl RsaKeyPair {
    /// Get the bit length of the key
    pub fn bit_length(&self) -> u64 {
        self.public_key.bit_length()
    }
}

/// Draw `p`, `q`, `n` and a public exponent `e` coprime with the totient.
///
/// The `nbits` split between `p` and `q` is random within
/// `[nbits/4, 3*nbits/4]`, and the whole draw is repeated until `n` has at
/// least `nbits` bits.
pub fn make_pub(nbits: u64, iters: u64, state: &mut RandState) -> Result<PublicParams> {
    let lower = nbits / 4;
    let upper = (3 * nbits) / 4;
    if lower < 2 {
        return Err(RsaError::InvalidKeySize(nbits));
    }

    let mut rounds = 0u64;
    let (p, q, n) = loop {
        rounds += 1;
        let pbits = state.random_u64_between(lower, upper);
        let qbits = nbits - pbits;

        let p = make_prime(pbits, iters, state)?;
        let q = make_prime(qbits, iters, state)?;
        let n = &p * &q;

        if p != q && bit_length(&n) >= nbits {
            debug!(
                "split {} bits as p={} q={} after {} rounds",
                nbits, pbits, qbits, rounds
            );
            break (p, q, n);
        }
    };

    let phi = totient(&p, &q);
    let e = make_exponent(nbits, &phi, state);

    Ok(PublicParams { p, q, n, e })
}

/// Private exponent `d = e^-1 mod (p-1)(q-1)`
pub fn make_priv(e: &RsaBigInt, p: &RsaBigInt, q: &RsaBigInt) -> Result<RsaBigInt> {
    mod_inverse(e, &totient(p, q)).ok_or(RsaError::NoInverse)
}

/// Generate a complete key pair and sign `owner` with it
pub fn generate_keypair(
    config: &KeygenConfig,
    owner: &str,
    state: &mut RandState,
) -> Result<RsaKeyPair> {
    config.validate()?;
    let owner_value = from_base62(owner).ok_or_else(|| RsaError::InvalidOwner(owner.to_string()))?;

    let mut params = make_pub(config.bits, config.iters, state)?;

    let d = loop {
        match make_priv(&params.e, &params.p, &params.q) {
            Ok(d) => break d,
            Err(RsaError::NoInverse) => {
                warn!("public exponent has no inverse, drawing another");
                let phi = totient(&params.p, &params.q);
                params.e = make_exponent(config.bits, &phi, state);
            }
            Err(e) => return Err(e),
        }
    };

    if owner_value >= params.n {
        return Err(RsaError::OwnerTooLarge);
    }
    let signature = sign(&owner_value, &d, &params.n);

    let PublicParams { p, q, n, e } = params;

    Ok(RsaKeyPair {
        public_key: RsaPublicKey {
            n: n.clone(),
            e,
            signature,
            owner: owner.to_string(),
        },
        private_key: RsaPrivateKey { n, d },
        p,
        q,
    })
}

fn totient(p: &RsaBigInt, q: &RsaBigInt) -> RsaBigInt {
    (p - 1u8) * (q - 1u8)
}

// Random `nbits`-bit exponent, greater than one and coprime with phi
fn make_exponent(nbits: u64, phi: &RsaBigInt, state: &mut RandState) -> RsaBigInt {
    let mut attempts = 0u64;
    loop {
        attempts += 1;
        let e = state.random_bits(nbits);
        if e > RsaBigInt::one() && gcd(&e, phi).is_one() {
            debug!("public exponent found after {} draws", attempts);
            return e;
        }
    }
}
