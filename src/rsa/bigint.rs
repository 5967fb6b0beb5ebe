// RSA Big Integer Operations
// Number theory over num-bigint: gcd, modular inverse, modular
// exponentiation, Miller-Rabin and prime generation.

use log::trace;
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use super::randstate::RandState;
use crate::error::{Result, RsaError};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Create a big integer from bytes (big-endian)
pub fn from_bytes(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Convert big integer to bytes (big-endian, minimal length)
pub fn to_bytes(n: &RsaBigInt) -> Vec<u8> {
    n.to_bytes_be()
}

/// Number of significant bits; zero has none
pub fn bit_length(n: &RsaBigInt) -> u64 {
    n.bits()
}

/// Greatest common divisor by the Euclidean algorithm.
/// `gcd(a, 0) == a`.
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    let mut a = a.clone();
    let mut b = b.clone();

    while !b.is_zero() {
        let r = &a % &b;
        a = std::mem::replace(&mut b, r);
    }

    a
}

/// Compute modular inverse: a^(-1) mod n
///
/// Iterative extended Euclid. Returns the representative in `[0, n)`, or
/// `None` when `gcd(a, n) > 1` or `n` is zero.
pub fn mod_inverse(a: &RsaBigInt, n: &RsaBigInt) -> Option<RsaBigInt> {
    if n.is_zero() {
        return None;
    }

    let modulus = BigInt::from_biguint(Sign::Plus, n.clone());
    let mut r = modulus.clone();
    let mut r_next = BigInt::from_biguint(Sign::Plus, a.clone());
    let mut t = BigInt::zero();
    let mut t_next = BigInt::one();

    while !r_next.is_zero() {
        let q = r.div_floor(&r_next);

        let r_new = &r - &q * &r_next;
        r = std::mem::replace(&mut r_next, r_new);

        let t_new = &t - &q * &t_next;
        t = std::mem::replace(&mut t_next, t_new);
    }

    if r > BigInt::one() {
        return None;
    }

    if t.is_negative() {
        t += &modulus;
    }

    t.to_biguint()
}

/// Modular exponentiation: base^exp mod modulus
///
/// Right-to-left square-and-multiply. `exp == 0` yields 1. A modulus of 0
/// or 1 has no non-zero residue and yields 0.
pub fn pow_mod(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_zero() || modulus.is_one() {
        return RsaBigInt::zero();
    }

    // Work on copies; `exp` is unsigned and consumed one low bit per step
    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Parse a bare hex token. Unlike `BigUint::parse_bytes`, only `0-9a-fA-F`
/// are accepted: no sign, no `_` separators, no empty token.
pub fn parse_hex(token: &[u8]) -> Option<RsaBigInt> {
    if token.is_empty() || !token.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    RsaBigInt::parse_bytes(token, 16)
}

/// Miller-Rabin primality test
///
/// Runs `iters` rounds with witnesses drawn from `state`. A composite passes
/// with probability at most `4^-iters`; a prime never fails.
pub fn is_prime(n: &RsaBigInt, iters: u64, state: &mut RandState) -> bool {
    let two = RsaBigInt::from(2u8);

    if n < &two || (n.is_even() && n != &two) {
        return false;
    }
    if n < &RsaBigInt::from(4u8) {
        return true;
    }

    // Write n-1 as 2^s * r with r odd
    let n_minus_one = n - 1u8;
    let mut r = n_minus_one.clone();
    let mut s = 0u64;
    while r.is_even() {
        r >>= 1;
        s += 1;
    }

    let n_minus_two = n - 2u8;

    for _ in 0..iters {
        let a = state.random_between(&two, &n_minus_two);
        let mut y = pow_mod(&a, &r, n);

        if y.is_one() || y == n_minus_one {
            continue;
        }

        let mut j = 1;
        while j < s && y != n_minus_one {
            y = pow_mod(&y, &two, n);
            if y.is_one() {
                return false;
            }
            j += 1;
        }

        if y != n_minus_one {
            return false;
        }
    }

    true
}

/// Draw uniformly random `bits`-bit integers until one passes `is_prime`.
///
/// The top bit is not forced, so the result can be shorter than `bits`.
pub fn make_prime(bits: u64, iters: u64, state: &mut RandState) -> Result<RsaBigInt> {
    // Below two bits the only candidates are 0 and 1
    if bits < 2 {
        return Err(RsaError::InvalidPrimeBits(bits));
    }

    let mut attempts = 0u64;
    loop {
        let candidate = state.random_bits(bits);
        attempts += 1;
        if is_prime(&candidate, iters, state) {
            trace!("found {}-bit prime after {} draws", bits, attempts);
            return Ok(candidate);
        }
    }
}

const BASE62_DIGITS: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Parse a base-62 string (`0-9`, `A-Z`, `a-z` in that order of value).
/// Returns `None` for an empty string or any other character.
pub fn from_base62(s: &str) -> Option<RsaBigInt> {
    if s.is_empty() {
        return None;
    }

    let mut value = RsaBigInt::zero();
    for c in s.bytes() {
        let digit = match c {
            b'0'..=b'9' => c - b'0',
            b'A'..=b'Z' => c - b'A' + 10,
            b'a'..=b'z' => c - b'a' + 36,
            _ => return None,
        };
        value = value * 62u8 + digit;
    }

    Some(value)
}

/// Render a value in base 62, the inverse of `from_base62`
pub fn to_base62(n: &RsaBigInt) -> String {
    if n.is_zero() {
        return "0".to_string();
    }

    let base = RsaBigInt::from(62u8);
    let mut digits = Vec::new();
    let mut n = n.clone();
    while !n.is_zero() {
        let (q, r) = n.div_rem(&base);
        let idx = r.to_u32_digits().first().copied().unwrap_or(0) as usize;
        digits.push(BASE62_DIGITS[idx]);
        n = q;
    }
    digits.reverse();

    String::from_utf8_lossy(&digits).into_owned()
}
