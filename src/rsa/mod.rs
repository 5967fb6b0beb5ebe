// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod block;
pub mod decrypt;
pub mod encrypt;
pub mod keyfile;
pub mod keygen;
pub mod randstate;

pub use bigint::{gcd, is_prime, make_prime, mod_inverse, pow_mod, RsaBigInt};
pub use decrypt::{decrypt, decrypt_bytes, decrypt_file, decrypt_to_string, sign};
pub use encrypt::{encrypt, encrypt_bytes, encrypt_file, encrypt_string, verify};
pub use keyfile::{read_priv, read_pub, write_priv, write_pub};
pub use keygen::{
    generate_keypair, make_priv, make_pub, KeygenConfig, PublicParams, RsaKeyPair, RsaPrivateKey,
    RsaPublicKey,
};
pub use randstate::RandState;
