use super::HashFunction;

/// BLAKE2b-512, 64-byte digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake2b;

impl HashFunction for Blake2b {
    const NAME: &'static str = "BLAKE2b";
    const HASH_LEN: usize = 64;
    type Hasher = blake2::Blake2b512;
}

/// BLAKE2s-256, 32-byte digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake2s;

impl HashFunction for Blake2s {
    const NAME: &'static str = "BLAKE2s";
    const HASH_LEN: usize = 32;
    type Hasher = blake2::Blake2s256;
}

/// SHA-256, 32-byte digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256;

impl HashFunction for Sha256 {
    const NAME: &'static str = "SHA256";
    const HASH_LEN: usize = 32;
    type Hasher = sha2::Sha256;
}

/// SHA-512, 64-byte digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha512;

impl HashFunction for Sha512 {
    const NAME: &'static str = "SHA512";
    const HASH_LEN: usize = 64;
    type Hasher = sha2::Sha512;
}
