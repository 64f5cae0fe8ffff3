//! The Noise HKDF (Noise spec Section 4.3).
//!
//! `HKDF(ck, ikm, n)` with `n` outputs is RFC 5869 extract with `salt = ck`
//! followed by expand with empty `info` to `n * HASH_LEN` bytes, each block
//! being one output. Built on [`hkdf::SimpleHkdf`] so it works with hashes
//! such as BLAKE2 that don't expose a block-level core.

use hkdf::SimpleHkdf;
use sha2::digest::Digest;
use sha2::digest::core_api::BlockSizeUser;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Two zeroized HKDF output blocks.
pub type KdfOutput2 = (Zeroizing<Vec<u8>>, Zeroizing<Vec<u8>>);

/// Three zeroized HKDF output blocks.
pub type KdfOutput3 = (
    Zeroizing<Vec<u8>>,
    Zeroizing<Vec<u8>>,
    Zeroizing<Vec<u8>>,
);

/// HKDF with 2 output blocks, used by `MixKey` and `Split`.
pub fn hkdf2<D>(chaining_key: &[u8], input_key_material: &[u8]) -> Result<KdfOutput2>
where
    D: Digest + BlockSizeUser + Clone,
{
    let len = <D as Digest>::output_size();
    let okm = expand::<D>(chaining_key, input_key_material, 2)?;
    Ok((block(&okm, len, 0), block(&okm, len, 1)))
}

/// HKDF with 3 output blocks, used by `MixKeyAndHash`.
pub fn hkdf3<D>(chaining_key: &[u8], input_key_material: &[u8]) -> Result<KdfOutput3>
where
    D: Digest + BlockSizeUser + Clone,
{
    let len = <D as Digest>::output_size();
    let okm = expand::<D>(chaining_key, input_key_material, 3)?;
    Ok((block(&okm, len, 0), block(&okm, len, 1), block(&okm, len, 2)))
}

fn expand<D>(
    chaining_key: &[u8],
    input_key_material: &[u8],
    blocks: usize,
) -> Result<Zeroizing<Vec<u8>>>
where
    D: Digest + BlockSizeUser + Clone,
{
    let hk = SimpleHkdf::<D>::new(Some(chaining_key), input_key_material);
    let mut okm = Zeroizing::new(vec![0u8; <D as Digest>::output_size() * blocks]);
    hk.expand(&[], &mut okm)
        .map_err(|_| Error::InvariantViolation("hkdf output length out of range"))?;
    Ok(okm)
}

fn block(okm: &[u8], len: usize, index: usize) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(okm[index * len..(index + 1) * len].to_vec())
}
