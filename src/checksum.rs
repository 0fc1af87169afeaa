//! SHA-1 trailer digest.
//!
//! PBO archives conventionally end with `0x00` followed by the SHA-1 of
//! everything before it. Pass [`sha1_digest`] as the digest function to
//! [`ArchiveCodec::write`](crate::ArchiveCodec::write) to produce that trailer.

use sha1::{Digest, Sha1};

/// SHA-1 digest length in bytes.
pub const SHA1_LEN: usize = 20;

/// SHA-1 of `data`.
pub fn sha1_digest(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}
