//! Content hashing. A thin wrapper over `sha2` giving the rest of the crate one hex-encoded
//! checksum function, mirroring the narrow "strong digest" wrappers in the broader ecosystem.
use sha2::{Digest, Sha256};

/// Hex-encode the SHA-256 digest of `bytes`.
///
/// ### Examples
/// ```
/// use patchfs::prelude::*;
///
/// assert_eq!(hash(b""), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
/// ```
pub fn hash(bytes: &[u8]) -> String
{
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
