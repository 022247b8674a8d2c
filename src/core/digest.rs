//! Content digests using SHA-256 hashing

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Length of a content digest in bytes
pub const DIGEST_LEN: usize = 32;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Fixed-length digest of a file's full content
///
/// Equality is byte-wise. Hex encoding is only produced on request, for
/// serialized output.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest([u8; DIGEST_LEN]);

impl ContentDigest {
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hexadecimal representation
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", self.to_hex())
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Compute the digest of everything `reader` yields until end of stream
///
/// Interrupted reads are retried; any other read error fails the digest
/// rather than producing a digest of a truncated stream.
pub fn digest_reader<R: Read>(mut reader: R) -> io::Result<ContentDigest> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(ContentDigest(hasher.finalize().into()))
}

/// Compute the content digest of a file
///
/// # Arguments
/// * `path` - Path to a regular file
///
/// # Returns
/// The digest of the file's complete content. The handle is closed before
/// this returns.
pub fn compute_file_digest(path: &Path) -> io::Result<ContentDigest> {
    let file = File::open(path)?;
    let digest = digest_reader(file)?;
    log::trace!("digested {} -> {}", path.display(), digest);
    Ok(digest)
}
