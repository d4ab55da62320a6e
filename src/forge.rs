use crate::error::Sha1Error;
use crate::sha1::Sha1;

const BLOCK_BITS: u64 = 512;
const LENGTH_FIELD_BITS: u64 = 64;

/// The padding a keyed SHA-1 computation would have appended to
/// `secret ‖ message`: a 0x80 marker, zeros up to 448 mod 512, then the
/// 64-bit big-endian bit length. Only the secret's *length* matters, never
/// its content.
pub fn glue_padding(message_len: usize, key_bits: u64) -> Vec<u8> {
    let total_bits = message_len as u64 * 8 + key_bits;
    let mut padding = vec![0x80u8];
    while (total_bits + padding.len() as u64 * 8) % BLOCK_BITS != BLOCK_BITS - LENGTH_FIELD_BITS {
        padding.push(0x00);
    }
    padding.extend_from_slice(&total_bits.to_be_bytes());
    padding
}

/// Build `original ‖ gluePadding ‖ extension` — the message the forged MAC
/// will verify against. Pure construction; no hashing happens here.
pub fn forge_message(original: &[u8], key_bits: u64, extension: &[u8]) -> Vec<u8> {
    let mut forged = original.to_owned();
    forged.extend_from_slice(&glue_padding(original.len(), key_bits));
    forged.extend_from_slice(extension);
    forged
}

/// Forge a MAC for [`forge_message`]'s output without knowing the secret.
///
/// The leaked MAC *is* the chaining state after `secret ‖ original ‖ glue`,
/// so resuming from it and hashing only the extension — with the total bit
/// length the real owner would embed — reproduces `SHA1(secret ‖ forged)`.
/// `forged_len` is the forged message's length in bytes.
pub fn forge_mac(
    original_mac: &str,
    key_bits: u64,
    extension: &[u8],
    forged_len: usize,
) -> Result<String, Sha1Error> {
    let mut hash = Sha1::new();
    hash.import_state(original_mac)?;
    hash.update(extension);
    Ok(hash.finalize_with_length(forged_len as u64 * 8 + key_bits))
}

/// `tag = SHA1(key ‖ message)` — the construction this crate's forgery
/// defeats. It is kept here as the owner's side of the demonstration; it is
/// not an HMAC and offers none of HMAC's extension resistance.
pub struct PrefixMac {
    key: Vec<u8>,
}

impl PrefixMac {
    pub fn new(key: &[u8]) -> Self {
        Self { key: key.to_owned() }
    }

    pub fn tag(&self, message: &[u8]) -> String {
        let mut hash = Sha1::new();
        hash.update(&self.key);
        hash.update(message);
        hash.finalize()
    }

    pub fn is_valid(&self, message: &[u8], tag: &str) -> bool {
        // Yes, this next line is not constant time
        self.tag(message) == tag
    }
}
