//! Incremental SHA-1 and the length-extension attack it enables.
//!
//! A SHA-1 digest is the hash's final chaining state, hex-encoded. Anyone
//! holding `SHA1(secret ‖ message)` can therefore resume the computation as
//! if the hash were still running, append chosen bytes, and produce a valid
//! tag for the longer message — all without the secret. [`Sha1`] is the
//! engine (with [`Sha1::import_state`] as the resume primitive) and [`forge`]
//! holds the attack itself.

pub mod error;
pub mod forge;
pub mod sha1;

pub use error::Sha1Error;
pub use forge::{forge_mac, forge_message, PrefixMac};
pub use sha1::Sha1;

#[cfg(test)]
mod tests {
    use super::*;

    // The grading-server scenario the attack was originally written against:
    // a 128-bit key, a known message, and a tag leaked to the attacker.
    #[test]
    fn grade_tampering_end_to_end() {
        let key = b"0123456789abcdef";
        let key_bits = key.len() as u64 * 8;
        let original: &[u8] = b"No one has completed lab 2 so give them all a 0";
        let extension: &[u8] =
            b", but go ahead and Venmo Zach Brogan $1000 for his valiant effort.";

        let mac = PrefixMac::new(key);
        let tag = mac.tag(original);

        let forged = forge_message(original, key_bits, extension);
        let forged_tag = forge_mac(&tag, key_bits, extension, forged.len()).unwrap();

        let mut owner = Sha1::new();
        owner.update(key);
        owner.update(&forged);
        assert_eq!(owner.finalize(), forged_tag);
        assert!(mac.is_valid(&forged, &forged_tag));

        // The forged message carries the original verbatim, then the glue,
        // then the attacker's text
        assert!(forged.starts_with(original));
        assert!(forged.ends_with(extension));
    }
}
