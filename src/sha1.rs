use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::Sha1Error;

const BLOCK_BYTES: usize = 64;
const BLOCK_WORDS: usize = 16;
const LENGTH_BYTES: usize = 8;

const INITIAL_STATE: [u32; 5] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476, 0xc3d2e1f0];

/// Incremental SHA-1.
///
/// The digest this produces is nothing more than the hex rendering of the
/// final chaining state, which is exactly why [`Sha1::import_state`] can turn
/// a finished digest back into a live engine. `finalize` resets the instance,
/// so one engine can be reused for any number of independent hashes.
#[derive(Clone)]
pub struct Sha1 {
    state: [u32; 5],
    buffer: Vec<u8>,
    blocks: u64,
}

impl Default for Sha1 {
    fn default() -> Self {
        Sha1 {
            state: INITIAL_STATE,
            buffer: vec![],
            blocks: 0,
        }
    }
}

fn to_block(chunk: &[u8]) -> [u32; BLOCK_WORDS] {
    let mut block = [0u32; BLOCK_WORDS];
    for (word, bytes) in block.iter_mut().zip(chunk.chunks_exact(4)) {
        *word = (bytes[0] as u32) << 24
            | (bytes[1] as u32) << 16
            | (bytes[2] as u32) << 8
            | bytes[3] as u32;
    }
    block
}

impl Sha1 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return to the fixed initialization constants with nothing buffered.
    pub fn reset(&mut self) {
        self.state = INITIAL_STATE;
        self.buffer.clear();
        self.blocks = 0;
    }

    /// Replace the chaining state with a previously produced digest, so that
    /// further updates continue the hash that digest ended.
    ///
    /// This deliberately breaks the one-way fiction of a digest and exists
    /// only for the length-extension path; ordinary hashing never needs it.
    /// It is legal only on a fresh (or just-reset, or just-finalized) engine.
    pub fn import_state(&mut self, digest: &str) -> std::result::Result<(), Sha1Error> {
        if !self.buffer.is_empty() || self.blocks != 0 {
            return Err(Sha1Error::InvalidState);
        }
        if digest.len() != 40 {
            return Err(Sha1Error::InvalidDigestFormat);
        }
        let raw = hex::decode(digest).map_err(|_| Sha1Error::InvalidDigestFormat)?;
        for (word, bytes) in self.state.iter_mut().zip(raw.chunks_exact(4)) {
            *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }
        Ok(())
    }

    pub fn update(&mut self, input: &[u8]) {
        let mut input = input;
        if !self.buffer.is_empty() {
            let wanted = BLOCK_BYTES - self.buffer.len();
            let taken = wanted.min(input.len());
            self.buffer.extend_from_slice(&input[..taken]);
            input = &input[taken..];
            if self.buffer.len() < BLOCK_BYTES {
                return;
            }
            let block = to_block(&self.buffer);
            self.compress(block);
            self.buffer.clear();
        }
        let mut chunks = input.chunks_exact(BLOCK_BYTES);
        for chunk in &mut chunks {
            let block = to_block(chunk);
            self.compress(block);
        }
        self.buffer.extend_from_slice(chunks.remainder());
    }

    /// Drain a byte source to exhaustion, feeding it through [`Sha1::update`].
    pub fn update_from(&mut self, reader: &mut impl Read) -> Result<()> {
        let mut chunk = [0u8; 4096];
        loop {
            let read = reader.read(&mut chunk).context("Could not read stream")?;
            if read == 0 {
                return Ok(());
            }
            self.update(&chunk[..read]);
        }
    }

    pub fn finalize(&mut self) -> String {
        let total_bits = (self.blocks * BLOCK_BYTES as u64 + self.buffer.len() as u64) * 8;
        self.finalize_with_length(total_bits)
    }

    /// Pad, run the last transform(s), and render the digest.
    ///
    /// `total_bits` is the length that gets embedded in the padding. Callers
    /// hashing normally derive it via [`Sha1::finalize`]; the forgery path
    /// supplies a larger value to account for bytes it never hashed.
    pub fn finalize_with_length(&mut self, total_bits: u64) -> String {
        self.buffer.push(0x80);
        if self.buffer.len() > BLOCK_BYTES - LENGTH_BYTES {
            // No room left for the length field in this block
            self.buffer.resize(BLOCK_BYTES, 0x00);
            let block = to_block(&self.buffer);
            self.compress(block);
            self.buffer.clear();
        }
        self.buffer.resize(BLOCK_BYTES - LENGTH_BYTES, 0x00);
        self.buffer.extend_from_slice(&total_bits.to_be_bytes());
        let block = to_block(&self.buffer);
        self.compress(block);

        let mut raw = Vec::with_capacity(20);
        for word in &self.state {
            raw.extend_from_slice(&word.to_be_bytes());
        }
        self.reset();
        hex::encode(raw)
    }

    /// Hash a file's contents. The handle is scoped to this call and released
    /// on every exit path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<String> {
        let file = File::open(path.as_ref()).context("Could not open file")?;
        let mut reader = BufReader::new(file);
        let mut hash = Sha1::new();
        hash.update_from(&mut reader)?;
        Ok(hash.finalize())
    }

    fn compress(&mut self, mut w: [u32; BLOCK_WORDS]) {
        let mut a = self.state[0];
        let mut b = self.state[1];
        let mut c = self.state[2];
        let mut d = self.state[3];
        let mut e = self.state[4];

        for i in 0..80 {
            if i >= 16 {
                // Message schedule, expanded in place over the 16-word block
                w[i & 15] =
                    (w[(i + 13) & 15] ^ w[(i + 8) & 15] ^ w[(i + 2) & 15] ^ w[i & 15]).rotate_left(1);
            }
            let (f, k) = match i {
                0..=19 => ((b & c) | (!b & d), 0x5a827999),
                20..=39 => (b ^ c ^ d, 0x6ed9eba1),
                40..=59 => ((b & c) | (b & d) | (c & d), 0x8f1bbcdc),
                _ => (b ^ c ^ d, 0xca62c1d6),
            };
            let temp = a
                .rotate_left(5)
                .wrapping_add(f)
                .wrapping_add(e)
                .wrapping_add(k)
                .wrapping_add(w[i & 15]);
            e = d;
            d = c;
            c = b.rotate_left(30);
            b = a;
            a = temp;
        }

        self.state[0] = self.state[0].wrapping_add(a);
        self.state[1] = self.state[1].wrapping_add(b);
        self.state[2] = self.state[2].wrapping_add(c);
        self.state[3] = self.state[3].wrapping_add(d);
        self.state[4] = self.state[4].wrapping_add(e);
        self.blocks += 1;
    }
}
