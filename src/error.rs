/// Contract violations on the hash engine's state-import path.
///
/// Everything else the engine does is total over well-formed input, so these
/// are the only typed failures; I/O problems surface as `anyhow` errors on
/// the stream and file paths.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Sha1Error {
    #[error("digest must be exactly 40 hex characters")]
    InvalidDigestFormat,

    #[error("state can only be imported into a fresh engine")]
    InvalidState,
}
