//! This module contains all errors that can be returned by functions in this crate.

use std::{io, num};

use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, CodecError>;

/// Everything that can go wrong while decoding or encoding a mesh.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The underlying reader or writer failed, including premature end of input.
    #[error("IO Error: {0}")]
    Io(#[from] io::Error),
    /// The first line did not match any known signature.
    #[error("unknown version")]
    UnknownVersion,
    #[error("unexpected header size: {0}")]
    UnexpectedHeaderSize(u16),
    #[error("unexpected vertex size: {0}")]
    UnexpectedVertexSize(u8),
    #[error("unexpected face size: {0}")]
    UnexpectedFaceSize(u8),
    #[error("failed to parse float: {0}")]
    ParseFloat(#[from] num::ParseFloatError),
    #[error("expected {expected:?}, found {found:?}")]
    UnexpectedChar { expected: char, found: char },
    #[error("invalid face count: {0:?}")]
    InvalidFaceCount(String),
    /// A face references a vertex that does not exist.
    #[error("index out of range: {index} (vertex count {len})")]
    IndexOutOfRange { index: u32, len: usize },
    /// The binary format stores counts as `u32`.
    #[error("too many elements for the binary format: {0}")]
    TooManyElements(usize),
}

/// A [`FormatError`] together with the number of bytes that were read or
/// written before it occurred.
#[derive(Error, Debug)]
#[error("{kind} after {bytes} bytes")]
pub struct CodecError {
    bytes: u64,
    #[source]
    kind: FormatError,
}

impl CodecError {
    pub fn new(kind: FormatError, bytes: u64) -> Self {
        Self { bytes, kind }
    }

    /// Bytes consumed (decode) or written (encode) up to the failure.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn kind(&self) -> &FormatError {
        &self.kind
    }

    pub fn into_kind(self) -> FormatError {
        self.kind
    }
}

