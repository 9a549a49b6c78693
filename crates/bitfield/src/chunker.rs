//! Splits a byte stream into fixed-width [Bitfield] chunks.
//!
//! The whole source is decoded as one little-endian unsigned integer, so the
//! first chunk holds the low bits of the first byte. Chunks are cut off the
//! bottom of that integer until nothing but zeros remains; the last chunk is
//! zero-padded to the full width. Trailing zero bytes produce no chunks.

use std::{io::Read, iter::FusedIterator};

use num::{BigInt, bigint::Sign};

use crate::{errors::ChunkError, field::Bitfield};

/// Reads all of `source` and returns the chunk sequence over it.
///
/// ```
/// let chunks: Vec<_> = bitfield::chunk(&[0xABu8][..], 4).unwrap().collect();
/// assert_eq!(chunks, vec![0b1011, 0b1010]);
/// assert!(chunks.iter().all(|chunk| chunk.len() == 4));
/// ```
pub fn chunk<R: Read>(mut source: R, chunk_width: usize) -> Result<Chunks, ChunkError> {
    if chunk_width == 0 {
        return Err(ChunkError::ZeroWidth);
    }

    let mut bytes = Vec::new();
    source.read_to_end(&mut bytes)?;

    Chunks::from_bytes(&bytes, chunk_width)
}

/// Lazy, forward-only sequence of `chunk_width`-bit fields.
#[derive(Debug, Clone)]
pub struct Chunks {
    data: Bitfield,
    chunk_width: usize,
}

impl Chunks {
    pub fn from_bytes(bytes: &[u8], chunk_width: usize) -> Result<Self, ChunkError> {
        if chunk_width == 0 {
            return Err(ChunkError::ZeroWidth);
        }

        let data = Bitfield::new(BigInt::from_bytes_le(Sign::Plus, bytes));
        log::debug!(
            "decoded {} bytes ({} significant bits) into {}-bit chunks",
            bytes.len(),
            data.len(),
            chunk_width
        );

        Ok(Chunks { data, chunk_width })
    }

    pub fn chunk_width(&self) -> usize {
        self.chunk_width
    }

    /// Significant bits not yet handed out.
    pub fn remaining_bits(&self) -> usize {
        self.data.len()
    }
}

impl Iterator for Chunks {
    type Item = Bitfield;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.is_zero() {
            return None;
        }

        // The tail may be shorter than a chunk; the width pads it back out.
        let stop = self.chunk_width.min(self.data.len()) as isize;
        let mut chunk = self.data.get(..stop).ok()?;
        chunk.set_width(Some(self.chunk_width));
        self.data >>= self.chunk_width;

        log::trace!("chunk {:#x}, {} bits left", chunk, self.data.len());
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.data.len().div_ceil(self.chunk_width);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Chunks {}

impl FusedIterator for Chunks {}
