//! Partial decompression: reconstruct only the elements a caller asked
//! for, without spawning workers.
//!
//! Deliberately single-threaded: a scattered small read doesn't amortize
//! the cost of standing up a worker team.

use crate::block;
use crate::codecs::Compressor;
use crate::constants::HEADER_LENGTH;
use crate::error::{BloscError, Result};
use crate::header::HeaderView;
use crate::scheduler::block_spans;

/// Decodes elements `[start, start+nitems)` from a compressed buffer
/// produced by [`crate::compress`] and writes the corresponding bytes to
/// `dest`. Returns the number of bytes written.
pub fn getitem(src: &[u8], start: usize, nitems: usize, dest: &mut [u8]) -> Result<usize> {
    let view = HeaderView::new(src)?;
    let typesize = view.typesize() as usize;
    let nbytes = view.nbytes() as usize;

    let start_byte = start
        .checked_mul(typesize)
        .ok_or(BloscError::InvalidRange("start overflows"))?;
    let end_byte = start
        .checked_add(nitems)
        .and_then(|e| e.checked_mul(typesize))
        .ok_or(BloscError::InvalidRange("start+nitems overflows"))?;
    if end_byte > nbytes || start_byte > end_byte {
        return Err(BloscError::InvalidRange("requested range exceeds buffer"));
    }
    let want = end_byte - start_byte;
    if dest.len() < want {
        return Err(BloscError::InvalidRange("destination too small for requested range"));
    }

    if view.memcpyed() {
        dest[..want].copy_from_slice(&src[HEADER_LENGTH + start_byte..HEADER_LENGTH + end_byte]);
        return Ok(want);
    }

    let doshuffle = view.shuffled();
    let compressor = Compressor::from_format_id(view.format_id())?;
    let blocksize = view.blocksize() as usize;
    let offsets = view.start_offsets()?;
    let table_len = HEADER_LENGTH + 4 * offsets.len();
    let payload = &src[table_len..view.cbytes() as usize];
    let spans = block_spans(nbytes, blocksize);

    let mut dest_off = 0usize;
    let mut shuffle_scratch = vec![0u8; blocksize.max(1)];
    for (k, span) in spans.iter().enumerate() {
        let block_byte_start = span.start;
        let block_byte_end = span.start + span.len;
        if end_byte <= block_byte_start || start_byte >= block_byte_end {
            continue;
        }
        let lo = start_byte.max(block_byte_start);
        let hi = end_byte.min(block_byte_end);
        let startb = lo - block_byte_start;
        let stopb = hi - block_byte_start;

        let block_start_off = offsets[k] as usize - table_len;
        let block_end_off = if k + 1 < offsets.len() {
            offsets[k + 1] as usize - table_len
        } else {
            payload.len()
        };

        let mut scratch = vec![0u8; span.len];
        block::decompress_block(
            compressor,
            typesize,
            doshuffle,
            blocksize,
            span.leftover,
            &payload[block_start_off..block_end_off],
            &mut shuffle_scratch[..span.len],
            &mut scratch,
        )?;

        let n = stopb - startb;
        dest[dest_off..dest_off + n].copy_from_slice(&scratch[startb..stopb]);
        dest_off += n;
    }

    Ok(dest_off)
}
