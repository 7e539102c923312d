//! Block engine: compresses or decompresses exactly one block, including
//! the shuffle step, the split/slice loop, and per-slice incompressibility
//! fallback.

use crate::codecs::{self, Compressor};
use crate::constants::MIN_BUFFERSIZE;
use crate::error::{BloscError, Result};
use crate::shuffle;

/// Number of per-byte-position slices a block of `blocksize` (the
/// *planned*, full block size, not the possibly-shorter leftover size)
/// is split into.
pub fn nsplits_for(typesize: usize, blocksize: usize, leftover: bool) -> usize {
    if !leftover
        && typesize > 0
        && typesize <= crate::constants::MAX_SPLITS as usize
        && blocksize / typesize >= MIN_BUFFERSIZE
    {
        typesize
    } else {
        1
    }
}

/// Result of compressing one block: `Ok(n)` for `n` bytes written to
/// `dest`, or `Ok(0)` if the block turned out incompressible (caller
/// decides whether to fall back to memcpy). This is not an error.
pub fn compress_block(
    compressor: Compressor,
    clevel: u8,
    typesize: usize,
    doshuffle: bool,
    blocksize: usize,
    leftover: bool,
    src: &[u8],
    shuffle_scratch: &mut [u8],
    dest: &mut [u8],
) -> Result<usize> {
    let bsize = src.len();

    let work: &[u8] = if doshuffle && typesize > 1 {
        shuffle::shuffle(typesize, bsize, src, &mut shuffle_scratch[..bsize]);
        &shuffle_scratch[..bsize]
    } else {
        src
    };

    let nsplits = nsplits_for(typesize, blocksize, leftover);
    let neblock = bsize / nsplits;

    let mut op = 0usize;
    for i in 0..nsplits {
        if op + 4 > dest.len() {
            return Ok(0);
        }
        let len_slot = op;
        op += 4;

        let remaining = dest.len() as isize - op as isize;
        if remaining <= 0 {
            return Ok(0);
        }
        let maxout = codecs::max_compressed_len(compressor, neblock).min(remaining as usize);
        if maxout == 0 {
            return Ok(0);
        }

        let chunk = &work[i * neblock..(i + 1) * neblock];
        let avail_end = (op + maxout).min(dest.len());
        let cbytes = codecs::compress(compressor, clevel, chunk, &mut dest[op..avail_end])?;

        let stored_len = if cbytes == 0 || cbytes == neblock || cbytes > maxout {
            // Incompressible (or codec declined): store verbatim, if it fits.
            if op + neblock > dest.len() {
                return Ok(0);
            }
            dest[op..op + neblock].copy_from_slice(chunk);
            neblock
        } else {
            cbytes
        };

        dest[len_slot..len_slot + 4].copy_from_slice(&(stored_len as u32).to_le_bytes());
        op += stored_len;
    }

    Ok(op)
}

/// Decompresses one block. `dest` must be exactly `bsize` long (the
/// planned blocksize, or the leftover length for the last block).
pub fn decompress_block(
    compressor: Compressor,
    typesize: usize,
    doshuffle: bool,
    blocksize: usize,
    leftover: bool,
    src: &[u8],
    shuffle_scratch: &mut [u8],
    dest: &mut [u8],
) -> Result<usize> {
    let bsize = dest.len();
    let nsplits = nsplits_for(typesize, blocksize, leftover);
    let neblock = bsize / nsplits;

    let mut ip = 0usize;
    for i in 0..nsplits {
        if ip + 4 > src.len() {
            return Err(BloscError::CorruptInput("truncated slice length prefix"));
        }
        let slice_len = u32::from_le_bytes(src[ip..ip + 4].try_into().unwrap()) as usize;
        ip += 4;

        if ip + slice_len > src.len() {
            return Err(BloscError::CorruptInput("slice length runs past block"));
        }
        let slice_src = &src[ip..ip + slice_len];
        let out_slot = &mut shuffle_scratch[i * neblock..(i + 1) * neblock];

        if slice_len == neblock {
            out_slot.copy_from_slice(slice_src);
        } else {
            let produced = codecs::decompress(compressor, slice_src, out_slot)?;
            if produced != neblock {
                return Err(BloscError::CorruptInput("inner codec produced wrong slice length"));
            }
        }
        ip += slice_len;
    }

    if doshuffle && typesize > 1 {
        shuffle::unshuffle(typesize, bsize, &shuffle_scratch[..bsize], dest);
    } else {
        dest.copy_from_slice(&shuffle_scratch[..bsize]);
    }

    Ok(bsize)
}
