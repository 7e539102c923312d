//! A block-oriented meta-compressor for homogeneously-typed numeric
//! buffers. Wraps an inner codec (a small built-in LZ77 plus pluggable
//! LZ4/LZ4HC/Snappy/Zlib) with a byte-shuffle pre-filter and a
//! block/split decomposition that parallelizes across a fixed worker
//! team, with an incompressibility fallback to verbatim storage.
//!
//! See [`Context`] for the caller-facing configuration, [`compress`] and
//! [`decompress`] for the whole-buffer entry points, and [`getitem`] for
//! random-access partial decompression.

pub mod block;
pub mod blocksize;
pub mod codecs;
pub mod constants;
pub mod context;
pub mod error;
pub mod getitem;
pub mod header;
pub mod inspect;
pub mod scheduler;
pub mod shuffle;

pub use codecs::Compressor;
pub use context::Context;
pub use error::{BloscError, Result};
pub use getitem::getitem;

use constants::{max_overhead, HEADER_LENGTH, MAX_BUFFERSIZE, MIN_BUFFERSIZE};
use header::{HeaderView, HeaderWriter};

const VERSION_FORMAT: u8 = constants::BLOSC_VERSION_FORMAT;
/// Format-version byte stamped into the header's `version_codec` field.
/// Bumped only if the per-codec wire representation changes.
const VERSION_CODEC: u8 = 1;

/// Compresses `src` into `dest` under the parameters in `ctx`.
///
/// Returns the final compressed length on success, `Ok(0)` if `dest` is
/// too small to hold the result even after the memcpy fallback, or an
/// error for a validation failure.
pub fn compress(ctx: &Context, src: &[u8], dest: &mut [u8]) -> Result<usize> {
    let nbytes = src.len();
    if nbytes > MAX_BUFFERSIZE {
        return Err(BloscError::BufferTooLarge {
            nbytes,
            max: MAX_BUFFERSIZE,
        });
    }

    let typesize = ctx.typesize as usize;
    let forced = ctx.blocksize_override.unwrap_or(0) as usize;
    let planned_blocksize = blocksize::plan(ctx.compressor, ctx.clevel, typesize, nbytes.max(1), forced);
    let nblocks = scheduler::block_spans(nbytes, planned_blocksize).len();

    let force_memcpy = ctx.clevel == 0 || nbytes < MIN_BUFFERSIZE;
    log::debug!(
        "compress: nbytes={nbytes} typesize={typesize} blocksize={planned_blocksize} nblocks={nblocks} forced_memcpy={force_memcpy}"
    );

    if !force_memcpy {
        let table_len = max_overhead(nblocks);
        if dest.len() >= table_len {
            let (header_and_table, payload) = dest.split_at_mut(table_len);
            let mut writer = HeaderWriter::new(header_and_table)?;
            writer.write_fixed(
                VERSION_FORMAT,
                VERSION_CODEC,
                ctx.doshuffle,
                false,
                ctx.compressor.format_id(),
                ctx.typesize,
                nbytes as u32,
                planned_blocksize as u32,
            );

            let result = scheduler::compress(
                ctx.compressor,
                ctx.clevel,
                typesize,
                ctx.doshuffle,
                planned_blocksize,
                ctx.numthreads,
                src,
                payload,
                table_len,
                |k, off| writer.write_start_offset(k, off),
            )?;

            if result > 0 {
                let total = table_len + result;
                writer.patch_cbytes(total as u32);
                return Ok(total);
            }
            log::debug!("compress: regular pass was incompressible, considering memcpy fallback");
        } else {
            log::debug!("compress: destination too small even for the header/table, considering memcpy fallback");
        }
    }

    // Falls back to storing the whole buffer verbatim.
    let total = nbytes + HEADER_LENGTH;
    if dest.len() < total {
        // Even the verbatim copy doesn't fit.
        return Ok(0);
    }
    {
        let mut writer = HeaderWriter::new(&mut dest[..HEADER_LENGTH])?;
        writer.write_fixed(
            VERSION_FORMAT,
            VERSION_CODEC,
            false,
            true,
            ctx.compressor.format_id(),
            ctx.typesize,
            nbytes as u32,
            planned_blocksize as u32,
        );
        writer.patch_cbytes(total as u32);
    }
    dest[HEADER_LENGTH..total].copy_from_slice(src);
    log::debug!("compress: memcpyed, total={total}");
    Ok(total)
}

/// Decompresses a buffer produced by [`compress`] into `dest`.
///
/// Returns the number of uncompressed bytes written (equal to the
/// header's `nbytes` field) or an error.
pub fn decompress(src: &[u8], dest: &mut [u8], numthreads: usize) -> Result<usize> {
    let view = HeaderView::new(src)?;
    let nbytes = view.nbytes() as usize;
    if nbytes > dest.len() {
        return Err(BloscError::InvalidRange("destination smaller than declared nbytes"));
    }

    if view.memcpyed() {
        dest[..nbytes].copy_from_slice(&src[HEADER_LENGTH..HEADER_LENGTH + nbytes]);
        return Ok(nbytes);
    }

    let typesize = view.typesize() as usize;
    let doshuffle = view.shuffled();
    let compressor = Compressor::from_format_id(view.format_id())?;
    let blocksize = view.blocksize() as usize;
    let offsets = view.start_offsets()?;
    let table_len = HEADER_LENGTH + 4 * offsets.len();
    let cbytes = view.cbytes() as usize;
    if cbytes > src.len() {
        return Err(BloscError::CorruptInput("cbytes exceeds source buffer length"));
    }
    let payload = &src[table_len..cbytes];

    scheduler::decompress(
        compressor,
        typesize,
        doshuffle,
        blocksize,
        numthreads,
        nbytes,
        payload,
        &offsets,
        table_len,
        &mut dest[..nbytes],
    )
}

/// Compresses with a [`Context::default`], a thin façade for callers who
/// don't need per-call tuning and would otherwise reach for a global.
pub fn compress_default(src: &[u8], dest: &mut [u8]) -> Result<usize> {
    compress(&Context::default(), src, dest)
}

/// Decompresses with `numthreads = 1`.
pub fn decompress_default(src: &[u8], dest: &mut [u8]) -> Result<usize> {
    decompress(src, dest, 1)
}

/// Conservative upper bound on the header+table overhead for a buffer of
/// `nbytes`, for callers sizing a destination buffer without knowing the
/// exact blocksize a given [`Context`] will choose. The real planner
/// never picks a blocksize smaller than [`constants::MIN_BUFFERSIZE`],
/// so this over-estimates `nblocks` rather than under-estimating it.
pub fn max_overhead_for(nbytes: usize) -> usize {
    let worst_case_nblocks = nbytes / constants::MIN_BUFFERSIZE + 2;
    max_overhead(worst_case_nblocks)
}
