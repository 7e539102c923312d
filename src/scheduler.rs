//! Dispatches blocks to a serial loop or a fixed worker team.
//!
//! Compression enforces strict ordered assembly via an explicit
//! compare-and-increment reservation. Decompression needs no ordering
//! since the header's start-offset table already gives random access to
//! every block.

use crate::block;
use crate::codecs::Compressor;
use crate::error::{BloscError, Result};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

/// Wraps a raw pointer so it can cross into a spawned rayon task. Safe
/// because every task that receives one only ever touches the disjoint
/// byte range it was handed (either a reservation from [`OrderedAssembly`]
/// during compression, or the block's own span during decompression).
#[derive(Clone, Copy)]
struct SendPtr(*mut u8);
unsafe impl Send for SendPtr {}
unsafe impl Sync for SendPtr {}

/// One block's span within the uncompressed source.
#[derive(Clone, Copy)]
pub struct BlockSpan {
    pub start: usize,
    pub len: usize,
    pub leftover: bool,
}

pub fn block_spans(nbytes: usize, blocksize: usize) -> Vec<BlockSpan> {
    if blocksize == 0 {
        return Vec::new();
    }
    let nblocks = nbytes.div_ceil(blocksize).max(1);
    let mut out = Vec::with_capacity(nblocks);
    for k in 0..nblocks {
        let start = k * blocksize;
        let len = (nbytes - start).min(blocksize);
        out.push(BlockSpan {
            start,
            len,
            leftover: len != blocksize,
        });
    }
    out
}

/// Explicit state returned by one attempt at the ordered assembly
/// critical section.
enum Reservation {
    Granted { dest_off: u32 },
    Denied,
}

struct OrderedAssembly {
    next_block: AtomicUsize,
    output_cursor: AtomicI64,
    /// Monotonic: starts positive (1 = "no giveup yet"), only ever moves
    /// toward more-negative values. 0 means "incompressible, give up
    /// cleanly"; negative values are propagated error codes.
    giveup: AtomicI64,
}

impl OrderedAssembly {
    fn new() -> Self {
        OrderedAssembly {
            next_block: AtomicUsize::new(0),
            output_cursor: AtomicI64::new(0),
            giveup: AtomicI64::new(1),
        }
    }

    fn reserve(&self, block_idx: usize, cbytes: usize, destsize: usize) -> Reservation {
        loop {
            if self.giveup.load(Ordering::Acquire) <= 0 {
                return Reservation::Denied;
            }
            let nb = self.next_block.load(Ordering::Acquire);
            if nb != block_idx {
                std::thread::yield_now();
                continue;
            }
            if self
                .next_block
                .compare_exchange(nb, nb + 1, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                continue;
            }
            let dest_off = self.output_cursor.load(Ordering::Acquire);
            if dest_off < 0 || dest_off as usize + cbytes > destsize {
                self.giveup.fetch_min(0, Ordering::AcqRel);
                return Reservation::Denied;
            }
            self.output_cursor
                .store(dest_off + cbytes as i64, Ordering::Release);
            return Reservation::Granted {
                dest_off: dest_off as u32,
            };
        }
    }
}

/// Whether a call with this shape runs serially or via the worker team.
pub fn is_serial(numthreads: usize, nbytes: usize, blocksize: usize) -> bool {
    numthreads <= 1 || nbytes <= blocksize
}

/// Compresses every block and writes each one's start offset. Returns
/// the total number of payload bytes written, or `Ok(0)` if the call
/// gave up (destination too small, or regular compression turned out
/// incompressible); the caller decides what to do with that.
///
/// `on_start_offset(k, absolute_offset)` lets the caller patch the
/// header's start-offset table without this module needing to know
/// about header layout.
#[allow(clippy::too_many_arguments)]
pub fn compress(
    compressor: Compressor,
    clevel: u8,
    typesize: usize,
    doshuffle: bool,
    blocksize: usize,
    numthreads: usize,
    src: &[u8],
    payload: &mut [u8],
    data_offset: usize,
    mut on_start_offset: impl FnMut(usize, u32),
) -> Result<usize> {
    let spans = block_spans(src.len(), blocksize);
    if spans.is_empty() {
        return Ok(0);
    }

    if is_serial(numthreads, src.len(), blocksize) {
        log::debug!("compress: serial scheduling over {} blocks", spans.len());
        let mut shuffle_scratch = vec![0u8; blocksize.max(1)];
        let mut cursor = 0usize;
        for (k, span) in spans.iter().enumerate() {
            on_start_offset(k, (data_offset + cursor) as u32);
            let src_blk = &src[span.start..span.start + span.len];
            let cbytes = block::compress_block(
                compressor,
                clevel,
                typesize,
                doshuffle,
                blocksize,
                span.leftover,
                src_blk,
                &mut shuffle_scratch,
                &mut payload[cursor..],
            )?;
            if cbytes == 0 {
                return Ok(0);
            }
            cursor += cbytes;
        }
        return Ok(cursor);
    }

    log::debug!(
        "compress: parallel scheduling over {} blocks with {} workers",
        spans.len(),
        numthreads
    );
    let assembly = OrderedAssembly::new();
    let destsize = payload.len();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(numthreads)
        .build()
        .map_err(|_| BloscError::InternalOverflow("failed to build worker pool"))?;

    // Each spawned task writes into its own private scratch, then (after
    // the ordered reservation succeeds) copies into its reserved slot of
    // `payload`. `payload` is split into disjoint reserved regions, so
    // concurrent writers never alias; we hand out raw pointers to make
    // that visible to the borrow checker.
    let payload_ptr = SendPtr(payload.as_mut_ptr());
    let payload_len = payload.len();
    let start_offsets: Vec<AtomicI64> = (0..spans.len()).map(|_| AtomicI64::new(-1)).collect();

    pool.scope(|s| {
        for (k, span) in spans.iter().enumerate() {
            let span = *span;
            let assembly = &assembly;
            let start_offsets = &start_offsets;
            let src_blk_start = span.start;
            let src_blk_len = span.len;
            s.spawn(move |_| {
                if assembly.giveup.load(Ordering::Acquire) <= 0 {
                    return;
                }
                let mut shuffle_scratch = vec![0u8; blocksize.max(1)];
                let mut private_dest = vec![0u8; blocksize + typesize * 4 + 4];
                let src_blk = unsafe {
                    std::slice::from_raw_parts(
                        src.as_ptr().add(src_blk_start),
                        src_blk_len,
                    )
                };
                let result = block::compress_block(
                    compressor,
                    clevel,
                    typesize,
                    doshuffle,
                    blocksize,
                    span.leftover,
                    src_blk,
                    &mut shuffle_scratch,
                    &mut private_dest,
                );
                let cbytes = match result {
                    Ok(0) => {
                        assembly.giveup.fetch_min(0, Ordering::AcqRel);
                        return;
                    }
                    Ok(n) => n,
                    Err(e) => {
                        assembly.giveup.fetch_min(e.code() as i64, Ordering::AcqRel);
                        return;
                    }
                };

                match assembly.reserve(k, cbytes, payload_len) {
                    Reservation::Denied => {}
                    Reservation::Granted { dest_off } => {
                        start_offsets[k].store((data_offset + dest_off as usize) as i64, Ordering::Release);
                        // SAFETY: `reserve` hands out disjoint, non-overlapping
                        // [dest_off, dest_off+cbytes) ranges across all k.
                        unsafe {
                            let dst = std::slice::from_raw_parts_mut(
                                payload_ptr.0.add(dest_off as usize),
                                cbytes,
                            );
                            dst.copy_from_slice(&private_dest[..cbytes]);
                        }
                    }
                }
            });
        }
    });

    let giveup = assembly.giveup.load(Ordering::Acquire);
    if giveup < 0 {
        log::warn!("compress: worker propagated error code {}", giveup);
        return Err(codec_error_from_code(giveup as i32));
    }
    if giveup == 0 {
        log::debug!("compress: parallel pass gave up (incompressible or destination too small)");
        return Ok(0);
    }

    for off in &start_offsets {
        let v = off.load(Ordering::Acquire);
        debug_assert!(v >= 0, "every block must have been granted a reservation");
    }
    for (k, off) in start_offsets.iter().enumerate() {
        on_start_offset(k, off.load(Ordering::Acquire) as u32);
    }

    Ok(assembly.output_cursor.load(Ordering::Acquire) as usize)
}

fn codec_error_from_code(code: i32) -> BloscError {
    match code {
        -10 => BloscError::InvalidClevel(0),
        -5 => BloscError::UnsupportedCodec(0xff),
        -2 => BloscError::CorruptInput("propagated from worker"),
        _ => BloscError::InternalOverflow("propagated from worker"),
    }
}

/// Decompresses every block. Blocks are independent (the start-offset
/// table already gives each one's source range), so no ordering or
/// assembly critical section is needed, each worker writes into its
/// own disjoint region of `dest`.
#[allow(clippy::too_many_arguments)]
pub fn decompress(
    compressor: Compressor,
    typesize: usize,
    doshuffle: bool,
    blocksize: usize,
    numthreads: usize,
    nbytes: usize,
    src_payload: &[u8],
    start_offsets: &[u32],
    data_offset: usize,
    dest: &mut [u8],
) -> Result<usize> {
    let spans = block_spans(nbytes, blocksize);

    if is_serial(numthreads, nbytes, blocksize) {
        log::debug!("decompress: serial scheduling over {} blocks", spans.len());
        let mut shuffle_scratch = vec![0u8; blocksize.max(1)];
        for (k, span) in spans.iter().enumerate() {
            let block_start = start_offsets[k] as usize - data_offset;
            let block_end = if k + 1 < spans.len() {
                start_offsets[k + 1] as usize - data_offset
            } else {
                src_payload.len()
            };
            block::decompress_block(
                compressor,
                typesize,
                doshuffle,
                blocksize,
                span.leftover,
                &src_payload[block_start..block_end],
                &mut shuffle_scratch,
                &mut dest[span.start..span.start + span.len],
            )?;
        }
        return Ok(nbytes);
    }

    log::debug!(
        "decompress: parallel scheduling over {} blocks with {} workers",
        spans.len(),
        numthreads
    );
    let giveup = AtomicI64::new(1);
    let dest_ptr = SendPtr(dest.as_mut_ptr());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(numthreads)
        .build()
        .map_err(|_| BloscError::InternalOverflow("failed to build worker pool"))?;

    pool.scope(|s| {
        for (k, span) in spans.iter().enumerate() {
            let span = *span;
            let giveup = &giveup;
            let block_start = start_offsets[k] as usize - data_offset;
            let block_end = if k + 1 < spans.len() {
                start_offsets[k + 1] as usize - data_offset
            } else {
                src_payload.len()
            };
            s.spawn(move |_| {
                if giveup.load(Ordering::Acquire) <= 0 {
                    return;
                }
                let mut shuffle_scratch = vec![0u8; blocksize.max(1)];
                let dst = unsafe { std::slice::from_raw_parts_mut(dest_ptr.0.add(span.start), span.len) };
                let result = block::decompress_block(
                    compressor,
                    typesize,
                    doshuffle,
                    blocksize,
                    span.leftover,
                    &src_payload[block_start..block_end],
                    &mut shuffle_scratch,
                    dst,
                );
                if let Err(e) = result {
                    giveup.fetch_min(e.code() as i64, Ordering::AcqRel);
                }
            });
        }
    });

    let g = giveup.load(Ordering::Acquire);
    if g < 0 {
        return Err(codec_error_from_code(g as i32));
    }

    Ok(nbytes)
}
