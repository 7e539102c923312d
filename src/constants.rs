//! Wire-format and policy constants.
//!
//! Values mirror the c-blosc1 header layout and size limits defined in
//! `blosc.c`'s macro table.

/// Container format version written to header byte 0.
pub const BLOSC_VERSION_FORMAT: u8 = 2;

/// Fixed header length: version, version_codec, flags, typesize, nbytes,
/// blocksize, cbytes.
pub const HEADER_LENGTH: usize = 16;

/// Largest typesize a caller may request; larger values are clamped to 1.
pub const MAX_TYPESIZE: u8 = 255;

/// Below this uncompressed size the whole buffer is stored verbatim
/// (MEMCPYED) rather than attempting block compression.
pub const MIN_BUFFERSIZE: usize = 128;

/// Above this typesize, per-byte-position splitting is not applied.
pub const MAX_SPLITS: u8 = 16;

/// L1-sized unit used by the block-size planner.
pub const L1: usize = 32 * 1024;

/// `i32::MAX` minus room for the largest plausible per-call overhead;
/// kept well under `u32::MAX` so `nbytes + max_overhead(nblocks)` never
/// wraps for any nblocks a real caller would construct.
pub const MAX_BUFFERSIZE: usize = (i32::MAX as usize) - (1 << 20);

/// Header flag bit: shuffle was applied to every block.
pub const FLAG_SHUFFLE: u8 = 0x01;
/// Header flag bit: payload is a verbatim copy of the input.
pub const FLAG_MEMCPYED: u8 = 0x02;
/// Bits 5..7 of the flags byte hold the codec format-id.
pub const FLAG_FORMAT_SHIFT: u8 = 5;
pub const FLAG_FORMAT_MASK: u8 = 0x07;

/// Fixed overhead for a buffer with `nblocks` blocks: the 16-byte header
/// plus one 4-byte start-offset per block.
pub fn max_overhead(nblocks: usize) -> usize {
    HEADER_LENGTH + 4 * nblocks
}
