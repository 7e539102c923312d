//! Block-size planner: a pure, deterministic function of
//! `(compressor, clevel, typesize, nbytes, forced)`.
//!
//! Producers and random-access consumers must derive an identical block
//! decomposition from the stored `blocksize`/`nbytes` alone, so this
//! policy is fixed and never varies by build or runtime tuning.

use crate::codecs::Compressor;
use crate::constants::{L1, MIN_BUFFERSIZE};

/// Compressors whose encoder benefits from a larger working set ("highly
/// compressed ratio" / HCR codecs).
fn is_hcr(compressor: Compressor) -> bool {
    matches!(compressor, Compressor::Zlib | Compressor::Lz4Hc)
}

/// Chooses the block size for one call. `forced`, if non-zero, overrides
/// the heuristic (clamped to at least `MIN_BUFFERSIZE`).
pub fn plan(compressor: Compressor, clevel: u8, typesize: usize, nbytes: usize, forced: usize) -> usize {
    if nbytes < typesize {
        return 1;
    }

    let mut blocksize = if forced != 0 {
        forced.max(MIN_BUFFERSIZE)
    } else if nbytes >= 4 * L1 {
        let mut bs = 4 * L1;
        if is_hcr(compressor) {
            bs *= 8;
        }
        match clevel {
            0 => bs / 16,
            1..=3 => bs / 8,
            4..=5 => bs / 4,
            6 => bs / 2,
            7..=8 => bs,
            _ => bs * 2,
        }
    } else if nbytes > 256 {
        let mut bs = nbytes;
        if matches!(typesize, 2 | 4 | 8 | 16) {
            let unit = 16 * typesize;
            bs = (bs / unit) * unit;
        }
        bs
    } else {
        nbytes
    };

    if blocksize > nbytes {
        blocksize = nbytes;
    }
    if blocksize == 0 {
        blocksize = nbytes.max(1);
    }

    if blocksize > typesize {
        blocksize = (blocksize / typesize) * typesize;
    }

    if matches!(compressor, Compressor::BloscLz) && typesize > 0 && blocksize / typesize > 64 * 1024 {
        blocksize = 64 * 1024 * typesize;
    }

    blocksize.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_when_smaller_than_typesize() {
        assert_eq!(plan(Compressor::BloscLz, 5, 8, 3, 0), 1);
    }

    #[test]
    fn forced_blocksize_is_clamped_to_minimum() {
        assert_eq!(plan(Compressor::BloscLz, 5, 4, 1_000_000, 10), MIN_BUFFERSIZE);
        assert_eq!(plan(Compressor::BloscLz, 5, 4, 1_000_000, 512), 512);
    }

    #[test]
    fn small_inputs_are_typesize_aligned() {
        let bs = plan(Compressor::BloscLz, 5, 4, 1000, 0);
        assert_eq!(bs % 4, 0);
        assert!(bs <= 1000);
    }

    #[test]
    fn blocksize_never_exceeds_nbytes() {
        for nbytes in [1usize, 50, 300, 100_000, 1_000_000] {
            let bs = plan(Compressor::Lz4, 9, 8, nbytes, 0);
            assert!(bs <= nbytes.max(1));
        }
    }

    #[test]
    fn blosclz_caps_split_width() {
        let bs = plan(Compressor::BloscLz, 9, 1, 8 * 1024 * 1024, 0);
        assert!(bs / 1 <= 64 * 1024);
    }

    #[test]
    fn large_buffers_scale_down_at_clevel_zero() {
        let nbytes = 4 * L1 * 4;
        let bs0 = plan(Compressor::BloscLz, 0, 4, nbytes, 0);
        let bs9 = plan(Compressor::BloscLz, 9, 4, nbytes, 0);
        assert!(bs0 < bs9);
    }
}
