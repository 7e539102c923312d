//! Byte-shuffle transform: regroups the i-th byte of every element into
//! one contiguous run, so that structured numeric data (e.g. an array of
//! `f64`) presents long runs of similar bytes to the inner codec.
//!
//! Only the scalar byte-shuffle is implemented here; the bit-level SIMD
//! shuffle variant is out of scope.

/// Shuffles `src` into `dest`, both `blocksize` bytes long. `bytesoftype`
/// is the typesize; a trailing remainder (`blocksize % bytesoftype != 0`)
/// is copied through unshuffled, matching the leftover-block handling of
/// the block engine.
pub fn shuffle(bytesoftype: usize, blocksize: usize, src: &[u8], dest: &mut [u8]) {
    let neblock_quot = blocksize / bytesoftype;
    let neblock_rem = blocksize % bytesoftype;

    for j in 0..bytesoftype {
        for i in 0..neblock_quot {
            dest[j * neblock_quot + i] = src[i * bytesoftype + j];
        }
    }

    if neblock_rem > 0 {
        let start = blocksize - neblock_rem;
        dest[start..blocksize].copy_from_slice(&src[start..blocksize]);
    }
}

/// Inverse of [`shuffle`].
pub fn unshuffle(bytesoftype: usize, blocksize: usize, src: &[u8], dest: &mut [u8]) {
    let neblock_quot = blocksize / bytesoftype;
    let neblock_rem = blocksize % bytesoftype;

    for i in 0..neblock_quot {
        for j in 0..bytesoftype {
            dest[i * bytesoftype + j] = src[j * neblock_quot + i];
        }
    }

    if neblock_rem > 0 {
        let start = blocksize - neblock_rem;
        dest[start..blocksize].copy_from_slice(&src[start..blocksize]);
    }
}
