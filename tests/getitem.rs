//! Random-access partial decompression against a full decompress, across
//! single-block, multi-block, and leftover-block buffers.

use shufflock::{compress, decompress, getitem, max_overhead_for, Compressor, Context};

fn build(nbytes: usize, typesize: u8, doshuffle: bool) -> (Vec<u8>, Vec<u8>) {
    let mut src = vec![0u8; nbytes];
    for (i, b) in src.iter_mut().enumerate() {
        *b = ((i * 31 + 7) % 256) as u8;
    }
    let ctx = Context::new(Compressor::BloscLz, 5, typesize, doshuffle).unwrap();
    let mut dest = vec![0u8; nbytes + max_overhead_for(nbytes)];
    let cbytes = compress(&ctx, &src, &mut dest).unwrap();
    assert!(cbytes > 0);
    dest.truncate(cbytes);
    (src, dest)
}

fn check_range(src: &[u8], compressed: &[u8], typesize: usize, start: usize, nitems: usize) {
    let mut full = vec![0u8; src.len()];
    decompress(compressed, &mut full, 1).unwrap();

    let mut got = vec![0u8; nitems * typesize];
    let n = getitem(compressed, start, nitems, &mut got).unwrap();
    assert_eq!(n, nitems * typesize);
    assert_eq!(&got[..], &full[start * typesize..(start + nitems) * typesize]);
}

#[test]
fn single_block_partial_read() {
    let typesize = 8usize;
    let (src, compressed) = build(4096, typesize as u8, true);
    check_range(&src, &compressed, typesize, 10, 5);
}

#[test]
fn multi_block_partial_read_spans_a_block_boundary() {
    let typesize = 8usize;
    let nbytes = 1_000_000usize;
    let (src, compressed) = build(nbytes, typesize as u8, true);

    // A range chosen to straddle a block boundary regardless of the
    // planner's exact choice, by spanning a wide swath near the middle.
    check_range(&src, &compressed, typesize, nbytes / (2 * typesize) - 50, 200);
}

#[test]
fn leftover_block_partial_read() {
    let typesize = 4usize;
    let nbytes = 100_007usize;
    let (src, compressed) = build(nbytes, typesize as u8, true);
    let last_elem = nbytes / typesize - 3;
    check_range(&src, &compressed, typesize, last_elem, 3);
}

#[test]
fn single_element_read_matches_full_decompress() {
    let typesize = 8usize;
    let (src, compressed) = build(1_000_000, typesize as u8, true);
    check_range(&src, &compressed, typesize, 123_456, 7);
}

#[test]
fn out_of_range_request_is_rejected() {
    let typesize = 8usize;
    let (_src, compressed) = build(4096, typesize as u8, true);
    let mut dest = vec![0u8; typesize];
    assert!(getitem(&compressed, 4096 / typesize, 1, &mut dest).is_err());
}

#[test]
fn getitem_on_memcpyed_buffer_works() {
    let typesize = 4usize;
    let (src, compressed) = build(64, typesize as u8, true);
    check_range(&src, &compressed, typesize, 3, 2);
}
