//! Cross-product round-trip coverage over typesize, compression level,
//! shuffle, codec, and buffer shape (boundary, leftover, multi-block,
//! multi-threaded).

use shufflock::{compress, decompress, max_overhead_for, Compressor, Context};

mod support {
    pub fn patterned(nbytes: usize, period: usize) -> Vec<u8> {
        (0..nbytes).map(|i| (i % period) as u8).collect()
    }
}

fn roundtrip(ctx: &Context, src: &[u8]) {
    let mut dest = vec![0u8; src.len() + max_overhead_for(src.len())];
    let cbytes = compress(ctx, src, &mut dest).expect("compress should succeed");
    assert!(cbytes > 0, "unexpected incompressible/too-small result for {} bytes", src.len());
    let mut out = vec![0u8; src.len()];
    let n = decompress(&dest[..cbytes], &mut out, ctx.numthreads).expect("decompress should succeed");
    assert_eq!(n, src.len());
    assert_eq!(out, src, "roundtrip mismatch with compressor={:?} typesize={} clevel={} doshuffle={}",
        ctx.compressor, ctx.typesize, ctx.clevel, ctx.doshuffle);
}

#[test]
fn cross_product_over_typesize_clevel_shuffle_and_codec() {
    let compressors = [
        Compressor::BloscLz,
        Compressor::Lz4,
        Compressor::Lz4Hc,
        Compressor::Snappy,
        Compressor::Zlib,
    ];
    let typesizes: [u8; 4] = [1, 2, 4, 8];
    let clevels: [u8; 3] = [1, 5, 9];
    let shuffles = [false, true];
    let nbytes = 20_000usize;

    for &compressor in &compressors {
        for &typesize in &typesizes {
            for &clevel in &clevels {
                for &doshuffle in &shuffles {
                    let src = support::patterned(nbytes, 251);
                    let ctx = Context::new(compressor, clevel, typesize, doshuffle).unwrap();
                    roundtrip(&ctx, &src);
                }
            }
        }
    }
}

#[test]
fn leftover_blocks_roundtrip() {
    let ctx = Context::new(Compressor::BloscLz, 5, 8, true).unwrap();
    for nbytes in [129usize, 1000, 4097, 100_003] {
        let src = support::patterned(nbytes, 97);
        roundtrip(&ctx, &src);
    }
}

#[test]
fn multi_block_multithreaded_matches_single_threaded() {
    let src = support::patterned(2_000_000, 211);
    let serial = Context::new(Compressor::BloscLz, 5, 4, true).unwrap();
    let parallel = Context::new(Compressor::BloscLz, 5, 4, true)
        .unwrap()
        .with_numthreads(8);

    let mut dest_serial = vec![0u8; src.len() + max_overhead_for(src.len())];
    let mut dest_parallel = vec![0u8; src.len() + max_overhead_for(src.len())];
    let c1 = compress(&serial, &src, &mut dest_serial).unwrap();
    let c2 = compress(&parallel, &src, &mut dest_parallel).unwrap();
    assert_eq!(c1, c2);
    assert_eq!(dest_serial[..c1], dest_parallel[..c2]);

    let mut out = vec![0u8; src.len()];
    decompress(&dest_parallel[..c2], &mut out, 8).unwrap();
    assert_eq!(out, src);
}

#[test]
fn every_codec_roundtrips_a_realistic_float_like_buffer() {
    // Mimics an array of f64 deltas: small magnitude changes, which is
    // exactly the structure byte-shuffle is meant to expose.
    let mut src = vec![0u8; 8 * 10_000];
    let mut acc: u64 = 0;
    for chunk in src.chunks_mut(8) {
        acc = acc.wrapping_add(3);
        chunk.copy_from_slice(&acc.to_le_bytes());
    }

    for compressor in [
        Compressor::BloscLz,
        Compressor::Lz4,
        Compressor::Lz4Hc,
        Compressor::Snappy,
        Compressor::Zlib,
    ] {
        let ctx = Context::new(compressor, 7, 8, true).unwrap();
        roundtrip(&ctx, &src);
    }
}
