//! Explicit compression context, carried by the caller instead of
//! living in a mutex-guarded singleton.

use crate::codecs::Compressor;
use crate::error::{BloscError, Result};

/// Parameters for one `compress` call. Built with [`Context::new`] plus
/// `with_*` setters for the optional tuning knobs, instead of being read
/// out of process-wide state.
#[derive(Debug, Clone)]
pub struct Context {
    pub compressor: Compressor,
    pub clevel: u8,
    pub typesize: u8,
    pub doshuffle: bool,
    pub numthreads: usize,
    pub blocksize_override: Option<u32>,
}

impl Context {
    pub fn new(compressor: Compressor, clevel: u8, typesize: u8, doshuffle: bool) -> Result<Self> {
        if clevel > 9 {
            return Err(BloscError::InvalidClevel(clevel));
        }
        Ok(Context {
            compressor,
            clevel,
            typesize: typesize.max(1),
            doshuffle,
            numthreads: 1,
            blocksize_override: None,
        })
    }

    pub fn with_numthreads(mut self, numthreads: usize) -> Self {
        self.numthreads = numthreads.max(1);
        self
    }

    pub fn with_forced_blocksize(mut self, blocksize: u32) -> Self {
        self.blocksize_override = Some(blocksize);
        self
    }
}

impl Default for Context {
    /// BloscLZ, max compression, single-threaded, no shuffle, no forced
    /// blocksize.
    fn default() -> Self {
        Context {
            compressor: Compressor::BloscLz,
            clevel: 9,
            typesize: 1,
            doshuffle: false,
            numthreads: 1,
            blocksize_override: None,
        }
    }
}
