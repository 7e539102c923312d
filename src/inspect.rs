//! Read-only inspectors over an already-produced compressed buffer.
//! None of these touch payload bytes, they only read the fixed header.

use crate::codecs::Compressor;
use crate::error::Result;
use crate::header::HeaderView;

/// `(nbytes, cbytes, blocksize)` straight from the header.
pub fn cbuffer_sizes(src: &[u8]) -> Result<(u32, u32, u32)> {
    let view = HeaderView::new(src)?;
    Ok((view.nbytes(), view.cbytes(), view.blocksize()))
}

/// `(typesize, flags)` straight from the header.
pub fn cbuffer_metainfo(src: &[u8]) -> Result<(u8, u8)> {
    let view = HeaderView::new(src)?;
    Ok((view.typesize(), view.flags()))
}

/// `(version, version_codec)` straight from the header.
pub fn cbuffer_versions(src: &[u8]) -> Result<(u8, u8)> {
    let view = HeaderView::new(src)?;
    Ok((view.version(), view.version_codec()))
}

/// Validates a buffer received from an untrusted source before a caller
/// hands it to [`crate::decompress`]. Returns the declared `nbytes` on
/// success.
pub fn cbuffer_validate(src: &[u8]) -> Result<u32> {
    HeaderView::validate(src)
}

/// Name of the codec used to produce this buffer, for diagnostics.
pub fn compname_for_buffer(src: &[u8]) -> Result<&'static str> {
    let view = HeaderView::new(src)?;
    let compressor = Compressor::from_format_id(view.format_id())?;
    Ok(compressor.name())
}
