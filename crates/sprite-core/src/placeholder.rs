//! Minimal fully transparent PNG files used as sizing placeholders.
//!
//! Each file is a 1-bit indexed PNG whose only palette entry is marked fully
//! transparent, so every pixel (index 0) is invisible. Output is deterministic
//! for a given size.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use miniz_oxide::deflate::compress_to_vec_zlib;

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Pre-built `PLTE` (one white entry) and `tRNS` (alpha 0 for that entry)
/// chunks, including their CRCs.
pub const PALETTE_CHUNKS: [u8; 28] = [
    0x00, 0x00, 0x00, 0x03, b'P', b'L', b'T', b'E', 0xFF, 0xFF, 0xFF, 0xA7, 0xC4, 0x1B, 0xC8,
    0x00, 0x00, 0x00, 0x01, b't', b'R', b'N', b'S', 0x00, 0x40, 0xE6, 0xD8, 0x66,
];

const BIT_DEPTH: u8 = 1;
const COLOR_TYPE_INDEXED: u8 = 3;
const COMPRESSION_LEVEL: u8 = 9;

/// Encode a `width` x `height` fully transparent PNG.
pub fn transparent_png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(96);
    out.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    // bit depth, colour type, compression, filter, interlace
    ihdr.extend_from_slice(&[BIT_DEPTH, COLOR_TYPE_INDEXED, 0, 0, 0]);
    write_chunk(&mut out, b"IHDR", &ihdr);

    out.extend_from_slice(&PALETTE_CHUNKS);

    // Each scanline: filter byte 0, then ceil(width / 8) bytes of zero bits.
    let row = 1 + (width as usize).div_ceil(8);
    let raw = vec![0u8; row * height as usize];
    write_chunk(&mut out, b"IDAT", &compress_to_vec_zlib(&raw, COMPRESSION_LEVEL));

    write_chunk(&mut out, b"IEND", &[]);
    out
}

/// `data:` URI embedding [`transparent_png`].
pub fn transparent_png_data_uri(width: u32, height: u32) -> String {
    to_data_uri("image/png", &transparent_png(width, height))
}

/// Base64 `data:` URI for arbitrary bytes.
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Append one PNG chunk: big-endian length, type, payload, CRC-32 of type + payload.
pub fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(kind);
    hasher.update(data);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Placeholder files of one run, keyed by natural `(width, height)`.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    files: BTreeMap<(u32, u32), Vec<u8>>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes for `(width, height)`, encoding them on first request.
    pub fn get_or_encode(&mut self, width: u32, height: u32) -> &[u8] {
        self.files
            .entry((width, height))
            .or_insert_with(|| transparent_png(width, height))
    }

    pub fn get(&self, width: u32, height: u32) -> Option<&[u8]> {
        self.files.get(&(width, height)).map(Vec::as_slice)
    }

    /// `data:` URI for an already encoded size.
    pub fn data_uri(&self, width: u32, height: u32) -> Option<String> {
        self.get(width, height).map(|b| to_data_uri("image/png", b))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((u32, u32), &[u8])> {
        self.files.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}
