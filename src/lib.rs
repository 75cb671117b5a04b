//! # retrocodec
//!
//! Byte-exact codecs compatible with a family of handheld-console BIOS
//! decompression routines:
//!
//! * [`lz`] — a 12/4 sliding-window dictionary coder ("LZSS"-style).
//! * [`rle`] — an 8-bit run-length coder.
//! * [`huffman`] — canonical 4-bit/8-bit prefix-code trees.
//!
//! Every compressed stream begins with the 4-byte header described in
//! [`framing`]: a tag byte identifying the algorithm, followed by the
//! uncompressed size as a 24-bit little-endian integer.
//!
//! Each codec is a pure buffer-to-buffer transform: no shared state
//! survives a call, and nothing here reaches for files, threads, or a
//! command line. Decoding failures (a malformed or mismatched tag, a
//! truncated stream) are reported the way the original hardware routines
//! report them, by way of an empty output buffer, not a `Result` — see
//! [`Error`] for the cases that *do* indicate a bug in this crate rather
//! than bad input.
//!
//! ## Example
//!
//! ```rust
//! use retrocodec::{lz_compress, lz_decompress};
//!
//! let text = b"the rain in spain falls mainly on the plain";
//! let packed = lz_compress(text);
//! assert_eq!(lz_decompress(&packed), text);
//! ```

pub mod framing;
pub mod huffman;
pub mod lz;
pub mod rle;

/// Errors for internal invariants that should never be reachable from
/// caller-supplied data. These never cross the public codec functions;
/// see the module docs for why malformed input instead yields an empty
/// buffer.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("match index arena exhausted")]
    ArenaExhausted,
    #[error("huffman code tree offset {0} does not fit in 6 bits")]
    OffsetOverflow(usize),
}

pub use huffman::decode as huffman_decode;
pub use huffman::encode as huffman_encode;
pub use huffman::Width as HuffmanWidth;
pub use lz::compress as lz_compress;
pub use lz::decompress as lz_decompress;
pub use rle::compress as rle_compress;
pub use rle::decompress as rle_decompress;
