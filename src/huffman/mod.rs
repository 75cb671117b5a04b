//! Canonical 4-bit/8-bit Huffman prefix coding.
//!
//! After the header (tag [`TAG_HUFFMAN_4`](crate::framing::TAG_HUFFMAN_4)
//! or [`TAG_HUFFMAN_8`](crate::framing::TAG_HUFFMAN_8)) the payload is: one
//! byte giving the code-tree size in half-word pairs (`(leaf_count-1)|1`);
//! `(that+1)*2` tree bytes total, packed per [`layout`]; then a sequence of
//! 32-bit little-endian code words consumed MSB-first.
//!
//! Building the encoded form is four steps, each its own submodule,
//! mirroring how `huffman.c` splits `HUF_Code`:
//!
//! 1. [`freq`] — count symbol occurrences, synthesize a second leaf if
//!    fewer than two distinct symbols occur.
//! 2. [`tree`] — repeatedly pair the two lowest-weight parentless nodes
//!    into a weighted binary tree.
//! 3. [`layout`] — serialize the tree into the packed on-wire byte array,
//!    compacting any offset that overflows the 6-bit `NEXT` field.
//! 4. [`codes`] — derive each leaf's code word and emit the bitstream.
//!
//! [`decode`] walks the packed tree back into symbols; [`decode::decode_emulator`]
//! is a second, independently-derived decoder kept for the cross-decoder
//! parity property (spec §8) and used only in tests.

mod codes;
mod decode;
mod freq;
mod layout;
mod tree;

use crate::framing;

pub use decode::decode;

/// Symbol width for [`encode`]. The wire format also defines 1-bit and
/// 2-bit test-mode tags (`0x21`, `0x22`) and a "try both, keep the
/// smaller" auto-select mode (`0x20`); none of those are reachable
/// through this crate's public entry point — see DESIGN.md.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Width {
    Four,
    Eight,
}

impl Width {
    fn bits(self) -> u32 {
        match self {
            Width::Four => 4,
            Width::Eight => 8,
        }
    }

    fn tag(self) -> u8 {
        match self {
            Width::Four => framing::TAG_HUFFMAN_4,
            Width::Eight => framing::TAG_HUFFMAN_8,
        }
    }
}

/// Compress `input` into a framed Huffman stream at the given symbol
/// width. Returns an empty vector for empty input.
pub fn encode(input: &[u8], width: Width) -> Vec<u8> {
    if input.is_empty() {
        return Vec::new();
    }
    let n = input.len();
    debug_assert!(n as u64 <= framing::MAX_SIZE as u64);

    let w = width.bits();
    let max_symbols = 1usize << w;
    let mut freqs = vec![0u32; max_symbols];
    freq::count(input, w, &mut freqs);
    let num_leafs = freqs.iter().filter(|&&f| f != 0).count();
    let num_leafs = freq::fixup_degenerate(&mut freqs, num_leafs);
    if num_leafs > freqs.iter().filter(|&&f| f != 0).count() {
        log::trace!("huffman::encode: synthesized dummy leaf(s) for a degenerate alphabet");
    }

    let nodes = tree::build(&freqs, num_leafs, max_symbols);
    let codetree = layout::build(&nodes, num_leafs);
    let codes = codes::build(&nodes, num_leafs, max_symbols);

    let mut out = Vec::with_capacity(4 + codetree.len() + n + 16);
    framing::write_header(&mut out, n as u32, width.tag());
    out.extend_from_slice(&codetree);
    codes::emit_bits(input, w, &codes, &mut out);
    framing::pad_to_multiple_of_4(&mut out);
    out
}
