//! 12/4 sliding-window dictionary coding ("LZSS"), VRAM-safe.
//!
//! After the header (tag [`TAG_LZ`](crate::framing::TAG_LZ)) the payload is
//! a sequence of blocks. Each block starts with a flag byte whose bits,
//! read from bit 7 down to bit 0, select eight *units*:
//!
//! * bit = 0: one literal byte follows.
//! * bit = 1: two bytes `B0 B1` follow. `length = (B0 >> 4) + 3`,
//!   `distance = (((B0 & 0x0F) << 8) | B1) + 1`; copy `length` bytes from
//!   `current_out - distance`, one byte at a time so an overlapping copy
//!   (`distance < length`) legitimately repeats a pattern it just wrote.
//!
//! The encoder's match search walks a 256-way forest of binary search
//! trees ([`tree::Tree`]) over the sliding window ([`window::Window`]),
//! refusing to report a match against the position immediately behind the
//! cursor — the "VRAM-safety" rule, since a hardware decoder that commits
//! output in 16-bit words cannot yet have finalised that byte.

mod tree;
mod window;

use crate::framing;
use tree::Tree;
use window::{Window, LOOKAHEAD, MIN_MATCH, WIN_SIZE};

/// Compress `input` into a framed LZ stream. Returns an empty vector for
/// empty input.
pub fn compress(input: &[u8]) -> Vec<u8> {
    if input.is_empty() {
        return Vec::new();
    }
    let n = input.len();
    debug_assert!(n as u64 <= framing::MAX_SIZE as u64);

    let mut out = Vec::with_capacity(4 + n + n / 8 + 16);
    framing::write_header(&mut out, n as u32, framing::TAG_LZ);

    let mut window = Window::new();
    let mut tree = Tree::new();

    let start_pos = (WIN_SIZE - LOOKAHEAD) as u32;
    let mut s: u32 = 0;
    let mut r: u32 = start_pos;
    let mut byte_ptr = 0usize;
    let mut len = 0usize;
    while len < LOOKAHEAD && byte_ptr < n {
        window.set(start_pos as usize + len, input[byte_ptr]);
        len += 1;
        byte_ptr += 1;
    }
    // The pre-`r` region is left unindexed: only the first real insertion,
    // at `r` itself, seeds the tree. Nothing references the zero-filled
    // dictionary that precedes it.
    let mut best = tree.insert(&window, r);

    let mut flag_byte = 0u8;
    let mut bit = 0x80u8;
    let mut block = Vec::with_capacity(16);

    loop {
        let mut match_length = best.length.min(len);
        if match_length <= 2 {
            match_length = 1;
            block.push(window.get(r as usize));
        } else {
            flag_byte |= bit;
            let distance = (r + WIN_SIZE as u32 - best.position) % WIN_SIZE as u32;
            let offset = distance - 1;
            let b0 = (((match_length - MIN_MATCH) as u8) << 4) | ((offset >> 8) as u8 & 0x0F);
            let b1 = (offset & 0xFF) as u8;
            block.push(b0);
            block.push(b1);
        }
        bit >>= 1;
        if bit == 0 {
            out.push(flag_byte);
            out.extend_from_slice(&block);
            flag_byte = 0;
            bit = 0x80;
            block.clear();
        }

        let last_match_length = match_length;
        let mut i = 0;
        while i < last_match_length && byte_ptr < n {
            let c = input[byte_ptr];
            byte_ptr += 1;
            tree.delete(s);
            window.set(s as usize, c);
            s = (s + 1) % WIN_SIZE as u32;
            r = (r + 1) % WIN_SIZE as u32;
            best = tree.insert(&window, r);
            i += 1;
        }
        while i < last_match_length {
            tree.delete(s);
            s = (s + 1) % WIN_SIZE as u32;
            r = (r + 1) % WIN_SIZE as u32;
            len -= 1;
            if len > 0 {
                best = tree.insert(&window, r);
            }
            i += 1;
        }
        if len == 0 {
            break;
        }
    }
    if bit != 0x80 {
        out.push(flag_byte);
        out.extend_from_slice(&block);
    }
    framing::pad_to_multiple_of_4(&mut out);
    out
}

/// Expand a framed LZ stream. Returns an empty vector if the tag byte does
/// not match [`TAG_LZ`](crate::framing::TAG_LZ).
pub fn decompress(input: &[u8]) -> Vec<u8> {
    if input.len() < 4 {
        return Vec::new();
    }
    let (tag, size) = framing::parse_header(input);
    if tag != framing::TAG_LZ {
        log::warn!("lz::decompress: tag mismatch (got {:#04x})", tag);
        return Vec::new();
    }
    let size = size as usize;
    let mut out = Vec::with_capacity(size);
    let mut pos = 4usize;

    'blocks: while out.len() < size {
        let Some(&flag) = input.get(pos) else {
            log::debug!("lz::decompress: truncated stream after {} bytes", out.len());
            break;
        };
        pos += 1;
        for bit in (0..8).rev() {
            if out.len() >= size {
                break 'blocks;
            }
            if flag & (1 << bit) == 0 {
                let Some(&b) = input.get(pos) else { break 'blocks };
                pos += 1;
                out.push(b);
            } else {
                let (Some(&b0), Some(&b1)) = (input.get(pos), input.get(pos + 1)) else {
                    break 'blocks;
                };
                pos += 2;
                let length = (b0 >> 4) as usize + MIN_MATCH;
                let distance = (((b0 & 0x0F) as usize) << 8 | b1 as usize) + 1;
                let length = length.min(size - out.len());
                if distance > out.len() {
                    log::debug!("lz::decompress: back-reference past start of output");
                    break 'blocks;
                }
                for _ in 0..length {
                    let byte = out[out.len() - distance];
                    out.push(byte);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_literal_scenario() {
        // spec §8 scenario 1
        let input = b"ABCDEFGH".to_vec();
        let out = compress(&input);
        let mut expected = hex::decode("1008000000").unwrap();
        expected.extend_from_slice(&input);
        framing::pad_to_multiple_of_4(&mut expected);
        assert_eq!(out, expected);
        assert_eq!(decompress(&out), input);
    }

    #[test]
    fn repeated_byte_uses_distance_two_not_one() {
        // spec §8 scenario 2
        let input = vec![0x41u8; 20];
        let out = compress(&input);
        assert_eq!(decompress(&out), input);
        assert_no_distance_one(&out);
    }

    #[test]
    fn vram_safety_holds_over_many_lengths() {
        for n in [3usize, 4, 17, 18, 19, 40, 500, 5000] {
            let input = vec![0x41u8; n];
            let out = compress(&input);
            assert_eq!(decompress(&out), input);
            assert_no_distance_one(&out);
        }
    }

    #[test]
    fn round_trips_mixed_data() {
        let mut input = Vec::new();
        input.extend(b"the quick brown fox jumps over the lazy dog. ".repeat(20));
        input.extend(std::iter::repeat(0xFFu8).take(50));
        input.extend(b"the quick brown fox");
        let out = compress(&input);
        assert_eq!(decompress(&out), input);
        assert_eq!(out.len() % 4, 0);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(compress(&[]).is_empty());
    }

    #[test]
    fn tag_mismatch_yields_empty() {
        let mut bogus = vec![0u8; 8];
        bogus[0] = framing::TAG_RLE;
        assert!(decompress(&bogus).is_empty());
    }

    /// Walk every emitted block and confirm no match ever encodes
    /// distance == 1 (the VRAM-safety invariant from spec §8).
    fn assert_no_distance_one(compressed: &[u8]) {
        let (_, size) = framing::parse_header(compressed);
        let mut pos = 4usize;
        let mut produced = 0usize;
        while produced < size as usize && pos < compressed.len() {
            let flag = compressed[pos];
            pos += 1;
            for bit in (0..8).rev() {
                if produced >= size as usize {
                    break;
                }
                if flag & (1 << bit) == 0 {
                    pos += 1;
                    produced += 1;
                } else {
                    let b0 = compressed[pos];
                    let b1 = compressed[pos + 1];
                    pos += 2;
                    let length = (b0 >> 4) as usize + MIN_MATCH;
                    let distance = (((b0 & 0x0F) as usize) << 8 | b1 as usize) + 1;
                    assert!(distance >= 2, "distance-1 back-reference is VRAM-unsafe");
                    produced += length;
                }
            }
        }
    }
}
