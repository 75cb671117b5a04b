//! 8-bit run-length coding.
//!
//! After the header (tag [`TAG_RLE`](crate::framing::TAG_RLE)) the payload is
//! a sequence of *stints*, each led by a control byte `C`:
//!
//! * `C & 0x80` set: a run stint. The next byte is the run value, repeated
//!   `(C & 0x7F) + 3` times (length in `3..=130`).
//! * otherwise: a literal stint. The next `C + 1` bytes are copied verbatim
//!   (length in `1..=128`).

use crate::framing;

const RUN_FLAG: u8 = 0x80;
const MAX_RUN: u32 = 0x82; // 130, the point at which a run is forced to end
const MAX_LITERAL: u32 = 128;

/// Compress `input` into a framed RLE stream. Returns an empty vector for
/// empty input.
pub fn compress(input: &[u8]) -> Vec<u8> {
    if input.is_empty() {
        return Vec::new();
    }
    let n = input.len();
    debug_assert!(n as u64 <= framing::MAX_SIZE as u64);

    let mut body = Vec::with_capacity(n + n / 128 + 3);
    let mut prev = input[0];
    let mut rle: u32 = 1;
    let mut non: u32 = 1;

    for i in 1..=n {
        let flush = i == n;
        let mut curr = if flush { !prev } else { input[i] };
        if rle == MAX_RUN || flush {
            curr = !prev;
        }

        if rle < 3 && (non + rle > MAX_LITERAL || flush) {
            // Mini-non flush: the run-in-progress never reached a
            // committable length, so everything pending becomes one
            // literal stint of length `non + rle - 1`.
            let len = non + rle - 1;
            let start = i as i64 - len as i64;
            emit_literal(&mut body, &input[start as usize..i]);
            non = 1;
            rle = 1;
            if !flush {
                prev = curr;
            }
            continue;
        }

        if curr == prev {
            rle += 1;
            if rle == 3 && non > 1 {
                let len = non - 1;
                let start = i as i64 - non as i64 - 1;
                emit_literal(&mut body, &input[start as usize..(start as usize + len as usize)]);
                non = 1;
            }
        } else {
            if rle >= 3 {
                emit_run(&mut body, rle, prev);
                non = 0;
            }
            non += rle;
            rle = 1;
        }
        prev = curr;
    }

    let mut out = Vec::with_capacity(4 + body.len() + 3);
    framing::write_header(&mut out, n as u32, framing::TAG_RLE);
    out.extend_from_slice(&body);
    framing::pad_to_multiple_of_4(&mut out);
    out
}

fn emit_run(body: &mut Vec<u8>, len: u32, value: u8) {
    debug_assert!((3..=130).contains(&len));
    body.push(RUN_FLAG | (len - 3) as u8);
    body.push(value);
}

fn emit_literal(body: &mut Vec<u8>, bytes: &[u8]) {
    debug_assert!(!bytes.is_empty() && bytes.len() <= 128);
    body.push((bytes.len() - 1) as u8);
    body.extend_from_slice(bytes);
}

/// Expand a framed RLE stream. Returns an empty vector if the tag byte does
/// not match [`TAG_RLE`](crate::framing::TAG_RLE), or if `input` is shorter
/// than a header.
pub fn decompress(input: &[u8]) -> Vec<u8> {
    if input.len() < 4 {
        return Vec::new();
    }
    let (tag, size) = framing::parse_header(input);
    if tag != framing::TAG_RLE {
        log::warn!("rle::decompress: tag mismatch (got {:#04x})", tag);
        return Vec::new();
    }

    let mut out = Vec::with_capacity(size as usize);
    let mut pos = 4usize;
    while out.len() < size as usize {
        let Some(&control) = input.get(pos) else {
            log::debug!("rle::decompress: truncated stream after {} bytes", out.len());
            break;
        };
        pos += 1;
        let remaining = size as usize - out.len();
        if control & RUN_FLAG != 0 {
            let Some(&value) = input.get(pos) else { break };
            pos += 1;
            let len = ((control & 0x7F) as usize + 3).min(remaining);
            out.resize(out.len() + len, value);
        } else {
            let len = (control as usize + 1).min(remaining);
            let Some(bytes) = input.get(pos..pos + len) else {
                out.extend_from_slice(&input[pos.min(input.len())..]);
                break;
            };
            out.extend_from_slice(bytes);
            pos += len;
        }
    }
    out
}
