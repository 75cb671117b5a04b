//! Cross-codec integration tests: header laws and round-trips that exercise
//! the public API surface rather than any one module's internals.

use retrocodec::{
    huffman_decode, huffman_encode, lz_compress, lz_decompress, rle_compress, rle_decompress,
    HuffmanWidth,
};

fn corpus() -> Vec<Vec<u8>> {
    vec![
        b"".to_vec(),
        b"A".to_vec(),
        b"AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".to_vec(),
        b"the quick brown fox jumps over the lazy dog".to_vec(),
        b"the quick brown fox jumps over the lazy dog".repeat(30),
        (0..=255u8).collect(),
        (0..2000u32).map(|i| ((i * 13 + i / 7) % 251) as u8).collect(),
    ]
}

#[test]
fn lz_round_trips_corpus() {
    for input in corpus() {
        let packed = lz_compress(&input);
        assert_eq!(lz_decompress(&packed), input, "input len {}", input.len());
    }
}

#[test]
fn rle_round_trips_corpus() {
    for input in corpus() {
        let packed = rle_compress(&input);
        assert_eq!(rle_decompress(&packed), input, "input len {}", input.len());
    }
}

#[test]
fn huffman_round_trips_corpus_both_widths() {
    for input in corpus() {
        for width in [HuffmanWidth::Four, HuffmanWidth::Eight] {
            let packed = huffman_encode(&input, width);
            assert_eq!(
                huffman_decode(&packed),
                input,
                "width {:?}, input len {}",
                width,
                input.len()
            );
        }
    }
}

#[test]
fn empty_input_produces_empty_output_for_every_codec() {
    assert!(lz_compress(&[]).is_empty());
    assert!(rle_compress(&[]).is_empty());
    assert!(huffman_encode(&[], HuffmanWidth::Eight).is_empty());
    assert!(huffman_encode(&[], HuffmanWidth::Four).is_empty());
}

#[test]
fn every_codec_emits_a_4_byte_aligned_stream() {
    let input = b"the quick brown fox jumps over the lazy dog".repeat(7);
    assert_eq!(lz_compress(&input).len() % 4, 0);
    assert_eq!(rle_compress(&input).len() % 4, 0);
    assert_eq!(huffman_encode(&input, HuffmanWidth::Eight).len() % 4, 0);
    assert_eq!(huffman_encode(&input, HuffmanWidth::Four).len() % 4, 0);
}

#[test]
fn each_decoder_rejects_a_stream_tagged_for_a_different_codec() {
    let input = b"cross-tag rejection".to_vec();
    let lz = lz_compress(&input);
    let rle = rle_compress(&input);
    let huff = huffman_encode(&input, HuffmanWidth::Eight);

    // Feed each codec's decoder the other two codecs' output; none of the
    // tags match, so every decode is empty rather than misinterpreting
    // unrelated bytes as a valid stream.
    assert!(lz_decompress(&rle).is_empty());
    assert!(lz_decompress(&huff).is_empty());
    assert!(rle_decompress(&lz).is_empty());
    assert!(rle_decompress(&huff).is_empty());
    assert!(huffman_decode(&lz).is_empty());
    assert!(huffman_decode(&rle).is_empty());
}
