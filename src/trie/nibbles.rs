//! Nibble paths and their hex-prefix (compact) encoding
//!
//! Trie paths are walked four bits at a time: the byte `0xAB` becomes the
//! nibbles `[0xA, 0xB]`. When a path is serialized into a leaf or extension
//! node it is packed back into bytes with a flag nibble in front:
//!
//! ```text
//!   flag nibble   | meaning
//!   0b0000 (0x0)  | extension, even length (followed by a 0 pad nibble)
//!   0b0001 (0x1)  | extension, odd length
//!   0b0010 (0x2)  | leaf, even length (followed by a 0 pad nibble)
//!   0b0011 (0x3)  | leaf, odd length
//! ```

const LEAF_FLAG: u8 = 0x20;
const ODD_FLAG: u8 = 0x10;

/// Split bytes into nibbles, high nibble first
pub fn bytes_to_nibbles(bytes: &[u8]) -> Vec<u8> {
    let mut nibbles = Vec::with_capacity(bytes.len() * 2);
    for byte in bytes {
        nibbles.push(byte >> 4);
        nibbles.push(byte & 0x0F);
    }
    nibbles
}

/// Pack nibbles back into bytes; an odd trailing nibble is padded with 0
pub fn nibbles_to_bytes(nibbles: &[u8]) -> Vec<u8> {
    nibbles
        .chunks(2)
        .map(|chunk| match chunk {
            [hi, lo] => (hi << 4) | lo,
            [hi] => hi << 4,
            _ => unreachable!("chunks(2) yields one or two nibbles"),
        })
        .collect()
}

/// Hex-prefix encode a nibble path
pub fn compact_encode(nibbles: &[u8], is_leaf: bool) -> Vec<u8> {
    debug_assert!(nibbles.iter().all(|n| *n < 16), "nibble out of range");

    let flag = if is_leaf { LEAF_FLAG } else { 0x00 };
    let mut encoded = Vec::with_capacity(nibbles.len() / 2 + 1);

    if nibbles.len() % 2 == 0 {
        encoded.push(flag);
        encoded.extend(nibbles_to_bytes(nibbles));
    } else {
        encoded.push(flag | ODD_FLAG | nibbles[0]);
        encoded.extend(nibbles_to_bytes(&nibbles[1..]));
    }

    encoded
}

/// Decode a hex-prefix encoded path
///
/// Returns `(nibbles, is_leaf)`. An empty input decodes to an empty
/// extension path.
pub fn compact_decode(encoded: &[u8]) -> (Vec<u8>, bool) {
    let Some((&first, rest)) = encoded.split_first() else {
        return (Vec::new(), false);
    };

    let is_leaf = first & LEAF_FLAG != 0;
    let mut nibbles = Vec::with_capacity(rest.len() * 2 + 1);
    if first & ODD_FLAG != 0 {
        nibbles.push(first & 0x0F);
    }
    nibbles.extend(bytes_to_nibbles(rest));

    (nibbles, is_leaf)
}

/// Length of the shared prefix of two nibble paths
pub fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}
