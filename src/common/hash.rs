// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use num_bigint::{BigInt, Sign};
use sha2::{Digest, Sha512_256};

const HASH_INPUT_DELIMITER: u8 = b'$';

/// Frames the inputs as `count || (input || '$' || len(input))*` so that
/// different splits of the same bytes never hash alike.
fn prepare_hash_data(inputs: &[&[u8]]) -> Option<Vec<u8>> {
    if inputs.is_empty() {
        return None;
    }

    let bz_size: usize = inputs.iter().map(|bz| bz.len()).sum();
    let mut data = Vec::with_capacity(8 + bz_size + inputs.len() * 9);

    data.extend_from_slice(&(inputs.len() as u64).to_le_bytes());
    for bz in inputs {
        data.extend_from_slice(bz);
        data.push(HASH_INPUT_DELIMITER);
        data.extend_from_slice(&(bz.len() as u64).to_le_bytes());
    }

    Some(data)
}

/// Computes the SHA-512/256 hash of the input byte slices, with delimiters and
/// length prefixes. Returns `None` for an empty input list.
pub fn sha512_256(inputs: &[&[u8]]) -> Option<Vec<u8>> {
    let data = prepare_hash_data(inputs)?;
    Some(Sha512_256::digest(&data).to_vec())
}

/// Computes the SHA-512/256 hash of the input integers (big-endian magnitudes).
pub fn sha512_256i(inputs: &[&BigInt]) -> Option<BigInt> {
    let input_bytes: Vec<Vec<u8>> = inputs.iter().map(|n| n.to_bytes_be().1).collect();
    let input_slices: Vec<&[u8]> = input_bytes.iter().map(|v| v.as_slice()).collect();
    let hash = sha512_256(&input_slices)?;
    Some(BigInt::from_bytes_be(Sign::Plus, &hash))
}

/// Expands the framed hash of `inputs` to at least `bits` bits by hashing it
/// again under an incrementing block counter.
pub fn sha512_256i_expanded(bits: u64, inputs: &[&BigInt]) -> Option<BigInt> {
    let seed = sha512_256i(inputs)?;
    let seed_bytes = seed.to_bytes_be().1;

    let blocks = bits.div_ceil(256).max(1);
    let mut out = Vec::with_capacity(blocks as usize * 32);
    for counter in 0..blocks {
        let ctr = counter.to_be_bytes();
        out.extend(sha512_256(&[&seed_bytes, &ctr])?);
    }
    Some(BigInt::from_bytes_be(Sign::Plus, &out))
}
