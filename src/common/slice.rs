// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use num_bigint::BigInt;

/// Encodes an integer as signed big-endian bytes (two's complement).
pub fn bigint_to_bytes(b: &BigInt) -> Vec<u8> {
    b.to_signed_bytes_be()
}

pub fn bytes_to_bigint(bz: &[u8]) -> BigInt {
    BigInt::from_signed_bytes_be(bz)
}

pub fn bigints_to_bytes(bigints: &[BigInt]) -> Vec<Vec<u8>> {
    bigints.iter().map(bigint_to_bytes).collect()
}

pub fn multi_bytes_to_bigints(bytes: &[Vec<u8>]) -> Vec<BigInt> {
    bytes.iter().map(|bz| bytes_to_bigint(bz)).collect()
}

pub fn non_empty_bytes(bz: &[u8]) -> bool {
    !bz.is_empty()
}

/// True iff every part is non-empty and, when given, the part count matches.
pub fn non_empty_multi_bytes(bzs: &[Vec<u8>], expect_len: Option<usize>) -> bool {
    if let Some(len) = expect_len {
        if bzs.len() != len {
            return false;
        }
    }
    bzs.iter().all(|bz| non_empty_bytes(bz))
}
