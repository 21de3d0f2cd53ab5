// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use num_bigint::{BigInt, RandBigInt};
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

const MUST_GET_RANDOM_INT_MAX_BITS: usize = 5000;

/// Returns a uniform integer in `[0, 2^bits)`. Returns `None` when `bits` is
/// zero or larger than the supported maximum.
pub fn get_random_int<R: CryptoRng + RngCore>(rng: &mut R, bits: usize) -> Option<BigInt> {
    if bits == 0 || bits > MUST_GET_RANDOM_INT_MAX_BITS {
        return None;
    }
    let max = BigInt::one() << bits;
    Some(rng.gen_bigint_range(&BigInt::zero(), &max))
}
