// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use num_bigint::BigInt;
use rand::{CryptoRng, RngCore};

use crate::common::{hash::sha512_256i, random::get_random_int};

const HASH_COMMITMENT_RANDOMNESS_BITS: usize = 256;

pub type HashCommitment = BigInt;
pub type HashDeCommitment = Vec<BigInt>;

/// Hash commitment `c = H(r, secrets..)` with decommitment `d = [r, secrets..]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashCommitDecommit {
    pub c: HashCommitment,
    pub d: HashDeCommitment,
}

impl HashCommitDecommit {
    pub fn new<R: CryptoRng + RngCore>(rng: &mut R, secrets: &[BigInt]) -> Option<Self> {
        let r = get_random_int(rng, HASH_COMMITMENT_RANDOMNESS_BITS)?;
        Self::new_with_randomness(r, secrets)
    }

    pub fn new_with_randomness(r: BigInt, secrets: &[BigInt]) -> Option<Self> {
        let mut parts = Vec::with_capacity(secrets.len() + 1);
        parts.push(r);
        parts.extend_from_slice(secrets);
        let c = sha512_256i(&parts.iter().collect::<Vec<_>>())?;
        Some(HashCommitDecommit { c, d: parts })
    }

    /// Pairs a commitment received in one round with the opening received in a later one.
    pub fn from_parts(c: HashCommitment, d: HashDeCommitment) -> Self {
        HashCommitDecommit { c, d }
    }

    pub fn verify(&self) -> bool {
        if self.d.is_empty() {
            return false;
        }
        match sha512_256i(&self.d.iter().collect::<Vec<_>>()) {
            Some(hash) => hash == self.c,
            None => false,
        }
    }

    /// Returns the committed secrets when the opening matches the commitment.
    pub fn decommit(&self) -> Option<&[BigInt]> {
        if self.verify() {
            Some(&self.d[1..])
        } else {
            None
        }
    }
}
