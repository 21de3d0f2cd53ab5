// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

// Paillier key material as far as keygen round 3 needs it: the public modulus
// carried in round 1 and the totient the round-2 prover uses.

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::One;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaillierError {
    #[error("key generation failed: {0}")]
    KeyGenerationError(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    /// Paillier modulus n = p * q
    pub n: BigInt,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateKey {
    pub public_key: PublicKey,
    /// Carmichael function lambda(n) = lcm(p-1, q-1)
    pub lambda_n: BigInt,
    /// Euler's totient phi(n) = (p-1)(q-1)
    pub phi_n: BigInt,
}

impl PublicKey {
    pub fn new(n: BigInt) -> Self {
        PublicKey { n }
    }
}

impl PrivateKey {
    /// Builds a key pair from two distinct primes. The primes are trusted; no
    /// primality test is run here.
    pub fn from_primes(p: &BigInt, q: &BigInt) -> Result<Self, PaillierError> {
        if p.sign() != Sign::Plus || q.sign() != Sign::Plus {
            return Err(PaillierError::KeyGenerationError(
                "primes must be positive".to_string(),
            ));
        }
        if p == q {
            return Err(PaillierError::KeyGenerationError(
                "p and q must be distinct".to_string(),
            ));
        }

        let p_minus_1 = p - BigInt::one();
        let q_minus_1 = q - BigInt::one();
        let phi_n = &p_minus_1 * &q_minus_1;
        let lambda_n = &phi_n / p_minus_1.gcd(&q_minus_1);

        Ok(PrivateKey {
            public_key: PublicKey::new(p * q),
            lambda_n,
            phi_n,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey {{ n: {} }}", self.n)
    }
}
