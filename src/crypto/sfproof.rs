// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Non-interactive zero-knowledge proof that a modulus `N` is square-free.
//!
//! Gennaro, Micciancio and Rabin, "An Efficient Non-Interactive Statistical
//! Zero-Knowledge Proof System for Quasi-Safe Prime Products", section 3.1.
//! The verifier derives `ITERATIONS` challenges `rho_i` in `Z_N` from
//! `(N, num, i)`; the prover answers each with the `N`-th root
//! `sigma_i = rho_i^(N^-1 mod phi(N))`. `N`-th roots of random elements only
//! exist for every element when `gcd(N, phi(N)) = 1`, which holds iff `N` is
//! square-free.

use log::{debug, error};
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, ToPrimitive};
use once_cell::sync::Lazy;
use thiserror::Error;

use crate::common::{
    hash::sha512_256i_expanded,
    int::{is_coprime, ModInt},
    slice::{bigints_to_bytes, multi_bytes_to_bigints, non_empty_multi_bytes},
};

/// Number of challenges answered by one proof.
pub const ITERATIONS: usize = 13;
/// The verifier rejects moduli divisible by any prime below this bound.
pub const VERIFY_PRIMES_UNTIL: u64 = 1000;
/// Extra challenge bits so that reducing mod `N` stays close to uniform.
const CHALLENGE_SLACK_BITS: u64 = 64;

static SMALL_PRIMES: Lazy<Vec<u64>> = Lazy::new(|| primes_below(VERIFY_PRIMES_UNTIL));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SquareFreeError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("modulus is not square-free: gcd(N, phi(N)) != 1")]
    NotSquareFree,
    #[error("challenge {0} is not invertible mod N")]
    DegenerateChallenge(usize),
    #[error("byte conversion error: expected {expected} parts, got {got}")]
    ByteConversionError { expected: usize, got: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SquareFreeProof {
    pub sigma: Vec<BigInt>,
}

impl SquareFreeProof {
    /// Proves `n` square-free given `phi_n = phi(n)`. `num` is the public
    /// auxiliary number that binds the challenges to this session.
    pub fn new(n: &BigInt, num: &BigInt, phi_n: &BigInt) -> Result<Self, SquareFreeError> {
        if n <= &BigInt::one() || phi_n.sign() != Sign::Plus {
            return Err(SquareFreeError::InvalidParameters(
                "N must be > 1 and phi(N) positive".to_string(),
            ));
        }
        let mod_phi = ModInt::new(phi_n.clone()).ok_or_else(|| {
            SquareFreeError::InvalidParameters("phi(N) must be positive".to_string())
        })?;
        let n_inv = mod_phi.mod_inverse(n).ok_or(SquareFreeError::NotSquareFree)?;

        let mod_n = ModInt::new(n.clone())
            .ok_or_else(|| SquareFreeError::InvalidParameters("N must be positive".to_string()))?;
        let rhos = challenges(n, num).ok_or_else(|| {
            SquareFreeError::InvalidParameters("failed to derive challenges".to_string())
        })?;

        let mut sigma = Vec::with_capacity(ITERATIONS);
        for (i, rho) in rhos.iter().enumerate() {
            if !is_coprime(rho, n) {
                return Err(SquareFreeError::DegenerateChallenge(i));
            }
            sigma.push(mod_n.exp(rho, &n_inv));
        }
        Ok(SquareFreeProof { sigma })
    }

    /// Verifies the proof for modulus `n` and auxiliary number `num`.
    pub fn verify(&self, n: &BigInt, num: &BigInt) -> bool {
        if self.sigma.len() != ITERATIONS {
            error!("square-free proof: expected {} elements, got {}", ITERATIONS, self.sigma.len());
            return false;
        }
        let mod_n = match ModInt::new(n.clone()) {
            Some(m) if n > &BigInt::one() => m,
            _ => {
                error!("square-free proof: N must be > 1");
                return false;
            }
        };
        if n.is_even() {
            error!("square-free proof: N is even");
            return false;
        }
        if let Some(p) = small_prime_factor(n) {
            error!("square-free proof: N is divisible by small prime {}", p);
            return false;
        }

        let rhos = match challenges(n, num) {
            Some(rhos) => rhos,
            None => return false,
        };

        for (i, (sigma_i, rho_i)) in self.sigma.iter().zip(rhos.iter()).enumerate() {
            if sigma_i.sign() != Sign::Plus || sigma_i >= n {
                debug!("square-free proof: sigma_{} out of range", i);
                return false;
            }
            if !is_coprime(rho_i, n) {
                debug!("square-free proof: rho_{} shares a factor with N", i);
                return false;
            }
            if &mod_n.exp(sigma_i, n) != rho_i {
                debug!("square-free proof: sigma_{}^N != rho_{} (mod N)", i, i);
                return false;
            }
        }
        true
    }

    pub fn to_bytes(&self) -> Vec<Vec<u8>> {
        bigints_to_bytes(&self.sigma)
    }

    pub fn from_bytes(bzs: &[Vec<u8>]) -> Result<Self, SquareFreeError> {
        if !non_empty_multi_bytes(bzs, Some(ITERATIONS)) {
            return Err(SquareFreeError::ByteConversionError {
                expected: ITERATIONS,
                got: bzs.len(),
            });
        }
        Ok(SquareFreeProof { sigma: multi_bytes_to_bigints(bzs) })
    }
}

/// Derives `rho_i = H(N, num, i) mod N` for every iteration.
fn challenges(n: &BigInt, num: &BigInt) -> Option<Vec<BigInt>> {
    let bits = n.bits() + CHALLENGE_SLACK_BITS;
    (0..ITERATIONS)
        .map(|i| {
            let i_big = BigInt::from(i);
            sha512_256i_expanded(bits, &[n, num, &i_big]).map(|h| h.mod_floor(n))
        })
        .collect()
}

fn small_prime_factor(n: &BigInt) -> Option<u64> {
    SMALL_PRIMES.iter().copied().find(|&p| {
        let p_big = BigInt::from(p);
        // a prime N below the bound is its own factor and still square-free
        n != &p_big && (n % &p_big).to_u64() == Some(0)
    })
}

fn primes_below(limit: u64) -> Vec<u64> {
    let limit = limit as usize;
    let mut sieve = vec![true; limit];
    let mut primes = Vec::new();
    for i in 2..limit {
        if sieve[i] {
            primes.push(i as u64);
            let mut j = i * i;
            while j < limit {
                sieve[j] = false;
                j += i;
            }
        }
    }
    primes
}
