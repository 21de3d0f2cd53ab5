// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Represents a modulus for modular arithmetic operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModInt {
    modulus: BigInt,
}

impl ModInt {
    /// Creates a new `ModInt`. Returns `None` unless the modulus is positive.
    pub fn new(modulus: BigInt) -> Option<Self> {
        if modulus.sign() != Sign::Plus {
            return None;
        }
        Some(ModInt { modulus })
    }

    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    /// Reduces `x` into `[0, mod)`.
    pub fn reduce(&self, x: &BigInt) -> BigInt {
        x.mod_floor(&self.modulus)
    }

    /// Performs modular exponentiation with a non-negative exponent.
    pub fn exp(&self, base: &BigInt, exponent: &BigInt) -> BigInt {
        self.reduce(base).modpow(exponent, &self.modulus)
    }

    /// Calculates `g^-1 mod m`, or `None` when `gcd(g, m) != 1`.
    pub fn mod_inverse(&self, g: &BigInt) -> Option<BigInt> {
        let g = self.reduce(g);
        let egcd = g.extended_gcd(&self.modulus);
        if !egcd.gcd.is_one() {
            return None;
        }
        Some(egcd.x.mod_floor(&self.modulus))
    }
}

/// Returns true iff `gcd(a, b) == 1`.
pub fn is_coprime(a: &BigInt, b: &BigInt) -> bool {
    !a.is_zero() && a.gcd(b).is_one()
}
