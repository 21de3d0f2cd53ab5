// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Affine secp256k1 points carried as big-integer coordinates.
//!
//! Keygen messages move points around as `(x, y)` pairs; every constructor
//! checks the pair against the curve with `k256` so that a value of this type
//! is always a valid, non-identity point.

use k256::{
    elliptic_curve::{
        sec1::{FromEncodedPoint, ToEncodedPoint},
        PrimeField,
    },
    AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar,
};
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use once_cell::sync::Lazy;
use std::fmt;
use thiserror::Error;

use crate::common::slice::{bigint_to_bytes, bytes_to_bigint};

const COORD_BYTES: usize = 32;

const SECP256K1_ORDER_BYTES: [u8; COORD_BYTES] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Order `q` of the secp256k1 base point.
pub static SECP256K1_ORDER: Lazy<BigInt> =
    Lazy::new(|| BigInt::from_bytes_be(Sign::Plus, &SECP256K1_ORDER_BYTES));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PointError {
    #[error("point is not on curve: x={x}, y={y}")]
    NotOnCurve { x: BigInt, y: BigInt },
    #[error("invalid coordinates: {0}")]
    InvalidCoords(String),
    #[error("scalar multiplication produced the point at infinity")]
    Identity,
}

#[derive(Clone, PartialEq, Eq)]
pub struct ECPoint {
    x: BigInt,
    y: BigInt,
}

impl ECPoint {
    /// Creates a point from affine coordinates. Fails unless `(x, y)` is on secp256k1.
    pub fn new(x: BigInt, y: BigInt) -> Result<Self, PointError> {
        if to_affine(&x, &y).is_none() {
            return Err(PointError::NotOnCurve { x, y });
        }
        Ok(ECPoint { x, y })
    }

    /// Computes `k * G`, reducing `k` mod the group order first.
    pub fn scalar_base_mult(k: &BigInt) -> Result<Self, PointError> {
        let k = k.mod_floor(&SECP256K1_ORDER);
        let repr = field_bytes(&k)
            .ok_or_else(|| PointError::InvalidCoords("scalar does not fit the field".to_string()))?;
        let scalar: Option<Scalar> = Scalar::from_repr(repr).into();
        let scalar =
            scalar.ok_or_else(|| PointError::InvalidCoords("scalar out of range".to_string()))?;

        let point = (ProjectivePoint::GENERATOR * scalar).to_affine();
        Self::from_affine(&point)
    }

    fn from_affine(point: &AffinePoint) -> Result<Self, PointError> {
        let encoded = point.to_encoded_point(false);
        match (encoded.x(), encoded.y()) {
            (Some(x), Some(y)) => Ok(ECPoint {
                x: BigInt::from_bytes_be(Sign::Plus, x),
                y: BigInt::from_bytes_be(Sign::Plus, y),
            }),
            _ => Err(PointError::Identity),
        }
    }

    pub fn x(&self) -> &BigInt {
        &self.x
    }

    pub fn y(&self) -> &BigInt {
        &self.y
    }

    pub fn coords(&self) -> [BigInt; 2] {
        [self.x.clone(), self.y.clone()]
    }

    pub fn is_on_curve(&self) -> bool {
        to_affine(&self.x, &self.y).is_some()
    }

    pub fn to_bytes(&self) -> [Vec<u8>; 2] {
        [bigint_to_bytes(&self.x), bigint_to_bytes(&self.y)]
    }

    pub fn from_bytes(x: &[u8], y: &[u8]) -> Result<Self, PointError> {
        Self::new(bytes_to_bigint(x), bytes_to_bigint(y))
    }
}

impl fmt::Debug for ECPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ECPoint({:x}, {:x})", self.x, self.y)
    }
}

fn field_bytes(v: &BigInt) -> Option<FieldBytes> {
    let (sign, bz) = v.to_bytes_be();
    if sign == Sign::Minus || bz.len() > COORD_BYTES {
        return None;
    }
    let mut buf = [0u8; COORD_BYTES];
    buf[COORD_BYTES - bz.len()..].copy_from_slice(&bz);
    Some(FieldBytes::from(buf))
}

fn to_affine(x: &BigInt, y: &BigInt) -> Option<AffinePoint> {
    let x = field_bytes(x)?;
    let y = field_bytes(y)?;
    let encoded = EncodedPoint::from_affine_coordinates(&x, &y, false);
    AffinePoint::from_encoded_point(&encoded).into()
}
