// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Threshold-ECDSA distributed key generation: the round that checks every
//! party's Paillier modulus is square-free, with local or TEE-delegated
//! verification.

pub mod common;
pub mod crypto;
pub mod protocols;
pub mod tee;
pub mod tss;
