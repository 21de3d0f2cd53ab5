// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! ECDSA distributed key generation, from the square-free check of round 3
//! onwards. The outputs of rounds 1 and 2 are expected in [`LocalTempData`].

pub mod local_party;
pub mod messages;
pub mod rounds;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use local_party::LocalParty;
pub use messages::{KGMessage, KGRound1Message, KGRound2Message1, KGRound2Message2, KGRound3Message};
pub use rounds::{KeygenRound, Round3, Round4, TeeVerifier, VerificationMode};
pub use types::{KGParsedMessage, LocalTempData, MessageStore};

pub const TASK_NAME: &str = "ecdsa-keygen";
