// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

mod base;
pub mod round_3;
pub mod round_4;
pub mod sf_verifier;

use std::sync::Arc;

pub use round_3::Round3;
pub use round_4::Round4;
pub use sf_verifier::{ProofArtifact, TeeVerifier, VerificationMode, VerifyFailure};

use crate::protocols::ecdsa::keygen::types::KGParsedMessage;
use crate::tss::{
    error::Error,
    party_id::PartyID,
    round::{Round, UpdateStatus},
};

/// The keygen rounds a party can currently be in.
pub enum KeygenRound {
    Round3(Round3),
    Round4(Round4),
}

impl KeygenRound {
    pub fn start(&self) -> Result<(), Error> {
        match self {
            KeygenRound::Round3(r) => r.start(),
            KeygenRound::Round4(r) => r.start(),
        }
    }

    pub fn update(&self) -> Result<UpdateStatus, Error> {
        match self {
            KeygenRound::Round3(r) => r.update(),
            KeygenRound::Round4(r) => r.update(),
        }
    }

    pub fn can_accept(&self, msg: &KGParsedMessage) -> bool {
        match self {
            KeygenRound::Round3(r) => r.can_accept(msg),
            KeygenRound::Round4(r) => r.can_accept(msg),
        }
    }

    pub fn can_proceed(&self) -> bool {
        match self {
            KeygenRound::Round3(r) => r.can_proceed(),
            KeygenRound::Round4(r) => r.can_proceed(),
        }
    }

    pub fn round_number(&self) -> i32 {
        match self {
            KeygenRound::Round3(r) => r.round_number(),
            KeygenRound::Round4(r) => r.round_number(),
        }
    }

    pub fn waiting_for(&self) -> Vec<Arc<PartyID>> {
        match self {
            KeygenRound::Round3(r) => r.waiting_for(),
            KeygenRound::Round4(r) => r.waiting_for(),
        }
    }

    /// The round after this one; `None` once round 4 is done.
    pub fn next_round(&self) -> Option<KeygenRound> {
        match self {
            KeygenRound::Round3(r) => Some(KeygenRound::Round4(r.next_round())),
            KeygenRound::Round4(_) => None,
        }
    }
}
