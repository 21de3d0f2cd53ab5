// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::tee::TransportError;
use crate::tss::party_id::PartyID;
use crate::tss::wire::WireError;

/// What went wrong inside a round.
#[derive(Error, Debug)]
pub enum RoundErr {
    #[error("round {0} already started")]
    AlreadyStarted(i32),
    #[error("party {0} is not part of this session")]
    UnknownParty(String),
    #[error("session corrupt: {0}")]
    SessionCorrupt(String),
    #[error("missing round {round} message from party {party}")]
    MissingPriorMessage { round: i32, party: usize },
    #[error("invalid round {round} message from party {party}: {reason}")]
    InvalidPriorMessage { round: i32, party: usize, reason: String },
    #[error("square-free proof of party {0} failed verification")]
    ProofVerificationFailed(PartyID),
    #[error("tee transport: {0}")]
    Transport(#[from] TransportError),
    #[error("invalid tee response: {0}")]
    InvalidRemoteResponse(String),
    #[error("no tee response within {0:?}")]
    TransportTimeout(Duration),
    #[error("broadcast channel closed")]
    BroadcastClosed,
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
    #[error("duplicate round {round} message from party {party}")]
    DuplicateMessage { round: i32, party: usize },
    #[error("unexpected message: {0}")]
    UnexpectedMessage(String),
    #[error("decommitment failed: {0}")]
    DecommitmentFailed(String),
    #[error("wire: {0}")]
    Wire(#[from] WireError),
}

/// A round failure together with where it happened and who caused it.
#[derive(Debug)]
pub struct Error {
    cause: RoundErr,
    task: String,
    round: i32,
    victim: Option<PartyID>,
    culprits: Vec<PartyID>,
}

impl Error {
    pub fn new(
        cause: RoundErr,
        task: impl Into<String>,
        round: i32,
        victim: Option<PartyID>,
        culprits: Vec<PartyID>,
    ) -> Self {
        Error {
            cause,
            task: task.into(),
            round,
            victim,
            culprits,
        }
    }

    pub fn cause(&self) -> &RoundErr {
        &self.cause
    }

    pub fn into_cause(self) -> RoundErr {
        self.cause
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn round(&self) -> i32 {
        self.round
    }

    pub fn victim(&self) -> Option<&PartyID> {
        self.victim.as_ref()
    }

    pub fn culprits(&self) -> &[PartyID] {
        &self.culprits
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let victim = self
            .victim
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        if self.culprits.is_empty() {
            write!(f, "task {}, party {}, round {}: {}", self.task, victim, self.round, self.cause)
        } else {
            let culprits: Vec<String> = self.culprits.iter().map(|c| c.to_string()).collect();
            write!(
                f,
                "task {}, party {}, round {}, culprits [{}]: {}",
                self.task,
                victim,
                self.round,
                culprits.join(" "),
                self.cause
            )
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}
