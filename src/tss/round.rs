// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use std::sync::Arc;

use crate::tss::{
    error::{Error, RoundErr},
    message::{MessageContent, ParsedMessage},
    params::Parameters,
    party_id::PartyID,
};

/// Result of polling a round for completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateStatus {
    /// Some party's message has not arrived yet; poll again later.
    Pending,
    /// Every party's message for this round has been accepted.
    Ready,
}

impl UpdateStatus {
    pub fn is_ready(self) -> bool {
        self == UpdateStatus::Ready
    }
}

/// A single round within a TSS protocol.
pub trait Round {
    type Content: MessageContent;

    /// Protocol name reported in errors.
    const TASK_NAME: &'static str;

    fn params(&self) -> &Parameters;

    /// Runs the round's own computation and sends its outgoing messages.
    fn start(&self) -> Result<(), Error>;

    /// Accounts for the messages stored so far.
    fn update(&self) -> Result<UpdateStatus, Error>;

    fn round_number(&self) -> i32;

    /// Whether `msg` is of the kind this round collects.
    fn can_accept(&self, msg: &ParsedMessage<Self::Content>) -> bool;

    fn can_proceed(&self) -> bool;

    /// Parties whose message for this round is still outstanding.
    fn waiting_for(&self) -> Vec<Arc<PartyID>>;

    fn wrap_error(&self, cause: RoundErr, culprits: Vec<PartyID>) -> Error {
        Error::new(
            cause,
            Self::TASK_NAME,
            self.round_number(),
            Some(self.params().party_id().as_ref().clone()),
            culprits,
        )
    }
}
