// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use log::{debug, info};
use std::fmt;
use std::sync::mpsc::SyncSender;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::protocols::ecdsa::keygen::{
    rounds::{KeygenRound, Round3, VerificationMode},
    types::{KGParsedMessage, LocalTempData},
    TASK_NAME,
};
use crate::tss::{
    error::{Error, RoundErr},
    params::Parameters,
    party_id::PartyID,
    round::UpdateStatus,
    wire::parse_wire_message,
};

/// Drives one party through keygen from round 3 on. Rounds 1 and 2 have
/// already filled `temp`.
pub struct LocalParty {
    params: Arc<Parameters>,
    temp: Arc<Mutex<LocalTempData>>,
    // None once the last round is done
    round: Mutex<Option<KeygenRound>>,
}

impl LocalParty {
    pub fn new(
        params: Arc<Parameters>,
        temp: Arc<Mutex<LocalTempData>>,
        out_ch: SyncSender<Arc<KGParsedMessage>>,
        mode: VerificationMode,
    ) -> Self {
        let round3 = Round3::new(params.clone(), temp.clone(), out_ch, Arc::new(mode));
        LocalParty {
            params,
            temp,
            round: Mutex::new(Some(KeygenRound::Round3(round3))),
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn temp(&self) -> &Arc<Mutex<LocalTempData>> {
        &self.temp
    }

    pub fn start(&self) -> Result<(), Error> {
        let mut round = self.lock_round()?;
        let current = round.as_ref().ok_or_else(|| self.finished_error())?;
        info!("party {} starting keygen round {}", self.params.party_id(), current.round_number());
        current.start()?;
        self.advance(&mut round).map(|_| ())
    }

    /// Puts `msg` into the store slot of its sender.
    pub fn store_message(&self, msg: Arc<KGParsedMessage>) -> Result<(), Error> {
        self.store_in_round(self.round_number().unwrap_or(0), msg)
    }

    fn store_in_round(&self, round_num: i32, msg: Arc<KGParsedMessage>) -> Result<(), Error> {
        let wrap_error = |cause, culprits| self.wrap_error_in(round_num, cause, culprits);
        let from = self
            .params
            .parties()
            .find_by_id(msg.from().id())
            .cloned()
            .ok_or_else(|| {
                let reason = format!("message from unknown party {}", msg.from().id());
                wrap_error(RoundErr::UnexpectedMessage(reason), vec![])
            })?;
        let culprit = || vec![from.as_ref().clone()];
        let index = from.index().ok_or_else(|| {
            wrap_error(RoundErr::SessionCorrupt("party list is not sorted".to_string()), vec![])
        })?;
        if !msg.validate_basic() {
            return Err(wrap_error(
                RoundErr::UnexpectedMessage(format!("message failed basic validation: {}", msg)),
                culprit(),
            ));
        }
        // a mis-routed copy must not take the slot of the real message
        if msg.is_broadcast() != msg.content().is_broadcast_kind() {
            return Err(wrap_error(
                RoundErr::UnexpectedMessage(format!("wrong routing for {}", msg)),
                culprit(),
            ));
        }

        let mut temp = self
            .temp
            .lock()
            .map_err(|_| wrap_error(RoundErr::LockPoisoned("temp data".to_string()), vec![]))?;
        temp.store_for(msg.content())
            .put(index, msg.clone())
            .map_err(|e| wrap_error(e, culprit()))?;
        debug!("party {} stored {}", self.params.party_id(), msg);
        Ok(())
    }

    /// Stores `msg` and moves through every round that is ready.
    pub fn update(&self, msg: Arc<KGParsedMessage>) -> Result<UpdateStatus, Error> {
        let mut round = self.lock_round()?;
        let round_num = round.as_ref().ok_or_else(|| self.finished_error())?.round_number();
        self.store_in_round(round_num, msg)?;
        self.advance(&mut round)
    }

    /// Parses wire bytes sent by the party with id `from_id`, then updates.
    pub fn update_from_bytes(
        &self,
        wire_bytes: &[u8],
        from_id: &str,
        is_broadcast: bool,
    ) -> Result<UpdateStatus, Error> {
        let from = self.params.parties().find_by_id(from_id).cloned().ok_or_else(|| {
            self.wrap_error(
                RoundErr::UnexpectedMessage(format!("message from unknown party {}", from_id)),
                vec![],
            )
        })?;
        let msg = parse_wire_message(wire_bytes, from.clone(), is_broadcast)
            .map_err(|e| self.wrap_error(RoundErr::Wire(e), vec![from.as_ref().clone()]))?;
        self.update(Arc::new(msg))
    }

    pub fn running(&self) -> bool {
        self.round.lock().map(|r| r.is_some()).unwrap_or(false)
    }

    /// The current round, or `None` when keygen is done.
    pub fn round_number(&self) -> Option<i32> {
        self.round.lock().ok().and_then(|r| r.as_ref().map(|r| r.round_number()))
    }

    pub fn waiting_for(&self) -> Vec<Arc<PartyID>> {
        match self.round.lock() {
            Ok(r) => r.as_ref().map(|r| r.waiting_for()).unwrap_or_default(),
            Err(_) => vec![],
        }
    }

    fn lock_round(&self) -> Result<MutexGuard<'_, Option<KeygenRound>>, Error> {
        self.round.lock().map_err(|_| {
            self.wrap_error_in(0, RoundErr::LockPoisoned("current round".to_string()), vec![])
        })
    }

    fn finished_error(&self) -> Error {
        let cause = RoundErr::UnexpectedMessage("keygen already finished".to_string());
        self.wrap_error_in(0, cause, vec![])
    }

    fn advance(&self, round: &mut Option<KeygenRound>) -> Result<UpdateStatus, Error> {
        loop {
            let current = match round.as_ref() {
                Some(current) => current,
                None => return Ok(UpdateStatus::Ready),
            };
            if !current.update()?.is_ready() || !current.can_proceed() {
                return Ok(UpdateStatus::Pending);
            }
            match current.next_round() {
                Some(next) => {
                    info!(
                        "party {} finished round {}, starting round {}",
                        self.params.party_id(),
                        current.round_number(),
                        next.round_number()
                    );
                    // a failed start leaves the party parked in the new round
                    let next = round.insert(next);
                    next.start()?;
                }
                None => {
                    info!("party {} finished keygen", self.params.party_id());
                    *round = None;
                    return Ok(UpdateStatus::Ready);
                }
            }
        }
    }

    // must not be called with the round lock held
    fn wrap_error(&self, cause: RoundErr, culprits: Vec<PartyID>) -> Error {
        self.wrap_error_in(self.round_number().unwrap_or(0), cause, culprits)
    }

    fn wrap_error_in(&self, round: i32, cause: RoundErr, culprits: Vec<PartyID>) -> Error {
        Error::new(cause, TASK_NAME, round, Some(self.params.party_id().as_ref().clone()), culprits)
    }
}

impl fmt::Display for LocalParty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id: {}, round: ", self.params.party_id())?;
        match self.round_number() {
            Some(r) => write!(f, "{}", r),
            None => write!(f, "done"),
        }
    }
}
