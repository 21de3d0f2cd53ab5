// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use log::{error, info};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::crypto::{
    commitments::{HashCommitDecommit, HashCommitment, HashDeCommitment},
    ecpoint::ECPoint,
};
use crate::protocols::ecdsa::keygen::{
    messages::KGMessage,
    rounds::base::BaseRound,
    types::{KGParsedMessage, LocalTempData},
    TASK_NAME,
};
use crate::tss::{
    error::{Error, RoundErr},
    params::Parameters,
    party_id::PartyID,
    round::{Round, UpdateStatus},
};

/// Opens every party's round 1 commitments with the round 3 decommitments and
/// checks the opened `u1*G` against the polynomial commitment.
pub struct Round4 {
    base: BaseRound,
    params: Arc<Parameters>,
    temp: Arc<Mutex<LocalTempData>>,
}

struct Opened {
    u1g: ECPoint,
    c1g: ECPoint,
}

fn open_point(c: &HashCommitment, d: &HashDeCommitment) -> Result<ECPoint, String> {
    let cmt = HashCommitDecommit::from_parts(c.clone(), d.clone());
    match cmt.decommit() {
        Some([x, y]) => ECPoint::new(x.clone(), y.clone()).map_err(|e| e.to_string()),
        Some(secrets) => Err(format!("expected 2 committed values, got {}", secrets.len())),
        None => Err("decommitment does not match commitment".to_string()),
    }
}

impl Round4 {
    pub fn new(params: Arc<Parameters>, temp: Arc<Mutex<LocalTempData>>) -> Self {
        let base = BaseRound::new(4, params.party_count());
        Self { base, params, temp }
    }

    pub fn started(&self) -> bool {
        self.base.started()
    }

    fn lock_temp(&self) -> Result<MutexGuard<'_, LocalTempData>, Error> {
        self.temp
            .lock()
            .map_err(|_| self.wrap_error(RoundErr::LockPoisoned("temp data".to_string()), vec![]))
    }

    fn open(&self, temp: &LocalTempData, j: usize) -> Result<Opened, RoundErr> {
        let r1 = match temp.kg_round1_messages.get(j).map(|m| m.content()) {
            Some(KGMessage::Round1(r1)) => r1,
            _ => return Err(RoundErr::MissingPriorMessage { round: 1, party: j }),
        };
        let r3 = match temp.kg_round3_messages.get(j).map(|m| m.content()) {
            Some(KGMessage::Round3(r3)) => r3,
            _ => return Err(RoundErr::MissingPriorMessage { round: 3, party: j }),
        };
        let invalid = |reason: String| RoundErr::InvalidPriorMessage { round: 3, party: j, reason };

        let u1g = open_point(&r1.com_u1g_c, &r3.com_u1g_d)
            .map_err(|e| invalid(format!("u1G: {}", e)))?;
        let c1g = open_point(&r1.com_c1g_c, &r3.com_c1g_d)
            .map_err(|e| invalid(format!("c1G: {}", e)))?;

        let expected = self.params.threshold() + 1;
        if r3.u1_poly_gg.len() != expected {
            return Err(invalid(format!(
                "polynomial commitment has {} points, want {}",
                r3.u1_poly_gg.len(),
                expected
            )));
        }
        if r3.u1_poly_gg[0] != u1g {
            return Err(invalid("polynomial commitment does not start with u1G".to_string()));
        }
        Ok(Opened { u1g, c1g })
    }
}

impl Round for Round4 {
    type Content = KGMessage;

    const TASK_NAME: &'static str = TASK_NAME;

    fn params(&self) -> &Parameters {
        &self.params
    }

    fn round_number(&self) -> i32 {
        self.base.round_number()
    }

    fn start(&self) -> Result<(), Error> {
        if !self.base.try_start() {
            return Err(self.wrap_error(RoundErr::AlreadyStarted(self.round_number()), vec![]));
        }
        self.base.reset_ok();

        let mut temp = self.lock_temp()?;
        let parties = self.params.parties();

        let mut opened = Vec::with_capacity(parties.len());
        let mut culprits: Vec<PartyID> = Vec::new();
        let mut reasons = Vec::new();
        for (j, party) in parties.iter().enumerate() {
            match self.open(&temp, j) {
                Ok(o) => opened.push(o),
                Err(e) => {
                    error!("round 4 party {}: {}", party, e);
                    culprits.push(party.as_ref().clone());
                    reasons.push(e.to_string());
                }
            }
        }
        if !culprits.is_empty() {
            return Err(self.wrap_error(RoundErr::DecommitmentFailed(reasons.join("; ")), culprits));
        }

        for (j, o) in opened.into_iter().enumerate() {
            temp.u1_gs[j] = Some(o.u1g);
            temp.c1_gs[j] = Some(o.c1g);
        }
        info!(
            "party {} round 4 opened the commitments of {} parties",
            self.params.party_id(),
            parties.len()
        );
        Ok(())
    }

    fn can_accept(&self, _msg: &KGParsedMessage) -> bool {
        false
    }

    fn update(&self) -> Result<UpdateStatus, Error> {
        if !self.base.started() || self.lock_temp()?.opened_points().is_none() {
            return Ok(UpdateStatus::Pending);
        }
        for j in 0..self.params.party_count() {
            self.base.set_ok(j);
        }
        Ok(UpdateStatus::Ready)
    }

    fn can_proceed(&self) -> bool {
        self.base.started() && self.base.all_ok()
    }

    fn waiting_for(&self) -> Vec<Arc<PartyID>> {
        self.base.waiting_for(self.params.parties())
    }
}
