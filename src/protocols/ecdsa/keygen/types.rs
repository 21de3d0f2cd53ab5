// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use std::sync::Arc;

use crate::crypto::{commitments::HashCommitDecommit, ecpoint::ECPoint};
use crate::protocols::ecdsa::keygen::messages::KGMessage;
use crate::tss::{error::RoundErr, message::ParsedMessage};

pub type KGParsedMessage = ParsedMessage<KGMessage>;

/// One round's messages, one write-once slot per party index.
#[derive(Clone, Debug)]
pub struct MessageStore {
    round: i32,
    slots: Vec<Option<Arc<KGParsedMessage>>>,
}

impl MessageStore {
    pub fn new(round: i32, party_count: usize) -> Self {
        MessageStore {
            round,
            slots: vec![None; party_count],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<KGParsedMessage>> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    pub fn put(&mut self, index: usize, msg: Arc<KGParsedMessage>) -> Result<(), RoundErr> {
        let round = self.round;
        match self.slots.get_mut(index) {
            None => Err(RoundErr::UnexpectedMessage(format!(
                "round {} slot {} out of range ({} parties)",
                round,
                index,
                self.slots.len()
            ))),
            Some(Some(_)) => Err(RoundErr::DuplicateMessage { round, party: index }),
            Some(slot) => {
                *slot = Some(msg);
                Ok(())
            }
        }
    }

    /// Number of slots written so far.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

/// State shared by the rounds of one keygen session.
#[derive(Debug)]
pub struct LocalTempData {
    pub kg_round1_messages: MessageStore,
    pub kg_round2_message1s: MessageStore,
    pub kg_round2_message2s: MessageStore,
    pub kg_round3_messages: MessageStore,

    // own round 1 and 2 outputs
    pub commit_u1g: Option<HashCommitDecommit>,
    pub commit_c1g: Option<HashCommitDecommit>,
    pub u1_poly_g: Option<Vec<ECPoint>>,

    // round 4
    pub u1_gs: Vec<Option<ECPoint>>,
    pub c1_gs: Vec<Option<ECPoint>>,
}

impl LocalTempData {
    pub fn new(party_count: usize) -> Self {
        LocalTempData {
            kg_round1_messages: MessageStore::new(1, party_count),
            kg_round2_message1s: MessageStore::new(2, party_count),
            kg_round2_message2s: MessageStore::new(2, party_count),
            kg_round3_messages: MessageStore::new(3, party_count),
            commit_u1g: None,
            commit_c1g: None,
            u1_poly_g: None,
            u1_gs: vec![None; party_count],
            c1_gs: vec![None; party_count],
        }
    }

    /// True iff every store has exactly `party_count` slots.
    pub fn is_sized_for(&self, party_count: usize) -> bool {
        [
            &self.kg_round1_messages,
            &self.kg_round2_message1s,
            &self.kg_round2_message2s,
            &self.kg_round3_messages,
        ]
        .iter()
        .all(|store| store.len() == party_count)
            && self.u1_gs.len() == party_count
            && self.c1_gs.len() == party_count
    }

    /// The store a message of this kind belongs in.
    pub fn store_for(&mut self, content: &KGMessage) -> &mut MessageStore {
        match content {
            KGMessage::Round1(_) => &mut self.kg_round1_messages,
            KGMessage::Round2Message1(_) => &mut self.kg_round2_message1s,
            KGMessage::Round2Message2(_) => &mut self.kg_round2_message2s,
            KGMessage::Round3(_) => &mut self.kg_round3_messages,
        }
    }

    /// The opened `u1*G` and `c1*G` of every party, once round 4 has filled them all.
    pub fn opened_points(&self) -> Option<(Vec<ECPoint>, Vec<ECPoint>)> {
        let u1_gs = self.u1_gs.iter().cloned().collect::<Option<Vec<_>>>()?;
        let c1_gs = self.c1_gs.iter().cloned().collect::<Option<Vec<_>>>()?;
        Some((u1_gs, c1_gs))
    }
}
