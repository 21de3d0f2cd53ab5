// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use std::sync::Arc;
use std::thread;

use crate::tss::party_id::{PartyID, SortedPartyIDs};

#[derive(Clone, Debug)]
pub struct Parameters {
    party_id: Arc<PartyID>,
    parties: Arc<SortedPartyIDs>,
    threshold: usize,
    concurrency: usize,
}

impl Parameters {
    /// `party_id` is the local party; it is looked up in `parties` by id when
    /// a round starts.
    pub fn new(party_id: Arc<PartyID>, parties: SortedPartyIDs, threshold: usize) -> Self {
        let concurrency = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Parameters {
            party_id,
            parties: Arc::new(parties),
            threshold,
            concurrency,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn party_id(&self) -> &Arc<PartyID> {
        &self.party_id
    }

    pub fn parties(&self) -> &SortedPartyIDs {
        &self.parties
    }

    pub fn party_count(&self) -> usize {
        self.parties.len()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}
