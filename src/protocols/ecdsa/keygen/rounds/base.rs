// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::tss::party_id::{PartyID, SortedPartyIDs};

/// Round bookkeeping: the started flag and one `ok` flag per party.
#[derive(Debug)]
pub(crate) struct BaseRound {
    round_num: i32,
    ok: Mutex<Vec<bool>>,
    started: AtomicBool,
}

impl BaseRound {
    pub fn new(round_num: i32, party_count: usize) -> Self {
        Self {
            round_num,
            ok: Mutex::new(vec![false; party_count]),
            started: AtomicBool::new(false),
        }
    }

    pub fn round_number(&self) -> i32 {
        self.round_num
    }

    pub fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Marks the round started. Returns false if it already was.
    pub fn try_start(&self) -> bool {
        self.started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn clear_started(&self) {
        self.started.store(false, Ordering::SeqCst);
    }

    // a panic while holding the guard cannot leave a Vec<bool> half-written
    fn ok_guard(&self) -> MutexGuard<'_, Vec<bool>> {
        self.ok.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn reset_ok(&self) {
        self.ok_guard().iter_mut().for_each(|ok| *ok = false);
    }

    pub fn set_ok(&self, party_index: usize) {
        match self.ok_guard().get_mut(party_index) {
            Some(ok) => *ok = true,
            None => log::error!("set_ok index out of bounds: {}", party_index),
        }
    }

    pub fn is_ok(&self, party_index: usize) -> bool {
        self.ok_guard().get(party_index).copied().unwrap_or(false)
    }

    pub fn all_ok(&self) -> bool {
        self.ok_guard().iter().all(|ok| *ok)
    }

    pub fn waiting_for(&self, parties: &SortedPartyIDs) -> Vec<Arc<PartyID>> {
        let ok = self.ok_guard();
        parties
            .iter()
            .enumerate()
            .filter(|(idx, _)| !ok.get(*idx).copied().unwrap_or(false))
            .map(|(_, pid)| pid.clone())
            .collect()
    }
}
