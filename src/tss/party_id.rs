// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use num_bigint::BigInt;
use std::fmt;
use std::sync::Arc;

/// A participant of a session. `key` orders the participants; `index` is the
/// position in that order and is only set once the party list is sorted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PartyID {
    pub id: String,
    pub moniker: String,
    pub key: BigInt,
    pub index: Option<usize>,
}

impl PartyID {
    pub fn new(id: impl Into<String>, moniker: impl Into<String>, key: BigInt) -> Self {
        PartyID {
            id: id.into(),
            moniker: moniker.into(),
            key,
            index: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

impl fmt::Display for PartyID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{{{},{}}}", i, self.moniker),
            None => write!(f, "{{-,{}}}", self.moniker),
        }
    }
}

/// The session's participants sorted by key, each carrying its position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortedPartyIDs(Vec<Arc<PartyID>>);

impl SortedPartyIDs {
    pub fn new(mut ids: Vec<PartyID>) -> Self {
        ids.sort_by(|a, b| a.key.cmp(&b.key));
        SortedPartyIDs(
            ids.into_iter()
                .enumerate()
                .map(|(i, mut pid)| {
                    pid.index = Some(i);
                    Arc::new(pid)
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<PartyID>> {
        self.0.get(index)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Arc<PartyID>> {
        self.0.iter().find(|pid| pid.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<PartyID>> {
        self.0.iter()
    }

    pub fn keys(&self) -> Vec<BigInt> {
        self.0.iter().map(|pid| pid.key.clone()).collect()
    }
}
