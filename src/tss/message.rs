// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

use crate::tss::party_id::PartyID;
use crate::tss::wire::{self, WireError};

/// The protocol payload of a message. Implementors are closed enums over a
/// protocol's message kinds; the variant is fixed when the value is decoded.
pub trait MessageContent: Clone + fmt::Debug + Send + Sync + Sized {
    /// Identifies the message kind on the wire.
    fn type_url(&self) -> &'static str;

    fn validate_basic(&self) -> bool;

    fn encode_content(&self) -> Vec<u8>;

    fn decode_content(type_url: &str, bz: &[u8]) -> Result<Self, WireError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageRouting {
    pub from: Arc<PartyID>,
    pub is_broadcast: bool,
}

#[derive(Clone, Debug)]
pub struct ParsedMessage<C> {
    routing: MessageRouting,
    content: C,
}

impl<C: MessageContent> ParsedMessage<C> {
    pub fn new(from: Arc<PartyID>, is_broadcast: bool, content: C) -> Self {
        ParsedMessage {
            routing: MessageRouting { from, is_broadcast },
            content,
        }
    }

    pub fn routing(&self) -> &MessageRouting {
        &self.routing
    }

    pub fn from(&self) -> &Arc<PartyID> {
        &self.routing.from
    }

    pub fn is_broadcast(&self) -> bool {
        self.routing.is_broadcast
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn type_url(&self) -> &'static str {
        self.content.type_url()
    }

    pub fn validate_basic(&self) -> bool {
        self.content.validate_basic()
    }

    pub fn to_wire_bytes(&self) -> Bytes {
        wire::to_wire_bytes(self)
    }
}

impl<C: MessageContent> fmt::Display for ParsedMessage<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type: {}, From: {}, Broadcast: {}",
            self.type_url(),
            self.routing.from,
            self.routing.is_broadcast
        )
    }
}
