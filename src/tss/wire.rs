// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use bytes::Bytes;
use prost::Message;
use std::sync::Arc;
use thiserror::Error;

use crate::common::slice::bigint_to_bytes;
use crate::tss::message::{MessageContent, ParsedMessage};
use crate::tss::party_id::PartyID;

#[derive(Error, Debug)]
pub enum WireError {
    #[error("decode: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("unknown message type {0}")]
    UnknownType(String),
    #[error("invalid content: {0}")]
    InvalidContent(String),
}

#[derive(Clone, PartialEq, Message)]
pub struct PartyIdPb {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub moniker: String,
    #[prost(bytes = "vec", tag = "3")]
    pub key: Vec<u8>,
}

/// Envelope every protocol message travels in.
#[derive(Clone, PartialEq, Message)]
pub struct MessageWrapper {
    #[prost(bool, tag = "1")]
    pub is_broadcast: bool,
    #[prost(message, optional, tag = "3")]
    pub from: Option<PartyIdPb>,
    #[prost(string, tag = "9")]
    pub type_url: String,
    #[prost(bytes = "vec", tag = "10")]
    pub message: Vec<u8>,
}

pub fn to_wire_bytes<C: MessageContent>(msg: &ParsedMessage<C>) -> Bytes {
    let from = msg.from();
    let wrapper = MessageWrapper {
        is_broadcast: msg.is_broadcast(),
        from: Some(PartyIdPb {
            id: from.id.clone(),
            moniker: from.moniker.clone(),
            key: bigint_to_bytes(&from.key),
        }),
        type_url: msg.type_url().to_string(),
        message: msg.content().encode_content(),
    };
    Bytes::from(wrapper.encode_to_vec())
}

/// Decodes wire bytes received from `from`. Routing comes from the transport,
/// not from the envelope.
pub fn parse_wire_message<C: MessageContent>(
    wire_bytes: &[u8],
    from: Arc<PartyID>,
    is_broadcast: bool,
) -> Result<ParsedMessage<C>, WireError> {
    let wire = MessageWrapper::decode(wire_bytes)?;
    let content = C::decode_content(&wire.type_url, &wire.message)?;
    Ok(ParsedMessage::new(from, is_broadcast, content))
}
