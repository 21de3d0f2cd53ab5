// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Delegation of proof verification to a trusted execution environment.
//!
//! Requests and replies are single-line JSON documents. Every request carries
//! the session's message prefix in `Base.MsgPrex`, and the enclave echoes it
//! in the reply's `MsgPrex` field so that replies can be routed back to the
//! session that asked.

pub mod socket;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub use socket::SocketClient;

pub const DEFAULT_KEY_TYPE: &str = "EC256K1";
pub const DEFAULT_RESPONSE_TIMEOUT_SECS: u64 = 30;

/// Reply field carrying the verdict, `"TRUE"` or `"FALSE"`.
pub const SQUARE_FREE_VERIFY_RES: &str = "SquareFreeVerifyRes";
/// Reply field carrying the enclave's opaque validation token.
pub const TEE_VALIDATE_DATA: &str = "TeeValidateData";
/// Reply field echoing the request's session prefix.
pub const MSG_PREFIX: &str = "MsgPrex";

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("not connected to the tee endpoint")]
    NotConnected,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response channel of session {0} closed")]
    ResponseChannelClosed(String),
}

/// Sends one serialized request to the enclave. Replies arrive out of band
/// on the session's response channel.
pub trait TeeTransport: Send + Sync + fmt::Debug {
    fn send_msg_data(&self, data: String) -> Result<(), TransportError>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeeConfig {
    pub endpoint: String,
    #[serde(default = "default_key_type")]
    pub key_type: String,
    pub msg_prefix: String,
    #[serde(default = "default_response_timeout_secs")]
    pub response_timeout_secs: u64,
}

fn default_key_type() -> String {
    DEFAULT_KEY_TYPE.to_string()
}

fn default_response_timeout_secs() -> u64 {
    DEFAULT_RESPONSE_TIMEOUT_SECS
}

impl TeeConfig {
    pub fn new(endpoint: impl Into<String>, msg_prefix: impl Into<String>) -> Self {
        TeeConfig {
            endpoint: endpoint.into(),
            key_type: default_key_type(),
            msg_prefix: msg_prefix.into(),
            response_timeout_secs: DEFAULT_RESPONSE_TIMEOUT_SECS,
        }
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TeeBase {
    pub key_type: String,
    #[serde(rename = "MsgPrex")]
    pub msg_prefix: String,
}

/// Square-free check of one party's modulus, as sent to the enclave.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KGRound3TeeRequest {
    pub base: TeeBase,
    #[serde(rename = "N", with = "decimal")]
    pub n: BigInt,
    #[serde(with = "decimal")]
    pub num: BigInt,
    #[serde(with = "decimal_vec")]
    pub sf_pf: Vec<BigInt>,
}

impl KGRound3TeeRequest {
    pub fn new(
        key_type: &str,
        msg_prefix: &str,
        n: BigInt,
        num: BigInt,
        sf_pf: Vec<BigInt>,
    ) -> Self {
        KGRound3TeeRequest {
            base: TeeBase {
                key_type: key_type.to_string(),
                msg_prefix: msg_prefix.to_string(),
            },
            n,
            num,
            sf_pf,
        }
    }

    pub fn to_json(&self) -> Result<String, TransportError> {
        Ok(serde_json::to_string(self)?)
    }
}

// Integers travel as decimal strings.
mod decimal {
    use num_bigint::BigInt;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(v: &BigInt, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&v.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BigInt, D::Error> {
        let s = String::deserialize(d)?;
        BigInt::from_str(&s).map_err(de::Error::custom)
    }
}

mod decimal_vec {
    use num_bigint::BigInt;
    use serde::{de, ser::SerializeSeq, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(v: &[BigInt], s: S) -> Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(v.len()))?;
        for i in v {
            seq.serialize_element(&i.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<BigInt>, D::Error> {
        Vec::<String>::deserialize(d)?
            .iter()
            .map(|s| BigInt::from_str(s).map_err(de::Error::custom))
            .collect()
    }
}
