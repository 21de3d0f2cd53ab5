// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use num_bigint::BigInt;
use num_traits::{One, Zero};
use prost::Message;

use crate::common::slice::{
    bigint_to_bytes, bigints_to_bytes, bytes_to_bigint, multi_bytes_to_bigints, non_empty_bytes,
};
use crate::crypto::{
    commitments::{HashCommitment, HashDeCommitment},
    ecpoint::ECPoint,
    paillier::PublicKey,
    sfproof::SquareFreeProof,
};
use crate::tss::{message::MessageContent, wire::WireError};

const KG_ROUND1_MESSAGE: &str = "smpc.ecdsa.keygen.KGRound1Message";
const KG_ROUND2_MESSAGE1: &str = "smpc.ecdsa.keygen.KGRound2Message1";
const KG_ROUND2_MESSAGE2: &str = "smpc.ecdsa.keygen.KGRound2Message2";
const KG_ROUND3_MESSAGE: &str = "smpc.ecdsa.keygen.KGRound3Message";

/// Round 1 broadcast: commitments to `u1*G` and `c1*G`, and the Paillier key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound1Message {
    pub com_u1g_c: HashCommitment,
    pub com_c1g_c: HashCommitment,
    pub u1_paillier_pk: Option<PublicKey>,
}

/// Round 2 point-to-point: the recipient's share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound2Message1 {
    pub share: BigInt,
}

/// Round 2 broadcast: proof that the round 1 Paillier modulus is square-free.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound2Message2 {
    pub num: Option<BigInt>,
    pub sf_pf: Option<SquareFreeProof>,
}

/// Round 3 broadcast: openings of the round 1 commitments and the
/// commitment to the sharing polynomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KGRound3Message {
    pub com_u1g_d: HashDeCommitment,
    pub com_c1g_d: HashDeCommitment,
    pub u1_poly_gg: Vec<ECPoint>,
    pub tee_validate_data: Option<String>,
}

impl KGRound2Message2 {
    pub fn new(num: BigInt, sf_pf: SquareFreeProof) -> Self {
        KGRound2Message2 {
            num: Some(num),
            sf_pf: Some(sf_pf),
        }
    }
}

impl KGRound3Message {
    pub fn new(
        com_u1g_d: HashDeCommitment,
        com_c1g_d: HashDeCommitment,
        u1_poly_gg: Vec<ECPoint>,
    ) -> Self {
        KGRound3Message {
            com_u1g_d,
            com_c1g_d,
            u1_poly_gg,
            tee_validate_data: None,
        }
    }

    pub fn set_tee_validate_data(&mut self, data: String) {
        self.tee_validate_data = Some(data);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KGMessage {
    Round1(KGRound1Message),
    Round2Message1(KGRound2Message1),
    Round2Message2(KGRound2Message2),
    Round3(KGRound3Message),
}

impl KGMessage {
    /// The round whose message store holds this kind.
    pub fn round(&self) -> i32 {
        match self {
            KGMessage::Round1(_) => 1,
            KGMessage::Round2Message1(_) | KGMessage::Round2Message2(_) => 2,
            KGMessage::Round3(_) => 3,
        }
    }

    /// Whether this kind is sent to everyone. Only the round 2 share is point-to-point.
    pub fn is_broadcast_kind(&self) -> bool {
        !matches!(self, KGMessage::Round2Message1(_))
    }
}

// -- wire forms

#[derive(Clone, PartialEq, Message)]
struct KGRound1MessagePb {
    #[prost(bytes = "vec", tag = "1")]
    commitment_u1g: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    commitment_c1g: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    paillier_n: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
struct KGRound2Message1Pb {
    #[prost(bytes = "vec", tag = "1")]
    share: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
struct KGRound2Message2Pb {
    #[prost(bytes = "vec", tag = "1")]
    num: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    sf_pf: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
struct KGRound3MessagePb {
    #[prost(bytes = "vec", repeated, tag = "1")]
    decommitment_u1g: Vec<Vec<u8>>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    decommitment_c1g: Vec<Vec<u8>>,
    /// flattened x, y pairs
    #[prost(bytes = "vec", repeated, tag = "3")]
    u1_poly_gg: Vec<Vec<u8>>,
    #[prost(string, optional, tag = "4")]
    tee_validate_data: Option<String>,
}

fn optional_bigint(bz: &[u8]) -> Option<BigInt> {
    if non_empty_bytes(bz) {
        Some(bytes_to_bigint(bz))
    } else {
        None
    }
}

fn unflatten_points(bzs: &[Vec<u8>]) -> Result<Vec<ECPoint>, WireError> {
    if bzs.len() % 2 != 0 {
        return Err(WireError::InvalidContent(format!(
            "odd number of point coordinates: {}",
            bzs.len()
        )));
    }
    bzs.chunks(2)
        .map(|xy| {
            ECPoint::from_bytes(&xy[0], &xy[1])
                .map_err(|e| WireError::InvalidContent(e.to_string()))
        })
        .collect()
}

impl MessageContent for KGMessage {
    fn type_url(&self) -> &'static str {
        match self {
            KGMessage::Round1(_) => KG_ROUND1_MESSAGE,
            KGMessage::Round2Message1(_) => KG_ROUND2_MESSAGE1,
            KGMessage::Round2Message2(_) => KG_ROUND2_MESSAGE2,
            KGMessage::Round3(_) => KG_ROUND3_MESSAGE,
        }
    }

    fn validate_basic(&self) -> bool {
        match self {
            KGMessage::Round1(m) => {
                !m.com_u1g_c.is_zero()
                    && !m.com_c1g_c.is_zero()
                    && m.u1_paillier_pk.as_ref().map_or(false, |pk| pk.n > BigInt::one())
            }
            KGMessage::Round2Message1(m) => !m.share.is_zero(),
            KGMessage::Round2Message2(m) => m.num.is_some() && m.sf_pf.is_some(),
            KGMessage::Round3(m) => {
                !m.com_u1g_d.is_empty() && !m.com_c1g_d.is_empty() && !m.u1_poly_gg.is_empty()
            }
        }
    }

    fn encode_content(&self) -> Vec<u8> {
        match self {
            KGMessage::Round1(m) => KGRound1MessagePb {
                commitment_u1g: bigint_to_bytes(&m.com_u1g_c),
                commitment_c1g: bigint_to_bytes(&m.com_c1g_c),
                paillier_n: m
                    .u1_paillier_pk
                    .as_ref()
                    .map(|pk| bigint_to_bytes(&pk.n))
                    .unwrap_or_default(),
            }
            .encode_to_vec(),
            KGMessage::Round2Message1(m) => KGRound2Message1Pb {
                share: bigint_to_bytes(&m.share),
            }
            .encode_to_vec(),
            KGMessage::Round2Message2(m) => KGRound2Message2Pb {
                num: m.num.as_ref().map(bigint_to_bytes).unwrap_or_default(),
                sf_pf: m.sf_pf.as_ref().map(|p| p.to_bytes()).unwrap_or_default(),
            }
            .encode_to_vec(),
            KGMessage::Round3(m) => KGRound3MessagePb {
                decommitment_u1g: bigints_to_bytes(&m.com_u1g_d),
                decommitment_c1g: bigints_to_bytes(&m.com_c1g_d),
                u1_poly_gg: m.u1_poly_gg.iter().flat_map(|p| p.to_bytes()).collect(),
                tee_validate_data: m.tee_validate_data.clone(),
            }
            .encode_to_vec(),
        }
    }

    fn decode_content(type_url: &str, bz: &[u8]) -> Result<Self, WireError> {
        match type_url {
            KG_ROUND1_MESSAGE => {
                let pb = KGRound1MessagePb::decode(bz)?;
                Ok(KGMessage::Round1(KGRound1Message {
                    com_u1g_c: bytes_to_bigint(&pb.commitment_u1g),
                    com_c1g_c: bytes_to_bigint(&pb.commitment_c1g),
                    u1_paillier_pk: optional_bigint(&pb.paillier_n).map(PublicKey::new),
                }))
            }
            KG_ROUND2_MESSAGE1 => {
                let pb = KGRound2Message1Pb::decode(bz)?;
                Ok(KGMessage::Round2Message1(KGRound2Message1 {
                    share: bytes_to_bigint(&pb.share),
                }))
            }
            KG_ROUND2_MESSAGE2 => {
                let pb = KGRound2Message2Pb::decode(bz)?;
                let sf_pf = if pb.sf_pf.is_empty() {
                    None
                } else {
                    Some(
                        SquareFreeProof::from_bytes(&pb.sf_pf)
                            .map_err(|e| WireError::InvalidContent(e.to_string()))?,
                    )
                };
                Ok(KGMessage::Round2Message2(KGRound2Message2 {
                    num: optional_bigint(&pb.num),
                    sf_pf,
                }))
            }
            KG_ROUND3_MESSAGE => {
                let pb = KGRound3MessagePb::decode(bz)?;
                Ok(KGMessage::Round3(KGRound3Message {
                    com_u1g_d: multi_bytes_to_bigints(&pb.decommitment_u1g),
                    com_c1g_d: multi_bytes_to_bigints(&pb.decommitment_c1g),
                    u1_poly_gg: unflatten_points(&pb.u1_poly_gg)?,
                    tee_validate_data: pb.tee_validate_data,
                }))
            }
            other => Err(WireError::UnknownType(other.to_string())),
        }
    }
}
