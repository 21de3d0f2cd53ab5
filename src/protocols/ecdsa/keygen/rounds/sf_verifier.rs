// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use log::{debug, error, warn};
use num_bigint::BigInt;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::collections::HashMap;
use std::fmt;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::crypto::sfproof::SquareFreeProof;
use crate::tee::{
    KGRound3TeeRequest, SocketClient, TeeConfig, TeeTransport, TransportError,
    SQUARE_FREE_VERIFY_RES, TEE_VALIDATE_DATA,
};
use crate::tss::{error::RoundErr, party_id::PartyID};

/// One party's square-free claim, as collected from rounds 1 and 2.
#[derive(Clone, Debug)]
pub struct ProofArtifact {
    pub party: Arc<PartyID>,
    pub n: BigInt,
    pub num: BigInt,
    pub proof: SquareFreeProof,
}

#[derive(Debug)]
pub struct VerifyFailure {
    pub cause: RoundErr,
    pub culprits: Vec<PartyID>,
}

impl VerifyFailure {
    fn rejected(party: &PartyID) -> Self {
        VerifyFailure {
            cause: RoundErr::ProofVerificationFailed(party.clone()),
            culprits: vec![party.clone()],
        }
    }
}

impl From<RoundErr> for VerifyFailure {
    fn from(cause: RoundErr) -> Self {
        VerifyFailure { cause, culprits: vec![] }
    }
}

/// How round 3 checks the square-free proofs. Fixed for the whole session.
#[derive(Debug)]
pub enum VerificationMode {
    Local,
    Tee(TeeVerifier),
}

impl VerificationMode {
    /// Verifies every artifact. On success returns the validation token the
    /// enclave issued last, if any.
    pub fn verify_all(
        &self,
        artifacts: &[ProofArtifact],
        concurrency: usize,
    ) -> Result<Option<String>, VerifyFailure> {
        match self {
            VerificationMode::Local => {
                verify_local(artifacts, concurrency)?;
                Ok(None)
            }
            VerificationMode::Tee(tee) => tee.verify_all(artifacts),
        }
    }

    pub fn is_tee(&self) -> bool {
        matches!(self, VerificationMode::Tee(_))
    }
}

fn verify_local(artifacts: &[ProofArtifact], concurrency: usize) -> Result<(), VerifyFailure> {
    let check = |a: &&ProofArtifact| !a.proof.verify(&a.n, &a.num);

    let failed = if concurrency > 1 && artifacts.len() > 1 {
        match ThreadPoolBuilder::new().num_threads(concurrency).build() {
            Ok(pool) => pool.install(|| artifacts.par_iter().find_first(check)),
            Err(e) => {
                warn!("falling back to sequential verification: {}", e);
                artifacts.iter().find(check)
            }
        }
    } else {
        artifacts.iter().find(check)
    };

    match failed {
        Some(a) => Err(VerifyFailure::rejected(&a.party)),
        None => Ok(()),
    }
}

/// Round trips to the enclave, one request per party.
pub struct TeeVerifier {
    transport: Arc<dyn TeeTransport>,
    responses: Mutex<Receiver<String>>,
    key_type: String,
    msg_prefix: String,
    timeout: Duration,
}

impl TeeVerifier {
    pub fn new(
        transport: Arc<dyn TeeTransport>,
        responses: Receiver<String>,
        config: &TeeConfig,
    ) -> Self {
        TeeVerifier {
            transport,
            responses: Mutex::new(responses),
            key_type: config.key_type.clone(),
            msg_prefix: config.msg_prefix.clone(),
            timeout: config.response_timeout(),
        }
    }

    /// Registers the session with `client` and verifies through it.
    pub fn with_socket(
        client: &Arc<SocketClient>,
        config: &TeeConfig,
    ) -> Result<Self, TransportError> {
        let responses = client.register_session(&config.msg_prefix)?;
        let transport: Arc<dyn TeeTransport> = client.clone();
        Ok(Self::new(transport, responses, config))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn verify_all(&self, artifacts: &[ProofArtifact]) -> Result<Option<String>, VerifyFailure> {
        let responses = self
            .responses
            .lock()
            .map_err(|_| RoundErr::LockPoisoned("tee response channel".to_string()))?;

        // a late reply to an earlier timed-out request must not be taken for the next one
        while responses.try_recv().is_ok() {}

        let mut token = None;
        for a in artifacts {
            let req = KGRound3TeeRequest::new(
                &self.key_type,
                &self.msg_prefix,
                a.n.clone(),
                a.num.clone(),
                a.proof.sigma.clone(),
            );
            self.transport
                .send_msg_data(req.to_json().map_err(RoundErr::Transport)?)
                .map_err(RoundErr::Transport)?;
            debug!("tee square-free request sent for party {}", a.party);

            let reply = match responses.recv_timeout(self.timeout) {
                Ok(reply) => reply,
                Err(RecvTimeoutError::Timeout) => {
                    return Err(RoundErr::TransportTimeout(self.timeout).into());
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(RoundErr::Transport(TransportError::ResponseChannelClosed(
                        self.msg_prefix.clone(),
                    ))
                    .into());
                }
            };

            let fields: HashMap<String, String> = serde_json::from_str(&reply).map_err(|e| {
                error!("tee reply for party {} is malformed: {}", a.party, e);
                RoundErr::InvalidRemoteResponse(e.to_string())
            })?;

            match fields.get(SQUARE_FREE_VERIFY_RES).map(String::as_str) {
                Some("TRUE") => {
                    debug!("tee accepted square-free proof of party {}", a.party);
                    token = fields.get(TEE_VALIDATE_DATA).cloned();
                }
                Some("FALSE") => {
                    error!("tee rejected square-free proof of party {}", a.party);
                    return Err(VerifyFailure::rejected(&a.party));
                }
                other => {
                    return Err(RoundErr::InvalidRemoteResponse(format!(
                        "{} is {:?}",
                        SQUARE_FREE_VERIFY_RES, other
                    ))
                    .into());
                }
            }
        }
        Ok(token)
    }
}

impl fmt::Debug for TeeVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeeVerifier")
            .field("transport", &self.transport)
            .field("key_type", &self.key_type)
            .field("msg_prefix", &self.msg_prefix)
            .field("timeout", &self.timeout)
            .finish()
    }
}
