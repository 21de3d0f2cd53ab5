// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

// Session fixtures with the outputs of rounds 1 and 2 precomputed, and an
// in-memory enclave.

use num_bigint::BigInt;
use num_traits::One;
use std::collections::VecDeque;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::crypto::{
    commitments::HashCommitDecommit,
    ecpoint::ECPoint,
    paillier::{PrivateKey, PublicKey},
    sfproof::{tests::mersenne, SquareFreeProof},
};
use crate::protocols::ecdsa::keygen::{
    messages::{KGMessage, KGRound1Message, KGRound2Message2, KGRound3Message},
    types::{KGParsedMessage, LocalTempData},
};
use crate::tee::{KGRound3TeeRequest, TeeTransport, TransportError};
use crate::tss::{
    message::ParsedMessage,
    params::Parameters,
    party_id::{PartyID, SortedPartyIDs},
};

const PRIME_PAIRS: [(u32, u32); 4] = [(127, 89), (107, 61), (89, 31), (127, 61)];

pub(crate) struct Fixture {
    threshold: usize,
    parties: SortedPartyIDs,
    moduli: Vec<BigInt>,
    nums: Vec<BigInt>,
    proofs: Vec<SquareFreeProof>,
    commit_u1g: Vec<HashCommitDecommit>,
    commit_c1g: Vec<HashCommitDecommit>,
    polys: Vec<Vec<ECPoint>>,
}

impl Fixture {
    /// Up to four parties; party `i` sorts at index `i`.
    pub fn new(party_count: usize, threshold: usize) -> Self {
        assert!(party_count <= PRIME_PAIRS.len(), "at most {} fixture parties", PRIME_PAIRS.len());
        let parties = SortedPartyIDs::new(
            (0..party_count)
                .map(|i| {
                    PartyID::new(format!("party-{}", i), format!("P{}", i), BigInt::from(i + 1))
                })
                .collect(),
        );

        let mut fx = Fixture {
            threshold,
            parties,
            moduli: vec![],
            nums: vec![],
            proofs: vec![],
            commit_u1g: vec![],
            commit_c1g: vec![],
            polys: vec![],
        };
        for (i, &(p, q)) in PRIME_PAIRS.iter().take(party_count).enumerate() {
            let sk = PrivateKey::from_primes(&mersenne(p), &mersenne(q)).unwrap();
            let num = BigInt::from(777 + i);
            let proof = SquareFreeProof::new(&sk.public_key.n, &num, &sk.phi_n).unwrap();

            let u1g = ECPoint::scalar_base_mult(&BigInt::from(1000 + i)).unwrap();
            let c1g = ECPoint::scalar_base_mult(&BigInt::from(2000 + i)).unwrap();
            let mut poly = vec![u1g.clone()];
            for k in 1..=threshold {
                poly.push(ECPoint::scalar_base_mult(&BigInt::from(3000 + 10 * i + k)).unwrap());
            }

            let u1g_r = BigInt::from(4000 + i);
            let c1g_r = BigInt::from(5000 + i);
            fx.commit_u1g
                .push(HashCommitDecommit::new_with_randomness(u1g_r, &u1g.coords()).unwrap());
            fx.commit_c1g
                .push(HashCommitDecommit::new_with_randomness(c1g_r, &c1g.coords()).unwrap());
            fx.moduli.push(sk.public_key.n.clone());
            fx.nums.push(num);
            fx.proofs.push(proof);
            fx.polys.push(poly);
        }
        fx
    }

    pub fn party_count(&self) -> usize {
        self.parties.len()
    }

    pub fn parties(&self) -> &SortedPartyIDs {
        &self.parties
    }

    pub fn party(&self, i: usize) -> Arc<PartyID> {
        self.parties.get(i).unwrap().clone()
    }

    pub fn party_id(&self, i: usize) -> String {
        self.party(i).id.clone()
    }

    pub fn modulus(&self, i: usize) -> BigInt {
        self.moduli[i].clone()
    }

    pub fn u1g(&self, i: usize) -> ECPoint {
        self.polys[i][0].clone()
    }

    pub fn c1g(&self, i: usize) -> ECPoint {
        let secrets = self.commit_c1g[i].decommit().unwrap();
        ECPoint::new(secrets[0].clone(), secrets[1].clone()).unwrap()
    }

    pub fn params(&self, me: usize) -> Arc<Parameters> {
        let params = Parameters::new(self.party(me), self.parties.clone(), self.threshold);
        Arc::new(params.with_concurrency(1))
    }

    pub fn corrupt_proof(&mut self, i: usize) {
        self.proofs[i].sigma[0] += BigInt::one();
    }

    /// Party `i` now claims `n` in round 1 but keeps its old proof.
    pub fn replace_modulus(&mut self, i: usize, n: BigInt) {
        self.moduli[i] = n;
    }

    pub fn round1_message(&self, k: usize) -> Arc<KGParsedMessage> {
        let r1 = KGRound1Message {
            com_u1g_c: self.commit_u1g[k].c.clone(),
            com_c1g_c: self.commit_c1g[k].c.clone(),
            u1_paillier_pk: Some(PublicKey::new(self.moduli[k].clone())),
        };
        Arc::new(ParsedMessage::new(self.party(k), true, KGMessage::Round1(r1)))
    }

    pub fn round2_message2(&self, k: usize) -> Arc<KGParsedMessage> {
        let r22 = KGRound2Message2::new(self.nums[k].clone(), self.proofs[k].clone());
        Arc::new(ParsedMessage::new(self.party(k), true, KGMessage::Round2Message2(r22)))
    }

    pub fn round3_message(&self, k: usize) -> Arc<KGParsedMessage> {
        let r3 = KGRound3Message::new(
            self.commit_u1g[k].d.clone(),
            self.commit_c1g[k].d.clone(),
            self.polys[k].clone(),
        );
        Arc::new(ParsedMessage::new(self.party(k), true, KGMessage::Round3(r3)))
    }

    /// The context party `me` holds after round 2.
    pub fn temp_data(&self, me: usize) -> LocalTempData {
        let mut temp = LocalTempData::new(self.party_count());
        for k in 0..self.party_count() {
            temp.kg_round1_messages.put(k, self.round1_message(k)).unwrap();
            temp.kg_round2_message2s.put(k, self.round2_message2(k)).unwrap();
        }
        temp.commit_u1g = Some(self.commit_u1g[me].clone());
        temp.commit_c1g = Some(self.commit_c1g[me].clone());
        temp.u1_poly_g = Some(self.polys[me].clone());
        temp
    }

    pub fn temp(&self, me: usize) -> Arc<Mutex<LocalTempData>> {
        Arc::new(Mutex::new(self.temp_data(me)))
    }
}

type TokenFn = Box<dyn Fn(usize) -> String + Send + Sync>;

enum Behaviour {
    /// Checks each proof itself; the token is computed from the request's sequence number.
    Verifying { msg_prefix: String, token: TokenFn },
    Scripted(Mutex<VecDeque<String>>),
    Failing,
}

struct MockTransport {
    behaviour: Behaviour,
    replies: Mutex<Sender<String>>,
    requests: Mutex<Vec<KGRound3TeeRequest>>,
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport").finish_non_exhaustive()
    }
}

impl TeeTransport for MockTransport {
    fn send_msg_data(&self, data: String) -> Result<(), TransportError> {
        if let Behaviour::Failing = self.behaviour {
            return Err(TransportError::NotConnected);
        }
        let req: KGRound3TeeRequest = serde_json::from_str(&data)?;
        let seq = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(req.clone());
            requests.len() - 1
        };

        let reply = match &self.behaviour {
            Behaviour::Verifying { msg_prefix, token } => {
                let ok = SquareFreeProof { sigma: req.sf_pf.clone() }.verify(&req.n, &req.num);
                Some(
                    serde_json::json!({
                        "MsgPrex": msg_prefix,
                        "SquareFreeVerifyRes": if ok { "TRUE" } else { "FALSE" },
                        "TeeValidateData": token(seq),
                    })
                    .to_string(),
                )
            }
            Behaviour::Scripted(script) => script.lock().unwrap().pop_front(),
            Behaviour::Failing => None,
        };
        if let Some(reply) = reply {
            let _ = self.replies.lock().unwrap().send(reply);
        }
        Ok(())
    }
}

pub(crate) struct MockEnclave {
    transport: Arc<MockTransport>,
    responses: Mutex<Option<Receiver<String>>>,
}

impl MockEnclave {
    fn with_behaviour(behaviour: Behaviour) -> Self {
        let (tx, rx) = mpsc::channel();
        MockEnclave {
            transport: Arc::new(MockTransport {
                behaviour,
                replies: Mutex::new(tx),
                requests: Mutex::new(vec![]),
            }),
            responses: Mutex::new(Some(rx)),
        }
    }

    pub fn verifying<F>(msg_prefix: &str, token: F) -> Self
    where
        F: Fn(usize) -> String + Send + Sync + 'static,
    {
        Self::with_behaviour(Behaviour::Verifying {
            msg_prefix: msg_prefix.to_string(),
            token: Box::new(token),
        })
    }

    /// Replies with `script` in order, then stays silent.
    pub fn scripted(script: Vec<&str>) -> Self {
        let script = script.into_iter().map(String::from).collect();
        Self::with_behaviour(Behaviour::Scripted(Mutex::new(script)))
    }

    pub fn failing() -> Self {
        Self::with_behaviour(Behaviour::Failing)
    }

    pub fn transport(&self) -> Arc<dyn TeeTransport> {
        self.transport.clone()
    }

    pub fn responses(&self) -> Receiver<String> {
        self.responses.lock().unwrap().take().expect("responses already taken")
    }

    /// Queues `reply` as if the enclave had sent it unprompted.
    pub fn push_reply(&self, reply: &str) {
        self.transport.replies.lock().unwrap().send(reply.to_string()).unwrap();
    }

    pub fn requests(&self) -> Vec<KGRound3TeeRequest> {
        self.transport.requests.lock().unwrap().clone()
    }
}
