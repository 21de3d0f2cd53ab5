// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use log::{debug, error, info};
use std::sync::mpsc::SyncSender;
use std::sync::{Arc, Mutex};

use crate::protocols::ecdsa::keygen::{
    messages::{KGMessage, KGRound3Message},
    rounds::{
        base::BaseRound,
        round_4::Round4,
        sf_verifier::{ProofArtifact, VerificationMode},
    },
    types::{KGParsedMessage, LocalTempData},
    TASK_NAME,
};
use crate::tss::{
    error::{Error, RoundErr},
    message::ParsedMessage,
    params::Parameters,
    party_id::PartyID,
    round::{Round, UpdateStatus},
};

/// Every party proves its Paillier modulus square-free; once all proofs check
/// out, each party opens its round 1 commitments.
pub struct Round3 {
    base: BaseRound,
    params: Arc<Parameters>,
    temp: Arc<Mutex<LocalTempData>>,
    out_ch: SyncSender<Arc<KGParsedMessage>>,
    verifier: Arc<VerificationMode>,
}

impl Round3 {
    pub fn new(
        params: Arc<Parameters>,
        temp: Arc<Mutex<LocalTempData>>,
        out_ch: SyncSender<Arc<KGParsedMessage>>,
        verifier: Arc<VerificationMode>,
    ) -> Self {
        let base = BaseRound::new(3, params.party_count());
        Self {
            base,
            params,
            temp,
            out_ch,
            verifier,
        }
    }

    pub fn started(&self) -> bool {
        self.base.started()
    }

    /// Hands the session over to round 4. Not gated on `update` being ready.
    pub fn next_round(&self) -> Round4 {
        self.base.clear_started();
        Round4::new(self.params.clone(), self.temp.clone())
    }

    fn lock_temp(&self) -> Result<std::sync::MutexGuard<'_, LocalTempData>, Error> {
        self.temp
            .lock()
            .map_err(|_| self.wrap_error(RoundErr::LockPoisoned("temp data".to_string()), vec![]))
    }

    /// Collects `(N, num, proof)` of every party from the round 1 and 2 stores.
    fn proof_artifacts(&self, temp: &LocalTempData) -> Result<Vec<ProofArtifact>, Error> {
        let parties = self.params.parties();
        let mut artifacts = Vec::with_capacity(parties.len());
        for (k, party) in parties.iter().enumerate() {
            let culprit = || vec![party.as_ref().clone()];

            let r1 = match temp.kg_round1_messages.get(k).map(|m| m.content()) {
                Some(KGMessage::Round1(r1)) => r1,
                _ => {
                    return Err(self.wrap_error(
                        RoundErr::MissingPriorMessage { round: 1, party: k },
                        culprit(),
                    ))
                }
            };
            let pk = r1.u1_paillier_pk.as_ref().ok_or_else(|| {
                self.wrap_error(
                    RoundErr::InvalidPriorMessage {
                        round: 1,
                        party: k,
                        reason: "nil paillier public key".to_string(),
                    },
                    culprit(),
                )
            })?;

            let r22 = match temp.kg_round2_message2s.get(k).map(|m| m.content()) {
                Some(KGMessage::Round2Message2(r22)) => r22,
                _ => {
                    return Err(self.wrap_error(
                        RoundErr::MissingPriorMessage { round: 2, party: k },
                        culprit(),
                    ))
                }
            };
            let (num, proof) = match (&r22.num, &r22.sf_pf) {
                (Some(num), Some(proof)) => (num, proof),
                _ => {
                    return Err(self.wrap_error(
                        RoundErr::InvalidPriorMessage {
                            round: 2,
                            party: k,
                            reason: "nil square-free proof".to_string(),
                        },
                        culprit(),
                    ))
                }
            };

            artifacts.push(ProofArtifact {
                party: party.clone(),
                n: pk.n.clone(),
                num: num.clone(),
                proof: proof.clone(),
            });
        }
        Ok(artifacts)
    }
}

impl Round for Round3 {
    type Content = KGMessage;

    const TASK_NAME: &'static str = TASK_NAME;

    fn params(&self) -> &Parameters {
        &self.params
    }

    fn round_number(&self) -> i32 {
        self.base.round_number()
    }

    fn start(&self) -> Result<(), Error> {
        if !self.base.try_start() {
            return Err(self.wrap_error(RoundErr::AlreadyStarted(self.round_number()), vec![]));
        }
        self.base.reset_ok();

        let parties = self.params.parties();
        if parties.is_empty() {
            return Err(self.wrap_error(RoundErr::SessionCorrupt("no parties".to_string()), vec![]));
        }
        let me = parties
            .find_by_id(self.params.party_id().id())
            .cloned()
            .ok_or_else(|| {
                self.wrap_error(RoundErr::UnknownParty(self.params.party_id().id.clone()), vec![])
            })?;
        let cur_index = me.index.ok_or_else(|| {
            let cause = RoundErr::SessionCorrupt("party list is not sorted".to_string());
            self.wrap_error(cause, vec![])
        })?;

        let artifacts = {
            let temp = self.lock_temp()?;
            if !temp.is_sized_for(parties.len()) {
                return Err(self.wrap_error(
                    RoundErr::SessionCorrupt(format!(
                        "message stores are not sized for {} parties",
                        parties.len()
                    )),
                    vec![],
                ));
            }
            self.proof_artifacts(&temp)?
        };

        info!(
            "party {} round 3 verifying {} square-free proofs ({})",
            me,
            artifacts.len(),
            if self.verifier.is_tee() { "tee" } else { "local" }
        );
        let token = self
            .verifier
            .verify_all(&artifacts, self.params.concurrency())
            .map_err(|f| {
                error!("party {} round 3: {}", me, f.cause);
                self.wrap_error(f.cause, f.culprits)
            })?;

        let msg = {
            let mut temp = self.lock_temp()?;
            let missing = |what: &str| {
                self.wrap_error(RoundErr::SessionCorrupt(format!("missing own {}", what)), vec![])
            };
            let com_u1g_d =
                temp.commit_u1g.as_ref().ok_or_else(|| missing("u1G commitment"))?.d.clone();
            let com_c1g_d =
                temp.commit_c1g.as_ref().ok_or_else(|| missing("c1G commitment"))?.d.clone();
            let u1_poly_gg =
                temp.u1_poly_g.clone().ok_or_else(|| missing("polynomial commitment"))?;

            let mut r3 = KGRound3Message::new(com_u1g_d, com_c1g_d, u1_poly_gg);
            if let Some(token) = token {
                r3.set_tee_validate_data(token);
            }
            let msg = Arc::new(ParsedMessage::new(me.clone(), true, KGMessage::Round3(r3)));
            temp.kg_round3_messages
                .put(cur_index, msg.clone())
                .map_err(|e| self.wrap_error(e, vec![]))?;
            msg
        };

        debug!("party {} round 3 broadcasting decommitments", me);
        self.out_ch
            .send(msg)
            .map_err(|_| self.wrap_error(RoundErr::BroadcastClosed, vec![]))?;
        Ok(())
    }

    fn can_accept(&self, msg: &KGParsedMessage) -> bool {
        matches!(msg.content(), KGMessage::Round3(_)) && msg.is_broadcast()
    }

    fn update(&self) -> Result<UpdateStatus, Error> {
        let temp = self.lock_temp()?;
        for j in 0..self.params.party_count() {
            if self.base.is_ok(j) {
                continue;
            }
            match temp.kg_round3_messages.get(j) {
                Some(msg) if self.can_accept(msg) => self.base.set_ok(j),
                _ => return Ok(UpdateStatus::Pending),
            }
        }
        Ok(UpdateStatus::Ready)
    }

    fn can_proceed(&self) -> bool {
        self.base.started() && self.base.all_ok()
    }

    fn waiting_for(&self) -> Vec<Arc<PartyID>> {
        self.base.waiting_for(self.params.parties())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::sfproof::SquareFreeProof;
    use crate::protocols::ecdsa::keygen::messages::{KGRound1Message, KGRound2Message2};
    use crate::protocols::ecdsa::keygen::rounds::sf_verifier::TeeVerifier;
    use crate::protocols::ecdsa::keygen::test_utils::{Fixture, MockEnclave};
    use crate::tee::TeeConfig;
    use num_bigint::BigInt;
    use std::sync::mpsc::{self, Receiver};
    use std::time::Duration;

    fn round3(
        fx: &Fixture,
        me: usize,
        mode: VerificationMode,
    ) -> (Round3, Receiver<Arc<KGParsedMessage>>) {
        let (tx, rx) = mpsc::sync_channel(fx.party_count());
        let round = Round3::new(fx.params(me), fx.temp(me), tx, Arc::new(mode));
        (round, rx)
    }

    fn tee_mode(enclave: &MockEnclave, timeout_secs: u64) -> VerificationMode {
        let mut config = TeeConfig::new("mock", "sess-1");
        config.response_timeout_secs = timeout_secs;
        VerificationMode::Tee(TeeVerifier::new(
            enclave.transport(),
            enclave.responses(),
            &config,
        ))
    }

    fn deliver(round: &Round3, fx: &Fixture, from: usize) {
        let msg = fx.round3_message(from);
        round.temp.lock().unwrap().kg_round3_messages.put(from, msg).unwrap();
    }

    fn cause(err: &Error) -> &RoundErr {
        err.cause()
    }

    #[test]
    fn test_start_broadcasts_once_and_update_waits_for_all() {
        let fx = Fixture::new(3, 1);
        let (round, rx) = round3(&fx, 0, VerificationMode::Local);

        round.start().unwrap();
        let sent = rx.try_recv().unwrap();
        assert!(rx.try_recv().is_err());
        assert!(round.can_accept(&sent));
        assert_eq!(sent.from().index(), Some(0));
        assert_eq!(round.temp.lock().unwrap().kg_round3_messages.count(), 1);

        assert_eq!(round.update().unwrap(), UpdateStatus::Pending);
        assert!(!round.can_proceed());
        deliver(&round, &fx, 1);
        assert_eq!(round.update().unwrap(), UpdateStatus::Pending);
        assert_eq!(round.waiting_for().len(), 1);
        assert_eq!(round.waiting_for()[0].index(), Some(2));

        deliver(&round, &fx, 2);
        assert_eq!(round.update().unwrap(), UpdateStatus::Ready);
        assert!(round.can_proceed());
        assert!(round.waiting_for().is_empty());

        let r4 = round.next_round();
        assert!(!round.started());
        assert_eq!(r4.round_number(), 4);
    }

    #[test]
    fn test_start_rejects_invalid_proof() {
        let mut fx = Fixture::new(3, 1);
        fx.corrupt_proof(2);
        let (round, rx) = round3(&fx, 0, VerificationMode::Local);

        let err = round.start().unwrap_err();
        match cause(&err) {
            RoundErr::ProofVerificationFailed(p) => assert_eq!(p.id, fx.party_id(2)),
            other => panic!("unexpected cause {:?}", other),
        }
        assert_eq!(err.culprits().len(), 1);
        assert_eq!(err.culprits()[0].id, fx.party_id(2));
        assert_eq!(err.round(), 3);
        assert!(rx.try_recv().is_err());
        assert_eq!(round.temp.lock().unwrap().kg_round3_messages.count(), 0);
    }

    #[test]
    fn test_parallel_verification_reports_lowest_culprit() {
        let mut fx = Fixture::new(4, 1);
        fx.corrupt_proof(3);
        fx.corrupt_proof(1);
        let (tx, _rx) = mpsc::sync_channel(4);
        let params = Arc::new(fx.params(0).as_ref().clone().with_concurrency(4));
        let round = Round3::new(params, fx.temp(0), tx, Arc::new(VerificationMode::Local));

        let err = round.start().unwrap_err();
        assert!(matches!(
            cause(&err),
            RoundErr::ProofVerificationFailed(p) if p.id == fx.party_id(1)
        ));
    }

    #[test]
    fn test_start_rejects_non_square_free_modulus() {
        let mut fx = Fixture::new(3, 1);
        // party 1 now claims a modulus with a square factor; no proof can match it
        let p = crate::crypto::sfproof::tests::mersenne(61);
        fx.replace_modulus(1, &p * &p * crate::crypto::sfproof::tests::mersenne(89));
        let (round, _rx) = round3(&fx, 0, VerificationMode::Local);

        let err = round.start().unwrap_err();
        assert!(matches!(
            cause(&err),
            RoundErr::ProofVerificationFailed(p) if p.id == fx.party_id(1)
        ));
    }

    #[test]
    fn test_start_twice_fails() {
        let fx = Fixture::new(2, 1);
        let (round, _rx) = round3(&fx, 1, VerificationMode::Local);
        round.start().unwrap();
        let err = round.start().unwrap_err();
        assert!(matches!(cause(&err), RoundErr::AlreadyStarted(3)));
    }

    #[test]
    fn test_start_unknown_party() {
        let fx = Fixture::new(2, 1);
        let (tx, _rx) = mpsc::sync_channel(2);
        let stranger = Arc::new(PartyID::new("stranger", "S", BigInt::from(99)));
        let params = Arc::new(Parameters::new(stranger, fx.parties().clone(), 1));
        let round = Round3::new(params, fx.temp(0), tx, Arc::new(VerificationMode::Local));

        let err = round.start().unwrap_err();
        assert!(matches!(cause(&err), RoundErr::UnknownParty(id) if id == "stranger"));
    }

    #[test]
    fn test_start_session_corrupt_when_stores_missized() {
        let fx = Fixture::new(3, 1);
        let (tx, _rx) = mpsc::sync_channel(3);
        let temp = Arc::new(Mutex::new(LocalTempData::new(2)));
        let round = Round3::new(fx.params(0), temp, tx, Arc::new(VerificationMode::Local));

        let err = round.start().unwrap_err();
        assert!(matches!(cause(&err), RoundErr::SessionCorrupt(_)));
    }

    #[test]
    fn test_start_missing_and_invalid_prior_messages() {
        let fx = Fixture::new(3, 1);

        // round 1 slot of party 1 holds a message of the wrong kind
        let temp = Arc::new(Mutex::new(fx.temp_data(0)));
        {
            let mut t = temp.lock().unwrap();
            t.kg_round1_messages = crate::protocols::ecdsa::keygen::types::MessageStore::new(1, 3);
            for k in [0usize, 2] {
                t.kg_round1_messages.put(k, fx.round1_message(k)).unwrap();
            }
            t.kg_round1_messages.put(1, fx.round3_message(1)).unwrap();
        }
        let (tx, _rx) = mpsc::sync_channel(3);
        let round = Round3::new(fx.params(0), temp, tx.clone(), Arc::new(VerificationMode::Local));
        let err = round.start().unwrap_err();
        assert!(matches!(cause(&err), RoundErr::MissingPriorMessage { round: 1, party: 1 }));

        // round 1 message without a paillier key
        let temp = Arc::new(Mutex::new(fx.temp_data(0)));
        {
            let mut t = temp.lock().unwrap();
            t.kg_round1_messages = crate::protocols::ecdsa::keygen::types::MessageStore::new(1, 3);
            for k in 0..3usize {
                let msg = if k == 2 {
                    let r1 = KGRound1Message {
                        com_u1g_c: BigInt::from(1),
                        com_c1g_c: BigInt::from(2),
                        u1_paillier_pk: None,
                    };
                    Arc::new(ParsedMessage::new(fx.party(2), true, KGMessage::Round1(r1)))
                } else {
                    fx.round1_message(k)
                };
                t.kg_round1_messages.put(k, msg).unwrap();
            }
        }
        let round = Round3::new(fx.params(0), temp, tx.clone(), Arc::new(VerificationMode::Local));
        let err = round.start().unwrap_err();
        assert!(matches!(cause(&err), RoundErr::InvalidPriorMessage { round: 1, party: 2, .. }));

        // round 2 message without a proof, and a missing round 2 message
        let temp = Arc::new(Mutex::new(fx.temp_data(0)));
        {
            let mut t = temp.lock().unwrap();
            t.kg_round2_message2s = crate::protocols::ecdsa::keygen::types::MessageStore::new(2, 3);
            let r22 = KGRound2Message2 { num: Some(BigInt::from(1)), sf_pf: None };
            let msg = ParsedMessage::new(fx.party(0), true, KGMessage::Round2Message2(r22));
            t.kg_round2_message2s.put(0, Arc::new(msg)).unwrap();
        }
        let mode = Arc::new(VerificationMode::Local);
        let round = Round3::new(fx.params(0), temp.clone(), tx.clone(), mode);
        let err = round.start().unwrap_err();
        assert!(matches!(cause(&err), RoundErr::InvalidPriorMessage { round: 2, party: 0, .. }));

        {
            let mut t = temp.lock().unwrap();
            t.kg_round2_message2s = crate::protocols::ecdsa::keygen::types::MessageStore::new(2, 3);
        }
        let round = Round3::new(fx.params(0), temp, tx, Arc::new(VerificationMode::Local));
        let err = round.start().unwrap_err();
        assert!(matches!(cause(&err), RoundErr::MissingPriorMessage { round: 2, party: 0 }));
    }

    #[test]
    fn test_start_fails_when_broadcast_closed() {
        let fx = Fixture::new(2, 1);
        let (round, rx) = round3(&fx, 0, VerificationMode::Local);
        drop(rx);
        let err = round.start().unwrap_err();
        assert!(matches!(cause(&err), RoundErr::BroadcastClosed));
    }

    #[test]
    fn test_can_accept_requires_round3_broadcast() {
        let fx = Fixture::new(2, 1);
        let (round, _rx) = round3(&fx, 0, VerificationMode::Local);

        let good = fx.round3_message(1);
        assert!(round.can_accept(&good));

        let p2p = ParsedMessage::new(fx.party(1), false, good.content().clone());
        assert!(!round.can_accept(&p2p));

        let wrong_kind = fx.round1_message(1);
        assert!(wrong_kind.is_broadcast());
        assert!(!round.can_accept(&wrong_kind));
    }

    #[test]
    fn test_update_idempotent_and_ignores_unacceptable() {
        let fx = Fixture::new(2, 1);
        let (round, _rx) = round3(&fx, 0, VerificationMode::Local);
        round.start().unwrap();

        assert_eq!(round.update().unwrap(), UpdateStatus::Pending);
        assert_eq!(round.update().unwrap(), UpdateStatus::Pending);
        assert!(round.base.is_ok(0));

        // a non-broadcast copy in the slot is not accepted
        let content = fx.round3_message(1).content().clone();
        let p2p = Arc::new(ParsedMessage::new(fx.party(1), false, content));
        round.temp.lock().unwrap().kg_round3_messages.put(1, p2p).unwrap();
        assert_eq!(round.update().unwrap(), UpdateStatus::Pending);
        assert!(round.base.is_ok(0));
        assert!(!round.base.is_ok(1));
    }

    #[test]
    fn test_tee_path_attaches_token() {
        let fx = Fixture::new(3, 1);
        let enclave = MockEnclave::verifying("sess-1", |i| format!("tok{}", i));
        let (round, rx) = round3(&fx, 1, tee_mode(&enclave, 5));

        round.start().unwrap();
        assert_eq!(enclave.requests().len(), 3);
        let sent = rx.try_recv().unwrap();
        match sent.content() {
            KGMessage::Round3(m) => assert_eq!(m.tee_validate_data.as_deref(), Some("tok2")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_tee_path_same_token_for_all() {
        let fx = Fixture::new(3, 1);
        let enclave = MockEnclave::verifying("sess-1", |_| "tok123".to_string());
        let (round, rx) = round3(&fx, 0, tee_mode(&enclave, 5));
        round.start().unwrap();

        let sent = rx.try_recv().unwrap();
        match sent.content() {
            KGMessage::Round3(m) => assert_eq!(m.tee_validate_data.as_deref(), Some("tok123")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_tee_and_local_messages_equivalent() {
        let fx = Fixture::new(3, 1);
        let (local, local_rx) = round3(&fx, 2, VerificationMode::Local);
        local.start().unwrap();

        let enclave = MockEnclave::verifying("sess-1", |_| "tok123".to_string());
        let (tee, tee_rx) = round3(&fx, 2, tee_mode(&enclave, 5));
        tee.start().unwrap();

        let local_msg = local_rx.try_recv().unwrap();
        let tee_msg = tee_rx.try_recv().unwrap();
        let (mut l, t) = match (local_msg.content(), tee_msg.content()) {
            (KGMessage::Round3(l), KGMessage::Round3(t)) => (l.clone(), t.clone()),
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(l.tee_validate_data, None);
        l.set_tee_validate_data("tok123".to_string());
        assert_eq!(l, t);
        assert_eq!(local_msg.from(), tee_msg.from());
        assert_eq!(local_msg.is_broadcast(), tee_msg.is_broadcast());
    }

    #[test]
    fn test_tee_rejection() {
        let fx = Fixture::new(3, 1);
        let enclave = MockEnclave::scripted(vec![
            r#"{"SquareFreeVerifyRes":"TRUE","TeeValidateData":"a"}"#,
            r#"{"SquareFreeVerifyRes":"FALSE"}"#,
        ]);
        let (round, rx) = round3(&fx, 0, tee_mode(&enclave, 5));

        let err = round.start().unwrap_err();
        assert!(matches!(
            cause(&err),
            RoundErr::ProofVerificationFailed(p) if p.id == fx.party_id(1)
        ));
        assert_eq!(enclave.requests().len(), 2);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_tee_stale_reply_discarded() {
        let fx = Fixture::new(2, 1);
        let enclave = MockEnclave::scripted(vec![
            r#"{"SquareFreeVerifyRes":"TRUE","TeeValidateData":"fresh0"}"#,
            r#"{"SquareFreeVerifyRes":"TRUE","TeeValidateData":"fresh1"}"#,
        ]);
        let mode = tee_mode(&enclave, 5);
        // left over from an earlier timed-out request
        enclave.push_reply(r#"{"SquareFreeVerifyRes":"FALSE","TeeValidateData":"stale"}"#);
        let (round, rx) = round3(&fx, 0, mode);

        round.start().unwrap();
        assert_eq!(enclave.requests().len(), 2);
        match rx.try_recv().unwrap().content() {
            KGMessage::Round3(m) => assert_eq!(m.tee_validate_data.as_deref(), Some("fresh1")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_tee_last_reply_without_token() {
        let fx = Fixture::new(2, 1);
        let enclave = MockEnclave::scripted(vec![
            r#"{"SquareFreeVerifyRes":"TRUE","TeeValidateData":"tok0"}"#,
            r#"{"SquareFreeVerifyRes":"TRUE"}"#,
        ]);
        let (round, rx) = round3(&fx, 0, tee_mode(&enclave, 5));

        round.start().unwrap();
        match rx.try_recv().unwrap().content() {
            KGMessage::Round3(m) => assert_eq!(m.tee_validate_data, None),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_tee_malformed_and_incomplete_replies() {
        let fx = Fixture::new(2, 1);

        let enclave = MockEnclave::scripted(vec!["not json"]);
        let (round, _rx) = round3(&fx, 0, tee_mode(&enclave, 5));
        assert!(matches!(cause(&round.start().unwrap_err()), RoundErr::InvalidRemoteResponse(_)));

        let enclave = MockEnclave::scripted(vec![r#"{"TeeValidateData":"a"}"#]);
        let (round, _rx) = round3(&fx, 0, tee_mode(&enclave, 5));
        assert!(matches!(cause(&round.start().unwrap_err()), RoundErr::InvalidRemoteResponse(_)));
    }

    #[test]
    fn test_tee_send_failure_and_timeout() {
        let fx = Fixture::new(2, 1);

        let enclave = MockEnclave::failing();
        let (round, _rx) = round3(&fx, 0, tee_mode(&enclave, 5));
        assert!(matches!(cause(&round.start().unwrap_err()), RoundErr::Transport(_)));

        let enclave = MockEnclave::scripted(vec![]);
        let mut config = TeeConfig::new("mock", "sess-1");
        config.response_timeout_secs = 0;
        let verifier = TeeVerifier::new(enclave.transport(), enclave.responses(), &config);
        let mode = VerificationMode::Tee(verifier);
        let (round, _rx) = round3(&fx, 0, mode);
        assert!(matches!(
            cause(&round.start().unwrap_err()),
            RoundErr::TransportTimeout(d) if *d == Duration::from_secs(0)
        ));
    }

    #[test]
    fn test_tee_proof_contents_forwarded() {
        let fx = Fixture::new(2, 1);
        let enclave = MockEnclave::verifying("sess-1", |_| "t".to_string());
        let (round, _rx) = round3(&fx, 0, tee_mode(&enclave, 5));
        round.start().unwrap();

        let reqs = enclave.requests();
        assert_eq!(reqs[1].base.msg_prefix, "sess-1");
        assert_eq!(reqs[1].n, fx.modulus(1));
        let proof = SquareFreeProof { sigma: reqs[1].sf_pf.clone() };
        assert!(proof.verify(&reqs[1].n, &reqs[1].num));
    }
}
