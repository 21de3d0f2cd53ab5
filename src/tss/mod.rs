// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

pub mod error;
pub mod message;
pub mod params;
pub mod party_id;
pub mod round;
pub mod wire;

pub use error::{Error, RoundErr};
pub use message::{MessageContent, MessageRouting, ParsedMessage};
pub use params::Parameters;
pub use party_id::{PartyID, SortedPartyIDs};
pub use round::{Round, UpdateStatus};
