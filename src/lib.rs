//! Event authorization for federated, room-based messaging.
//!
//! Each room is an append-only directed acyclic graph of events. Every new
//! event must be proven admissible against a small set of prior state events:
//! the room creation, the join rules, the power levels, the memberships of
//! sender and target, and optionally a third-party invite. This crate is the
//! decision core only; it performs no I/O, holds no mutable state and never
//! fetches events itself.
//!
//! Two operations are exposed:
//!
//! - [`state_needed`] enumerates the state entries an oracle must be able to
//!   answer before a batch of candidate events can be decided;
//! - [`allowed`] decides a single event against an [`AuthState`] oracle,
//!   returning `Ok(())` or a structured denial.
//!
//! ```
//! use roomauth::{AuthState, Pdu, PrevEvent, Result, allowed};
//! use serde_json::{json, value::to_raw_value};
//!
//! struct RoomState {
//! 	create: Pdu,
//! }
//!
//! impl AuthState for RoomState {
//! 	type Pdu = Pdu;
//!
//! 	fn create(&self) -> Result<Option<Pdu>> { Ok(Some(self.create.clone())) }
//!
//! 	fn join_rules(&self) -> Result<Option<Pdu>> { Ok(None) }
//!
//! 	fn power_levels(&self) -> Result<Option<Pdu>> { Ok(None) }
//!
//! 	fn member(&self, _state_key: &str) -> Result<Option<Pdu>> { Ok(None) }
//!
//! 	fn third_party_invite(&self, _token: &str) -> Result<Option<Pdu>> { Ok(None) }
//! }
//!
//! let create = Pdu {
//! 	room_id: "!room:example.org".into(),
//! 	event_id: "$create:example.org".into(),
//! 	sender: "@alice:example.org".into(),
//! 	kind: "m.room.create".into(),
//! 	state_key: Some("".into()),
//! 	content: to_raw_value(&json!({ "creator": "@alice:example.org" })).unwrap(),
//! 	prev_events: vec![],
//! 	redacts: None,
//! };
//! let state = RoomState { create: create.clone() };
//! assert!(allowed(&create, &state).is_ok());
//!
//! // The creator enters the fresh room directly after the create event.
//! let join = Pdu {
//! 	room_id: "!room:example.org".into(),
//! 	event_id: "$join:example.org".into(),
//! 	sender: "@alice:example.org".into(),
//! 	kind: "m.room.member".into(),
//! 	state_key: Some("@alice:example.org".into()),
//! 	content: to_raw_value(&json!({ "membership": "join" })).unwrap(),
//! 	prev_events: vec![PrevEvent::new("$create:example.org", json!({}))],
//! 	redacts: None,
//! };
//! assert!(allowed(&join, &state).is_ok());
//! ```

mod auth_state;
mod error;
mod event;
mod event_auth;
mod events;
mod id;
mod pdu;
mod state_needed;
#[cfg(test)]
mod test_utils;

pub use self::{
	auth_state::AuthState,
	error::{Error, Result},
	event::{Event, StateKey},
	event_auth::allowed,
	events::{
		JoinRule, Membership, RoomCreateEvent, RoomJoinRulesEvent, RoomMemberEvent,
		RoomMemberEventContent, RoomPowerLevelsEvent, RoomPowerLevelsIntField,
		RoomThirdPartyInviteEvent, ThirdPartyInvite,
	},
	id::{is_valid_user_id, server_name},
	pdu::{Pdu, PrevEvent},
	state_needed::{StateNeeded, state_needed},
};
