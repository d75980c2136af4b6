//! Shared fixtures for rule tests.

use std::{
	cell::RefCell,
	collections::{BTreeSet, HashMap},
	io,
};

use serde_json::{Value as JsonValue, json, value::to_raw_value as to_raw_json_value};

use crate::{AuthState, Error, Membership, Pdu, PrevEvent, Result};

pub(crate) fn alice() -> &'static str { "@alice:foo" }

pub(crate) fn bob() -> &'static str { "@bob:bar" }

pub(crate) fn charlie() -> &'static str { "@charlie:foo" }

pub(crate) fn zara() -> &'static str { "@zara:foo" }

pub(crate) fn room_id() -> &'static str { "!test:foo" }

pub(crate) fn member_content(membership: Membership) -> JsonValue {
	json!({ "membership": membership.as_str() })
}

/// Expand a short test ID into a full event ID on the room's server.
pub(crate) fn event_id(id: &str) -> String {
	if id.contains('$') {
		id.to_owned()
	} else {
		format!("${id}:foo")
	}
}

/// Build an event in the test room. `prev_events` take short IDs.
pub(crate) fn to_pdu_event(
	id: &str,
	sender: &str,
	kind: &str,
	state_key: Option<&str>,
	content: JsonValue,
	prev_events: &[&str],
) -> Pdu {
	Pdu {
		room_id: room_id().into(),
		event_id: event_id(id),
		sender: sender.into(),
		kind: kind.into(),
		state_key: state_key.map(Into::into),
		content: to_raw_json_value(&content).unwrap(),
		prev_events: prev_events
			.iter()
			.map(|prev| PrevEvent::new(event_id(prev), json!({})))
			.collect(),
		redacts: None,
	}
}

pub(crate) fn create_event() -> Pdu {
	to_pdu_event("CREATE", alice(), "m.room.create", Some(""), json!({ "creator": alice() }), &[])
}

pub(crate) fn join_rules_event(join_rule: &str) -> Pdu {
	to_pdu_event("JR", alice(), "m.room.join_rules", Some(""), json!({ "join_rule": join_rule }), &[
		"CREATE",
	])
}

pub(crate) fn member_event(sender: &str, target: &str, membership: Membership) -> Pdu {
	to_pdu_event(
		&format!("M{target}{membership}"),
		sender,
		"m.room.member",
		Some(target),
		member_content(membership),
		&["CREATE"],
	)
}

pub(crate) fn power_levels_event(content: JsonValue) -> Pdu {
	to_pdu_event("PL", alice(), "m.room.power_levels", Some(""), content, &["CREATE"])
}

/// Map-backed oracle recording which lookups were consulted.
#[derive(Default)]
pub(crate) struct TestAuthState {
	pub(crate) create: Option<Pdu>,
	pub(crate) join_rules: Option<Pdu>,
	pub(crate) power_levels: Option<Pdu>,
	pub(crate) members: HashMap<String, Pdu>,
	pub(crate) third_party_invites: HashMap<String, Pdu>,
	consulted: RefCell<BTreeSet<String>>,
}

impl TestAuthState {
	/// The room right after creation: only the create event exists.
	pub(crate) fn fresh_room() -> Self {
		Self { create: Some(create_event()), ..Self::default() }
	}

	/// The room once the creator finished the bootstrap join.
	pub(crate) fn bootstrapped_room() -> Self {
		let mut auth_state = Self::fresh_room();
		auth_state.join(alice());
		auth_state
	}

	pub(crate) fn join(&mut self, user_id: &str) -> &mut Self {
		self.members
			.insert(user_id.into(), member_event(user_id, user_id, Membership::Join));
		self
	}

	pub(crate) fn set_membership(&mut self, user_id: &str, membership: Membership) -> &mut Self {
		self.members
			.insert(user_id.into(), member_event(user_id, user_id, membership));
		self
	}

	pub(crate) fn set_join_rule(&mut self, join_rule: &str) -> &mut Self {
		self.join_rules = Some(join_rules_event(join_rule));
		self
	}

	pub(crate) fn set_power_levels(&mut self, content: JsonValue) -> &mut Self {
		self.power_levels = Some(power_levels_event(content));
		self
	}

	/// The lookups consulted so far, as `kind` or `kind:state_key` strings.
	pub(crate) fn consulted(&self) -> BTreeSet<String> { self.consulted.borrow().clone() }

	fn record(&self, key: impl Into<String>) { self.consulted.borrow_mut().insert(key.into()); }
}

impl AuthState for TestAuthState {
	type Pdu = Pdu;

	fn create(&self) -> Result<Option<Pdu>> {
		self.record("create");
		Ok(self.create.clone())
	}

	fn join_rules(&self) -> Result<Option<Pdu>> {
		self.record("join_rules");
		Ok(self.join_rules.clone())
	}

	fn power_levels(&self) -> Result<Option<Pdu>> {
		self.record("power_levels");
		Ok(self.power_levels.clone())
	}

	fn member(&self, state_key: &str) -> Result<Option<Pdu>> {
		self.record(format!("member:{state_key}"));
		Ok(self.members.get(state_key).cloned())
	}

	fn third_party_invite(&self, token: &str) -> Result<Option<Pdu>> {
		self.record(format!("third_party_invite:{token}"));
		Ok(self.third_party_invites.get(token).cloned())
	}
}

/// Oracle whose member lookups fail, for error-propagation tests.
pub(crate) struct FailingAuthState(pub(crate) TestAuthState);

impl AuthState for FailingAuthState {
	type Pdu = Pdu;

	fn create(&self) -> Result<Option<Pdu>> { self.0.create() }

	fn join_rules(&self) -> Result<Option<Pdu>> { self.0.join_rules() }

	fn power_levels(&self) -> Result<Option<Pdu>> { self.0.power_levels() }

	fn member(&self, _state_key: &str) -> Result<Option<Pdu>> {
		Err(Error::auth_state(io::Error::other("member lookup failed")))
	}

	fn third_party_invite(&self, token: &str) -> Result<Option<Pdu>> {
		self.0.third_party_invite(token)
	}
}
