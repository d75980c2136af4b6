//! Enumeration of the auth state required to decide a batch of events.

use crate::{
	event::{Event, StateKey},
	events::member::RoomMemberEventContent,
};

/// The state entries an oracle must be able to answer before the given
/// events can be decided.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateNeeded {
	/// Whether the `m.room.create` event is needed.
	pub create: bool,

	/// Whether the `m.room.join_rules` event is needed.
	pub join_rules: bool,

	/// Whether the `m.room.power_levels` event is needed.
	pub power_levels: bool,

	/// The `m.room.member` state keys needed, sorted and deduplicated.
	pub member: Vec<StateKey>,

	/// The `m.room.third_party_invite` tokens needed, sorted and
	/// deduplicated.
	pub third_party_invite: Vec<StateKey>,
}

/// List the auth-state entries required to decide the given candidate
/// events with [`allowed`](crate::allowed).
///
/// Order-independent across the batch; the output lists are sorted
/// lexicographically.
#[tracing::instrument(level = "debug", skip_all)]
pub fn state_needed<'a, E, I>(events: I) -> StateNeeded
where
	E: Event + 'a,
	I: IntoIterator<Item = &'a E>,
{
	let mut result = StateNeeded::default();

	for event in events {
		match event.event_type() {
			// The create event needs no state to authorize itself; every
			// other event needs the create event.
			| "m.room.create" => {},
			| "m.room.aliases" | "m.room.alias" => {
				result.create = true;
			},
			| "m.room.member" => {
				result.create = true;
				result.join_rules = true;
				result.power_levels = true;
				result.member.push(event.sender().into());
				if let Some(target) = event.state_key() {
					result.member.push(target.into());
				}
				push_third_party_invite_token(&mut result.third_party_invite, event);
			},
			| _ => {
				result.create = true;
				result.power_levels = true;
				result.member.push(event.sender().into());
			},
		}
	}

	result.member.sort_unstable();
	result.member.dedup();
	result.third_party_invite.sort_unstable();
	result.third_party_invite.dedup();
	result
}

/// Record the third-party-invite token of a member event, if it carries one.
///
/// Content that fails to parse contributes nothing: the event will be denied
/// downstream without any invite state being consulted.
fn push_third_party_invite_token<E: Event>(tokens: &mut Vec<StateKey>, event: &E) {
	let content = RoomMemberEventContent::new(event.content());
	let Ok(Some(third_party_invite)) = content.third_party_invite() else {
		return;
	};

	if !third_party_invite.token().is_empty() {
		tokens.push(third_party_invite.token().into());
	}
}
