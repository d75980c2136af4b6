//! Admissibility rules, one routine per authorizable event type.

mod room_member;

use std::collections::BTreeMap;

use tracing::trace;

use self::room_member::check_room_member;
use crate::{
	Err, Result,
	auth_state::{AuthState, AuthStateExt},
	event::Event,
	events::{
		Membership, RoomPowerLevelsEvent, RoomPowerLevelsIntField,
		power_levels::RoomPowerLevelsEventOptionExt,
	},
	id,
};

/// Decide whether the given event is admissible against the room's current
/// auth state.
///
/// Pure and deterministic: the same event and the same oracle answers always
/// produce the same decision, and neither the event nor any oracle-returned
/// event is mutated.
///
/// # Errors
///
/// [`Error::NotAllowed`](crate::Error::NotAllowed) names the violated rule,
/// the actors and the relevant levels; any other error comes from the oracle,
/// unchanged.
#[tracing::instrument(
	level = "debug",
	skip_all,
	fields(
		event_id = incoming_event.event_id(),
		event_type = incoming_event.event_type(),
	)
)]
pub fn allowed<S: AuthState>(incoming_event: &S::Pdu, auth_state: &S) -> Result {
	match incoming_event.event_type() {
		| "m.room.create" => check_room_create(incoming_event),
		| "m.room.aliases" | "m.room.alias" => check_room_aliases(incoming_event, auth_state),
		| "m.room.member" => check_room_member(incoming_event, auth_state),
		| "m.room.power_levels" => check_room_power_levels(incoming_event, auth_state),
		| "m.room.redact" => check_room_redact(incoming_event, auth_state),
		| _ => check_default(incoming_event, auth_state),
	}
}

/// Check whether the given event passes the `m.room.create` rules.
///
/// The create event consults no auth state: it must originate on the room's
/// own server and be the first event of the room.
fn check_room_create<E: Event>(room_create_event: &E) -> Result {
	let room_id_server = id::server_name(room_create_event.room_id())?;
	let sender_server = id::server_name(room_create_event.sender())?;
	if room_id_server != sender_server {
		return Err!(
			"`m.room.create` event room ID server {room_id_server:?} does not match sender \
			 server {sender_server:?}"
		);
	}

	if room_create_event.prev_events().next().is_some() {
		return Err!("`m.room.create` event cannot follow prior events");
	}

	trace!("`m.room.create` event allowed");
	Ok(())
}

/// Check whether the given event passes the `m.room.aliases` rules.
///
/// Alias state is keyed by the owning server; any user of that server may
/// publish it, joined or not.
fn check_room_aliases<S: AuthState>(incoming_event: &S::Pdu, auth_state: &S) -> Result {
	let sender_server = id::server_name(incoming_event.sender())?;
	let room_create_event = auth_state.room_create_event()?;
	room_create_event.server_allowed(sender_server)?;

	let Some(state_key) = incoming_event.state_key() else {
		return Err!("`m.room.aliases` event must be a state event");
	};

	if state_key != sender_server {
		return Err!(
			"`m.room.aliases` state key {state_key:?} does not match sender server \
			 {sender_server:?}"
		);
	}

	trace!("`m.room.aliases` event allowed");
	Ok(())
}

/// The auth state loaded by [`check_common`]; type-specific rules continue
/// from it.
struct CommonAuth<E: Event> {
	room_power_levels_event: Option<RoomPowerLevelsEvent<E>>,
	sender_power_level: i64,
	creator: String,
}

/// The shared admission prefix: federation policy, joined sender, the event
/// type's required level, and `@`-prefixed state-key ownership.
fn check_common<S: AuthState>(
	incoming_event: &S::Pdu,
	auth_state: &S,
) -> Result<CommonAuth<S::Pdu>> {
	let sender = incoming_event.sender();
	let room_create_event = auth_state.room_create_event()?;
	room_create_event.user_allowed(sender)?;

	let sender_membership = auth_state.user_membership(sender)?;
	if sender_membership != Membership::Join {
		return Err!("sender {sender:?} is not in the room (membership is {sender_membership})");
	}

	let creator = room_create_event.creator()?;
	let room_power_levels_event = auth_state.room_power_levels_event()?;
	let sender_power_level = room_power_levels_event.user_power_level(sender, &creator)?;
	let event_power_level = room_power_levels_event
		.event_power_level(incoming_event.event_type(), incoming_event.state_key())?;

	if sender_power_level < event_power_level {
		return Err!(
			"sender {sender:?} with level {sender_power_level} is not allowed to send `{}` \
			 events requiring level {event_power_level}",
			incoming_event.event_type()
		);
	}

	// Users may only set state keyed by their own ID.
	if let Some(state_key) = incoming_event.state_key() {
		if state_key.starts_with('@') && state_key != sender {
			return Err!(
				"sender {sender:?} is not allowed to modify state belonging to {state_key:?}"
			);
		}
	}

	Ok(CommonAuth { room_power_levels_event, sender_power_level, creator })
}

/// Check an event type with no rules of its own beyond the common checks.
fn check_default<S: AuthState>(incoming_event: &S::Pdu, auth_state: &S) -> Result {
	check_common(incoming_event, auth_state)?;

	trace!("event passed the common checks");
	Ok(())
}

/// Check whether the given event passes the `m.room.power_levels` rules.
///
/// Authority is judged under the levels being replaced: the sender cannot
/// alter a level they could not reach, nor raise one above their own.
fn check_room_power_levels<S: AuthState>(incoming_event: &S::Pdu, auth_state: &S) -> Result {
	let common = check_common(incoming_event, auth_state)?;
	let sender = incoming_event.sender();
	let sender_power_level = common.sender_power_level;
	let current = common.room_power_levels_event;
	let new = RoomPowerLevelsEvent::new(incoming_event.clone());

	let new_users = new.users()?;
	if let Some(users) = &new_users {
		for user_id in users.keys() {
			if !id::is_valid_user_id(user_id) {
				return Err!(
					"key {user_id:?} in `users` field of `m.room.power_levels` event is not a \
					 valid user ID"
				);
			}
		}
	}

	for field in RoomPowerLevelsIntField::ALL {
		let current_power_level = current.get_as_int_or_default(*field)?;
		let new_power_level = new.get_as_int_or_default(*field)?;

		if current_power_level == new_power_level {
			continue;
		}

		if sender_power_level < current_power_level || sender_power_level < new_power_level {
			return Err!(
				"sender {sender:?} with level {sender_power_level} is not allowed to change \
				 `{field}` from {current_power_level} to {new_power_level}"
			);
		}
	}

	// Event-type levels, across the types present on either side. The absent
	// side answers with its own default.
	let current_events = match &current {
		| Some(event) => event.events()?,
		| None => None,
	};
	let new_events = new.events()?;
	for event_type in map_keys(&current_events).chain(map_keys(&new_events)) {
		let current_power_level = current.event_power_level(event_type, None)?;
		let new_power_level = new.event_power_level(event_type, None)?;

		if current_power_level == new_power_level {
			continue;
		}

		if sender_power_level < current_power_level || sender_power_level < new_power_level {
			return Err!(
				"sender {sender:?} with level {sender_power_level} is not allowed to change the \
				 `{event_type}` event level from {current_power_level} to {new_power_level}"
			);
		}
	}

	// User levels, across the users present on either side.
	let current_users = match &current {
		| Some(event) => event.users()?,
		| None => None,
	};
	for user_id in map_keys(&current_users).chain(map_keys(&new_users)) {
		let current_power_level = current.user_power_level(user_id, &common.creator)?;
		let new_power_level = new.user_power_level(user_id)?;

		if current_power_level == new_power_level {
			continue;
		}

		if user_id == sender {
			// The sender's own level may only move down.
			if sender_power_level < new_power_level {
				return Err!(
					"sender {sender:?} with level {sender_power_level} is not allowed to raise \
					 their own level to {new_power_level}"
				);
			}
		} else if sender_power_level <= current_power_level
			|| sender_power_level <= new_power_level
		{
			// Peers at or above the sender's level cannot be demoted, and no
			// other user may be raised to the sender's level or beyond.
			return Err!(
				"sender {sender:?} with level {sender_power_level} is not allowed to change the \
				 level of {user_id:?} from {current_power_level} to {new_power_level}"
			);
		}
	}

	trace!("`m.room.power_levels` event allowed");
	Ok(())
}

/// The keys of an optional level map.
fn map_keys(map: &Option<BTreeMap<String, i64>>) -> impl Iterator<Item = &str> {
	map.iter().flat_map(|map| map.keys().map(String::as_str))
}

/// Check whether the given event passes the `m.room.redact` rules.
fn check_room_redact<S: AuthState>(incoming_event: &S::Pdu, auth_state: &S) -> Result {
	let common = check_common(incoming_event, auth_state)?;
	let sender = incoming_event.sender();

	let Some(redacts) = incoming_event.redacts() else {
		return Err!("`m.room.redact` event does not reference a target event");
	};

	let sender_server = id::server_name(sender)?;
	let redacts_server = id::server_name(redacts)?;

	// Servers may always redact their own emissions.
	if sender_server == redacts_server {
		trace!("`m.room.redact` event allowed, same-server target");
		return Ok(());
	}

	let redact_power_level = common
		.room_power_levels_event
		.get_as_int_or_default(RoomPowerLevelsIntField::Redact)?;

	if common.sender_power_level >= redact_power_level {
		trace!("`m.room.redact` event allowed via power levels");
		return Ok(());
	}

	Err!(
		"sender {sender:?} with level {} is not allowed to redact an event of server \
		 {redacts_server:?} (redact level {redact_power_level})",
		common.sender_power_level
	)
}
