//! Types to deserialize `m.room.power_levels` events.

use std::{collections::BTreeMap, fmt, ops::Deref};

use serde_json::{Map as JsonMap, Value as JsonValue};

use super::from_raw_json_value;
use crate::{Result, err, event::Event};

/// The level held by the room creator while no `m.room.power_levels` event
/// exists.
const DEFAULT_CREATOR_POWER_LEVEL: i64 = 100;

/// A helper type for an [`Event`] of type `m.room.power_levels`.
///
/// Deserializes each content field lazily, when requested. Levels are signed
/// 64-bit integers; absent fields answer with their defaults.
#[derive(Clone, Debug)]
pub struct RoomPowerLevelsEvent<E: Event>(E);

impl<E: Event> RoomPowerLevelsEvent<E> {
	/// Construct a new `RoomPowerLevelsEvent` around the given event.
	#[inline]
	pub fn new(event: E) -> Self { Self(event) }

	/// The deserialized content of the event.
	fn deserialized_content(&self) -> Result<JsonMap<String, JsonValue>> {
		from_raw_json_value(self.content())
			.map_err(|error| err!("malformed `m.room.power_levels` content: {error}"))
	}

	/// The value of a scalar level field, if present.
	pub fn get_as_int(&self, field: RoomPowerLevelsIntField) -> Result<Option<i64>> {
		let content = self.deserialized_content()?;

		let Some(value) = content.get(field.as_str()) else {
			return Ok(None);
		};

		let power_level = value.as_i64().ok_or_else(|| {
			err!(
				"unexpected format of `{field}` field in `m.room.power_levels` event: expected \
				 integer, got {value}"
			)
		})?;

		Ok(Some(power_level))
	}

	/// The value of a scalar level field, or its default when absent.
	#[inline]
	pub fn get_as_int_or_default(&self, field: RoomPowerLevelsIntField) -> Result<i64> {
		Ok(self
			.get_as_int(field)?
			.unwrap_or_else(|| field.default_value()))
	}

	/// The value of a field holding a map of integer levels, if present.
	fn get_as_int_map(&self, field: &str) -> Result<Option<BTreeMap<String, i64>>> {
		let content = self.deserialized_content()?;

		let Some(value) = content.get(field) else {
			return Ok(None);
		};

		let map = value.as_object().ok_or_else(|| {
			err!(
				"unexpected format of `{field}` field in `m.room.power_levels` event: expected \
				 object, got {value}"
			)
		})?;

		map.iter()
			.map(|(key, value)| {
				let power_level = value.as_i64().ok_or_else(|| {
					err!(
						"unexpected format of `{key}` entry in `{field}` field of \
						 `m.room.power_levels` event: expected integer, got {value}"
					)
				})?;

				Ok((key.clone(), power_level))
			})
			.collect::<Result<_>>()
			.map(Some)
	}

	/// The levels required to send typed events, if any.
	#[inline]
	pub fn events(&self) -> Result<Option<BTreeMap<String, i64>>> { self.get_as_int_map("events") }

	/// The levels assigned to individual users, if any.
	#[inline]
	pub fn users(&self) -> Result<Option<BTreeMap<String, i64>>> { self.get_as_int_map("users") }

	/// The effective level of the given user under this event.
	pub fn user_power_level(&self, user_id: &str) -> Result<i64> {
		if let Some(power_level) = self.users()?.as_ref().and_then(|users| users.get(user_id)) {
			Ok(*power_level)
		} else {
			self.get_as_int_or_default(RoomPowerLevelsIntField::UsersDefault)
		}
	}

	/// The level required to send an event of the given type.
	pub fn event_power_level(&self, event_type: &str, state_key: Option<&str>) -> Result<i64> {
		if let Some(power_level) = self
			.events()?
			.as_ref()
			.and_then(|events| events.get(event_type))
		{
			return Ok(*power_level);
		}

		let default_field = if state_key.is_some() {
			RoomPowerLevelsIntField::StateDefault
		} else {
			RoomPowerLevelsIntField::EventsDefault
		};

		self.get_as_int_or_default(default_field)
	}
}

impl<E: Event> Deref for RoomPowerLevelsEvent<E> {
	type Target = E;

	#[inline]
	fn deref(&self) -> &Self::Target { &self.0 }
}

/// Helper trait for `Option<RoomPowerLevelsEvent<E>>`: the defaults that
/// apply while the room has no power-levels event.
pub(crate) trait RoomPowerLevelsEventOptionExt {
	/// The effective level of the given user.
	///
	/// While no power-levels event exists the room creator holds level 100
	/// and everyone else the `users_default`.
	fn user_power_level(&self, user_id: &str, creator: &str) -> Result<i64>;

	/// The value of a scalar level field, or its default when absent.
	fn get_as_int_or_default(&self, field: RoomPowerLevelsIntField) -> Result<i64>;

	/// The level required to send an event of the given type.
	fn event_power_level(&self, event_type: &str, state_key: Option<&str>) -> Result<i64>;
}

impl<E: Event> RoomPowerLevelsEventOptionExt for Option<RoomPowerLevelsEvent<E>> {
	fn user_power_level(&self, user_id: &str, creator: &str) -> Result<i64> {
		if let Some(room_power_levels_event) = self {
			room_power_levels_event.user_power_level(user_id)
		} else if user_id == creator {
			Ok(DEFAULT_CREATOR_POWER_LEVEL)
		} else {
			Ok(RoomPowerLevelsIntField::UsersDefault.default_value())
		}
	}

	fn get_as_int_or_default(&self, field: RoomPowerLevelsIntField) -> Result<i64> {
		if let Some(room_power_levels_event) = self {
			room_power_levels_event.get_as_int_or_default(field)
		} else {
			Ok(field.default_value())
		}
	}

	fn event_power_level(&self, event_type: &str, state_key: Option<&str>) -> Result<i64> {
		if let Some(room_power_levels_event) = self {
			room_power_levels_event.event_power_level(event_type, state_key)
		} else {
			let default_field = if state_key.is_some() {
				RoomPowerLevelsIntField::StateDefault
			} else {
				RoomPowerLevelsIntField::EventsDefault
			};

			Ok(default_field.default_value())
		}
	}
}

/// Scalar fields of `m.room.power_levels` content holding an integer level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RoomPowerLevelsIntField {
	/// `ban`
	Ban,

	/// `invite`
	Invite,

	/// `kick`
	Kick,

	/// `redact`
	Redact,

	/// `state_default`
	StateDefault,

	/// `events_default`
	EventsDefault,

	/// `users_default`
	UsersDefault,
}

impl RoomPowerLevelsIntField {
	/// A slice containing all the variants.
	pub const ALL: &[Self] = &[
		Self::Ban,
		Self::Invite,
		Self::Kick,
		Self::Redact,
		Self::StateDefault,
		Self::EventsDefault,
		Self::UsersDefault,
	];

	/// The string representation of this field.
	#[inline]
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			| Self::Ban => "ban",
			| Self::Invite => "invite",
			| Self::Kick => "kick",
			| Self::Redact => "redact",
			| Self::StateDefault => "state_default",
			| Self::EventsDefault => "events_default",
			| Self::UsersDefault => "users_default",
		}
	}

	/// The value that applies when this field is absent.
	#[inline]
	#[must_use]
	pub fn default_value(self) -> i64 {
		match self {
			| Self::EventsDefault | Self::UsersDefault => 0,
			| Self::Ban | Self::Invite | Self::Kick | Self::Redact | Self::StateDefault => 50,
		}
	}
}

impl fmt::Display for RoomPowerLevelsIntField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}
