//! Types to deserialize `m.room.join_rules` events.

use std::{fmt, ops::Deref};

use serde::Deserialize;

use super::from_raw_json_value;
use crate::{Result, err, event::Event};

/// The join rules a room may declare. A room without a join-rules event
/// behaves as `invite`.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JoinRule {
	/// Anyone may join without an invite.
	Public,

	/// Only invited users may join.
	Invite,

	/// Users may knock; no transition admits this yet.
	Knock,

	/// Nobody may join on their own.
	Private,
}

impl JoinRule {
	/// The wire token of this join rule.
	#[inline]
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			| Self::Public => "public",
			| Self::Invite => "invite",
			| Self::Knock => "knock",
			| Self::Private => "private",
		}
	}
}

impl fmt::Display for JoinRule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A helper type for an [`Event`] of type `m.room.join_rules`.
#[derive(Clone, Debug)]
pub struct RoomJoinRulesEvent<E: Event>(E);

impl<E: Event> RoomJoinRulesEvent<E> {
	/// Construct a new `RoomJoinRulesEvent` around the given event.
	#[inline]
	pub fn new(event: E) -> Self { Self(event) }

	/// The join rule of the room.
	pub fn join_rule(&self) -> Result<JoinRule> {
		#[derive(Deserialize)]
		struct RoomJoinRulesContentJoinRule {
			join_rule: JoinRule,
		}

		let content: RoomJoinRulesContentJoinRule =
			from_raw_json_value(self.content()).map_err(|error| {
				err!("missing or invalid `join_rule` field in `m.room.join_rules` event: {error}")
			})?;

		Ok(content.join_rule)
	}
}

impl<E: Event> Deref for RoomJoinRulesEvent<E> {
	type Target = E;

	#[inline]
	fn deref(&self) -> &Self::Target { &self.0 }
}
