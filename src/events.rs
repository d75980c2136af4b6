//! Typed views over the content of auth-relevant events.
//!
//! Each view wraps an [`Event`](crate::Event) and deserializes the fields of
//! its content lazily, when requested. Views hold copies of the primitives
//! they extract; nothing refers back into the event's JSON.

pub mod create;
pub mod join_rules;
pub mod member;
pub mod power_levels;
pub mod third_party_invite;

use serde::Deserialize;
use serde_json::value::RawValue as RawJsonValue;

pub use self::{
	create::RoomCreateEvent,
	join_rules::{JoinRule, RoomJoinRulesEvent},
	member::{Membership, RoomMemberEvent, RoomMemberEventContent, ThirdPartyInvite},
	power_levels::{RoomPowerLevelsEvent, RoomPowerLevelsIntField},
	third_party_invite::RoomThirdPartyInviteEvent,
};

/// Deserialize a value of type `T` out of a raw JSON content blob.
pub(crate) fn from_raw_json_value<'a, T>(raw: &'a RawJsonValue) -> serde_json::Result<T>
where
	T: Deserialize<'a>,
{
	serde_json::from_str(raw.get())
}
