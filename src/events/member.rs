//! Types to deserialize `m.room.member` events.

use std::{fmt, ops::Deref};

use serde::Deserialize;
use serde_json::value::RawValue as RawJsonValue;

use super::from_raw_json_value;
use crate::{Result, err, event::Event};

/// The membership states a member event may carry.
///
/// Any other token fails to parse, and the event carrying it is denied.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
	/// The user is in the room.
	Join,

	/// The user is not in the room. Also the state of users never seen.
	Leave,

	/// The user was invited and may complete the join.
	Invite,

	/// The user was banned and may not rejoin until unbanned.
	Ban,

	/// The user asked to join. No transition admits this yet.
	Knock,
}

impl Membership {
	/// The wire token of this membership.
	#[inline]
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			| Self::Join => "join",
			| Self::Leave => "leave",
			| Self::Invite => "invite",
			| Self::Ban => "ban",
			| Self::Knock => "knock",
		}
	}
}

impl fmt::Display for Membership {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A helper type for an [`Event`] of type `m.room.member`.
#[derive(Clone, Debug)]
pub struct RoomMemberEvent<E: Event>(E);

impl<E: Event> RoomMemberEvent<E> {
	/// Construct a new `RoomMemberEvent` around the given event.
	#[inline]
	pub fn new(event: E) -> Self { Self(event) }

	/// The membership this event establishes.
	#[inline]
	pub fn membership(&self) -> Result<Membership> {
		RoomMemberEventContent::new(self.content()).membership()
	}

	/// Details of the third-party invite this membership claims, if any.
	#[inline]
	pub fn third_party_invite(&self) -> Result<Option<ThirdPartyInvite>> {
		RoomMemberEventContent::new(self.content()).third_party_invite()
	}
}

impl<E: Event> Deref for RoomMemberEvent<E> {
	type Target = E;

	#[inline]
	fn deref(&self) -> &Self::Target { &self.0 }
}

/// A helper type for the raw JSON content of an `m.room.member` event.
pub struct RoomMemberEventContent<'a>(&'a RawJsonValue);

impl<'a> RoomMemberEventContent<'a> {
	/// Construct a new `RoomMemberEventContent` around the given raw JSON
	/// content.
	#[inline]
	#[must_use]
	pub fn new(content: &'a RawJsonValue) -> Self { Self(content) }
}

impl RoomMemberEventContent<'_> {
	/// The membership of the user.
	pub fn membership(&self) -> Result<Membership> {
		#[derive(Deserialize)]
		struct RoomMemberContentMembership {
			membership: Membership,
		}

		let content: RoomMemberContentMembership = from_raw_json_value(self.0).map_err(|error| {
			err!("missing or invalid `membership` field in `m.room.member` event: {error}")
		})?;

		Ok(content.membership)
	}

	/// Details about the third-party invite that resulted in this event.
	pub fn third_party_invite(&self) -> Result<Option<ThirdPartyInvite>> {
		#[derive(Deserialize)]
		struct RoomMemberContentThirdPartyInvite {
			third_party_invite: Option<ThirdPartyInvite>,
		}

		let content: RoomMemberContentThirdPartyInvite =
			from_raw_json_value(self.0).map_err(|error| {
				err!("invalid `third_party_invite` field in `m.room.member` event: {error}")
			})?;

		Ok(content.third_party_invite)
	}
}

/// Details about a third-party invite carried by a member event.
#[derive(Debug, Deserialize)]
pub struct ThirdPartyInvite {
	#[serde(default)]
	signed: ThirdPartyInviteSigned,
}

#[derive(Debug, Default, Deserialize)]
struct ThirdPartyInviteSigned {
	#[serde(default)]
	token: String,
}

impl ThirdPartyInvite {
	/// The token keying the `m.room.third_party_invite` state entry to
	/// consult. Empty when the invite carries none.
	#[inline]
	#[must_use]
	pub fn token(&self) -> &str { &self.signed.token }
}

#[cfg(test)]
mod tests {
	use serde_json::{json, value::to_raw_value};

	use super::{Membership, RoomMemberEventContent};

	fn content(value: serde_json::Value) -> Box<serde_json::value::RawValue> {
		to_raw_value(&value).unwrap()
	}

	#[test]
	fn parses_every_membership_token() {
		for (token, membership) in [
			("join", Membership::Join),
			("leave", Membership::Leave),
			("invite", Membership::Invite),
			("ban", Membership::Ban),
			("knock", Membership::Knock),
		] {
			let raw = content(json!({ "membership": token }));
			assert_eq!(RoomMemberEventContent::new(&raw).membership().unwrap(), membership);
		}
	}

	#[test]
	fn unknown_membership_token_is_a_denial() {
		let raw = content(json!({ "membership": "banished" }));
		let error = RoomMemberEventContent::new(&raw).membership().unwrap_err();
		assert!(error.is_not_allowed());
		assert!(error.to_string().contains("membership"));
	}

	#[test]
	fn missing_membership_is_a_denial() {
		let raw = content(json!({ "displayname": "Alice" }));
		assert!(RoomMemberEventContent::new(&raw).membership().unwrap_err().is_not_allowed());
	}

	#[test]
	fn third_party_invite_token_is_extracted() {
		let raw = content(json!({
			"membership": "invite",
			"third_party_invite": { "signed": { "token": "magic", "mxid": "@bob:bar" } },
		}));
		let invite = RoomMemberEventContent::new(&raw)
			.third_party_invite()
			.unwrap()
			.unwrap();
		assert_eq!(invite.token(), "magic");
	}

	#[test]
	fn third_party_invite_without_signed_payload_has_an_empty_token() {
		let raw = content(json!({ "membership": "invite", "third_party_invite": {} }));
		let invite = RoomMemberEventContent::new(&raw)
			.third_party_invite()
			.unwrap()
			.unwrap();
		assert!(invite.token().is_empty());
	}
}
