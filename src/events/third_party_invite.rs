//! Types for `m.room.third_party_invite` state events.

use std::ops::Deref;

use crate::event::Event;

/// A helper type for an [`Event`] of type `m.room.third_party_invite`.
///
/// Invites claiming a token are gated on the presence of the matching state
/// entry; verification of the signed payload is delegated to the caller's
/// stack and not performed here.
#[derive(Clone, Debug)]
pub struct RoomThirdPartyInviteEvent<E: Event>(E);

impl<E: Event> RoomThirdPartyInviteEvent<E> {
	/// Construct a new `RoomThirdPartyInviteEvent` around the given event.
	#[inline]
	pub fn new(event: E) -> Self { Self(event) }

	/// The token this invite is keyed by.
	#[inline]
	pub fn token(&self) -> Option<&str> { self.state_key() }
}

impl<E: Event> Deref for RoomThirdPartyInviteEvent<E> {
	type Target = E;

	#[inline]
	fn deref(&self) -> &Self::Target { &self.0 }
}
