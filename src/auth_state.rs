//! The auth-state oracle and its typed loading layer.

use crate::{
	Result, err,
	event::Event,
	events::{
		JoinRule, Membership, RoomCreateEvent, RoomJoinRulesEvent, RoomMemberEvent,
		RoomPowerLevelsEvent, RoomThirdPartyInviteEvent,
	},
};

/// Oracle over the current authorization state of a room.
///
/// Implementations range from a fixed map in tests to a database-backed
/// fetcher; the engine itself never stores events. Each lookup distinguishes
/// absence from failure: `Ok(None)` means the entry does not exist and the
/// engine applies defaults, while `Err(_)` aborts the decision and is
/// surfaced unchanged.
pub trait AuthState {
	/// The event type served by this oracle.
	type Pdu: Event;

	/// The `m.room.create` state entry.
	fn create(&self) -> Result<Option<Self::Pdu>>;

	/// The `m.room.join_rules` state entry.
	fn join_rules(&self) -> Result<Option<Self::Pdu>>;

	/// The `m.room.power_levels` state entry.
	fn power_levels(&self) -> Result<Option<Self::Pdu>>;

	/// The `m.room.member` state entry for the given user ID.
	fn member(&self, state_key: &str) -> Result<Option<Self::Pdu>>;

	/// The `m.room.third_party_invite` state entry for the given token.
	fn third_party_invite(&self, token: &str) -> Result<Option<Self::Pdu>>;
}

/// Typed loads over an [`AuthState`], with the defaults that apply when a
/// state entry is absent.
pub(crate) trait AuthStateExt: AuthState {
	/// The create event.
	///
	/// Every decision other than on a create event itself starts here; a room
	/// without one cannot authorize anything.
	fn room_create_event(&self) -> Result<RoomCreateEvent<Self::Pdu>>;

	/// The current membership of the given user, `leave` when absent.
	fn user_membership(&self, user_id: &str) -> Result<Membership>;

	/// The current join rule, `invite` when absent.
	fn join_rule(&self) -> Result<JoinRule>;

	/// The current power-levels event, if any.
	fn room_power_levels_event(&self) -> Result<Option<RoomPowerLevelsEvent<Self::Pdu>>>;

	/// The third-party-invite event for the given token, if any.
	fn room_third_party_invite_event(
		&self,
		token: &str,
	) -> Result<Option<RoomThirdPartyInviteEvent<Self::Pdu>>>;
}

impl<S: AuthState + ?Sized> AuthStateExt for S {
	fn room_create_event(&self) -> Result<RoomCreateEvent<Self::Pdu>> {
		self.create()?
			.map(RoomCreateEvent::new)
			.ok_or_else(|| err!("no `m.room.create` event in auth state"))
	}

	fn user_membership(&self, user_id: &str) -> Result<Membership> {
		self.member(user_id)?
			.map_or(Ok(Membership::Leave), |event| RoomMemberEvent::new(event).membership())
	}

	fn join_rule(&self) -> Result<JoinRule> {
		self.join_rules()?
			.map_or(Ok(JoinRule::Invite), |event| RoomJoinRulesEvent::new(event).join_rule())
	}

	fn room_power_levels_event(&self) -> Result<Option<RoomPowerLevelsEvent<Self::Pdu>>> {
		Ok(self.power_levels()?.map(RoomPowerLevelsEvent::new))
	}

	fn room_third_party_invite_event(
		&self,
		token: &str,
	) -> Result<Option<RoomThirdPartyInviteEvent<Self::Pdu>>> {
		Ok(self
			.third_party_invite(token)?
			.map(RoomThirdPartyInviteEvent::new))
	}
}
