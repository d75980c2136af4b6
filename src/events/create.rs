//! Types to deserialize `m.room.create` events.

use std::ops::Deref;

use serde::Deserialize;

use super::from_raw_json_value;
use crate::{Err, Result, err, event::Event, id};

/// A helper type for an [`Event`] of type `m.room.create`.
///
/// Deserializes each content field lazily, when requested. The create
/// event's own ID is reachable through [`Event::event_id`]; membership
/// bootstrap compares against it.
#[derive(Clone, Debug)]
pub struct RoomCreateEvent<E: Event>(E);

impl<E: Event> RoomCreateEvent<E> {
	/// Construct a new `RoomCreateEvent` around the given event.
	#[inline]
	pub fn new(event: E) -> Self { Self(event) }

	/// The user that created the room.
	pub fn creator(&self) -> Result<String> {
		#[derive(Deserialize)]
		struct RoomCreateContentCreator {
			creator: String,
		}

		let content: RoomCreateContentCreator =
			from_raw_json_value(self.content()).map_err(|error| {
				err!("missing or invalid `creator` field in `m.room.create` event: {error}")
			})?;

		Ok(content.creator)
	}

	/// Whether the room is federated. Defaults to `true` when absent.
	pub fn federate(&self) -> Result<bool> {
		#[derive(Deserialize)]
		struct RoomCreateContentFederate {
			#[serde(rename = "m.federate")]
			federate: Option<bool>,
		}

		let content: RoomCreateContentFederate =
			from_raw_json_value(self.content()).map_err(|error| {
				err!("invalid `m.federate` field in `m.room.create` event: {error}")
			})?;

		Ok(content.federate.unwrap_or(true))
	}

	/// Check the room's federation policy against the given server.
	///
	/// With `m.federate` set to `false`, only the creator's server may act in
	/// the room.
	pub fn server_allowed(&self, server_name: &str) -> Result {
		if self.federate()? {
			return Ok(());
		}

		let creator = self.creator()?;
		let creator_server = id::server_name(&creator)?;
		if server_name != creator_server {
			return Err!(
				"room is not federated and server {server_name:?} does not match the creator's \
				 server {creator_server:?}"
			);
		}

		Ok(())
	}

	/// Check the room's federation policy against the given user.
	#[inline]
	pub fn user_allowed(&self, user_id: &str) -> Result {
		self.server_allowed(id::server_name(user_id)?)
	}
}

impl<E: Event> Deref for RoomCreateEvent<E> {
	type Target = E;

	#[inline]
	fn deref(&self) -> &Self::Target { &self.0 }
}
