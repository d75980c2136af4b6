//! Concrete event type matching the federation wire format.

use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, value::RawValue as RawJsonValue};

use crate::event::{Event, StateKey};

/// An event as received over federation.
///
/// Only the fields consulted for authorization are modeled; unknown fields
/// are ignored on deserialization.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Pdu {
	/// The room this event belongs to.
	pub room_id: String,

	/// The ID of this event.
	pub event_id: String,

	/// The user ID of the sender.
	pub sender: String,

	/// The type of this event.
	#[serde(rename = "type")]
	pub kind: String,

	/// The state key, if this is a state event.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state_key: Option<StateKey>,

	/// The raw JSON content of this event.
	pub content: Box<RawJsonValue>,

	/// References to the events directly preceding this one.
	#[serde(default)]
	pub prev_events: Vec<PrevEvent>,

	/// For redaction events, the ID of the event being redacted.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub redacts: Option<String>,
}

/// A reference to a prior event: an `[event_id, hashes]` pair.
///
/// Only the event ID is consulted for authorization; the hashes ride along
/// opaquely.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PrevEvent(String, JsonValue);

impl PrevEvent {
	/// Construct a reference to the event with the given ID.
	#[inline]
	pub fn new(event_id: impl Into<String>, hashes: JsonValue) -> Self {
		Self(event_id.into(), hashes)
	}

	/// The ID of the referenced event.
	#[inline]
	#[must_use]
	pub fn event_id(&self) -> &str { &self.0 }
}

impl Event for Pdu {
	#[inline]
	fn event_id(&self) -> &str { &self.event_id }

	#[inline]
	fn room_id(&self) -> &str { &self.room_id }

	#[inline]
	fn sender(&self) -> &str { &self.sender }

	#[inline]
	fn event_type(&self) -> &str { &self.kind }

	#[inline]
	fn state_key(&self) -> Option<&str> { self.state_key.as_deref() }

	#[inline]
	fn content(&self) -> &RawJsonValue { &self.content }

	#[inline]
	fn prev_events(&self) -> impl DoubleEndedIterator<Item = &str> + Send + '_ {
		self.prev_events.iter().map(PrevEvent::event_id)
	}

	#[inline]
	fn redacts(&self) -> Option<&str> { self.redacts.as_deref() }
}
