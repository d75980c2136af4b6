//! Abstraction over the caller's event type.

use std::fmt::Debug;

use serde_json::value::RawValue as RawJsonValue;
use smallstr::SmallString;

/// State keys are short strings: user IDs, server names, invite tokens or
/// empty. Keep the common case inline.
pub type StateKey = SmallString<[u8; 48]>;

/// Abstraction of a room event so callers can keep their own event types.
///
/// The engine only reads through this trait during a single admissibility
/// decision; it never mutates an event and retains nothing afterwards.
pub trait Event: Clone + Debug {
	/// The ID of this event.
	fn event_id(&self) -> &str;

	/// The room this event belongs to.
	fn room_id(&self) -> &str;

	/// The user ID of the sender.
	fn sender(&self) -> &str;

	/// The type of this event, e.g. `m.room.member`.
	fn event_type(&self) -> &str;

	/// The state key, if this is a state event.
	fn state_key(&self) -> Option<&str>;

	/// The raw JSON content of this event.
	fn content(&self) -> &RawJsonValue;

	/// IDs of the events directly preceding this one in the room graph.
	fn prev_events(&self) -> impl DoubleEndedIterator<Item = &str> + Send + '_;

	/// For redaction events, the ID of the event being redacted.
	fn redacts(&self) -> Option<&str>;
}
