//! Identifier utilities.
//!
//! User, room and event identifiers share one shape: a sigil-prefixed
//! localpart, a `:`, and the name of the server that allocated the
//! identifier. Everything after the first `:` is the server name. Any
//! validation beyond what the authorization rules consult belongs to the
//! caller.

use crate::{Err, Result};

/// Extract the server name from a user, room or event identifier.
///
/// # Errors
///
/// Denies when the identifier carries no `:` separator.
pub fn server_name(id: &str) -> Result<&str> {
	match id.split_once(':') {
		| Some((_, server_name)) => Ok(server_name),
		| None => Err!("malformed identifier {id:?}: missing server name"),
	}
}

/// Whether `user_id` has the shape of a user identifier: a leading `@` and a
/// `:` separator.
#[must_use]
pub fn is_valid_user_id(user_id: &str) -> bool {
	user_id.starts_with('@') && user_id.contains(':')
}

#[cfg(test)]
mod tests {
	use super::{is_valid_user_id, server_name};

	#[test]
	fn server_name_is_everything_after_the_first_colon() {
		assert_eq!(server_name("@alice:example.org").unwrap(), "example.org");
		assert_eq!(server_name("!room:foo").unwrap(), "foo");
		assert_eq!(server_name("$event:host:8448").unwrap(), "host:8448");
		assert!(server_name("no-separator").unwrap_err().is_not_allowed());
	}

	#[test]
	fn user_id_shape() {
		assert!(is_valid_user_id("@alice:example.org"));
		assert!(!is_valid_user_id("alice:example.org"));
		assert!(!is_valid_user_id("@alice"));
		assert!(!is_valid_user_id(""));
	}
}
