use thiserror::Error as ThisError;

/// Result type of the whole crate.
pub type Result<T = (), E = Error> = core::result::Result<T, E>;

/// The two ways an admissibility decision can fail.
///
/// Parse failures of event content are policy denials, not auth-state
/// failures: they are attributes of the input event.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The event violates an authorization rule.
	///
	/// The message names the violated rule, the actors and the relevant
	/// levels. It is meant for humans; match on the kind, not the exact
	/// string.
	#[error("not allowed: {0}")]
	NotAllowed(String),

	/// The auth-state oracle failed.
	///
	/// This is a failure of the caller's storage, not a policy decision; the
	/// underlying error is carried unchanged.
	#[error("auth state lookup failed: {0}")]
	AuthState(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
	/// Wrap a storage failure raised by an [`AuthState`](crate::AuthState)
	/// implementation.
	#[inline]
	pub fn auth_state<E>(error: E) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		Self::AuthState(Box::new(error))
	}

	/// Whether this is a policy denial rather than an oracle failure.
	#[inline]
	#[must_use]
	pub fn is_not_allowed(&self) -> bool { matches!(self, Self::NotAllowed(_)) }
}

/// Construct an [`Error::NotAllowed`] from format arguments.
#[macro_export]
macro_rules! err {
	($($args:tt)+) => {
		$crate::Error::NotAllowed(::std::format!($($args)+))
	};
}

/// Construct an `Err(Error::NotAllowed(..))` from format arguments.
#[macro_export]
macro_rules! Err {
	($($args:tt)+) => {
		::core::result::Result::Err($crate::err!($($args)+))
	};
}
