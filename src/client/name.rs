//! Client names used as storage keys and request path segments.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const NAME_MAX_LEN: usize = 128;

/// Error returned when client name validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum NameError {
	/// The name was empty.
	#[error("Client name cannot be empty.")]
	Empty,
	/// The name contains a character outside `[A-Za-z0-9_.@-]`.
	#[error("Client name contains the unsupported character {found:?}.")]
	InvalidCharacter {
		/// First offending character.
		found: char,
	},
	/// The name starts or ends with `-`, `.`, or `@`.
	#[error("Client name must start and end with a letter, digit, or underscore.")]
	InvalidBoundary,
	/// The name exceeded the allowed character count.
	#[error("Client name exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Unique, immutable name of a stored client configuration.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientName(String);
impl ClientName {
	/// Creates a new name after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, NameError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Returns the name as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Deref for ClientName {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ClientName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for ClientName {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<ClientName> for String {
	fn from(value: ClientName) -> Self {
		value.0
	}
}
impl TryFrom<String> for ClientName {
	type Error = NameError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for ClientName {
	type Err = NameError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for ClientName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ClientName({})", self.0)
	}
}
impl Display for ClientName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

fn is_word(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}

fn validate_view(view: &str) -> Result<(), NameError> {
	if view.is_empty() {
		return Err(NameError::Empty);
	}
	if view.len() > NAME_MAX_LEN {
		return Err(NameError::TooLong { max: NAME_MAX_LEN });
	}
	if let Some(found) = view.chars().find(|&c| !(is_word(c) || matches!(c, '-' | '.' | '@'))) {
		return Err(NameError::InvalidCharacter { found });
	}

	let first = view.chars().next().is_some_and(is_word);
	let last = view.chars().next_back().is_some_and(is_word);

	if !(first && last) {
		return Err(NameError::InvalidBoundary);
	}

	Ok(())
}
