//! Client configuration records and request-field validation.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	client::{ClientName, Secret},
	error::ConfigError,
};

/// One OAuth 2.0 client-credentials identity, keyed by its name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Storage key; immutable once chosen.
	pub name: ClientName,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret; redacted by every formatter.
	pub client_secret: Secret,
	/// Token endpoint the client-credentials grant is posted to.
	pub token_url: String,
}
impl ClientConfig {
	/// Builds a configuration, rejecting empty fields.
	pub fn new(
		name: ClientName,
		client_id: impl Into<String>,
		client_secret: impl Into<Secret>,
		token_url: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let config = Self {
			name,
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			token_url: token_url.into(),
		};

		config.validate()?;

		Ok(config)
	}

	/// Decodes the write-request fields for `name`.
	///
	/// The name always comes from the request path; a `name` entry in `data` is ignored.
	pub fn from_fields(name: &str, data: &Map<String, Value>) -> Result<Self, ConfigError> {
		if name.is_empty() {
			return Err(ConfigError::MissingField { field: "name" });
		}

		let name = ClientName::new(name)?;
		let fields: ClientFields =
			serde_path_to_error::deserialize(Value::Object(data.to_owned()))?;

		Self::new(
			name,
			fields.client_id.unwrap_or_default(),
			fields.client_secret.unwrap_or_default(),
			fields.token_url.unwrap_or_default(),
		)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.is_empty() {
			return Err(ConfigError::MissingField { field: "client_id" });
		}
		if self.client_secret.is_empty() {
			return Err(ConfigError::MissingField { field: "client_secret" });
		}
		if self.token_url.is_empty() {
			return Err(ConfigError::MissingField { field: "token_url" });
		}

		Ok(())
	}
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ClientFields {
	client_id: Option<String>,
	client_secret: Option<String>,
	token_url: Option<String>,
}
