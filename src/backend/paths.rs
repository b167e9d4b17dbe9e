//! Path routing between the host's request envelope and [`Backend`] handlers.
//!
//! | Path                  | Operations             |
//! |-----------------------|------------------------|
//! | `clients`, `clients/` | `List`                 |
//! | `clients/<name>`      | `Read, Update, Delete` |
//! | `accesstoken/<name>`  | `Read`                 |

// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	backend::Backend,
	client::{ClientConfig, Secret},
	context::Context,
	issuer::AccessToken,
	store::Storage,
};

/// Operation requested by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
	/// Read a single resource.
	Read,
	/// Create or replace a resource.
	Update,
	/// Remove a resource.
	Delete,
	/// Enumerate resources.
	List,
}
impl Operation {
	/// Returns a stable label for messages and logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Read => "read",
			Operation::Update => "update",
			Operation::Delete => "delete",
			Operation::List => "list",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// One host request with its request-scoped storage and caller context.
#[derive(Clone)]
pub struct Request {
	/// Requested operation.
	pub operation: Operation,
	/// Path relative to the backend mount.
	pub path: String,
	/// Request fields; only consulted by writes.
	pub data: Map<String, Value>,
	/// Storage handle for this request.
	pub storage: Arc<dyn Storage>,
	/// Caller cancellation and deadline.
	pub context: Context,
}
impl Request {
	/// Builds a request with empty data and a background context.
	pub fn new(operation: Operation, path: impl Into<String>, storage: Arc<dyn Storage>) -> Self {
		Self {
			operation,
			path: path.into(),
			data: Map::new(),
			storage,
			context: Context::background(),
		}
	}

	/// Attaches request fields.
	pub fn with_data(mut self, data: Map<String, Value>) -> Self {
		self.data = data;

		self
	}

	/// Attaches the caller's context.
	pub fn with_context(mut self, context: Context) -> Self {
		self.context = context;

		self
	}
}
impl Debug for Request {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Request")
			.field("operation", &self.operation)
			.field("path", &self.path)
			.field("fields", &self.data.keys().collect::<Vec<_>>())
			.field("context", &self.context)
			.finish_non_exhaustive()
	}
}

/// Response body returned to the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
	/// A stored client configuration.
	Client(ClientView),
	/// Names of stored client configurations.
	List {
		/// Stored names in backing-store order.
		keys: Vec<String>,
	},
	/// A freshly minted access token.
	AccessToken(TokenView),
}

/// Client configuration as returned by reads.
///
/// The secret serializes verbatim; only formatting redacts it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClientView {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: Secret,
	/// Token endpoint URL.
	pub token_url: String,
}
impl From<ClientConfig> for ClientView {
	fn from(config: ClientConfig) -> Self {
		Self {
			client_id: config.client_id,
			client_secret: config.client_secret,
			token_url: config.token_url,
		}
	}
}

/// Access token as returned by reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenView {
	/// Opaque bearer token.
	pub access_token: Secret,
	/// RFC 3339 expiry, when known.
	#[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub expiry: Option<OffsetDateTime>,
}
impl From<AccessToken> for TokenView {
	fn from(token: AccessToken) -> Self {
		Self { access_token: token.access_token, expiry: token.expiry }
	}
}

enum Route<'p> {
	Clients,
	Client(&'p str),
	AccessToken(&'p str),
}
impl<'p> Route<'p> {
	fn parse(path: &'p str) -> Option<Self> {
		let path = path.trim_start_matches('/');

		if path == "clients" || path == "clients/" {
			return Some(Self::Clients);
		}
		if let Some(name) = path.strip_prefix("clients/") {
			return Some(Self::Client(name));
		}
		if let Some(name) = path.strip_prefix("accesstoken/") {
			return Some(Self::AccessToken(name));
		}

		None
	}
}

impl Backend {
	/// Routes a host request to the matching handler.
	///
	/// Writes and deletes return `Ok(None)`; reads of unknown clients also return `Ok(None)`.
	pub async fn handle_request(&self, request: Request) -> Result<Option<Response>> {
		let Request { operation, path, data, storage, context } = request;
		let storage = storage.as_ref();
		let unsupported = || Error::UnsupportedOperation { operation, path: path.clone() };

		match (Route::parse(&path), operation) {
			(Some(Route::Clients), Operation::List) => {
				let keys = self.list_clients(storage).await?;

				Ok(Some(Response::List { keys }))
			},
			(Some(Route::Client(name)), Operation::Read) => {
				let config = self.read_client(storage, name).await?;

				Ok(config.map(|config| Response::Client(config.into())))
			},
			(Some(Route::Client(name)), Operation::Update) => {
				let config = ClientConfig::from_fields(name, &data)?;

				self.write_client(&context, storage, config).await?;

				Ok(None)
			},
			(Some(Route::Client(name)), Operation::Delete) => {
				self.delete_client(storage, name).await?;

				Ok(None)
			},
			(Some(Route::AccessToken(name)), Operation::Read) => {
				let token = self.read_access_token(&context, storage, name).await?;

				Ok(Some(Response::AccessToken(token.into())))
			},
			(Some(_), _) => Err(unsupported()),
			(None, _) => Err(Error::UnsupportedPath { path: path.clone() }),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn routes_are_recognized() {
		assert!(matches!(Route::parse("clients"), Some(Route::Clients)));
		assert!(matches!(Route::parse("clients/"), Some(Route::Clients)));
		assert!(matches!(Route::parse("clients/svc"), Some(Route::Client("svc"))));
		assert!(matches!(Route::parse("/accesstoken/svc"), Some(Route::AccessToken("svc"))));
		assert!(Route::parse("config").is_none());
	}

	#[test]
	fn token_views_serialize_rfc3339_expiry() {
		let view = TokenView {
			access_token: Secret::new("token"),
			expiry: Some(time::macros::datetime!(2026-01-02 03:04:05 UTC)),
		};
		let json = serde_json::to_value(&view).expect("Token view should serialize.");

		assert_eq!(
			json,
			serde_json::json!({ "access_token": "token", "expiry": "2026-01-02T03:04:05Z" })
		);
	}

	#[test]
	fn client_views_expose_the_secret_to_the_host() {
		let view = Response::Client(ClientView {
			client_id: "id".into(),
			client_secret: Secret::new("s3cret"),
			token_url: "https://idp.example.com/token".into(),
		});
		let json = serde_json::to_value(&view).expect("Client view should serialize.");

		assert_eq!(json["client_secret"], "s3cret");
		assert!(!format!("{view:?}").contains("s3cret"));
	}
}
