//! Namespaced CRUD for client configurations on top of a request-scoped [`Storage`].

// self
use crate::{
	_prelude::*,
	client::{ClientConfig, ClientName, Secret},
	store::{Storage, StoreError},
};

/// Key prefix reserved for client configuration records; hosts seal-wrap it at rest.
pub const CLIENT_PREFIX: &str = "client/";

/// Stored form of a client; the name lives in the key, not the payload.
#[derive(Serialize, Deserialize)]
struct ClientRecord {
	client_id: String,
	client_secret: Secret,
	token_url: String,
}

/// Maps client names to configuration records under [`CLIENT_PREFIX`].
///
/// The store holds no state of its own; concurrency is delegated to the backing storage.
#[derive(Clone, Copy)]
pub struct ClientStore<'a> {
	storage: &'a dyn Storage,
}
impl<'a> ClientStore<'a> {
	/// Wraps a request-scoped storage handle.
	pub fn new(storage: &'a dyn Storage) -> Self {
		Self { storage }
	}

	/// Storage key for `name`.
	pub fn key(name: &ClientName) -> String {
		format!("{CLIENT_PREFIX}{name}")
	}

	/// Writes `config`, fully replacing any record stored under the same name.
	pub async fn put(&self, config: &ClientConfig) -> Result<(), StoreError> {
		let record = ClientRecord {
			client_id: config.client_id.clone(),
			client_secret: config.client_secret.clone(),
			token_url: config.token_url.clone(),
		};
		let payload = serde_json::to_vec(&record)
			.map_err(|e| StoreError::Serialization { message: e.to_string() })?;

		self.storage.put(&Self::key(&config.name), payload).await
	}

	/// Reads the record stored under `name`; absence is `Ok(None)`.
	pub async fn get(&self, name: &ClientName) -> Result<Option<ClientConfig>, StoreError> {
		let key = Self::key(name);
		let Some(bytes) = self.storage.get(&key).await? else {
			return Ok(None);
		};
		let mut de = serde_json::Deserializer::from_slice(&bytes);
		let record: ClientRecord = serde_path_to_error::deserialize(&mut de)
			.map_err(|e| StoreError::Corrupt { key, message: e.to_string() })?;

		Ok(Some(ClientConfig {
			name: name.to_owned(),
			client_id: record.client_id,
			client_secret: record.client_secret,
			token_url: record.token_url,
		}))
	}

	/// Removes the record stored under `name`; absent names are not an error.
	pub async fn delete(&self, name: &ClientName) -> Result<(), StoreError> {
		self.storage.delete(&Self::key(name)).await
	}

	/// Lists stored client names in backing-store order.
	pub async fn list(&self) -> Result<Vec<String>, StoreError> {
		self.storage.list(CLIENT_PREFIX).await
	}
}
impl Debug for ClientStore<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientStore").field("prefix", &CLIENT_PREFIX).finish()
	}
}
