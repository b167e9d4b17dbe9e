//! Request handlers for client configurations and access tokens.
//!
//! [`Backend`] owns nothing but the [`TokenIssuer`]; every handler receives the host's
//! request-scoped [`Storage`] and [`Context`]. A configuration is only persisted after the
//! issuer proved it can mint a token, and every access-token read performs a fresh bounded
//! exchange.

pub mod paths;

pub use paths::*;

// self
use crate::{
	_prelude::*,
	client::{ClientConfig, ClientName},
	context::Context,
	error::ConfigError,
	issuer::{
		AccessToken, ClientCredentials, DEFAULT_EXCHANGE_TIMEOUT, TokenExchanger, TokenIssuer,
	},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	store::{CLIENT_PREFIX, ClientStore, Storage},
};
#[cfg(feature = "reqwest")]
use crate::{
	http::ReqwestHttpClient,
	oauth::{ClientAuthMethod, OAuth2Exchanger},
};

/// Storage prefixes the host should seal-wrap at rest.
pub const SEAL_WRAP_PREFIXES: &[&str] = &[CLIENT_PREFIX];

/// Host-tunable backend settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
	/// Fixed timeout, in seconds, applied to every exchange.
	pub exchange_timeout_secs: u64,
	/// How the production exchanger presents client credentials.
	#[cfg(feature = "reqwest")]
	pub client_auth_method: ClientAuthMethod,
}
impl BackendConfig {
	/// Exchange timeout as a [`StdDuration`], rejecting zero.
	pub fn exchange_timeout(&self) -> Result<StdDuration, ConfigError> {
		match self.exchange_timeout_secs {
			0 => Err(ConfigError::NonPositiveTimeout),
			secs => Ok(StdDuration::from_secs(secs)),
		}
	}
}
impl Default for BackendConfig {
	fn default() -> Self {
		Self {
			exchange_timeout_secs: DEFAULT_EXCHANGE_TIMEOUT.as_secs(),
			#[cfg(feature = "reqwest")]
			client_auth_method: ClientAuthMethod::default(),
		}
	}
}

/// Client-credentials access-token backend.
///
/// Cloning is cheap; clones share the exchanger and are safe to use from concurrent requests.
#[derive(Clone, Debug)]
pub struct Backend {
	issuer: TokenIssuer,
}
impl Backend {
	/// Creates a backend with the default exchange timeout.
	pub fn new(exchanger: impl TokenExchanger) -> Self {
		Self { issuer: TokenIssuer::new(exchanger) }
	}

	/// Creates a backend from host settings and an exchanger.
	pub fn from_config(
		config: &BackendConfig,
		exchanger: impl TokenExchanger,
	) -> Result<Self, ConfigError> {
		Self::new(exchanger).with_exchange_timeout(config.exchange_timeout()?)
	}

	/// Creates the production backend that exchanges over HTTP.
	#[cfg(feature = "reqwest")]
	pub fn oauth2(config: &BackendConfig) -> Result<Self, ConfigError> {
		let exchanger = OAuth2Exchanger::with_http_client(ReqwestHttpClient::new()?)
			.with_auth_method(config.client_auth_method);

		Self::from_config(config, exchanger)
	}

	/// Replaces the fixed exchange timeout; zero is rejected.
	pub fn with_exchange_timeout(mut self, timeout: StdDuration) -> Result<Self, ConfigError> {
		self.issuer = self.issuer.with_timeout(timeout)?;

		Ok(self)
	}

	/// Issuer shared by validation and issuance.
	pub fn issuer(&self) -> &TokenIssuer {
		&self.issuer
	}

	/// Storage prefixes the host should seal-wrap.
	pub fn seal_wrap_storage() -> &'static [&'static str] {
		SEAL_WRAP_PREFIXES
	}

	/// Validates `config` with a bounded exchange, then persists it.
	///
	/// Nothing is written when the exchange fails; an existing record stays untouched.
	pub async fn write_client(
		&self,
		ctx: &Context,
		storage: &dyn Storage,
		config: ClientConfig,
	) -> Result<()> {
		let client = config.name.to_string();

		observe(OperationKind::WriteClient, "write_client", Some(&client), async move {
			if let Err(source) =
				self.issuer.generate_token(ctx, ClientCredentials::from(&config)).await
			{
				return Err(Error::Validation {
					name: config.name.to_string(),
					token_url: config.token_url,
					source,
				});
			}

			ClientStore::new(storage).put(&config).await?;

			Ok(())
		})
		.await
	}

	/// Reads the configuration stored under `name`; unknown names yield `None`.
	pub async fn read_client(
		&self,
		storage: &dyn Storage,
		name: &str,
	) -> Result<Option<ClientConfig>> {
		observe(OperationKind::ReadClient, "read_client", Some(name), async move {
			let name = parse_name(name)?;

			Ok(ClientStore::new(storage).get(&name).await?)
		})
		.await
	}

	/// Removes the configuration stored under `name`; unknown names succeed.
	pub async fn delete_client(&self, storage: &dyn Storage, name: &str) -> Result<()> {
		observe(OperationKind::DeleteClient, "delete_client", Some(name), async move {
			let name = parse_name(name)?;

			Ok(ClientStore::new(storage).delete(&name).await?)
		})
		.await
	}

	/// Lists the names of every stored configuration.
	pub async fn list_clients(&self, storage: &dyn Storage) -> Result<Vec<String>> {
		observe(OperationKind::ListClients, "list_clients", None, async move {
			Ok(ClientStore::new(storage).list().await?)
		})
		.await
	}

	/// Mints a fresh access token for the client stored under `name`.
	pub async fn read_access_token(
		&self,
		ctx: &Context,
		storage: &dyn Storage,
		name: &str,
	) -> Result<AccessToken> {
		observe(OperationKind::ReadAccessToken, "read_access_token", Some(name), async move {
			let name = parse_name(name)?;
			let config = ClientStore::new(storage)
				.get(&name)
				.await?
				.ok_or_else(|| Error::NotFound { name: name.to_string() })?;

			self.issuer.generate_token(ctx, ClientCredentials::from(&config)).await.map_err(
				|source| Error::Acquisition {
					name: config.name.to_string(),
					token_url: config.token_url.clone(),
					source,
				},
			)
		})
		.await
	}
}

fn parse_name(name: &str) -> Result<ClientName> {
	if name.is_empty() {
		return Err(ConfigError::MissingField { field: "name" }.into());
	}

	Ok(ClientName::new(name).map_err(ConfigError::from)?)
}

async fn observe<T, Fut>(
	kind: OperationKind,
	stage: &'static str,
	client: Option<&str>,
	fut: Fut,
) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = OperationSpan::new(kind, stage, client);

	obs::record_operation_outcome(kind, OperationOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => obs::record_operation_outcome(kind, OperationOutcome::Success),
		Err(_) => obs::record_operation_outcome(kind, OperationOutcome::Failure),
	}

	result
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{error::ExchangeError, store::MemoryStorage};

	fn config(name: &str) -> ClientConfig {
		ClientConfig::new(
			ClientName::new(name).expect("Name fixture should be valid."),
			"clientId",
			"clientSecret",
			"http://localhost:8080/token",
		)
		.expect("Config fixture should be valid.")
	}

	#[test]
	fn zero_timeouts_are_rejected_from_config() {
		let config = BackendConfig { exchange_timeout_secs: 0, ..BackendConfig::default() };
		let err = Backend::from_config(&config, |_: ClientCredentials, _: CancellationToken| async {
			Ok::<_, ExchangeError>(AccessToken::new("token"))
		})
		.expect_err("Zero timeouts should be rejected.");

		assert!(matches!(err, ConfigError::NonPositiveTimeout));
	}

	#[test]
	fn config_defaults_to_five_seconds() {
		let config: BackendConfig =
			serde_json::from_value(serde_json::json!({})).expect("Empty config should decode.");

		assert_eq!(config.exchange_timeout_secs, 5);
		assert_eq!(
			config.exchange_timeout().expect("Default timeout should be valid."),
			StdDuration::from_secs(5)
		);
	}

	#[test]
	fn client_prefix_is_seal_wrapped() {
		assert_eq!(Backend::seal_wrap_storage(), ["client/"]);
	}

	#[tokio::test]
	async fn failed_validation_keeps_the_previous_record() {
		let storage = MemoryStorage::default();
		let good = Backend::new(|_: ClientCredentials, _: CancellationToken| async {
			Ok::<_, ExchangeError>(AccessToken::new("token"))
		});
		let bad = Backend::new(|_: ClientCredentials, _: CancellationToken| async {
			Err::<AccessToken, _>(ExchangeError::other("failed to get token"))
		});

		good.write_client(&Context::background(), &storage, config("svc"))
			.await
			.expect("Valid config should be written.");

		let mut replacement = config("svc");

		replacement.client_id = "replaced".into();

		let err = bad
			.write_client(&Context::background(), &storage, replacement)
			.await
			.expect_err("Rejected config should not be written.");
		let stored = good
			.read_client(&storage, "svc")
			.await
			.expect("Read should succeed.")
			.expect("Original record should remain.");

		assert!(matches!(
			err,
			Error::Validation { ref name, ref token_url, .. }
				if name == "svc" && token_url == "http://localhost:8080/token"
		));
		assert_eq!(stored.client_id, "clientId");
	}

	#[tokio::test]
	async fn invalid_names_are_rejected_before_storage() {
		let storage = MemoryStorage::default();
		let backend = Backend::new(|_: ClientCredentials, _: CancellationToken| async {
			Ok::<_, ExchangeError>(AccessToken::new("token"))
		});
		let err = backend
			.read_client(&storage, "bad name")
			.await
			.expect_err("Names with whitespace should be rejected.");

		assert_eq!(err.kind(), crate::error::ErrorKind::InvalidConfig);
	}
}
