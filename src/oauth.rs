//! Production [`TokenExchanger`] backed by the `oauth2` crate and reqwest.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, HttpClientError, RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, ExchangeError},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
	issuer::{AccessToken, ClientCredentials, ExchangeFuture, TokenExchanger},
};

/// How client credentials are presented to the token endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	/// HTTP Basic authentication header.
	#[default]
	ClientSecretBasic,
	/// `client_id`/`client_secret` form fields in the request body.
	ClientSecretPost,
}

/// Performs the `client_credentials` grant against the configured token URL.
///
/// No scopes or extra parameters are sent. Redirects are never followed when the default
/// transport is used.
#[derive(Clone, Debug)]
pub struct OAuth2Exchanger {
	http_client: ReqwestHttpClient,
	auth_method: ClientAuthMethod,
}
impl OAuth2Exchanger {
	/// Creates an exchanger over a redirect-free reqwest client.
	pub fn new() -> Result<Self, ConfigError> {
		Ok(Self::with_http_client(ReqwestHttpClient::new()?))
	}

	/// Creates an exchanger over a caller-supplied transport.
	pub fn with_http_client(http_client: ReqwestHttpClient) -> Self {
		Self { http_client, auth_method: ClientAuthMethod::default() }
	}

	/// Selects how credentials are presented.
	pub fn with_auth_method(mut self, auth_method: ClientAuthMethod) -> Self {
		self.auth_method = auth_method;

		self
	}

	/// Configured credential presentation.
	pub fn auth_method(&self) -> ClientAuthMethod {
		self.auth_method
	}

	async fn request(
		http_client: ReqwestHttpClient,
		auth_method: ClientAuthMethod,
		credentials: ClientCredentials,
	) -> Result<AccessToken, ExchangeError> {
		let token_url = Url::parse(&credentials.token_url).map_err(|source| {
			ExchangeError::InvalidTokenUrl { token_url: credentials.token_url.clone(), source }
		})?;
		let mut oauth_client = BasicClient::new(ClientId::new(credentials.client_id))
			.set_client_secret(ClientSecret::new(credentials.client_secret.expose().to_owned()))
			.set_token_uri(TokenUrl::from_url(token_url));

		if matches!(auth_method, ClientAuthMethod::ClientSecretPost) {
			oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
		}

		let meta = ResponseMetadataSlot::default();
		let instrumented = http_client.instrumented(meta.clone());
		let response = oauth_client
			.exchange_client_credentials()
			.request_async(&instrumented)
			.await
			.map_err(|e| map_request_error(meta.take(), e))?;
		let expiry = response
			.expires_in()
			.filter(|expires_in| !expires_in.is_zero())
			.and_then(|expires_in| Duration::try_from(expires_in).ok())
			.and_then(|expires_in| OffsetDateTime::now_utc().checked_add(expires_in));
		let mut token = AccessToken::new(response.access_token().secret().to_owned());

		if let Some(expiry) = expiry {
			token = token.with_expiry(expiry);
		}

		Ok(token)
	}
}
impl TokenExchanger for OAuth2Exchanger {
	fn exchange(
		&self,
		credentials: ClientCredentials,
		cancel: CancellationToken,
	) -> ExchangeFuture {
		let http_client = self.http_client.clone();
		let auth_method = self.auth_method;

		Box::pin(async move {
			tokio::select! {
				biased;

				_ = cancel.cancelled() => Err(ExchangeError::Cancelled),
				result = Self::request(http_client, auth_method, credentials) => result,
			}
		})
	}
}

fn map_request_error(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> ExchangeError {
	let status = meta.and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, status),
		RequestTokenError::Request(error) => map_transport_error(error, status),
		RequestTokenError::Parse(source, _body) =>
			ExchangeError::TokenResponseParse { source, status },
		RequestTokenError::Other(message) => ExchangeError::TokenEndpoint { message, status },
	}
}

fn map_server_response_error(response: BasicErrorResponse, status: Option<u16>) -> ExchangeError {
	ExchangeError::Rejected {
		error: response.error().as_ref().to_owned(),
		description: response.error_description().cloned(),
		status,
	}
}

fn map_transport_error(err: HttpClientError<ReqwestError>, status: Option<u16>) -> ExchangeError {
	match err {
		HttpClientError::Reqwest(inner) => map_reqwest_error(*inner, status),
		HttpClientError::Http(inner) => ExchangeError::Request(inner),
		HttpClientError::Io(inner) => ExchangeError::Io(inner),
		HttpClientError::Other(message) => ExchangeError::TokenEndpoint {
			message: format!("HTTP client error occurred while calling the token endpoint: {message}"),
			status,
		},
		_ => ExchangeError::TokenEndpoint {
			message: "HTTP client error occurred while calling the token endpoint".into(),
			status,
		},
	}
}

fn map_reqwest_error(err: ReqwestError, status: Option<u16>) -> ExchangeError {
	if err.is_timeout() {
		return ExchangeError::TokenEndpoint {
			message: "Request timed out while calling the token endpoint".into(),
			status: status.or_else(|| err.status().map(|code| code.as_u16())),
		};
	}

	ExchangeError::network(err)
}
