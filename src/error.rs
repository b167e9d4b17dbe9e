//! Backend-level error types shared by the issuer, the client store, and request handlers.

// self
use crate::{_prelude::*, backend::Operation, client::NameError, store::StoreError};

/// Backend-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical backend error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure, including undecodable records.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		StoreError,
	),
	/// Submitted client configuration or backend configuration is invalid.
	#[error(transparent)]
	InvalidConfig(#[from] ConfigError),
	/// No client configuration is stored under the requested name.
	#[error("Unknown client: {name}.")]
	NotFound {
		/// Requested client name.
		name: String,
	},
	/// Write-time validation could not mint a token with the submitted configuration.
	#[error("Client configuration `{name}` cannot acquire an access token from {token_url}.")]
	Validation {
		/// Client name that was being written.
		name: String,
		/// Token endpoint the validation exchange targeted.
		token_url: String,
		/// Issuer failure that rejected the configuration.
		#[source]
		source: IssueError,
	},
	/// Read-time issuance failed for a stored client.
	#[error("Failed to acquire an access token for `{name}` from {token_url}.")]
	Acquisition {
		/// Client name that was being resolved.
		name: String,
		/// Token endpoint the exchange targeted.
		token_url: String,
		/// Issuer failure that aborted the exchange.
		#[source]
		source: IssueError,
	},

	/// No handler is registered for the path.
	#[error("Unsupported path `{path}`.")]
	UnsupportedPath {
		/// Request path as supplied by the host.
		path: String,
	},
	/// The path exists but does not accept the operation.
	#[error("Operation {operation} is not supported on path `{path}`.")]
	UnsupportedOperation {
		/// Rejected operation.
		operation: Operation,
		/// Request path as supplied by the host.
		path: String,
	},
}
impl Error {
	/// Classifies the error into the caller-facing taxonomy.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Storage(StoreError::Corrupt { .. }) => ErrorKind::Corrupt,
			Self::Storage(_) => ErrorKind::Storage,
			Self::InvalidConfig(_) => ErrorKind::InvalidConfig,
			Self::NotFound { .. } => ErrorKind::NotFound,
			Self::Validation { source, .. } | Self::Acquisition { source, .. } => source.kind(),
			Self::UnsupportedPath { .. } | Self::UnsupportedOperation { .. } =>
				ErrorKind::InvalidRequest,
		}
	}

	/// Returns the issuer failure wrapped by validation or acquisition errors.
	pub fn issue_error(&self) -> Option<&IssueError> {
		match self {
			Self::Validation { source, .. } | Self::Acquisition { source, .. } => Some(source),
			_ => None,
		}
	}
}

/// Coarse error categories that let callers tell "wrong" from "slow" from "missing".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// A required field is missing, empty, or malformed.
	InvalidConfig,
	/// The authorization server rejected the exchange or could not be reached.
	ExchangeFailed,
	/// The bounded exchange did not finish before its deadline.
	DeadlineExceeded,
	/// The caller cancelled the request before the exchange finished.
	Cancelled,
	/// No configuration exists under the requested name.
	NotFound,
	/// A stored record could not be decoded.
	Corrupt,
	/// The storage backend failed.
	Storage,
	/// The host routed an unsupported path or operation.
	InvalidRequest,
}

/// Configuration and validation failures raised before any network call.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required client field is absent or empty.
	#[error("Field `{field}` is required and must not be empty.")]
	MissingField {
		/// Field name as submitted by the host.
		field: &'static str,
	},
	/// A request field has the wrong JSON type.
	#[error("Field `{field}` is invalid.")]
	InvalidField {
		/// Path to the offending field.
		field: String,
		/// Structured decoding failure.
		#[source]
		source: serde_json::Error,
	},
	/// The client name does not match the accepted pattern.
	#[error("Client name is invalid.")]
	InvalidName(#[from] NameError),
	/// The exchange timeout is zero.
	#[error("The exchange timeout must be positive.")]
	NonPositiveTimeout,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let field = e.path().to_string();

		Self::InvalidField { field, source: e.into_inner() }
	}
}

/// Mutually exclusive outcomes of a failed bounded exchange.
#[derive(Debug, ThisError)]
pub enum IssueError {
	/// The exchange itself completed with an error.
	#[error(transparent)]
	ExchangeFailed(#[from] ExchangeError),
	/// The bounded scope elapsed before the exchange completed.
	#[error("Token exchange did not complete within {timeout:?}.")]
	DeadlineExceeded {
		/// Budget the exchange was given (the smaller of the ambient and fixed bounds).
		timeout: StdDuration,
	},
	/// The caller's context was cancelled before the exchange completed.
	#[error("Token exchange was cancelled by the caller.")]
	Cancelled,
}
impl IssueError {
	/// Classifies the issuer failure.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::ExchangeFailed(_) => ErrorKind::ExchangeFailed,
			Self::DeadlineExceeded { .. } => ErrorKind::DeadlineExceeded,
			Self::Cancelled => ErrorKind::Cancelled,
		}
	}
}

/// Failures reported by a single credential exchange.
#[derive(Debug, ThisError)]
pub enum ExchangeError {
	/// The token endpoint answered with an OAuth error (e.g. `invalid_client`).
	#[error("Token endpoint rejected the client credentials: {error}.")]
	Rejected {
		/// OAuth `error` code.
		error: String,
		/// OAuth `error_description`, when supplied.
		description: Option<String>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// The token endpoint returned an unexpected response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// The token endpoint responded with malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
	/// The token request could not be assembled.
	#[error("Token request could not be built.")]
	Request(#[from] oauth2::http::Error),
	/// The configured token endpoint is not an absolute URL.
	#[error("Token endpoint `{token_url}` is not a valid URL.")]
	InvalidTokenUrl {
		/// Offending value.
		token_url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The exchange observed the cancellation of its bounded scope.
	#[error("Token exchange was cancelled.")]
	Cancelled,
	/// The exchange task terminated without producing a result.
	#[error("Token exchange task terminated unexpectedly: {message}.")]
	Aborted {
		/// Join failure summary.
		message: String,
	},
	/// Free-form failure reported by a custom exchanger.
	#[error("{message}")]
	Other {
		/// Human-readable error payload.
		message: String,
	},
}
impl ExchangeError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Builds a free-form failure, typically from a custom exchanger.
	pub fn other(message: impl Into<String>) -> Self {
		Self::Other { message: message.into() }
	}

	/// HTTP status code attached to the failure, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. }
			| Self::TokenEndpoint { status, .. }
			| Self::TokenResponseParse { status, .. } => *status,
			_ => None,
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ExchangeError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn store_error_converts_into_backend_error_with_source() {
		let store_error = StoreError::Backend { message: "database unreachable".into() };
		let error: Error = store_error.clone().into();

		assert_eq!(error.kind(), ErrorKind::Storage);
		assert!(error.to_string().contains("database unreachable"));

		let source = StdError::source(&error)
			.expect("Backend error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn corrupt_records_are_classified_apart_from_backend_failures() {
		let error: Error =
			StoreError::Corrupt { key: "client/a".into(), message: "expected a map".into() }
				.into();

		assert_eq!(error.kind(), ErrorKind::Corrupt);
	}

	#[test]
	fn wrapped_issue_errors_keep_their_kind() {
		let slow = Error::Validation {
			name: "svc".into(),
			token_url: "https://idp.example.com/token".into(),
			source: IssueError::DeadlineExceeded { timeout: StdDuration::from_secs(5) },
		};
		let wrong = Error::Acquisition {
			name: "svc".into(),
			token_url: "https://idp.example.com/token".into(),
			source: ExchangeError::other("failed to get token").into(),
		};

		assert_eq!(slow.kind(), ErrorKind::DeadlineExceeded);
		assert!(slow.to_string().contains("https://idp.example.com/token"));
		assert_eq!(wrong.kind(), ErrorKind::ExchangeFailed);
		assert!(wrong.to_string().contains("svc"));
		assert!(wrong.to_string().contains("https://idp.example.com/token"));
		assert!(matches!(wrong.issue_error(), Some(IssueError::ExchangeFailed(_))));
	}

	#[test]
	fn field_paths_survive_conversion() {
		let value = serde_json::json!({ "client_id": 7 });
		#[derive(Debug, Deserialize)]
		#[allow(dead_code)]
		struct Probe {
			client_id: String,
		}
		let err = serde_path_to_error::deserialize::<_, Probe>(value)
			.expect_err("Numeric client_id should fail to decode.");
		let config_error = ConfigError::from(err);

		assert!(
			matches!(&config_error, ConfigError::InvalidField { field, .. } if field == "client_id")
		);
	}
}
