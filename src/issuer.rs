//! Bounded, cancellable client-credentials exchanges.
//!
//! [`TokenIssuer::generate_token`] is the single code path shared by write-time validation
//! and read-time issuance. Each call derives a [`BoundedScope`](crate::context::BoundedScope)
//! from the caller's [`Context`], spawns the exchange as its own task, and races it against
//! the scope's deadline and the caller's cancellation. Exactly one outcome is returned. When
//! the exchange loses, or the caller drops the issuing future, its scope token is cancelled and
//! the task is aborted so the in-flight HTTP request is dropped instead of lingering in the
//! background.

// crates.io
use tokio_util::task::AbortOnDropHandle;
// self
use crate::{
	_prelude::*,
	client::{ClientConfig, Secret},
	context::Context,
	error::{ConfigError, ExchangeError, IssueError},
	obs::{self, AbandonCause},
};

/// Fixed exchange timeout applied to validation and issuance.
pub const DEFAULT_EXCHANGE_TIMEOUT: StdDuration = StdDuration::from_secs(5);

/// Boxed future returned by [`TokenExchanger::exchange`].
pub type ExchangeFuture =
	Pin<Box<dyn Future<Output = Result<AccessToken, ExchangeError>> + 'static + Send>>;

/// Capability that performs one client-credentials exchange.
///
/// The returned future is spawned onto the runtime, so it must own everything it touches.
/// `cancel` fires when the bounded scope is abandoned; implementations that fan out work of
/// their own should stop it when the token fires. Any
/// `Fn(ClientCredentials, CancellationToken) -> impl Future` closure is an exchanger.
pub trait TokenExchanger
where
	Self: 'static + Send + Sync,
{
	/// Starts an exchange for `credentials`.
	fn exchange(&self, credentials: ClientCredentials, cancel: CancellationToken)
	-> ExchangeFuture;
}
impl<F, Fut> TokenExchanger for F
where
	F: 'static + Send + Sync + Fn(ClientCredentials, CancellationToken) -> Fut,
	Fut: 'static + Send + Future<Output = Result<AccessToken, ExchangeError>>,
{
	fn exchange(
		&self,
		credentials: ClientCredentials,
		cancel: CancellationToken,
	) -> ExchangeFuture {
		Box::pin(self(credentials, cancel))
	}
}

/// Owned credential triple handed to an exchanger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientCredentials {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: Secret,
	/// Token endpoint URL as configured.
	pub token_url: String,
}
impl From<&ClientConfig> for ClientCredentials {
	fn from(config: &ClientConfig) -> Self {
		Self {
			client_id: config.client_id.clone(),
			client_secret: config.client_secret.clone(),
			token_url: config.token_url.clone(),
		}
	}
}

/// Access token minted by one exchange; never persisted or cached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
	/// Opaque bearer token.
	pub access_token: Secret,
	/// Absolute expiry, absent when the server omitted `expires_in`.
	pub expiry: Option<OffsetDateTime>,
}
impl AccessToken {
	/// Wraps a bearer token without an expiry.
	pub fn new(access_token: impl Into<Secret>) -> Self {
		Self { access_token: access_token.into(), expiry: None }
	}

	/// Sets the absolute expiry instant.
	pub fn with_expiry(mut self, expiry: OffsetDateTime) -> Self {
		self.expiry = Some(expiry);

		self
	}
}

/// Performs deadline-bounded exchanges through an injected [`TokenExchanger`].
#[derive(Clone)]
pub struct TokenIssuer {
	exchanger: Arc<dyn TokenExchanger>,
	timeout: StdDuration,
}
impl TokenIssuer {
	/// Creates an issuer with the [`DEFAULT_EXCHANGE_TIMEOUT`].
	pub fn new(exchanger: impl TokenExchanger) -> Self {
		Self::from_arc(Arc::new(exchanger))
	}

	/// Creates an issuer that shares an existing exchanger.
	pub fn from_arc(exchanger: Arc<dyn TokenExchanger>) -> Self {
		Self { exchanger, timeout: DEFAULT_EXCHANGE_TIMEOUT }
	}

	/// Replaces the fixed exchange timeout; zero is rejected.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Result<Self, ConfigError> {
		if timeout.is_zero() {
			return Err(ConfigError::NonPositiveTimeout);
		}

		self.timeout = timeout;

		Ok(self)
	}

	/// Fixed timeout composed with every caller deadline.
	pub fn timeout(&self) -> StdDuration {
		self.timeout
	}

	/// Exchanges `credentials` for a token, bounded by the earlier of the caller's deadline
	/// and the fixed timeout.
	pub async fn generate_token(
		&self,
		ctx: &Context,
		credentials: ClientCredentials,
	) -> Result<AccessToken, IssueError> {
		let scope = ctx.bounded(self.timeout);

		if ctx.is_cancelled() {
			return Err(IssueError::Cancelled);
		}
		if scope.is_elapsed() {
			return Err(IssueError::DeadlineExceeded { timeout: scope.budget() });
		}

		// Both fire if this future is dropped before the race settles.
		let _cancel_on_drop = scope.token().drop_guard();
		let exchange = self.exchanger.exchange(credentials, scope.token());
		let mut task = AbortOnDropHandle::new(tokio::spawn(exchange));
		let (outcome, cause) = tokio::select! {
			biased;

			joined = &mut task => (joined_outcome(joined), None),
			_ = tokio::time::sleep_until(scope.deadline()) => (
				Err(IssueError::DeadlineExceeded { timeout: scope.budget() }),
				Some(AbandonCause::Deadline),
			),
			_ = ctx.cancellation().cancelled() =>
				(Err(IssueError::Cancelled), Some(AbandonCause::Cancelled)),
		};

		if let Some(cause) = cause {
			scope.cancel();
			task.abort();
			obs::record_exchange_abandoned(cause);
		}

		outcome
	}
}
impl Debug for TokenIssuer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenIssuer").field("timeout", &self.timeout).finish_non_exhaustive()
	}
}

fn joined_outcome(
	joined: Result<Result<AccessToken, ExchangeError>, tokio::task::JoinError>,
) -> Result<AccessToken, IssueError> {
	match joined {
		Ok(Ok(token)) => Ok(token),
		Ok(Err(e)) => Err(IssueError::ExchangeFailed(e)),
		Err(e) => Err(ExchangeError::Aborted { message: e.to_string() }.into()),
	}
}
