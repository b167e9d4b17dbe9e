//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};
// crates.io
use serde_json::{Map, Value, json};
// self
use oauth2_accesstoken::{
	CancellationToken,
	backend::{Backend, Operation, Request},
	error::ExchangeError,
	issuer::{AccessToken, ClientCredentials, TokenExchanger},
	store::{MemoryStorage, Storage},
};

pub const TOKEN_URL: &str = "http://localhost:8080/token";

/// Counts exchanges and replies after an optional delay.
#[derive(Clone)]
pub struct StubExchanger {
	calls: Arc<AtomicUsize>,
	delay: Duration,
	outcome: Result<&'static str, &'static str>,
}
impl StubExchanger {
	pub fn succeeding(token: &'static str) -> Self {
		Self { calls: Arc::default(), delay: Duration::ZERO, outcome: Ok(token) }
	}

	pub fn failing(message: &'static str) -> Self {
		Self { calls: Arc::default(), delay: Duration::ZERO, outcome: Err(message) }
	}

	pub fn delayed(mut self, delay: Duration) -> Self {
		self.delay = delay;

		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl TokenExchanger for StubExchanger {
	fn exchange(
		&self,
		_: ClientCredentials,
		_: CancellationToken,
	) -> oauth2_accesstoken::issuer::ExchangeFuture {
		let delay = self.delay;
		let outcome = self.outcome;

		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			if !delay.is_zero() {
				tokio::time::sleep(delay).await;
			}

			match outcome {
				Ok(token) => Ok(AccessToken::new(token)),
				Err(message) => Err(ExchangeError::other(message)),
			}
		})
	}
}

pub fn fields(client_id: &str, client_secret: &str, token_url: &str) -> Map<String, Value> {
	match json!({
		"client_id": client_id,
		"client_secret": client_secret,
		"token_url": token_url,
	}) {
		Value::Object(map) => map,
		_ => unreachable!(),
	}
}

pub fn storage() -> (Arc<MemoryStorage>, Arc<dyn Storage>) {
	let memory = Arc::new(MemoryStorage::default());
	let shared: Arc<dyn Storage> = memory.clone();

	(memory, shared)
}

pub fn write_request(storage: &Arc<dyn Storage>, name: &str, data: Map<String, Value>) -> Request {
	Request::new(Operation::Update, format!("clients/{name}"), storage.clone()).with_data(data)
}

pub async fn seed(backend: &Backend, storage: &Arc<dyn Storage>, name: &str, token_url: &str) {
	backend
		.handle_request(write_request(storage, name, fields("clientId", "clientSecret", token_url)))
		.await
		.expect("Seeding a client configuration should succeed.");
}
