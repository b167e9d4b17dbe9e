//! Registers a client against a mock token endpoint, then mints access tokens for it through
//! the request dispatcher with the default reqwest exchanger and in-memory storage.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use oauth2_accesstoken::{
	backend::{Backend, BackendConfig, Operation, Request},
	store::{MemoryStorage, Storage},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::default());
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let backend = Backend::oauth2(&BackendConfig::default())?;
	let fields = json!({
		"client_id": "demo-client",
		"client_secret": "super-secret",
		"token_url": server.url("/token"),
	});
	let data = fields.as_object().cloned().unwrap_or_default();

	backend
		.handle_request(
			Request::new(Operation::Update, "clients/demo", storage.clone()).with_data(data),
		)
		.await?;

	let listed =
		backend.handle_request(Request::new(Operation::List, "clients", storage.clone())).await?;

	println!("Registered clients: {}.", serde_json::to_string(&listed)?);

	let token = backend
		.handle_request(Request::new(Operation::Read, "accesstoken/demo", storage.clone()))
		.await?;

	println!("Fresh access token: {}.", serde_json::to_string(&token)?);

	token_mock.assert_calls_async(2).await;

	Ok(())
}
