//! Deadline-bounded OAuth 2.0 client-credentials access tokens, issued from named client
//! configurations that are only persisted once they have proven they can mint a token.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod backend;
pub mod client;
pub mod context;
pub mod error;
#[cfg(feature = "reqwest")] pub mod http;
pub mod issuer;
#[cfg(feature = "reqwest")] pub mod oauth;
pub mod obs;
pub mod store;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use tokio::time::Instant;
	pub use tokio_util::sync::CancellationToken;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use tokio_util::sync::CancellationToken;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
