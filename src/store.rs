//! Key-value storage contract, built-in backends, and the namespaced client store.

pub mod client;
pub mod file;
pub mod memory;

pub use client::{CLIENT_PREFIX, ClientStore};
pub use file::FileStorage;
pub use memory::MemoryStorage;

// self
use crate::_prelude::*;

/// Boxed future returned by [`Storage`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Durable key-value store supplied by the host for each request.
///
/// Implementations must provide per-key atomicity for `get`/`put`/`delete`; no cross-key
/// transactions are required.
pub trait Storage
where
	Self: Send + Sync,
{
	/// Returns the bytes stored under `key`, or `None` when absent.
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<Vec<u8>>>;

	/// Stores `value` under `key`, replacing any previous value.
	fn put<'a>(&'a self, key: &'a str, value: Vec<u8>) -> StoreFuture<'a, ()>;

	/// Removes `key`; removing an absent key succeeds.
	fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()>;

	/// Lists the immediate children of `prefix`.
	///
	/// Entries are key suffixes; nested groups are reported once with a trailing `/`.
	fn list<'a>(&'a self, prefix: &'a str) -> StoreFuture<'a, Vec<String>>;
}

/// Error type produced by [`Storage`] implementations and the [`ClientStore`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced while encoding a record or snapshot.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// A stored record could not be decoded.
	#[error("Stored record `{key}` is corrupt: {message}.")]
	Corrupt {
		/// Storage key of the undecodable record.
		key: String,
		/// Decoding failure, including the JSON path when known.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Collapses full keys under `prefix` into their immediate children.
pub(crate) fn immediate_children<'k>(
	keys: impl IntoIterator<Item = &'k str>,
	prefix: &str,
) -> Vec<String> {
	let mut children = Vec::<String>::new();

	for suffix in keys.into_iter().filter_map(|key| key.strip_prefix(prefix)) {
		if suffix.is_empty() {
			continue;
		}

		let child = match suffix.find('/') {
			Some(idx) => &suffix[..=idx],
			None => suffix,
		};

		if !children.iter().any(|known| known == child) {
			children.push(child.to_owned());
		}
	}

	children
}
