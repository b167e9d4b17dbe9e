//! Thread-safe in-memory [`Storage`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{self, Storage, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<BTreeMap<String, Vec<u8>>>>;

/// Thread-safe storage backend that keeps entries in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage(StoreMap);
impl MemoryStorage {
	/// Number of stored keys across every prefix.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	/// Returns `true` if `key` holds a value.
	pub fn contains_key(&self, key: &str) -> bool {
		self.0.read().contains_key(key)
	}

	fn put_now(map: StoreMap, key: String, value: Vec<u8>) -> Result<(), StoreError> {
		map.write().insert(key, value);

		Ok(())
	}

	fn list_now(map: StoreMap, prefix: &str) -> Vec<String> {
		let guard = map.read();

		store::immediate_children(
			guard.range(prefix.to_owned()..).map(|(key, _)| key.as_str()).take_while(|key| {
				key.starts_with(prefix)
			}),
			prefix,
		)
	}
}
impl Storage for MemoryStorage {
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<Vec<u8>>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(key).cloned()) })
	}

	fn put<'a>(&'a self, key: &'a str, value: Vec<u8>) -> StoreFuture<'a, ()> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Self::put_now(map, key, value) })
	}

	fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().remove(key);

			Ok(())
		})
	}

	fn list<'a>(&'a self, prefix: &'a str) -> StoreFuture<'a, Vec<String>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::list_now(map, prefix)) })
	}
}
