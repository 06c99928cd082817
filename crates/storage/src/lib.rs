pub mod file_store;
pub mod kv;
pub mod memory_store;
pub mod secure_store;

pub use file_store::FileKeyValueStore;
pub use kv::{KeyValueStore, StorageError};
pub use memory_store::MemoryKeyValueStore;
pub use secure_store::{SecureStore, SecureStoreError};
