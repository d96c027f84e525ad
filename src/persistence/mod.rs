pub mod codec;
pub mod document;
pub mod kv;

pub use codec::{deserialize, from_json, serialize, to_json};
pub use document::{DocumentEdge, DocumentNode, StrategyDocument};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
