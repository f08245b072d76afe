pub mod gemini_repository;
pub mod generation_repository;
pub mod kv_store;
pub mod memory_kv_store;
pub mod pg_kv_store;

pub use gemini_repository::GeminiRepository;
pub use generation_repository::GenerationRepository;
pub use kv_store::KeyValueStore;
pub use memory_kv_store::InMemoryKeyValueStore;
pub use pg_kv_store::PgKeyValueStore;
