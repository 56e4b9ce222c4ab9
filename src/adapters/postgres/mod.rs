//! PostgreSQL adapters.

mod character_sink;

pub use character_sink::PostgresCharacterSink;
