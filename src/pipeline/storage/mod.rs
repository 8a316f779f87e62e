// Process-local storage for ingest results

pub mod in_memory;

pub use in_memory::IngestCache;
