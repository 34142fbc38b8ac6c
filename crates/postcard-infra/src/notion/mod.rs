//! Notion document store - HTTP client and an in-memory stand-in.

mod client;
mod memory;
mod properties;

pub use client::{NotionClient, NotionConfig};
pub use memory::InMemoryDocumentStore;
pub use properties::{MAX_TEXT_CHUNK, encode_properties};
