//! Client-side data model: transcript entries, the transcript store, the input
//! draft, key classification, and the error taxonomy.

pub mod draft;
pub mod entry;
pub mod error;
pub mod keys;
pub mod transcript;
