//! Record-level codecs for pack sync
//!
//! A codec converts one whole pack between its data form (what the consumer
//! application loads) and its source form (one file per record). The sync
//! engine in `pack-core` only talks to the [`PackCodec`] trait; the
//! [`JsonLinesCodec`] here is the built-in implementation.

pub mod codec;
pub mod document_type;
pub mod error;
pub mod jsonl;
mod record;

pub use codec::{CodecOptions, PackCodec};
pub use document_type::DocumentType;
pub use error::{Error, Result};
pub use jsonl::JsonLinesCodec;
