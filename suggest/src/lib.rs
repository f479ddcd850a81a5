//! # suggest
//!
//! Autocomplete suggestions over a static word corpus.
//!
//! The corpus is tokenized on whitespace and lowercased, every word is
//! inserted into a [`suggest_tree::AvlTree`], and prefix queries are then
//! answered from that tree by the CLI or the HTTP endpoint.
//!
//! ## Architecture
//!
//! 1. **Build phase**: [`corpus::load`] yields the words, which are inserted
//!    one at a time in corpus order.
//! 2. **Read phase**: the finished tree is shared behind an `Arc` and queried
//!    concurrently without locking. A reload builds a brand new tree and
//!    swaps it in; the published tree is never mutated.
//!
//! ## Example
//!
//! ```rust
//! use suggest::Suggester;
//!
//! let suggester = Suggester::from_words(suggest::corpus::tokenize("Casa casamento carro"));
//! let mut words = suggester.suggest("cas");
//! words.sort();
//! assert_eq!(words, ["casa", "casamento"]);
//!
//! // Prefixes are not lowercased.
//! assert!(suggester.suggest("Cas").is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod corpus;
pub mod error;
pub mod http;
pub mod service;

pub use error::{Result, SuggestError};
pub use service::Suggester;

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;

/// Corpus location used when none is configured.
pub const DEFAULT_CORPUS_PATH: &str = "assets/br-utf8.txt";

/// Listen address used when none is configured.
pub const DEFAULT_LISTEN: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080));

/// Runtime configuration shared by the CLI and the HTTP server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Text file the dictionary is built from
    pub corpus_path: PathBuf,
    /// Address the HTTP server binds to
    pub listen: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from(DEFAULT_CORPUS_PATH),
            listen: DEFAULT_LISTEN,
        }
    }
}
