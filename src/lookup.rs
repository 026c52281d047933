//! Lookup services that decide whether a word is a recognized vocabulary entry.
//!
//! The verifier talks to a [`LookupService`]; two backends are provided: the
//! remote word-book submission API and a local dictionary file.

pub mod dictionary;
pub mod service;
pub mod word_book;

pub use dictionary::DictionaryLookup;
pub use service::LookupService;
pub use word_book::WordBookLookup;
