//! Cache module for storing dictionary API responses to disk
//!
//! Each successful upstream response body is stored verbatim in one file per
//! lookup key under a cache root. Entries never expire; they live until they
//! are removed from outside the program.

mod key;
mod store;

pub use key::LookupKey;
pub use store::CacheStore;
