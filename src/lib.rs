//! webdict library
//!
//! A dictionary web front-end: looks words up against a remote API, keeps
//! successful responses in a flat-file cache, and renders them as HTML.

pub mod assets;
pub mod cache;
pub mod cli;
pub mod data;
pub mod limiter;
pub mod lookup;
pub mod render;
pub mod server;
