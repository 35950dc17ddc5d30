mod client;

pub use client::{FetchClient, WIKIPEDIA_LOGO};
