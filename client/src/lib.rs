//! # client
//!
//! Client core for the Bible and testimony search surfaces.
//!
//! This crate holds everything a front end needs besides rendering: the chat
//! session store shared by both surfaces, the HTTP client for the search
//! service, the search-term assembly pipeline used by testimony search, and
//! the sequencing/debounce helpers that keep stale responses out of state.

pub mod config;
pub mod net;
pub mod state;
pub mod util;
