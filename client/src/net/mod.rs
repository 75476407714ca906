//! Networking for the search service.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` wraps the three GET endpoints plus the health probe. Wire shapes
//! come from the shared `wire` crate.

pub mod api;
