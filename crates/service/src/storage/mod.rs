//! Storage abstractions for service layer
//!
//! File-backed stores that persist whole collections as JSON.

pub mod json_list_store;
