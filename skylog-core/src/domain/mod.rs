//! Core domain types
//!
//! These types represent the entities the remote tracking service knows about
//! and the credential needed to talk to it. They are shared between the client
//! library (for requests) and the CLI (for display).

pub mod key;
pub mod pipeline;
