//! Skylog Core
//!
//! Core types and abstractions for the Skylog pipeline tracking client.
//!
//! This crate contains:
//! - Domain types: API key, pipeline status and records
//! - DTOs: Wire representations for the pipelines resource
//! - Helpers: last-run humanization and DAG snapshots
//!
//! Nothing in here performs I/O; HTTP and configuration live in `skylog-client`.

pub mod dag;
pub mod domain;
pub mod dto;
pub mod humanize;
