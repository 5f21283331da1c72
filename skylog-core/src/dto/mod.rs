//! Data Transfer Objects for the pipelines resource
//!
//! This module contains the request bodies sent to the tracking service and
//! the display-ready shapes built from its responses.

pub mod pipeline;
