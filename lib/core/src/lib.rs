//! Core domain types and utilities for the sandpiper platform.
//!
//! This crate provides the foundational types, error handling, and shared
//! utilities used throughout the sandpiper social platform.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{CommentId, ParseIdError, PostId, UserId};
