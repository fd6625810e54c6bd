//! Testing infrastructure for vitrine integration tests.
//!
//! This crate provides utilities for writing presenter tests:
//! - `fixtures`: a small blog domain (posts, authors, comments) and a
//!   registry wired with presenters for it
//! - `assertions`: JSON shape checks for presented documents

pub mod assertions;
pub mod fixtures;

pub use fixtures::{Author, Comment, Post, blog_registry, sample_post};
