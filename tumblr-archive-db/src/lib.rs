// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! SQLite persistence for archived Tumblr posts.
//!
//! Posts are stored in a normalized schema: a common `posts` table, one table
//! per post type, ordered association tables for nested collections and a
//! shared tag dictionary.
//!
//! # Key Features
//!
//! - Replace-on-put semantics inside a single write transaction
//! - Batched reads and writes with chunked `IN` queries
//! - Tag dictionary shared across posts, tag order preserved per post
//! - In-memory database for testing
//!
//! # Example
//!
//! ```ignore
//! use tumblr_archive_db::{OpenMode, PostDb};
//!
//! let mut db = PostDb::open("posts.sqlite", OpenMode::Create)?;
//! db.put(&post)?;
//! if let Some(post) = db.get(post.id)? {
//!     println!("{} tags", post.tags.len());
//! }
//! ```

mod batch;
mod builder;
mod config;
mod connection;
mod error;
mod query;
mod schema;
mod tags;
mod transaction;
mod variant;
mod write;

pub use config::DbConfig;
pub use connection::{OpenMode, PostDb};
pub use error::{Error, Result};
pub use schema::SCHEMA_VERSION;
