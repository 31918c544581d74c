// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Post model for the Tumblr archive.
//!
//! This crate provides the strongly-typed, immutable representation of posts
//! retrieved from Tumblr. It is intentionally IO-free: the fetch client builds
//! these values and `tumblr-archive-db` persists them.
//!
//! # Key Types
//!
//! - [`Post`] - fields common to every post plus its [`PostContent`]
//! - [`PostType`] - the closed set of post variants
//! - [`PostContent`] - one struct per variant (text, answer, photo, ...)
//! - [`Timestamp`] - millisecond-precision instants
//!
//! A post's type is derived from its content, so the discriminant can never
//! disagree with the variant-specific fields.

mod content;
mod post;
mod post_type;
mod timestamp;

pub use content::{
    AnswerPost, AudioPost, ChatPost, DialogueLine, LinkPost, Photo, PhotoPost, PhotoSize,
    QuotePost, TextPost, VideoPlayer, VideoPost,
};
pub use post::{Post, PostContent, PostId};
pub use post_type::{PostType, UnknownPostType};
pub use timestamp::Timestamp;
