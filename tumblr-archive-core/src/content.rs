// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Variant-specific post fields.
//!
//! Every ordered collection here (photos, sizes, dialogue, players) keeps the
//! order in which Tumblr reported it; equality is order-sensitive.

use serde::{Deserialize, Serialize};

/// A regular text post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextPost {
    pub title: String,
    pub body: String,
}

/// An answered ask.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnswerPost {
    /// Display name of the blog that asked
    pub asking_name: String,
    /// URL of the blog that asked
    pub asking_url: String,
    pub question: String,
    pub answer: String,
}

/// A photo or photoset post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoPost {
    pub caption: String,
    /// Width in pixels of the photoset layout, when Tumblr reports one
    pub width: Option<u32>,
    /// Height in pixels of the photoset layout, when Tumblr reports one
    pub height: Option<u32>,
    pub photos: Vec<Photo>,
}

/// One photo of a photo post, available in several sizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Photo {
    pub caption: String,
    pub sizes: Vec<PhotoSize>,
}

/// One rendition of a [`Photo`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoSize {
    pub width: u32,
    pub height: u32,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioPost {
    pub caption: String,
    /// HTML embed code of the player
    pub player: String,
    pub plays: u64,
    pub album_art: String,
    pub artist: String,
    pub album: String,
    pub track_name: String,
    pub track_number: u32,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatPost {
    pub title: String,
    pub body: String,
    pub dialogue: Vec<DialogueLine>,
}

/// One line of a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogueLine {
    pub name: String,
    pub label: String,
    pub phrase: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkPost {
    pub title: String,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuotePost {
    pub text: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoPost {
    pub caption: String,
    pub players: Vec<VideoPlayer>,
}

/// An embeddable player for a [`VideoPost`] at a given width.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoPlayer {
    pub width: u32,
    pub embed_code: String,
}
