// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::content::{
    AnswerPost, AudioPost, ChatPost, LinkPost, PhotoPost, QuotePost, TextPost, VideoPost,
};
use crate::post_type::PostType;
use crate::timestamp::Timestamp;

/// Tumblr's identifier for a post. Stable across edits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PostId(i64);

impl PostId {
    pub const fn new(id: i64) -> Self {
        PostId(id)
    }

    pub const fn get(&self) -> i64 {
        self.0
    }
}

/// An archived post.
///
/// Equality is structural: two posts are equal when every common field and
/// every variant field, including tag order and nested collections, match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    /// Name of the blog the post was made on
    pub blog_name: String,
    /// Canonical URL of the post
    pub post_url: String,
    pub posted_at: Timestamp,
    /// When the archive fetched this version of the post
    pub retrieved_at: Timestamp,
    /// Tags in the order the author gave them
    pub tags: Vec<String>,
    pub content: PostContent,
}

impl Post {
    pub fn post_type(&self) -> PostType {
        self.content.post_type()
    }
}

/// Variant-specific part of a [`Post`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, From, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum PostContent {
    Answer(AnswerPost),
    Audio(AudioPost),
    Chat(ChatPost),
    Link(LinkPost),
    Photo(PhotoPost),
    Quote(QuotePost),
    Text(TextPost),
    Video(VideoPost),
}

impl PostContent {
    pub fn post_type(&self) -> PostType {
        match self {
            PostContent::Answer(_) => PostType::Answer,
            PostContent::Audio(_) => PostType::Audio,
            PostContent::Chat(_) => PostType::Chat,
            PostContent::Link(_) => PostType::Link,
            PostContent::Photo(_) => PostType::Photo,
            PostContent::Quote(_) => PostType::Quote,
            PostContent::Text(_) => PostType::Text,
            PostContent::Video(_) => PostType::Video,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::content::{Photo, PhotoSize};

    fn text_post(tags: &[&str]) -> Post {
        Post {
            id: PostId::new(513),
            blog_name: "foo.tumblr.com".into(),
            post_url: "http://foo.tumblr.com/posts/513/whee".into(),
            posted_at: Timestamp::from_millis(1_400_000_000_000),
            retrieved_at: Timestamp::from_millis(1_400_000_005_000),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            content: TextPost {
                title: "test post".into(),
                body: "hello world, this is a test post".into(),
            }
            .into(),
        }
    }

    #[rstest]
    #[case(PostContent::Text(TextPost { title: String::new(), body: String::new() }), PostType::Text)]
    #[case(PostContent::Quote(QuotePost { text: "q".into(), source: "s".into() }), PostType::Quote)]
    #[case(PostContent::Video(VideoPost { caption: "v".into(), players: vec![] }), PostType::Video)]
    fn test_post_type_follows_content(#[case] content: PostContent, #[case] expected: PostType) {
        assert_eq!(content.post_type(), expected);
    }

    #[test]
    fn test_tag_order_is_significant() {
        assert_eq!(text_post(&["a", "b"]), text_post(&["a", "b"]));
        assert_ne!(text_post(&["a", "b"]), text_post(&["b", "a"]));
    }

    #[test]
    fn test_nested_order_is_significant() {
        let size = |w: u32| PhotoSize {
            width: w,
            height: w,
            url: format!("http://media.tumblr.com/{w}.jpg"),
        };
        let photo = |sizes: Vec<PhotoSize>| PhotoPost {
            caption: "c".into(),
            width: None,
            height: None,
            photos: vec![Photo {
                caption: "p".into(),
                sizes,
            }],
        };
        assert_ne!(
            photo(vec![size(500), size(250)]),
            photo(vec![size(250), size(500)])
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let post = text_post(&["tag1", "tag2"]);
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["id"], 513);
        assert_eq!(json["content"]["type"], "TEXT");
        let back: Post = serde_json::from_value(json).unwrap();
        assert_eq!(back, post);
    }
}
