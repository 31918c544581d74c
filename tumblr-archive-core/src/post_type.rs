// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// The kind of a post.
///
/// The canonical names are the upper-case strings Tumblr's API uses after
/// normalisation; they are also what the store writes into its type table.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Display)]
pub enum PostType {
    #[display("ANSWER")]
    Answer,
    #[display("AUDIO")]
    Audio,
    #[display("CHAT")]
    Chat,
    #[display("LINK")]
    Link,
    #[display("PHOTO")]
    Photo,
    #[display("QUOTE")]
    Quote,
    #[display("TEXT")]
    Text,
    #[display("VIDEO")]
    Video,
}

impl PostType {
    /// Every post type, in declaration order.
    pub const ALL: [PostType; 8] = [
        PostType::Answer,
        PostType::Audio,
        PostType::Chat,
        PostType::Link,
        PostType::Photo,
        PostType::Quote,
        PostType::Text,
        PostType::Video,
    ];

    /// Canonical upper-case name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PostType::Answer => "ANSWER",
            PostType::Audio => "AUDIO",
            PostType::Chat => "CHAT",
            PostType::Link => "LINK",
            PostType::Photo => "PHOTO",
            PostType::Quote => "QUOTE",
            PostType::Text => "TEXT",
            PostType::Video => "VIDEO",
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
#[error("unknown post type '{0}'")]
pub struct UnknownPostType(pub String);

impl FromStr for PostType {
    type Err = UnknownPostType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPostType(s.to_owned()))
    }
}

impl Serialize for PostType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PostType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("ANSWER", Ok(PostType::Answer))]
    #[case("text", Ok(PostType::Text))]
    #[case("Photo", Ok(PostType::Photo))]
    #[case("gif", Err(UnknownPostType("gif".into())))]
    #[case("", Err(UnknownPostType(String::new())))]
    fn parse(#[case] input: &str, #[case] expected: Result<PostType, UnknownPostType>) {
        assert_eq!(input.parse::<PostType>(), expected);
    }

    #[test]
    fn display_matches_canonical_name() {
        for post_type in PostType::ALL {
            assert_eq!(post_type.to_string(), post_type.as_str());
            assert_eq!(post_type.as_str().parse::<PostType>(), Ok(post_type));
        }
    }

    #[test]
    fn serde_uses_canonical_name() {
        let json = serde_json::to_string(&PostType::Quote).unwrap();
        assert_eq!(json, "\"QUOTE\"");
        let back: PostType = serde_json::from_str("\"video\"").unwrap();
        assert_eq!(back, PostType::Video);
        assert!(serde_json::from_str::<PostType>("\"reblog\"").is_err());
    }
}
