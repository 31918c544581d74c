// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Posts under construction while a batched read fills them in.

use rusqlite::Row;
use tumblr_archive_core::{Post, PostContent, PostId, PostType, Timestamp};

use crate::error::{Error, Result};

/// Columns: id, blogName, postUrl, postedTimestamp, retrievedTimestamp, type.
pub(crate) const POSTS_SQL: &str = r#"
    SELECT posts.id, posts.blogName, posts.postUrl,
           posts.postedTimestamp, posts.retrievedTimestamp, postTypes.type
    FROM posts
    JOIN postTypes ON posts.postTypeId = postTypes.id
    WHERE posts.id IN ({in})
"#;

/// A post whose base row has been read; tags and variant data follow in
/// later phases.
#[derive(Debug)]
pub(crate) struct PostBuilder {
    pub(crate) id: PostId,
    pub(crate) post_type: PostType,
    blog_name: String,
    post_url: String,
    posted_at: Timestamp,
    retrieved_at: Timestamp,
    pub(crate) tags: Vec<String>,
    pub(crate) content: Option<PostContent>,
}

/// Base row as read from [`POSTS_SQL`], before the type name is checked.
pub(crate) struct BaseRow {
    id: PostId,
    blog_name: String,
    post_url: String,
    posted_at: Timestamp,
    retrieved_at: Timestamp,
    type_name: String,
}

impl BaseRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: PostId::new(row.get(0)?),
            blog_name: row.get(1)?,
            post_url: row.get(2)?,
            posted_at: Timestamp::from_millis(row.get(3)?),
            retrieved_at: Timestamp::from_millis(row.get(4)?),
            type_name: row.get(5)?,
        })
    }
}

impl PostBuilder {
    pub(crate) fn from_base(row: BaseRow) -> Result<Self> {
        let post_type = row
            .type_name
            .parse::<PostType>()
            .map_err(|_| Error::UnknownPostType {
                id: row.id,
                type_name: row.type_name.clone(),
            })?;

        Ok(Self {
            id: row.id,
            post_type,
            blog_name: row.blog_name,
            post_url: row.post_url,
            posted_at: row.posted_at,
            retrieved_at: row.retrieved_at,
            tags: Vec::new(),
            content: None,
        })
    }

    /// Finish the post. Fails if no variant data was attached.
    pub(crate) fn build(self) -> Result<Post> {
        let content = self.content.ok_or(Error::MissingVariantRow {
            id: self.id,
            post_type: self.post_type,
        })?;

        Ok(Post {
            id: self.id,
            blog_name: self.blog_name,
            post_url: self.post_url,
            posted_at: self.posted_at,
            retrieved_at: self.retrieved_at,
            tags: self.tags,
            content,
        })
    }
}
