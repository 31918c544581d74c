// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

use rusqlite::{Connection, params};
use tumblr_archive_core::{PostId, PostType, TextPost};

use super::VariantMapper;
use crate::batch::query_in;
use crate::error::{DbContext, Result};

pub(crate) struct TextMapper;

impl VariantMapper for TextMapper {
    const POST_TYPE: PostType = PostType::Text;
    const TABLE: &'static str = "textPosts";
    type Content = TextPost;

    fn insert(conn: &Connection, id: PostId, content: &TextPost) -> Result<()> {
        conn.prepare_cached("INSERT INTO textPosts (id, title, body) VALUES (?1, ?2, ?3)")
            .db_context(|| format!("Failed to prepare insert of text post {id}"))?
            .execute(params![id.get(), content.title, content.body])
            .db_context(|| format!("Failed to insert text post {id}"))?;
        Ok(())
    }

    fn load(conn: &Connection, ids: &[i64]) -> Result<Vec<(PostId, TextPost)>> {
        let posts = query_in(
            conn,
            "SELECT id, title, body FROM textPosts WHERE id IN ({in})",
            ids,
            |row| {
                Ok((
                    PostId::new(row.get(0)?),
                    TextPost {
                        title: row.get(1)?,
                        body: row.get(2)?,
                    },
                ))
            },
        )
        .db_context(|| format!("Failed to load {} text posts", ids.len()))?;
        Ok(posts)
    }
}
