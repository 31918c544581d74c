// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Read operations for the post database.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rusqlite::{Connection, params};
use tracing::debug;
use tumblr_archive_core::{Post, PostId, PostType};

use crate::batch::query_in;
use crate::builder::{BaseRow, POSTS_SQL, PostBuilder};
use crate::connection::PostDb;
use crate::error::{DbContext, Result};
use crate::tags;
use crate::variant::{AnswerMapper, PhotoMapper, TextMapper, VariantMapper, unimplemented};

impl PostDb {
    /// Look up a post by id.
    ///
    /// Returns `None` if the post is not in the database.
    pub fn get(&mut self, id: PostId) -> Result<Option<Post>> {
        let mut posts = self.read_transaction("get", |tx| load_posts(tx, &[id.get()]))?;
        Ok(posts.remove(&id))
    }

    /// Look up several posts in one transaction.
    ///
    /// Ids that are not in the database are missing from the result.
    pub fn get_many(&mut self, ids: &[PostId]) -> Result<BTreeMap<PostId, Post>> {
        let ids = distinct(ids);
        self.read_transaction("get_many", |tx| load_posts(tx, &ids))
    }

    /// Check if a post is stored.
    pub fn contains(&self, id: PostId) -> Result<bool> {
        let exists = self
            .conn
            .prepare_cached("SELECT 1 FROM posts WHERE id = ?1 LIMIT 1")
            .and_then(|mut stmt| stmt.exists(params![id.get()]))
            .db_context(|| format!("Failed to look up post {id}"))?;
        Ok(exists)
    }

    /// Count the number of stored posts.
    pub fn count_posts(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Count the entries of the tag dictionary, referenced or not.
    pub fn count_tags(&self) -> Result<u64> {
        tags::count(&self.conn)
    }
}

/// Sorted, deduplicated raw ids.
pub(crate) fn distinct(ids: &[PostId]) -> Vec<i64> {
    ids.iter()
        .map(PostId::get)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Read the base rows, then tags, then variant data, and assemble posts.
fn load_posts(conn: &Connection, ids: &[i64]) -> Result<BTreeMap<PostId, Post>> {
    if ids.is_empty() {
        return Ok(BTreeMap::new());
    }

    let rows = query_in(conn, POSTS_SQL, ids, BaseRow::from_row)
        .db_context(|| format!("Failed to load {} posts", ids.len()))?;

    let mut builders: HashMap<PostId, PostBuilder> = HashMap::with_capacity(rows.len());
    let mut text_ids = Vec::new();
    let mut answer_ids = Vec::new();
    let mut photo_ids = Vec::new();

    for row in rows {
        let builder = PostBuilder::from_base(row)?;
        match builder.post_type {
            PostType::Text => text_ids.push(builder.id.get()),
            PostType::Answer => answer_ids.push(builder.id.get()),
            PostType::Photo => photo_ids.push(builder.id.get()),
            post_type @ (PostType::Audio
            | PostType::Chat
            | PostType::Link
            | PostType::Quote
            | PostType::Video) => return Err(unimplemented(post_type, builder.id)),
        }
        builders.insert(builder.id, builder);
    }

    let found: Vec<i64> = builders.keys().map(PostId::get).collect();
    for (id, post_tags) in tags::lookup(conn, &found)? {
        if let Some(builder) = builders.get_mut(&id) {
            builder.tags = post_tags;
        }
    }

    attach::<TextMapper>(conn, &mut builders, &text_ids)?;
    attach::<AnswerMapper>(conn, &mut builders, &answer_ids)?;
    attach::<PhotoMapper>(conn, &mut builders, &photo_ids)?;

    debug!(requested = ids.len(), found = builders.len(), "loaded posts");
    builders
        .into_values()
        .map(|builder| Ok((builder.id, builder.build()?)))
        .collect()
}

fn attach<M: VariantMapper>(
    conn: &Connection,
    builders: &mut HashMap<PostId, PostBuilder>,
    ids: &[i64],
) -> Result<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let loaded = M::load(conn, ids)?;
    debug!(post_type = %M::POST_TYPE, rows = loaded.len(), "loaded variant data");
    for (id, content) in loaded {
        if let Some(builder) = builders.get_mut(&id) {
            builder.content = Some(content.into());
        }
    }
    Ok(())
}
