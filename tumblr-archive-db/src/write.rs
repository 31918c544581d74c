// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Write operations for the post database.
//!
//! A put never updates rows in place: every row of the post is deleted and
//! written again, so nested rows get fresh surrogate ids on each put.

use std::collections::BTreeMap;

use rusqlite::{Connection, params};
use tracing::debug;
use tumblr_archive_core::{Post, PostContent, PostId};

use crate::batch::execute_in;
use crate::connection::PostDb;
use crate::error::{DbContext, Error, Result};
use crate::query::distinct;
use crate::tags;
use crate::variant::{self, AnswerMapper, PhotoMapper, TextMapper, VariantMapper, unimplemented};

const POST_INSERT_SQL: &str = r#"
    INSERT INTO posts (id, blogName, postUrl, postedTimestamp, retrievedTimestamp, postTypeId)
    SELECT ?1, ?2, ?3, ?4, ?5, id FROM postTypes WHERE type = ?6
"#;

const POSTS_DELETE_SQL: &str = "DELETE FROM posts WHERE id IN ({in})";

impl PostDb {
    /// Store a post, replacing any post with the same id.
    pub fn put(&mut self, post: &Post) -> Result<()> {
        self.put_many(std::slice::from_ref(post))
    }

    /// Store several posts in one transaction.
    ///
    /// Either all posts are replaced or, on failure, none is touched. When an
    /// id occurs more than once, the last occurrence wins.
    pub fn put_many(&mut self, posts: &[Post]) -> Result<()> {
        if posts.is_empty() {
            return Ok(());
        }
        self.write_transaction("put", |tx| store_posts(tx, posts))
    }

    /// Remove a post from every table it could appear in.
    ///
    /// Returns whether the post existed. Deleting an absent post is not an
    /// error.
    pub fn delete(&mut self, id: PostId) -> Result<bool> {
        Ok(self.delete_many(&[id])? > 0)
    }

    /// Remove several posts in one transaction. Returns how many existed.
    pub fn delete_many(&mut self, ids: &[PostId]) -> Result<usize> {
        let ids = distinct(ids);
        if ids.is_empty() {
            return Ok(0);
        }
        self.write_transaction("delete", |tx| delete_posts(tx, &ids))
    }
}

fn store_posts(conn: &Connection, posts: &[Post]) -> Result<()> {
    let latest: BTreeMap<PostId, &Post> = posts.iter().map(|post| (post.id, post)).collect();

    let mut text = Vec::new();
    let mut answer = Vec::new();
    let mut photo = Vec::new();
    for post in latest.values() {
        match &post.content {
            PostContent::Text(content) => text.push((post.id, content)),
            PostContent::Answer(content) => answer.push((post.id, content)),
            PostContent::Photo(content) => photo.push((post.id, content)),
            PostContent::Audio(_)
            | PostContent::Chat(_)
            | PostContent::Link(_)
            | PostContent::Quote(_)
            | PostContent::Video(_) => return Err(unimplemented(post.post_type(), post.id)),
        }
    }

    let ids: Vec<i64> = latest.keys().map(PostId::get).collect();
    let replaced = delete_posts(conn, &ids)?;

    let mut insert = conn
        .prepare_cached(POST_INSERT_SQL)
        .db_context(|| format!("Failed to prepare insert of {} posts", latest.len()))?;
    for post in latest.values() {
        let inserted = insert
            .execute(params![
                post.id.get(),
                post.blog_name,
                post.post_url,
                post.posted_at.as_millis(),
                post.retrieved_at.as_millis(),
                post.post_type().as_str(),
            ])
            .db_context(|| format!("Failed to insert post {}", post.id))?;
        if inserted != 1 {
            return Err(Error::UnknownPostType {
                id: post.id,
                type_name: post.post_type().to_string(),
            });
        }
    }

    insert_variant::<TextMapper>(conn, &text)?;
    insert_variant::<AnswerMapper>(conn, &answer)?;
    insert_variant::<PhotoMapper>(conn, &photo)?;

    let tagged: Vec<(PostId, &[String])> = latest
        .values()
        .map(|post| (post.id, post.tags.as_slice()))
        .collect();
    tags::write_associations(conn, &tagged)?;

    debug!(posts = latest.len(), replaced, "stored posts");
    Ok(())
}

fn insert_variant<M: VariantMapper>(conn: &Connection, posts: &[(PostId, &M::Content)]) -> Result<()> {
    for (id, content) in posts {
        M::insert(conn, *id, content)?;
    }
    Ok(())
}

/// Delete variant rows, tag associations and base rows, in that order.
/// Returns the number of base rows removed.
fn delete_posts(conn: &Connection, ids: &[i64]) -> Result<usize> {
    variant::delete_all(conn, ids)?;
    tags::delete_associations(conn, ids)?;
    let removed = execute_in(conn, POSTS_DELETE_SQL, ids)
        .db_context(|| format!("Failed to delete {} posts", ids.len()))?;
    debug!(requested = ids.len(), removed, "deleted posts");
    Ok(removed)
}
