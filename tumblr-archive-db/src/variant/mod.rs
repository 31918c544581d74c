// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Per-variant table mappings.
//!
//! Each supported post type has a [`VariantMapper`] that writes its fields to
//! the variant table (keyed by post id) and reads them back for a batch of
//! ids. Base fields and tags are handled by the store itself.

mod answer;
mod photo;
mod text;
mod unsupported;

use rusqlite::Connection;
use tumblr_archive_core::{PostContent, PostId, PostType};

use crate::batch::{execute_in, query_in};
use crate::error::{DbContext, Result};

pub(crate) use answer::AnswerMapper;
pub(crate) use photo::PhotoMapper;
pub(crate) use text::TextMapper;
pub(crate) use unsupported::unimplemented;

pub(crate) trait VariantMapper {
    const POST_TYPE: PostType;

    /// Table holding one row per post of this type.
    const TABLE: &'static str;

    type Content: Into<PostContent>;

    /// Insert the variant row (and any nested rows) for one post.
    fn insert(conn: &Connection, id: PostId, content: &Self::Content) -> Result<()>;

    /// Read the variant data of every id that has a row. Ids without a row
    /// are absent from the result.
    fn load(conn: &Connection, ids: &[i64]) -> Result<Vec<(PostId, Self::Content)>>;

    /// Remove the variant rows of the given ids, if any.
    fn delete(conn: &Connection, ids: &[i64]) -> Result<usize> {
        delete_rows(conn, Self::TABLE, ids)
    }
}

/// Remove the given posts from every variant table, whatever their type.
pub(crate) fn delete_all(conn: &Connection, ids: &[i64]) -> Result<usize> {
    let mut removed = 0;
    removed += TextMapper::delete(conn, ids)?;
    removed += AnswerMapper::delete(conn, ids)?;
    removed += PhotoMapper::delete(conn, ids)?;
    removed += unsupported::delete(conn, ids)?;
    Ok(removed)
}

pub(crate) fn delete_rows(conn: &Connection, table: &str, ids: &[i64]) -> Result<usize> {
    let removed = execute_in(conn, &format!("DELETE FROM {table} WHERE id IN ({{in}})"), ids)
        .db_context(|| format!("Failed to delete from {table}"))?;
    Ok(removed)
}

/// An ordered one-to-many collection: entity rows in `entity`, linked to
/// their owner through `link(owner, child, position)`.
pub(crate) struct OrderedChildren {
    pub(crate) link: &'static str,
    pub(crate) owner: &'static str,
    pub(crate) child: &'static str,
    pub(crate) position: &'static str,
    pub(crate) entity: &'static str,
}

impl OrderedChildren {
    /// Record `child` at `position` in the collection of `owner`.
    pub(crate) fn append(
        &self,
        conn: &Connection,
        owner: i64,
        child: i64,
        position: usize,
    ) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} ({}, {}, {}) VALUES (?1, ?2, ?3)",
            self.link, self.owner, self.child, self.position
        );
        conn.prepare_cached(&sql)
            .db_context(|| format!("Failed to prepare {} link", self.entity))?
            .execute(rusqlite::params![owner, child, position as i64])
            .db_context(|| format!("Failed to link {} {child} to {owner}", self.entity))?;
        Ok(())
    }

    /// Child ids of the given owners, ordered by owner then position.
    pub(crate) fn child_ids(&self, conn: &Connection, owners: &[i64]) -> Result<Vec<(i64, i64)>> {
        let sql = format!(
            "SELECT {owner}, {child} FROM {link} WHERE {owner} IN ({{in}}) ORDER BY {owner}, {position}",
            owner = self.owner,
            child = self.child,
            link = self.link,
            position = self.position,
        );
        let ids = query_in(conn, &sql, owners, |row| Ok((row.get(0)?, row.get(1)?)))
            .db_context(|| format!("Failed to list {} rows", self.entity))?;
        Ok(ids)
    }

    /// Delete the link rows of the given owners and the entities they point
    /// to. Returns the ids of the deleted entities.
    pub(crate) fn delete(&self, conn: &Connection, owners: &[i64]) -> Result<Vec<i64>> {
        let children: Vec<i64> = self
            .child_ids(conn, owners)?
            .into_iter()
            .map(|(_, child)| child)
            .collect();

        let sql = format!("DELETE FROM {} WHERE {} IN ({{in}})", self.link, self.owner);
        execute_in(conn, &sql, owners)
            .db_context(|| format!("Failed to unlink {} rows", self.entity))?;

        let sql = format!("DELETE FROM {} WHERE id IN ({{in}})", self.entity);
        execute_in(conn, &sql, &children)
            .db_context(|| format!("Failed to delete {} rows", self.entity))?;

        Ok(children)
    }
}
