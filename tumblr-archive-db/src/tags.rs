// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Tag dictionary and ordered post/tag associations.
//!
//! Each distinct tag string is stored once in `tags`. A post's tags live in
//! `postTags` with their position, so the order given by the author survives
//! the round trip. Dictionary rows are never removed.

use std::collections::{BTreeSet, HashMap};

use rusqlite::{Connection, params};
use tumblr_archive_core::PostId;

use crate::batch::{execute_in, query_in};
use crate::error::{DbContext, Error, Result};

const TAG_IDS_BY_NAME_SQL: &str = "SELECT id, tag FROM tags WHERE tag IN ({in})";

const TAG_INSERT_SQL: &str = "INSERT INTO tags (tag) VALUES (?1)";

const POST_TAG_INSERT_SQL: &str =
    "INSERT INTO postTags (postId, tagId, tagIndex) VALUES (?1, ?2, ?3)";

const POST_TAGS_SQL: &str = r#"
    SELECT postTags.postId, tags.tag
    FROM postTags
    JOIN tags ON postTags.tagId = tags.id
    WHERE postTags.postId IN ({in})
    ORDER BY postTags.postId, postTags.tagIndex
"#;

const POST_TAGS_DELETE_SQL: &str = "DELETE FROM postTags WHERE postId IN ({in})";

/// Map every name to its dictionary id, creating the missing entries.
pub(crate) fn resolve(conn: &Connection, names: &BTreeSet<&str>) -> Result<HashMap<String, i64>> {
    if names.is_empty() {
        return Ok(HashMap::new());
    }

    let names: Vec<&str> = names.iter().copied().collect();
    let mut ids: HashMap<String, i64> = query_in(conn, TAG_IDS_BY_NAME_SQL, &names, |row| {
        Ok((row.get::<_, String>(1)?, row.get::<_, i64>(0)?))
    })
    .db_context(|| format!("Failed to look up {} tags", names.len()))?
    .into_iter()
    .collect();

    let mut insert = conn
        .prepare_cached(TAG_INSERT_SQL)
        .db_context(|| "Failed to prepare tag insert".to_string())?;
    for name in names {
        if ids.contains_key(name) {
            continue;
        }
        insert
            .execute(params![name])
            .db_context(|| format!("Failed to create tag '{name}'"))?;
        ids.insert(name.to_owned(), conn.last_insert_rowid());
    }

    Ok(ids)
}

/// Tags of each post, in stored order. Posts without tags get an empty list.
pub(crate) fn lookup(conn: &Connection, ids: &[i64]) -> Result<HashMap<PostId, Vec<String>>> {
    let mut tags: HashMap<PostId, Vec<String>> = ids
        .iter()
        .map(|&id| (PostId::new(id), Vec::new()))
        .collect();

    let rows = query_in(conn, POST_TAGS_SQL, ids, |row| {
        Ok((PostId::new(row.get(0)?), row.get::<_, String>(1)?))
    })
    .db_context(|| format!("Failed to load tags for {} posts", ids.len()))?;

    for (id, tag) in rows {
        tags.entry(id).or_default().push(tag);
    }
    Ok(tags)
}

/// Write the tag associations of every post, keeping list order.
///
/// All distinct names across the batch are resolved in one pass first.
pub(crate) fn write_associations(conn: &Connection, posts: &[(PostId, &[String])]) -> Result<()> {
    let mut names = BTreeSet::new();
    for (id, tags) in posts {
        let mut seen = BTreeSet::new();
        for tag in tags.iter() {
            if !seen.insert(tag.as_str()) {
                return Err(Error::DuplicateTag {
                    id: *id,
                    tag: tag.clone(),
                });
            }
            names.insert(tag.as_str());
        }
    }

    let tag_ids = resolve(conn, &names)?;

    let mut insert = conn
        .prepare_cached(POST_TAG_INSERT_SQL)
        .db_context(|| format!("Failed to prepare tag associations of {} posts", posts.len()))?;
    for (id, tags) in posts {
        for (index, tag) in tags.iter().enumerate() {
            let tag_id = tag_ids[tag.as_str()];
            insert
                .execute(params![id.get(), tag_id, index as i64])
                .db_context(|| format!("Failed to tag post {id} with '{tag}'"))?;
        }
    }
    Ok(())
}

/// Remove the tag associations of the given posts. Dictionary rows stay.
pub(crate) fn delete_associations(conn: &Connection, ids: &[i64]) -> Result<usize> {
    let removed = execute_in(conn, POST_TAGS_DELETE_SQL, ids)
        .db_context(|| format!("Failed to delete tags of {} posts", ids.len()))?;
    Ok(removed)
}

/// Number of entries in the tag dictionary.
pub(crate) fn count(conn: &Connection) -> Result<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM tags", [], |row| row.get(0))
        .db_context(|| "Failed to count tags".to_string())?;
    Ok(count as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::PostDb;

    fn tag_id(conn: &Connection, name: &str) -> Option<i64> {
        conn.query_row("SELECT id FROM tags WHERE tag = ?1", params![name], |row| {
            row.get(0)
        })
        .ok()
    }

    #[test]
    fn test_resolve_creates_missing_and_reuses_existing() {
        let db = PostDb::open_memory().unwrap();
        let conn = db.connection();

        let first = resolve(conn, &BTreeSet::from(["tag1", "tag2"])).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(count(conn).unwrap(), 2);

        let second = resolve(conn, &BTreeSet::from(["tag2", "tag3"])).unwrap();
        assert_eq!(second["tag2"], first["tag2"]);
        assert_eq!(Some(second["tag3"]), tag_id(conn, "tag3"));
        assert_eq!(count(conn).unwrap(), 3);
    }

    #[test]
    fn test_resolve_empty_set_is_noop() {
        let db = PostDb::open_memory().unwrap();
        assert!(resolve(db.connection(), &BTreeSet::new()).unwrap().is_empty());
        assert_eq!(count(db.connection()).unwrap(), 0);
    }

    #[test]
    fn test_duplicate_tag_in_one_post() {
        let db = PostDb::open_memory().unwrap();
        let tags = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        let err = write_associations(db.connection(), &[(PostId::new(9), tags.as_slice())]).unwrap_err();
        assert!(matches!(err, Error::DuplicateTag { id, ref tag } if id.get() == 9 && tag == "a"));
        assert_eq!(count(db.connection()).unwrap(), 0);
    }
}
