// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! `IN (...)` queries over variable-size sets.
//!
//! SQLite binds one placeholder per value and has no list parameter, so the
//! statement text is rebuilt for every batch width. Templates mark the spot
//! for the placeholder list with `{in}`.

use rusqlite::types::ToSql;
use rusqlite::{Connection, Row, params_from_iter};

/// Values bound per statement. SQLite builds before 3.32 reject more than 999
/// parameters; wider sets are split into chunks.
pub(crate) const MAX_IN_PARAMS: usize = 999;

const IN_MARKER: &str = "{in}";

/// Placeholder list for exactly `count` values: `?, ?, ?`.
///
/// # Panics
///
/// If `count` is zero. An empty `IN ()` is invalid SQL, so callers must skip
/// the query when their set is empty.
pub(crate) fn placeholders(count: usize) -> String {
    assert!(count > 0, "IN-set query needs at least one value");
    let mut sql = String::with_capacity(count * 3);
    sql.push('?');
    for _ in 1..count {
        sql.push_str(", ?");
    }
    sql
}

/// Substitute the placeholder list for `count` values into `template`.
pub(crate) fn in_query(template: &str, count: usize) -> String {
    debug_assert!(template.contains(IN_MARKER), "template lacks {IN_MARKER}");
    template.replacen(IN_MARKER, &placeholders(count), 1)
}

/// Execute `template` once per chunk of `values`. Returns the number of
/// changed rows. An empty `values` runs nothing.
pub(crate) fn execute_in<T: ToSql>(
    conn: &Connection,
    template: &str,
    values: &[T],
) -> rusqlite::Result<usize> {
    let mut changed = 0;
    for chunk in values.chunks(MAX_IN_PARAMS) {
        let mut stmt = conn.prepare(&in_query(template, chunk.len()))?;
        changed += stmt.execute(params_from_iter(chunk))?;
    }
    Ok(changed)
}

/// Run the `template` query once per chunk of `values`, mapping every row
/// with `f`. Rows come back chunk by chunk in the order each query yields
/// them.
pub(crate) fn query_in<T, R, F>(
    conn: &Connection,
    template: &str,
    values: &[T],
    mut f: F,
) -> rusqlite::Result<Vec<R>>
where
    T: ToSql,
    F: FnMut(&Row<'_>) -> rusqlite::Result<R>,
{
    let mut results = Vec::new();
    for chunk in values.chunks(MAX_IN_PARAMS) {
        let mut stmt = conn.prepare(&in_query(template, chunk.len()))?;
        let mut rows = stmt.query(params_from_iter(chunk))?;
        while let Some(row) = rows.next()? {
            results.push(f(row)?);
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1, "?")]
    #[case(2, "?, ?")]
    #[case(5, "?, ?, ?, ?, ?")]
    fn test_placeholders(#[case] count: usize, #[case] expected: &str) {
        assert_eq!(placeholders(count), expected);
    }

    #[test]
    #[should_panic(expected = "at least one value")]
    fn test_placeholders_rejects_empty_set() {
        placeholders(0);
    }

    #[test]
    fn test_in_query() {
        assert_eq!(
            in_query("DELETE FROM posts WHERE id IN ({in})", 3),
            "DELETE FROM posts WHERE id IN (?, ?, ?)"
        );
    }

    fn numbers(count: i64) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE numbers (n INTEGER PRIMARY KEY);")
            .unwrap();
        let mut stmt = conn.prepare("INSERT INTO numbers (n) VALUES (?1)").unwrap();
        for n in 0..count {
            stmt.execute([n]).unwrap();
        }
        drop(stmt);
        conn
    }

    #[rstest]
    #[case::single(1)]
    #[case::few(17)]
    #[case::exactly_one_chunk(MAX_IN_PARAMS)]
    #[case::several_chunks(2 * MAX_IN_PARAMS + 5)]
    fn test_query_in_spans_chunks(#[case] width: usize) {
        let conn = numbers(3000);
        let wanted: Vec<i64> = (0..width as i64).map(|n| n + 1).collect();

        let mut found = query_in(
            &conn,
            "SELECT n FROM numbers WHERE n IN ({in})",
            &wanted,
            |row| row.get::<_, i64>(0),
        )
        .unwrap();
        found.sort_unstable();
        assert_eq!(found, wanted);
    }

    #[test]
    fn test_execute_in_counts_across_chunks() {
        let conn = numbers(2500);
        let doomed: Vec<i64> = (0..2500).step_by(2).collect();
        let changed = execute_in(&conn, "DELETE FROM numbers WHERE n IN ({in})", &doomed).unwrap();
        assert_eq!(changed, 1250);

        let left: i64 = conn
            .query_row("SELECT COUNT(*) FROM numbers", [], |row| row.get(0))
            .unwrap();
        assert_eq!(left, 1250);
    }

    #[test]
    fn test_empty_set_runs_nothing() {
        let conn = numbers(3);
        let none: [i64; 0] = [];
        assert_eq!(
            execute_in(&conn, "DELETE FROM numbers WHERE n IN ({in})", &none).unwrap(),
            0
        );
        let rows = query_in(&conn, "SELECT n FROM numbers WHERE n IN ({in})", &none, |row| {
            row.get::<_, i64>(0)
        })
        .unwrap();
        assert!(rows.is_empty());
    }
}
