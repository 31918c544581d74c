// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

use rusqlite::{Connection, params};
use tumblr_archive_core::{AnswerPost, PostId, PostType};

use super::VariantMapper;
use crate::batch::query_in;
use crate::error::{DbContext, Result};

const ANSWER_POST_INSERT_SQL: &str = r#"
    INSERT INTO answerPosts (id, askingName, askingUrl, question, answer)
    VALUES (?1, ?2, ?3, ?4, ?5)
"#;

const ANSWER_POSTS_SQL: &str = r#"
    SELECT id, askingName, askingUrl, question, answer
    FROM answerPosts
    WHERE id IN ({in})
"#;

pub(crate) struct AnswerMapper;

impl VariantMapper for AnswerMapper {
    const POST_TYPE: PostType = PostType::Answer;
    const TABLE: &'static str = "answerPosts";
    type Content = AnswerPost;

    fn insert(conn: &Connection, id: PostId, content: &AnswerPost) -> Result<()> {
        conn.prepare_cached(ANSWER_POST_INSERT_SQL)
            .db_context(|| format!("Failed to prepare insert of answer post {id}"))?
            .execute(params![
                id.get(),
                content.asking_name,
                content.asking_url,
                content.question,
                content.answer,
            ])
            .db_context(|| format!("Failed to insert answer post {id}"))?;
        Ok(())
    }

    fn load(conn: &Connection, ids: &[i64]) -> Result<Vec<(PostId, AnswerPost)>> {
        let posts = query_in(conn, ANSWER_POSTS_SQL, ids, |row| {
            Ok((
                PostId::new(row.get(0)?),
                AnswerPost {
                    asking_name: row.get(1)?,
                    asking_url: row.get(2)?,
                    question: row.get(3)?,
                    answer: row.get(4)?,
                },
            ))
        })
        .db_context(|| format!("Failed to load {} answer posts", ids.len()))?;
        Ok(posts)
    }
}
