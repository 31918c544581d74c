// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Post types whose tables exist but which cannot be stored yet.
//!
//! Their rows are still cleaned up on delete, so a database written by a
//! newer version does not leave orphans behind when posts are removed here.

use rusqlite::Connection;
use tumblr_archive_core::{PostId, PostType};

use super::{OrderedChildren, delete_rows};
use crate::error::{Error, Result};

const DIALOGUE: OrderedChildren = OrderedChildren {
    link: "chatPostDialogue",
    owner: "postId",
    child: "dialogueId",
    position: "dialogueIndex",
    entity: "dialogue",
};

const PLAYERS: OrderedChildren = OrderedChildren {
    link: "videoPostPlayers",
    owner: "postId",
    child: "playerId",
    position: "playerIndex",
    entity: "players",
};

pub(crate) fn unimplemented(post_type: PostType, id: PostId) -> Error {
    Error::Unimplemented { post_type, id }
}

pub(super) fn delete(conn: &Connection, ids: &[i64]) -> Result<usize> {
    DIALOGUE.delete(conn, ids)?;
    PLAYERS.delete(conn, ids)?;

    let mut removed = 0;
    for table in [
        "audioPosts",
        "chatPosts",
        "linkPosts",
        "quotePosts",
        "videoPosts",
    ] {
        removed += delete_rows(conn, table, ids)?;
    }
    Ok(removed)
}
