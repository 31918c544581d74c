// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Database schema definitions for the post archive.
//!
//! Every variant table shares the post id as its primary key. Ordered
//! collections are normalised into an entity table with a surrogate id and an
//! association table that carries the position.

/// Base, type and tag tables.
pub const SCHEMA_SQL: &str = r#"
create table if not exists postTypes (
    id   integer primary key autoincrement not null,
    type text unique not null
);

create table if not exists posts (
    id                 integer primary key not null,
    blogName           text not null,
    postUrl            text not null,
    postedTimestamp    integer not null,
    retrievedTimestamp integer not null,
    postTypeId         integer not null references postTypes(id)
);

create index if not exists postsPostTypeIdIndex on posts(postTypeId);

create table if not exists tags (
    id  integer primary key autoincrement not null,
    tag text unique not null
);

create table if not exists postTags (
    postId   integer not null references posts(id),
    tagId    integer not null references tags(id),
    tagIndex integer not null,
    primary key (postId, tagId)
);

create index if not exists postTagsPostIdIndex on postTags(postId);
create index if not exists postTagsTagIdIndex on postTags(tagId);
"#;

/// One table per post variant, plus the tables of their nested collections.
pub const VARIANT_SCHEMA_SQL: &str = r#"
create table if not exists textPosts (
    id    integer primary key not null references posts(id),
    title text not null,
    body  text not null
);

create table if not exists answerPosts (
    id         integer primary key not null references posts(id),
    askingName text not null,
    askingUrl  text not null,
    question   text not null,
    answer     text not null
);

create table if not exists photoPosts (
    id      integer primary key not null references posts(id),
    caption text not null,
    width   integer,
    height  integer
);

create table if not exists photos (
    id      integer primary key autoincrement not null,
    caption text not null
);

create table if not exists photoSizes (
    id     integer primary key autoincrement not null,
    width  integer not null,
    height integer not null,
    url    text not null
);

create table if not exists photoPostPhotos (
    postId     integer not null references photoPosts(id),
    photoId    integer not null references photos(id),
    photoIndex integer not null,
    primary key (postId, photoId)
);

create index if not exists photoPostPhotosPostIdIndex on photoPostPhotos(postId);
create index if not exists photoPostPhotosPhotoIdIndex on photoPostPhotos(photoId);

create table if not exists photoPhotoSizes (
    photoId        integer not null references photos(id),
    photoSizeId    integer not null references photoSizes(id),
    photoSizeIndex integer not null,
    primary key (photoId, photoSizeId)
);

create index if not exists photoPhotoSizesPhotoIdIndex on photoPhotoSizes(photoId);
create index if not exists photoPhotoSizesPhotoSizeIdIndex on photoPhotoSizes(photoSizeId);

create table if not exists audioPosts (
    id          integer primary key not null references posts(id),
    caption     text not null,
    player      text not null,
    plays       integer not null,
    albumArt    text not null,
    artist      text not null,
    album       text not null,
    trackName   text not null,
    trackNumber integer not null,
    year        integer not null
);

create table if not exists chatPosts (
    id    integer primary key not null references posts(id),
    title text not null,
    body  text not null
);

create table if not exists dialogue (
    id     integer primary key autoincrement not null,
    name   text not null,
    label  text not null,
    phrase text not null
);

create table if not exists chatPostDialogue (
    postId        integer not null references chatPosts(id),
    dialogueId    integer not null references dialogue(id),
    dialogueIndex integer not null,
    primary key (postId, dialogueId)
);

create index if not exists chatPostDialoguePostIdIndex on chatPostDialogue(postId);
create index if not exists chatPostDialogueDialogueIdIndex on chatPostDialogue(dialogueId);

create table if not exists linkPosts (
    id          integer primary key not null references posts(id),
    title       text not null,
    url         text not null,
    description text not null
);

create table if not exists quotePosts (
    id     integer primary key not null references posts(id),
    text   text not null,
    source text not null
);

create table if not exists videoPosts (
    id      integer primary key not null references posts(id),
    caption text not null
);

create table if not exists players (
    id        integer primary key autoincrement not null,
    width     integer not null,
    embedCode text not null
);

create table if not exists videoPostPlayers (
    postId      integer not null references videoPosts(id),
    playerId    integer not null references players(id),
    playerIndex integer not null,
    primary key (postId, playerId)
);

create index if not exists videoPostPlayersPostIdIndex on videoPostPlayers(postId);
create index if not exists videoPostPlayersPlayerIdIndex on videoPostPlayers(playerId);
"#;

/// Seeds one row per post type; existing rows are left alone.
pub const POST_TYPE_INSERT_SQL: &str = "INSERT OR IGNORE INTO postTypes (type) VALUES (?1)";

/// Schema version, stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i32 = 1;

/// Deletes of nested rows depend on foreign keys being enforced.
pub const FOREIGN_KEYS_SQL: &str = "PRAGMA foreign_keys = ON;";
