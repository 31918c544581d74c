// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Photo posts: a scalar row plus two levels of ordered collections
//! (photos of a post, sizes of a photo). Photo and size rows get new
//! surrogate ids every time a post is written.

use std::collections::HashMap;

use rusqlite::{Connection, params};
use tumblr_archive_core::{Photo, PhotoPost, PhotoSize, PostId, PostType};

use super::{OrderedChildren, VariantMapper, delete_rows};
use crate::batch::query_in;
use crate::error::{DbContext, Result};

const PHOTOS: OrderedChildren = OrderedChildren {
    link: "photoPostPhotos",
    owner: "postId",
    child: "photoId",
    position: "photoIndex",
    entity: "photos",
};

const PHOTO_SIZES: OrderedChildren = OrderedChildren {
    link: "photoPhotoSizes",
    owner: "photoId",
    child: "photoSizeId",
    position: "photoSizeIndex",
    entity: "photoSizes",
};

const PHOTO_POSTS_SQL: &str =
    "SELECT id, caption, width, height FROM photoPosts WHERE id IN ({in})";

const PHOTOS_SQL: &str = r#"
    SELECT photoPostPhotos.postId, photos.id, photos.caption
    FROM photoPostPhotos
    JOIN photos ON photoPostPhotos.photoId = photos.id
    WHERE photoPostPhotos.postId IN ({in})
    ORDER BY photoPostPhotos.postId, photoPostPhotos.photoIndex
"#;

const PHOTO_SIZES_SQL: &str = r#"
    SELECT photoPhotoSizes.photoId, photoSizes.width, photoSizes.height, photoSizes.url
    FROM photoPhotoSizes
    JOIN photoSizes ON photoPhotoSizes.photoSizeId = photoSizes.id
    WHERE photoPhotoSizes.photoId IN ({in})
    ORDER BY photoPhotoSizes.photoId, photoPhotoSizes.photoSizeIndex
"#;

pub(crate) struct PhotoMapper;

impl VariantMapper for PhotoMapper {
    const POST_TYPE: PostType = PostType::Photo;
    const TABLE: &'static str = "photoPosts";
    type Content = PhotoPost;

    fn insert(conn: &Connection, id: PostId, content: &PhotoPost) -> Result<()> {
        conn.prepare_cached(
            "INSERT INTO photoPosts (id, caption, width, height) VALUES (?1, ?2, ?3, ?4)",
        )
        .db_context(|| format!("Failed to prepare insert of photo post {id}"))?
        .execute(params![id.get(), content.caption, content.width, content.height])
        .db_context(|| format!("Failed to insert photo post {id}"))?;

        for (photo_index, photo) in content.photos.iter().enumerate() {
            conn.prepare_cached("INSERT INTO photos (caption) VALUES (?1)")
                .db_context(|| format!("Failed to prepare photo insert for post {id}"))?
                .execute(params![photo.caption])
                .db_context(|| format!("Failed to insert photo {photo_index} of post {id}"))?;
            let photo_id = conn.last_insert_rowid();
            PHOTOS.append(conn, id.get(), photo_id, photo_index)?;

            for (size_index, size) in photo.sizes.iter().enumerate() {
                conn.prepare_cached(
                    "INSERT INTO photoSizes (width, height, url) VALUES (?1, ?2, ?3)",
                )
                .db_context(|| format!("Failed to prepare photo size insert for post {id}"))?
                .execute(params![size.width, size.height, size.url])
                .db_context(|| format!("Failed to insert size of photo {photo_index} of post {id}"))?;
                let size_id = conn.last_insert_rowid();
                PHOTO_SIZES.append(conn, photo_id, size_id, size_index)?;
            }
        }
        Ok(())
    }

    fn load(conn: &Connection, ids: &[i64]) -> Result<Vec<(PostId, PhotoPost)>> {
        let mut posts = query_in(conn, PHOTO_POSTS_SQL, ids, |row| {
            Ok((
                PostId::new(row.get(0)?),
                PhotoPost {
                    caption: row.get(1)?,
                    width: row.get(2)?,
                    height: row.get(3)?,
                    photos: Vec::new(),
                },
            ))
        })
        .db_context(|| format!("Failed to load {} photo posts", ids.len()))?;

        let photos = query_in(conn, PHOTOS_SQL, ids, |row| {
            Ok((
                PostId::new(row.get(0)?),
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .db_context(|| format!("Failed to load photos of {} posts", ids.len()))?;

        let photo_ids: Vec<i64> = photos.iter().map(|(_, photo_id, _)| *photo_id).collect();
        let mut sizes_by_photo: HashMap<i64, Vec<PhotoSize>> = HashMap::new();
        let sizes = query_in(conn, PHOTO_SIZES_SQL, &photo_ids, |row| {
            Ok((
                row.get::<_, i64>(0)?,
                PhotoSize {
                    width: row.get(1)?,
                    height: row.get(2)?,
                    url: row.get(3)?,
                },
            ))
        })
        .db_context(|| format!("Failed to load sizes of {} photos", photo_ids.len()))?;
        for (photo_id, size) in sizes {
            sizes_by_photo.entry(photo_id).or_default().push(size);
        }

        let mut photos_by_post: HashMap<PostId, Vec<Photo>> = HashMap::new();
        for (post_id, photo_id, caption) in photos {
            photos_by_post.entry(post_id).or_default().push(Photo {
                caption,
                sizes: sizes_by_photo.remove(&photo_id).unwrap_or_default(),
            });
        }

        for (id, post) in posts.iter_mut() {
            post.photos = photos_by_post.remove(&*id).unwrap_or_default();
        }
        Ok(posts)
    }

    fn delete(conn: &Connection, ids: &[i64]) -> Result<usize> {
        let photo_ids: Vec<i64> = PHOTOS
            .child_ids(conn, ids)?
            .into_iter()
            .map(|(_, photo_id)| photo_id)
            .collect();
        PHOTO_SIZES.delete(conn, &photo_ids)?;
        PHOTOS.delete(conn, ids)?;
        delete_rows(conn, Self::TABLE, ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::PostDb;

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .unwrap()
    }

    fn base_row(conn: &Connection, id: i64) {
        conn.execute(
            "INSERT INTO posts (id, blogName, postUrl, postedTimestamp, retrievedTimestamp, postTypeId) \
             SELECT ?1, 'b', 'u', 0, 0, id FROM postTypes WHERE type = 'PHOTO'",
            params![id],
        )
        .unwrap();
    }

    fn photo_post(sizes_per_photo: &[usize]) -> PhotoPost {
        PhotoPost {
            caption: "holiday".into(),
            width: Some(500),
            height: None,
            photos: sizes_per_photo
                .iter()
                .enumerate()
                .map(|(p, &n)| Photo {
                    caption: format!("photo {p}"),
                    sizes: (0..n)
                        .map(|s| PhotoSize {
                            width: 1280 >> s,
                            height: 960 >> s,
                            url: format!("http://media.tumblr.com/{p}_{s}.jpg"),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_nested_rows_roundtrip_in_order() {
        let db = PostDb::open_memory().unwrap();
        let conn = db.connection();
        base_row(conn, 1);
        base_row(conn, 2);

        let first = photo_post(&[3, 1]);
        let second = photo_post(&[]);
        PhotoMapper::insert(conn, PostId::new(1), &first).unwrap();
        PhotoMapper::insert(conn, PostId::new(2), &second).unwrap();
        assert_eq!(count(conn, "photos"), 2);
        assert_eq!(count(conn, "photoSizes"), 4);

        let mut loaded = PhotoMapper::load(conn, &[1, 2, 3]).unwrap();
        loaded.sort_by_key(|(id, _)| *id);
        assert_eq!(
            loaded,
            vec![(PostId::new(1), first), (PostId::new(2), second)]
        );
    }

    #[test]
    fn test_delete_removes_nested_rows() {
        let db = PostDb::open_memory().unwrap();
        let conn = db.connection();
        base_row(conn, 1);
        base_row(conn, 2);
        PhotoMapper::insert(conn, PostId::new(1), &photo_post(&[2, 2])).unwrap();
        PhotoMapper::insert(conn, PostId::new(2), &photo_post(&[1])).unwrap();

        assert_eq!(PhotoMapper::delete(conn, &[1]).unwrap(), 1);
        for table in ["photoPosts", "photos", "photoPostPhotos"] {
            assert_eq!(count(conn, table), 1, "{table}");
        }
        assert_eq!(count(conn, "photoSizes"), 1);
        assert_eq!(count(conn, "photoPhotoSizes"), 1);
    }
}
