use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AppConfig;

pub const TITLE_MAX_LEN: usize = 200;

/// Row as stored: `image` holds the relative path under the media root,
/// e.g. `photos/<uuid>_<name>.jpg`.
#[derive(Serialize, sqlx::FromRow)]
pub struct Photo {
    pub id: i32,
    pub title: String,
    pub image: String,
    pub uploaded_at: DateTime<Utc>,
}

/// API representation; `image` is rewritten to an absolute URL.
#[derive(Serialize)]
pub struct PhotoResponse {
    pub id: i32,
    pub title: String,
    pub image: String,
    pub uploaded_at: DateTime<Utc>,
}

impl Photo {
    pub fn into_response(self, config: &AppConfig) -> PhotoResponse {
        PhotoResponse {
            id: self.id,
            title: self.title,
            image: config.media_url(&self.image),
            uploaded_at: self.uploaded_at,
        }
    }
}

/// Name the file is stored under. A fresh UUID prefix keeps uploads from
/// colliding; the sanitized original name keeps the extension and stays
/// readable.
pub fn stored_filename(original: &str) -> String {
    let sanitized = sanitize_filename::sanitize(original);
    if sanitized.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("{}_{}", Uuid::new_v4(), sanitized)
    }
}

pub async fn insert_photo(
    pool: &PgPool,
    title: &str,
    relative_path: &str,
) -> sqlx::Result<Photo> {
    sqlx::query_as::<_, Photo>(
        "INSERT INTO photos (title, image, uploaded_at)
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(title)
    .bind(relative_path)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn all_photos(pool: &PgPool) -> sqlx::Result<Vec<Photo>> {
    sqlx::query_as::<_, Photo>(
        "SELECT id, title, image, uploaded_at FROM photos ORDER BY uploaded_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn photo_by_id(pool: &PgPool, id: i32) -> sqlx::Result<Option<Photo>> {
    sqlx::query_as::<_, Photo>(
        "SELECT id, title, image, uploaded_at FROM photos WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
