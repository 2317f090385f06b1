//! Loading of reference data (categories, users, reviews) and any
//! pre-existing comments into an empty or reused database.

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::Deserialize;
use tracing::info;

use crate::models::format_timestamp;
use crate::{Database, DbError};

#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    pub categories: Vec<SeedCategory>,
    pub users: Vec<SeedUser>,
    pub reviews: Vec<SeedReview>,
    #[serde(default)]
    pub comments: Vec<SeedComment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCategory {
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedReview {
    pub title: String,
    pub designer: String,
    pub owner: String,
    pub review_img_url: Option<String>,
    pub review_body: String,
    pub category: String,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub votes: i64,
}

/// Comments reference reviews by their position in `reviews`, starting at 1,
/// which is also the id the review receives.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedComment {
    pub body: String,
    pub author: String,
    pub review_id: i64,
    #[serde(default)]
    pub votes: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl SeedData {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

impl Database {
    /// Replaces every row in the four tables with `data`, in one transaction.
    /// Id sequences restart so reviews are numbered in insertion order.
    pub fn seed(&self, data: &SeedData) -> Result<(), DbError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute_batch(
                "DELETE FROM comments;
                 DELETE FROM reviews;
                 DELETE FROM users;
                 DELETE FROM categories;
                 DELETE FROM sqlite_sequence WHERE name IN ('comments', 'reviews');",
            )?;

            for c in &data.categories {
                tx.execute(
                    "INSERT INTO categories (slug, description) VALUES (?1, ?2)",
                    params![c.slug, c.description],
                )?;
            }

            for u in &data.users {
                tx.execute(
                    "INSERT INTO users (username, name, avatar_url) VALUES (?1, ?2, ?3)",
                    params![u.username, u.name, u.avatar_url],
                )?;
            }

            for r in &data.reviews {
                tx.execute(
                    "INSERT INTO reviews
                        (title, designer, owner, review_img_url, review_body, category, created_at, votes)
                     VALUES (?1, ?2, ?3,
                             COALESCE(?4, 'https://images.pexels.com/photos/163064/play-stone-network-networked-interactive-163064.jpeg'),
                             ?5, ?6,
                             COALESCE(?7, strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                             ?8)",
                    params![
                        r.title,
                        r.designer,
                        r.owner,
                        r.review_img_url,
                        r.review_body,
                        r.category,
                        r.created_at.as_ref().map(format_timestamp),
                        r.votes,
                    ],
                )?;
            }

            for c in &data.comments {
                tx.execute(
                    "INSERT INTO comments (body, author, review_id, votes, created_at)
                     VALUES (?1, ?2, ?3, ?4, COALESCE(?5, strftime('%Y-%m-%dT%H:%M:%fZ', 'now')))",
                    params![
                        c.body,
                        c.author,
                        c.review_id,
                        c.votes,
                        c.created_at.as_ref().map(format_timestamp),
                    ],
                )?;
            }

            tx.commit()?;

            info!(
                "Seeded {} categories, {} users, {} reviews, {} comments",
                data.categories.len(),
                data.users.len(),
                data.reviews.len(),
                data.comments.len()
            );
            Ok(())
        })
    }
}
