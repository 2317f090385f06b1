//! Database row types. These map directly to SQLite rows and are converted
//! into the `tabletop-types` wire models at the edge of this crate.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use tabletop_types::models::{Category, Comment, Review, User};
use tracing::warn;

#[derive(Debug)]
pub struct CategoryRow {
    pub slug: String,
    pub description: String,
}

#[derive(Debug)]
pub struct UserRow {
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}

#[derive(Debug)]
pub struct ReviewRow {
    pub review_id: i64,
    pub title: String,
    pub designer: String,
    pub owner: String,
    pub review_img_url: String,
    pub review_body: String,
    pub category: String,
    pub created_at: String,
    pub votes: i64,
    pub comment_count: Option<i64>,
}

#[derive(Debug)]
pub struct CommentRow {
    pub comment_id: i64,
    pub body: String,
    pub author: String,
    pub review_id: i64,
    pub votes: i64,
    pub created_at: String,
}

impl CategoryRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            slug: row.get(0)?,
            description: row.get(1)?,
        })
    }
}

impl UserRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            username: row.get(0)?,
            name: row.get(1)?,
            avatar_url: row.get(2)?,
        })
    }
}

impl ReviewRow {
    /// Column order: review_id, title, designer, owner, review_img_url,
    /// review_body, category, created_at, votes, then comment_count when
    /// `with_count` is set.
    pub(crate) fn from_row(row: &Row<'_>, with_count: bool) -> rusqlite::Result<Self> {
        Ok(Self {
            review_id: row.get(0)?,
            title: row.get(1)?,
            designer: row.get(2)?,
            owner: row.get(3)?,
            review_img_url: row.get(4)?,
            review_body: row.get(5)?,
            category: row.get(6)?,
            created_at: row.get(7)?,
            votes: row.get(8)?,
            comment_count: if with_count { Some(row.get(9)?) } else { None },
        })
    }
}

impl CommentRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            comment_id: row.get(0)?,
            body: row.get(1)?,
            author: row.get(2)?,
            review_id: row.get(3)?,
            votes: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            slug: row.slug,
            description: row.description,
        }
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            username: row.username,
            name: row.name,
            avatar_url: row.avatar_url,
        }
    }
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        let created_at = parse_timestamp(&row.created_at, "review", row.review_id);
        Review {
            review_id: row.review_id,
            title: row.title,
            designer: row.designer,
            owner: row.owner,
            review_img_url: row.review_img_url,
            review_body: row.review_body,
            category: row.category,
            created_at,
            votes: row.votes,
            comment_count: row.comment_count,
        }
    }
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        let created_at = parse_timestamp(&row.created_at, "comment", row.comment_id);
        Comment {
            comment_id: row.comment_id,
            body: row.body,
            author: row.author,
            review_id: row.review_id,
            votes: row.votes,
            created_at,
        }
    }
}

/// Storage format for timestamps: RFC 3339, UTC, millisecond precision.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str, kind: &str, id: i64) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Rows written outside the API may use SQLite's datetime('now') format.
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on {} {}: {}", raw, kind, id, e);
            DateTime::default()
        })
}
