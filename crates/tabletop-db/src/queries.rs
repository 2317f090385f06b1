use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use tracing::debug;

use crate::models::{CategoryRow, CommentRow, ReviewRow, UserRow};
use crate::{Database, DbError, ReviewQuery};

const REVIEW_WITH_COUNT: &str =
    "SELECT reviews.review_id, reviews.title, reviews.designer, reviews.owner,
            reviews.review_img_url, reviews.review_body, reviews.category,
            reviews.created_at, reviews.votes,
            CAST(COUNT(comments.comment_id) AS INTEGER) AS comment_count
     FROM reviews
     LEFT JOIN comments ON reviews.review_id = comments.review_id
     WHERE reviews.review_id = ?1
     GROUP BY reviews.review_id";

impl Database {
    // -- Categories --

    pub fn list_categories(&self) -> Result<Vec<CategoryRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT slug, description FROM categories")?;
            let rows = stmt
                .query_map([], CategoryRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Users --

    pub fn list_users(&self) -> Result<Vec<UserRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT username, name, avatar_url FROM users")?;
            let rows = stmt
                .query_map([], UserRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Reviews --

    /// Lists reviews with their comment counts.
    ///
    /// A category filter naming a slug absent from `categories` is a
    /// not-found; an existing category with no reviews yields an empty list.
    pub fn list_reviews(&self, query: &ReviewQuery) -> Result<Vec<ReviewRow>, DbError> {
        self.with_conn(|conn| {
            if let Some(category) = &query.category {
                if !category_exists(conn, category)? {
                    return Err(DbError::category_not_found(category));
                }
            }

            let (sql, values) = query.to_sql();
            debug!(sort_by = %query.sort_by, order = query.order.as_sql(), "listing reviews");

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(values.iter()), |row| ReviewRow::from_row(row, true))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_review(&self, review_id: i64) -> Result<ReviewRow, DbError> {
        self.with_conn(|conn| {
            conn.query_row(REVIEW_WITH_COUNT, [review_id], |row| ReviewRow::from_row(row, true))
                .optional()?
                .ok_or_else(|| DbError::review_not_found(review_id))
        })
    }

    pub fn review_exists(&self, review_id: i64) -> Result<bool, DbError> {
        self.with_conn(|conn| {
            let found = conn
                .query_row(
                    "SELECT 1 FROM reviews WHERE review_id = ?1",
                    [review_id],
                    |_| Ok(()),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    /// Adds `inc_votes` to the stored count in one statement and returns the
    /// updated row (without a comment count).
    pub fn increment_review_votes(&self, review_id: i64, inc_votes: i64) -> Result<ReviewRow, DbError> {
        self.with_conn_mut(|conn| {
            conn.query_row(
                "UPDATE reviews SET votes = votes + ?2 WHERE review_id = ?1
                 RETURNING review_id, title, designer, owner, review_img_url,
                           review_body, category, created_at, votes",
                params![review_id, inc_votes],
                |row| ReviewRow::from_row(row, false),
            )
            .optional()?
            .ok_or_else(|| DbError::review_not_found(review_id))
        })
    }

    // -- Comments --

    pub fn list_comments_for_review(&self, review_id: i64) -> Result<Vec<CommentRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT comment_id, body, author, review_id, votes, created_at
                 FROM comments
                 WHERE review_id = ?1
                 ORDER BY created_at DESC, comment_id DESC",
            )?;
            let rows = stmt
                .query_map([review_id], CommentRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Inserts a comment. Missing fields are bound as NULL so the NOT NULL
    /// constraints reject them; an unknown author trips the foreign key.
    pub fn insert_comment(
        &self,
        review_id: i64,
        author: Option<&str>,
        body: Option<&str>,
    ) -> Result<CommentRow, DbError> {
        self.with_conn_mut(|conn| {
            let row = conn.query_row(
                "INSERT INTO comments (body, author, review_id) VALUES (?1, ?2, ?3)
                 RETURNING comment_id, body, author, review_id, votes, created_at",
                params![body, author, review_id],
                CommentRow::from_row,
            )?;
            Ok(row)
        })
    }

    /// Deletes a comment in a single statement, reporting not-found when no
    /// row was affected.
    pub fn delete_comment(&self, comment_id: i64) -> Result<(), DbError> {
        self.with_conn_mut(|conn| {
            let affected = conn.execute("DELETE FROM comments WHERE comment_id = ?1", [comment_id])?;
            if affected == 0 {
                return Err(DbError::comment_not_found(comment_id));
            }
            Ok(())
        })
    }
}

fn category_exists(conn: &Connection, slug: &str) -> Result<bool, DbError> {
    let found = conn
        .query_row("SELECT 1 FROM categories WHERE slug = ?1", [slug], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}
