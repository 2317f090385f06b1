use rusqlite::Connection;
use tracing::info;

use crate::DbError;

pub fn run(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        // Timestamps are RFC 3339 UTC text with millisecond precision so that
        // lexical order matches chronological order.
        conn.execute_batch(
            "
            CREATE TABLE categories (
                slug            TEXT PRIMARY KEY,
                description     TEXT NOT NULL
            ) STRICT;

            CREATE TABLE users (
                username        TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                avatar_url      TEXT NOT NULL
            ) STRICT;

            CREATE TABLE reviews (
                review_id       INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                designer        TEXT NOT NULL,
                owner           TEXT NOT NULL REFERENCES users(username),
                review_img_url  TEXT NOT NULL
                    DEFAULT 'https://images.pexels.com/photos/163064/play-stone-network-networked-interactive-163064.jpeg',
                review_body     TEXT NOT NULL,
                category        TEXT NOT NULL REFERENCES categories(slug),
                created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                votes           INTEGER NOT NULL DEFAULT 0
            ) STRICT;

            CREATE INDEX idx_reviews_category ON reviews(category);

            CREATE TABLE comments (
                comment_id      INTEGER PRIMARY KEY AUTOINCREMENT,
                body            TEXT NOT NULL,
                author          TEXT NOT NULL REFERENCES users(username),
                review_id       INTEGER NOT NULL REFERENCES reviews(review_id) ON DELETE CASCADE,
                votes           INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            ) STRICT;

            CREATE INDEX idx_comments_review ON comments(review_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
