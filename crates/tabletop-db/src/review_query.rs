//! Query builder for the review listing.
//!
//! Sort column and direction are parsed against fixed allow-lists and only
//! ever reach the SQL text as `&'static str` fragments. The category filter is
//! always a bound parameter.

use std::fmt;
use std::str::FromStr;

use crate::DbError;

pub const INVALID_SORT: &str = "Invalid sort query";
pub const INVALID_ORDER: &str = "Invalid order query";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    Owner,
    Title,
    Designer,
    ReviewImgUrl,
    ReviewBody,
    Category,
    #[default]
    CreatedAt,
    Votes,
}

impl SortColumn {
    pub const ALL: [SortColumn; 8] = [
        SortColumn::Owner,
        SortColumn::Title,
        SortColumn::Designer,
        SortColumn::ReviewImgUrl,
        SortColumn::ReviewBody,
        SortColumn::Category,
        SortColumn::CreatedAt,
        SortColumn::Votes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortColumn::Owner => "owner",
            SortColumn::Title => "title",
            SortColumn::Designer => "designer",
            SortColumn::ReviewImgUrl => "review_img_url",
            SortColumn::ReviewBody => "review_body",
            SortColumn::Category => "category",
            SortColumn::CreatedAt => "created_at",
            SortColumn::Votes => "votes",
        }
    }
}

impl FromStr for SortColumn {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .into_iter()
            .find(|col| col.as_str() == s)
            .ok_or_else(|| DbError::BadRequest(INVALID_SORT.to_string()))
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = DbError;

    /// Case-sensitive: only the lowercase forms are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(DbError::BadRequest(INVALID_ORDER.to_string())),
        }
    }
}

/// A validated review listing request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewQuery {
    pub sort_by: SortColumn,
    pub order: SortOrder,
    pub category: Option<String>,
}

impl ReviewQuery {
    /// Validates `sort_by` before `order`, so a request with both invalid
    /// reports the sort error.
    pub fn new(
        sort_by: Option<&str>,
        order: Option<&str>,
        category: Option<String>,
    ) -> Result<Self, DbError> {
        let sort_by = sort_by.map(str::parse::<SortColumn>).transpose()?.unwrap_or_default();
        let order = order.map(str::parse::<SortOrder>).transpose()?.unwrap_or_default();
        Ok(Self {
            sort_by,
            order,
            category,
        })
    }

    /// Builds the listing statement and its bound parameters.
    pub fn to_sql(&self) -> (String, Vec<String>) {
        let mut sql = String::from(
            "SELECT reviews.review_id, reviews.title, reviews.designer, reviews.owner,
                    reviews.review_img_url, reviews.review_body, reviews.category,
                    reviews.created_at, reviews.votes,
                    CAST(COUNT(comments.comment_id) AS INTEGER) AS comment_count
             FROM reviews
             LEFT JOIN comments ON reviews.review_id = comments.review_id",
        );
        let mut params = Vec::new();

        if let Some(category) = &self.category {
            params.push(category.clone());
            sql.push_str(&format!(" WHERE reviews.category = ?{}", params.len()));
        }

        sql.push_str(&format!(
            " GROUP BY reviews.review_id ORDER BY reviews.{} {}, reviews.review_id ASC",
            self.sort_by,
            self.order.as_sql()
        ));

        (sql, params)
    }
}
