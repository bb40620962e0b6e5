//! Diesel row models for users.

use crate::persistence::postgres::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Internal user identifier.
    pub id: i64,
    /// Login address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Optional avatar location.
    pub avatar_url: Option<String>,
    /// Administrator flag.
    pub is_admin: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// Login address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Optional avatar location.
    pub avatar_url: Option<String>,
    /// Administrator flag.
    pub is_admin: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
