//! Group (role) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::user::User;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

/// A group together with its members, for the admin group listing.
#[derive(Debug, Clone, Serialize)]
pub struct GroupWithMembers {
    pub group: Group,
    pub members: Vec<User>,
}
