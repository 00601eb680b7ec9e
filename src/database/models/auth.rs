use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::user::{Department, UserInfo, UserRole};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    /// Full name
    pub name: String,
    /// Email address, compared case-insensitively
    pub email: String,
    pub password: String,
    pub department: Department,
    pub birthday: Option<NaiveDate>,
    /// Requested role; `ADMIN` is granted only while seats remain
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// JWT authentication token
    pub token: String,
    pub user: UserInfo,
}
