use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use super::timestamp::naive_datetime;

/// Account role, fixed at registration and changed only by an admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Buyer,
    ProblemSolver,
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Buyer, UserRole::ProblemSolver, UserRole::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::ProblemSolver => "problem_solver",
            Self::Admin => "admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Buyer => "Buyer",
            Self::ProblemSolver => "Problem Solver",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Self::Buyer),
            "problem_solver" | "solver" => Ok(Self::ProblemSolver),
            "admin" => Ok(Self::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(with = "naive_datetime")]
    pub created_at: PrimitiveDateTime,
    #[serde(
        default,
        with = "naive_datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<PrimitiveDateTime>,
}

/// Registration form payload
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response of both login and register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user_id: i64,
    pub email: String,
    pub role: UserRole,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleUpdate {
    pub role: UserRole,
}

/// Plain `{"message": ...}` acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
