use std::str::FromStr;

use serde::Serialize;

use crate::api::Page;
use crate::error::ClientResult;
use crate::models::{User, UserRole};
use crate::services::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Only(UserRole),
}

impl FromStr for RoleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            other => other.parse().map(Self::Only),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("Unknown status filter: {}", other)),
        }
    }
}

/// Search box plus role and status dropdowns of the user table
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive match on email or full name
    pub search: String,
    pub role: RoleFilter,
    pub status: StatusFilter,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        let needle = self.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || user.email.to_lowercase().contains(&needle)
            || user.full_name.to_lowercase().contains(&needle);

        let role_ok = match self.role {
            RoleFilter::All => true,
            RoleFilter::Only(role) => user.role == role,
        };

        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Active => user.is_active,
            StatusFilter::Inactive => !user.is_active,
        };

        search_ok && role_ok && status_ok
    }

    pub fn apply<'u>(&self, users: &'u [User]) -> Vec<&'u User> {
        users.iter().filter(|u| self.matches(u)).collect()
    }
}

/// User totals for the admin dashboard, computed from the user list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AdminStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub buyers: usize,
    pub solvers: usize,
    pub admins: usize,
}

impl AdminStats {
    pub fn from_users(users: &[User]) -> Self {
        let with_role = |role: UserRole| users.iter().filter(|u| u.role == role).count();
        let active = users.iter().filter(|u| u.is_active).count();

        Self {
            total: users.len(),
            active,
            inactive: users.len() - active,
            buyers: with_role(UserRole::Buyer),
            solvers: with_role(UserRole::ProblemSolver),
            admins: with_role(UserRole::Admin),
        }
    }
}

/// Admin dashboard: every user, the stats over them and the active filter
#[derive(Debug, Clone)]
pub struct AdminDashboard {
    pub users: Vec<User>,
    pub filter: UserFilter,
}

impl AdminDashboard {
    pub async fn load(client: &ApiClient, filter: UserFilter) -> ClientResult<Self> {
        let users = client.admin().list_users(Page::default()).await?;
        Ok(Self { users, filter })
    }

    pub fn stats(&self) -> AdminStats {
        AdminStats::from_users(&self.users)
    }

    pub fn visible_users(&self) -> Vec<&User> {
        self.filter.apply(&self.users)
    }
}
