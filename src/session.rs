use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::{AuthToken, Project, UserRole};
use crate::services::TokenService;

/// The signed-in user as known from the login response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub email: String,
    pub role: UserRole,
}

/// Last known project list, replaced by id from server responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectCache {
    projects: Vec<Project>,
    /// Set when a mutation succeeded but the follow-up reload did not
    #[serde(default)]
    stale: bool,
}

impl ProjectCache {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            stale: false,
        }
    }

    pub fn all(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, project_id: i64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Swap in a fresh server list; clears the stale flag
    pub fn replace_all(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        self.stale = false;
    }

    /// Replace the entry with the same id, or append it
    pub fn upsert(&mut self, project: Project) {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project,
            None => self.projects.push(project),
        }
    }

    pub fn remove(&mut self, project_id: i64) -> Option<Project> {
        let index = self.projects.iter().position(|p| p.id == project_id)?;
        Some(self.projects.remove(index))
    }

    pub fn clear(&mut self) {
        self.projects.clear();
        self.stale = false;
    }
}

/// Client session: who is signed in, their token and cached projects.
///
/// The view layer owns this value and is the only writer; it is persisted
/// through a [`crate::store::SessionStore`] after every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub projects: ProjectCache,
}

impl Session {
    /// Session created from a login or register response
    pub fn from_auth(auth: &AuthToken) -> Self {
        Self {
            token: Some(auth.access_token.clone()),
            user: Some(SessionUser {
                id: auth.user_id,
                email: auth.email.clone(),
                role: auth.role,
            }),
            projects: ProjectCache::default(),
        }
    }

    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Signed in with a token that has not passed its `exp`
    pub fn is_authenticated(&self, now: OffsetDateTime) -> bool {
        match (&self.token, &self.user) {
            (Some(token), Some(_)) => !TokenService::is_expired(token, now),
            _ => false,
        }
    }

    /// Drop token, user and cached projects
    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
        self.projects.clear();
    }
}
