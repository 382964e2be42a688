use std::fmt;
use std::str::FromStr;

use time::OffsetDateTime;

use crate::models::UserRole;
use crate::session::Session;

/// Every screen of the application, addressed by the same paths as the web UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    /// `/auth/register?role=buyer|solver` preselects the role
    Register(Option<UserRole>),
    Marketplace,
    MarketplaceProject(i64),
    SolverProfile(i64),
    AdminDashboard,
    BuyerDashboard,
    NewProject,
    ManageProject(i64),
    SolverDashboard,
    SolverTasks,
    SolverProject(i64),
    SolverPayments,
}

/// Outcome of checking a route against the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Allow,
    Redirect(Route),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/auth/login".to_string(),
            Self::Register(None) => "/auth/register".to_string(),
            Self::Register(Some(UserRole::ProblemSolver)) => "/auth/register?role=solver".to_string(),
            Self::Register(Some(role)) => format!("/auth/register?role={}", role.as_str()),
            Self::Marketplace => "/marketplace".to_string(),
            Self::MarketplaceProject(id) => format!("/project/{}", id),
            Self::SolverProfile(id) => format!("/profile/solver/{}", id),
            Self::AdminDashboard => "/admin/dashboard".to_string(),
            Self::BuyerDashboard => "/buyer/dashboard".to_string(),
            Self::NewProject => "/buyer/projects/new".to_string(),
            Self::ManageProject(id) => format!("/buyer/projects/{}/manage", id),
            Self::SolverDashboard => "/solver/dashboard".to_string(),
            Self::SolverTasks => "/solver/tasks".to_string(),
            Self::SolverProject(id) => format!("/solver/project/{}", id),
            Self::SolverPayments => "/solver/payments".to_string(),
        }
    }

    /// Role a session must hold to open this route; `None` for public screens
    pub fn required_role(&self) -> Option<UserRole> {
        match self {
            Self::AdminDashboard => Some(UserRole::Admin),
            Self::BuyerDashboard | Self::NewProject | Self::ManageProject(_) => {
                Some(UserRole::Buyer)
            }
            Self::SolverDashboard
            | Self::SolverTasks
            | Self::SolverProject(_)
            | Self::SolverPayments => Some(UserRole::ProblemSolver),
            Self::Home
            | Self::Login
            | Self::Register(_)
            | Self::Marketplace
            | Self::MarketplaceProject(_)
            | Self::SolverProfile(_) => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, query) = match s.trim().split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (s.trim(), None),
        };
        let segments: Vec<&str> = path.split('/').filter(|seg| !seg.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Self::Home,
            ["auth", "login"] => Self::Login,
            ["auth", "register"] => Self::Register(query.and_then(register_role)),
            ["marketplace"] => Self::Marketplace,
            ["project", id] => Self::MarketplaceProject(parse_id(id)?),
            ["profile", "solver", id] => Self::SolverProfile(parse_id(id)?),
            ["admin", "dashboard"] => Self::AdminDashboard,
            ["buyer", "dashboard"] => Self::BuyerDashboard,
            ["buyer", "projects", "new"] => Self::NewProject,
            ["buyer", "projects", id, "manage"] => Self::ManageProject(parse_id(id)?),
            ["solver", "dashboard"] => Self::SolverDashboard,
            ["solver", "tasks"] => Self::SolverTasks,
            ["solver", "project", id] => Self::SolverProject(parse_id(id)?),
            ["solver", "payments"] => Self::SolverPayments,
            _ => return Err(format!("Unknown route: {}", s)),
        };
        Ok(route)
    }
}

fn parse_id(raw: &str) -> Result<i64, String> {
    raw.parse().map_err(|_| format!("Invalid id in route: {}", raw))
}

fn register_role(query: &str) -> Option<UserRole> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "role")
        .and_then(|(_, value)| value.parse().ok())
}

/// Landing screen for each role after login
pub fn dashboard_for(role: UserRole) -> Route {
    match role {
        UserRole::Admin => Route::AdminDashboard,
        UserRole::Buyer => Route::BuyerDashboard,
        UserRole::ProblemSolver => Route::SolverDashboard,
    }
}

/// Decide whether `route` may be shown for `session` at `now`.
///
/// A session with an expired token counts as signed out. A signed-in user
/// opening another role's screen is sent to their own dashboard. The backend
/// still authorizes every call; this only picks the screen.
pub fn guard(route: &Route, session: &Session, now: OffsetDateTime) -> Guard {
    let Some(required) = route.required_role() else {
        return Guard::Allow;
    };

    if !session.is_authenticated(now) {
        return Guard::Redirect(Route::Login);
    }

    match session.role() {
        Some(role) if role == required => Guard::Allow,
        Some(role) => Guard::Redirect(dashboard_for(role)),
        None => Guard::Redirect(Route::Login),
    }
}
