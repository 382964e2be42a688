use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::models::{MarketplaceSort, ProjectCategory, SubmissionStatus, TaskStatus, UserRole};
use crate::views::{BuyerTab, RoleFilter, StatusFilter};

/// Roles a new account may pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SignupRole {
    Buyer,
    Solver,
}

impl From<SignupRole> for UserRole {
    fn from(role: SignupRole) -> Self {
        match role {
            SignupRole::Buyer => UserRole::Buyer,
            SignupRole::Solver => UserRole::ProblemSolver,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Decision {
    Accept,
    Reject,
}

impl From<Decision> for SubmissionStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Accept => SubmissionStatus::Accepted,
            Decision::Reject => SubmissionStatus::Rejected,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// List users, optionally filtered
    Users {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        role: RoleFilter,
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    /// User totals by role and status
    Stats,
    /// Show one user
    User { user_id: i64 },
    /// Change a user's role
    SetRole { user_id: i64, role: UserRole },
    Activate { user_id: i64 },
    Deactivate { user_id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum BuyerCommand {
    /// Own projects grouped into Open / In Progress / Completed
    Dashboard {
        #[arg(long, default_value = "open")]
        tab: BuyerTab,
    },
    /// Post a new project
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        budget: String,
        #[arg(long, default_value = "other")]
        category: ProjectCategory,
    },
    /// Manage screen: applications, submissions and payment requests
    Show { project_id: i64 },
    Update {
        project_id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        budget: Option<String>,
        #[arg(long)]
        category: Option<ProjectCategory>,
    },
    Delete { project_id: i64 },
    /// Assign a solver directly
    Assign { project_id: i64, solver_id: i64 },
    ApprovePayment { payment_id: i64 },
    RejectPayment {
        payment_id: i64,
        #[arg(long, default_value = "")]
        reason: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum SolverCommand {
    /// Assigned projects and application stats
    Dashboard,
    /// Open projects available to request
    Browse {
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
    /// Ask to work on an open project
    Request { project_id: i64 },
    /// Assigned project with its tasks and sprints
    Project { project_id: i64 },
    Tasks,
    CreateTask {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,
    },
    UpdateTask {
        task_id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long, value_enum)]
        status: Option<TaskStatusArg>,
    },
    /// Upload a ZIP archive for a task
    Submit { task_id: i64, file: PathBuf },
    /// Ask the buyer to release payment
    RequestCompletion { project_id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaskStatusArg {
    Created,
    InProgress,
}

impl From<TaskStatusArg> for TaskStatus {
    fn from(status: TaskStatusArg) -> Self {
        match status {
            TaskStatusArg::Created => TaskStatus::Created,
            TaskStatusArg::InProgress => TaskStatus::InProgress,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum MarketCommand {
    Browse {
        #[arg(long)]
        category: Option<ProjectCategory>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "created_at")]
        sort: MarketplaceSort,
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    Show { project_id: i64 },
    Categories,
    Apply { project_id: i64 },
    MyApplications,
    /// Applications received for a project (buyer)
    Applications { project_id: i64 },
    Accept { application_id: i64 },
    Reject { application_id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum SubmissionsCommand {
    List { project_id: i64 },
    Show { submission_id: i64 },
    Review {
        submission_id: i64,
        #[arg(value_enum)]
        decision: Decision,
        /// Required when rejecting
        #[arg(long)]
        reason: Option<String>,
    },
    Download {
        submission_id: i64,
        /// Directory to write the archive into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum PaymentsCommand {
    /// Payment history with earning totals
    List,
    Stats,
    /// Payments requested on one project
    Project { project_id: i64 },
    Payout {
        payment_id: i64,
        #[arg(long)]
        stripe_account: String,
    },
}
