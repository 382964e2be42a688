use std::path::Path;

use anyhow::anyhow;
use serde::Serialize;
use serde_json::json;

use crate::actions::ActionOutcome;
use crate::api::Page;
use crate::cli::commands::{
    AdminCommand, BuyerCommand, MarketCommand, PaymentsCommand, SignupRole, SolverCommand,
    SubmissionsCommand,
};
use crate::cli::output::{table, Output};
use crate::error::ClientError;
use crate::models::timestamp::format_date;
use crate::models::{
    Application, MarketplaceProject, MarketplaceQuery, Payment, PayoutRequest, Project,
    Submission, Task, User,
};
use crate::routing::Route;
use crate::state::App;
use crate::views::admin::AdminDashboard;
use crate::views::buyer::projects_in_tab;
use crate::views::forms::{
    ProjectEditForm, ProjectForm, RegisterForm, RejectionReason, SubmissionReview,
    TaskEditForm, TaskForm,
};
use crate::views::payments::format_amount;
use crate::views::{
    AdminStats, BuyerTab, ManageProjectView, MarketplaceView, PaymentRequestSummary,
    SolverDashboard, SolverPaymentsView, SolverProjectView, SolverTasksView, TabCounts,
    UserFilter,
};

/// Turn a client error into the line shown to the user
fn fail(fallback: &'static str) -> impl FnOnce(ClientError) -> anyhow::Error {
    move |e| anyhow!(e.user_message(fallback))
}

/// Print a mutation result and whether the cached list was refreshed after it
fn report<T: Serialize>(out: Output, outcome: &ActionOutcome<T>, message: &str) -> anyhow::Result<()> {
    let stale = outcome.reload_error.as_ref().map(|e| e.to_string());
    let doc = json!({
        "message": message,
        "result": &outcome.value,
        "reconciled": outcome.reconciled(),
    });
    out.emit(&doc, |_| {
        let mut lines = vec![message.to_string()];
        if let Some(error) = &stale {
            lines.push(format!(
                "Warning: the project list could not be refreshed ({}); it may be out of date",
                error
            ));
        }
        lines
    })
}

// ============ Auth ============

pub(super) async fn login(
    app: &mut App,
    out: Output,
    email: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => out.prompt_secret("Password")?,
    };
    let route = app.login(email, &password).await.map_err(fail("Login failed"))?;

    out.emit(&json!({ "route": route.path(), "user": app.current_user() }), |_| {
        vec![format!("Logged in as {}", email.trim()), format!("Dashboard: {}", route)]
    })
}

pub(super) async fn register(
    app: &mut App,
    out: Output,
    email: String,
    full_name: String,
    password: Option<String>,
    password_confirm: Option<String>,
    role: SignupRole,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => out.prompt_secret("Password")?,
    };
    let password_confirm = match password_confirm {
        Some(p) => p,
        None => out.prompt_secret("Confirm password")?,
    };
    let form = RegisterForm {
        email,
        full_name,
        password,
        password_confirm,
        role: role.into(),
    };

    let route = app.register(&form).await.map_err(fail("Registration failed"))?;
    out.emit(&json!({ "route": route.path(), "user": app.current_user() }), |_| {
        vec![format!("Account created for {}", form.email.trim()), format!("Dashboard: {}", route)]
    })
}

pub(super) async fn logout(app: &mut App, out: Output) -> anyhow::Result<()> {
    app.logout().await.map_err(fail("Logout failed"))?;
    out.message("Logged out")
}

pub(super) fn whoami(app: &App, out: Output) -> anyhow::Result<()> {
    let user = app.current_user().ok_or_else(|| anyhow!("Not logged in"))?;
    out.emit(user, |u| {
        vec![
            format!("{} ({})", u.email, u.role.label()),
            format!("User id: {}", u.id),
            format!("Backend: {}", app.config().api_url),
        ]
    })
}

// ============ Screens by route ============

pub(super) async fn open(app: &mut App, out: Output, route: Route) -> anyhow::Result<()> {
    let target = app.navigate(route);
    if target != route {
        out.note(&format!("Redirected to {}", target))?;
    }

    match target {
        Route::Home => out.message("ProjectMarket: post projects, or find work as a problem solver"),
        Route::Login => out.message("Sign in with: pm login --email <email>"),
        Route::Register(role) => out.message(&format!(
            "Create an account with: pm register --email <email> --full-name <name> --role {}",
            match role {
                Some(crate::models::UserRole::ProblemSolver) => "solver",
                _ => "buyer",
            }
        )),
        Route::Marketplace => {
            market(app, out, MarketCommand::Browse {
                category: None,
                search: None,
                sort: Default::default(),
                skip: 0,
                limit: 20,
            })
            .await
        }
        Route::MarketplaceProject(project_id) => {
            market(app, out, MarketCommand::Show { project_id }).await
        }
        Route::SolverProfile(solver_id) => profile(app, out, solver_id).await,
        Route::AdminDashboard => {
            admin(app, out, AdminCommand::Users {
                search: String::new(),
                role: Default::default(),
                status: Default::default(),
            })
            .await
        }
        Route::BuyerDashboard => buyer(app, out, BuyerCommand::Dashboard { tab: BuyerTab::Open }).await,
        Route::NewProject => out.message(
            "Post a project with: pm buyer create --title <title> --description <text> --budget <amount> --category <category>",
        ),
        Route::ManageProject(project_id) => buyer(app, out, BuyerCommand::Show { project_id }).await,
        Route::SolverDashboard => solver(app, out, SolverCommand::Dashboard).await,
        Route::SolverTasks => solver(app, out, SolverCommand::Tasks).await,
        Route::SolverProject(project_id) => {
            solver(app, out, SolverCommand::Project { project_id }).await
        }
        Route::SolverPayments => payments(app, out, PaymentsCommand::List).await,
    }
}

// ============ Admin ============

fn user_rows(users: &[&User]) -> Vec<Vec<String>> {
    users
        .iter()
        .map(|u| {
            vec![
                u.id.to_string(),
                u.email.clone(),
                u.full_name.clone(),
                u.role.label().to_string(),
                if u.is_active { "active" } else { "inactive" }.to_string(),
                format_date(u.created_at.date()),
            ]
        })
        .collect()
}

fn stats_lines(stats: &AdminStats) -> Vec<String> {
    vec![
        format!(
            "Users: {} total, {} active, {} inactive",
            stats.total, stats.active, stats.inactive
        ),
        format!(
            "Buyers: {}  Problem solvers: {}  Admins: {}",
            stats.buyers, stats.solvers, stats.admins
        ),
    ]
}

pub(super) async fn admin(app: &mut App, out: Output, command: AdminCommand) -> anyhow::Result<()> {
    app.enter(Route::AdminDashboard).map_err(fail("Access denied"))?;

    match command {
        AdminCommand::Users {
            search,
            role,
            status,
        } => {
            let filter = UserFilter {
                search,
                role,
                status,
            };
            let result = AdminDashboard::load(app.client(), filter).await;
            let dashboard = app.check(result).await.map_err(fail("Failed to load admin data"))?;
            let visible = dashboard.visible_users();

            out.emit(&json!({ "stats": dashboard.stats(), "users": &visible }), |_| {
                let mut lines = stats_lines(&dashboard.stats());
                lines.push(String::new());
                if visible.is_empty() {
                    lines.push("No users found".to_string());
                } else {
                    lines.extend(table(
                        &["ID", "EMAIL", "NAME", "ROLE", "STATUS", "JOINED"],
                        user_rows(&visible),
                    ));
                }
                lines
            })
        }
        AdminCommand::Stats => {
            let result = app.client().admin().list_users(Page::default()).await;
            let users = app.check(result).await.map_err(fail("Failed to load admin data"))?;
            let stats = AdminStats::from_users(&users);
            out.emit(&stats, stats_lines)
        }
        AdminCommand::User { user_id } => {
            let result = app.client().admin().get_user(user_id).await;
            let user = app.check(result).await.map_err(fail("Failed to load user"))?;
            out.emit(&user, |u| table(&["ID", "EMAIL", "NAME", "ROLE", "STATUS", "JOINED"], user_rows(&[u])))
        }
        AdminCommand::SetRole { user_id, role } => {
            if !out.confirm(&format!("Change user {}'s role to {}?", user_id, role.label()))? {
                return out.message("Cancelled");
            }
            let result = app.client().admin().assign_role(user_id, role).await;
            let user = app.check(result).await.map_err(fail("Failed to update role"))?;
            out.emit(&user, |u| vec![format!("{} is now {}", u.email, u.role.label())])
        }
        AdminCommand::Activate { user_id } => {
            let result = app.client().admin().activate_user(user_id).await;
            let response = app.check(result).await.map_err(fail("Failed to activate user"))?;
            out.message(&response.message)
        }
        AdminCommand::Deactivate { user_id } => {
            if !out.confirm(&format!("Deactivate user {}?", user_id))? {
                return out.message("Cancelled");
            }
            let result = app.client().admin().deactivate_user(user_id).await;
            let response = app.check(result).await.map_err(fail("Failed to deactivate user"))?;
            out.message(&response.message)
        }
    }
}

// ============ Buyer ============

fn project_rows(projects: &[&Project]) -> Vec<Vec<String>> {
    projects
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.title.clone(),
                p.category.to_string(),
                format_amount(p.budget),
                p.status.to_string(),
                format_date(p.created_at.date()),
            ]
        })
        .collect()
}

const PROJECT_HEADERS: [&str; 6] = ["ID", "TITLE", "CATEGORY", "BUDGET", "STATUS", "CREATED"];

fn application_rows(applications: &[Application]) -> Vec<Vec<String>> {
    applications
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.solver_name
                    .clone()
                    .unwrap_or_else(|| format!("solver #{}", a.problem_solver_id)),
                a.status.as_str().to_string(),
                format_date(a.requested_at.date()),
            ]
        })
        .collect()
}

fn submission_rows(submissions: &[Submission]) -> Vec<Vec<String>> {
    submissions
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.task_id.to_string(),
                s.file_name.clone(),
                s.status.as_str().to_string(),
                s.rejection_reason.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

fn payment_rows(payments: &[Payment]) -> Vec<Vec<String>> {
    payments
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.project_id.to_string(),
                format_amount(p.amount),
                p.status.as_str().to_string(),
                p.description.clone().unwrap_or_default(),
                format_date(p.created_at.date()),
            ]
        })
        .collect()
}

const PAYMENT_HEADERS: [&str; 6] = ["ID", "PROJECT", "AMOUNT", "STATUS", "DESCRIPTION", "CREATED"];

fn manage_lines(view: &ManageProjectView) -> Vec<String> {
    let project = &view.project.project;
    let counts = view.tab_counts();
    let summary = PaymentRequestSummary::from_payments(&view.payment_requests);

    let mut lines = vec![
        format!("#{} {} [{}]", project.id, project.title, project.status),
        format!("Budget: {}  Category: {}", format_amount(project.budget), project.category),
        project.description.clone(),
        String::new(),
        format!("Applications ({})", counts.applications),
    ];
    lines.extend(table(&["ID", "SOLVER", "STATUS", "REQUESTED"], application_rows(&view.applications)));
    lines.push(String::new());
    lines.push(format!("Tasks & Submissions ({})", counts.submissions));
    lines.extend(table(&["ID", "TASK", "FILE", "STATUS", "REASON"], submission_rows(&view.submissions)));
    lines.push(String::new());
    lines.push(format!(
        "Payment Requests ({}), pending {} ({}), released {}",
        counts.payment_requests,
        summary.pending,
        format_amount(summary.pending_amount),
        format_amount(summary.released_amount)
    ));
    lines.extend(table(&PAYMENT_HEADERS, payment_rows(&view.payment_requests)));
    for error in &view.section_errors {
        lines.push(format!("Warning: {}", error));
    }
    lines
}

pub(super) async fn buyer(app: &mut App, out: Output, command: BuyerCommand) -> anyhow::Result<()> {
    match command {
        BuyerCommand::Dashboard { tab } => {
            app.enter(Route::BuyerDashboard).map_err(fail("Access denied"))?;
            let projects = app
                .reload_projects()
                .await
                .map_err(fail("Failed to load projects"))?
                .to_vec();
            let counts = TabCounts::from_projects(&projects);
            let shown = projects_in_tab(&projects, tab);

            out.emit(&json!({ "tab": tab, "counts": counts, "projects": &shown }), |_| {
                let mut lines = vec![BuyerTab::ALL
                    .iter()
                    .map(|t| {
                        let marker = if *t == tab { "*" } else { " " };
                        format!("{}{} ({})", marker, t.label(), counts.get(*t))
                    })
                    .collect::<Vec<_>>()
                    .join("   ")];
                lines.push(String::new());
                if shown.is_empty() {
                    lines.push("No projects in this tab".to_string());
                } else {
                    lines.extend(table(&PROJECT_HEADERS, project_rows(&shown)));
                }
                lines
            })
        }
        BuyerCommand::Create {
            title,
            description,
            budget,
            category,
        } => {
            app.enter(Route::NewProject).map_err(fail("Access denied"))?;
            let form = ProjectForm {
                title,
                description,
                budget,
                category,
            };
            let outcome = app.create_project(&form).await.map_err(fail("Failed to create project"))?;
            report(out, &outcome, &format!("Project created successfully! (#{})", outcome.value.id))
        }
        BuyerCommand::Show { project_id } => {
            app.enter(Route::ManageProject(project_id)).map_err(fail("Access denied"))?;
            let result = ManageProjectView::load(app.client(), project_id).await;
            let view = app
                .check(result)
                .await
                .map_err(fail("Project not found or you do not have access"))?;
            out.emit(&view, manage_lines)
        }
        BuyerCommand::Update {
            project_id,
            title,
            description,
            budget,
            category,
        } => {
            app.enter(Route::ManageProject(project_id)).map_err(fail("Access denied"))?;
            let form = ProjectEditForm {
                title,
                description,
                budget,
                category,
            };
            let outcome = app
                .update_project(project_id, &form)
                .await
                .map_err(fail("Failed to update project"))?;
            report(out, &outcome, "Project updated successfully!")
        }
        BuyerCommand::Delete { project_id } => {
            app.enter(Route::ManageProject(project_id)).map_err(fail("Access denied"))?;
            if !out.confirm("Are you sure you want to delete this project?")? {
                return out.message("Cancelled");
            }
            let outcome = app
                .delete_project(project_id)
                .await
                .map_err(fail("Failed to delete project"))?;
            report(out, &outcome, &outcome.value.message)
        }
        BuyerCommand::Assign {
            project_id,
            solver_id,
        } => {
            app.enter(Route::ManageProject(project_id)).map_err(fail("Access denied"))?;
            if !out.confirm(&format!("Assign solver {} to project {}?", solver_id, project_id))? {
                return out.message("Cancelled");
            }
            let outcome = app
                .assign_solver(project_id, solver_id)
                .await
                .map_err(fail("Failed to assign solver"))?;
            report(out, &outcome, "Solver assigned successfully!")
        }
        BuyerCommand::ApprovePayment { payment_id } => {
            app.enter(Route::BuyerDashboard).map_err(fail("Access denied"))?;
            if !out.confirm("Approve this payment and release the funds?")? {
                return out.message("Cancelled");
            }
            let outcome = app
                .approve_payment(payment_id)
                .await
                .map_err(fail("Failed to approve payment"))?;
            report(out, &outcome, "Payment approved and released successfully!")
        }
        BuyerCommand::RejectPayment { payment_id, reason } => {
            app.enter(Route::BuyerDashboard).map_err(fail("Access denied"))?;
            let reason = RejectionReason::new(&reason).map_err(fail("Please provide a rejection reason"))?;
            if !out.confirm("Reject this payment request?")? {
                return out.message("Cancelled");
            }
            let outcome = app
                .reject_payment(payment_id, reason)
                .await
                .map_err(fail("Failed to reject payment"))?;
            report(out, &outcome, "Payment request rejected")
        }
    }
}

// ============ Solver ============

fn task_rows(tasks: &[&Task], project_title: impl Fn(i64) -> String) -> Vec<Vec<String>> {
    tasks
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                project_title(t.project_id),
                t.title.clone(),
                t.status.as_str().to_string(),
                t.deadline.map(format_date).unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect()
}

const TASK_HEADERS: [&str; 5] = ["ID", "PROJECT", "TITLE", "STATUS", "DEADLINE"];

pub(super) async fn solver(app: &mut App, out: Output, command: SolverCommand) -> anyhow::Result<()> {
    match command {
        SolverCommand::Dashboard => {
            app.enter(Route::SolverDashboard).map_err(fail("Access denied"))?;
            let result = SolverDashboard::load(app.client()).await;
            let dashboard = app.check(result).await.map_err(fail("Failed to load dashboard"))?;
            let stats = dashboard.stats();

            out.emit(&json!({ "stats": stats, "dashboard": &dashboard }), |_| {
                let mut lines = vec![format!(
                    "Assigned projects: {}  Applications: {}  Accepted: {}  Pending: {}",
                    stats.assigned_projects, stats.applications, stats.accepted, stats.pending
                )];
                lines.push(String::new());
                lines.push(format!("My Projects ({})", dashboard.assigned.len()));
                let assigned: Vec<&Project> = dashboard.assigned.iter().collect();
                lines.extend(table(&PROJECT_HEADERS, project_rows(&assigned)));
                lines.push(String::new());
                lines.push(format!("Applications ({})", dashboard.applications.len()));
                lines.extend(table(
                    &["ID", "PROJECT", "STATUS", "REQUESTED"],
                    dashboard
                        .applications
                        .iter()
                        .map(|a| {
                            vec![
                                a.id.to_string(),
                                a.project_id.to_string(),
                                a.status.as_str().to_string(),
                                format_date(a.requested_at.date()),
                            ]
                        })
                        .collect(),
                ));
                lines
            })
        }
        SolverCommand::Browse { skip, limit } => {
            app.enter(Route::SolverDashboard).map_err(fail("Access denied"))?;
            let result = app.client().solver().browse_projects(skip, limit).await;
            let projects = app.check(result).await.map_err(fail("Failed to load projects"))?;
            out.emit(&projects, |ps| table(&PROJECT_HEADERS, project_rows(&ps.iter().collect::<Vec<_>>())))
        }
        SolverCommand::Request { project_id } => {
            app.enter(Route::SolverDashboard).map_err(fail("Access denied"))?;
            let result = app.client().solver().request_project(project_id).await;
            let response = app.check(result).await.map_err(fail("Failed to request project"))?;
            out.message(&response.message)
        }
        SolverCommand::Project { project_id } => {
            app.enter(Route::SolverProject(project_id)).map_err(fail("Access denied"))?;
            let result = SolverProjectView::load(app.client(), project_id).await;
            let view = app
                .check(result)
                .await
                .map_err(fail("Project not found or not assigned to you"))?;

            out.emit(&view, |v| {
                let project = &v.project.project;
                let mut lines = vec![
                    format!("#{} {} [{}]", project.id, project.title, project.status),
                    format!(
                        "Budget: {}  Buyer: {}",
                        format_amount(project.budget),
                        v.project.buyer_name.as_deref().unwrap_or("-")
                    ),
                    String::new(),
                    format!("Tasks ({})", v.tasks.len()),
                ];
                let tasks: Vec<&Task> = v.tasks.iter().collect();
                lines.extend(table(&TASK_HEADERS, task_rows(&tasks, |_| project.title.clone())));
                lines.push(String::new());
                lines.push(format!("Sprints ({})", v.sprints.len()));
                for sprint in &v.sprints {
                    lines.push(format!(
                        "  {} ({}/{} features done)",
                        sprint.title,
                        sprint.done_features(),
                        sprint.features.len()
                    ));
                }
                for error in &v.section_errors {
                    lines.push(format!("Warning: {}", error));
                }
                lines
            })
        }
        SolverCommand::Tasks => {
            app.enter(Route::SolverTasks).map_err(fail("Access denied"))?;
            let result = SolverTasksView::load(app.client()).await;
            let view = app.check(result).await.map_err(fail("Failed to load tasks"))?;
            out.emit(&view, |v| {
                if v.tasks.is_empty() {
                    return vec!["No tasks yet".to_string()];
                }
                let tasks: Vec<&Task> = v.tasks.iter().collect();
                table(
                    &TASK_HEADERS,
                    task_rows(&tasks, |id| v.project_title(id).unwrap_or("-").to_string()),
                )
            })
        }
        SolverCommand::CreateTask {
            title,
            description,
            deadline,
        } => {
            app.enter(Route::SolverTasks).map_err(fail("Access denied"))?;
            let form = TaskForm {
                title,
                description,
                deadline,
            };
            let body = form.validate().map_err(fail("Failed to create task"))?;
            let result = app.client().solver().create_task(&body).await;
            let task = app.check(result).await.map_err(fail("Failed to create task"))?;
            out.emit(&task, |t| vec![format!("Task created successfully! (#{})", t.id)])
        }
        SolverCommand::UpdateTask {
            task_id,
            title,
            description,
            deadline,
            status,
        } => {
            app.enter(Route::SolverTasks).map_err(fail("Access denied"))?;
            let form = TaskEditForm {
                title,
                description,
                deadline,
                status: status.map(Into::into),
            };
            let update = form.validate().map_err(fail("Failed to update task"))?;
            let result = app.client().solver().update_task(task_id, &update).await;
            let task = app.check(result).await.map_err(fail("Failed to update task"))?;
            out.emit(&task, |t| vec![format!("Task #{} is {}", t.id, t.status.as_str())])
        }
        SolverCommand::Submit { task_id, file } => {
            app.enter(Route::SolverTasks).map_err(fail("Access denied"))?;
            submit(app, out, task_id, &file).await
        }
        SolverCommand::RequestCompletion { project_id } => {
            app.enter(Route::SolverProject(project_id)).map_err(fail("Access denied"))?;
            if !out.confirm(
                "Request project completion and payment? This will notify the buyer to review your work.",
            )? {
                return out.message("Cancelled");
            }
            let outcome = app
                .request_completion(project_id)
                .await
                .map_err(fail("Failed to request completion"))?;
            report(
                out,
                &outcome,
                &format!(
                    "Payment request submitted successfully! Amount: {}",
                    format_amount(outcome.value.amount)
                ),
            )
        }
    }
}

async fn submit(app: &mut App, out: Output, task_id: i64, file: &Path) -> anyhow::Result<()> {
    let result = app.client().solver().submit_task_file(task_id, file).await;
    let response = app.check(result).await.map_err(fail("Failed to upload file"))?;
    out.emit(&response, |r| {
        vec![
            "Task submitted successfully!".to_string(),
            format!("Submission #{}: {}", r.submission_id, r.file_name),
        ]
    })
}

// ============ Marketplace ============

fn marketplace_rows(projects: &[MarketplaceProject]) -> Vec<Vec<String>> {
    projects
        .iter()
        .map(|entry| {
            let p = &entry.project;
            vec![
                p.id.to_string(),
                p.title.clone(),
                p.category.to_string(),
                format_amount(p.budget),
                entry.buyer_name.clone().unwrap_or_else(|| "-".to_string()),
                entry.applications_count.to_string(),
            ]
        })
        .collect()
}

const MARKET_HEADERS: [&str; 6] = ["ID", "TITLE", "CATEGORY", "BUDGET", "BUYER", "APPLICANTS"];

pub(super) async fn market(app: &mut App, out: Output, command: MarketCommand) -> anyhow::Result<()> {
    match command {
        MarketCommand::Browse {
            category,
            search,
            sort,
            skip,
            limit,
        } => {
            let query = MarketplaceQuery {
                skip,
                limit,
                category,
                search: search.filter(|s| !s.trim().is_empty()),
                sort_by: sort,
            };
            let result = MarketplaceView::load(app.client(), &query).await;
            let view = app.check(result).await.map_err(fail("Failed to load marketplace"))?;
            out.emit(&view, |v| {
                if v.projects.is_empty() {
                    return vec!["No projects found".to_string()];
                }
                table(&MARKET_HEADERS, marketplace_rows(&v.projects))
            })
        }
        MarketCommand::Show { project_id } => {
            let result = app.client().marketplace().project(project_id).await;
            let entry = app.check(result).await.map_err(fail("Project not found"))?;
            out.emit(&entry, |e| {
                vec![
                    format!("#{} {} [{}]", e.project.id, e.project.title, e.project.status),
                    format!(
                        "Budget: {}  Category: {}  Buyer: {}",
                        format_amount(e.project.budget),
                        e.project.category,
                        e.buyer_name.as_deref().unwrap_or("-")
                    ),
                    format!("Applications: {}", e.applications_count),
                    String::new(),
                    e.project.description.clone(),
                ]
            })
        }
        MarketCommand::Categories => {
            let result = app.client().marketplace().categories().await;
            let list = app.check(result).await.map_err(fail("Failed to load categories"))?;
            out.emit(&list, |l| {
                l.categories
                    .iter()
                    .map(|c| format!("{:<16} {}", c.id, c.name))
                    .collect()
            })
        }
        MarketCommand::Apply { project_id } => {
            app.enter(Route::SolverDashboard).map_err(fail("Access denied"))?;
            let result = app.client().marketplace().apply(project_id).await;
            let application = app.check(result).await.map_err(fail("Failed to apply"))?;
            out.emit(&application, |a| {
                vec![format!("Application #{} submitted for project #{}", a.id, a.project_id)]
            })
        }
        MarketCommand::MyApplications => {
            app.enter(Route::SolverDashboard).map_err(fail("Access denied"))?;
            let result = app.client().marketplace().my_applications().await;
            let applications = app.check(result).await.map_err(fail("Failed to load applications"))?;
            out.emit(&applications, |apps| {
                table(&["ID", "SOLVER", "STATUS", "REQUESTED"], application_rows(apps))
            })
        }
        MarketCommand::Applications { project_id } => {
            app.enter(Route::ManageProject(project_id)).map_err(fail("Access denied"))?;
            let result = app.client().marketplace().project_applications(project_id).await;
            let applications = app.check(result).await.map_err(fail("Failed to load applications"))?;
            out.emit(&applications, |apps| {
                table(&["ID", "SOLVER", "STATUS", "REQUESTED"], application_rows(apps))
            })
        }
        MarketCommand::Accept { application_id } => {
            app.enter(Route::BuyerDashboard).map_err(fail("Access denied"))?;
            if !out.confirm("Accept this application and assign the solver?")? {
                return out.message("Cancelled");
            }
            let outcome = app
                .accept_application(application_id)
                .await
                .map_err(fail("Failed to accept application"))?;
            report(out, &outcome, "Solver assigned successfully!")
        }
        MarketCommand::Reject { application_id } => {
            app.enter(Route::BuyerDashboard).map_err(fail("Access denied"))?;
            if !out.confirm("Reject this application?")? {
                return out.message("Cancelled");
            }
            let outcome = app
                .reject_application(application_id)
                .await
                .map_err(fail("Failed to reject application"))?;
            report(out, &outcome, "Application rejected")
        }
    }
}

// ============ Submissions ============

pub(super) async fn submissions(
    app: &mut App,
    out: Output,
    command: SubmissionsCommand,
) -> anyhow::Result<()> {
    app.enter(Route::BuyerDashboard).map_err(fail("Access denied"))?;

    match command {
        SubmissionsCommand::List { project_id } => {
            let result = app.client().submissions().for_project(project_id).await;
            let list = app.check(result).await.map_err(fail("Failed to load submissions"))?;
            out.emit(&list, |subs| table(&["ID", "TASK", "FILE", "STATUS", "REASON"], submission_rows(subs)))
        }
        SubmissionsCommand::Show { submission_id } => {
            let result = app.client().submissions().get(submission_id).await;
            let submission = app.check(result).await.map_err(fail("Submission not found"))?;
            out.emit(&submission, |s| {
                table(&["ID", "TASK", "FILE", "STATUS", "REASON"], submission_rows(std::slice::from_ref(s)))
            })
        }
        SubmissionsCommand::Review {
            submission_id,
            decision,
            reason,
        } => {
            let review = SubmissionReview::new(decision.into(), reason.as_deref())
                .map_err(fail("Please provide a rejection reason"))?;
            let status = review.status();
            let outcome = app
                .review_submission(submission_id, review)
                .await
                .map_err(fail("Failed to review submission"))?;
            report(out, &outcome, &format!("Submission {} successfully!", status.as_str()))
        }
        SubmissionsCommand::Download { submission_id, out: dir } => {
            let result = app.client().submissions().get(submission_id).await;
            let submission = app.check(result).await.map_err(fail("Failed to download submission"))?;
            let result = app
                .client()
                .submissions()
                .download_to(submission_id, &submission.file_name, &dir)
                .await;
            let path = app.check(result).await.map_err(fail("Failed to download submission"))?;
            out.emit(&json!({ "path": &path }), |_| vec![format!("Saved {}", path.display())])
        }
    }
}

// ============ Payments ============

pub(super) async fn payments(app: &mut App, out: Output, command: PaymentsCommand) -> anyhow::Result<()> {
    match command {
        PaymentsCommand::List => {
            app.enter(Route::SolverPayments).map_err(fail("Access denied"))?;
            let result = SolverPaymentsView::load(app.client()).await;
            let view = app.check(result).await.map_err(fail("Failed to load payments"))?;
            out.emit(&view, |v| {
                let mut lines = vec![format!(
                    "Total earned: {}  Paid: {}  Pending: {}",
                    format_amount(v.stats.total_earned),
                    format_amount(v.stats.paid_amount),
                    format_amount(v.stats.pending_amount)
                )];
                lines.push(String::new());
                if v.payments.is_empty() {
                    lines.push("No payments yet".to_string());
                } else {
                    lines.extend(table(&PAYMENT_HEADERS, payment_rows(&v.payments)));
                }
                lines
            })
        }
        PaymentsCommand::Stats => {
            app.enter(Route::SolverPayments).map_err(fail("Access denied"))?;
            let result = app.client().payments().stats().await;
            let stats = app.check(result).await.map_err(fail("Failed to load payment stats"))?;
            out.emit(&stats, |s| {
                vec![
                    format!("Payments: {}", s.payment_count),
                    format!("Total earned: {}", format_amount(s.total_earned)),
                    format!("Paid: {}", format_amount(s.paid_amount)),
                    format!("Pending: {}", format_amount(s.pending_amount)),
                ]
            })
        }
        PaymentsCommand::Project { project_id } => {
            app.enter(Route::ManageProject(project_id)).map_err(fail("Access denied"))?;
            let result = app.client().payments().project_payments(project_id).await;
            let list = app.check(result).await.map_err(fail("Failed to load payments"))?;
            out.emit(&list, |ps| table(&PAYMENT_HEADERS, payment_rows(ps)))
        }
        PaymentsCommand::Payout {
            payment_id,
            stripe_account,
        } => {
            app.enter(Route::SolverPayments).map_err(fail("Access denied"))?;
            if !out.confirm(&format!("Pay out payment {} to {}?", payment_id, stripe_account))? {
                return out.message("Cancelled");
            }
            let request = PayoutRequest {
                payment_id,
                stripe_account_id: stripe_account,
            };
            let result = app.client().payments().payout(&request).await;
            let payout = app.check(result).await.map_err(fail("Failed to request payout"))?;
            out.emit(&payout, |p| {
                vec![format!("Payout {} {}: {}", p.payout_id, p.status, format_amount(p.amount))]
            })
        }
    }
}

// ============ Profiles ============

pub(super) async fn profile(app: &mut App, out: Output, solver_id: i64) -> anyhow::Result<()> {
    let result = app.client().profiles().solver(solver_id).await;
    let profile = app.check(result).await.map_err(fail("Failed to load profile"))?;
    out.emit(&profile, |p| {
        let s = &p.statistics;
        vec![
            format!("{} ({})", p.full_name, p.role.label()),
            format!("Member since {}", format_date(p.created_at.date())),
            format!(
                "Applications: {} ({} accepted, {:.0}% acceptance)",
                s.total_applications, s.accepted_applications, s.acceptance_rate
            ),
            format!("Projects: {} completed, {} active", s.completed_projects, s.active_projects),
        ]
    })
}
