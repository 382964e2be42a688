use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};
use time::macros::datetime;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

use project_market::models::{
    Application, ApplicationStatus, AuthToken, Category, CategoryList, MarketplaceProject,
    Payment, PaymentStatus, PayoutResponse, Project, ProjectActionResponse, ProjectCategory,
    ProjectDetail, ProjectStatus, SolverProfile, SolverStatistics, Sprint, Submission,
    SubmissionStatus, Task, TaskDetail, TaskStatus, User, UserRole,
};
use project_market::services::Claims;

pub const JWT_SECRET: &[u8] = b"fake-backend-secret";
pub const NOW: PrimitiveDateTime = datetime!(2024-03-01 09:00);

/// A registered account and its password
#[derive(Debug, Clone)]
pub struct Account {
    pub user: User,
    pub password: String,
}

/// Everything the fake backend knows
#[derive(Debug, Default)]
pub struct Db {
    pub accounts: Vec<Account>,
    pub projects: Vec<Project>,
    pub applications: Vec<Application>,
    pub tasks: Vec<Task>,
    pub submissions: Vec<Submission>,
    pub files: HashMap<i64, Vec<u8>>,
    pub payments: Vec<Payment>,
    pub sprints: Vec<Sprint>,
    /// Answer every authenticated call with 401
    pub reject_tokens: bool,
    /// Answer project list calls with 500
    pub fail_project_list: bool,
    /// Answer sprint list calls with 500
    pub fail_sprints: bool,
    next_id: i64,
}

impl Db {
    pub fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn project(&self, project_id: i64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn task(&self, task_id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn user(&self, user_id: i64) -> Option<&User> {
        self.accounts.iter().map(|a| &a.user).find(|u| u.id == user_id)
    }
}

/// In-process ProjectMarket backend served over a real TCP socket
#[derive(Clone)]
pub struct FakeBackend {
    db: Arc<Mutex<Db>>,
    hits: Arc<AtomicUsize>,
    addr: SocketAddr,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let backend = Self {
            db: Arc::new(Mutex::new(Db::default())),
            hits: Arc::new(AtomicUsize::new(0)),
            addr: listener.local_addr().unwrap(),
        };

        let router = router(backend.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        backend
    }

    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn db(&self) -> MutexGuard<'_, Db> {
        self.db.lock().unwrap()
    }

    /// Requests received since start or the last reset
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn reset_hits(&self) {
        self.hits.store(0, Ordering::SeqCst);
    }

    pub fn mint_token(user: &User, exp: OffsetDateTime) -> String {
        let claims = Claims {
            user_id: Some(user.id),
            email: Some(user.email.clone()),
            exp: Some(exp.unix_timestamp()),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(JWT_SECRET)).unwrap()
    }
}

fn router(backend: FakeBackend) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/{id}", get(get_user))
        .route("/api/admin/users/{id}/role", patch(assign_role))
        .route("/api/admin/users/{id}/activate", post(activate_user))
        .route("/api/admin/users/{id}/deactivate", post(deactivate_user))
        .route("/api/buyer/projects", get(list_projects).post(create_project))
        .route(
            "/api/buyer/projects/{id}",
            get(get_project).patch(update_project).delete(delete_project),
        )
        .route("/api/buyer/projects/{id}/requests", get(project_requests))
        .route("/api/buyer/projects/{id}/assign", post(assign_solver))
        .route("/api/buyer/projects/{id}/payment-requests", get(payment_requests))
        .route("/api/buyer/payments/{id}/approve", post(approve_payment))
        .route("/api/buyer/payments/{id}/reject", post(reject_payment))
        .route("/api/marketplace/projects", get(browse))
        .route("/api/marketplace/projects/{id}", get(marketplace_project))
        .route("/api/marketplace/categories", get(categories))
        .route("/api/marketplace/projects/{id}/apply", post(apply))
        .route("/api/marketplace/projects/{id}/applications", get(project_applications))
        .route("/api/marketplace/my-applications", get(my_applications))
        .route("/api/marketplace/applications/{id}/accept", post(accept_application))
        .route("/api/marketplace/applications/{id}/reject", post(reject_application))
        .route("/api/solver/my-assignments", get(my_assignments))
        .route("/api/solver/my-assignments/{id}", get(assigned_project))
        .route("/api/solver/tasks", get(list_tasks).post(create_task))
        .route("/api/solver/tasks/{id}", get(get_task).patch(update_task))
        .route("/api/solver/tasks/{id}/submit", post(submit_task))
        .route("/api/solver/projects", get(open_projects))
        .route("/api/solver/projects/{id}", get(open_project))
        .route("/api/solver/projects/{id}/request", post(request_project))
        .route("/api/solver/projects/{id}/request-completion", post(request_completion))
        .route("/api/payments/my-payments", get(my_payments))
        .route("/api/payments/stats", get(payment_stats))
        .route("/api/payments/projects/{id}/payments", get(project_payments))
        .route("/api/payments/payout", post(payout))
        .route("/api/profiles/solver/{id}", get(solver_profile))
        .route("/api/sprints/project/{id}", get(project_sprints))
        .route("/api/submissions/projects/{id}", get(project_submissions))
        .route("/api/submissions/{id}", get(get_submission))
        .route("/api/submissions/{id}/review", post(review_submission))
        .route("/api/submissions/{id}/download", get(download_submission))
        .layer(middleware::from_fn_with_state(backend.clone(), count_hits))
        .with_state(backend)
}

async fn count_hits(State(backend): State<FakeBackend>, request: Request, next: Next) -> Response {
    backend.hits.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

// ============ Helpers ============

type Reply = Result<Response, Response>;

fn reply<T: Serialize>(value: T) -> Reply {
    Ok(Json(value).into_response())
}

fn fail(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn missing_field(field: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "detail": [{ "loc": ["body", field], "msg": "Field required", "type": "missing" }]
        })),
    )
        .into_response()
}

fn text(body: &Value, field: &str) -> Result<String, Response> {
    body[field]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| missing_field(field))
}

fn current_user(db: &Db, headers: &HeaderMap) -> Result<User, Response> {
    let unauthorized = || fail(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    if db.reject_tokens {
        return Err(unauthorized());
    }

    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(unauthorized)?;
    let claims = decode::<Claims>(token, &DecodingKey::from_secret(JWT_SECRET), &Validation::default())
        .map_err(|_| unauthorized())?
        .claims;

    db.user(claims.user_id.unwrap_or_default())
        .filter(|u| u.is_active)
        .cloned()
        .ok_or_else(unauthorized)
}

fn require(db: &Db, headers: &HeaderMap, role: UserRole) -> Result<User, Response> {
    let user = current_user(db, headers)?;
    if user.role != role {
        return Err(fail(StatusCode::FORBIDDEN, "Not enough permissions"));
    }
    Ok(user)
}

fn owned_project(db: &Db, buyer_id: i64, project_id: i64) -> Result<usize, Response> {
    db.projects
        .iter()
        .position(|p| p.id == project_id && p.buyer_id == buyer_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Project not found"))
}

fn auth_token(user: &User) -> AuthToken {
    AuthToken {
        access_token: FakeBackend::mint_token(user, OffsetDateTime::now_utc() + Duration::hours(1)),
        token_type: "bearer".to_string(),
        user_id: user.id,
        email: user.email.clone(),
        role: user.role,
    }
}

// ============ Auth ============

async fn login(State(b): State<FakeBackend>, Json(body): Json<Value>) -> Reply {
    let db = b.db();
    let email = text(&body, "email")?;
    let password = text(&body, "password")?;

    let account = db
        .accounts
        .iter()
        .find(|a| a.user.email == email && a.password == password)
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Incorrect email or password"))?;
    if !account.user.is_active {
        return Err(fail(StatusCode::BAD_REQUEST, "Inactive user"));
    }
    reply(auth_token(&account.user))
}

async fn register(State(b): State<FakeBackend>, Json(body): Json<Value>) -> Reply {
    let mut db = b.db();
    let email = text(&body, "email")?;
    if db.accounts.iter().any(|a| a.user.email == email) {
        return Err(fail(StatusCode::BAD_REQUEST, "Email already registered"));
    }
    let role: UserRole =
        serde_json::from_value(body["role"].clone()).map_err(|_| missing_field("role"))?;

    let user = User {
        id: db.next_id(),
        email,
        full_name: text(&body, "full_name")?,
        role,
        is_active: true,
        created_at: NOW,
        updated_at: None,
    };
    db.accounts.push(Account {
        user: user.clone(),
        password: text(&body, "password")?,
    });
    reply(auth_token(&user))
}

// ============ Admin ============

async fn list_users(State(b): State<FakeBackend>, headers: HeaderMap) -> Reply {
    let db = b.db();
    require(&db, &headers, UserRole::Admin)?;
    let users: Vec<&User> = db.accounts.iter().map(|a| &a.user).collect();
    reply(users)
}

async fn get_user(State(b): State<FakeBackend>, headers: HeaderMap, Path(user_id): Path<i64>) -> Reply {
    let db = b.db();
    require(&db, &headers, UserRole::Admin)?;
    let user = db
        .user(user_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "User not found"))?;
    reply(user)
}

fn admin_user_mut<'a>(
    db: &'a mut Db,
    headers: &HeaderMap,
    user_id: i64,
) -> Result<&'a mut User, Response> {
    require(db, headers, UserRole::Admin)?;
    db.accounts
        .iter_mut()
        .map(|a| &mut a.user)
        .find(|u| u.id == user_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "User not found"))
}

async fn assign_role(
    State(b): State<FakeBackend>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut db = b.db();
    let role: UserRole =
        serde_json::from_value(body["role"].clone()).map_err(|_| missing_field("role"))?;
    let user = admin_user_mut(&mut db, &headers, user_id)?;
    user.role = role;
    user.updated_at = Some(NOW);
    reply(user.clone())
}

async fn activate_user(State(b): State<FakeBackend>, headers: HeaderMap, Path(user_id): Path<i64>) -> Reply {
    let mut db = b.db();
    admin_user_mut(&mut db, &headers, user_id)?.is_active = true;
    reply(json!({ "message": "User activated successfully" }))
}

async fn deactivate_user(State(b): State<FakeBackend>, headers: HeaderMap, Path(user_id): Path<i64>) -> Reply {
    let mut db = b.db();
    admin_user_mut(&mut db, &headers, user_id)?.is_active = false;
    reply(json!({ "message": "User deactivated successfully" }))
}

// ============ Buyer ============

async fn list_projects(State(b): State<FakeBackend>, headers: HeaderMap) -> Reply {
    let db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    if db.fail_project_list {
        return Err(fail(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable"));
    }
    let projects: Vec<&Project> = db.projects.iter().filter(|p| p.buyer_id == user.id).collect();
    reply(projects)
}

async fn create_project(State(b): State<FakeBackend>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let mut db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    let budget: Decimal =
        serde_json::from_value(body["budget"].clone()).map_err(|_| missing_field("budget"))?;

    let project = Project {
        id: db.next_id(),
        title: text(&body, "title")?,
        description: text(&body, "description")?,
        category: serde_json::from_value(body["category"].clone()).unwrap_or_default(),
        budget,
        status: ProjectStatus::Open,
        buyer_id: user.id,
        assigned_solver_id: None,
        created_at: NOW,
        updated_at: NOW,
        pending_applications: None,
    };
    db.projects.push(project.clone());
    reply(project)
}

async fn get_project(State(b): State<FakeBackend>, headers: HeaderMap, Path(project_id): Path<i64>) -> Reply {
    let db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    let index = owned_project(&db, user.id, project_id)?;

    reply(ProjectDetail {
        project: db.projects[index].clone(),
        requests: db
            .applications
            .iter()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect(),
        tasks: db.tasks.iter().filter(|t| t.project_id == project_id).cloned().collect(),
    })
}

async fn update_project(
    State(b): State<FakeBackend>,
    headers: HeaderMap,
    Path(project_id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    let index = owned_project(&db, user.id, project_id)?;

    let project = &mut db.projects[index];
    if let Some(title) = body["title"].as_str() {
        project.title = title.to_string();
    }
    if let Some(description) = body["description"].as_str() {
        project.description = description.to_string();
    }
    if let Ok(budget) = serde_json::from_value::<Decimal>(body["budget"].clone()) {
        project.budget = budget;
    }
    if let Ok(category) = serde_json::from_value::<ProjectCategory>(body["category"].clone()) {
        project.category = category;
    }
    reply(project.clone())
}

async fn delete_project(State(b): State<FakeBackend>, headers: HeaderMap, Path(project_id): Path<i64>) -> Reply {
    let mut db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    let index = owned_project(&db, user.id, project_id)?;
    if db.projects[index].status != ProjectStatus::Open {
        return Err(fail(StatusCode::BAD_REQUEST, "Only open projects can be deleted"));
    }
    db.projects.remove(index);
    reply(json!({ "message": "Project deleted successfully" }))
}

async fn project_requests(State(b): State<FakeBackend>, headers: HeaderMap, Path(project_id): Path<i64>) -> Reply {
    let db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    owned_project(&db, user.id, project_id)?;
    let requests: Vec<&Application> =
        db.applications.iter().filter(|a| a.project_id == project_id).collect();
    reply(requests)
}

async fn assign_solver(
    State(b): State<FakeBackend>,
    headers: HeaderMap,
    Path(project_id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    let index = owned_project(&db, user.id, project_id)?;
    let solver_id = body["problem_solver_id"]
        .as_i64()
        .ok_or_else(|| missing_field("problem_solver_id"))?;
    if db.projects[index].status != ProjectStatus::Open {
        return Err(fail(StatusCode::BAD_REQUEST, "Project must be in OPEN status to assign solver"));
    }
    if db.user(solver_id).is_none() {
        return Err(fail(StatusCode::NOT_FOUND, "Problem solver not found"));
    }
    let request = db
        .applications
        .iter()
        .position(|a| {
            a.project_id == project_id
                && a.problem_solver_id == solver_id
                && a.status == ApplicationStatus::Pending
        })
        .ok_or_else(|| fail(StatusCode::BAD_REQUEST, "No pending request from this problem solver"))?;

    db.applications[request].status = ApplicationStatus::Accepted;
    db.applications[request].responded_at = Some(NOW);
    let project = &mut db.projects[index];
    project.status = ProjectStatus::Assigned;
    project.assigned_solver_id = Some(solver_id);
    project.updated_at = NOW;

    reply(ProjectActionResponse {
        message: "Problem solver assigned successfully".to_string(),
        project: Some(project.clone()),
    })
}

async fn payment_requests(State(b): State<FakeBackend>, headers: HeaderMap, Path(project_id): Path<i64>) -> Reply {
    let db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    owned_project(&db, user.id, project_id)?;
    let payments: Vec<&Payment> = db.payments.iter().filter(|p| p.project_id == project_id).collect();
    reply(payments)
}

fn pending_payment(db: &Db, buyer_id: i64, payment_id: i64) -> Result<usize, Response> {
    let index = db
        .payments
        .iter()
        .position(|p| {
            p.id == payment_id && db.project(p.project_id).is_some_and(|pr| pr.buyer_id == buyer_id)
        })
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Payment not found"))?;
    if db.payments[index].status != PaymentStatus::Pending {
        return Err(fail(StatusCode::BAD_REQUEST, "Payment is not in pending status"));
    }
    Ok(index)
}

async fn approve_payment(State(b): State<FakeBackend>, headers: HeaderMap, Path(payment_id): Path<i64>) -> Reply {
    let mut db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    let index = pending_payment(&db, user.id, payment_id)?;

    let payment = &mut db.payments[index];
    payment.status = PaymentStatus::Released;
    payment.released_at = Some(NOW);
    let (amount, project_id) = (payment.amount, payment.project_id);
    if let Some(project) = db.projects.iter_mut().find(|p| p.id == project_id) {
        project.status = ProjectStatus::Completed;
    }

    reply(json!({
        "message": "Payment approved and released successfully",
        "payment_id": payment_id,
        "amount": amount,
        "status": "released",
    }))
}

async fn reject_payment(
    State(b): State<FakeBackend>,
    headers: HeaderMap,
    Path(payment_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    let mut db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    let reason = query
        .get("rejection_reason")
        .cloned()
        .ok_or_else(|| missing_field("rejection_reason"))?;
    let index = pending_payment(&db, user.id, payment_id)?;

    db.payments.remove(index);
    reply(json!({ "message": "Payment request rejected", "reason": reason }))
}

// ============ Marketplace ============

async fn browse(State(b): State<FakeBackend>, Query(query): Query<HashMap<String, String>>) -> Reply {
    let db = b.db();
    let category = query.get("category").map(String::as_str);
    let projects: Vec<MarketplaceProject> = db
        .projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Open)
        .filter(|p| category.map_or(true, |c| p.category.as_str() == c))
        .map(|p| listing(&db, p))
        .collect();
    reply(projects)
}

fn listing(db: &Db, project: &Project) -> MarketplaceProject {
    MarketplaceProject {
        project: project.clone(),
        buyer_name: db.user(project.buyer_id).map(|u| u.full_name.clone()),
        applications_count: db.applications.iter().filter(|a| a.project_id == project.id).count() as i64,
    }
}

fn open_project_by_id(db: &Db, project_id: i64) -> Result<&Project, Response> {
    db.project(project_id)
        .filter(|p| p.status == ProjectStatus::Open)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Project not found"))
}

async fn marketplace_project(State(b): State<FakeBackend>, Path(project_id): Path<i64>) -> Reply {
    let db = b.db();
    let project = open_project_by_id(&db, project_id)?;
    reply(listing(&db, project))
}

async fn categories() -> Reply {
    reply(CategoryList {
        categories: ProjectCategory::ALL
            .iter()
            .map(|c| Category {
                id: c.as_str().to_string(),
                name: c.as_str().replace('_', " "),
                icon: None,
            })
            .collect(),
    })
}

async fn apply(State(b): State<FakeBackend>, headers: HeaderMap, Path(project_id): Path<i64>) -> Reply {
    let mut db = b.db();
    let user = require(&db, &headers, UserRole::ProblemSolver)?;
    if !db.project(project_id).is_some_and(|p| p.status == ProjectStatus::Open) {
        return Err(fail(StatusCode::NOT_FOUND, "Project not found or not open"));
    }
    if db
        .applications
        .iter()
        .any(|a| a.project_id == project_id && a.problem_solver_id == user.id)
    {
        return Err(fail(StatusCode::BAD_REQUEST, "You have already applied to this project"));
    }

    let application = Application {
        id: db.next_id(),
        project_id,
        problem_solver_id: user.id,
        solver_name: Some(user.full_name.clone()),
        status: ApplicationStatus::Pending,
        requested_at: NOW,
        responded_at: None,
    };
    db.applications.push(application.clone());
    reply(application)
}

async fn project_applications(
    State(b): State<FakeBackend>,
    headers: HeaderMap,
    Path(project_id): Path<i64>,
) -> Reply {
    let db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    owned_project(&db, user.id, project_id)?;
    let applications: Vec<&Application> =
        db.applications.iter().filter(|a| a.project_id == project_id).collect();
    reply(applications)
}

async fn my_applications(State(b): State<FakeBackend>, headers: HeaderMap) -> Reply {
    let db = b.db();
    let user = require(&db, &headers, UserRole::ProblemSolver)?;
    let applications: Vec<&Application> =
        db.applications.iter().filter(|a| a.problem_solver_id == user.id).collect();
    reply(applications)
}

fn buyer_application(db: &Db, buyer_id: i64, application_id: i64) -> Result<usize, Response> {
    db.applications
        .iter()
        .position(|a| {
            a.id == application_id && db.project(a.project_id).is_some_and(|p| p.buyer_id == buyer_id)
        })
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Application not found"))
}

async fn accept_application(
    State(b): State<FakeBackend>,
    headers: HeaderMap,
    Path(application_id): Path<i64>,
) -> Reply {
    let mut db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    let index = buyer_application(&db, user.id, application_id)?;
    let (project_id, solver_id) = {
        let a = &db.applications[index];
        (a.project_id, a.problem_solver_id)
    };

    for application in db.applications.iter_mut().filter(|a| a.project_id == project_id) {
        application.status = if application.id == application_id {
            ApplicationStatus::Accepted
        } else {
            ApplicationStatus::Rejected
        };
        application.responded_at = Some(NOW);
    }
    if let Some(project) = db.projects.iter_mut().find(|p| p.id == project_id) {
        project.status = ProjectStatus::Assigned;
        project.assigned_solver_id = Some(solver_id);
    }

    reply(json!({
        "message": "Application accepted",
        "application_id": application_id,
        "project_id": project_id,
    }))
}

async fn reject_application(
    State(b): State<FakeBackend>,
    headers: HeaderMap,
    Path(application_id): Path<i64>,
) -> Reply {
    let mut db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    let index = buyer_application(&db, user.id, application_id)?;
    db.applications[index].status = ApplicationStatus::Rejected;
    db.applications[index].responded_at = Some(NOW);
    reply(json!({ "message": "Application rejected", "application_id": application_id }))
}

// ============ Solver ============

async fn my_assignments(State(b): State<FakeBackend>, headers: HeaderMap) -> Reply {
    let db = b.db();
    let user = require(&db, &headers, UserRole::ProblemSolver)?;
    let projects: Vec<&Project> = db
        .projects
        .iter()
        .filter(|p| p.assigned_solver_id == Some(user.id))
        .collect();
    reply(projects)
}

async fn assigned_project(State(b): State<FakeBackend>, headers: HeaderMap, Path(project_id): Path<i64>) -> Reply {
    let db = b.db();
    let user = require(&db, &headers, UserRole::ProblemSolver)?;
    let project = db
        .project(project_id)
        .filter(|p| p.assigned_solver_id == Some(user.id))
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Project not found or not assigned to you"))?;
    let mut body = serde_json::to_value(project).unwrap();
    body["buyer_name"] = json!(db.user(project.buyer_id).map(|u| u.full_name.clone()));
    reply(body)
}

async fn list_tasks(State(b): State<FakeBackend>, headers: HeaderMap) -> Reply {
    let db = b.db();
    let user = require(&db, &headers, UserRole::ProblemSolver)?;
    let tasks: Vec<&Task> = db.tasks.iter().filter(|t| t.problem_solver_id == user.id).collect();
    reply(tasks)
}

fn own_task(db: &Db, solver_id: i64, task_id: i64) -> Result<usize, Response> {
    db.tasks
        .iter()
        .position(|t| t.id == task_id && t.problem_solver_id == solver_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Task not found"))
}

async fn get_task(State(b): State<FakeBackend>, headers: HeaderMap, Path(task_id): Path<i64>) -> Reply {
    let db = b.db();
    let user = require(&db, &headers, UserRole::ProblemSolver)?;
    let index = own_task(&db, user.id, task_id)?;
    reply(TaskDetail {
        task: db.tasks[index].clone(),
        submissions: db.submissions.iter().filter(|s| s.task_id == task_id).cloned().collect(),
    })
}

async fn update_task(
    State(b): State<FakeBackend>,
    headers: HeaderMap,
    Path(task_id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut db = b.db();
    let user = require(&db, &headers, UserRole::ProblemSolver)?;
    let index = own_task(&db, user.id, task_id)?;

    let task = &mut db.tasks[index];
    if let Some(title) = body["title"].as_str() {
        task.title = title.to_string();
    }
    if let Some(description) = body["description"].as_str() {
        task.description = description.to_string();
    }
    if let Some(deadline) = body["deadline"].as_str() {
        task.deadline = Some(
            project_market::models::timestamp::parse_date(deadline)
                .map_err(|_| missing_field("deadline"))?,
        );
    }
    if let Ok(status) = serde_json::from_value::<TaskStatus>(body["status"].clone()) {
        task.status = status;
    }
    task.updated_at = NOW;
    reply(task.clone())
}

async fn open_projects(State(b): State<FakeBackend>, Query(query): Query<HashMap<String, String>>) -> Reply {
    let db = b.db();
    let number = |key: &str, default: usize| {
        query.get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
    };
    let projects: Vec<&Project> = db
        .projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Open)
        .skip(number("skip", 0))
        .take(number("limit", 100))
        .collect();
    reply(projects)
}

async fn open_project(State(b): State<FakeBackend>, Path(project_id): Path<i64>) -> Reply {
    let db = b.db();
    reply(open_project_by_id(&db, project_id)?)
}

async fn request_project(State(b): State<FakeBackend>, headers: HeaderMap, Path(project_id): Path<i64>) -> Reply {
    let mut db = b.db();
    let user = require(&db, &headers, UserRole::ProblemSolver)?;
    let project = db
        .project(project_id)
        .cloned()
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Project not found"))?;
    if project.status != ProjectStatus::Open {
        return Err(fail(StatusCode::BAD_REQUEST, "Project is not available for requests"));
    }
    if db
        .applications
        .iter()
        .any(|a| a.project_id == project_id && a.problem_solver_id == user.id)
    {
        return Err(fail(StatusCode::BAD_REQUEST, "You have already requested this project"));
    }

    let application = Application {
        id: db.next_id(),
        project_id,
        problem_solver_id: user.id,
        solver_name: Some(user.full_name.clone()),
        status: ApplicationStatus::Pending,
        requested_at: NOW,
        responded_at: None,
    };
    db.applications.push(application);
    reply(ProjectActionResponse {
        message: "Request submitted successfully".to_string(),
        project: Some(project),
    })
}

async fn create_task(State(b): State<FakeBackend>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let mut db = b.db();
    let user = require(&db, &headers, UserRole::ProblemSolver)?;
    let index = db
        .projects
        .iter()
        .position(|p| p.assigned_solver_id == Some(user.id) && p.status.is_active())
        .ok_or_else(|| fail(StatusCode::BAD_REQUEST, "You don't have an assigned project"))?;

    let task = Task {
        id: db.next_id(),
        project_id: db.projects[index].id,
        problem_solver_id: user.id,
        title: text(&body, "title")?,
        description: text(&body, "description")?,
        deadline: body["deadline"]
            .as_str()
            .and_then(|d| project_market::models::timestamp::parse_date(d).ok()),
        status: TaskStatus::Created,
        created_at: NOW,
        updated_at: NOW,
    };
    if db.projects[index].status == ProjectStatus::Assigned {
        db.projects[index].status = ProjectStatus::InProgress;
    }
    db.tasks.push(task.clone());
    reply(task)
}

async fn submit_task(
    State(b): State<FakeBackend>,
    headers: HeaderMap,
    Path(task_id): Path<i64>,
    mut multipart: Multipart,
) -> Reply {
    let mut upload = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(|_| missing_field("file"))?;
            upload = Some((file_name, bytes.to_vec()));
        }
    }
    let (file_name, bytes) = upload.ok_or_else(|| missing_field("file"))?;

    let mut db = b.db();
    let user = require(&db, &headers, UserRole::ProblemSolver)?;
    if !db.task(task_id).is_some_and(|t| t.problem_solver_id == user.id) {
        return Err(fail(StatusCode::NOT_FOUND, "Task not found"));
    }
    if !file_name.ends_with(".zip") {
        return Err(fail(StatusCode::BAD_REQUEST, "File must be a ZIP archive"));
    }

    let submission = Submission {
        id: db.next_id(),
        task_id,
        problem_solver_id: user.id,
        file_name: file_name.clone(),
        file_path: format!("uploads/task_{}_{}", task_id, file_name),
        status: SubmissionStatus::Pending,
        rejection_reason: None,
        submitted_at: NOW,
        reviewed_at: None,
    };
    db.files.insert(submission.id, bytes);
    if let Some(task) = db.tasks.iter_mut().find(|t| t.id == task_id) {
        task.status = TaskStatus::Submitted;
    }
    let submission_id = submission.id;
    db.submissions.push(submission);

    reply(json!({
        "message": "Task submitted successfully",
        "submission_id": submission_id,
        "file_name": file_name,
    }))
}

async fn request_completion(State(b): State<FakeBackend>, headers: HeaderMap, Path(project_id): Path<i64>) -> Reply {
    let mut db = b.db();
    let user = require(&db, &headers, UserRole::ProblemSolver)?;
    let project = db
        .project(project_id)
        .filter(|p| p.assigned_solver_id == Some(user.id))
        .cloned()
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Project not found or not assigned to you"))?;
    if !project.status.is_active() {
        return Err(fail(StatusCode::BAD_REQUEST, "Project is not in a state that can be completed"));
    }
    if db
        .payments
        .iter()
        .any(|p| p.project_id == project_id && p.status == PaymentStatus::Pending)
    {
        return Err(fail(StatusCode::BAD_REQUEST, "Payment request already exists for this project"));
    }

    let payment = Payment {
        id: db.next_id(),
        project_id,
        solver_id: user.id,
        amount: project.budget,
        status: PaymentStatus::Pending,
        description: Some("Project completion payment request".to_string()),
        payment_method: "stripe".to_string(),
        created_at: NOW,
        released_at: None,
        paid_at: None,
    };
    let response = json!({
        "message": "Project completion and payment requested successfully",
        "payment_id": payment.id,
        "amount": payment.amount,
        "status": "pending",
    });
    db.payments.push(payment);
    reply(response)
}

// ============ Payments ============

async fn my_payments(State(b): State<FakeBackend>, headers: HeaderMap) -> Reply {
    let db = b.db();
    let user = require(&db, &headers, UserRole::ProblemSolver)?;
    let payments: Vec<&Payment> = db.payments.iter().filter(|p| p.solver_id == user.id).collect();
    reply(payments)
}

async fn payment_stats(State(b): State<FakeBackend>, headers: HeaderMap) -> Reply {
    let db = b.db();
    let user = require(&db, &headers, UserRole::ProblemSolver)?;
    let mine: Vec<&Payment> = db.payments.iter().filter(|p| p.solver_id == user.id).collect();
    let sum = |status: PaymentStatus| -> Decimal {
        mine.iter().filter(|p| p.status == status).map(|p| p.amount).sum()
    };

    reply(json!({
        "total_earned": sum(PaymentStatus::Released) + sum(PaymentStatus::Paid),
        "paid_amount": sum(PaymentStatus::Paid),
        "pending_amount": sum(PaymentStatus::Pending),
        "payment_count": mine.len(),
    }))
}

async fn project_payments(State(b): State<FakeBackend>, headers: HeaderMap, Path(project_id): Path<i64>) -> Reply {
    let db = b.db();
    let user = current_user(&db, &headers)?;
    let project = db
        .project(project_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Project not found"))?;
    if project.buyer_id != user.id {
        return Err(fail(StatusCode::FORBIDDEN, "Only project owner can view payments"));
    }
    let payments: Vec<&Payment> = db.payments.iter().filter(|p| p.project_id == project_id).collect();
    reply(payments)
}

async fn payout(State(b): State<FakeBackend>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let mut db = b.db();
    let user = current_user(&db, &headers)?;
    let payment_id = body["payment_id"].as_i64().ok_or_else(|| missing_field("payment_id"))?;
    text(&body, "stripe_account_id")?;

    let payment = db
        .payments
        .iter_mut()
        .find(|p| p.id == payment_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Payment not found"))?;
    if payment.solver_id != user.id {
        return Err(fail(
            StatusCode::FORBIDDEN,
            "You can only request payout for your own payments",
        ));
    }
    if payment.status != PaymentStatus::Released {
        return Err(fail(
            StatusCode::BAD_REQUEST,
            "Payment must be in 'released' state to create payout",
        ));
    }

    payment.status = PaymentStatus::Paid;
    payment.paid_at = Some(NOW);
    reply(PayoutResponse {
        payout_id: format!("po_fake_{}", payment_id),
        status: "in_transit".to_string(),
        amount: payment.amount,
        arrival_date: NOW + Duration::days(2),
    })
}

// ============ Profiles ============

async fn solver_profile(State(b): State<FakeBackend>, headers: HeaderMap, Path(solver_id): Path<i64>) -> Reply {
    let db = b.db();
    current_user(&db, &headers)?;
    let solver = db
        .user(solver_id)
        .filter(|u| u.role == UserRole::ProblemSolver)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Solver not found"))?;

    let applications = db.applications.iter().filter(|a| a.problem_solver_id == solver_id);
    let total = applications.clone().count() as i64;
    let accepted = applications
        .filter(|a| a.status == ApplicationStatus::Accepted)
        .count() as i64;
    let assigned = db.projects.iter().filter(|p| p.assigned_solver_id == Some(solver_id));
    let acceptance_rate = if total > 0 {
        (accepted as f64 / total as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };

    reply(SolverProfile {
        id: solver.id,
        full_name: solver.full_name.clone(),
        email: solver.email.clone(),
        role: solver.role,
        is_active: solver.is_active,
        created_at: solver.created_at,
        statistics: SolverStatistics {
            total_applications: total,
            accepted_applications: accepted,
            completed_projects: assigned
                .clone()
                .filter(|p| p.status == ProjectStatus::Completed)
                .count() as i64,
            active_projects: assigned.filter(|p| p.status.is_active()).count() as i64,
            acceptance_rate,
        },
    })
}

// ============ Sprints ============

async fn project_sprints(State(b): State<FakeBackend>, headers: HeaderMap, Path(project_id): Path<i64>) -> Reply {
    let db = b.db();
    let user = current_user(&db, &headers)?;
    if db.fail_sprints {
        return Err(fail(StatusCode::INTERNAL_SERVER_ERROR, "Sprint service unavailable"));
    }
    let project = db
        .project(project_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Project not found"))?;
    if project.buyer_id != user.id && project.assigned_solver_id != Some(user.id) {
        return Err(fail(StatusCode::FORBIDDEN, "You don't have access to this project"));
    }

    let mut sprints: Vec<&Sprint> = db.sprints.iter().filter(|s| s.project_id == project_id).collect();
    sprints.sort_by_key(|s| s.order);
    reply(sprints)
}

// ============ Submissions ============

fn buyer_submission(db: &Db, buyer_id: i64, submission_id: i64) -> Result<usize, Response> {
    db.submissions
        .iter()
        .position(|s| {
            s.id == submission_id
                && db
                    .task(s.task_id)
                    .and_then(|t| db.project(t.project_id))
                    .is_some_and(|p| p.buyer_id == buyer_id)
        })
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Submission not found"))
}

async fn get_submission(State(b): State<FakeBackend>, headers: HeaderMap, Path(submission_id): Path<i64>) -> Reply {
    let db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    let index = buyer_submission(&db, user.id, submission_id)?;
    reply(&db.submissions[index])
}

async fn project_submissions(State(b): State<FakeBackend>, headers: HeaderMap, Path(project_id): Path<i64>) -> Reply {
    let db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    owned_project(&db, user.id, project_id)?;
    let submissions: Vec<&Submission> = db
        .submissions
        .iter()
        .filter(|s| db.task(s.task_id).is_some_and(|t| t.project_id == project_id))
        .collect();
    reply(submissions)
}

async fn review_submission(
    State(b): State<FakeBackend>,
    headers: HeaderMap,
    Path(submission_id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    let index = buyer_submission(&db, user.id, submission_id)?;
    if db.submissions[index].status != SubmissionStatus::Pending {
        return Err(fail(StatusCode::BAD_REQUEST, "Submission has already been reviewed"));
    }
    let status: SubmissionStatus =
        serde_json::from_value(body["status"].clone()).map_err(|_| missing_field("status"))?;

    let submission = &mut db.submissions[index];
    submission.status = status;
    submission.rejection_reason = body["rejection_reason"].as_str().map(str::to_string);
    submission.reviewed_at = Some(NOW);
    let (task_id, reviewed) = (submission.task_id, submission.clone());
    if let Some(task) = db.tasks.iter_mut().find(|t| t.id == task_id) {
        task.status = match status {
            SubmissionStatus::Accepted => TaskStatus::Accepted,
            _ => TaskStatus::Rejected,
        };
    }

    reply(json!({
        "message": format!("Submission {} successfully", status.as_str()),
        "submission": reviewed,
    }))
}

async fn download_submission(
    State(b): State<FakeBackend>,
    headers: HeaderMap,
    Path(submission_id): Path<i64>,
) -> Reply {
    let db = b.db();
    let user = require(&db, &headers, UserRole::Buyer)?;
    buyer_submission(&db, user.id, submission_id)?;
    let bytes = db.files.get(&submission_id).cloned().unwrap_or_default();
    Ok(([("content-type", "application/zip")], bytes).into_response())
}
