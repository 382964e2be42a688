use std::future::Future;
use std::sync::Arc;

use time::OffsetDateTime;

use crate::actions::{self, ActionOutcome};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    ApplicationDecision, MessageResponse, PaymentActionResponse, PaymentRejection, Project,
    ProjectActionResponse, SubmissionActionResponse, UserRole,
};
use crate::routing::{dashboard_for, guard, Guard, Route};
use crate::services::ApiClient;
use crate::session::{ProjectCache, Session, SessionUser};
use crate::store::{FileSessionStore, SessionStore};
use crate::views::forms::{
    ProjectEditForm, ProjectForm, RegisterForm, RejectionReason, SubmissionReview,
};

/// Client application state: configuration, HTTP client and the session.
///
/// `App` is the single writer of the session. Every change is saved through
/// the session store, and any 401 from the backend ends the session.
pub struct App {
    config: Config,
    client: ApiClient,
    store: Arc<dyn SessionStore>,
    session: Session,
}

impl App {
    /// Create the app with the session file named in `config`
    pub async fn from_config(config: Config) -> ClientResult<Self> {
        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(config.session_file.clone()));
        Self::new(config, store).await
    }

    /// Create the app with a custom session store (for testing)
    pub async fn new(config: Config, store: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let client = ApiClient::new(&config)?;
        let mut session = store.load().await?.unwrap_or_default();

        if session.token.is_some() && !session.is_authenticated(OffsetDateTime::now_utc()) {
            tracing::info!("Stored session has expired, signing out");
            session.clear();
            store.clear().await?;
        }
        client.set_token(session.token.clone());

        Ok(Self {
            config,
            client,
            store,
            session,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.session.user.as_ref()
    }

    pub fn projects(&self) -> &ProjectCache {
        &self.session.projects
    }

    // ============ Auth ============

    /// Sign in and return the dashboard for the account's role
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<Route> {
        let auth = self.client.auth().login(email.trim(), password).await?;
        self.start_session(Session::from_auth(&auth)).await?;

        tracing::info!(user_id = auth.user_id, role = %auth.role, "Logged in");
        Ok(dashboard_for(auth.role))
    }

    /// Create an account, sign in as it and return its dashboard
    pub async fn register(&mut self, form: &RegisterForm) -> ClientResult<Route> {
        let request = form.validate()?;
        let auth = self.client.auth().register(&request).await?;
        self.start_session(Session::from_auth(&auth)).await?;

        tracing::info!(user_id = auth.user_id, role = %auth.role, "Registered");
        Ok(dashboard_for(auth.role))
    }

    /// Forget token, user and cached projects
    pub async fn logout(&mut self) -> ClientResult<Route> {
        self.end_session().await?;
        tracing::info!("Logged out");
        Ok(Route::Login)
    }

    async fn start_session(&mut self, session: Session) -> ClientResult<()> {
        self.client.set_token(session.token.clone());
        self.session = session;
        self.persist().await
    }

    async fn end_session(&mut self) -> ClientResult<()> {
        self.session.clear();
        self.client.set_token(None);
        self.store.clear().await
    }

    async fn persist(&self) -> ClientResult<()> {
        self.store.save(&self.session).await
    }

    // ============ Navigation ============

    /// Where opening `route` actually lands for the current session
    pub fn navigate(&self, route: Route) -> Route {
        match guard(&route, &self.session, OffsetDateTime::now_utc()) {
            Guard::Allow => route,
            Guard::Redirect(target) => {
                tracing::debug!(from = %route, to = %target, "Route guard redirect");
                target
            }
        }
    }

    /// Like [`App::navigate`], but a redirect is an error naming where the
    /// user was sent instead
    pub fn enter(&self, route: Route) -> ClientResult<()> {
        match self.navigate(route) {
            target if target == route => Ok(()),
            Route::Login => Err(ClientError::NotAuthenticated),
            target => Err(ClientError::Forbidden(format!(
                "{} is not available to this account, its dashboard is {}",
                route, target
            ))),
        }
    }

    /// Pass a call result through, ending the session on a 401
    pub async fn check<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(e) = &result {
            if e.is_unauthorized() {
                tracing::warn!(error = %e, "Backend rejected the session, signing out");
                self.end_session().await?;
            }
        }
        result
    }

    // ============ Project actions ============

    /// Refetch the project list shown for the current role
    pub async fn reload_projects(&mut self) -> ClientResult<&[Project]> {
        let result = load_project_list(&self.client, self.session.role()).await;
        let projects = self.check(result).await?;
        self.session.projects.replace_all(projects);
        self.persist().await?;
        Ok(self.session.projects.all())
    }

    pub async fn create_project(&mut self, form: &ProjectForm) -> ClientResult<ActionOutcome<Project>> {
        let body = form.validate()?;
        self.mutate(actions::pessimistic, move |client| async move {
            client.buyer().create_project(&body).await
        })
        .await
    }

    pub async fn update_project(
        &mut self,
        project_id: i64,
        form: &ProjectEditForm,
    ) -> ClientResult<ActionOutcome<Project>> {
        let body = form.validate()?;
        self.mutate(actions::pessimistic, move |client| async move {
            client.buyer().update_project(project_id, &body).await
        })
        .await
    }

    /// Removed from the cache right away, put back if the server refuses
    pub async fn delete_project(&mut self, project_id: i64) -> ClientResult<ActionOutcome<MessageResponse>> {
        self.mutate(
            move |cache: &mut ProjectCache| {
                cache.remove(project_id);
            },
            move |client| async move { client.buyer().delete_project(project_id).await },
        )
        .await
    }

    pub async fn assign_solver(
        &mut self,
        project_id: i64,
        solver_id: i64,
    ) -> ClientResult<ActionOutcome<ProjectActionResponse>> {
        self.mutate(actions::pessimistic, move |client| async move {
            client.buyer().assign_solver(project_id, solver_id).await
        })
        .await
    }

    pub async fn accept_application(
        &mut self,
        application_id: i64,
    ) -> ClientResult<ActionOutcome<ApplicationDecision>> {
        self.mutate(actions::pessimistic, move |client| async move {
            client.marketplace().accept_application(application_id).await
        })
        .await
    }

    pub async fn reject_application(
        &mut self,
        application_id: i64,
    ) -> ClientResult<ActionOutcome<ApplicationDecision>> {
        self.mutate(actions::pessimistic, move |client| async move {
            client.marketplace().reject_application(application_id).await
        })
        .await
    }

    pub async fn review_submission(
        &mut self,
        submission_id: i64,
        review: SubmissionReview,
    ) -> ClientResult<ActionOutcome<SubmissionActionResponse>> {
        self.mutate(actions::pessimistic, move |client| async move {
            client.submissions().review(submission_id, &review).await
        })
        .await
    }

    pub async fn approve_payment(
        &mut self,
        payment_id: i64,
    ) -> ClientResult<ActionOutcome<PaymentActionResponse>> {
        self.mutate(actions::pessimistic, move |client| async move {
            client.buyer().approve_payment(payment_id).await
        })
        .await
    }

    pub async fn reject_payment(
        &mut self,
        payment_id: i64,
        reason: RejectionReason,
    ) -> ClientResult<ActionOutcome<PaymentRejection>> {
        self.mutate(actions::pessimistic, move |client| async move {
            client.buyer().reject_payment(payment_id, &reason).await
        })
        .await
    }

    /// Solver asks for payment; the reload picks up the new project status
    pub async fn request_completion(
        &mut self,
        project_id: i64,
    ) -> ClientResult<ActionOutcome<PaymentActionResponse>> {
        self.mutate(actions::pessimistic, move |client| async move {
            client.solver().request_completion(project_id).await
        })
        .await
    }

    /// Run one mutation through [`actions::run`] with the role's project
    /// reload, then apply the 401 rule to both steps and save the session.
    async fn mutate<T, O, Req, ReqFut>(
        &mut self,
        optimistic: O,
        request: Req,
    ) -> ClientResult<ActionOutcome<T>>
    where
        O: FnOnce(&mut ProjectCache),
        Req: FnOnce(ApiClient) -> ReqFut,
        ReqFut: Future<Output = ClientResult<T>>,
    {
        let request_client = self.client.clone();
        let reload_client = self.client.clone();
        let role = self.session.role();

        let result = actions::run(
            &mut self.session.projects,
            optimistic,
            move || request(request_client),
            move || async move { load_project_list(&reload_client, role).await },
        )
        .await;
        let outcome = self.check(result).await?;

        if outcome
            .reload_error
            .as_ref()
            .is_some_and(ClientError::is_unauthorized)
        {
            tracing::warn!("Backend rejected the session during reload, signing out");
            self.end_session().await?;
            return Ok(outcome);
        }

        self.persist().await?;
        Ok(outcome)
    }
}

/// Project list each role keeps in its session
async fn load_project_list(client: &ApiClient, role: Option<UserRole>) -> ClientResult<Vec<Project>> {
    match role {
        Some(UserRole::Buyer) => client.buyer().list_projects(0, 100).await,
        Some(UserRole::ProblemSolver) => client.solver().my_assignments().await,
        Some(UserRole::Admin) | None => Ok(Vec::new()),
    }
}
