//! Typed endpoint groups, one per backend router.
//!
//! Each group borrows the shared [`ApiClient`] so the bearer token set on the
//! client applies to every call:
//!
//! ```no_run
//! # async fn demo(client: &project_market::ApiClient) -> project_market::ClientResult<()> {
//! let projects = client.buyer().list_projects(0, 100).await?;
//! # Ok(()) }
//! ```

pub mod admin;
pub mod auth;
pub mod buyer;
pub mod marketplace;
pub mod payments;
pub mod profiles;
pub mod solver;
pub mod sprints;
pub mod submissions;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use buyer::BuyerApi;
pub use marketplace::MarketplaceApi;
pub use payments::PaymentsApi;
pub use profiles::ProfilesApi;
pub use solver::SolverApi;
pub use sprints::SprintsApi;
pub use submissions::SubmissionsApi;

use serde::Serialize;

use crate::services::ApiClient;

/// `skip`/`limit` query parameters shared by list endpoints
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }

    pub fn buyer(&self) -> BuyerApi<'_> {
        BuyerApi::new(self)
    }

    pub fn solver(&self) -> SolverApi<'_> {
        SolverApi::new(self)
    }

    pub fn submissions(&self) -> SubmissionsApi<'_> {
        SubmissionsApi::new(self)
    }

    pub fn marketplace(&self) -> MarketplaceApi<'_> {
        MarketplaceApi::new(self)
    }

    pub fn payments(&self) -> PaymentsApi<'_> {
        PaymentsApi::new(self)
    }

    pub fn profiles(&self) -> ProfilesApi<'_> {
        ProfilesApi::new(self)
    }

    pub fn sprints(&self) -> SprintsApi<'_> {
        SprintsApi::new(self)
    }
}
