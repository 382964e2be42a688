//! Per-screen view models. Each screen loads what it shows from the
//! backend and derives counts and filters locally; nothing here decides an
//! entity's next state.

pub mod admin;
pub mod buyer;
pub mod forms;
pub mod marketplace;
pub mod payments;
pub mod project;
pub mod solver;

pub use admin::{AdminStats, RoleFilter, StatusFilter, UserFilter};
pub use buyer::{BuyerTab, TabCounts};
pub use marketplace::MarketplaceView;
pub use payments::{PaymentRequestSummary, SolverPaymentsView};
pub use project::{ManageProjectView, ManageTabCounts};
pub use solver::{SolverDashboard, SolverProjectView, SolverStats, SolverTasksView};

use crate::error::ClientResult;

/// Keep a secondary section's rows, or record why it is empty.
/// A 401 is never swallowed so the caller can end the session.
pub(crate) fn section<T>(
    result: ClientResult<Vec<T>>,
    name: &str,
    errors: &mut Vec<String>,
) -> ClientResult<Vec<T>> {
    match result {
        Ok(rows) => Ok(rows),
        Err(e) if e.is_unauthorized() => Err(e),
        Err(e) => {
            tracing::warn!(section = name, error = %e, "Failed to load section");
            errors.push(format!("Failed to load {}: {}", name, e));
            Ok(Vec::new())
        }
    }
}
