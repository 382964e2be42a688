// Library crate for the ProjectMarket client
// Exports modules for use by the pm binary and tests

pub mod actions;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod routing;
pub mod services;
pub mod session;
pub mod state;
pub mod store;
pub mod views;

pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use services::ApiClient;
pub use session::Session;
pub use state::App;
