pub mod api_client;
pub mod auth;

pub use api_client::ApiClient;
pub use auth::{Claims, TokenService};
