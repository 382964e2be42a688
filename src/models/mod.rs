pub mod application;
pub mod payment;
pub mod profile;
pub mod project;
pub mod sprint;
pub mod submission;
pub mod task;
pub mod timestamp;
pub mod user;

pub use application::*;
pub use payment::*;
pub use profile::*;
pub use project::*;
pub use sprint::*;
pub use submission::*;
pub use task::*;
pub use user::*;
