pub mod admin;
pub mod api;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;
pub mod state;


pub use api::{ApiError, Result as ApiResult};
pub use error::{Result as ServerErrorResult, ServerError};
pub use routes::build_router;
pub use state::build_app_state;
