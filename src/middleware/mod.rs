pub mod guard;
pub mod response;

pub use guard::{request_session, request_token, route_guard_middleware, CurrentUser};
pub use response::ApiResponse;
