//! Route protection: one decision table shared by the server middleware, the
//! client controller and the CLI.

pub mod controller;
pub mod decision;
pub mod route;

pub use controller::{GuardController, Navigator, Render};
pub use decision::{decide, redirect_param, Guard, GuardDecision, GuardState, LoginReason, ERROR_PARAM, REDIRECT_PARAM};
pub use route::{normalize_path, RouteClass, RouteTable};
