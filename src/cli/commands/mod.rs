pub mod applications;
pub mod auth;
pub mod route;
pub mod token;
