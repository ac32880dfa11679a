pub mod applications;
pub mod auth;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod session;
pub mod state;

pub use server::app;
pub use state::AppState;
