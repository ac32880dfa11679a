// handlers/public/mod.rs - Public handlers
//
// Reachable without a session. The login and register pages are auth-only:
// the guard bounces signed-in users to the default page before these run.

pub mod auth;
pub mod pages;

pub use pages::{health, landing, login_page, register_page};
