// handlers/protected/mod.rs - Pages that require a session
//
// Every route here sits behind the guard middleware, which has already
// redirected anonymous visitors to /login and attached CurrentUser.

pub mod pages;

pub use pages::{
    analytics, application_edit, application_new, applications, dashboard, interview_new, interviews, settings,
    your_applications,
};
