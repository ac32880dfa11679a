// handlers/public/auth/mod.rs - Public authentication handlers
//
// Session acquisition and teardown. None of these require a session; the
// route guard treats /auth/callback as always reachable and leaves the POST
// endpoints public.

pub mod callback; // GET /auth/callback - exchange an auth code
pub mod login;    // POST /auth/login - password sign-in
pub mod logout;   // POST /auth/logout - revoke and clear cookie
pub mod register; // POST /auth/register - create an account
pub mod utils;

pub use callback::callback_get;
pub use login::login_post;
pub use logout::logout_post;
pub use register::register_post;
