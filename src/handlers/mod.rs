// handlers/mod.rs - Page and auth handlers
//
// Every route sits behind the route guard middleware; the split below only
// records what the guard is expected to do for each group:
// Public (always reachable) and Protected (guard redirects when signed out)

pub mod protected; // Protected pages: /dashboard, /applications, ...
pub mod public; // Landing, login/register pages, /auth/* flows
