//! Session state: the source seam, the client-side auth object and the cache
//! that the route guard reads.

pub mod cache;
pub mod client;
pub mod error;
pub mod source;
pub mod types;

pub use cache::{SessionCache, SessionCacheEntry};
pub use client::AuthClient;
pub use error::SessionError;
pub use source::{AuthBroadcaster, SessionSource, Subscription};
pub use types::{AuthChange, AuthEvent, Session, User};
