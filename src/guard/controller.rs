use tokio::sync::watch;

use super::decision::{Guard, GuardDecision};
use super::route::normalize_path;
use crate::session::SessionCacheEntry;

/// Performs client-side navigation
pub trait Navigator {
    fn navigate(&mut self, target: &str);
}

/// A router modelled as a watched "current location" channel
impl Navigator for watch::Sender<String> {
    fn navigate(&mut self, target: &str) {
        self.send_replace(target.to_string());
    }
}

/// What the view should show for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    /// Session still resolving: placeholder, no redirect yet
    Loading,
    Content,
    /// A redirect is in flight; show nothing so protected content never flashes
    Nothing,
}

/// Client-side guard: re-evaluates on every route and session change and
/// issues at most one navigation per distinct (path, decision) pair.
pub struct GuardController<N> {
    guard: Guard,
    navigator: N,
    path: String,
    entry: SessionCacheEntry,
    issued: Option<(String, GuardDecision)>,
    render: Render,
}

impl<N: Navigator> GuardController<N> {
    pub fn new(guard: Guard, navigator: N) -> Self {
        Self {
            guard,
            navigator,
            path: "/".to_string(),
            entry: SessionCacheEntry::loading(),
            issued: None,
            render: Render::Loading,
        }
    }

    pub fn on_route_change(&mut self, path: &str) -> Render {
        self.path = normalize_path(path);
        self.reevaluate()
    }

    pub fn on_session_change(&mut self, entry: SessionCacheEntry) -> Render {
        self.entry = entry;
        self.reevaluate()
    }

    pub fn render(&self) -> Render {
        self.render
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    fn reevaluate(&mut self) -> Render {
        let decision = self.guard.evaluate(&self.entry, &self.path);

        self.render = match self.guard.location(&decision) {
            None => {
                self.issued = None;
                if self.entry.is_loading {
                    Render::Loading
                } else {
                    Render::Content
                }
            }
            Some(target) => {
                let key = (self.path.clone(), decision);
                if self.issued.as_ref() == Some(&key) {
                    tracing::debug!(path = %self.path, "redirect already issued, skipping");
                } else {
                    tracing::info!(from = %self.path, to = %target, "guard redirect");
                    self.navigator.navigate(&target);
                    self.issued = Some(key);
                }
                Render::Nothing
            }
        };
        self.render
    }

    /// Follow both the session cache and the router until either side closes
    pub async fn run(
        mut self,
        mut sessions: watch::Receiver<SessionCacheEntry>,
        mut routes: watch::Receiver<String>,
    ) -> Self {
        self.entry = sessions.borrow_and_update().clone();
        let path = routes.borrow_and_update().clone();
        self.on_route_change(&path);

        loop {
            // Pending navigations settle before a closed session channel stops the loop
            tokio::select! {
                biased;
                changed = routes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let path = routes.borrow_and_update().clone();
                    self.on_route_change(&path);
                }
                changed = sessions.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let entry = sessions.borrow_and_update().clone();
                    self.on_session_change(entry);
                }
            }
        }

        tracing::debug!("guard controller stopped");
        self
    }
}
