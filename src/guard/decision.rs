use axum::http::HeaderValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::route::{normalize_path, RouteClass, RouteTable};
use crate::config::GuardConfig;
use crate::session::{AuthEvent, SessionCacheEntry};

/// Query parameter carrying the page to return to after sign-in
pub const REDIRECT_PARAM: &str = "redirect";
/// Query parameter carrying why the user landed on the login page
pub const ERROR_PARAM: &str = "error";

/// Authentication state as far as the guard is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardState {
    Loading,
    Unauthenticated,
    Authenticated,
}

impl GuardState {
    /// An expired session counts as no session
    pub fn from_entry(entry: &SessionCacheEntry, now: DateTime<Utc>) -> Self {
        if entry.is_loading {
            return GuardState::Loading;
        }
        match &entry.session {
            Some(session) if !session.is_expired_at(now) => GuardState::Authenticated,
            _ => GuardState::Unauthenticated,
        }
    }
}

/// Shown on the login page when the guard sent the user there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginReason {
    SignedOut,
    SessionExpired,
}

impl LoginReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginReason::SignedOut => "signed_out",
            LoginReason::SessionExpired => "session_expired",
        }
    }

    /// Why an unauthenticated entry is unauthenticated, when that is worth telling the user
    pub fn from_entry(entry: &SessionCacheEntry, now: DateTime<Utc>) -> Option<Self> {
        match &entry.session {
            Some(session) if session.is_expired_at(now) => Some(LoginReason::SessionExpired),
            None if entry.last_event == Some(AuthEvent::SignedOut) => Some(LoginReason::SignedOut),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    Allow,
    RedirectToLogin {
        return_path: String,
        reason: Option<LoginReason>,
    },
    RedirectToDefault,
}

impl GuardDecision {
    pub fn is_redirect(&self) -> bool {
        !matches!(self, GuardDecision::Allow)
    }

    /// Attach a login reason; leaves other decisions untouched
    pub fn with_reason(self, reason: Option<LoginReason>) -> Self {
        match self {
            GuardDecision::RedirectToLogin { return_path, .. } => GuardDecision::RedirectToLogin { return_path, reason },
            other => other,
        }
    }
}

/// The decision table. Pure: no clock, no I/O.
///
/// | state           | public | auth-only       | protected        |
/// |-----------------|--------|-----------------|------------------|
/// | loading         | allow  | allow           | allow            |
/// | unauthenticated | allow  | allow           | login(path)      |
/// | authenticated   | allow  | default         | allow            |
pub fn decide(state: GuardState, class: RouteClass, path: &str) -> GuardDecision {
    match (state, class) {
        (GuardState::Loading, _) => GuardDecision::Allow,
        (GuardState::Unauthenticated, RouteClass::Protected) => GuardDecision::RedirectToLogin {
            return_path: normalize_path(path),
            reason: None,
        },
        (GuardState::Authenticated, RouteClass::AuthOnly) => GuardDecision::RedirectToDefault,
        _ => GuardDecision::Allow,
    }
}

/// Route table plus redirect targets; the single entry point for every call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    routes: RouteTable,
    login_path: String,
    default_path: String,
}

impl Default for Guard {
    fn default() -> Self {
        Self::from_config(&GuardConfig::default())
    }
}

impl Guard {
    pub fn new(routes: RouteTable, login_path: impl Into<String>, default_path: impl Into<String>) -> Self {
        Self {
            routes,
            login_path: normalize_path(&login_path.into()),
            default_path: normalize_path(&default_path.into()),
        }
    }

    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new(RouteTable::from_config(config), &config.login_path, &config.default_path)
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn default_path(&self) -> &str {
        &self.default_path
    }

    pub fn classify(&self, path: &str) -> RouteClass {
        self.routes.classify(path)
    }

    pub fn evaluate(&self, entry: &SessionCacheEntry, path: &str) -> GuardDecision {
        self.evaluate_at(entry, path, Utc::now())
    }

    pub fn evaluate_at(&self, entry: &SessionCacheEntry, path: &str, now: DateTime<Utc>) -> GuardDecision {
        let path = normalize_path(path);
        let class = self.routes.classify(&path);
        let state = GuardState::from_entry(entry, now);
        let decision = decide(state, class, &path).with_reason(LoginReason::from_entry(entry, now));

        tracing::debug!(%path, %class, ?state, ?decision, "guard evaluated");
        decision
    }

    /// Navigation target for a decision; `None` means stay
    pub fn location(&self, decision: &GuardDecision) -> Option<String> {
        match decision {
            GuardDecision::Allow => None,
            GuardDecision::RedirectToLogin { return_path, reason } => {
                Some(self.login_url(Some(return_path), *reason))
            }
            GuardDecision::RedirectToDefault => Some(self.default_path.clone()),
        }
    }

    /// Login URL with the percent-encoded return path and optional reason
    pub fn login_url(&self, return_path: Option<&str>, reason: Option<LoginReason>) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(path) = return_path {
            query.append_pair(REDIRECT_PARAM, path);
        }
        if let Some(reason) = reason {
            query.append_pair(ERROR_PARAM, reason.as_str());
        }

        let query = query.finish();
        if query.is_empty() {
            self.login_path.clone()
        } else {
            format!("{}?{}", self.login_path, query)
        }
    }

    /// Where to go after a successful sign-in.
    ///
    /// Honors the `redirect` parameter only for same-origin paths that would not
    /// bounce straight back to an auth-only page; everything else lands on the
    /// default page.
    pub fn post_login_target(&self, redirect: Option<&str>) -> String {
        let Some(raw) = redirect.map(str::trim).filter(|r| !r.is_empty()) else {
            return self.default_path.clone();
        };

        // Browsers drop tab/CR/LF while parsing, so "/\t/host" would become "//host"
        if raw.chars().any(char::is_control) || HeaderValue::from_str(raw).is_err() {
            tracing::warn!(redirect = ?raw, "ignoring redirect target that is not a clean header value");
            return self.default_path.clone();
        }

        if !raw.starts_with('/') || raw.starts_with("//") || raw.contains('\\') {
            tracing::warn!(redirect = raw, "ignoring off-site redirect target");
            return self.default_path.clone();
        }

        let path = normalize_path(raw);
        if self.routes.classify(&path) == RouteClass::AuthOnly {
            return self.default_path.clone();
        }
        path
    }
}

/// Read the `redirect` parameter out of a query string
pub fn redirect_param(query: &str) -> Option<String> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == REDIRECT_PARAM)
        .map(|(_, value)| value.into_owned())
}
