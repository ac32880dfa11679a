use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub guard: GuardConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub session_cookie: String,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    pub login_path: String,
    pub default_path: String,
    pub callback_prefix: String,
    pub auth_only_paths: Vec<String>,
    pub protected_prefixes: Vec<String>,
    pub excluded_prefixes: Vec<String>,
    /// Upper bound on the initial session fetch. `None` waits forever.
    pub session_fetch_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Some(port) = env::var("ORBIT_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_SESSION_COOKIE") {
            if !v.trim().is_empty() {
                self.security.session_cookie = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("SECURITY_COOKIE_SECURE") {
            self.security.cookie_secure = v.parse().unwrap_or(self.security.cookie_secure);
        }

        // Guard overrides
        if let Ok(v) = env::var("GUARD_LOGIN_PATH") {
            self.guard.login_path = v;
        }
        if let Ok(v) = env::var("GUARD_DEFAULT_PATH") {
            self.guard.default_path = v;
        }
        if let Ok(v) = env::var("GUARD_CALLBACK_PREFIX") {
            self.guard.callback_prefix = v;
        }
        if let Ok(v) = env::var("GUARD_AUTH_ONLY_PATHS") {
            self.guard.auth_only_paths = split_list(&v);
        }
        if let Ok(v) = env::var("GUARD_PROTECTED_PREFIXES") {
            self.guard.protected_prefixes = split_list(&v);
        }
        if let Ok(v) = env::var("GUARD_EXCLUDED_PREFIXES") {
            self.guard.excluded_prefixes = split_list(&v);
        }
        if let Ok(v) = env::var("GUARD_SESSION_FETCH_TIMEOUT_MS") {
            // "0" or "off" disables the bound
            self.guard.session_fetch_timeout_ms = match v.trim() {
                "0" | "off" | "none" => None,
                other => other.parse().ok().or(self.guard.session_fetch_timeout_ms),
            };
        }

        // Backend overrides
        if let Ok(v) = env::var("BACKEND_URL") {
            self.backend.url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("BACKEND_ANON_KEY") {
            self.backend.anon_key = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: "career-orbit-development-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                session_cookie: "orbit-access-token".to_string(),
                cookie_secure: false,
            },
            guard: GuardConfig::default(),
            backend: BackendConfig {
                url: "http://localhost:54321".to_string(),
                anon_key: String::new(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                session_cookie: "orbit-access-token".to_string(),
                cookie_secure: true,
            },
            guard: GuardConfig::default(),
            backend: BackendConfig {
                url: String::new(),
                anon_key: String::new(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                port: 8080,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                session_cookie: "orbit-access-token".to_string(),
                cookie_secure: true,
            },
            guard: GuardConfig {
                session_fetch_timeout_ms: Some(5_000),
                ..GuardConfig::default()
            },
            backend: BackendConfig {
                url: String::new(),
                anon_key: String::new(),
            },
        }
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            default_path: "/dashboard".to_string(),
            callback_prefix: "/auth/callback".to_string(),
            auth_only_paths: vec!["/login".to_string(), "/register".to_string()],
            protected_prefixes: [
                "/dashboard",
                "/applications",
                "/your-applications",
                "/interviews",
                "/analytics",
                "/settings",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            excluded_prefixes: ["/_next", "/static", "/assets", "/favicon.ico", "/robots.txt"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            session_fetch_timeout_ms: Some(10_000),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
