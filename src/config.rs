//! Application configuration, read from the environment exactly once at
//! startup and threaded through the router as `Extension<Arc<AppConfig>>`.

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub database_url: Option<String>,
    /// Comma-separated CORS allow-list; empty means the dev defaults.
    pub allowed_origins: Vec<String>,
    /// Actor id attached to records created from admin forms when the form
    /// itself does not carry one. Optional here; the form layer treats its
    /// absence as a configuration error at submit time.
    pub default_actor_id: Option<String>,
    // Site metadata for the RSS feed.
    pub site_url: String,
    pub site_title: String,
    pub site_description: String,
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty())
            .or_else(|| non_empty("FRONTEND_ORIGIN").map(|o| vec![o]))
            .unwrap_or_default();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3001),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            database_url: non_empty("DATABASE_URL"),
            allowed_origins,
            default_actor_id: non_empty("DEFAULT_ACTOR_ID"),
            site_url: std::env::var("SITE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            site_title: std::env::var("SITE_TITLE")
                .unwrap_or_else(|_| "Studio Journal".to_string()),
            site_description: std::env::var("SITE_DESCRIPTION")
                .unwrap_or_else(|_| "Articles and project notes from the studio".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            environment: "development".to_string(),
            database_url: None,
            allowed_origins: Vec::new(),
            default_actor_id: None,
            site_url: "http://localhost:3000".to_string(),
            site_title: "Studio Journal".to_string(),
            site_description: "Articles and project notes from the studio".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_development() {
        let config = AppConfig::default();
        assert!(!config.is_production());
        assert_eq!(config.port, 3001);
        assert!(config.default_actor_id.is_none());
    }

    #[test]
    fn test_from_env_has_usable_defaults() {
        let config = AppConfig::from_env();
        assert!(!config.host.is_empty());
        assert!(config.port > 0);
        assert!(!config.site_url.is_empty());
    }
}
