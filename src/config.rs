use std::env;
use std::time::Duration;

// Browser Identity (Desktop Mode)
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
pub const WINDOW_SIZE: (u32, u32) = (1280, 720);

// --- Directory Configuration ---
pub const RESULTS_DIR: &str = "./test-results";
pub const DEMO_EVIDENCE_PNG: &str = "./test-results/login-demo-evidence.png";
pub const FAIL_EVIDENCE_PNG: &str = "./test-results/login-fail-evidence.png";

// --- Defaults ---
pub const DEFAULT_BASE_URL: &str = "https://vinhdev.pro.vn";
pub const DEFAULT_EMAIL: &str = "gin_vn@haldata.net";
pub const DEFAULT_PASSWORD: &str = "Abc@123456";
pub const DEFAULT_SUITES: &str = "login,dashboard";

const CREDENTIAL_VARS: [&str; 2] = ["TEST_EMAIL", "TEST_PASSWORD"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// True only when both values came from the environment.
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Urls {
    pub login: String,
    pub dashboard: String,
    pub home: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub navigation: Duration,
    pub element_visible: Duration,
    pub page_load: Duration,
    pub network_idle: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_millis(10_000),
            element_visible: Duration::from_millis(5_000),
            page_load: Duration::from_millis(15_000),
            network_idle: Duration::from_millis(30_000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Staging,
    Development,
    Unspecified,
}

impl Environment {
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("production") => Environment::Production,
            Some("staging") => Environment::Staging,
            Some("development") => Environment::Development,
            _ => Environment::Unspecified,
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSettings {
    pub headless: bool,
    pub slow_mo: Duration,
    pub chrome_path: Option<String>,
}

/// Process-wide settings, read once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub urls: Urls,
    pub timeouts: Timeouts,
    pub environment: Environment,
    pub browser: BrowserSettings,
    pub credentials: Credentials,
    pub suites: Vec<String>,
    pub workers: usize,
    /// Print every poll tick.
    pub verbose: bool,
    missing: Vec<&'static str>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset.
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let base_url = var("BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let urls = Urls {
            login: format!("{}/login", base_url),
            dashboard: format!("{}/dashboard", base_url),
            home: base_url.clone(),
        };

        let slow_mo_ms = var("SLOW_MO")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0);

        let browser = BrowserSettings {
            headless: var("HEADLESS").as_deref() != Some("false"),
            slow_mo: Duration::from_millis(slow_mo_ms),
            chrome_path: var("CHROME_PATH"),
        };

        let email = var("TEST_EMAIL");
        let password = var("TEST_PASSWORD");
        let credentials = Credentials {
            is_valid: email.is_some() && password.is_some(),
            email: email.unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
            password: password.unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
        };

        let missing = CREDENTIAL_VARS
            .iter()
            .copied()
            .filter(|key| var(*key).is_none())
            .collect();

        let suites = var("E2E_SUITES")
            .unwrap_or_else(|| DEFAULT_SUITES.to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let workers = var("E2E_WORKERS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(1);

        Self {
            base_url,
            urls,
            timeouts: Timeouts::default(),
            environment: Environment::parse(var("NODE_ENV").as_deref()),
            browser,
            credentials,
            suites,
            workers,
            verbose: var("E2E_VERBOSE").as_deref() == Some("true"),
            missing,
        }
    }

    /// Credential variables that were not supplied.
    pub fn missing_credentials(&self) -> &[&'static str] {
        &self.missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_with(&[]);

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.urls.login, "https://vinhdev.pro.vn/login");
        assert_eq!(config.urls.dashboard, "https://vinhdev.pro.vn/dashboard");
        assert_eq!(config.urls.home, DEFAULT_BASE_URL);
        assert!(config.browser.headless);
        assert_eq!(config.browser.slow_mo, Duration::ZERO);
        assert_eq!(config.environment, Environment::Unspecified);
        assert_eq!(config.timeouts.navigation, Duration::from_secs(10));
        assert_eq!(config.timeouts.network_idle, Duration::from_secs(30));
        assert_eq!(config.suites, vec!["login", "dashboard"]);
        assert_eq!(config.workers, 1);
        assert!(!config.verbose);
    }

    #[test]
    fn credentials_fall_back_and_are_flagged_invalid() {
        let config = config_with(&[("TEST_EMAIL", "qa@example.com")]);

        assert_eq!(config.credentials.email, "qa@example.com");
        assert_eq!(config.credentials.password, DEFAULT_PASSWORD);
        assert!(!config.credentials.is_valid);
        assert_eq!(config.missing_credentials(), &["TEST_PASSWORD"]);
    }

    #[test]
    fn credentials_valid_only_when_both_supplied() {
        let config = config_with(&[("TEST_EMAIL", "qa@example.com"), ("TEST_PASSWORD", "s3cret")]);

        assert!(config.credentials.is_valid);
        assert!(config.missing_credentials().is_empty());
    }

    #[test]
    fn empty_values_count_as_missing() {
        let config = config_with(&[("TEST_EMAIL", ""), ("TEST_PASSWORD", "")]);

        assert!(!config.credentials.is_valid);
        assert_eq!(config.credentials.email, DEFAULT_EMAIL);
        assert_eq!(config.missing_credentials(), &["TEST_EMAIL", "TEST_PASSWORD"]);
    }

    #[test]
    fn headless_only_disabled_by_literal_false() {
        assert!(!config_with(&[("HEADLESS", "false")]).browser.headless);
        assert!(config_with(&[("HEADLESS", "0")]).browser.headless);
        assert!(config_with(&[("HEADLESS", "FALSE")]).browser.headless);
    }

    #[test]
    fn slow_mo_parses_or_defaults_to_zero() {
        assert_eq!(config_with(&[("SLOW_MO", "250")]).browser.slow_mo, Duration::from_millis(250));
        assert_eq!(config_with(&[("SLOW_MO", "fast")]).browser.slow_mo, Duration::ZERO);
    }

    #[test]
    fn base_url_drives_page_urls() {
        let config = config_with(&[("BASE_URL", "http://localhost:3000/")]);

        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.urls.login, "http://localhost:3000/login");
        assert_eq!(config.urls.dashboard, "http://localhost:3000/dashboard");
    }

    #[test]
    fn node_env_flags() {
        assert!(config_with(&[("NODE_ENV", "production")]).environment.is_production());
        assert_eq!(config_with(&[("NODE_ENV", "staging")]).environment, Environment::Staging);
        assert_eq!(config_with(&[("NODE_ENV", "development")]).environment, Environment::Development);
        assert!(!config_with(&[("NODE_ENV", "test")]).environment.is_production());
    }

    #[test]
    fn suites_and_workers_from_env() {
        let config = config_with(&[("E2E_SUITES", " Login, demo ,,"), ("E2E_WORKERS", "4")]);
        assert_eq!(config.suites, vec!["login", "demo"]);
        assert_eq!(config.workers, 4);

        assert_eq!(config_with(&[("E2E_WORKERS", "0")]).workers, 1);
    }
}
