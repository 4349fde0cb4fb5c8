/// Storage backend for tables and orders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// redb file under `WORK_DIR`
    Redb,
    /// Process memory only (lost on restart)
    Memory,
}

impl std::str::FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redb" => Ok(StorageKind::Redb),
            "memory" | "mem" => Ok(StorageKind::Memory),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | working dir (redb file lives here) |
/// | HTTP_PORT | 3000 | HTTP port |
/// | ENVIRONMENT | development | development / production |
/// | LOG_LEVEL | info | tracing max level |
/// | LOG_DIR | - | daily-rolling log directory |
/// | STORAGE | redb | `redb` or `memory` |
/// | SIMULATOR_ENABLED | true | run the kitchen simulator |
/// | SIMULATOR_TICK_MS | 5000 | simulator tick |
/// | SIMULATOR_ADVANCE_PROBABILITY | 0.3 | preparing→ready / ready→served chance per tick |
/// | PROMO_TABLE_MAX_PERCENT | 60 | CHIEN<N> bound for table promotions |
/// | PROMO_MENU_MAX_PERCENT | 70 | CHIEN<N> bound for menu previews |
/// | AI_BASE_URL | https://generativelanguage.googleapis.com | text generation endpoint |
/// | AI_API_KEY | - | assistant answers with fallback only when unset |
/// | AI_MODEL | gemini-2.5-flash | model name |
/// | AI_TIMEOUT_MS | 15000 | per-attempt timeout |
/// | NOTIFICATION_CAPACITY | 50 | staff notifications kept |
/// | REQUEST_TIMEOUT_MS | 30000 | HTTP request timeout |
///
/// # Example
///
/// ```ignore
/// STORAGE=memory HTTP_PORT=8080 cargo run -p floor-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory
    pub work_dir: String,
    pub http_port: u16,
    /// development | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub storage: StorageKind,

    // === Kitchen simulator ===
    pub simulator_enabled: bool,
    pub simulator_tick_ms: u64,
    pub simulator_advance_probability: f64,

    // === Promotions ===
    pub promo_table_max_percent: u32,
    pub promo_menu_max_percent: u32,

    // === Assistant ===
    pub ai_base_url: String,
    pub ai_api_key: Option<String>,
    pub ai_model: String,
    pub ai_timeout_ms: u64,

    /// Staff notifications kept before the oldest is dropped
    pub notification_capacity: usize,

    /// HTTP request timeout (ms)
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            storage: std::env::var("STORAGE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(StorageKind::Redb),

            simulator_enabled: std::env::var("SIMULATOR_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            simulator_tick_ms: std::env::var("SIMULATOR_TICK_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            simulator_advance_probability: std::env::var("SIMULATOR_ADVANCE_PROBABILITY")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|p| (0.0..=1.0).contains(p))
                .unwrap_or(0.3),

            promo_table_max_percent: std::env::var("PROMO_TABLE_MAX_PERCENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            promo_menu_max_percent: std::env::var("PROMO_MENU_MAX_PERCENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(70),

            ai_base_url: std::env::var("AI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into()),
            ai_api_key: std::env::var("AI_API_KEY").ok().filter(|s| !s.is_empty()),
            ai_model: std::env::var("AI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".into()),
            ai_timeout_ms: std::env::var("AI_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15000),

            notification_capacity: std::env::var("NOTIFICATION_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(50),

            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
        }
    }

    /// In-memory configuration for tests: no simulator, no remote assistant
    pub fn for_tests() -> Self {
        Self {
            work_dir: std::env::temp_dir().to_string_lossy().into_owned(),
            http_port: 0,
            environment: "test".into(),
            log_level: "debug".into(),
            log_dir: None,
            storage: StorageKind::Memory,
            simulator_enabled: false,
            simulator_tick_ms: 5000,
            simulator_advance_probability: 0.3,
            promo_table_max_percent: 60,
            promo_menu_max_percent: 70,
            ai_base_url: "http://127.0.0.1:9".into(),
            ai_api_key: None,
            ai_model: "gemini-2.5-flash".into(),
            ai_timeout_ms: 200,
            notification_capacity: 50,
            request_timeout_ms: 30000,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Path of the redb file holding tables and orders
    pub fn database_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("floor.redb")
    }

    /// Log a warning when the two promotion bounds disagree
    pub fn warn_on_promotion_bound_mismatch(&self) -> bool {
        if self.promo_table_max_percent != self.promo_menu_max_percent {
            tracing::warn!(
                table_max = self.promo_table_max_percent,
                menu_max = self.promo_menu_max_percent,
                "CHIEN<N> promotion bounds differ between table billing and menu preview"
            );
            return true;
        }
        false
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
