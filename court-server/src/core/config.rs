/// Server configuration for the food court node
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | COURT_WORK_DIR | /var/lib/court | Working directory for the database and logs |
/// | COURT_HTTP_PORT | 3000 | HTTP API port |
/// | COURT_ENV | development | Runtime environment |
/// | COURT_DB_FILE | orders.redb | Order database file name (inside the work dir) |
/// | COURT_EVENT_CAPACITY | 256 | Order event broadcast channel capacity |
/// | COURT_LOCK_TIMEOUT_MS | 5000 | Per-order lock acquisition timeout (milliseconds) |
/// | COURT_SEED_DEMO | true | Seed the demo vendor and menu catalog on startup |
///
/// # Example
///
/// ```ignore
/// COURT_WORK_DIR=/data/court COURT_HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the order database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Order database file name, resolved relative to `work_dir`
    pub db_file: String,
    /// Capacity of the order event broadcast channel
    pub event_capacity: usize,
    /// How long a status update may wait on a contended order (milliseconds)
    pub lock_timeout_ms: u64,
    /// Seed the demo vendor and menu catalog on startup
    pub seed_demo: bool,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("COURT_WORK_DIR").unwrap_or_else(|_| "/var/lib/court".into()),
            http_port: std::env::var("COURT_HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("COURT_ENV").unwrap_or_else(|_| "development".into()),
            db_file: std::env::var("COURT_DB_FILE").unwrap_or_else(|_| "orders.redb".into()),
            event_capacity: std::env::var("COURT_EVENT_CAPACITY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(256),
            lock_timeout_ms: std::env::var("COURT_LOCK_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            seed_demo: std::env::var("COURT_SEED_DEMO")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }

    /// Override selected settings
    ///
    /// Mostly used by tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Full path of the order database file
    pub fn db_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join(&self.db_file)
    }

    /// Whether this node runs in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether this node runs in development
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
