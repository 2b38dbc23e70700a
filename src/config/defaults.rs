// Server
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";

// Record store
pub const DEFAULT_DATABASE_URL: &str = "sqlite://hermes_hr.db?mode=rwc";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_MIN_IDLE: u32 = 2;

// Sessions and the seeded administrator
pub const DEFAULT_SESSION_TTL_MINUTES: u64 = 300;
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

// Notification delivery
pub const DEFAULT_NOTIFICATION_QUEUE_SIZE: usize = 256;
pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 20;
