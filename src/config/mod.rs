pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{
    AppConfig, AuthConfig, DatabaseConfig, GeneralConfig, LoggingConfig, NotificationConfig,
};
pub use envconfig::{ENV_PREFIX, load_dotenv};
