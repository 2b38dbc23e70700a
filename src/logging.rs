use std::{backtrace::Backtrace, panic::PanicHookInfo};

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Installs the global subscriber. `RUST_LOG` overrides `logging.rust_log`.
pub fn init_tracing(cfg: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.rust_log));
    fmt().with_env_filter(filter).with_target(false).init();
    std::panic::set_hook(Box::new(log_panic));
}

fn panic_message<'a>(info: &'a PanicHookInfo<'_>) -> &'a str {
    info.payload()
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

fn log_panic(info: &PanicHookInfo<'_>) {
    let message = panic_message(info);
    let backtrace = Backtrace::capture();
    let location = info
        .location()
        .map(ToString::to_string)
        .unwrap_or_else(|| "<unknown>".to_string());

    tracing::error!(
        panic = %message,
        location = %location,
        backtrace = %backtrace,
        "panic"
    );
}
