use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Inicializuje tracing subscriber. Diagnostika jde výhradně na stderr,
/// stdout patří protokolu harnessu.
pub fn init(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    // druhý init (např. v testech) jen tiše ignorujeme
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        // escape kódy jen do terminálu, ne do zachyceného stderr
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

#[macro_export]
macro_rules! log_anyhow_with_source {
    ($err:expr, $($rest:tt)+) => {{
        let err: &anyhow::Error = &$err;

        // root cause, např. "Broken pipe (os error 32)"
        let root = err.root_cause();

        ::tracing::error!(
            error = %err,
            root_cause = %root,
            $($rest)+
        );
    }};
}

#[macro_export]
macro_rules! log_error_display {
    ($err:expr, $($rest:tt)+) => {{
        ::tracing::error!(
            error = %$err,
            $($rest)+
        );
    }};
}
