use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. A normal run stays silent below warnings.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "septa_bids=debug,info"
    } else {
        "septa_bids=warn"
    }
}

/// Logs go to stderr so stdout only carries the run's diagnostics.
pub fn init_cli_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_by_default() {
        assert_eq!(default_directives(false), "septa_bids=warn");
        assert!(EnvFilter::try_new(default_directives(false)).is_ok());
    }

    #[test]
    fn test_verbose_enables_debug() {
        assert_eq!(default_directives(true), "septa_bids=debug,info");
        assert!(EnvFilter::try_new(default_directives(true)).is_ok());
    }
}
