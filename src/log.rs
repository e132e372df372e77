use tracing_subscriber::{fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Debug output with `-v`, silent otherwise. `RUST_LOG` wins over both.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "dre=debug" } else { "off" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
