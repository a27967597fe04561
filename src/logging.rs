use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `info`, or `debug` when
/// `verbose`. Output goes to stderr so stdout carries only the digest.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let default_filter = if verbose {
        "ott_digest=debug,info"
    } else {
        "ott_digest=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}
