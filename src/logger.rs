use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::format;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;

/// Custom logger initialization to exclude timestamps but keep colors.
///
/// `RUST_LOG` is honoured; without it the level is `info`, or `debug` when
/// `debug` is set. Records from the `log` macros are picked up as well.
pub fn init_custom_logger(debug: bool) {
    // Empty time formatter that doesn't print anything
    struct EmptyTime;
    impl FormatTime for EmptyTime {
        fn format_time(
            &self,
            _: &mut tracing_subscriber::fmt::format::Writer<'_>,
        ) -> std::fmt::Result {
            Ok(())
        }
    }

    let format = format()
        .with_timer(EmptyTime)
        .with_level(true)
        .with_target(true)
        .with_ansi(true);

    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(level.into())
                        .from_env_lossy(),
                ),
        )
        .init();
}
