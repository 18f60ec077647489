use tracing_subscriber::EnvFilter;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &[
    "tandem",
    "tandem_boost",
    "tandem_calendar",
    "tandem_decompose",
    "tandem_evaluate",
    "tandem_hybrid",
    "tandem_io",
    "tandem_series",
    "tandem_stats",
];

/// Initialize tracing based on CLI verbosity level.
///
/// Mapping:
/// - 0 (none) -> warn
/// - 1 (-v)   -> info
/// - 2 (-vv)  -> debug
/// - 3+ (-vvv)-> trace
///
/// `RUST_LOG` env var overrides the CLI flag if set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_levels() {
        assert!(default_filter(0).starts_with("tandem=warn,"));
        assert!(default_filter(1).contains("tandem_hybrid=info"));
        assert!(default_filter(2).contains("tandem_boost=debug"));
        assert!(default_filter(7).ends_with("tandem_stats=trace"));
    }

    #[test]
    fn filter_covers_every_library_crate() {
        let filter = default_filter(1);
        for krate in [
            "boost", "calendar", "decompose", "evaluate", "hybrid", "io", "series", "stats",
        ] {
            assert!(filter.contains(&format!("tandem_{krate}=info")), "{krate}");
        }
    }
}
