use crate::config::LogFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "osm_extractor=info,tower_http=info";

fn build_filter(configured: Option<&str>, verbose: bool) -> EnvFilter {
    // RUST_LOG 優先，其次是設定檔
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("osm_extractor=debug,tower_http=debug,info")
        } else {
            EnvFilter::new(configured.unwrap_or(DEFAULT_FILTER))
        }
    })
}

pub fn init_logger(format: LogFormat, configured_filter: Option<&str>, verbose: bool) {
    let filter = build_filter(configured_filter, verbose);

    match format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(), // 方便集中式日誌收集
            )
            .init(),
    }
}
