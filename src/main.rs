use clap::Parser;
use osm_extractor::utils::{logger, validation::Validate};
use osm_extractor::{CliArgs, ServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let mut config = match ServiceConfig::from_file_or_default(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config.display(), e);
            eprintln!("💡 Make sure the file is valid TOML");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    args.apply_overrides(&mut config);

    // 初始化日誌
    logger::init_logger(config.logging.format, config.logging.filter.as_deref(), args.verbose);

    tracing::info!("Starting osm-extractor v{}", env!("CARGO_PKG_VERSION"));
    if args.verbose {
        tracing::debug!("Service config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if args.check {
        display_config_summary(&config);
        return Ok(());
    }

    osm_extractor::serve(config).await
}

fn display_config_summary(config: &ServiceConfig) {
    println!("📋 Configuration Summary:");
    println!("  Listen: {}:{}", config.server.host, config.server.port);
    println!("  Max body: {} bytes", config.server.max_body_bytes);
    println!("  Dataset: {}", config.extract.dataset_path.display());
    println!("  gol: {}", config.extract.gol_path.display());
    println!("  osmium: {}", config.extract.osmium_path.display());
    println!("  Max area: {} m^2", config.extract.max_area_m2);
    println!(
        "  Workspaces: {}/{}*",
        config.extract.workspace_root().display(),
        config.extract.workspace_prefix
    );
    println!("  Audit log: {}", config.audit.log_path.display());
    println!();
    println!("✅ Configuration is valid.");
}
