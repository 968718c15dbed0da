use super::{LogFormat, ServiceConfig};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "osm-extractor")]
#[command(about = "Serve bounded OpenStreetMap extracts for a GeoJSON polygon")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "osm-extractor.toml")]
    pub config: PathBuf,

    /// Override the listening port
    #[arg(long)]
    pub port: Option<u16>,

    /// Override the gol dataset index path
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Validate the configuration, print a summary and exit
    #[arg(long)]
    pub check: bool,
}

impl CliArgs {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut ServiceConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dataset) = &self.dataset {
            config.extract.dataset_path = dataset.clone();
        }
        if self.json_logs {
            config.logging.format = LogFormat::Json;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let args = CliArgs::parse_from([
            "osm-extractor",
            "--port",
            "8081",
            "--dataset",
            "/srv/planet.gol",
            "--json-logs",
        ]);
        let mut config = ServiceConfig::default();

        args.apply_overrides(&mut config);

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.extract.dataset_path, PathBuf::from("/srv/planet.gol"));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = CliArgs::parse_from(["osm-extractor"]);
        let mut config = ServiceConfig::default();

        args.apply_overrides(&mut config);

        assert_eq!(config.server.port, 3000);
        assert_eq!(args.config, PathBuf::from("osm-extractor.toml"));
        assert!(!args.check);
    }
}
