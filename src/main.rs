use std::fs::{self, File};
use std::path::PathBuf;

use clap::Parser;
use qcalc::core::config::{self, CliOverrides, QcalcConfig};
use qcalc::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "qcalc", about = "Desk calculator with a hidden virtual machine launcher")]
struct Args {
    /// Config file to read instead of ~/.qcalc/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Decimal separator, overrides config and QCALC_DECIMAL_SEPARATOR
    #[arg(short, long)]
    separator: Option<String>,

    /// VM settings JSON file, overrides config and QCALC_VM_SETTINGS
    #[arg(long)]
    vm_settings: Option<PathBuf>,

    /// Log level written to qcalc.log
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Log next to the config file, falling back to the current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let log_path = config::config_dir()
        .filter(|dir| fs::create_dir_all(dir).is_ok())
        .map(|dir| dir.join("qcalc.log"))
        .unwrap_or_else(|| PathBuf::from("qcalc.log"));
    if let Ok(log_file) = File::create(&log_path) {
        let _ = WriteLogger::init(args.log_level, log_config, log_file);
    }

    log::info!("qcalc starting up (log: {})", log_path.display());

    let loaded = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    let file_config = loaded.unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        QcalcConfig::default()
    });

    let resolved = config::resolve(
        &file_config,
        CliOverrides {
            decimal_separator: args.separator.as_deref(),
            vm_settings: args.vm_settings.as_deref(),
        },
    );
    log::info!(
        "Decimal separator {:?}, VM settings {}",
        resolved.decimal_separator,
        resolved.vm_settings_path.display()
    );

    tui::run(resolved)
}
