use clap::Parser;
use common::config::Validate;
use common::{log, logger};
use irg_site_server::site_config::{CONFIG_FILE_NAME, get_config_manager, write_default_config};
use irg_site_server::web_server::run_web_server;

#[derive(Parser)]
#[command(name = "irg_site_server")]
struct Args {
    /// YAML config file; defaults are used when it does not exist
    #[arg(long, default_value = CONFIG_FILE_NAME)]
    config: String,

    /// Overrides `bind_address` from the config
    #[arg(long)]
    bind: Option<String>,

    /// Overrides `static_files_path` from the config
    #[arg(long)]
    static_dir: Option<String>,

    #[arg(long)]
    use_log_prefix: bool,

    /// Writes a default config file at `--config` (if none exists) and exits
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Site".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    if args.init_config {
        if write_default_config(&args.config)? {
            log!("Wrote default config to {}", args.config);
        } else {
            log!("Config {} already exists, leaving it unchanged", args.config);
        }
        return Ok(());
    }

    let mut config = get_config_manager(&args.config).get_config()?;
    config
        .contact
        .apply_env_overrides(|key| std::env::var(key).ok());
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if let Some(static_dir) = args.static_dir {
        config.static_files_path = static_dir;
    }
    config.validate()?;

    log!("Loaded config from {}", args.config);
    run_web_server(config).await?;

    Ok(())
}
