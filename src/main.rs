// src/main.rs
use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;
use std::sync::{Arc, atomic::{AtomicBool, Ordering}};

use rust_passkeeper::cli::{self, Args};
use rust_passkeeper::core::config::Config;
use rust_passkeeper::logging;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    if Path::new(".env").exists() {
        dotenvy::dotenv().ok();
    }

    let args = Args::parse();
    let config = Config::load();

    if let Err(e) = logging::init(&config) {
        eprintln!("⚠️ Logging disabled: {}", e);
    }

    log::info!("🔒 Starting rust_passkeeper");
    log::debug!("Loaded config: {:?}", config);

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, config: Config) -> Result<(), Box<dyn Error>> {
    let db_url = args.db.clone().unwrap_or_else(|| config.database_url.clone());

    if let Some(command) = args.command {
        return cli::handlers::run_command(command, &config, &db_url, args.json).await;
    }

    let vault = match cli::handlers::open_vault(&config, &db_url).await {
        Ok(vault) => vault,
        Err(e) => {
            eprintln!("❌ Database connection failed: {e}");
            eprintln!("Troubleshooting:");
            eprintln!("• Does the directory for the database file exist and is it writable?");
            eprintln!("• Use --db or set DATABASE_URL in `.env` (e.g. sqlite:./passkeeper.db)");
            return Err(e);
        }
    };

    let should_exit = Arc::new(AtomicBool::new(false));
    {
        let should_exit = Arc::clone(&should_exit);
        ctrlc::set_handler(move || {
            log::info!("🔴 Ctrl+C received. Initiating shutdown...");
            should_exit.store(true, Ordering::SeqCst);
        })?;
    }

    cli::menu::run_cli_menu(vault, should_exit).await?;

    log::info!("✅ rust_passkeeper shutdown complete.");
    Ok(())
}
