//! Preflight entry point: prepares the data directory, migrates the
//! database, and reports whether the speech and LLM dependencies are ready.
//! The desktop shell embeds the library; this binary exists for setup and
//! diagnostics.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use clinscribe::crypto::SecretKey;
use clinscribe::llm::Generator;
use clinscribe::{codes, config, db};

#[derive(Parser, Debug)]
#[command(name = "clinscribe", version, about = "Local clinical documentation assistant preflight")]
struct Args {
    /// Data directory (defaults to ~/ClinScribe)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Probe the configured LLM endpoint and report available models
    #[arg(long)]
    check_endpoint: bool,
}

fn main() -> ExitCode {
    clinscribe::init_tracing();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Preflight failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);

    let data_dir = args.data_dir.unwrap_or_else(config::app_data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let config_path = data_dir.join("config.json");
    let settings = config::AppConfig::load(&config_path)?;

    let key_path = data_dir.join("clinscribe.key");
    SecretKey::load_or_create(&key_path)?;

    let db_path = data_dir.join("clinscribe.db");
    let conn = db::open_database(&db_path)?;
    let version = db::get_current_version(&conn);

    println!("{} v{}", config::APP_NAME, config::APP_VERSION);
    println!("  data dir    : {}", data_dir.display());
    println!("  database    : {} (schema v{version})", db_path.display());
    println!("  key file    : {}", key_path.display());
    println!("  ICD-10 codes: {} loaded", codes::all().len());
    println!("  clinic      : {}", settings.clinic_name);
    println!("  whisper     : {} model configured", settings.whisper_model);

    if args.check_endpoint {
        let generator = Generator::local(&settings.endpoint_url, &settings.model_name);
        if generator.endpoint_available() {
            println!(
                "  endpoint    : {} reachable (model {})",
                settings.endpoint_url, settings.model_name
            );
        } else {
            println!(
                "  endpoint    : {} NOT reachable; note generation will be unavailable",
                settings.endpoint_url
            );
        }
    }

    Ok(())
}
