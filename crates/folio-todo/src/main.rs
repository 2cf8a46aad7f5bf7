//! Folio TodoMVC - Entry point

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use folio::config::{ConfigLoader, FolioConfig};
use folio::server::Server;
use folio::telemetry::{init_telemetry, OtelTracer};
use folio_todo::store::TodoStore;

/// Command-line arguments.
struct Args {
    /// Path to configuration file.
    config: Option<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut config = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    config = args.next().map(PathBuf::from);
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("folio-todo {}", folio_todo::VERSION);
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
        }

        Self { config }
    }
}

fn print_help() {
    println!(
        r"Folio TodoMVC - server-rendered todos swapped in by htmx

USAGE:
    folio-todo [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Path to configuration file (TOML or JSON)
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT VARIABLES:
    FOLIO__SERVER__HTTP_ADDR              Listen address (default: 0.0.0.0:1337)
    FOLIO__SERVER__REQUEST_TIMEOUT_MS     Per-request timeout, 0 disables (default: 30000)
    FOLIO__RENDERING__ASSET_DIR           Static asset directory (default: public)
    FOLIO__TELEMETRY__LOGGING__LEVEL      Log filter (default: info)
    FOLIO__TELEMETRY__LOGGING__FORMAT     json, pretty or compact

    A .env file in the working directory is read first.

EXAMPLES:
    # Run with configuration file
    folio-todo --config folio.toml

    # Listen on another port
    FOLIO__SERVER__HTTP_ADDR=127.0.0.1:8080 folio-todo
"
    );
}

fn load_config(path: Option<&Path>) -> Result<FolioConfig, folio::config::ConfigError> {
    let mut loader = ConfigLoader::new().with_defaults().with_dotenv()?;
    if let Some(path) = path {
        loader = loader.with_file(path)?;
    } else {
        loader = loader.with_optional_file("folio.toml")?;
    }
    loader.with_env_prefix("FOLIO").load()
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let _telemetry = match init_telemetry(config.telemetry_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize telemetry: {e}");
            std::process::exit(1);
        }
    };

    info!(version = folio_todo::VERSION, "Starting folio-todo");

    let store = Arc::new(TodoStore::seeded());
    let pipeline = match folio_todo::pipeline(&config, &store, OtelTracer::default()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to build routes: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        addr = %config.server.http_addr,
        assets = %config.rendering.asset_dir,
        "Serving TodoMVC"
    );

    let server = Server::new(folio_todo::server_config(&config), pipeline);
    if let Err(e) = server.run().await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server stopped");
}
