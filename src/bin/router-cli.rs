use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use mini_router::cli::{list_tasks, run_task, CliInvocation};
use mini_router::config::{load_config, AppConfig};
use mini_router::endpoints::builtin_registry;
use mini_router::observability::logging::init_logging;
use mini_router::routing::TypeOracle;

#[derive(Parser)]
#[command(name = "router-cli")]
#[command(about = "Run convention-routed tasks from the command line", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the routes offered by the task type as JSON instead of running it.
    #[arg(short, long)]
    list: bool,

    /// Accept more parameters than the task declares.
    #[arg(long)]
    lenient: bool,

    /// Task path, e.g. `hello/Ann`.
    #[arg(default_value = "")]
    path: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };
    init_logging(&config.observability);

    let registry: Arc<dyn TypeOracle> = match builtin_registry() {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.list {
        return match list_tasks(&config.router, registry, &cli.path) {
            Ok(Some(routes)) => match serde_json::to_string_pretty(&routes) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    ExitCode::FAILURE
                }
            },
            Ok(None) => {
                eprintln!("Error: no task at {:?}", cli.path);
                ExitCode::from(2)
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let strict = config.router.strict_params && !cli.lenient;
    match run_task(&config.router, registry, &CliInvocation::new(cli.path), strict) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            let code = u8::try_from(e.kind().exit_code()).unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
