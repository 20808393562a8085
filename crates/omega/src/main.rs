use std::error::Error as StdError;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::info;
use omega_core::kernel::error::Result as KernelResult;
use omega_core::{Application, KernelError, Method, Request};

// --- Core providers, registered statically ---
use core_logging::LoggingProvider;

/// Omega: application kernel command line
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Simple ping command for checking the binary runs
    #[arg(long)]
    ping: bool,

    /// Application base directory
    #[arg(long, global = true, default_value = ".")]
    base_path: PathBuf,

    /// Force the environment name instead of reading APP_ENV
    #[arg(long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the resolved application paths
    Paths,
    /// Load the environment file and print the detected environment
    Env,
    /// Bootstrap the application and dispatch one request
    Request {
        /// HTTP method, e.g. GET
        method: String,
        /// Request target, e.g. /users/7?tab=posts
        target: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS;
    }

    let mut app = Application::new(&args.base_path);
    app.register_provider("core-logging", || Ok(LoggingProvider::new()));
    if let Some(env) = &args.env {
        info!("Environment forced to '{}' from the command line", env);
    }

    let command = args.command.unwrap_or(Commands::Request {
        method: "GET".to_string(),
        target: "/".to_string(),
    });
    let result = match command {
        Commands::Paths => {
            print_paths(&app);
            Ok(())
        }
        Commands::Env => print_environment(&mut app),
        Commands::Request { method, target } => send_request(&mut app, &method, &target).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn print_paths(app: &Application) {
    let paths = [
        ("base", app.base_path("")),
        ("app", app.app_path("")),
        ("bootstrap", app.bootstrap_path("")),
        ("config", app.config_path("")),
        ("database", app.database_path("")),
        ("lang", app.lang_path("")),
        ("public", app.public_path("")),
        ("resources", app.resource_path("")),
        ("routes", app.routes_path("")),
        ("storage", app.storage_path("")),
        ("environment", app.environment_file_path()),
    ];
    for (name, path) in paths {
        println!("{:<12} {}", name, path.display());
    }
}

fn print_environment(app: &mut Application) -> KernelResult<()> {
    app.configure()?;
    println!("{}", app.environment());
    Ok(())
}

async fn send_request(app: &mut Application, method: &str, target: &str) -> KernelResult<()> {
    let method: Method = method.parse()?;
    let response = app.run(&Request::from_target(method, target)).await?;

    println!("HTTP/1.1 {} {}", response.status(), response.reason_phrase());
    for (name, value) in response.headers() {
        println!("{}: {}", name, value);
    }
    println!();
    println!("{}", response.content());
    Ok(())
}

fn report(error: &KernelError) {
    eprintln!("Error: {}", error);
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
}
