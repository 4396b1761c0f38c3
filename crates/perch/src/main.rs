mod commands;

use clap::{Parser, Subcommand};
use tracing::warn;

#[derive(Parser)]
#[command(
    name = "perch",
    version,
    about = "Keeps an application window perched on the desktop like a widget"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Turn a running window into a desktop widget
    Attach(commands::attach::AttachArgs),
    /// Open a frameless demo window and perch it on the desktop
    Demo(commands::demo::DemoArgs),
    /// Debugging and inspection tools
    Debug {
        #[command(subcommand)]
        command: DebugCommands,
    },
}

#[derive(Subcommand)]
enum DebugCommands {
    /// List top-level windows and the desktop icon container
    List,
    /// Watch foreground changes and how the monitor classifies them
    Foreground,
}

fn main() {
    let cli = Cli::parse();

    let (config, config_error) = perch_core::config::load();
    perch_core::log::init(&config.logging);
    if let Some(e) = config_error {
        warn!(error = %e, "using default configuration");
    }

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Attach(args) => commands::attach::execute(&args, &config),
        Commands::Demo(args) => commands::demo::execute(&args, &config),
        Commands::Debug { command } => match command {
            DebugCommands::List => commands::debug::list::execute(),
            DebugCommands::Foreground => commands::debug::foreground::execute(&config),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
