use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "timetable", version, about = "Course timetable builder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Course catalog: import, fetch and browse offerings
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Selected offerings
    Select {
        #[command(subcommand)]
        action: commands::select::SelectAction,
    },
    /// Offerings that fit free days, free times and the current selection
    Filter(commands::filter::FilterArgs),
    /// Weekly timetable of the selection
    Grid(commands::grid::GridArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

/// Log to stderr so stdout stays parseable. Level comes from TIMETABLE_LOG.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("TIMETABLE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Catalog { action } => commands::catalog::run(action),
        Commands::Select { action } => commands::select::run(action),
        Commands::Filter(args) => commands::filter::run(args),
        Commands::Grid(args) => commands::grid::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "timetable", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
