use clap::Parser;
use pinauth::cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    // Diagnostics go to stderr; PINAUTH_LOG=debug for the full trace.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("PINAUTH_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List => pinauth::cli::commands::list::execute(&cli),
        Commands::Add { update, ref user } => {
            pinauth::cli::commands::add::execute(&cli, user, update)
        }
        Commands::Remove { ref user, force } => {
            pinauth::cli::commands::remove::execute(&cli, user, force)
        }
        Commands::Check { ref user } => pinauth::cli::commands::check::execute(&cli, user),
        Commands::Reset { ref user } => pinauth::cli::commands::reset::execute(&cli, user),
        Commands::Authenticate { ref user } => {
            pinauth::cli::commands::authenticate::execute(&cli, user)
        }
        Commands::Audit { last, ref since } => {
            pinauth::cli::commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Version => pinauth::cli::commands::version::execute(&cli),
        Commands::Completions { shell } => pinauth::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        pinauth::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
