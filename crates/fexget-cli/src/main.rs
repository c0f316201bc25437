//! CLI entry point.

use clap::Parser;
use fexget_cli::{install, list, Cli, Commands, InstallArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        // No command provided - show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Install {
            catalog,
            dest,
            check_updates,
            no_bookmarks,
        } => {
            install(InstallArgs {
                catalog,
                dest,
                check_updates,
                bookmarks: !no_bookmarks,
            })
            .await?;
        }
        Commands::List { catalog } => {
            list(catalog.as_deref())?;
        }
    }

    Ok(())
}
