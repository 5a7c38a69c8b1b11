use crate::inspect::{run_inspect, InspectArgs};
use crate::server;
use ats_dashboard::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ats-dashboard",
    about = "Serve and inspect the recruiting operations tables",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP dashboard (default command)
    Serve(ServeArgs),
    /// Print one table, optionally filtered by its search column
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Inspect(args) => run_inspect(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::TableName;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["ats-dashboard"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn inspect_takes_a_table_and_search_term() {
        let cli = Cli::try_parse_from([
            "ats-dashboard",
            "inspect",
            "job-requirements",
            "--search",
            "rust",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Inspect(args)) => {
                assert_eq!(args.table, TableName::JobRequirements);
                assert_eq!(args.search, "rust");
            }
            other => panic!("expected inspect, got {other:?}"),
        }
    }
}
