use crate::commands::{run_chat, run_export, run_overview, run_score, ChatArgs, ExportArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use risk_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Project Risk Desk",
    about = "Serve the project risk API or query the portfolio from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Ask the risk assistant a question about the portfolio
    Chat(ChatArgs),
    /// Score a list of risk levels without storing anything
    Score(ScoreArgs),
    /// Print portfolio risk metrics and per-project scores
    Overview,
    /// Write the risk register as CSV
    Export(ExportArgs),
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
        Command::Chat(args) => run_chat(args),
        Command::Score(args) => {
            run_score(args);
            Ok(())
        }
        Command::Overview => run_overview(),
        Command::Export(args) => run_export(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_desk::portfolio::RiskLevel;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["risk-desk-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn score_accepts_case_insensitive_levels() {
        let cli = Cli::try_parse_from(["risk-desk-api", "score", "low", "CRITICAL"])
            .expect("parses");
        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.levels, vec![RiskLevel::Low, RiskLevel::Critical])
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn score_rejects_unknown_levels() {
        assert!(Cli::try_parse_from(["risk-desk-api", "score", "severe"]).is_err());
    }

    #[test]
    fn chat_joins_message_words() {
        let cli = Cli::try_parse_from(["risk-desk-api", "chat", "risk", "summary"])
            .expect("parses");
        match cli.command {
            Some(Command::Chat(args)) => assert_eq!(args.message(), "risk summary"),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
