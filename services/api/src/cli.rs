use crate::reports::{run_password_check, run_review_summary, PasswordCheckArgs, ReviewSummaryArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use dlist::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "dlist",
    about = "Serve and inspect contractor reviews from the command line",
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
    /// Summarize reviews from a CSV or JSON export
    Reviews {
        #[command(subcommand)]
        command: ReviewsCommand,
    },
    /// Check a password against the sign-up rules
    Password {
        #[command(subcommand)]
        command: PasswordCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ReviewsCommand {
    /// Print pooled scores per subject, or the full details of one subject
    Summary(ReviewSummaryArgs),
}

#[derive(Subcommand, Debug)]
enum PasswordCommand {
    /// Show the strength meter and policy result for a password
    Check(PasswordCheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Review export (CSV or JSON) used to seed the in-memory store
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Reviews {
            command: ReviewsCommand::Summary(args),
        } => run_review_summary(args),
        Command::Password {
            command: PasswordCommand::Check(args),
        } => {
            run_password_check(args);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["dlist"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_review_summary_flags() {
        let cli = Cli::try_parse_from([
            "dlist",
            "reviews",
            "summary",
            "--input",
            "reviews.json",
            "--subject",
            "h-1",
            "--latest",
            "3",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Reviews {
                command: ReviewsCommand::Summary(args),
            }) => {
                assert_eq!(args.input, PathBuf::from("reviews.json"));
                assert_eq!(args.subject.as_deref(), Some("h-1"));
                assert_eq!(args.latest, Some(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_serve_seed() {
        let cli = Cli::try_parse_from(["dlist", "serve", "--port", "9090", "--seed", "seed.csv"])
            .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(9090));
                assert_eq!(args.seed, Some(PathBuf::from("seed.csv")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
