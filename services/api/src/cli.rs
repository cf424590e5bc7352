use crate::commands::{run_apply, run_jobs_list, ApplyArgs, JobsListArgs};
use crate::server;
use careers::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "careers-api",
    about = "Serve the careers mail relay or exercise the job board from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP relay service (default command)
    Serve(ServeArgs),
    /// Inspect the external job board
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },
    /// Fill in and submit an application for an active posting
    Apply(ApplyArgs),
}

#[derive(Subcommand, Debug)]
enum JobsCommand {
    /// Fetch the job board once and print the postings
    List(JobsListArgs),
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
        Command::Jobs {
            command: JobsCommand::List(args),
        } => run_jobs_list(args).await,
        Command::Apply(args) => run_apply(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["careers-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_apply_arguments() {
        let cli = Cli::try_parse_from([
            "careers-api",
            "apply",
            "--job",
            "12",
            "--name",
            "Jane Doe",
            "--email",
            "jane@x.com",
            "--resume",
            "cv.pdf",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Apply(args)) => {
                assert_eq!(args.job, "12");
                assert_eq!(args.message, "");
                assert!(args.resume.is_some());
                assert!(args.endpoint.is_none());
            }
            other => panic!("expected apply command, got {other:?}"),
        }
    }

    #[test]
    fn apply_requires_name_and_email() {
        assert!(Cli::try_parse_from(["careers-api", "apply", "--job", "12"]).is_err());
    }
}
