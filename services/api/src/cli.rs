use crate::demo::{run_demo, DemoArgs};
use crate::server;
use callboard::error::AppError;
use callboard::workflows::performance::ScoreEngine;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Callboard",
    about = "Run and demonstrate the call-center performance dashboard from the command line",
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
    /// Score one value against a target and print the tier
    Score(ScoreArgs),
    /// Simulate several days of team submissions against an in-memory store
    Demo(DemoArgs),
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

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Achieved value
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) actual: f64,
    /// Goal for the same period; 0 means no target
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) target: f64,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => {
            run_score(args);
            Ok(())
        }
        Command::Demo(args) => run_demo(args),
    }
}

fn run_score(args: ScoreArgs) {
    let status = ScoreEngine::standard().score(args.actual, args.target);
    println!(
        "{} / {} -> {:.1}% {} ({:?})",
        args.actual, args.target, status.percentage, status.label, status.tier
    );
    println!("{}", status.phrase);
}
