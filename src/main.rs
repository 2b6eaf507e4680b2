use arbiscan::cli::{check, run, status, CheckCommands, Cli, Commands};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(args) => run::execute(&cli.config, args).await,
        Commands::Status => status::execute(&cli.config),
        Commands::Check(CheckCommands::Config) => check::execute_config(&cli.config),
        Commands::Check(CheckCommands::Health) => check::execute_health(&cli.config),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
