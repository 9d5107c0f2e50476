use clap::Parser;
use profrun::cli::{check, run, CheckCommand, Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Check(CheckCommand::Config(arg)) => {
            check::execute_config(arg.settings.as_deref()).map(|()| 0)
        }
        Commands::Check(CheckCommand::Health(arg)) => {
            check::execute_health(arg.settings.as_deref()).await.map(|()| 0)
        }
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            profrun::cli::output::error(&format!("Error: {e}"));
            std::process::exit(1);
        }
    }
}
