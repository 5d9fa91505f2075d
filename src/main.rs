use clap::Parser;
use homework_helper::app::terminal::{self, TerminalPresenter};
use homework_helper::app::web;
use homework_helper::utils::error::{ErrorSeverity, HelperError};
use homework_helper::utils::{logger, validation::Validate};
use homework_helper::{build_helper, AppConfig, CliConfig, Command, TomlConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    match &cli.command {
        Command::Serve { .. } => logger::init_server_logger(cli.verbose),
        Command::Explain { .. } => logger::init_cli_logger(cli.verbose),
    }

    tracing::info!("Starting homework-helper");

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ homework-helper failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: CliConfig) -> Result<(), HelperError> {
    let file = match &cli.config {
        Some(path) => {
            tracing::debug!("Loading config file {}", path.display());
            Some(TomlConfig::from_file(path)?)
        }
        None => None,
    };

    let config = AppConfig::resolve(file.as_ref(), &cli.overrides())?;
    config.validate()?;
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    let helper = build_helper(&config)?;

    match cli.command {
        Command::Explain { image } => {
            let image = terminal::load_image(&image).await?;
            let mut presenter = TerminalPresenter::new(std::io::stdout());
            helper.explain_image(image, &mut presenter).await?;
            Ok(())
        }
        Command::Serve { .. } => web::serve(Arc::new(helper), &config.bind).await,
    }
}
