use buscacep::cli::commands::SearchOptions;
use buscacep::cli::{Cli, Commands};
use buscacep::types::config::Config;
use buscacep::BuscaCepResult;
use clap::Parser;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config);

    init_logging(&cli, &config);
    tracing::debug!("Config: {}", cli.config.display());

    if let Err(e) = run(cli, &config).await {
        // Erros de busca já foram mostrados como notificação
        if !e.is_search_error() {
            eprintln!("Erro: {}", e);
        }
        std::process::exit(1);
    }
}

/// `-q` e `-v` vencem o `log_level` do config; `RUST_LOG` soma diretivas.
fn init_logging(cli: &Cli, config: &Config) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, true) => "debug",
        (false, false) => config.general.log_level.as_str(),
    };

    let directive: Directive = format!("buscacep={}", level)
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    let filter = EnvFilter::from_default_env().add_directive(directive);

    let json = config.general.log_format == "json";
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
}

async fn run(cli: Cli, config: &Config) -> BuscaCepResult<()> {
    match cli.command {
        Commands::Init { path } => {
            buscacep::cli::commands::init(path).await?;
        }
        Commands::Search {
            cep,
            save,
            copy,
            maps,
            json,
        } => {
            let options = SearchOptions {
                save,
                copy,
                maps,
                json,
            };
            buscacep::cli::commands::search(&cep, options, config).await?;
        }
        Commands::History { limit } => {
            buscacep::cli::commands::history(limit, config).await?;
        }
        Commands::Saved { limit } => {
            buscacep::cli::commands::saved(limit, config).await?;
        }
        Commands::Last => {
            buscacep::cli::commands::last(config).await?;
        }
        Commands::Cache { action } => {
            buscacep::cli::commands::cache(action, config).await?;
        }
        Commands::Interactive => {
            buscacep::cli::commands::interactive(config).await?;
        }
        Commands::Config => {
            buscacep::cli::commands::config_cmd(&cli.config).await?;
        }
        Commands::Version => {
            buscacep::cli::commands::version();
        }
    }

    Ok(())
}
