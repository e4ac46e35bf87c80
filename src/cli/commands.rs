//! Implementação dos comandos CLI do BuscaCEP.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use super::CacheAction;
use crate::lookup::ViaCepClient;
use crate::session::{Notice, SearchState, Session, Severity};
use crate::storage::{
    JsonFileStore, KeyValueStore, MemoryStore, CACHE_KEY, HISTORY_KEY, LAST_QUERY_KEY, SAVED_KEY,
};
use crate::stores::{CacheStore, HistoryStore, LastQueryStore, SavedStore};
use crate::types::config::{Config, CONFIG_FILE_NAME};
use crate::types::Address;
use crate::BuscaCepResult;

/// Opções do comando `search`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    pub save: bool,
    pub copy: bool,
    pub maps: bool,
    pub json: bool,
}

/// Cria `buscacep.toml` e o diretório de dados ao lado dele.
///
/// Uma config existente nunca é sobrescrita.
pub async fn init(path: Option<PathBuf>) -> BuscaCepResult<()> {
    let base = path.unwrap_or_else(|| PathBuf::from("."));
    let config_path = base.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        println!("Configuration already exists at: {}", config_path.display());
        return Ok(());
    }

    let mut config = Config::default_config();
    config.storage.data_dir = base.join(".buscacep");

    // Abrir o store cria o diretório (e `base`, se faltar)
    let store = JsonFileStore::open(&config.storage.data_dir)?;
    config.save(&config_path)?;
    tracing::info!("Config criada em {}", config_path.display());

    println!("Configuration created at: {}", config_path.display());
    println!("Data directory: {}", store.data_dir().display());
    for key in [CACHE_KEY, HISTORY_KEY, SAVED_KEY, LAST_QUERY_KEY] {
        println!("  {}.json", key);
    }

    Ok(())
}

/// Abre o meio persistente do config.
///
/// Se o diretório de dados não puder ser usado, a sessão segue em
/// memória: cache e histórico são conveniência, não requisito.
pub fn open_backend(config: &Config) -> Arc<dyn KeyValueStore> {
    match JsonFileStore::open(&config.storage.data_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(
                "Diretório de dados {} indisponível ({}), usando memória",
                config.storage.data_dir.display(),
                e
            );
            Arc::new(MemoryStore::new())
        }
    }
}

fn open_session(config: &Config) -> BuscaCepResult<Session<ViaCepClient>> {
    let client = ViaCepClient::from_config(&config.lookup)?;
    Ok(Session::new(open_backend(config), client, &config.storage))
}

/// Observador que mostra um spinner enquanto a consulta externa roda.
pub fn spinner_observer() -> impl FnMut(SearchState) + Send {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    move |state| match state {
        SearchState::Fetching => {
            spinner.set_message("Buscando CEP...");
            spinner.enable_steady_tick(Duration::from_millis(100));
        }
        SearchState::Displaying | SearchState::ShowingError => spinner.finish_and_clear(),
        _ => {}
    }
}

/// Busca um CEP.
pub async fn search(input: &str, options: SearchOptions, config: &Config) -> BuscaCepResult<()> {
    let mut session = open_session(config)?;

    let outcome = match session.search_with(input, spinner_observer()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            print_notice(&Notice::error(e.user_message()));
            return Err(e);
        }
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&outcome.address)?);
    } else {
        print_address(&outcome.address);
        if let Some(notice) = &outcome.notice {
            print_notice(notice);
        }
    }

    if options.copy {
        println!();
        println!("{}", outcome.address.to_clipboard_text());
    }

    if options.maps {
        match outcome.address.maps_url() {
            Some(url) => println!("\n{}", url),
            None => print_notice(&Notice::info("Endereço sem logradouro, sem link do Maps")),
        }
    }

    if options.save {
        if let Some(notice) = session.save_current() {
            print_notice(&notice);
        }
    }

    Ok(())
}

/// Mostra o histórico de buscas.
pub async fn history(limit: Option<usize>, config: &Config) -> BuscaCepResult<()> {
    let store = HistoryStore::new(open_backend(config), config.storage.max_history);
    let entries = store.list(limit.unwrap_or(config.storage.list_limit));

    if entries.is_empty() {
        println!("Nenhuma busca no histórico.");
        return Ok(());
    }

    println!("Buscas recentes:\n");
    for entry in entries {
        println!(
            "  {}  {:<40}  {}",
            entry.cep,
            entry.address,
            entry.timestamp.with_timezone(&Local).format("%d/%m/%Y %H:%M")
        );
    }

    Ok(())
}

/// Mostra os CEPs salvos.
pub async fn saved(limit: Option<usize>, config: &Config) -> BuscaCepResult<()> {
    let store = SavedStore::new(open_backend(config), config.storage.max_saved);
    let entries = store.list(limit.unwrap_or(config.storage.list_limit));

    if entries.is_empty() {
        println!("Nenhum CEP salvo.");
        return Ok(());
    }

    println!("CEPs salvos:\n");
    for entry in entries {
        println!("  ★ {}  {}", entry.cep, entry.address);
    }

    Ok(())
}

/// Mostra a última busca válida.
pub async fn last(config: &Config) -> BuscaCepResult<()> {
    match LastQueryStore::new(open_backend(config)).get() {
        Some(cep) => println!("{}", cep),
        None => println!("Nenhuma busca anterior."),
    }
    Ok(())
}

/// Manutenção do cache.
pub async fn cache(action: CacheAction, config: &Config) -> BuscaCepResult<()> {
    let store = CacheStore::new(open_backend(config), config.storage.cache_ttl());
    let now = Utc::now();

    match action {
        CacheAction::Stats => {
            let stats = store.stats_at(now);
            println!("Entradas: {}", stats.size);
            println!("Expiradas: {}", stats.expired);
            println!(
                "Validade: {} dia(s)",
                store.ttl().as_secs() / 86_400
            );
        }
        CacheAction::Purge => {
            let removed = store.purge_expired_at(now);
            println!("{} entrada(s) expirada(s) removida(s).", removed);
        }
        CacheAction::Clear => {
            store.clear();
            println!("Cache limpo.");
        }
    }

    Ok(())
}

/// Modo interativo.
pub async fn interactive(config: &Config) -> BuscaCepResult<()> {
    let mut session = open_session(config)?;
    super::interactive::run_search_loop(&mut session).await
}

/// Configura opções interativamente.
pub async fn config_cmd(config_path: &Path) -> BuscaCepResult<()> {
    use super::interactive::{run_interactive_config, show_config_summary};

    // Mostra resumo antes de editar
    if config_path.exists() {
        let config = Config::load(config_path)?;
        show_config_summary(&config);
    }

    run_interactive_config(config_path)
}

/// Mostra versão.
pub fn version() {
    println!("buscacep {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Consulta de CEP via ViaCEP com cache, histórico e salvos");
}

/// Imprime o endereço, um campo por linha.
pub fn print_address(address: &Address) {
    for (label, value) in address.display_lines() {
        println!("  {:<12} {}", format!("{}:", label), value);
    }
}

/// Imprime uma notificação com o ícone da gravidade.
pub fn print_notice(notice: &Notice) {
    let icon = match notice.severity {
        Severity::Success => "✓",
        Severity::Error => "✗",
        Severity::Info => "ℹ",
    };
    match notice.severity {
        Severity::Error => eprintln!("{} {}", icon, notice.message),
        _ => println!("{} {}", icon, notice.message),
    }
}
