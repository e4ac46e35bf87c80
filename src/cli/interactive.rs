//! Modo interativo do BuscaCEP.
//!
//! Dois usos do dialoguer: a configuração interativa (`buscacep config`)
//! e o laço de busca (`buscacep interactive`), que faz o papel do popup.

use std::path::{Path, PathBuf};

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use super::commands::{print_address, print_notice, spinner_observer};
use crate::lookup::CepLookup;
use crate::session::{Notice, Session};
use crate::types::cep::format_for_input;
use crate::types::config::Config;
use crate::BuscaCepResult;

/// Executa a configuração interativa.
pub fn run_interactive_config(config_path: &Path) -> BuscaCepResult<()> {
    let theme = ColorfulTheme::default();

    println!("\n🔧 Configuração Interativa do BuscaCEP\n");

    // Carrega config existente ou cria nova
    let mut config = if config_path.exists() {
        Config::load(config_path)?
    } else {
        println!("Criando nova configuração...\n");
        Config::default_config()
    };

    loop {
        let options = vec![
            "Configurações Gerais",
            "Consulta (ViaCEP)",
            "Armazenamento local",
            "Salvar e Sair",
            "Sair sem Salvar",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("O que deseja configurar?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => configure_general(&theme, &mut config)?,
            1 => configure_lookup(&theme, &mut config)?,
            2 => configure_storage(&theme, &mut config)?,
            3 => {
                config.save(config_path)?;
                println!("\n✓ Configuração salva em: {}\n", config_path.display());
                break;
            }
            4 => {
                if Confirm::with_theme(&theme)
                    .with_prompt("Deseja realmente sair sem salvar?")
                    .default(false)
                    .interact()?
                {
                    println!("\nSaindo sem salvar.\n");
                    break;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Configura opções gerais.
fn configure_general(theme: &ColorfulTheme, config: &mut Config) -> BuscaCepResult<()> {
    println!("\n📋 Configurações Gerais\n");

    let log_levels = vec!["error", "warn", "info", "debug", "trace"];
    let current_idx = log_levels
        .iter()
        .position(|&l| l == config.general.log_level)
        .unwrap_or(2);

    let log_level_idx = Select::with_theme(theme)
        .with_prompt("Nível de log")
        .items(&log_levels)
        .default(current_idx)
        .interact()?;

    config.general.log_level = log_levels[log_level_idx].to_string();

    let log_formats = vec!["text", "json"];
    let current_format_idx = log_formats
        .iter()
        .position(|&f| f == config.general.log_format)
        .unwrap_or(0);

    let log_format_idx = Select::with_theme(theme)
        .with_prompt("Formato de log")
        .items(&log_formats)
        .default(current_format_idx)
        .interact()?;

    config.general.log_format = log_formats[log_format_idx].to_string();

    println!("\n✓ Configurações gerais atualizadas.\n");
    Ok(())
}

/// Configura o cliente do ViaCEP.
fn configure_lookup(theme: &ColorfulTheme, config: &mut Config) -> BuscaCepResult<()> {
    println!("\n🌐 Configuração da Consulta\n");

    let base_url: String = Input::with_theme(theme)
        .with_prompt("URL base")
        .default(config.lookup.base_url.clone())
        .interact_text()?;

    config.lookup.base_url = base_url;

    let timeout: u64 = Input::with_theme(theme)
        .with_prompt("Timeout (segundos)")
        .default(config.lookup.timeout_secs)
        .interact_text()?;

    config.lookup.timeout_secs = timeout.max(1);

    println!("\n✓ Consulta configurada.\n");
    Ok(())
}

/// Configura cache, histórico e salvos.
fn configure_storage(theme: &ColorfulTheme, config: &mut Config) -> BuscaCepResult<()> {
    println!("\n💾 Configuração do Armazenamento\n");

    let data_dir: String = Input::with_theme(theme)
        .with_prompt("Diretório de dados")
        .default(config.storage.data_dir.display().to_string())
        .interact_text()?;

    config.storage.data_dir = PathBuf::from(data_dir);

    let ttl_days: u64 = Input::with_theme(theme)
        .with_prompt("Validade do cache (dias)")
        .default(config.storage.cache_ttl_secs / 86_400)
        .interact_text()?;

    config.storage.cache_ttl_secs = ttl_days * 86_400;

    let max_history: usize = Input::with_theme(theme)
        .with_prompt("Máximo de entradas no histórico")
        .default(config.storage.max_history)
        .interact_text()?;

    config.storage.max_history = max_history;

    let max_saved: usize = Input::with_theme(theme)
        .with_prompt("Máximo de CEPs salvos")
        .default(config.storage.max_saved)
        .interact_text()?;

    config.storage.max_saved = max_saved;

    println!("\n✓ Armazenamento configurado.\n");
    Ok(())
}

/// Mostra resumo da configuração.
pub fn show_config_summary(config: &Config) {
    println!("\n📊 Resumo da Configuração\n");
    println!("┌─────────────────────────────────────────┐");
    println!("│ Geral                                   │");
    println!("├─────────────────────────────────────────┤");
    println!("│ Log level: {:<28} │", config.general.log_level);
    println!("│ Log format: {:<27} │", config.general.log_format);
    println!("├─────────────────────────────────────────┤");
    println!("│ Consulta                                │");
    println!("├─────────────────────────────────────────┤");
    println!("│ URL: {:<34} │", config.lookup.base_url);
    println!("│ Timeout: {:<29}s │", config.lookup.timeout_secs);
    println!("├─────────────────────────────────────────┤");
    println!("│ Armazenamento                           │");
    println!("├─────────────────────────────────────────┤");
    println!(
        "│ Cache: {:<32} │",
        format!("{} dia(s)", config.storage.cache_ttl_secs / 86_400)
    );
    println!("│ Histórico: até {:<24} │", config.storage.max_history);
    println!("│ Salvos: até {:<27} │", config.storage.max_saved);
    println!("└─────────────────────────────────────────┘");
    println!("Dados em: {}", config.storage.data_dir.display());
    println!();
}

/// O que fazer a seguir no laço de busca.
enum Pick {
    NewSearch,
    Cep(String),
    Quit,
}

/// Laço de busca interativo.
pub async fn run_search_loop<L: CepLookup>(session: &mut Session<L>) -> BuscaCepResult<()> {
    let theme = ColorfulTheme::default();
    let mut prefill = session.restore_last_query().unwrap_or_default();

    println!("\n📮 BuscaCEP\n");

    loop {
        let input = match pick_next(&theme, session)? {
            Pick::Quit => break,
            Pick::Cep(cep) => cep,
            Pick::NewSearch => {
                let typed: String = Input::with_theme(&theme)
                    .with_prompt("CEP")
                    .with_initial_text(prefill.clone())
                    .allow_empty(true)
                    .interact_text()?;
                prefill.clear();
                if typed.trim().is_empty() {
                    continue;
                }
                typed
            }
        };

        println!("→ {}", format_for_input(&input));
        session.input_changed();

        let result = session.search_with(&input, spinner_observer()).await;
        match result {
            Ok(outcome) => {
                println!();
                print_address(&outcome.address);
                if let Some(notice) = &outcome.notice {
                    print_notice(notice);
                }
                result_actions(&theme, session)?;
            }
            Err(e) => {
                print_notice(&Notice::error(e.user_message()));
            }
        }
    }

    Ok(())
}

/// Menu inicial: nova busca, histórico e salvos.
fn pick_next<L: CepLookup>(theme: &ColorfulTheme, session: &Session<L>) -> BuscaCepResult<Pick> {
    let history = session.history();
    let saved = session.saved();

    let mut labels = vec!["🔍 Nova busca".to_string()];
    let mut ceps: Vec<Option<String>> = vec![None];

    for entry in &history {
        labels.push(format!("🕘 {}  {}", entry.cep, entry.address));
        ceps.push(Some(entry.cep.as_str().to_string()));
    }
    for entry in &saved {
        labels.push(format!("★ {}  {}", entry.cep, entry.address));
        ceps.push(Some(entry.cep.as_str().to_string()));
    }
    labels.push("Sair".to_string());

    let selection = Select::with_theme(theme)
        .with_prompt("Buscar")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(match ceps.get(selection) {
        Some(Some(cep)) => Pick::Cep(cep.clone()),
        Some(None) => Pick::NewSearch,
        None => Pick::Quit,
    })
}

/// Ações sobre o endereço exibido.
fn result_actions<L: CepLookup>(theme: &ColorfulTheme, session: &mut Session<L>) -> BuscaCepResult<()> {
    let Some(address) = session.current().cloned() else {
        return Ok(());
    };
    let maps_url = address.maps_url();

    let mut actions = vec!["Salvar", "Copiar texto"];
    if maps_url.is_some() {
        actions.push("Abrir no Maps");
    }
    actions.push("Nova busca");

    loop {
        let selection = Select::with_theme(theme)
            .with_prompt("Ações")
            .items(&actions)
            .default(actions.len() - 1)
            .interact()?;

        match actions[selection] {
            "Salvar" => {
                if let Some(notice) = session.save_current() {
                    print_notice(&notice);
                }
            }
            "Copiar texto" => {
                println!("\n{}\n", address.to_clipboard_text());
            }
            "Abrir no Maps" => {
                if let Some(url) = &maps_url {
                    println!("\n{}\n", url);
                }
            }
            _ => {
                session.reset();
                return Ok(());
            }
        }
    }
}
