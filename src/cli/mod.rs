//! Interface de linha de comando do BuscaCEP.

pub mod commands;
pub mod interactive;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// BuscaCEP - consulta de CEP com cache, histórico e salvos.
#[derive(Parser, Debug)]
#[command(name = "buscacep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Arquivo de configuração.
    #[arg(short, long, default_value = "buscacep.toml")]
    pub config: PathBuf,

    /// Modo verbose.
    #[arg(short, long)]
    pub verbose: bool,

    /// Modo silencioso.
    #[arg(short, long)]
    pub quiet: bool,

    /// Comando a executar.
    #[command(subcommand)]
    pub command: Commands,
}

/// Comandos disponíveis.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inicializa configuração no diretório atual.
    Init {
        /// Diretório de destino (padrão: diretório atual).
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Busca um CEP (com ou sem hífen).
    Search {
        /// CEP a consultar.
        cep: String,

        /// Salva o endereço encontrado.
        #[arg(short, long)]
        save: bool,

        /// Imprime o bloco de texto para copiar.
        #[arg(long)]
        copy: bool,

        /// Imprime o link do Google Maps.
        #[arg(long)]
        maps: bool,

        /// Saída em JSON.
        #[arg(long)]
        json: bool,
    },

    /// Mostra as buscas recentes.
    History {
        /// Número de entradas (padrão: `list_limit` do config).
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Mostra os CEPs salvos.
    Saved {
        /// Número de entradas (padrão: `list_limit` do config).
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Mostra a última busca válida.
    Last,

    /// Manutenção do cache local.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Modo interativo (equivalente ao popup).
    Interactive,

    /// Configura opções interativamente.
    Config,

    /// Mostra versão.
    Version,
}

/// Ações sobre o cache.
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum CacheAction {
    /// Número de entradas e quantas já expiraram.
    Stats,
    /// Remove entradas expiradas.
    Purge,
    /// Remove todas as entradas.
    Clear,
}
