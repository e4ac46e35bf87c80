//! # BuscaCEP
//!
//! Consulta de CEP via ViaCEP com cache local, histórico e endereços salvos.
//!
//! O núcleo é a camada de persistência: quatro stores independentes sobre
//! um meio chave-valor com valores JSON, cada um com seus invariantes
//! (expiração, deduplicação, limite de tamanho).
//!
//! ## Módulos
//!
//! - [`types`] - CEP, endereço, região, configuração e erros
//! - [`storage`] - Meio chave-valor e coleções tipadas
//! - [`stores`] - Cache, histórico, salvos e última busca
//! - [`lookup`] - Consulta externa (ViaCEP)
//! - [`session`] - Fluxo de busca e estado da sessão
//! - [`cli`] - Interface de linha de comando

#[cfg(feature = "cli")]
pub mod cli;
pub mod lookup;
pub mod session;
pub mod storage;
pub mod stores;
pub mod types;

pub use types::config::Config;
pub use types::errors::{BuscaCepError, BuscaCepResult};
pub use types::{Address, Cep, Region};
