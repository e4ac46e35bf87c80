//! Stores persistentes do BuscaCEP.
//!
//! Quatro regiões independentes, cada uma sob sua chave:
//!
//! - [`CacheStore`] - resultado de cada CEP, expira após o TTL (lido sob demanda)
//! - [`HistoryStore`] - buscas recentes, sem duplicatas, limitado
//! - [`SavedStore`] - endereços fixados pelo usuário, rejeita duplicatas
//! - [`LastQueryStore`] - último CEP válido, para preencher a entrada
//!
//! Falhas do meio nunca sobem: leitura vira coleção vazia e escrita
//! é descartada, ambas com `warn`.

mod cache;
mod history;
mod last_query;
mod saved;

pub use cache::{CacheEntry, CacheStats, CacheStore};
pub use history::{HistoryEntry, HistoryStore};
pub use last_query::LastQueryStore;
pub use saved::{SaveOutcome, SavedEntry, SavedStore};

use crate::types::errors::PersistResult;

/// Converte falha de leitura em valor vazio.
fn read_or_default<T: Default>(result: PersistResult<T>, key: &str) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!("Leitura de '{}' falhou, usando coleção vazia: {}", key, e);
        T::default()
    })
}

/// Descarta falha de escrita, apenas registrando.
fn write_or_log(result: PersistResult<()>, key: &str) {
    if let Err(e) = result {
        tracing::warn!("Escrita de '{}' descartada: {}", key, e);
    }
}
