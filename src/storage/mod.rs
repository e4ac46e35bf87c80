//! Coleções persistentes sobre um meio chave-valor.
//!
//! Cada store (cache, histórico, salvos, última busca) ocupa uma chave
//! própria com um valor JSON. O meio é abstraído por [`KeyValueStore`]:
//!
//! - [`JsonFileStore`] - um arquivo `<chave>.json` por chave, em disco
//! - [`MemoryStore`] - `HashMap` em memória, para testes e sessões efêmeras
//!
//! [`Collection`] dá tipo a uma chave e oferece leitores tolerantes que
//! descartam registros individuais com formato inválido.

mod collection;
mod file;
mod memory;

pub use collection::Collection;
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::types::errors::PersistResult;

/// Chave do mapa de cache (`CEP -> CacheEntry`).
pub const CACHE_KEY: &str = "cepCache";

/// Chave da lista de histórico.
pub const HISTORY_KEY: &str = "cepHistory";

/// Chave da lista de endereços salvos.
pub const SAVED_KEY: &str = "cepSaved";

/// Chave da última busca válida.
pub const LAST_QUERY_KEY: &str = "lastCEP";

/// Meio durável de chave-valor com valores em texto (JSON).
pub trait KeyValueStore: Send + Sync {
    /// Lê o valor bruto da chave.
    fn get(&self, key: &str) -> PersistResult<Option<String>>;

    /// Grava o valor, substituindo o anterior.
    fn set(&self, key: &str, value: &str) -> PersistResult<()>;

    /// Remove a chave. Remover chave inexistente não é erro.
    fn remove(&self, key: &str) -> PersistResult<()>;
}
