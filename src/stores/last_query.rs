//! Última busca válida.

use std::sync::Arc;

use super::write_or_log;
use crate::storage::{Collection, KeyValueStore, LAST_QUERY_KEY};
use crate::types::Cep;

/// Guarda um único CEP, sobrescrito a cada busca bem-sucedida.
#[derive(Debug, Clone)]
pub struct LastQueryStore {
    collection: Collection<String>,
}

impl LastQueryStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            collection: Collection::new(backend, LAST_QUERY_KEY),
        }
    }

    pub fn set(&self, cep: &Cep) {
        write_or_log(
            self.collection.save(&cep.as_str().to_string()),
            LAST_QUERY_KEY,
        );
    }

    /// Último CEP, somente se ainda passa na validação.
    pub fn get(&self) -> Option<Cep> {
        let raw = match self.collection.load() {
            Ok(value) => value?,
            Err(e) => {
                tracing::warn!("Leitura de '{}' falhou: {}", LAST_QUERY_KEY, e);
                return None;
            }
        };

        match Cep::parse(&raw) {
            Ok(cep) => Some(cep),
            Err(_) => {
                tracing::debug!("Última busca inválida ignorada: {:?}", raw);
                None
            }
        }
    }
}
