//! Coleção tipada sobre uma chave do [`KeyValueStore`].

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::KeyValueStore;
use crate::types::errors::{PersistResult, PersistenceError};
use crate::types::Cep;

/// Valor JSON de tipo `T` guardado sob uma chave.
///
/// Toda mutação é leitura completa, alteração em memória e gravação
/// completa de volta.
pub struct Collection<T> {
    backend: Arc<dyn KeyValueStore>,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            key: self.key,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection").field("key", &self.key).finish()
    }
}

impl<T> Collection<T> {
    /// Cria a coleção para `key`.
    pub fn new(backend: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            backend,
            key,
            _marker: PhantomData,
        }
    }

    /// Chave no meio persistente.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Remove a chave inteira.
    pub fn clear(&self) -> PersistResult<()> {
        self.backend.remove(self.key)
    }

    fn raw(&self) -> PersistResult<Option<String>> {
        self.backend.get(self.key)
    }

    fn malformed(&self, source: serde_json::Error) -> PersistenceError {
        PersistenceError::Malformed {
            key: self.key.to_string(),
            source,
        }
    }
}

impl<T: Serialize + DeserializeOwned> Collection<T> {
    /// Lê e desserializa o valor inteiro.
    pub fn load(&self) -> PersistResult<Option<T>> {
        match self.raw()? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| self.malformed(e)),
            None => Ok(None),
        }
    }

    /// Serializa e grava o valor inteiro.
    pub fn save(&self, value: &T) -> PersistResult<()> {
        let raw = serde_json::to_string(value).map_err(|source| PersistenceError::Encode {
            key: self.key.to_string(),
            source,
        })?;
        self.backend.set(self.key, &raw)
    }
}

impl<T: Serialize + DeserializeOwned> Collection<Vec<T>> {
    /// Lê a lista descartando registros com formato inválido.
    ///
    /// Só falha se o meio falhar ou se o valor não for um array JSON.
    pub fn load_list(&self) -> PersistResult<Vec<T>> {
        let Some(raw) = self.raw()? else {
            return Ok(Vec::new());
        };
        let records: Vec<serde_json::Value> =
            serde_json::from_str(&raw).map_err(|e| self.malformed(e))?;

        let total = records.len();
        let items: Vec<T> = records
            .into_iter()
            .filter_map(|record| serde_json::from_value(record).ok())
            .collect();

        if items.len() < total {
            tracing::warn!(
                "{}: {} registro(s) inválido(s) descartado(s)",
                self.key,
                total - items.len()
            );
        }
        Ok(items)
    }
}

impl<V: Serialize + DeserializeOwned> Collection<BTreeMap<Cep, V>> {
    /// Lê o mapa descartando entradas com chave ou valor inválidos.
    ///
    /// Só falha se o meio falhar ou se o valor não for um objeto JSON.
    pub fn load_map(&self) -> PersistResult<BTreeMap<Cep, V>> {
        let Some(raw) = self.raw()? else {
            return Ok(BTreeMap::new());
        };
        let records: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&raw).map_err(|e| self.malformed(e))?;

        let total = records.len();
        let map: BTreeMap<Cep, V> = records
            .into_iter()
            .filter_map(|(key, value)| {
                let cep = Cep::parse(&key).ok()?;
                let value = serde_json::from_value(value).ok()?;
                Some((cep, value))
            })
            .collect();

        if map.len() < total {
            tracing::warn!(
                "{}: {} entrada(s) inválida(s) descartada(s)",
                self.key,
                total - map.len()
            );
        }
        Ok(map)
    }
}
