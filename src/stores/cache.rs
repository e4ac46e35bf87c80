//! Cache de consultas com expiração.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{read_or_default, write_or_log};
use crate::storage::{Collection, KeyValueStore, CACHE_KEY};
use crate::types::{Address, Cep};

/// Resultado em cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Endereço retornado pela consulta.
    pub data: Address,

    /// Momento em que foi cacheado.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    /// Cria uma entrada com o instante informado.
    pub fn new(data: Address, timestamp: DateTime<Utc>) -> Self {
        Self { data, timestamp }
    }

    /// Verifica se a entrada expirou em `now`.
    ///
    /// Expira quando a idade alcança o TTL (`idade >= ttl`).
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let age_ms = now.timestamp_millis() - self.timestamp.timestamp_millis();
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        age_ms >= ttl_ms
    }
}

/// Estatísticas do cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Número atual de entradas.
    pub size: usize,

    /// Entradas já expiradas (ainda não removidas).
    pub expired: usize,
}

/// Cache `CEP -> endereço`, sem limite de tamanho.
///
/// Entradas só saem por expiração, verificada na leitura.
#[derive(Debug, Clone)]
pub struct CacheStore {
    collection: Collection<BTreeMap<Cep, CacheEntry>>,
    ttl: Duration,
}

impl CacheStore {
    /// Cria o store.
    ///
    /// # Argumentos
    /// - `backend`: meio persistente compartilhado
    /// - `ttl`: Tempo de vida das entradas
    pub fn new(backend: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self {
            collection: Collection::new(backend, CACHE_KEY),
            ttl,
        }
    }

    /// Tempo de vida configurado.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Busca no cache.
    ///
    /// Retorna `None` se não encontrado ou se expirado.
    pub fn get(&self, cep: &Cep) -> Option<Address> {
        self.get_at(cep, Utc::now())
    }

    /// Busca no cache considerando o instante `now`.
    ///
    /// Entrada expirada é removida da coleção antes de retornar `None`.
    pub fn get_at(&self, cep: &Cep, now: DateTime<Utc>) -> Option<Address> {
        let mut entries = read_or_default(self.collection.load_map(), CACHE_KEY);

        let is_expired = entries.get(cep).map(|e| e.is_expired_at(now, self.ttl));
        match is_expired {
            Some(false) => {
                tracing::debug!("Cache hit: {}", cep);
                entries.remove(cep).map(|e| e.data)
            }
            Some(true) => {
                tracing::debug!("Cache expirado: {}", cep);
                entries.remove(cep);
                write_or_log(self.collection.save(&entries), CACHE_KEY);
                None
            }
            None => {
                tracing::debug!("Cache miss: {}", cep);
                None
            }
        }
    }

    /// Insere no cache.
    pub fn put(&self, address: &Address) {
        self.put_at(address, Utc::now());
    }

    /// Insere no cache com o instante `now`, substituindo entrada anterior.
    pub fn put_at(&self, address: &Address, now: DateTime<Utc>) {
        let mut entries = read_or_default(self.collection.load_map(), CACHE_KEY);
        entries.insert(
            address.postal_code.clone(),
            CacheEntry::new(address.clone(), now),
        );
        write_or_log(self.collection.save(&entries), CACHE_KEY);
    }

    /// `true` se existe entrada para o CEP, expirada ou não.
    pub fn contains(&self, cep: &Cep) -> bool {
        read_or_default(self.collection.load_map(), CACHE_KEY).contains_key(cep)
    }

    /// Retorna estatísticas do cache.
    pub fn stats_at(&self, now: DateTime<Utc>) -> CacheStats {
        let entries = read_or_default(self.collection.load_map(), CACHE_KEY);
        CacheStats {
            size: entries.len(),
            expired: entries
                .values()
                .filter(|e| e.is_expired_at(now, self.ttl))
                .count(),
        }
    }

    /// Remove entradas expiradas. Retorna quantas saíram.
    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = read_or_default(self.collection.load_map(), CACHE_KEY);
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired_at(now, self.ttl));

        let removed = before - entries.len();
        if removed > 0 {
            write_or_log(self.collection.save(&entries), CACHE_KEY);
        }
        removed
    }

    /// Limpa todo o cache.
    pub fn clear(&self) {
        write_or_log(self.collection.clear(), CACHE_KEY);
    }
}
