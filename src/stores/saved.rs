//! Endereços salvos pelo usuário.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::read_or_default;
use crate::storage::{Collection, KeyValueStore, SAVED_KEY};
use crate::types::errors::PersistResult;
use crate::types::{Address, Cep};

/// Um endereço salvo, com snapshot completo da consulta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedEntry {
    /// CEP.
    pub cep: Cep,

    /// `logradouro, bairro, cidade`.
    pub address: String,

    /// Endereço completo no momento em que foi salvo.
    pub data: Address,

    /// Quando foi salvo.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Resultado de [`SavedStore::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Adicionado no início da lista.
    Saved,
    /// CEP já estava salvo; nada mudou.
    AlreadyExists,
}

/// Lista de salvos: mais recente primeiro, limitada a `max_entries`.
///
/// Ao contrário do histórico, salvar um CEP repetido não reordena nada:
/// a operação é rejeitada com [`SaveOutcome::AlreadyExists`].
///
/// Salvar é uma ação explícita do usuário, então a falha de escrita
/// sobe para quem chamou em vez de ser só registrada.
#[derive(Debug, Clone)]
pub struct SavedStore {
    collection: Collection<Vec<SavedEntry>>,
    max_entries: usize,
}

impl SavedStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, max_entries: usize) -> Self {
        Self {
            collection: Collection::new(backend, SAVED_KEY),
            max_entries,
        }
    }

    /// Salva o endereço.
    pub fn save(&self, address: &Address) -> PersistResult<SaveOutcome> {
        self.save_at(address, Utc::now())
    }

    /// Salva com o instante `now`.
    pub fn save_at(&self, address: &Address, now: DateTime<Utc>) -> PersistResult<SaveOutcome> {
        let mut entries = read_or_default(self.collection.load_list(), SAVED_KEY);

        if entries.iter().any(|e| e.cep == address.postal_code) {
            tracing::debug!("CEP {} já está salvo", address.postal_code);
            return Ok(SaveOutcome::AlreadyExists);
        }

        entries.insert(
            0,
            SavedEntry {
                cep: address.postal_code.clone(),
                address: address.long_summary(),
                data: address.clone(),
                timestamp: now,
            },
        );
        entries.truncate(self.max_entries);

        self.collection.save(&entries).map_err(|e| {
            tracing::warn!("Escrita de '{}' falhou: {}", SAVED_KEY, e);
            e
        })?;
        Ok(SaveOutcome::Saved)
    }

    /// `true` se o CEP está salvo.
    pub fn contains(&self, cep: &Cep) -> bool {
        self.entries().iter().any(|e| &e.cep == cep)
    }

    /// Primeiras `limit` entradas, mais recente primeiro.
    pub fn list(&self, limit: usize) -> Vec<SavedEntry> {
        let mut entries = self.entries();
        entries.truncate(limit);
        entries
    }

    /// Todas as entradas persistidas.
    pub fn entries(&self) -> Vec<SavedEntry> {
        read_or_default(self.collection.load_list(), SAVED_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn create_address(code: &str) -> Address {
        let mut addr = Address::new(Cep::parse(code).unwrap(), "RJ");
        addr.street = "Avenida Atlântica".to_string();
        addr.neighborhood = "Copacabana".to_string();
        addr.city = "Rio de Janeiro".to_string();
        addr
    }

    fn create_saved(max: usize) -> SavedStore {
        SavedStore::new(Arc::new(MemoryStore::new()), max)
    }

    #[test]
    fn test_save_new() {
        let saved = create_saved(20);
        let addr = create_address("22021001");

        assert_eq!(saved.save(&addr).unwrap(), SaveOutcome::Saved);

        let entries = saved.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].address, "Avenida Atlântica, Copacabana, Rio de Janeiro");
        assert_eq!(entries[0].data, addr);
    }

    #[test]
    fn test_duplicate_rejected() {
        let saved = create_saved(20);
        let addr = create_address("22021001");

        assert_eq!(saved.save(&addr).unwrap(), SaveOutcome::Saved);
        assert_eq!(saved.save(&addr).unwrap(), SaveOutcome::AlreadyExists);
        assert_eq!(saved.entries().len(), 1);
    }

    #[test]
    fn test_duplicate_keeps_position() {
        let saved = create_saved(20);
        saved.save(&create_address("11111111")).unwrap();
        saved.save(&create_address("22222222")).unwrap();
        saved.save(&create_address("11111111")).unwrap();

        let codes: Vec<String> = saved.entries().iter().map(|e| e.cep.to_string()).collect();
        assert_eq!(codes, vec!["22222-222", "11111-111"]);
    }

    #[test]
    fn test_cap_keeps_most_recent() {
        let saved = create_saved(20);
        for i in 0..21 {
            saved.save(&create_address(&format!("{:08}", i))).unwrap();
        }

        let entries = saved.entries();
        assert_eq!(entries.len(), 20);
        assert_eq!(entries[0].cep.as_str(), "00000020");
        assert!(!saved.contains(&Cep::parse("00000000").unwrap()));
        assert!(saved.contains(&Cep::parse("00000001").unwrap()));
    }

    #[test]
    fn test_list_limit() {
        let saved = create_saved(20);
        for i in 0..8 {
            saved.save(&create_address(&format!("{:08}", i))).unwrap();
        }
        assert_eq!(saved.list(5).len(), 5);
        assert_eq!(saved.list(5)[0].cep.as_str(), "00000007");
    }

    #[test]
    fn test_failed_write_is_reported() {
        struct ReadOnlyStore(MemoryStore);

        impl KeyValueStore for ReadOnlyStore {
            fn get(&self, key: &str) -> PersistResult<Option<String>> {
                self.0.get(key)
            }

            fn set(&self, _key: &str, _value: &str) -> PersistResult<()> {
                Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied).into())
            }

            fn remove(&self, key: &str) -> PersistResult<()> {
                self.0.remove(key)
            }
        }

        let saved = SavedStore::new(Arc::new(ReadOnlyStore(MemoryStore::new())), 20);
        assert!(saved.save(&create_address("22021001")).is_err());
        assert!(saved.entries().is_empty());
    }
}
