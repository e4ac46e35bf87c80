//! Histórico de buscas recentes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{read_or_default, write_or_log};
use crate::storage::{Collection, KeyValueStore, HISTORY_KEY};
use crate::types::{Address, Cep};

/// Uma busca no histórico.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub cep: Cep,
    /// `logradouro, bairro`.
    pub address: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Lista mais-recente-primeiro, um registro por CEP, limitada a `max_entries`.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    collection: Collection<Vec<HistoryEntry>>,
    max_entries: usize,
}

impl HistoryStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, max_entries: usize) -> Self {
        Self {
            collection: Collection::new(backend, HISTORY_KEY),
            max_entries,
        }
    }

    /// Registra uma busca bem-sucedida.
    pub fn record(&self, address: &Address) {
        self.record_at(address, Utc::now());
    }

    /// Registra com o instante `now`.
    ///
    /// Repetir um CEP move o registro para o início em vez de duplicar.
    pub fn record_at(&self, address: &Address, now: DateTime<Utc>) {
        let mut entries = read_or_default(self.collection.load_list(), HISTORY_KEY);

        let entry = HistoryEntry {
            cep: address.postal_code.clone(),
            address: address.short_summary(),
            timestamp: now,
        };

        entries.retain(|e| e.cep != entry.cep);
        entries.insert(0, entry);
        entries.truncate(self.max_entries);

        write_or_log(self.collection.save(&entries), HISTORY_KEY);
    }

    /// Primeiras `limit` entradas, mais recente primeiro.
    pub fn list(&self, limit: usize) -> Vec<HistoryEntry> {
        let mut entries = read_or_default(self.collection.load_list(), HISTORY_KEY);
        entries.truncate(limit);
        entries
    }

    /// Todas as entradas persistidas.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        read_or_default(self.collection.load_list(), HISTORY_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn create_address(code: &str) -> Address {
        let mut addr = Address::new(Cep::parse(code).unwrap(), "SP");
        addr.street = format!("Rua {}", code);
        addr.neighborhood = "Centro".to_string();
        addr
    }

    fn create_history(max: usize) -> HistoryStore {
        HistoryStore::new(Arc::new(MemoryStore::new()), max)
    }

    fn codes(entries: &[HistoryEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.cep.as_str()).collect()
    }

    #[test]
    fn test_record_prepends() {
        let history = create_history(10);
        history.record(&create_address("11111111"));
        history.record(&create_address("22222222"));

        assert_eq!(codes(&history.entries()), vec!["22222222", "11111111"]);
    }

    #[test]
    fn test_repeat_moves_to_front() {
        let history = create_history(10);
        history.record(&create_address("11111111"));
        history.record(&create_address("22222222"));
        history.record(&create_address("11111111"));

        assert_eq!(codes(&history.entries()), vec!["11111111", "22222222"]);
    }

    #[test]
    fn test_repeat_refreshes_summary_and_timestamp() {
        let history = create_history(10);
        let t0 = Utc::now();
        let mut addr = create_address("11111111");
        history.record_at(&addr, t0);

        addr.neighborhood = "Jardins".to_string();
        let t1 = t0 + chrono::Duration::minutes(1);
        history.record_at(&addr, t1);

        let entries = history.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].address, "Rua 11111111, Jardins");
        assert_eq!(entries[0].timestamp.timestamp_millis(), t1.timestamp_millis());
    }

    #[test]
    fn test_cap_drops_oldest() {
        let history = create_history(10);
        for i in 0..11 {
            history.record(&create_address(&format!("{:08}", i)));
        }

        let entries = history.entries();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0].cep.as_str(), "00000010");
        assert_eq!(entries[9].cep.as_str(), "00000001");
        assert!(entries.iter().all(|e| e.cep.as_str() != "00000000"));
    }

    #[test]
    fn test_list_limit() {
        let history = create_history(10);
        for i in 0..7 {
            history.record(&create_address(&format!("{:08}", i)));
        }

        let listed = history.list(5);
        assert_eq!(listed.len(), 5);
        assert_eq!(listed[0].cep.as_str(), "00000006");
        assert_eq!(history.list(50).len(), 7);
    }

    #[test]
    fn test_summary_trimmed() {
        let history = create_history(10);
        let mut addr = create_address("11111111");
        addr.neighborhood.clear();
        history.record(&addr);

        assert_eq!(history.entries()[0].address, "Rua 11111111");
    }
}
