//! Sessão de consulta.
//!
//! [`Session`] concentra o estado que antes vivia solto: o endereço
//! exibido, o estado da busca e os quatro stores. O fluxo de uma busca:
//!
//! ```text
//! Idle → Validating → CacheHit ──────────────→ Displaying
//!                   ↘ Fetching → (put/record/set) → Displaying
//!                              ↘ ShowingError
//! ```
//!
//! Uma nova busca não cancela nada: cada chamada grava nos stores ao
//! terminar e a última escrita prevalece.

use std::sync::Arc;

use crate::lookup::CepLookup;
use crate::storage::KeyValueStore;
use crate::stores::{
    CacheStore, HistoryEntry, HistoryStore, LastQueryStore, SaveOutcome, SavedEntry, SavedStore,
};
use crate::types::cep::{format_for_input, Cep};
use crate::types::config::StorageConfig;
use crate::types::Address;
use crate::BuscaCepResult;

/// Estado do fluxo de busca.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Validating,
    CacheHit,
    Fetching,
    Displaying,
    ShowingError,
}

impl std::fmt::Display for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchState::Idle => write!(f, "idle"),
            SearchState::Validating => write!(f, "validating"),
            SearchState::CacheHit => write!(f, "cache_hit"),
            SearchState::Fetching => write!(f, "fetching"),
            SearchState::Displaying => write!(f, "displaying"),
            SearchState::ShowingError => write!(f, "showing_error"),
        }
    }
}

/// Gravidade de uma notificação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

/// Mensagem curta para o usuário após uma operação.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// De onde veio o endereço.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Lookup,
}

/// Resultado de uma busca bem-sucedida.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub address: Address,
    pub source: Source,
    pub notice: Option<Notice>,
}

/// Sessão interativa de consulta de CEP.
pub struct Session<L> {
    lookup: L,
    cache: CacheStore,
    history: HistoryStore,
    saved: SavedStore,
    last_query: LastQueryStore,
    list_limit: usize,
    current: Option<Address>,
    state: SearchState,
}

impl<L: CepLookup> Session<L> {
    /// Cria a sessão sobre o meio persistente.
    pub fn new(backend: Arc<dyn KeyValueStore>, lookup: L, config: &StorageConfig) -> Self {
        Self {
            lookup,
            cache: CacheStore::new(Arc::clone(&backend), config.cache_ttl()),
            history: HistoryStore::new(Arc::clone(&backend), config.max_history),
            saved: SavedStore::new(Arc::clone(&backend), config.max_saved),
            last_query: LastQueryStore::new(backend),
            list_limit: config.list_limit,
            current: None,
            state: SearchState::Idle,
        }
    }

    /// Estado atual do fluxo.
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Endereço em exibição.
    pub fn current(&self) -> Option<&Address> {
        self.current.as_ref()
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Última busca válida, já formatada para o campo de entrada.
    pub fn restore_last_query(&self) -> Option<String> {
        self.last_query.get().map(|cep| format_for_input(cep.as_str()))
    }

    /// Busca um CEP a partir da entrada do usuário.
    pub async fn search(&mut self, input: &str) -> BuscaCepResult<SearchOutcome> {
        self.search_with(input, |_| {}).await
    }

    /// Como [`search`](Self::search), avisando `observe` a cada transição.
    pub async fn search_with<F>(&mut self, input: &str, mut observe: F) -> BuscaCepResult<SearchOutcome>
    where
        F: FnMut(SearchState) + Send,
    {
        self.transition(SearchState::Validating, &mut observe);
        let cep = match Cep::parse(input) {
            Ok(cep) => cep,
            Err(e) => return Err(self.fail(e, &mut observe)),
        };

        if let Some(address) = self.cache.get(&cep) {
            self.transition(SearchState::CacheHit, &mut observe);
            return Ok(self.display(
                address,
                Source::Cache,
                Some(Notice::info("Dados carregados do cache")),
                &mut observe,
            ));
        }

        self.transition(SearchState::Fetching, &mut observe);
        tracing::debug!("Consultando {} no {}", cep, self.lookup.name());
        match self.lookup.lookup(&cep).await {
            Ok(address) => {
                self.cache.put(&address);
                self.history.record(&address);
                self.last_query.set(&cep);
                Ok(self.display(address, Source::Lookup, None, &mut observe))
            }
            Err(e) => Err(self.fail(e, &mut observe)),
        }
    }

    /// Salva o endereço em exibição e devolve a notificação do resultado.
    ///
    /// `None` quando não há endereço exibido. Diferente das escritas da
    /// busca, uma falha aqui chega ao usuário.
    pub fn save_current(&self) -> Option<Notice> {
        let address = self.current.as_ref()?;
        let notice = match self.saved.save(address) {
            Ok(SaveOutcome::Saved) => Notice::success("CEP salvo com sucesso!"),
            Ok(SaveOutcome::AlreadyExists) => Notice::info("CEP já está salvo"),
            Err(_) => Notice::error("Erro ao salvar CEP"),
        };
        Some(notice)
    }

    /// Histórico recente, limitado a `list_limit`.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.list(self.list_limit)
    }

    /// Salvos, limitados a `list_limit`.
    pub fn saved(&self) -> Vec<SavedEntry> {
        self.saved.list(self.list_limit)
    }

    /// Acesso direto aos stores de lista (sem limite de exibição).
    pub fn history_store(&self) -> &HistoryStore {
        &self.history
    }

    pub fn saved_store(&self) -> &SavedStore {
        &self.saved
    }

    /// Entrada alterada: resultado ou erro deixam de ser exibidos.
    pub fn input_changed(&mut self) {
        if matches!(
            self.state,
            SearchState::Displaying | SearchState::ShowingError
        ) {
            self.state = SearchState::Idle;
        }
    }

    /// Limpa a tela: volta a `Idle` sem endereço em exibição.
    pub fn reset(&mut self) {
        self.current = None;
        self.state = SearchState::Idle;
    }

    fn transition<F: FnMut(SearchState)>(&mut self, next: SearchState, observe: &mut F) {
        tracing::trace!("{} → {}", self.state, next);
        self.state = next;
        observe(next);
    }

    fn display<F: FnMut(SearchState)>(
        &mut self,
        address: Address,
        source: Source,
        notice: Option<Notice>,
        observe: &mut F,
    ) -> SearchOutcome {
        self.current = Some(address.clone());
        self.transition(SearchState::Displaying, observe);
        SearchOutcome {
            address,
            source,
            notice,
        }
    }

    fn fail<F: FnMut(SearchState)>(
        &mut self,
        error: crate::BuscaCepError,
        observe: &mut F,
    ) -> crate::BuscaCepError {
        tracing::debug!("Busca falhou: {}", error);
        self.current = None;
        self.transition(SearchState::ShowingError, observe);
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::BuscaCepError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedLookup {
        calls: AtomicUsize,
        known: Vec<Address>,
    }

    #[async_trait]
    impl CepLookup for FixedLookup {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn lookup(&self, cep: &Cep) -> BuscaCepResult<Address> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.known
                .iter()
                .find(|a| &a.postal_code == cep)
                .cloned()
                .ok_or_else(|| BuscaCepError::CepNotFound(cep.clone()))
        }
    }

    fn create_session() -> Session<FixedLookup> {
        let mut paulista = Address::new(Cep::parse("01310100").unwrap(), "SP");
        paulista.street = "Avenida Paulista".to_string();
        let lookup = FixedLookup {
            calls: AtomicUsize::new(0),
            known: vec![paulista],
        };
        Session::new(
            Arc::new(MemoryStore::new()),
            lookup,
            &StorageConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_invalid_input_touches_nothing() {
        let mut session = create_session();
        let mut seen = Vec::new();

        let result = session.search_with("123", |s| seen.push(s)).await;

        assert!(matches!(result, Err(BuscaCepError::InvalidCep(_))));
        assert_eq!(seen, vec![SearchState::Validating, SearchState::ShowingError]);
        assert_eq!(session.lookup().calls.load(Ordering::SeqCst), 0);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_state_sequence_fetch_then_cache() {
        let mut session = create_session();

        let mut seen = Vec::new();
        session.search_with("01310-100", |s| seen.push(s)).await.unwrap();
        assert_eq!(
            seen,
            vec![
                SearchState::Validating,
                SearchState::Fetching,
                SearchState::Displaying
            ]
        );

        let mut seen = Vec::new();
        let outcome = session.search_with("01310100", |s| seen.push(s)).await.unwrap();
        assert_eq!(
            seen,
            vec![
                SearchState::Validating,
                SearchState::CacheHit,
                SearchState::Displaying
            ]
        );
        assert_eq!(outcome.source, Source::Cache);
        assert_eq!(
            outcome.notice,
            Some(Notice::info("Dados carregados do cache"))
        );
    }

    #[tokio::test]
    async fn test_not_found_clears_current() {
        let mut session = create_session();
        session.search("01310100").await.unwrap();
        assert!(session.current().is_some());

        let err = session.search("99999999").await.unwrap_err();
        assert_eq!(err.user_message(), "CEP não encontrado");
        assert!(session.current().is_none());
        assert_eq!(session.state(), SearchState::ShowingError);
        assert!(session.save_current().is_none());
    }

    #[tokio::test]
    async fn test_input_changed_and_reset() {
        let mut session = create_session();
        session.search("01310100").await.unwrap();
        assert_eq!(session.state(), SearchState::Displaying);

        session.input_changed();
        assert_eq!(session.state(), SearchState::Idle);
        assert!(session.current().is_some());

        session.reset();
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn test_save_current_notices() {
        let mut session = create_session();
        assert!(session.save_current().is_none());

        session.search("01310100").await.unwrap();
        let notice = session.save_current().unwrap();
        assert_eq!(notice, Notice::success("CEP salvo com sucesso!"));
        assert_eq!(notice.severity, Severity::Success);

        let notice = session.save_current().unwrap();
        assert_eq!(notice, Notice::info("CEP já está salvo"));
        assert_eq!(session.saved().len(), 1);
    }
}
