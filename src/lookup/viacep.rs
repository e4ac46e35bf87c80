//! Cliente HTTP do ViaCEP.

use async_trait::async_trait;
use std::time::Duration;

use super::CepLookup;
use crate::types::config::LookupConfig;
use crate::types::{Address, Cep};
use crate::{BuscaCepError, BuscaCepResult};

/// Cliente para `GET {base_url}/{cep}/json`.
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    /// Cria um cliente com valores padrão.
    pub fn new() -> BuscaCepResult<Self> {
        Self::from_config(&LookupConfig::default())
    }

    /// Cria cliente a partir da configuração do TOML.
    pub fn from_config(config: &LookupConfig) -> BuscaCepResult<Self> {
        Self::build(&config.base_url, config.timeout(), &config.user_agent)
    }

    /// Cria cliente apontando para outra URL base (testes, espelhos).
    pub fn with_base_url(base_url: impl Into<String>) -> BuscaCepResult<Self> {
        let defaults = LookupConfig::default();
        Self::build(&base_url.into(), defaults.timeout(), &defaults.user_agent)
    }

    fn build(base_url: &str, timeout: Duration, user_agent: &str) -> BuscaCepResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let agent = reqwest::header::HeaderValue::from_str(user_agent)
            .map_err(|e| BuscaCepError::config(format!("user_agent inválido: {}", e)))?;
        headers.insert(reqwest::header::USER_AGENT, agent);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| BuscaCepError::config(format!("cliente HTTP: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL consultada para o CEP.
    pub fn url_for(&self, cep: &Cep) -> String {
        format!("{}/{}/json", self.base_url, cep.as_str())
    }
}

/// Interpreta o corpo JSON do ViaCEP.
///
/// `{"erro": true}` (ou `"true"`, nas versões novas da API) significa
/// CEP inexistente.
pub(crate) fn parse_body(cep: &Cep, body: serde_json::Value) -> BuscaCepResult<Address> {
    let not_found = match body.get("erro") {
        Some(serde_json::Value::Bool(flag)) => *flag,
        Some(serde_json::Value::String(flag)) => flag == "true",
        _ => false,
    };
    if not_found {
        return Err(BuscaCepError::CepNotFound(cep.clone()));
    }

    let address: Address = serde_json::from_value(body)
        .map_err(|e| BuscaCepError::Connectivity(format!("resposta inesperada: {}", e)))?;
    Ok(address.with_derived_region())
}

#[async_trait]
impl CepLookup for ViaCepClient {
    fn name(&self) -> &str {
        "ViaCEP"
    }

    async fn lookup(&self, cep: &Cep) -> BuscaCepResult<Address> {
        let url = self.url_for(cep);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!("Falha na requisição para {}: {}", url, e);
            BuscaCepError::Connectivity(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!("ViaCEP respondeu {} para {}", status, cep);
            return Err(BuscaCepError::Connectivity(format!("Status {}", status)));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BuscaCepError::Connectivity(format!("corpo inválido: {}", e)))?;

        parse_body(cep, body)
    }
}
