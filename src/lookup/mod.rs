//! Consulta externa de CEP.
//!
//! [`CepLookup`] é o contrato consumido pela [`Session`](crate::session::Session);
//! [`ViaCepClient`] o implementa sobre a API pública do ViaCEP.

mod viacep;

pub use viacep::ViaCepClient;

use async_trait::async_trait;

use crate::types::{Address, Cep};
use crate::BuscaCepResult;

/// Trait para serviços de consulta de CEP.
///
/// Erros esperados:
/// - [`BuscaCepError::CepNotFound`](crate::BuscaCepError::CepNotFound) quando o serviço diz que o CEP não existe
/// - [`BuscaCepError::Connectivity`](crate::BuscaCepError::Connectivity) para falha de rede ou status HTTP de erro
#[async_trait]
pub trait CepLookup: Send + Sync {
    /// Nome do serviço, para logs.
    fn name(&self) -> &str;

    /// Consulta o endereço do CEP. A região já vem derivada da UF.
    async fn lookup(&self, cep: &Cep) -> BuscaCepResult<Address>;
}
