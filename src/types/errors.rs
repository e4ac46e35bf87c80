//! Tipos de erro do BuscaCEP.

use thiserror::Error;

use super::cep::Cep;

/// Tipo de resultado padrão do BuscaCEP.
pub type BuscaCepResult<T> = Result<T, BuscaCepError>;

/// Tipo de resultado da camada de persistência.
pub type PersistResult<T> = Result<T, PersistenceError>;

/// Erros possíveis no BuscaCEP.
#[derive(Error, Debug)]
pub enum BuscaCepError {
    #[error("CEP inválido: '{0}'")]
    InvalidCep(String),

    #[error("CEP {0} não encontrado")]
    CepNotFound(Cep),

    #[error("Falha de conexão: {0}")]
    Connectivity(String),

    #[error("Erro de persistência: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("Erro de IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro ao parsear TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Erro ao serializar TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Erro de JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "cli")]
    #[error("Erro no terminal interativo: {0}")]
    Dialog(#[from] dialoguer::Error),

    #[error("{0}")]
    Other(String),
}

impl BuscaCepError {
    /// Cria um erro genérico.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Cria um erro de configuração.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Mensagem exibida ao usuário.
    ///
    /// Erros de busca têm textos fixos; o resto cai no `Display`.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCep(_) => "Digite um CEP válido (8 dígitos)".to_string(),
            Self::CepNotFound(_) => "CEP não encontrado".to_string(),
            Self::Connectivity(_) => "Erro na conexão. Tente novamente.".to_string(),
            other => other.to_string(),
        }
    }

    /// Erros de busca são transitórios: basta tentar de novo.
    pub fn is_search_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCep(_) | Self::CepNotFound(_) | Self::Connectivity(_)
        )
    }
}

/// Falhas do meio de armazenamento chave-valor.
///
/// Nunca chegam ao usuário: cada store converte em coleção vazia
/// (leitura) ou escrita descartada, registrando um `warn`.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("falha no backend: {0}")]
    Backend(#[from] std::io::Error),

    #[error("conteúdo malformado na chave '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("falha ao serializar '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("backend indisponível: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let cep = Cep::parse("01310-100").unwrap();

        assert_eq!(
            BuscaCepError::InvalidCep("123".into()).user_message(),
            "Digite um CEP válido (8 dígitos)"
        );
        assert_eq!(
            BuscaCepError::CepNotFound(cep).user_message(),
            "CEP não encontrado"
        );
        assert_eq!(
            BuscaCepError::Connectivity("timeout".into()).user_message(),
            "Erro na conexão. Tente novamente."
        );
        assert_eq!(BuscaCepError::other("boom").user_message(), "boom");
    }

    #[test]
    fn test_search_error_classification() {
        assert!(BuscaCepError::InvalidCep("x".into()).is_search_error());
        assert!(BuscaCepError::Connectivity("x".into()).is_search_error());
        assert!(!BuscaCepError::config("x").is_search_error());
    }
}
