//! Normalização, validação e formatação de CEP.
//!
//! Toda chave dos stores é um [`Cep`]: exatamente 8 dígitos ASCII,
//! sem hífen. A entrada do usuário passa por [`normalize`] antes de
//! qualquer operação.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::BuscaCepError;

/// Quantidade de dígitos de um CEP.
pub const CEP_LEN: usize = 8;

/// Posição do hífen na forma de exibição (`NNNNN-NNN`).
const HYPHEN_AT: usize = 5;

/// Remove todo caractere que não seja dígito ASCII.
///
/// Função total: nunca falha e preserva a ordem dos dígitos.
pub fn normalize(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// `true` se a forma normalizada tem exatamente 8 dígitos.
pub fn is_valid(candidate: &str) -> bool {
    normalize(candidate).len() == CEP_LEN
}

/// Formata para exibição: `01310100` → `01310-100`.
///
/// Com menos de 8 dígitos a entrada volta só normalizada; dígitos além
/// do 8º ficam depois do hífen (`013101000` → `01310-1000`).
pub fn format_for_display(code: &str) -> String {
    let digits = normalize(code);
    if digits.len() >= CEP_LEN {
        format!("{}-{}", &digits[..HYPHEN_AT], &digits[HYPHEN_AT..])
    } else {
        digits
    }
}

/// Formata entrada parcial enquanto o usuário digita.
///
/// O hífen só aparece a partir do 5º dígito; dígitos além do 8º são
/// mantidos, como faz o campo de busca.
pub fn format_for_input(code: &str) -> String {
    let digits = normalize(code);
    if digits.len() < HYPHEN_AT {
        return digits;
    }
    let tail_end = digits.len().min(CEP_LEN);
    let mut out = format!("{}-{}", &digits[..HYPHEN_AT], &digits[HYPHEN_AT..tail_end]);
    out.push_str(&digits[tail_end..]);
    out
}

/// CEP canônico: 8 dígitos, já normalizado e validado.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cep(String);

impl Cep {
    /// Normaliza e valida a entrada.
    pub fn parse(input: &str) -> Result<Self, BuscaCepError> {
        let digits = normalize(input);
        if digits.len() == CEP_LEN {
            Ok(Self(digits))
        } else {
            Err(BuscaCepError::InvalidCep(input.to_string()))
        }
    }

    /// Os 8 dígitos.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Forma `NNNNN-NNN`.
    pub fn display(&self) -> String {
        format_for_display(&self.0)
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl TryFrom<String> for Cep {
    type Error = BuscaCepError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl std::str::FromStr for Cep {
    type Err = BuscaCepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Cep> for String {
    fn from(cep: Cep) -> Self {
        cep.0
    }
}

impl AsRef<str> for Cep {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
