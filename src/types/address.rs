//! Endereço retornado pela consulta e região derivada da UF.

use serde::{Deserialize, Deserializer, Serialize};

use super::cep::Cep;

/// Texto para campos vazios.
pub const NOT_INFORMED: &str = "Não informado";

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

/// Macrorregião brasileira.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, Hash)]
pub enum Region {
    Norte,
    Nordeste,
    #[serde(rename = "Centro-Oeste")]
    CentroOeste,
    Sudeste,
    Sul,
    /// UF fora da tabela.
    #[default]
    Indefinida,
}

impl Region {
    /// Região a partir da sigla da UF. Nunca falha.
    pub fn from_uf(uf: &str) -> Self {
        match uf.trim().to_ascii_uppercase().as_str() {
            "AC" | "AP" | "AM" | "PA" | "RO" | "RR" | "TO" => Region::Norte,
            "AL" | "BA" | "CE" | "MA" | "PB" | "PE" | "PI" | "RN" | "SE" => Region::Nordeste,
            "DF" | "GO" | "MT" | "MS" => Region::CentroOeste,
            "ES" | "MG" | "RJ" | "SP" => Region::Sudeste,
            "PR" | "RS" | "SC" => Region::Sul,
            _ => Region::Indefinida,
        }
    }

    /// Região a partir do nome; nomes desconhecidos viram `Indefinida`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Norte" => Region::Norte,
            "Nordeste" => Region::Nordeste,
            "Centro-Oeste" => Region::CentroOeste,
            "Sudeste" => Region::Sudeste,
            "Sul" => Region::Sul,
            _ => Region::Indefinida,
        }
    }

    /// Nome da região.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Norte => "Norte",
            Region::Nordeste => "Nordeste",
            Region::CentroOeste => "Centro-Oeste",
            Region::Sudeste => "Sudeste",
            Region::Sul => "Sul",
            Region::Indefinida => "Indefinida",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Region::from_name(&name))
    }
}

/// Atalho para `Region::from_uf(uf).as_str()`.
pub fn region_of(uf: &str) -> &'static str {
    Region::from_uf(uf).as_str()
}

/// Endereço completo de um CEP.
///
/// Os nomes serializados seguem o JSON do ViaCEP, então o mesmo tipo
/// lê a resposta da API e os registros persistidos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// CEP canônico.
    #[serde(rename = "cep")]
    pub postal_code: Cep,

    /// Logradouro.
    #[serde(rename = "logradouro", default)]
    pub street: String,

    /// Complemento.
    #[serde(rename = "complemento", default)]
    pub complement: String,

    /// Bairro.
    #[serde(rename = "bairro", default)]
    pub neighborhood: String,

    /// Cidade.
    #[serde(rename = "localidade", default)]
    pub city: String,

    /// Sigla da UF.
    #[serde(rename = "uf", default)]
    pub state: String,

    /// DDD.
    #[serde(rename = "ddd", default)]
    pub area_code: String,

    /// Região derivada de `state`.
    #[serde(rename = "regiao", default)]
    pub region: Region,
}

impl Address {
    /// Cria um endereço mínimo, com região derivada da UF.
    pub fn new(postal_code: Cep, state: impl Into<String>) -> Self {
        let state = state.into();
        Self {
            postal_code,
            street: String::new(),
            complement: String::new(),
            neighborhood: String::new(),
            city: String::new(),
            region: Region::from_uf(&state),
            state,
            area_code: String::new(),
        }
    }

    /// Recalcula `region` a partir de `state`.
    #[must_use]
    pub fn with_derived_region(mut self) -> Self {
        self.region = Region::from_uf(&self.state);
        self
    }

    /// Resumo curto usado no histórico: `logradouro, bairro`.
    pub fn short_summary(&self) -> String {
        trim_trailing_separator(&format!("{}, {}", self.street, self.neighborhood))
    }

    /// Resumo longo usado nos salvos: `logradouro, bairro, cidade`.
    pub fn long_summary(&self) -> String {
        trim_trailing_separator(&format!(
            "{}, {}, {}",
            self.street, self.neighborhood, self.city
        ))
    }

    /// `cidade/UF`, sem espaços nas pontas.
    pub fn city_line(&self) -> String {
        format!("{}/{}", self.city, self.state).trim().to_string()
    }

    /// Pares (rótulo, valor) na ordem de exibição.
    pub fn display_lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("CEP", self.postal_code.display()),
            ("Logradouro", or_not_informed(&self.street)),
            ("Bairro", or_not_informed(&self.neighborhood)),
            ("Cidade/UF", self.city_line()),
            ("Complemento", or_not_informed(&self.complement)),
            ("DDD", or_not_informed(&self.area_code)),
            ("Região", self.region.to_string()),
        ]
    }

    /// Bloco de texto para copiar o endereço.
    pub fn to_clipboard_text(&self) -> String {
        format!(
            "CEP: {}\nLogradouro: {}\nBairro: {}\nCidade/UF: {}/{}\nComplemento: {}\nDDD: {}\nRegião: {}",
            self.postal_code.display(),
            or_not_informed(&self.street),
            or_not_informed(&self.neighborhood),
            self.city,
            self.state,
            or_not_informed(&self.complement),
            or_not_informed(&self.area_code),
            self.region,
        )
    }

    /// Link de busca no Google Maps.
    ///
    /// `None` sem logradouro ou cidade.
    pub fn maps_url(&self) -> Option<String> {
        if self.street.is_empty() || self.city.is_empty() {
            return None;
        }
        let query = format!(
            "{}, {}, {} - {}",
            self.street, self.neighborhood, self.city, self.state
        );
        Some(format!(
            "{}{}",
            MAPS_SEARCH_URL,
            urlencoding::encode(&query)
        ))
    }
}

fn or_not_informed(value: &str) -> String {
    if value.is_empty() {
        NOT_INFORMED.to_string()
    } else {
        value.to_string()
    }
}

/// Remove uma vírgula final (e os espaços depois dela).
fn trim_trailing_separator(s: &str) -> String {
    let trimmed = s.trim_end();
    match trimmed.strip_suffix(',') {
        Some(rest) => rest.to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paulista() -> Address {
        Address {
            postal_code: Cep::parse("01310-100").unwrap(),
            street: "Avenida Paulista".to_string(),
            complement: "de 612 a 1510 - lado par".to_string(),
            neighborhood: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            area_code: "11".to_string(),
            region: Region::Sudeste,
        }
    }

    #[test]
    fn test_region_table() {
        assert_eq!(region_of("SP"), "Sudeste");
        assert_eq!(region_of("ZZ"), "Indefinida");
        assert_eq!(region_of(""), "Indefinida");
        assert_eq!(Region::from_uf("DF"), Region::CentroOeste);
        assert_eq!(Region::from_uf("am"), Region::Norte);
        assert_eq!(Region::from_uf("PE"), Region::Nordeste);
        assert_eq!(Region::from_uf("RS"), Region::Sul);
    }

    #[test]
    fn test_region_table_covers_all_states() {
        let states = [
            "AC", "AP", "AM", "PA", "RO", "RR", "TO", "AL", "BA", "CE", "MA", "PB", "PE", "PI",
            "RN", "SE", "DF", "GO", "MT", "MS", "ES", "MG", "RJ", "SP", "PR", "RS", "SC",
        ];
        assert_eq!(states.len(), 27);
        for uf in states {
            assert_ne!(Region::from_uf(uf), Region::Indefinida, "{uf}");
        }
    }

    #[test]
    fn test_region_serde_name() {
        assert_eq!(
            serde_json::to_string(&Region::CentroOeste).unwrap(),
            "\"Centro-Oeste\""
        );
        let region: Region = serde_json::from_str("\"Centro-Oeste\"").unwrap();
        assert_eq!(region, Region::CentroOeste);
        let region: Region = serde_json::from_str("\"Atlântida\"").unwrap();
        assert_eq!(region, Region::Indefinida);
    }

    #[test]
    fn test_short_summary() {
        assert_eq!(paulista().short_summary(), "Avenida Paulista, Bela Vista");

        let mut addr = paulista();
        addr.neighborhood.clear();
        assert_eq!(addr.short_summary(), "Avenida Paulista");

        addr.street.clear();
        assert_eq!(addr.short_summary(), "");
    }

    #[test]
    fn test_short_summary_keeps_leading_separator() {
        let mut addr = paulista();
        addr.street.clear();
        assert_eq!(addr.short_summary(), ", Bela Vista");
    }

    #[test]
    fn test_long_summary() {
        assert_eq!(
            paulista().long_summary(),
            "Avenida Paulista, Bela Vista, São Paulo"
        );

        let mut addr = paulista();
        addr.city.clear();
        assert_eq!(addr.long_summary(), "Avenida Paulista, Bela Vista");
    }

    #[test]
    fn test_display_lines_fallbacks() {
        let addr = Address::new(Cep::parse("70040010").unwrap(), "DF");
        let lines = addr.display_lines();

        assert_eq!(lines[0], ("CEP", "70040-010".to_string()));
        assert_eq!(lines[1].1, NOT_INFORMED);
        assert_eq!(lines[3].1, "/DF");
        assert_eq!(lines[6].1, "Centro-Oeste");
    }

    #[test]
    fn test_clipboard_text() {
        let text = paulista().to_clipboard_text();
        assert!(text.starts_with("CEP: 01310-100\n"));
        assert!(text.contains("Cidade/UF: São Paulo/SP"));
        assert!(text.ends_with("Região: Sudeste"));
    }

    #[test]
    fn test_maps_url() {
        let url = paulista().maps_url().unwrap();
        assert!(url.starts_with(MAPS_SEARCH_URL));
        assert!(url.contains("Avenida%20Paulista"));

        let mut addr = paulista();
        addr.street.clear();
        assert!(addr.maps_url().is_none());
    }

    #[test]
    fn test_deserialize_viacep_shape() {
        let json = r#"{
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "complemento": "de 612 a 1510 - lado par",
            "unidade": "",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP",
            "ibge": "3550308",
            "ddd": "11"
        }"#;

        let addr: Address = serde_json::from_str(json).unwrap();
        let addr = addr.with_derived_region();
        assert_eq!(addr, paulista());
    }
}
