//! Tipos compartilhados do BuscaCEP.

pub mod address;
pub mod cep;
pub mod config;
pub mod errors;

pub use address::{region_of, Address, Region};
pub use cep::Cep;
pub use config::Config;
pub use errors::{BuscaCepError, BuscaCepResult, PersistResult, PersistenceError};
