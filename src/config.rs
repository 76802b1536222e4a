//! Configuração do Convert Buddy carregada a partir de `convert-buddy.toml`.
//!
//! A struct [`ConvertConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `CONVERT_BUDDY_API_BASE` tem precedência sobre o arquivo.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConvertError;

const CONFIG_FILE: &str = "convert-buddy.toml";
const API_BASE_ENV: &str = "CONVERT_BUDDY_API_BASE";

/// Configuração de nível superior carregada de `convert-buddy.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    /// URL base da API (sem `/` final).
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Intervalo entre consultas de status, em milissegundos.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Conversão usada quando `--target` não é informado.
    #[serde(default = "default_target")]
    pub default_target: String,
}

// Valor padrão da URL base: servidor local na porta 8000.
fn default_api_base() -> String {
    "http://localhost:8000".to_string()
}

// Valor padrão do intervalo de polling: 1500ms.
fn default_poll_interval_ms() -> u64 {
    1500
}

// Primeira conversão do catálogo.
fn default_target() -> String {
    "mp4->mp3".to_string()
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            poll_interval_ms: default_poll_interval_ms(),
            default_target: default_target(),
        }
    }
}

impl ConvertConfig {
    /// Carrega a configuração de `convert-buddy.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self, ConvertError> {
        let mut config = Self::from_file(Path::new(CONFIG_FILE))?;

        // Variável de ambiente tem precedência sobre o arquivo de configuração.
        if let Ok(base) = std::env::var(API_BASE_ENV)
            && !base.trim().is_empty()
        {
            config.api_base = base;
        }

        config.normalize()?;
        Ok(config)
    }

    /// Lê um arquivo TOML; ausente significa configuração padrão.
    pub fn from_file(path: &Path) -> Result<Self, ConvertError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str::<ConvertConfig>(&contents)?)
    }

    /// Remove `/` finais da URL base e valida o intervalo.
    pub fn normalize(&mut self) -> Result<(), ConvertError> {
        self.api_base = self.api_base.trim().trim_end_matches('/').to_string();
        if self.api_base.is_empty() {
            return Err(ConvertError::Config("api_base must not be empty".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConvertError::Config(
                "poll_interval_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
