//! Configuração do gate carregada a partir de `ops-gate.toml`.
//!
//! A struct [`GateConfig`] contém todos os parâmetros ajustáveis.
//! Valores ausentes no arquivo usam os defaults. As variáveis `GITHUB_TOKEN`
//! e `GITHUB_API_URL` têm precedência sobre o arquivo quando não vazias, e
//! as flags da CLI ([`Overrides`]) têm precedência sobre ambos.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::gate::{PollPolicy, TRACKED_CONTEXT, WARNING_DESCRIPTION};

pub const DEFAULT_CONFIG_FILE: &str = "ops-gate.toml";

/// Configuração de nível superior carregada de `ops-gate.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct GateConfig {
    /// Token usado para ler os status do commit.
    #[serde(default)]
    pub github_token: String,

    /// URL base da API REST do GitHub.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Contexto de status que o gate aguarda.
    #[serde(default = "default_tracked_context")]
    pub tracked_context: String,

    /// Descrição de um `success` que indica build com avisos.
    #[serde(default = "default_warning_description")]
    pub warning_description: String,

    /// Segundos entre duas consultas de status.
    #[serde(default = "default_poll_delay_secs")]
    pub poll_delay_secs: u64,

    /// Retentativas enquanto o contexto ainda não foi reportado.
    #[serde(default = "default_discovery_retries")]
    pub discovery_retries: u32,

    /// Novas consultas enquanto o contexto continua `pending`.
    #[serde(default = "default_pending_retries")]
    pub pending_retries: u32,

    /// Limite total de tempo; a execução é cancelada quando ele expira.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_tracked_context() -> String {
    TRACKED_CONTEXT.to_string()
}

fn default_warning_description() -> String {
    WARNING_DESCRIPTION.to_string()
}

fn default_poll_delay_secs() -> u64 {
    10
}

fn default_discovery_retries() -> u32 {
    30
}

// Uma hora com o atraso padrão.
fn default_pending_retries() -> u32 {
    360
}

/// Valores da linha de comando; `None` mantém o valor do arquivo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub poll_delay_secs: Option<u64>,
    pub discovery_retries: Option<u32>,
    pub pending_retries: Option<u32>,
    pub timeout_secs: Option<u64>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            github_token: String::new(),
            api_url: default_api_url(),
            tracked_context: default_tracked_context(),
            warning_description: default_warning_description(),
            poll_delay_secs: default_poll_delay_secs(),
            discovery_retries: default_discovery_retries(),
            pending_retries: default_pending_retries(),
            timeout_secs: None,
        }
    }
}

impl GateConfig {
    /// Carrega a configuração de `path`, ou os defaults se o arquivo não
    /// existir, e aplica as variáveis de ambiente.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str::<GateConfig>(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(token) = var("GITHUB_TOKEN")
            && !token.is_empty()
        {
            self.github_token = token;
        }
        if let Some(url) = var("GITHUB_API_URL")
            && !url.is_empty()
        {
            self.api_url = url;
        }
    }

    /// Aplica os valores passados na linha de comando.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(secs) = overrides.poll_delay_secs {
            self.poll_delay_secs = secs;
        }
        if let Some(retries) = overrides.discovery_retries {
            self.discovery_retries = retries;
        }
        if let Some(retries) = overrides.pending_retries {
            self.pending_retries = retries;
        }
        if overrides.timeout_secs.is_some() {
            self.timeout_secs = overrides.timeout_secs;
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            context: self.tracked_context.clone(),
            warning_description: self.warning_description.clone(),
            delay: Duration::from_secs(self.poll_delay_secs),
            discovery_retries: self.discovery_retries,
            pending_retries: self.pending_retries,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_values() {
        let config = GateConfig::default();
        assert!(config.github_token.is_empty());
        assert_eq!(config.api_url, "https://api.github.com");
        assert_eq!(config.tracked_context, "OpenPublishing.Build");
        assert_eq!(config.warning_description, "Validation status: warnings");
        assert_eq!(config.poll_delay_secs, 10);
        assert_eq!(config.discovery_retries, 30);
        assert_eq!(config.pending_retries, 360);
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            poll_delay_secs = 5
            pending_retries = 12
            timeout_secs = 900
        "#;
        let config: GateConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.poll_delay_secs, 5);
        assert_eq!(config.pending_retries, 12);
        assert_eq!(config.timeout(), Some(Duration::from_secs(900)));
        assert_eq!(config.discovery_retries, 30);
        assert_eq!(config.tracked_context, "OpenPublishing.Build");
    }

    #[test]
    fn poll_policy_mirrors_config() {
        let config = GateConfig {
            poll_delay_secs: 3,
            discovery_retries: 4,
            pending_retries: 5,
            tracked_context: "ci/build".into(),
            ..GateConfig::default()
        };
        let policy = config.poll_policy();
        assert_eq!(policy.delay, Duration::from_secs(3));
        assert_eq!(policy.discovery_retries, 4);
        assert_eq!(policy.pending_retries, 5);
        assert_eq!(policy.context, "ci/build");
        assert_eq!(policy.warning_description, "Validation status: warnings");
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GITHUB_TOKEN", "ghs_env"),
            ("GITHUB_API_URL", ""),
        ]);
        let mut config = GateConfig {
            github_token: "from-file".into(),
            api_url: "https://ghe.example.com/api/v3".into(),
            ..GateConfig::default()
        };
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.github_token, "ghs_env");
        // Empty values are ignored.
        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut config = GateConfig {
            poll_delay_secs: 30,
            discovery_retries: 8,
            pending_retries: 90,
            timeout_secs: Some(600),
            ..GateConfig::default()
        };
        config.apply_overrides(&Overrides {
            poll_delay_secs: Some(2),
            pending_retries: Some(4),
            ..Overrides::default()
        });
        assert_eq!(config.poll_delay_secs, 2);
        assert_eq!(config.pending_retries, 4);
        // Absent flags keep the file values.
        assert_eq!(config.discovery_retries, 8);
        assert_eq!(config.timeout(), Some(Duration::from_secs(600)));

        config.apply_overrides(&Overrides {
            discovery_retries: Some(0),
            timeout_secs: Some(45),
            ..Overrides::default()
        });
        assert_eq!(config.discovery_retries, 0);
        assert_eq!(config.timeout(), Some(Duration::from_secs(45)));
        assert_eq!(config.poll_policy().delay, Duration::from_secs(2));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "discovery_retries = 2\ntracked_context = \"ci/docs\"\n").unwrap();

        let config = GateConfig::from_file(&path).unwrap();
        assert_eq!(config.discovery_retries, 2);
        assert_eq!(config.tracked_context, "ci/docs");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GateConfig::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.discovery_retries, 30);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "poll_delay_secs = \"soon\"").unwrap();
        let err = GateConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }
}
