//! Logs estruturados do gate via `tracing-subscriber`.
//!
//! Os logs vão sempre para o stderr: o stdout fica reservado aos comandos
//! de workflow (`::error::`) lidos pelo runner do Actions.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Formato das linhas de log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Linhas legíveis, para terminal e logs do Actions.
    #[default]
    Text,
    /// Um objeto JSON por linha.
    Json,
}

impl LogFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

/// Diretivas usadas quando `RUST_LOG` não está definido: o gate no nível
/// pedido, as dependências (reqwest, hyper) apenas a partir de `warn`.
pub fn default_directives(level: Level) -> String {
    format!("ops_build_gate={},warn", level.as_str().to_ascii_lowercase())
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Instala o subscriber global. Só a primeira chamada tem efeito.
pub fn init_tracing(format: LogFormat, level: Level) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
