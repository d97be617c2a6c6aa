//! Interface de linha de comando do gate baseada em clap.
//!
//! Define a struct [`Cli`] com os subcomandos [`Command`] (check, classify)
//! e as flags globais (--config, --verbose, --json-logs). Os dados do evento
//! usam por padrão as variáveis exportadas pelo runner do Actions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_CONFIG_FILE, Overrides};
use crate::event::EventInputs;

/// Reprova o pull request até o status OpenPublishing.Build passar.
#[derive(Debug, Parser)]
#[command(name = "ops-build-gate", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração TOML.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Habilita logs em nível debug.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Emite os logs como JSON, um objeto por linha.
    #[arg(long, global = true, default_value_t = false)]
    pub json_logs: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Aguarda o status e reprova a execução se ele não passou.
    Check {
        #[command(flatten)]
        event: EventArgs,

        #[command(flatten)]
        poll: PollArgs,
    },

    /// Apenas verifica se o evento se aplica e imprime o commit.
    Classify {
        #[command(flatten)]
        event: EventArgs,
    },
}

/// Dados do evento que disparou o workflow.
#[derive(Debug, Clone, Args)]
pub struct EventArgs {
    /// Nome do evento.
    #[arg(long, env = "GITHUB_EVENT_NAME", default_value = "")]
    pub event_name: String,

    /// Caminho do payload JSON do evento.
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Repositório no formato `owner/name`.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,
}

impl EventArgs {
    pub fn inputs(&self) -> EventInputs {
        EventInputs {
            name: self.event_name.clone(),
            payload_path: self.event_path.clone(),
            repository: self.repository.clone(),
        }
    }
}

/// Ajustes de polling que sobrepõem o arquivo de configuração.
#[derive(Debug, Clone, Default, Args)]
pub struct PollArgs {
    /// Segundos entre consultas de status.
    #[arg(long)]
    pub poll_delay: Option<u64>,

    /// Retentativas enquanto o status não foi reportado.
    #[arg(long)]
    pub discovery_retries: Option<u32>,

    /// Novas consultas enquanto o status está pendente.
    #[arg(long)]
    pub pending_retries: Option<u32>,

    /// Limite total de tempo em segundos.
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl PollArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            poll_delay_secs: self.poll_delay,
            discovery_retries: self.discovery_retries,
            pending_retries: self.pending_retries,
            timeout_secs: self.timeout,
        }
    }
}
