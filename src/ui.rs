//! Interface de terminal do gate: spinner do `indicatif` e linhas coloridas
//! do `console`.
//!
//! O [`GateProgress`] é um [`ReconcileObserver`] e acompanha as mesmas
//! transições que os logs. O `indicatif` esconde o spinner quando o stderr
//! não é um terminal.

use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::event::CommitRef;
use crate::gate::{ReconcileObserver, StatusRecord, Verdict};

/// Indicador visual da espera pelo status no terminal.
pub struct GateProgress {
    // Spinner do indicatif.
    pb: ProgressBar,
    // Verde para aprovação.
    green: Style,
    // Vermelho para reprovação.
    red: Style,
    // Amarelo para o status encontrado.
    yellow: Style,
}

impl GateProgress {
    /// Inicia o spinner antes de o evento ser classificado.
    pub fn start() -> Self {
        let progress = Self::with_bar(ProgressBar::new_spinner());
        progress.pb.set_message("Looking for status checks");
        progress.pb.enable_steady_tick(Duration::from_millis(100));
        progress
    }

    /// Instância que nunca desenha nada.
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(pb: ProgressBar) -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Para o spinner e imprime a linha do veredito.
    pub fn finish(&self, verdict: &Verdict) {
        self.pb.finish_and_clear();
        if self.pb.is_hidden() {
            return;
        }
        match verdict.failure_message() {
            None => eprintln!("  {} Status check passed", self.green.apply_to("✓")),
            Some(message) => eprintln!("  {} {message}", self.red.apply_to("✗")),
        }
    }

    /// Para o spinner sem imprimir nada.
    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }

    pub fn message(&self) -> String {
        self.pb.message()
    }
}

impl ReconcileObserver for GateProgress {
    fn discovery_missed(&self, commit: &CommitRef, attempt: u32, retries_left: u32) {
        self.pb.set_message(format!(
            "Waiting for status to be reported on {commit} (attempt {attempt}, {retries_left} retries left)"
        ));
    }

    fn discovered(&self, commit: &CommitRef, record: &StatusRecord, _attempt: u32) {
        self.pb.println(format!(
            "  {} Found {} ({}) on {commit}",
            self.yellow.apply_to("●"),
            record.context,
            record.state
        ));
    }

    fn still_pending(&self, _commit: &CommitRef, record: &StatusRecord, polls: u32) {
        let detail = record.description.as_deref().unwrap_or("no description");
        self.pb
            .set_message(format!("{} is pending: {detail} (poll {polls})", record.context));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StatusState;

    fn commit() -> CommitRef {
        CommitRef {
            owner: "acme".into(),
            repo: "docs".into(),
            sha: "cafebabe00".into(),
            pull_number: None,
        }
    }

    #[test]
    fn messages_follow_transitions() {
        let progress = GateProgress::hidden();
        assert_eq!(progress.message(), "");

        progress.discovery_missed(&commit(), 1, 29);
        assert_eq!(
            progress.message(),
            "Waiting for status to be reported on acme/docs@cafebab (attempt 1, 29 retries left)"
        );

        let record = StatusRecord::new("OpenPublishing.Build", StatusState::Pending)
            .with_description("Build is running");
        progress.discovered(&commit(), &record, 2);
        progress.still_pending(&commit(), &record, 4);
        assert_eq!(
            progress.message(),
            "OpenPublishing.Build is pending: Build is running (poll 4)"
        );

        progress.finish(&Verdict::Pass);
    }
}
