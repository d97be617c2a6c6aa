use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{Level, error};

use ops_build_gate::cli::{Cli, Command, EventArgs};
use ops_build_gate::config::GateConfig;
use ops_build_gate::error::GateError;
use ops_build_gate::event::Classification;
use ops_build_gate::gate::{TracingObserver, Verdict};
use ops_build_gate::github::GitHubClient;
use ops_build_gate::report::ActionsReporter;
use ops_build_gate::runner::{GateRunner, cancel_after, cancel_on_interrupt};
use ops_build_gate::telemetry::{LogFormat, init_tracing};
use ops_build_gate::ui::GateProgress;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(LogFormat::from_json_flag(cli.json_logs), level);

    let mut config = match GateConfig::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            error!("{err:#}");
            return fault(&GateError::Config(format!("{err:#}")));
        }
    };

    let mut reporter = ActionsReporter::stdout();
    let reported = match cli.command {
        Command::Check { event, poll } => {
            config.apply_overrides(&poll.overrides());
            match check(&config, &event).await {
                Ok(verdict) => reporter.report(&verdict),
                Err(err) => {
                    error!(error = %err, "gate aborted without a verdict");
                    reporter.report_fault(&err)
                }
            }
        }
        Command::Classify { event } => match event.inputs().classify() {
            Ok(Classification::Applicable(commit)) => {
                println!("{commit}");
                return ExitCode::SUCCESS;
            }
            Ok(Classification::NotApplicable) => {
                reporter.report(&Verdict::FailNotApplicableEvent)
            }
            Err(err) => reporter.report_fault(&err),
        },
    };
    reported.unwrap_or_else(|err| {
        error!(error = %err, "failed to write the report");
        ExitCode::FAILURE
    })
}

fn fault(err: &GateError) -> ExitCode {
    ActionsReporter::stdout()
        .report_fault(err)
        .unwrap_or(ExitCode::FAILURE)
}

async fn check(config: &GateConfig, args: &EventArgs) -> Result<Verdict, GateError> {
    let client = GitHubClient::with_base_url(config.github_token.clone(), config.api_url.clone())?;

    let cancel = CancellationToken::new();
    cancel_on_interrupt(&cancel);
    if let Some(limit) = config.timeout() {
        cancel_after(&cancel, limit);
    }

    let runner = GateRunner::new(
        client,
        config.poll_policy(),
        (TracingObserver, GateProgress::start()),
    )
    .with_cancellation(cancel.clone());

    let outcome = runner.run(&args.inputs()).await;
    cancel.cancel();
    match &outcome {
        Ok(verdict) => runner.observer.1.finish(verdict),
        Err(_) => runner.observer.1.clear(),
    }
    outcome
}
