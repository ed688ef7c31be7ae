//! CLI entry point for calcline.

use std::io::{self, IsTerminal};

use calcline::cli::Args;
use calcline::config::load_config;
use calcline::error::StartupError;
use calcline::eval::{load, Bridge, EvaluatorSpec};
use calcline::logging::init_logging;
use calcline::render::Renderer;
use calcline::repl::{Session, SessionOptions, SessionSummary};
use calcline::term::{PipedTerminal, TerminalWidget, TtyTerminal};
use clap::Parser;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let renderer = Renderer::new(!args.no_color && io::stderr().is_terminal());

    let loaded = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            renderer.error(&format!("config: {e}"));
            std::process::exit(1);
        }
    };
    let mut config = loaded.config;
    args.apply_overrides(&mut config);

    if let Err(e) = init_logging(&config.logging) {
        renderer.error(&format!("logging: {e}"));
        std::process::exit(1);
    }
    tracing::info!(source = %loaded.source, "configuration loaded");

    // The evaluator is checked before the terminal is touched, so a failed
    // load leaves the user's terminal exactly as it was.
    let spec = match EvaluatorSpec::from_config(&config.evaluator) {
        Ok(spec) => spec,
        Err(e) => {
            renderer.error(&e.to_string());
            std::process::exit(1);
        }
    };
    let bridge = match load(&spec) {
        Ok(evaluator) => Bridge::new(evaluator),
        Err(e) => {
            tracing::error!(error = %e, "evaluator failed to load");
            renderer.error(&e.to_string());
            std::process::exit(1);
        }
    };

    let options = config.session_options();
    let result = if io::stdin().is_terminal() && io::stdout().is_terminal() {
        run_session(TtyTerminal::new(), bridge, &options).await
    } else {
        run_session(PipedTerminal::stdio(), bridge, &options).await
    };

    match result {
        Ok(summary) => {
            tracing::info!(
                submissions = summary.submissions,
                discarded = summary.discarded,
                "session ended"
            );
            if summary.discarded > 0 {
                renderer.note(&format!(
                    "{} key(s) typed during evaluation were discarded",
                    summary.discarded
                ));
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "session failed");
            renderer.error(&e.to_string());
            std::process::exit(1);
        }
    }
}

/// Start a session on `terminal` and run it until the key stream closes.
///
/// The session, and with it the terminal, is dropped before returning so raw
/// mode is restored before anything else reaches stderr.
async fn run_session<W: TerminalWidget>(
    terminal: W,
    bridge: Bridge,
    options: &SessionOptions,
) -> Result<SessionSummary, StartupError> {
    let mut session = Session::start(terminal, bridge, options)?;
    let summary = session.run().await?;
    drop(session);
    println!();
    Ok(summary)
}
