//! CLI entry point for strata.

mod demos;

use strata::cli::Cli;
use strata::config::load_config;
use strata::ui::session::{Session, SessionOptions};

#[tokio::main]
async fn main() {
    let mut cli = Cli::new();
    if let Err(e) = demos::register_all(&mut cli) {
        fail(e);
    }

    let parsed = match cli.parse(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(e) => fail(e),
    };

    // Load config.
    let mut config = match load_config(parsed.globals.config.as_deref()) {
        Ok(c) => c,
        Err(e) => fail(e),
    };

    // Apply CLI overrides.
    if parsed.globals.no_color {
        config.display.color = false;
    }

    if let Err(e) = strata::logging::init(&config.logging) {
        eprintln!("warning: failed to initialize logging: {e}");
    }

    let options = match SessionOptions::from_config(&config) {
        Ok(options) => options,
        Err(e) => fail(e),
    };
    let session = Session::stdout(options);

    if let Err(e) = cli.dispatch(parsed.invocation, &session).await {
        fail(e);
    }
}

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}
