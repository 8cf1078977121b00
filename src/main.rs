use atscore::cmd::CliApp;
use atscore::config::DEFAULT_LOG_LEVEL;
use atscore::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let app = CliApp::new();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Logs go to stderr so report output on stdout stays machine readable
    let filter = match app.log_level() {
        Some(level) => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), DEFAULT_LOG_LEVEL))
        }),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = app.run(config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
