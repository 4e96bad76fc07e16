use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{registry, Layer};

/// If a global tracing subscriber is not already configured, set up logging to stderr at the
/// given level, and add our custom panic hook.
///
/// Records emitted through the `log` facade are forwarded to the subscriber.
pub fn install_logger(level: LevelFilter) {
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(level);

    if registry().with(layer).try_init().is_ok() {
        update_panic_hook();
    }
}

/// The level of the logger: `DEBUG` when verbose, `INFO` otherwise.
pub fn log_level(verbose: bool) -> LevelFilter {
    match verbose {
        true => LevelFilter::DEBUG,
        false => LevelFilter::INFO,
    }
}

fn update_panic_hook() {
    let hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |info| {
        log::error!("PANIC => {}", info);
        hook(info);
    }));
}
