use std::process::ExitCode;

use clap::Parser;
use rawnet::cli::Cli;
use rawnet::logger::{install_logger, log_level};

fn main() -> ExitCode {
    let cli = Cli::parse();
    install_logger(log_level(cli.verbose));

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::from(2);
        }
    };

    let model = match rawnet::load_model(&config) {
        Ok(model) => model,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::from(err.exit_code());
        }
    };

    match rawnet::evaluate_model(&model, &config) {
        Ok(report) => {
            println!("end: {report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
