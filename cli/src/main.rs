mod cli;
mod logging;
mod settings;
mod store;
mod transport;

use std::process::ExitCode;

use cli::CliCommand;

fn main() -> ExitCode {
    if let Err(err) = settings::log_path().and_then(|path| logging::init_logging(&path)) {
        eprintln!("urlscope: logging disabled: {err:#}");
    }

    match CliCommand::run_from_args() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("urlscope error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
