// src/main.rs

use std::process::ExitCode;

use keepalive::{cli, logging, run};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    let result = match logging::init_logging(args.log_level) {
        Ok(()) => run(args).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("keepalive error: {err:?}");
            ExitCode::FAILURE
        }
    }
}
