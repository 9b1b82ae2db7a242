use std::net::TcpListener;
use std::process::ExitCode;

use log::error;
use quiz_quest::config::Config;
use quiz_quest::rewards::local::LocalGamification;
use quiz_quest::server::serve;

fn main() -> ExitCode {
    pretty_env_logger::init();

    let bind =
        std::env::var("QUIZ_QUEST_REWARDS_BIND").unwrap_or_else(|_| "127.0.0.1:8788".to_string());

    let config = match Config::load(None) {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let engine = match LocalGamification::open(&config.profiles_path) {
        Ok(engine) => engine,
        Err(err) => {
            error!("could not open {}: {err}", config.profiles_path.display());
            return ExitCode::FAILURE;
        }
    };

    let listener = match TcpListener::bind(&bind) {
        Ok(listener) => listener,
        Err(err) => {
            error!("could not bind {bind}: {err}");
            return ExitCode::FAILURE;
        }
    };

    serve(listener, &engine);
    ExitCode::SUCCESS
}
