use std::env::args;

use log::info;

use smokers::config::Config;

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    Config::from_args(args().skip(1))
        .and_then(|config| {
            info!(
                "{} mode, {} rounds{}",
                config.mode,
                config.iterations,
                config
                    .seed
                    .map(|seed| format!(", seed {seed}"))
                    .unwrap_or_default()
            );
            smokers::run(&config)
        })
        .map(|tally| println!("{tally}"))
        .map_err(|e| e.to_string())
}
