use anyhow::Result;
use log::LevelFilter;

use titanic_classifiers::pipeline::run_pipeline;

mod input;

use input::{build_cli, config_from_arguments};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("TITANIC_LOG", "error,titanic=info"))
        .init();

    let matches = build_cli().get_matches();
    let config = config_from_arguments(&matches)?;
    log::info!("Running pipeline on {:?}", config.data_path);

    match run_pipeline(&config) {
        Ok(outcome) => {
            for path in &outcome.artifacts {
                log::info!("Wrote {}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            log::error!("Pipeline failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
