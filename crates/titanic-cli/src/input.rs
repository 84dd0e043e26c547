use std::path::PathBuf;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};

use titanic_classifiers::config::{load_pipeline_config, PipelineConfig};

pub fn build_cli() -> Command {
    Command::new("titanic")
        .version(clap::crate_version!())
        .about("\u{1F6A2} Titanic survival analysis with logistic regression")
        .arg(
            Arg::new("data")
                .help("Path to the passenger CSV. Overrides the data path in the configuration file.")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a JSON pipeline configuration file")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("output_dir")
                .short('o')
                .long("output-dir")
                .help("Directory the plots and the HTML report are written to")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("no_plots")
                .long("no-plots")
                .help("Do not write the plot files.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no_report")
                .long("no-report")
                .help("Disable HTML report generation.")
                .action(ArgAction::SetTrue),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
}

/// Load the configuration file when one is given, then apply command line
/// overrides on top of it.
pub fn config_from_arguments(matches: &ArgMatches) -> Result<PipelineConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(config_path) => {
            log::info!("Using config: {:?}", config_path);
            load_pipeline_config(config_path)?
        }
        None => PipelineConfig::default(),
    };

    if let Some(data) = matches.get_one::<PathBuf>("data") {
        config.data_path = data.clone();
    }
    if let Some(output_dir) = matches.get_one::<PathBuf>("output_dir") {
        config.output_dir = output_dir.clone();
    }
    if matches.get_flag("no_plots") {
        config.write_plots = false;
    }
    if matches.get_flag("no_report") {
        config.write_report = false;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Result<PipelineConfig> {
        let matches = build_cli().try_get_matches_from(args)?;
        config_from_arguments(&matches)
    }

    #[test]
    fn no_arguments_gives_defaults() {
        let config = parse(&["titanic"]).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "titanic",
            "train.csv",
            "-o",
            "out",
            "--no-plots",
            "--no-report",
        ])
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("train.csv"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(!config.write_plots);
        assert!(!config.write_report);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"seed": 7, "data_path": "from_file.csv", "test_size": 0.25}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = parse(&["titanic", "-c", &path]).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.test_size, 0.25);
        assert_eq!(config.data_path, PathBuf::from("from_file.csv"));

        let config = parse(&["titanic", "cli.csv", "--config", &path]).unwrap();
        assert_eq!(config.data_path, PathBuf::from("cli.csv"));
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(parse(&["titanic", "-c", "/definitely/not/here.json"]).is_err());
    }
}
