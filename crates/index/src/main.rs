mod args;

use anyhow::{bail, Result};
use clap::Parser;
use mentis_lib::{
    config::IndexConfig,
    manifest,
    validate::{self, ValidationReport},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use args::{BuildArgs, Cli, Commands, ValidateArgs};

fn load_config(cli: &Cli) -> Result<IndexConfig> {
    let mut config = match &cli.config {
        Some(path) => IndexConfig::load(path)?,
        None => IndexConfig::default(),
    };
    if let Some(site_root) = &cli.site_root {
        config.site_root = site_root.clone();
    }
    Ok(config)
}

fn with_build_args(mut config: IndexConfig, args: BuildArgs) -> IndexConfig {
    if args.content_dir.is_some() {
        config.content_dir = args.content_dir;
    }
    if args.output.is_some() {
        config.output = args.output;
    }
    config
}

fn build(config: IndexConfig, args: BuildArgs) -> Result<()> {
    let config = with_build_args(config, args);
    let summary = mentis_lib::build_index(&config)?;
    if summary.skipped > 0 {
        warn!(
            "{} file(s) were skipped, see errors above",
            summary.skipped
        );
    }
    Ok(())
}

fn log_issues(report: &ValidationReport) {
    for issue in report.errors() {
        error!("{}", issue.message);
    }
    for issue in report.warnings() {
        warn!("{}", issue.message);
    }
}

fn check_manifest(config: IndexConfig, args: ValidateArgs) -> Result<()> {
    let path = args.manifest.unwrap_or_else(|| config.output());
    let entries = manifest::read_manifest(&path)?;
    let validation = validate::validate(&entries, &config.site_root)?;

    log_issues(&validation);
    if validation.has_errors() {
        bail!(
            "Validation failed with {} error(s)",
            validation.errors().count()
        );
    }
    info!("Validation passed for {} posts.", validation.checked);
    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Build(args)) => build(config, args),
        None => build(config, BuildArgs::default()),
        Some(Commands::Validate(args)) => check_manifest(config, args),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use camino::Utf8PathBuf;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::{load_config, with_build_args};
    use crate::args::{Cli, Commands};

    fn config_file(dir: &tempfile::TempDir) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(dir.path().join("index.yaml")).unwrap();
        std::fs::write(
            &path,
            "site-root: from-file\noutput: from-file/index.json\ndefault-author: File Desk\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn flags_beat_file_and_file_beats_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file(&dir);
        let cli = Cli::try_parse_from([
            "mentis-index",
            "--config",
            path.as_str(),
            "--site-root",
            "from-flag",
            "build",
            "-o",
            "from-flag/posts.json",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        let Some(Commands::Build(args)) = cli.command else {
            panic!("expected build");
        };
        let config = with_build_args(config, args);

        assert_eq!(Utf8PathBuf::from("from-flag"), config.site_root);
        assert_eq!(Utf8PathBuf::from("from-flag/posts.json"), config.output());
        assert_eq!(Utf8PathBuf::from("from-flag/content"), config.content_dir());
        assert_eq!("File Desk", config.default_author);
        assert_eq!(200, config.excerpt_length);
    }

    #[test]
    fn file_values_apply_without_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file(&dir);
        let cli = Cli::try_parse_from(["mentis-index", "-C", path.as_str()]).unwrap();

        let config = with_build_args(load_config(&cli).unwrap(), Default::default());
        assert_eq!(Utf8PathBuf::from("from-file"), config.site_root);
        assert_eq!(Utf8PathBuf::from("from-file/index.json"), config.output());
        assert_eq!("File Desk", config.default_author);
    }

    #[test]
    fn defaults_without_config() {
        let cli = Cli::try_parse_from(["mentis-index", "build"]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(Utf8PathBuf::from("public"), config.site_root);
        assert_eq!(Utf8PathBuf::from("public/posts.json"), config.output());
        assert_eq!("Nexairi Editorial", config.default_author);
    }

    #[test]
    fn unreadable_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().join("index.yaml")).unwrap();
        std::fs::write(&path, "site-root: [unclosed\n").unwrap();
        let cli = Cli::try_parse_from(["mentis-index", "-C", path.as_str()]).unwrap();
        assert!(load_config(&cli).is_err());
    }
}
