use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Builds and checks the posts manifest read by the site at runtime
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory the site is served from (default: public)
    #[arg(short = 'r', long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub site_root: Option<Utf8PathBuf>,

    /// YAML file with index settings
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<Utf8PathBuf>,

    /// Runs `build` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild the manifest from every content file
    #[command(visible_alias = "b")]
    Build(BuildArgs),

    /// Check an existing manifest for problems the site would trip over
    #[command(visible_alias = "v")]
    Validate(ValidateArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct BuildArgs {
    /// Directory to scan (default: <site-root>/content)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub content_dir: Option<Utf8PathBuf>,

    /// Manifest to write (default: <site-root>/posts.json)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<Utf8PathBuf>,
}

#[derive(clap::Args, Debug, Default)]
pub struct ValidateArgs {
    /// Manifest to check (default: <site-root>/posts.json)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub manifest: Option<Utf8PathBuf>,
}
