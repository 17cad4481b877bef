use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::chat::prompt::OutputMode;
use crate::export::ExportFormat;

#[derive(Parser, Debug)]
#[command(name = "resume-forge")]
#[command(about = "Turn a few notes about yourself into a styled resume using AI", long_about = None)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    pub config: PathBuf,

    /// Read the form from a TOML file instead of asking interactively
    #[arg(short, long, value_name = "FILE")]
    pub form: Option<PathBuf>,

    /// What to ask the model for (defaults to the config file's output.mode)
    #[arg(short, long, value_enum)]
    pub mode: Option<OutputMode>,

    /// Export format (defaults to the config file's output.format)
    #[arg(long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Output file path (defaults to resume.pdf or resume.html)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Validate a saved raw model response instead of calling the service
    #[arg(short, long, value_name = "FILE")]
    pub response: Option<PathBuf>,

    /// Print the compiled prompt and exit
    #[arg(long)]
    pub print_prompt: bool,

    /// Sets the logger's verbosity level
    #[arg(short, long, value_name = "VERBOSITY", default_value_t = LevelFilter::Info)]
    pub verbosity: LevelFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["resume-forge"]).unwrap();
        assert_eq!(args.config, PathBuf::from("config.toml"));
        assert!(args.form.is_none());
        assert!(args.mode.is_none());
        assert!(!args.print_prompt);
        assert_eq!(args.verbosity, LevelFilter::Info);
    }

    #[test]
    fn test_value_enums() {
        let args = Args::try_parse_from([
            "resume-forge",
            "--mode",
            "markup",
            "--format",
            "html",
            "-o",
            "out.html",
        ])
        .unwrap();
        assert_eq!(args.mode, Some(OutputMode::Markup));
        assert_eq!(args.format, Some(ExportFormat::Html));
        assert_eq!(args.output, Some(PathBuf::from("out.html")));

        assert!(Args::try_parse_from(["resume-forge", "--mode", "yaml"]).is_err());
    }
}
