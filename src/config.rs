use crate::cli::{Args, ColorChoice};
use std::path::PathBuf;

/// Where the program text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceInput {
    File(PathBuf),
    Inline(String),
    Stdin,
}

impl SourceInput {
    /// Name shown in diagnostic locators.
    pub fn display_name(&self) -> String {
        match self {
            SourceInput::File(path) => path.display().to_string(),
            SourceInput::Inline(_) => "<eval>".to_string(),
            SourceInput::Stdin => "<stdin>".to_string(),
        }
    }
}

pub struct AppConfig {
    pub input: SourceInput,
    pub out: Option<PathBuf>,
    pub color_enabled: bool,
    pub verbose: bool,
    pub check_only: bool,
    pub dump_env: bool,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let color_enabled = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty::is(atty::Stream::Stderr) && atty::is(atty::Stream::Stdout),
        };

        let input = match (&args.file, &args.eval) {
            (Some(path), _) => SourceInput::File(path.clone()),
            (None, Some(source)) => SourceInput::Inline(source.clone()),
            (None, None) => SourceInput::Stdin,
        };

        AppConfig {
            input,
            out: args.out.clone(),
            color_enabled,
            verbose: args.verbose,
            check_only: args.check,
            dump_env: args.dump_env,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(argv: &[&str]) -> AppConfig {
        AppConfig::from_args(&Args::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_input_selection() {
        assert_eq!(
            config(&["shred", "a.shd"]).input,
            SourceInput::File(PathBuf::from("a.shd"))
        );
        assert_eq!(
            config(&["shred", "-e", "shout(1)"]).input,
            SourceInput::Inline("shout(1)".to_string())
        );
        assert_eq!(config(&["shred"]).input, SourceInput::Stdin);
    }

    #[test]
    fn test_explicit_color() {
        assert!(config(&["shred", "--color", "always"]).color_enabled);
        assert!(!config(&["shred", "--color", "never"]).color_enabled);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(SourceInput::Stdin.display_name(), "<stdin>");
        assert_eq!(SourceInput::Inline(String::new()).display_name(), "<eval>");
        assert_eq!(SourceInput::File(PathBuf::from("x.shd")).display_name(), "x.shd");
    }
}
