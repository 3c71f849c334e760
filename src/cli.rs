use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shred")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "ShredLang interpreter", long_about = None)]
pub struct Args {
    /// Program to run; read from stdin when neither FILE nor --eval is given
    #[arg(value_name = "FILE", conflicts_with = "eval")]
    pub file: Option<PathBuf>,

    #[arg(short, long, value_name = "SOURCE")]
    pub eval: Option<String>,

    /// Write shouted lines here instead of stdout
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    pub out: Option<PathBuf>,

    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Parse only and report the statement count
    #[arg(long = "check")]
    pub check: bool,

    /// Print the final variable bindings to stderr after a normal run
    #[arg(long = "dump-env")]
    pub dump_env: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completions
    Complete {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "Invalid color choice: {}. Must be 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Args::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, &bin_name, &mut io::stdout());
}
