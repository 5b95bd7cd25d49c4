use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate a chat message and print the reply messages
    Translate {
        /// Message text (read from stdin when omitted)
        text: Option<String>,

        /// Sender identity attached to the message
        #[arg(short, long, default_value = "cli")]
        sender: String,
    },

    /// Show the detected script and translation directions for a text
    Classify {
        /// Text to classify
        text: String,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Output path
        #[arg(short, long, default_value = "tsuyaku.toml")]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_with_sender() {
        let args = Args::parse_from(["tsuyaku", "-v", "translate", "안녕하세요", "--sender", "U42"]);
        assert!(args.verbose);
        match args.command {
            Commands::Translate { text, sender } => {
                assert_eq!(text.as_deref(), Some("안녕하세요"));
                assert_eq!(sender, "U42");
            }
            _ => panic!("expected translate command"),
        }
    }

    #[test]
    fn test_init_config_default_path() {
        let args = Args::parse_from(["tsuyaku", "init-config"]);
        match args.command {
            Commands::InitConfig { output } => assert_eq!(output, PathBuf::from("tsuyaku.toml")),
            _ => panic!("expected init-config command"),
        }
    }
}
