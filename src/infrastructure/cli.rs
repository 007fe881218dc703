use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::version;

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Replay a JSON5 navigation script against the headless page
    Replay {
        /// Path to the script
        script: PathBuf,

        /// Pretend the user prefers reduced motion
        #[arg(long)]
        reduced_motion: bool,

        /// Address fragment at load time
        #[arg(short, long, value_name = "FRAGMENT", default_value = "")]
        fragment: String,
    },
    /// Print the configured route table
    Routes,
    /// Resolve a fragment to its route and section
    Resolve {
        #[arg(allow_hyphen_values = true)]
        fragment: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_replay() {
        let cli = Cli::parse_from(["hashview", "replay", "nav.json5", "--reduced-motion"]);
        assert_eq!(
            cli.command,
            Command::Replay {
                script: PathBuf::from("nav.json5"),
                reduced_motion: true,
                fragment: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::parse_from(["hashview", "resolve", "#/work"]);
        assert_eq!(
            cli.command,
            Command::Resolve {
                fragment: "#/work".into()
            }
        );
    }
}
