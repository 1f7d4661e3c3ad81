//! Main commands enum.

use std::path::PathBuf;

use clap::Subcommand;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Replay a JSONL capture and print the aggregated streams
    Replay {
        /// Capture file (reads stdin when omitted)
        file: Option<PathBuf>,
        /// Stream id to track from the start (repeatable)
        #[arg(short, long = "seed")]
        seed: Vec<String>,
        /// Print the collection as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Read envelopes from stdin and print lines as they are aggregated
    Follow {
        /// Stream id to track from the start (repeatable)
        #[arg(short, long = "seed")]
        seed: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use crate::Cli;
    use crate::commands::Commands;
    use clap::Parser;

    #[test]
    fn test_replay_args() {
        let cli = Cli::parse_from([
            "restream", "replay", "capture.jsonl", "-s", "a", "--seed", "b", "--json",
        ]);
        match cli.command {
            Some(Commands::Replay { file, seed, json }) => {
                assert_eq!(file.unwrap().to_str(), Some("capture.jsonl"));
                assert_eq!(seed, ["a", "b"]);
                assert!(json);
            }
            _ => panic!("expected replay"),
        }
    }

    #[test]
    fn test_replay_defaults_to_stdin() {
        let cli = Cli::parse_from(["restream", "replay"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Replay { file: None, .. })
        ));
    }
}
