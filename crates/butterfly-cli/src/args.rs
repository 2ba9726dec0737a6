//! Command-line arguments and configuration files.

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use butterfly_topology::{Error, NetworkConfig, Resolution};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Which documents to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Named pin-to-pin connections
    Netlist,
    /// Node bodies, pin stubs and wires
    Render,
    /// Both
    All,
}

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "butterfly-gen",
    about = "Generate butterfly network topology from 2x2 and 4x4 switch nodes"
)]
pub struct Cli {
    /// Number of stages in the network
    #[arg(short = 's', long, required_unless_present = "config")]
    pub n_stage: Option<usize>,

    /// Number of network ports, the product of the radices
    #[arg(short = 'p', long, required_unless_present = "config")]
    pub n_port: Option<usize>,

    /// Switch radix of each stage, in stage order (2 or 4)
    #[arg(short = 'r', long, num_args = 1.., required_unless_present = "config")]
    pub radices: Vec<usize>,

    /// Target monitor resolution in pixels, e.g. 1920 1080
    #[arg(short = 'd', long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    pub resolution: Option<Vec<u32>>,

    /// Node name prefix of each stage, in stage order
    #[arg(long, num_args = 1..)]
    pub prefixes: Option<Vec<String>>,

    /// Read the network description from a JSON file instead of flags
    #[arg(short = 'c', long, conflicts_with_all = ["n_stage", "n_port", "radices"])]
    pub config: Option<PathBuf>,

    /// Documents to export
    #[arg(long, value_enum, default_value_t = View::All)]
    pub view: View,

    /// Output file (stdout if neither this nor --output-dir is given)
    #[arg(short, long, conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Directory for an output file named after the network
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Write compact instead of pretty-printed JSON
    #[arg(long)]
    pub compact: bool,
}

/// Network description as stored in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub n_stage: usize,
    pub n_port: usize,
    pub radices: Vec<usize>,
    #[serde(default)]
    pub resolution: Option<Resolution>,
    #[serde(default)]
    pub prefixes: Option<Vec<String>>,
}

/// A validated configuration plus the emitter options that ride along.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub config: NetworkConfig,
    pub prefixes: Option<Vec<String>>,
}

impl ConfigFile {
    fn into_request(self) -> anyhow::Result<Request> {
        let config = NetworkConfig::new(
            self.n_stage,
            self.n_port,
            &self.radices,
            self.resolution.unwrap_or_default(),
        )?;
        if let Some(prefixes) = &self.prefixes {
            if prefixes.len() != config.n_stage() {
                return Err(Error::PrefixCountMismatch {
                    n_stage: config.n_stage(),
                    prefix_len: prefixes.len(),
                }
                .into());
            }
        }
        Ok(Request {
            config,
            prefixes: self.prefixes,
        })
    }
}

impl Cli {
    /// Turn flags or the configuration file into a validated request.
    pub fn request(&self) -> anyhow::Result<Request> {
        let file = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str::<ConfigFile>(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => ConfigFile {
                n_stage: self.n_stage.ok_or_else(|| anyhow!("--n-stage is required"))?,
                n_port: self.n_port.ok_or_else(|| anyhow!("--n-port is required"))?,
                radices: self.radices.clone(),
                resolution: None,
                prefixes: None,
            },
        };

        // Flags refine whatever the file left open
        let resolution = match self.resolution.as_deref() {
            Some(&[width, height]) => Some(Resolution { width, height }),
            Some(other) => return Err(anyhow!("expected WIDTH HEIGHT, got {other:?}")),
            None => file.resolution,
        };
        let prefixes = self.prefixes.clone().or(file.prefixes);

        ConfigFile {
            resolution,
            prefixes,
            ..file
        }
        .into_request()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("butterfly-gen").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_build_config() {
        let cli = parse(&["-s", "3", "-p", "32", "-r", "4", "2", "4", "-d", "1920", "1080"]);
        let request = cli.request().unwrap();
        assert_eq!(request.config.n_port(), 32);
        assert_eq!(request.config.resolution(), Resolution { width: 1920, height: 1080 });
        assert_eq!(request.prefixes, None);
        assert_eq!(cli.view, View::All);
    }

    #[test]
    fn default_resolution_is_baseline() {
        let cli = parse(&["--n-stage", "2", "--n-port", "4", "--radices", "2", "2"]);
        assert_eq!(cli.request().unwrap().config.resolution(), Resolution::BASELINE);
    }

    #[test]
    fn invalid_radix_is_reported() {
        let cli = parse(&["-s", "2", "-p", "16", "-r", "8", "2"]);
        let err = cli.request().unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::UnsupportedRadix { stage: 0, radix: 8 })
        );
    }

    #[test]
    fn prefix_count_checked_for_every_view() {
        for view in ["netlist", "render", "all"] {
            let cli = parse(&[
                "-s", "3", "-p", "8", "-r", "2", "2", "2", "--prefixes", "only_", "--view", view,
            ]);
            let err = cli.request().unwrap_err();
            assert_eq!(
                err.downcast_ref::<Error>(),
                Some(&Error::PrefixCountMismatch { n_stage: 3, prefix_len: 1 })
            );
        }

        let cli = parse(&["-s", "2", "-p", "4", "-r", "2", "2", "--prefixes", "in_", "out_"]);
        assert_eq!(cli.request().unwrap().prefixes.unwrap(), vec!["in_", "out_"]);
    }

    #[test]
    fn config_file_prefixes_checked() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"n_stage": 2, "n_port": 4, "radices": [2, 2], "prefixes": ["a_", "b_", "c_"]}}"#
        )
        .unwrap();

        let cli = parse(&["--config", file.path().to_str().unwrap(), "--view", "render"]);
        let err = cli.request().unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::PrefixCountMismatch { n_stage: 2, prefix_len: 3 })
        );
    }

    #[test]
    fn missing_flags_rejected_by_parser() {
        assert!(Cli::try_parse_from(["butterfly-gen", "-s", "2"]).is_err());
    }

    #[test]
    fn config_conflicts_with_flags() {
        let result = Cli::try_parse_from(["butterfly-gen", "-c", "net.json", "-s", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_file_with_flag_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"n_stage": 3, "n_port": 8, "radices": [2, 2, 2], "prefixes": ["a_", "b_", "c_"]}}"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let cli = parse(&["--config", path, "--resolution", "3840", "2160"]);
        let request = cli.request().unwrap();

        assert_eq!(request.config.n_stage(), 3);
        assert_eq!(request.config.resolution().height, 2160);
        assert_eq!(request.prefixes.unwrap(), vec!["a_", "b_", "c_"]);
    }

    #[test]
    fn unreadable_config_has_context() {
        let cli = parse(&["--config", "/nonexistent/butterfly.json"]);
        let err = cli.request().unwrap_err();
        assert!(err.to_string().contains("reading /nonexistent/butterfly.json"));
    }
}
