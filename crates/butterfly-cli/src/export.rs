//! JSON export of the network views.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use butterfly_topology::{NetworkConfig, Netlist, Scene, TopologyModel};
use serde::Serialize;
use tracing::info;

use crate::args::View;

/// The exported document.
#[derive(Debug, Serialize)]
pub struct Document {
    pub name: String,
    pub config: NetworkConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netlist: Option<Netlist>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<Scene>,
}

impl Document {
    /// Materialize the requested views of a model.
    pub fn assemble(
        model: &TopologyModel,
        view: View,
        prefixes: Option<&[String]>,
    ) -> anyhow::Result<Self> {
        let netlist = match view {
            View::Netlist | View::All => {
                let mut connections = model.connection_view();
                if let Some(prefixes) = prefixes {
                    connections = connections.with_prefixes(prefixes.iter().cloned())?;
                }
                Some(connections.netlist()?)
            }
            View::Render => None,
        };
        let scene = match view {
            View::Render | View::All => Some(model.render_view().scene()?),
            View::Netlist => None,
        };

        Ok(Self {
            name: model.config().artifact_stem(),
            config: model.config().clone(),
            netlist,
            scene,
        })
    }
}

/// Where the document goes: an explicit file, a file named after the
/// network inside a directory, or stdout.
pub fn destination(
    output: Option<&Path>,
    output_dir: Option<&Path>,
    config: &NetworkConfig,
) -> Option<PathBuf> {
    output
        .map(Path::to_path_buf)
        .or_else(|| output_dir.map(|dir| dir.join(format!("{}.json", config.artifact_stem()))))
}

/// Serialize `document` to `path`, or to stdout when `path` is `None`.
pub fn write(document: &Document, path: Option<&Path>, compact: bool) -> anyhow::Result<()> {
    let json = if compact {
        serde_json::to_string(document)?
    } else {
        serde_json::to_string_pretty(document)?
    };

    match path {
        Some(path) => {
            std::fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bytes = json.len(), "wrote network document");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
