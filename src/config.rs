use std::path::Path;

use serde::Deserialize;

/// Configuration loaded from `import-graph.toml` at the project root.
#[derive(Debug, Deserialize, Default)]
pub struct ImportGraphConfig {
    /// Additional glob patterns to exclude from discovery, beyond
    /// `.gitignore`, `node_modules`, and the built-in patterns.
    pub exclude: Option<Vec<String>>,
    /// Honour `.gitignore` and hidden-file filters during discovery.
    /// Defaults to true.
    pub respect_gitignore: Option<bool>,
}

impl ImportGraphConfig {
    /// Load configuration from `import-graph.toml` in the given root
    /// directory.
    ///
    /// Configuration is advisory: a missing, unreadable, or malformed file
    /// degrades to defaults with a warning on stderr rather than failing the
    /// run.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join("import-graph.toml");

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!(
                        "warning: failed to parse import-graph.toml: {err}. Using defaults."
                    );
                    Self::default()
                }
            },
            Err(err) => {
                eprintln!("warning: failed to read import-graph.toml: {err}. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn respect_gitignore(&self) -> bool {
        self.respect_gitignore.unwrap_or(true)
    }
}
