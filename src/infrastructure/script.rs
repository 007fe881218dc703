//! Navigation scripts for headless replay

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

/// One user or browser action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Click a marked anchor with this `href`
    Click(String),
    /// Hover a marked link with this `href`
    Hover(String),
    /// Focus a marked link with this `href`
    Focus(String),
    /// Scroll the document to an offset
    Scroll(f64),
    /// Let time pass, in milliseconds
    Wait(u64),
    /// Browser back button
    Back,
    /// Type a fragment into the address bar
    Navigate(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    /// Parse a JSON5 array of steps, e.g. `[{ click: "#/projects" }, "back"]`
    pub fn parse(source: &str) -> Result<Self> {
        json5::from_str(source).wrap_err("invalid navigation script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("cannot read script {}", path.display()))?;
        Self::parse(&source)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_script() -> Result<()> {
        let script = Script::parse(
            r##"[
              // open the gallery
              { hover: "#/projects" },
              { click: "#/projects" },
              { wait: 500 },
              { scroll: 500 },
              "back",
              { navigate: "#/work" },
            ]"##,
        )?;
        assert_eq!(
            script.steps,
            vec![
                Step::Hover("#/projects".into()),
                Step::Click("#/projects".into()),
                Step::Wait(500),
                Step::Scroll(500.0),
                Step::Back,
                Step::Navigate("#/work".into()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_unknown_step_is_an_error() {
        assert!(Script::parse(r##"[{ teleport: "#/" }]"##).is_err());
    }
}
