use std::{fs, path::Path};

use crate::{CompiledMdp, MdpError, MdpSpec};

impl MdpSpec {
    /// Parse a spec from a YAML string. Validation is deferred to
    /// [`MdpSpec::validate`] or [`MdpSpec::compile`].
    pub fn from_yaml_str(yaml: &str) -> Result<Self, MdpError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serialize this spec to a YAML string.
    pub fn to_yaml_string(&self) -> Result<String, MdpError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Load an MDP spec from YAML on disk.
pub fn load_yaml(path: impl AsRef<Path>) -> Result<MdpSpec, MdpError> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = yaml.len(), "loading mdp yaml");
    MdpSpec::from_yaml_str(&yaml)
}

/// Load and compile an MDP from a YAML file.
pub fn compile_yaml(path: impl AsRef<Path>) -> Result<CompiledMdp, MdpError> {
    let spec = load_yaml(path)?;
    spec.compile()
}

/// Serialize and write an MDP spec to YAML.
pub fn save_yaml(path: impl AsRef<Path>, spec: &MdpSpec) -> Result<(), MdpError> {
    fs::write(path, spec.to_yaml_string()?)?;
    Ok(())
}
