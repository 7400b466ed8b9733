use std::{fs, path::Path};

use log::debug;

use crate::{CompiledMdp, MdpError, MdpSpec};

/// Load an MDP spec from YAML on disk.
pub fn load_yaml(path: impl AsRef<Path>) -> Result<MdpSpec, MdpError> {
    let path = path.as_ref();
    debug!("loading MDP spec from {}", path.display());
    let yaml = fs::read_to_string(path)?;
    MdpSpec::from_yaml_str(&yaml)
}

/// Load and compile an MDP from a YAML file.
pub fn compile_yaml(path: impl AsRef<Path>) -> Result<CompiledMdp, MdpError> {
    load_yaml(path)?.compile()
}

/// Serialize and write an MDP spec to YAML.
pub fn save_yaml(path: impl AsRef<Path>, spec: &MdpSpec) -> Result<(), MdpError> {
    fs::write(path, spec.to_yaml_string()?)?;
    Ok(())
}
