//! Run configuration.

use crate::emitter::{DEFAULT_JAVA_PACKAGE, EmitTarget};
use crate::loader::{self, DEFAULT_CODE_SYSTEM_PATTERN, DEFAULT_VALUE_SET_PATTERN};
use std::path::PathBuf;

/// Where the VRDR Java library keeps its generated ValueSet classes.
pub const DEFAULT_OUTPUT_DIR: &str = "src/main/java/edu/gatech/chai/VRDR/model/valueset";

/// Generator configuration options
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Root of a built Implementation Guide
    pub ig_root: PathBuf,
    /// Directory that receives one file per ValueSet
    pub output_dir: PathBuf,
    /// Package declared by generated Java classes (empty for the default package)
    pub java_package: String,
    /// Output language
    pub target: EmitTarget,
    /// File name pattern of ValueSet resources
    pub value_set_pattern: String,
    /// File name pattern of CodeSystem resources
    pub code_system_pattern: String,
    /// Parse CodeSystems once per run instead of once per whole-system include
    pub cache_code_systems: bool,
}

impl GeneratorConfig {
    pub fn new(ig_root: impl Into<PathBuf>) -> Self {
        Self {
            ig_root: ig_root.into(),
            ..Self::default()
        }
    }

    pub fn resources_dir(&self) -> PathBuf {
        loader::resources_dir(&self.ig_root)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ig_root: PathBuf::from("."),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            java_package: DEFAULT_JAVA_PACKAGE.to_string(),
            target: EmitTarget::Java,
            value_set_pattern: DEFAULT_VALUE_SET_PATTERN.to_string(),
            code_system_pattern: DEFAULT_CODE_SYSTEM_PATTERN.to_string(),
            cache_code_systems: true,
        }
    }
}
