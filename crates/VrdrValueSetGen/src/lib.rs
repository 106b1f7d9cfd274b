//! vrdr-valueset-gen
//!
//! Generates static ValueSet lookup classes for the VRDR Java library from a
//! built FHIR Implementation Guide.
//!
//! ## Inputs
//! - `<ig_root>/fsh-generated/resources/**/ValueSet-vrdr-*.json`: the ValueSets to generate.
//! - `<ig_root>/fsh-generated/resources/**/CodeSystem-*.json`: CodeSystems consulted when a
//!   ValueSet includes a whole system without listing concepts.
//!
//! ## Outputs
//! One source file per ValueSet, named after `ValueSet.name`, holding the canonical URL and
//! the resolved `(system, code, display)` codings. Java (`<name>.java`) is the default
//! target; `EmitTarget::Rust` writes `<snake_name>.rs` modules plus a `mod.rs` index.
//!
//! ## Resolution
//! - `compose.include` entries are expanded in declaration order. Inline concepts are taken
//!   as-is; an include without concepts pulls every top-level concept of the matching
//!   CodeSystem, or contributes nothing when no such CodeSystem was found.
//! - `compose.exclude` entries are applied afterwards and remove every coding with the same
//!   `(system, code)`. An exclude without concepts is rejected.
//!
//! ## Determinism
//! Files are discovered in file-name order and codings keep compose order, so identical
//! inputs always produce identical output.

pub mod config;
pub mod emitter;
pub mod error;
pub mod loader;
pub mod model;
pub mod resolver;

pub use config::{DEFAULT_OUTPUT_DIR, GeneratorConfig};
pub use emitter::{
    EmitTarget, EmittedArtifact, Emitter, JavaEmitter, RustEmitter, ValueSetArtifact,
};
pub use error::{GenError, Result};
pub use loader::{CodeSystemIndex, CodeSystemLookup, CodeSystemScan, LazyCodeSystemIndex};
pub use model::{CodeSystem, Coding, Compose, Concept, ConceptSetClause, ValueSet};
pub use resolver::resolve;

use tracing::info;

/// Summary of one generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub artifacts: Vec<EmittedArtifact>,
}

impl GenerationReport {
    pub fn total_codings(&self) -> usize {
        self.artifacts.iter().map(|a| a.coding_count).sum()
    }
}

/// Run the full pipeline: discover ValueSets, resolve each one, write its artifact.
///
/// Stops at the first error; artifacts written before it are left in place.
pub fn generate(config: &GeneratorConfig) -> Result<GenerationReport> {
    let resources_dir = config.resources_dir();
    if !resources_dir.is_dir() {
        return Err(GenError::MissingResourceDir(resources_dir));
    }

    let lookup: Box<dyn CodeSystemLookup> = if config.cache_code_systems {
        Box::new(LazyCodeSystemIndex::new(&resources_dir, &config.code_system_pattern))
    } else {
        Box::new(CodeSystemScan::new(&resources_dir, &config.code_system_pattern))
    };

    let emitter = config.target.emitter(&config.java_package);
    let mut artifacts = Vec::new();

    for path in loader::find_value_set_files(&resources_dir, &config.value_set_pattern)? {
        let path = path?;
        info!("=== {} ===", path.display());

        let value_set = loader::parse_value_set(&path)?;
        let codings = resolve(&value_set, lookup.as_ref())?;
        artifacts.push(emitter.emit(&value_set, &codings, &config.output_dir)?);
    }

    emitter.finish(&config.output_dir, &artifacts)?;

    info!(
        "Generated {} {} ValueSet artifacts ({} codings) into {}",
        artifacts.len(),
        emitter.target(),
        artifacts.iter().map(|a| a.coding_count).sum::<usize>(),
        config.output_dir.display()
    );

    Ok(GenerationReport { artifacts })
}
