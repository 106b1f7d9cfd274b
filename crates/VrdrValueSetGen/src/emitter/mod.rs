//! Source emitters for resolved ValueSets.
//!
//! The resolver produces a plain list of [`Coding`]s; an [`Emitter`] turns a
//! [`ValueSetArtifact`] into one source file per ValueSet. Java is the default
//! target (the VRDR library consumes these classes); a Rust target exists for
//! crates that want the same lookups as `const` data.

mod java;
mod rust;

pub use java::{DEFAULT_JAVA_PACKAGE, JavaEmitter};
pub use rust::RustEmitter;

use crate::error::{GenError, Result};
use crate::model::{Coding, ValueSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything an emitter needs to render one ValueSet.
#[derive(Debug, Clone, Copy)]
pub struct ValueSetArtifact<'a> {
    pub name: &'a str,
    pub url: &'a str,
    pub codings: &'a [Coding],
}

/// A file written by [`Emitter::emit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedArtifact {
    pub value_set_name: String,
    pub path: PathBuf,
    pub coding_count: usize,
}

pub trait Emitter {
    /// Human readable target name used in error messages.
    fn target(&self) -> &'static str;

    /// Output file name for a ValueSet `name`.
    fn file_name(&self, value_set_name: &str) -> Result<String>;

    fn render(&self, artifact: &ValueSetArtifact<'_>) -> Result<String>;

    /// Render and write one ValueSet into `output_dir`, replacing any existing file.
    fn emit(
        &self,
        value_set: &ValueSet,
        codings: &[Coding],
        output_dir: &Path,
    ) -> Result<EmittedArtifact> {
        let artifact = ValueSetArtifact {
            name: &value_set.name,
            url: &value_set.url,
            codings,
        };
        let file_name = self.file_name(artifact.name)?;
        let source = self.render(&artifact)?;

        fs::create_dir_all(output_dir).map_err(|e| GenError::io(output_dir, e))?;
        let path = output_dir.join(file_name);
        fs::write(&path, source).map_err(|e| GenError::io(&path, e))?;

        info!(
            "Wrote {} ({} codings) to {}",
            value_set.name,
            codings.len(),
            path.display()
        );

        Ok(EmittedArtifact {
            value_set_name: value_set.name.clone(),
            path,
            coding_count: codings.len(),
        })
    }

    /// Called once after every ValueSet of a run has been emitted.
    fn finish(&self, _output_dir: &Path, _emitted: &[EmittedArtifact]) -> Result<()> {
        Ok(())
    }
}

/// Output language selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EmitTarget {
    #[default]
    Java,
    Rust,
}

impl EmitTarget {
    pub fn emitter(self, java_package: &str) -> Box<dyn Emitter> {
        match self {
            EmitTarget::Java => Box::new(JavaEmitter::new(java_package)),
            EmitTarget::Rust => Box::new(RustEmitter::new()),
        }
    }
}
