//! Discovery and parsing of IG resource files.
//!
//! A built Implementation Guide keeps its generated resources under
//! `fsh-generated/resources`. ValueSets and CodeSystems are recognised by file
//! name (`ValueSet-vrdr-*.json`, `CodeSystem-*.json` by default) anywhere below
//! that directory.
//!
//! CodeSystems are reached through the [`CodeSystemLookup`] capability so the
//! resolver never touches the filesystem directly. Two implementations exist:
//! [`CodeSystemIndex`] (built lazily by [`LazyCodeSystemIndex`]) parses every
//! CodeSystem once per run, [`CodeSystemScan`] re-reads the files on every lookup.

use crate::error::{GenError, Result};
use crate::model::{CodeSystem, Resource, ValueSet};
use glob::Pattern;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub const DEFAULT_VALUE_SET_PATTERN: &str = "ValueSet-vrdr-*.json";
pub const DEFAULT_CODE_SYSTEM_PATTERN: &str = "CodeSystem-*.json";

/// `<ig_root>/fsh-generated/resources`
pub fn resources_dir(ig_root: &Path) -> PathBuf {
    ig_root.join("fsh-generated").join("resources")
}

/// Lazily walk `root` and yield every file whose name matches `pattern`.
///
/// Directory entries are visited in file-name order so that repeated runs see
/// the same sequence.
pub fn find_files(root: &Path, pattern: &str) -> Result<impl Iterator<Item = Result<PathBuf>>> {
    let matcher = Pattern::new(pattern).map_err(|source| GenError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    let root_owned = root.to_path_buf();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter();

    Ok(walker.filter_map(move |entry| match entry {
        Ok(entry) => {
            if !entry.file_type().is_file() {
                return None;
            }
            let name = entry.file_name().to_str()?;
            if matcher.matches(name) {
                Some(Ok(entry.into_path()))
            } else {
                None
            }
        }
        Err(source) => {
            let path = source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root_owned.clone());
            Some(Err(GenError::Walk { path, source }))
        }
    }))
}

pub fn find_value_set_files(
    resources_dir: &Path,
    pattern: &str,
) -> Result<impl Iterator<Item = Result<PathBuf>>> {
    find_files(resources_dir, pattern)
}

pub fn find_code_system_files(
    resources_dir: &Path,
    pattern: &str,
) -> Result<impl Iterator<Item = Result<PathBuf>>> {
    find_files(resources_dir, pattern)
}

fn read_resource(path: &Path) -> Result<Resource> {
    let json = fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
    serde_json::from_str(&json).map_err(|e| GenError::malformed(path, e.to_string()))
}

pub fn parse_value_set(path: &Path) -> Result<ValueSet> {
    match read_resource(path)? {
        Resource::ValueSet(vs) => Ok(vs),
        _ => Err(GenError::malformed(path, "expected resourceType 'ValueSet'")),
    }
}

pub fn parse_code_system(path: &Path) -> Result<CodeSystem> {
    match read_resource(path)? {
        Resource::CodeSystem(cs) => Ok(cs),
        _ => Err(GenError::malformed(path, "expected resourceType 'CodeSystem'")),
    }
}

/// Resolve a CodeSystem canonical URL to its loaded definition.
///
/// `Ok(None)` means no CodeSystem with that URL was found; callers treat that
/// as an empty contribution, not a failure.
pub trait CodeSystemLookup {
    fn find_code_system(&self, url: &str) -> Result<Option<Arc<CodeSystem>>>;
}

/// All CodeSystems of a run, parsed once and keyed by canonical URL.
#[derive(Debug, Default, Clone)]
pub struct CodeSystemIndex {
    by_url: HashMap<String, Arc<CodeSystem>>,
}

impl CodeSystemIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(resources_dir: &Path, pattern: &str) -> Result<Self> {
        let mut index = Self::new();
        for path in find_code_system_files(resources_dir, pattern)? {
            let path = path?;
            let cs = parse_code_system(&path)?;
            debug!(
                "Loaded CodeSystem {} ({} concepts) from {}",
                cs.url,
                cs.concept.len(),
                path.display()
            );
            index.insert(cs);
        }
        Ok(index)
    }

    /// Insert a CodeSystem. The first definition of a URL wins.
    pub fn insert(&mut self, cs: CodeSystem) {
        if self.by_url.contains_key(&cs.url) {
            warn!("Duplicate CodeSystem url {}; keeping the first definition", cs.url);
            return;
        }
        self.by_url.insert(cs.url.clone(), Arc::new(cs));
    }

    pub fn len(&self) -> usize {
        self.by_url.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }
}

impl FromIterator<CodeSystem> for CodeSystemIndex {
    fn from_iter<I: IntoIterator<Item = CodeSystem>>(iter: I) -> Self {
        let mut index = Self::new();
        for cs in iter {
            index.insert(cs);
        }
        index
    }
}

impl CodeSystemLookup for CodeSystemIndex {
    fn find_code_system(&self, url: &str) -> Result<Option<Arc<CodeSystem>>> {
        Ok(self.by_url.get(url).cloned())
    }
}

/// A [`CodeSystemIndex`] that is only built on the first lookup, so runs whose
/// ValueSets never include a whole system do not read CodeSystem files at all.
#[derive(Debug)]
pub struct LazyCodeSystemIndex {
    resources_dir: PathBuf,
    pattern: String,
    index: OnceCell<CodeSystemIndex>,
}

impl LazyCodeSystemIndex {
    pub fn new(resources_dir: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            resources_dir: resources_dir.into(),
            pattern: pattern.into(),
            index: OnceCell::new(),
        }
    }

    fn index(&self) -> Result<&CodeSystemIndex> {
        if let Some(index) = self.index.get() {
            return Ok(index);
        }
        let index = CodeSystemIndex::load(&self.resources_dir, &self.pattern)?;
        info!(
            "Indexed {} CodeSystems under {}",
            index.len(),
            self.resources_dir.display()
        );
        Ok(self.index.get_or_init(|| index))
    }
}

impl CodeSystemLookup for LazyCodeSystemIndex {
    fn find_code_system(&self, url: &str) -> Result<Option<Arc<CodeSystem>>> {
        self.index()?.find_code_system(url)
    }
}

/// Uncached lookup: every call walks and parses the CodeSystem files again.
#[derive(Debug, Clone)]
pub struct CodeSystemScan {
    resources_dir: PathBuf,
    pattern: String,
}

impl CodeSystemScan {
    pub fn new(resources_dir: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            resources_dir: resources_dir.into(),
            pattern: pattern.into(),
        }
    }
}

impl CodeSystemLookup for CodeSystemScan {
    fn find_code_system(&self, url: &str) -> Result<Option<Arc<CodeSystem>>> {
        for path in find_code_system_files(&self.resources_dir, &self.pattern)? {
            let cs = parse_code_system(&path?)?;
            if cs.url == url {
                return Ok(Some(Arc::new(cs)));
            }
        }
        Ok(None)
    }
}
