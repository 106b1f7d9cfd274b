//! ValueSet `compose` resolution.
//!
//! Turns the include/exclude rules of a ValueSet into the ordered list of
//! codings it denotes:
//! - includes run first, in declaration order, concept by concept;
//! - an include without concepts pulls in every concept of the referenced
//!   CodeSystem, or nothing when that CodeSystem is not loaded;
//! - excludes run afterwards and drop every coding with a matching
//!   `(system, code)`, duplicates included. An exclude with an empty concept
//!   list removes nothing; one without a concept list is rejected.

use crate::error::{GenError, Result};
use crate::loader::CodeSystemLookup;
use crate::model::{Coding, ValueSet};
use tracing::{debug, warn};

pub fn resolve(value_set: &ValueSet, lookup: &dyn CodeSystemLookup) -> Result<Vec<Coding>> {
    let mut result: Vec<Coding> = Vec::new();

    for include in &value_set.compose.include {
        if let Some(concepts) = include.explicit_concepts() {
            result.extend(concepts.iter().map(|c| Coding::from_concept(&include.system, c)));
            continue;
        }

        if !include.filter.is_empty() {
            warn!(
                "ValueSet {} includes {} with filters; filters are ignored and the whole system is included",
                value_set.name, include.system
            );
        }

        match lookup.find_code_system(&include.system)? {
            Some(cs) => {
                result.extend(cs.concept.iter().map(|c| Coding::from_concept(&include.system, c)));
            }
            None => {
                debug!(
                    "ValueSet {} includes unknown CodeSystem {}; nothing added",
                    value_set.name, include.system
                );
            }
        }
    }

    debug!("{}: {} codings after include", value_set.name, result.len());

    for exclude in &value_set.compose.exclude {
        // An explicit empty list excludes nothing; only a missing list means the whole system.
        let concepts = exclude
            .concept
            .as_deref()
            .ok_or_else(|| GenError::UnsupportedExclude {
                value_set: value_set.name.clone(),
                system: exclude.system.clone(),
            })?;

        for concept in concepts {
            result.retain(|coding| !coding.matches(&exclude.system, &concept.code));
        }
    }

    debug!("{}: {} codings after exclude", value_set.name, result.len());

    Ok(result)
}
