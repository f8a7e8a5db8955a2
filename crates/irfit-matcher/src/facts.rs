//! Auxiliary relation files from a points-to analysis.
//!
//! Each relation is a tab-separated file named `<Relation>.facts`. Only the
//! columns relating a call or allocation site to a variable slot, and local
//! copies out of receivers and parameters, are read; they surface extra
//! aliases for matched source elements.

use rustc_hash::FxHashMap;
use std::fmt;
use std::path::{Path, PathBuf};

const INVOCATION_RELATIONS: [&str; 3] = [
    "SpecialMethodInvocation",
    "SuperMethodInvocation",
    "VirtualMethodInvocation",
];
const HEAP_ALLOCATION_RELATION: &str = "AssignHeapAllocation";
const RETURN_VALUE_RELATION: &str = "AssignReturnValue";
const LOCAL_ASSIGNMENT_RELATION: &str = "AssignLocal";

/// Failure to read a facts directory.
#[derive(Debug)]
pub enum FactsError {
    NotADirectory { path: PathBuf },
    Io { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for FactsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactsError::NotADirectory { path } => {
                write!(f, "facts path {} is not a directory", path.display())
            }
            FactsError::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for FactsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FactsError::NotADirectory { .. } => None,
            FactsError::Io { source, .. } => Some(source),
        }
    }
}

/// `to = from` inside one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAssignment {
    pub from: String,
    pub to: String,
}

/// Site id → variable slot relations.
#[derive(Debug, Clone, Default)]
pub struct Facts {
    invocation_bases: FxHashMap<String, String>,
    allocation_targets: FxHashMap<String, String>,
    return_targets: FxHashMap<String, String>,
    /// Keyed by declaring method id.
    local_assignments: FxHashMap<String, Vec<LocalAssignment>>,
}

impl Facts {
    /// Slot of the receiver of a call site.
    pub fn invocation_base(&self, invocation_id: &str) -> Option<&str> {
        self.invocation_bases.get(invocation_id).map(String::as_str)
    }

    /// Slot assigned the object created at an allocation site.
    pub fn allocation_target(&self, allocation_id: &str) -> Option<&str> {
        self.allocation_targets.get(allocation_id).map(String::as_str)
    }

    /// Slot assigned the value returned at a call site.
    pub fn return_target(&self, invocation_id: &str) -> Option<&str> {
        self.return_targets.get(invocation_id).map(String::as_str)
    }

    /// Local assignments of the method with id `method_id`.
    pub fn local_assignments(&self, method_id: &str) -> &[LocalAssignment] {
        self.local_assignments
            .get(method_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.invocation_bases.len()
            + self.allocation_targets.len()
            + self.return_targets.len()
            + self.local_assignments.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reads the relations of one facts directory.
pub struct FactsReader {
    dir: PathBuf,
}

impl FactsReader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FactsReader { dir: dir.into() }
    }

    #[tracing::instrument(level = "debug", skip(self), fields(dir = %self.dir.display()))]
    pub fn read(&self) -> Result<Facts, FactsError> {
        if !self.dir.is_dir() {
            return Err(FactsError::NotADirectory { path: self.dir.clone() });
        }
        let mut facts = Facts::default();
        for relation in INVOCATION_RELATIONS {
            self.read_relation(relation, 5, |columns| {
                facts
                    .invocation_bases
                    .insert(columns[0].to_string(), columns[3].to_string());
            })?;
        }
        self.read_relation(HEAP_ALLOCATION_RELATION, 6, |columns| {
            facts
                .allocation_targets
                .insert(columns[2].to_string(), columns[3].to_string());
        })?;
        self.read_relation(RETURN_VALUE_RELATION, 2, |columns| {
            facts
                .return_targets
                .insert(columns[0].to_string(), columns[1].to_string());
        })?;
        self.read_relation(LOCAL_ASSIGNMENT_RELATION, 5, |columns| {
            facts
                .local_assignments
                .entry(columns[4].to_string())
                .or_default()
                .push(LocalAssignment {
                    from: columns[2].to_string(),
                    to: columns[3].to_string(),
                });
        })?;
        tracing::debug!(relations = facts.len(), "facts loaded");
        Ok(facts)
    }

    fn read_relation(
        &self,
        relation: &str,
        min_columns: usize,
        each: impl FnMut(&[&str]),
    ) -> Result<(), FactsError> {
        let path = self.dir.join(format!("{relation}.facts"));
        if !path.exists() {
            tracing::warn!(path = %path.display(), "facts file missing");
            return Ok(());
        }
        let text = std::fs::read_to_string(&path).map_err(|source| FactsError::Io {
            path: path.clone(),
            source,
        })?;
        parse_relation(&path, &text, min_columns, each);
        Ok(())
    }
}

fn parse_relation(path: &Path, text: &str, min_columns: usize, mut each: impl FnMut(&[&str])) {
    for (index, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() < min_columns {
            tracing::debug!(
                path = %path.display(),
                line = index + 1,
                columns = columns.len(),
                "short facts line skipped"
            );
            continue;
        }
        each(&columns);
    }
}
