//! @ai:module:intent Define the policy metadata consumed by the documentation renderer
//! @ai:module:layer domain
//! @ai:module:public_api Severity, Parameter, PolicyDocument, DocumentSet, anchor_for
//! @ai:module:depends_on matchers
//! @ai:module:stateless true

use crate::matchers::Matchers;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// @ai:intent Enforcement level a policy is grouped under
///
/// Variants are ordered by display name so grouped output lists
/// `Not Enforced`, then `Violation`, then `Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "Not Enforced")]
    NotEnforced,
    Violation,
    Warning,
}

impl Severity {
    /// @ai:intent Derive severity from the rule names a policy defines
    /// @ai:example (["violation", "helper"]) -> Violation
    /// @ai:example (["warn"]) -> Warning
    /// @ai:example ([]) -> NotEnforced
    /// @ai:effects pure
    pub fn from_rules<S: AsRef<str>>(rules: &[S]) -> Self {
        let defines = |name: &str| rules.iter().any(|r| r.as_ref() == name);

        if defines("violation") {
            Severity::Violation
        } else if defines("warn") {
            Severity::Warning
        } else {
            Severity::NotEnforced
        }
    }

    /// @ai:intent Human-readable name used in generated documents
    /// @ai:effects pure
    pub fn name(&self) -> &'static str {
        match self {
            Severity::NotEnforced => "Not Enforced",
            Severity::Violation => "Violation",
            Severity::Warning => "Warning",
        }
    }

    /// @ai:intent Section heading for the index: pluralized except for "Not Enforced"
    /// @ai:effects pure
    pub fn heading(&self) -> String {
        match self {
            Severity::NotEnforced => self.name().to_string(),
            _ => format!("{}s", self.name()),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// @ai:intent A policy parameter listed in the generated document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub is_array: bool,
}

/// @ai:intent Everything the renderer needs to document one policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub path: PathBuf,
    pub title: String,
    pub anchor: String,
    pub severity: Severity,
    pub resources: String,
    pub match_labels: String,
    pub namespaces: String,
    pub excluded_namespaces: String,
    pub parameters: Vec<Parameter>,
    pub description: String,
    pub url: String,
    pub rego: String,
    pub matchers: Matchers,
}

/// @ai:intent Policy documents grouped by severity, insertion order kept within a group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSet {
    pub groups: BTreeMap<Severity, Vec<PolicyDocument>>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Add a document to the group of its severity
    pub fn push(&mut self, document: PolicyDocument) {
        self.groups.entry(document.severity).or_default().push(document);
    }

    /// @ai:intent Total number of documents across all groups
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// @ai:intent Iterate groups in severity order
    pub fn iter(&self) -> impl Iterator<Item = (Severity, &[PolicyDocument])> {
        self.groups.iter().map(|(sev, docs)| (*sev, docs.as_slice()))
    }
}

impl FromIterator<PolicyDocument> for DocumentSet {
    fn from_iter<I: IntoIterator<Item = PolicyDocument>>(iter: I) -> Self {
        let mut set = DocumentSet::new();
        for document in iter {
            set.push(document);
        }
        set
    }
}

/// @ai:intent Build a markdown heading anchor from a title
/// @ai:example ("Containers must not run as root") -> "containers-must-not-run-as-root"
/// @ai:example ("Images: no `latest` tag") -> "images-no-latest-tag"
/// @ai:effects pure
pub fn anchor_for(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}
