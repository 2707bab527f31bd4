//! @ai:module:intent Build typed matchers from directive lines in a policy header
//! @ai:module:layer domain
//! @ai:module:public_api Matchers, KindMatcher, KindMatchers, MatchLabelsMatcher, NamespacesMatchers, ExcludedNamespacesMatchers
//! @ai:module:depends_on directive, error
//! @ai:module:stateless true
//!
//! The `Display` forms of the matcher types are meant for generated
//! documentation only. They are lossy and are never parsed back.

use crate::directive::{scan_directives, Directive, ScannedDirectives};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Written form of the core API group some policy authors use instead of an empty group.
const QUOTED_CORE_GROUP: &str = "\"\"";

/// @ai:intent All matchers declared in one policy header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchers {
    pub kind_matchers: KindMatchers,
    pub match_labels_matcher: MatchLabelsMatcher,
    pub namespaces_matchers: NamespacesMatchers,
    pub excluded_namespaces_matchers: ExcludedNamespacesMatchers,
}

/// @ai:intent One API group and kind a policy applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindMatcher {
    /// Empty for the core group.
    pub api_group: String,
    pub kind: String,
}

/// @ai:intent Kind matchers in annotation order, duplicates kept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KindMatchers(pub Vec<KindMatcher>);

/// @ai:intent Label selector pairs from `@matchlabels`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchLabelsMatcher(pub BTreeMap<String, String>);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespacesMatchers(pub Vec<String>);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExcludedNamespacesMatchers(pub Vec<String>);

impl Matchers {
    /// @ai:intent Parse all matcher directives from one policy's header comments
    /// @ai:pre comments are in source order with comment markers stripped
    /// @ai:post on error no partial Matchers is returned
    /// @ai:invariant a repeated directive resolves to its last line
    /// @ai:example (["@kinds apps/Deployment"]) -> Ok(kinds = [apps/Deployment])
    /// @ai:example (["no directives here"]) -> Ok(Matchers::default())
    /// @ai:effects pure
    /// @ai:idempotent true
    pub fn from_comments<S: AsRef<str>>(comments: &[S]) -> Result<Self> {
        Self::from_scanned(&scan_directives(comments))
    }

    /// @ai:intent Build matchers from an existing scan, invoking builders in header line order
    /// @ai:post the reported error belongs to the earliest malformed winning line
    /// @ai:effects pure
    pub fn from_scanned(scanned: &ScannedDirectives<'_>) -> Result<Self> {
        let mut matchers = Matchers::default();

        for (directive, rest) in scanned.in_line_order() {
            match directive {
                Directive::Kinds => matchers.kind_matchers = parse_kind_matchers(rest)?,
                Directive::MatchLabels => {
                    matchers.match_labels_matcher = parse_match_labels_matcher(rest)?
                }
                Directive::Namespaces => {
                    matchers.namespaces_matchers = NamespacesMatchers(split_names(rest))
                }
                Directive::ExcludedNamespaces => {
                    matchers.excluded_namespaces_matchers =
                        ExcludedNamespacesMatchers(split_names(rest))
                }
            }
        }

        Ok(matchers)
    }

    /// @ai:intent Check whether no matcher directive was present
    pub fn is_empty(&self) -> bool {
        self.kind_matchers.is_empty()
            && self.match_labels_matcher.is_empty()
            && self.namespaces_matchers.is_empty()
            && self.excluded_namespaces_matchers.is_empty()
    }
}

/// @ai:intent Parse the text after `@kinds` into ordered group/kind pairs
/// @ai:pre rest is the directive line with the `@kinds` token removed
/// @ai:post every entry has a non-empty kind
/// @ai:example (" apps/Deployment /Pod") -> Ok([apps/Deployment, /Pod])
/// @ai:example (" Deployment") -> Err(InvalidAnnotation)
/// @ai:effects pure
pub fn parse_kind_matchers(rest: &str) -> Result<KindMatchers> {
    tokens(rest)
        .map(|token| {
            let mut segments = token.split('/');
            match (segments.next(), segments.next(), segments.next()) {
                (Some(group), Some(kind), None) if !kind.is_empty() => Ok(KindMatcher {
                    api_group: normalize_group(group).to_string(),
                    kind: kind.to_string(),
                }),
                _ => Err(Error::invalid_annotation(Directive::Kinds, token)),
            }
        })
        .collect::<Result<Vec<_>>>()
        .map(KindMatchers)
}

/// @ai:intent Parse the text after `@matchlabels` into a key/value map
/// @ai:post a later duplicate key replaces the earlier value
/// @ai:example (" foo=bar baz=qux") -> Ok({baz: qux, foo: bar})
/// @ai:example (" foo=bar=baz") -> Err(InvalidAnnotation)
/// @ai:effects pure
pub fn parse_match_labels_matcher(rest: &str) -> Result<MatchLabelsMatcher> {
    let mut labels = BTreeMap::new();

    for token in rest.split_whitespace() {
        match token.split('=').collect::<Vec<_>>().as_slice() {
            [key, value] => {
                labels.insert(key.to_string(), value.to_string());
            }
            _ => return Err(Error::invalid_annotation(Directive::MatchLabels, token)),
        }
    }

    Ok(MatchLabelsMatcher(labels))
}

fn normalize_group(group: &str) -> &str {
    if group == QUOTED_CORE_GROUP {
        ""
    } else {
        group
    }
}

// Directive values are separated by single spaces. A run of spaces yields empty tokens.
fn tokens(rest: &str) -> impl Iterator<Item = &str> {
    rest.trim().split(' ')
}

fn split_names(rest: &str) -> Vec<String> {
    tokens(rest).map(str::to_string).collect()
}

fn write_joined<I, T>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    for (idx, item) in items.into_iter().enumerate() {
        if idx > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for KindMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.api_group, self.kind)
    }
}

impl fmt::Display for KindMatchers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.0)
    }
}

impl fmt::Display for MatchLabelsMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, self.0.iter().map(|(k, v)| format!("{}={}", k, v)))
    }
}

impl fmt::Display for NamespacesMatchers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.0)
    }
}

impl fmt::Display for ExcludedNamespacesMatchers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.0)
    }
}

impl KindMatchers {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KindMatcher> {
        self.0.iter()
    }
}

impl MatchLabelsMatcher {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl NamespacesMatchers {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ExcludedNamespacesMatchers {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
