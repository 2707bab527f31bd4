//! @ai:module:intent policydoc library for parsing Rego header annotations and generating docs
//! @ai:module:layer infrastructure
//! @ai:module:public_api config, directive, error, extractor, linter, matchers, output, parser, policy
//! @ai:module:stateless true
//!
//! # policydoc
//!
//! Reads the comment block above a Rego `package` declaration, parses the
//! `@kinds`, `@matchlabels`, `@namespaces` and `@excludednamespaces` matcher
//! directives, and renders markdown documentation grouped by severity.
//!
//! ## Example
//!
//! ```rust
//! use policydoc::Matchers;
//!
//! let header = [
//!     "Deployments must declare an owner",
//!     "@kinds apps/Deployment apps/StatefulSet",
//!     "@excludednamespaces kube-system",
//! ];
//! let matchers = Matchers::from_comments(&header).unwrap();
//! assert_eq!(matchers.kind_matchers.to_string(), "apps/Deployment apps/StatefulSet");
//! assert_eq!(matchers.excluded_namespaces_matchers.to_string(), "kube-system");
//! ```

pub mod config;
pub mod directive;
pub mod error;
pub mod extractor;
pub mod linter;
pub mod matchers;
pub mod output;
pub mod parser;
pub mod policy;

pub use config::DocConfig;
pub use directive::{scan_directives, Directive, ScannedDirectives};
pub use error::{Error, Result};
pub use extractor::{extract_directory, extract_file, extract_source, find_policy_files};
pub use linter::{lint_directory, lint_file, IssueLevel, LintIssue, LintResult};
pub use matchers::{
    ExcludedNamespacesMatchers, KindMatcher, KindMatchers, MatchLabelsMatcher, Matchers,
    NamespacesMatchers,
};
pub use output::{
    format_documents, format_lint_result, format_matchers, render_markdown, to_json, OutputFormat,
    RenderOptions,
};
pub use parser::{parse_file, parse_source, ParsedSource};
pub use policy::{DocumentSet, Parameter, PolicyDocument, Severity};
