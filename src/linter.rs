//! @ai:module:intent Lint Rego policy headers for malformed or incomplete annotations
//! @ai:module:layer application
//! @ai:module:public_api lint_file, lint_directory, lint_source, LintResult, LintIssue, IssueLevel
//! @ai:module:depends_on parser, directive, matchers, extractor, error
//! @ai:module:stateless true

use crate::directive::{scan_directives, Directive};
use crate::error::Result;
use crate::extractor::find_policy_files;
use crate::matchers::Matchers;
use crate::parser::{parse_file, ParsedSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent How serious a lint finding is
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    Error,
    #[default]
    Warning,
}

/// @ai:intent A single lint finding for one policy file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LintIssue {
    pub level: IssueLevel,
    pub code: String,
    pub message: String,
    pub file: PathBuf,
    pub suggestion: Option<String>,
}

/// @ai:intent Result of linting a file or directory
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LintResult {
    pub files_checked: usize,
    pub issues: Vec<LintIssue>,
    pub errors: usize,
    pub warnings: usize,
}

impl LintResult {
    /// @ai:intent Check if linting passed (no errors)
    pub fn passed(&self) -> bool {
        self.errors == 0
    }

    /// @ai:intent Merge another lint result into this one
    pub fn merge(&mut self, other: LintResult) {
        self.files_checked += other.files_checked;
        self.issues.extend(other.issues);
        self.errors += other.errors;
        self.warnings += other.warnings;
    }

    fn push(&mut self, issue: LintIssue) {
        match issue.level {
            IssueLevel::Error => self.errors += 1,
            IssueLevel::Warning => self.warnings += 1,
        }
        self.issues.push(issue);
    }
}

/// @ai:intent Lint a single policy file
/// @ai:effects fs:read
pub fn lint_file(path: &Path) -> Result<LintResult> {
    let parsed = parse_file(path)?;
    Ok(lint_source(&parsed, path))
}

/// @ai:intent Lint all policy files in a directory; unreadable files become E000 issues
/// @ai:effects fs:read
pub fn lint_directory(path: &Path) -> Result<LintResult> {
    let mut result = LintResult::default();

    for file_path in find_policy_files(path) {
        match lint_file(&file_path) {
            Ok(file_result) => result.merge(file_result),
            Err(e) => {
                result.files_checked += 1;
                result.push(LintIssue {
                    level: IssueLevel::Error,
                    code: "E000".to_string(),
                    message: format!("Failed to parse file: {}", e),
                    file: file_path,
                    suggestion: None,
                });
            }
        }
    }

    Ok(result)
}

/// @ai:intent Lint one parsed policy header
/// @ai:effects pure
pub fn lint_source(parsed: &ParsedSource, path: &Path) -> LintResult {
    let mut result = LintResult {
        files_checked: 1,
        ..Default::default()
    };
    let issue = |level, code: &str, message: String, suggestion: Option<String>| LintIssue {
        level,
        code: code.to_string(),
        message,
        file: path.to_path_buf(),
        suggestion,
    };

    let scanned = scan_directives(&parsed.header_comments);

    if let Err(e) = Matchers::from_scanned(&scanned) {
        result.push(issue(
            IssueLevel::Error,
            "E001",
            format!("Policy `{}` has a malformed annotation: {}", parsed.package, e),
            Some("Use `group/Kind` for @kinds and `key=value` for @matchlabels".to_string()),
        ));
    }

    for directive in scanned.repeated() {
        result.push(issue(
            IssueLevel::Warning,
            "W001",
            format!(
                "{} appears {} times; only the last line is used",
                directive,
                scanned.occurrences(directive)
            ),
            Some(format!("Merge the {} lines into one", directive)),
        ));
    }

    if scanned.occurrences(Directive::Kinds) == 0 {
        result.push(issue(
            IssueLevel::Warning,
            "W002",
            format!("Policy `{}` declares no @kinds", parsed.package),
            Some("Add # @kinds <group>/<Kind> above the package declaration".to_string()),
        ));
    }

    let has_description = parsed
        .header_comments
        .iter()
        .filter(|line| !line.is_empty() && Directive::classify(line).is_none())
        .nth(1)
        .is_some();
    if !has_description {
        result.push(issue(
            IssueLevel::Warning,
            "W003",
            format!("Policy `{}` has no description", parsed.package),
            None,
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn codes(result: &LintResult) -> Vec<&str> {
        result.issues.iter().map(|i| i.code.as_str()).collect()
    }

    #[test]
    fn test_lint_clean_policy() {
        let parsed = parse_source(
            "# Title\n# Some description\n# @kinds apps/Deployment\npackage p\n",
        )
        .unwrap();
        let result = lint_source(&parsed, Path::new("p.rego"));

        assert!(result.passed());
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_lint_malformed_annotation() {
        let parsed =
            parse_source("# Title\n# Description\n# @kinds Deployment\npackage p\n").unwrap();
        let result = lint_source(&parsed, Path::new("p.rego"));

        assert!(!result.passed());
        assert_eq!(codes(&result), vec!["E001"]);
        assert!(result.issues[0].message.contains("invalid @kinds annotation token: Deployment"));
    }

    #[test]
    fn test_lint_repeated_directive_and_missing_parts() {
        let parsed = parse_source("# @namespaces a\n# @namespaces b\npackage p\n").unwrap();
        let result = lint_source(&parsed, Path::new("p.rego"));

        assert!(result.passed());
        assert_eq!(codes(&result), vec!["W001", "W002", "W003"]);
        assert_eq!(result.warnings, 3);
    }

    #[test]
    fn test_lint_file_without_package() {
        let mut file = NamedTempFile::with_suffix(".rego").unwrap();
        writeln!(file, "# @kinds core/Pod").unwrap();

        assert!(lint_file(file.path()).is_err());
    }

    #[test]
    fn test_lint_directory_reports_unparseable_files() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.rego"), "# no package\n").unwrap();
        std::fs::write(
            dir.path().join("ok.rego"),
            "# Title\n# Text\n# @kinds core/Pod\npackage ok\n",
        )
        .unwrap();

        let result = lint_directory(dir.path()).unwrap();
        assert_eq!(result.files_checked, 2);
        assert_eq!(codes(&result), vec!["E000"]);
        assert_eq!(result.errors, 1);
    }
}
