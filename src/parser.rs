//! @ai:module:intent Parse Rego policy sources into header comments, package and body
//! @ai:module:layer application
//! @ai:module:public_api parse_file, parse_source, ParsedSource, is_policy_file
//! @ai:module:depends_on error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

const COMMENT_MARKER: char = '#';
const POLICY_EXTENSION: &str = "rego";
const TEST_SUFFIX: &str = "_test.rego";

/// @ai:intent Parsed Rego source for one policy unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSource {
    pub package: String,
    /// Comment block directly above the package declaration, markers stripped.
    pub header_comments: Vec<String>,
    /// Source from the package declaration onwards.
    pub body: String,
    /// Top-level rule names in source order, duplicates removed.
    pub rules: Vec<String>,
}

/// @ai:intent Read and parse a Rego policy file
/// @ai:pre path exists and is readable
/// @ai:effects fs:read
pub fn parse_file(path: &Path) -> Result<ParsedSource> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_source(&content).ok_or_else(|| Error::MissingPackage(path.to_path_buf()))
}

/// @ai:intent Parse Rego source text; None when there is no package declaration
/// @ai:effects pure
pub fn parse_source(content: &str) -> Option<ParsedSource> {
    let lines: Vec<&str> = content.lines().collect();
    let (package_idx, package) = lines
        .iter()
        .enumerate()
        .find_map(|(idx, line)| package_name(line).map(|name| (idx, name)))?;

    let header_comments = header_comments(&lines[..package_idx]);
    let body = lines[package_idx..].join("\n").trim_end().to_string();
    let rules = rule_heads(&lines[package_idx + 1..]);

    Some(ParsedSource {
        package: package.to_string(),
        header_comments,
        body,
        rules,
    })
}

/// @ai:intent Check if a path is a documentable Rego policy (not a test file)
/// @ai:example ("policy/pods/src.rego") -> true
/// @ai:example ("policy/pods/src_test.rego") -> false
/// @ai:effects pure
pub fn is_policy_file(path: &Path) -> bool {
    let is_rego = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == POLICY_EXTENSION);
    let is_test = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(TEST_SUFFIX));

    is_rego && !is_test
}

fn package_name(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("package")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    rest.split_whitespace().next()
}

/// @ai:intent Collect the contiguous comment block ending right above the package line
/// @ai:effects pure
fn header_comments(preamble: &[&str]) -> Vec<String> {
    let mut block: Vec<String> = preamble
        .iter()
        .rev()
        .map(|line| line.trim())
        .take_while(|line| line.starts_with(COMMENT_MARKER))
        .map(|line| line.trim_start_matches(COMMENT_MARKER).trim().to_string())
        .collect();

    block.reverse();
    block
}

fn rule_head_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*(?:\[|\{|=|:=|contains\b|if\b)")
            .expect("rule head pattern is valid")
    })
}

/// @ai:intent Find top-level rule names; indented lines are rule bodies and skipped
/// @ai:effects pure
fn rule_heads(lines: &[&str]) -> Vec<String> {
    let re = rule_head_regex();
    let mut rules: Vec<String> = Vec::new();

    for line in lines {
        if let Some(captures) = re.captures(line) {
            let name = &captures[1];
            if matches!(name, "import" | "package" | "default") {
                continue;
            }
            if !rules.iter().any(|r| r == name) {
                rules.push(name.to_string());
            }
        }
    }

    rules
}
