//! @ai:module:intent Extract renderer-ready policy documents from Rego sources
//! @ai:module:layer application
//! @ai:module:public_api extract_file, extract_source, extract_directory, find_policy_files
//! @ai:module:depends_on parser, matchers, policy, config, error
//! @ai:module:stateless true

use crate::config::DocConfig;
use crate::directive::Directive;
use crate::error::Result;
use crate::matchers::Matchers;
use crate::parser::{is_policy_file, parse_file, ParsedSource};
use crate::policy::{anchor_for, DocumentSet, PolicyDocument, Severity};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent Extract the documentation for one policy file
/// @ai:pre path exists and is a Rego file
/// @ai:post error when the header carries a malformed matcher annotation
/// @ai:effects fs:read
pub fn extract_file(path: &Path, root: &Path, config: &DocConfig) -> Result<PolicyDocument> {
    let parsed = parse_file(path)?;
    extract_source(&parsed, path, &config.source_url(relative_to(path, root)))
}

/// @ai:intent Path of a policy relative to the policy root, or its file name when root is the file
/// @ai:example ("p/a/src.rego", "p") -> "a/src.rego"
/// @ai:example ("p/a/src.rego", "p/a/src.rego") -> "src.rego"
/// @ai:effects pure
fn relative_to<'a>(path: &'a Path, root: &Path) -> &'a Path {
    match path.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative,
        _ => path.file_name().map(Path::new).unwrap_or(path),
    }
}

/// @ai:intent Build a policy document from an already-parsed source
/// @ai:effects pure
pub fn extract_source(parsed: &ParsedSource, path: &Path, url: &str) -> Result<PolicyDocument> {
    let matchers = Matchers::from_comments(&parsed.header_comments)?;
    let (title, description) = title_and_description(&parsed.header_comments);
    let title = title.unwrap_or_else(|| parsed.package.clone());

    Ok(PolicyDocument {
        path: path.to_path_buf(),
        anchor: anchor_for(&title),
        title,
        severity: Severity::from_rules(&parsed.rules),
        resources: matchers.kind_matchers.to_string(),
        match_labels: matchers.match_labels_matcher.to_string(),
        namespaces: matchers.namespaces_matchers.to_string(),
        excluded_namespaces: matchers.excluded_namespaces_matchers.to_string(),
        parameters: Vec::new(),
        description,
        url: url.to_string(),
        rego: parsed.body.clone(),
        matchers,
    })
}

/// @ai:intent Split header prose into a title line and the remaining description
/// @ai:post directive lines never appear in title or description
/// @ai:effects pure
fn title_and_description(header: &[String]) -> (Option<String>, String) {
    let mut prose = header
        .iter()
        .filter(|line| Directive::classify(line).is_none())
        .skip_while(|line| line.is_empty());

    let title = prose.next().cloned();
    let description = prose.cloned().collect::<Vec<_>>().join("\n").trim().to_string();

    (title, description)
}

/// @ai:intent List documentable policy files under a directory, sorted by path
/// @ai:effects fs:read
pub fn find_policy_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_policy_file(e.path()))
        .map(|e| e.into_path())
        .collect();

    files.sort();
    files
}

/// @ai:intent Extract every policy under a directory into a grouped document set
/// @ai:post with fail_on_error unset, failing policies are skipped and logged
/// @ai:effects fs:read
pub fn extract_directory(root: &Path, config: &DocConfig) -> Result<DocumentSet> {
    let mut documents = DocumentSet::new();

    for path in find_policy_files(root) {
        match extract_file(&path, root, config) {
            Ok(document) => {
                tracing::debug!(
                    "Extracted {} ({}) from {}",
                    document.title,
                    document.severity,
                    path.display()
                );
                documents.push(document);
            }
            Err(e) if config.fail_on_error => return Err(e),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
            }
        }
    }

    tracing::info!("Extracted {} policies from {}", documents.len(), root.display());
    Ok(documents)
}
