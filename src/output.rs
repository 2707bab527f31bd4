//! @ai:module:intent Format documents, matchers and lint results (markdown, JSON, text)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, RenderOptions, render_markdown, format_documents, format_matchers, format_lint_result, to_json
//! @ai:module:depends_on policy, matchers, linter
//! @ai:module:stateless true

use crate::linter::{IssueLevel, LintResult};
use crate::matchers::Matchers;
use crate::policy::{DocumentSet, PolicyDocument, Severity};
use colored::Colorize;
use serde::Serialize;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable: markdown for documents, plain text elsewhere.
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Knobs for markdown rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub include_rego: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { include_rego: true }
    }
}

const CODE_FENCE: &str = "```";

/// @ai:intent Render grouped policy documents as a markdown page
/// @ai:post an index of titles per severity precedes one section per policy
/// @ai:effects pure
pub fn render_markdown(documents: &DocumentSet, options: RenderOptions) -> String {
    let mut output = String::from("# Policies\n");

    for (severity, docs) in documents.iter() {
        output.push_str(&format!("\n## {}\n\n", severity.heading()));
        for doc in docs {
            output.push_str(&format!("* [{}](#{})\n", doc.title, doc.anchor));
        }
    }

    for (severity, docs) in documents.iter() {
        for doc in docs {
            output.push_str(&render_policy(severity, doc, options));
        }
    }

    output
}

/// @ai:intent Render the section for one policy
/// @ai:effects pure
fn render_policy(severity: Severity, doc: &PolicyDocument, options: RenderOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n## {}\n\n", doc.title));
    output.push_str(&format!("**Severity:** {}\n\n", severity));
    output.push_str(&format!("**Resources:** {}", doc.resources));

    let optional = [
        ("MatchLabels", &doc.match_labels),
        ("Namespaces", &doc.namespaces),
        ("Excluded Namespaces", &doc.excluded_namespaces),
    ];
    for (label, value) in optional {
        if !value.is_empty() {
            output.push_str(&format!("\n\n**{}:** {}", label, value));
        }
    }

    if !doc.parameters.is_empty() {
        output.push_str("\n\n**Parameters:**\n\n");
        for param in &doc.parameters {
            let array = if param.is_array { "array of " } else { "" };
            output.push_str(&format!("* {}: {}{}\n", param.name, array, param.type_name));
        }
    }

    output.push_str(&format!("\n\n{}\n", doc.description));

    if options.include_rego {
        output.push_str("\n### Rego\n\n");
        output.push_str(&format!("{}rego\n{}\n{}\n", CODE_FENCE, doc.rego, CODE_FENCE));
    }

    output.push_str(&format!("\n_source: [{}]({})_\n", doc.url, doc.url));
    output
}

/// @ai:intent Format a document set in the requested format
/// @ai:effects pure
pub fn format_documents(
    documents: &DocumentSet,
    format: OutputFormat,
    options: RenderOptions,
) -> String {
    match format {
        OutputFormat::Text => render_markdown(documents, options),
        OutputFormat::Json => to_json(documents, false),
        OutputFormat::JsonPretty => to_json(documents, true),
    }
}

/// @ai:intent Format parsed matchers for display
/// @ai:effects pure
pub fn format_matchers(matchers: &Matchers, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(matchers, false),
        OutputFormat::JsonPretty => to_json(matchers, true),
        OutputFormat::Text => {
            let rows = [
                ("kinds", matchers.kind_matchers.to_string()),
                ("matchlabels", matchers.match_labels_matcher.to_string()),
                ("namespaces", matchers.namespaces_matchers.to_string()),
                ("excludednamespaces", matchers.excluded_namespaces_matchers.to_string()),
            ];

            let mut output = String::new();
            for (name, value) in rows {
                let value = if value.is_empty() {
                    "-".dimmed().to_string()
                } else {
                    value
                };
                let label = format!("{:<20}", format!("{}:", name));
                output.push_str(&format!("{}{}\n", label.cyan(), value));
            }
            output
        }
    }
}

/// @ai:intent Format lint results as a string
/// @ai:effects pure
pub fn format_lint_result(result: &LintResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(result, false),
        OutputFormat::JsonPretty => to_json(result, true),
        OutputFormat::Text => format_lint_result_text(result),
    }
}

fn format_lint_result_text(result: &LintResult) -> String {
    let mut output = String::new();

    for issue in &result.issues {
        let level = match issue.level {
            IssueLevel::Error => "ERROR".red().bold(),
            IssueLevel::Warning => "WARN".yellow().bold(),
        };

        output.push_str(&format!(
            "{} {} - {} ({})\n",
            level,
            issue.file.display().to_string().dimmed(),
            issue.message,
            issue.code.dimmed()
        ));

        if let Some(suggestion) = &issue.suggestion {
            output.push_str(&format!("  {} {}\n", "hint:".cyan(), suggestion));
        }
    }

    output.push('\n');
    output.push_str(&format!("Checked {} policies\n", result.files_checked));

    if result.errors > 0 {
        output.push_str(&format!(
            "{} errors, {} warnings\n",
            result.errors.to_string().red().bold(),
            result.warnings.to_string().yellow()
        ));
    } else if result.warnings > 0 {
        output.push_str(&format!(
            "{} {} warnings\n",
            "OK".green().bold(),
            result.warnings.to_string().yellow()
        ));
    } else {
        output.push_str(&format!("{} No issues found\n", "OK".green().bold()));
    }

    output
}

/// @ai:intent Format any serializable value as JSON
/// @ai:effects pure
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_default()
    } else {
        serde_json::to_string(value).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Parameter;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn document(title: &str, severity: Severity) -> PolicyDocument {
        PolicyDocument {
            path: PathBuf::from("p.rego"),
            title: title.to_string(),
            anchor: crate::policy::anchor_for(title),
            severity,
            resources: "apps/Deployment".to_string(),
            match_labels: String::new(),
            namespaces: String::new(),
            excluded_namespaces: String::new(),
            parameters: Vec::new(),
            description: "Description.".to_string(),
            url: "p.rego".to_string(),
            rego: "package p".to_string(),
            matchers: Matchers::default(),
        }
    }

    #[test]
    fn test_render_minimal_document() {
        let set: DocumentSet = vec![document("Deny root", Severity::Violation)]
            .into_iter()
            .collect();

        let expected = "# Policies\n\
\n\
## Violations\n\
\n\
* [Deny root](#deny-root)\n\
\n\
## Deny root\n\
\n\
**Severity:** Violation\n\
\n\
**Resources:** apps/Deployment\n\
\n\
Description.\n\
\n\
### Rego\n\
\n\
```rego\n\
package p\n\
```\n\
\n\
_source: [p.rego](p.rego)_\n";

        assert_eq!(render_markdown(&set, RenderOptions::default()), expected);
    }

    #[test]
    fn test_render_optional_lines_and_parameters() {
        let mut doc = document("Labels", Severity::Warning);
        doc.match_labels = "team=a".to_string();
        doc.excluded_namespaces = "kube-system".to_string();
        doc.parameters = vec![
            Parameter {
                name: "repos".to_string(),
                type_name: "string".to_string(),
                is_array: true,
            },
            Parameter {
                name: "strict".to_string(),
                type_name: "boolean".to_string(),
                is_array: false,
            },
        ];
        let set: DocumentSet = vec![doc].into_iter().collect();

        let rendered = render_markdown(&set, RenderOptions { include_rego: false });

        assert!(rendered.contains("## Warnings\n\n* [Labels](#labels)\n"));
        assert!(rendered.contains(
            "**Resources:** apps/Deployment\n\n**MatchLabels:** team=a\n\n**Excluded Namespaces:** kube-system\n\n**Parameters:**\n\n* repos: array of string\n* strict: boolean\n\n\nDescription.\n"
        ));
        assert!(!rendered.contains("**Namespaces:**"));
        assert!(!rendered.contains("### Rego"));
    }

    #[test]
    fn test_render_groups_in_severity_order() {
        let set: DocumentSet = vec![
            document("W", Severity::Warning),
            document("V", Severity::Violation),
            document("N", Severity::NotEnforced),
        ]
        .into_iter()
        .collect();

        let rendered = render_markdown(&set, RenderOptions::default());
        let not_enforced = rendered.find("## Not Enforced\n").unwrap();
        let violations = rendered.find("## Violations\n").unwrap();
        let warnings = rendered.find("## Warnings\n").unwrap();

        assert!(not_enforced < violations && violations < warnings);
        assert!(rendered.contains("**Severity:** Not Enforced\n"));
    }

    #[test]
    fn test_format_documents_json() {
        let set: DocumentSet = vec![document("Deny root", Severity::Violation)]
            .into_iter()
            .collect();

        let json: serde_json::Value =
            serde_json::from_str(&format_documents(&set, OutputFormat::Json, RenderOptions::default()))
                .unwrap();
        assert_eq!(json["groups"]["Violation"][0]["title"], "Deny root");
    }

    #[test]
    fn test_format_matchers_json() {
        let matchers = Matchers::from_comments(&["@namespaces prod"]).unwrap();
        let json = format_matchers(&matchers, OutputFormat::Json);
        assert!(json.contains("\"namespaces_matchers\":[\"prod\"]"));
    }

    #[test]
    fn test_format_matchers_text_columns_align() {
        let matchers = Matchers::from_comments(&["@kinds apps/Deployment"]).unwrap();
        let text = format_matchers(&matchers, OutputFormat::Text);

        let plain: Vec<String> = text.lines().map(strip_ansi).collect();
        assert_eq!(plain[0], format!("{:<20}apps/Deployment", "kinds:"));
        assert_eq!(plain[3], format!("{:<20}-", "excludednamespaces:"));
    }

    fn strip_ansi(line: &str) -> String {
        let mut out = String::new();
        let mut chars = line.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_format_lint_result_text_summary() {
        colored::control::set_override(false);
        let result = LintResult {
            files_checked: 3,
            ..Default::default()
        };
        let text = format_lint_result(&result, OutputFormat::Text);
        assert!(text.contains("Checked 3 policies"));
        assert!(text.contains("OK No issues found"));
    }
}
