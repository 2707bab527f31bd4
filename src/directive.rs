//! @ai:module:intent Recognize matcher directives in policy header comments
//! @ai:module:layer domain
//! @ai:module:public_api Directive, ScannedDirectives, scan_directives
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::fmt;

/// @ai:intent The closed set of matcher directives understood in policy headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    Kinds,
    MatchLabels,
    Namespaces,
    ExcludedNamespaces,
}

impl Directive {
    /// Dispatch order used when scanning a line.
    pub const ALL: [Directive; 4] = [
        Directive::Kinds,
        Directive::MatchLabels,
        Directive::Namespaces,
        Directive::ExcludedNamespaces,
    ];

    /// @ai:intent Literal token that opens this directive in a comment line
    /// @ai:effects pure
    pub fn token(&self) -> &'static str {
        match self {
            Directive::Kinds => "@kinds",
            Directive::MatchLabels => "@matchlabels",
            Directive::Namespaces => "@namespaces",
            Directive::ExcludedNamespaces => "@excludednamespaces",
        }
    }

    fn index(&self) -> usize {
        match self {
            Directive::Kinds => 0,
            Directive::MatchLabels => 1,
            Directive::Namespaces => 2,
            Directive::ExcludedNamespaces => 3,
        }
    }

    /// @ai:intent Classify a comment line, returning its directive and the text after the token
    /// @ai:pre line has its comment marker already stripped
    /// @ai:example ("@kinds apps/Deployment") -> Some((Kinds, " apps/Deployment"))
    /// @ai:example ("just prose") -> None
    /// @ai:effects pure
    pub fn classify(line: &str) -> Option<(Directive, &str)> {
        let line = line.trim_start();
        Self::ALL
            .into_iter()
            .find_map(|directive| line.strip_prefix(directive.token()).map(|rest| (directive, rest)))
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// @ai:intent Result of one scan over a policy header: the winning line per directive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedDirectives<'a> {
    /// Line index and remainder of the last line per directive.
    winners: [Option<(usize, &'a str)>; 4],
    occurrences: [usize; 4],
}

impl<'a> ScannedDirectives<'a> {
    /// @ai:intent Text following the directive token on the last line that used it
    /// @ai:effects pure
    pub fn remainder(&self, directive: Directive) -> Option<&'a str> {
        self.winners[directive.index()].map(|(_, rest)| rest)
    }

    /// @ai:intent Winning directive lines ordered by their position in the header
    /// @ai:post each present directive appears exactly once
    /// @ai:effects pure
    pub fn in_line_order(&self) -> Vec<(Directive, &'a str)> {
        let mut winners: Vec<(usize, Directive, &'a str)> = Directive::ALL
            .into_iter()
            .filter_map(|d| self.winners[d.index()].map(|(line, rest)| (line, d, rest)))
            .collect();

        winners.sort_by_key(|(line, _, _)| *line);
        winners.into_iter().map(|(_, d, rest)| (d, rest)).collect()
    }

    /// @ai:intent Number of header lines that used the directive
    /// @ai:effects pure
    pub fn occurrences(&self, directive: Directive) -> usize {
        self.occurrences[directive.index()]
    }

    /// @ai:intent Directives that appeared on more than one line
    /// @ai:effects pure
    pub fn repeated(&self) -> Vec<Directive> {
        Directive::ALL
            .into_iter()
            .filter(|d| self.occurrences(*d) > 1)
            .collect()
    }
}

/// @ai:intent Scan header comment lines once, keeping the last line seen per directive
/// @ai:post every directive with at least one matching line has Some remainder
/// @ai:invariant later lines overwrite earlier ones for the same directive
/// @ai:effects pure
pub fn scan_directives<S: AsRef<str>>(comments: &[S]) -> ScannedDirectives<'_> {
    let mut scanned = ScannedDirectives::default();

    for (line, comment) in comments.iter().enumerate() {
        if let Some((directive, rest)) = Directive::classify(comment.as_ref()) {
            let idx = directive.index();
            scanned.winners[idx] = Some((line, rest));
            scanned.occurrences[idx] += 1;
        }
    }

    scanned
}
