use git2::Oid;
use regex::Regex;
use std::sync::OnceLock;

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalCommit {
    /// Commit type (`feat`, `fix`, ...); empty for non-conventional messages
    pub r#type: String,
    pub scope: Option<String>,
    pub subject: String,
    pub body: Option<String>,
    pub is_breaking_change: bool,
    pub id: Oid,
}

fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(r"^(?P<type>[A-Za-z]+)(?:\((?P<scope>[^)]*)\))?(?P<bang>!)?:\s*(?P<subject>.*)$")
            .expect("conventional commit header regex is valid")
    })
}

impl ConventionalCommit {
    /// Parse a commit message following the Conventional Commits grammar
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    /// - non-conventional text
    ///
    /// A footer starting with one of `breaking_indicators` also marks the
    /// commit as breaking.
    pub fn parse(message: &str, id: Oid, breaking_indicators: &[String]) -> Self {
        let message = message.trim();
        let (header, rest) = match message.split_once('\n') {
            Some((header, rest)) => (header.trim(), rest),
            None => (message, ""),
        };

        let body = rest.trim();
        let body = (!body.is_empty()).then(|| body.to_string());
        let footer_breaking = body.as_deref().is_some_and(|body| {
            body.lines().any(|line| {
                breaking_indicators
                    .iter()
                    .any(|indicator| line.trim_start().starts_with(indicator.as_str()))
            })
        });

        match header_regex().captures(header) {
            Some(captures) => {
                let scope = captures
                    .name("scope")
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|s| !s.is_empty());

                ConventionalCommit {
                    r#type: captures["type"].to_lowercase(),
                    scope,
                    subject: captures["subject"].trim().to_string(),
                    body,
                    is_breaking_change: captures.name("bang").is_some() || footer_breaking,
                    id,
                }
            }
            // Default: non-conventional commit
            None => ConventionalCommit {
                r#type: String::new(),
                scope: None,
                subject: header.to_string(),
                body,
                is_breaking_change: footer_breaking,
                id,
            },
        }
    }

    /// Whether the header followed the conventional commit grammar
    pub fn is_conventional(&self) -> bool {
        !self.r#type.is_empty()
    }

    /// Scope key used for grouping; unscoped commits belong to the default scope
    pub fn scope_key(&self) -> &str {
        self.scope.as_deref().unwrap_or("")
    }
}
