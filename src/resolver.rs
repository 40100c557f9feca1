//! Classify a user-supplied string as a resource name.

use crate::names::{Pattern, ResourceName};

/// Order in which patterns are tried. Collections come first; the first
/// rule that matches the whole input wins.
pub const RESOLUTION_ORDER: [Pattern; 8] = [
    Pattern::Products,
    Pattern::Versions,
    Pattern::Specs,
    Pattern::Files,
    Pattern::Product,
    Pattern::Version,
    Pattern::Spec,
    Pattern::File,
];

/// Outcome of resolving an input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Matched(ResourceName),
    /// The input has none of the recognized shapes.
    NoMatch,
}

impl Resolution {
    pub fn matched(self) -> Option<ResourceName> {
        match self {
            Resolution::Matched(name) => Some(name),
            Resolution::NoMatch => None,
        }
    }
}

pub fn resolve(input: &str) -> Resolution {
    for pattern in RESOLUTION_ORDER {
        let Some(caps) = pattern.regex().captures(input) else {
            continue;
        };
        let segments: Vec<String> = caps
            .iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str().to_string())
            .collect();
        // The rule already enforces the id grammar, so this only fails if the
        // two ever drift apart.
        match ResourceName::new(pattern, segments) {
            Ok(name) => {
                tracing::debug!(input, ?pattern, "resolved resource name");
                return Resolution::Matched(name);
            }
            Err(e) => {
                tracing::debug!(input, ?pattern, error = %e, "pattern matched but ids were rejected");
            }
        }
    }
    tracing::debug!(input, "input matches no resource name pattern");
    Resolution::NoMatch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(input: &str) -> ResourceName {
        resolve(input)
            .matched()
            .unwrap_or_else(|| panic!("{input} should resolve"))
    }

    #[test]
    fn test_resolve_products_collection() {
        let name = matched("projects/p1/products");
        assert_eq!(name.pattern(), Pattern::Products);
        assert_eq!(name.segments(), ["p1"]);
    }

    #[test]
    fn test_resolve_every_pattern() {
        let cases = [
            ("projects/p/products", Pattern::Products, vec!["p"]),
            ("projects/p/products/q", Pattern::Product, vec!["p", "q"]),
            ("projects/p/products/q/versions", Pattern::Versions, vec!["p", "q"]),
            ("projects/p/products/q/versions/v", Pattern::Version, vec!["p", "q", "v"]),
            ("projects/p/products/q/versions/v/specs", Pattern::Specs, vec!["p", "q", "v"]),
            (
                "projects/p/products/q/versions/v/specs/s",
                Pattern::Spec,
                vec!["p", "q", "v", "s"],
            ),
            (
                "projects/p/products/q/versions/v/specs/s/files",
                Pattern::Files,
                vec!["p", "q", "v", "s"],
            ),
            (
                "projects/p/products/q/versions/v/specs/s/files/f",
                Pattern::File,
                vec!["p", "q", "v", "s", "f"],
            ),
        ];
        for (input, pattern, segments) in cases {
            let name = matched(input);
            assert_eq!(name.pattern(), pattern, "{input}");
            assert_eq!(name.segments(), segments.as_slice(), "{input}");
            assert_eq!(name.to_string(), input);
        }
    }

    #[test]
    fn test_file_name_keeps_embedded_slashes() {
        let name = matched("projects/p1/products/q1/versions/v1/specs/s1/files/dir/name.txt");
        assert_eq!(name.pattern(), Pattern::File);
        assert_eq!(name.segments().last().map(String::as_str), Some("dir/name.txt"));
    }

    #[test]
    fn test_file_name_that_looks_like_a_path_of_keywords() {
        let name = matched("projects/p/products/q/versions/v/specs/s/files/files");
        assert_eq!(name.pattern(), Pattern::File);
        assert_eq!(name.segments()[4], "files");
    }

    #[test]
    fn test_unmatched_inputs() {
        for input in [
            "not-a-resource-name",
            "",
            "projects",
            "projects/p1",
            "projects/p1/products/",
            "/projects/p1/products",
            "projects/p1/products/q1/",
            "projects//products",
            "projects/p1/versions",
            "projects/p1/products/q 1",
            "projects/p1/products/q1/versions/v1/specs/s1/extra",
        ] {
            assert_eq!(resolve(input), Resolution::NoMatch, "{input:?}");
        }
    }

    #[test]
    fn test_at_most_one_rule_matches() {
        let inputs = [
            "projects/p/products",
            "projects/p/products/products",
            "projects/p/products/q/versions/versions",
            "projects/p/products/q/versions/v/specs/specs",
            "projects/p/products/q/versions/v/specs/s/files/a/b/c",
        ];
        for input in inputs {
            let hits = Pattern::ALL
                .iter()
                .filter(|p| p.regex().is_match(input))
                .count();
            assert_eq!(hits, 1, "{input}");
        }
    }
}
