//! Resource names in the API Registry
//!
//! Every registry resource is addressed by a slash-delimited name built from
//! alternating collection keywords and ids:
//!
//! ```text
//! projects/{project}/products/{product}/versions/{version}/specs/{spec}/files/{file}
//! ```
//!
//! A name may stop after any id (a single resource) or after any collection
//! keyword below `projects` (a collection of resources). File ids are the only
//! ids allowed to contain `/`.

use crate::error::{Error, IdRule, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Characters allowed in an id segment (see "Resource ID Segments" in AIP-122).
const NAME_PATTERN: &str = r"([a-zA-Z0-9_.\-]+)";

/// File names additionally allow forward slashes.
const FILE_NAME_PATTERN: &str = r"([a-zA-Z0-9_.\-/]+)";

/// Collection keywords, outermost first. Index `i` labels the `i`-th id.
const KEYWORDS: [&str; 5] = ["projects", "products", "versions", "specs", "files"];

static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{NAME_PATTERN}$")).expect("valid id regex"));

static FILE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{FILE_NAME_PATTERN}$")).expect("valid file id regex"));

static PATTERN_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    Pattern::ALL
        .iter()
        .map(|p| Regex::new(&p.build_regex()).expect("valid resource name regex"))
        .collect()
});

/// Check a product, version, spec or project id.
pub fn validate_id(id: &str) -> Result<()> {
    if ID_RE.is_match(id) {
        Ok(())
    } else {
        Err(Error::InvalidId {
            id: id.to_string(),
            rule: IdRule::Standard,
        })
    }
}

/// Check a file id, which may contain `/`.
pub fn validate_file_id(id: &str) -> Result<()> {
    if FILE_ID_RE.is_match(id) {
        Ok(())
    } else {
        Err(Error::InvalidId {
            id: id.to_string(),
            rule: IdRule::File,
        })
    }
}

/// Kinds of resources that can be listed or fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Product,
    Version,
    Spec,
    File,
}

impl ResourceKind {
    /// Number of ancestors between `projects` and this kind, plus one.
    fn depth(self) -> usize {
        match self {
            ResourceKind::Product => 1,
            ResourceKind::Version => 2,
            ResourceKind::Spec => 3,
            ResourceKind::File => 4,
        }
    }

    /// The collection keyword that precedes ids of this kind.
    pub fn collection(self) -> &'static str {
        KEYWORDS[self.depth()]
    }

    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::Product => "product",
            ResourceKind::Version => "version",
            ResourceKind::Spec => "spec",
            ResourceKind::File => "file",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// A recognized shape of a resource name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    Products,
    Product,
    Versions,
    Version,
    Specs,
    Spec,
    Files,
    File,
}

impl Pattern {
    pub const ALL: [Pattern; 8] = [
        Pattern::Products,
        Pattern::Product,
        Pattern::Versions,
        Pattern::Version,
        Pattern::Specs,
        Pattern::Spec,
        Pattern::Files,
        Pattern::File,
    ];

    pub fn kind(self) -> ResourceKind {
        match self {
            Pattern::Products | Pattern::Product => ResourceKind::Product,
            Pattern::Versions | Pattern::Version => ResourceKind::Version,
            Pattern::Specs | Pattern::Spec => ResourceKind::Spec,
            Pattern::Files | Pattern::File => ResourceKind::File,
        }
    }

    pub fn is_collection(self) -> bool {
        matches!(
            self,
            Pattern::Products | Pattern::Versions | Pattern::Specs | Pattern::Files
        )
    }

    /// Number of ids captured by this pattern.
    pub fn segment_count(self) -> usize {
        let depth = self.kind().depth();
        if self.is_collection() {
            depth
        } else {
            depth + 1
        }
    }

    /// The anchored, total-match rule for this pattern.
    pub fn regex(self) -> &'static Regex {
        let index = Pattern::ALL
            .iter()
            .position(|p| *p == self)
            .unwrap_or_default();
        &PATTERN_RES[index]
    }

    fn build_regex(self) -> String {
        let count = self.segment_count();
        let mut re = String::from("^");
        for (i, keyword) in KEYWORDS.iter().take(count).enumerate() {
            if i > 0 {
                re.push('/');
            }
            re.push_str(keyword);
            re.push('/');
            if self == Pattern::File && i == count - 1 {
                re.push_str(FILE_NAME_PATTERN);
            } else {
                re.push_str(NAME_PATTERN);
            }
        }
        if self.is_collection() {
            re.push('/');
            re.push_str(self.kind().collection());
        }
        re.push('$');
        re
    }
}

/// A resource name split into its pattern and ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceName {
    pattern: Pattern,
    segments: Vec<String>,
}

impl ResourceName {
    /// Build a name from its ids, validating each one.
    ///
    /// `segments` must hold exactly [`Pattern::segment_count`] ids, outermost
    /// first. Only the last id of a [`Pattern::File`] may contain `/`.
    pub fn new(pattern: Pattern, segments: Vec<String>) -> Result<Self> {
        if segments.len() != pattern.segment_count() {
            return Err(Error::Unrecognized(join(&segments, pattern.is_collection())));
        }
        let last = segments.len() - 1;
        for (i, segment) in segments.iter().enumerate() {
            if pattern == Pattern::File && i == last {
                validate_file_id(segment)?;
            } else {
                validate_id(segment)?;
            }
        }
        Ok(Self { pattern, segments })
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    pub fn kind(&self) -> ResourceKind {
        self.pattern.kind()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The ids joined with their keywords, without any trailing collection
    /// keyword. For a collection this is the parent of the listed resources;
    /// for a single resource it is the resource's full name.
    pub fn path(&self) -> String {
        join(&self.segments, false)
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&self.segments, self.pattern.is_collection()))
    }
}

fn join(segments: &[String], trailing_keyword: bool) -> String {
    let mut parts = Vec::with_capacity(segments.len() * 2 + 1);
    for (keyword, segment) in KEYWORDS.iter().zip(segments) {
        parts.push(*keyword);
        parts.push(segment.as_str());
    }
    if trailing_keyword {
        if let Some(keyword) = KEYWORDS.get(segments.len()) {
            parts.push(keyword);
        }
    }
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validate_id_accepts_allowed_characters() {
        for id in ["p1", "my-product", "v1.0.0", "snake_case", "A-Z.a_z-09"] {
            assert!(validate_id(id).is_ok(), "{id} should be valid");
        }
    }

    #[test]
    fn test_validate_id_rejects_empty_and_slashes() {
        for id in ["", "a/b", "with space", "emoji🙂", "semi;colon"] {
            match validate_id(id) {
                Err(Error::InvalidId { id: bad, rule }) => {
                    assert_eq!(bad, id);
                    assert_eq!(rule, IdRule::Standard);
                }
                other => panic!("expected invalid id for {id:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_validate_file_id_allows_slashes() {
        assert!(validate_file_id("dir/name.txt").is_ok());
        assert!(validate_file_id("openapi.yaml").is_ok());
        let err = validate_file_id("").unwrap_err();
        assert!(matches!(err, Error::InvalidId { rule: IdRule::File, .. }));
        assert_eq!(err.to_string().split(" (").next(), Some("invalid id ''"));
    }

    #[test]
    fn test_pattern_regexes_have_expected_shape() {
        assert_eq!(
            Pattern::Products.build_regex(),
            format!("^projects/{NAME_PATTERN}/products$")
        );
        assert_eq!(
            Pattern::File.build_regex(),
            format!(
                "^projects/{n}/products/{n}/versions/{n}/specs/{n}/files/{FILE_NAME_PATTERN}$",
                n = NAME_PATTERN
            )
        );
    }

    #[test]
    fn test_regex_lookup_matches_pattern() {
        for pattern in Pattern::ALL {
            assert_eq!(pattern.regex().as_str(), pattern.build_regex());
        }
    }

    #[test]
    fn test_segment_counts() {
        assert_eq!(Pattern::Products.segment_count(), 1);
        assert_eq!(Pattern::Product.segment_count(), 2);
        assert_eq!(Pattern::Specs.segment_count(), 3);
        assert_eq!(Pattern::File.segment_count(), 5);
    }

    #[test]
    fn test_resource_name_display_and_path() {
        let versions = ResourceName::new(Pattern::Versions, ids(&["p1", "q1"])).unwrap();
        assert_eq!(versions.to_string(), "projects/p1/products/q1/versions");
        assert_eq!(versions.path(), "projects/p1/products/q1");

        let spec = ResourceName::new(Pattern::Spec, ids(&["p1", "q1", "v1", "openapi.yaml"]))
            .unwrap();
        assert_eq!(
            spec.to_string(),
            "projects/p1/products/q1/versions/v1/specs/openapi.yaml"
        );
        assert_eq!(spec.path(), spec.to_string());
    }

    #[test]
    fn test_resource_name_rejects_slash_outside_file_leaf() {
        let err = ResourceName::new(Pattern::Product, ids(&["p1", "a/b"])).unwrap_err();
        assert!(matches!(err, Error::InvalidId { rule: IdRule::Standard, .. }));

        let file = ResourceName::new(Pattern::File, ids(&["p", "q", "v", "s", "a/b.txt"]));
        assert!(file.is_ok());

        let err = ResourceName::new(Pattern::File, ids(&["p", "q/x", "v", "s", "f"])).unwrap_err();
        assert!(matches!(err, Error::InvalidId { rule: IdRule::Standard, .. }));
    }

    #[test]
    fn test_resource_name_rejects_wrong_segment_count() {
        let err = ResourceName::new(Pattern::Version, ids(&["p1", "q1"])).unwrap_err();
        assert!(matches!(err, Error::Unrecognized(_)));
    }

    #[test]
    fn test_kind_keywords() {
        assert_eq!(ResourceKind::Product.collection(), "products");
        assert_eq!(ResourceKind::File.collection(), "files");
        assert_eq!(ResourceKind::Spec.to_string(), "spec");
    }
}
