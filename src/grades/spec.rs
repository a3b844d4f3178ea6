#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{collections::HashSet, fmt, sync::LazyLock};

use regex::Regex;

use crate::error::GradingError;

/// Grammar every grade spec format string must follow.
static FORMAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):([A-Za-z0-9]+):(.+)$").expect("grade spec grammar is a valid regex")
});

/// Priority given to the "no grade" spec. Nothing is less significant.
pub const NO_GRADE_PRIORITY: u32 = u32::MAX;

#[derive(Clone)]
/// A grade specification: a symbol for the grade sheet, a priority deciding
/// which grade wins when several apply, and a pattern matched against issue
/// titles to find grading issues.
///
/// A *smaller* priority value is *more* significant.
pub struct GradeSpec {
    /// How significant the grade is, lower wins.
    priority: u32,
    /// How the grade is represented in the grade sheet.
    symbol:   String,
    /// Title pattern, anchored at the start of the title. `None` for the
    /// "no grade" spec, which matches nothing.
    pattern:  Option<Regex>,
}

impl GradeSpec {
    /// Parses a format string on the form `<PRIORITY>:<SYMBOL>:<REGEX>`, e.g.
    /// `1:P:[Pp]ass`.
    ///
    /// * `format`: the format string
    pub fn parse(format: &str) -> Result<Self, GradingError> {
        let invalid = |reason: String| GradingError::Format {
            format: format.to_string(),
            reason,
        };

        let caps = FORMAT_REGEX
            .captures(format)
            .ok_or_else(|| invalid("expected <PRIORITY>:<SYMBOL>:<REGEX>".into()))?;

        let priority = caps[1]
            .parse::<u32>()
            .map_err(|e| invalid(format!("bad priority: {e}")))?;
        let symbol = caps[2].to_string();
        // Checked on its own first, so that a stray `)` cannot close the
        // anchoring group.
        Regex::new(&caps[3]).map_err(|e| invalid(format!("bad title pattern: {e}")))?;
        let pattern = Regex::new(&format!("^(?:{})", &caps[3]))
            .map_err(|e| invalid(format!("bad title pattern: {e}")))?;

        Ok(Self {
            priority,
            symbol,
            pattern: Some(pattern),
        })
    }

    /// The spec standing for an empty grade sheet cell.
    pub fn no_grade() -> Self {
        Self {
            priority: NO_GRADE_PRIORITY,
            symbol:   String::new(),
            pattern:  None,
        }
    }

    /// Returns the priority.
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Returns the symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the title pattern as written in the format string, or `None`
    /// for the "no grade" spec.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(|re| {
            let anchored = re.as_str();
            anchored
                .strip_prefix("^(?:")
                .and_then(|p| p.strip_suffix(')'))
                .unwrap_or(anchored)
        })
    }

    /// Whether an issue title starts with a match of this spec's pattern.
    pub fn matches(&self, title: &str) -> bool {
        self.pattern.as_ref().is_some_and(|re| re.is_match(title))
    }

    /// Whether this spec may never be overwritten by `other`.
    pub fn outranks(&self, other: &GradeSpec) -> bool {
        self.priority < other.priority
    }
}

impl PartialEq for GradeSpec {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
            && self.symbol == other.symbol
            && self.pattern() == other.pattern()
    }
}

impl Eq for GradeSpec {}

impl fmt::Debug for GradeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradeSpec")
            .field("priority", &self.priority)
            .field("symbol", &self.symbol)
            .field("pattern", &self.pattern())
            .finish()
    }
}

impl fmt::Display for GradeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.priority, self.symbol, self.pattern().unwrap_or_default())
    }
}

/// An ordered set of grade specs with unique symbols, built once per run.
#[derive(Debug, Clone)]
pub struct GradeSpecCatalog {
    /// Specs in the order they were given.
    specs:    Vec<GradeSpec>,
    /// Stand-in for empty cells.
    no_grade: GradeSpec,
}

impl GradeSpecCatalog {
    /// Parses every format string and builds a catalog from them.
    pub fn build<I, S>(formats: I) -> Result<Self, GradingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let specs = formats
            .into_iter()
            .map(|f| GradeSpec::parse(f.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_specs(specs)
    }

    /// Builds a catalog from already parsed specs, rejecting repeated symbols.
    pub fn from_specs(specs: Vec<GradeSpec>) -> Result<Self, GradingError> {
        let mut seen = HashSet::new();
        if let Some(dup) = specs.iter().find(|s| !seen.insert(s.symbol())) {
            return Err(GradingError::DuplicateSymbol(dup.symbol().to_string()));
        }

        Ok(Self {
            specs,
            no_grade: GradeSpec::no_grade(),
        })
    }

    /// Returns the specs in catalog order.
    pub fn specs(&self) -> &[GradeSpec] {
        &self.specs
    }

    /// Returns the "no grade" spec.
    pub fn no_grade(&self) -> &GradeSpec {
        &self.no_grade
    }

    /// Looks up the spec recorded as `symbol`. The empty symbol resolves to
    /// the "no grade" spec.
    pub fn spec_for_symbol(&self, symbol: &str) -> Option<&GradeSpec> {
        if symbol.is_empty() {
            return Some(&self.no_grade);
        }
        self.specs.iter().find(|s| s.symbol() == symbol)
    }

    /// Specs whose pattern matches `title`, paired with their catalog index.
    pub fn matching<'s, 't>(
        &'s self,
        title: &'t str,
    ) -> impl Iterator<Item = (usize, &'s GradeSpec)> + use<'s, 't> {
        self.specs
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.matches(title))
    }

    /// Number of specs, not counting the "no grade" spec.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the catalog holds no specs.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_spec() {
        let spec = GradeSpec::parse("1:P:[Pp]ass").expect("valid spec");
        assert_eq!(spec.priority(), 1);
        assert_eq!(spec.symbol(), "P");
        assert_eq!(spec.pattern(), Some("[Pp]ass"));
        assert_eq!(spec.to_string(), "1:P:[Pp]ass");
    }

    #[test]
    fn pattern_keeps_colons() {
        let spec = GradeSpec::parse("2:F:Fail: see comments").expect("valid spec");
        assert_eq!(spec.pattern(), Some("Fail: see comments"));
        assert!(spec.matches("Fail: see comments below"));
    }

    #[test]
    fn rejects_malformed_specs() {
        for bad in ["P:1:[Pp]ass", "1:P:", "1::Pass", "-1:P:Pass", "1:P-Q:Pass", "", "1:P"] {
            assert!(
                matches!(GradeSpec::parse(bad), Err(GradingError::Format { .. })),
                "`{bad}` should be rejected"
            );
        }
    }

    #[test]
    fn rejects_invalid_regex_and_huge_priority() {
        assert!(matches!(GradeSpec::parse("1:P:(unclosed"), Err(GradingError::Format { .. })));
        assert!(matches!(
            GradeSpec::parse("99999999999:P:Pass"),
            Err(GradingError::Format { .. })
        ));
    }

    #[test]
    fn matches_title_prefix_only() {
        let spec = GradeSpec::parse("1:P:[Pp]ass").expect("valid spec");
        assert!(spec.matches("Pass"));
        assert!(spec.matches("pass with distinction"));
        assert!(!spec.matches("Did not pass"));
        assert!(!GradeSpec::no_grade().matches(""));
    }

    #[test]
    fn catalog_rejects_duplicate_symbols() {
        let err = GradeSpecCatalog::build(["1:P:[Pp]ass", "2:P:Godkänd"]).unwrap_err();
        assert_eq!(err, GradingError::DuplicateSymbol("P".into()));
    }

    #[test]
    fn catalog_allows_shared_priorities() {
        let catalog = GradeSpecCatalog::build(["1:P:[Pp]ass", "1:G:Godkänd"]).expect("catalog");
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn empty_symbol_is_least_significant() {
        let catalog =
            GradeSpecCatalog::build(["1:P:[Pp]ass", "3:K:[Kk]omplettering"]).expect("catalog");
        let none = catalog.spec_for_symbol("").expect("no grade spec");
        assert_eq!(none, catalog.no_grade());
        for spec in catalog.specs() {
            assert!(!none.outranks(spec));
            assert!(spec.outranks(none));
        }
        assert!(catalog.spec_for_symbol("X").is_none());
    }

    #[test]
    fn matching_reports_catalog_indices() {
        let catalog = GradeSpecCatalog::build(["3:K:[Kk]omp", "1:P:[Pp]ass", "2:A:.*"])
            .expect("catalog");
        let hits: Vec<_> = catalog.matching("Pass").map(|(i, s)| (i, s.symbol())).collect();
        assert_eq!(hits, vec![(1, "P"), (2, "A")]);
    }
}
