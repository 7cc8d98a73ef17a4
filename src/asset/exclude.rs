//! Transform exclusion patterns.

use regex::RegexSet;

/// Compiled exclusion patterns, matched against `/`-separated paths.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    set: RegexSet,
}

impl ExclusionSet {
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            set: RegexSet::new(patterns)?,
        })
    }

    pub fn empty() -> Self {
        Self {
            set: RegexSet::empty(),
        }
    }

    /// True iff any pattern matches. Backslashes are treated as `/`.
    pub fn is_match(&self, path: &str) -> bool {
        if path.contains('\\') {
            self.set.is_match(&path.replace('\\', "/"))
        } else {
            self.set.is_match(path)
        }
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_bundles() {
        let set = ExclusionSet::new([r"(^|/)jquery\.min\.js$", r"(^|/)echarts\.min\.js$"]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.is_match("vendor/jquery.min.js"));
        assert!(set.is_match("/app/node_modules/echarts/dist/echarts.min.js"));
        assert!(set.is_match(r"node_modules\jquery\dist\jquery.min.js"));
        assert!(!set.is_match("src/app.js"));
        assert!(!set.is_match("vendor/myjquery.min.js"));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let set = ExclusionSet::empty();
        assert!(set.is_empty());
        assert!(!set.is_match("jquery.min.js"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(ExclusionSet::new(["("]).is_err());
    }
}
