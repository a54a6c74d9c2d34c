//! Token to tag resolution.

use crate::spec::ArgSpec;

/// A token resolved to the spec that declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMatch {
    /// Position of the spec in declaration order.
    pub index: usize,
    /// Toggle value encoded by the matched tag.
    pub toggle: bool,
}

#[derive(Debug, Clone)]
struct Candidate {
    text: String,
    hit: TagMatch,
}

/// Resolves raw tokens against every declared tag.
///
/// A token matches only when it equals `prefix ++ name` exactly. Candidates
/// are tried longest text first; among equal lengths, declaration order wins.
#[derive(Debug, Clone, Default)]
pub struct TagMatcher {
    candidates: Vec<Candidate>,
}

impl TagMatcher {
    pub fn new(specs: &[ArgSpec<'_>]) -> Self {
        let mut candidates: Vec<Candidate> = specs
            .iter()
            .enumerate()
            .flat_map(|(index, spec)| {
                spec.tags().iter().map(move |tag| Candidate {
                    text: tag.text(),
                    hit: TagMatch {
                        index,
                        toggle: tag.toggle(),
                    },
                })
            })
            .collect();
        // Stable sort keeps declaration order among equal lengths.
        candidates.sort_by(|a, b| b.text.len().cmp(&a.text.len()));
        Self { candidates }
    }

    pub fn find(&self, token: &str) -> Option<TagMatch> {
        self.candidates
            .iter()
            .find(|c| c.text == token)
            .map(|c| c.hit)
    }

    /// Whether `token` is the text of any declared tag.
    pub fn is_tag(&self, token: &str) -> bool {
        self.find(token).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Tag;

    fn spec<'a>(id: &str, tags: &[(&str, &str, bool)]) -> ArgSpec<'a> {
        let mut spec = ArgSpec::new(id.to_string());
        for (name, prefix, toggle) in tags {
            spec.insert_tag(Tag::new(*name, *prefix, *toggle));
        }
        spec
    }

    #[test]
    fn matches_exact_text_only() {
        let specs = vec![
            spec("input", &[("i", "-", true), ("input", "--", true)]),
            spec("color", &[("color", "--", true), ("no-color", "--", false)]),
        ];
        let m = TagMatcher::new(&specs);

        assert_eq!(m.find("-i"), Some(TagMatch { index: 0, toggle: true }));
        assert_eq!(m.find("--input"), Some(TagMatch { index: 0, toggle: true }));
        assert_eq!(m.find("--no-color"), Some(TagMatch { index: 1, toggle: false }));
        assert_eq!(m.find("--inp"), None);
        assert_eq!(m.find("-I"), None);
        assert_eq!(m.find("--input=x"), None);
        assert!(!m.is_tag("input"));
    }

    #[test]
    fn prefix_concatenation_is_not_ambiguous() {
        // Tag `in` with prefix `-i` has text `-iin`, not `-in`.
        let specs = vec![spec("weird", &[("in", "-i", true)])];
        let m = TagMatcher::new(&specs);
        assert_eq!(m.find("-in"), None);
        assert_eq!(m.find("-iin"), Some(TagMatch { index: 0, toggle: true }));
    }

    #[test]
    fn duplicate_text_prefers_first_declared() {
        let specs = vec![spec("a", &[("x", "-", true)]), spec("b", &[("x", "-", false)])];
        let m = TagMatcher::new(&specs);
        assert_eq!(m.find("-x"), Some(TagMatch { index: 0, toggle: true }));
    }

    #[test]
    fn positional_specs_contribute_no_candidates() {
        let specs = vec![spec("file", &[])];
        let m = TagMatcher::new(&specs);
        assert!(!m.is_tag("file"));
        assert!(!m.is_tag(""));
    }
}
