//! Ordered, duplicate-free tag collections.
//!
//! Used both for the tags on a single item and for the global tag index.
//! Membership is an exact, case-sensitive string match; insertion order is
//! kept for display.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        TagSet(Vec::new())
    }

    /// Add a tag at the end. Returns false if it was already present.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|t| t != tag);
        self.0.len() != before
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append every tag of `other` that is not present yet.
    pub fn union_with(&mut self, other: &TagSet) {
        for tag in other.iter() {
            self.insert(tag);
        }
    }

    /// Tags in lexicographic order (the REST `/api/tags` shape).
    pub fn sorted(&self) -> Vec<String> {
        let mut tags = self.0.clone();
        tags.sort();
        tags
    }

    /// Autocomplete candidates: tags containing `query` (case-insensitive)
    /// that are not already in `exclude`.
    pub fn suggest<'a>(&'a self, query: &str, exclude: &TagSet) -> Vec<&'a str> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.iter()
            .filter(|tag| tag.to_lowercase().contains(&query))
            .filter(|tag| !exclude.contains(tag))
            .collect()
    }
}

impl From<Vec<String>> for TagSet {
    fn from(tags: Vec<String>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<TagSet> for Vec<String> {
    fn from(tags: TagSet) -> Self {
        tags.0
    }
}

impl FromIterator<String> for TagSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl<'a> FromIterator<&'a str> for TagSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_order_and_rejects_duplicates() {
        let mut tags = TagSet::new();
        assert!(tags.insert("work"));
        assert!(tags.insert("home"));
        assert!(!tags.insert("work"));

        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["work", "home"]);
    }

    #[test]
    fn membership_is_case_sensitive() {
        let tags: TagSet = ["Work"].into_iter().collect();
        assert!(tags.contains("Work"));
        assert!(!tags.contains("work"));
    }

    #[test]
    fn deserializing_drops_duplicates() {
        let tags: TagSet = serde_json::from_str(r#"["a","b","a"]"#).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(serde_json::to_string(&tags).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn union_appends_only_new_tags() {
        let mut index: TagSet = ["work", "home"].into_iter().collect();
        let other: TagSet = ["home", "errands"].into_iter().collect();
        index.union_with(&other);

        assert_eq!(
            index.iter().collect::<Vec<_>>(),
            vec!["work", "home", "errands"]
        );
    }

    #[test]
    fn suggest_matches_substrings_and_skips_current_tags() {
        let index: TagSet = ["Work", "homework", "team"].into_iter().collect();
        let current: TagSet = ["homework"].into_iter().collect();

        assert_eq!(index.suggest("WOR", &current), vec!["Work"]);
        assert!(index.suggest("  ", &current).is_empty());
    }
}
