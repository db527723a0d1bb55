use serde_json::Value as JsonValue;

/// A single selectable option: a plain text value or a keyed record.
///
/// Identity for comparison and display is the text value itself, or the
/// `key_prop` field of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionItem {
    Text(String),
    Record(JsonValue),
}

impl OptionItem {
    /// The option's key text under the given key property
    pub fn key(&self, key_prop: Option<&str>) -> String {
        match self {
            OptionItem::Text(s) => s.clone(),
            OptionItem::Record(v) => match key_prop.and_then(|k| v.get(k)) {
                Some(JsonValue::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            },
        }
    }
}

impl From<&str> for OptionItem {
    fn from(s: &str) -> Self {
        OptionItem::Text(s.to_string())
    }
}

impl From<String> for OptionItem {
    fn from(s: String) -> Self {
        OptionItem::Text(s)
    }
}

/// A named subsection of options, each group carrying its own key property
#[derive(Debug, Clone, PartialEq)]
pub struct OptionGroup {
    pub name: String,
    pub key_prop: Option<String>,
    pub options: Vec<OptionItem>,
}

/// The full option set handed to a select: flat or partitioned into groups
#[derive(Debug, Clone, PartialEq)]
pub enum OptionSet {
    Flat {
        options: Vec<OptionItem>,
        key_prop: Option<String>,
    },
    Grouped(Vec<OptionGroup>),
}

impl OptionSet {
    pub fn flat<I, T>(options: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OptionItem>,
    {
        OptionSet::Flat {
            options: options.into_iter().map(Into::into).collect(),
            key_prop: None,
        }
    }

    pub fn is_grouped(&self) -> bool {
        matches!(self, OptionSet::Grouped(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            OptionSet::Flat { options, .. } => options.is_empty(),
            OptionSet::Grouped(groups) => groups.iter().all(|g| g.options.is_empty()),
        }
    }

    /// Resolve a ref back to its option. Refs hold source indices, so they
    /// stay valid across filter changes as long as the set itself is stable.
    pub fn resolve(&self, r: OptionRef) -> Option<&OptionItem> {
        match (self, r.group) {
            (OptionSet::Flat { options, .. }, None) => options.get(r.index),
            (OptionSet::Grouped(groups), Some(g)) => {
                groups.get(g).and_then(|grp| grp.options.get(r.index))
            }
            _ => None,
        }
    }

    pub fn group(&self, r: OptionRef) -> Option<&OptionGroup> {
        match (self, r.group) {
            (OptionSet::Grouped(groups), Some(g)) => groups.get(g),
            _ => None,
        }
    }

    /// The key text of the option a ref points at
    pub fn key_of(&self, r: OptionRef) -> Option<String> {
        let key_prop = match (self, r.group) {
            (OptionSet::Flat { key_prop, .. }, None) => key_prop.as_deref(),
            (OptionSet::Grouped(groups), Some(g)) => groups.get(g)?.key_prop.as_deref(),
            _ => None,
        };
        self.resolve(r).map(|item| item.key(key_prop))
    }

    /// Apply the search filter: case-insensitive substring match of the
    /// trimmed search text against each option's key text. Empty or
    /// whitespace-only text passes everything through. Group membership is
    /// stable and empty groups survive.
    pub fn filter(&self, search: &str) -> FilteredOptions {
        let needle = search.trim().to_lowercase();

        let matches = |item: &OptionItem, key_prop: Option<&str>| -> bool {
            needle.is_empty() || item.key(key_prop).to_lowercase().contains(&needle)
        };

        match self {
            OptionSet::Flat { options, key_prop } => FilteredOptions::Flat(
                options
                    .iter()
                    .enumerate()
                    .filter(|(_, item)| matches(item, key_prop.as_deref()))
                    .map(|(i, _)| i)
                    .collect(),
            ),
            OptionSet::Grouped(groups) => FilteredOptions::Grouped(
                groups
                    .iter()
                    .map(|group| {
                        group
                            .options
                            .iter()
                            .enumerate()
                            .filter(|(_, item)| matches(item, group.key_prop.as_deref()))
                            .map(|(i, _)| i)
                            .collect()
                    })
                    .collect(),
            ),
        }
    }
}

/// Addresses one option inside an [`OptionSet`] as an explicit tagged pair.
///
/// Replaces the original's `groupName + separator + key` string encoding,
/// which could not disambiguate names containing the separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionRef {
    /// Group index for grouped sets, None for flat sets
    pub group: Option<usize>,
    /// Option index within the group (or the flat list)
    pub index: usize,
}

impl OptionRef {
    pub fn flat(index: usize) -> Self {
        Self { group: None, index }
    }

    pub fn grouped(group: usize, index: usize) -> Self {
        Self {
            group: Some(group),
            index,
        }
    }
}

/// The visible subset produced by [`OptionSet::filter`], as source indices
#[derive(Debug, Clone, PartialEq)]
pub enum FilteredOptions {
    Flat(Vec<usize>),
    /// One index list per group; groups are never dropped
    Grouped(Vec<Vec<usize>>),
}

impl FilteredOptions {
    /// Flatten into the ordered ref list the highlight cursor walks
    pub fn flatten(&self) -> Vec<OptionRef> {
        match self {
            FilteredOptions::Flat(indices) => {
                indices.iter().map(|&i| OptionRef::flat(i)).collect()
            }
            FilteredOptions::Grouped(groups) => groups
                .iter()
                .enumerate()
                .flat_map(|(g, indices)| {
                    indices.iter().map(move |&i| OptionRef::grouped(g, i))
                })
                .collect(),
        }
    }

    pub fn contains(&self, r: OptionRef) -> bool {
        match (self, r.group) {
            (FilteredOptions::Flat(indices), None) => indices.contains(&r.index),
            (FilteredOptions::Grouped(groups), Some(g)) => {
                groups.get(g).is_some_and(|indices| indices.contains(&r.index))
            }
            _ => false,
        }
    }

    pub fn visible_count(&self) -> usize {
        match self {
            FilteredOptions::Flat(indices) => indices.len(),
            FilteredOptions::Grouped(groups) => groups.iter().map(Vec::len).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat_set() -> OptionSet {
        OptionSet::flat(["Apple", "Banana", "Cherry", "apricot"])
    }

    fn grouped_set() -> OptionSet {
        OptionSet::Grouped(vec![
            OptionGroup {
                name: "Fruits".to_string(),
                key_prop: None,
                options: vec!["Apple".into(), "Banana".into()],
            },
            OptionGroup {
                name: "Vegetables".to_string(),
                key_prop: None,
                options: vec!["Carrot".into(), "Beet".into()],
            },
        ])
    }

    #[test]
    fn empty_search_passes_through() {
        let set = flat_set();
        assert_eq!(set.filter("").flatten().len(), 4);
        assert_eq!(set.filter("   ").flatten().len(), 4);
    }

    #[test]
    fn substring_match_is_case_insensitive_and_trimmed() {
        let set = flat_set();
        let filtered = set.filter("  AP ");
        let refs = filtered.flatten();
        let keys: Vec<String> = refs.iter().filter_map(|&r| set.key_of(r)).collect();
        assert_eq!(keys, vec!["Apple", "apricot"]);
    }

    #[test]
    fn filter_is_idempotent() {
        let set = flat_set();
        let once = set.filter("an");
        let twice = set.filter("an");
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_is_monotonic_under_extension() {
        let set = flat_set();
        let short = set.filter("a").flatten();
        let long = set.filter("ap").flatten();
        assert!(long.iter().all(|r| short.contains(r)));
    }

    #[test]
    fn groups_survive_empty() {
        let set = grouped_set();
        let filtered = set.filter("Apple");
        match &filtered {
            FilteredOptions::Grouped(groups) => {
                assert_eq!(groups.len(), 2);
                assert_eq!(groups[0], vec![0]);
                assert!(groups[1].is_empty());
            }
            _ => panic!("expected grouped filter result"),
        }
        assert_eq!(filtered.visible_count(), 1);
    }

    #[test]
    fn grouped_flatten_orders_by_group() {
        let set = grouped_set();
        let refs = set.filter("").flatten();
        assert_eq!(refs.len(), 4);
        assert_eq!(refs[0], OptionRef::grouped(0, 0));
        assert_eq!(refs[3], OptionRef::grouped(1, 1));
    }

    #[test]
    fn record_options_use_key_prop() {
        let set = OptionSet::Flat {
            options: vec![
                OptionItem::Record(json!({"id": "r1", "label": "First"})),
                OptionItem::Record(json!({"id": "r2", "label": "Second"})),
            ],
            key_prop: Some("id".to_string()),
        };
        let refs = set.filter("r2").flatten();
        assert_eq!(refs, vec![OptionRef::flat(1)]);
        assert_eq!(set.key_of(OptionRef::flat(1)).unwrap(), "r2");
    }

    #[test]
    fn ambiguous_names_stay_distinct() {
        // Two groups whose names and values would collide under any
        // string-joined encoding
        let set = OptionSet::Grouped(vec![
            OptionGroup {
                name: "a_group_".to_string(),
                key_prop: None,
                options: vec!["x".into()],
            },
            OptionGroup {
                name: "a".to_string(),
                key_prop: None,
                options: vec!["group_x".into()],
            },
        ]);
        let refs = set.filter("").flatten();
        assert_eq!(refs.len(), 2);
        assert_ne!(refs[0], refs[1]);
        assert_eq!(set.key_of(refs[0]).unwrap(), "x");
        assert_eq!(set.key_of(refs[1]).unwrap(), "group_x");
    }
}
