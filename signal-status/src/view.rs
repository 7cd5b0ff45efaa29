//! Read-only views over a snapshot
//!
//! Every view is recomputed from the snapshot it is called on; nothing is
//! cached between snapshots.

use crate::store::Snapshot;
use crate::types::{SignalId, SignalStatus};

/// Name of the group holding statuses that match no configured category
pub const OTHER_CATEGORY: &str = "other";

/// One category of a categorized view
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryView {
    /// Category prefix, or [`OTHER_CATEGORY`]
    pub name: String,
    /// Statuses in the category, sorted by identifier
    pub statuses: Vec<SignalStatus>,
}

impl Snapshot {
    /// Every status, sorted by identifier
    pub fn all(&self) -> Vec<SignalStatus> {
        sorted(self.statuses().values())
    }

    /// Statuses whose identifier starts with `prefix`, sorted by identifier
    pub fn by_prefix(&self, prefix: &str) -> Vec<SignalStatus> {
        sorted(
            self.statuses()
                .values()
                .filter(|status| status.signal_id.as_str().starts_with(prefix)),
        )
    }

    /// Status of exactly one identifier
    pub fn single(&self, signal_id: &str) -> Option<SignalStatus> {
        self.statuses().get(&SignalId::from(signal_id)).cloned()
    }

    /// Group statuses by the first matching prefix, in `prefixes` order
    ///
    /// Statuses matching no prefix land in a trailing [`OTHER_CATEGORY`]
    /// group, which is omitted when empty.
    pub fn categorize<S: AsRef<str>>(&self, prefixes: &[S]) -> Vec<CategoryView> {
        let mut groups: Vec<CategoryView> = prefixes
            .iter()
            .map(|prefix| CategoryView {
                name: prefix.as_ref().to_string(),
                statuses: Vec::new(),
            })
            .collect();
        let mut other = Vec::new();

        for status in self.all() {
            let id = status.signal_id.as_str();
            match prefixes.iter().position(|prefix| id.starts_with(prefix.as_ref())) {
                Some(idx) => groups[idx].statuses.push(status),
                None => other.push(status),
            }
        }

        if !other.is_empty() {
            groups.push(CategoryView {
                name: OTHER_CATEGORY.to_string(),
                statuses: other,
            });
        }
        groups
    }
}

fn sorted<'a>(statuses: impl Iterator<Item = &'a SignalStatus>) -> Vec<SignalStatus> {
    let mut list: Vec<SignalStatus> = statuses.cloned().collect();
    list.sort_by(|a, b| a.signal_id.cmp(&b.signal_id));
    list
}

#[cfg(test)]
mod tests {
    use crate::store::StatusStore;
    use crate::types::{SignalEvent, SignalValue};

    fn ids(statuses: &[crate::types::SignalStatus]) -> Vec<&str> {
        statuses.iter().map(|s| s.signal_id.as_str()).collect()
    }

    fn populated() -> StatusStore {
        let mut store = StatusStore::new();
        store.apply(&SignalEvent::boolean("DO 1", false));
        store.apply(&SignalEvent::float("AI 0", 7.25));
        store.apply(&SignalEvent::boolean("DO 0", true));
        store.apply(&SignalEvent::boolean("DI 0", true));
        store.apply(&SignalEvent::float("TOOL 0", 0.5));
        store
    }

    #[test]
    fn test_all_sorted_by_identifier() {
        let snapshot = populated().snapshot();
        assert_eq!(ids(&snapshot.all()), vec!["AI 0", "DI 0", "DO 0", "DO 1", "TOOL 0"]);
    }

    #[test]
    fn test_by_prefix_filters_and_sorts() {
        let mut store = StatusStore::new();
        store.apply(&SignalEvent::boolean("DO 1", true));
        store.apply(&SignalEvent::float("AI 0", 1.0));
        store.apply(&SignalEvent::boolean("DO 0", false));

        let outputs = store.snapshot().by_prefix("DO ");
        assert_eq!(ids(&outputs), vec!["DO 0", "DO 1"]);
        assert!(store.snapshot().by_prefix("DI ").is_empty());
    }

    #[test]
    fn test_single_lookup() {
        let snapshot = populated().snapshot();
        assert_eq!(snapshot.single("AI 0").unwrap().value, SignalValue::Float(7.25));
        assert!(snapshot.single("AI 9").is_none());
    }

    #[test]
    fn test_clear_then_all_is_empty() {
        let mut store = populated();
        store.clear();
        assert!(store.snapshot().all().is_empty());
    }

    #[test]
    fn test_views_follow_new_snapshots() {
        let mut store = StatusStore::new();
        store.apply(&SignalEvent::boolean("DI 1", true));
        let old = store.snapshot();
        store.apply(&SignalEvent::boolean("DI 1", false));

        assert_eq!(old.single("DI 1").unwrap().value, SignalValue::Boolean(true));
        assert_eq!(store.snapshot().single("DI 1").unwrap().value, SignalValue::Boolean(false));
    }

    #[test]
    fn test_categorize_groups_in_prefix_order() {
        let snapshot = populated().snapshot();
        let groups = snapshot.categorize(&["DO ", "DI ", "AI "]);

        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["DO ", "DI ", "AI ", super::OTHER_CATEGORY]);
        assert_eq!(ids(&groups[0].statuses), vec!["DO 0", "DO 1"]);
        assert_eq!(ids(&groups[1].statuses), vec!["DI 0"]);
        assert_eq!(ids(&groups[2].statuses), vec!["AI 0"]);
        assert_eq!(ids(&groups[3].statuses), vec!["TOOL 0"]);
    }

    #[test]
    fn test_categorize_keeps_empty_configured_groups() {
        let snapshot = StatusStore::new().snapshot();
        let groups = snapshot.categorize(&["DO "]);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].statuses.is_empty());
    }
}
