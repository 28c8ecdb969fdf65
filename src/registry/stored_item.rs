//! Per-entry view objects produced by registry snapshots.

use std::fmt;
use std::ops::Deref;

/// Read-mostly view of one registry entry captured at snapshot time.
///
/// Holds a copy of the entry's `(value, description)` pair and has no
/// back-reference to the registry that produced it. The wrapper forwards a
/// small explicit set of operations to the underlying value so call sites
/// can mostly treat it as the plain value. `Deref` targets `Option<V>`,
/// which covers truthiness (`is_some`), iteration, and reference access;
/// equality compares underlying values and ignores descriptions.
#[derive(Debug, Clone)]
pub struct StoredItem<V> {
    value: Option<V>,
    description: Option<String>,
}

impl<V> StoredItem<V> {
    /// Wrap a captured `(value, description)` pair
    pub fn new(value: Option<V>, description: Option<String>) -> Self {
        Self { value, description }
    }

    /// The stored value, if one is set
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// The stored description, if one was attached
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// True when the entry holds an actual value
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Consume the wrapper, yielding the stored value
    pub fn into_value(self) -> Option<V> {
        self.value
    }

    /// Consume the wrapper, yielding the captured pair
    pub fn into_parts(self) -> (Option<V>, Option<String>) {
        (self.value, self.description)
    }
}

impl<V> Deref for StoredItem<V> {
    type Target = Option<V>;

    fn deref(&self) -> &Option<V> {
        &self.value
    }
}

impl<V: PartialEq> PartialEq for StoredItem<V> {
    fn eq(&self, other: &Self) -> bool {
        // descriptions are metadata and do not participate in equality
        self.value == other.value
    }
}

impl<V: Eq> Eq for StoredItem<V> {}

impl<V: PartialEq> PartialEq<V> for StoredItem<V> {
    fn eq(&self, other: &V) -> bool {
        self.value.as_ref() == Some(other)
    }
}

impl<V: fmt::Display> fmt::Display for StoredItem<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => value.fmt(f),
            None => f.write_str("None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let item = StoredItem::new(Some(7), Some("seven".to_string()));
        assert_eq!(item.value(), Some(&7));
        assert_eq!(item.description(), Some("seven"));
        assert!(item.is_set());
        assert_eq!(item.into_value(), Some(7));
    }

    #[test]
    fn test_equality_ignores_description() {
        let a = StoredItem::new(Some(1), Some("first".to_string()));
        let b = StoredItem::new(Some(1), Some("second".to_string()));
        let c = StoredItem::new(Some(2), None);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, 1);
        assert_ne!(a, 2);
    }

    #[test]
    fn test_deref_gives_option_access() {
        let item = StoredItem::new(Some(vec![1, 2, 3]), None);
        assert!(item.is_some());
        assert_eq!(item.as_ref().map(Vec::len), Some(3));

        let unset: StoredItem<i32> = StoredItem::new(None, Some("empty".to_string()));
        assert!(unset.is_none());
        assert!(!unset.is_set());
    }

    #[test]
    fn test_display_forwards_to_value() {
        let item = StoredItem::new(Some("payload"), None);
        assert_eq!(item.to_string(), "payload");

        let unset: StoredItem<&str> = StoredItem::new(None, None);
        assert_eq!(unset.to_string(), "None");
    }
}
