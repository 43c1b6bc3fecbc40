//! Attribute defaults and overrides.
//!
//! Every package element has a typed group of attribute sets, one per XML
//! sub-element it emits. Callers pass a partial group of the same type and it
//! is merged over the element's defaults: an override wins, anything it
//! leaves out falls back to the default.

use std::fmt;

/// Ordered set of XML attributes.
///
/// Insertion order is kept so rendered files are stable and diffable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrSet(Vec<(String, String)>);

impl AttrSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut set = Self::new();
        for (k, v) in pairs {
            set.insert(*k, *v);
        }
        set
    }

    /// Builder form of [`AttrSet::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.insert(key, value.to_string());
        self
    }

    /// Set `key`, replacing an existing value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Recursive override merge.
pub trait Merge {
    /// Return `self` with every value present in `overrides` replaced.
    fn merge(&self, overrides: &Self) -> Self;
}

impl Merge for AttrSet {
    fn merge(&self, overrides: &Self) -> Self {
        let mut merged = self.clone();
        for (k, v) in overrides.iter() {
            merged.insert(k, v);
        }
        merged
    }
}

/// Declare a group of named attribute sets with a field-wise [`Merge`].
macro_rules! attribute_groups {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($(#[$fmeta:meta])* $field:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $($(#[$fmeta])* pub $field: $crate::package::attrs::AttrSet,)+
        }

        impl $crate::package::attrs::Merge for $name {
            fn merge(&self, overrides: &Self) -> Self {
                Self {
                    $($field: self.$field.merge(&overrides.$field),)+
                }
            }
        }
    };
}

pub(crate) use attribute_groups;

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    attribute_groups! {
        struct Sample {
            outer,
            inner,
        }
    }

    #[test]
    fn test_override_wins_and_defaults_fill_in() {
        let defaults = AttrSet::from_pairs(&[("PointSize", "12"), ("Font", "Minion")]);
        let overrides = AttrSet::new().with("PointSize", 30);
        let merged = defaults.merge(&overrides);
        assert_eq!(merged.get("PointSize"), Some("30"));
        assert_eq!(merged.get("Font"), Some("Minion"));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_order_is_kept() {
        let defaults = AttrSet::from_pairs(&[("A", "1"), ("B", "2")]);
        let merged = defaults.merge(&AttrSet::from_pairs(&[("C", "3"), ("A", "9")]));
        let keys: Vec<_> = merged.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_group_merge_is_field_wise() {
        let defaults = Sample {
            outer: AttrSet::from_pairs(&[("x", "1")]),
            inner: AttrSet::from_pairs(&[("y", "2")]),
        };
        let overrides = Sample {
            inner: AttrSet::from_pairs(&[("y", "5")]),
            ..Sample::default()
        };
        let merged = defaults.merge(&overrides);
        assert_eq!(merged.outer.get("x"), Some("1"));
        assert_eq!(merged.inner.get("y"), Some("5"));
    }

    fn attr_set() -> impl Strategy<Value = AttrSet> {
        prop::collection::vec(("[A-D]", "[a-z0-9]{0,4}"), 0..6).prop_map(|pairs| {
            let mut set = AttrSet::new();
            for (k, v) in pairs {
                set.insert(k, v);
            }
            set
        })
    }

    proptest! {
        #[test]
        fn prop_merge_with_empty_is_identity(set in attr_set()) {
            prop_assert_eq!(set.merge(&AttrSet::new()), set.clone());
        }

        #[test]
        fn prop_every_override_is_visible(base in attr_set(), over in attr_set()) {
            let merged = base.merge(&over);
            for (k, v) in over.iter() {
                prop_assert_eq!(merged.get(k), Some(v));
            }
            for (k, v) in base.iter() {
                if over.get(k).is_none() {
                    prop_assert_eq!(merged.get(k), Some(v));
                }
            }
        }
    }
}
