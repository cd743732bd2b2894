//! Element attribute storage.
//!
//! [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)

use crate::Namespace;

/// [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
///
/// "Attr nodes are simply known as attributes. ... Attributes have a
/// namespace (null or a non-empty string), namespace prefix (null or a
/// non-empty string), local name (a non-empty string), value (a string)."
///
/// The qualified name (`prefix:local`) is stored as written. `namespace` is
/// only set for attributes renamed by the parser's foreign attribute
/// adjustment (`xlink:href`, `xml:lang`, `xmlns`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The qualified attribute name.
    pub name: String,
    /// The attribute value.
    pub value: String,
    /// The attribute namespace, if any.
    pub namespace: Option<Namespace>,
}

impl Attribute {
    /// Create a null-namespace attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            namespace: None,
        }
    }

    /// Create a namespaced attribute.
    #[must_use]
    pub fn namespaced(name: impl Into<String>, value: impl Into<String>, ns: Namespace) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            namespace: Some(ns),
        }
    }

    /// The part of the qualified name after the prefix.
    #[must_use]
    pub fn local_name(&self) -> &str {
        match (self.namespace, self.name.split_once(':')) {
            (Some(_), Some((_, local))) => local,
            _ => &self.name,
        }
    }

    /// The namespace prefix, for namespaced attributes written with one.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        if self.namespace.is_none() {
            return None;
        }
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }
}

/// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#concept-element-attribute)
///
/// "Elements also have an attribute list, which is a list exposed through a
/// `NamedNodeMap`. Unless explicitly given when an element is created, its
/// attribute list is empty."
///
/// The list keeps insertion order and holds at most one attribute per name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList {
    entries: Vec<Attribute>,
}

impl AttributeList {
    /// Create an empty attribute list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the element has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an attribute value by qualified name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Whether an attribute with this qualified name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|attr| attr.name == name)
    }

    /// Set an attribute, replacing the value of an existing one with the
    /// same name in place.
    pub fn set(&mut self, attribute: Attribute) {
        if let Some(existing) = self.entries.iter_mut().find(|a| a.name == attribute.name) {
            existing.value = attribute.value;
            existing.namespace = attribute.namespace;
        } else {
            self.entries.push(attribute);
        }
    }

    /// Add an attribute only if none with that name exists yet.
    ///
    /// Returns `true` if the attribute was added.
    pub fn set_if_absent(&mut self, attribute: Attribute) -> bool {
        if self.contains(&attribute.name) {
            return false;
        }
        self.entries.push(attribute);
        true
    }

    /// Remove an attribute by name, returning it.
    pub fn remove(&mut self, name: &str) -> Option<Attribute> {
        let pos = self.entries.iter().position(|attr| attr.name == name)?;
        Some(self.entries.remove(pos))
    }

    /// Iterate attributes in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.entries.iter()
    }

    /// Whether both lists hold the same name/value pairs, ignoring order.
    #[must_use]
    pub fn same_set(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|attr| other.get(&attr.name) == Some(attr.value.as_str()))
    }
}

impl FromIterator<Attribute> for AttributeList {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        let mut list = Self::new();
        for attr in iter {
            // First occurrence wins, as in the tokenizer.
            let _ = list.set_if_absent(attr);
        }
        list
    }
}

impl<'a> IntoIterator for &'a AttributeList {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let list: AttributeList = [Attribute::new("a", "1"), Attribute::new("a", "2")]
            .into_iter()
            .collect();
        assert_eq!(list.len(), 1);
        assert_eq!(list.get("a"), Some("1"));
    }

    #[test]
    fn test_same_set_ignores_order() {
        let a: AttributeList = [Attribute::new("x", "1"), Attribute::new("y", "2")]
            .into_iter()
            .collect();
        let b: AttributeList = [Attribute::new("y", "2"), Attribute::new("x", "1")]
            .into_iter()
            .collect();
        let c: AttributeList = [Attribute::new("y", "3"), Attribute::new("x", "1")]
            .into_iter()
            .collect();
        assert!(a.same_set(&b));
        assert!(!a.same_set(&c));
    }

    #[test]
    fn test_namespaced_parts() {
        let attr = Attribute::namespaced("xlink:href", "#a", Namespace::XLink);
        assert_eq!(attr.prefix(), Some("xlink"));
        assert_eq!(attr.local_name(), "href");
        let plain = Attribute::new("data:x", "1");
        assert_eq!(plain.prefix(), None);
        assert_eq!(plain.local_name(), "data:x");
    }
}
