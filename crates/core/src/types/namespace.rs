use serde::{Deserialize, Serialize};

/// Display name some hosts use for the global namespace.
pub const GLOBAL_NAMESPACE: &str = "<global namespace>";

pub fn is_global_namespace(namespace: &str) -> bool {
    let trimmed = namespace.trim();
    trimmed.is_empty() || trimmed == GLOBAL_NAMESPACE
}

/// Sorted, deduplicated namespaces referenced by generated code.
///
/// Built in one shot from an iterator; the global namespace is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceSet(Vec<String>);

impl NamespaceSet {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.0.binary_search_by(|ns| ns.as_str().cmp(namespace)).is_ok()
    }

    /// `using` directives in emission order
    pub fn using_directives(&self) -> Vec<String> {
        self.iter().map(|ns| format!("using {ns};")).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for NamespaceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut namespaces: Vec<String> = iter
            .into_iter()
            .map(Into::into)
            .filter(|ns| !is_global_namespace(ns))
            .collect();
        namespaces.sort();
        namespaces.dedup();
        NamespaceSet(namespaces)
    }
}

impl<'a> IntoIterator for &'a NamespaceSet {
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
    fn test_sorted_and_deduplicated() {
        let set: NamespaceSet = ["System.Threading.Tasks", "Demo", "System", "Demo"]
            .into_iter()
            .collect();
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec!["Demo", "System", "System.Threading.Tasks"]
        );
        assert!(set.contains("System"));
        assert!(!set.contains("System.IO"));
    }

    #[test]
    fn test_global_namespace_excluded() {
        let set: NamespaceSet = ["", GLOBAL_NAMESPACE, "  ", "Demo"].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_eq!(set.using_directives(), vec!["using Demo;".to_string()]);
    }

    #[test]
    fn test_order_independent() {
        let a: NamespaceSet = ["B", "A", "C"].into_iter().collect();
        let b: NamespaceSet = ["C", "B", "A", "A"].into_iter().collect();
        assert_eq!(a, b);
    }
}
