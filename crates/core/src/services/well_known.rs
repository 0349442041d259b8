//! Framework types the binder knows without seeing their declarations

use std::collections::{BTreeMap, HashMap};

/// `(simple name, generic arity, namespace)`; `None` arity matches any arity.
const FRAMEWORK_TYPES: &[(&str, Option<usize>, &str)] = &[
    ("Task", Some(0), "System.Threading.Tasks"),
    ("Task", Some(1), "System.Threading.Tasks"),
    ("ValueTask", Some(0), "System.Threading.Tasks"),
    ("ValueTask", Some(1), "System.Threading.Tasks"),
    ("CancellationToken", Some(0), "System.Threading"),
    ("IEnumerable", Some(0), "System.Collections"),
    ("IEnumerable", Some(1), "System.Collections.Generic"),
    ("IAsyncEnumerable", Some(1), "System.Collections.Generic"),
    ("List", Some(1), "System.Collections.Generic"),
    ("IList", Some(1), "System.Collections.Generic"),
    ("IReadOnlyList", Some(1), "System.Collections.Generic"),
    ("ICollection", Some(1), "System.Collections.Generic"),
    ("IReadOnlyCollection", Some(1), "System.Collections.Generic"),
    ("Dictionary", Some(2), "System.Collections.Generic"),
    ("IDictionary", Some(2), "System.Collections.Generic"),
    ("IReadOnlyDictionary", Some(2), "System.Collections.Generic"),
    ("KeyValuePair", Some(2), "System.Collections.Generic"),
    ("HashSet", Some(1), "System.Collections.Generic"),
    ("ISet", Some(1), "System.Collections.Generic"),
    ("Queue", Some(1), "System.Collections.Generic"),
    ("Stack", Some(1), "System.Collections.Generic"),
    ("Stream", Some(0), "System.IO"),
    ("Guid", Some(0), "System"),
    ("DateTime", Some(0), "System"),
    ("DateTimeOffset", Some(0), "System"),
    ("DateOnly", Some(0), "System"),
    ("TimeOnly", Some(0), "System"),
    ("TimeSpan", Some(0), "System"),
    ("Uri", Some(0), "System"),
    ("Exception", Some(0), "System"),
    ("IDisposable", Some(0), "System"),
    ("IAsyncDisposable", Some(0), "System"),
    ("Nullable", Some(1), "System"),
    ("Memory", Some(1), "System"),
    ("ReadOnlyMemory", Some(1), "System"),
    ("Func", None, "System"),
    ("Action", None, "System"),
    ("String", Some(0), "System"),
    ("Object", Some(0), "System"),
    ("Boolean", Some(0), "System"),
    ("Int32", Some(0), "System"),
    ("Int64", Some(0), "System"),
];

/// Namespace lookup for names with no declaration in the model.
#[derive(Debug, Clone)]
pub struct KnownTypes {
    exact: HashMap<(String, usize), String>,
    any_arity: HashMap<String, String>,
}

impl KnownTypes {
    pub fn framework() -> Self {
        Self::with_extra(&BTreeMap::new())
    }

    /// Framework table plus configured `simple name → namespace` entries,
    /// which apply to every arity and win over the built-in table.
    pub fn with_extra(extra: &BTreeMap<String, String>) -> Self {
        let mut exact = HashMap::new();
        let mut any_arity = HashMap::new();
        for (name, arity, namespace) in FRAMEWORK_TYPES {
            match arity {
                Some(arity) => {
                    exact.insert((name.to_string(), *arity), namespace.to_string());
                }
                None => {
                    any_arity.insert(name.to_string(), namespace.to_string());
                }
            }
        }
        for (name, namespace) in extra {
            exact.retain(|(known, _), _| known != name);
            any_arity.insert(name.clone(), namespace.clone());
        }
        Self { exact, any_arity }
    }

    pub fn namespace_of(&self, name: &str, arity: usize) -> Option<&str> {
        self.exact
            .get(&(name.to_string(), arity))
            .or_else(|| self.any_arity.get(name))
            .map(String::as_str)
    }
}

impl Default for KnownTypes {
    fn default() -> Self {
        Self::framework()
    }
}
