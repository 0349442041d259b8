use crate::{
    error::{Error, Result},
    types::GeneratedUnit,
};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Generated units keyed by qualified type name, valid while the fingerprint
/// of their inputs is unchanged.
#[derive(Debug)]
pub struct GenerationCache {
    entries: LruCache<String, CacheEntry>,
    cache_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    type_name: String,
    fingerprint: String,
    unit: GeneratedUnit,
}

impl GenerationCache {
    pub fn new(capacity: usize, cache_dir: Option<PathBuf>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            cache_dir,
        }
    }

    /// Cached unit for the type, provided it was produced from the same inputs
    pub fn get(&mut self, type_name: &str, fingerprint: &str) -> Option<GeneratedUnit> {
        let entry = self.entries.get(type_name)?;
        if entry.fingerprint != fingerprint {
            return None;
        }
        Some(entry.unit.clone())
    }

    pub fn insert(&mut self, unit: GeneratedUnit, fingerprint: String) -> Result<()> {
        let entry = CacheEntry {
            type_name: unit.type_name.clone(),
            fingerprint,
            unit,
        };

        // Write-through when a cache dir is configured
        if self.cache_dir.is_some() {
            self.save_entry_to_disk(&entry)?;
        }

        self.entries.put(entry.type_name.clone(), entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();

        // Clear disk cache if cache_dir is set
        if let Some(ref cache_dir) = self.cache_dir {
            if cache_dir.exists() {
                std::fs::remove_dir_all(cache_dir)?;
            }
        }
        Ok(())
    }

    /// Write every in-memory entry to the cache directory
    pub fn save_to_disk(&self) -> Result<()> {
        for (_, entry) in self.entries.iter() {
            self.save_entry_to_disk(entry)?;
        }
        Ok(())
    }

    pub fn load_from_disk(&mut self) -> Result<()> {
        let Some(cache_dir) = self.cache_dir.clone() else {
            return Ok(());
        };
        if !cache_dir.exists() {
            return Ok(());
        }

        for entry in std::fs::read_dir(&cache_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Ok(contents) = std::fs::read_to_string(&path) else {
                continue;
            };
            match serde_json::from_str::<CacheEntry>(&contents) {
                Ok(cache_entry) => {
                    self.entries.put(cache_entry.type_name.clone(), cache_entry);
                }
                Err(e) => tracing::debug!("Ignoring cache file {}: {}", path.display(), e),
            }
        }

        Ok(())
    }

    fn save_entry_to_disk(&self, entry: &CacheEntry) -> Result<()> {
        if let Some(ref cache_dir) = self.cache_dir {
            std::fs::create_dir_all(cache_dir)?;

            let cache_path = cache_dir.join(format!("{}.json", cache_file_stem(&entry.type_name)));
            let contents = serde_json::to_string_pretty(entry).map_err(|e| {
                Error::CacheError(format!("Failed to serialize cache entry: {e}"))
            })?;

            std::fs::write(cache_path, contents)?;
        }

        Ok(())
    }
}

/// Type names contain `<`, `,` and spaces, so files are named by digest
fn cache_file_stem(type_name: &str) -> String {
    format!("{:x}", md5::compute(type_name.as_bytes()))
}

/// Digest over the inputs that determine a unit's text
pub fn fingerprint<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut buffer = Vec::new();
    for part in parts {
        buffer.extend_from_slice(part.as_ref().as_bytes());
        // Separator keeps ["ab", "c"] and ["a", "bc"] apart
        buffer.push(0);
    }
    format!("{:x}", md5::compute(&buffer))
}
