//! Keys used to address stored values

use std::fmt;
use std::hash::{Hash, Hasher};

/// Separator between the components of a [`DynamicKey`]
pub const DELIMITER: char = ':';

const DELIMITER_STR: &str = ":";

/// Prefix used when a key is built without one
pub const DEFAULT_PREFIX: &str = "cstudio";

/// A namespaced, `:`-joined path addressing a value or a file-like entry
///
/// Keys are immutable and compare by their full path.
///
/// # Example
///
/// ```
/// use cstudio_store::DynamicKey;
///
/// let key = DynamicKey::of(["conn-a", "db-x", "console-1"], Some("console"));
/// assert_eq!(key.full_path(), "console:conn-a:db-x:console-1");
/// assert_eq!(key.parent_path(), "console:conn-a:db-x");
/// ```
#[derive(Clone, Debug)]
pub struct DynamicKey {
    full_path: String,
    prefix: String,
}

impl DynamicKey {
    /// Build a key from ordered path segments and an optional prefix
    ///
    /// `/` inside a segment or the prefix becomes a nested separator and
    /// empty components are dropped, so the result never has an empty
    /// component and never ends with the delimiter. A prefix with no
    /// components falls back to [`DEFAULT_PREFIX`].
    pub fn of<I, S>(segments: I, prefix: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut components = Vec::new();
        push_components(&mut components, prefix.unwrap_or(DEFAULT_PREFIX));
        if components.is_empty() {
            components.push(DEFAULT_PREFIX.to_string());
        }
        let prefix = components.join(DELIMITER_STR);

        for segment in segments {
            push_components(&mut components, segment.as_ref());
        }

        Self {
            full_path: components.join(DELIMITER_STR),
            prefix,
        }
    }

    /// The full `:`-joined path
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// The namespace root this key was built with, as its `:`-joined components
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The prefix without any trailing delimiter
    pub fn normalized_prefix(&self) -> &str {
        &self.prefix
    }

    /// All components of the full path, prefix included
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.full_path.split(DELIMITER)
    }

    /// The final component of the path
    pub fn name(&self) -> &str {
        self.full_path
            .rsplit_once(DELIMITER)
            .map_or(self.full_path.as_str(), |(_, name)| name)
    }

    /// The full path with its final component removed
    ///
    /// Entries sharing a parent path form one enumerable "folder".
    pub fn parent_path(&self) -> &str {
        self.full_path
            .rsplit_once(DELIMITER)
            .map_or("", |(parent, _)| parent)
    }
}

fn push_components(components: &mut Vec<String>, raw: &str) {
    let raw = raw.replace('/', DELIMITER_STR);
    components.extend(
        raw.split(DELIMITER)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string),
    );
}

impl PartialEq for DynamicKey {
    fn eq(&self, other: &Self) -> bool {
        self.full_path == other.full_path
    }
}

impl Eq for DynamicKey {}

impl Hash for DynamicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_path.hash(state);
    }
}

impl fmt::Display for DynamicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path)
    }
}

/// Fixed keys for the application-wide values
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreKeys {
    SavedConnections,
    History,
    AppSettings,
}

impl StoreKeys {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKeys::SavedConnections => "saved-connections",
            StoreKeys::History => "history",
            StoreKeys::AppSettings => "app-settings",
        }
    }
}

/// Anything a flat store can be addressed with
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Fixed(StoreKeys),
    Dynamic(DynamicKey),
}

impl StoreKey {
    /// The string the value is stored under
    pub fn as_str(&self) -> &str {
        match self {
            StoreKey::Fixed(key) => key.as_str(),
            StoreKey::Dynamic(key) => key.full_path(),
        }
    }
}

impl From<StoreKeys> for StoreKey {
    fn from(key: StoreKeys) -> Self {
        StoreKey::Fixed(key)
    }
}

impl From<DynamicKey> for StoreKey {
    fn from(key: DynamicKey) -> Self {
        StoreKey::Dynamic(key)
    }
}

impl From<&DynamicKey> for StoreKey {
    fn from(key: &DynamicKey) -> Self {
        StoreKey::Dynamic(key.clone())
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
