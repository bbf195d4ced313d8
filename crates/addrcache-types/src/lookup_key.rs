use std::fmt;

use crate::address::AddressData;
use crate::field::AddressField;

const LEVELS: usize = AddressField::HIERARCHY.len();

/// Cache and request key derived from an address.
///
/// A `LookupKey` holds the values of the hierarchy levels present in the
/// source address. Populated levels always form a prefix of
/// [`AddressField::HIERARCHY`]: derivation stops at the first empty level,
/// so `US / "" / Mountain View` yields a key of depth 1.
///
/// Keys are built once with [`LookupKey::from_address`] and are read-only
/// afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LookupKey {
    nodes: [Option<String>; LEVELS],
}

impl LookupKey {
    /// Separator placed between levels in [`LookupKey::to_key_string`].
    pub const SEPARATOR: char = '/';

    /// An empty key with no populated levels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a key from `address`.
    ///
    /// Each hierarchy level with a non-empty value is recorded, in order,
    /// until the first empty level. Missing levels are never synthesized.
    pub fn from_address(address: &AddressData) -> Self {
        let mut nodes: [Option<String>; LEVELS] = Default::default();
        for field in AddressField::HIERARCHY {
            let value = address.get(field);
            if value.is_empty() {
                break;
            }
            nodes[field.level()] = Some(value.to_string());
        }
        Self { nodes }
    }

    /// Render the key from most general to most specific, covering at most
    /// `max_depth` levels.
    ///
    /// `max_depth` is clamped to [`LookupKey::depth`]; an empty key or a
    /// `max_depth` of zero renders as `""`.
    pub fn to_key_string(&self, max_depth: usize) -> String {
        let mut key = String::new();
        for value in self.populated().take(max_depth) {
            if !key.is_empty() {
                key.push(Self::SEPARATOR);
            }
            key.push_str(value);
        }
        key
    }

    /// Value of the coarsest level.
    ///
    /// # Panics
    ///
    /// Panics if the key is empty.
    pub fn region_code(&self) -> &str {
        self.get(AddressField::Country)
            .expect("region_code() called on an empty LookupKey")
    }

    /// Number of populated levels.
    ///
    /// # Panics
    ///
    /// Panics if the key is empty.
    pub fn depth(&self) -> usize {
        let depth = self.populated().count();
        assert!(depth > 0, "depth() called on an empty LookupKey");
        depth
    }

    /// Returns `true` if no level is populated.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].is_none()
    }

    /// Value recorded for `field`, if that level is populated.
    pub fn get(&self, field: AddressField) -> Option<&str> {
        self.nodes[field.level()].as_deref()
    }

    fn populated(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map_while(|node| node.as_deref())
    }
}

impl From<&AddressData> for LookupKey {
    fn from(address: &AddressData) -> Self {
        Self::from_address(address)
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_key_string(LEVELS))
    }
}
