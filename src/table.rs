use heapless::Vec;

use crate::class::{ClassMap, EventClass};
use crate::pattern::{Pattern, PatternError};

/// Maximum number of selectors registered per event class.
pub const MAX_SELECTORS: usize = 4;

#[derive(Debug, Clone)]
struct Entry<const N: usize> {
    selector: u8,
    pattern: Pattern<N>,
}

/// Read-only lookup of the pattern used for each `(class, selector)` pair
///
/// Populated once at startup, then only borrowed by the scheduler.
#[derive(Debug, Clone)]
pub struct PatternTable<const N: usize> {
    rows: ClassMap<Vec<Entry<N>, MAX_SELECTORS>>,
}

impl<const N: usize> PatternTable<N> {
    pub const fn new() -> Self {
        Self {
            rows: ClassMap::from_array([const { Vec::new() }; EventClass::COUNT]),
        }
    }

    /// Register the pattern shown when `class` reports `selector`
    pub fn insert(
        &mut self,
        class: EventClass,
        selector: u8,
        pattern: Pattern<N>,
    ) -> Result<(), PatternError> {
        let row = &mut self.rows[class];
        if row.iter().any(|entry| entry.selector == selector) {
            return Err(PatternError::DuplicateSelector { selector });
        }
        row.push(Entry { selector, pattern })
            .map_err(|_| PatternError::TableFull)
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(
        mut self,
        class: EventClass,
        selector: u8,
        pattern: Pattern<N>,
    ) -> Result<Self, PatternError> {
        self.insert(class, selector, pattern)?;
        Ok(self)
    }

    pub fn lookup(&self, class: EventClass, selector: u8) -> Option<&Pattern<N>> {
        self.rows[class]
            .iter()
            .find(|entry| entry.selector == selector)
            .map(|entry| &entry.pattern)
    }

    /// Number of selectors registered for `class`
    pub fn selectors(&self, class: EventClass) -> usize {
        self.rows[class].len()
    }
}

impl<const N: usize> Default for PatternTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
