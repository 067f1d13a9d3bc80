//! Runtime tuple formats and field dictionaries
//!
//! Runtime formats never allocate tuples from an engine arena, so they are
//! safe to use from any thread. The registry hands out one shared nameless
//! format and builds named formats on request, bounded by a limit on the
//! number of live formats.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::Value;

use super::errors::{FormatError, FormatResult};
use super::{FieldDef, Tuple};

/// Default upper bound on live formats per registry.
pub const DEFAULT_FORMAT_LIMIT: usize = u16::MAX as usize;

/// Field name to position mapping.
///
/// A dictionary is immutable once built. Callers that need a stable view of
/// a space's field names build their own dictionary instead of sharing the
/// space's, because the space swaps its dictionary on alter.
#[derive(Debug)]
pub struct TupleDictionary {
    names: Vec<String>,
    positions: HashMap<String, u32>,
}

impl TupleDictionary {
    /// Builds a dictionary from field definitions.
    ///
    /// Names are copied; the definitions may be dropped or altered afterwards.
    pub fn new(fields: &[FieldDef]) -> FormatResult<Arc<Self>> {
        let mut names = Vec::new();
        names
            .try_reserve_exact(fields.len())
            .map_err(|_| FormatError::OutOfMemory("tuple dictionary"))?;
        let mut positions = HashMap::new();
        positions
            .try_reserve(fields.len())
            .map_err(|_| FormatError::OutOfMemory("tuple dictionary"))?;

        for (position, field) in fields.iter().enumerate() {
            if positions.insert(field.name.clone(), position as u32).is_some() {
                return Err(FormatError::DuplicateFieldName(field.name.clone()));
            }
            names.push(field.name.clone());
        }

        Ok(Arc::new(Self { names, positions }))
    }

    /// Returns the position of a named field.
    pub fn position(&self, name: &str) -> Option<u32> {
        self.positions.get(name).copied()
    }

    /// Returns field names in position order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the number of named fields.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the dictionary names no fields.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A runtime tuple format.
///
/// The nameless format (no dictionary) addresses fields by position only.
pub struct TupleFormat {
    id: u32,
    dictionary: Option<Arc<TupleDictionary>>,
    live: Arc<AtomicUsize>,
}

impl TupleFormat {
    /// Returns the format id, unique within its registry.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the field dictionary of a named format.
    pub fn dictionary(&self) -> Option<&Arc<TupleDictionary>> {
        self.dictionary.as_ref()
    }

    /// Returns true if fields can be looked up by name.
    pub fn is_named(&self) -> bool {
        self.dictionary.is_some()
    }

    /// Resolves a field name to its position.
    pub fn field_position(&self, name: &str) -> Option<u32> {
        self.dictionary.as_ref()?.position(name)
    }

    /// Looks up a field of `tuple` by name.
    pub fn field<'a>(&self, tuple: &'a Tuple, name: &str) -> Option<&'a Value> {
        let position = self.field_position(name)?;
        tuple.field(position as usize)
    }
}

impl fmt::Debug for TupleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TupleFormat")
            .field("id", &self.id)
            .field("dictionary", &self.dictionary)
            .finish()
    }
}

impl Drop for TupleFormat {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Registry of runtime tuple formats.
pub struct FormatRegistry {
    runtime: Arc<TupleFormat>,
    next_id: AtomicU32,
    live: Arc<AtomicUsize>,
    limit: usize,
}

impl FormatRegistry {
    /// Creates a registry with the default format limit.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_FORMAT_LIMIT)
    }

    /// Creates a registry allowing at most `limit` live formats.
    ///
    /// The shared runtime format always exists and counts towards the limit.
    pub fn with_limit(limit: usize) -> Self {
        let live = Arc::new(AtomicUsize::new(1));
        let runtime = Arc::new(TupleFormat {
            id: 0,
            dictionary: None,
            live: Arc::clone(&live),
        });
        Self {
            runtime,
            next_id: AtomicU32::new(1),
            live,
            limit: limit.max(1),
        }
    }

    /// Returns a new reference to the shared nameless runtime format.
    pub fn runtime_format(&self) -> Arc<TupleFormat> {
        Arc::clone(&self.runtime)
    }

    /// Builds a named runtime format over `dictionary`.
    pub fn new_runtime_format(
        &self,
        dictionary: Arc<TupleDictionary>,
    ) -> FormatResult<Arc<TupleFormat>> {
        let limit = self.limit;
        self.live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                (live < limit).then_some(live + 1)
            })
            .map_err(|_| FormatError::LimitReached(limit))?;

        Ok(Arc::new(TupleFormat {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            dictionary: Some(dictionary),
            live: Arc::clone(&self.live),
        }))
    }

    /// Returns the number of live formats, including the runtime format.
    pub fn live_formats(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Returns the live format limit.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("live", &self.live_formats())
            .field("limit", &self.limit)
            .finish()
    }
}
