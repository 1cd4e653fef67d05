//! The field registry of a record type and its process-wide cache.
//!
//! A registry is computed once per record type, on the first construction
//! request, and cached for the lifetime of the process keyed by `TypeId`.
//! Entries are inserted if absent and never mutated afterwards, so readers
//! never observe torn state. Record types are treated as immutable once
//! resolved.

use std::{any::TypeId, cell::RefCell, sync::Arc};

use fxhash::FxHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::{
    error::{Result, SpecError},
    record::Record,
    schema::{field::FieldSpec, Role},
};

/// The resolved field specs of one record type, in merge order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRegistry {
    entries: Vec<FieldSpec>,
}

impl FieldRegistry {
    pub fn entries(&self) -> &[FieldSpec] {
        &self.entries
    }

    /// The first `Data`-role entry, the authoritative one for
    /// single-variable targets and nested specs.
    pub fn first_data(&self) -> Option<&FieldSpec> {
        self.data_entries().next()
    }

    pub fn data_entries(&self) -> impl Iterator<Item = &FieldSpec> {
        self.entries
            .iter()
            .filter(|spec| spec.role == Some(Role::Data))
    }

    pub fn coord_entries(&self) -> impl Iterator<Item = &FieldSpec> {
        self.entries
            .iter()
            .filter(|spec| spec.role == Some(Role::Coord))
    }

    pub fn attr_entries(&self) -> impl Iterator<Item = &FieldSpec> {
        self.entries
            .iter()
            .filter(|spec| spec.role == Some(Role::Attr))
    }

    /// The first `Name`-role entry; later ones are ignored.
    pub fn name_entry(&self) -> Option<&FieldSpec> {
        self.entries
            .iter()
            .find(|spec| spec.role == Some(Role::Name))
    }
}

/// Merges a flattened field sequence: a later item with the name of an
/// earlier one replaces it in its original position.
pub(crate) fn merge_in_place<T, F>(items: Vec<T>, name_of: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut merged: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        match merged.iter().position(|seen| name_of(seen) == name_of(&item)) {
            Some(position) => merged[position] = item,
            None => merged.push(item),
        }
    }

    merged
}

static CACHE: Lazy<RwLock<FxHashMap<TypeId, Arc<FieldRegistry>>>> =
    Lazy::new(|| RwLock::new(FxHashMap::default()));

thread_local! {
    // Record types whose registry is being computed on this thread, to
    // reject self-referential nested records instead of recursing forever.
    static IN_PROGRESS: RefCell<Vec<TypeId>> = RefCell::new(Vec::new());
}

/// Returns the cached field registry of `R`, computing it on first use.
pub fn of<R: Record>() -> Result<Arc<FieldRegistry>> {
    let key = TypeId::of::<R>();
    if let Some(registry) = CACHE.read().get(&key) {
        return Ok(registry.clone());
    }

    if IN_PROGRESS.with(|stack| stack.borrow().contains(&key)) {
        return Err(SpecError::Cycle {
            type_name: std::any::type_name::<R>().to_string(),
        }
        .into());
    }

    IN_PROGRESS.with(|stack| stack.borrow_mut().push(key));
    let specs = R::raw_specs();
    IN_PROGRESS.with(|stack| {
        stack.borrow_mut().pop();
    });

    let registry = Arc::new(FieldRegistry {
        entries: merge_in_place(specs?, |spec| spec.name),
    });

    // Insert-or-fetch: a racing thread may have resolved the same type, the
    // first inserted registry wins and both get the same value.
    let mut cache = CACHE.write();
    Ok(cache.entry(key).or_insert(registry).clone())
}

/// Clears the process-wide registry cache, for test isolation.
pub fn clear_registry_cache() {
    CACHE.write().clear();
}
