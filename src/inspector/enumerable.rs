//! Assignability to `System.Collections.IEnumerable`
//!
//! Only the types of the loaded module can be inspected. Interfaces and base classes from other
//! assemblies are judged by name: the two enumerable interfaces themselves, and a fixed list of
//! framework collection classes for base types.

use std::collections::HashSet;

use crate::metadata::{
    token::Token,
    typesystem::{CilType, TypeReference, TypeRegistry},
};

const ENUMERABLE: &str = "System.Collections.IEnumerable";
const GENERIC_ENUMERABLE: &str = "System.Collections.Generic.IEnumerable`1";

/// Framework classes implementing `IEnumerable` that user types commonly derive from
const ENUMERABLE_BASE_CLASSES: &[&str] = &[
    "System.Collections.ArrayList",
    "System.Collections.BitArray",
    "System.Collections.CollectionBase",
    "System.Collections.DictionaryBase",
    "System.Collections.Hashtable",
    "System.Collections.Queue",
    "System.Collections.ReadOnlyCollectionBase",
    "System.Collections.SortedList",
    "System.Collections.Stack",
    "System.Collections.Specialized.NameObjectCollectionBase",
    "System.Collections.Specialized.NameValueCollection",
    "System.Collections.Specialized.StringCollection",
    "System.Collections.Generic.Dictionary`2",
    "System.Collections.Generic.HashSet`1",
    "System.Collections.Generic.LinkedList`1",
    "System.Collections.Generic.List`1",
    "System.Collections.Generic.Queue`1",
    "System.Collections.Generic.SortedDictionary`2",
    "System.Collections.Generic.SortedList`2",
    "System.Collections.Generic.SortedSet`1",
    "System.Collections.Generic.Stack`1",
    "System.Collections.ObjectModel.Collection`1",
    "System.Collections.ObjectModel.KeyedCollection`2",
    "System.Collections.ObjectModel.ObservableCollection`1",
    "System.Collections.ObjectModel.ReadOnlyCollection`1",
    "System.Collections.Concurrent.BlockingCollection`1",
    "System.Collections.Concurrent.ConcurrentBag`1",
    "System.Collections.Concurrent.ConcurrentDictionary`2",
    "System.Collections.Concurrent.ConcurrentQueue`1",
    "System.Collections.Concurrent.ConcurrentStack`1",
];

/// `true` if a value of `cil_type` can be assigned to `System.Collections.IEnumerable`
pub(crate) fn is_enumerable(types: &TypeRegistry, cil_type: &CilType) -> bool {
    let mut visited = HashSet::new();
    check_type(types, cil_type, &mut visited)
}

fn check_type(types: &TypeRegistry, cil_type: &CilType, visited: &mut HashSet<Token>) -> bool {
    // a cycle only exists in broken metadata
    if !visited.insert(cil_type.token) {
        return false;
    }

    if cil_type.fullname() == ENUMERABLE {
        return true;
    }

    if cil_type
        .interfaces
        .iter()
        .any(|interface| check_reference(types, interface, false, visited))
    {
        return true;
    }

    match &cil_type.base {
        Some(base) => check_reference(types, base, true, visited),
        None => false,
    }
}

fn check_reference(
    types: &TypeRegistry,
    reference: &TypeReference,
    is_base: bool,
    visited: &mut HashSet<Token>,
) -> bool {
    match reference {
        TypeReference::Definition(token) => match types.get(token) {
            Some(definition) => check_type(types, definition, visited),
            None => false,
        },
        TypeReference::External { .. } => {
            let Some(fullname) = reference.external_fullname() else {
                return false;
            };

            if is_base {
                ENUMERABLE_BASE_CLASSES.contains(&fullname.as_str())
            } else {
                fullname == ENUMERABLE || fullname == GENERIC_ENUMERABLE
            }
        }
        TypeReference::Unresolved(_) => false,
    }
}
