//
// Copyright (c) IAM contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use std::collections::{BTreeMap, BTreeSet};

/// Record stored in a `MultiKeyTable`
pub trait Record: Clone {
    /// Key value of this record for a named key field
    fn key(&self, field: &str) -> String;
    /// Replacement identity: true if `other` holds the same identity
    /// and should be replaced in place on insert
    fn replaces(&self, other: &Self) -> bool;
}

/// Per-level key filter for table scans
#[derive(Clone, Debug)]
pub enum KeyFilter {
    Any,
    Equals(String),
    OneOf(Vec<String>),
}

impl KeyFilter {
    pub fn accepts(&self, key: &str) -> bool {
        match self {
            KeyFilter::Any => true,
            KeyFilter::Equals(value) => value == key,
            KeyFilter::OneOf(values) => values.iter().any(|value| value == key),
        }
    }
}

enum Node<R> {
    Branch(BTreeMap<String, Node<R>>),
    Records(Vec<R>),
}

/// Associative container keyed by an ordered tuple of named fields.
///
/// Built as nested maps: level i maps the value of `primary_keys[i]` to the
/// next level, the terminal level holds a list of records. Arity is fixed at
/// construction time. BTreeMap levels keep all enumeration in ascending key
/// order.
pub struct MultiKeyTable<R: Record> {
    primary_keys: Vec<&'static str>,
    root: BTreeMap<String, Node<R>>,
}

impl<R: Record> MultiKeyTable<R> {
    pub fn new(primary_keys: &[&'static str]) -> MultiKeyTable<R> {
        assert!(!primary_keys.is_empty(), "key schema must not be empty");
        MultiKeyTable {
            primary_keys: primary_keys.to_vec(),
            root: BTreeMap::new(),
        }
    }

    pub fn primary_keys(&self) -> &[&'static str] {
        &self.primary_keys
    }

    /// Drop all contents, keeping the key schema
    pub fn init(&mut self) {
        self.root.clear();
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        fn count<R>(map: &BTreeMap<String, Node<R>>) -> usize {
            map.values()
                .map(|node| match node {
                    Node::Branch(m) => count(m),
                    Node::Records(list) => list.len(),
                })
                .sum()
        }
        count(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Insert a record. An existing record with the same replacement identity
    /// is overwritten in place (list position preserved), otherwise the
    /// record is appended to the terminal list.
    pub fn add_item(&mut self, record: R) {
        let arity = self.primary_keys.len();
        let mut map = &mut self.root;
        for field in &self.primary_keys[..arity - 1] {
            let key = record.key(field);
            let node = map
                .entry(key)
                .or_insert_with(|| Node::Branch(BTreeMap::new()));
            map = match node {
                Node::Branch(m) => m,
                // records live only at the terminal level
                Node::Records(_) => unreachable!(),
            };
        }
        let key = record.key(self.primary_keys[arity - 1]);
        let node = map.entry(key).or_insert_with(|| Node::Records(Vec::new()));
        if let Node::Records(list) = node {
            for existing in list.iter_mut() {
                if record.replaces(existing) {
                    *existing = record;
                    return;
                }
            }
            list.push(record);
        }
    }

    fn terminal(&self, values: &[&str]) -> Option<&Vec<R>> {
        if values.len() != self.primary_keys.len() {
            return None;
        }
        let mut map = &self.root;
        for value in values {
            match map.get(*value) {
                Some(Node::Branch(m)) => map = m,
                Some(Node::Records(list)) => return Some(list),
                None => return None,
            }
        }
        None
    }

    /// Exact-match lookup. Returns the first record of the terminal list.
    /// When the terminal key is non-unique (several records stored under the
    /// same full key) only the first one is returned.
    pub fn get_item(&self, values: &[&str]) -> Option<&R> {
        self.terminal(values).and_then(|list| list.first())
    }

    pub fn get_item_mut(&mut self, values: &[&str]) -> Option<&mut R> {
        if values.len() != self.primary_keys.len() {
            return None;
        }
        let mut map = &mut self.root;
        for value in values {
            match map.get_mut(*value) {
                Some(Node::Branch(m)) => map = m,
                Some(Node::Records(list)) => return list.first_mut(),
                None => return None,
            }
        }
        None
    }

    /// Distinct key values one level below the given prefix. A full-arity
    /// prefix returns the terminal-level keys (the siblings of the last
    /// prefix value); anything longer returns nothing.
    pub fn get_keys(&self, values: &[&str]) -> Vec<String> {
        let arity = self.primary_keys.len();
        if values.len() > arity {
            return Vec::new();
        }
        let depth = values.len().min(arity - 1);
        let mut map = &self.root;
        for value in &values[..depth] {
            match map.get(*value) {
                Some(Node::Branch(m)) => map = m,
                _ => return Vec::new(),
            }
        }
        map.keys().cloned().collect()
    }

    /// All records matching one filter per key level, flattened in
    /// depth-first traversal order. A filter list of the wrong arity yields
    /// an empty result instead of an error.
    pub fn get_all_items(&self, filters: &[KeyFilter]) -> Vec<&R> {
        if filters.len() != self.primary_keys.len() {
            warn!(
                "filter arity {} does not match key schema {:?}",
                filters.len(),
                self.primary_keys
            );
            return Vec::new();
        }
        fn collect<'a, R>(
            map: &'a BTreeMap<String, Node<R>>,
            filters: &[KeyFilter],
            out: &mut Vec<&'a R>,
        ) {
            for (key, node) in map {
                if !filters[0].accepts(key) {
                    continue;
                }
                match node {
                    Node::Branch(m) => collect(m, &filters[1..], out),
                    Node::Records(list) => out.extend(list.iter()),
                }
            }
        }
        let mut items = Vec::new();
        collect(&self.root, filters, &mut items);
        items
    }

    /// Distinct terminal-level key values of all matching branches. Same
    /// filter and arity rules as `get_all_items`.
    pub fn get_all_keys(&self, filters: &[KeyFilter]) -> Vec<String> {
        if filters.len() != self.primary_keys.len() {
            warn!(
                "filter arity {} does not match key schema {:?}",
                filters.len(),
                self.primary_keys
            );
            return Vec::new();
        }
        fn collect<R>(
            map: &BTreeMap<String, Node<R>>,
            filters: &[KeyFilter],
            out: &mut BTreeSet<String>,
        ) {
            for (key, node) in map {
                if !filters[0].accepts(key) {
                    continue;
                }
                match node {
                    Node::Branch(m) => collect(m, &filters[1..], out),
                    Node::Records(_) => {
                        out.insert(key.clone());
                    }
                }
            }
        }
        let mut keys = BTreeSet::new();
        collect(&self.root, filters, &mut keys);
        keys.into_iter().collect()
    }

    /// Re-index all filtered records into a new table keyed by `group_keys`
    /// (any named record fields, not only primary keys), each terminal bucket
    /// reduced to a scalar by `aggregate`.
    pub fn group_by<F>(
        &self,
        filters: &[KeyFilter],
        group_keys: &[&'static str],
        aggregate: F,
    ) -> GroupedTable
    where
        F: Fn(&[&R]) -> f64,
    {
        let mut grouped = GroupedTable::new(group_keys);
        if group_keys.is_empty() {
            return grouped;
        }
        let mut buckets: BTreeMap<Vec<String>, Vec<&R>> = BTreeMap::new();
        for item in self.get_all_items(filters) {
            let key = group_keys.iter().map(|field| item.key(field)).collect();
            buckets.entry(key).or_insert_with(Vec::new).push(item);
        }
        for (key, bucket) in &buckets {
            grouped.insert(key, aggregate(bucket));
        }
        grouped
    }

    /// Visit every stored record mutably (table maintenance, e.g. clearing
    /// denormalized caches)
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut R),
    {
        fn visit<R, F: FnMut(&mut R)>(map: &mut BTreeMap<String, Node<R>>, f: &mut F) {
            for node in map.values_mut() {
                match node {
                    Node::Branch(m) => visit(m, f),
                    Node::Records(list) => {
                        for record in list.iter_mut() {
                            f(record);
                        }
                    }
                }
            }
        }
        visit(&mut self.root, &mut f);
    }
}

enum GroupNode {
    Branch(BTreeMap<String, GroupNode>),
    Value(f64),
}

/// Result of `MultiKeyTable::group_by`: the same nested shape with each
/// terminal bucket replaced by its aggregate value
pub struct GroupedTable {
    group_keys: Vec<&'static str>,
    root: BTreeMap<String, GroupNode>,
}

impl GroupedTable {
    fn new(group_keys: &[&'static str]) -> GroupedTable {
        GroupedTable {
            group_keys: group_keys.to_vec(),
            root: BTreeMap::new(),
        }
    }

    pub fn group_keys(&self) -> &[&'static str] {
        &self.group_keys
    }

    fn insert(&mut self, values: &[String], value: f64) {
        let arity = self.group_keys.len();
        let mut map = &mut self.root;
        for key in &values[..arity - 1] {
            let node = map
                .entry(key.clone())
                .or_insert_with(|| GroupNode::Branch(BTreeMap::new()));
            map = match node {
                GroupNode::Branch(m) => m,
                GroupNode::Value(_) => unreachable!(),
            };
        }
        map.insert(values[arity - 1].clone(), GroupNode::Value(value));
    }

    pub fn get(&self, values: &[&str]) -> Option<f64> {
        if values.len() != self.group_keys.len() {
            return None;
        }
        let mut map = &self.root;
        for value in values {
            match map.get(*value) {
                Some(GroupNode::Branch(m)) => map = m,
                Some(GroupNode::Value(v)) => return Some(*v),
                None => return None,
            }
        }
        None
    }

    /// Distinct key values one level below the given prefix, in ascending
    /// order
    pub fn get_keys(&self, values: &[&str]) -> Vec<String> {
        let arity = self.group_keys.len();
        if values.len() > arity {
            return Vec::new();
        }
        let depth = values.len().min(arity.saturating_sub(1));
        let mut map = &self.root;
        for value in &values[..depth] {
            match map.get(*value) {
                Some(GroupNode::Branch(m)) => map = m,
                _ => return Vec::new(),
            }
        }
        map.keys().cloned().collect()
    }

    /// All aggregate values in depth-first order
    pub fn values(&self) -> Vec<f64> {
        fn collect(map: &BTreeMap<String, GroupNode>, out: &mut Vec<f64>) {
            for node in map.values() {
                match node {
                    GroupNode::Branch(m) => collect(m, out),
                    GroupNode::Value(v) => out.push(*v),
                }
            }
        }
        let mut values = Vec::new();
        collect(&self.root, &mut values);
        values
    }
}
