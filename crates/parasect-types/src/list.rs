//! Parameter collections keyed by `(name, component id)`.
//!
//! A [`ParameterList`] owns its parameters and always iterates them in name
//! order (component id breaks ties). Adding a parameter whose identity is
//! already present merges it onto the stored one with
//! [`Parameter::merge_from`].

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::ops::Sub;

use tracing::trace;

use crate::error::{TypeError, TypeResult};
use crate::parameter::{ParamKey, Parameter};

/// An ordered collection of parameters with optional provenance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterList {
    params: BTreeMap<ParamKey, Parameter>,
    source_file: Option<String>,
}

impl ParameterList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Base name of the file this list was read from, if any.
    pub fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }

    pub fn set_source_file(&mut self, name: impl Into<String>) {
        self.source_file = Some(name.into());
    }

    /// Iterate parameters in name order.
    pub fn iter(&self) -> btree_map::Values<'_, ParamKey, Parameter> {
        self.params.values()
    }

    /// Iterate identities in name order.
    pub fn keys(&self) -> btree_map::Keys<'_, ParamKey, Parameter> {
        self.params.keys()
    }

    /// Parameter names in order. Names shared by several components repeat.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(|k| k.name.as_str())
    }

    /// Look up a parameter by name on the default component.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.get(&ParamKey::named(name))
    }

    pub fn get_by_key(&self, key: &ParamKey) -> Option<&Parameter> {
        self.params.get(key)
    }

    pub fn get_mut(&mut self, key: &ParamKey) -> Option<&mut Parameter> {
        self.params.get_mut(key)
    }

    /// Membership by name, assuming the default component.
    pub fn contains_name(&self, name: &str) -> bool {
        self.params.contains_key(&ParamKey::named(name))
    }

    /// Membership by identity.
    pub fn contains_key(&self, key: &ParamKey) -> bool {
        self.params.contains_key(key)
    }

    /// Membership of a parameter's identity.
    pub fn contains(&self, param: &Parameter) -> bool {
        self.params.contains_key(&param.key())
    }

    /// Add a parameter, merging it onto an existing entry with the same
    /// identity.
    pub fn add(&mut self, param: Parameter) {
        trace!(param = %param, "adding parameter");
        match self.params.entry(param.key()) {
            btree_map::Entry::Occupied(mut slot) => slot.get_mut().merge_from(param),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(param);
            }
        }
    }

    /// Merge a parameter onto an existing entry; fails if the identity is
    /// not already present.
    pub fn add_existing(&mut self, param: Parameter) -> TypeResult<()> {
        match self.params.get_mut(&param.key()) {
            Some(existing) => {
                existing.merge_from(param);
                Ok(())
            }
            None => Err(TypeError::MissingKey {
                name: param.name().to_string(),
                cid: param.cid,
            }),
        }
    }

    /// Insert a parameter only if its identity is absent. Returns `true` if
    /// it was inserted.
    pub fn insert_if_absent(&mut self, param: Parameter) -> bool {
        match self.params.entry(param.key()) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(slot) => {
                slot.insert(param);
                true
            }
        }
    }

    /// Insert a parameter whose identity must not be present yet.
    pub fn insert_new(&mut self, param: Parameter) -> TypeResult<()> {
        match self.params.entry(param.key()) {
            btree_map::Entry::Occupied(slot) => Err(TypeError::DuplicateKey {
                name: slot.key().name.clone(),
                cid: slot.key().cid,
            }),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(param);
                Ok(())
            }
        }
    }

    /// Remove a parameter by identity; fails if it is not present.
    pub fn remove(&mut self, key: &ParamKey) -> TypeResult<Parameter> {
        self.params.remove(key).ok_or_else(|| TypeError::MissingKey {
            name: key.name.clone(),
            cid: key.cid,
        })
    }

    /// Remove a parameter by identity if present.
    pub fn discard(&mut self, key: &ParamKey) -> Option<Parameter> {
        self.params.remove(key)
    }

    /// Keep only the parameters matching `keep`. Returns how many were removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Parameter) -> bool,
    {
        let before = self.params.len();
        self.params.retain(|_, p| keep(p));
        before - self.params.len()
    }

    /// Parameters of `self` whose identity is absent from `other`. Values are
    /// not compared.
    pub fn difference(&self, other: &ParameterList) -> ParameterList {
        ParameterList {
            params: self
                .params
                .iter()
                .filter(|(key, _)| !other.params.contains_key(key))
                .map(|(key, p)| (key.clone(), p.clone()))
                .collect(),
            source_file: self.source_file.clone(),
        }
    }
}

impl Sub for &ParameterList {
    type Output = ParameterList;

    fn sub(self, rhs: &ParameterList) -> ParameterList {
        self.difference(rhs)
    }
}

impl<'a> IntoIterator for &'a ParameterList {
    type Item = &'a Parameter;
    type IntoIter = btree_map::Values<'a, ParamKey, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.values()
    }
}

impl IntoIterator for ParameterList {
    type Item = Parameter;
    type IntoIter = btree_map::IntoValues<ParamKey, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.into_values()
    }
}

impl Extend<Parameter> for ParameterList {
    fn extend<I: IntoIterator<Item = Parameter>>(&mut self, iter: I) {
        for param in iter {
            self.add(param);
        }
    }
}

impl FromIterator<Parameter> for ParameterList {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        let mut list = ParameterList::new();
        list.extend(iter);
        list
    }
}

impl fmt::Display for ParameterList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, param) in self.params.values().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{param}")?;
        }
        Ok(())
    }
}
