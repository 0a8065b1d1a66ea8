//! Per-run generation state
//!
//! The model is shared read-only; everything a run mutates lives here:
//! reference counts, synthesized types and their memo tables, and the list of
//! declarations already emitted. Discarding the session resets the run.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::generation::{GenerationError, Result};
use crate::ir::{ApiModel, Composite, Origin, Type, TypeId, is_self_referencing};

#[derive(Debug, Default, Clone)]
pub(crate) struct SessionState {
    /// Synthesized types; ids continue after the model's arena
    pub(crate) derived: Vec<Type>,
    pub(crate) derived_recursive: HashSet<TypeId>,
    pub(crate) ref_counts: BTreeMap<TypeId, u32>,
    /// Source composite to its writeable variant, `None` when not needed
    pub(crate) writeable: HashMap<TypeId, Option<TypeId>>,
    /// Method name to its request composite
    pub(crate) requests: HashMap<String, TypeId>,
    pub(crate) declared: Vec<TypeId>,
}

/// Generation state for one run of one backend over a model
#[derive(Debug, Clone)]
pub struct GenerationSession<'m> {
    model: &'m ApiModel,
    pub(crate) state: SessionState,
}

impl<'m> GenerationSession<'m> {
    pub fn new(model: &'m ApiModel) -> Self {
        Self {
            model,
            state: SessionState::default(),
        }
    }

    pub fn model(&self) -> &'m ApiModel {
        self.model
    }

    /// Discard counts, synthesized types and memo tables
    pub fn reset(&mut self) {
        self.state = SessionState::default();
    }

    fn base(&self) -> usize {
        self.model.type_count()
    }

    pub fn is_derived(&self, id: TypeId) -> bool {
        id.0 >= self.base()
    }

    /// Node for a handle from either the model or this session
    pub fn get(&self, id: TypeId) -> Option<&Type> {
        if self.is_derived(id) {
            self.state.derived.get(id.0 - self.base())
        } else {
            self.model.get(id)
        }
    }

    pub fn ty(&self, id: TypeId) -> Result<&Type> {
        self.get(id)
            .ok_or_else(|| GenerationError::unmappable(id, "handle is not in the model or session"))
    }

    pub fn composite(&self, id: TypeId) -> Option<&Composite> {
        match self.get(id) {
            Some(Type::Composite(c)) => Some(c),
            _ => None,
        }
    }

    /// Name of a type for headers and diagnostics
    pub fn type_name(&self, id: TypeId) -> String {
        match self.get(id) {
            Some(Type::Intrinsic(i)) => i.name().to_string(),
            Some(Type::Array(e)) => format!("{}[]", self.type_name(*e)),
            Some(Type::Hash(e)) => format!("Hash[{}]", self.type_name(*e)),
            Some(Type::DelimArray(e)) => format!("DelimArray[{}]", self.type_name(*e)),
            Some(Type::Enum(e)) => e.name.clone(),
            Some(Type::Composite(c)) => c.name.clone(),
            None => id.to_string(),
        }
    }

    /// Marks a type as used by an emitted declaration
    pub fn count(&mut self, id: TypeId) {
        *self.state.ref_counts.entry(id).or_default() += 1;
    }

    pub fn ref_count(&self, id: TypeId) -> u32 {
        self.state.ref_counts.get(&id).copied().unwrap_or_default()
    }

    /// Every type used so far, in handle order
    pub fn counted(&self) -> impl Iterator<Item = (TypeId, u32)> + '_ {
        self.state.ref_counts.iter().map(|(id, n)| (*id, *n))
    }

    pub fn is_recursive(&self, id: TypeId) -> bool {
        if self.is_derived(id) {
            self.state.derived_recursive.contains(&id)
        } else {
            self.model.is_recursive(id)
        }
    }

    /// A composite whose every property is read-only, or a container of one
    pub fn is_read_only(&self, id: TypeId) -> bool {
        match self.get(id) {
            Some(Type::Composite(c)) => {
                !c.properties.is_empty() && c.properties.values().all(|p| p.read_only)
            }
            Some(Type::Array(e)) | Some(Type::Hash(e)) | Some(Type::DelimArray(e)) => {
                let e = *e;
                e != id && self.is_read_only(e)
            }
            _ => false,
        }
    }

    /// Synthesized types in creation order
    pub fn derived_types(&self) -> impl Iterator<Item = (TypeId, &Type)> {
        let base = self.base();
        self.state
            .derived
            .iter()
            .enumerate()
            .map(move |(i, ty)| (TypeId(base + i), ty))
    }

    /// Synthesized types that are counted, or reachable from a counted one,
    /// in creation order
    pub fn live_derived_types(&self) -> Vec<TypeId> {
        let mut live: HashSet<TypeId> = HashSet::new();
        let mut stack: Vec<TypeId> = self
            .derived_types()
            .map(|(id, _)| id)
            .filter(|id| self.ref_count(*id) > 0)
            .collect();
        while let Some(id) = stack.pop() {
            if !live.insert(id) {
                continue;
            }
            if let Some(ty) = self.get(id) {
                stack.extend(ty.children().into_iter().filter(|c| self.is_derived(*c)));
            }
        }
        self.derived_types()
            .map(|(id, _)| id)
            .filter(|id| live.contains(id))
            .collect()
    }

    /// Names already used by the model or by synthesized types
    pub fn is_name_taken(&self, name: &str) -> bool {
        self.model.lookup(name).is_some()
            || self
                .state
                .derived
                .iter()
                .any(|ty| ty.declared_name() == Some(name))
    }

    pub(crate) fn unique_name(&self, base: &str) -> String {
        if !self.is_name_taken(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| !self.is_name_taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    pub(crate) fn push_derived(&mut self, ty: Type) -> TypeId {
        self.state.derived.push(ty);
        TypeId(self.base() + self.state.derived.len() - 1)
    }

    pub(crate) fn replace_derived(&mut self, id: TypeId, ty: Type) {
        let index = id.0 - self.base();
        if let Some(slot) = self.state.derived.get_mut(index) {
            *slot = ty;
        }
    }

    /// Recomputes recursion flags once a batch of synthesized types is final
    pub(crate) fn refresh_derived_recursion(&mut self) {
        let recursive: HashSet<TypeId> = self
            .derived_types()
            .filter(|(_, ty)| matches!(ty, Type::Composite(_)))
            .map(|(id, _)| id)
            .filter(|id| is_self_referencing(*id, |t| self.get(t)))
            .collect();
        self.state.derived_recursive = recursive;
    }

    pub fn mark_declared(&mut self, id: TypeId) {
        self.state.declared.push(id);
    }

    /// Types declared so far, in emission order
    pub fn declared(&self) -> &[TypeId] {
        &self.state.declared
    }

    /// Count of live synthesized types by origin: (request, writeable)
    pub fn derived_tally(&self) -> (usize, usize) {
        self.live_derived_types()
            .iter()
            .filter_map(|id| self.composite(*id))
            .fold((0, 0), |(req, write), c| match c.origin {
                Origin::Request { .. } => (req + 1, write),
                Origin::Writeable { .. } => (req, write + 1),
                Origin::Declared => (req, write),
            })
    }
}
