//! The API model arena and its builder

use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

use crate::ir::{
    Composite, EnumRegistry, EnumType, EnumValue, Intrinsic, Location, Method, ModelError,
    Property, Type, TypeId,
};

/// True when `root` can reach itself by following type handles.
///
/// Iterative depth-first walk with a visited set, so cycles that do not pass
/// through `root` terminate.
pub fn is_self_referencing<'a>(root: TypeId, node: impl Fn(TypeId) -> Option<&'a Type>) -> bool {
    let mut visited = HashSet::new();
    let mut stack = node(root).map(|t| t.children()).unwrap_or_default();
    while let Some(id) = stack.pop() {
        if id == root {
            return true;
        }
        if !visited.insert(id) {
            continue;
        }
        if let Some(ty) = node(id) {
            stack.extend(ty.children());
        }
    }
    false
}

/// Read-only intermediate representation of an API
#[derive(Debug, Clone)]
pub struct ApiModel {
    version: String,
    description: String,
    types: Vec<Type>,
    named: IndexMap<String, TypeId>,
    methods: IndexMap<String, Method>,
    tags: IndexMap<String, Vec<String>>,
    recursive: HashSet<TypeId>,
}

impl ApiModel {
    pub fn builder(version: &str) -> ModelBuilder {
        ModelBuilder::new(version)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of nodes in the arena
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.0)
    }

    pub fn intrinsic(&self, intrinsic: Intrinsic) -> TypeId {
        intrinsic_id(intrinsic)
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.named.get(name).copied()
    }

    /// Named enums and composites in declaration order
    pub fn named_types(&self) -> impl Iterator<Item = (TypeId, &Type)> {
        self.named.values().map(|id| (*id, &self.types[id.0]))
    }

    pub fn composite(&self, id: TypeId) -> Option<&Composite> {
        match self.get(id) {
            Some(Type::Composite(c)) => Some(c),
            _ => None,
        }
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.values()
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    /// Tag name to the names of its methods
    pub fn tags(&self) -> &IndexMap<String, Vec<String>> {
        &self.tags
    }

    /// Composite reaches itself directly or through other types
    pub fn is_recursive(&self, id: TypeId) -> bool {
        self.recursive.contains(&id)
    }
}

fn intrinsic_id(intrinsic: Intrinsic) -> TypeId {
    // intrinsics occupy the first arena slots in `Intrinsic::ALL` order
    let index = Intrinsic::ALL
        .iter()
        .position(|i| *i == intrinsic)
        .unwrap_or_default();
    TypeId(index)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Container {
    Array,
    Hash,
    DelimArray,
}

/// Assembles an [`ApiModel`]
#[derive(Debug)]
pub struct ModelBuilder {
    model: ApiModel,
    containers: HashMap<(Container, TypeId), TypeId>,
    enums: EnumRegistry,
}

impl ModelBuilder {
    pub fn new(version: &str) -> Self {
        let model = ApiModel {
            version: version.to_string(),
            description: String::new(),
            types: Intrinsic::ALL.iter().map(|i| Type::Intrinsic(*i)).collect(),
            named: IndexMap::new(),
            methods: IndexMap::new(),
            tags: IndexMap::new(),
            recursive: HashSet::new(),
        };
        Self {
            model,
            containers: HashMap::new(),
            enums: EnumRegistry::new(),
        }
    }

    pub fn describe(&mut self, description: &str) -> &mut Self {
        self.model.description = description.to_string();
        self
    }

    pub fn intrinsic(&self, intrinsic: Intrinsic) -> TypeId {
        intrinsic_id(intrinsic)
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.model.lookup(name)
    }

    fn push(&mut self, ty: Type) -> TypeId {
        self.model.types.push(ty);
        TypeId(self.model.types.len() - 1)
    }

    fn container(&mut self, kind: Container, element: TypeId) -> TypeId {
        if let Some(id) = self.containers.get(&(kind, element)) {
            return *id;
        }
        let id = self.push(match kind {
            Container::Array => Type::Array(element),
            Container::Hash => Type::Hash(element),
            Container::DelimArray => Type::DelimArray(element),
        });
        self.containers.insert((kind, element), id);
        id
    }

    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.container(Container::Array, element)
    }

    pub fn hash(&mut self, element: TypeId) -> TypeId {
        self.container(Container::Hash, element)
    }

    pub fn delim_array(&mut self, element: TypeId) -> TypeId {
        self.container(Container::DelimArray, element)
    }

    /// Declares an empty composite so it can be referenced before its
    /// properties are added
    pub fn composite(&mut self, name: &str, description: &str) -> Result<TypeId, ModelError> {
        if self.model.named.contains_key(name) {
            return Err(ModelError::DuplicateType(name.to_string()));
        }
        let id = self.push(Type::Composite(Composite::new(name, description)));
        self.model.named.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn property(&mut self, owner: TypeId, property: Property) -> Result<(), ModelError> {
        self.check(property.ty)?;
        match self.model.types.get_mut(owner.0) {
            Some(Type::Composite(composite)) => {
                if composite.properties.contains_key(&property.name) {
                    return Err(ModelError::DuplicateProperty {
                        owner: composite.name.clone(),
                        property: property.name,
                    });
                }
                composite.properties.insert(property.name.clone(), property);
                Ok(())
            }
            _ => Err(ModelError::NotComposite(owner.to_string())),
        }
    }

    /// Registers an enumeration declared by `owner`, reusing an existing enum
    /// with the same value set
    pub fn enumeration(
        &mut self,
        natural_name: &str,
        owner: &str,
        values: Vec<EnumValue>,
        description: &str,
    ) -> Result<TypeId, ModelError> {
        if values.is_empty() {
            return Err(ModelError::EmptyEnum(natural_name.to_string()));
        }
        for (i, value) in values.iter().enumerate() {
            if values[..i].contains(value) {
                return Err(ModelError::DuplicateEnumValue {
                    name: natural_name.to_string(),
                    value: value.to_string(),
                });
            }
        }
        if let Some(existing) = self.enums.find(&values) {
            tracing::debug!("Enum {natural_name} on {owner} reuses {existing}");
            return Ok(existing);
        }

        let named = &self.model.named;
        let name = EnumRegistry::resolve_name(natural_name, owner, |n| named.contains_key(n));
        let id = self.push(Type::Enum(EnumType {
            name: name.clone(),
            values: values.clone(),
            owner: owner.to_string(),
            description: description.to_string(),
        }));
        self.model.named.insert(name, id);
        self.enums.record(&values, id);
        Ok(id)
    }

    pub fn method(&mut self, mut method: Method) -> Result<(), ModelError> {
        if self.model.methods.contains_key(&method.name) {
            return Err(ModelError::DuplicateMethod(method.name));
        }
        if method.params.iter().filter(|p| p.location == Location::Body).count() > 1 {
            return Err(ModelError::MultipleBodies(method.name));
        }
        for param in &mut method.params {
            self.check(param.ty)?;
            param.encode = matches!(
                self.model.types.get(param.ty.0),
                Some(Type::Intrinsic(i)) if i.needs_path_encoding()
            );
        }
        for response in &method.responses {
            self.check(response.ty)?;
        }
        for tag in &method.tags {
            self.model
                .tags
                .entry(tag.clone())
                .or_default()
                .push(method.name.clone());
        }
        self.model.methods.insert(method.name.clone(), method);
        Ok(())
    }

    fn check(&self, id: TypeId) -> Result<(), ModelError> {
        if id.0 < self.model.types.len() {
            Ok(())
        } else {
            Err(ModelError::UnknownType(id.to_string()))
        }
    }

    /// Finishes the model and flags recursive composites
    pub fn build(mut self) -> ApiModel {
        let types = &self.model.types;
        let recursive: HashSet<TypeId> = (0..types.len())
            .map(TypeId)
            .filter(|id| matches!(types[id.0], Type::Composite(_)))
            .filter(|id| is_self_referencing(*id, |t| types.get(t.0)))
            .collect();
        tracing::debug!(
            "Built model {} with {} types, {} enums, {} methods, {} recursive",
            self.model.version,
            types.len(),
            self.enums.distinct(),
            self.model.methods.len(),
            recursive.len()
        );
        self.model.recursive = recursive;
        self.model
    }
}
