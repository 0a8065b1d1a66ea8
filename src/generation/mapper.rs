//! Type mapping from IR nodes to target-language type expressions

use crate::generation::{Backend, GenerationError, GenerationSession, Result};
use crate::ir::{Intrinsic, Type, TypeId};

/// How a literal value is written for a mapped type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueCoercion {
    /// Quote the literal as a string
    Quoted,
    /// Refer to a member of the named enumeration
    EnumMember(String),
    /// Wrap a list literal, e.g. `DelimSequence([...])`
    Wrapped { open: String, close: String },
}

/// A target-language type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    pub name: String,
    /// Default value expression for an optional slot of this type
    pub default: String,
    /// An absent value can be expressed by the language's optional marker
    pub optional_coercible: bool,
    pub coercion: Option<ValueCoercion>,
}

impl MappedType {
    pub fn new(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            optional_coercible: true,
            coercion: None,
        }
    }

    pub fn quoted(mut self) -> Self {
        self.coercion = Some(ValueCoercion::Quoted);
        self
    }

    pub fn coerced(mut self, coercion: ValueCoercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    /// The type already carries absence and must not be wrapped again
    pub fn not_coercible(mut self) -> Self {
        self.optional_coercible = false;
        self
    }
}

/// Where a mapped name is used; some languages qualify model names
/// differently inside the models file than from the methods file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Model,
    Method,
}

#[derive(Debug)]
enum Shape {
    Intrinsic(Intrinsic),
    Array(TypeId),
    Hash(TypeId),
    DelimArray(TypeId),
    Enum(String),
    Composite(String),
}

/// Maps `id` through `backend`, counting every node it touches as live
pub fn map_type<B: Backend + ?Sized>(
    backend: &B,
    session: &mut GenerationSession<'_>,
    id: TypeId,
    usage: Usage,
) -> Result<MappedType> {
    let shape = match session.ty(id)? {
        Type::Intrinsic(i) => Shape::Intrinsic(*i),
        Type::Array(e) => Shape::Array(*e),
        Type::Hash(e) => Shape::Hash(*e),
        Type::DelimArray(e) => Shape::DelimArray(*e),
        Type::Enum(e) => Shape::Enum(e.name.clone()),
        Type::Composite(c) => Shape::Composite(c.name.clone()),
    };
    session.count(id);

    let mapped = match shape {
        Shape::Intrinsic(i) => backend.intrinsic_type(i),
        Shape::Array(e) => {
            let element = map_element(backend, session, id, e, usage)?;
            backend.array_type(&element)
        }
        Shape::Hash(e) => {
            let element = map_element(backend, session, id, e, usage)?;
            backend.hash_type(&element)
        }
        Shape::DelimArray(e) => {
            let element = map_element(backend, session, id, e, usage)?;
            backend.delim_array_type(&element)
        }
        Shape::Enum(name) | Shape::Composite(name) if name.is_empty() => {
            return Err(GenerationError::unmappable(id, "named type has no name"));
        }
        Shape::Enum(name) => backend.enum_type(&name, usage),
        Shape::Composite(name) => backend.composite_type(&name, usage),
    };

    if mapped.name.is_empty() {
        return Err(GenerationError::unmappable(
            id,
            format!("{} produced an empty type name", backend.language()),
        ));
    }
    Ok(mapped)
}

fn map_element<B: Backend + ?Sized>(
    backend: &B,
    session: &mut GenerationSession<'_>,
    container: TypeId,
    element: TypeId,
    usage: Usage,
) -> Result<MappedType> {
    if element == container {
        return Err(GenerationError::unmappable(container, "container holds itself"));
    }
    map_type(backend, session, element, usage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GeneratorOptions;
    use crate::infrastructure::generation::PythonBackend;
    use crate::ir::{Composite, ModelBuilder};

    fn backend() -> PythonBackend {
        PythonBackend::new(GeneratorOptions::default())
    }

    #[test]
    fn test_containers_count_their_elements() {
        let mut builder = ModelBuilder::new("4.0");
        let user = builder.composite("User", "").unwrap();
        let users = builder.array(user);
        let model = builder.build();
        let mut session = GenerationSession::new(&model);

        let mapped = map_type(&backend(), &mut session, users, Usage::Method).unwrap();
        assert_eq!(mapped.name, "Sequence[models.User]");
        assert_eq!(mapped.default, "None");
        assert_eq!(session.ref_count(users), 1);
        assert_eq!(session.ref_count(user), 1);
    }

    #[test]
    fn test_nameless_declaration_is_unmappable() {
        let model = ModelBuilder::new("4.0").build();
        let mut session = GenerationSession::new(&model);
        let nameless = session.push_derived(Type::Composite(Composite::new("", "")));

        let err = map_type(&backend(), &mut session, nameless, Usage::Model).unwrap_err();
        assert!(matches!(err, GenerationError::UnmappableType { .. }));
        assert!(err.to_string().ends_with("named type has no name"));
    }

    #[test]
    fn test_container_of_itself_is_unmappable() {
        let model = ModelBuilder::new("4.0").build();
        let mut session = GenerationSession::new(&model);
        let next = TypeId(model.type_count());
        let looped = session.push_derived(Type::Array(next));
        assert_eq!(looped, next);

        let err = map_type(&backend(), &mut session, looped, Usage::Method).unwrap_err();
        assert!(err.to_string().ends_with("container holds itself"));
    }

    #[test]
    fn test_dangling_handle_is_unmappable() {
        let model = ModelBuilder::new("4.0").build();
        let mut session = GenerationSession::new(&model);
        let err = map_type(&backend(), &mut session, TypeId(9_999), Usage::Method).unwrap_err();
        assert!(matches!(err, GenerationError::UnmappableType { .. }));
    }
}
