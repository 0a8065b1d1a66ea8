//! Synthesized types: writeable variants and request bundles
//!
//! Both are memoized in the session, so repeated requests hand back the same
//! handle and ref-counting sees one type.

use indexmap::IndexMap;

use crate::generation::utils::to_proper_case;
use crate::generation::{GenerationSession, Result};
use crate::ir::{Composite, Location, Method, Origin, Property, Type, TypeId};

pub const WRITE_PREFIX: &str = "Write";
pub const REQUEST_PREFIX: &str = "Request";

impl GenerationSession<'_> {
    /// Writeable variant of a composite, without its read-only properties.
    ///
    /// `None` when the type is not a composite, has no read-only properties,
    /// or has nothing left once they are removed.
    pub fn writeable_of(&mut self, id: TypeId) -> Result<Option<TypeId>> {
        let created = self.state.derived.len();
        let result = self.derive_writeable(id)?;
        if self.state.derived.len() != created {
            self.refresh_derived_recursion();
        }
        Ok(result)
    }

    fn derive_writeable(&mut self, id: TypeId) -> Result<Option<TypeId>> {
        if let Some(memo) = self.state.writeable.get(&id) {
            return Ok(*memo);
        }
        let source = match self.ty(id)? {
            Type::Composite(c) => c.clone(),
            _ => {
                self.state.writeable.insert(id, None);
                return Ok(None);
            }
        };

        let (writes, removed): (Vec<&Property>, Vec<&Property>) = source
            .properties
            .values()
            .partition(|p| !p.read_only && !self.is_read_only(p.ty));
        if removed.is_empty() || writes.is_empty() {
            self.state.writeable.insert(id, None);
            return Ok(None);
        }

        // reserve the handle first so cycles through this type resolve to it
        let name = self.unique_name(&format!("{WRITE_PREFIX}{}", source.name));
        let reserved = self.push_derived(Type::Composite(Composite {
            name: name.clone(),
            description: String::new(),
            properties: IndexMap::new(),
            origin: Origin::Writeable { source: id },
        }));
        self.state.writeable.insert(id, Some(reserved));

        let mut properties = IndexMap::with_capacity(writes.len());
        for prop in writes {
            let mut write = prop.clone();
            if let Some(nested) = self.derive_writeable(prop.ty)? {
                write.ty = nested;
            }
            properties.insert(write.name.clone(), write);
        }
        let description = format!(
            "Dynamically generated writeable type for {} removes properties:\n{}",
            source.name,
            removed
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        tracing::debug!("Synthesized {name} from {}", source.name);
        self.replace_derived(
            reserved,
            Type::Composite(Composite {
                name,
                description,
                properties,
                origin: Origin::Writeable { source: id },
            }),
        );
        Ok(Some(reserved))
    }

    /// Composite bundling every parameter of `method`, required flags kept.
    /// A body parameter uses the writeable variant of its type.
    pub fn request_type_of(&mut self, method: &Method) -> Result<TypeId> {
        if let Some(id) = self.state.requests.get(&method.name) {
            return Ok(*id);
        }

        let mut properties = IndexMap::new();
        for param in method.all_params() {
            let mut ty = param.ty;
            if param.location == Location::Body {
                if let Some(write) = self.derive_writeable(param.ty)? {
                    ty = write;
                }
            }
            let mut prop = Property::new(param.wire_name(), ty).describe(&param.description);
            prop.required = param.required;
            properties.entry(prop.name.clone()).or_insert(prop);
        }

        let name = self.unique_name(&format!(
            "{REQUEST_PREFIX}{}",
            to_proper_case(&method.name)
        ));
        tracing::debug!("Synthesized {name} for method {}", method.name);
        let id = self.push_derived(Type::Composite(Composite {
            name,
            description: format!("Dynamically generated request type for {}", method.name),
            properties,
            origin: Origin::Request {
                method: method.name.clone(),
            },
        }));
        self.state.requests.insert(method.name.clone(), id);
        self.refresh_derived_recursion();
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::generation::GenerationSession;
    use crate::ir::{
        ApiModel, HttpMethod, Intrinsic, Location, Method, MethodResponse, ModelBuilder,
        Parameter, Property, Type,
    };

    fn model() -> ApiModel {
        let mut builder = ModelBuilder::new("4.0");
        let string = builder.intrinsic(Intrinsic::String);
        let int = builder.intrinsic(Intrinsic::Integer);

        let query = builder.composite("Query", "").unwrap();
        builder.property(query, Property::new("id", int).read_only()).unwrap();
        builder.property(query, Property::new("model", string).required()).unwrap();
        builder.property(query, Property::new("view", string).required()).unwrap();

        let plain = builder.composite("Plain", "").unwrap();
        builder.property(plain, Property::new("name", string)).unwrap();

        let folder = builder.composite("Folder", "").unwrap();
        let children = builder.array(folder);
        builder.property(folder, Property::new("id", int).read_only()).unwrap();
        builder.property(folder, Property::new("parent", folder)).unwrap();
        builder.property(folder, Property::new("children", children)).unwrap();

        let look = builder.composite("Look", "").unwrap();
        builder.property(look, Property::new("id", int).read_only()).unwrap();
        builder.property(look, Property::new("query", query)).unwrap();

        builder
            .method(
                Method::new("create_query", HttpMethod::Post, "/queries")
                    .param(Parameter::new("body", Location::Body, query).required())
                    .param(Parameter::new("fields", Location::Query, string))
                    .param(Parameter::new("x_trace", Location::Header, string))
                    .response(MethodResponse::new(200, "application/json", query)),
            )
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_writeable_is_memoized() {
        let model = model();
        let query = model.lookup("Query").unwrap();
        let mut session = GenerationSession::new(&model);

        let first = session.writeable_of(query).unwrap().unwrap();
        let second = session.writeable_of(query).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(session.derived_types().count(), 1);

        let write = session.composite(first).unwrap();
        assert_eq!(write.name, "WriteQuery");
        let names: Vec<_> = write.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["model", "view"]);
        assert!(write.description.ends_with("removes properties:\nid"));
    }

    #[test]
    fn test_no_writeable_without_read_only_properties() {
        let model = model();
        let plain = model.lookup("Plain").unwrap();
        let mut session = GenerationSession::new(&model);
        assert_eq!(session.writeable_of(plain).unwrap(), None);
        assert_eq!(
            session.writeable_of(model.intrinsic(Intrinsic::String)).unwrap(),
            None
        );
        assert_eq!(session.derived_types().count(), 0);
    }

    #[test]
    fn test_nested_writeable_types() {
        let model = model();
        let look = model.lookup("Look").unwrap();
        let mut session = GenerationSession::new(&model);

        let write_look = session.writeable_of(look).unwrap().unwrap();
        let write_query = session.writeable_of(model.lookup("Query").unwrap()).unwrap().unwrap();
        let composite = session.composite(write_look).unwrap();
        assert_eq!(composite.properties["query"].ty, write_query);
    }

    #[test]
    fn test_recursive_writeable_resolves_to_itself() {
        let model = model();
        let folder = model.lookup("Folder").unwrap();
        let mut session = GenerationSession::new(&model);

        let write = session.writeable_of(folder).unwrap().unwrap();
        let composite = session.composite(write).unwrap();
        assert_eq!(composite.properties["parent"].ty, write);
        assert!(session.is_recursive(write));
        assert!(matches!(session.get(write), Some(Type::Composite(_))));
    }

    #[test]
    fn test_request_type_bundles_parameters() {
        let model = model();
        let method = model.method("create_query").unwrap();
        let mut session = GenerationSession::new(&model);

        let first = session.request_type_of(method).unwrap();
        let second = session.request_type_of(method).unwrap();
        assert_eq!(first, second);
        let write_query = session.writeable_of(model.lookup("Query").unwrap()).unwrap();

        let request = session.composite(first).unwrap();
        assert_eq!(request.name, "RequestCreateQuery");
        let shape: Vec<_> = request
            .properties
            .values()
            .map(|p| (p.name.as_str(), p.required))
            .collect();
        assert_eq!(
            shape,
            vec![("body", true), ("fields", false), ("x_trace", false)]
        );
        assert_eq!(Some(request.properties["body"].ty), write_query);
    }
}
