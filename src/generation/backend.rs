//! Backend capability contract and the shared generation algorithm
//!
//! [`Backend`] is what a target language supplies: syntax constants,
//! capability flags, a complete type table and the small declaration pieces
//! that differ between languages. [`BackendExt`] is implemented once for
//! every backend and builds method, streamer and type declarations out of
//! those pieces.

use serde_json::{Map, Value};

use crate::generation::args::{CALL_SLOTS, CallSlots};
use crate::generation::mapper::{self, MappedType, Usage};
use crate::generation::utils::comment_block;
use crate::generation::{
    GenerationError, GenerationSession, GeneratorOptions, Language, Result, calls,
};
use crate::ir::{
    Composite, EnumValue, Intrinsic, Location, Method, Parameter, Property, Type, TypeId,
    safe_name,
};

/// Syntax constants of a target language
#[derive(Debug, Clone)]
pub struct Syntax {
    /// Extension with its leading dot, e.g. `.py`
    pub file_extension: &'static str,
    /// Root directory of the language's SDK, e.g. `python/`
    pub code_path: &'static str,
    pub package_path: &'static str,
    /// Receiver of generated methods, e.g. `self`
    pub itself: &'static str,
    pub indent_str: &'static str,
    pub comment_str: &'static str,
    pub null_str: &'static str,
    /// Closes a type declaration; empty when indentation closes it
    pub end_type_str: &'static str,
    pub arg_delimiter: &'static str,
    pub param_delimiter: &'static str,
    pub prop_delimiter: &'static str,
    pub enum_delimiter: &'static str,
    pub code_quote: &'static str,
}

/// Order of property declarations in a composite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyOrder {
    Declared,
    RequiredFirst,
}

/// Where a method's documentation goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocPlacement {
    BeforeSignature,
    InsideBody,
}

/// Storage semantics of a declared composite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semantics {
    Value,
    Reference,
}

/// Shape of a method declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Returns the materialized response
    Materialized,
    /// Hands a readable byte stream to a caller-supplied consumer
    Streamed,
}

/// Capability flags a backend declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Calls may pass arguments by name
    pub named_arguments: bool,
    /// Methods with several optional parameters take one request composite
    pub needs_request_types: bool,
    pub streams: bool,
    /// Output is namespaced by API version
    pub multi_api: bool,
    pub property_order: PropertyOrder,
    /// Composites need a generated constructor
    pub explicit_constructor: bool,
    pub doc_placement: DocPlacement,
}

/// Operations every target language supplies
pub trait Backend: Send + Sync {
    fn language(&self) -> Language;

    fn syntax(&self) -> &Syntax;

    fn capabilities(&self) -> Capabilities;

    fn options(&self) -> &GeneratorOptions;

    /// Escapes an identifier that collides with a reserved word
    fn reserve(&self, name: &str) -> String;

    fn quote(&self, text: &str) -> String {
        let q = self.syntax().code_quote;
        let escaped = text.replace('\\', "\\\\").replace(q, &format!("\\{q}"));
        format!("{q}{escaped}{q}")
    }

    /// Version directory for multi-version output
    fn version_segment(&self) -> String {
        self.options().api_version.clone()
    }

    // Type table and container rules

    fn intrinsic_type(&self, intrinsic: Intrinsic) -> MappedType;

    fn array_type(&self, element: &MappedType) -> MappedType;

    fn hash_type(&self, element: &MappedType) -> MappedType;

    fn delim_array_type(&self, element: &MappedType) -> MappedType;

    fn enum_type(&self, name: &str, usage: Usage) -> MappedType;

    fn composite_type(&self, name: &str, usage: Usage) -> MappedType;

    /// Return type of a method that answers with data or raw bytes
    fn either_type(&self, mapped: &MappedType) -> String {
        mapped.name.clone()
    }

    // File structure

    fn methods_prologue(&self, session: &GenerationSession<'_>, indent: &str) -> String;

    fn methods_epilogue(&self, indent: &str) -> String;

    fn streams_prologue(&self, _session: &GenerationSession<'_>, _indent: &str) -> String {
        String::new()
    }

    fn streams_epilogue(&self, _indent: &str) -> String {
        String::new()
    }

    fn models_prologue(&self, session: &GenerationSession<'_>, indent: &str) -> String;

    fn models_epilogue(&self, session: &GenerationSession<'_>, indent: &str) -> String;

    // Comments

    fn comment_header(&self, indent: &str, text: &str) -> String {
        let block = comment_block(text, indent, self.syntax().comment_str);
        if block.is_empty() {
            block
        } else {
            format!("{block}\n")
        }
    }

    /// Documentation placed inside a declaration body
    fn doc_string(&self, indent: &str, text: &str) -> String {
        self.comment_header(indent, text)
    }

    fn param_comment(&self, param: &Parameter) -> String {
        format!("@param {} {}", param.name, param.description.trim())
    }

    // Method declarations

    fn declare_parameter(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        method: &Method,
        param: &Parameter,
    ) -> Result<String>;

    fn method_signature(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        method: &Method,
        kind: CallKind,
    ) -> Result<String>;

    /// Statement replacing a path value with its encoded form
    fn encode_path_param(&self, indent: &str, name: &str, accessor: &str) -> String;

    /// Expression reading a parameter inside the method body
    fn param_accessor(&self, param: &Parameter, via_request: bool) -> String {
        if via_request {
            format!("request.{}", self.reserve(&param.name))
        } else {
            self.reserve(&param.name)
        }
    }

    /// Grouped query, header or cookie arguments; `None` when empty
    fn arg_group(&self, indent: &str, params: &[&Parameter], via_request: bool) -> Option<String>;

    fn http_call(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        method: &Method,
    ) -> Result<String>;

    fn stream_call(
        &self,
        _session: &mut GenerationSession<'_>,
        _indent: &str,
        _method: &Method,
    ) -> Result<String> {
        Ok(String::new())
    }

    fn method_close(&self, _indent: &str) -> String {
        String::new()
    }

    // Type declarations

    fn type_signature(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        id: TypeId,
    ) -> Result<String>;

    fn declare_property(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        property: &Property,
    ) -> Result<String>;

    fn declare_enum_value(&self, indent: &str, value: &EnumValue) -> String;

    fn construct(
        &self,
        _session: &mut GenerationSession<'_>,
        _indent: &str,
        _id: TypeId,
    ) -> Result<String> {
        Ok(String::new())
    }

    fn type_epilogue(&self, _indent: &str, _ty: &Type) -> String {
        String::new()
    }

    fn semantics(&self, _session: &GenerationSession<'_>, _id: TypeId) -> Semantics {
        Semantics::Reference
    }

    // Example call literals

    /// Key of a property inside a composite literal
    fn property_key(&self, property: &Property) -> String {
        self.reserve(&property.name)
    }

    fn arg_set(&self, name: &str, value: &str) -> String {
        format!("{name}={value}")
    }

    fn type_open(&self, type_name: &str) -> String;

    fn type_close(&self) -> String;

    fn enum_member(&self, type_name: &str, value: &EnumValue) -> String;

    fn bool_literal(&self, value: bool) -> String {
        value.to_string()
    }

    fn array_literal(&self, items: &[String]) -> String {
        format!("[{}]", items.join(", "))
    }

    fn hash_literal(&self, entries: &[(String, String)]) -> String {
        let entries: Vec<String> = entries
            .iter()
            .map(|(k, v)| format!("{}: {v}", self.quote(k)))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }

    fn call_expression(&self, method_name: &str, args: &[String]) -> String {
        format!("sdk.{method_name}({})", args.join(self.syntax().arg_delimiter))
    }
}

/// Fails when a recursive composite would be declared as a value type
pub fn check_semantics(
    session: &GenerationSession<'_>,
    id: TypeId,
    semantics: Semantics,
) -> Result<()> {
    if semantics == Semantics::Value && session.is_recursive(id) {
        return Err(GenerationError::RecursiveValueType(session.type_name(id)));
    }
    Ok(())
}

fn push_section(text: &mut String, section: &str) {
    if section.is_empty() {
        return;
    }
    if !text.is_empty() {
        text.push_str("\n\n");
    }
    text.push_str(section);
}

/// Shared algorithm layer, written once against [`Backend`]
pub trait BackendExt: Backend {
    fn map_type(
        &self,
        session: &mut GenerationSession<'_>,
        id: TypeId,
        usage: Usage,
    ) -> Result<MappedType> {
        mapper::map_type(self, session, id, usage)
    }

    /// One indentation level deeper than `indent`
    fn bump(&self, indent: &str) -> String {
        format!("{indent}{}", self.syntax().indent_str)
    }

    fn comment(&self, indent: &str, text: &str) -> String {
        comment_block(text, indent, self.syntax().comment_str)
    }

    /// The method takes one request composite instead of its parameters
    fn use_request(&self, method: &Method) -> bool {
        self.capabilities().needs_request_types && method.may_use_request_type()
    }

    fn request_type_name(
        &self,
        session: &mut GenerationSession<'_>,
        method: &Method,
    ) -> Result<String> {
        let id = session.request_type_of(method)?;
        Ok(self.map_type(session, id, Usage::Method)?.name)
    }

    /// Maps the writeable variant of `id` when one exists
    fn writeable_type(
        &self,
        session: &mut GenerationSession<'_>,
        id: TypeId,
        usage: Usage,
    ) -> Result<MappedType> {
        let target = session.writeable_of(id)?.unwrap_or(id);
        self.map_type(session, target, usage)
    }

    fn param_type(
        &self,
        session: &mut GenerationSession<'_>,
        param: &Parameter,
    ) -> Result<MappedType> {
        if param.location == Location::Body {
            self.writeable_type(session, param.ty, Usage::Method)
        } else {
            self.map_type(session, param.ty, Usage::Method)
        }
    }

    /// Initializer of an optional parameter: its declared default when it
    /// has one, else the mapped type's default. `None` leaves the slot bare.
    fn default_value(
        &self,
        session: &mut GenerationSession<'_>,
        param: &Parameter,
        mapped: &MappedType,
    ) -> Result<Option<String>> {
        let rendered = match &param.default {
            Some(value) => calls::arg_value(self, session, param.ty, value)?,
            None => mapped.default.clone(),
        };
        Ok(if rendered.is_empty() { None } else { Some(rendered) })
    }

    fn return_type(&self, session: &mut GenerationSession<'_>, method: &Method) -> Result<String> {
        let response = method.primary_response().ok_or_else(|| {
            GenerationError::unmappable(&method.name, "method has no success response")
        })?;
        let mapped = self.map_type(session, response.ty, Usage::Method)?;
        Ok(if method.returns_either() {
            self.either_type(&mapped)
        } else {
            mapped.name
        })
    }

    /// Mapped names of the method's failure payloads
    fn error_types(
        &self,
        session: &mut GenerationSession<'_>,
        method: &Method,
    ) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();
        for response in method.error_responses() {
            let name = self.map_type(session, response.ty, Usage::Method)?.name;
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Documentation text of a method
    fn method_header(&self, session: &mut GenerationSession<'_>, method: &Method) -> Result<String> {
        let mut text = if method.description.trim().is_empty() {
            method.summary.trim().to_string()
        } else {
            method.description.trim().to_string()
        };
        let result = self.return_type(session, method)?;
        push_section(
            &mut text,
            &format!("{} {} -> {result}", method.http_method, method.endpoint),
        );
        if method.deprecated {
            push_section(&mut text, "DEPRECATED");
        }
        if method.returns_either() {
            push_section(&mut text, "**Note**: Binary content may be returned by this method.");
        } else if method.returns_binary() && !method.returns_string() {
            push_section(&mut text, "**Note**: Binary content is returned by this method.");
        }
        let params: Vec<String> = method
            .all_params()
            .into_iter()
            .filter(|p| !p.description.trim().is_empty())
            .map(|p| self.param_comment(p))
            .collect();
        push_section(&mut text, &params.join("\n"));
        Ok(text)
    }

    fn describe_property(&self, property: &Property) -> String {
        let mut text = property.description.trim().to_string();
        if property.read_only {
            text.push_str(" (read-only)");
        }
        if property.deprecated {
            push_section(&mut text, "Deprecated: this property will be removed.");
        }
        text.trim().to_string()
    }

    fn type_properties<'c>(&self, composite: &'c Composite) -> Vec<&'c Property> {
        match self.capabilities().property_order {
            PropertyOrder::Declared => composite.properties.values().collect(),
            PropertyOrder::RequiredFirst => composite
                .required_properties()
                .chain(composite.optional_properties())
                .collect(),
        }
    }

    /// Argument groups of the method's transport call
    fn call_slots(&self, indent: &str, method: &Method) -> CallSlots {
        let via_request = self.use_request(method);
        let mut slots = CallSlots::default();
        for location in CALL_SLOTS {
            let arg = match location {
                Location::Body => method
                    .body_param()
                    .map(|p| self.param_accessor(p, via_request)),
                other => self.arg_group(indent, &method.params_in(other), via_request),
            };
            slots.set(location, arg);
        }
        slots
    }

    /// Positional arguments after the path, with trailing elision
    fn http_args(&self, indent: &str, method: &Method) -> Vec<String> {
        self.call_slots(indent, method)
            .positional(self.syntax().null_str)
    }

    /// Expression for an endpoint placeholder
    fn path_accessor(&self, method: &Method, placeholder: &str) -> String {
        match method.path_param(placeholder) {
            Some(p) => self.param_accessor(p, self.use_request(method)),
            None => self.reserve(&safe_name(placeholder)),
        }
    }

    /// Encoding statements for path parameters, in declaration order
    fn encode_path_params(&self, indent: &str, method: &Method) -> String {
        let via_request = self.use_request(method);
        method
            .params_in(Location::Path)
            .into_iter()
            .filter(|p| p.needs_encoding())
            .map(|p| self.encode_path_param(indent, &p.name, &self.param_accessor(p, via_request)))
            .collect()
    }

    fn declare_method(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        method: &Method,
    ) -> Result<String> {
        declare_call(self, session, indent, method, CallKind::Materialized)
    }

    /// Streaming variant; empty for backends that do not stream
    fn declare_streamer(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        method: &Method,
    ) -> Result<String> {
        if !self.capabilities().streams {
            return Ok(String::new());
        }
        declare_call(self, session, indent, method, CallKind::Streamed)
    }

    fn declare_type(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        id: TypeId,
    ) -> Result<String> {
        let node = session.ty(id)?.clone();
        let bump = self.bump(indent);
        let syntax = self.syntax();

        let body = match &node {
            Type::Enum(e) => e
                .values
                .iter()
                .map(|v| self.declare_enum_value(&bump, v))
                .collect::<Vec<_>>()
                .join(syntax.enum_delimiter),
            Type::Composite(c) => {
                check_semantics(session, id, self.semantics(session, id))?;
                let mut props = Vec::with_capacity(c.properties.len());
                for prop in self.type_properties(c) {
                    props.push(self.declare_property(session, &bump, prop)?);
                }
                props.join(syntax.prop_delimiter)
            }
            other => {
                tracing::debug!("{} {id} is not a declarable type", other.kind());
                return Ok(String::new());
            }
        };

        let signature = self.type_signature(session, indent, id)?;
        let construct = if matches!(node, Type::Composite(_))
            && self.capabilities().explicit_constructor
        {
            self.construct(session, &bump, id)?
        } else {
            String::new()
        };
        let end = if syntax.end_type_str.is_empty() {
            String::new()
        } else {
            format!("\n{indent}{}", syntax.end_type_str)
        };
        session.mark_declared(id);
        Ok(format!(
            "{signature}{body}{construct}{end}{}",
            self.type_epilogue(indent, &node)
        ))
    }

    fn warn_editing(&self) -> String {
        let options = self.options();
        format!(
            "NOTE: Do not edit this file generated by sdkgen for {} {}, API {}",
            options.package_name(self.capabilities().multi_api),
            options.sdk_version,
            options.api_version
        )
    }

    /// Path of a generated file below the language's SDK root
    fn file_name(&self, base: &str) -> String {
        let syntax = self.syntax();
        format!(
            "{}{}/{base}{}",
            syntax.code_path, syntax.package_path, syntax.file_extension
        )
    }

    /// Path of an SDK unit, versioned for multi-version backends
    fn sdk_file_name(&self, base: &str) -> String {
        if self.capabilities().multi_api {
            self.file_name(&format!("sdk/{}/{base}", self.version_segment()))
        } else {
            self.file_name(&format!("sdk/{base}"))
        }
    }

    /// Example call of `method` with literal argument values
    fn make_the_call(
        &self,
        session: &mut GenerationSession<'_>,
        method: &Method,
        inputs: &Map<String, Value>,
    ) -> Result<String> {
        calls::make_the_call(self, session, method, inputs)
    }
}

impl<B: Backend + ?Sized> BackendExt for B {}

fn declare_call<B: Backend + ?Sized>(
    backend: &B,
    session: &mut GenerationSession<'_>,
    indent: &str,
    method: &Method,
    kind: CallKind,
) -> Result<String> {
    if method.primary_response().is_none() {
        tracing::warn!("Method {} has no success response, emitting nothing", method.name);
        return Ok(String::new());
    }
    let bump = backend.bump(indent);
    let header = backend.method_header(session, method)?;
    let signature = backend.method_signature(session, indent, method, kind)?;
    let encoding = backend.encode_path_params(&bump, method);
    let call = match kind {
        CallKind::Materialized => backend.http_call(session, &bump, method)?,
        CallKind::Streamed => backend.stream_call(session, &bump, method)?,
    };
    let close = backend.method_close(indent);

    Ok(match backend.capabilities().doc_placement {
        DocPlacement::BeforeSignature => format!(
            "{}{signature}{encoding}{call}{close}",
            backend.comment_header(indent, &header)
        ),
        DocPlacement::InsideBody => format!(
            "{signature}{}{encoding}{call}{close}",
            backend.doc_string(&bump, &header)
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Intrinsic, ModelBuilder, Property};

    #[test]
    fn test_check_semantics_rejects_recursive_value_types() {
        let mut builder = ModelBuilder::new("4.0");
        let node = builder.composite("Node", "").unwrap();
        let flat = builder.composite("Flat", "").unwrap();
        let string = builder.intrinsic(Intrinsic::String);
        builder.property(node, Property::new("next", node)).unwrap();
        builder.property(flat, Property::new("name", string)).unwrap();
        let model = builder.build();
        let session = GenerationSession::new(&model);

        assert!(matches!(
            check_semantics(&session, node, Semantics::Value),
            Err(GenerationError::RecursiveValueType(name)) if name == "Node"
        ));
        assert!(check_semantics(&session, node, Semantics::Reference).is_ok());
        assert!(check_semantics(&session, flat, Semantics::Value).is_ok());
    }

    #[test]
    fn test_push_section() {
        let mut text = String::new();
        push_section(&mut text, "GET /x -> int");
        push_section(&mut text, "");
        push_section(&mut text, "DEPRECATED");
        assert_eq!(text, "GET /x -> int\n\nDEPRECATED");
    }
}
