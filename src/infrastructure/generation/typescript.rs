//! TypeScript backend: interface models and positional async methods

use crate::generation::mapper::{MappedType, Usage, ValueCoercion};
use crate::generation::utils::{
    enum_member_name, has_path_params, interpolate_path, reserve_with_suffix,
};
use crate::generation::{
    Backend, BackendExt, CallKind, Capabilities, DocPlacement, GenerationError, GenerationSession,
    GeneratorOptions, Language, PropertyOrder, Result, Syntax,
};
use crate::ir::{EnumValue, Intrinsic, Location, Method, Parameter, Property, Type, TypeId};

const TYPESCRIPT_KEYWORDS: &[&str] = &[
    "as", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

static TYPESCRIPT_SYNTAX: Syntax = Syntax {
    file_extension: ".ts",
    code_path: "typescript/",
    package_path: "client",
    itself: "this",
    indent_str: "  ",
    comment_str: "// ",
    null_str: "null",
    end_type_str: "}",
    arg_delimiter: ", ",
    param_delimiter: ",\n",
    prop_delimiter: "\n",
    enum_delimiter: ",\n",
    code_quote: "'",
};

/// Generates a TypeScript SDK
pub struct TypeScriptBackend {
    options: GeneratorOptions,
}

impl TypeScriptBackend {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// Endpoint as a string or template literal
    fn http_path(&self, method: &Method) -> String {
        if !has_path_params(&method.endpoint) {
            return self.quote(&method.endpoint);
        }
        let path = interpolate_path(&method.endpoint, |name| {
            format!("${{{}}}", self.path_accessor(method, name))
        });
        format!("`{path}`")
    }

    /// Declared names the methods file refers to
    fn imported_types(session: &GenerationSession<'_>) -> Vec<String> {
        let mut names: Vec<String> = session
            .counted()
            .filter_map(|(id, _)| match session.get(id) {
                Some(Type::Composite(c)) => Some(format!("I{}", c.name)),
                Some(Type::Enum(e)) => Some(e.name.clone()),
                _ => None,
            })
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn class_prologue(&self, session: &GenerationSession<'_>, class_name: &str) -> String {
        let mut imported = vec!["IDictionary".to_string()];
        imported.extend(Self::imported_types(session));
        format!(
            "import type {{ Readable }} from 'readable-stream'
import {{ APIMethods, encodeParam }} from '../../rtl/apiMethods'
import type {{ DelimArray }} from '../../rtl/delimArray'
import type {{ ITransportSettings }} from '../../rtl/transport'
import type {{ {} }} from './models'

export class {class_name} extends APIMethods {{
  static readonly ApiVersion = '{}'
",
            imported.join(", "),
            self.options.api_version
        )
    }

    fn error_union(&self, session: &mut GenerationSession<'_>, method: &Method) -> Result<String> {
        let errors = self.error_types(session, method)?;
        Ok(if errors.is_empty() {
            "unknown".to_string()
        } else {
            errors.join(" | ")
        })
    }
}

impl Backend for TypeScriptBackend {
    fn language(&self) -> Language {
        Language::TypeScript
    }

    fn syntax(&self) -> &Syntax {
        &TYPESCRIPT_SYNTAX
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            named_arguments: false,
            needs_request_types: true,
            streams: true,
            multi_api: true,
            property_order: PropertyOrder::Declared,
            explicit_constructor: false,
            doc_placement: DocPlacement::BeforeSignature,
        }
    }

    fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    fn reserve(&self, name: &str) -> String {
        reserve_with_suffix(name, TYPESCRIPT_KEYWORDS, "_")
    }

    fn intrinsic_type(&self, intrinsic: Intrinsic) -> MappedType {
        let mapped = match intrinsic {
            Intrinsic::Integer | Intrinsic::Int64 | Intrinsic::Float | Intrinsic::Double => {
                MappedType::new("number", "")
            }
            Intrinsic::String | Intrinsic::Email | Intrinsic::Uuid => MappedType::new("string", ""),
            Intrinsic::Password => MappedType::new("Password", ""),
            Intrinsic::Byte => MappedType::new("binary", ""),
            Intrinsic::Boolean => MappedType::new("boolean", ""),
            Intrinsic::Uri => MappedType::new("Url", ""),
            Intrinsic::Date | Intrinsic::DateTime => MappedType::new("Date", ""),
            Intrinsic::Object | Intrinsic::Any => MappedType::new("any", "").not_coercible(),
            Intrinsic::Void => MappedType::new("void", "").not_coercible(),
        };
        if intrinsic.is_textual() {
            mapped.quoted()
        } else {
            mapped
        }
    }

    fn array_type(&self, element: &MappedType) -> MappedType {
        MappedType::new(format!("{}[]", element.name), "[]")
    }

    fn hash_type(&self, element: &MappedType) -> MappedType {
        MappedType::new(format!("IDictionary<{}>", element.name), "{}")
    }

    fn delim_array_type(&self, element: &MappedType) -> MappedType {
        let name = format!("DelimArray<{}>", element.name);
        MappedType::new(name.clone(), "").coerced(ValueCoercion::Wrapped {
            open: format!("new {name}("),
            close: ")".to_string(),
        })
    }

    fn enum_type(&self, name: &str, _usage: Usage) -> MappedType {
        MappedType::new(name, "").coerced(ValueCoercion::EnumMember(name.to_string()))
    }

    fn composite_type(&self, name: &str, _usage: Usage) -> MappedType {
        MappedType::new(format!("I{name}"), "")
    }

    fn either_type(&self, mapped: &MappedType) -> String {
        format!("{} | Buffer", mapped.name)
    }

    fn methods_prologue(&self, session: &GenerationSession<'_>, _indent: &str) -> String {
        self.class_prologue(session, &self.options.package_name(true))
    }

    fn methods_epilogue(&self, _indent: &str) -> String {
        "}".to_string()
    }

    fn streams_prologue(&self, session: &GenerationSession<'_>, _indent: &str) -> String {
        self.class_prologue(session, &format!("{}Stream", self.options.package_name(true)))
    }

    fn streams_epilogue(&self, _indent: &str) -> String {
        "}".to_string()
    }

    fn models_prologue(&self, _session: &GenerationSession<'_>, _indent: &str) -> String {
        "import type { DelimArray } from '../../rtl/delimArray'

export type Url = string
export type Password = string
export type binary = Buffer

export interface IDictionary<T> {
  [key: string]: T
}
"
        .to_string()
    }

    fn models_epilogue(&self, _session: &GenerationSession<'_>, _indent: &str) -> String {
        String::new()
    }

    fn declare_parameter(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        _method: &Method,
        param: &Parameter,
    ) -> Result<String> {
        let mapped = self.param_type(session, param)?;
        let name = self.reserve(&param.name);
        let ty = if param.location == Location::Body {
            format!("Partial<{}>", mapped.name)
        } else {
            mapped.name.clone()
        };
        if param.required {
            return Ok(format!("{indent}{name}: {ty}"));
        }
        Ok(match self.default_value(session, param, &mapped)? {
            Some(default) => format!("{indent}{name}: {ty} = {default}"),
            None => format!("{indent}{name}?: {ty}"),
        })
    }

    fn method_signature(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        method: &Method,
        kind: CallKind,
    ) -> Result<String> {
        let bump = self.bump(indent);
        let mut params = Vec::new();
        if kind == CallKind::Streamed {
            let result = self.return_type(session, method)?;
            params.push(format!("{bump}callback: (readable: Readable) => Promise<{result}>"));
        }
        if self.use_request(method) {
            let request = self.request_type_name(session, method)?;
            params.push(format!("{bump}request: {request}"));
        } else {
            for param in method.all_params() {
                params.push(self.declare_parameter(session, &bump, method, param)?);
            }
        }
        params.push(format!("{bump}options?: Partial<ITransportSettings>"));
        Ok(format!(
            "{indent}async {}(\n{}\n{indent}) {{\n",
            self.reserve(&method.name),
            params.join(self.syntax().param_delimiter)
        ))
    }

    /// Request interfaces keep the wire key, quoted when it is not an identifier
    fn param_accessor(&self, param: &Parameter, via_request: bool) -> String {
        match (via_request, param.has_special_needs()) {
            (true, true) => format!("request[{}]", self.quote(param.wire_name())),
            (true, false) => format!("request.{}", param.name),
            (false, _) => self.reserve(&param.name),
        }
    }

    fn encode_path_param(&self, indent: &str, _name: &str, accessor: &str) -> String {
        format!("{indent}{accessor} = encodeParam({accessor})\n")
    }

    fn arg_group(&self, _indent: &str, params: &[&Parameter], via_request: bool) -> Option<String> {
        if params.is_empty() {
            return None;
        }
        let entries: Vec<String> = params
            .iter()
            .map(|p| {
                let accessor = self.param_accessor(p, via_request);
                if p.has_special_needs() {
                    format!("{}: {accessor}", self.quote(p.wire_name()))
                } else if accessor == p.name {
                    accessor
                } else {
                    format!("{}: {accessor}", p.name)
                }
            })
            .collect();
        Some(format!("{{{}}}", entries.join(", ")))
    }

    fn http_call(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        method: &Method,
    ) -> Result<String> {
        let result = self.return_type(session, method)?;
        let errors = self.error_union(session, method)?;
        let mut args = vec![self.http_path(method), "options".to_string()];
        args.extend(self.http_args(indent, method));
        Ok(format!(
            "{indent}return {}.{}<{result}, {errors}>({})",
            self.syntax().itself,
            method.http_method.verb(),
            args.join(self.syntax().arg_delimiter)
        ))
    }

    fn stream_call(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        method: &Method,
    ) -> Result<String> {
        let result = self.return_type(session, method)?;
        let mut args = vec![
            "callback".to_string(),
            self.quote(method.http_method.as_str()),
            self.http_path(method),
            "options".to_string(),
        ];
        args.extend(self.http_args(indent, method));
        Ok(format!(
            "{indent}return {}.authStream<{result}>({})",
            self.syntax().itself,
            args.join(self.syntax().arg_delimiter)
        ))
    }

    fn method_close(&self, indent: &str) -> String {
        format!("\n{indent}}}")
    }

    fn type_signature(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        id: TypeId,
    ) -> Result<String> {
        match session.ty(id)? {
            Type::Enum(e) => Ok(format!(
                "{}{indent}export enum {} {{\n",
                self.comment_header(indent, &e.description),
                e.name
            )),
            Type::Composite(c) => Ok(format!(
                "{}{indent}export interface I{} {{\n",
                self.comment_header(indent, &c.description),
                c.name
            )),
            other => Err(GenerationError::unmappable(
                id,
                format!("{} has no declaration", other.kind()),
            )),
        }
    }

    fn declare_property(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        property: &Property,
    ) -> Result<String> {
        let mapped = self.map_type(session, property.ty, Usage::Model)?;
        let key = if property.has_special_needs() {
            self.quote(property.wire_name())
        } else {
            property.name.clone()
        };
        let optional = if property.required { "" } else { "?" };
        let ty = if property.nullable {
            format!("{} | null", mapped.name)
        } else {
            mapped.name
        };
        Ok(format!(
            "{}{indent}{key}{optional}: {ty}",
            self.comment_header(indent, &self.describe_property(property))
        ))
    }

    fn declare_enum_value(&self, indent: &str, value: &EnumValue) -> String {
        let member = enum_member_name(value);
        match value {
            EnumValue::Str(s) => format!("{indent}{member} = {}", self.quote(s)),
            EnumValue::Int(n) => format!("{indent}{member} = {n}"),
        }
    }

    fn property_key(&self, property: &Property) -> String {
        if property.has_special_needs() {
            self.quote(property.wire_name())
        } else {
            property.name.clone()
        }
    }

    fn arg_set(&self, name: &str, value: &str) -> String {
        format!("{name}: {value}")
    }

    fn type_open(&self, _type_name: &str) -> String {
        "{".to_string()
    }

    fn type_close(&self) -> String {
        "}".to_string()
    }

    fn enum_member(&self, type_name: &str, value: &EnumValue) -> String {
        format!("{type_name}.{}", enum_member_name(value))
    }
}
