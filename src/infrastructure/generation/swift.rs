//! Swift backend: Codable models and labelled methods

use crate::generation::mapper::{MappedType, Usage, ValueCoercion};
use crate::generation::utils::{comment_block, enum_member_name, interpolate_path};
use crate::generation::{
    Backend, BackendExt, CallKind, Capabilities, DocPlacement, GenerationError, GenerationSession,
    GeneratorOptions, Language, PropertyOrder, Result, Semantics, Syntax,
};
use crate::ir::{EnumValue, Intrinsic, Method, Parameter, Property, Type, TypeId, safe_name};

const SWIFT_KEYWORDS: &[&str] = &[
    "associatedtype", "class", "deinit", "enum", "extension", "fileprivate", "func", "import",
    "init", "inout", "internal", "let", "open", "operator", "private", "protocol", "public",
    "static", "struct", "subscript", "typealias", "var", "break", "case", "continue", "default",
    "defer", "do", "else", "fallthrough", "for", "guard", "if", "in", "repeat", "return",
    "switch", "where", "while", "as", "Any", "catch", "false", "is", "nil", "rethrows", "super",
    "self", "Self", "throw", "throws", "true", "try", "associativity", "convenience", "dynamic",
    "didSet", "final", "get", "infix", "indirect", "lazy", "left", "mutating", "none",
    "nonmutating", "optional", "override", "postfix", "precedence", "prefix", "Protocol",
    "required", "right", "set", "Type", "unowned", "weak", "willSet",
];

static SWIFT_SYNTAX: Syntax = Syntax {
    file_extension: ".swift",
    code_path: "swift/",
    package_path: "client",
    itself: "self",
    indent_str: "    ",
    comment_str: "// ",
    null_str: "nil",
    end_type_str: "}",
    arg_delimiter: ", ",
    param_delimiter: ",\n",
    prop_delimiter: "\n",
    enum_delimiter: "\n",
    code_quote: "\"",
};

const RECURSIVE_NOTE: &str = "Recursive type references must use Class instead of Struct";

/// Generates a Swift SDK
pub struct SwiftBackend {
    options: GeneratorOptions,
}

impl SwiftBackend {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// Endpoint with encoded path values interpolated
    fn http_path(&self, method: &Method) -> String {
        let path = interpolate_path(&method.endpoint, |placeholder| {
            match method.path_param(placeholder) {
                Some(p) if p.needs_encoding() => format!("\\(path_{})", p.name),
                Some(p) => format!("\\({})", self.reserve(&p.name)),
                None => format!("\\({})", self.reserve(&safe_name(placeholder))),
            }
        });
        format!("\"{path}\"")
    }

    fn class_prologue(&self, class_name: &str, stream: bool) -> String {
        let lazy = if stream {
            String::new()
        } else {
            format!("\n    lazy var stream = {class_name}Stream(authSession)\n")
        };
        format!(
            "import Foundation

@available(OSX 10.15, *)
class {class_name}: APIMethods {{
{lazy}"
        )
    }

    fn result_type(
        &self,
        session: &mut GenerationSession<'_>,
        method: &Method,
        kind: CallKind,
    ) -> Result<String> {
        let result = self.return_type(session, method)?;
        Ok(match kind {
            CallKind::Materialized => result,
            CallKind::Streamed => "Data".to_string(),
        })
    }

    fn call(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        method: &Method,
        kind: CallKind,
    ) -> Result<String> {
        let result = self.result_type(session, method, kind)?;
        let mut args = vec![self.http_path(method)];
        args.extend(self.http_args(indent, method));
        args.push("options: options".to_string());
        Ok(format!(
            "{indent}let result: SDKResponse<{result}, SDKError> = {}.{}({})\n{indent}return result",
            self.syntax().itself,
            method.http_method.verb(),
            args.join(self.syntax().arg_delimiter)
        ))
    }
}

impl Backend for SwiftBackend {
    fn language(&self) -> Language {
        Language::Swift
    }

    fn syntax(&self) -> &Syntax {
        &SWIFT_SYNTAX
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            named_arguments: true,
            needs_request_types: false,
            streams: true,
            multi_api: false,
            property_order: PropertyOrder::Declared,
            explicit_constructor: true,
            doc_placement: DocPlacement::BeforeSignature,
        }
    }

    fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    fn reserve(&self, name: &str) -> String {
        if SWIFT_KEYWORDS.contains(&name) {
            format!("`{name}`")
        } else {
            name.to_string()
        }
    }

    fn intrinsic_type(&self, intrinsic: Intrinsic) -> MappedType {
        let mapped = match intrinsic {
            Intrinsic::String | Intrinsic::Email | Intrinsic::Uuid => {
                MappedType::new("String", "nil")
            }
            Intrinsic::Integer => MappedType::new("Int", "nil"),
            Intrinsic::Int64 => MappedType::new("Int64", "nil"),
            Intrinsic::Float => MappedType::new("Float", "nil"),
            Intrinsic::Double => MappedType::new("Double", "nil"),
            Intrinsic::Boolean => MappedType::new("Bool", "nil"),
            Intrinsic::Byte => MappedType::new("Data", "nil"),
            Intrinsic::Date | Intrinsic::DateTime => MappedType::new("Date", "nil"),
            Intrinsic::Uri => MappedType::new("URI", "nil"),
            Intrinsic::Password => MappedType::new("Password", "nil"),
            Intrinsic::Object | Intrinsic::Any => MappedType::new("AnyCodable", "nil"),
            Intrinsic::Void => MappedType::new("Voidable", "nil").not_coercible(),
        };
        if intrinsic.is_textual() {
            mapped.quoted()
        } else {
            mapped
        }
    }

    fn array_type(&self, element: &MappedType) -> MappedType {
        MappedType::new(format!("[{}]", element.name), "nil")
    }

    fn hash_type(&self, element: &MappedType) -> MappedType {
        MappedType::new(format!("StringDictionary<{}>", element.name), "nil")
    }

    fn delim_array_type(&self, element: &MappedType) -> MappedType {
        let name = format!("DelimArray<{}>", element.name);
        MappedType::new(name.clone(), "nil").coerced(ValueCoercion::Wrapped {
            open: format!("{name}("),
            close: ")".to_string(),
        })
    }

    fn enum_type(&self, name: &str, _usage: Usage) -> MappedType {
        MappedType::new(name, "nil").coerced(ValueCoercion::EnumMember(name.to_string()))
    }

    fn composite_type(&self, name: &str, _usage: Usage) -> MappedType {
        MappedType::new(name, "nil")
    }

    fn methods_prologue(&self, _session: &GenerationSession<'_>, _indent: &str) -> String {
        self.class_prologue(&self.options.package_name(false), false)
    }

    fn methods_epilogue(&self, _indent: &str) -> String {
        "}".to_string()
    }

    fn streams_prologue(&self, _session: &GenerationSession<'_>, _indent: &str) -> String {
        self.class_prologue(&format!("{}Stream", self.options.package_name(false)), true)
    }

    fn streams_epilogue(&self, _indent: &str) -> String {
        "}".to_string()
    }

    fn models_prologue(&self, _session: &GenerationSession<'_>, _indent: &str) -> String {
        "import Foundation\n".to_string()
    }

    fn models_epilogue(&self, _session: &GenerationSession<'_>, _indent: &str) -> String {
        String::new()
    }

    fn comment_header(&self, indent: &str, text: &str) -> String {
        let block = comment_block(text, indent, " * ");
        if block.is_empty() {
            return block;
        }
        format!("{indent}/**\n{block}\n{indent} */\n")
    }

    fn param_comment(&self, param: &Parameter) -> String {
        format!("@param {} {}", self.reserve(&param.name), param.description.trim())
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
        if param.required {
            return Ok(format!("{indent}_ {name}: {}", mapped.name));
        }
        let default = self
            .default_value(session, param, &mapped)?
            .unwrap_or_else(|| self.syntax().null_str.to_string());
        Ok(format!("{indent}{name}: {}? = {default}", mapped.name))
    }

    fn method_signature(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        method: &Method,
        kind: CallKind,
    ) -> Result<String> {
        let bump = self.bump(indent);
        let result = self.result_type(session, method, kind)?;
        let mut params = Vec::new();
        for param in method.all_params() {
            params.push(self.declare_parameter(session, &bump, method, param)?);
        }
        params.push(format!("{bump}options: ITransportSettings? = nil"));
        Ok(format!(
            "{indent}func {}(\n{}\n{indent}) -> SDKResponse<{result}, SDKError> {{\n",
            self.reserve(&method.name),
            params.join(self.syntax().param_delimiter)
        ))
    }

    fn encode_path_param(&self, indent: &str, name: &str, accessor: &str) -> String {
        format!("{indent}let path_{name} = encodeParam({accessor})\n")
    }

    fn arg_group(&self, _indent: &str, params: &[&Parameter], via_request: bool) -> Option<String> {
        if params.is_empty() {
            return None;
        }
        let entries: Vec<String> = params
            .iter()
            .map(|p| {
                format!(
                    "{}: {} as Any?",
                    self.quote(p.wire_name()),
                    self.param_accessor(p, via_request)
                )
            })
            .collect();
        Some(format!("[{}]", entries.join(", ")))
    }

    fn http_call(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        method: &Method,
    ) -> Result<String> {
        self.call(session, indent, method, CallKind::Materialized)
    }

    fn stream_call(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        method: &Method,
    ) -> Result<String> {
        self.call(session, indent, method, CallKind::Streamed)
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
        let semantics = self.semantics(session, id);
        match session.ty(id)? {
            Type::Enum(e) => Ok(format!(
                "{}{indent}enum {}: {}, Codable {{\n",
                self.comment_header(indent, &e.description),
                e.name,
                self.intrinsic_type(e.base()).name
            )),
            Type::Composite(c) => {
                let (keyword, note) = match semantics {
                    Semantics::Reference => ("class", format!("\n{RECURSIVE_NOTE}")),
                    Semantics::Value => ("struct", String::new()),
                };
                let doc = format!("{}{note}", c.description.trim());
                Ok(format!(
                    "{}{indent}{keyword} {}: SDKModel {{\n",
                    self.comment_header(indent, &doc),
                    c.name
                ))
            }
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
        let optional = if property.required { "" } else { "?" };
        Ok(format!(
            "{}{indent}public var {}: {}{optional}",
            self.comment_header(indent, &self.describe_property(property)),
            self.reserve(&property.name),
            mapped.name
        ))
    }

    fn declare_enum_value(&self, indent: &str, value: &EnumValue) -> String {
        let member = self.reserve(&enum_member_name(value));
        match value {
            EnumValue::Str(s) => format!("{indent}case {member} = {}", self.quote(s)),
            EnumValue::Int(n) => format!("{indent}case {member} = {n}"),
        }
    }

    /// Coding keys for renamed properties, then a memberwise initializer
    /// with required arguments first
    fn construct(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        id: TypeId,
    ) -> Result<String> {
        let Some(composite) = session.composite(id).cloned() else {
            return Ok(String::new());
        };
        let bump = self.bump(indent);
        let mut parts = Vec::new();

        if composite.properties.values().any(Property::has_special_needs) {
            let cases: Vec<String> = composite
                .properties
                .values()
                .map(|p| {
                    if p.has_special_needs() {
                        format!("{bump}case {} = {}", self.reserve(&p.name), self.quote(p.wire_name()))
                    } else {
                        format!("{bump}case {}", self.reserve(&p.name))
                    }
                })
                .collect();
            parts.push(format!(
                "{indent}private enum CodingKeys : String, CodingKey {{\n{}\n{indent}}}",
                cases.join("\n")
            ));
        }

        let mut args = Vec::new();
        let mut assigns = Vec::new();
        for prop in composite
            .required_properties()
            .chain(composite.optional_properties())
        {
            let mapped = self.map_type(session, prop.ty, Usage::Model)?;
            let name = self.reserve(&prop.name);
            if prop.required {
                args.push(format!("{name}: {}", mapped.name));
            } else {
                args.push(format!("{name}: {}? = nil", mapped.name));
            }
            assigns.push(format!("{bump}self.{name} = {name}"));
        }
        if assigns.is_empty() {
            parts.push(format!("{indent}public init() {{}}"));
        } else {
            parts.push(format!(
                "{indent}public init({}) {{\n{}\n{indent}}}",
                args.join(", "),
                assigns.join("\n")
            ));
        }
        Ok(format!("\n\n{}", parts.join("\n\n")))
    }

    /// Recursive composites need reference semantics
    fn semantics(&self, session: &GenerationSession<'_>, id: TypeId) -> Semantics {
        if session.is_recursive(id) {
            Semantics::Reference
        } else {
            Semantics::Value
        }
    }

    fn arg_set(&self, name: &str, value: &str) -> String {
        format!("{name}: {value}")
    }

    fn type_open(&self, type_name: &str) -> String {
        format!("{type_name}(")
    }

    fn type_close(&self) -> String {
        ")".to_string()
    }

    fn enum_member(&self, _type_name: &str, value: &EnumValue) -> String {
        format!(".{}", self.reserve(&enum_member_name(value)))
    }

    fn hash_literal(&self, entries: &[(String, String)]) -> String {
        if entries.is_empty() {
            return "[:]".to_string();
        }
        let entries: Vec<String> = entries
            .iter()
            .map(|(k, v)| format!("{}: {v}", self.quote(k)))
            .collect();
        format!("[{}]", entries.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::generation::fixtures::{query_model, traced_model};
    use serde_json::json;

    fn backend() -> SwiftBackend {
        SwiftBackend::new(GeneratorOptions::default())
    }

    #[test]
    fn test_run_query_declaration() {
        let model = query_model();
        let backend = backend();
        let mut session = GenerationSession::new(&model);
        let method = model.method("run_query").unwrap();

        let text = backend.declare_method(&mut session, "    ", method).unwrap();
        assert!(text.starts_with("    /**\n     * Run a saved query\n     *\n"));
        assert!(text.contains(
            "    func run_query(\n        _ query_id: Int,\n        _ result_format: String,\n        limit: Int? = nil,\n        options: ITransportSettings? = nil\n    ) -> SDKResponse<String, SDKError> {\n"
        ));
        assert!(text.contains("        let path_result_format = encodeParam(result_format)\n"));
        assert!(text.contains(
            "        let result: SDKResponse<String, SDKError> = self.get(\"/queries/\\(query_id)/run/\\(path_result_format)\", [\"limit\": limit as Any?], options: options)\n        return result"
        ));
        assert!(text.ends_with("\n    }"));
    }

    #[test]
    fn test_streamer_returns_data() {
        let model = query_model();
        let backend = backend();
        let mut session = GenerationSession::new(&model);
        let text = backend
            .declare_streamer(&mut session, "    ", model.method("folder").unwrap())
            .unwrap();
        assert!(text.contains(") -> SDKResponse<Data, SDKError> {\n"));
        assert!(text.contains("self.get(\"/folders/\\(path_folder_id)\", options: options)"));
    }

    #[test]
    fn test_recursive_composite_is_a_class() {
        let model = query_model();
        let backend = backend();
        let mut session = GenerationSession::new(&model);

        let folder = backend
            .declare_type(&mut session, "", model.lookup("Folder").unwrap())
            .unwrap();
        assert!(folder.starts_with(
            "/**\n * Folders nest\n * Recursive type references must use Class instead of Struct\n */\nclass Folder: SDKModel {\n"
        ));
        assert!(folder.contains("    public var children: [Folder]?"));
        assert!(folder.contains("    public init(name: String, children: [Folder]? = nil, parent: Folder? = nil) {"));
        assert!(folder.ends_with("\n}"));

        let look = backend
            .declare_type(&mut session, "", model.lookup("Look").unwrap())
            .unwrap();
        assert!(look.contains("struct Look: SDKModel {\n"));
        assert!(look.contains("    public var export: LookResultFormat?"));
    }

    #[test]
    fn test_renamed_properties_get_coding_keys() {
        let model = query_model();
        let backend = backend();
        let mut session = GenerationSession::new(&model);
        let query = backend
            .declare_type(&mut session, "", model.lookup("Query").unwrap())
            .unwrap();
        assert!(query.contains("    private enum CodingKeys : String, CodingKey {\n        case id\n"));
        assert!(query.contains("        case vis_config = \"vis-config\"\n"));
        assert!(query.contains("    public var vis_config: StringDictionary<AnyCodable>?"));
    }

    #[test]
    fn test_enum_declaration() {
        let model = query_model();
        let backend = backend();
        let mut session = GenerationSession::new(&model);
        let text = backend
            .declare_type(&mut session, "", model.lookup("LookResultFormat").unwrap())
            .unwrap();
        assert_eq!(
            text,
            "enum LookResultFormat: String, Codable {\n    case pdf = \"pdf\"\n    case png = \"png\"\n}"
        );
    }

    #[test]
    fn test_make_the_call_labels_optionals() {
        let model = query_model();
        let backend = backend();
        let mut session = GenerationSession::new(&model);
        let method = model.method("run_query").unwrap();
        let inputs = json!({"query_id": 42, "result_format": "csv", "limit": 10});
        assert_eq!(
            backend
                .make_the_call(&mut session, method, inputs.as_object().unwrap())
                .unwrap(),
            "sdk.run_query(42, \"csv\", limit: 10)"
        );
    }

    #[test]
    fn test_unversioned_paths() {
        let backend = backend();
        assert_eq!(backend.sdk_file_name("methods"), "swift/client/sdk/methods.swift");
        assert_eq!(backend.reserve("default"), "`default`");
    }

    #[test]
    fn test_dashed_parameters_use_identifiers_and_wire_keys() {
        let model = traced_model();
        let backend = backend();
        let mut session = GenerationSession::new(&model);
        let method = model.method("search").unwrap();

        let text = backend.declare_method(&mut session, "    ", method).unwrap();
        assert!(text.contains(
            "        _ scope_id: String,\n        limit: Int? = 10,\n        offset: Int? = nil,\n        X_Trace_Id: String? = nil,\n"
        ));
        assert!(text.contains("        let path_scope_id = encodeParam(scope_id)\n"));
        assert!(text.contains(
            "self.get(\"/scopes/\\(path_scope_id)/search\", [\"limit\": limit as Any?, \"offset\": offset as Any?], nil, [\"X-Trace-Id\": X_Trace_Id as Any?], options: options)"
        ));

        let inputs = json!({"scope-id": "abc", "X-Trace-Id": "t-1"});
        assert_eq!(
            backend
                .make_the_call(&mut session, method, inputs.as_object().unwrap())
                .unwrap(),
            "sdk.search(\"abc\", X_Trace_Id: \"t-1\")"
        );
    }
}
