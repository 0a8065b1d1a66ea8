//! Python backend: attrs models and keyword-argument methods

use crate::generation::mapper::{MappedType, Usage, ValueCoercion};
use crate::generation::utils::{
    enum_member_name, has_path_params, interpolate_path, reserve_with_suffix, to_snake_case,
};
use crate::generation::{
    Backend, BackendExt, CallKind, Capabilities, DocPlacement, GenerationError, GenerationSession,
    GeneratorOptions, Language, PropertyOrder, Result, Syntax,
};
use crate::ir::{EnumValue, Intrinsic, Location, Method, Parameter, Property, Type, TypeId};

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

static PYTHON_SYNTAX: Syntax = Syntax {
    file_extension: ".py",
    code_path: "python/",
    package_path: "client",
    itself: "self",
    indent_str: "    ",
    comment_str: "# ",
    null_str: "None",
    end_type_str: "",
    arg_delimiter: ", ",
    param_delimiter: ",\n",
    prop_delimiter: "\n",
    enum_delimiter: "\n",
    code_quote: "\"",
};

/// Generates a Python SDK
pub struct PythonBackend {
    options: GeneratorOptions,
}

impl PythonBackend {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    fn optional(mapped: &MappedType) -> String {
        if mapped.optional_coercible {
            format!("Optional[{}]", mapped.name)
        } else {
            mapped.name.clone()
        }
    }

    fn rtl_package(&self) -> String {
        to_snake_case(&self.options.package_base)
    }

    fn keyword_for(location: Location) -> &'static str {
        match location {
            Location::Query => "query_params",
            Location::Body => "body",
            Location::Header => "headers",
            Location::Cookie => "cookies",
            Location::Path => "path",
        }
    }

    fn model_name(name: &str, usage: Usage) -> String {
        match usage {
            Usage::Model => format!("\"{name}\""),
            Usage::Method => format!("models.{name}"),
        }
    }
}

impl Backend for PythonBackend {
    fn language(&self) -> Language {
        Language::Python
    }

    fn syntax(&self) -> &Syntax {
        &PYTHON_SYNTAX
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            named_arguments: true,
            needs_request_types: false,
            streams: false,
            multi_api: true,
            property_order: PropertyOrder::RequiredFirst,
            explicit_constructor: true,
            doc_placement: DocPlacement::InsideBody,
        }
    }

    fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    fn reserve(&self, name: &str) -> String {
        reserve_with_suffix(name, PYTHON_KEYWORDS, "_")
    }

    fn version_segment(&self) -> String {
        format!("api{}", self.options.api_ref())
    }

    fn intrinsic_type(&self, intrinsic: Intrinsic) -> MappedType {
        let mapped = match intrinsic {
            Intrinsic::String
            | Intrinsic::Uri
            | Intrinsic::Email
            | Intrinsic::Uuid
            | Intrinsic::Password => MappedType::new("str", "None"),
            Intrinsic::Integer | Intrinsic::Int64 => MappedType::new("int", "None"),
            Intrinsic::Float | Intrinsic::Double => MappedType::new("float", "None"),
            Intrinsic::Boolean => MappedType::new("bool", "None"),
            Intrinsic::Byte => MappedType::new("bytes", "None"),
            Intrinsic::Date | Intrinsic::DateTime => MappedType::new("datetime.datetime", "None"),
            Intrinsic::Object => MappedType::new("MutableMapping[str, Any]", "None"),
            Intrinsic::Any => MappedType::new("Any", "None").not_coercible(),
            Intrinsic::Void => MappedType::new("None", "").not_coercible(),
        };
        if intrinsic.is_textual() {
            mapped.quoted()
        } else {
            mapped
        }
    }

    fn array_type(&self, element: &MappedType) -> MappedType {
        MappedType::new(format!("Sequence[{}]", element.name), "None")
    }

    fn hash_type(&self, element: &MappedType) -> MappedType {
        MappedType::new(format!("MutableMapping[str, {}]", element.name), "None")
    }

    fn delim_array_type(&self, element: &MappedType) -> MappedType {
        MappedType::new(format!("DelimSequence[{}]", element.name), "None").coerced(
            ValueCoercion::Wrapped {
                open: "DelimSequence(".to_string(),
                close: ")".to_string(),
            },
        )
    }

    fn enum_type(&self, name: &str, usage: Usage) -> MappedType {
        MappedType::new(Self::model_name(name, usage), "None")
            .coerced(ValueCoercion::EnumMember(name.to_string()))
    }

    fn composite_type(&self, name: &str, usage: Usage) -> MappedType {
        MappedType::new(Self::model_name(name, usage), "None")
    }

    fn either_type(&self, mapped: &MappedType) -> String {
        format!("Union[{}, bytes]", mapped.name)
    }

    fn methods_prologue(&self, _session: &GenerationSession<'_>, _indent: &str) -> String {
        let rtl = self.rtl_package();
        format!(
            "import datetime
from typing import Any, MutableMapping, Optional, Sequence, Union, cast
import warnings

from . import models
from {rtl}.rtl import api_methods
from {rtl}.rtl import transport

DelimSequence = models.DelimSequence


class {}(api_methods.APIMethods):
",
            self.options.package_name(true)
        )
    }

    fn methods_epilogue(&self, _indent: &str) -> String {
        String::new()
    }

    fn models_prologue(&self, _session: &GenerationSession<'_>, _indent: &str) -> String {
        let rtl = self.rtl_package();
        format!(
            "import datetime
import enum
from typing import Any, MutableMapping, Optional, Sequence

try:
    from typing import ForwardRef  # type: ignore
except ImportError:
    from typing import _ForwardRef as ForwardRef  # type: ignore

import attr

from {rtl}.rtl import model
from {rtl}.rtl import serialize as sr

EXPLICIT_NULL = model.EXPLICIT_NULL  # type: ignore
DelimSequence = model.DelimSequence
"
        )
    }

    /// Structure hooks for every declared type, so forward references and
    /// renamed keys deserialize
    fn models_epilogue(&self, session: &GenerationSession<'_>, _indent: &str) -> String {
        if session.declared().is_empty() {
            return String::new();
        }
        let converter = format!("sr.converter{}", self.options.api_ref());
        let mut hooks = Vec::new();
        for id in session.declared() {
            let Some(node) = session.get(*id) else {
                continue;
            };
            let Some(name) = node.declared_name() else {
                continue;
            };
            hooks.push(format!(
                "{converter}.register_structure_hook(\n    ForwardRef(\"{name}\"),  # type: ignore\n    forward_ref_structure_hook,  # type:ignore\n)"
            ));
            if let Type::Composite(c) = node {
                let renamed = c
                    .properties
                    .values()
                    .any(|p| p.has_special_needs() || self.reserve(&p.name) != p.name);
                if renamed {
                    hooks.push(format!(
                        "{converter}.register_structure_hook(\n    {name},  # type: ignore\n    translate_keys_structure_hook,  # type:ignore\n)"
                    ));
                }
            }
        }
        format!(
            "
import functools  # noqa:E402

forward_ref_structure_hook = functools.partial(
    sr.forward_ref_structure_hook, globals(), {converter}
)
translate_keys_structure_hook = functools.partial(
    sr.translate_keys_structure_hook, {converter}
)
{}",
            hooks.join("\n")
        )
    }

    fn doc_string(&self, indent: &str, text: &str) -> String {
        let text = text.trim();
        if text.is_empty() {
            return String::new();
        }
        let lines: Vec<String> = text
            .replace("\"\"\"", "\\\"\\\"\\\"")
            .lines()
            .map(|line| {
                let line = line.trim_end();
                if line.is_empty() {
                    String::new()
                } else {
                    format!("{indent}{line}")
                }
            })
            .collect();
        format!("{indent}\"\"\"\n{}\n{indent}\"\"\"\n", lines.join("\n"))
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
            return Ok(format!("{indent}{name}: {}", mapped.name));
        }
        let default = self
            .default_value(session, param, &mapped)?
            .unwrap_or_else(|| self.syntax().null_str.to_string());
        Ok(format!("{indent}{name}: {} = {default}", Self::optional(&mapped)))
    }

    fn method_signature(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        method: &Method,
        _kind: CallKind,
    ) -> Result<String> {
        let bump = self.bump(indent);
        let result = self.return_type(session, method)?;
        let mut params = vec![format!("{bump}{}", self.syntax().itself)];
        for param in method.all_params() {
            params.push(self.declare_parameter(session, &bump, method, param)?);
        }
        params.push(format!(
            "{bump}transport_options: Optional[transport.TransportOptions] = None"
        ));
        Ok(format!(
            "{indent}def {}(\n{},\n{indent}) -> {result}:\n",
            self.reserve(&method.name),
            params.join(self.syntax().param_delimiter)
        ))
    }

    fn encode_path_param(&self, indent: &str, _name: &str, accessor: &str) -> String {
        format!("{indent}{accessor} = self.encode_path_param({accessor})\n")
    }

    fn arg_group(&self, _indent: &str, params: &[&Parameter], via_request: bool) -> Option<String> {
        if params.is_empty() {
            return None;
        }
        let entries: Vec<String> = params
            .iter()
            .map(|p| {
                format!(
                    "{}: {}",
                    self.quote(p.wire_name()),
                    self.param_accessor(p, via_request)
                )
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
        let bump = self.bump(indent);
        let inner = self.bump(&bump);
        let path = interpolate_path(&method.endpoint, |name| {
            format!("{{{}}}", self.path_accessor(method, name))
        });
        let prefix = if has_path_params(&method.endpoint) { "f" } else { "" };

        let mut args = vec![
            format!("{inner}path={prefix}\"{path}\""),
            format!("{inner}structure={result}"),
        ];
        for (location, arg) in self.call_slots(&inner, method).named() {
            args.push(format!("{inner}{}={arg}", Self::keyword_for(location)));
        }
        args.push(format!("{inner}transport_options=transport_options"));

        let mut call = String::new();
        if method.deprecated {
            call.push_str(&format!(
                "{indent}warnings.warn(\"{} is deprecated\", DeprecationWarning)\n",
                method.name
            ));
        }
        call.push_str(&format!(
            "{indent}response = cast(\n{bump}{result},\n{bump}{}.{}(\n{},\n{bump}),\n{indent})\n{indent}return response",
            self.syntax().itself,
            method.http_method.verb(),
            args.join(",\n")
        ));
        Ok(call)
    }

    fn type_signature(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        id: TypeId,
    ) -> Result<String> {
        let bump = self.bump(indent);
        match session.ty(id)? {
            Type::Enum(e) => Ok(format!(
                "{indent}class {}(enum.Enum):\n{}",
                e.name,
                self.doc_string(&bump, &e.description)
            )),
            Type::Composite(c) => {
                let mut doc = c.description.trim().to_string();
                let attributes: Vec<String> = self
                    .type_properties(c)
                    .into_iter()
                    .map(|p| {
                        format!("    {}: {}", self.reserve(&p.name), self.describe_property(p))
                            .trim_end()
                            .to_string()
                    })
                    .collect();
                if !attributes.is_empty() {
                    if !doc.is_empty() {
                        doc.push_str("\n\n");
                    }
                    doc.push_str("Attributes:\n");
                    doc.push_str(&attributes.join("\n"));
                }
                Ok(format!(
                    "{indent}@attr.s(auto_attribs=True, init=False)\n{indent}class {}(model.Model):\n{}",
                    c.name,
                    self.doc_string(&bump, &doc)
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
        let name = self.reserve(&property.name);
        let renamed = property.has_special_needs() || name != property.name;
        let annotation = if property.required {
            mapped.name.clone()
        } else {
            Self::optional(&mapped)
        };
        let value = match (renamed, property.required) {
            (true, true) => format!(
                " = attr.ib(metadata={{\"json_name\": \"{}\"}})",
                property.wire_name()
            ),
            (true, false) => format!(
                " = attr.ib(default=None, metadata={{\"json_name\": \"{}\"}})",
                property.wire_name()
            ),
            (false, true) => String::new(),
            (false, false) => " = None".to_string(),
        };
        Ok(format!("{indent}{name}: {annotation}{value}"))
    }

    fn declare_enum_value(&self, indent: &str, value: &EnumValue) -> String {
        let member = self.reserve(&enum_member_name(value));
        match value {
            EnumValue::Str(s) => format!("{indent}{member} = {}", self.quote(s)),
            EnumValue::Int(n) => format!("{indent}{member} = {n}"),
        }
    }

    /// Keyword-only `__init__`, required arguments first
    fn construct(
        &self,
        session: &mut GenerationSession<'_>,
        indent: &str,
        id: TypeId,
    ) -> Result<String> {
        let Some(composite) = session.composite(id).cloned() else {
            return Ok(String::new());
        };
        let props = self.type_properties(&composite);
        if props.is_empty() {
            return Ok(format!("{indent}pass"));
        }
        let bump = self.bump(indent);
        let mut args = vec![format!("{bump}self"), format!("{bump}*")];
        let mut assigns = Vec::with_capacity(props.len());
        for prop in props {
            let mapped = self.map_type(session, prop.ty, Usage::Model)?;
            let name = self.reserve(&prop.name);
            if prop.required {
                args.push(format!("{bump}{name}: {}", mapped.name));
            } else {
                args.push(format!("{bump}{name}: {} = None", Self::optional(&mapped)));
            }
            assigns.push(format!("{bump}self.{name} = {name}"));
        }
        Ok(format!(
            "\n\n{indent}def __init__(\n{}\n{indent}):\n{}",
            args.join(",\n"),
            assigns.join("\n")
        ))
    }

    fn type_epilogue(&self, indent: &str, ty: &Type) -> String {
        match ty {
            Type::Enum(e) => format!(
                "\n{}invalid_api_enum_value = \"invalid_api_enum_value\"\n\n\n{indent}{}.__new__ = model.safe_enum__new__  # type: ignore",
                self.bump(indent),
                e.name
            ),
            _ => String::new(),
        }
    }

    fn type_open(&self, type_name: &str) -> String {
        format!("{type_name}(")
    }

    fn type_close(&self) -> String {
        ")".to_string()
    }

    fn enum_member(&self, type_name: &str, value: &EnumValue) -> String {
        format!("models.{type_name}.{}", self.reserve(&enum_member_name(value)))
    }

    fn bool_literal(&self, value: bool) -> String {
        if value { "True" } else { "False" }.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::generation::fixtures::{query_model, traced_model};
    use serde_json::json;

    fn backend() -> PythonBackend {
        PythonBackend::new(GeneratorOptions::default())
    }

    #[test]
    fn test_run_query_declaration() {
        let model = query_model();
        let backend = backend();
        let mut session = GenerationSession::new(&model);
        let method = model.method("run_query").unwrap();

        let text = backend.declare_method(&mut session, "    ", method).unwrap();
        assert!(text.starts_with(
            "    def run_query(\n        self,\n        query_id: int,\n        result_format: str,\n        limit: Optional[int] = None,\n        transport_options: Optional[transport.TransportOptions] = None,\n    ) -> Union[str, bytes]:\n"
        ));
        assert!(text.contains("        \"\"\"\n        Run a saved query\n"));
        assert!(text.contains("GET /queries/{query_id}/run/{result_format} -> Union[str, bytes]"));
        assert!(text.contains("**Note**: Binary content may be returned by this method."));
        assert!(text.contains("        result_format = self.encode_path_param(result_format)\n"));
        assert!(!text.contains("query_id = self.encode_path_param"));
        assert!(text.contains("path=f\"/queries/{query_id}/run/{result_format}\""));
        assert!(text.contains("query_params={\"limit\": limit}"));
        assert!(!text.contains("body="));
        assert!(text.ends_with("        return response"));
    }

    #[test]
    fn test_body_uses_writeable_type() {
        let model = query_model();
        let backend = backend();
        let mut session = GenerationSession::new(&model);
        let method = model.method("create_query").unwrap();

        let text = backend.declare_method(&mut session, "    ", method).unwrap();
        assert!(text.contains("        body: models.WriteQuery,\n"));
        assert!(text.contains("        fields: Optional[str] = None,\n"));
        assert!(text.contains("path=\"/queries\""));
        assert!(text.contains("body=body"));
        assert!(text.contains("self.post("));
        assert!(!backend.use_request(model.method("search_queries").unwrap()));
    }

    #[test]
    fn test_deprecated_method_warns() {
        let model = query_model();
        let backend = backend();
        let mut session = GenerationSession::new(&model);
        let text = backend
            .declare_method(&mut session, "    ", model.method("delete_query").unwrap())
            .unwrap();
        assert!(text.contains("DEPRECATED"));
        assert!(text.contains("warnings.warn(\"delete_query is deprecated\", DeprecationWarning)"));
        assert!(text.contains(") -> None:"));
    }

    #[test]
    fn test_composite_declaration() {
        let model = query_model();
        let backend = backend();
        let mut session = GenerationSession::new(&model);
        let query = model.lookup("Query").unwrap();

        let text = backend.declare_type(&mut session, "", query).unwrap();
        assert!(text.starts_with(
            "@attr.s(auto_attribs=True, init=False)\nclass Query(model.Model):\n    \"\"\"\n    A saved query\n"
        ));
        assert!(text.contains("        id: Unique id (read-only)"));
        let model_at = text.find("    model: str\n").unwrap();
        let id_at = text.find("    id: Optional[int] = None").unwrap();
        assert!(model_at < id_at);
        assert!(text.contains("    result_format: Optional[\"ResultFormat\"] = None"));
        assert!(text.contains(
            "    vis_config: Optional[MutableMapping[str, Any]] = attr.ib(default=None, metadata={\"json_name\": \"vis-config\"})"
        ));
        assert!(text.contains("    def __init__(\n        self,\n        *,\n        model: str,\n        view: str,\n"));
        assert!(text.contains("        self.vis_config = vis_config"));
        assert_eq!(session.declared(), &[query]);
    }

    #[test]
    fn test_enum_declaration() {
        let model = query_model();
        let backend = backend();
        let mut session = GenerationSession::new(&model);
        let format = model.lookup("ResultFormat").unwrap();

        let text = backend.declare_type(&mut session, "", format).unwrap();
        assert!(text.starts_with("class ResultFormat(enum.Enum):\n"));
        assert!(text.contains("    json = \"json\"\n    csv = \"csv\"\n    inline_json = \"inline_json\""));
        assert!(text.contains("    invalid_api_enum_value = \"invalid_api_enum_value\""));
        assert!(text.ends_with("ResultFormat.__new__ = model.safe_enum__new__  # type: ignore"));
    }

    #[test]
    fn test_make_the_call_names_optional_arguments() {
        let model = query_model();
        let backend = backend();
        let mut session = GenerationSession::new(&model);
        let method = model.method("run_query").unwrap();

        let without = json!({"query_id": 42, "result_format": "csv"});
        let with = json!({"query_id": 42, "result_format": "csv", "limit": 10});
        assert_eq!(
            backend
                .make_the_call(&mut session, method, without.as_object().unwrap())
                .unwrap(),
            "sdk.run_query(42, \"csv\")"
        );
        assert_eq!(
            backend
                .make_the_call(&mut session, method, with.as_object().unwrap())
                .unwrap(),
            "sdk.run_query(42, \"csv\", limit=10)"
        );
    }

    #[test]
    fn test_make_the_call_builds_body_literal() {
        let model = query_model();
        let backend = backend();
        let mut session = GenerationSession::new(&model);
        let method = model.method("create_query").unwrap();
        let inputs = json!({"body": {"model": "thelook", "view": "users", "fields": ["users.id"]}});

        let call = backend
            .make_the_call(&mut session, method, inputs.as_object().unwrap())
            .unwrap();
        assert_eq!(
            call,
            "sdk.create_query(models.WriteQuery(model=\"thelook\", view=\"users\", fields=[\"users.id\"]))"
        );
    }

    #[test]
    fn test_reserved_words_and_paths() {
        let backend = backend();
        assert_eq!(backend.reserve("from"), "from_");
        assert_eq!(backend.reserve("query_id"), "query_id");
        assert_eq!(backend.version_segment(), "api40");
        assert_eq!(backend.sdk_file_name("methods"), "python/client/sdk/api40/methods.py");
    }

    #[test]
    fn test_dashed_parameters_use_identifiers_and_wire_keys() {
        let model = traced_model();
        let backend = backend();
        let mut session = GenerationSession::new(&model);
        let method = model.method("search").unwrap();

        let text = backend.declare_method(&mut session, "    ", method).unwrap();
        assert!(text.contains(
            "        scope_id: str,\n        limit: Optional[int] = 10,\n        offset: Optional[int] = None,\n        X_Trace_Id: Optional[str] = None,\n"
        ));
        assert!(text.contains("        scope_id = self.encode_path_param(scope_id)\n"));
        assert!(text.contains("path=f\"/scopes/{scope_id}/search\""));
        assert!(text.contains("query_params={\"limit\": limit, \"offset\": offset}"));
        assert!(text.contains("headers={\"X-Trace-Id\": X_Trace_Id}"));

        let inputs = json!({"scope-id": "abc", "X-Trace-Id": "t-1"});
        assert_eq!(
            backend
                .make_the_call(&mut session, method, inputs.as_object().unwrap())
                .unwrap(),
            "sdk.search(\"abc\", X_Trace_Id=\"t-1\")"
        );
    }

    #[test]
    fn test_declared_default_reaches_signature() {
        let model = traced_model();
        let backend = backend();
        let mut session = GenerationSession::new(&model);

        let text = backend
            .declare_method(&mut session, "    ", model.method("recent").unwrap())
            .unwrap();
        assert!(text.contains("        limit: Optional[int] = 10,\n"));
    }
}
