//! Methods, parameters and responses

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ir::TypeId;
use crate::ir::types::{is_simple_name, safe_name};

/// HTTP verb of a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Lower-case verb, as used for transport calls
    pub fn verb(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of a parameter, in positional precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Path,
    Body,
    Query,
    Header,
    Cookie,
}

impl Location {
    pub const ALL: [Location; 5] = [
        Location::Path,
        Location::Body,
        Location::Query,
        Location::Header,
        Location::Cookie,
    ];
}

/// A method parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    /// Original name when it is not usable as an identifier
    pub json_name: Option<String>,
    pub location: Location,
    pub ty: TypeId,
    pub required: bool,
    pub description: String,
    /// Literal default for an optional parameter
    pub default: Option<serde_json::Value>,
    /// Cached from the parameter's type when the model is built
    pub(crate) encode: bool,
}

impl Parameter {
    pub fn new(name: &str, location: Location, ty: TypeId) -> Self {
        let (name, json_name) = if is_simple_name(name) {
            (name.to_string(), None)
        } else {
            (safe_name(name), Some(name.to_string()))
        };
        Self {
            name,
            json_name,
            location,
            ty,
            // path parameters are always required
            required: location == Location::Path,
            description: String::new(),
            default: None,
            encode: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Name the server knows the parameter by
    pub fn wire_name(&self) -> &str {
        self.json_name.as_deref().unwrap_or(&self.name)
    }

    pub fn has_special_needs(&self) -> bool {
        self.json_name.is_some()
    }

    /// Path value must be encoded before it is interpolated
    pub fn needs_encoding(&self) -> bool {
        self.location == Location::Path && self.encode
    }
}

static STRING_MODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(^application/.*(\bjson\b|\bxml\b|\bsql\b|\bgraphql\b|\bjavascript\b|\bx-www-form-urlencoded\b)|^text/|.*\+xml\b|;.*\bcharset\b)",
    )
    .expect("valid string media regex")
});
static BINARY_MODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^image/|^audio/|^video/|^font/|^application/|^multipart/")
        .expect("valid binary media regex")
});

/// How a response payload is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseMode {
    String,
    Binary,
    Unknown,
}

impl ResponseMode {
    pub fn of(media_type: &str) -> Self {
        let media_type = media_type.to_lowercase();
        if STRING_MODE.is_match(&media_type) {
            ResponseMode::String
        } else if BINARY_MODE.is_match(&media_type) {
            ResponseMode::Binary
        } else {
            ResponseMode::Unknown
        }
    }
}

/// One declared response of a method
#[derive(Debug, Clone, PartialEq)]
pub struct MethodResponse {
    pub status: u16,
    pub media_type: String,
    pub ty: TypeId,
    pub description: String,
}

impl MethodResponse {
    pub fn new(status: u16, media_type: &str, ty: TypeId) -> Self {
        Self {
            status,
            media_type: media_type.to_string(),
            ty,
            description: String::new(),
        }
    }

    pub fn mode(&self) -> ResponseMode {
        ResponseMode::of(&self.media_type)
    }

    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// An API method
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub http_method: HttpMethod,
    pub endpoint: String,
    pub summary: String,
    pub description: String,
    pub params: Vec<Parameter>,
    pub responses: Vec<MethodResponse>,
    pub deprecated: bool,
    pub tags: Vec<String>,
}

impl Method {
    pub fn new(name: &str, http_method: HttpMethod, endpoint: &str) -> Self {
        Self {
            name: name.to_string(),
            http_method,
            endpoint: endpoint.to_string(),
            summary: String::new(),
            description: String::new(),
            params: Vec::new(),
            responses: Vec::new(),
            deprecated: false,
            tags: Vec::new(),
        }
    }

    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn response(mut self, response: MethodResponse) -> Self {
        self.responses.push(response);
        self
    }

    pub fn summary(mut self, summary: &str) -> Self {
        self.summary = summary.to_string();
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    fn by_location(&self, required: bool) -> Vec<&Parameter> {
        let mut ordered = Vec::with_capacity(self.params.len());
        for location in Location::ALL {
            ordered.extend(
                self.params
                    .iter()
                    .filter(|p| p.location == location && p.required == required),
            );
        }
        ordered
    }

    /// Required parameters ordered by location precedence
    pub fn required_params(&self) -> Vec<&Parameter> {
        self.by_location(true)
    }

    /// Optional parameters ordered by location precedence
    pub fn optional_params(&self) -> Vec<&Parameter> {
        self.by_location(false)
    }

    /// Required then optional parameters
    pub fn all_params(&self) -> Vec<&Parameter> {
        let mut all = self.required_params();
        all.extend(self.optional_params());
        all
    }

    /// Parameters at one location, in declaration order
    pub fn params_in(&self, location: Location) -> Vec<&Parameter> {
        self.params.iter().filter(|p| p.location == location).collect()
    }

    /// Path parameter named by an endpoint placeholder
    pub fn path_param(&self, placeholder: &str) -> Option<&Parameter> {
        self.params
            .iter()
            .find(|p| p.location == Location::Path && p.wire_name() == placeholder)
    }

    pub fn body_param(&self) -> Option<&Parameter> {
        self.params.iter().find(|p| p.location == Location::Body)
    }

    /// Bundling the parameters only pays off with several optional ones
    pub fn may_use_request_type(&self) -> bool {
        let optional = self.optional_params();
        let optional_body = optional.iter().any(|p| p.location == Location::Body);
        optional.len() - usize::from(optional_body) > 1
    }

    /// Successful response the method returns
    pub fn primary_response(&self) -> Option<&MethodResponse> {
        self.responses
            .iter()
            .find(|r| r.status == 200 && r.media_type == "application/json")
            .or_else(|| self.responses.iter().find(|r| r.status == 200))
            .or_else(|| self.responses.iter().find(|r| r.status == 204))
    }

    /// Failure responses, one per distinct type
    pub fn error_responses(&self) -> Vec<&MethodResponse> {
        let mut seen = Vec::new();
        self.responses
            .iter()
            .filter(|r| r.is_error())
            .filter(|r| {
                if seen.contains(&r.ty) {
                    false
                } else {
                    seen.push(r.ty);
                    true
                }
            })
            .collect()
    }

    fn ok_responses(&self) -> impl Iterator<Item = &MethodResponse> {
        self.responses.iter().filter(|r| (200..300).contains(&r.status))
    }

    pub fn returns_string(&self) -> bool {
        self.ok_responses().any(|r| r.mode() == ResponseMode::String)
    }

    pub fn returns_binary(&self) -> bool {
        self.ok_responses().any(|r| r.mode() == ResponseMode::Binary)
    }

    /// Successful payload may be either structured data or raw bytes
    pub fn returns_either(&self) -> bool {
        self.returns_string() && self.returns_binary()
    }
}
