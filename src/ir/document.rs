//! Serializable description of an API model
//!
//! A model document is the hand-off format between an API description parser
//! and the generator. Type expressions are either a bare name (an intrinsic
//! such as `"integer"` or a declared composite such as `"Query"`) or a tagged
//! shape:
//!
//! ```yaml
//! type: { kind: array, of: Query }
//! type: { kind: enum, values: [csv, json] }
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ir::{
    ApiModel, EnumValue, HttpMethod, Intrinsic, Location, Method, MethodResponse, ModelBuilder,
    ModelError, Parameter, Property, TypeId,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDocument {
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeExpr {
    Named(String),
    Shape(TypeShape),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeShape {
    Array {
        of: Box<TypeExpr>,
    },
    Hash {
        of: Box<TypeExpr>,
    },
    DelimArray {
        of: Box<TypeExpr>,
    },
    Enum {
        #[serde(default)]
        name: Option<String>,
        values: Vec<EnumValue>,
        #[serde(default)]
        description: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub http_method: HttpMethod,
    pub endpoint: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    #[serde(default)]
    pub responses: Vec<ResponseDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    #[serde(rename = "in")]
    pub location: Location,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

fn default_media_type() -> String {
    "application/json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseDecl {
    pub status: u16,
    #[serde(default = "default_media_type")]
    pub media_type: String,
    /// Absent for responses without a payload
    #[serde(rename = "type", default)]
    pub ty: Option<TypeExpr>,
    #[serde(default)]
    pub description: String,
}

impl ModelDocument {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Builds the model, declaring every composite before resolving any
    /// reference so declarations may appear in any order
    pub fn into_model(self) -> Result<ApiModel, ModelError> {
        let mut builder = ApiModel::builder(&self.version);
        builder.describe(&self.description);

        let mut declared = Vec::with_capacity(self.types.len());
        for decl in &self.types {
            declared.push(builder.composite(&decl.name, &decl.description)?);
        }
        for (decl, id) in self.types.iter().zip(declared) {
            for prop in &decl.properties {
                let ty = resolve(&mut builder, &prop.ty, &prop.name, &decl.name)?;
                let mut property = Property::new(&prop.name, ty).describe(&prop.description);
                property.required = prop.required;
                property.read_only = prop.read_only;
                property.nullable = prop.nullable;
                property.deprecated = prop.deprecated;
                builder.property(id, property)?;
            }
        }

        for decl in self.methods {
            let mut method = Method::new(&decl.name, decl.http_method, &decl.endpoint)
                .summary(&decl.summary);
            method.description = decl.description;
            method.deprecated = decl.deprecated;
            method.tags = decl.tags;
            for param in &decl.params {
                let ty = resolve(&mut builder, &param.ty, &param.name, &decl.name)?;
                let mut parameter =
                    Parameter::new(&param.name, param.location, ty).describe(&param.description);
                parameter.required = parameter.required || param.required;
                parameter.default = param.default.clone();
                method.params.push(parameter);
            }
            for response in &decl.responses {
                let ty = match &response.ty {
                    Some(expr) => resolve(&mut builder, expr, "response", &decl.name)?,
                    None => builder.intrinsic(Intrinsic::Void),
                };
                let mut resolved = MethodResponse::new(response.status, &response.media_type, ty);
                resolved.description = response.description.clone();
                method.responses.push(resolved);
            }
            builder.method(method)?;
        }

        Ok(builder.build())
    }
}

/// Resolves a type expression; `slot` and `owner` name inline enums
fn resolve(
    builder: &mut ModelBuilder,
    expr: &TypeExpr,
    slot: &str,
    owner: &str,
) -> Result<TypeId, ModelError> {
    match expr {
        TypeExpr::Named(name) => match Intrinsic::from_str(name) {
            Ok(intrinsic) => Ok(builder.intrinsic(intrinsic)),
            Err(_) => builder
                .lookup(name)
                .ok_or_else(|| ModelError::UnknownType(name.clone())),
        },
        TypeExpr::Shape(TypeShape::Array { of }) => {
            let element = resolve(builder, of, slot, owner)?;
            Ok(builder.array(element))
        }
        TypeExpr::Shape(TypeShape::Hash { of }) => {
            let element = resolve(builder, of, slot, owner)?;
            Ok(builder.hash(element))
        }
        TypeExpr::Shape(TypeShape::DelimArray { of }) => {
            let element = resolve(builder, of, slot, owner)?;
            Ok(builder.delim_array(element))
        }
        TypeExpr::Shape(TypeShape::Enum {
            name,
            values,
            description,
        }) => builder.enumeration(
            name.as_deref().unwrap_or(slot),
            owner,
            values.clone(),
            description,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Type;

    const QUERY_DOC: &str = r#"
version: "4.0"
types:
  - name: Query
    properties:
      - { name: id, type: integer, read_only: true }
      - { name: model, type: string, required: true }
      - { name: fields, type: { kind: array, of: string } }
      - { name: result_format, type: { kind: enum, values: [json, csv] } }
  - name: Look
    properties:
      - { name: query, type: Query }
      - { name: result_format, type: { kind: enum, values: [csv, json] } }
methods:
  - name: run_query
    http_method: GET
    endpoint: /queries/{query_id}/run/{result_format}
    params:
      - { name: query_id, in: path, type: integer }
      - { name: result_format, in: path, type: string }
      - { name: limit, in: query, type: integer }
    responses:
      - { status: 200, media_type: text, type: string }
      - { status: 404, type: Error }
"#;

    #[test]
    fn test_yaml_document_builds_model() {
        let doc = ModelDocument::from_yaml(&QUERY_DOC.replace(
            "methods:",
            "  - name: Error\n    properties:\n      - { name: message, type: string }\nmethods:",
        ))
        .unwrap();
        let model = doc.into_model().unwrap();

        let query = model.lookup("Query").unwrap();
        let look = model.lookup("Look").unwrap();
        let format = model.lookup("ResultFormat").unwrap();
        assert!(matches!(model.get(format), Some(Type::Enum(e)) if e.owner == "Query"));

        let look_format = model.composite(look).unwrap().properties["result_format"].ty;
        assert_eq!(look_format, format);
        assert_eq!(model.composite(look).unwrap().properties["query"].ty, query);

        let run = model.method("run_query").unwrap();
        assert!(run.params[0].required);
        assert!(!run.params[2].required);
        assert_eq!(run.responses.len(), 2);
    }

    #[test]
    fn test_unknown_reference_is_reported() {
        let err = ModelDocument::from_yaml(QUERY_DOC)
            .unwrap()
            .into_model()
            .unwrap_err();
        assert_eq!(err, ModelError::UnknownType("Error".to_string()));
    }

    #[test]
    fn test_json_document() {
        let doc = ModelDocument::from_json(
            r#"{"version": "3.1", "types": [{"name": "Pet", "properties": [{"name": "tags", "type": {"kind": "hash", "of": "string"}}]}]}"#,
        )
        .unwrap();
        let model = doc.into_model().unwrap();
        let pet = model.composite(model.lookup("Pet").unwrap()).unwrap();
        assert!(matches!(model.get(pet.properties["tags"].ty), Some(Type::Hash(_))));
        assert_eq!(model.version(), "3.1");
    }
}
