//! Serialized IR models (`*.ir.json`).
//!
//! A model lists types with their fields and methods; method bodies list
//! their elements per kind in appearance order. Keys are camelCase:
//!
//! ```json
//! { "types": [ { "id": "p.A", "superTypes": ["java.lang.Object"],
//!     "fields": [ { "name": "x", "type": "int" } ],
//!     "methods": [ { "name": "m", "returnType": "void", "params": ["int"],
//!         "line": 4,
//!         "body": { "invocations": [ { "targetType": "p.Log", "name": "log",
//!             "returnType": "void", "params": ["java.lang.String"], "line": 5 } ] } } ] } ] }
//! ```

use crate::builder::{IrBuild, IrPoolBuilder};
use crate::error::IrLoadError;
use crate::flags::IrModifiers;
use irfit_common::AccessKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrModel {
    #[serde(default)]
    pub types: Vec<TypeModel>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeModel {
    pub id: String,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub super_types: Vec<String>,
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default)]
    pub referenced_types: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldModel>,
    #[serde(default)]
    pub methods: Vec<MethodModel>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldModel {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodModel {
    pub name: String,
    pub return_type: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub body: BodyModel,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyModel {
    #[serde(default)]
    pub invocations: Vec<InvocationModel>,
    #[serde(default)]
    pub allocations: Vec<TypedSiteModel>,
    #[serde(default)]
    pub field_accesses: Vec<FieldAccessModel>,
    #[serde(default)]
    pub method_refs: Vec<MethodRefModel>,
    #[serde(default)]
    pub casts: Vec<TypedSiteModel>,
    #[serde(default)]
    pub lambdas: Vec<LambdaModel>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationModel {
    pub target_type: String,
    pub name: String,
    pub return_type: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

/// An allocation or a cast: a type and a line hint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedSiteModel {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldAccessModel {
    pub name: String,
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    pub kind: AccessKind,
    #[serde(default)]
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodRefModel {
    #[serde(default)]
    pub target_type: Option<String>,
    pub name: String,
    #[serde(default)]
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaModel {
    /// Method id of the implementing method.
    pub implementation: String,
    #[serde(default)]
    pub line: Option<u32>,
}

impl IrModel {
    /// Decode a model from JSON text; `path` only labels errors.
    pub fn from_json(path: &Path, text: &str) -> Result<Self, IrLoadError> {
        serde_json::from_str(text).map_err(|source| IrLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and decode a model file.
    pub fn load(path: &Path) -> Result<Self, IrLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| IrLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &text)
    }

    /// Add this model's elements to `builder`.
    ///
    /// Declarations are added for every type before any body, so lambda
    /// links and cross-type references do not depend on type order.
    pub fn extend_builder(&self, path: &Path, builder: &mut IrPoolBuilder) -> Result<(), IrLoadError> {
        let mut pending_bodies = Vec::new();
        for ty in &self.types {
            let handle = builder.add_type(&ty.id);
            builder.set_type_line(handle, ty.line);
            builder.set_type_modifiers(handle, parse_modifiers(path, &ty.id, &ty.modifiers)?);
            for super_type in &ty.super_types {
                builder.add_super_type(handle, super_type);
            }
            for annotation in &ty.annotations {
                builder.add_annotation(handle, annotation);
            }
            for referenced in &ty.referenced_types {
                builder.add_referenced_type(handle, referenced);
            }
            for field in &ty.fields {
                let modifiers = parse_modifiers(path, &field.name, &field.modifiers)?;
                builder.add_field_with_modifiers(handle, &field.name, &field.ty, modifiers);
            }
            for method in &ty.methods {
                let modifiers = parse_modifiers(path, &method.name, &method.modifiers)?;
                let m = builder.add_method(
                    handle,
                    &method.name,
                    &method.return_type,
                    &method.params,
                    modifiers,
                );
                builder.set_method_line(m, method.line);
                pending_bodies.push((m, &method.body));
            }
        }

        for (m, body) in pending_bodies {
            for call in &body.invocations {
                builder.add_invocation(
                    m,
                    &call.target_type,
                    &call.name,
                    &call.return_type,
                    &call.params,
                    call.line,
                );
            }
            for alloc in &body.allocations {
                builder.add_allocation(m, &alloc.ty, alloc.line);
            }
            for access in &body.field_accesses {
                builder.add_field_access(m, &access.name, access.ty.as_deref(), access.kind, access.line);
            }
            for mref in &body.method_refs {
                builder.add_method_ref(m, mref.target_type.as_deref(), &mref.name, mref.line);
            }
            for cast in &body.casts {
                builder.add_cast(m, &cast.ty, cast.line);
            }
            for lambda in &body.lambdas {
                builder.add_lambda(m, &lambda.implementation, lambda.line);
            }
        }
        Ok(())
    }

    /// Build a pool from this model alone.
    pub fn build(&self) -> Result<IrBuild, IrLoadError> {
        let mut builder = IrPoolBuilder::new();
        self.extend_builder(Path::new("<memory>"), &mut builder)?;
        Ok(builder.finish())
    }
}

fn parse_modifiers(path: &Path, element: &str, keywords: &[String]) -> Result<IrModifiers, IrLoadError> {
    keywords.iter().try_fold(IrModifiers::empty(), |acc, keyword| {
        IrModifiers::from_keyword(keyword)
            .map(|flag| acc | flag)
            .ok_or_else(|| IrLoadError::UnknownModifier {
                path: PathBuf::from(path),
                element: element.to_string(),
                modifier: keyword.clone(),
            })
    })
}

/// Load every model in `paths` into one pool.
pub fn load_pool(paths: &[PathBuf]) -> Result<IrBuild, IrLoadError> {
    let mut builder = IrPoolBuilder::new();
    for path in paths {
        let model = IrModel::load(path)?;
        tracing::debug!(path = %path.display(), types = model.types.len(), "loaded IR model");
        model.extend_builder(path, &mut builder)?;
    }
    Ok(builder.finish())
}
