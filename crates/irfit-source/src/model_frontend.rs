//! Front end for serialized source trees (`*.src.json`).
//!
//! The document mirrors the source file: package, imports and nested type
//! declarations. Method bodies are ordered lists of elements in visit order,
//! tagged by `kind`. Positions are `[startLine, startColumn, endLine,
//! endColumn]`.
//!
//! ```json
//! { "package": "p", "imports": [ { "name": "java.util.*" } ],
//!   "types": [ { "name": "A", "pos": [1, 1, 9, 1],
//!     "fields": [ { "name": "x", "type": "int" } ],
//!     "methods": [ { "name": "run", "returnType": "void",
//!       "params": [ { "name": "s", "type": "String" } ],
//!       "body": [ { "kind": "call", "name": "println", "args": 1, "pos": [3, 5, 3, 20] } ] } ] } ] }
//! ```

use crate::file::SourceFile;
use crate::frontend::{FrontendError, SourceFrontend};
use crate::ids::{SrcMethodId, SrcTypeId, SrcVariableId};
use crate::imports::Import;
use irfit_common::limits::MAX_LAMBDA_NESTING;
use irfit_common::{AccessKind, Position};
use serde::Deserialize;
use std::path::PathBuf;

/// Reads `*.src.json` documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelFrontend;

impl SourceFrontend for ModelFrontend {
    fn name(&self) -> &'static str {
        "model"
    }

    fn suffixes(&self) -> &[&'static str] {
        &[".src.json"]
    }

    fn parse(&self, path: &str, text: &str) -> Result<SourceFile, FrontendError> {
        let doc: FileDoc = serde_json::from_str(text).map_err(|e| FrontendError::Syntax {
            path: PathBuf::from(path),
            message: e.to_string(),
        })?;
        let mut lowering = Lowering {
            path,
            file: SourceFile::new(path, doc.package.clone()),
        };
        for import in &doc.imports {
            lowering
                .file
                .add_import(Import::parse(&import.name, import.is_static, pos(import.pos)));
        }
        for ty in &doc.types {
            lowering.lower_type(ty, None)?;
        }
        Ok(lowering.file)
    }
}

// =============================================================================
// Document
// =============================================================================

type PosDoc = Option<[u32; 4]>;

fn pos(doc: PosDoc) -> Option<Position> {
    doc.map(|[sl, sc, el, ec]| Position::new(sl, sc, el, ec))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FileDoc {
    #[serde(default)]
    package: String,
    #[serde(default)]
    imports: Vec<ImportDoc>,
    #[serde(default)]
    types: Vec<TypeDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ImportDoc {
    name: String,
    #[serde(default, rename = "static")]
    is_static: bool,
    #[serde(default)]
    pos: PosDoc,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct TypeDoc {
    /// Absent for anonymous types.
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    pos: PosDoc,
    #[serde(default)]
    fields: Vec<FieldDoc>,
    #[serde(default)]
    methods: Vec<MethodDoc>,
    #[serde(default)]
    initializers: Vec<InitializerDoc>,
    #[serde(default)]
    types: Vec<TypeDoc>,
    #[serde(default)]
    type_uses: Vec<TypeUseDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FieldDoc {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    pos: PosDoc,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct MethodDoc {
    name: String,
    #[serde(default)]
    constructor: bool,
    #[serde(default, rename = "static")]
    is_static: bool,
    #[serde(default)]
    return_type: Option<String>,
    #[serde(default)]
    params: Vec<ParamDoc>,
    #[serde(default)]
    pos: PosDoc,
    #[serde(default)]
    body: Vec<BodyDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ParamDoc {
    name: String,
    #[serde(default, rename = "type")]
    ty: Option<String>,
    #[serde(default)]
    pos: PosDoc,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct InitializerDoc {
    #[serde(default, rename = "static")]
    is_static: bool,
    #[serde(default)]
    pos: PosDoc,
    #[serde(default)]
    body: Vec<BodyDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct TypeUseDoc {
    name: String,
    #[serde(default)]
    pos: PosDoc,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
enum BodyDoc {
    Call {
        name: String,
        args: usize,
        #[serde(default)]
        base: Option<String>,
        #[serde(default)]
        assign_to: Option<String>,
        #[serde(default)]
        pos: PosDoc,
    },
    New {
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        dims: u32,
        #[serde(default)]
        assign_to: Option<String>,
        #[serde(default)]
        pos: PosDoc,
    },
    Field {
        name: String,
        access: AccessKind,
        #[serde(default)]
        pos: PosDoc,
    },
    OuterThis {
        qualifier: String,
        #[serde(default)]
        pos: PosDoc,
    },
    Cast {
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        pos: PosDoc,
    },
    MethodRef {
        name: String,
        #[serde(default)]
        target_type: Option<String>,
        #[serde(default)]
        pos: PosDoc,
    },
    Lambda {
        #[serde(default)]
        params: Vec<ParamDoc>,
        #[serde(default)]
        body: Vec<BodyDoc>,
        #[serde(default)]
        pos: PosDoc,
    },
    #[serde(rename = "string")]
    StringConstant {
        value: String,
        #[serde(default)]
        pos: PosDoc,
    },
    Local {
        name: String,
        #[serde(default, rename = "type")]
        ty: Option<String>,
        #[serde(default)]
        pos: PosDoc,
    },
}

// =============================================================================
// Lowering
// =============================================================================

struct Lowering<'a> {
    path: &'a str,
    file: SourceFile,
}

impl Lowering<'_> {
    fn lower_type(&mut self, doc: &TypeDoc, parent: Option<SrcTypeId>) -> Result<(), FrontendError> {
        let ty = match (&doc.name, parent) {
            (Some(name), _) => self.file.add_type(name, parent, pos(doc.pos)),
            (None, Some(outer)) => self.file.add_anonymous_type(outer, pos(doc.pos)),
            (None, None) => {
                return Err(FrontendError::Syntax {
                    path: PathBuf::from(self.path),
                    message: "top-level type without a name".to_string(),
                });
            }
        };

        for field in &doc.fields {
            self.file.add_field(ty, &field.name, &field.ty, pos(field.pos));
        }
        for init in &doc.initializers {
            let method = if init.is_static {
                self.file.declare_static_initializer(ty, pos(init.pos))
            } else {
                self.file.add_instance_initializer(ty, pos(init.pos))
            };
            self.lower_body(method, &init.body, 0)?;
        }
        for method_doc in &doc.methods {
            let method = if method_doc.constructor {
                self.file.add_constructor(ty, pos(method_doc.pos))
            } else {
                self.file.add_method(
                    ty,
                    &method_doc.name,
                    method_doc.return_type.as_deref(),
                    method_doc.is_static,
                    pos(method_doc.pos),
                )
            };
            for param in &method_doc.params {
                self.file
                    .add_param(method, &param.name, param.ty.as_deref(), pos(param.pos));
            }
            self.lower_body(method, &method_doc.body, 0)?;
        }
        for type_use in &doc.type_uses {
            self.file.add_type_usage(ty, &type_use.name, pos(type_use.pos));
        }
        for nested in &doc.types {
            self.lower_type(nested, Some(ty))?;
        }
        Ok(())
    }

    fn lower_body(&mut self, method: SrcMethodId, body: &[BodyDoc], depth: usize) -> Result<(), FrontendError> {
        if depth > MAX_LAMBDA_NESTING {
            return Err(FrontendError::Syntax {
                path: PathBuf::from(self.path),
                message: format!("lambdas nested deeper than {MAX_LAMBDA_NESTING}"),
            });
        }
        for element in body {
            match element {
                BodyDoc::Call {
                    name,
                    args,
                    base,
                    assign_to,
                    pos: p,
                } => {
                    let call = self.file.add_invocation(method, name, *args, pos(*p));
                    let base = self.variable(method, base.as_deref());
                    let target = self.variable(method, assign_to.as_deref());
                    let record = self.file.invocation_mut(call);
                    record.base = base;
                    record.target = target;
                }
                BodyDoc::New {
                    ty,
                    dims,
                    assign_to,
                    pos: p,
                } => {
                    let alloc = self.file.add_allocation(method, ty, *dims, pos(*p));
                    let target = self.variable(method, assign_to.as_deref());
                    self.file.allocation_mut(alloc).target = target;
                }
                BodyDoc::Field { name, access, pos: p } => {
                    self.file.add_field_access(method, name, *access, pos(*p));
                }
                BodyDoc::OuterThis { qualifier, pos: p } => {
                    self.file.add_outer_this_access(method, qualifier, pos(*p));
                }
                BodyDoc::Cast { ty, pos: p } => {
                    self.file.add_cast(method, ty, pos(*p));
                }
                BodyDoc::MethodRef {
                    name,
                    target_type,
                    pos: p,
                } => {
                    self.file
                        .add_method_ref(method, name, target_type.as_deref(), pos(*p));
                }
                BodyDoc::Lambda { params, body, pos: p } => {
                    let lambda = self.file.add_lambda(method, pos(*p));
                    for param in params {
                        self.file
                            .add_param(lambda, &param.name, param.ty.as_deref(), pos(param.pos));
                    }
                    self.lower_body(lambda, body, depth + 1)?;
                }
                BodyDoc::StringConstant { value, pos: p } => {
                    self.file.add_string_constant(method, value, pos(*p));
                }
                BodyDoc::Local { name, ty, pos: p } => {
                    self.file.add_local(method, name, ty.as_deref(), pos(*p));
                }
            }
        }
        Ok(())
    }

    fn variable(&self, method: SrcMethodId, name: Option<&str>) -> Option<SrcVariableId> {
        let name = name?;
        let found = self.file.find_variable(method, name);
        if found.is_none() {
            tracing::debug!(path = self.path, variable = name, "unknown variable in source model");
        }
        found
    }
}

#[cfg(test)]
#[path = "../tests/model_frontend_tests.rs"]
mod model_frontend_tests;
