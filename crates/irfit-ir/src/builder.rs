//! Incremental construction of an [`IrPool`].
//!
//! Body element ids follow `<method-id>/<key>/<n>`, with a counter per
//! (method, key) pair, so the n-th call to `java.io.PrintStream.println` in a
//! method is `<p.A: void m()>/java.io.PrintStream.println/<n>`.

use crate::elements::*;
use crate::flags::IrModifiers;
use crate::ids::*;
use crate::pool::IrPool;
use irfit_common::names::{PARAMETER_VARIABLE_PREFIX, RECEIVER_VARIABLE, is_outer_this_field};
use irfit_common::{AccessKind, DiagnosticKind, MatchDiagnostic};
use rustc_hash::FxHashMap;

/// Key of lambda call sites.
const LAMBDA_KEY: &str = "$$lambda$$";
/// Key of cast instructions.
const CAST_KEY: &str = "assign-cast";

/// Result of [`IrPoolBuilder::finish`].
#[derive(Debug)]
pub struct IrBuild {
    pub pool: IrPool,
    pub diagnostics: Vec<MatchDiagnostic>,
}

/// Builds an [`IrPool`].
#[derive(Debug, Default)]
pub struct IrPoolBuilder {
    pool: IrPool,
    counters: FxHashMap<(IrMethodId, String), u32>,
}

/// Format a method id: `<Owner: Ret name(P1,P2)>`.
pub fn method_id<S: AsRef<str>>(owner: &str, return_type: &str, name: &str, params: &[S]) -> String {
    let params: Vec<&str> = params.iter().map(AsRef::as_ref).collect();
    format!("<{owner}: {return_type} {name}({})>", params.join(","))
}

/// Format a field id: `<Owner: type name>`.
pub fn field_id(owner: &str, ty: &str, name: &str) -> String {
    format!("<{owner}: {ty} {name}>")
}

impl IrPoolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Types and members
    // =========================================================================

    /// Add a type, or return the existing handle for `id`.
    pub fn add_type(&mut self, id: &str) -> IrTypeId {
        if let Some(&existing) = self.pool.types_by_id.get(id) {
            return existing;
        }
        let handle = IrTypeId(self.pool.types.len() as u32);
        self.pool.types.push(IrType {
            id: id.to_string(),
            line: None,
            modifiers: IrModifiers::empty(),
            super_types: Vec::new(),
            annotations: Vec::new(),
            referenced_types: Vec::new(),
            outer_types: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        });
        self.pool.types_by_id.insert(id.to_string(), handle);
        handle
    }

    pub fn set_type_line(&mut self, ty: IrTypeId, line: Option<u32>) {
        self.pool.types[ty.index()].line = line;
    }

    pub fn set_type_modifiers(&mut self, ty: IrTypeId, modifiers: IrModifiers) {
        self.pool.types[ty.index()].modifiers = modifiers;
    }

    pub fn add_super_type(&mut self, ty: IrTypeId, super_type: &str) {
        self.pool.types[ty.index()]
            .super_types
            .push(super_type.to_string());
    }

    pub fn add_annotation(&mut self, ty: IrTypeId, annotation: &str) {
        self.pool.types[ty.index()]
            .annotations
            .push(annotation.to_string());
    }

    pub fn add_referenced_type(&mut self, ty: IrTypeId, referenced: &str) {
        self.pool.types[ty.index()]
            .referenced_types
            .push(referenced.to_string());
    }

    /// Add a field. A `this$N` field records its type as an outer type of
    /// the declaring type.
    pub fn add_field(&mut self, ty: IrTypeId, name: &str, field_type: &str) -> IrFieldId {
        self.add_field_with_modifiers(ty, name, field_type, IrModifiers::empty())
    }

    pub fn add_field_with_modifiers(
        &mut self,
        ty: IrTypeId,
        name: &str,
        field_type: &str,
        modifiers: IrModifiers,
    ) -> IrFieldId {
        let handle = IrFieldId(self.pool.fields.len() as u32);
        let owner = &mut self.pool.types[ty.index()];
        let id = field_id(&owner.id, field_type, name);
        if is_outer_this_field(name) {
            tracing::trace!(owner = %owner.id, outer = field_type, "outer type via captured field");
            owner.outer_types.push(field_type.to_string());
        }
        owner.fields.push(handle);
        self.pool.fields.push(IrField {
            id,
            name: name.to_string(),
            ty: field_type.to_string(),
            declaring: ty,
            modifiers,
        });
        handle
    }

    /// Add a method with its `@this` (non-static only) and `@parameterN`
    /// variables. Returns the existing handle when the id is already known.
    pub fn add_method<S: AsRef<str>>(
        &mut self,
        ty: IrTypeId,
        name: &str,
        return_type: &str,
        params: &[S],
        modifiers: IrModifiers,
    ) -> IrMethodId {
        let id = method_id(&self.pool.types[ty.index()].id, return_type, name, params);
        if let Some(&existing) = self.pool.methods_by_id.get(&id) {
            return existing;
        }
        let handle = IrMethodId(self.pool.methods.len() as u32);

        let receiver = if modifiers.is_static() {
            None
        } else {
            Some(self.add_variable(handle, format!("{id}/{RECEIVER_VARIABLE}"), IrVariableKind::Receiver))
        };
        let param_vars = (0..params.len() as u32)
            .map(|i| {
                self.add_variable(
                    handle,
                    format!("{id}/{PARAMETER_VARIABLE_PREFIX}{i}"),
                    IrVariableKind::Parameter(i),
                )
            })
            .collect();

        self.pool.types[ty.index()].methods.push(handle);
        self.pool.methods_by_id.insert(id.clone(), handle);
        self.pool.methods.push(IrMethod {
            id,
            name: name.to_string(),
            declaring: ty,
            return_type: return_type.to_string(),
            param_types: params.iter().map(|p| p.as_ref().to_string()).collect(),
            modifiers,
            line: None,
            receiver,
            params: param_vars,
            invocations: Vec::new(),
            allocations: Vec::new(),
            field_accesses: Vec::new(),
            method_refs: Vec::new(),
            casts: Vec::new(),
            lambdas: Vec::new(),
        });
        handle
    }

    pub fn set_method_line(&mut self, method: IrMethodId, line: Option<u32>) {
        self.pool.methods[method.index()].line = line;
    }

    fn add_variable(&mut self, method: IrMethodId, id: String, kind: IrVariableKind) -> IrVariableId {
        let handle = IrVariableId(self.pool.variables.len() as u32);
        self.pool.variables.push(IrVariable { id, method, kind });
        handle
    }

    // =========================================================================
    // Method bodies
    // =========================================================================

    fn next_body_id(&mut self, method: IrMethodId, key: &str) -> String {
        let counter = self
            .counters
            .entry((method, key.to_string()))
            .or_insert(0);
        let id = format!("{}/{key}/{counter}", self.pool.methods[method.index()].id);
        *counter += 1;
        id
    }

    /// Add a call site; keyed by the invoked method's `Type.name`.
    pub fn add_invocation<S: AsRef<str>>(
        &mut self,
        method: IrMethodId,
        target_type: &str,
        name: &str,
        return_type: &str,
        params: &[S],
        line: Option<u32>,
    ) -> IrInvocationId {
        let id = self.next_body_id(method, &format!("{target_type}.{name}"));
        let handle = IrInvocationId(self.pool.invocations.len() as u32);
        self.pool.invocations.push(IrInvocation {
            id,
            method,
            target_type: target_type.to_string(),
            name: name.to_string(),
            return_type: return_type.to_string(),
            param_types: params.iter().map(|p| p.as_ref().to_string()).collect(),
            line,
        });
        self.pool.methods[method.index()].invocations.push(handle);
        handle
    }

    pub fn add_allocation(&mut self, method: IrMethodId, ty: &str, line: Option<u32>) -> IrAllocationId {
        let id = self.next_body_id(method, &format!("new {ty}"));
        let handle = IrAllocationId(self.pool.allocations.len() as u32);
        self.pool.allocations.push(IrAllocation {
            id,
            method,
            ty: ty.to_string(),
            line,
        });
        self.pool.methods[method.index()].allocations.push(handle);
        handle
    }

    pub fn add_field_access(
        &mut self,
        method: IrMethodId,
        name: &str,
        field_type: Option<&str>,
        kind: AccessKind,
        line: Option<u32>,
    ) -> IrFieldAccessId {
        let id = self.next_body_id(method, &format!("{}{name}", kind.id_prefix()));
        let handle = IrFieldAccessId(self.pool.field_accesses.len() as u32);
        self.pool.field_accesses.push(IrFieldAccess {
            id,
            method,
            name: name.to_string(),
            field_type: field_type.map(str::to_string),
            kind,
            line,
        });
        self.pool.methods[method.index()].field_accesses.push(handle);
        handle
    }

    pub fn add_method_ref(
        &mut self,
        method: IrMethodId,
        target_type: Option<&str>,
        name: &str,
        line: Option<u32>,
    ) -> IrMethodRefId {
        let id = self.next_body_id(method, &format!("<method-ref-{name}>"));
        let handle = IrMethodRefId(self.pool.method_refs.len() as u32);
        self.pool.method_refs.push(IrMethodRef {
            id,
            method,
            target_type: target_type.map(str::to_string),
            name: name.to_string(),
            line,
        });
        self.pool.methods[method.index()].method_refs.push(handle);
        handle
    }

    pub fn add_cast(&mut self, method: IrMethodId, ty: &str, line: Option<u32>) -> IrCastId {
        let id = self.next_body_id(method, CAST_KEY);
        let handle = IrCastId(self.pool.casts.len() as u32);
        self.pool.casts.push(IrCast {
            id,
            method,
            ty: ty.to_string(),
            line,
        });
        self.pool.methods[method.index()].casts.push(handle);
        handle
    }

    /// Add a lambda call site whose body is implemented by the method with id
    /// `implementation_id`. The link is resolved in [`finish`](Self::finish),
    /// so the implementation may be added later.
    pub fn add_lambda(
        &mut self,
        method: IrMethodId,
        implementation_id: &str,
        line: Option<u32>,
    ) -> IrLambdaId {
        let id = self.next_body_id(method, LAMBDA_KEY);
        let handle = IrLambdaId(self.pool.lambdas.len() as u32);
        self.pool.lambdas.push(IrLambda {
            id,
            method,
            implementation_id: implementation_id.to_string(),
            implementation: None,
            line,
        });
        self.pool.methods[method.index()].lambdas.push(handle);
        handle
    }

    // =========================================================================
    // Finish
    // =========================================================================

    /// Link lambdas to their implementation methods, index variable-arity
    /// methods and freeze the pool.
    pub fn finish(mut self) -> IrBuild {
        let mut diagnostics = Vec::new();

        // Pass 1: every method id is already indexed; collect the links.
        let links: Vec<Option<IrMethodId>> = self
            .pool
            .lambdas
            .iter()
            .map(|lambda| self.pool.methods_by_id.get(&lambda.implementation_id).copied())
            .collect();

        // Pass 2: resolve, reporting implementations that do not exist.
        for (lambda, link) in self.pool.lambdas.iter_mut().zip(links) {
            lambda.implementation = link;
            if link.is_none() {
                let owner = &self.pool.methods[lambda.method.index()];
                let file = &self.pool.types[owner.declaring.index()].id;
                tracing::warn!(
                    lambda = %lambda.id,
                    implementation = %lambda.implementation_id,
                    "lambda implementation method not found"
                );
                diagnostics.push(MatchDiagnostic::new(
                    DiagnosticKind::MissingInput,
                    file.clone(),
                    format!(
                        "lambda {} refers to missing implementation {}",
                        lambda.id, lambda.implementation_id
                    ),
                ));
            }
        }

        for method in &self.pool.methods {
            if !method.modifiers.is_varargs() {
                continue;
            }
            let owner = &self.pool.types[method.declaring.index()].id;
            let arities = self
                .pool
                .vararg_arities
                .entry(format!("{owner}.{}", method.name))
                .or_default();
            if !arities.contains(&method.arity()) {
                arities.push(method.arity());
                arities.sort_unstable();
            }
        }

        tracing::debug!(
            types = self.pool.types.len(),
            methods = self.pool.methods.len(),
            lambdas = self.pool.lambdas.len(),
            "IR pool built"
        );
        IrBuild {
            pool: self.pool,
            diagnostics,
        }
    }
}

#[cfg(test)]
#[path = "../tests/builder_tests.rs"]
mod builder_tests;
