//! Per-file arena of source elements.

use crate::elements::*;
use crate::ids::*;
use crate::imports::Import;
use irfit_common::names::{CLASS_INITIALIZER, CONSTRUCTOR, INSTANCE_INITIALIZER};
use irfit_common::{AccessKind, ElementKind, Position};

/// All source elements of one file, in document order.
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    /// Path relative to the source root, used in reports and diagnostics.
    pub path: String,
    pub package: String,
    pub imports: Vec<Import>,
    types: Vec<SrcType>,
    fields: Vec<SrcField>,
    methods: Vec<SrcMethod>,
    invocations: Vec<SrcInvocation>,
    allocations: Vec<SrcAllocation>,
    field_accesses: Vec<SrcFieldAccess>,
    casts: Vec<SrcCast>,
    method_refs: Vec<SrcMethodRef>,
    variables: Vec<SrcVariable>,
    string_constants: Vec<SrcStringConstant>,
    type_usages: Vec<SrcTypeUsage>,
    lambda_count: u32,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, package: impl Into<String>) -> Self {
        SourceFile {
            path: path.into(),
            package: package.into(),
            ..Default::default()
        }
    }

    pub fn add_import(&mut self, import: Import) {
        self.imports.push(import);
    }

    // =========================================================================
    // Types and members
    // =========================================================================

    /// Add a named type. Nested types take their binary name from `parent`.
    pub fn add_type(&mut self, name: &str, parent: Option<SrcTypeId>, pos: Option<Position>) -> SrcTypeId {
        let binary_name = match parent {
            Some(outer) => format!("{}${}", self.ty(outer).binary_name, name),
            None if self.package.is_empty() => name.to_string(),
            None => format!("{}.{}", self.package, name),
        };
        self.push_type(name.to_string(), binary_name, parent, false, pos)
    }

    /// Add an anonymous type nested in `parent`, numbered `Outer$1`,
    /// `Outer$2`, ... in declaration order.
    pub fn add_anonymous_type(&mut self, parent: SrcTypeId, pos: Option<Position>) -> SrcTypeId {
        let outer = &mut self.types[parent.index()];
        outer.anonymous_count += 1;
        let name = outer.anonymous_count.to_string();
        let binary_name = format!("{}${}", outer.binary_name, name);
        self.push_type(name, binary_name, Some(parent), true, pos)
    }

    fn push_type(
        &mut self,
        name: String,
        binary_name: String,
        parent: Option<SrcTypeId>,
        anonymous: bool,
        pos: Option<Position>,
    ) -> SrcTypeId {
        let id = SrcTypeId(self.types.len() as u32);
        self.types.push(SrcType {
            meta: ElementMeta::new(pos),
            name,
            binary_name,
            parent,
            anonymous,
            fields: Vec::new(),
            methods: Vec::new(),
            class_initializer: SrcMethodId::NONE,
            type_usages: Vec::new(),
            anonymous_count: 0,
        });
        let clinit = self.push_method(
            MethodKind::ClassInitializer,
            id,
            None,
            CLASS_INITIALIZER,
            None,
            true,
            true,
            pos,
        );
        self.types[id.index()].class_initializer = clinit;
        id
    }

    pub fn add_field(&mut self, ty: SrcTypeId, name: &str, field_type: &str, pos: Option<Position>) -> SrcFieldId {
        self.push_field(ty, name, field_type, ElementMeta::new(pos))
    }

    /// Placeholder field positioned at its declaring type.
    pub fn add_placeholder_field(&mut self, ty: SrcTypeId, name: &str, field_type: &str) -> SrcFieldId {
        let pos = self.ty(ty).meta.pos;
        self.push_field(ty, name, field_type, ElementMeta::placeholder(pos))
    }

    fn push_field(&mut self, ty: SrcTypeId, name: &str, field_type: &str, meta: ElementMeta) -> SrcFieldId {
        let id = SrcFieldId(self.fields.len() as u32);
        self.fields.push(SrcField {
            meta,
            declaring: ty,
            name: name.to_string(),
            ty: field_type.to_string(),
        });
        self.types[ty.index()].fields.push(id);
        id
    }

    pub fn add_method(
        &mut self,
        ty: SrcTypeId,
        name: &str,
        return_type: Option<&str>,
        is_static: bool,
        pos: Option<Position>,
    ) -> SrcMethodId {
        self.push_method(MethodKind::Regular, ty, None, name, return_type, is_static, false, pos)
    }

    pub fn add_constructor(&mut self, ty: SrcTypeId, pos: Option<Position>) -> SrcMethodId {
        self.add_method(ty, CONSTRUCTOR, None, false, pos)
    }

    /// An instance initializer block, modeled as an `<init>-block`
    /// pseudo-method.
    pub fn add_instance_initializer(&mut self, ty: SrcTypeId, pos: Option<Position>) -> SrcMethodId {
        self.push_method(
            MethodKind::InstanceInitializer,
            ty,
            None,
            INSTANCE_INITIALIZER,
            None,
            false,
            false,
            pos,
        )
    }

    /// The `<clinit>` of `ty`, marked as declared by a static initializer.
    pub fn declare_static_initializer(&mut self, ty: SrcTypeId, pos: Option<Position>) -> SrcMethodId {
        let clinit = self.ty(ty).class_initializer;
        let method = &mut self.methods[clinit.index()];
        if method.implicit {
            method.implicit = false;
            if pos.is_some() {
                method.meta.pos = pos;
            }
        }
        clinit
    }

    /// A lambda nested in `parent`; it belongs to the parent's type.
    pub fn add_lambda(&mut self, parent: SrcMethodId, pos: Option<Position>) -> SrcMethodId {
        let declaring = self.method(parent).declaring;
        let name = format!("lambda${}", self.lambda_count);
        self.lambda_count += 1;
        let id = self.push_method(MethodKind::Lambda, declaring, Some(parent), &name, None, true, false, pos);
        self.methods[parent.index()].lambdas.push(id);
        id
    }

    fn push_method(
        &mut self,
        kind: MethodKind,
        ty: SrcTypeId,
        parent: Option<SrcMethodId>,
        name: &str,
        return_type: Option<&str>,
        is_static: bool,
        implicit: bool,
        pos: Option<Position>,
    ) -> SrcMethodId {
        let id = SrcMethodId(self.methods.len() as u32);
        self.methods.push(SrcMethod {
            meta: ElementMeta::new(pos),
            kind,
            declaring: ty,
            parent,
            name: name.to_string(),
            return_type: return_type.map(str::to_string),
            is_static,
            implicit,
            receiver: None,
            params: Vec::new(),
            locals: Vec::new(),
            invocations: Vec::new(),
            allocations: Vec::new(),
            field_accesses: Vec::new(),
            casts: Vec::new(),
            method_refs: Vec::new(),
            lambdas: Vec::new(),
            string_constants: Vec::new(),
        });
        if !is_static {
            let receiver = self.push_variable(id, "this", None, VariableKind::Receiver, pos);
            self.methods[id.index()].receiver = Some(receiver);
        }
        if kind != MethodKind::Lambda {
            self.types[ty.index()].methods.push(id);
        }
        id
    }

    // =========================================================================
    // Variables
    // =========================================================================

    pub fn add_param(
        &mut self,
        method: SrcMethodId,
        name: &str,
        ty: Option<&str>,
        pos: Option<Position>,
    ) -> SrcVariableId {
        let index = self.method(method).params.len() as u32;
        let id = self.push_variable(method, name, ty, VariableKind::Parameter(index), pos);
        self.methods[method.index()].params.push(id);
        id
    }

    pub fn add_local(
        &mut self,
        method: SrcMethodId,
        name: &str,
        ty: Option<&str>,
        pos: Option<Position>,
    ) -> SrcVariableId {
        let id = self.push_variable(method, name, ty, VariableKind::Local, pos);
        self.methods[method.index()].locals.push(id);
        id
    }

    fn push_variable(
        &mut self,
        method: SrcMethodId,
        name: &str,
        ty: Option<&str>,
        kind: VariableKind,
        pos: Option<Position>,
    ) -> SrcVariableId {
        let id = SrcVariableId(self.variables.len() as u32);
        let symbol = format!("{}/{}", self.qualified_method_name(method), name);
        self.variables.push(SrcVariable {
            meta: ElementMeta::new(pos),
            method,
            name: name.to_string(),
            ty: ty.map(str::to_string),
            kind,
            symbol,
        });
        id
    }

    /// Resolve a variable name visible in `method`: `this`, locals and
    /// parameters of the method, then of enclosing methods (lambdas).
    pub fn find_variable(&self, method: SrcMethodId, name: &str) -> Option<SrcVariableId> {
        let mut current = Some(method);
        while let Some(m) = current {
            let record = self.method(m);
            if name == "this" {
                if let Some(receiver) = record.receiver {
                    return Some(receiver);
                }
            } else if let Some(&found) = record
                .locals
                .iter()
                .rev()
                .chain(record.params.iter())
                .find(|&&v| self.variable(v).name == name)
            {
                return Some(found);
            }
            current = record.parent;
        }
        None
    }

    // =========================================================================
    // Method bodies
    // =========================================================================

    pub fn add_invocation(
        &mut self,
        method: SrcMethodId,
        name: &str,
        arity: usize,
        pos: Option<Position>,
    ) -> SrcInvocationId {
        self.push_invocation(method, name, arity, ElementMeta::new(pos))
    }

    /// Placeholder call attributed to `method` at `line`.
    pub fn add_placeholder_invocation(
        &mut self,
        method: SrcMethodId,
        name: &str,
        arity: usize,
        line: u32,
    ) -> SrcInvocationId {
        self.push_invocation(method, name, arity, ElementMeta::placeholder(Some(Position::line(line))))
    }

    fn push_invocation(&mut self, method: SrcMethodId, name: &str, arity: usize, meta: ElementMeta) -> SrcInvocationId {
        let id = SrcInvocationId(self.invocations.len() as u32);
        self.invocations.push(SrcInvocation {
            meta,
            method,
            name: name.to_string(),
            arity,
            base: None,
            target: None,
        });
        self.methods[method.index()].invocations.push(id);
        id
    }

    pub fn add_allocation(
        &mut self,
        method: SrcMethodId,
        ty: &str,
        dimensions: u32,
        pos: Option<Position>,
    ) -> SrcAllocationId {
        self.push_allocation(method, ty, dimensions, ElementMeta::new(pos))
    }

    /// Placeholder allocation attributed to `method` at `line`.
    pub fn add_placeholder_allocation(&mut self, method: SrcMethodId, ty: &str, line: u32) -> SrcAllocationId {
        let dimensions = ty.matches("[]").count() as u32;
        self.push_allocation(method, ty, dimensions, ElementMeta::placeholder(Some(Position::line(line))))
    }

    fn push_allocation(&mut self, method: SrcMethodId, ty: &str, dimensions: u32, meta: ElementMeta) -> SrcAllocationId {
        let id = SrcAllocationId(self.allocations.len() as u32);
        self.allocations.push(SrcAllocation {
            meta,
            method,
            ty: ty.to_string(),
            dimensions,
            target: None,
        });
        self.methods[method.index()].allocations.push(id);
        id
    }

    pub fn add_field_access(
        &mut self,
        method: SrcMethodId,
        name: &str,
        kind: AccessKind,
        pos: Option<Position>,
    ) -> SrcFieldAccessId {
        self.push_field_access(method, name, kind, None, pos)
    }

    /// An `Outer.this` expression, read through the captured outer instance.
    pub fn add_outer_this_access(
        &mut self,
        method: SrcMethodId,
        qualifier: &str,
        pos: Option<Position>,
    ) -> SrcFieldAccessId {
        self.push_field_access(method, "this", AccessKind::Read, Some(qualifier.to_string()), pos)
    }

    fn push_field_access(
        &mut self,
        method: SrcMethodId,
        name: &str,
        kind: AccessKind,
        outer_this: Option<String>,
        pos: Option<Position>,
    ) -> SrcFieldAccessId {
        let id = SrcFieldAccessId(self.field_accesses.len() as u32);
        self.field_accesses.push(SrcFieldAccess {
            meta: ElementMeta::new(pos),
            method,
            name: name.to_string(),
            kind,
            outer_this,
        });
        self.methods[method.index()].field_accesses.push(id);
        id
    }

    pub fn add_cast(&mut self, method: SrcMethodId, ty: &str, pos: Option<Position>) -> SrcCastId {
        let id = SrcCastId(self.casts.len() as u32);
        self.casts.push(SrcCast {
            meta: ElementMeta::new(pos),
            method,
            ty: ty.to_string(),
        });
        self.methods[method.index()].casts.push(id);
        id
    }

    pub fn add_method_ref(
        &mut self,
        method: SrcMethodId,
        name: &str,
        target_type: Option<&str>,
        pos: Option<Position>,
    ) -> SrcMethodRefId {
        let id = SrcMethodRefId(self.method_refs.len() as u32);
        self.method_refs.push(SrcMethodRef {
            meta: ElementMeta::new(pos),
            method,
            name: name.to_string(),
            target_type: target_type.map(str::to_string),
        });
        self.methods[method.index()].method_refs.push(id);
        id
    }

    pub fn add_string_constant(
        &mut self,
        method: SrcMethodId,
        value: &str,
        pos: Option<Position>,
    ) -> SrcStringConstantId {
        let id = SrcStringConstantId(self.string_constants.len() as u32);
        self.string_constants.push(SrcStringConstant {
            meta: ElementMeta::new(pos),
            method,
            value: value.to_string(),
        });
        self.methods[method.index()].string_constants.push(id);
        id
    }

    pub fn add_type_usage(&mut self, ty: SrcTypeId, name: &str, pos: Option<Position>) -> SrcTypeUsageId {
        let id = SrcTypeUsageId(self.type_usages.len() as u32);
        self.type_usages.push(SrcTypeUsage {
            meta: ElementMeta::new(pos),
            declaring: ty,
            name: name.to_string(),
            resolved: None,
        });
        self.types[ty.index()].type_usages.push(id);
        id
    }

    // =========================================================================
    // Access
    // =========================================================================

    #[inline]
    pub fn ty(&self, id: SrcTypeId) -> &SrcType {
        &self.types[id.index()]
    }

    #[inline]
    pub fn field(&self, id: SrcFieldId) -> &SrcField {
        &self.fields[id.index()]
    }

    #[inline]
    pub fn method(&self, id: SrcMethodId) -> &SrcMethod {
        &self.methods[id.index()]
    }

    #[inline]
    pub fn invocation(&self, id: SrcInvocationId) -> &SrcInvocation {
        &self.invocations[id.index()]
    }

    pub fn invocation_mut(&mut self, id: SrcInvocationId) -> &mut SrcInvocation {
        &mut self.invocations[id.index()]
    }

    #[inline]
    pub fn allocation(&self, id: SrcAllocationId) -> &SrcAllocation {
        &self.allocations[id.index()]
    }

    pub fn allocation_mut(&mut self, id: SrcAllocationId) -> &mut SrcAllocation {
        &mut self.allocations[id.index()]
    }

    #[inline]
    pub fn field_access(&self, id: SrcFieldAccessId) -> &SrcFieldAccess {
        &self.field_accesses[id.index()]
    }

    #[inline]
    pub fn cast(&self, id: SrcCastId) -> &SrcCast {
        &self.casts[id.index()]
    }

    #[inline]
    pub fn method_ref(&self, id: SrcMethodRefId) -> &SrcMethodRef {
        &self.method_refs[id.index()]
    }

    #[inline]
    pub fn variable(&self, id: SrcVariableId) -> &SrcVariable {
        &self.variables[id.index()]
    }

    #[inline]
    pub fn string_constant(&self, id: SrcStringConstantId) -> &SrcStringConstant {
        &self.string_constants[id.index()]
    }

    #[inline]
    pub fn type_usage(&self, id: SrcTypeUsageId) -> &SrcTypeUsage {
        &self.type_usages[id.index()]
    }

    pub fn type_usage_mut(&mut self, id: SrcTypeUsageId) -> &mut SrcTypeUsage {
        &mut self.type_usages[id.index()]
    }

    /// Type ids in document order.
    pub fn type_ids(&self) -> impl Iterator<Item = SrcTypeId> + use<> {
        (0..self.types.len() as u32).map(SrcTypeId)
    }

    /// Every element of `kind`, in document order.
    pub fn elements(&self, kind: ElementKind) -> Vec<SourceElementRef> {
        fn all<T>(items: &[T], wrap: impl Fn(u32) -> SourceElementRef) -> Vec<SourceElementRef> {
            (0..items.len() as u32).map(wrap).collect()
        }
        match kind {
            ElementKind::Type => all(&self.types, |i| SrcTypeId(i).into()),
            ElementKind::Field => all(&self.fields, |i| SrcFieldId(i).into()),
            ElementKind::Method | ElementKind::Lambda => {
                let want_lambda = kind == ElementKind::Lambda;
                self.methods
                    .iter()
                    .enumerate()
                    .filter(|(_, m)| (m.kind == MethodKind::Lambda) == want_lambda)
                    .map(|(i, _)| SrcMethodId(i as u32).into())
                    .collect()
            }
            ElementKind::Invocation => all(&self.invocations, |i| SrcInvocationId(i).into()),
            ElementKind::Allocation => all(&self.allocations, |i| SrcAllocationId(i).into()),
            ElementKind::FieldAccess => all(&self.field_accesses, |i| SrcFieldAccessId(i).into()),
            ElementKind::MethodRef => all(&self.method_refs, |i| SrcMethodRefId(i).into()),
            ElementKind::Cast => all(&self.casts, |i| SrcCastId(i).into()),
            ElementKind::Variable => all(&self.variables, |i| SrcVariableId(i).into()),
            ElementKind::StringConstant => all(&self.string_constants, |i| SrcStringConstantId(i).into()),
            ElementKind::TypeUsage => all(&self.type_usages, |i| SrcTypeUsageId(i).into()),
        }
    }

    pub fn meta(&self, element: SourceElementRef) -> &ElementMeta {
        match element {
            SourceElementRef::Type(id) => &self.types[id.index()].meta,
            SourceElementRef::Field(id) => &self.fields[id.index()].meta,
            SourceElementRef::Method(id) => &self.methods[id.index()].meta,
            SourceElementRef::Invocation(id) => &self.invocations[id.index()].meta,
            SourceElementRef::Allocation(id) => &self.allocations[id.index()].meta,
            SourceElementRef::FieldAccess(id) => &self.field_accesses[id.index()].meta,
            SourceElementRef::Cast(id) => &self.casts[id.index()].meta,
            SourceElementRef::MethodRef(id) => &self.method_refs[id.index()].meta,
            SourceElementRef::Variable(id) => &self.variables[id.index()].meta,
            SourceElementRef::StringConstant(id) => &self.string_constants[id.index()].meta,
            SourceElementRef::TypeUsage(id) => &self.type_usages[id.index()].meta,
        }
    }

    fn meta_mut(&mut self, element: SourceElementRef) -> &mut ElementMeta {
        match element {
            SourceElementRef::Type(id) => &mut self.types[id.index()].meta,
            SourceElementRef::Field(id) => &mut self.fields[id.index()].meta,
            SourceElementRef::Method(id) => &mut self.methods[id.index()].meta,
            SourceElementRef::Invocation(id) => &mut self.invocations[id.index()].meta,
            SourceElementRef::Allocation(id) => &mut self.allocations[id.index()].meta,
            SourceElementRef::FieldAccess(id) => &mut self.field_accesses[id.index()].meta,
            SourceElementRef::Cast(id) => &mut self.casts[id.index()].meta,
            SourceElementRef::MethodRef(id) => &mut self.method_refs[id.index()].meta,
            SourceElementRef::Variable(id) => &mut self.variables[id.index()].meta,
            SourceElementRef::StringConstant(id) => &mut self.string_constants[id.index()].meta,
            SourceElementRef::TypeUsage(id) => &mut self.type_usages[id.index()].meta,
        }
    }

    /// Attach `link` to `element`. Links are write-once: returns `false` and
    /// leaves the element untouched if it is already linked.
    pub fn set_link(&mut self, element: SourceElementRef, link: MatchLink) -> bool {
        let meta = self.meta_mut(element);
        if meta.link.is_some() {
            return false;
        }
        meta.link = Some(link);
        true
    }

    // =========================================================================
    // Naming helpers
    // =========================================================================

    /// `pkg.Type.method`, used for variable symbols and log fields.
    pub fn qualified_method_name(&self, method: SrcMethodId) -> String {
        let record = self.method(method);
        format!("{}.{}", self.ty(record.declaring).binary_name, record.name)
    }

    /// Declared types of a method's parameters, in order.
    pub fn param_types(&self, method: SrcMethodId) -> Vec<Option<&str>> {
        self.method(method)
            .params
            .iter()
            .map(|&p| self.variable(p).ty.as_deref())
            .collect()
    }

    /// Enclosing types of `ty`, outermost first (excluding `ty`).
    pub fn enclosing_types(&self, ty: SrcTypeId) -> Vec<SrcTypeId> {
        let mut chain = Vec::new();
        let mut current = self.ty(ty).parent;
        while let Some(outer) = current {
            chain.push(outer);
            current = self.ty(outer).parent;
        }
        chain.reverse();
        chain
    }

    /// Short human-readable label of an element for reports.
    pub fn display_name(&self, element: SourceElementRef) -> String {
        match element {
            SourceElementRef::Type(id) => self.ty(id).binary_name.clone(),
            SourceElementRef::Field(id) => self.field(id).name.clone(),
            SourceElementRef::Method(id) => self.method(id).name.clone(),
            SourceElementRef::Invocation(id) => self.invocation(id).name.clone(),
            SourceElementRef::Allocation(id) => format!("new {}", self.allocation(id).ty),
            SourceElementRef::FieldAccess(id) => {
                let access = self.field_access(id);
                match &access.outer_this {
                    Some(qualifier) => format!("{qualifier}.this"),
                    None => access.name.clone(),
                }
            }
            SourceElementRef::Cast(id) => format!("({})", self.cast(id).ty),
            SourceElementRef::MethodRef(id) => format!("::{}", self.method_ref(id).name),
            SourceElementRef::Variable(id) => self.variable(id).name.clone(),
            SourceElementRef::StringConstant(id) => self.string_constant(id).value.clone(),
            SourceElementRef::TypeUsage(id) => self.type_usage(id).name.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/file_tests.rs"]
mod file_tests;
