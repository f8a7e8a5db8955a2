//! Source element records.

use crate::ids::*;
use irfit_common::{AccessKind, Position};
use irfit_ir::IrElementRef;

/// Write-once association of a source element with an IR element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchLink {
    pub ir: IrElementRef,
    pub ir_id: String,
}

/// State shared by every source element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementMeta {
    pub pos: Option<Position>,
    pub link: Option<MatchLink>,
    /// `false` for placeholders synthesized from unmatched IR elements.
    pub authoritative: bool,
}

impl ElementMeta {
    pub fn new(pos: Option<Position>) -> Self {
        ElementMeta {
            pos,
            link: None,
            authoritative: true,
        }
    }

    pub fn placeholder(pos: Option<Position>) -> Self {
        ElementMeta {
            pos,
            link: None,
            authoritative: false,
        }
    }

    #[inline]
    pub fn is_matched(&self) -> bool {
        self.link.is_some()
    }

    pub fn start_line(&self) -> Option<u32> {
        self.pos.map(|p| p.start_line)
    }
}

#[derive(Debug, Clone)]
pub struct SrcType {
    pub meta: ElementMeta,
    /// Unqualified name as written; the anonymous index for anonymous types.
    pub name: String,
    /// Binary name: `pkg.Outer$Inner`.
    pub binary_name: String,
    pub parent: Option<SrcTypeId>,
    pub anonymous: bool,
    pub fields: Vec<SrcFieldId>,
    /// Declared methods plus initializer pseudo-methods; lambdas hang off
    /// their enclosing method.
    pub methods: Vec<SrcMethodId>,
    /// Implicit `<clinit>` collecting static initializer bodies.
    pub class_initializer: SrcMethodId,
    pub type_usages: Vec<SrcTypeUsageId>,
    pub(crate) anonymous_count: u32,
}

#[derive(Debug, Clone)]
pub struct SrcField {
    pub meta: ElementMeta,
    pub declaring: SrcTypeId,
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Methods and constructors (`<init>`).
    Regular,
    ClassInitializer,
    InstanceInitializer,
    Lambda,
}

#[derive(Debug, Clone)]
pub struct SrcMethod {
    pub meta: ElementMeta,
    pub kind: MethodKind,
    pub declaring: SrcTypeId,
    /// Enclosing method of a lambda.
    pub parent: Option<SrcMethodId>,
    /// Low-level name: constructors are `<init>`.
    pub name: String,
    /// Absent for constructors, initializers and lambdas.
    pub return_type: Option<String>,
    pub is_static: bool,
    /// Created by the model rather than declared in source.
    pub implicit: bool,
    pub receiver: Option<SrcVariableId>,
    pub params: Vec<SrcVariableId>,
    pub locals: Vec<SrcVariableId>,
    pub invocations: Vec<SrcInvocationId>,
    pub allocations: Vec<SrcAllocationId>,
    pub field_accesses: Vec<SrcFieldAccessId>,
    pub casts: Vec<SrcCastId>,
    pub method_refs: Vec<SrcMethodRefId>,
    pub lambdas: Vec<SrcMethodId>,
    pub string_constants: Vec<SrcStringConstantId>,
}

impl SrcMethod {
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Regular && self.name == irfit_common::names::CONSTRUCTOR
    }
}

#[derive(Debug, Clone)]
pub struct SrcInvocation {
    pub meta: ElementMeta,
    pub method: SrcMethodId,
    pub name: String,
    pub arity: usize,
    /// Variable the call is made on.
    pub base: Option<SrcVariableId>,
    /// Variable the result is assigned to.
    pub target: Option<SrcVariableId>,
}

#[derive(Debug, Clone)]
pub struct SrcAllocation {
    pub meta: ElementMeta,
    pub method: SrcMethodId,
    pub ty: String,
    /// Array dimensions; zero for object creation.
    pub dimensions: u32,
    pub target: Option<SrcVariableId>,
}

#[derive(Debug, Clone)]
pub struct SrcFieldAccess {
    pub meta: ElementMeta,
    pub method: SrcMethodId,
    pub name: String,
    pub kind: AccessKind,
    /// Qualifying type of an `Outer.this` expression.
    pub outer_this: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SrcCast {
    pub meta: ElementMeta,
    pub method: SrcMethodId,
    pub ty: String,
}

#[derive(Debug, Clone)]
pub struct SrcMethodRef {
    pub meta: ElementMeta,
    pub method: SrcMethodId,
    pub name: String,
    pub target_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Receiver,
    Parameter(u32),
    Local,
}

#[derive(Debug, Clone)]
pub struct SrcVariable {
    pub meta: ElementMeta,
    pub method: SrcMethodId,
    pub name: String,
    pub ty: Option<String>,
    pub kind: VariableKind,
    /// Stable symbol id (`pkg.Type.method/name`) used by the alias map.
    pub symbol: String,
}

#[derive(Debug, Clone)]
pub struct SrcStringConstant {
    pub meta: ElementMeta,
    pub method: SrcMethodId,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct SrcTypeUsage {
    pub meta: ElementMeta,
    pub declaring: SrcTypeId,
    pub name: String,
    /// Filled in by type-use resolution.
    pub resolved: Option<String>,
}
