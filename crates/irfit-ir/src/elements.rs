//! IR element records.
//!
//! Body elements keep a back-reference to their enclosing method; the
//! per-kind lists on [`IrMethod`] hold them in appearance order.

use crate::flags::IrModifiers;
use crate::ids::*;
use irfit_common::AccessKind;

/// A class or interface, identified by its binary name (`p.Outer$Inner`).
#[derive(Debug, Clone)]
pub struct IrType {
    pub id: String,
    pub line: Option<u32>,
    pub modifiers: IrModifiers,
    /// Direct supertypes (superclass first, then interfaces).
    pub super_types: Vec<String>,
    pub annotations: Vec<String>,
    /// Types named anywhere in the compiled type (signatures, constant pool).
    pub referenced_types: Vec<String>,
    /// Enclosing types whose instance is captured through a `this$N` field.
    pub outer_types: Vec<String>,
    pub fields: Vec<IrFieldId>,
    pub methods: Vec<IrMethodId>,
}

/// A field, identified as `<Owner: type name>`.
#[derive(Debug, Clone)]
pub struct IrField {
    pub id: String,
    pub name: String,
    pub ty: String,
    pub declaring: IrTypeId,
    pub modifiers: IrModifiers,
}

/// A method, identified as `<Owner: Ret name(P1,P2)>`.
#[derive(Debug, Clone)]
pub struct IrMethod {
    pub id: String,
    pub name: String,
    pub declaring: IrTypeId,
    pub return_type: String,
    pub param_types: Vec<String>,
    pub modifiers: IrModifiers,
    pub line: Option<u32>,
    /// `@this` variable; absent for static methods.
    pub receiver: Option<IrVariableId>,
    /// `@parameterN` variables, one per declared parameter.
    pub params: Vec<IrVariableId>,
    pub invocations: Vec<IrInvocationId>,
    pub allocations: Vec<IrAllocationId>,
    pub field_accesses: Vec<IrFieldAccessId>,
    pub method_refs: Vec<IrMethodRefId>,
    pub casts: Vec<IrCastId>,
    pub lambdas: Vec<IrLambdaId>,
}

impl IrMethod {
    #[inline]
    pub fn arity(&self) -> usize {
        self.param_types.len()
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }
}

/// A call site.
#[derive(Debug, Clone)]
pub struct IrInvocation {
    pub id: String,
    pub method: IrMethodId,
    /// Declared type of the invoked method.
    pub target_type: String,
    pub name: String,
    pub return_type: String,
    pub param_types: Vec<String>,
    pub line: Option<u32>,
}

impl IrInvocation {
    #[inline]
    pub fn arity(&self) -> usize {
        self.param_types.len()
    }

    /// `Type.name` of the invoked method.
    pub fn naming_id(&self) -> String {
        format!("{}.{}", self.target_type, self.name)
    }
}

/// An object or array creation site.
#[derive(Debug, Clone)]
pub struct IrAllocation {
    pub id: String,
    pub method: IrMethodId,
    pub ty: String,
    pub line: Option<u32>,
}

/// A field read or write.
#[derive(Debug, Clone)]
pub struct IrFieldAccess {
    pub id: String,
    pub method: IrMethodId,
    pub name: String,
    pub field_type: Option<String>,
    pub kind: AccessKind,
    pub line: Option<u32>,
}

/// A method reference (`Type::name`).
#[derive(Debug, Clone)]
pub struct IrMethodRef {
    pub id: String,
    pub method: IrMethodId,
    pub target_type: Option<String>,
    pub name: String,
    pub line: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct IrCast {
    pub id: String,
    pub method: IrMethodId,
    pub ty: String,
    pub line: Option<u32>,
}

/// A synthetic lambda call site and the method implementing its body.
#[derive(Debug, Clone)]
pub struct IrLambda {
    pub id: String,
    pub method: IrMethodId,
    /// Method id of the implementation, as recorded by the producer.
    pub implementation_id: String,
    /// Resolved by [`IrPoolBuilder::finish`](crate::IrPoolBuilder::finish).
    pub implementation: Option<IrMethodId>,
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrVariableKind {
    Receiver,
    Parameter(u32),
}

/// A method variable slot (`m/@this`, `m/@parameterN`).
#[derive(Debug, Clone)]
pub struct IrVariable {
    pub id: String,
    pub method: IrMethodId,
    pub kind: IrVariableKind,
}
