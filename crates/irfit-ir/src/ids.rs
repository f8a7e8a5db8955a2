//! Typed handles into the IR pool.

use irfit_common::ElementKind;

macro_rules! ir_handle {
    ($($(#[$doc:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(pub u32);

            impl $name {
                pub const NONE: $name = $name(u32::MAX);

                #[inline]
                pub fn is_none(&self) -> bool {
                    self.0 == u32::MAX
                }

                #[inline]
                pub fn index(self) -> usize {
                    self.0 as usize
                }
            }
        )+
    };
}

ir_handle!(
    /// Handle of an [`IrType`](crate::IrType).
    IrTypeId,
    /// Handle of an [`IrField`](crate::IrField).
    IrFieldId,
    /// Handle of an [`IrMethod`](crate::IrMethod).
    IrMethodId,
    IrInvocationId,
    IrAllocationId,
    IrFieldAccessId,
    IrMethodRefId,
    IrCastId,
    IrLambdaId,
    IrVariableId,
);

/// A handle to any IR element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrElementRef {
    Type(IrTypeId),
    Field(IrFieldId),
    Method(IrMethodId),
    Invocation(IrInvocationId),
    Allocation(IrAllocationId),
    FieldAccess(IrFieldAccessId),
    MethodRef(IrMethodRefId),
    Cast(IrCastId),
    Lambda(IrLambdaId),
    Variable(IrVariableId),
}

impl IrElementRef {
    pub const fn kind(self) -> ElementKind {
        match self {
            IrElementRef::Type(_) => ElementKind::Type,
            IrElementRef::Field(_) => ElementKind::Field,
            IrElementRef::Method(_) => ElementKind::Method,
            IrElementRef::Invocation(_) => ElementKind::Invocation,
            IrElementRef::Allocation(_) => ElementKind::Allocation,
            IrElementRef::FieldAccess(_) => ElementKind::FieldAccess,
            IrElementRef::MethodRef(_) => ElementKind::MethodRef,
            IrElementRef::Cast(_) => ElementKind::Cast,
            IrElementRef::Lambda(_) => ElementKind::Lambda,
            IrElementRef::Variable(_) => ElementKind::Variable,
        }
    }

    /// Arena index within the element's kind.
    pub const fn index(self) -> usize {
        match self {
            IrElementRef::Type(id) => id.0 as usize,
            IrElementRef::Field(id) => id.0 as usize,
            IrElementRef::Method(id) => id.0 as usize,
            IrElementRef::Invocation(id) => id.0 as usize,
            IrElementRef::Allocation(id) => id.0 as usize,
            IrElementRef::FieldAccess(id) => id.0 as usize,
            IrElementRef::MethodRef(id) => id.0 as usize,
            IrElementRef::Cast(id) => id.0 as usize,
            IrElementRef::Lambda(id) => id.0 as usize,
            IrElementRef::Variable(id) => id.0 as usize,
        }
    }
}

macro_rules! impl_from_handle {
    ($($variant:ident($ty:ident)),+ $(,)?) => {
        $(
            impl From<$ty> for IrElementRef {
                fn from(id: $ty) -> Self {
                    IrElementRef::$variant(id)
                }
            }
        )+
    };
}

impl_from_handle!(
    Type(IrTypeId),
    Field(IrFieldId),
    Method(IrMethodId),
    Invocation(IrInvocationId),
    Allocation(IrAllocationId),
    FieldAccess(IrFieldAccessId),
    MethodRef(IrMethodRefId),
    Cast(IrCastId),
    Lambda(IrLambdaId),
    Variable(IrVariableId),
);
