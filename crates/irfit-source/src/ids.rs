//! Typed handles into a [`SourceFile`](crate::SourceFile) arena.

use irfit_common::ElementKind;

macro_rules! src_handle {
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

src_handle!(
    /// Index of a source file within a matching session.
    FileId,
    SrcTypeId,
    SrcFieldId,
    /// Methods, constructors, initializer pseudo-methods and lambdas.
    SrcMethodId,
    SrcInvocationId,
    SrcAllocationId,
    SrcFieldAccessId,
    SrcCastId,
    SrcMethodRefId,
    SrcVariableId,
    SrcStringConstantId,
    SrcTypeUsageId,
);

/// A handle to any source element of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceElementRef {
    Type(SrcTypeId),
    Field(SrcFieldId),
    Method(SrcMethodId),
    Invocation(SrcInvocationId),
    Allocation(SrcAllocationId),
    FieldAccess(SrcFieldAccessId),
    Cast(SrcCastId),
    MethodRef(SrcMethodRefId),
    Variable(SrcVariableId),
    StringConstant(SrcStringConstantId),
    TypeUsage(SrcTypeUsageId),
}

impl SourceElementRef {
    pub const fn kind(self) -> ElementKind {
        match self {
            SourceElementRef::Type(_) => ElementKind::Type,
            SourceElementRef::Field(_) => ElementKind::Field,
            SourceElementRef::Method(_) => ElementKind::Method,
            SourceElementRef::Invocation(_) => ElementKind::Invocation,
            SourceElementRef::Allocation(_) => ElementKind::Allocation,
            SourceElementRef::FieldAccess(_) => ElementKind::FieldAccess,
            SourceElementRef::Cast(_) => ElementKind::Cast,
            SourceElementRef::MethodRef(_) => ElementKind::MethodRef,
            SourceElementRef::Variable(_) => ElementKind::Variable,
            SourceElementRef::StringConstant(_) => ElementKind::StringConstant,
            SourceElementRef::TypeUsage(_) => ElementKind::TypeUsage,
        }
    }
}

macro_rules! impl_from_handle {
    ($($variant:ident($ty:ident)),+ $(,)?) => {
        $(
            impl From<$ty> for SourceElementRef {
                fn from(id: $ty) -> Self {
                    SourceElementRef::$variant(id)
                }
            }
        )+
    };
}

impl_from_handle!(
    Type(SrcTypeId),
    Field(SrcFieldId),
    Method(SrcMethodId),
    Invocation(SrcInvocationId),
    Allocation(SrcAllocationId),
    FieldAccess(SrcFieldAccessId),
    Cast(SrcCastId),
    MethodRef(SrcMethodRefId),
    Variable(SrcVariableId),
    StringConstant(SrcStringConstantId),
    TypeUsage(SrcTypeUsageId),
);
