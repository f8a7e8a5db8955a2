//! The immutable IR pool.

use crate::elements::*;
use crate::ids::*;
use irfit_common::ElementKind;
use rustc_hash::FxHashMap;

/// Flat arena of every IR element of one run.
///
/// Built by [`IrPoolBuilder`](crate::IrPoolBuilder); read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct IrPool {
    pub(crate) types: Vec<IrType>,
    pub(crate) fields: Vec<IrField>,
    pub(crate) methods: Vec<IrMethod>,
    pub(crate) invocations: Vec<IrInvocation>,
    pub(crate) allocations: Vec<IrAllocation>,
    pub(crate) field_accesses: Vec<IrFieldAccess>,
    pub(crate) method_refs: Vec<IrMethodRef>,
    pub(crate) casts: Vec<IrCast>,
    pub(crate) lambdas: Vec<IrLambda>,
    pub(crate) variables: Vec<IrVariable>,
    pub(crate) types_by_id: FxHashMap<String, IrTypeId>,
    pub(crate) methods_by_id: FxHashMap<String, IrMethodId>,
    /// `Type.name` of every variable-arity method → declared arities.
    pub(crate) vararg_arities: FxHashMap<String, Vec<usize>>,
}

impl IrPool {
    // =========================================================================
    // Element access
    // =========================================================================

    #[inline]
    pub fn ty(&self, id: IrTypeId) -> &IrType {
        &self.types[id.index()]
    }

    #[inline]
    pub fn field(&self, id: IrFieldId) -> &IrField {
        &self.fields[id.index()]
    }

    #[inline]
    pub fn method(&self, id: IrMethodId) -> &IrMethod {
        &self.methods[id.index()]
    }

    #[inline]
    pub fn invocation(&self, id: IrInvocationId) -> &IrInvocation {
        &self.invocations[id.index()]
    }

    #[inline]
    pub fn allocation(&self, id: IrAllocationId) -> &IrAllocation {
        &self.allocations[id.index()]
    }

    #[inline]
    pub fn field_access(&self, id: IrFieldAccessId) -> &IrFieldAccess {
        &self.field_accesses[id.index()]
    }

    #[inline]
    pub fn method_ref(&self, id: IrMethodRefId) -> &IrMethodRef {
        &self.method_refs[id.index()]
    }

    #[inline]
    pub fn cast(&self, id: IrCastId) -> &IrCast {
        &self.casts[id.index()]
    }

    #[inline]
    pub fn lambda(&self, id: IrLambdaId) -> &IrLambda {
        &self.lambdas[id.index()]
    }

    #[inline]
    pub fn variable(&self, id: IrVariableId) -> &IrVariable {
        &self.variables[id.index()]
    }

    pub fn types(&self) -> impl Iterator<Item = (IrTypeId, &IrType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, ty)| (IrTypeId(i as u32), ty))
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Look up a type by binary name.
    pub fn type_by_name(&self, name: &str) -> Option<IrTypeId> {
        self.types_by_id.get(name).copied()
    }

    /// Look up a method by its full id (`<T: R m(P)>`).
    pub fn method_by_id(&self, id: &str) -> Option<IrMethodId> {
        self.methods_by_id.get(id).copied()
    }

    /// Find a method of `ty` by name, return type and parameter types.
    pub fn find_method(
        &self,
        ty: IrTypeId,
        name: &str,
        return_type: &str,
        param_types: &[String],
    ) -> Option<IrMethodId> {
        self.ty(ty).methods.iter().copied().find(|&m| {
            let method = self.method(m);
            method.name == name
                && method.return_type == return_type
                && method.param_types == param_types
        })
    }

    /// Declared arities of the variable-arity method `Type.name`, if the pool
    /// knows it as such.
    pub fn vararg_arities(&self, naming_id: &str) -> Option<&[usize]> {
        self.vararg_arities.get(naming_id).map(Vec::as_slice)
    }

    pub fn vararg_methods(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.vararg_arities
            .iter()
            .map(|(name, arities)| (name.as_str(), arities.as_slice()))
    }

    // =========================================================================
    // Generic element queries
    // =========================================================================

    /// Number of elements of `kind` in the pool.
    pub fn len(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::Type => self.types.len(),
            ElementKind::Field => self.fields.len(),
            ElementKind::Method => self.methods.len(),
            ElementKind::Invocation => self.invocations.len(),
            ElementKind::Allocation => self.allocations.len(),
            ElementKind::FieldAccess => self.field_accesses.len(),
            ElementKind::MethodRef => self.method_refs.len(),
            ElementKind::Cast => self.casts.len(),
            ElementKind::Lambda => self.lambdas.len(),
            ElementKind::Variable => self.variables.len(),
            ElementKind::StringConstant | ElementKind::TypeUsage => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Textual id of any element.
    pub fn element_id(&self, element: IrElementRef) -> &str {
        match element {
            IrElementRef::Type(id) => &self.ty(id).id,
            IrElementRef::Field(id) => &self.field(id).id,
            IrElementRef::Method(id) => &self.method(id).id,
            IrElementRef::Invocation(id) => &self.invocation(id).id,
            IrElementRef::Allocation(id) => &self.allocation(id).id,
            IrElementRef::FieldAccess(id) => &self.field_access(id).id,
            IrElementRef::MethodRef(id) => &self.method_ref(id).id,
            IrElementRef::Cast(id) => &self.cast(id).id,
            IrElementRef::Lambda(id) => &self.lambda(id).id,
            IrElementRef::Variable(id) => &self.variable(id).id,
        }
    }

    /// Source-line hint of any element.
    pub fn element_line(&self, element: IrElementRef) -> Option<u32> {
        match element {
            IrElementRef::Type(id) => self.ty(id).line,
            IrElementRef::Method(id) => self.method(id).line,
            IrElementRef::Invocation(id) => self.invocation(id).line,
            IrElementRef::Allocation(id) => self.allocation(id).line,
            IrElementRef::FieldAccess(id) => self.field_access(id).line,
            IrElementRef::MethodRef(id) => self.method_ref(id).line,
            IrElementRef::Cast(id) => self.cast(id).line,
            IrElementRef::Lambda(id) => self.lambda(id).line,
            IrElementRef::Field(_) | IrElementRef::Variable(_) => None,
        }
    }

    /// Enclosing method of a body element or variable.
    pub fn owning_method(&self, element: IrElementRef) -> Option<IrMethodId> {
        match element {
            IrElementRef::Invocation(id) => Some(self.invocation(id).method),
            IrElementRef::Allocation(id) => Some(self.allocation(id).method),
            IrElementRef::FieldAccess(id) => Some(self.field_access(id).method),
            IrElementRef::MethodRef(id) => Some(self.method_ref(id).method),
            IrElementRef::Cast(id) => Some(self.cast(id).method),
            IrElementRef::Lambda(id) => Some(self.lambda(id).method),
            IrElementRef::Variable(id) => Some(self.variable(id).method),
            IrElementRef::Type(_) | IrElementRef::Field(_) | IrElementRef::Method(_) => None,
        }
    }
}
