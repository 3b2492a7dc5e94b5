use crate::types::*;

/// Core geometry kernel trait. Creates, annotates and releases shapes.
/// Implemented by TruckKernel (wraps real truck) and MockKernel (deterministic test double).
pub trait ShapeKernel {
    /// Synthesize a parametric shape of the named kind (e.g. "Box").
    fn create_shape(
        &mut self,
        kind: &str,
        params: &ShapeParams,
    ) -> Result<ShapeHandle, KernelError>;

    /// Realize a kernel-independent shape description.
    fn build_shape(&mut self, description: &ShapeDescription) -> Result<ShapeHandle, KernelError>;

    /// Attach a named attribute to the native object, replacing any previous value.
    fn attach_attribute(
        &mut self,
        handle: &ShapeHandle,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), KernelError>;

    /// Give a shape back to the kernel. Unknown handles are ignored.
    fn release(&mut self, handle: ShapeHandle);

    /// Recompute and validate every live shape in the document.
    fn recompute(&mut self) -> Result<(), KernelError>;
}

/// Read-only queries on kernel shapes.
pub trait ShapeIntrospect {
    /// Topological kind of the shape.
    fn kind(&self, handle: &ShapeHandle) -> Result<ShapeKind, KernelError>;

    /// Distinct vertices of the shape, in the kernel's enumeration order.
    fn vertices(&self, handle: &ShapeHandle) -> Result<Vec<[f64; 3]>, KernelError>;

    /// Center of mass. Only defined for solids.
    fn centroid(&self, handle: &ShapeHandle) -> Result<[f64; 3], KernelError>;

    /// Read back an attribute previously attached with `attach_attribute`.
    fn attribute(&self, handle: &ShapeHandle, name: &str) -> Option<AttributeValue>;
}

/// Combined trait for callers that need both mutable kernel access
/// and read-only introspection on the same object.
pub trait KernelBundle: ShapeKernel + ShapeIntrospect {
    fn as_introspect(&self) -> &dyn ShapeIntrospect;
}

// Blanket implementation for any type that implements both traits
impl<T: ShapeKernel + ShapeIntrospect> KernelBundle for T {
    fn as_introspect(&self) -> &dyn ShapeIntrospect {
        self
    }
}
