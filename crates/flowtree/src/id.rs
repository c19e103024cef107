use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a flow stored in the [`Flows`](crate::Flows) arena.
    ///
    /// Keys are generational: the id of a stopped flow never aliases a flow created later.
    pub struct FlowId;

    /// Opaque identifier for a navigation surface registered with the arena.
    pub struct SurfaceId;
}
