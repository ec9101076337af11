//! Solver-assigned indexes. Activity and flow indexes are separate spaces.

util::typed_id!(
    /// Column (and reference-product row) of an activity in the technosphere matrix.
    ActivityIdx,
    u32
);

util::typed_id!(
    /// Row of an elementary flow in the biosphere matrix.
    FlowIdx,
    u32
);
