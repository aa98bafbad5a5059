//! Landmark index tables (MediaPipe topology)

/// Face mesh indices
pub mod face {
    pub const NOSE_TIP: usize = 4;

    pub const LEFT_EYE_OUTER: usize = 33;
    pub const LEFT_EYE_INNER: usize = 133;
    pub const RIGHT_EYE_OUTER: usize = 263;
    pub const RIGHT_EYE_INNER: usize = 362;

    /// Only present when the detector runs with iris refinement
    pub const LEFT_IRIS: usize = 468;
    pub const RIGHT_IRIS: usize = 473;

    pub const UPPER_LIP: usize = 13;
    pub const LOWER_LIP: usize = 14;
    pub const MOUTH_LEFT: usize = 61;
    pub const MOUTH_RIGHT: usize = 291;

    /// Face oval extremes, used by the synthetic builders to span the bounding box
    pub const FOREHEAD: usize = 10;
    pub const CHIN: usize = 152;
    pub const LEFT_CHEEK: usize = 234;
    pub const RIGHT_CHEEK: usize = 454;

    /// Points in a mesh without iris refinement
    pub const MESH_POINTS: usize = 468;
    /// Points in a mesh with iris refinement
    pub const REFINED_MESH_POINTS: usize = 478;

    /// Landmarks every face reading depends on
    pub const REQUIRED: [usize; 9] = [
        NOSE_TIP,
        LEFT_EYE_OUTER,
        LEFT_EYE_INNER,
        RIGHT_EYE_OUTER,
        RIGHT_EYE_INNER,
        UPPER_LIP,
        LOWER_LIP,
        MOUTH_LEFT,
        MOUTH_RIGHT,
    ];

    /// Left/right counterparts, swapped when mirroring a face horizontally
    pub const MIRROR_PAIRS: [(usize, usize); 5] = [
        (LEFT_EYE_OUTER, RIGHT_EYE_OUTER),
        (LEFT_EYE_INNER, RIGHT_EYE_INNER),
        (LEFT_IRIS, RIGHT_IRIS),
        (MOUTH_LEFT, MOUTH_RIGHT),
        (LEFT_CHEEK, RIGHT_CHEEK),
    ];
}

/// Body pose indices
pub mod pose {
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;

    pub const POINTS: usize = 33;
}

/// Hand indices
pub mod hand {
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;

    pub const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

    pub const POINTS: usize = 21;
}
