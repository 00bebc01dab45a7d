use core::cmp::Ordering;

/// Paint-order layer for draw items.
///
/// Lower layers are drawn first. Translucent items that must blend over what
/// is beneath them (floor decals, contact shadows) go on a later layer than
/// the geometry they cover.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Layer(pub i32);

impl Layer {
    /// Opaque ground geometry.
    pub const GROUND: Layer = Layer(0);
    /// Lines and decals lying on the ground.
    pub const GROUND_OVERLAY: Layer = Layer(10);
    /// Opaque scene objects.
    pub const OPAQUE: Layer = Layer(20);
    /// Translucent effects drawn after everything opaque.
    pub const TRANSLUCENT: Layer = Layer(30);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}

impl Ord for Layer {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for Layer {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
