use super::Vec2;

/// Quarter-turn rotation, clockwise on screen (+Y down).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Rotation {
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Number of clockwise quarter turns.
    #[inline]
    pub const fn quarter_turns(self) -> u8 {
        match self {
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    /// `None` is the identity (0 quarter turns).
    #[inline]
    pub const fn from_quarter_turns(turns: u8) -> Option<Rotation> {
        match turns % 4 {
            1 => Some(Rotation::Deg90),
            2 => Some(Rotation::Deg180),
            3 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Adds two optional rotations modulo 360 degrees.
    #[inline]
    pub fn combine(a: Option<Rotation>, b: Option<Rotation>) -> Option<Rotation> {
        let turns = a.map_or(0, Rotation::quarter_turns) + b.map_or(0, Rotation::quarter_turns);
        Rotation::from_quarter_turns(turns)
    }
}

/// Mirror applied to a quad.
///
/// `Horizontal` mirrors left/right, `Vertical` mirrors top/bottom.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Reflection {
    Vertical,
    Horizontal,
    Both,
}

impl Reflection {
    const V: u8 = 0b01;
    const H: u8 = 0b10;

    #[inline]
    const fn bits(self) -> u8 {
        match self {
            Reflection::Vertical => Self::V,
            Reflection::Horizontal => Self::H,
            Reflection::Both => Self::V | Self::H,
        }
    }

    #[inline]
    const fn from_bits(bits: u8) -> Option<Reflection> {
        match bits & (Self::V | Self::H) {
            Self::V => Some(Reflection::Vertical),
            Self::H => Some(Reflection::Horizontal),
            0b11 => Some(Reflection::Both),
            _ => None,
        }
    }

    /// Mirrors toggle: applying the same mirror twice cancels out.
    #[inline]
    pub fn combine(a: Option<Reflection>, b: Option<Reflection>) -> Option<Reflection> {
        let bits = a.map_or(0, Reflection::bits) ^ b.map_or(0, Reflection::bits);
        Reflection::from_bits(bits)
    }

    #[inline]
    pub const fn flips_x(self) -> bool {
        self.bits() & Self::H != 0
    }

    #[inline]
    pub const fn flips_y(self) -> bool {
        self.bits() & Self::V != 0
    }
}

/// Translation + scale + quarter-turn rotation + mirror.
///
/// Value type; every operation returns a new transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AffineTransform {
    pub translation: Vec2,
    pub scale: Vec2,
    pub rotation: Option<Rotation>,
    pub reflection: Option<Reflection>,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            translation: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: None,
            reflection: None,
        }
    }

    #[inline]
    pub const fn new(translation: Vec2, scale: Vec2) -> Self {
        Self { translation, scale, rotation: None, reflection: None }
    }

    #[inline]
    pub const fn from_translation(translation: Vec2) -> Self {
        Self::new(translation, Vec2::ONE)
    }

    #[inline]
    pub const fn from_scale(scale: Vec2) -> Self {
        Self::new(Vec2::ZERO, scale)
    }

    #[inline]
    pub const fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = Some(rotation);
        self
    }

    #[inline]
    pub const fn with_reflection(mut self, reflection: Reflection) -> Self {
        self.reflection = Some(reflection);
        self
    }

    #[inline]
    pub fn translate(mut self, delta: Vec2) -> Self {
        self.translation += delta;
        self
    }

    #[inline]
    pub fn scaled(mut self, factor: Vec2) -> Self {
        self.scale = self.scale.mul_elem(factor);
        self
    }

    /// Composes `self` with an inner transform.
    ///
    /// Translations add, scales multiply component-wise, rotations and mirrors
    /// combine through their own tables.
    #[must_use]
    pub fn concatenate(&self, other: &AffineTransform) -> AffineTransform {
        AffineTransform {
            translation: self.translation + other.translation,
            scale: self.scale.mul_elem(other.scale),
            rotation: Rotation::combine(self.rotation, other.rotation),
            reflection: Reflection::combine(self.reflection, other.reflection),
        }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Maps a screen corner of a quad to the material corner it samples.
    ///
    /// Corners are indexed in winding order TL=0, BL=1, BR=2, TR=3. The mirror is
    /// undone first, then the rotation; the winding itself never changes.
    #[inline]
    pub fn corner_source(&self, screen_corner: usize) -> usize {
        let mut i = screen_corner & 3;
        if let Some(r) = self.reflection {
            if r.flips_x() {
                // TL<->TR, BL<->BR
                i = 3 - i;
            }
            if r.flips_y() {
                // TL<->BL, BR<->TR
                i ^= 1;
            }
        }
        let turns = self.rotation.map_or(0, Rotation::quarter_turns) as usize;
        (i + turns) & 3
    }

    /// Permutation applied to the four material UV corners.
    pub fn corner_permutation(&self) -> [usize; 4] {
        [
            self.corner_source(0),
            self.corner_source(1),
            self.corner_source(2),
            self.corner_source(3),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(tx: f32, ty: f32, sx: f32, sy: f32) -> AffineTransform {
        AffineTransform::new(Vec2::new(tx, ty), Vec2::new(sx, sy))
    }

    // ── concatenate ───────────────────────────────────────────────────────

    #[test]
    fn concatenate_adds_translation_and_multiplies_scale() {
        let a = ts(1.0, 2.0, 2.0, 3.0);
        let b = ts(10.0, 20.0, 0.5, 2.0);
        let c = a.concatenate(&b);
        assert_eq!(c.translation, Vec2::new(11.0, 22.0));
        assert_eq!(c.scale, Vec2::new(1.0, 6.0));
    }

    #[test]
    fn concatenate_identity_is_neutral() {
        let a = ts(3.0, -4.0, 2.0, 2.0).with_rotation(Rotation::Deg90);
        assert_eq!(a.concatenate(&AffineTransform::identity()), a);
        assert_eq!(AffineTransform::identity().concatenate(&a), a);
    }

    #[test]
    fn concatenate_is_associative_for_translation_and_scale() {
        let a = ts(1.5, -2.0, 2.0, 0.25);
        let b = ts(-7.0, 3.25, 4.0, 8.0);
        let c = ts(0.125, 9.0, 0.5, 3.0);

        let left = a.concatenate(&b).concatenate(&c);
        let right = a.concatenate(&b.concatenate(&c));

        assert!(left.translation.approx_eq(right.translation, 1e-5));
        assert!(left.scale.approx_eq(right.scale, 1e-5));
    }

    // ── rotation / reflection tables ──────────────────────────────────────

    #[test]
    fn rotations_wrap_modulo_full_turn() {
        assert_eq!(Rotation::combine(Some(Rotation::Deg90), Some(Rotation::Deg90)), Some(Rotation::Deg180));
        assert_eq!(Rotation::combine(Some(Rotation::Deg270), Some(Rotation::Deg90)), None);
        assert_eq!(Rotation::combine(Some(Rotation::Deg180), Some(Rotation::Deg270)), Some(Rotation::Deg90));
        assert_eq!(Rotation::combine(None, Some(Rotation::Deg270)), Some(Rotation::Deg270));
    }

    #[test]
    fn reflections_toggle() {
        use Reflection::*;
        assert_eq!(Reflection::combine(Some(Vertical), Some(Vertical)), None);
        assert_eq!(Reflection::combine(Some(Vertical), Some(Horizontal)), Some(Both));
        assert_eq!(Reflection::combine(Some(Both), Some(Horizontal)), Some(Vertical));
        assert_eq!(Reflection::combine(Some(Both), Some(Both)), None);
        assert_eq!(Reflection::combine(None, Some(Horizontal)), Some(Horizontal));
    }

    // ── corner permutation ────────────────────────────────────────────────

    #[test]
    fn identity_permutation_keeps_corners() {
        assert_eq!(AffineTransform::identity().corner_permutation(), [0, 1, 2, 3]);
    }

    #[test]
    fn quarter_turn_shifts_corners() {
        // After a clockwise quarter turn the top-left of the screen shows the
        // bottom-left of the material.
        let a = AffineTransform::identity().with_rotation(Rotation::Deg90);
        assert_eq!(a.corner_permutation(), [1, 2, 3, 0]);
        let a = AffineTransform::identity().with_rotation(Rotation::Deg180);
        assert_eq!(a.corner_permutation(), [2, 3, 0, 1]);
    }

    #[test]
    fn horizontal_mirror_swaps_left_and_right() {
        let a = AffineTransform::identity().with_reflection(Reflection::Horizontal);
        assert_eq!(a.corner_permutation(), [3, 2, 1, 0]);
    }

    #[test]
    fn vertical_mirror_swaps_top_and_bottom() {
        let a = AffineTransform::identity().with_reflection(Reflection::Vertical);
        assert_eq!(a.corner_permutation(), [1, 0, 3, 2]);
    }

    #[test]
    fn both_mirrors_equal_half_turn() {
        let both = AffineTransform::identity().with_reflection(Reflection::Both);
        let half = AffineTransform::identity().with_rotation(Rotation::Deg180);
        assert_eq!(both.corner_permutation(), half.corner_permutation());
    }

    #[test]
    fn every_permutation_is_a_bijection() {
        let rotations = [None, Some(Rotation::Deg90), Some(Rotation::Deg180), Some(Rotation::Deg270)];
        let reflections = [None, Some(Reflection::Vertical), Some(Reflection::Horizontal), Some(Reflection::Both)];
        for rotation in rotations {
            for reflection in reflections {
                let a = AffineTransform { rotation, reflection, ..AffineTransform::identity() };
                let mut p = a.corner_permutation();
                p.sort_unstable();
                assert_eq!(p, [0, 1, 2, 3], "{rotation:?} {reflection:?}");
            }
        }
    }
}
