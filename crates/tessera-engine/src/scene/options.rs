use crate::coords::{AffineTransform, Rect};

/// Full-screen color effect applied by the sprite shader.
///
/// At most one effect is active per draw call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Effect {
    #[default]
    None,
    Sepia,
    /// Posterized palette.
    Retro,
    Invert,
}

/// Draw state shared by a run of sprites.
///
/// Every field is optional; an absent field means "inherit" when composing and
/// "identity" when rendering. Two options are equal only if all four fields are,
/// which is what decides whether adjacent sprites can share a draw call.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct DrawOptions {
    /// Clip rect in design pixels.
    pub scissor_rect: Option<Rect>,
    pub affine: Option<AffineTransform>,
    /// Opacity in `[0, 1]`.
    pub alpha: Option<f32>,
    pub effect: Option<Effect>,
}

impl DrawOptions {
    pub const IDENTITY: DrawOptions = DrawOptions {
        scissor_rect: None,
        affine: None,
        alpha: None,
        effect: None,
    };

    #[inline]
    pub fn alpha(alpha: f32) -> Self {
        Self { alpha: Some(alpha.clamp(0.0, 1.0)), ..Self::IDENTITY }
    }

    #[inline]
    pub fn effect(effect: Effect) -> Self {
        Self { effect: Some(effect), ..Self::IDENTITY }
    }

    #[inline]
    pub fn scissor(rect: Rect) -> Self {
        Self { scissor_rect: Some(rect), ..Self::IDENTITY }
    }

    #[inline]
    pub fn affine(affine: AffineTransform) -> Self {
        Self { affine: Some(affine), ..Self::IDENTITY }
    }

    #[inline]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = Some(alpha.clamp(0.0, 1.0));
        self
    }

    #[inline]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    #[inline]
    pub fn with_scissor(mut self, rect: Rect) -> Self {
        self.scissor_rect = Some(rect);
        self
    }

    #[inline]
    pub fn with_affine(mut self, affine: AffineTransform) -> Self {
        self.affine = Some(affine);
        self
    }

    /// Composes an inner scope onto `self`.
    ///
    /// Scissor and effect come from `other` when it sets them (innermost wins),
    /// affines concatenate, alphas multiply.
    #[must_use]
    pub fn concatenate(&self, other: &DrawOptions) -> DrawOptions {
        DrawOptions {
            scissor_rect: other.scissor_rect.or(self.scissor_rect),
            affine: match (self.affine, other.affine) {
                (Some(a), Some(b)) => Some(a.concatenate(&b)),
                (a, b) => b.or(a),
            },
            alpha: match (self.alpha, other.alpha) {
                (None, None) => None,
                (a, b) => Some(a.unwrap_or(1.0) * b.unwrap_or(1.0)),
            },
            effect: other.effect.or(self.effect),
        }
    }

    #[inline]
    pub fn resolved_alpha(&self) -> f32 {
        self.alpha.unwrap_or(1.0)
    }

    #[inline]
    pub fn resolved_effect(&self) -> Effect {
        self.effect.unwrap_or_default()
    }

    #[inline]
    pub fn resolved_affine(&self) -> AffineTransform {
        self.affine.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    #[test]
    fn identity_is_neutral() {
        let o = DrawOptions::alpha(0.5).with_effect(Effect::Sepia);
        assert_eq!(DrawOptions::IDENTITY.concatenate(&o), o);
        assert_eq!(o.concatenate(&DrawOptions::IDENTITY), o);
    }

    #[test]
    fn alphas_multiply() {
        let o = DrawOptions::alpha(0.5).concatenate(&DrawOptions::alpha(0.5));
        assert_eq!(o.alpha, Some(0.25));
    }

    #[test]
    fn innermost_scissor_and_effect_win() {
        let outer = DrawOptions::scissor(Rect::new(0.0, 0.0, 100.0, 100.0)).with_effect(Effect::Sepia);
        let inner = DrawOptions::scissor(Rect::new(10.0, 10.0, 5.0, 5.0)).with_effect(Effect::Invert);
        let c = outer.concatenate(&inner);
        assert_eq!(c.scissor_rect, Some(Rect::new(10.0, 10.0, 5.0, 5.0)));
        assert_eq!(c.effect, Some(Effect::Invert));
    }

    #[test]
    fn unset_inner_fields_inherit() {
        let outer = DrawOptions::scissor(Rect::new(0.0, 0.0, 8.0, 8.0)).with_effect(Effect::Retro);
        let c = outer.concatenate(&DrawOptions::alpha(0.3));
        assert_eq!(c.scissor_rect, outer.scissor_rect);
        assert_eq!(c.effect, Some(Effect::Retro));
    }

    #[test]
    fn affines_concatenate() {
        let outer = DrawOptions::affine(AffineTransform::from_translation(Vec2::new(5.0, 0.0)));
        let inner = DrawOptions::affine(AffineTransform::new(Vec2::new(1.0, 2.0), Vec2::new(2.0, 2.0)));
        let a = outer.concatenate(&inner).affine.unwrap_or_default();
        assert_eq!(a.translation, Vec2::new(6.0, 2.0));
        assert_eq!(a.scale, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(DrawOptions::alpha(0.5), DrawOptions::alpha(0.5));
        assert_ne!(DrawOptions::alpha(0.5), DrawOptions::IDENTITY);
        assert_ne!(DrawOptions::effect(Effect::None), DrawOptions::IDENTITY);
    }
}
