use crate::assets::TextureId;

use super::DrawOptions;

/// A run of `count` consecutive quads sharing a texture and composed options.
///
/// Issued as a single indexed draw call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawCommand {
    pub texture: TextureId,
    pub options: DrawOptions,
    pub count: u32,
}

impl DrawCommand {
    #[inline]
    pub fn new(texture: TextureId, options: DrawOptions) -> Self {
        Self { texture, options, count: 1 }
    }

    /// True if a quad with this texture and options can join the run.
    #[inline]
    pub fn accepts(&self, texture: TextureId, options: &DrawOptions) -> bool {
        self.texture == texture && self.options == *options
    }
}

/// Appends a quad to `commands`, extending the last run when possible.
///
/// Runs are never reordered or merged across a differing command.
pub(crate) fn push_quad(commands: &mut Vec<DrawCommand>, texture: TextureId, options: &DrawOptions) {
    match commands.last_mut() {
        Some(last) if last.accepts(texture, options) => last.count += 1,
        _ => commands.push(DrawCommand::new(texture, *options)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Effect;

    #[test]
    fn adjacent_equal_quads_merge() {
        let mut cmds = Vec::new();
        for _ in 0..5 {
            push_quad(&mut cmds, TextureId(1), &DrawOptions::IDENTITY);
        }
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].count, 5);
    }

    #[test]
    fn non_adjacent_equal_quads_do_not_merge() {
        let mut cmds = Vec::new();
        push_quad(&mut cmds, TextureId(1), &DrawOptions::IDENTITY);
        push_quad(&mut cmds, TextureId(2), &DrawOptions::IDENTITY);
        push_quad(&mut cmds, TextureId(1), &DrawOptions::IDENTITY);
        let textures: Vec<_> = cmds.iter().map(|c| c.texture.0).collect();
        assert_eq!(textures, [1, 2, 1]);
    }

    #[test]
    fn differing_options_split() {
        let mut cmds = Vec::new();
        push_quad(&mut cmds, TextureId(1), &DrawOptions::IDENTITY);
        push_quad(&mut cmds, TextureId(1), &DrawOptions::effect(Effect::Invert));
        assert_eq!(cmds.len(), 2);
    }
}
