use tessera_engine::assets::{Material, MaterialAtlas, MaterialSource};
use tessera_engine::coords::{AffineTransform, Camera, Rect, Reflection, Rotation, Vec2};
use tessera_engine::core::{AppControl, Game, Setup, UpdateCtx};
use tessera_engine::input::{Key, MouseButton};
use tessera_engine::paint::Color;
use tessera_engine::scene::{DrawOptions, Effect, Painter};
use tessera_engine::text::{BitmapFont, GlyphSheet, ProportionalFont};
use tessera_engine::Result;

use crate::sheet::{self, Image};

const MAP_W: usize = 24;
const MAP_H: usize = 14;
const TILE_KEYS: [&str; 3] = ["tile0", "tile1", "tile2"];
const ARROW: &str = "tile3";
const COIN: &str = "Coin";

const PAN_SPEED: f32 = 120.0;
const ZOOM_STEP: f32 = 1.25;
const ZOOM_RANGE: (f32, f32) = (0.5, 4.0);

const LABEL_PX: f32 = 11.0;
const LABEL_TEXT: &str = "Sprite batching";

/// Tilemap sandbox: pan with the arrow keys, zoom with +/- or the wheel,
/// click a tile to cycle its kind.
pub struct Demo {
    atlas: MaterialAtlas,
    font: BitmapFont,
    label: Option<(ProportionalFont, GlyphSheet)>,
    tiles: Image,
    glyphs: Image,

    map: Vec<u8>,
    camera: Camera,
    hovered: Option<usize>,
    fps: f32,
}

impl Demo {
    pub fn new(font_bytes: Option<Vec<u8>>) -> Self {
        let mut atlas = MaterialAtlas::new();

        let tiles = sheet::tile_sheet();
        let frames = atlas.insert_grid(
            "tile",
            sheet::TILES,
            Vec2::new(tiles.width as f32, tiles.height as f32),
            Vec2::splat(sheet::TILE as f32),
            sheet::TILE_COLUMNS,
            sheet::TILE_ROWS,
        );
        atlas.insert(
            COIN,
            Material::Animated {
                frames: frames[sheet::TILE_COLUMNS as usize..].to_vec(),
                frame_duration: 0.15,
                looping: true,
            },
        );

        let glyphs = sheet::font_sheet();
        let (cw, ch) = sheet::GLYPH_CELL;
        atlas.insert_grid(
            "glyph",
            sheet::FONT,
            Vec2::new(glyphs.width as f32, glyphs.height as f32),
            Vec2::new(cw as f32, ch as f32),
            sheet::GLYPH_COLUMNS,
            sheet::GLYPH_ROWS,
        );
        let font = BitmapFont::new("glyph", Vec2::new(cw as f32, ch as f32), sheet::FIRST_GLYPH, sheet::GLYPH_COUNT);

        let label = font_bytes.and_then(|bytes| match ProportionalFont::from_bytes(&bytes, LABEL_PX, "label:") {
            Ok(font) => {
                let sheet = font.bake(LABEL_TEXT.chars(), sheet::LABELS, &mut atlas);
                Some((font, sheet))
            }
            Err(e) => {
                log::warn!("{e}; labels fall back to the bitmap font");
                None
            }
        });

        let map = (0..MAP_W * MAP_H)
            .map(|i| {
                let (x, y) = (i % MAP_W, i / MAP_W);
                if (6..10).contains(&y) && (4..9).contains(&x) {
                    1
                } else if x == 0 || y == 0 || x == MAP_W - 1 || y == MAP_H - 1 {
                    2
                } else {
                    0
                }
            })
            .collect();

        Self {
            atlas,
            font,
            label,
            tiles,
            glyphs,
            map,
            camera: Camera::default(),
            hovered: None,
            fps: 0.0,
        }
    }

    fn tile_center(index: usize) -> Vec2 {
        let t = sheet::TILE as f32;
        Vec2::new((index % MAP_W) as f32 * t + t / 2.0, (index / MAP_W) as f32 * t + t / 2.0)
    }

    fn tile_at(world: Vec2) -> Option<usize> {
        let t = sheet::TILE as f32;
        if world.x < 0.0 || world.y < 0.0 {
            return None;
        }
        let (x, y) = ((world.x / t) as usize, (world.y / t) as usize);
        (x < MAP_W && y < MAP_H).then_some(y * MAP_W + x)
    }

    /// World-space affine for a HUD element at design pixel `at`, `size` pixels
    /// large on screen whatever the camera does.
    fn hud(&self, at: Vec2, size: Vec2) -> AffineTransform {
        let inverse_zoom = 1.0 / self.camera.effective_zoom();
        AffineTransform::new(self.camera.to_world(at), size * inverse_zoom)
    }

    fn draw_map(&self, p: &mut Painter<'_>) -> Result<()> {
        let size = Vec2::splat(sheet::TILE as f32);
        for (i, &kind) in self.map.iter().enumerate() {
            let tint = (self.hovered == Some(i)).then_some(Color::rgb(1.0, 0.75, 0.75));
            p.put_sprite(TILE_KEYS[kind as usize], &AffineTransform::new(Self::tile_center(i), size), tint, None)?;
        }
        Ok(())
    }

    fn draw_props(&self, p: &mut Painter<'_>) -> Result<()> {
        let size = Vec2::splat(sheet::TILE as f32);
        let row = 3.0 * sheet::TILE as f32;

        let turns = [None, Some(Rotation::Deg90), Some(Rotation::Deg180), Some(Rotation::Deg270)];
        for (i, rotation) in turns.into_iter().enumerate() {
            let mut affine = AffineTransform::new(Vec2::new(40.0 + i as f32 * 20.0, row), size);
            affine.rotation = rotation;
            p.put_sprite(ARROW, &affine, None, None)?;
        }

        // Mirrored arrows, all turned a quarter by the enclosing scope.
        let turned = DrawOptions::affine(AffineTransform::identity().with_rotation(Rotation::Deg90));
        p.with_options(turned, |p| -> Result<()> {
            let mirrors = [Reflection::Horizontal, Reflection::Vertical, Reflection::Both];
            for (i, reflection) in mirrors.into_iter().enumerate() {
                let affine = AffineTransform::new(Vec2::new(140.0 + i as f32 * 20.0, row), size)
                    .with_reflection(reflection);
                p.put_sprite(ARROW, &affine, Some(Color::rgb(0.6, 0.9, 1.0)), None)?;
            }
            Ok(())
        })?;

        // Spinning arrow: one quarter turn every half second.
        let step = (p.elapsed() * 2.0) as u8 % 4;
        let mut spinner = AffineTransform::new(Vec2::new(240.0, row), size);
        spinner.rotation = Rotation::from_quarter_turns(step);
        p.put_sprite(ARROW, &spinner, Some(Color::rgb(1.0, 0.9, 0.4)), None)?;

        for i in 0..5 {
            let at = Vec2::new(200.0 + i as f32 * 24.0, 11.0 * sheet::TILE as f32);
            p.put_sprite(COIN, &AffineTransform::new(at, size), None, None)?;
        }
        Ok(())
    }

    fn draw_hud(&self, p: &mut Painter<'_>) -> Result<()> {
        p.put_text("TESSERA", &self.hud(Vec2::new(4.0, 4.0), Vec2::splat(2.0)), &self.font, None)?;

        let stats = format!("FPS {:.0}  ZOOM {:.2}", self.fps, self.camera.zoom);
        p.put_text_tinted(
            &stats,
            &self.hud(Vec2::new(4.0, 18.0), Vec2::ONE),
            &self.font,
            Color::rgb(1.0, 0.85, 0.3),
            Some(0.9),
        )?;

        // One coin per effect, each clipped to its own box.
        let effects = [Effect::None, Effect::Sepia, Effect::Retro, Effect::Invert];
        for (i, effect) in effects.into_iter().enumerate() {
            let center = Vec2::new(220.0 + i as f32 * 24.0, 16.0);
            let clip = Rect::from_origin_size(center - Vec2::splat(10.0), Vec2::new(20.0, 14.0));
            let options = DrawOptions::effect(effect).with_scissor(clip).with_alpha(0.85);
            p.with_options(options, |p| {
                p.put_sprite(TILE_KEYS[0], &self.hud(center, Vec2::splat(20.0)), None, None)?;
                p.put_sprite(COIN, &self.hud(center, Vec2::splat(16.0)), None, None)
            })?;
        }

        let origin = self.hud(Vec2::new(4.0, 166.0), Vec2::ONE);
        match &self.label {
            Some((font, _)) => p.put_text_tinted(LABEL_TEXT, &origin, font, Color::WHITE, Some(0.8)),
            None => p.put_text(&LABEL_TEXT.to_uppercase(), &origin, &self.font, Some(0.8)),
        }
    }
}

impl Game for Demo {
    fn setup(&mut self, setup: &mut Setup<'_>) -> Result<()> {
        setup.register_texture(sheet::TILES, self.tiles.width, self.tiles.height, &self.tiles.rgba)?;
        setup.register_texture(sheet::FONT, self.glyphs.width, self.glyphs.height, &self.glyphs.rgba)?;
        if let Some((_, label)) = &self.label {
            setup.register_texture(sheet::LABELS, label.width, label.height, &label.rgba)?;
        }
        log::info!("demo: {} materials", self.atlas.len());
        Ok(())
    }

    fn assets(&self) -> &dyn MaterialSource {
        &self.atlas
    }

    fn update(&mut self, ctx: &mut UpdateCtx<'_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        let dt = ctx.time.dt;
        self.fps += (1.0 / dt - self.fps) * 0.1;

        let mut pan = Vec2::ZERO;
        for (keys, dir) in [
            ([Key::ArrowLeft, Key::A], Vec2::new(-1.0, 0.0)),
            ([Key::ArrowRight, Key::D], Vec2::new(1.0, 0.0)),
            ([Key::ArrowUp, Key::W], Vec2::new(0.0, -1.0)),
            ([Key::ArrowDown, Key::S], Vec2::new(0.0, 1.0)),
        ] {
            if keys.iter().any(|k| ctx.input.key_down(*k)) {
                pan += dir;
            }
        }
        ctx.camera.position += pan * (PAN_SPEED * dt / ctx.camera.effective_zoom());

        let mut steps = ctx.input_frame.wheel.y;
        if ctx.input_frame.key_pressed(Key::Equal) {
            steps += 1.0;
        }
        if ctx.input_frame.key_pressed(Key::Minus) {
            steps -= 1.0;
        }
        if steps != 0.0 {
            let zoom = ctx.camera.effective_zoom() * ZOOM_STEP.powf(steps);
            ctx.camera.zoom = zoom.clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
        }

        self.hovered = ctx.pointer_world().and_then(Self::tile_at);
        if let Some(i) = self.hovered {
            if ctx.input_frame.button_pressed(MouseButton::Left) {
                self.map[i] = (self.map[i] + 1) % TILE_KEYS.len() as u8;
                log::debug!("tile {i} -> {}", TILE_KEYS[self.map[i] as usize]);
            }
        }

        self.camera = *ctx.camera;
        AppControl::Continue
    }

    fn draw(&self, p: &mut Painter<'_>) -> Result<()> {
        self.draw_map(p)?;
        self.draw_props(p)?;
        self.draw_hud(p)
    }
}
