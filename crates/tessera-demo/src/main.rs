mod scene;
mod sheet;

use anyhow::{Context, Result};
use winit::dpi::LogicalSize;

use tessera_engine::coords::Vec2;
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::render::RendererConfig;
use tessera_engine::window::{Runtime, RuntimeConfig};

use scene::Demo;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "tessera demo".to_string(),
        initial_size: LogicalSize::new(960.0, 540.0),
        renderer: RendererConfig {
            design_resolution: Vec2::new(320.0, 180.0),
            ..Default::default()
        },
        ..Default::default()
    };

    Runtime::run(config, Demo::new(load_font())).context("tessera demo failed")
}

/// First system font found, for the proportional label.
fn load_font() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}
