//! Textured Cube — a spinning textured cube lit by two orbiting lights,
//! one neutral gray and one dim red.
//!
//! Edit `src/render/shaders/textured_cube.wgsl` or the texture while it runs
//! to see hot-reload (feature `hot-reload`, on by default).

use orrery::prelude::*;

fn main() {
    env_logger::init();

    let config = match SampleConfig::from_args_or(Variant::TexturedCube) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = Sample::new(config).run() {
        log::error!("Event loop error: {e}");
        std::process::exit(1);
    }
}
