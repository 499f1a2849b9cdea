//! Color Cube — a spinning vertex-colored cube lit by one orbiting light.
//!
//! The small cube circling it marks the light's direction.

use orrery::prelude::*;

fn main() {
    env_logger::init();

    let config = match SampleConfig::from_args_or(Variant::ColorCube) {
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
