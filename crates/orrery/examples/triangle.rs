//! Triangle — a single position-only triangle in clip space.
//!
//! Pass a JSON config path as the first argument to override defaults.

use orrery::prelude::*;

fn main() {
    env_logger::init();

    let config = match SampleConfig::from_args_or(Variant::Triangle) {
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
