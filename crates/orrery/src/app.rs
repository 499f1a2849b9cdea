//! Sample builder.
//!
//! [`Sample`] is the entry point for the demos: build it from a
//! [`SampleConfig`], optionally override the title, then call
//! [`run`](Sample::run) to start the event loop.
//!
//! # Example
//!
//! ```no_run
//! use orrery::prelude::*;
//!
//! fn main() {
//!     env_logger::init();
//!
//!     let config = SampleConfig::for_variant(Variant::ColorCube);
//!     if let Err(e) = Sample::new(config).title("my color cube").run() {
//!         log::error!("{e}");
//!     }
//! }
//! ```

use crate::config::SampleConfig;
use crate::host::SampleHost;

/// A configured sample, ready to run.
pub struct Sample {
    config: SampleConfig,
}

impl Sample {
    pub fn new(config: SampleConfig) -> Self {
        Self { config }
    }

    /// Set the window title (builder pattern).
    pub fn title(mut self, title: &str) -> Self {
        self.config.title = title.to_string();
        self
    }

    pub fn config(&self) -> &SampleConfig {
        &self.config
    }

    /// Start the event loop. Returns once the window closes.
    pub fn run(self) -> Result<(), winit::error::EventLoopError> {
        log::info!(
            "Starting {:?} sample at {}x{}",
            self.config.variant,
            self.config.width,
            self.config.height
        );

        let event_loop = winit::event_loop::EventLoop::new()?;
        let mut host = SampleHost::new(self.config);
        event_loop.run_app(&mut host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;

    #[test]
    fn title_overrides_config() {
        let sample = Sample::new(SampleConfig::for_variant(Variant::Triangle)).title("tri");
        assert_eq!(sample.config().title, "tri");
        assert_eq!(sample.config().variant, Variant::Triangle);
    }

    #[test]
    fn config_title_is_kept_without_override() {
        let config = SampleConfig::from_json_over(
            r#"{ "title": "my title" }"#,
            &SampleConfig::for_variant(Variant::Triangle),
        )
        .unwrap();
        let sample = Sample::new(config);
        assert_eq!(sample.config().title, "my title");
    }
}
