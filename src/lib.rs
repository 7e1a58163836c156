//! precip_compare
//!
//! Side-by-side monthly precipitation bar charts for two climate-model
//! scenarios, one selected year at a time. Pairs with the `precip` CLI and the
//! `precip-gui` desktop app.
//!
//! ### Pipeline
//! - Load a JSON array of `{model, year, mean_pr: {jan..dec}}` documents
//! - Flatten into `(model, year, month, value)` records
//! - Per chart: band/linear scales, margins layout, clear-and-redraw onto a surface
//! - A controller owns the selected year and redraws both charts on slider
//!   input and resize
//!
//! ### Example
//! ```no_run
//! use precip_compare::{Canvas, Config, Controller, loader};
//! use precip_compare::viz::ChartSide;
//!
//! let data = loader::load_dataset(&loader::DataSource::parse("cmip_california_precip.json"))?;
//! let mut ctl = Controller::new(
//!     data,
//!     &Config::default(),
//!     Canvas::new(480.0, 320.0),
//!     Canvas::new(480.0, 320.0),
//! )?;
//! ctl.start();
//! ctl.on_slider_input(3);
//! println!("{}", ctl.header(ChartSide::Left));
//! # Ok::<(), precip_compare::ChartError>(())
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod layout;
pub mod loader;
pub mod models;
pub mod reshape;
pub mod scale;
pub mod viz;

pub use config::{Config, Scenario};
pub use controller::{Controller, Selection};
pub use error::ChartError;
pub use models::{Month, RawDocument, Record};
pub use reshape::Dataset;
pub use viz::{Canvas, Surface};
