//! Scale-calibrated measuring on top of a raster plan: draw lines,
//! rectangles and polygons, edit them, and read lengths and areas in feet
//! or meters.

pub mod calibration;
pub mod drawing;
pub mod factory;
pub mod geometry;
pub mod history;
pub mod interaction;
pub mod measurement;
pub mod model;
pub mod session;
pub mod settings;
pub mod transform;
pub mod units;
pub mod view;

pub use calibration::{CalibrationError, ScaleCalibration};
pub use measurement::Measurement;
pub use model::{Point, Shape, ShapeKind, ShapeStyle, Tool};
pub use session::{KeyCommand, Session};
pub use settings::Settings;
pub use units::Unit;
