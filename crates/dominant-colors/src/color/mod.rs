//! Color types
//!
//! Pixels and centroids share one integer type, [`Rgb`]. Floating point only
//! appears inside the clusterer and at the renderer boundary
//! ([`Rgb::to_unit`]).
//!
//! ```
//! use dominant_colors::Rgb;
//!
//! let color = Rgb::new(18, 52, 86);
//! assert_eq!(color.to_hex(), "#123456");
//! assert_eq!(Rgb::from_hex("#123456").unwrap(), color);
//! ```

mod error;
mod rgb;

pub use error::ParseColorError;
pub use rgb::Rgb;
