//! # Curvewatch Math
//!
//! Statistical building blocks for the Curvewatch analytics.
//!
//! - **Statistics**: mean, sample standard deviation and median over slices
//! - **Rolling**: trailing-window mean and standard deviation that degrade to
//!   missing points while the window is still filling
//! - **Histogram**: equal-width binning for distribution views
//!
//! Every function is pure and works on `f64`. Windows that cannot be computed
//! yield `None`, never an error, so a short history never fails a whole
//! series.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]

pub mod error;
pub mod histogram;
pub mod rolling;
pub mod stats;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::histogram::{histogram, Histogram};
    pub use crate::rolling::{rolling_mean, rolling_std, RollingWindow};
    pub use crate::stats::{mean, median, sample_std};
}

pub use error::{MathError, MathResult};
