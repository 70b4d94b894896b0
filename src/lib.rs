//! Time axis and rebinning utilities for Cloudnet processing.
//!
//! - [`time_axis`]: the common decimal hour time grid and conversion of raw
//!   sample times onto it,
//! - [`binning`]: bin edges from bin centers,
//! - [`rebin`]: mean-rebinning of masked 2D fields onto a new axis,
//! - [`masked`]: the masked array type used by [`rebin`],
//! - [`config`]: TOML configuration of the above.
pub mod error;
pub mod logging;
pub mod config;
pub mod time_axis;
pub mod binning;
pub mod masked;
pub mod rebin;
