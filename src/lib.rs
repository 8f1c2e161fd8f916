// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Day/Night Terminator
//!
//! This crate computes the curve separating the sunlit and the dark
//! hemispheres of the Earth at a given instant, using a closed-form,
//! low-precision solar almanac (good to roughly 0.01°, which is plenty for
//! drawing the terminator on a map).
//!
//! # Core types
//!
//! - [`CivilTime`] — calendar date plus fractional UTC hour, the model input.
//! - [`SunPosition`] — solar declination and Greenwich Hour Angle (GHA).
//! - [`Terminator`] — builds a [`TerminatorRing`] from a [`SunPosition`].
//! - [`TerminatorRing`] — closed ring of [`GeoPoint`]s (degrees) ready for
//!   reprojection and filling by a rendering layer.
//! - [`TerminatorOptions`] — sampling step and hour-angle handling.
//!
//! # Free functions
//!
//! | Function | Result |
//! |----------|--------|
//! | [`compute_declination`] | solar declination |
//! | [`compute_gha`] | Greenwich Hour Angle in `[0, 360)` |
//! | [`compute_height`] | solar elevation above the horizon |
//! | [`compute_azimuth`] | solar azimuth in `[0, 360)` |
//! | [`compute_lat`] | terminator latitude at a longitude |
//! | [`terminator_ring`] | ring for a (declination, GHA) pair |
//!
//! # Quick example
//!
//! ```rust
//! use daynight::{CivilTime, Terminator};
//!
//! let time = CivilTime::from_hms(2012, 6, 21, 12, 0, 0);
//! let terminator = Terminator::at(&time);
//! let ring = terminator.ring();
//!
//! assert!(ring.is_closed());
//! assert_eq!(ring.len(), 3604);
//! ```
//!
//! Nothing here draws or reprojects: the ring is plain WGS84-like
//! longitude/latitude degrees in the equirectangular frame.

mod civil;
mod ephemeris;
mod error;
mod terminator;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use civil::{fractional_hour, CivilTime};
pub use ephemeris::{
    compute_azimuth, compute_declination, compute_gha, compute_height, compute_lat, SunPosition,
};
pub use error::{Result, TerminatorError};
pub use terminator::{
    terminator_ring, GeoPoint, Terminator, TerminatorOptions, TerminatorRing, DEFAULT_STEP,
    MIN_STEP, POLE_OFFSET,
};

/// Angles throughout the public API are [`qtty::Degrees`].
pub use qtty::Degrees;
