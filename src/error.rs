// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error type for the checked constructors.
//!
//! The astronomical formulas themselves never fail: a degenerate geometry
//! (declination exactly zero, observer at a pole) shows up as a limiting or
//! non-finite `f64`, not as an error. Only the validating entry points
//! ([`CivilTime::try_new`](crate::CivilTime::try_new),
//! [`TerminatorOptions::validate`](crate::TerminatorOptions::validate) and
//! [`TerminatorRing::from_points`](crate::TerminatorRing::from_points))
//! return [`TerminatorError`].

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerminatorError {
    /// The calendar date does not exist (e.g. February 30, month 13).
    #[error("invalid date {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// The fractional UTC hour is outside `[0, 24]` or not finite.
    #[error("invalid fractional hour {0}, expected a value in [0, 24]")]
    InvalidHour(f64),

    /// The longitude sampling step is not a finite value in `[0.001, 360]`.
    #[error("invalid sampling step {0}°, expected a value in [0.001, 360]")]
    InvalidStep(f64),

    /// A vertex list does not start and end on the same point.
    #[error("ring of {points} points is not closed")]
    OpenRing { points: usize },
}

/// Convenience alias for `Result<T, TerminatorError>`.
pub type Result<T> = std::result::Result<T, TerminatorError>;
