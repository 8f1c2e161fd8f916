// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Day/night terminator ring.
//!
//! This module provides:
//! - [`Terminator`]: a sun position plus [`TerminatorOptions`], producing a ring
//! - [`TerminatorRing`]: the closed ring of [`GeoPoint`]s
//! - [`terminator_ring`]: one-shot helper for a (declination, GHA) pair
//!
//! # Construction
//!
//! The ring is laid out in a working frame with longitude `0..360` and
//! latitude `0..180`, then shifted by `(−180, −90)`:
//!
//! ```text
//! (0, 90 + F·90 − 2)            pole-side start, F = +1 if δ > 0 else −1
//! (x, 90 − lat(x))              x = 0, step, 2·step, …, 360
//! (360, 90 + F·90 − 2)          pole-side closure
//! (0, 90 + F·90 − 2)            repeat of the start
//! ```
//!
//! The result covers the hemisphere on the pole side of the curve. A ring
//! with `N` samples has `N + 3` points; the default 0.1° step samples 3601
//! longitudes and yields 3604 points.
//!
//! The pole offset is subtracted for both hemispheres, so the closure
//! vertices sit at 88° when `δ > 0` and at −92° otherwise.

use chrono::{DateTime, Utc};
use qtty::Degrees;
use std::fmt;
use std::iter;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::civil::CivilTime;
use crate::ephemeris::{compute_lat, SunPosition};
use crate::error::{Result, TerminatorError};

/// Default longitude sampling step, in degrees.
pub const DEFAULT_STEP: f64 = 0.1;

/// Smallest accepted sampling step, in degrees (at most 360 001 samples).
pub const MIN_STEP: f64 = 1e-3;

/// Offset subtracted from the closure latitude, in degrees.
pub const POLE_OFFSET: f64 = 2.0;

const FRAME_LON_MAX: f64 = 360.0;
const FRAME_LAT_MID: f64 = 90.0;

/// Shift from the working frame to longitude/latitude degrees.
const FRAME_SHIFT: (f64, f64) = (-180.0, -90.0);

/// A longitude/latitude pair in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint {
    /// Longitude in degrees, east positive.
    pub lon: f64,
    /// Latitude in degrees, north positive.
    pub lat: f64,
}

impl GeoPoint {
    /// Create from longitude and latitude in degrees.
    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    #[inline]
    fn translated(self, (dx, dy): (f64, f64)) -> Self {
        Self::new(self.lon + dx, self.lat + dy)
    }

    /// `true` when neither coordinate is NaN or infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lon, self.lat)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Options
// ═══════════════════════════════════════════════════════════════════════════

/// How the ring is sampled.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TerminatorOptions {
    /// Longitude step between samples, in degrees. Must be in
    /// `[MIN_STEP, 360]`.
    pub step: f64,
    /// Rotate the curve by the Greenwich Hour Angle.
    ///
    /// Off by default: the classic ring uses the declination only, which
    /// puts the subsolar meridian on Greenwich. When on, the curve is
    /// sampled at `lat(x + GHA)` and follows the sun's actual longitude.
    pub follow_hour_angle: bool,
}

impl Default for TerminatorOptions {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            follow_hour_angle: false,
        }
    }
}

impl TerminatorOptions {
    /// Check that `step` is a finite value in `[MIN_STEP, 360]`.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_STEP..=FRAME_LON_MAX).contains(&self.step) {
            return Err(TerminatorError::InvalidStep(self.step));
        }
        Ok(())
    }

    /// Number of longitude samples, both ends of `0..=360` included.
    ///
    /// A step outside `[MIN_STEP, 360]` is clamped into that range first,
    /// so the count is bounded even for options that fail [`validate`].
    ///
    /// [`validate`]: TerminatorOptions::validate
    pub fn sample_count(&self) -> usize {
        // tolerate 360/step landing a rounding error above an integer
        let intervals = (FRAME_LON_MAX / self.clamped_step() - 1e-9).ceil();
        intervals as usize + 1
    }

    /// `step` forced into `[MIN_STEP, 360]`; NaN falls back to the default.
    fn clamped_step(&self) -> f64 {
        if self.step.is_nan() {
            DEFAULT_STEP
        } else {
            self.step.clamp(MIN_STEP, FRAME_LON_MAX)
        }
    }

    fn sample_longitudes(&self) -> impl Iterator<Item = f64> {
        let step = self.clamped_step();
        let count = self.sample_count();
        (0..count).map(move |i| {
            if i + 1 == count {
                FRAME_LON_MAX
            } else {
                i as f64 * step
            }
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TerminatorRing
// ═══════════════════════════════════════════════════════════════════════════

/// Closed ring (first point == last point) approximating the terminator.
///
/// With the `serde` feature, deserialization goes through
/// [`TerminatorRing::from_points`] and rejects open or empty rings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TerminatorRing {
    points: Vec<GeoPoint>,
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for TerminatorRing {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            points: Vec<GeoPoint>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::from_points(raw.points).map_err(de::Error::custom)
    }
}

impl TerminatorRing {
    /// Wrap a vertex list, rejecting it unless it has at least two points
    /// and ends where it starts.
    pub fn from_points(points: Vec<GeoPoint>) -> Result<Self> {
        let ring = Self { points };
        if !ring.is_closed() {
            return Err(TerminatorError::OpenRing { points: ring.len() });
        }
        Ok(ring)
    }

    /// Vertices in drawing order.
    #[inline]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Number of vertices, closing repeat included.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` when the ring has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over the vertices.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, GeoPoint> {
        self.points.iter()
    }

    /// Starting vertex.
    #[inline]
    pub fn first(&self) -> Option<&GeoPoint> {
        self.points.first()
    }

    /// Closing vertex, equal to [`first`](TerminatorRing::first).
    #[inline]
    pub fn last(&self) -> Option<&GeoPoint> {
        self.points.last()
    }

    /// `true` when the ring ends where it starts.
    pub fn is_closed(&self) -> bool {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => self.len() > 1 && first == last,
            _ => false,
        }
    }

    /// `false` if any vertex is NaN or infinite, i.e. the terminator is
    /// undefined for this input and the ring should not be drawn.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(GeoPoint::is_finite)
    }

    /// Latitude of the pole-side closure vertices (88° or −92°).
    pub fn closure_latitude(&self) -> Option<f64> {
        self.first().map(|p| p.lat)
    }

    /// Consume the ring and return its vertex buffer.
    #[inline]
    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }
}

impl IntoIterator for TerminatorRing {
    type Item = GeoPoint;
    type IntoIter = std::vec::IntoIter<GeoPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a TerminatorRing {
    type Item = &'a GeoPoint;
    type IntoIter = std::slice::Iter<'a, GeoPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl fmt::Display for TerminatorRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => {
                write!(f, "ring of {} points, {} to {}", self.len(), first, last)
            }
            _ => write!(f, "empty ring"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Terminator
// ═══════════════════════════════════════════════════════════════════════════

/// Terminator for one sun position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Terminator {
    sun: SunPosition,
    options: TerminatorOptions,
}

impl Terminator {
    /// From an already computed declination and GHA.
    #[inline]
    pub fn new(declination: Degrees, greenwich_hour_angle: Degrees) -> Self {
        Self::from_sun(SunPosition::new(declination, greenwich_hour_angle))
    }

    /// From a [`SunPosition`], with default options.
    #[inline]
    pub fn from_sun(sun: SunPosition) -> Self {
        Self {
            sun,
            options: TerminatorOptions::default(),
        }
    }

    /// Sun position at a civil time.
    #[inline]
    pub fn at(time: &CivilTime) -> Self {
        Self::from_sun(SunPosition::at(time))
    }

    /// Sun position at a UTC instant.
    #[inline]
    pub fn from_utc(datetime: DateTime<Utc>) -> Self {
        Self::from_sun(SunPosition::from_utc(datetime))
    }

    /// Replace the sampling options after validating them.
    pub fn with_options(self, options: TerminatorOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options, ..self })
    }

    /// The sun position the ring is built for.
    #[inline]
    pub fn sun(&self) -> SunPosition {
        self.sun
    }

    /// Current sampling options.
    #[inline]
    pub fn options(&self) -> TerminatorOptions {
        self.options
    }

    /// Build the ring.
    pub fn ring(&self) -> TerminatorRing {
        let dec = self.sun.declination;
        let rotation = if self.options.follow_hour_angle {
            self.sun.greenwich_hour_angle.value()
        } else {
            0.0
        };

        let hemisphere = if dec.value() > 0.0 { 1.0 } else { -1.0 };
        let pole_lat = FRAME_LAT_MID + hemisphere * FRAME_LAT_MID - POLE_OFFSET;
        let start = GeoPoint::new(0.0, pole_lat);
        let closure = GeoPoint::new(FRAME_LON_MAX, pole_lat);

        debug!(
            declination = dec.value(),
            gha = self.sun.greenwich_hour_angle.value(),
            step = self.options.step,
            follow_hour_angle = self.options.follow_hour_angle,
            "building terminator ring"
        );
        if dec.value() == 0.0 {
            trace!("declination is zero; terminator degenerates to the equinox meridians");
        }

        let curve = self.options.sample_longitudes().map(|x| {
            let lat = compute_lat(Degrees::new(x + rotation), dec).value();
            GeoPoint::new(x, FRAME_LAT_MID - lat)
        });

        let points: Vec<GeoPoint> = iter::once(start)
            .chain(curve)
            .chain([closure, start])
            .map(|p| p.translated(FRAME_SHIFT))
            .collect();

        trace!(points = points.len(), "terminator ring built");
        TerminatorRing { points }
    }
}

impl From<SunPosition> for Terminator {
    #[inline]
    fn from(sun: SunPosition) -> Self {
        Self::from_sun(sun)
    }
}

/// Ring for a (declination, GHA) pair with default options.
#[inline]
pub fn terminator_ring(declination: Degrees, greenwich_hour_angle: Degrees) -> TerminatorRing {
    Terminator::new(declination, greenwich_hour_angle).ring()
}
