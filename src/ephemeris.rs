// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Low-precision solar almanac
//!
//! Closed-form approximations of the solar declination and the Greenwich
//! Hour Angle (GHA), plus the spherical-astronomy helpers needed to draw the
//! day/night terminator.
//!
//! The coefficients belong to a published short almanac formula family and
//! are not tunable. Typical agreement with a full ephemeris is ≈0.01°,
//! which is all a map overlay needs.
//!
//! ## Quick Example
//! ```rust
//! use daynight::{compute_declination, compute_gha, Degrees};
//!
//! let dec = compute_declination(21, 6, 2012, 12.0);
//! let gha = compute_gha(21, 6, 2012, 12.0);
//! assert!((dec - Degrees::new(23.44)).abs() < Degrees::new(0.1));
//! assert!(gha >= Degrees::new(0.0) && gha < Degrees::new(360.0));
//! ```
//!
//! ## Conventions
//! * Every angle going in or out is in degrees.
//! * Longitudes are positive east, so the local hour angle is `GHA + lon`.
//! * Nothing is validated; degenerate geometry yields limiting or non-finite
//!   values (see [`compute_lat`] and [`compute_azimuth`]).

use chrono::{DateTime, Utc};
use qtty::Degrees;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};

use crate::civil::CivilTime;
use crate::terminator::GeoPoint;

/// Degrees → radians.
const K: f64 = std::f64::consts::PI / 180.0;

/// Day number of the 1900.0 reference used by the declination series.
const DECLINATION_EPOCH_N: f64 = 693_960.0;

/// Day number of the reference used by the hour-angle series.
const GHA_EPOCH_N: f64 = 7.22449e5;

/// Constant bias added to the declination result.
const DECLINATION_BIAS: f64 = 0.00075;

#[inline]
fn sin_d(deg: f64) -> f64 {
    (deg * K).sin()
}

#[inline]
fn cos_d(deg: f64) -> f64 {
    (deg * K).cos()
}

/// Mean obliquity of the ecliptic for a year, in degrees.
#[inline]
fn obliquity(year: i32) -> f64 {
    let t = (year as f64 - 2000.0) / 100.0;
    23.43929111 - (46.8150 + (0.00059 - 0.001813 * t) * t) * t / 3600.0
}

// ------------------------------------------------------------------------------------
// Declination and hour angle
// ------------------------------------------------------------------------------------

/// Solar declination for a civil date and fractional UTC hour.
///
/// The sun's ecliptic longitude is built from the day number (mean
/// longitude plus the first two equation-of-centre terms), then projected
/// onto the equator with the mean obliquity of the year.
///
/// Calendar fields are not checked.
pub fn compute_declination(day: u32, month: u32, year: i32, hour: f64) -> Degrees {
    let n = CivilTime::new(year, month, day, hour).day_number() as f64;

    let cycles = (n - DECLINATION_EPOCH_N) / 1461.0;
    let mut lon = cycles.fract() * 1440.02509 + cycles.trunc() * 0.0307572;
    lon += hour / 24.0 * 0.9856645 + 356.6498973;
    lon += 1.91233 * sin_d(0.9999825 * lon);
    let turns = (lon + sin_d(1.999965 * lon) / 50.0 + 282.55462) / 360.0;
    let lon = turns.fract() * 360.0;

    let s = sin_d(lon) * sin_d(obliquity(year));
    Degrees::new((s / (1.0 - s * s).sqrt()).atan() / K + DECLINATION_BIAS)
}

/// Greenwich Hour Angle of the sun in `[0, 360)`.
///
/// Mean hour angle `360·(P + 0.5)` corrected by a six-harmonic equation of
/// time series (minutes of time, divided by 4 min/°).
pub fn compute_gha(day: u32, month: u32, year: i32, hour: f64) -> Degrees {
    let n = CivilTime::new(year, month, day, hour).day_number() as f64;

    let p = hour / 24.0;
    let x = ((p + n - GHA_EPOCH_N) * 0.98564734 + 279.306) * K;

    let eot = -104.55 * x.sin() - 429.266 * x.cos() + 595.63 * (2.0 * x).sin()
        - 2.283 * (2.0 * x).cos()
        + 4.6 * (3.0 * x).sin()
        + 18.7333 * (3.0 * x).cos()
        - 13.2 * (4.0 * x).sin()
        - (5.0 * x).cos()
        - (5.0 * x).sin() / 3.0
        + 0.5 * (6.0 * x).sin()
        + 0.231;

    let gha = eot / 240.0 + 360.0 * (p + 0.5);
    Degrees::new(gha.rem_euclid(360.0))
}

// ------------------------------------------------------------------------------------
// Observer helpers
// ------------------------------------------------------------------------------------

/// Solar elevation above the horizon for an observer at (`latitude`,
/// `longitude`).
///
/// `asin(sin δ sin φ + cos δ cos φ cos(GHA + λ))`
pub fn compute_height(
    dec: Degrees,
    latitude: Degrees,
    longitude: Degrees,
    gha: Degrees,
) -> Degrees {
    let (dec, lat) = (dec.value(), latitude.value());
    let lha = gha.value() + longitude.value();
    let sin_h = sin_d(dec) * sin_d(lat) + cos_d(dec) * cos_d(lat) * cos_d(lha);
    Degrees::new(sin_h.clamp(-1.0, 1.0).asin() / K)
}

/// Solar azimuth (from north, through east) in `[0, 360)`.
///
/// `height` is the elevation returned by [`compute_height`] for the same
/// observer. When the sun is west of the meridian (`sin(GHA + λ) > 0`) the
/// azimuth is mirrored to `360 − Az`.
///
/// The azimuth is undefined for an observer at a pole or with the sun at
/// the zenith; there the result is NaN or an arbitrary direction.
pub fn compute_azimuth(
    dec: Degrees,
    latitude: Degrees,
    longitude: Degrees,
    gha: Degrees,
    height: Degrees,
) -> Degrees {
    let (lat, h) = (latitude.value(), height.value());
    let cos_az = (sin_d(dec.value()) - sin_d(lat) * sin_d(h)) / (cos_d(h) * cos_d(lat));
    // rounding can push |cos_az| a hair past 1
    let cos_az = cos_az.clamp(-1.0, 1.0);

    let mut az = 90.0 - cos_az.asin() / K;
    if sin_d(gha.value() + longitude.value()) > 0.0 {
        az = 360.0 - az;
    }
    Degrees::new(az.rem_euclid(360.0))
}

/// Latitude of the terminator at `longitude` for a solar declination,
/// before any hour-angle rotation: `atan(−cos λ / tan δ)`.
///
/// At `dec == 0` the quotient is ±∞ and IEEE `atan` returns ±90°, which is
/// the meridian-shaped equinox terminator. NaN only comes out of NaN input.
pub fn compute_lat(longitude: Degrees, dec: Degrees) -> Degrees {
    let t = -cos_d(longitude.value()) / (dec.value() * K).tan();
    Degrees::new(t.atan() / K)
}

// ═══════════════════════════════════════════════════════════════════════════
// SunPosition
// ═══════════════════════════════════════════════════════════════════════════

/// Sun position at an instant: declination and Greenwich Hour Angle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SunPosition {
    /// Solar declination, positive north.
    pub declination: Degrees,
    /// Greenwich Hour Angle in `[0, 360)`, increasing westward.
    pub greenwich_hour_angle: Degrees,
}

impl SunPosition {
    /// Wrap an already computed (declination, GHA) pair.
    #[inline]
    pub const fn new(declination: Degrees, greenwich_hour_angle: Degrees) -> Self {
        Self {
            declination,
            greenwich_hour_angle,
        }
    }

    /// Evaluate the almanac for a civil time.
    pub fn at(time: &CivilTime) -> Self {
        Self::new(
            compute_declination(time.day, time.month, time.year, time.hour),
            compute_gha(time.day, time.month, time.year, time.hour),
        )
    }

    /// Evaluate the almanac for a UTC timestamp.
    #[inline]
    pub fn from_utc(datetime: DateTime<Utc>) -> Self {
        Self::at(&CivilTime::from(datetime))
    }

    /// Elevation of the sun seen from (`latitude`, `longitude`).
    #[inline]
    pub fn elevation_at(&self, latitude: Degrees, longitude: Degrees) -> Degrees {
        compute_height(
            self.declination,
            latitude,
            longitude,
            self.greenwich_hour_angle,
        )
    }

    /// Azimuth of the sun seen from (`latitude`, `longitude`).
    pub fn azimuth_at(&self, latitude: Degrees, longitude: Degrees) -> Degrees {
        let height = self.elevation_at(latitude, longitude);
        compute_azimuth(
            self.declination,
            latitude,
            longitude,
            self.greenwich_hour_angle,
            height,
        )
    }

    /// Terminator latitude at `longitude` (see [`compute_lat`]).
    #[inline]
    pub fn terminator_latitude(&self, longitude: Degrees) -> Degrees {
        compute_lat(longitude, self.declination)
    }

    /// Point where the sun stands at the zenith.
    ///
    /// Latitude is the declination, longitude is `−GHA` wrapped into
    /// `[-180, 180)`.
    pub fn subsolar_point(&self) -> GeoPoint {
        let lon = (180.0 - self.greenwich_hour_angle.value()).rem_euclid(360.0) - 180.0;
        GeoPoint::new(lon, self.declination.value())
    }
}

impl fmt::Display for SunPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dec {:.4}°, GHA {:.4}°",
            self.declination.value(),
            self.greenwich_hour_angle.value()
        )
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for SunPosition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("SunPosition", 2)?;
        s.serialize_field("declination_deg", &self.declination.value())?;
        s.serialize_field("gha_deg", &self.greenwich_hour_angle.value())?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for SunPosition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            declination_deg: f64,
            gha_deg: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(SunPosition::new(
            Degrees::new(raw.declination_deg),
            Degrees::new(raw.gha_deg),
        ))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn deg(v: f64) -> Degrees {
        Degrees::new(v)
    }

    #[test]
    fn declination_near_june_solstice() {
        let dec = compute_declination(21, 6, 2012, 12.0);
        assert!(
            (dec.value() - 23.4376).abs() < 1e-3,
            "declination = {}",
            dec.value()
        );
    }

    #[test]
    fn declination_near_december_solstice() {
        let dec = compute_declination(21, 12, 2012, 12.0);
        assert!(
            (dec.value() + 23.4370).abs() < 1e-3,
            "declination = {}",
            dec.value()
        );
    }

    #[test]
    fn declination_near_march_equinox() {
        let dec = compute_declination(21, 3, 2012, 12.0);
        assert!(dec.value().abs() < 1.0, "declination = {}", dec.value());
        // equinox 2012 fell on March 20 ~05:14 UTC, so the 21st is north
        assert!(dec.value() > 0.0);
    }

    #[test]
    fn declination_changes_sign_across_september_equinox() {
        let before = compute_declination(20, 9, 2012, 12.0);
        let after = compute_declination(24, 9, 2012, 12.0);
        assert!(before.value() > 0.0);
        assert!(after.value() < 0.0);
    }

    #[test]
    fn declination_stays_within_axial_tilt() {
        for year in [1990, 2000, 2012, 2024, 2050] {
            for month in 1..=12 {
                for day in [1, 8, 15, 22, 28] {
                    for hour in [0.0, 6.5, 12.0, 23.75] {
                        let dec = compute_declination(day, month, year, hour).value();
                        assert!(dec.abs() <= 23.5, "{year}-{month}-{day} {hour}h: {dec}");
                    }
                }
            }
        }
    }

    #[test]
    fn declination_and_gha_are_deterministic() {
        let a = compute_declination(14, 2, 2031, 7.25);
        let b = compute_declination(14, 2, 2031, 7.25);
        assert_eq!(a.value().to_bits(), b.value().to_bits());

        let a = compute_gha(14, 2, 2031, 7.25);
        let b = compute_gha(14, 2, 2031, 7.25);
        assert_eq!(a.value().to_bits(), b.value().to_bits());
    }

    #[test]
    fn gha_near_noon_is_near_greenwich() {
        // equation of time on June 21 is about −1.8 min ≈ −0.45°
        let gha = compute_gha(21, 6, 2012, 12.0).value();
        assert!((gha - 359.5496).abs() < 1e-3, "gha = {gha}");

        let gha = compute_gha(21, 12, 2012, 12.0).value();
        assert!((gha - 0.4088).abs() < 1e-3, "gha = {gha}");
    }

    #[test]
    fn gha_at_midnight_is_near_antimeridian() {
        let gha = compute_gha(21, 6, 2012, 0.0).value();
        assert!((gha - 179.5768).abs() < 1e-3, "gha = {gha}");
    }

    #[test]
    fn gha_advances_fifteen_degrees_per_hour() {
        let a = compute_gha(3, 11, 2015, 8.0).value();
        let b = compute_gha(3, 11, 2015, 9.0).value();
        assert!(((b - a) - 15.0).abs() < 0.01);
    }

    #[test]
    fn gha_is_always_in_range() {
        for month in 1..=12 {
            for day in [1, 10, 20, 28] {
                let mut hour = 0.0;
                while hour <= 24.0 {
                    let gha = compute_gha(day, month, 2020, hour).value();
                    assert!((0.0..360.0).contains(&gha), "{month}-{day} {hour}h: {gha}");
                    hour += 0.25;
                }
            }
        }
    }

    #[test]
    fn height_at_subsolar_point_is_ninety() {
        let h = compute_height(deg(20.0), deg(20.0), deg(-30.0), deg(30.0));
        assert!((h.value() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn height_at_antisolar_point_is_minus_ninety() {
        let h = compute_height(deg(20.0), deg(-20.0), deg(150.0), deg(30.0));
        assert!((h.value() + 90.0).abs() < 1e-4);
    }

    #[test]
    fn height_on_equinox_meridian_is_colatitude() {
        let h = compute_height(deg(0.0), deg(50.0), deg(0.0), deg(0.0));
        assert!((h.value() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn azimuth_at_local_noon_points_south() {
        let (dec, lat, lon, gha) = (deg(10.0), deg(50.0), deg(0.0), deg(0.0));
        let h = compute_height(dec, lat, lon, gha);
        let az = compute_azimuth(dec, lat, lon, gha, h);
        assert!((az.value() - 180.0).abs() < 1e-3, "az = {}", az.value());
    }

    #[test]
    fn azimuth_morning_is_east_and_afternoon_is_west() {
        let (dec, lat, lon) = (deg(0.0), deg(45.0), deg(0.0));

        // GHA 300 → local hour angle −60°, sun in the east
        let h = compute_height(dec, lat, lon, deg(300.0));
        let az = compute_azimuth(dec, lat, lon, deg(300.0), h).value();
        assert!(az > 0.0 && az < 180.0, "az = {az}");

        // GHA 60 → sun in the west
        let h = compute_height(dec, lat, lon, deg(60.0));
        let az = compute_azimuth(dec, lat, lon, deg(60.0), h).value();
        assert!(az > 180.0 && az < 360.0, "az = {az}");
    }

    #[test]
    fn azimuth_is_always_in_range() {
        for dec in [-23.0, -5.0, 0.0, 12.0, 23.0] {
            for lat in [-70.0, -30.0, 0.5, 35.0, 65.0] {
                for gha in (0..360).step_by(7) {
                    let (dec, lat, lon, gha) = (deg(dec), deg(lat), deg(13.0), deg(gha as f64));
                    let h = compute_height(dec, lat, lon, gha);
                    let az = compute_azimuth(dec, lat, lon, gha, h).value();
                    assert!((0.0..360.0).contains(&az), "az = {az}");
                }
            }
        }
    }

    #[test]
    fn terminator_latitude_formula() {
        // lon 0: atan(−1/tan δ) = δ − 90 for δ > 0
        let lat = compute_lat(deg(0.0), deg(23.0));
        assert!((lat.value() - (23.0 - 90.0)).abs() < 1e-9);

        // lon 90: cos = 0 → terminator crosses the equator
        let lat = compute_lat(deg(90.0), deg(23.0));
        assert!(lat.value().abs() < 1e-9);
    }

    #[test]
    fn terminator_latitude_at_zero_declination_is_polar() {
        assert_eq!(compute_lat(deg(10.0), deg(0.0)).value(), -90.0);
        assert_eq!(compute_lat(deg(200.0), deg(0.0)).value(), 90.0);
        assert!(compute_lat(deg(10.0), deg(f64::NAN)).value().is_nan());
    }

    #[test]
    fn terminator_latitude_near_equinox_is_steep() {
        let dec = compute_declination(20, 3, 2012, 12.0);
        let lat = compute_lat(deg(30.0), dec);
        assert!(lat.value().abs() > 80.0, "lat = {}", lat.value());
    }

    #[test]
    fn sun_position_at_civil_time_matches_free_functions() {
        let t = CivilTime::new(2012, 6, 21, 12.0);
        let sun = SunPosition::at(&t);
        assert_eq!(sun.declination, compute_declination(21, 6, 2012, 12.0));
        assert_eq!(sun.greenwich_hour_angle, compute_gha(21, 6, 2012, 12.0));

        let dt = Utc.with_ymd_and_hms(2012, 6, 21, 12, 0, 0).unwrap();
        assert_eq!(SunPosition::from_utc(dt), sun);
    }

    #[test]
    fn subsolar_point_has_sun_overhead() {
        let sun = SunPosition::at(&CivilTime::new(2019, 8, 3, 16.5));
        let p = sun.subsolar_point();
        assert!((-180.0..180.0).contains(&p.lon));
        let h = sun.elevation_at(deg(p.lat), deg(p.lon));
        assert!((h.value() - 90.0).abs() < 1e-4, "h = {}", h.value());
    }

    #[test]
    fn subsolar_longitude_wraps_west_of_greenwich() {
        let sun = SunPosition::new(deg(5.0), deg(90.0));
        assert!((sun.subsolar_point().lon + 90.0).abs() < 1e-12);
        let sun = SunPosition::new(deg(5.0), deg(270.0));
        assert!((sun.subsolar_point().lon - 90.0).abs() < 1e-12);
    }

    #[test]
    fn display_sun_position() {
        let s = format!("{}", SunPosition::new(deg(23.5), deg(180.0)));
        assert!(s.contains("dec 23.5000"));
        assert!(s.contains("GHA 180.0000"));
    }
}
