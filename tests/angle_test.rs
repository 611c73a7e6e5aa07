//! Angle conversion tests: sexagesimal formatting and parsing round trips.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use webmanager::errors::AppError;
use webmanager::models::angle::*;

#[test]
fn test_hms_round_trip_within_precision() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..2000 {
        let deg: f64 = rng.random_range(0.0..360.0);
        let hms = to_hms(deg).unwrap();
        let back = convert_right_ascension_hms_to_degrees(&hms).unwrap();
        // Values just below 360 come back as 0.
        let diff = (back - deg).rem_euclid(360.0);
        let diff = diff.min(360.0 - diff);
        assert!(diff < 1e-2, "{deg} -> {hms} -> {back}");
    }
}

#[test]
fn test_dms_round_trip_within_precision() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..2000 {
        let deg: f64 = rng.random_range(-90.0..=90.0);
        let dms = to_dms(deg).unwrap();
        let back = convert_declination_dms_to_degrees(&dms).unwrap();
        assert!((back - deg).abs() < 1e-2, "{deg} -> {dms} -> {back}");
    }
}

#[test]
fn test_known_conversions() {
    assert_eq!(to_hms(55.23456).unwrap(), "03:40:56.29");
    assert_eq!(to_hms(0.0).unwrap(), "00:00:00.00");
    assert_eq!(to_hms(59.99999999).unwrap(), "04:00:00.00");
    assert_eq!(to_dms(55.23456).unwrap(), "+55:14:04.42");
    assert_eq!(degrees_to_dms(-23.1234567, 3).unwrap(), "-23:07:24.444");
    assert_eq!(to_dms(0.0).unwrap(), "+00:00:00.00");
}

#[test]
fn test_negative_right_ascension_is_invalid() {
    assert!(matches!(to_hms(-1.0), Err(AppError::InvalidArgument(_))));
    assert!(matches!(to_hms(f64::NAN), Err(AppError::InvalidArgument(_))));
}

#[test]
fn test_right_ascension_parsing() {
    let deg = convert_right_ascension_hms_to_degrees("12:00:00").unwrap();
    assert!((deg - 180.0).abs() < 1e-9);
    let deg = convert_right_ascension_hms_to_degrees("+23\"59'59.99").unwrap();
    assert!((deg - 359.999_958_333).abs() < 1e-6);
    assert!(matches!(
        convert_right_ascension_hms_to_degrees("24"),
        Err(AppError::InvalidArgument(_))
    ));
    for negative in ["-00:30:00", "-0", "-12:00:00"] {
        assert!(matches!(
            convert_right_ascension_hms_to_degrees(negative),
            Err(AppError::InvalidArgument(_))
        ));
    }
}

#[test]
fn test_right_ascension_near_full_circle_parses_back() {
    for deg in [359.9999, 359.99999999, 360.0] {
        let hms = to_hms(deg).unwrap();
        assert_eq!(hms, "00:00:00.00");
        assert_eq!(convert_right_ascension_hms_to_degrees(&hms).unwrap(), 0.0);
    }
}
