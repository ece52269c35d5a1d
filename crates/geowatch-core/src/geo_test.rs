use super::*;

const TOLERANCE: f64 = 1e-4;

#[test]
fn renders_positive_latitude_with_north_letter() {
    assert_eq!(
        decimal_to_sexagesimal(42.061_111, Axis::Latitude),
        "42°03'40.0\"N"
    );
}

#[test]
fn renders_negative_latitude_with_south_letter() {
    let s = decimal_to_sexagesimal(-8.5, Axis::Latitude);
    assert!(s.ends_with('S'), "expected S suffix, got {s}");
    assert!(s.starts_with("8°30'"), "got {s}");
}

#[test]
fn renders_negative_longitude_with_west_letter() {
    let s = decimal_to_sexagesimal(-120.25, Axis::Longitude);
    assert!(s.ends_with('W'), "expected W suffix, got {s}");
}

#[test]
fn seconds_rounding_carries_into_minutes() {
    // 34 + 59/60 + 59.97/3600 rounds to 35°00'00.0" rather than 34°59'60.0".
    let value = 34.0 + 59.0 / 60.0 + 59.97 / 3600.0;
    assert_eq!(decimal_to_sexagesimal(value, Axis::Latitude), "35°00'00.0\"N");
}

#[test]
fn round_trip_is_stable_within_tolerance() {
    let samples = [
        0.0,
        35.689_7,
        -35.689_7,
        139.692_2,
        -139.692_2,
        89.999_9,
        0.000_3,
    ];
    for (axis, _) in [(Axis::Latitude, "lat"), (Axis::Longitude, "lon")] {
        for d in samples {
            let rendered = decimal_to_sexagesimal(d, axis);
            let back = sexagesimal_to_decimal(&rendered).unwrap();
            assert!(
                (back - d).abs() <= TOLERANCE,
                "round trip of {d} via {rendered} gave {back}"
            );
        }
    }
}

#[test]
fn parses_sexagesimal_with_spaces() {
    let d = sexagesimal_to_decimal("42° 03' 40.0\" N").unwrap();
    assert!((d - 42.061_111).abs() <= TOLERANCE);
}

#[test]
fn south_letter_negates_latitude() {
    let d = sexagesimal_to_decimal("8°30'00.0\"S").unwrap();
    assert!((d + 8.5).abs() <= TOLERANCE);
}

#[test]
fn west_letter_negates_longitude() {
    let d = sexagesimal_to_decimal("120°15'00.0\"W").unwrap();
    assert!((d + 120.25).abs() <= TOLERANCE);
}

#[test]
fn hemisphere_letter_is_case_insensitive() {
    let d = sexagesimal_to_decimal("8°30'00.0\"s").unwrap();
    assert!(d < 0.0);
}

#[test]
fn missing_second_mark_is_a_format_error() {
    let err = sexagesimal_to_decimal("31°53.1'N").unwrap_err();
    assert!(matches!(err, CoreError::CoordinateFormat(_)));
}

#[test]
fn garbage_is_a_format_error() {
    assert!(sexagesimal_to_decimal("submarine").is_err());
    assert!(sexagesimal_to_decimal("").is_err());
}

#[test]
fn degree_minute_fallback_parses_decimal_minutes() {
    // The notation sexagesimal_to_decimal rejects.
    let d = degree_minutes_to_decimal("31°53.1'N").unwrap();
    assert!((d - (31.0 + 53.1 / 60.0)).abs() <= TOLERANCE);
}

#[test]
fn degree_minute_fallback_honors_west() {
    let d = degree_minutes_to_decimal("140°02.5'W").unwrap();
    assert!((d + (140.0 + 2.5 / 60.0)).abs() <= TOLERANCE);
}

#[test]
fn degree_minute_fallback_requires_degree_mark() {
    assert!(degree_minutes_to_decimal("31 53.1 N").is_err());
}

#[test]
fn recovered_decimal_rerenders_canonically() {
    let d = degree_minutes_to_decimal("31°53.1'N").unwrap();
    let canonical = decimal_to_sexagesimal(d, Axis::Latitude);
    let back = sexagesimal_to_decimal(&canonical).unwrap();
    assert!((back - d).abs() <= TOLERANCE);
}

#[test]
fn meters_to_feet_uses_exact_factor() {
    assert!((meters_to_feet(1.0) - 3.28084).abs() < 1e-9);
    assert!((meters_to_feet(3776.0) - 12_388.451_84).abs() < 1e-4);
}

#[test]
fn geopoint_from_decimal_keeps_representations_in_sync() {
    let p = GeoPoint::from_decimal(35.5, -139.75);
    assert!(p.sexagesimal.latitude.ends_with('N'));
    assert!(p.sexagesimal.longitude.ends_with('W'));
    let lat = sexagesimal_to_decimal(&p.sexagesimal.latitude).unwrap();
    assert!((lat - 35.5).abs() <= TOLERANCE);
}
