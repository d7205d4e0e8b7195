//! Built-in saturation tables, (temperature °F, pressure psig), ascending.
//!
//! Points are taken from standard pressure/temperature field charts at the
//! resolution technicians use (10 °F steps). Blends use dew-point values so
//! superheat computed against them is conservative.

pub const R410A_PT: &[(f64, f64)] = &[
    (-20.0, 25.6),
    (-10.0, 36.1),
    (0.0, 48.3),
    (10.0, 62.3),
    (20.0, 78.3),
    (30.0, 96.8),
    (40.0, 118.3),
    (50.0, 142.2),
    (60.0, 170.0),
    (70.0, 201.1),
    (80.0, 235.9),
    (90.0, 274.6),
    (100.0, 317.4),
    (110.0, 364.8),
    (120.0, 416.9),
    (130.0, 474.4),
    (140.0, 537.6),
    (150.0, 607.0),
];

pub const R22_PT: &[(f64, f64)] = &[
    (-20.0, 10.2),
    (-10.0, 16.5),
    (0.0, 24.0),
    (10.0, 32.8),
    (20.0, 43.1),
    (30.0, 54.9),
    (40.0, 68.6),
    (50.0, 84.1),
    (60.0, 101.6),
    (70.0, 121.4),
    (80.0, 143.7),
    (90.0, 168.4),
    (100.0, 195.9),
    (110.0, 226.4),
    (120.0, 259.9),
    (130.0, 296.8),
    (140.0, 337.3),
    (150.0, 381.5),
];

pub const R134A_PT: &[(f64, f64)] = &[
    (-10.0, 1.8),
    (0.0, 6.5),
    (10.0, 11.9),
    (20.0, 18.4),
    (30.0, 26.1),
    (40.0, 35.0),
    (50.0, 45.4),
    (60.0, 57.4),
    (70.0, 71.1),
    (80.0, 86.7),
    (90.0, 104.3),
    (100.0, 124.1),
    (110.0, 146.3),
    (120.0, 171.1),
    (130.0, 198.7),
    (140.0, 229.2),
    (150.0, 262.8),
];

pub const R32_PT: &[(f64, f64)] = &[
    (-20.0, 28.2),
    (-10.0, 39.5),
    (0.0, 52.6),
    (10.0, 67.7),
    (20.0, 85.0),
    (30.0, 104.7),
    (40.0, 127.1),
    (50.0, 152.3),
    (60.0, 180.6),
    (70.0, 212.2),
    (80.0, 247.4),
    (90.0, 286.4),
    (100.0, 329.5),
    (110.0, 376.9),
    (120.0, 429.0),
    (130.0, 486.1),
    (140.0, 548.4),
];

pub const R407C_PT: &[(f64, f64)] = &[
    (-10.0, 19.5),
    (0.0, 28.9),
    (10.0, 39.9),
    (20.0, 52.8),
    (30.0, 67.8),
    (40.0, 85.1),
    (50.0, 104.9),
    (60.0, 127.5),
    (70.0, 153.2),
    (80.0, 182.1),
    (90.0, 214.6),
    (100.0, 250.9),
    (110.0, 291.2),
    (120.0, 335.9),
    (130.0, 385.2),
    (140.0, 439.4),
];

pub const R454B_PT: &[(f64, f64)] = &[
    (-20.0, 22.9),
    (-10.0, 32.8),
    (0.0, 44.2),
    (10.0, 57.4),
    (20.0, 72.5),
    (30.0, 89.9),
    (40.0, 110.0),
    (50.0, 132.6),
    (60.0, 158.1),
    (70.0, 186.9),
    (80.0, 219.1),
    (90.0, 255.1),
    (100.0, 295.0),
    (110.0, 339.2),
    (120.0, 388.0),
    (130.0, 441.7),
    (140.0, 500.6),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_monotonic(table: &[(f64, f64)], name: &str) {
        assert!(table.len() >= 2, "{name} too short");
        for pair in table.windows(2) {
            assert!(
                pair[1].0 > pair[0].0 && pair[1].1 > pair[0].1,
                "{name} not strictly increasing at {:?}",
                pair
            );
        }
    }

    #[test]
    fn all_tables_strictly_increasing() {
        assert_monotonic(R410A_PT, "R410A");
        assert_monotonic(R22_PT, "R22");
        assert_monotonic(R134A_PT, "R134a");
        assert_monotonic(R32_PT, "R32");
        assert_monotonic(R407C_PT, "R407C");
        assert_monotonic(R454B_PT, "R454B");
    }
}
