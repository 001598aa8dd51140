//! Human-readable mass strings.

/// SI gram prefixes from largest to smallest.
const UNITS: &[(f64, &str)] = &[
    (1e24, "Yg"),
    (1e21, "Zg"),
    (1e18, "Eg"),
    (1e15, "Pg"),
    (1e12, "Tg"),
    (1e9, "Gg"),
    (1e6, "Mg"),
    (1e3, "kg"),
    (1.0, "g"),
    (1e-3, "mg"),
    (1e-6, "μg"),
    (1e-9, "ng"),
    (1e-12, "pg"),
    (1e-15, "fg"),
    (1e-18, "ag"),
];

/// Format a mass in grams with the largest unit it reaches
/// (e.g. 2.5e-15 → "2.50 fg", 1.234e-4 → "123 μg").
///
/// Values of 1000 or more in the largest unit switch to scientific notation.
/// Anything below one attogram (including zero) is shown in grams.
pub fn format_mass(mass: f64) -> String {
    if !mass.is_finite() {
        return format!("{} g", mass);
    }
    for &(value, symbol) in UNITS {
        if mass >= value {
            let scaled = mass / value;
            if scaled >= 1000.0 {
                return format!("{:.2e} {}", scaled, symbol);
            }
            let decimals = if scaled >= 100.0 {
                0
            } else if scaled >= 10.0 {
                1
            } else {
                2
            };
            return format!("{:.*} {}", decimals, scaled, symbol);
        }
    }
    format!("{:.2e} g", mass)
}

/// Format a percentage with one decimal (e.g. 42.26 → "42.3%").
pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}
