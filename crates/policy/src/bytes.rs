const UNITS: [(f64, &str); 4] = [
    (1024.0 * 1024.0 * 1024.0 * 1024.0, "TiB"),
    (1024.0 * 1024.0 * 1024.0, "GiB"),
    (1024.0 * 1024.0, "MiB"),
    (1024.0, "KiB"),
];

/// Format a byte count (or bytes/sec rate) as a human-readable string
/// with two decimals, picking the largest unit that fits.
pub fn format_bytes(bytes: f64) -> String {
    for (factor, unit) in UNITS {
        if bytes >= factor {
            return format!("{:.2} {}", bytes / factor, unit);
        }
    }
    format!("{:.0} B", bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_largest_fitting_unit() {
        assert_eq!(format_bytes(512.0), "512 B");
        assert_eq!(format_bytes(10240.0), "10.00 KiB");
        assert_eq!(format_bytes(1048576.0), "1.00 MiB");
        assert_eq!(format_bytes(1.5 * 1024.0 * 1024.0 * 1024.0), "1.50 GiB");
        assert_eq!(format_bytes(1099511627776.0), "1.00 TiB");
    }
}
