use chrono::{DateTime, Utc};

/// Seconds since the Unix epoch with microsecond precision, e.g.
/// `"1700000000.123456"`. Used as the value of membership and redemption maps.
pub fn epoch_timestamp() -> String {
    format_epoch(Utc::now())
}

fn format_epoch(at: DateTime<Utc>) -> String {
    format!("{}.{:06}", at.timestamp(), at.timestamp_subsec_micros())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_epoch_pads_fraction() {
        let at = DateTime::from_timestamp(1_700_000_000, 5_000).unwrap();
        assert_eq!(format_epoch(at), "1700000000.000005");
    }

    #[test]
    fn test_epoch_timestamp_is_numeric() {
        let seconds: f64 = epoch_timestamp().parse().unwrap();
        assert!(seconds > 1_600_000_000.0);
    }
}
