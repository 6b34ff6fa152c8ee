/// Render milliseconds as `MM:SS`, or `H:MM:SS` from one hour up.
///
/// Partial seconds are dropped.
pub fn format_remaining(ms: u64) -> String {
    let total_sec = ms / 1000;
    let s = total_sec % 60;
    let m = (total_sec / 60) % 60;
    let h = total_sec / 3600;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_and_seconds() {
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(999), "00:00");
        assert_eq!(format_remaining(25 * 60_000), "25:00");
        assert_eq!(format_remaining(61_500), "01:01");
    }

    #[test]
    fn hours_are_unpadded() {
        assert_eq!(format_remaining(3_600_000), "1:00:00");
        assert_eq!(format_remaining(180 * 60_000), "3:00:00");
        assert_eq!(format_remaining(3_725_000), "1:02:05");
    }
}
