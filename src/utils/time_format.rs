/// Format a number of seconds as "MM:SS"
///
/// Minutes are not wrapped into hours; durations never exceed 59 minutes.
pub fn format_mm_ss(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mm_ss() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(9), "00:09");
        assert_eq!(format_mm_ss(61), "01:01");
        assert_eq!(format_mm_ss(1500), "25:00");
        assert_eq!(format_mm_ss(3599), "59:59");
    }
}
