use chrono::{NaiveDate, NaiveTime};

/// Layout of the date line under the clock. Weekday variants render the
/// weekday name on its own line above the numeric date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    WeekdayMdy,
    WeekdayDmy,
    WeekdayIso,
    Mdy,
    Dmy,
    Iso,
    None,
}

impl DateStyle {
    /// Parses the configuration spelling of a date style. Returns `None` for
    /// anything outside the known set; callers treat that as the `none` style
    /// after logging.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "weekday-mdy" => Some(Self::WeekdayMdy),
            "weekday-dmy" => Some(Self::WeekdayDmy),
            "weekday-iso" => Some(Self::WeekdayIso),
            "mdy" => Some(Self::Mdy),
            "dmy" => Some(Self::Dmy),
            "iso" => Some(Self::Iso),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::WeekdayMdy => "weekday-mdy",
            Self::WeekdayDmy => "weekday-dmy",
            Self::WeekdayIso => "weekday-iso",
            Self::Mdy => "mdy",
            Self::Dmy => "dmy",
            Self::Iso => "iso",
            Self::None => "none",
        }
    }
}

/// Formats the time of day. 24-hour mode is always zero-padded `HH:MM:SS`;
/// 12-hour mode drops the leading zero on the hour and appends `AM`/`PM`.
pub fn format_time(time: NaiveTime, clock_24hr: bool) -> String {
    if clock_24hr {
        time.format("%H:%M:%S").to_string()
    } else {
        time.format("%-I:%M:%S %p").to_string()
    }
}

/// Formats the date for the given style. Multi-line styles separate lines
/// with `\n`; the `None` style yields an empty string so the renderer skips
/// the date block entirely.
pub fn format_date(date: NaiveDate, style: DateStyle) -> String {
    match style {
        DateStyle::WeekdayMdy => date.format("%A\n%m-%d-%Y").to_string(),
        DateStyle::WeekdayDmy => date.format("%A\n%d-%m-%Y").to_string(),
        DateStyle::WeekdayIso => date.format("%A\n%Y-%m-%d").to_string(),
        DateStyle::Mdy => date.format("%m-%d-%Y").to_string(),
        DateStyle::Dmy => date.format("%d-%m-%Y").to_string(),
        DateStyle::Iso => date.format("%Y-%m-%d").to_string(),
        DateStyle::None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn twenty_four_hour_is_zero_padded() {
        assert_eq!(format_time(time(9, 5, 3), true), "09:05:03");
        assert_eq!(format_time(time(0, 0, 0), true), "00:00:00");
        assert_eq!(format_time(time(23, 59, 59), true), "23:59:59");
        for h in 0..24 {
            assert_eq!(format_time(time(h, 8, 24), true).len(), 8);
        }
    }

    #[test]
    fn twelve_hour_drops_leading_zero() {
        assert_eq!(format_time(time(9, 5, 3), false), "9:05:03 AM");
        assert_eq!(format_time(time(13, 5, 3), false), "1:05:03 PM");
        assert_eq!(format_time(time(22, 8, 24), false), "10:08:24 PM");
        for h in 0..24 {
            let text = format_time(time(h, 8, 24), false);
            assert!(!text.starts_with('0'), "leading zero in {text}");
            assert!(text.ends_with("AM") || text.ends_with("PM"));
        }
    }

    #[test]
    fn twelve_hour_midnight_and_noon() {
        assert_eq!(format_time(time(0, 15, 0), false), "12:15:00 AM");
        assert_eq!(format_time(time(12, 15, 0), false), "12:15:00 PM");
    }

    #[test]
    fn date_styles_order_fields() {
        let d = date(2026, 2, 19);
        assert_eq!(format_date(d, DateStyle::Iso), "2026-02-19");
        assert_eq!(format_date(d, DateStyle::Mdy), "02-19-2026");
        assert_eq!(format_date(d, DateStyle::Dmy), "19-02-2026");
    }

    #[test]
    fn weekday_styles_add_a_leading_line() {
        let d = date(2026, 2, 19);
        assert_eq!(format_date(d, DateStyle::WeekdayMdy), "Thursday\n02-19-2026");
        assert_eq!(format_date(d, DateStyle::WeekdayDmy), "Thursday\n19-02-2026");
        assert_eq!(format_date(d, DateStyle::WeekdayIso), "Thursday\n2026-02-19");
    }

    #[test]
    fn none_style_is_empty_for_any_date() {
        assert_eq!(format_date(date(2026, 2, 19), DateStyle::None), "");
        assert_eq!(format_date(date(1999, 12, 31), DateStyle::None), "");
    }

    #[test]
    fn parse_accepts_every_documented_style() {
        for name in [
            "weekday-mdy",
            "weekday-dmy",
            "weekday-iso",
            "mdy",
            "dmy",
            "iso",
            "none",
        ] {
            let style = DateStyle::parse(name).unwrap();
            assert_eq!(style.name(), name);
        }
    }

    #[test]
    fn parse_rejects_unknown_spellings() {
        assert_eq!(DateStyle::parse("ymd"), None);
        assert_eq!(DateStyle::parse("WEEKDAY-MDY"), None);
        assert_eq!(DateStyle::parse(""), None);
    }
}
