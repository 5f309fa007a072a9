use iso8601::{Date, DateTime, Time};
use xml::escape::escape_str_attribute;

use std::borrow::Cow;

/// Escape a string for use as XML characters.
///
/// All five predefined entities (`& < > ' "`) are replaced, so the result is safe both as element
/// text and inside attribute values.
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    escape_str_attribute(s)
}

/// Formats a date/time in the compact form XML-RPC servers expect (`19980717T14:08:55`).
///
/// Milliseconds and the UTC offset are only appended when they are non-zero, which keeps the
/// output readable by servers that only understand the basic form.
pub fn format_datetime(date_time: &DateTime) -> String {
    let Time {
        hour, minute, second, millisecond, tz_offset_hours, tz_offset_minutes
    } = date_time.time;

    let date = match date_time.date {
        Date::YMD { year, month, day } => format!("{:04}{:02}{:02}", year, month, day),
        Date::Week { year, ww, d } => format!("{:04}-W{:02}-{}", year, ww, d),
        Date::Ordinal { year, ddd } => format!("{:04}-{:03}", year, ddd),
    };

    let mut formatted = format!("{}T{:02}:{:02}:{:02}", date, hour, minute, second);
    if millisecond != 0 {
        formatted.push_str(&format!(".{:03}", millisecond));
    }
    if tz_offset_hours != 0 || tz_offset_minutes != 0 {
        let sign = if tz_offset_hours < 0 || tz_offset_minutes < 0 { '-' } else { '+' };
        formatted.push_str(&format!(
            "{}{:02}:{:02}",
            sign,
            tz_offset_hours.abs(),
            tz_offset_minutes.abs()
        ));
    }
    formatted
}
