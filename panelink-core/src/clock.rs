//! Wall clock and time string parsing for the timer popup

use crate::error::CoreError;

/// Wall clock derived from the monotonic millisecond tick
///
/// The backend sets the time now and then; between syncs the controller
/// counts forward from the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClock {
    synced: Option<(i64, u32)>,
}

impl WallClock {
    pub const fn new() -> Self {
        Self { synced: None }
    }

    /// Record that `epoch_seconds` was current at `now_ms`
    pub fn sync(&mut self, epoch_seconds: i64, now_ms: u32) {
        self.synced = Some((epoch_seconds, now_ms));
    }

    pub fn is_valid(&self) -> bool {
        self.synced.is_some()
    }

    /// Seconds since the Unix epoch at `now_ms`
    pub fn now(&self, now_ms: u32) -> Option<i64> {
        let (epoch, at_ms) = self.synced?;
        Some(epoch + i64::from(now_ms.wrapping_sub(at_ms) / 1000))
    }
}

/// Split a seconds count into whole minutes and leftover seconds
pub fn split_minutes(seconds: u32) -> (u16, u16) {
    let seconds = seconds.min(u32::from(u16::MAX));
    ((seconds / 60) as u16, (seconds % 60) as u16)
}

/// Parse `H:MM:SS` into (minutes, seconds)
///
/// Hours fold into minutes, so `1:05:00` is 65 minutes.
pub fn parse_hms(text: &str) -> Result<(u16, u16), CoreError> {
    let mut parts = text.trim().split(':');
    let (Some(h), Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(CoreError::MalformedValue);
    };
    let hours = parse_u32(h)?;
    let minutes = parse_u32(m)?;
    // Fractional seconds may follow
    let seconds = parse_u32(s.split('.').next().unwrap_or(s))?;

    let total_minutes = hours.saturating_mul(60).saturating_add(minutes);
    let minutes = total_minutes.min(u32::from(u16::MAX)) as u16;
    Ok((minutes, seconds.min(59) as u16))
}

fn parse_u32(text: &str) -> Result<u32, CoreError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::MalformedValue);
    }
    text.parse().map_err(|_| CoreError::MalformedValue)
}

fn field(text: &str, range: core::ops::Range<usize>) -> Result<i64, CoreError> {
    let part = text.get(range).ok_or(CoreError::MalformedValue)?;
    parse_u32(part).map(i64::from)
}

/// Days from 1970-01-01 to the given civil date
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let month_index = (month + 9) % 12;
    let day_of_year = (153 * month_index + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

/// Parse an ISO 8601 timestamp into seconds since the Unix epoch
///
/// Accepts `YYYY-MM-DDTHH:MM:SS` with an optional fraction and an optional
/// `Z`, `±HH:MM` or `±HHMM` offset. A missing offset means UTC.
pub fn parse_iso8601(text: &str) -> Result<i64, CoreError> {
    let text = text.trim();
    let bytes = text.as_bytes();
    if bytes.len() < 19
        || bytes[4] != b'-'
        || bytes[7] != b'-'
        || !(bytes[10] == b'T' || bytes[10] == b' ')
        || bytes[13] != b':'
        || bytes[16] != b':'
    {
        return Err(CoreError::MalformedValue);
    }

    let year = field(text, 0..4)?;
    let month = field(text, 5..7)?;
    let day = field(text, 8..10)?;
    let hour = field(text, 11..13)?;
    let minute = field(text, 14..16)?;
    let second = field(text, 17..19)?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) || hour > 23 || minute > 59 || second > 60 {
        return Err(CoreError::OutOfRange);
    }

    let mut rest = &text[19..];
    if let Some(fraction) = rest.strip_prefix('.') {
        let digits = fraction.bytes().take_while(u8::is_ascii_digit).count();
        rest = &fraction[digits..];
    }

    let offset = match rest.as_bytes().first() {
        None => 0,
        Some(b'Z') | Some(b'z') if rest.len() == 1 => 0,
        Some(&sign) if sign == b'+' || sign == b'-' => {
            let digits = &rest[1..];
            let (hours, minutes) = match digits.len() {
                5 if digits.as_bytes()[2] == b':' => (field(digits, 0..2)?, field(digits, 3..5)?),
                4 => (field(digits, 0..2)?, field(digits, 2..4)?),
                2 => (field(digits, 0..2)?, 0),
                _ => return Err(CoreError::MalformedValue),
            };
            let offset = hours * 3600 + minutes * 60;
            if sign == b'-' {
                -offset
            } else {
                offset
            }
        }
        _ => return Err(CoreError::MalformedValue),
    };

    let days = days_from_civil(year, month, day);
    Ok(days * 86_400 + hour * 3600 + minute * 60 + second - offset)
}

/// Seconds until `finishes_at`, clamped to what the popup can show
pub fn seconds_until(finishes_at: i64, now: i64) -> u32 {
    let remaining = finishes_at.saturating_sub(now).clamp(0, i64::from(u16::MAX));
    remaining as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hms() {
        assert_eq!(parse_hms("00:05:00"), Ok((5, 0)));
        assert_eq!(parse_hms("1:02:03"), Ok((62, 3)));
        assert_eq!(parse_hms("0:00:07.5"), Ok((0, 7)));
    }

    #[test]
    fn test_parse_hms_rejects_bad_input() {
        assert_eq!(parse_hms(""), Err(CoreError::MalformedValue));
        assert_eq!(parse_hms("05:00"), Err(CoreError::MalformedValue));
        assert_eq!(parse_hms("1:2:3:4"), Err(CoreError::MalformedValue));
        assert_eq!(parse_hms("a:00:00"), Err(CoreError::MalformedValue));
        assert_eq!(parse_hms("-1:00:00"), Err(CoreError::MalformedValue));
    }

    #[test]
    fn test_parse_iso8601_utc() {
        assert_eq!(parse_iso8601("1970-01-01T00:00:00"), Ok(0));
        assert_eq!(parse_iso8601("2000-03-01T00:00:00Z"), Ok(951_868_800));
        assert_eq!(
            parse_iso8601("2024-05-17T12:30:15+00:00"),
            Ok(1_715_949_015)
        );
    }

    #[test]
    fn test_parse_iso8601_offsets_and_fractions() {
        let utc = parse_iso8601("2024-05-17T12:30:15Z").unwrap();
        assert_eq!(parse_iso8601("2024-05-17T14:30:15+02:00"), Ok(utc));
        assert_eq!(parse_iso8601("2024-05-17T07:30:15-0500"), Ok(utc));
        assert_eq!(parse_iso8601("2024-05-17 12:30:15.123456+00:00"), Ok(utc));
    }

    #[test]
    fn test_parse_iso8601_rejects_bad_input() {
        assert!(parse_iso8601("2024-05-17").is_err());
        assert!(parse_iso8601("2024/05/17T12:30:15").is_err());
        assert!(parse_iso8601("2024-13-17T12:30:15").is_err());
        assert!(parse_iso8601("2024-05-17T12:30:15+2").is_err());
        assert!(parse_iso8601("2024-05-17T12:30:15Zjunk").is_err());
    }

    #[test]
    fn test_wall_clock() {
        let mut clock = WallClock::new();
        assert_eq!(clock.now(5000), None);

        clock.sync(1_000_000, 5000);
        assert!(clock.is_valid());
        assert_eq!(clock.now(5000), Some(1_000_000));
        assert_eq!(clock.now(7999), Some(1_000_002));
    }

    #[test]
    fn test_seconds_until_clamps() {
        assert_eq!(seconds_until(100, 40), 60);
        assert_eq!(seconds_until(40, 100), 0);
        assert_eq!(seconds_until(i64::MAX, 0), 65_535);
        assert_eq!(split_minutes(125), (2, 5));
    }
}
