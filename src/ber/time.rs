//! UTCTime values.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::fmt;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use super::error::Error;
use super::mode::Mode;


//------------ UtcTime -------------------------------------------------------

/// A validated UTCTime.
///
/// The content of a UTCTime value is an ASCII string of the form
/// `YYMMDDhhmm[ss](Z|[+-]hhmm)`. DER only allows the form with seconds and
/// the literal `Z`. BER allows leaving out the seconds and giving an explicit
/// offset from UTC instead.
///
/// Two-digit years are expanded following RFC 5280: values of 50 and above
/// are in the 1900s, everything else in the 2000s.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct UtcTime {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,

    /// The second or 0 if the value didn’t have any.
    second: u8,

    has_seconds: bool,

    /// Whether an explicit offset was given rather than `Z`.
    is_non_utc: bool,

    /// The offset from UTC in minutes.
    offset: i16,
}

impl UtcTime {
    /// Parses and validates the content of a UTCTime value.
    pub fn parse(data: &[u8], mode: Mode) -> Result<Self, Error> {
        // The position of the zone marker tells us whether there are
        // seconds. It also guarantees that the numeric fields are there.
        let tzpos = match data.iter().position(|ch| b"Z+-".contains(ch)) {
            Some(pos) => pos,
            None => xerr!(return Err(Error::InvalidFormat))
        };
        if tzpos != 12 && !(mode.is_ber() && tzpos == 10) {
            xerr!(return Err(Error::InvalidFormat))
        }
        if !data[..tzpos].iter().all(u8::is_ascii_digit) {
            xerr!(return Err(Error::InvalidFormat))
        }
        let has_seconds = tzpos == 12;

        let year = u16::from(two_digits(data, 0));
        let mut res = UtcTime {
            year: if year >= 50 { 1900 + year } else { 2000 + year },
            month: two_digits(data, 2),
            day: two_digits(data, 4),
            hour: two_digits(data, 6),
            minute: two_digits(data, 8),
            second: if has_seconds { two_digits(data, 10) } else { 0 },
            has_seconds,
            is_non_utc: false,
            offset: 0,
        };
        if !res.is_valid_calendar() {
            xerr!(return Err(Error::InvalidFormat))
        }

        let zone = &data[tzpos..];
        if zone == b"Z" {
            return Ok(res)
        }
        if mode.is_der() || zone.len() != 5 || zone[0] == b'Z' {
            xerr!(return Err(Error::InvalidFormat))
        }
        if !zone[1..].iter().all(u8::is_ascii_digit) {
            xerr!(return Err(Error::InvalidFormat))
        }
        let (hours, minutes) = (two_digits(zone, 1), two_digits(zone, 3));
        if hours >= 24 || minutes >= 60 {
            xerr!(return Err(Error::InvalidFormat))
        }
        let offset = i16::from(hours) * 60 + i16::from(minutes);
        res.is_non_utc = true;
        res.offset = if zone[0] == b'-' { -offset } else { offset };
        Ok(res)
    }

    /// Renders the content of a UTCTime value for display.
    ///
    /// If the content isn’t valid, returns a placeholder.
    pub fn describe(data: &[u8], mode: Mode) -> String {
        match Self::parse(data, mode) {
            Ok(time) => time.to_string(),
            Err(_) => String::from("[Invalid date and time]")
        }
    }

    /// Checks the date and time against the Gregorian calendar.
    ///
    /// Leap seconds are not allowed by X.680.
    fn is_valid_calendar(&self) -> bool {
        (1..=12).contains(&self.month)
        && self.day >= 1
        && self.day <= last_day_of_month(self.year, self.month)
        && self.hour < 24
        && self.minute < 60
        && self.second < 60
    }

    /// Returns the year including the century.
    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the second or 0 if the value didn’t contain seconds.
    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn has_seconds(&self) -> bool {
        self.has_seconds
    }

    /// Returns whether the value contained an explicit offset.
    pub fn is_non_utc(&self) -> bool {
        self.is_non_utc
    }

    /// Returns the offset from UTC in minutes.
    pub fn offset(&self) -> i16 {
        self.offset
    }

    /// Converts the value into a chrono date and time.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(i32::from(self.offset) * 60)?;
        let naive = NaiveDate::from_ymd_opt(
            i32::from(self.year), u32::from(self.month), u32::from(self.day)
        )?.and_hms_opt(
            u32::from(self.hour), u32::from(self.minute),
            u32::from(self.second)
        )?;
        offset.from_local_datetime(&naive).single()
    }
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "{:04}-{:02}-{:02} {:02}:{:02}:{:02} (UTC",
            self.year, self.month, self.day,
            self.hour, self.minute, self.second
        )?;
        if self.is_non_utc {
            let sign = if self.offset < 0 { '-' } else { '+' };
            let offset = self.offset.unsigned_abs();
            write!(f, "{}{:02}{:02}", sign, offset / 60, offset % 60)?;
        }
        f.write_str(")")
    }
}


//------------ Helper Functions ----------------------------------------------

/// Returns the value of the two ASCII digits at `pos`.
///
/// The caller has to make sure these are indeed digits.
fn two_digits(data: &[u8], pos: usize) -> u8 {
    (data[pos] - b'0') * 10 + (data[pos + 1] - b'0')
}

/// Returns the last day of the given month.
fn last_day_of_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            }
            else {
                28
            }
        }
        _ => 0
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn ber(s: &str) -> Result<UtcTime, Error> {
        UtcTime::parse(s.as_bytes(), Mode::Ber)
    }

    fn der(s: &str) -> Result<UtcTime, Error> {
        UtcTime::parse(s.as_bytes(), Mode::Der)
    }

    #[test]
    fn der_form() {
        let time = der("910102123051Z").unwrap();
        assert_eq!(time.to_string(), "1991-01-02 12:30:51 (UTC)");
        assert!(time.has_seconds());
        assert!(!time.is_non_utc());
    }

    #[test]
    fn century() {
        assert_eq!(der("500101000000Z").unwrap().year(), 1950);
        assert_eq!(der("490101000000Z").unwrap().year(), 2049);
    }

    #[test]
    fn ber_forms() {
        assert!(der("9101010000Z").is_err());
        let time = ber("9101010000Z").unwrap();
        assert!(!time.has_seconds());
        assert_eq!(time.second(), 0);
        assert_eq!(time.to_string(), "1991-01-01 00:00:00 (UTC)");

        assert!(der("950208040000+0100").is_err());
        let time = ber("950208040000+0100").unwrap();
        assert_eq!(time.offset(), 60);
        assert_eq!(time.to_string(), "1995-02-08 04:00:00 (UTC+0100)");

        let time = ber("9502080400-0130").unwrap();
        assert_eq!(time.offset(), -90);
        assert_eq!(time.to_string(), "1995-02-08 04:00:00 (UTC-0130)");

        assert!(ber("141231235959+2359").is_ok());
    }

    #[test]
    fn trailing_data() {
        assert!(der("910102123051Z0").is_err());
        assert!(ber("950208040000+01000").is_err());
        assert!(ber("950208040000+010").is_err());
    }

    #[test]
    fn calendar() {
        assert!(der("911302123051Z").is_err());
        assert!(der("910002123051Z").is_err());
        assert!(der("910132123051Z").is_err());
        assert!(der("910100123051Z").is_err());
        assert!(der("910431123051Z").is_err());
        assert!(der("910102243051Z").is_err());
        assert!(der("910102126051Z").is_err());
        assert!(der("910102123060Z").is_err());

        // Leap years.
        assert!(der("000229040000Z").is_ok());
        assert!(der("960229040000Z").is_ok());
        assert!(der("950229040000Z").is_err());
        assert!(der("990229040000Z").is_err());
    }

    #[test]
    fn bad_offsets() {
        assert!(ber("950208040000+2400").is_err());
        assert!(ber("950208040000+0060").is_err());
        assert!(ber("950208040000+01a0").is_err());
    }

    #[test]
    fn bad_characters() {
        assert!(der("9a0102123051Z").is_err());
        assert!(der("91 102123051Z").is_err());
        assert!(der("").is_err());
        assert!(der("Z").is_err());
        assert!(ber("9101021230Z").is_ok());
        assert!(ber("91010212305Z").is_err());
    }

    #[test]
    fn describe() {
        assert_eq!(
            UtcTime::describe(b"910102123051Z", Mode::Der),
            "1991-01-02 12:30:51 (UTC)"
        );
        assert_eq!(
            UtcTime::describe(b"9101021230Z", Mode::Der),
            "[Invalid date and time]"
        );
    }

    #[test]
    fn to_datetime() {
        let time = ber("950208040000+0100").unwrap().to_datetime().unwrap();
        assert_eq!(time.to_rfc3339(), "1995-02-08T04:00:00+01:00");
    }
}
