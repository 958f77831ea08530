use crate::time::error::Error;
use core::str::FromStr;
use lazy_static::*;
use regex::Regex;
use std::time::Duration;

lazy_static! {
    static ref DURATION_REGEX: Regex =
        Regex::new(r"^(?P<value>\d+)\s*(?P<unit>[a-z]+)$").expect("Regex compilation error");
}

/// A duration written as `<value><unit>`, e.g. `10s`, `1500ms` or `2m`.
#[derive(Debug, PartialEq)]
pub struct DurationUnit {
    value: u64,
    unit: TimeUnit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
}

impl TimeUnit {
    fn millis(self) -> u64 {
        match self {
            TimeUnit::Millisecond => 1,
            TimeUnit::Second => 1_000,
            TimeUnit::Minute => 60_000,
            TimeUnit::Hour => 3_600_000,
        }
    }
}

impl DurationUnit {
    pub fn to_duration(&self) -> Result<Duration, Error> {
        self.value
            .checked_mul(self.unit.millis())
            .map(Duration::from_millis)
            .ok_or_else(|| Error::Overflow(format!("{}{:?}", self.value, self.unit)))
    }
}

impl FromStr for DurationUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        let caps = DURATION_REGEX
            .captures(&trimmed)
            .ok_or_else(|| Error::Syntax(s.to_owned()))?;
        let value = caps["value"]
            .parse()
            .map_err(|_| Error::Overflow(s.to_owned()))?;
        let unit = caps["unit"].parse()?;
        Ok(Self { value, unit })
    }
}

impl FromStr for TimeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms" | "millisecond" | "millis" | "milliseconds" => Ok(TimeUnit::Millisecond),
            "s" | "second" | "secs" | "seconds" => Ok(TimeUnit::Second),
            "m" | "minute" | "mins" | "minutes" => Ok(TimeUnit::Minute),
            "h" | "hour" | "hours" => Ok(TimeUnit::Hour),
            _ => Err(Error::UnitNotSupported(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::time::error::Error;
    use crate::time::timeunit::{DurationUnit, TimeUnit};
    use std::time::Duration;

    #[test]
    fn test_building_time_unit_from_string() {
        assert_eq!("ms".parse::<TimeUnit>(), Ok(TimeUnit::Millisecond));
        assert_eq!("secs".parse::<TimeUnit>(), Ok(TimeUnit::Second));
        assert_eq!("m".parse::<TimeUnit>(), Ok(TimeUnit::Minute));
        assert_eq!("hours".parse::<TimeUnit>(), Ok(TimeUnit::Hour));
        assert_eq!(
            "d".parse::<TimeUnit>(),
            Err(Error::UnitNotSupported("d".to_owned()))
        );
    }

    #[test]
    fn test_conversion_duration_unit_to_duration() {
        let unit = "200ms".parse::<DurationUnit>().unwrap();
        assert_eq!(unit.to_duration(), Ok(Duration::from_millis(200)));

        let unit = " 10 S ".parse::<DurationUnit>().unwrap();
        assert_eq!(unit.to_duration(), Ok(Duration::from_secs(10)));
    }

    #[test]
    fn test_rejects_malformed_duration() {
        assert!(matches!("ten seconds".parse::<DurationUnit>(), Err(Error::Syntax(_))));
        assert!(matches!("10".parse::<DurationUnit>(), Err(Error::Syntax(_))));
    }
}
