//! NMEA sentence tokenizing and the GGA sentence parser.

use core::str::FromStr;

use crate::{
    constants::{CARRIAGE_RETURN, LINE_FEED, NMEA_CHECKSUM_DELIMITER, NMEA_FIELD_DELIMITER},
    SentenceError,
};

/// One NMEA line split into keyword and fields.
///
/// Empty fields are kept, so `$GPGGA,1,,3` yields `["1", "", "3"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NmeaSentence<'a> {
    /// Leading token including `$`, e.g. `$GPGGA`
    pub keyword: &'a str,
    pub fields: Vec<&'a str>,
    /// Hex digits after `*`, if the sentence carries a checksum
    pub checksum: Option<&'a str>,
    /// XOR of every byte between `$` and `*`
    pub computed_checksum: u8,
}

impl<'a> NmeaSentence<'a> {
    /// Splits a framed line, with or without its CR LF terminator.
    pub fn tokenize(line: &'a [u8]) -> Result<Self, SentenceError> {
        let line = line
            .strip_suffix(&[CARRIAGE_RETURN, LINE_FEED])
            .unwrap_or(line);
        if !line.is_ascii() {
            return Err(SentenceError::NotAscii);
        }
        let line = core::str::from_utf8(line).map_err(|_| SentenceError::NotAscii)?;

        let (body, checksum) = match line.split_once(char::from(NMEA_CHECKSUM_DELIMITER)) {
            Some((body, checksum)) => (body, Some(checksum)),
            None => (line, None),
        };
        let computed_checksum = body.bytes().skip(1).fold(0u8, |acc, b| acc ^ b);

        let mut tokens = body.split(char::from(NMEA_FIELD_DELIMITER));
        let keyword = tokens.next().unwrap_or_default();
        Ok(Self {
            keyword,
            fields: tokens.collect(),
            checksum,
            computed_checksum,
        })
    }

    /// Compares the transmitted checksum with the computed one.
    ///
    /// Sentences without a checksum pass.
    pub fn verify_checksum(&self) -> Result<(), SentenceError> {
        let Some(text) = self.checksum else {
            return Ok(());
        };
        let expect = u8::from_str_radix(text.trim(), 16)
            .map_err(|_| SentenceError::MalformedChecksum(text.to_owned()))?;
        if expect == self.computed_checksum {
            Ok(())
        } else {
            Err(SentenceError::InvalidChecksum {
                expect,
                got: self.computed_checksum,
            })
        }
    }

    /// The keyword without `$` and talker, e.g. `GGA` for `$GNGGA`.
    pub fn sentence_type(&self) -> &'a str {
        let keyword = self.keyword.trim_start_matches('$');
        keyword.get(2..).unwrap_or(keyword)
    }
}

/// Turns a tokenized sentence into a structured record.
///
/// The decoder delegates ASCII sentences to an implementation of this trait,
/// so alternative parsers can be plugged in through
/// [`crate::DecoderBuilder::with_sentence_parser`].
pub trait SentenceParser {
    type Output;

    fn parse(&self, sentence: &NmeaSentence<'_>) -> Result<Self::Output, SentenceError>;
}

/// GPS fix data sentence
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gga {
    pub message_id: String,
    /// UTC time of day (s since midnight)
    pub utc_seconds: Option<f64>,
    /// Latitude (deg), south negative
    pub latitude: Option<f64>,
    /// Longitude (deg), west negative
    pub longitude: Option<f64>,
    pub gps_quality: u8,
    pub num_satellites: u8,
    pub hdop: Option<f32>,
    /// Altitude above mean sea level
    pub altitude: Option<f64>,
    pub altitude_units: String,
    pub undulation: Option<f64>,
    pub undulation_units: String,
    /// Age of differential corrections (s)
    pub diff_age: Option<f32>,
    pub station_id: Option<String>,
}

/// [`SentenceParser`] for `$..GGA` sentences
#[derive(Debug, Clone, Copy, Default)]
pub struct GgaParser;

const GGA_FIELDS: [&str; 14] = [
    "utc_time",
    "latitude",
    "latitude_hemisphere",
    "longitude",
    "longitude_hemisphere",
    "gps_quality",
    "num_satellites",
    "hdop",
    "altitude",
    "altitude_units",
    "undulation",
    "undulation_units",
    "diff_age",
    "station_id",
];

impl SentenceParser for GgaParser {
    type Output = Gga;

    fn parse(&self, sentence: &NmeaSentence<'_>) -> Result<Gga, SentenceError> {
        if sentence.sentence_type() != "GGA" {
            return Err(SentenceError::UnexpectedKeyword(sentence.keyword.to_owned()));
        }
        sentence.verify_checksum()?;
        let fields = Fields { sentence };

        let latitude_sign = fields.hemisphere(2, "N", "S")?;
        let latitude = fields.coordinate(1)?.map(|deg| deg * latitude_sign);
        let longitude_sign = fields.hemisphere(4, "E", "W")?;
        let longitude = fields.coordinate(3)?.map(|deg| deg * longitude_sign);

        Ok(Gga {
            message_id: sentence.keyword.to_owned(),
            utc_seconds: fields.time_of_day(0)?,
            latitude,
            longitude,
            gps_quality: fields.optional(5)?.unwrap_or(0),
            num_satellites: fields.optional(6)?.unwrap_or(0),
            hdop: fields.optional(7)?,
            altitude: fields.optional(8)?,
            altitude_units: fields.get(9)?.to_owned(),
            undulation: fields.optional(10)?,
            undulation_units: fields.get(11)?.to_owned(),
            diff_age: fields.optional(12)?,
            station_id: Some(fields.get(13)?)
                .filter(|id| !id.is_empty())
                .map(str::to_owned),
        })
    }
}

struct Fields<'s, 'a> {
    sentence: &'s NmeaSentence<'a>,
}

impl<'a> Fields<'_, 'a> {
    fn get(&self, index: usize) -> Result<&'a str, SentenceError> {
        self.sentence
            .fields
            .get(index)
            .copied()
            .ok_or_else(|| SentenceError::MissingField {
                keyword: self.sentence.keyword.to_owned(),
                field: GGA_FIELDS[index],
            })
    }

    fn invalid(&self, index: usize, value: &str) -> SentenceError {
        SentenceError::InvalidField {
            keyword: self.sentence.keyword.to_owned(),
            field: GGA_FIELDS[index],
            value: value.to_owned(),
        }
    }

    fn optional<T: FromStr>(&self, index: usize) -> Result<Option<T>, SentenceError> {
        match self.get(index)?.trim() {
            "" => Ok(None),
            value => value
                .parse()
                .map(Some)
                .map_err(|_| self.invalid(index, value)),
        }
    }

    fn hemisphere(&self, index: usize, positive: &str, negative: &str) -> Result<f64, SentenceError> {
        match self.get(index)? {
            "" => Ok(1.0),
            h if h == positive => Ok(1.0),
            h if h == negative => Ok(-1.0),
            other => Err(self.invalid(index, other)),
        }
    }

    /// `ddmm.mmmm` or `dddmm.mmmm` to decimal degrees
    fn coordinate(&self, index: usize) -> Result<Option<f64>, SentenceError> {
        let Some(raw) = self.optional::<f64>(index)? else {
            return Ok(None);
        };
        let degrees = (raw / 100.0).trunc();
        let minutes = raw - degrees * 100.0;
        if !(0.0..60.0).contains(&minutes) {
            return Err(self.invalid(index, self.get(index)?));
        }
        Ok(Some(degrees + minutes / 60.0))
    }

    /// `hhmmss.ss` to seconds since midnight
    fn time_of_day(&self, index: usize) -> Result<Option<f64>, SentenceError> {
        let value = self.get(index)?.trim();
        if value.is_empty() {
            return Ok(None);
        }
        let invalid = || self.invalid(index, value);
        if value.len() < 6 || !value.as_bytes()[..6].iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        let hours: f64 = value[0..2].parse().map_err(|_| invalid())?;
        let minutes: f64 = value[2..4].parse().map_err(|_| invalid())?;
        let seconds: f64 = value[4..].parse().map_err(|_| invalid())?;
        if hours >= 24.0 || minutes >= 60.0 || seconds >= 61.0 {
            return Err(invalid());
        }
        Ok(Some(hours * 3600.0 + minutes * 60.0 + seconds))
    }
}
