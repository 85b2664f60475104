// Copyright 2019-2024 Dynomap developers.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

use crate::ValueError;

/// A point in time, normalized to UTC. Timestamps are written to string
/// attributes in canonical RFC 3339 form with seconds precision and a `Z`
/// suffix, e.g. `2017-05-02T00:00:00Z`. Sub-second precision does not survive
/// the wire.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Ord, PartialOrd, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current time.
    pub fn now() -> Timestamp {
        Timestamp(Utc::now())
    }

    /// The canonical wire text of this timestamp.
    pub fn format(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Parse a timestamp from RFC 3339 text. Any offset is accepted; the
    /// instant is preserved and normalized to UTC.
    pub fn parse(text: &str) -> Result<Timestamp, ValueError> {
        DateTime::parse_from_rfc3339(text)
            .map(|dt| Timestamp(dt.with_timezone(&Utc)))
            .map_err(|_| ValueError::InvalidTimestamp {
                text: text.to_string(),
            })
    }

    /// Probe whether a string holds a timestamp, used by the decoder to apply
    /// the timestamp-by-convention rule. A cheap shape check guards the full
    /// parse so arbitrary strings are not parsed on every call.
    pub fn parse_opt(text: &str) -> Option<Timestamp> {
        let bytes = text.as_bytes();
        if bytes.len() < 20 || bytes[4] != b'-' || bytes[7] != b'-' || bytes[10] != b'T' {
            return None;
        }
        Timestamp::parse(text).ok()
    }
}

impl<TZ> From<DateTime<TZ>> for Timestamp
where
    TZ: TimeZone,
{
    fn from(dt: DateTime<TZ>) -> Self {
        Timestamp(dt.with_timezone(&Utc))
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl AsRef<DateTime<Utc>> for Timestamp {
    fn as_ref(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn canonical_format() {
        let ts = Timestamp::parse("2017-05-02T00:00:00Z").unwrap();
        assert_eq!(ts.format(), "2017-05-02T00:00:00Z");
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let ts = Timestamp::parse("2017-05-02T02:30:00+02:30").unwrap();
        assert_eq!(ts.format(), "2017-05-02T00:00:00Z");

        let offset = FixedOffset::east_opt(3600).unwrap();
        let local = offset.with_ymd_and_hms(2017, 3, 3, 1, 0, 0).unwrap();
        assert_eq!(Timestamp::from(local).format(), "2017-03-03T00:00:00Z");
    }

    #[test]
    fn invalid_text_is_rejected() {
        for text in ["", "2017", "2017-13-01T00:00:00Z", "yesterday"] {
            assert!(matches!(
                Timestamp::parse(text),
                Err(ValueError::InvalidTimestamp { .. })
            ));
        }
    }

    #[test]
    fn convention_probe() {
        assert!(Timestamp::parse_opt("2017-12-24T00:00:00Z").is_some());
        assert!(Timestamp::parse_opt("2017-12-24T00:00:00+00:00").is_some());
        assert!(Timestamp::parse_opt("foo").is_none());
        assert!(Timestamp::parse_opt("2017-12-24").is_none());
        assert!(Timestamp::parse_opt("shiftcode.ch").is_none());
    }
}
