//! EXIF capture date extraction

use super::CaptureDate;
use chrono::NaiveDateTime;
use exif::{In, Reader, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, trace};

/// Layout of EXIF date values: "YYYY:MM:DD HH:MM:SS"
const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// EXIF date tags, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTag {
    /// When the original image was taken
    DateTimeOriginal,
    /// When the image was digitized
    DateTimeDigitized,
    /// When the file was last changed
    DateTime,
}

impl DateTag {
    pub const PRIORITY: [DateTag; 3] = [
        DateTag::DateTimeOriginal,
        DateTag::DateTimeDigitized,
        DateTag::DateTime,
    ];

    /// Map a raw EXIF tag number to a date tag
    pub fn from_id(id: u16) -> Option<Self> {
        match id {
            0x9003 => Some(DateTag::DateTimeOriginal),
            0x9004 => Some(DateTag::DateTimeDigitized),
            0x0132 => Some(DateTag::DateTime),
            _ => None,
        }
    }

    pub fn id(self) -> u16 {
        match self {
            DateTag::DateTimeOriginal => 0x9003,
            DateTag::DateTimeDigitized => 0x9004,
            DateTag::DateTime => 0x0132,
        }
    }
}

/// Value of a date tag as stored in the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Text(String),
    /// Present, but not an ASCII string
    Other,
}

/// Date tags found in one image's primary IFD, in container order
#[derive(Debug, Clone, Default)]
pub struct DateTags {
    fields: Vec<(DateTag, TagValue)>,
}

impl DateTags {
    pub fn push(&mut self, tag: DateTag, value: TagValue) {
        self.fields.push((tag, value));
    }

    /// First string value recorded for `tag`
    pub fn text(&self, tag: DateTag) -> Option<&str> {
        self.fields.iter().find_map(|(t, v)| match v {
            TagValue::Text(s) if *t == tag => Some(s.as_str()),
            _ => None,
        })
    }

    /// Pick the capture date by tag priority, skipping empty or malformed values
    pub fn capture_date(&self) -> Option<NaiveDateTime> {
        for tag in DateTag::PRIORITY {
            let Some(value) = self.text(tag).filter(|s| !s.is_empty()) else {
                continue;
            };
            match parse_exif_datetime(value) {
                Some(dt) => {
                    trace!(?tag, value, "Found EXIF date");
                    return Some(dt);
                }
                None => trace!(?tag, value, "Malformed EXIF date, trying next tag"),
            }
        }
        None
    }
}

/// Outcome of reading an image's metadata container
#[derive(Debug)]
pub enum MetadataRead {
    Tags(DateTags),
    Unreadable(String),
}

/// Read the date tags of an image, never failing
pub fn read_date_tags(path: &Path) -> MetadataRead {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => return MetadataRead::Unreadable(e.to_string()),
    };
    let mut reader = BufReader::new(file);

    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(e) => return MetadataRead::Unreadable(e.to_string()),
    };

    let mut tags = DateTags::default();
    for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
        if let Some(tag) = DateTag::from_id(field.tag.number()) {
            tags.push(tag, tag_value(&field.value));
        }
    }
    MetadataRead::Tags(tags)
}

/// Extract the capture date from EXIF metadata
///
/// Unreadable files and files without a usable date tag both yield `None`.
pub fn extract_exif_date(path: &Path) -> Option<CaptureDate> {
    match read_date_tags(path) {
        MetadataRead::Tags(tags) => tags.capture_date().map(CaptureDate::Metadata),
        MetadataRead::Unreadable(reason) => {
            debug!(?path, %reason, "EXIF metadata unreadable");
            None
        }
    }
}

fn tag_value(value: &Value) -> TagValue {
    match value {
        Value::Ascii(parts) => parts
            .first()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .map(|s| TagValue::Text(s.trim_end_matches('\0').to_string()))
            .unwrap_or(TagValue::Other),
        _ => TagValue::Other,
    }
}

/// Parse EXIF datetime string format: "YYYY:MM:DD HH:MM:SS"
fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, EXIF_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{jpeg_with_dates, png_with_dates};
    use chrono::{Datelike, Timelike};
    use std::fs;

    fn tags(fields: &[(DateTag, TagValue)]) -> DateTags {
        let mut tags = DateTags::default();
        for (tag, value) in fields {
            tags.push(*tag, value.clone());
        }
        tags
    }

    fn text(s: &str) -> TagValue {
        TagValue::Text(s.to_string())
    }

    #[test]
    fn test_parse_exif_datetime() {
        let dt = parse_exif_datetime("2024:01:15 14:30:00").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 1, 15));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (14, 30, 0));

        assert!(parse_exif_datetime("2024-01-15 14:30:00").is_none());
        assert!(parse_exif_datetime("2024:13:15 14:30:00").is_none());
        assert!(parse_exif_datetime("0000:00:00 00:00:00").is_none());
        assert!(parse_exif_datetime("invalid").is_none());
    }

    #[test]
    fn test_tag_id_lookup() {
        for tag in DateTag::PRIORITY {
            assert_eq!(DateTag::from_id(tag.id()), Some(tag));
        }
        // ImageDescription
        assert_eq!(DateTag::from_id(0x010e), None);
    }

    #[test]
    fn test_priority_order() {
        let found = tags(&[
            (DateTag::DateTime, text("2020:01:01 00:00:00")),
            (DateTag::DateTimeDigitized, text("2021:02:02 00:00:00")),
            (DateTag::DateTimeOriginal, text("2022:03:03 00:00:00")),
        ]);
        assert_eq!(found.capture_date().unwrap().year(), 2022);
    }

    #[test]
    fn test_malformed_value_falls_through() {
        let found = tags(&[
            (DateTag::DateTimeOriginal, text("yesterday")),
            (DateTag::DateTimeDigitized, text("2021:02:02 00:00:00")),
        ]);
        assert_eq!(found.capture_date().unwrap().year(), 2021);
    }

    #[test]
    fn test_non_string_and_empty_values_are_skipped() {
        let found = tags(&[
            (DateTag::DateTimeOriginal, TagValue::Other),
            (DateTag::DateTimeDigitized, text("")),
            (DateTag::DateTime, text("2019:12:31 23:59:59")),
        ]);
        assert_eq!(found.capture_date().unwrap().year(), 2019);

        let found = tags(&[(DateTag::DateTimeOriginal, TagValue::Other)]);
        assert!(found.capture_date().is_none());
    }

    #[test]
    fn test_first_string_value_wins() {
        let found = tags(&[
            (DateTag::DateTimeOriginal, TagValue::Other),
            (DateTag::DateTimeOriginal, text("2018:06:01 00:00:00")),
            (DateTag::DateTimeOriginal, text("2017:06:01 00:00:00")),
        ]);
        assert_eq!(found.text(DateTag::DateTimeOriginal), Some("2018:06:01 00:00:00"));
    }

    #[test]
    fn test_extract_from_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.jpg");
        fs::write(
            &path,
            jpeg_with_dates(&[
                ("DateTime", "2020:01:01 00:00:00"),
                ("DateTimeOriginal", "2023:07:04 12:00:00"),
            ]),
        )
        .unwrap();

        let date = extract_exif_date(&path).unwrap();
        let expected = NaiveDateTime::parse_from_str("2023-07-04 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(date, CaptureDate::Metadata(expected));
    }

    #[test]
    fn test_extract_from_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.png");
        fs::write(&path, png_with_dates(&[("DateTimeOriginal", "2023:07:04 12:00:00")])).unwrap();

        let date = extract_exif_date(&path).unwrap();
        assert_eq!((date.year(), date.month()), (2023, 7));
    }

    #[test]
    fn test_malformed_tag_in_file_uses_next() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.jpg");
        fs::write(
            &path,
            jpeg_with_dates(&[
                ("DateTimeOriginal", "2023/07/04"),
                ("DateTimeDigitized", "2022:11:30 08:00:00"),
            ]),
        )
        .unwrap();

        let date = extract_exif_date(&path).unwrap();
        assert_eq!((date.year(), date.month()), (2022, 11));
    }

    #[test]
    fn test_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        fs::write(&path, b"\xff\xd8 truncated").unwrap();

        assert!(matches!(read_date_tags(&path), MetadataRead::Unreadable(_)));
        assert!(extract_exif_date(&path).is_none());
        assert!(extract_exif_date(&dir.path().join("missing.jpg")).is_none());
    }

    #[test]
    fn test_container_without_dates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodate.jpg");
        fs::write(&path, jpeg_with_dates(&[])).unwrap();

        match read_date_tags(&path) {
            MetadataRead::Tags(tags) => assert!(tags.capture_date().is_none()),
            MetadataRead::Unreadable(reason) => panic!("unexpected: {reason}"),
        }
        assert!(extract_exif_date(&path).is_none());
    }
}
