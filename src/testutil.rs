//! Image fixtures for tests

use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use filetime::FileTime;
use std::io::Cursor;
use std::path::Path;

/// Build a big-endian TIFF/EXIF blob holding the given date tags
///
/// An `ImageDescription` is always written so the primary IFD is never empty.
pub fn exif_blob(dates: &[(&str, &str)]) -> Vec<u8> {
    let mut fields = vec![Field {
        tag: Tag::ImageDescription,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![b"fixture".to_vec()]),
    }];
    for (name, value) in dates {
        let tag = match *name {
            "DateTimeOriginal" => Tag::DateTimeOriginal,
            "DateTimeDigitized" => Tag::DateTimeDigitized,
            "DateTime" => Tag::DateTime,
            other => panic!("unsupported tag {other}"),
        };
        fields.push(Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![value.as_bytes().to_vec()]),
        });
    }

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, false).unwrap();
    buf.into_inner()
}

/// Minimal JPEG: SOI, APP1 Exif segment, EOI
pub fn jpeg_with_dates(dates: &[(&str, &str)]) -> Vec<u8> {
    let tiff = exif_blob(dates);
    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    jpeg.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    jpeg.extend_from_slice(&payload);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

/// Minimal PNG: signature, IHDR, eXIf, IEND
pub fn png_with_dates(dates: &[(&str, &str)]) -> Vec<u8> {
    let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    let ihdr = [0, 0, 0, 1, 0, 0, 0, 1, 8, 2, 0, 0, 0];
    push_chunk(&mut png, b"IHDR", &ihdr);
    push_chunk(&mut png, b"eXIf", &exif_blob(dates));
    push_chunk(&mut png, b"IEND", &[]);
    png
}

fn push_chunk(png: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    let start = png.len();
    png.extend_from_slice(kind);
    png.extend_from_slice(data);
    let crc = crc32(&png[start..]);
    png.extend_from_slice(&crc.to_be_bytes());
}

fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &b in bytes {
        crc ^= b as u32;
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

/// Pin a file's modification time to a unix timestamp
pub fn set_mtime(path: &Path, unix_secs: i64) {
    filetime::set_file_mtime(path, FileTime::from_unix_time(unix_secs, 0)).unwrap();
}
