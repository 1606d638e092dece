//! Header dimension reader: pixel size straight from the file header.
//!
//! Only the first few bytes of each format are parsed; pixel data is never
//! decoded. Every failure path (unknown MIME type, short read, missing
//! marker) degrades to [`Dimensions::UNKNOWN`].
//!
//! | MIME         | Source of width/height                                   |
//! |--------------|----------------------------------------------------------|
//! | `image/png`  | IHDR: type at 12..16, BE u32 width at 16, height at 20   |
//! | `image/jpeg` | first SOF marker segment: BE u16 height, then width      |
//! | `image/gif`  | logical screen descriptor: LE u16 at 6 and 8             |
//! | `image/bmp`  | DIB header: LE i32 at 18 and 22                          |
//!
//! ## Known limitation (JPEG)
//!
//! The marker scan expects each segment to be followed directly by another
//! `0xFF` marker. Anything else between segments (e.g. stray padding bytes)
//! ends the scan with an unknown result instead of resynchronising.

use crate::output::Dimensions;
use std::io::{self, Read};
use tracing::debug;

/// Read `(width, height)` from an in-memory image header.
pub fn read_dimensions(bytes: &[u8], mime_type: &str) -> Dimensions {
    read_dimensions_from(bytes, mime_type)
}

/// Read `(width, height)` from the start of a byte stream.
///
/// Consumes at most the header bytes it needs. Never fails.
pub fn read_dimensions_from<R: Read>(mut reader: R, mime_type: &str) -> Dimensions {
    let parsed = match mime_type {
        "image/png" => png(&mut reader),
        "image/jpeg" => jpeg(&mut reader),
        "image/gif" => gif(&mut reader),
        "image/bmp" => bmp(&mut reader),
        _ => return Dimensions::UNKNOWN,
    };
    match parsed {
        Ok(Some((w, h))) => Dimensions::new(w, h),
        Ok(None) => {
            debug!("No dimensions in {} header", mime_type);
            Dimensions::UNKNOWN
        }
        Err(e) => {
            debug!("Truncated {} header: {}", mime_type, e);
            Dimensions::UNKNOWN
        }
    }
}

// ── Formats ──────────────────────────────────────────────────────────────────

fn png<R: Read>(r: &mut R) -> io::Result<Option<(u32, u32)>> {
    let mut head = [0u8; 24];
    r.read_exact(&mut head)?;
    if &head[12..16] != b"IHDR" {
        return Ok(None);
    }
    let width = u32::from_be_bytes([head[16], head[17], head[18], head[19]]);
    let height = u32::from_be_bytes([head[20], head[21], head[22], head[23]]);
    Ok(Some((width, height)))
}

fn jpeg<R: Read>(r: &mut R) -> io::Result<Option<(u32, u32)>> {
    skip(r, 2)?; // SOI
    loop {
        let marker = read_u8(r)?;
        let mut code = read_u8(r)?;
        if marker != 0xFF {
            return Ok(None);
        }
        while code == 0xFF {
            code = read_u8(r)?;
        }
        if is_sof(code) {
            skip(r, 3)?; // segment length + sample precision
            let height = read_u16_be(r)?;
            let width = read_u16_be(r)?;
            return Ok(Some((u32::from(width), u32::from(height))));
        }
        let len = read_u16_be(r)?;
        if len < 2 {
            return Ok(None);
        }
        skip(r, u64::from(len - 2))?;
    }
}

/// SOF0..SOF15, excluding DHT (0xC4) and DAC (0xCC).
fn is_sof(code: u8) -> bool {
    (0xC0..=0xCF).contains(&code) && code != 0xC4 && code != 0xCC
}

fn gif<R: Read>(r: &mut R) -> io::Result<Option<(u32, u32)>> {
    let mut head = [0u8; 10];
    r.read_exact(&mut head)?;
    let width = u16::from_le_bytes([head[6], head[7]]);
    let height = u16::from_le_bytes([head[8], head[9]]);
    Ok(Some((u32::from(width), u32::from(height))))
}

fn bmp<R: Read>(r: &mut R) -> io::Result<Option<(u32, u32)>> {
    skip(r, 18)?; // file header + DIB header size
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    let width = i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let height = i32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    if width < 0 {
        return Ok(None);
    }
    // Negative height marks a top-down bitmap.
    Ok(Some((width.unsigned_abs(), height.unsigned_abs())))
}

// ── Byte helpers ─────────────────────────────────────────────────────────────

fn read_u8<R: Read>(r: &mut R) -> io::Result<u8> {
    let mut b = [0u8; 1];
    r.read_exact(&mut b)?;
    Ok(b[0])
}

fn read_u16_be<R: Read>(r: &mut R) -> io::Result<u16> {
    let mut b = [0u8; 2];
    r.read_exact(&mut b)?;
    Ok(u16::from_be_bytes(b))
}

fn skip<R: Read>(r: &mut R, n: u64) -> io::Result<()> {
    let copied = io::copy(&mut r.by_ref().take(n), &mut io::sink())?;
    if copied < n {
        return Err(io::ErrorKind::UnexpectedEof.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_header(width: u32, height: u32) -> Vec<u8> {
        let mut v = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        v.extend_from_slice(&13u32.to_be_bytes());
        v.extend_from_slice(b"IHDR");
        v.extend_from_slice(&width.to_be_bytes());
        v.extend_from_slice(&height.to_be_bytes());
        v.extend_from_slice(&[8, 2, 0, 0, 0]);
        v
    }

    #[test]
    fn png_reads_ihdr() {
        assert_eq!(
            read_dimensions(&png_header(640, 480), "image/png"),
            Dimensions::new(640, 480)
        );
    }

    #[test]
    fn png_without_ihdr_is_unknown() {
        let mut h = png_header(1, 1);
        h[12..16].copy_from_slice(b"tEXt");
        assert_eq!(read_dimensions(&h, "image/png"), Dimensions::UNKNOWN);
    }

    #[test]
    fn png_signature_is_not_validated() {
        let mut h = png_header(3, 4);
        h[..8].copy_from_slice(b"garbage!");
        assert_eq!(read_dimensions(&h, "image/png"), Dimensions::new(3, 4));
    }

    #[test]
    fn jpeg_skips_app_segments_to_sof() {
        let mut v = vec![0xFF, 0xD8];
        // APP0 with 4 payload bytes
        v.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x06, 1, 2, 3, 4]);
        // fill bytes, then SOF2 (progressive)
        v.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xC2, 0x00, 0x11, 0x08]);
        v.extend_from_slice(&300u16.to_be_bytes()); // height
        v.extend_from_slice(&200u16.to_be_bytes()); // width
        assert_eq!(read_dimensions(&v, "image/jpeg"), Dimensions::new(200, 300));
    }

    #[test]
    fn jpeg_dht_is_not_a_frame() {
        let mut v = vec![0xFF, 0xD8];
        v.extend_from_slice(&[0xFF, 0xC4, 0x00, 0x04, 0xAA, 0xBB]);
        v.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08, 0x00, 0x10, 0x00, 0x20]);
        assert_eq!(read_dimensions(&v, "image/jpeg"), Dimensions::new(32, 16));
    }

    #[test]
    fn jpeg_stops_at_non_marker_byte() {
        let mut v = vec![0xFF, 0xD8];
        v.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x02]);
        // padding byte between segments ends the scan
        v.extend_from_slice(&[0x00, 0xFF, 0xC0, 0x00, 0x11, 0x08, 0x00, 0x10, 0x00, 0x20]);
        assert_eq!(read_dimensions(&v, "image/jpeg"), Dimensions::UNKNOWN);
    }

    #[test]
    fn jpeg_without_sof_is_unknown() {
        let v = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00];
        assert_eq!(read_dimensions(&v, "image/jpeg"), Dimensions::UNKNOWN);
    }

    #[test]
    fn gif_reads_screen_descriptor() {
        let mut v = b"GIF89a".to_vec();
        v.extend_from_slice(&513u16.to_le_bytes());
        v.extend_from_slice(&2u16.to_le_bytes());
        assert_eq!(read_dimensions(&v, "image/gif"), Dimensions::new(513, 2));
    }

    #[test]
    fn bmp_reads_dib_header() {
        let mut v = vec![0u8; 18];
        v[0] = b'B';
        v[1] = b'M';
        v.extend_from_slice(&7i32.to_le_bytes());
        v.extend_from_slice(&(-9i32).to_le_bytes());
        assert_eq!(read_dimensions(&v, "image/bmp"), Dimensions::new(7, 9));
    }

    #[test]
    fn truncated_and_empty_inputs_are_unknown() {
        for mime in ["image/png", "image/jpeg", "image/gif", "image/bmp"] {
            assert_eq!(read_dimensions(&[], mime), Dimensions::UNKNOWN, "{mime}");
            assert_eq!(read_dimensions(&[0xFF, 0xD8, 0xFF], mime), Dimensions::UNKNOWN, "{mime}");
        }
        let short_png = &png_header(1, 1)[..20];
        assert_eq!(read_dimensions(short_png, "image/png"), Dimensions::UNKNOWN);
        let short_gif = b"GIF89a\x01\x00\x01";
        assert_eq!(read_dimensions(short_gif, "image/gif"), Dimensions::UNKNOWN);
    }

    #[test]
    fn other_mime_types_are_unknown() {
        assert_eq!(read_dimensions(&png_header(1, 1), "image/webp"), Dimensions::UNKNOWN);
        assert_eq!(read_dimensions(&png_header(1, 1), "text/plain"), Dimensions::UNKNOWN);
    }
}
