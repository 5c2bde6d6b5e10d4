//! Lossless orientation rewriting
//!
//! Rotation is applied by changing the IFD0 Orientation tag instead of
//! re-encoding pixels. When the tag exists its two value bytes are patched
//! in place, so every other byte of the file stays identical. When it is
//! missing, a copy of IFD0 with the extra entry is appended to the TIFF
//! block and the header is pointed at it; existing values keep their
//! offsets. JPEG files without an EXIF segment get a minimal APP1 segment
//! holding only the orientation.

use std::ops::Range;

const ORIENTATION_TAG: u16 = 0x0112;
const TYPE_SHORT: u16 = 3;
const ENTRY_SIZE: usize = 12;
const EXIF_HEADER: &[u8; 6] = b"Exif\0\0";

/// TIFF magic numbers: standard, Olympus ORF ("RO", "SR") and Panasonic RW2
const TIFF_MAGICS: &[u16] = &[0x002A, 0x4F52, 0x5352, 0x0055];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    fn u16(self, bytes: &[u8], at: usize) -> Option<u16> {
        let raw: [u8; 2] = bytes.get(at..at + 2)?.try_into().ok()?;
        Some(match self {
            ByteOrder::Little => u16::from_le_bytes(raw),
            ByteOrder::Big => u16::from_be_bytes(raw),
        })
    }

    fn u32(self, bytes: &[u8], at: usize) -> Option<u32> {
        let raw: [u8; 4] = bytes.get(at..at + 4)?.try_into().ok()?;
        Some(match self {
            ByteOrder::Little => u32::from_le_bytes(raw),
            ByteOrder::Big => u32::from_be_bytes(raw),
        })
    }

    fn u16_bytes(self, value: u16) -> [u8; 2] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    fn u32_bytes(self, value: u32) -> [u8; 4] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }
}

/// Parsed TIFF header
#[derive(Debug, Clone, Copy)]
struct TiffHeader {
    order: ByteOrder,
    ifd0: usize,
}

fn parse_tiff_header(tiff: &[u8]) -> Result<TiffHeader, String> {
    let order = match tiff.get(0..2) {
        Some(b"II") => ByteOrder::Little,
        Some(b"MM") => ByteOrder::Big,
        _ => return Err("missing TIFF byte order mark".to_string()),
    };

    let magic = order
        .u16(tiff, 2)
        .ok_or_else(|| "truncated TIFF header".to_string())?;
    if !TIFF_MAGICS.contains(&magic) {
        return Err(format!("unexpected TIFF magic 0x{:04X}", magic));
    }

    let ifd0 = order
        .u32(tiff, 4)
        .ok_or_else(|| "truncated TIFF header".to_string())? as usize;
    if ifd0 < 8 || ifd0 >= tiff.len() {
        return Err(format!("IFD0 offset {} is out of bounds", ifd0));
    }

    Ok(TiffHeader { order, ifd0 })
}

/// IFD0 layout: entry table range and the position of the Orientation entry
#[derive(Debug)]
struct Ifd0 {
    count: usize,
    entries: Range<usize>,
    orientation_entry: Option<usize>,
}

fn parse_ifd0(tiff: &[u8], header: TiffHeader) -> Result<Ifd0, String> {
    let count = header
        .order
        .u16(tiff, header.ifd0)
        .ok_or_else(|| "truncated IFD0".to_string())? as usize;
    let start = header.ifd0 + 2;
    let end = start + count * ENTRY_SIZE;
    // The next-IFD pointer follows the entries
    if end + 4 > tiff.len() {
        return Err("truncated IFD0".to_string());
    }

    let mut orientation_entry = None;
    for entry in (start..end).step_by(ENTRY_SIZE) {
        if header.order.u16(tiff, entry) == Some(ORIENTATION_TAG) {
            let field_type = header.order.u16(tiff, entry + 2);
            let field_count = header.order.u32(tiff, entry + 4);
            if field_type != Some(TYPE_SHORT) || field_count != Some(1) {
                return Err("Orientation entry is not a single SHORT".to_string());
            }
            orientation_entry = Some(entry);
            break;
        }
    }

    Ok(Ifd0 {
        count,
        entries: start..end,
        orientation_entry,
    })
}

/// Read the Orientation value from a TIFF block, if present
pub(crate) fn tiff_orientation(tiff: &[u8]) -> Result<Option<u16>, String> {
    let header = parse_tiff_header(tiff)?;
    let ifd = parse_ifd0(tiff, header)?;
    Ok(ifd
        .orientation_entry
        .and_then(|entry| header.order.u16(tiff, entry + 8)))
}

/// Set the Orientation value of a TIFF block.
///
/// Offsets inside the block are relative to its first byte, so this works
/// for whole TIFF-based files as well as the TIFF payload of a JPEG APP1
/// segment.
pub(crate) fn set_tiff_orientation(tiff: &mut Vec<u8>, value: u16) -> Result<(), String> {
    let header = parse_tiff_header(tiff)?;
    let ifd = parse_ifd0(tiff, header)?;
    let order = header.order;

    if let Some(entry) = ifd.orientation_entry {
        tiff[entry + 8..entry + 10].copy_from_slice(&order.u16_bytes(value));
        return Ok(());
    }

    let mut new_entry = [0u8; ENTRY_SIZE];
    new_entry[0..2].copy_from_slice(&order.u16_bytes(ORIENTATION_TAG));
    new_entry[2..4].copy_from_slice(&order.u16_bytes(TYPE_SHORT));
    new_entry[4..8].copy_from_slice(&order.u32_bytes(1));
    new_entry[8..10].copy_from_slice(&order.u16_bytes(value));

    // Entries must stay sorted by tag
    let mut entries: Vec<[u8; ENTRY_SIZE]> = tiff[ifd.entries.clone()]
        .chunks_exact(ENTRY_SIZE)
        .filter_map(|chunk| chunk.try_into().ok())
        .collect();
    let insert_at = entries
        .iter()
        .position(|entry| order.u16(entry, 0).is_some_and(|tag| tag > ORIENTATION_TAG))
        .unwrap_or(entries.len());
    entries.insert(insert_at, new_entry);

    let next_ifd = tiff[ifd.entries.end..ifd.entries.end + 4].to_vec();
    let new_count =
        u16::try_from(ifd.count + 1).map_err(|_| "IFD0 has too many entries".to_string())?;

    if tiff.len() % 2 == 1 {
        tiff.push(0);
    }
    let new_offset =
        u32::try_from(tiff.len()).map_err(|_| "file too large for TIFF offsets".to_string())?;

    tiff.extend_from_slice(&order.u16_bytes(new_count));
    for entry in &entries {
        tiff.extend_from_slice(entry);
    }
    tiff.extend_from_slice(&next_ifd);
    tiff[4..8].copy_from_slice(&order.u32_bytes(new_offset));

    Ok(())
}

/// Minimal big-endian TIFF block carrying only the Orientation tag
fn minimal_tiff(value: u16) -> Vec<u8> {
    let mut tiff = Vec::with_capacity(26);
    tiff.extend_from_slice(b"MM\x00\x2A");
    tiff.extend_from_slice(&8u32.to_be_bytes());
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&ORIENTATION_TAG.to_be_bytes());
    tiff.extend_from_slice(&TYPE_SHORT.to_be_bytes());
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&value.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_be_bytes());
    tiff
}

/// Location of the EXIF APP1 segment inside a JPEG stream
#[derive(Debug)]
struct JpegLayout {
    /// Whole APP1 segment, marker included
    exif_segment: Option<Range<usize>>,
    /// Where a new APP1 segment goes when there is none
    insert_at: usize,
}

fn scan_jpeg(data: &[u8]) -> Result<JpegLayout, String> {
    if data.get(0..2) != Some(&[0xFF, 0xD8][..]) {
        return Err("not a JPEG stream".to_string());
    }

    let mut pos = 2;
    let mut insert_at = 2;
    let mut first_segment = true;

    loop {
        if data.get(pos) != Some(&0xFF) {
            return Err(format!("expected marker at byte {}", pos));
        }
        // Skip fill bytes
        while data.get(pos + 1) == Some(&0xFF) {
            pos += 1;
        }
        let marker = *data
            .get(pos + 1)
            .ok_or_else(|| "truncated JPEG stream".to_string())?;

        match marker {
            // Start of scan or end of image: no EXIF segment before the pixels
            0xDA | 0xD9 => {
                return Ok(JpegLayout {
                    exif_segment: None,
                    insert_at,
                });
            }
            // Markers without a length field
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            _ => {}
        }

        let length = data
            .get(pos + 2..pos + 4)
            .map(|b| u16::from_be_bytes([b[0], b[1]]) as usize)
            .ok_or_else(|| "truncated JPEG segment".to_string())?;
        let end = pos + 2 + length;
        if length < 2 || end > data.len() {
            return Err(format!("JPEG segment at byte {} overruns the file", pos));
        }

        if marker == 0xE1 && data[pos + 4..end].starts_with(EXIF_HEADER) {
            return Ok(JpegLayout {
                exif_segment: Some(pos..end),
                insert_at,
            });
        }

        // A leading JFIF APP0 segment must stay first
        if first_segment && marker == 0xE0 {
            insert_at = end;
        }
        first_segment = false;
        pos = end;
    }
}

fn app1_segment(tiff: &[u8]) -> Result<Vec<u8>, String> {
    let length = 2 + EXIF_HEADER.len() + tiff.len();
    let length = u16::try_from(length).map_err(|_| "EXIF segment would exceed 64 KiB".to_string())?;

    let mut segment = Vec::with_capacity(length as usize + 2);
    segment.extend_from_slice(&[0xFF, 0xE1]);
    segment.extend_from_slice(&length.to_be_bytes());
    segment.extend_from_slice(EXIF_HEADER);
    segment.extend_from_slice(tiff);
    Ok(segment)
}

/// Read the Orientation value of a JPEG stream, if present
pub(crate) fn jpeg_orientation(data: &[u8]) -> Result<Option<u16>, String> {
    let layout = scan_jpeg(data)?;
    match layout.exif_segment {
        Some(segment) => tiff_orientation(&data[segment.start + 4 + EXIF_HEADER.len()..segment.end]),
        None => Ok(None),
    }
}

/// Return a copy of a JPEG stream with the given Orientation value
pub(crate) fn set_jpeg_orientation(data: &[u8], value: u16) -> Result<Vec<u8>, String> {
    let layout = scan_jpeg(data)?;

    match layout.exif_segment {
        Some(segment) => {
            let tiff_start = segment.start + 4 + EXIF_HEADER.len();
            let mut tiff = data[tiff_start..segment.end].to_vec();
            let original_len = tiff.len();
            set_tiff_orientation(&mut tiff, value)?;

            if tiff.len() == original_len {
                // Patched in place: only the value bytes differ
                let mut out = data.to_vec();
                out[tiff_start..segment.end].copy_from_slice(&tiff);
                return Ok(out);
            }

            let app1 = app1_segment(&tiff)?;
            let mut out = Vec::with_capacity(data.len() + app1.len());
            out.extend_from_slice(&data[..segment.start]);
            out.extend_from_slice(&app1);
            out.extend_from_slice(&data[segment.end..]);
            Ok(out)
        }
        None => {
            if value == 1 {
                return Ok(data.to_vec());
            }
            let app1 = app1_segment(&minimal_tiff(value))?;
            let mut out = Vec::with_capacity(data.len() + app1.len());
            out.extend_from_slice(&data[..layout.insert_at]);
            out.extend_from_slice(&app1);
            out.extend_from_slice(&data[layout.insert_at..]);
            Ok(out)
        }
    }
}

const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";
const PNG_EXIF: &[u8; 4] = b"eXIf";

/// One PNG chunk: length, type, payload and CRC
#[derive(Debug)]
struct PngChunk {
    kind: [u8; 4],
    /// Whole chunk, length field through CRC
    span: Range<usize>,
    payload: Range<usize>,
}

fn scan_png(data: &[u8]) -> Result<Vec<PngChunk>, String> {
    if !data.starts_with(PNG_SIGNATURE) {
        return Err("missing PNG signature".to_string());
    }

    let mut chunks = Vec::new();
    let mut pos = PNG_SIGNATURE.len();
    while pos < data.len() {
        let header = data
            .get(pos..pos + 8)
            .ok_or_else(|| format!("truncated PNG chunk at byte {}", pos))?;
        let length = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let kind = [header[4], header[5], header[6], header[7]];
        let payload = pos + 8..pos + 8 + length;
        let end = payload.end + 4;
        if end > data.len() {
            return Err(format!("PNG chunk at byte {} overruns the file", pos));
        }
        chunks.push(PngChunk {
            kind,
            span: pos..end,
            payload,
        });
        if &kind == b"IEND" {
            break;
        }
        pos = end;
    }

    match chunks.first() {
        Some(first) if &first.kind == b"IHDR" => Ok(chunks),
        _ => Err("PNG does not start with IHDR".to_string()),
    }
}

fn png_chunk(kind: &[u8; 4], payload: &[u8]) -> Result<Vec<u8>, String> {
    let length = u32::try_from(payload.len()).map_err(|_| "PNG chunk too large".to_string())?;

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(kind);
    hasher.update(payload);

    let mut chunk = Vec::with_capacity(payload.len() + 12);
    chunk.extend_from_slice(&length.to_be_bytes());
    chunk.extend_from_slice(kind);
    chunk.extend_from_slice(payload);
    chunk.extend_from_slice(&hasher.finalize().to_be_bytes());
    Ok(chunk)
}

/// TIFF block of an `eXIf` payload; some writers prepend the JPEG `Exif` header
fn png_tiff(payload: &[u8]) -> &[u8] {
    payload.strip_prefix(EXIF_HEADER.as_slice()).unwrap_or(payload)
}

/// Read the Orientation value of a PNG stream, if present
pub(crate) fn png_orientation(data: &[u8]) -> Result<Option<u16>, String> {
    let chunks = scan_png(data)?;
    match chunks.iter().find(|c| &c.kind == PNG_EXIF) {
        Some(chunk) => tiff_orientation(png_tiff(&data[chunk.payload.clone()])),
        None => Ok(None),
    }
}

/// Return a copy of a PNG stream with the given Orientation value.
///
/// An existing `eXIf` chunk is rewritten with a fresh CRC; otherwise a
/// minimal one is inserted right after IHDR. Image data is not touched.
pub(crate) fn set_png_orientation(data: &[u8], value: u16) -> Result<Vec<u8>, String> {
    let chunks = scan_png(data)?;

    let (replace, payload) = match chunks.iter().find(|c| &c.kind == PNG_EXIF) {
        Some(chunk) => {
            let payload = &data[chunk.payload.clone()];
            let tiff = png_tiff(payload);
            let prefix = &payload[..payload.len() - tiff.len()];

            let mut tiff = tiff.to_vec();
            set_tiff_orientation(&mut tiff, value)?;
            let mut new_payload = prefix.to_vec();
            new_payload.extend_from_slice(&tiff);
            (chunk.span.clone(), new_payload)
        }
        None => {
            if value == 1 {
                return Ok(data.to_vec());
            }
            let ihdr_end = chunks[0].span.end;
            (ihdr_end..ihdr_end, minimal_tiff(value))
        }
    };

    let exif = png_chunk(PNG_EXIF, &payload)?;
    let mut out = Vec::with_capacity(data.len() + exif.len());
    out.extend_from_slice(&data[..replace.start]);
    out.extend_from_slice(&exif);
    out.extend_from_slice(&data[replace.end..]);
    Ok(out)
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Hand-built JPEG, PNG and TIFF streams for tests

    /// Big-endian TIFF block with an inline Make ("Cam"), an optional
    /// Orientation and a DateTime stored after the IFD.
    pub fn tiff_block(orientation: Option<u16>) -> Vec<u8> {
        let make = b"Cam\0";
        let datetime = b"2024:01:15 14:30:00\0";
        let count: u16 = if orientation.is_some() { 3 } else { 2 };
        let ifd_len = 2 + 12 * count as usize + 4;
        let datetime_offset = 8 + ifd_len;

        let mut t = Vec::new();
        t.extend_from_slice(b"MM\x00\x2A");
        t.extend_from_slice(&8u32.to_be_bytes());
        t.extend_from_slice(&count.to_be_bytes());
        // Make (0x010F), ASCII, 4 bytes, inline
        t.extend_from_slice(&0x010Fu16.to_be_bytes());
        t.extend_from_slice(&2u16.to_be_bytes());
        t.extend_from_slice(&(make.len() as u32).to_be_bytes());
        t.extend_from_slice(make);
        if let Some(value) = orientation {
            t.extend_from_slice(&0x0112u16.to_be_bytes());
            t.extend_from_slice(&3u16.to_be_bytes());
            t.extend_from_slice(&1u32.to_be_bytes());
            t.extend_from_slice(&value.to_be_bytes());
            t.extend_from_slice(&[0, 0]);
        }
        // DateTime (0x0132), ASCII, 20 bytes, by offset
        t.extend_from_slice(&0x0132u16.to_be_bytes());
        t.extend_from_slice(&2u16.to_be_bytes());
        t.extend_from_slice(&(datetime.len() as u32).to_be_bytes());
        t.extend_from_slice(&(datetime_offset as u32).to_be_bytes());
        t.extend_from_slice(&0u32.to_be_bytes());
        t.extend_from_slice(datetime);
        t
    }

    /// 4x2 RGB PNG with an optional `eXIf` chunk after IHDR
    pub fn png(exif: Option<Vec<u8>>) -> Vec<u8> {
        let mut encoded = std::io::Cursor::new(Vec::new());
        image::RgbImage::new(4, 2)
            .write_to(&mut encoded, image::ImageFormat::Png)
            .unwrap();
        let encoded = encoded.into_inner();
        let Some(tiff) = exif else {
            return encoded;
        };

        // Signature (8) + IHDR (12 + 13)
        let ihdr_end = 33;
        let mut p = encoded[..ihdr_end].to_vec();
        p.extend_from_slice(&super::png_chunk(b"eXIf", &tiff).unwrap());
        p.extend_from_slice(&encoded[ihdr_end..]);
        p
    }

    /// JPEG stream: SOI, optional APP0, optional EXIF APP1, SOS, scan bytes, EOI
    pub fn jpeg(with_app0: bool, exif: Option<Vec<u8>>) -> Vec<u8> {
        let mut j = vec![0xFF, 0xD8];
        if with_app0 {
            let payload = b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0";
            j.extend_from_slice(&[0xFF, 0xE0]);
            j.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
            j.extend_from_slice(payload);
        }
        if let Some(tiff) = exif {
            j.extend_from_slice(&[0xFF, 0xE1]);
            j.extend_from_slice(&((tiff.len() + 8) as u16).to_be_bytes());
            j.extend_from_slice(b"Exif\0\0");
            j.extend_from_slice(&tiff);
        }
        // SOS header with a two byte length, then fake entropy-coded data
        j.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02]);
        j.extend_from_slice(&[0x12, 0x34, 0x56, 0x78, 0x9A]);
        j.extend_from_slice(&[0xFF, 0xD9]);
        j
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{jpeg, png, tiff_block};
    use super::*;

    fn differing_bytes(a: &[u8], b: &[u8]) -> Vec<usize> {
        a.iter()
            .zip(b.iter())
            .enumerate()
            .filter(|(_, (x, y))| x != y)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_tiff_patch_in_place() {
        let original = tiff_block(Some(1));
        let mut patched = original.clone();
        set_tiff_orientation(&mut patched, 6).unwrap();

        assert_eq!(patched.len(), original.len());
        assert_eq!(differing_bytes(&original, &patched).len(), 1);
        assert_eq!(tiff_orientation(&patched).unwrap(), Some(6));
    }

    #[test]
    fn test_tiff_append_ifd_when_tag_missing() {
        let original = tiff_block(None);
        assert_eq!(tiff_orientation(&original).unwrap(), None);

        let mut patched = original.clone();
        set_tiff_orientation(&mut patched, 8).unwrap();

        assert!(patched.len() > original.len());
        assert_eq!(tiff_orientation(&patched).unwrap(), Some(8));
        // Only the IFD0 pointer changed in the original region
        let changed = differing_bytes(&original, &patched[..original.len()]);
        assert!(changed.iter().all(|&i| (4..8).contains(&i)));
    }

    #[test]
    fn test_tiff_little_endian() {
        let mut tiff = vec![b'I', b'I', 0x2A, 0x00, 8, 0, 0, 0];
        tiff.extend_from_slice(&1u16.to_le_bytes());
        tiff.extend_from_slice(&0x0112u16.to_le_bytes());
        tiff.extend_from_slice(&3u16.to_le_bytes());
        tiff.extend_from_slice(&1u32.to_le_bytes());
        tiff.extend_from_slice(&[3, 0, 0, 0]);
        tiff.extend_from_slice(&0u32.to_le_bytes());

        assert_eq!(tiff_orientation(&tiff).unwrap(), Some(3));
        set_tiff_orientation(&mut tiff, 1).unwrap();
        assert_eq!(tiff_orientation(&tiff).unwrap(), Some(1));
    }

    #[test]
    fn test_tiff_rejects_garbage() {
        assert!(tiff_orientation(b"not a tiff").is_err());
        assert!(tiff_orientation(b"MM\x00\x2A\x00\x00\x10\x00").is_err());
    }

    #[test]
    fn test_jpeg_patch_keeps_other_bytes() {
        let original = jpeg(true, Some(tiff_block(Some(1))));
        let patched = set_jpeg_orientation(&original, 6).unwrap();

        assert_eq!(patched.len(), original.len());
        assert_eq!(differing_bytes(&original, &patched).len(), 1);
        assert_eq!(jpeg_orientation(&patched).unwrap(), Some(6));
    }

    #[test]
    fn test_jpeg_exif_without_orientation() {
        let original = jpeg(false, Some(tiff_block(None)));
        let patched = set_jpeg_orientation(&original, 3).unwrap();

        assert_eq!(jpeg_orientation(&patched).unwrap(), Some(3));
        // Scan data is untouched
        assert!(patched.ends_with(&[0x12, 0x34, 0x56, 0x78, 0x9A, 0xFF, 0xD9]));
    }

    #[test]
    fn test_jpeg_without_exif_gets_segment_after_app0() {
        let original = jpeg(true, None);
        assert_eq!(jpeg_orientation(&original).unwrap(), None);

        let patched = set_jpeg_orientation(&original, 8).unwrap();
        assert_eq!(jpeg_orientation(&patched).unwrap(), Some(8));
        // APP0 is still the first segment
        assert_eq!(&patched[2..4], &[0xFF, 0xE0]);
        assert_eq!(&patched[20..22], &[0xFF, 0xE1]);
    }

    #[test]
    fn test_jpeg_without_exif_normal_orientation_is_noop() {
        let original = jpeg(false, None);
        assert_eq!(set_jpeg_orientation(&original, 1).unwrap(), original);
    }

    #[test]
    fn test_jpeg_rejects_non_jpeg() {
        assert!(set_jpeg_orientation(b"\x89PNG\r\n", 6).is_err());
        assert!(set_jpeg_orientation(&[0xFF, 0xD8, 0x00], 6).is_err());
    }

    #[test]
    fn test_png_exif_patch_keeps_image_chunks() {
        let original = png(Some(tiff_block(Some(1))));
        let patched = set_png_orientation(&original, 6).unwrap();

        assert_eq!(patched.len(), original.len());
        assert_eq!(png_orientation(&patched).unwrap(), Some(6));
        // Value bytes and the chunk CRC change, nothing else
        assert!(differing_bytes(&original, &patched).len() <= 5);

        let before = scan_png(&original).unwrap();
        let after = scan_png(&patched).unwrap();
        let kinds = |chunks: &[PngChunk]| chunks.iter().map(|c| c.kind).collect::<Vec<_>>();
        assert_eq!(kinds(&before[..]), kinds(&after[..]));
    }

    #[test]
    fn test_png_without_exif_gets_chunk_after_ihdr() {
        let original = png(None);
        assert_eq!(png_orientation(&original).unwrap(), None);
        assert_eq!(set_png_orientation(&original, 1).unwrap(), original);

        let patched = set_png_orientation(&original, 8).unwrap();
        let chunks = scan_png(&patched).unwrap();
        assert_eq!(&chunks[1].kind, b"eXIf");
        assert_eq!(png_orientation(&patched).unwrap(), Some(8));
        assert!(image::load_from_memory(&patched).is_ok());
    }

    #[test]
    fn test_png_chunk_crc() {
        // CRC of an empty IEND chunk is fixed by the format
        let iend = png_chunk(b"IEND", &[]).unwrap();
        assert_eq!(iend, [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]);
    }

    #[test]
    fn test_png_rejects_non_png() {
        assert!(png_orientation(&jpeg(false, None)).is_err());
    }
}
