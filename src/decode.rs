//! Decoding of IFC text values.
//!
//! Exported property graphs keep STEP's `\X2\...\X0\` escapes inside string
//! values: the payload is a run of 4-digit hex groups, one UTF-16 code unit
//! each. Names have to be decoded before they are compared with the plain
//! strings of a requirements file.

/// Returned in place of a missing name.
pub const UNKNOWN_NAME: &str = "Unknown";

const X2_OPEN: &[u8; 4] = b"\\X2\\";
const X0_CLOSE: &[u8; 4] = b"\\X0\\";

/// Decode every `\X2\<hex>\X0\` sequence in `raw`.
///
/// Markers are matched case-insensitively. Text outside the markers, and an
/// opening marker with no closing one, is copied unchanged.
///
/// # Example
///
/// ```
/// use ifc_checker::decode::decode_ifc_string;
///
/// assert_eq!(decode_ifc_string(r"Pi\X2\00E8\X0\ce"), "Pièce");
/// assert_eq!(decode_ifc_string("Wall"), "Wall");
/// ```
#[must_use]
pub fn decode_ifc_string(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = find_marker(rest, X2_OPEN) {
        let payload_start = start + X2_OPEN.len();
        let Some(len) = find_marker(&rest[payload_start..], X0_CLOSE) else {
            break;
        };

        result.push_str(&rest[..start]);
        decode_utf16_hex(&rest[payload_start..payload_start + len], &mut result);
        rest = &rest[payload_start + len + X0_CLOSE.len()..];
    }

    result.push_str(rest);
    result
}

/// Decode an optional name, falling back to [`UNKNOWN_NAME`].
#[must_use]
pub fn decode_name(raw: Option<&str>) -> String {
    raw.map_or_else(|| UNKNOWN_NAME.to_string(), decode_ifc_string)
}

// The marker starts with '\', which is never a UTF-8 continuation byte, so a
// byte offset found here is always a char boundary.
fn find_marker(haystack: &str, marker: &[u8; 4]) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(marker.len())
        .position(|window| window.eq_ignore_ascii_case(marker))
}

fn decode_utf16_hex(hex: &str, out: &mut String) {
    let units: Vec<u16> = hex
        .as_bytes()
        .chunks(4)
        .filter(|chunk| chunk.len() == 4)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .filter_map(|group| u16::from_str_radix(group, 16).ok())
        .collect();

    out.extend(
        char::decode_utf16(units).map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER)),
    );
}
