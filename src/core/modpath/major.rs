/// Reports whether `segment` is a major version path suffix (`v2`, `v3`, ...).
///
/// Major version 1 has no suffix, so `v1` is rejected, as are `v0` and
/// leading zeros.
pub fn is_path_major(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    match bytes.len() {
        0 | 1 => false,
        2 => bytes[0] == b'v' && (b'2'..=b'9').contains(&bytes[1]),
        _ => {
            bytes[0] == b'v'
                && (b'1'..=b'9').contains(&bytes[1])
                && bytes[2..].iter().all(u8::is_ascii_digit)
        }
    }
}
