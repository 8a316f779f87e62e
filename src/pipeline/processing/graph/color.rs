/// Deterministic `#rrggbb`-style color for a node id.
///
/// Rolling `unit + ((hash << 5) - hash)` over the UTF-16 code units. Only the
/// shift truncates to 32 bits; the running hash itself is not wrapped. The
/// absolute value in lowercase hex is cut or right-padded with `0` to six
/// digits. Distinct ids may share a color.
pub fn color_from_id(id: &str) -> String {
    let hash = id.encode_utf16().fold(0i64, |hash, unit| {
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        i64::from(unit).wrapping_add(shifted.wrapping_sub(hash))
    });

    let mut digits: String = format!("{:x}", hash.unsigned_abs()).chars().take(6).collect();
    while digits.len() < 6 {
        digits.push('0');
    }
    format!("#{}", digits)
}
