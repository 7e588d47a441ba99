//! Human-readable byte sizes.

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a byte count using binary (1024) steps, e.g. `1536 -> "1.5 KB"`.
///
/// The value is rounded to two decimals and trailing zeros are dropped. Sizes of a
/// terabyte or more are still expressed in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let bytes_f = bytes as f64;
    let exponent = (bytes_f.ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes_f / 1024f64.powi(exponent as i32);

    format!("{} {}", trim_decimals(value), UNITS[exponent])
}

/// Like [`format_file_size`], keeping a leading `-` for negative counts.
pub fn format_signed_file_size(bytes: i64) -> String {
    if bytes < 0 {
        format!("-{}", format_file_size(bytes.unsigned_abs()))
    } else {
        format_file_size(bytes as u64)
    }
}

fn trim_decimals(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    if fixed.contains('.') {
        fixed
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        fixed
    }
}
