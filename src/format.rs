const KILOBYTE: u64 = 1024;
const MEGABYTE: u64 = KILOBYTE * 1024;
const GIGABYTE: u64 = MEGABYTE * 1024;

/// Render a byte count the way the size columns display it: rounded to the
/// largest unit strictly exceeded, plain bytes otherwise.
pub fn human_bytes(size: u64) -> String {
    if size == 0 {
        "0 B".to_string()
    } else if size > GIGABYTE {
        format!("{} GB", (size as f64 / GIGABYTE as f64).round() as u64)
    } else if size > MEGABYTE {
        format!("{} MB", (size as f64 / MEGABYTE as f64).round() as u64)
    } else if size > KILOBYTE {
        format!("{} KB", (size as f64 / KILOBYTE as f64).round() as u64)
    } else {
        format!("{} B", size)
    }
}
