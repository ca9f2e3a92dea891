//! # Utility Functions Module
//!
//! Small helpers shared by the command builder and the statistics code.

/// Converts any iterable of string-like items into the owned argument list
/// handed to `tokio::process::Command::args`.
///
/// # Example
/// ```rust
/// use ffmpeg_batch::utils::to_string_vec;
///
/// let channels = 2;
/// let args = to_string_vec(["-ac", &channels.to_string()]);
/// assert_eq!(args, vec!["-ac".to_string(), "2".to_string()]);
/// ```
pub fn to_string_vec<T, I>(items: I) -> Vec<String>
where
    T: ToString,
    I: IntoIterator<Item = T>,
{
    items.into_iter().map(|item| item.to_string()).collect()
}

/// Builds an ffmpeg argument vector from mixed values.
///
/// ```rust
/// use ffmpeg_batch::args;
///
/// let args = args!["-b:a", "128k", "-ac", 2];
/// assert_eq!(args, vec!["-b:a", "128k", "-ac", "2"]);
/// ```
#[macro_export]
macro_rules! args {
    [$($item:expr),* $(,)?] => {
        $crate::utils::to_string_vec([$($item.to_string()),*])
    };
}

/// Rounds to two decimals, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Bytes expressed in decimal kilobytes (1 kB = 1000 bytes), two decimals.
pub fn kilobytes(bytes: u64) -> f64 {
    round2(bytes as f64 / 1000.0)
}
