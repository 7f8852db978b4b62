/// Returns the peak resident set size of the current process in megabytes.
///
/// `ru_maxrss` is reported in kilobytes on Linux and in bytes on macOS.
/// Returns `None` if `getrusage` fails.
///
/// # Example
/// ```rust, ignore
/// use bed2gff::max_mem_usage_mb;
///
/// if let Some(mb) = max_mem_usage_mb() {
///     println!("Peak memory: {:.2} MB", mb);
/// }
/// ```
pub fn max_mem_usage_mb() -> Option<f64> {
    let mut rusage = std::mem::MaybeUninit::<libc::rusage>::uninit();
    // SAFETY: getrusage only writes into the provided struct and reports
    // failure through its return code, which is checked before reading.
    let rusage = unsafe {
        if libc::getrusage(libc::RUSAGE_SELF, rusage.as_mut_ptr()) != 0 {
            return None;
        }
        rusage.assume_init()
    };

    let maxrss = rusage.ru_maxrss as f64;
    if cfg!(target_os = "macos") {
        Some(maxrss / 1024.0 / 1024.0)
    } else {
        Some(maxrss / 1024.0)
    }
}

/// Peak RSS growth between two samples, clamped at zero.
pub(crate) fn mem_delta_mb(before: Option<f64>, after: Option<f64>) -> f64 {
    match (before, after) {
        (Some(before), Some(after)) => (after - before).max(0.0),
        _ => 0.0,
    }
}
