//! Parsing of command-line values.

use vintage_core::benchmark::ImageSize;

/// Parse an intensity in `[0.0, 1.0]`.
pub fn parse_intensity(value: &str) -> Result<f32, String> {
    let intensity = value
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("Invalid intensity: {}", value))?;
    if !(0.0..=1.0).contains(&intensity) {
        return Err(format!(
            "Intensity {} must be in range [0.0, 1.0]",
            intensity
        ));
    }
    Ok(intensity)
}

/// Parse a comma-separated list of sizes, e.g. "800x600,1920x1080".
pub fn parse_sizes(value: &str) -> Result<Vec<ImageSize>, String> {
    let sizes = value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.parse::<ImageSize>())
        .collect::<Result<Vec<_>, _>>()?;
    if sizes.is_empty() {
        return Err("At least one size is required".to_string());
    }
    Ok(sizes)
}

/// Parse a comma-separated list of worker counts, e.g. "1,2,4,8".
pub fn parse_thread_list(value: &str) -> Result<Vec<usize>, String> {
    let mut counts = Vec::new();
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let count = part
            .parse::<usize>()
            .map_err(|_| format!("Invalid thread count: {}", part))?;
        if count == 0 {
            return Err("Thread counts must be at least 1".to_string());
        }
        counts.push(count);
    }
    if counts.is_empty() {
        return Err("At least one thread count is required".to_string());
    }
    Ok(counts)
}
