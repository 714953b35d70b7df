const STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Evenly spaced "round" tick positions covering `[lo, hi]`, at most `max_ticks` of them
pub fn nice_ticks(lo: f64, hi: f64, max_ticks: usize) -> Vec<f64> {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if !lo.is_finite() || !hi.is_finite() || max_ticks < 2 {
        return Vec::new();
    }
    if hi == lo {
        return vec![lo];
    }

    let raw_step = (hi - lo) / (max_ticks - 1) as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let bounds = |s: f64| ((lo / s - 1e-9).ceil() as i64, (hi / s + 1e-9).floor() as i64);
    let step = STEPS
        .iter()
        .map(|candidate| candidate * magnitude)
        .find(|&s| {
            let (first, last) = bounds(s);
            last - first + 1 <= max_ticks as i64
        })
        .unwrap_or(magnitude * 10.0);

    // Snap floating point noise such as 0.30000000000000004
    let decimals = (-step.log10().floor()).max(0.0) as i32 + 1;
    let factor = 10f64.powi(decimals);
    let (first, last) = bounds(step);
    (first..=last)
        .map(|k| (k as f64 * step * factor).round() / factor)
        .collect()
}

/// Prints integral values without decimals and trims trailing zeros otherwise
pub fn format_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        return format!("{}", value.round() as i64);
    }
    let text = format!("{:.6}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
