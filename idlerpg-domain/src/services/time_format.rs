/// Renders a duration as `H hours, M minutes, S seconds`.
///
/// Hours appear only when non-zero. Minutes appear when non-zero or when
/// hours are shown, so `7202` renders as `2 hours, 0 minutes, 2 seconds`.
/// Seconds always appear.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let remainder = total_seconds % 3600;
    let minutes = remainder / 60;
    let seconds = remainder % 60;

    let mut segments = Vec::with_capacity(3);
    if hours > 0 {
        segments.push(pluralize(hours, "hour"));
    }
    if minutes > 0 || hours > 0 {
        segments.push(pluralize(minutes, "minute"));
    }
    segments.push(pluralize(seconds, "second"));
    segments.join(", ")
}

fn pluralize(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
