//! Value formatters: raw scores and durations into display strings.

use url::Url;

const MS_PER_SECOND: f64 = 1_000.0;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_DAY: u64 = 86_400_000;
const DAYS_PER_YEAR: u64 = 365;

// Guards against 1.2 * 10 landing on 11.999999.
const SECOND_ROUNDING_EPSILON: f64 = 0.000_000_1;

/// Converts a `[0, 1]` score into an integer percentage.
///
/// Out-of-range scores are clamped so the result always fits `0..=100`.
pub fn score_percent(score: f64) -> u8 {
    // NaN saturates to 0 on the cast.
    (score * 100.0).round().clamp(0.0, 100.0) as u8
}

/// `0.873` renders as `"87"`. No `%` suffix; presentation belongs to the renderer.
pub fn format_percentage(score: f64) -> String {
    score_percent(score).to_string()
}

/// Renders milliseconds as a compact duration such as `320ms`, `1.2s` or `1m 5s`.
///
/// Never returns an empty string: zero (and non-finite input) renders as `0ms`.
pub fn format_duration(ms: f64) -> String {
    if !ms.is_finite() || ms == 0.0 {
        return "0ms".to_string();
    }

    let sign = if ms < 0.0 { "-" } else { "" };
    let ms = ms.abs();

    if ms < MS_PER_SECOND {
        let rounded = if ms >= 1.0 { ms.round() } else { ms.ceil() };
        return format!("{sign}{}ms", rounded as u64);
    }

    let whole = ms.trunc() as u64;
    let days = whole / MS_PER_DAY;
    let hours = (whole / MS_PER_HOUR) % 24;
    let minutes = (whole / MS_PER_MINUTE) % 60;
    let seconds = (ms / MS_PER_SECOND) % 60.0;

    let mut parts: Vec<String> = Vec::new();
    push_unit(&mut parts, days / DAYS_PER_YEAR, "y");
    push_unit(&mut parts, days % DAYS_PER_YEAR, "d");
    push_unit(&mut parts, hours, "h");
    push_unit(&mut parts, minutes, "m");

    let seconds = format_seconds(seconds);
    if seconds != "0" {
        parts.push(format!("{seconds}s"));
    }

    if parts.is_empty() {
        return "0ms".to_string();
    }

    format!("{sign}{}", parts.join(" "))
}

fn push_unit(parts: &mut Vec<String>, value: u64, suffix: &str) {
    if value > 0 {
        parts.push(format!("{value}{suffix}"));
    }
}

/// Floors to one decimal place and drops a trailing `.0`.
fn format_seconds(seconds: f64) -> String {
    let floored = (seconds * 10.0 + SECOND_ROUNDING_EPSILON).floor() / 10.0;
    let fixed = format!("{floored:.1}");
    match fixed.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => fixed,
    }
}

/// Normalizes a page URL for display.
///
/// The scheme, a leading `www.`, the default port, the fragment and a trailing
/// `/` are dropped and the host is lowercased, so `https://www.Example.com/page/`
/// becomes `example.com/page`. Input that does not parse as a URL only loses
/// its scheme and trailing `/`.
pub fn humanize_url(url: &str) -> String {
    let trimmed = url.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else if let Some(rest) = trimmed.strip_prefix("//") {
        format!("http://{rest}")
    } else {
        format!("http://{trimmed}")
    };

    let Ok(parsed) = Url::parse(&candidate) else {
        return fallback_humanize(trimmed);
    };
    let Some(host) = parsed.host_str() else {
        return fallback_humanize(trimmed);
    };

    let host = match host.strip_prefix("www.") {
        Some(rest) if rest.contains('.') => rest,
        _ => host,
    };

    let mut out = host.to_string();
    // `port()` is `None` for the scheme's default port.
    if let Some(port) = parsed.port() {
        out.push(':');
        out.push_str(&port.to_string());
    }
    out.push_str(parsed.path().trim_end_matches('/'));
    if let Some(query) = parsed.query().filter(|q| !q.is_empty()) {
        out.push('?');
        out.push_str(query);
    }
    out
}

fn fallback_humanize(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .or_else(|| url.strip_prefix("//"))
        .unwrap_or(url);
    without_scheme.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_to_nearest_integer() {
        assert_eq!(format_percentage(0.873), "87");
        assert_eq!(format_percentage(1.0), "100");
        assert_eq!(format_percentage(0.0), "0");
        assert_eq!(format_percentage(0.875), "88");
        assert_eq!(format_percentage(0.5), "50");
    }

    #[test]
    fn score_percent_clamps_out_of_range_scores() {
        assert_eq!(score_percent(1.7), 100);
        assert_eq!(score_percent(-0.2), 0);
        assert_eq!(score_percent(f64::NAN), 0);
    }

    #[test]
    fn duration_zero_is_not_empty() {
        assert_eq!(format_duration(0.0), "0ms");
        assert_eq!(format_duration(-0.0), "0ms");
        assert_eq!(format_duration(f64::NAN), "0ms");
    }

    #[test]
    fn duration_below_one_second_uses_milliseconds() {
        assert_eq!(format_duration(320.0), "320ms");
        assert_eq!(format_duration(1.0), "1ms");
        assert_eq!(format_duration(450.4), "450ms");
        assert_eq!(format_duration(450.6), "451ms");
        assert_eq!(format_duration(0.3), "1ms");
        assert_eq!(format_duration(999.0), "999ms");
    }

    #[test]
    fn duration_seconds_floor_to_one_decimal() {
        assert_eq!(format_duration(1000.0), "1s");
        assert_eq!(format_duration(1200.0), "1.2s");
        assert_eq!(format_duration(1299.0), "1.2s");
        assert_eq!(format_duration(2460.0), "2.4s");
        assert_eq!(format_duration(59_990.0), "59.9s");
    }

    #[test]
    fn duration_uses_compound_units() {
        assert_eq!(format_duration(60_000.0), "1m");
        assert_eq!(format_duration(65_000.0), "1m 5s");
        assert_eq!(format_duration(3_600_000.0), "1h");
        assert_eq!(format_duration(3_723_400.0), "1h 2m 3.4s");
        assert_eq!(format_duration(86_400_000.0), "1d");
        assert_eq!(format_duration(366.0 * 86_400_000.0), "1y 1d");
    }

    #[test]
    fn duration_negative_keeps_sign() {
        assert_eq!(format_duration(-320.0), "-320ms");
        assert_eq!(format_duration(-1500.0), "-1.5s");
    }

    #[test]
    fn humanize_strips_scheme_and_trailing_slash() {
        assert_eq!(humanize_url("https://example.com/"), "example.com");
        assert_eq!(humanize_url("http://example.com"), "example.com");
        assert_eq!(humanize_url("https://example.com/page/"), "example.com/page");
        assert_eq!(humanize_url("example.com"), "example.com");
        assert_eq!(humanize_url("//example.com/a/"), "example.com/a");
    }

    #[test]
    fn humanize_normalizes_host_port_and_www() {
        assert_eq!(humanize_url("https://www.example.com/"), "example.com");
        assert_eq!(humanize_url("https://EXAMPLE.com:443/a"), "example.com/a");
        assert_eq!(humanize_url("http://example.com:8080/a/"), "example.com:8080/a");
        assert_eq!(
            humanize_url("https://www.example.com/a/b?x=1#top"),
            "example.com/a/b?x=1"
        );
        assert_eq!(humanize_url("https://www.com/"), "www.com");
    }

    #[test]
    fn humanize_falls_back_on_unparseable_input() {
        assert_eq!(humanize_url("https://"), "");
        assert_eq!(humanize_url("not a url/"), "not a url");
    }
}
