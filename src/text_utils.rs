use std::ops::Index;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use quick_xml::escape::{resolve_html5_entity, resolve_predefined_entity, unescape_with};
use regex::Regex;

lazy_static! {
    static ref DATE_TIME_REGEX: Regex = Regex::new(
        r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[ T](\d{1,2}):(\d{1,2})(?::(\d{1,2}))?(\.\d{0,6})?)?$"
    ).unwrap();
    static ref NON_ALNUM_REGEX: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
    static ref TAG_REGEX: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref SPACES_REGEX: Regex = Regex::new(r"\s+").unwrap();
    static ref ENTITY_REGEX: Regex = Regex::new(r"&#?[A-Za-z0-9]+;").unwrap();
}

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Parses the `wp:post_date` format (`2024-01-02 10:11:12`). The `T` separator
/// and a date without time are also accepted.
pub fn parse_date_time(buf: &str) -> Result<NaiveDateTime, String> {
    let buf = buf.trim();
    let Some(caps) = DATE_TIME_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date time {}", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);
    let opt_u32 = |idx: usize| caps.get(idx).map_or(Ok(0), |m| to_u32(m.as_str()));

    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;
    let h: u32 = opt_u32(4)?;
    let mn: u32 = opt_u32(5)?;
    let s: u32 = opt_u32(6)?;

    let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
        return Err(format!("Invalid date {}", buf));
    };
    let Some(time) = NaiveTime::from_hms_opt(h, mn, s) else {
        return Err(format!("Invalid time {}", buf));
    };

    Ok(NaiveDateTime::new(date, time))
}

/// `Jan 02, 2024`
pub fn format_date_human(date_time: &NaiveDateTime) -> String {
    date_time.format("%b %d, %Y").to_string()
}

pub fn format_date_iso(date_time: &NaiveDateTime) -> String {
    date_time.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Resolves XML and HTML5 character references one by one. An unknown entity
/// stays as literal text.
pub fn decode_entities(value: &str) -> String {
    ENTITY_REGEX.replace_all(value, |caps: &regex::Captures| {
        let entity = &caps[0];
        let resolve = |name: &str| resolve_predefined_entity(name).or_else(|| resolve_html5_entity(name));
        match unescape_with(entity, resolve) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => entity.to_string(),
        }
    }).into_owned()
}

/// Lowercase ASCII slug: runs of anything that is not `[a-z0-9]` collapse to a
/// single `-`, and leading or trailing separators are trimmed. Non-ASCII
/// letters are transliterated first. May return an empty string.
pub fn slugify(value: &str) -> String {
    let value = decode_entities(value.trim());
    let value = unidecode::unidecode(&value).to_lowercase();
    let slug = NON_ALNUM_REGEX.replace_all(&value, "-");
    slug.trim_matches('-').to_string()
}

/// Plain text preview of an HTML fragment: tags stripped, whitespace collapsed,
/// cut to `max_chars` characters with an ellipsis when something was dropped.
pub fn summarize_html(html: &str, max_chars: usize) -> String {
    let text = TAG_REGEX.replace_all(html, "");
    let text = decode_entities(&text);
    let text = SPACES_REGEX.replace_all(&text, " ");
    let text = text.trim();

    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut summary: String = text.chars().take(max_chars).collect();
    summary.truncate(summary.trim_end().len());
    summary.push('…');
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_time() {
        let date_time = parse_date_time("2017-09-10 10:42:32").unwrap();
        assert_eq!(format_date_iso(&date_time), "2017-09-10T10:42:32");

        let date_time = parse_date_time("2017-09-10T10:42:32.123").unwrap();
        assert_eq!(format_date_iso(&date_time), "2017-09-10T10:42:32");

        let date_time = parse_date_time("2017-09-10").unwrap();
        assert_eq!(format_date_iso(&date_time), "2017-09-10T00:00:00");
    }

    #[test]
    fn test_parse_date_time_rejects_zero_date() {
        assert!(parse_date_time("0000-00-00 00:00:00").is_err());
        assert!(parse_date_time("yesterday").is_err());
        assert!(parse_date_time("").is_err());
    }

    #[test]
    fn test_format_date_human() {
        let date_time = parse_date_time("2024-01-02 05:06:07").unwrap();
        assert_eq!(format_date_human(&date_time), "Jan 02, 2024");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  --About   Us-- "), "about-us");
        assert_eq!(slugify("Ábaco & Café"), "abaco-cafe");
        assert_eq!(slugify("Tom &amp; Jerry"), "tom-jerry");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("Caf&eacute;"), "cafe");
    }

    #[test]
    fn test_decode_entities_mixed() {
        assert_eq!(decode_entities("a&nbsp;b &amp; c&eacute; &#233;&#x41;"), "a\u{a0}b & c\u{e9} \u{e9}A");
        assert_eq!(decode_entities("&bogus; &amp; &"), "&bogus; & &");
    }

    #[test]
    fn test_summarize_html() {
        let html = "<p>Hello <strong>there</strong>,\n  friend &amp; neighbour</p>";
        assert_eq!(summarize_html(html, 140), "Hello there, friend & neighbour");

        let long = "<p>ééééé ééééé</p>";
        assert_eq!(summarize_html(long, 6), "ééééé…");

        let html = "<p>Caf&eacute;&nbsp;time &amp; more</p>";
        assert_eq!(summarize_html(html, 140), "Caf\u{e9} time & more");
    }
}
