//! The flat metadata record format shared by the build step and the player.
//!
//! One record per line: `(filename=title=artist=imagedata)`. A literal `=` in
//! the title or artist is written as [`EQUAL_TOKEN`]; `imagedata` is either
//! [`NO_COVER`] or a `data:` URI. The image field is everything after the third
//! `=`, so base64 padding inside the URI survives.

use super::model::Track;

/// Stand-in for `=` inside title and artist fields.
pub const EQUAL_TOKEN: &str = "_EQUAL_";
/// Image field value for tracks without cover art.
pub const NO_COVER: &str = "none";

/// Escape a title or artist for use inside a record.
///
/// Line breaks are folded to spaces since a record must stay on one line.
pub fn escape_field(value: &str) -> String {
    value
        .replace(['\r', '\n'], " ")
        .replace('=', EQUAL_TOKEN)
}

/// Reverse of [`escape_field`] (line breaks are not restored).
pub fn unescape_field(value: &str) -> String {
    value.replace(EQUAL_TOKEN, "=")
}

/// Render one record line (without the trailing newline).
pub fn format_record(filename: &str, title: &str, artist: &str, cover: Option<&str>) -> String {
    format!(
        "({}={}={}={})",
        filename,
        escape_field(title),
        escape_field(artist),
        cover.unwrap_or(NO_COVER)
    )
}

/// Parse one record line. Returns `None` for anything that is not a record.
pub fn parse_record(line: &str) -> Option<Track> {
    let line = line.trim();
    let inner = line.strip_prefix('(')?.strip_suffix(')')?;

    let mut fields = inner.splitn(4, '=');
    let filename = fields.next()?;
    let title = fields.next()?;
    let artist = fields.next()?;
    let cover_image = fields
        .next()
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != NO_COVER)
        .map(str::to_string);

    Some(Track {
        filename: filename.to_string(),
        title: unescape_field(title),
        artist: unescape_field(artist),
        cover_image,
    })
}

/// Parse a whole data resource, silently dropping malformed lines.
pub fn parse_records(text: &str) -> Vec<Track> {
    text.lines()
        .enumerate()
        .filter_map(|(n, line)| {
            let parsed = parse_record(line);
            if parsed.is_none() && !line.trim().is_empty() {
                tracing::debug!(line = n + 1, "skipping malformed record");
            }
            parsed
        })
        .collect()
}
