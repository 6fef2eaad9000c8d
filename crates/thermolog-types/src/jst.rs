//! Fixed-offset time handling.
//!
//! All deployments run against a single fixed offset (+09:00). Timestamps are
//! kept as true instants internally (UTC unix seconds at rest) and shifted to
//! JST only when a value crosses a query or serialization boundary. Keeping
//! the offset in one place avoids the divergent formatting paths that plague
//! ad-hoc string timestamps.

use time::error::Parse;
use time::format_description::BorrowedFormatItem;
use time::macros::{format_description, offset};
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// The fixed offset used for all window arithmetic and display formatting.
pub const JST: UtcOffset = offset!(+9);

/// Display format for timestamps: `YYYY-MM-DD HH:MM:SS` (offset implied).
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Current time in JST.
#[must_use]
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(JST)
}

/// Format an instant as `YYYY-MM-DD HH:MM:SS` in JST.
///
/// The offset is not embedded in the string; callers are expected to know it
/// out-of-band, matching the legacy wire format.
///
/// # Examples
///
/// ```
/// use time::macros::datetime;
///
/// let ts = datetime!(2025-12-24 00:15:40 UTC);
/// assert_eq!(thermolog_types::jst::format_timestamp(ts), "2025-12-24 09:15:40");
/// ```
#[must_use]
pub fn format_timestamp(ts: OffsetDateTime) -> String {
    ts.to_offset(JST)
        .format(TIMESTAMP_FORMAT)
        .expect("constant format description")
}

/// Parse a `YYYY-MM-DD HH:MM:SS` string, interpreting it as JST.
pub fn parse_timestamp(s: &str) -> Result<OffsetDateTime, Parse> {
    let naive = PrimitiveDateTime::parse(s, TIMESTAMP_FORMAT)?;
    Ok(naive.assume_offset(JST))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_format_shifts_to_jst() {
        let ts = datetime!(2025-06-01 15:00:00 UTC);
        assert_eq!(format_timestamp(ts), "2025-06-02 00:00:00");
    }

    #[test]
    fn test_format_preserves_jst_wall_clock() {
        let ts = datetime!(2025-06-01 12:34:56 +9);
        assert_eq!(format_timestamp(ts), "2025-06-01 12:34:56");
    }

    #[test]
    fn test_parse_assumes_jst() {
        let ts = parse_timestamp("2025-06-01 12:34:56").unwrap();
        assert_eq!(ts.offset(), JST);
        assert_eq!(ts, datetime!(2025-06-01 03:34:56 UTC));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("not a timestamp").is_err());
        assert!(parse_timestamp("2025/06/01 12:00:00").is_err());
    }

    #[test]
    fn test_parse_format_round_trip() {
        let original = "2024-01-15 08:30:00";
        let parsed = parse_timestamp(original).unwrap();
        assert_eq!(format_timestamp(parsed), original);
    }

    #[test]
    fn test_now_is_jst() {
        assert_eq!(now().offset(), JST);
    }
}
