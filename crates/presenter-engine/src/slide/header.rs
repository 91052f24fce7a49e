use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::{
    error::SlideError,
    markup::{NodeId, Tree},
};

use super::model::Doc;

const TAGS: &str = "Tags:";
const SUMMARY: &str = "Summary:";

/// `15:04 2 Jan 2006`
const DATE_TIME_FORMAT: &str = "%H:%M %d %b %Y";
/// `2 Jan 2006`
const DATE_FORMAT: &str = "%d %b %Y";
/// Dates without a time are anchored at 11:00 UTC, which falls on the same
/// calendar date in every real-world time zone.
const DATE_ONLY_HOUR: u32 = 11;

/// Applies the lines of a header block to `doc`.
///
/// Each trimmed line is, in order of preference: a `Tags:` list, a
/// `Summary:`, a timestamp, a date, or the subtitle. A second unrecognized
/// line is an error.
pub(crate) fn parse_header(doc: &mut Doc<'_>, tree: &Tree<'_>, block: NodeId) -> Result<(), SlideError> {
    for line in tree.lines(block) {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if let Some(rest) = text.strip_prefix(TAGS) {
            doc.tags = rest.split(',').map(|t| t.trim().to_string()).collect();
        } else if let Some(rest) = text.strip_prefix(SUMMARY) {
            doc.summary = Some(rest.trim().to_string());
        } else if let Some(time) = parse_time(text) {
            doc.time = Some(time);
        } else if doc.subtitle.is_none() {
            doc.subtitle = Some(text.to_string());
        } else {
            return Err(SlideError::UnexpectedHeaderLine {
                line: text.to_string(),
            });
        }
    }
    Ok(())
}

/// Parses `HH:MM D Mon YYYY`, or `D Mon YYYY` at 11:00 UTC.
///
/// The year must be exactly four digits and the minutes exactly two.
pub fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    let year = text.rsplit(' ').next()?;
    if !is_digits(year, 4) {
        return None;
    }
    if let Some((_, rest)) = text.split_once(':') {
        let minutes = rest.split(' ').next()?;
        if !is_digits(minutes, 2) {
            return None;
        }
        return NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
            .ok()
            .map(|t| t.and_utc());
    }
    let date = NaiveDate::parse_from_str(text, DATE_FORMAT).ok()?;
    let time = NaiveTime::from_hms_opt(DATE_ONLY_HOUR, 0, 0)?;
    Some(date.and_time(time).and_utc())
}

fn is_digits(field: &str, width: usize) -> bool {
    field.len() == width && field.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Markdown;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn header(source: &str) -> Result<Doc<'static>, SlideError> {
        let tree = Markdown::new().parse(source);
        let block = tree.children(tree.root())[0];
        let mut doc = Doc::default();
        parse_header(&mut doc, &tree, block)?;
        Ok(doc)
    }

    #[test]
    fn tags_are_split_and_trimmed() {
        let doc = header("Tags: foo, bar , baz\n").unwrap();
        assert_eq!(doc.tags, ["foo", "bar", "baz"]);
    }

    #[test]
    fn last_tags_line_wins() {
        let doc = header("Tags: a\nTags: b, c\n").unwrap();
        assert_eq!(doc.tags, ["b", "c"]);
    }

    #[test]
    fn summary_is_trimmed_and_overwritten() {
        let doc = header("Summary: first\nSummary:   second one  \n").unwrap();
        assert_eq!(doc.summary.as_deref(), Some("second one"));
    }

    #[test]
    fn full_header_block() {
        let doc = header(
            "Subtitle of document\n15:04 2 Jan 2006\nTags: foo, bar, baz\nSummary: This is a great document you want to read.\n",
        )
        .unwrap();
        assert_eq!(doc.subtitle.as_deref(), Some("Subtitle of document"));
        assert_eq!(
            doc.time,
            Some(Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 0).unwrap())
        );
        assert_eq!(doc.tags, ["foo", "bar", "baz"]);
        assert_eq!(
            doc.summary.as_deref(),
            Some("This is a great document you want to read.")
        );
    }

    #[test]
    fn short_year_line_is_the_subtitle() {
        let doc = header("1 May 68\n2 Jan 2006\n").unwrap();
        assert_eq!(doc.subtitle.as_deref(), Some("1 May 68"));
        assert_eq!(
            doc.time,
            Some(Utc.with_ymd_and_hms(2006, 1, 2, 11, 0, 0).unwrap())
        );
    }

    #[test]
    fn second_free_text_line_is_an_error() {
        let err = header("A subtitle\nSomething else\n").unwrap_err();
        match err {
            SlideError::UnexpectedHeaderLine { line } => assert_eq!(line, "Something else"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[rstest]
    #[case::date_time("15:04 2 Jan 2006", Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 0).unwrap())]
    #[case::date_only("2 Jan 2006", Utc.with_ymd_and_hms(2006, 1, 2, 11, 0, 0).unwrap())]
    #[case::two_digit_day("25 Dec 2019", Utc.with_ymd_and_hms(2019, 12, 25, 11, 0, 0).unwrap())]
    #[case::early_hour("9:30 10 Nov 2009", Utc.with_ymd_and_hms(2009, 11, 10, 9, 30, 0).unwrap())]
    fn parses_times(#[case] text: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_time(text), Some(expected));
    }

    #[rstest]
    #[case("Jan 2 2006")]
    #[case("2006-01-02")]
    #[case("32 Jan 2006")]
    #[case("Subtitle of document")]
    #[case::two_digit_year("2 Jan 95")]
    #[case::one_digit_minute("15:4 2 Jan 2006")]
    #[case::five_digit_year("2 Jan 20060")]
    fn rejects_other_text(#[case] text: &str) {
        assert_eq!(parse_time(text), None);
    }
}
