//! Guest list export.
//!
//! Produces the CSV document admins download from the dashboard. Every field is quoted, rows are
//! separated by `\n` and the document starts with a UTF-8 byte-order mark so spreadsheet
//! programs pick the right encoding for Swedish characters.

use thiserror::Error;

use crate::db::models::rsvps::RsvpDBResponse;

/// Suggested file name for the download
pub const EXPORT_FILE_NAME: &str = "osa-svar.csv";

/// Column headers, in output order
pub const HEADERS: [&str; 8] = ["Namn", "E-post", "Status", "Tal", "Specialkost", "Kostdetaljer", "Låt", "Fun fact"];

const BYTE_ORDER_MARK: char = '\u{FEFF}';

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize guest list: {0}")]
    Serialization(String),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

/// A finished export, ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct CsvDocument {
    pub file_name: &'static str,
    pub content: String,
}

impl CsvDocument {
    pub const CONTENT_TYPE: &'static str = "text/csv; charset=utf-8";
}

fn yes_no(value: bool) -> &'static str {
    if value { "Ja" } else { "Nej" }
}

fn record(rsvp: &RsvpDBResponse) -> [&str; 8] {
    [
        &rsvp.name,
        &rsvp.email,
        rsvp.attending.label(),
        yes_no(rsvp.wants_speech),
        yes_no(rsvp.has_dietary),
        if rsvp.has_dietary { rsvp.dietary.as_deref().unwrap_or_default() } else { "" },
        rsvp.song.as_deref().unwrap_or_default(),
        rsvp.fun_fact.as_deref().unwrap_or_default(),
    ]
}

/// Serialize answers in the order given; the caller decides the ordering.
pub fn export_rsvps(rsvps: &[RsvpDBResponse]) -> Result<CsvDocument, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADERS)?;
    for rsvp in rsvps {
        writer.write_record(record(rsvp))?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Serialization(e.to_string()))?;
    let mut body = String::from_utf8(bytes).map_err(|e| ExportError::Serialization(e.to_string()))?;

    // Separators, not terminators: no newline after the last row
    if body.ends_with('\n') {
        body.pop();
    }

    let mut content = String::with_capacity(body.len() + BYTE_ORDER_MARK.len_utf8());
    content.push(BYTE_ORDER_MARK);
    content.push_str(&body);

    Ok(CsvDocument {
        file_name: EXPORT_FILE_NAME,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::rsvps::Attendance;
    use chrono::Utc;
    use uuid::Uuid;

    fn rsvp(name: &str, attending: Attendance) -> RsvpDBResponse {
        RsvpDBResponse {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            name: name.to_string(),
            email: "guest@example.com".to_string(),
            attending,
            wants_speech: false,
            song: None,
            has_dietary: false,
            dietary: None,
            fun_fact: None,
        }
    }

    fn eva() -> RsvpDBResponse {
        RsvpDBResponse {
            email: "e@x.se".to_string(),
            wants_speech: true,
            song: Some("A - B".to_string()),
            fun_fact: Some(r#"Has "two" dogs"#.to_string()),
            ..rsvp("Eva Ek", Attendance::Attending)
        }
    }

    fn lines(document: &CsvDocument) -> Vec<&str> {
        document.content.trim_start_matches(BYTE_ORDER_MARK).split('\n').collect()
    }

    fn parse(document: &CsvDocument) -> Vec<csv::StringRecord> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(document.content.trim_start_matches(BYTE_ORDER_MARK).as_bytes())
            .records()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_row_format() {
        let document = export_rsvps(&[eva()]).unwrap();

        assert_eq!(
            lines(&document)[1],
            r#""Eva Ek","e@x.se","Kommer","Ja","Nej","","A - B","Has ""two"" dogs""#
        );
    }

    #[test]
    fn test_header_bom_and_file_name() {
        let document = export_rsvps(&[]).unwrap();

        assert!(document.content.starts_with('\u{FEFF}'));
        assert!(document.content.as_bytes().starts_with(&[0xEF, 0xBB, 0xBF]));
        assert_eq!(document.file_name, "osa-svar.csv");
        assert_eq!(
            document.content,
            "\u{FEFF}\"Namn\",\"E-post\",\"Status\",\"Tal\",\"Specialkost\",\"Kostdetaljer\",\"Låt\",\"Fun fact\""
        );
    }

    #[test]
    fn test_row_count_and_order_preserved() {
        let input = vec![
            rsvp("Cecilia", Attendance::NotAttending),
            rsvp("Adam", Attendance::Attending),
            rsvp("Bertil", Attendance::CeremonyOnly),
        ];
        let document = export_rsvps(&input).unwrap();

        let records = parse(&document);
        assert_eq!(records.len(), 1 + input.len());
        assert_eq!(&records[0], &csv::StringRecord::from(HEADERS.to_vec()));

        let names: Vec<_> = records[1..].iter().map(|r| r[0].to_string()).collect();
        assert_eq!(names, vec!["Cecilia", "Adam", "Bertil"]);
        assert!(records.iter().all(|r| r.len() == HEADERS.len()));
    }

    #[test]
    fn test_status_labels() {
        let document = export_rsvps(&[
            rsvp("A", Attendance::Attending),
            rsvp("B", Attendance::CeremonyOnly),
            rsvp("C", Attendance::NotAttending),
            rsvp("D", Attendance::from_stored("something-else")),
        ])
        .unwrap();

        let statuses: Vec<_> = parse(&document)[1..].iter().map(|r| r[2].to_string()).collect();
        assert_eq!(statuses, vec!["Kommer", "Endast vigsel", "Kommer ej", "Kommer ej"]);
    }

    #[test]
    fn test_quotes_commas_and_newlines_round_trip() {
        let tricky = RsvpDBResponse {
            name: r#"Olof "Olle" Berg, Jr."#.to_string(),
            song: Some("\"Dancing Queen\"".to_string()),
            fun_fact: Some("Line one\nline \"two\", with comma".to_string()),
            ..rsvp("ignored", Attendance::Attending)
        };
        let document = export_rsvps(std::slice::from_ref(&tricky)).unwrap();

        let records = parse(&document);
        assert_eq!(records.len(), 2);
        assert_eq!(&records[1][0], tricky.name);
        assert_eq!(&records[1][6], "\"Dancing Queen\"");
        assert_eq!(&records[1][7], "Line one\nline \"two\", with comma");
    }

    #[test]
    fn test_dietary_only_when_flagged() {
        let flagged = RsvpDBResponse {
            has_dietary: true,
            dietary: Some("Vegetarian".to_string()),
            ..rsvp("A", Attendance::Attending)
        };
        let unflagged = RsvpDBResponse {
            has_dietary: false,
            dietary: Some("left over text".to_string()),
            ..rsvp("B", Attendance::Attending)
        };

        let records = parse(&export_rsvps(&[flagged, unflagged]).unwrap());
        assert_eq!(&records[1][4], "Ja");
        assert_eq!(&records[1][5], "Vegetarian");
        assert_eq!(&records[2][4], "Nej");
        assert_eq!(&records[2][5], "");
    }

    #[test]
    fn test_swedish_characters_survive() {
        let document = export_rsvps(&[rsvp("Åsa Öberg", Attendance::Attending)]).unwrap();
        assert_eq!(&parse(&document)[1][0], "Åsa Öberg");
    }
}
