//! CSV rendering of archived messages.

use storage::MessageRecord;

pub const CSV_HEADER: [&str; 8] = [
    "message_id",
    "chat_message_id",
    "user_id",
    "username",
    "text",
    "chat_name",
    "chat_id",
    "message_date",
];

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders the header plus one row per message, in input order, as UTF-8 bytes.
///
/// CRLF line endings; fields are quoted only when they contain a comma, quote or line break.
/// A missing username becomes an empty field.
pub fn to_csv(messages: &[MessageRecord]) -> csv::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for m in messages {
        writer.write_record([
            m.message_id.to_string(),
            m.chat_message_id.to_string(),
            m.user_id.to_string(),
            m.username.clone().unwrap_or_default(),
            m.text.clone(),
            m.chat_name.clone(),
            m.chat_id.to_string(),
            m.message_date.format(DATE_FORMAT).to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
