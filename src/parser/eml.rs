//! Build an [`AttachmentRecord`] from one attachment of an `.eml` file.

use std::path::Path;

use mail_parser::{MessageParser, MimeHeaders};

use crate::error::{PolicyError, Result};
use crate::model::attachment::AttachmentRecord;

/// Read an `.eml` file and describe its attachment number `index` (0-based).
pub fn read_attachment(path: impl AsRef<Path>, index: usize) -> Result<AttachmentRecord> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| PolicyError::io(path, e))?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "Read message");
    parse_attachment(&data, index)
}

/// Describe attachment number `index` of a raw RFC 5322 message.
///
/// The declared content type is taken verbatim from the part headers (empty
/// when absent) so that inference happens during evaluation. The part index
/// doubles as the attachment id.
pub fn parse_attachment(raw_message: &[u8], index: usize) -> Result<AttachmentRecord> {
    let message_bytes = skip_from_line(raw_message);
    let msg = MessageParser::default()
        .parse(message_bytes)
        .ok_or_else(|| PolicyError::MimeError("Failed to parse message".into()))?;

    let available = msg.attachments().count();
    let part = msg
        .attachments()
        .nth(index)
        .ok_or(PolicyError::AttachmentNotFound { index, available })?;

    let name = part
        .attachment_name()
        .map(String::from)
        .unwrap_or_else(|| format!("attachment_{index}"));

    let content_type = part
        .content_type()
        .map(|ct: &mail_parser::ContentType| {
            let main = ct.ctype();
            match ct.subtype() {
                Some(sub) => format!("{main}/{sub}"),
                None => main.to_string(),
            }
        })
        .unwrap_or_default();

    Ok(AttachmentRecord {
        name,
        content_type,
        size: part.contents().len() as u64,
        id: index as u64,
    })
}

/// Skip an MBOX `From ` separator line if the file was cut out of a mailbox.
fn skip_from_line(data: &[u8]) -> &[u8] {
    // Handle BOM
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);

    if data.starts_with(b"From ") {
        if let Some(pos) = data.iter().position(|&b| b == b'\n') {
            return &data[pos + 1..];
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &[u8] = b"From: a@example.com\r\n\
To: b@example.com\r\n\
Subject: Files\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"XX\"\r\n\
\r\n\
--XX\r\n\
Content-Type: text/plain\r\n\
\r\n\
See attached.\r\n\
--XX\r\n\
Content-Type: application/vnd.android.package-archive; name=\"Game.APK\"\r\n\
Content-Disposition: attachment; filename=\"Game.APK\"\r\n\
Content-Transfer-Encoding: base64\r\n\
\r\n\
UEsDBAoAAAAAAA==\r\n\
--XX--\r\n";

    #[test]
    fn test_parse_attachment_fields() {
        let record = parse_attachment(MESSAGE, 0).unwrap();
        assert_eq!(record.name, "Game.APK");
        assert_eq!(record.content_type, "application/vnd.android.package-archive");
        assert_eq!(record.size, 10);
        assert_eq!(record.id, 0);
    }

    #[test]
    fn test_parse_attachment_index_out_of_range() {
        let err = parse_attachment(MESSAGE, 4).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::AttachmentNotFound {
                index: 4,
                available: 1
            }
        ));
    }

    #[test]
    fn test_skip_from_line() {
        let data = b"From user@example.com Thu Jan 01 00:00:00 2024\nSubject: Test\n\nBody\n";
        assert!(skip_from_line(data).starts_with(b"Subject:"));
        let bare = b"Subject: Test\n\nBody\n";
        assert_eq!(skip_from_line(bare), bare);
    }
}
