//! Resume encoding shared by the modal (encode) and the relay (decode).
//!
//! The wire form is a data URL: `data:<media type>;base64,<payload>`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use mime::Mime;

const BASE64_MARKER: &str = "base64,";
const MAX_FILE_NAME_CHARS: usize = 128;

#[derive(Debug, thiserror::Error)]
pub enum ResumeError {
    #[error("resume payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Decoded resume bytes plus the media type advertised by the data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedResume {
    pub media_type: Option<Mime>,
    pub bytes: Vec<u8>,
}

/// Attachment handed to the mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeAttachment {
    pub file_name: String,
    pub content_type: Mime,
    pub bytes: Vec<u8>,
}

pub fn encode_data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}

/// Everything after the first `base64,` is the payload. A bare base64 string
/// without the data URL header is accepted as-is.
pub fn decode_data_url(raw: &str) -> Result<DecodedResume, ResumeError> {
    let (header, payload) = match raw.split_once(BASE64_MARKER) {
        Some((header, payload)) => (Some(header), payload),
        None => (None, raw),
    };

    let media_type = header
        .and_then(|header| header.trim().strip_prefix("data:"))
        .map(|media| media.trim_end_matches(';'))
        .filter(|media| !media.is_empty())
        .and_then(|media| media.parse::<Mime>().ok());

    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD.decode(compact.as_bytes())?;

    Ok(DecodedResume { media_type, bytes })
}

/// Build the outgoing attachment, keeping the uploaded media type. Without a
/// media type the attachment falls back to `resume.pdf` / `application/pdf`.
pub fn attachment_from_data_url(
    raw: &str,
    file_name: Option<&str>,
) -> Result<ResumeAttachment, ResumeError> {
    let DecodedResume { media_type, bytes } = decode_data_url(raw)?;
    let content_type = media_type.unwrap_or(mime::APPLICATION_PDF);
    let file_name = file_name
        .and_then(sanitize_file_name)
        .unwrap_or_else(|| default_file_name(&content_type));

    Ok(ResumeAttachment {
        file_name,
        content_type,
        bytes,
    })
}

fn default_file_name(content_type: &Mime) -> String {
    let extension = match content_type.essence_str() {
        "application/pdf" => Some("pdf"),
        "application/msword" => Some("doc"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => Some("docx"),
        _ => mime_guess::get_mime_extensions(content_type)
            .and_then(|extensions| extensions.first().copied()),
    };

    match extension {
        Some(extension) => format!("resume.{extension}"),
        None => "resume".to_string(),
    }
}

/// Strip directories and anything outside a conservative character set.
fn sanitize_file_name(raw: &str) -> Option<String> {
    let base = raw.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .take(MAX_FILE_NAME_CHARS)
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim().to_string();

    if cleaned.chars().all(|c| c == '.' || c == '_') {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_reverses_encode() {
        let original: Vec<u8> = (0u8..=255).cycle().take(1000).collect();
        let url = encode_data_url("application/pdf", &original);
        assert!(url.starts_with("data:application/pdf;base64,"));

        let decoded = decode_data_url(&url).expect("decodes");
        assert_eq!(decoded.bytes, original);
        assert_eq!(decoded.media_type, Some(mime::APPLICATION_PDF));
    }

    #[test]
    fn bare_base64_without_header_is_accepted() {
        let decoded = decode_data_url("aGVsbG8=").expect("decodes");
        assert_eq!(decoded.bytes, b"hello");
        assert!(decoded.media_type.is_none());
    }

    #[test]
    fn invalid_payload_is_rejected() {
        let err = decode_data_url("data:application/pdf;base64,@@not-base64@@")
            .expect_err("rejects garbage");
        assert!(err.to_string().contains("base64"));
    }

    #[test]
    fn attachment_keeps_uploaded_type_and_derives_name() {
        let docx = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
        let url = encode_data_url(docx, b"PK\x03\x04");
        let attachment = attachment_from_data_url(&url, None).expect("attachment");
        assert_eq!(attachment.file_name, "resume.docx");
        assert_eq!(attachment.content_type.essence_str(), docx);
    }

    #[test]
    fn attachment_without_media_type_falls_back_to_pdf() {
        let attachment = attachment_from_data_url("JVBERi0=", None).expect("attachment");
        assert_eq!(attachment.file_name, "resume.pdf");
        assert_eq!(attachment.content_type, mime::APPLICATION_PDF);
    }

    #[test]
    fn client_file_names_are_sanitized() {
        let url = encode_data_url("application/pdf", b"%PDF");
        let attachment =
            attachment_from_data_url(&url, Some("../../etc/Jane <CV>.pdf")).expect("attachment");
        assert_eq!(attachment.file_name, "Jane _CV_.pdf");

        let attachment = attachment_from_data_url(&url, Some("..")).expect("attachment");
        assert_eq!(attachment.file_name, "resume.pdf");
    }
}
