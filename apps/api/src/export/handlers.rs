use axum::{
    extract::{Query, State},
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::errors::AppError;
use crate::session::handlers::UserIdQuery;
use crate::state::AppState;

/// RFC 5987 `attr-char`: everything else in `filename*` is percent-encoded.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// POST /api/v1/resume/export
///
/// Renders the session's resume with its selected template and returns the
/// PDF as an attachment. Answers 409 while another export for the same user
/// is still running.
pub async fn handle_export(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Response, AppError> {
    let session = state.sessions.get(params.user_id)?;
    let artifact = session.export(state.exporter.as_ref()).await?;

    let disposition = content_disposition(&artifact.filename);
    let mut response = (
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"))],
        artifact.content,
    )
        .into_response();

    let headers = response.headers_mut();
    let disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"resume.pdf\""));
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    if let Some(key) = artifact.archive_key.as_deref() {
        if let Ok(value) = HeaderValue::from_str(key) {
            headers.insert(HeaderName::from_static("x-export-key"), value);
        }
    }
    Ok(response)
}

/// Attachment header carrying the name twice: an ASCII-only `filename` for
/// old clients and the exact UTF-8 name in `filename*`.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            ' ' => ' ',
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect();
    let encoded = utf8_percent_encode(filename, ATTR_CHAR);
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_name_disposition() {
        assert_eq!(
            content_disposition("Ada Lovelace.pdf"),
            "attachment; filename=\"Ada Lovelace.pdf\"; filename*=UTF-8''Ada%20Lovelace.pdf"
        );
    }

    #[test]
    fn test_non_ascii_name_is_percent_encoded() {
        let disposition = content_disposition("José García.pdf");
        assert_eq!(
            disposition,
            "attachment; filename=\"Jos_ Garc_a.pdf\"; filename*=UTF-8''Jos%C3%A9%20Garc%C3%ADa.pdf"
        );
        assert!(disposition.is_ascii());
        assert!(HeaderValue::from_str(&disposition).is_ok());
    }

    #[test]
    fn test_quotes_cannot_break_out_of_filename() {
        let disposition = content_disposition("a\"b.pdf");
        assert!(disposition.starts_with("attachment; filename=\"a_b.pdf\";"));
        assert!(disposition.ends_with("filename*=UTF-8''a%22b.pdf"));
    }
}
