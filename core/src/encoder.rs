//! Wire payload encoding.
//!
//! Exactly one encoding applies per request, in strict precedence:
//! files (multipart/form-data) over parameters (form-urlencoded) over a raw
//! body string (sent as ASCII `text/xml`).

use url::form_urlencoded;

use crate::http::{HttpFile, HttpParameter, DEFAULT_FILE_CONTENT_TYPE};

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Content type for a raw body string. Kept for compatibility with callers
/// that post XML without naming a type.
pub const RAW_BODY_CONTENT_TYPE: &str = "text/xml";

const CRLF: &str = "\r\n";

/// A request body together with the content type that describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Pick and run the encoding for a body-carrying request. Returns `None`
/// when there is nothing to send.
pub fn encode_body(
    parameters: &[HttpParameter],
    files: &[HttpFile],
    raw_body: Option<&str>,
    boundary: &str,
) -> Option<EncodedBody> {
    if !files.is_empty() {
        return Some(EncodedBody {
            content_type: multipart_content_type(boundary),
            bytes: encode_multipart(files, parameters, boundary),
        });
    }
    if !parameters.is_empty() {
        return Some(EncodedBody {
            content_type: FORM_URLENCODED.to_string(),
            bytes: encode_parameters(parameters).into_bytes(),
        });
    }
    match raw_body {
        Some(body) if !body.is_empty() => Some(EncodedBody {
            content_type: RAW_BODY_CONTENT_TYPE.to_string(),
            bytes: to_ascii_lossy(body),
        }),
        _ => None,
    }
}

/// `name=value` pairs joined by `&`, both sides form-urlencoded, in
/// insertion order.
pub fn encode_parameters(parameters: &[HttpParameter]) -> String {
    let mut encoded = String::new();
    for p in parameters {
        if !encoded.is_empty() {
            encoded.push('&');
        }
        encoded.extend(form_urlencoded::byte_serialize(p.name.as_bytes()));
        encoded.push('=');
        encoded.extend(form_urlencoded::byte_serialize(p.value.as_bytes()));
    }
    encoded
}

/// Attach an already-encoded query to `url`, joining with `&` when the URL
/// carries a query of its own.
pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    // The query belongs before any fragment.
    let (base, fragment) = url.split_at(url.find('#').unwrap_or(url.len()));
    let separator = match base.find('?') {
        Some(pos) if pos + 1 == base.len() || base.ends_with('&') => "",
        Some(_) => "&",
        None => "?",
    };
    format!("{base}{separator}{query}{fragment}")
}

pub fn multipart_content_type(boundary: &str) -> String {
    format!("multipart/form-data; boundary={boundary}")
}

/// Build a multipart/form-data body: file parts first, then one simple part
/// per parameter, then the closing delimiter.
///
/// A file's `file_name` is used as both the form field name and the
/// filename; its `name` is not sent. Servers that predate this crate key
/// uploads by file name.
pub fn encode_multipart(files: &[HttpFile], parameters: &[HttpParameter], boundary: &str) -> Vec<u8> {
    let mut out = Vec::new();

    for file in files {
        let content_type = file.content_type.as_deref().unwrap_or(DEFAULT_FILE_CONTENT_TYPE);
        let header = format!(
            "--{boundary}{CRLF}Content-Disposition: form-data; name=\"{name}\"; filename=\"{name}\"{CRLF}Content-Type: {content_type}{CRLF}{CRLF}",
            name = file.file_name,
        );
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(&file.data);
        out.extend_from_slice(CRLF.as_bytes());
    }

    for param in parameters {
        let part = format!(
            "--{boundary}{CRLF}Content-Disposition: form-data; name=\"{}\"{CRLF}{CRLF}{}{CRLF}",
            param.name, param.value,
        );
        out.extend_from_slice(part.as_bytes());
    }

    out.extend_from_slice(format!("--{boundary}--{CRLF}").as_bytes());
    out
}

/// Single-byte transcoding: ASCII passes through, anything else becomes `?`.
pub fn to_ascii_lossy(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const B: &str = "test-boundary";

    fn params(pairs: &[(&str, &str)]) -> Vec<HttpParameter> {
        pairs.iter().map(|(n, v)| HttpParameter::new(*n, *v)).collect()
    }

    fn count(haystack: &[u8], needle: &str) -> usize {
        haystack
            .windows(needle.len())
            .filter(|w| *w == needle.as_bytes())
            .count()
    }

    #[test]
    fn parameters_keep_insertion_order_and_duplicates() {
        let p = params(&[("b", "2"), ("a", "1"), ("b", "3")]);
        assert_eq!(encode_parameters(&p), "b=2&a=1&b=3");
    }

    #[test]
    fn parameters_percent_encode_names_and_values() {
        let p = params(&[("q", "hello world"), ("a&b", "x=y/ü")]);
        assert_eq!(encode_parameters(&p), "q=hello+world&a%26b=x%3Dy%2F%C3%BC");
    }

    #[test]
    fn single_parameter_has_no_separator() {
        assert_eq!(encode_parameters(&params(&[("k", "v")])), "k=v");
        assert_eq!(encode_parameters(&[]), "");
    }

    #[test]
    fn parameters_become_form_body() {
        let body = encode_body(&params(&[("a", "1")]), &[], None, B).unwrap();
        assert_eq!(body.content_type, FORM_URLENCODED);
        assert_eq!(body.bytes, b"a=1");
    }

    #[test]
    fn parameters_win_over_raw_body() {
        let body = encode_body(&params(&[("a", "1")]), &[], Some("<raw/>"), B).unwrap();
        assert_eq!(body.content_type, FORM_URLENCODED);
        assert_eq!(body.bytes, b"a=1");
    }

    #[test]
    fn raw_body_is_ascii_text_xml() {
        let body = encode_body(&[], &[], Some("<a>é</a>"), B).unwrap();
        assert_eq!(body.content_type, "text/xml");
        assert_eq!(body.bytes, b"<a>?</a>");
    }

    #[test]
    fn nothing_to_send() {
        assert!(encode_body(&[], &[], None, B).is_none());
        assert!(encode_body(&[], &[], Some(""), B).is_none());
    }

    #[test]
    fn files_force_multipart_and_ignore_raw_body() {
        let files = vec![HttpFile::new("f", "a.txt", "hi")];
        let body = encode_body(&[], &files, Some("RAW-BODY-MARKER"), B).unwrap();
        assert_eq!(body.content_type, "multipart/form-data; boundary=test-boundary");
        assert_eq!(count(&body.bytes, "RAW-BODY-MARKER"), 0);
    }

    #[test]
    fn file_part_reuses_file_name_as_field_name() {
        let files = vec![HttpFile::new("f", "a.txt", "hi")];
        let bytes = encode_multipart(&files, &[], B);
        let expected = "--test-boundary\r\n\
            Content-Disposition: form-data; name=\"a.txt\"; filename=\"a.txt\"\r\n\
            Content-Type: application/octet-stream\r\n\
            \r\n\
            hi\r\n\
            --test-boundary--\r\n";
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    #[test]
    fn multipart_has_one_opening_marker_per_part_and_one_closing_marker() {
        let files = vec![
            HttpFile::new("one", "one.bin", vec![0u8, 1, 2]).with_content_type("image/png"),
            HttpFile::new("two", "two.txt", "two"),
        ];
        let p = params(&[("x", "1"), ("y", "2")]);
        let bytes = encode_multipart(&files, &p, B);

        assert_eq!(count(&bytes, "--test-boundary\r\n"), 4);
        assert_eq!(count(&bytes, "--test-boundary--"), 1);
        assert!(bytes.ends_with(b"--test-boundary--\r\n"));
        assert_eq!(count(&bytes, "Content-Type: image/png\r\n"), 1);
        assert_eq!(count(&bytes, "Content-Disposition: form-data; name=\"x\"\r\n\r\n1\r\n"), 1);
    }

    #[test]
    fn file_bytes_are_written_verbatim() {
        let data = vec![0xff, 0x00, 0x80, b'\r', b'\n'];
        let files = vec![HttpFile::new("bin", "blob", data.clone())];
        let bytes = encode_multipart(&files, &[], B);
        assert!(bytes.windows(data.len()).any(|w| w == data.as_slice()));
    }

    #[test]
    fn encoding_is_deterministic() {
        let files = vec![HttpFile::new("f", "a.txt", "hi")];
        let p = params(&[("k", "v")]);
        assert_eq!(encode_body(&p, &files, None, B), encode_body(&p, &files, None, B));
    }

    #[test]
    fn append_query_picks_separator() {
        assert_eq!(append_query("http://x/api", "q=1"), "http://x/api?q=1");
        assert_eq!(append_query("http://x/api?a=b", "q=1"), "http://x/api?a=b&q=1");
        assert_eq!(append_query("http://x/api?", "q=1"), "http://x/api?q=1");
        assert_eq!(append_query("http://x/api", ""), "http://x/api");
    }

    #[test]
    fn append_query_keeps_fragment_last() {
        assert_eq!(append_query("http://x/api#top", "q=1"), "http://x/api?q=1#top");
        assert_eq!(append_query("http://x/api?a=b#top", "q=1"), "http://x/api?a=b&q=1#top");
        assert_eq!(append_query("http://x/api#a?b", "q=1"), "http://x/api?q=1#a?b");
        assert_eq!(append_query("http://x/api#top", ""), "http://x/api#top");
    }
}
