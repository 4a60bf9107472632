//! Response bodies produced by the echo routes.
//!
//! Everything here is a pure function of its input, so identical requests
//! always produce byte-identical bodies.

use std::fmt::Write;

use axum::http::HeaderMap;

/// Prefix shared by every greeting.
pub const SERVICE_NAME: &str = "upstream.service";

/// Separator line around the rendered header block.
pub const SEPARATOR: &str = "----";

/// Body for `/service`: greets the forwarded identity.
pub fn identity_greeting(identity: &str) -> String {
    format!("{SERVICE_NAME}: Hello {identity} from behind Envoy!")
}

/// Body for `/`: a fixed greeting followed by every received header.
pub fn headers_greeting(headers: &HeaderMap) -> String {
    format!(
        "{SERVICE_NAME}: Hello from behind Envoy!\n{SEPARATOR}\n{}\n{SEPARATOR}\n",
        render_headers(headers)
    )
}

/// Render a header map as a raw header block.
///
/// One `name: value\r\n` line per value, terminated by an empty `\r\n` line.
/// Names come out lowercased as the transport stores them (`x-current-user`),
/// which differs from the title-cased names a Werkzeug-based upstream prints
/// (`X-Current-User`); compare names case-insensitively. Lines follow the map's order: names in
/// first-arrival order, with repeated values of one name kept together in
/// arrival order. Non-UTF-8 value bytes are replaced with U+FFFD.
pub fn render_headers(headers: &HeaderMap) -> String {
    let mut out = String::new();
    for (name, value) in headers {
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "{}: {}\r\n",
            name.as_str(),
            String::from_utf8_lossy(value.as_bytes())
        );
    }
    out.push_str("\r\n");
    out
}
