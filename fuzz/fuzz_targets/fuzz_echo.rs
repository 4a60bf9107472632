//! Fuzz testing for header rendering and identity lookup.
//!
//! Builds a header map from arbitrary name/value bytes (pairs the transport
//! would reject are skipped) and checks that:
//!
//! - Rendering never panics and emits exactly one line per header value
//! - The rendered block always ends with the empty terminator line
//! - Identity lookup never panics, with any configured header name
//! - Header-name validation never panics on arbitrary strings
//!
//! # Running the Fuzz Tests
//!
//! ```bash
//! cargo +nightly install cargo-fuzz
//! cargo +nightly fuzz run fuzz_echo -- -max_total_time=60
//! ```

#![no_main]

use arbitrary::Arbitrary;
use echo_upstream::echo::{headers_greeting, render_headers};
use echo_upstream::identity::{IdentityHeader, MissingIdentityPolicy};
use echo_upstream::validation::validate_header_name;
use http::{HeaderMap, HeaderName, HeaderValue};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    identity_header: String,
    headers: Vec<(Vec<u8>, Vec<u8>)>,
}

fuzz_target!(|input: Input| {
    let mut headers = HeaderMap::new();
    for (name, value) in &input.headers {
        if let (Ok(name), Ok(value)) = (HeaderName::from_bytes(name), HeaderValue::from_bytes(value)) {
            headers.append(name, value);
        }
    }

    let rendered = render_headers(&headers);
    assert!(rendered.ends_with("\r\n"));
    assert_eq!(rendered.matches("\r\n").count(), headers.len() + 1);

    let greeting = headers_greeting(&headers);
    assert!(greeting.ends_with("\n----\n"));

    if let Ok(name) = validate_header_name(&input.identity_header, "Identity") {
        let identity = IdentityHeader::new(name);
        let extracted = identity.extract(&headers);
        let resolved = identity.resolve(&headers, MissingIdentityPolicy::Empty);
        assert_eq!(resolved.ok(), Some(extracted.unwrap_or_default()));
    }
});
