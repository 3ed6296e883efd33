//! Command URL construction
//!
//! Every request to the store targets `<base>/<prefix>/<command>/<name>`,
//! optionally followed by a query string.

/// Command verb for reading and existence checks
pub const CMD_GET: &str = "get";
/// Command verb for storing content
pub const CMD_UPLOAD: &str = "upload";
/// Command verb for removing an object
pub const CMD_DELETE: &str = "delete";

/// Query flag asking the store to append instead of overwrite (`DNET_IO_FLAGS_APPEND`)
pub const APPEND_FLAG: (&str, &str) = ("ioflags", "2");

/// Build a command URL.
///
/// Each segment is stripped of surrounding `/` and segments left empty are
/// skipped. `prefix` and `name` are percent-encoded piece by piece so that
/// `/` inside them keeps separating path components.
pub fn build(base: &str, prefix: &str, command: &str, name: &str, query: &[(&str, &str)]) -> String {
    let prefix = encode_path(prefix);
    let name = encode_path(name);

    let mut url = [base, prefix.as_str(), command, name.as_str()]
        .iter()
        .map(|part| part.trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if !query.is_empty() {
        let encoded = ::url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query.iter())
            .finish();
        url.push('?');
        url.push_str(&encoded);
    }

    url
}

/// Percent-encode a path, keeping `/` separators intact
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|piece| urlencoding::encode(piece).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
