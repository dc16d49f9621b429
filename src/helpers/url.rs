//! Figma web URLs and node-id notations.
//!
//! Node ids are canonically `1:2`; web links carry them as `node-id=1-2`.

use url::Url;

use crate::error::{FigmaError, Result};

pub const FIGMA_WEB_ORIGIN: &str = "https://www.figma.com";

/// Path prefixes that are followed by a file key.
const FILE_PATH_KINDS: [&str; 4] = ["file", "design", "proto", "board"];

/// Convert a canonical node id (`1:2`) to URL notation (`1-2`).
pub fn node_id_to_url_format(node_id: &str) -> String {
    node_id.replace(':', "-")
}

/// Convert a URL-notation node id (`1-2`) to canonical form (`1:2`).
pub fn url_format_to_node_id(url_node_id: &str) -> String {
    url_node_id.replace('-', ":")
}

/// Parse a link that may lack its scheme (`figma.com/file/...`).
fn parse_loose(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{}", raw)).ok()
        }
        Err(_) => None,
    }
}

fn is_figma_host(url: &Url) -> bool {
    url.host_str()
        .map(|host| host == "figma.com" || host.ends_with(".figma.com"))
        .unwrap_or(false)
}

fn is_file_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// `<digits>[-:]<digits>`, the only shape accepted from a `node-id` parameter.
fn is_simple_node_id(value: &str) -> bool {
    let Some((left, right)) = value.split_once(['-', ':']) else {
        return false;
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(left) && digits(right)
}

/// Extract the file key from a Figma file/design link.
pub fn extract_file_key(url: &str) -> Result<String> {
    let invalid = || FigmaError::InvalidFigmaUrl(url.to_string());
    let parsed = parse_loose(url).ok_or_else(invalid)?;
    if !is_figma_host(&parsed) {
        return Err(invalid());
    }

    let mut segments = parsed.path_segments().ok_or_else(invalid)?;
    match (segments.next(), segments.next()) {
        (Some(kind), Some(key)) if FILE_PATH_KINDS.contains(&kind) && is_file_key(key) => {
            Ok(key.to_string())
        }
        _ => Err(invalid()),
    }
}

/// The canonical node id from a link's `node-id` parameter, if present.
pub fn extract_node_id(url: &str) -> Option<String> {
    let parsed = parse_loose(url)?;
    let (_, value) = parsed.query_pairs().find(|(key, _)| key == "node-id")?;
    is_simple_node_id(&value).then(|| url_format_to_node_id(&value))
}

fn web_url(kind: &str, file_key: &str) -> Result<Url> {
    if !is_file_key(file_key) {
        return Err(FigmaError::InvalidFigmaUrl(format!(
            "file key must be alphanumeric: {:?}",
            file_key
        )));
    }
    let mut url = Url::parse(FIGMA_WEB_ORIGIN)?;
    url.path_segments_mut()
        .map_err(|_| FigmaError::InvalidFigmaUrl(FIGMA_WEB_ORIGIN.to_string()))?
        .clear()
        .extend([kind, file_key]);
    Ok(url)
}

fn append_node_id(url: &mut Url, node_id: Option<&str>) {
    if let Some(node_id) = node_id {
        url.query_pairs_mut()
            .append_pair("node-id", &node_id_to_url_format(node_id));
    }
}

/// `https://www.figma.com/file/<key>[?node-id=1-2]`
pub fn build_file_url(file_key: &str, node_id: Option<&str>) -> Result<String> {
    let mut url = web_url("file", file_key)?;
    append_node_id(&mut url, node_id);
    Ok(url.into())
}

/// `https://www.figma.com/design/<key>[/<name>][?node-id=1-2]`
pub fn build_design_url(
    file_key: &str,
    file_name: Option<&str>,
    node_id: Option<&str>,
) -> Result<String> {
    let mut url = web_url("design", file_key)?;
    if let Some(name) = file_name.filter(|n| !n.is_empty()) {
        url.path_segments_mut()
            .map_err(|_| FigmaError::InvalidFigmaUrl(FIGMA_WEB_ORIGIN.to_string()))?
            .push(name);
    }
    append_node_id(&mut url, node_id);
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_notations_are_inverse() {
        for id in ["0:1", "1:2", "123:4567", "I5:6;7:8"] {
            assert_eq!(url_format_to_node_id(&node_id_to_url_format(id)), id);
        }
        assert_eq!(node_id_to_url_format("12:34"), "12-34");
        assert_eq!(url_format_to_node_id("12-34"), "12:34");
    }

    #[test]
    fn extracts_key_from_supported_links() {
        let cases = [
            "https://www.figma.com/file/ABC123/Marketing-Site",
            "https://www.figma.com/design/ABC123/Marketing?node-id=1-2&t=x",
            "https://figma.com/file/ABC123",
            "figma.com/design/ABC123/Name",
            "https://www.figma.com/proto/ABC123/Flow",
        ];
        for url in cases {
            assert_eq!(extract_file_key(url).unwrap(), "ABC123", "{url}");
        }
    }

    #[test]
    fn rejects_non_figma_links() {
        for url in [
            "https://example.com/file/ABC123",
            "https://www.figma.com/community/plugin/123",
            "https://www.figma.com/file/",
            "https://www.figma.com/file/abc-def",
            "not a url at all",
        ] {
            assert!(
                matches!(extract_file_key(url), Err(FigmaError::InvalidFigmaUrl(_))),
                "{url}"
            );
        }
    }

    #[test]
    fn extracts_node_id_in_canonical_form() {
        assert_eq!(
            extract_node_id("https://www.figma.com/design/K/Name?node-id=10-20").as_deref(),
            Some("10:20")
        );
        assert_eq!(
            extract_node_id("https://www.figma.com/file/K?node-id=3%3A4").as_deref(),
            Some("3:4")
        );
        assert_eq!(extract_node_id("https://www.figma.com/file/K"), None);
        assert_eq!(
            extract_node_id("https://www.figma.com/file/K?node-id=abc"),
            None
        );
    }

    #[test]
    fn build_and_extract_round_trip() {
        let url = build_file_url("Key42", None).unwrap();
        assert_eq!(url, "https://www.figma.com/file/Key42");
        assert_eq!(extract_file_key(&url).unwrap(), "Key42");
        assert_eq!(extract_node_id(&url), None);

        let url = build_file_url("Key42", Some("7:11")).unwrap();
        assert_eq!(url, "https://www.figma.com/file/Key42?node-id=7-11");
        assert_eq!(extract_file_key(&url).unwrap(), "Key42");
        assert_eq!(extract_node_id(&url).as_deref(), Some("7:11"));
    }

    #[test]
    fn design_url_encodes_file_name() {
        let url = build_design_url("Key42", Some("My File"), Some("1:2")).unwrap();
        assert_eq!(
            url,
            "https://www.figma.com/design/Key42/My%20File?node-id=1-2"
        );
        assert_eq!(extract_file_key(&url).unwrap(), "Key42");
        assert_eq!(extract_node_id(&url).as_deref(), Some("1:2"));
    }

    #[test]
    fn build_rejects_bad_keys() {
        assert!(build_file_url("", None).is_err());
        assert!(build_design_url("a/b", None, None).is_err());
    }
}
