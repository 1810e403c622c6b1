//! URL safety checks for URL-bearing attributes.
//!
//! [§ 2.4 URLs](https://html.spec.whatwg.org/multipage/urls-and-fetching.html#urls)
//! [URL Standard](https://url.spec.whatwg.org/)
//!
//! The sanitizer consults [`is_invalid_uri`] for every attribute in
//! [`URL_ATTRIBUTES`]. A URL that fails the check is dropped no matter what
//! the schema says about the attribute.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

/// Attributes whose values are URLs and must pass [`is_invalid_uri`].
pub const URL_ATTRIBUTES: &[&str] = &[
    "src",
    "href",
    "data",
    "background",
    "action",
    "formaction",
    "poster",
    "xlink:href",
];

/// Elements allowed to reference SVG `data:` images when the policy leaves
/// SVG data URLs unset.
const SAFE_SVG_DATA_URL_ELEMENTS: &[&str] = &["img", "video"];

static SCRIPT_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)((java|vb)script|mhtml):").expect("valid regex"));
static DATA_IMAGE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^data:image/").expect("valid regex"));
static DATA_SVG_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^data:image/svg\+xml").expect("valid regex"));
static DATA_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^data:").expect("valid regex"));
static STRIPPED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\x00-\x1F]+").expect("valid regex"));

/// Which classes of URL are acceptable in sanitized output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrlPolicy {
    /// Accept every URL, including `javascript:` ones.
    pub allow_script_urls: bool,
    /// Accept every `data:` URL (script URLs are still rejected).
    pub allow_html_data_urls: bool,
    /// Accept (`Some(true)`) or reject (`Some(false)`) `data:image/svg+xml`
    /// URLs. When `None`, they are accepted only on `img` and `video`.
    pub allow_svg_data_urls: Option<bool>,
}

/// Returns true when `uri` must not appear in the output.
///
/// # Algorithm
///
/// STEP 1: Percent-decode the value and strip whitespace and control
/// characters, so `java&#10;script:` or `%6Aavascript:` cannot hide.
///
/// STEP 2: Apply the policy, most permissive setting first.
#[must_use]
pub fn is_invalid_uri(policy: &UrlPolicy, uri: &str, tag_name: Option<&str>) -> bool {
    // STEP 1
    let decoded = percent_decode_str(uri).decode_utf8_lossy();
    let decoded = STRIPPED_CHARS.replace_all(&decoded, "");

    // STEP 2
    if policy.allow_script_urls {
        false
    } else if SCRIPT_URL.is_match(&decoded) {
        true
    } else if policy.allow_html_data_urls {
        false
    } else if DATA_IMAGE_URL.is_match(&decoded) {
        block_svg_data_urls(policy.allow_svg_data_urls, tag_name) && DATA_SVG_URL.is_match(&decoded)
    } else {
        DATA_URL.is_match(&decoded)
    }
}

/// Returns true when `name` is one of the [`URL_ATTRIBUTES`].
#[must_use]
pub fn is_url_attribute(name: &str) -> bool {
    URL_ATTRIBUTES.contains(&name)
}

fn block_svg_data_urls(allow_svg_data_urls: Option<bool>, tag_name: Option<&str>) -> bool {
    allow_svg_data_urls.map_or_else(
        || tag_name.is_none_or(|tag| !SAFE_SVG_DATA_URL_ELEMENTS.contains(&tag)),
        |allowed| !allowed,
    )
}
