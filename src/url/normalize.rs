use crate::UrlError;
use url::Url;

/// Query parameters that only track how a visitor arrived
///
/// Storefronts append `_pos`/`_sid`/`_ss` to search and recommendation links;
/// marketplaces append `ref`/`qid`/`sr`/`dib` and the search terms to result
/// links.
const TRACKING_PARAMS: &[&str] = &[
    "fbclid", "gclid", "mc_eid", "ref", "ref_", "qid", "sr", "_pos", "_sid", "_ss", "_psq",
    "dib", "dib_tag", "keywords", "crid", "sprefix",
];

/// Normalizes a URL so the same page is always keyed the same way
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed, not HTTP(S), or hostless
/// 2. Collapse repeated slashes and dot segments in the path
/// 3. Remove trailing slash (except for root /)
/// 4. Remove fragment (everything after #)
/// 5. Remove tracking query parameters, keep the rest in order
/// 6. Remove empty query string (trailing ?)
///
/// Scheme and `www.` prefix are kept: the product URL is written out as-is
/// and must stay fetchable.
///
/// # Examples
///
/// ```
/// use storefront_harvest::url::normalize_url;
///
/// let url = normalize_url("https://Shop.Example.com/products/soap/?_pos=1#reviews").unwrap();
/// assert_eq!(url.as_str(), "https://shop.example.com/products/soap");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    if url.query().is_some() {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    Ok(url)
}

/// Normalizes a URL path by removing empty and dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    format!("/{}", segments.join("/"))
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
