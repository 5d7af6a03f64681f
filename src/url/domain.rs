use url::Url;

/// Extracts the host of a URL, lowercased, with any explicit port
///
/// Two URLs belong to the same site when this value is equal, so
/// `shop.example.com` and `shop.example.com:8080` are different sites while
/// `https://SHOP.example.com` and `https://shop.example.com:443` are the same.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use storefront_harvest::url::extract_host;
///
/// let url = Url::parse("https://Shop.Example.com/products/soap").unwrap();
/// assert_eq!(extract_host(&url), Some("shop.example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_host(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// True when both URLs have a host and the hosts are equal
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (extract_host(a), extract_host(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
