use std::collections::{BTreeMap, HashSet};
use url::Url;

use crate::config::constants::BOOKS_CATEGORY;
use crate::network::errors::FetchError;

// * Builds the marketplace search URL for a keyword, restricted to the books category.
// * The keyword is form-urlencoded by the url crate (spaces become '+').
pub fn build_search_url(marketplace_url: &str, keyword: &str) -> Result<String, FetchError> {
    let mut url = Url::parse(marketplace_url)
        .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", marketplace_url, e)))?;

    if url.cannot_be_a_base() {
        return Err(FetchError::InvalidUrl(marketplace_url.to_string()));
    }

    url.query_pairs_mut()
        .append_pair("k", keyword.trim())
        .append_pair("i", BOOKS_CATEGORY);

    Ok(url.to_string())
}

// * Normalizes a product link found in a listing into a stable absolute URL.
// *
// * Logic:
// * 1. Join href with base_url.
// * 2. Strip Fragment (#).
// * 3. Lowercase Hostname.
// * 4. Drop "/ref=..." path segments the marketplace appends for click attribution.
// * 5. Remove tracking and search-session query parameters.
// * 6. Sort remaining query parameters alphabetically.
pub fn normalize_url(href: &str, base_url: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;
    let mut url = base.join(href).ok()?;

    url.set_fragment(None);

    if let Some(host) = url.host_str() {
        let lower_host = host.to_lowercase();
        if url.set_host(Some(&lower_host)).is_err() {
            return None;
        }
    }

    // * Step 4: attribution segments are unique per impression, not per product
    let kept_segments: Option<Vec<String>> = url.path_segments().map(|segments| {
        segments
            .filter(|s| !s.starts_with("ref="))
            .map(str::to_string)
            .collect()
    });
    if let Some(segments) = kept_segments {
        url.set_path(&format!("/{}", segments.join("/")));
    }

    // ! Add new tracking params here as they are discovered.
    let drop_params: HashSet<&str> = [
        "utm_source", "utm_medium", "utm_campaign", "utm_term", "utm_content",
        "ref", "ref_", "qid", "sr", "crid", "sprefix", "dib", "dib_tag", "keywords",
        "content-id", "pd_rd_r", "pd_rd_w", "pd_rd_wg", "pf_rd_p", "pf_rd_r",
    ]
    .into();

    let mut clean_pairs = BTreeMap::new();
    for (k, v) in url.query_pairs() {
        let key_lower = k.to_lowercase();
        if !drop_params.contains(key_lower.as_str()) {
            clean_pairs.insert(k.into_owned(), v.into_owned());
        }
    }

    if clean_pairs.is_empty() {
        url.set_query(None);
    } else {
        let mut serializer = url.query_pairs_mut();
        serializer.clear();
        for (k, v) in clean_pairs {
            serializer.append_pair(&k, &v);
        }
    }

    Some(url.to_string())
}

// * Returns scheme + host of a marketplace URL, used as the join base for relative links.
pub fn marketplace_origin(marketplace_url: &str) -> Option<String> {
    let url = Url::parse(marketplace_url).ok()?;
    let host = url.host_str()?;
    Some(format!("{}://{}/", url.scheme(), host))
}
