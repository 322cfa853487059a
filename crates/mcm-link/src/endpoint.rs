//! Realtime endpoint derived from the page origin.

use url::Url;

use crate::error::{LinkError, LinkResult};

/// Path of the controller's realtime endpoint.
pub const WS_PATH: &str = "/ws";

/// Derive the realtime endpoint from the origin serving the surface.
///
/// `http` becomes `ws` and `https` becomes `wss`; host and port are kept
/// and the path is replaced with `/ws`.
///
/// # Errors
/// Returns an error if the origin does not parse or uses another scheme.
pub fn endpoint_from_origin(origin: &str) -> LinkResult<Url> {
    let mut url = Url::parse(origin)?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(LinkError::InvalidOrigin(other.to_string())),
    };
    url.set_scheme(scheme).map_err(|()| LinkError::InvalidOrigin(origin.to_string()))?;
    url.set_path(WS_PATH);
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_plain_origin_upgrades_to_ws() {
        let url = endpoint_from_origin("http://192.168.1.20:8123").unwrap();
        assert_eq!(url.as_str(), "ws://192.168.1.20:8123/ws");
    }

    #[test]
    fn test_secure_origin_upgrades_to_wss() {
        let url = endpoint_from_origin("https://studio.local/index.html?page=2#top").unwrap();
        assert_eq!(url.as_str(), "wss://studio.local/ws");
    }

    #[test]
    fn test_realtime_origin_passes_through() {
        let url = endpoint_from_origin("ws://localhost:9000/").unwrap();
        assert_eq!(url.as_str(), "ws://localhost:9000/ws");
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert_matches!(endpoint_from_origin("ftp://host"), Err(LinkError::InvalidOrigin(s)) if s == "ftp");
        assert_matches!(endpoint_from_origin("not a url"), Err(LinkError::Url(_)));
    }
}
