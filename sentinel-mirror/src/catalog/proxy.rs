//! Proxy candidates for catalog requests.

use std::fmt;

use super::error::CatalogResult;

/// Route for a single catalog request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyEndpoint {
    /// Connect to the catalog without a proxy.
    Direct,
    /// Route through an HTTP(S) proxy, e.g. `http://10.0.0.1:8080`.
    Http(String),
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Http(url) => write!(f, "{}", url),
        }
    }
}

/// Supplier of proxy candidates.
///
/// Queried once per resolution. The order of the returned list is the order
/// in which candidates are tried.
pub trait ProxySource: Send + Sync {
    fn candidates(&self) -> CatalogResult<Vec<ProxyEndpoint>>;
}

/// Fixed list of proxies, optionally followed by a direct attempt.
#[derive(Debug, Clone, Default)]
pub struct StaticProxySource {
    servers: Vec<String>,
    allow_direct: bool,
}

impl StaticProxySource {
    /// Create a source from proxy URLs. Blank entries are dropped.
    pub fn new<I, S>(servers: I, allow_direct: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let servers = servers
            .into_iter()
            .map(Into::into)
            .map(|s: String| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            servers,
            allow_direct,
        }
    }

    /// A source that only ever connects directly.
    pub fn direct() -> Self {
        Self::new(Vec::<String>::new(), true)
    }
}

impl ProxySource for StaticProxySource {
    fn candidates(&self) -> CatalogResult<Vec<ProxyEndpoint>> {
        let mut candidates: Vec<ProxyEndpoint> = self
            .servers
            .iter()
            .cloned()
            .map(ProxyEndpoint::Http)
            .collect();
        if self.allow_direct {
            candidates.push(ProxyEndpoint::Direct);
        }
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source_order() {
        let source = StaticProxySource::new(["http://a:1", " ", "http://b:2"], true);
        let candidates = source.candidates().unwrap();
        assert_eq!(
            candidates,
            vec![
                ProxyEndpoint::Http("http://a:1".to_string()),
                ProxyEndpoint::Http("http://b:2".to_string()),
                ProxyEndpoint::Direct,
            ]
        );
    }

    #[test]
    fn test_static_source_without_direct() {
        let source = StaticProxySource::new(Vec::<String>::new(), false);
        assert!(source.candidates().unwrap().is_empty());
    }

    #[test]
    fn test_direct_source() {
        assert_eq!(
            StaticProxySource::direct().candidates().unwrap(),
            vec![ProxyEndpoint::Direct]
        );
        assert_eq!(ProxyEndpoint::Direct.to_string(), "direct");
    }
}
