use std::net::SocketAddr;

/// Path of the calculator page a short link forwards to
pub const CALCULATOR_PATH: &str = "/budget";

/// Query parameter carrying the encoded state
pub const STATE_QUERY_PARAM: &str = "s";

/// HTTP service configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub listen_addr: SocketAddr,

    /// Fixed public base URL for generated links (e.g. `https://example.com`)
    pub public_base_url: Option<String>,

    /// Hosts trusted to build links from the `Host` header
    pub allowed_domains: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            public_base_url: None,
            allowed_domains: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Self::default()
        }
    }

    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn with_allowed_domain(mut self, domain: impl Into<String>) -> Self {
        self.allowed_domains.push(domain.into());
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.public_base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("public base URL must be http(s): {}", url));
            }
        }

        if self.allowed_domains.iter().any(|d| d.trim().is_empty()) {
            return Err("allowed domains must not be empty".to_string());
        }

        Ok(())
    }

    /// Base URL that short links are built on.
    ///
    /// Prefers the configured public URL, then a `Host` on the allow-list
    /// (https unless forwarded otherwise), then the request's own origin,
    /// then the listen address.
    pub fn base_url(&self, host: Option<&str>, forwarded_proto: Option<&str>) -> String {
        if let Some(url) = &self.public_base_url {
            return url.clone();
        }

        match host.filter(|h| !h.is_empty()) {
            Some(host) if self.allowed_domains.iter().any(|d| host.contains(d.as_str())) => {
                format!("{}://{}", forwarded_proto.unwrap_or("https"), host)
            }
            Some(host) => format!("{}://{}", forwarded_proto.unwrap_or("http"), host),
            None => format!("http://{}", self.listen_addr),
        }
    }
}
