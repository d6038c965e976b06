//! Application context - dependency injection container

use std::fs;
use std::sync::Arc;

use tracing::{debug, info};
use vpnrest_core::{
    AddressCacheStore, AuthorizationProvider, RestContext, TokenCache, Transport,
    TransportRegistry, TransportStrategy, TransportSwitcher,
};
use vpnrest_domain::{RestConfig, RestError, Result};
use vpnrest_infra::{
    config, AccountsProxy, ApiProxy, AuthenticationProxy, DevicesProxy, EndpointCache,
    FileFailureCounter, HttpTransport, ShadowsocksConfigCache,
};

const USER_AGENT: &str = concat!("vpnrest/", env!("CARGO_PKG_VERSION"));

/// Application context - holds all services and dependencies
///
/// One instance per process. Everything that is shared between requests
/// (caches, transport selection, token cache) lives here and is handed to
/// the proxies explicitly.
pub struct AppContext {
    pub config: RestConfig,

    // Shared state
    pub address_cache: Arc<EndpointCache>,
    pub shadowsocks_cache: Arc<ShadowsocksConfigCache>,
    pub transport_strategy: Arc<TransportStrategy>,
    pub registry: Arc<TransportRegistry>,
    pub token_cache: Arc<TokenCache>,

    // API proxies
    pub api: ApiProxy,
    pub accounts: AccountsProxy,
    pub devices: DevicesProxy,
    pub auth: AuthenticationProxy,
}

impl AppContext {
    /// Create a new application context from files and environment
    pub fn new() -> Result<Self> {
        let config = config::load().map_err(|err| RestError::Internal(err.to_string()))?;
        Self::new_with_config(config)
    }

    /// Create a new application context with custom configuration
    ///
    /// Tests use this to point the caches at a temporary directory and the
    /// API at a mock server.
    pub fn new_with_config(config: RestConfig) -> Result<Self> {
        let cache_dir = &config.cache.directory;
        let read_only = config.cache.read_only;

        if !read_only {
            fs::create_dir_all(cache_dir).map_err(|err| {
                RestError::Internal(format!(
                    "failed to create cache directory {}: {}",
                    cache_dir.display(),
                    err
                ))
            })?;
        }

        // Cross-process caches
        let address_cache =
            Arc::new(EndpointCache::new(cache_dir, config.api.default_endpoint, read_only));
        let shadowsocks_cache = Arc::new(ShadowsocksConfigCache::new(cache_dir, read_only));
        let transport_strategy =
            Arc::new(TransportStrategy::new(Arc::new(FileFailureCounter::new(cache_dir, read_only))));

        // Transports
        let direct: Arc<dyn Transport> =
            Arc::new(HttpTransport::direct().user_agent(USER_AGENT).build());
        let obfuscated = config.obfuscation.proxy_address.map(|address| {
            info!(%address, "context.obfuscation_enabled");
            Arc::new(HttpTransport::obfuscated(address).user_agent(USER_AGENT).build())
                as Arc<dyn Transport>
        });
        let switcher = TransportSwitcher::new(direct, obfuscated, transport_strategy.clone());
        let registry = Arc::new(TransportRegistry::with_transport(Arc::new(switcher)));

        // Requests without authorization, including token requests themselves
        let address_store: Arc<dyn AddressCacheStore> = address_cache.clone();
        let base = RestContext::new(registry.clone(), address_store);

        let auth = AuthenticationProxy::new(base.clone(), &config.api);
        let token_cache = Arc::new(TokenCache::new(Arc::new(auth.clone())));
        let authorization: Arc<dyn AuthorizationProvider> = token_cache.clone();
        let authorized = base.with_authorization(authorization);

        let api = ApiProxy::new(authorized.clone(), &config.api);
        let accounts = AccountsProxy::new(authorized.clone(), &config.api);
        let devices = DevicesProxy::new(authorized, &config.api);

        debug!(
            cache_dir = %cache_dir.display(),
            read_only,
            endpoint = %address_cache.current_endpoint(),
            "context.initialized"
        );

        Ok(Self {
            config,
            address_cache,
            shadowsocks_cache,
            transport_strategy,
            registry,
            token_cache,
            api,
            accounts,
            devices,
            auth,
        })
    }

    /// Forget every cached access token
    pub fn logout(&self) {
        self.token_cache.invalidate_all();
        info!("context.logged_out");
    }
}
