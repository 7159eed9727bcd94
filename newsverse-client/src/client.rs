//! Client assembly.

use std::sync::Arc;

use newsverse_cache::KeyedCache;
use newsverse_core::GatewayResult;
use tokio::sync::mpsc;

use crate::config::ClientConfig;
use crate::fetchers::register_fetchers;
use crate::gateway::{HttpGateway, RemoteGateway};
use crate::mutation::MutationCoordinator;
use crate::notice::{ChannelNoticeSink, Notice};
use crate::session::SessionResolver;

/// The assembled client: one cache, one session resolver, one mutation
/// coordinator, all sharing a single gateway.
///
/// Construct once per process and hand clones of the parts to the UI
/// surfaces that need them.
pub struct NewsverseClient {
    pub config: ClientConfig,
    pub cache: KeyedCache,
    pub session: SessionResolver,
    pub mutations: MutationCoordinator,
    /// Drain this into the UI's toast/banner mechanism.
    pub notices: mpsc::UnboundedReceiver<Notice>,
}

impl NewsverseClient {
    /// Build against a live backend per `config`.
    pub fn new(config: ClientConfig) -> GatewayResult<Self> {
        let gateway: Arc<dyn RemoteGateway> = Arc::new(HttpGateway::new(&config)?);
        Ok(Self::with_gateway(config, gateway))
    }

    /// Build with a caller-supplied gateway. Production code goes through
    /// [`NewsverseClient::new`]; tests and embeddings with bespoke
    /// transports use this.
    pub fn with_gateway(config: ClientConfig, gateway: Arc<dyn RemoteGateway>) -> Self {
        let cache = KeyedCache::new();
        register_fetchers(&cache, &gateway);

        let session = SessionResolver::new(cache.clone(), Arc::clone(&gateway));
        let (sink, notices) = ChannelNoticeSink::new();
        let mutations = MutationCoordinator::new(gateway, cache.clone(), sink);

        NewsverseClient {
            config,
            cache,
            session,
            mutations,
            notices,
        }
    }
}
