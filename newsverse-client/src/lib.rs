//! NewsVerse Client - Session & Data Synchronization
//!
//! The client-side layer that keeps every UI surface's view of remote state
//! consistent: a typed remote gateway, fetchers wiring it into the keyed
//! cache, a mutation coordinator applying per-mutation reconciliation
//! policies, the tri-state session resolver, and the route gate.
//!
//! Data flows one way: UI actions invoke the [`MutationCoordinator`], which
//! calls the [`RemoteGateway`] and reconciles the outcome into the
//! [`KeyedCache`](newsverse_cache::KeyedCache); cache notifications let the
//! session resolver, route gates, and any other subscriber re-derive their
//! view synchronously, without re-querying the network.

pub mod config;
pub mod fetchers;
pub mod gateway;
pub mod mutation;
pub mod notice;
pub mod route;
pub mod session;
pub mod telemetry;

mod client;

pub use client::NewsverseClient;
pub use config::ClientConfig;
pub use gateway::{HttpGateway, LikeAck, MessageAck, OnboardingAck, RemoteGateway};
pub use mutation::{MutationCoordinator, MutationKind, ReconcilePolicy};
pub use notice::{ChannelNoticeSink, Notice, NoticeSink, Severity};
pub use route::{
    decide, login_redirect_url, settle_navigation, RouteDecision, RouteGate, NAVIGATION_SETTLE,
};
pub use session::SessionResolver;
