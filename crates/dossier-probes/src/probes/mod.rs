//! The built-in probes.
//!
//! Every probe holds its collaborators behind trait objects and a fixed
//! delay that it sleeps after each outbound call.

pub mod breach;
pub mod domain;
pub mod external;
pub mod sherlock;
pub mod username;

pub use breach::BreachProbe;
pub use domain::DomainProbe;
pub use external::ExternalCommandProbe;
pub use sherlock::SherlockProbe;
pub use username::UsernameProbe;

use std::time::Duration;

/// Sleep for the inter-call delay, if any.
pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
