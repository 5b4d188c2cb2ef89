//! Registration of the built-in probes.

use crate::command::{CommandRunner, CommandTemplate};
use crate::error::Result;
use crate::probe::Probe;
use crate::probes::{
    breach, domain, external, sherlock, username, BreachProbe, DomainProbe, ExternalCommandProbe,
    SherlockProbe, UsernameProbe,
};
use crate::registry::ProbeRegistry;
use crate::sources::{
    default_sites, http_client, BreachSource, HibpClient, HickoryDns, HttpMetaClient,
    HttpMetaSource, HttpSiteChecker, SiteChecker, WhoisClient, WhoisSource,
};
use dossier_core::AppConfig;
use std::sync::Arc;

/// Names of the built-in probes, in registration order.
pub const BUILTIN_PROBES: [&str; 5] = [
    breach::NAME,
    username::NAME,
    domain::NAME,
    external::NAME,
    sherlock::NAME,
];

/// Build a registry holding every built-in probe, configured from `config`.
///
/// Network collaborators share one HTTP client. The DNS resolver is created
/// per run by the `domain_info` constructor, so a broken system resolver
/// configuration only fails that probe.
pub fn default_registry(config: &AppConfig) -> Result<ProbeRegistry> {
    let client = http_client(&config.network)?;
    let delay = config.network.delay();
    let network_timeout = config.network.timeout();
    let mut registry = ProbeRegistry::new();

    let hibp: Arc<dyn BreachSource> = Arc::new(HibpClient::new(
        client.clone(),
        config.network.hibp_base_url.clone(),
    ));
    registry.register(breach::NAME, move |_| {
        Ok(Box::new(BreachProbe::new(hibp.clone(), delay)) as Box<dyn Probe>)
    });

    let checker: Arc<dyn SiteChecker> = Arc::new(HttpSiteChecker::new(client.clone()));
    registry.register(username::NAME, move |_| {
        Ok(Box::new(UsernameProbe::new(checker.clone(), default_sites(), delay)) as Box<dyn Probe>)
    });

    let whois: Arc<dyn WhoisSource> = Arc::new(WhoisClient::new(network_timeout));
    let pages: Arc<dyn HttpMetaSource> = Arc::new(HttpMetaClient::new(client));
    registry.register(domain::NAME, move |_| {
        let dns = Arc::new(HickoryDns::new(network_timeout)?);
        Ok(Box::new(DomainProbe::new(whois.clone(), dns, pages.clone(), delay)) as Box<dyn Probe>)
    });

    let runner = CommandRunner::new(config.external.timeout());
    let output_dir = config.general.output_dir.clone();
    let default_template = CommandTemplate::new(config.external.default_template.clone());
    let external_runner = runner.clone();
    registry.register(external::NAME, move |_| {
        Ok(Box::new(ExternalCommandProbe::new(
            external_runner.clone(),
            output_dir.clone(),
            default_template.clone(),
            delay,
        )) as Box<dyn Probe>)
    });

    registry.register(sherlock::NAME, move |_| {
        Ok(Box::new(SherlockProbe::new(runner.clone(), delay)) as Box<dyn Probe>)
    });

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_order() {
        let registry = default_registry(&AppConfig::default()).expect("registry");
        assert_eq!(registry.names(), BUILTIN_PROBES);
    }
}
