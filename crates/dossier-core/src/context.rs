//! The immutable input bundle shared by every probe in a run.
//!
//! A [`Context`] is assembled once through [`ContextBuilder`] and handed to
//! probes by shared reference. It has no mutating methods, so nothing a probe
//! does can change what the next probe sees.

use crate::phone::PhoneValidation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The identifier fields a context can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identifier {
    /// Person name
    Name,
    /// Email address
    Email,
    /// Account handle
    Username,
    /// Phone number
    Phone,
    /// Domain name
    Domain,
}

impl Identifier {
    /// Every identifier, in the order they appear in reports.
    pub const ALL: [Identifier; 5] = [
        Identifier::Name,
        Identifier::Email,
        Identifier::Username,
        Identifier::Phone,
        Identifier::Domain,
    ];

    /// Field name as used in reports and on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Username => "username",
            Self::Phone => "phone",
            Self::Domain => "domain",
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probe options carried alongside the identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// API key for the breach-check collaborator. Never serialized.
    #[serde(skip_serializing, default)]
    hibp_api_key: Option<String>,
    /// Command template for the external-command probe
    external_cmd: Option<String>,
}

impl ProbeConfig {
    /// Breach API key, if one was supplied.
    #[must_use]
    pub fn hibp_api_key(&self) -> Option<&str> {
        self.hibp_api_key.as_deref()
    }

    /// External command template, if one was supplied.
    #[must_use]
    pub fn external_cmd(&self) -> Option<&str> {
        self.external_cmd.as_deref()
    }
}

/// Identifiers and configuration for one orchestration run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    name: Option<String>,
    email: Option<String>,
    username: Option<String>,
    phone: Option<String>,
    domain: Option<String>,
    config: ProbeConfig,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    phone_validation: Option<PhoneValidation>,
}

impl Context {
    /// Start building a context.
    #[must_use]
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// Value of an identifier field.
    #[must_use]
    pub fn get(&self, field: Identifier) -> Option<&str> {
        match field {
            Identifier::Name => self.name.as_deref(),
            Identifier::Email => self.email.as_deref(),
            Identifier::Username => self.username.as_deref(),
            Identifier::Phone => self.phone.as_deref(),
            Identifier::Domain => self.domain.as_deref(),
        }
    }

    /// Person name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Email address.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Account handle.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Phone number as supplied.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Domain name.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Probe options.
    #[must_use]
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Phone heuristics, present when a phone number was supplied.
    #[must_use]
    pub fn phone_validation(&self) -> Option<&PhoneValidation> {
        self.phone_validation.as_ref()
    }

    /// Whether at least one identifier field is set.
    #[must_use]
    pub fn has_identifier(&self) -> bool {
        Identifier::ALL.iter().any(|field| self.get(*field).is_some())
    }
}

/// Builder for [`Context`].
///
/// Blank values are treated as absent so that an empty flag does not count
/// as a supplied identifier.
#[derive(Debug, Default)]
pub struct ContextBuilder {
    inner: Context,
}

impl ContextBuilder {
    /// Set an identifier field, or clear it with `None`.
    #[must_use]
    pub fn set(mut self, field: Identifier, value: Option<String>) -> Self {
        let value = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        match field {
            Identifier::Name => self.inner.name = value,
            Identifier::Email => self.inner.email = value,
            Identifier::Username => self.inner.username = value,
            Identifier::Phone => self.inner.phone = value,
            Identifier::Domain => self.inner.domain = value,
        }
        self
    }

    /// Set the person name.
    #[must_use]
    pub fn name(self, value: impl Into<String>) -> Self {
        self.set(Identifier::Name, Some(value.into()))
    }

    /// Set the email address.
    #[must_use]
    pub fn email(self, value: impl Into<String>) -> Self {
        self.set(Identifier::Email, Some(value.into()))
    }

    /// Set the account handle.
    #[must_use]
    pub fn username(self, value: impl Into<String>) -> Self {
        self.set(Identifier::Username, Some(value.into()))
    }

    /// Set the phone number.
    #[must_use]
    pub fn phone(self, value: impl Into<String>) -> Self {
        self.set(Identifier::Phone, Some(value.into()))
    }

    /// Set the domain name.
    #[must_use]
    pub fn domain(self, value: impl Into<String>) -> Self {
        self.set(Identifier::Domain, Some(value.into()))
    }

    /// Set the breach API key.
    #[must_use]
    pub fn hibp_api_key(mut self, key: Option<String>) -> Self {
        self.inner.config.hibp_api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Set the external command template.
    #[must_use]
    pub fn external_cmd(mut self, template: Option<String>) -> Self {
        self.inner.config.external_cmd = template.filter(|t| !t.trim().is_empty());
        self
    }

    /// Finish the context, attaching phone heuristics when a phone is set.
    #[must_use]
    pub fn build(mut self) -> Context {
        self.inner.phone_validation = self.inner.phone.as_deref().map(PhoneValidation::check);
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let ctx = Context::builder()
            .name("Jane Doe")
            .email("jane@example.org")
            .username("jdoe")
            .domain("example.org")
            .external_cmd(Some("echo {domain}".to_string()))
            .build();

        assert_eq!(ctx.name(), Some("Jane Doe"));
        assert_eq!(ctx.email(), Some("jane@example.org"));
        assert_eq!(ctx.username(), Some("jdoe"));
        assert_eq!(ctx.domain(), Some("example.org"));
        assert_eq!(ctx.phone(), None);
        assert_eq!(ctx.config().external_cmd(), Some("echo {domain}"));
        assert!(ctx.phone_validation().is_none());
    }

    #[test]
    fn test_blank_values_are_absent() {
        let ctx = Context::builder()
            .email("   ")
            .set(Identifier::Domain, Some(String::new()))
            .hibp_api_key(Some(String::new()))
            .build();

        assert!(!ctx.has_identifier());
        assert!(ctx.config().hibp_api_key().is_none());
    }

    #[test]
    fn test_phone_attaches_validation() {
        let ctx = Context::builder().phone("+34 600 123 456").build();
        let validation = ctx.phone_validation().expect("phone validation");
        assert_eq!(validation.e164.as_deref(), Some("+34600123456"));
    }

    #[test]
    fn test_serialization_hides_api_key() {
        let ctx = Context::builder()
            .domain("example.org")
            .hibp_api_key(Some("super-secret".to_string()))
            .build();

        let json = serde_json::to_value(&ctx).expect("serialize context");
        assert_eq!(json["domain"], "example.org");
        assert!(json["email"].is_null());
        assert!(json["config"].get("hibp_api_key").is_none());
        assert!(!json.to_string().contains("super-secret"));
        assert!(json.get("phone_validation").is_none());
    }

    #[test]
    fn test_identifier_names() {
        let names: Vec<&str> = Identifier::ALL.iter().map(Identifier::as_str).collect();
        assert_eq!(names, ["name", "email", "username", "phone", "domain"]);
    }
}
