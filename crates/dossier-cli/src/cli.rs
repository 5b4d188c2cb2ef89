//! Command-line interface definition.

use clap::Parser;
use dossier_core::{AppConfig, Context, DossierError, Identifier};
use std::path::PathBuf;

/// Dossier: gather identity-linked information from public sources into one report
#[derive(Parser, Debug)]
#[command(name = "dossier")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Person name
    #[arg(long)]
    pub name: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Account handle
    #[arg(long)]
    pub username: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Domain name
    #[arg(long)]
    pub domain: Option<String>,

    /// Confirm you are authorized to investigate these identifiers
    #[arg(long)]
    pub consent: bool,

    /// HaveIBeenPwned API key (defaults to $HIBP_API_KEY)
    #[arg(long)]
    pub hibp_key: Option<String>,

    /// Comma-separated probes to run (default: all)
    #[arg(long, value_delimiter = ',')]
    pub modules: Vec<String>,

    /// Base name for the report files
    #[arg(long)]
    pub out: Option<String>,

    /// Also write an HTML report
    #[arg(long)]
    pub html: bool,

    /// Also write a PDF report (requires --html and wkhtmltopdf or weasyprint)
    #[arg(long)]
    pub pdf: bool,

    /// External command template ({domain}, {email}, {username}, {outbase})
    #[arg(long)]
    pub external_cmd: Option<String>,

    /// Directory for reports and tool artifacts
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Configuration file (default: the user config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the registered probes and exit
    #[arg(long)]
    pub list_modules: bool,

    /// Write the default configuration file and exit
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the run context from the flags, taking the API key from
    /// `config` when no flag was given.
    #[must_use]
    pub fn context(&self, config: &AppConfig) -> Context {
        let hibp_key = self
            .hibp_key
            .clone()
            .or_else(|| config.network.hibp_api_key.clone());

        Context::builder()
            .set(Identifier::Name, self.name.clone())
            .set(Identifier::Email, self.email.clone())
            .set(Identifier::Username, self.username.clone())
            .set(Identifier::Phone, self.phone.clone())
            .set(Identifier::Domain, self.domain.clone())
            .hibp_api_key(hibp_key)
            .external_cmd(self.external_cmd.clone())
            .build()
    }

    /// Refuse to run without consent or without any identifier.
    pub fn validate(&self, ctx: &Context) -> dossier_core::Result<()> {
        if !self.consent {
            return Err(DossierError::Validation(
                "consent required (--consent); do not run without permission".to_string(),
            ));
        }
        if !ctx.has_identifier() {
            return Err(DossierError::Validation(
                "at least one of --name, --email, --username, --phone, --domain is required"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Requested probe names, trimmed, with blanks dropped.
    #[must_use]
    pub fn selected_modules(&self) -> Vec<String> {
        self.modules
            .iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dossier").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn test_modules_are_split_and_trimmed() {
        let cli = parse(&["--modules", "domain_info, external_cli,,sherlock"]);
        assert_eq!(
            cli.selected_modules(),
            ["domain_info", "external_cli", "sherlock"]
        );
        assert!(parse(&[]).selected_modules().is_empty());
    }

    #[test]
    fn test_requires_consent() {
        let cli = parse(&["--domain", "example.org"]);
        let ctx = cli.context(&AppConfig::default());
        let err = cli.validate(&ctx).unwrap_err();
        assert!(err.to_string().contains("consent required"));
    }

    #[test]
    fn test_requires_an_identifier() {
        let cli = parse(&["--consent", "--email", "   "]);
        let ctx = cli.context(&AppConfig::default());
        let err = cli.validate(&ctx).unwrap_err();
        assert!(err.to_string().contains("at least one of"));
    }

    #[test]
    fn test_context_from_flags() {
        let cli = parse(&[
            "--consent",
            "--username",
            "jdoe",
            "--phone",
            "+1 (202) 555-0143",
            "--external-cmd",
            "echo {username}",
        ]);
        let mut config = AppConfig::default();
        config.network.hibp_api_key = Some("from-env".to_string());
        let ctx = cli.context(&config);

        cli.validate(&ctx).expect("valid request");
        assert_eq!(ctx.username(), Some("jdoe"));
        assert_eq!(ctx.config().external_cmd(), Some("echo {username}"));
        assert_eq!(ctx.config().hibp_api_key(), Some("from-env"));
        assert_eq!(
            ctx.phone_validation().and_then(|p| p.e164.as_deref()),
            Some("+12025550143")
        );
    }

    #[test]
    fn test_flag_key_wins_over_config() {
        let cli = parse(&["--email", "a@example.org", "--hibp-key", "flag"]);
        let mut config = AppConfig::default();
        config.network.hibp_api_key = Some("env".to_string());
        assert_eq!(cli.context(&config).config().hibp_api_key(), Some("flag"));
    }
}
