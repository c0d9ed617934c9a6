//! Application configuration management.

use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Serial number generation settings.
    #[serde(default)]
    pub serial_number: SerialNumberConfig,
    /// Currency documents are totaled in when they carry no explicit one.
    #[serde(default = "default_currency")]
    pub default_currency: Currency,
}

/// Serial number generation settings.
///
/// The format template is a mini-language over the letters
/// P (prefix), S (serie), M (month), Y (year), C (count).
/// Repeating a letter sets the width of that field.
///
/// Examples of formats:
/// - `PPYYCCCC` : IN220123 (default)
/// - `PPPYYCCCC` : INV220123
/// - `PPSSSS-YYCCCC` : INV0001-220123
/// - `SSSS-CCCC` : 0001-0123
/// - `YYCCCC` : 220123
#[derive(Debug, Clone, Deserialize)]
pub struct SerialNumberConfig {
    /// If true, a serial number is generated when a document is created.
    /// If false, the caller must set the serial number itself.
    #[serde(default = "default_auto_generate")]
    pub auto_generate: bool,
    /// Default format template, used when a type has no override.
    #[serde(default = "default_format")]
    pub format: String,
    /// Characters allowed to appear verbatim in a format template.
    /// Any other non-field character is a malformed format.
    #[serde(default = "default_literals")]
    pub literals: String,
    /// Per-type format template overrides.
    #[serde(default)]
    pub formats: FormatOverrides,
    /// Default serial number prefix for each document type.
    #[serde(default)]
    pub prefix: PrefixConfig,
}

impl Default for SerialNumberConfig {
    fn default() -> Self {
        Self {
            auto_generate: default_auto_generate(),
            format: default_format(),
            literals: default_literals(),
            formats: FormatOverrides::default(),
            prefix: PrefixConfig::default(),
        }
    }
}

/// Optional per-type format template overrides.
///
/// A type without an override falls back to the global format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatOverrides {
    /// Template override for invoices.
    pub invoice: Option<String>,
    /// Template override for quotes.
    pub quote: Option<String>,
    /// Template override for credit notes.
    pub credit: Option<String>,
    /// Template override for proforma invoices.
    pub proforma: Option<String>,
}

/// Default serial number prefix for each document type.
#[derive(Debug, Clone, Deserialize)]
pub struct PrefixConfig {
    /// Prefix for invoices.
    #[serde(default = "default_invoice_prefix")]
    pub invoice: String,
    /// Prefix for quotes.
    #[serde(default = "default_quote_prefix")]
    pub quote: String,
    /// Prefix for credit notes.
    #[serde(default = "default_credit_prefix")]
    pub credit: String,
    /// Prefix for proforma invoices.
    #[serde(default = "default_proforma_prefix")]
    pub proforma: String,
}

impl Default for PrefixConfig {
    fn default() -> Self {
        Self {
            invoice: default_invoice_prefix(),
            quote: default_quote_prefix(),
            credit: default_credit_prefix(),
            proforma: default_proforma_prefix(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            serial_number: SerialNumberConfig::default(),
            default_currency: default_currency(),
        }
    }
}

fn default_currency() -> Currency {
    Currency::Usd
}

fn default_auto_generate() -> bool {
    true
}

fn default_format() -> String {
    "PPYYCCCC".to_string()
}

fn default_literals() -> String {
    "-".to_string()
}

fn default_invoice_prefix() -> String {
    "IN".to_string()
}

fn default_quote_prefix() -> String {
    "QO".to_string()
}

fn default_credit_prefix() -> String {
    "CR".to_string()
}

fn default_proforma_prefix() -> String {
    "PF".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FACTO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
