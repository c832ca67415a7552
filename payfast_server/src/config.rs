use std::{env, fmt::Display, str::FromStr, time::Duration};

use log::*;
use payfast_engine::{
    checkout_objects::{notify_url, MerchantConfig},
    trust::{AmountMatchPolicy, PostbackFailurePolicy, TrustConfig, TrustedOrigins},
};
use pfg_common::{helpers::parse_boolean_flag, Amount, Secret};

use crate::errors::ServerError;

const DEFAULT_PFG_HOST: &str = "127.0.0.1";
const DEFAULT_PFG_PORT: u16 = 8000;
const DEFAULT_POSTBACK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The merchant account. In sandbox mode this always holds the public test credentials.
    pub merchant: MerchantConfig,
    /// The public base URL of this site. The notify URL handed to the gateway is derived from it.
    pub url_base: String,
    /// How inbound notifications are vetted
    pub trust: TrustConfig,
    /// The longest we wait for the gateway to answer a postback
    pub postback_timeout: Duration,
    /// Where the client IP of a notification is read from
    pub ip_source: IpSource,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let merchant = MerchantConfig::sandbox();
        let trust = TrustConfig::new(merchant.merchant_id.clone());
        Self {
            host: DEFAULT_PFG_HOST.to_string(),
            port: DEFAULT_PFG_PORT,
            database_url: String::default(),
            merchant,
            url_base: format!("http://{DEFAULT_PFG_HOST}:{DEFAULT_PFG_PORT}"),
            trust,
            postback_timeout: DEFAULT_POSTBACK_TIMEOUT,
            ip_source: IpSource::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("PFG_HOST").ok().unwrap_or_else(|| DEFAULT_PFG_HOST.into());
        let port = env::var("PFG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for PFG_PORT. {e} Using the default, {DEFAULT_PFG_PORT}, instead."
                    );
                    DEFAULT_PFG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_PFG_PORT);
        let database_url = env::var("PFG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ PFG_DATABASE_URL is not set. Please set it to the URL for the PFG database.");
            String::default()
        });
        let merchant = configure_merchant();
        let url_base = env::var("PFG_URL_BASE").ok().unwrap_or_else(|| {
            let url_base = format!("http://{host}:{port}");
            warn!("🪛️ PFG_URL_BASE is not set. The gateway will be told to send notifications to {url_base}");
            url_base
        });
        let trust = configure_trust(&merchant);
        let postback_timeout = env::var("PFG_POSTBACK_TIMEOUT")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| warn!("🪛️ Invalid configuration value for PFG_POSTBACK_TIMEOUT. {e}"))
                    .ok()
            })
            .unwrap_or(DEFAULT_POSTBACK_TIMEOUT);
        let ip_source = env::var("PFG_IP_SOURCE").map(|s| IpSource::from(s.as_str())).unwrap_or_default();
        info!("🪛️ Client IPs of notifications are read from {ip_source}");
        Self { host, port, database_url, merchant, url_base, trust, postback_timeout, ip_source }
    }

    /// The absolute URL that the gateway posts notifications to
    pub fn notify_url(&self) -> Result<String, ServerError> {
        notify_url(&self.url_base)
            .map_err(|e| ServerError::ConfigurationError(format!("Invalid public base URL in PFG_URL_BASE. {e}")))
    }
}

fn configure_merchant() -> MerchantConfig {
    let sandbox = parse_boolean_flag(env::var("PFG_SANDBOX").ok(), false);
    if sandbox {
        warn!("🪛️ Sandbox mode is on. The public test merchant account is used and no real payments are taken.");
        return MerchantConfig::sandbox();
    }
    let merchant_id = env::var("PFG_MERCHANT_ID").ok().unwrap_or_else(|| {
        error!("🪛️ PFG_MERCHANT_ID is not set. Please set it to the merchant id of your PayFast account.");
        String::default()
    });
    let merchant_key = env::var("PFG_MERCHANT_KEY").ok().unwrap_or_else(|| {
        error!("🪛️ PFG_MERCHANT_KEY is not set. Please set it to the merchant key of your PayFast account.");
        String::default()
    });
    MerchantConfig::live(merchant_id, Secret::new(merchant_key))
}

fn configure_trust(merchant: &MerchantConfig) -> TrustConfig {
    let trusted_origins = match env::var("PFG_IP_WHITELIST") {
        Ok(s) => s.parse::<TrustedOrigins>().unwrap_or_else(|e| {
            error!("🪛️ PFG_IP_WHITELIST could not be read. {e}. Only the gateway's published servers are trusted.");
            TrustedOrigins::default()
        }),
        Err(_) => TrustedOrigins::default(),
    };
    if trusted_origins.ranges().is_empty() {
        warn!("🚨️ The notification IP whitelist is empty. Every notification will be rejected.");
    } else {
        info!("🪛️ Notifications are accepted from {trusted_origins}");
    }
    let amount_policy = configure_amount_policy();
    let use_postback = parse_boolean_flag(env::var("PFG_USE_POSTBACK").ok(), true);
    if !use_postback {
        warn!("🚨️ Postback confirmation is disabled. Notifications are trusted on their signature and origin alone.");
    }
    let postback_failure = env::var("PFG_POSTBACK_FAILURE")
        .ok()
        .and_then(|s| {
            s.parse::<PostbackFailurePolicy>()
                .map_err(|e| warn!("🪛️ Invalid configuration value for PFG_POSTBACK_FAILURE. {e}"))
                .ok()
        })
        .unwrap_or_default();
    TrustConfig::new(merchant.merchant_id.clone())
        .with_trusted_origins(trusted_origins)
        .with_amount_policy(amount_policy)
        .with_postback(use_postback)
        .with_postback_failure(postback_failure)
}

fn configure_amount_policy() -> AmountMatchPolicy {
    if !parse_boolean_flag(env::var("PFG_REQUIRE_AMOUNT_MATCH").ok(), true) {
        warn!("🚨️ Amount checks are disabled. The paid amount of a notification is not compared with its order.");
        return AmountMatchPolicy::Disabled;
    }
    match env::var("PFG_AMOUNT_TOLERANCE").map(|s| s.parse::<Amount>()) {
        Ok(Ok(tolerance)) => {
            info!("🪛️ Paid amounts may differ from the order amount by up to {tolerance}");
            AmountMatchPolicy::Tolerance(tolerance)
        },
        Ok(Err(e)) => {
            warn!("🪛️ Invalid configuration value for PFG_AMOUNT_TOLERANCE. {e}. Amounts must match exactly.");
            AmountMatchPolicy::Exact
        },
        Err(_) => AmountMatchPolicy::Exact,
    }
}

//-------------------------------------------------  IpSource  ---------------------------------------------------------
/// The request attribute that holds the client IP.
///
/// Behind a reverse proxy the connection peer is the proxy itself, so a header set by the proxy must be used instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum IpSource {
    /// The connection's peer address
    #[default]
    RemoteAddr,
    /// The first address in `X-Forwarded-For`
    XForwardedFor,
    /// The `for=` parameter of the `Forwarded` header
    Forwarded,
    /// Any other header that holds a bare IP address
    Header(String),
}

impl From<&str> for IpSource {
    fn from(value: &str) -> Self {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "" | "remote_addr" => Self::RemoteAddr,
            "x-forwarded-for" | "http_x_forwarded_for" => Self::XForwardedFor,
            "forwarded" | "http_forwarded" => Self::Forwarded,
            _ => Self::Header(value.to_string()),
        }
    }
}

impl FromStr for IpSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl Display for IpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RemoteAddr => write!(f, "the connection peer address"),
            Self::XForwardedFor => write!(f, "the X-Forwarded-For header"),
            Self::Forwarded => write!(f, "the Forwarded header"),
            Self::Header(name) => write!(f, "the {name} header"),
        }
    }
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// A subset of the server configuration that is used to configure the server's behaviour. Generally we try to keep this
/// as small as possible, and exclude secrets to avoid passing sensitive information around the system.
#[derive(Clone, Debug, Default)]
pub struct ServerOptions {
    pub ip_source: IpSource,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { ip_source: config.ip_source.clone() }
    }
}
