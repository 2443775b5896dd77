use serde::Serialize;
use serde_json::Value;

use crate::backend::Document;

/// Storefront settings kept in the site-config collection.
///
/// Secret values stay server-side: they are read and held for the payment and
/// mail integrations but never serialized into API responses.
#[derive(Clone, Debug, Serialize)]
pub struct SiteConfig {
    pub site_name: String,
    pub paypal_client_id: Option<String>,
    pub stripe_publishable_key: Option<String>,
    #[serde(skip_serializing)]
    pub stripe_secret_key: Option<String>,
    pub telegram_username: Option<String>,
    pub video_list_title: String,
    pub crypto: Vec<String>,
    pub email_host: Option<String>,
    pub email_port: Option<u16>,
    pub email_secure: bool,
    pub email_user: Option<String>,
    #[serde(skip_serializing)]
    pub email_pass: Option<String>,
    pub email_from: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "VidShop".to_string(),
            paypal_client_id: None,
            stripe_publishable_key: None,
            stripe_secret_key: None,
            telegram_username: None,
            video_list_title: "Latest Videos".to_string(),
            crypto: Vec::new(),
            email_host: None,
            email_port: None,
            email_secure: false,
            email_user: None,
            email_pass: None,
            email_from: None,
        }
    }
}

impl SiteConfig {
    pub fn from_document(doc: &Document) -> Self {
        let data = &doc.data;
        let defaults = Self::default();

        Self {
            site_name: non_empty(data, "site_name").unwrap_or(defaults.site_name),
            paypal_client_id: non_empty(data, "paypal_client_id"),
            stripe_publishable_key: non_empty(data, "stripe_publishable_key"),
            stripe_secret_key: non_empty(data, "stripe_secret_key"),
            telegram_username: non_empty(data, "telegram_username"),
            video_list_title: non_empty(data, "video_list_title")
                .unwrap_or(defaults.video_list_title),
            crypto: data
                .get("crypto")
                .and_then(Value::as_array)
                .map(|addresses| {
                    addresses
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            email_host: non_empty(data, "email_host"),
            email_port: data
                .get("email_port")
                .and_then(Value::as_u64)
                .and_then(|port| u16::try_from(port).ok()),
            email_secure: data
                .get("email_secure")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            email_user: non_empty(data, "email_user"),
            email_pass: non_empty(data, "email_pass"),
            email_from: non_empty(data, "email_from"),
        }
    }
}

fn non_empty(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
