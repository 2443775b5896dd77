//! Declared attribute sets for the collections this service provisions.
//!
//! Reconciliation diffs these against what the backend reports and creates
//! whatever is missing; existing attributes are never altered or removed.

use serde_json::{json, Value};

#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    String { size: u32, array: bool },
    Integer,
    Float,
    Boolean,
    Datetime,
}

impl FieldKind {
    /// Path segment of the backend's typed attribute-creation endpoint.
    /// String arrays go through the string endpoint with the array flag set.
    pub fn endpoint_segment(&self) -> &'static str {
        match self {
            FieldKind::String { .. } => "string",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::Datetime => "datetime",
        }
    }
}

const DEFAULT_STRING_SIZE: u32 = 2048;

#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub default: Option<Value>,
}

impl FieldSpec {
    fn new(key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            kind,
            required: false,
            min: None,
            max: None,
            default: None,
        }
    }

    pub fn string(key: &'static str) -> Self {
        Self::new(
            key,
            FieldKind::String {
                size: DEFAULT_STRING_SIZE,
                array: false,
            },
        )
    }

    pub fn integer(key: &'static str) -> Self {
        Self::new(key, FieldKind::Integer)
    }

    pub fn float(key: &'static str) -> Self {
        Self::new(key, FieldKind::Float)
    }

    pub fn boolean(key: &'static str) -> Self {
        Self::new(key, FieldKind::Boolean)
    }

    pub fn datetime(key: &'static str) -> Self {
        Self::new(key, FieldKind::Datetime)
    }

    pub fn size(mut self, size: u32) -> Self {
        if let FieldKind::String { size: s, .. } = &mut self.kind {
            *s = size;
        }
        self
    }

    pub fn array(mut self) -> Self {
        if let FieldKind::String { array, .. } = &mut self.kind {
            *array = true;
        }
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

pub fn video_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("title").required(),
        FieldSpec::string("description").size(8192),
        FieldSpec::float("price").required().min(0),
        FieldSpec::integer("duration").min(0),
        FieldSpec::string("video_file_id"),
        FieldSpec::string("thumbnail_file_id"),
        FieldSpec::datetime("created_at"),
        FieldSpec::boolean("is_active").default_value(json!(true)),
        FieldSpec::integer("views").min(0).default_value(json!(0)),
        FieldSpec::string("product_link"),
    ]
}

pub fn site_config_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("site_name").required(),
        FieldSpec::string("paypal_client_id"),
        FieldSpec::string("stripe_publishable_key"),
        FieldSpec::string("stripe_secret_key"),
        FieldSpec::string("telegram_username"),
        FieldSpec::string("video_list_title"),
        FieldSpec::string("crypto").array(),
        FieldSpec::string("email_host"),
        FieldSpec::integer("email_port"),
        FieldSpec::boolean("email_secure"),
        FieldSpec::string("email_user"),
        FieldSpec::string("email_pass"),
        FieldSpec::string("email_from"),
    ]
}

pub fn user_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("email").required(),
        FieldSpec::string("name").required(),
        FieldSpec::string("password").required(),
        FieldSpec::datetime("created_at"),
    ]
}

pub fn session_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("user_id").required(),
        FieldSpec::string("token").required(),
        FieldSpec::datetime("expires_at").required(),
        FieldSpec::datetime("created_at"),
        FieldSpec::string("ip_address"),
        FieldSpec::string("user_agent"),
    ]
}
