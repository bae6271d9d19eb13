// ── DNS record types ──

use std::fmt;

use serde::{Deserialize, Serialize};

/// DNS record type.
///
/// Parsing is case-insensitive; well-known types never land in `Other`.
/// Serialized as the upper-case type string (`"CNAME"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Txt,
    Mx,
    Srv,
    Other(String),
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Txt => "TXT",
            Self::Mx => "MX",
            Self::Srv => "SRV",
            Self::Other(s) => s.as_str(),
        }
    }

    /// A, AAAA and CNAME records can sit behind the Cloudflare proxy.
    pub fn is_proxy_eligible(&self) -> bool {
        matches!(self, Self::A | Self::Aaaa | Self::Cname)
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl From<&str> for RecordType {
    fn from(raw: &str) -> Self {
        let upper = raw.trim().to_ascii_uppercase();
        match upper.as_str() {
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            "CNAME" => Self::Cname,
            "TXT" => Self::Txt,
            "MX" => Self::Mx,
            "SRV" => Self::Srv,
            _ => Self::Other(upper),
        }
    }
}

impl From<String> for RecordType {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<RecordType> for String {
    fn from(t: RecordType) -> Self {
        match t {
            RecordType::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// A single DNS record, as declared locally or as held by the provider.
///
/// Identity is `(name, record_type)`. `ttl == 1` means "automatic".
/// Zero/false fields are omitted when written back to a records file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default = "empty_type")]
    pub record_type: RecordType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub proxiable: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub proxied: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub ttl: u32,
}

fn empty_type() -> RecordType {
    RecordType::Other(String::new())
}

impl DnsRecord {
    /// Bare record with automatic TTL and no proxying.
    pub fn new(
        record_type: impl Into<RecordType>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            record_type: record_type.into(),
            name: name.into(),
            content: content.into(),
            proxiable: false,
            proxied: false,
            ttl: 1,
        }
    }

    #[must_use]
    pub fn proxied(mut self, proxied: bool) -> Self {
        self.proxied = proxied;
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            name: self.name.clone(),
            record_type: self.record_type.clone(),
        }
    }

    /// Whether applying `desired` over `self` would change anything the
    /// reconciler tracks (content and proxy flag).
    pub fn differs_from(&self, desired: &DnsRecord) -> bool {
        self.content != desired.content || self.proxied != desired.proxied
    }
}

/// Reconciliation identity of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub name: String,
    pub record_type: RecordType,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.record_type, self.name)
    }
}

/// Who asked for a record. Documentation only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
}

impl Owner {
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.email.is_empty()
    }
}

/// One entry of a declared-records file: provenance plus the record.
///
/// Provenance fields are never sent to the provider nor compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repo: String,
    #[serde(default, skip_serializing_if = "Owner::is_empty")]
    pub owner: Owner,
    pub record: DnsRecord,
}

impl From<DnsRecord> for DeclaredRecord {
    fn from(record: DnsRecord) -> Self {
        Self {
            description: String::new(),
            repo: String::new(),
            owner: Owner::default(),
            record,
        }
    }
}
