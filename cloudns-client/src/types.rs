use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ClouDnsError, Result};
use crate::params::{ParamValue, Params};

// ============ DNS Record Types ============

/// DNS record type, including the ClouDNS-specific `WR` and `ALIAS`.
///
/// Serialized as the uppercase wire name (`"A"`, `"AAAA"`, `"SSHFP"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Ns,
    Ptr,
    Srv,
    Spf,
    Caa,
    Sshfp,
    Tlsa,
    Naptr,
    Rp,
    Cert,
    Openpgpkey,
    Hinfo,
    Smimea,
    Dname,
    Loc,
    /// Web redirect.
    Wr,
    /// CNAME-like record usable at the zone apex.
    Alias,
}

impl RecordType {
    pub const ALL: [Self; 22] = [
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Mx,
        Self::Txt,
        Self::Ns,
        Self::Ptr,
        Self::Srv,
        Self::Spf,
        Self::Caa,
        Self::Sshfp,
        Self::Tlsa,
        Self::Naptr,
        Self::Rp,
        Self::Cert,
        Self::Openpgpkey,
        Self::Hinfo,
        Self::Smimea,
        Self::Dname,
        Self::Loc,
        Self::Wr,
        Self::Alias,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Ptr => "PTR",
            Self::Srv => "SRV",
            Self::Spf => "SPF",
            Self::Caa => "CAA",
            Self::Sshfp => "SSHFP",
            Self::Tlsa => "TLSA",
            Self::Naptr => "NAPTR",
            Self::Rp => "RP",
            Self::Cert => "CERT",
            Self::Openpgpkey => "OPENPGPKEY",
            Self::Hinfo => "HINFO",
            Self::Smimea => "SMIMEA",
            Self::Dname => "DNAME",
            Self::Loc => "LOC",
            Self::Wr => "WR",
            Self::Alias => "ALIAS",
        }
    }

    pub fn requires_priority(self) -> bool {
        matches!(self, Self::Mx | Self::Srv)
    }

    pub fn requires_port(self) -> bool {
        self == Self::Srv
    }

    pub fn requires_weight(self) -> bool {
        self == Self::Srv
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::A => "IPv4 address",
            Self::Aaaa => "IPv6 address",
            Self::Cname => "Canonical name",
            Self::Mx => "Mail exchange",
            Self::Txt => "Text record",
            Self::Ns => "Name server",
            Self::Ptr => "Pointer record",
            Self::Srv => "Service record",
            Self::Spf => "Sender Policy Framework",
            Self::Caa => "Certificate Authority Authorization",
            Self::Sshfp => "SSH fingerprint",
            Self::Tlsa => "TLS authentication",
            Self::Naptr => "Naming Authority Pointer",
            Self::Rp => "Responsible Person",
            Self::Cert => "Certificate record",
            Self::Openpgpkey => "OpenPGP key",
            Self::Hinfo => "Host information",
            Self::Smimea => "S/MIME association",
            Self::Dname => "Delegation name",
            Self::Loc => "Location information",
            Self::Wr => "Web Redirect",
            Self::Alias => "Similar to CNAME but for root domain",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = ClouDnsError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| ClouDnsError::validation(format!("Unknown record type: {s}")))
    }
}

impl From<RecordType> for ParamValue {
    fn from(v: RecordType) -> Self {
        Self::Str(v.as_str().to_string())
    }
}

// ============ Zone Types ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    Master,
    Slave,
    Parked,
    Geodns,
    Reverse,
}

impl ZoneType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Slave => "slave",
            Self::Parked => "parked",
            Self::Geodns => "geodns",
            Self::Reverse => "reverse",
        }
    }

    /// Only slave zones pull from a master server.
    pub fn requires_master_ip(self) -> bool {
        self == Self::Slave
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Master => "Master DNS zone",
            Self::Slave => "Slave DNS zone",
            Self::Parked => "Parked domain",
            Self::Geodns => "GeoDNS zone",
            Self::Reverse => "Reverse DNS zone",
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoneType {
    type Err = ClouDnsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "master" => Ok(Self::Master),
            "slave" => Ok(Self::Slave),
            "parked" => Ok(Self::Parked),
            "geodns" => Ok(Self::Geodns),
            "reverse" => Ok(Self::Reverse),
            _ => Err(ClouDnsError::validation(format!("Unknown zone type: {s}"))),
        }
    }
}

impl From<ZoneType> for ParamValue {
    fn from(v: ZoneType) -> Self {
        Self::Str(v.as_str().to_string())
    }
}

// ============ TTL ============

/// TTL values accepted by ClouDNS, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Ttl {
    Minute1 = 60,
    Minutes5 = 300,
    Minutes15 = 900,
    Minutes30 = 1800,
    #[default]
    Hour1 = 3600,
    Hours6 = 21600,
    Hours12 = 43200,
    Day1 = 86400,
    Days2 = 172_800,
    Days3 = 259_200,
    Week1 = 604_800,
    Weeks2 = 1_209_600,
    Month1 = 2_592_000,
}

impl Ttl {
    pub const ALL: [Self; 13] = [
        Self::Minute1,
        Self::Minutes5,
        Self::Minutes15,
        Self::Minutes30,
        Self::Hour1,
        Self::Hours6,
        Self::Hours12,
        Self::Day1,
        Self::Days2,
        Self::Days3,
        Self::Week1,
        Self::Weeks2,
        Self::Month1,
    ];

    pub fn seconds(self) -> u32 {
        self as u32
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Minute1 => "1 minute",
            Self::Minutes5 => "5 minutes",
            Self::Minutes15 => "15 minutes",
            Self::Minutes30 => "30 minutes",
            Self::Hour1 => "1 hour",
            Self::Hours6 => "6 hours",
            Self::Hours12 => "12 hours",
            Self::Day1 => "1 day",
            Self::Days2 => "2 days",
            Self::Days3 => "3 days",
            Self::Week1 => "1 week",
            Self::Weeks2 => "2 weeks",
            Self::Month1 => "1 month",
        }
    }

    pub fn is_valid(seconds: u32) -> bool {
        Self::ALL.iter().any(|t| t.seconds() == seconds)
    }

    fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|t| t.seconds().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl TryFrom<u32> for Ttl {
    type Error = ClouDnsError;

    fn try_from(seconds: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.seconds() == seconds)
            .ok_or_else(|| {
                ClouDnsError::validation(format!(
                    "Invalid TTL value. Allowed values: {}",
                    Self::allowed_list()
                ))
            })
    }
}

impl From<Ttl> for u32 {
    fn from(v: Ttl) -> Self {
        v.seconds()
    }
}

impl From<Ttl> for ParamValue {
    fn from(v: Ttl) -> Self {
        Self::Int(i64::from(v.seconds()))
    }
}

// ============ Pagination ============

/// Page sizes accepted by the list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RowsPerPage {
    Ten = 10,
    Twenty = 20,
    #[default]
    Thirty = 30,
    Fifty = 50,
    Hundred = 100,
}

impl RowsPerPage {
    pub const ALL: [Self; 5] = [
        Self::Ten,
        Self::Twenty,
        Self::Thirty,
        Self::Fifty,
        Self::Hundred,
    ];

    pub fn rows(self) -> u32 {
        self as u32
    }

    pub fn is_valid(rows: u32) -> bool {
        Self::ALL.iter().any(|r| r.rows() == rows)
    }
}

impl TryFrom<u32> for RowsPerPage {
    type Error = ClouDnsError;

    fn try_from(rows: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.rows() == rows)
            .ok_or_else(|| {
                ClouDnsError::validation(format!(
                    "Invalid rows per page: {rows}. Allowed values: 10, 20, 30, 50, 100"
                ))
            })
    }
}

impl From<RowsPerPage> for u32 {
    fn from(v: RowsPerPage) -> Self {
        v.rows()
    }
}

impl From<RowsPerPage> for ParamValue {
    fn from(v: RowsPerPage) -> Self {
        Self::Int(i64::from(v.rows()))
    }
}

// ============ Zone Requests ============

static HOSTNAME_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]{0,62}(\.[a-zA-Z0-9][a-zA-Z0-9-]{0,62})*$").ok()
});

fn is_hostname(s: &str) -> bool {
    HOSTNAME_RE.as_ref().is_some_and(|re| re.is_match(s))
}

/// Parameters for registering a new zone (`dns/register`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateZoneRequest {
    /// Zone name, e.g. `example.com`
    pub domain_name: String,
    pub zone_type: ZoneType,
    /// Primary server to transfer from. Required for slave zones.
    pub master_ip: Option<String>,
    /// Nameserver hostnames sent as `ns[]`. Empty uses the account defaults.
    pub nameservers: Vec<String>,
}

impl CreateZoneRequest {
    pub fn new(domain_name: impl Into<String>, zone_type: ZoneType) -> Self {
        Self {
            domain_name: domain_name.into(),
            zone_type,
            master_ip: None,
            nameservers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_master_ip(mut self, ip: impl Into<String>) -> Self {
        self.master_ip = Some(ip.into());
        self
    }

    #[must_use]
    pub fn with_nameservers<I, S>(mut self, nameservers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nameservers = nameservers.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.domain_name.is_empty() {
            return Err(ClouDnsError::validation("Domain name is required"));
        }

        let master_ip = self.master_ip.as_deref().filter(|ip| !ip.is_empty());
        if self.zone_type.requires_master_ip() && master_ip.is_none() {
            return Err(ClouDnsError::validation(format!(
                "Zone type {} requires master IP",
                self.zone_type
            )));
        }
        if let Some(ip) = master_ip
            && ip.parse::<IpAddr>().is_err()
        {
            return Err(ClouDnsError::validation("Invalid master IP address"));
        }

        if let Some(ns) = self.nameservers.iter().find(|ns| !is_hostname(ns)) {
            return Err(ClouDnsError::validation(format!("Invalid nameserver: {ns}")));
        }
        Ok(())
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new()
            .with("domain-name", &self.domain_name)
            .with("zone-type", self.zone_type)
            .with_opt("master-ip", self.master_ip.as_ref());
        if !self.nameservers.is_empty() {
            params.insert("ns", self.nameservers.clone());
        }
        params
    }
}

// ============ Record Requests ============

/// Web redirect (`WR`) options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebRedirect {
    /// Serve the target inside a frame instead of redirecting (`1` / `0`).
    pub frame: Option<String>,
    /// Page title shown for a framed redirect.
    pub frame_title: Option<String>,
    /// Meta keywords for a framed redirect.
    pub frame_keywords: Option<String>,
    /// Meta description for a framed redirect.
    pub frame_description: Option<String>,
    /// Append the requested path to the target URL.
    pub save_path: Option<bool>,
    /// 301 or 302.
    pub redirect_type: Option<u16>,
}

/// CAA record parts, sent as `<flag> <tag> <value>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaaValue {
    /// `0`, or `128` for critical.
    pub flag: String,
    /// `issue`, `issuewild` or `iodef`.
    pub tag: String,
    /// Issuer domain or reporting URL.
    pub value: String,
}

/// SSHFP record parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshfpValue {
    /// Key algorithm (1 RSA, 2 DSA, 3 ECDSA, 4 Ed25519).
    pub algorithm: u8,
    /// Fingerprint hash (1 SHA-1, 2 SHA-256).
    pub fp_type: u8,
    /// Hex-encoded fingerprint.
    pub fingerprint: String,
}

/// TLSA record parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsaValue {
    /// Certificate usage (0-3).
    pub usage: u8,
    /// 0 full certificate, 1 public key.
    pub selector: u8,
    /// 0 exact match, 1 SHA-256, 2 SHA-512.
    pub matching_type: u8,
    /// Certificate association data, hex-encoded.
    pub certificate: String,
}

/// Parameters for adding a record (`dns/add-record`).
///
/// For CAA, SSHFP and TLSA the record value is composed from the typed parts
/// and `record` is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRecordRequest {
    /// Zone the record belongs to
    pub domain_name: String,
    pub record_type: RecordType,
    /// Host label relative to the zone. Empty for the apex.
    pub host: String,
    /// Record value (address, target, text...)
    pub record: String,
    /// Seconds; must be one of [`Ttl::ALL`].
    pub ttl: u32,
    /// MX and SRV only
    pub priority: Option<u16>,
    /// SRV only
    pub weight: Option<u16>,
    /// SRV only
    pub port: Option<u16>,
    /// Options for `WR` records
    pub web_redirect: Option<WebRedirect>,
    /// GeoDNS location code for records in GeoDNS zones
    pub geodns_location: Option<String>,
    pub caa: Option<CaaValue>,
    pub sshfp: Option<SshfpValue>,
    pub tlsa: Option<TlsaValue>,
}

impl CreateRecordRequest {
    pub fn new(
        domain_name: impl Into<String>,
        record_type: RecordType,
        host: impl Into<String>,
        record: impl Into<String>,
    ) -> Self {
        Self {
            domain_name: domain_name.into(),
            record_type,
            host: host.into(),
            record: record.into(),
            ttl: Ttl::default().seconds(),
            priority: None,
            weight: None,
            port: None,
            web_redirect: None,
            geodns_location: None,
            caa: None,
            sshfp: None,
            tlsa: None,
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: impl Into<u32>) -> Self {
        self.ttl = ttl.into();
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn with_web_redirect(mut self, web_redirect: WebRedirect) -> Self {
        self.web_redirect = Some(web_redirect);
        self
    }

    #[must_use]
    pub fn with_geodns_location(mut self, location: impl Into<String>) -> Self {
        self.geodns_location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_caa(mut self, caa: CaaValue) -> Self {
        self.caa = Some(caa);
        self
    }

    #[must_use]
    pub fn with_sshfp(mut self, sshfp: SshfpValue) -> Self {
        self.sshfp = Some(sshfp);
        self
    }

    #[must_use]
    pub fn with_tlsa(mut self, tlsa: TlsaValue) -> Self {
        self.tlsa = Some(tlsa);
        self
    }

    pub fn validate(&self) -> Result<()> {
        Ttl::try_from(self.ttl)?;

        let rt = self.record_type;
        if rt.requires_priority() && self.priority.is_none() {
            return Err(ClouDnsError::validation(format!("Record type {rt} requires priority")));
        }
        if rt.requires_port() && self.port.is_none() {
            return Err(ClouDnsError::validation(format!("Record type {rt} requires port")));
        }
        if rt.requires_weight() && self.weight.is_none() {
            return Err(ClouDnsError::validation(format!("Record type {rt} requires weight")));
        }

        match rt {
            RecordType::Caa if self.caa.is_none() => Err(ClouDnsError::validation(
                "CAA record requires flag, tag, and value",
            )),
            RecordType::Sshfp if self.sshfp.is_none() => Err(ClouDnsError::validation(
                "SSHFP record requires algorithm, fingerprint type, and fingerprint",
            )),
            RecordType::Tlsa if self.tlsa.is_none() => Err(ClouDnsError::validation(
                "TLSA record requires usage, selector, matching type, and certificate",
            )),
            _ => Ok(()),
        }
    }

    /// Value sent as `record`.
    pub fn record_value(&self) -> String {
        match (self.record_type, &self.caa, &self.sshfp, &self.tlsa) {
            (RecordType::Caa, Some(caa), _, _) => {
                format!("{} {} {}", caa.flag, caa.tag, caa.value)
            }
            (RecordType::Sshfp, _, Some(s), _) => {
                format!("{} {} {}", s.algorithm, s.fp_type, s.fingerprint)
            }
            (RecordType::Tlsa, _, _, Some(t)) => format!(
                "{} {} {} {}",
                t.usage, t.selector, t.matching_type, t.certificate
            ),
            _ => self.record.clone(),
        }
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new()
            .with("domain-name", &self.domain_name)
            .with("record-type", self.record_type)
            .with("host", &self.host)
            .with("record", self.record_value())
            .with("ttl", self.ttl)
            .with_opt("priority", self.priority)
            .with_opt("weight", self.weight)
            .with_opt("port", self.port)
            .with_opt("geodns-location", self.geodns_location.as_ref());

        if self.record_type == RecordType::Wr
            && let Some(wr) = &self.web_redirect
        {
            params = params
                .with_opt("frame", wr.frame.as_ref())
                .with_opt("frame-title", wr.frame_title.as_ref())
                .with_opt("frame-keywords", wr.frame_keywords.as_ref())
                .with_opt("frame-description", wr.frame_description.as_ref())
                .with_opt("save-path", wr.save_path)
                .with_opt("redirect-type", wr.redirect_type);
        }
        params
    }
}

/// Partial update for `dns/mod-record`. Only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    pub host: Option<String>,
    pub record: Option<String>,
    /// Seconds; must be one of [`Ttl::ALL`].
    pub ttl: Option<u32>,
    pub priority: Option<u16>,
    pub weight: Option<u16>,
    pub port: Option<u16>,
    pub frame: Option<String>,
    pub frame_title: Option<String>,
    pub frame_keywords: Option<String>,
    pub frame_description: Option<String>,
    pub save_path: Option<bool>,
    pub redirect_type: Option<u16>,
    pub geodns_location: Option<String>,
}

impl RecordUpdate {
    pub fn to_params(&self) -> Params {
        Params::new()
            .with_opt("host", self.host.as_ref())
            .with_opt("record", self.record.as_ref())
            .with_opt("ttl", self.ttl)
            .with_opt("priority", self.priority)
            .with_opt("weight", self.weight)
            .with_opt("port", self.port)
            .with_opt("frame", self.frame.as_ref())
            .with_opt("frame-title", self.frame_title.as_ref())
            .with_opt("frame-keywords", self.frame_keywords.as_ref())
            .with_opt("frame-description", self.frame_description.as_ref())
            .with_opt("save-path", self.save_path)
            .with_opt("redirect-type", self.redirect_type)
            .with_opt("geodns-location", self.geodns_location.as_ref())
    }
}

// ============ Responses ============

/// A zone as returned by `dns/list-zones`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Zone name
    pub name: String,
    #[serde(rename = "type")]
    pub zone_type: ZoneType,
    /// `active` unless the API reports otherwise
    #[serde(default = "default_zone_status")]
    pub status: String,
    /// Number of records in the zone
    #[serde(rename = "records", default, deserialize_with = "lenient_u64")]
    pub records_count: u64,
    /// Primary server of a slave zone
    #[serde(default)]
    pub master_ip: Option<String>,
    /// Whether all nameservers serve the latest version
    #[serde(default, deserialize_with = "lenient_opt_bool")]
    pub is_updated: Option<bool>,
    /// Last modification time, as sent by the API
    #[serde(default)]
    pub last_update: Option<String>,
    /// Creation time, as sent by the API
    #[serde(default)]
    pub created: Option<String>,
    /// Zone group the zone is filed under
    #[serde(default, deserialize_with = "lenient_opt_u64")]
    pub group_id: Option<u64>,
}

fn default_zone_status() -> String {
    "active".to_string()
}

/// A DNS record as returned by `dns/records` and `dns/get-record`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record ID
    #[serde(deserialize_with = "lenient_u64")]
    pub id: u64,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Host label relative to the zone. Empty for the apex.
    pub host: String,
    /// Record value
    pub record: String,
    /// TTL (seconds)
    #[serde(deserialize_with = "lenient_u64")]
    pub ttl: u64,
    /// MX / SRV priority
    #[serde(default, deserialize_with = "lenient_opt_u64")]
    pub priority: Option<u64>,
    /// SRV weight
    #[serde(default, deserialize_with = "lenient_opt_u64")]
    pub weight: Option<u64>,
    /// SRV port
    #[serde(default, deserialize_with = "lenient_opt_u64")]
    pub port: Option<u64>,
    /// Web redirect fields, present on `WR` records
    #[serde(default)]
    pub frame: Option<String>,
    #[serde(default)]
    pub frame_title: Option<String>,
    #[serde(default)]
    pub frame_keywords: Option<String>,
    #[serde(default)]
    pub frame_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_bool")]
    pub save_path: Option<bool>,
    #[serde(default, deserialize_with = "lenient_opt_u64")]
    pub redirect_type: Option<u64>,
    /// GeoDNS location code
    #[serde(default)]
    pub geodns_location: Option<String>,
    /// `false` when the record is disabled
    #[serde(default, deserialize_with = "lenient_opt_bool")]
    pub is_active: Option<bool>,
    /// Creation time, as sent by the API
    #[serde(default)]
    pub created: Option<String>,
    /// Last modification time, as sent by the API
    #[serde(default)]
    pub modified: Option<String>,
}

/// One page of [`Zone`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZonePage {
    /// Current page (1-based)
    pub page: u32,
    /// Total number of pages
    pub pages: u32,
    pub zones: Vec<Zone>,
}

/// One page of [`Record`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordPage {
    /// Current page (1-based)
    pub page: u32,
    /// Total number of pages
    pub pages: u32,
    pub records: Vec<Record>,
}

// ClouDNS encodes most numbers as strings ("ttl": "3600").

pub(crate) fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u64, D::Error> {
    let value = Value::deserialize(d)?;
    value_as_u64(&value).ok_or_else(|| D::Error::custom(format!("expected integer, got {value}")))
}

fn lenient_opt_u64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<u64>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        value => value_as_u64(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected integer, got {value}"))),
    }
}

fn lenient_opt_bool<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<bool>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        value => value_as_bool(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected boolean, got {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn value_of(params: &Params, key: &str) -> Option<String> {
        params.get(key).and_then(ParamValue::as_scalar)
    }

    // ---- enums ----

    #[test]
    fn record_type_requirements() {
        assert!(RecordType::Mx.requires_priority());
        assert!(RecordType::Srv.requires_priority());
        assert!(RecordType::Srv.requires_port());
        assert!(RecordType::Srv.requires_weight());
        assert!(!RecordType::A.requires_priority());
        assert!(!RecordType::Mx.requires_port());
    }

    #[test]
    fn record_type_wire_names() {
        assert_eq!(RecordType::ALL.len(), 22);
        for t in RecordType::ALL {
            assert_eq!(serde_json::to_value(t).unwrap(), json!(t.as_str()));
            assert_eq!(t.as_str().parse::<RecordType>().unwrap(), t);
        }
        assert_eq!("aaaa".parse::<RecordType>().unwrap(), RecordType::Aaaa);
        assert!("BOGUS".parse::<RecordType>().is_err());
    }

    #[test]
    fn zone_type_master_ip() {
        assert!(ZoneType::Slave.requires_master_ip());
        assert!(!ZoneType::Master.requires_master_ip());
        assert_eq!("GeoDNS".parse::<ZoneType>().unwrap(), ZoneType::Geodns);
        assert_eq!(ZoneType::Reverse.description(), "Reverse DNS zone");
    }

    #[test]
    fn ttl_values() {
        assert_eq!(Ttl::default(), Ttl::Hour1);
        assert_eq!(Ttl::ALL.len(), 13);
        assert!(Ttl::is_valid(3600));
        assert!(!Ttl::is_valid(3601));
        assert_eq!(Ttl::Week1.label(), "1 week");
        assert_eq!(Ttl::try_from(86400u32).unwrap(), Ttl::Day1);
        assert_eq!(serde_json::to_value(Ttl::Minutes5).unwrap(), json!(300));
        assert!(serde_json::from_value::<Ttl>(json!(42)).is_err());
    }

    #[test]
    fn rows_per_page_values() {
        assert_eq!(RowsPerPage::default().rows(), 30);
        assert!(RowsPerPage::is_valid(100));
        assert!(!RowsPerPage::is_valid(25));
        assert!(RowsPerPage::try_from(25u32).is_err());
    }

    // ---- CreateZoneRequest ----

    #[test]
    fn zone_request_params() {
        let req = CreateZoneRequest::new("example.com", ZoneType::Master)
            .with_nameservers(["ns1.example.net", "ns2.example.net"]);
        req.validate().unwrap();

        let pairs = req.to_params().to_pairs();
        assert!(pairs.contains(&("domain-name".into(), "example.com".into())));
        assert!(pairs.contains(&("zone-type".into(), "master".into())));
        assert!(pairs.contains(&("ns[0]".into(), "ns1.example.net".into())));
        assert!(pairs.contains(&("ns[1]".into(), "ns2.example.net".into())));
    }

    #[test]
    fn zone_request_validation() {
        let empty = CreateZoneRequest::new("", ZoneType::Master);
        assert_eq!(empty.validate().unwrap_err().message(), "Domain name is required");

        let slave = CreateZoneRequest::new("example.com", ZoneType::Slave);
        assert_eq!(
            slave.validate().unwrap_err().message(),
            "Zone type slave requires master IP"
        );

        let bad_ip = slave.clone().with_master_ip("999.1.1.1");
        assert_eq!(bad_ip.validate().unwrap_err().message(), "Invalid master IP address");

        assert!(slave.with_master_ip("2001:db8::1").validate().is_ok());

        let bad_ns = CreateZoneRequest::new("example.com", ZoneType::Master)
            .with_nameservers(["-bad.example.com"]);
        assert!(matches!(
            bad_ns.validate().unwrap_err(),
            ClouDnsError::Validation { .. }
        ));
    }

    // ---- CreateRecordRequest ----

    #[test]
    fn record_request_defaults_to_one_hour() {
        let req = CreateRecordRequest::new("example.com", RecordType::A, "www", "192.0.2.1");
        req.validate().unwrap();
        let params = req.to_params();
        assert_eq!(value_of(&params, "ttl").as_deref(), Some("3600"));
        assert_eq!(value_of(&params, "record-type").as_deref(), Some("A"));
        assert!(!params.contains_key("priority"));
    }

    #[test]
    fn record_request_rejects_invalid_ttl() {
        let req = CreateRecordRequest::new("example.com", RecordType::A, "", "192.0.2.1").with_ttl(61u32);
        assert!(
            req.validate()
                .unwrap_err()
                .message()
                .starts_with("Invalid TTL value")
        );
    }

    #[test]
    fn srv_requirements() {
        let base = CreateRecordRequest::new("example.com", RecordType::Srv, "_sip._tcp", "sip.example.com");
        assert_eq!(
            base.validate().unwrap_err().message(),
            "Record type SRV requires priority"
        );
        let with_priority = base.clone().with_priority(10);
        assert_eq!(
            with_priority.validate().unwrap_err().message(),
            "Record type SRV requires port"
        );
        let complete = with_priority.with_port(5060).with_weight(5);
        complete.validate().unwrap();
        assert_eq!(value_of(&complete.to_params(), "port").as_deref(), Some("5060"));
    }

    #[test]
    fn composite_record_values() {
        let caa = CreateRecordRequest::new("example.com", RecordType::Caa, "", "ignored").with_caa(CaaValue {
            flag: "0".into(),
            tag: "issue".into(),
            value: "letsencrypt.org".into(),
        });
        caa.validate().unwrap();
        assert_eq!(caa.record_value(), "0 issue letsencrypt.org");

        let tlsa = CreateRecordRequest::new("example.com", RecordType::Tlsa, "_443._tcp", "").with_tlsa(TlsaValue {
            usage: 3,
            selector: 1,
            matching_type: 1,
            certificate: "abcdef".into(),
        });
        assert_eq!(tlsa.record_value(), "3 1 1 abcdef");

        let sshfp = CreateRecordRequest::new("example.com", RecordType::Sshfp, "", "");
        assert!(sshfp.validate().is_err());
    }

    #[test]
    fn web_redirect_params_only_for_wr() {
        let wr = WebRedirect {
            frame: Some("0".into()),
            save_path: Some(true),
            redirect_type: Some(301),
            ..WebRedirect::default()
        };
        let redirect = CreateRecordRequest::new("example.com", RecordType::Wr, "go", "https://example.org")
            .with_web_redirect(wr.clone());
        let params = redirect.to_params();
        assert_eq!(value_of(&params, "save-path").as_deref(), Some("1"));
        assert_eq!(value_of(&params, "redirect-type").as_deref(), Some("301"));

        let a = CreateRecordRequest::new("example.com", RecordType::A, "go", "192.0.2.1").with_web_redirect(wr);
        assert!(!a.to_params().contains_key("redirect-type"));
    }

    #[test]
    fn record_update_sends_only_set_fields() {
        let update = RecordUpdate {
            ttl: Some(300),
            frame_title: Some("Home".into()),
            ..RecordUpdate::default()
        };
        let params = update.to_params();
        assert_eq!(params.len(), 2);
        assert_eq!(value_of(&params, "frame-title").as_deref(), Some("Home"));
    }

    // ---- responses ----

    #[test]
    fn zone_from_numeric_strings() {
        let zone: Zone = serde_json::from_value(json!({
            "name": "example.com",
            "type": "master",
            "records": "12",
            "is_updated": "1",
            "group_id": ""
        }))
        .unwrap();
        assert_eq!(zone.status, "active");
        assert_eq!(zone.records_count, 12);
        assert_eq!(zone.is_updated, Some(true));
        assert_eq!(zone.group_id, None);
    }

    #[test]
    fn record_from_numeric_strings() {
        let record: Record = serde_json::from_value(json!({
            "id": "123456",
            "type": "MX",
            "host": "",
            "record": "mail.example.com",
            "ttl": "3600",
            "priority": 10,
            "is_active": 1
        }))
        .unwrap();
        assert_eq!(record.id, 123_456);
        assert_eq!(record.record_type, RecordType::Mx);
        assert_eq!(record.ttl, 3600);
        assert_eq!(record.priority, Some(10));
        assert_eq!(record.is_active, Some(true));
        assert_eq!(record.port, None);
    }

    #[test]
    fn record_with_garbage_ttl_is_rejected() {
        let result = serde_json::from_value::<Record>(json!({
            "id": "1", "type": "A", "host": "", "record": "192.0.2.1", "ttl": "soon"
        }));
        assert!(result.is_err());
    }
}
