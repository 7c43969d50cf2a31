//! Editable posture snapshot for one organization
//!
//! Numeric fields keep whatever the user typed until the request normalizer
//! turns them into wire values, so a failed parse is never an error here.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InputError {
    #[error("Unknown assessment field: {0}")]
    UnknownField(String),

    #[error("Field {field} expects a {expected} value")]
    TypeMismatch {
        field: AssessmentField,
        expected: &'static str,
    },
}

/// Names of the editable fields, spelled exactly as on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentField {
    Name,
    PublicEndpoints,
    AdminEndpoints,
    ThirdPartyIntegrations,
    MonthlyActiveUsers,
    PrivilegedAccounts,
    MfaAdoptionPct,
    FailedLoginRatePct,
    MonthlyRequests,
    UniqueCountries,
    TrafficConcentrationPct,
    OpenCriticalVulns,
    MeanPatchTimeDays,
    WafEnabled,
    RateLimitingEnabled,
}

impl AssessmentField {
    pub const ALL: [AssessmentField; 15] = [
        AssessmentField::Name,
        AssessmentField::PublicEndpoints,
        AssessmentField::AdminEndpoints,
        AssessmentField::ThirdPartyIntegrations,
        AssessmentField::MonthlyActiveUsers,
        AssessmentField::PrivilegedAccounts,
        AssessmentField::MfaAdoptionPct,
        AssessmentField::FailedLoginRatePct,
        AssessmentField::MonthlyRequests,
        AssessmentField::UniqueCountries,
        AssessmentField::TrafficConcentrationPct,
        AssessmentField::OpenCriticalVulns,
        AssessmentField::MeanPatchTimeDays,
        AssessmentField::WafEnabled,
        AssessmentField::RateLimitingEnabled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentField::Name => "name",
            AssessmentField::PublicEndpoints => "public_endpoints",
            AssessmentField::AdminEndpoints => "admin_endpoints",
            AssessmentField::ThirdPartyIntegrations => "third_party_integrations",
            AssessmentField::MonthlyActiveUsers => "monthly_active_users",
            AssessmentField::PrivilegedAccounts => "privileged_accounts",
            AssessmentField::MfaAdoptionPct => "mfa_adoption_pct",
            AssessmentField::FailedLoginRatePct => "failed_login_rate_pct",
            AssessmentField::MonthlyRequests => "monthly_requests",
            AssessmentField::UniqueCountries => "unique_countries",
            AssessmentField::TrafficConcentrationPct => "traffic_concentration_pct",
            AssessmentField::OpenCriticalVulns => "open_critical_vulns",
            AssessmentField::MeanPatchTimeDays => "mean_patch_time_days",
            AssessmentField::WafEnabled => "waf_enabled",
            AssessmentField::RateLimitingEnabled => "rate_limiting_enabled",
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(
            self,
            AssessmentField::WafEnabled | AssessmentField::RateLimitingEnabled
        )
    }
}

impl fmt::Display for AssessmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssessmentField {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssessmentField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| InputError::UnknownField(s.to_string()))
    }
}

/// A raw edit coming from a form control
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Text box contents (numbers arrive as text too)
    Text(String),
    /// Checkbox state
    Flag(bool),
}

/// Numbers that can back a numeric form field
pub trait NumericField: Copy + Default + PartialEq + fmt::Debug {
    /// Read trimmed, non-empty text; `None` when it is not a usable number
    fn from_text(text: &str) -> Option<Self>;
}

impl NumericField for i64 {
    /// Any finite number is accepted. `120.0` and `1e3` are exact counts;
    /// fractional counts are rounded half away from zero. Values outside the
    /// `i64` range are unusable.
    fn from_text(text: &str) -> Option<Self> {
        if let Ok(count) = text.parse::<i64>() {
            return Some(count);
        }

        let rounded = text.parse::<f64>().ok().filter(|v| v.is_finite())?.round();
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
        (rounded >= i64::MIN as f64 && rounded < i64::MAX as f64).then_some(rounded as i64)
    }
}

impl NumericField for f64 {
    fn from_text(text: &str) -> Option<Self> {
        text.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// State of a numeric form field between edit and submission
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput<T> {
    /// Nothing entered
    Empty,
    /// Text that did not parse as a finite number
    Invalid(String),
    Value(T),
}

impl<T: NumericField> FieldInput<T> {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return FieldInput::Empty;
        }

        match T::from_text(trimmed) {
            Some(value) => FieldInput::Value(value),
            None => FieldInput::Invalid(raw.to_string()),
        }
    }

    pub fn value(&self) -> Option<T> {
        match self {
            FieldInput::Value(v) => Some(*v),
            FieldInput::Empty | FieldInput::Invalid(_) => None,
        }
    }
}

impl<T> From<T> for FieldInput<T> {
    fn from(value: T) -> Self {
        FieldInput::Value(value)
    }
}

/// One organization's posture snapshot as edited in a form
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentInput {
    pub name: String,
    pub public_endpoints: FieldInput<i64>,
    pub admin_endpoints: FieldInput<i64>,
    pub third_party_integrations: FieldInput<i64>,
    pub monthly_active_users: FieldInput<i64>,
    pub privileged_accounts: FieldInput<i64>,
    pub mfa_adoption_pct: FieldInput<f64>,
    pub failed_login_rate_pct: FieldInput<f64>,
    pub monthly_requests: FieldInput<i64>,
    pub unique_countries: FieldInput<i64>,
    pub traffic_concentration_pct: FieldInput<f64>,
    pub open_critical_vulns: FieldInput<i64>,
    pub mean_patch_time_days: FieldInput<i64>,
    pub waf_enabled: bool,
    pub rate_limiting_enabled: bool,
}

impl Default for AssessmentInput {
    /// Demo organization used to seed a new form and as the reset target
    fn default() -> Self {
        Self {
            name: "Demo SaaS".to_string(),
            public_endpoints: 120.into(),
            admin_endpoints: 6.into(),
            third_party_integrations: 12.into(),
            monthly_active_users: 80_000.into(),
            privileged_accounts: 40.into(),
            mfa_adoption_pct: 55.0.into(),
            failed_login_rate_pct: 2.5.into(),
            monthly_requests: 12_000_000.into(),
            unique_countries: 18.into(),
            traffic_concentration_pct: 65.0.into(),
            open_critical_vulns: 1.into(),
            mean_patch_time_days: 21.into(),
            waf_enabled: false,
            rate_limiting_enabled: true,
        }
    }
}

impl AssessmentInput {
    /// A form with nothing entered
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            public_endpoints: FieldInput::Empty,
            admin_endpoints: FieldInput::Empty,
            third_party_integrations: FieldInput::Empty,
            monthly_active_users: FieldInput::Empty,
            privileged_accounts: FieldInput::Empty,
            mfa_adoption_pct: FieldInput::Empty,
            failed_login_rate_pct: FieldInput::Empty,
            monthly_requests: FieldInput::Empty,
            unique_countries: FieldInput::Empty,
            traffic_concentration_pct: FieldInput::Empty,
            open_critical_vulns: FieldInput::Empty,
            mean_patch_time_days: FieldInput::Empty,
            waf_enabled: false,
            rate_limiting_enabled: false,
        }
    }

    /// Return a copy with one field replaced
    pub fn with_field(mut self, field: AssessmentField, raw: RawValue) -> Result<Self, InputError> {
        self.set_field(field, raw)?;
        Ok(self)
    }

    /// Replace one field in place
    ///
    /// Flags are stored as given, the name is stored verbatim and every other
    /// field is parsed as a number. Parse failures are kept as
    /// [`FieldInput::Invalid`] for the normalizer to resolve.
    pub fn set_field(&mut self, field: AssessmentField, raw: RawValue) -> Result<(), InputError> {
        let text = match (field.is_flag(), raw) {
            (true, RawValue::Flag(flag)) => {
                match field {
                    AssessmentField::WafEnabled => self.waf_enabled = flag,
                    _ => self.rate_limiting_enabled = flag,
                }
                return Ok(());
            }
            (true, RawValue::Text(_)) => {
                return Err(InputError::TypeMismatch {
                    field,
                    expected: "boolean",
                });
            }
            (false, RawValue::Flag(_)) => {
                return Err(InputError::TypeMismatch {
                    field,
                    expected: "text",
                });
            }
            (false, RawValue::Text(text)) => text,
        };

        match field {
            AssessmentField::Name => self.name = text,
            AssessmentField::PublicEndpoints => self.public_endpoints = FieldInput::parse(&text),
            AssessmentField::AdminEndpoints => self.admin_endpoints = FieldInput::parse(&text),
            AssessmentField::ThirdPartyIntegrations => {
                self.third_party_integrations = FieldInput::parse(&text)
            }
            AssessmentField::MonthlyActiveUsers => {
                self.monthly_active_users = FieldInput::parse(&text)
            }
            AssessmentField::PrivilegedAccounts => {
                self.privileged_accounts = FieldInput::parse(&text)
            }
            AssessmentField::MfaAdoptionPct => self.mfa_adoption_pct = FieldInput::parse(&text),
            AssessmentField::FailedLoginRatePct => {
                self.failed_login_rate_pct = FieldInput::parse(&text)
            }
            AssessmentField::MonthlyRequests => self.monthly_requests = FieldInput::parse(&text),
            AssessmentField::UniqueCountries => self.unique_countries = FieldInput::parse(&text),
            AssessmentField::TrafficConcentrationPct => {
                self.traffic_concentration_pct = FieldInput::parse(&text)
            }
            AssessmentField::OpenCriticalVulns => {
                self.open_critical_vulns = FieldInput::parse(&text)
            }
            AssessmentField::MeanPatchTimeDays => {
                self.mean_patch_time_days = FieldInput::parse(&text)
            }
            AssessmentField::WafEnabled | AssessmentField::RateLimitingEnabled => {}
        }

        Ok(())
    }
}
