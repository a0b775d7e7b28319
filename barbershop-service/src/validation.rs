//! Schema validation for request payloads.
//!
//! Creation schemas enforce content rules. Replacement schemas for PATCH only
//! require each present field to have the JSON type the record stores.
//!
//! The router only relies on the [`Schema`] contract: a payload either
//! validates into a typed value or yields a list of [`Issue`]s that is sent
//! back to the client verbatim.

use chrono::DateTime;
use common_http_errors::{ApiError, ApiResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use common_auth::Role;

use crate::models::{AppointmentInput, BarberInput};

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}(?:-[0-9a-f]{4}){3}-[0-9a-f]{12}$").expect("uuid pattern")
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\w+-]+(?:\.[\w+-]+)*@[0-9a-z]+(?:[.-][0-9a-z]+)*\.[a-z]{2,}$")
        .expect("email pattern")
});

pub const NAME_MIN_LENGTH: usize = 3;
pub const PASSWORD_MIN_LENGTH: usize = 6;
pub const MIN_DURATION_MINUTES: f64 = 30.0;
pub const MAX_DURATION_MINUTES: f64 = 480.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathItem {
    pub key: String,
}

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    /// `"schema"` for a wrong type, `"validation"` for a failed constraint.
    pub kind: &'static str,
    #[serde(rename = "type")]
    pub rule: &'static str,
    pub input: Value,
    pub expected: Option<String>,
    pub received: String,
    pub message: String,
    pub path: Vec<PathItem>,
}

impl Issue {
    fn at(key: &str, kind: &'static str, rule: &'static str, input: Option<&Value>) -> Self {
        Self {
            kind,
            rule,
            input: input.cloned().unwrap_or(Value::Null),
            expected: None,
            received: describe(input),
            message: String::new(),
            path: vec![PathItem { key: key.to_string() }],
        }
    }

    fn expecting(mut self, expected: impl Into<String>, label: &str) -> Self {
        let expected = expected.into();
        self.message = format!("Invalid {label}: Expected {expected} but received {}", self.received);
        self.expected = Some(expected);
        self
    }

    fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }
}

pub type Validated<T> = Result<T, Vec<Issue>>;

/// A pluggable validator: pass with a typed value, or fail with issues.
pub trait Schema {
    type Output;

    fn validate(&self, input: &Value) -> Validated<Self::Output>;
}

pub fn validate<S: Schema>(schema: &S, input: &Value) -> Validated<S::Output> {
    schema.validate(input)
}

/// Runs `schema` and turns a failure into a 400 carrying the issue list.
pub fn validate_request<S: Schema>(schema: &S, input: &Value) -> ApiResult<S::Output> {
    schema.validate(input).map_err(|issues| match serde_json::to_value(&issues) {
        Ok(issues) => ApiError::Validation {
            code: "validation_failed",
            issues,
        },
        Err(err) => ApiError::internal(err),
    })
}

/// `name` and `lastName`, both strings of at least three characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarberSchema;

impl Schema for BarberSchema {
    type Output = BarberInput;

    fn validate(&self, input: &Value) -> Validated<BarberInput> {
        let mut check = ObjectCheck::new(input)?;
        let name = check.min_length("name", NAME_MIN_LENGTH);
        let last_name = check.min_length("lastName", NAME_MIN_LENGTH);
        check.finish(|| BarberInput { name, last_name })
    }
}

/// Appointment creation rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppointmentSchema;

impl Schema for AppointmentSchema {
    type Output = AppointmentInput;

    fn validate(&self, input: &Value) -> Validated<AppointmentInput> {
        let mut check = ObjectCheck::new(input)?;
        let name = check.min_length("name", NAME_MIN_LENGTH);
        let start = check.timestamp("start");
        let minutes_duration =
            check.number_between("minutesDuration", MIN_DURATION_MINUTES, MAX_DURATION_MINUTES);
        let price = check.number("price");
        let barber_id = check.pattern("barberId", &UUID_RE, "uuid", "Invalid barber ID");
        let client_email = check.pattern("clientEmail", &EMAIL_RE, "email", "Invalid email");
        check.finish(|| AppointmentInput {
            name,
            start,
            minutes_duration,
            price,
            barber_id,
            client_email,
        })
    }
}

/// PATCH body for a barber: any subset of fields, no content rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarberReplacementSchema;

impl Schema for BarberReplacementSchema {
    type Output = BarberInput;

    fn validate(&self, input: &Value) -> Validated<BarberInput> {
        let mut check = ObjectCheck::new(input)?;
        let name = check.optional_string("name");
        let last_name = check.optional_string("lastName");
        check.finish(|| BarberInput { name, last_name })
    }
}

/// PATCH body for an appointment: any subset of fields, no content rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppointmentReplacementSchema;

impl Schema for AppointmentReplacementSchema {
    type Output = AppointmentInput;

    fn validate(&self, input: &Value) -> Validated<AppointmentInput> {
        let mut check = ObjectCheck::new(input)?;
        let name = check.optional_string("name");
        let start = check.optional_string("start");
        let minutes_duration = check.optional_number("minutesDuration");
        let price = check.optional_number("price");
        let barber_id = check.optional_string("barberId");
        let client_email = check.optional_string("clientEmail");
        check.finish(|| AppointmentInput {
            name,
            start,
            minutes_duration,
            price,
            barber_id,
            client_email,
        })
    }
}

/// Account registration payload after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// `username`, `password` and an optional `role` that defaults to `user`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationSchema;

impl Schema for RegistrationSchema {
    type Output = Registration;

    fn validate(&self, input: &Value) -> Validated<Registration> {
        let mut check = ObjectCheck::new(input)?;
        let username = check.min_length("username", NAME_MIN_LENGTH);
        let password = check.min_length("password", PASSWORD_MIN_LENGTH);
        let role = check.known_role("role");
        check.finish(|| Registration {
            username: username.unwrap_or_default(),
            password: password.unwrap_or_default(),
            role: role.unwrap_or(Role::User),
        })
    }
}

/// Collects issues across every field of an object payload.
struct ObjectCheck<'a> {
    object: &'a Map<String, Value>,
    issues: Vec<Issue>,
}

impl<'a> ObjectCheck<'a> {
    fn new(input: &'a Value) -> Validated<Self> {
        match input {
            Value::Object(object) => Ok(Self {
                object,
                issues: Vec::new(),
            }),
            other => {
                let received = describe(Some(other));
                Err(vec![Issue {
                    kind: "schema",
                    rule: "object",
                    input: other.clone(),
                    expected: Some("Object".into()),
                    message: format!("Invalid type: Expected Object but received {received}"),
                    received,
                    path: Vec::new(),
                }])
            }
        }
    }

    fn finish<T>(self, build: impl FnOnce() -> T) -> Validated<T> {
        if self.issues.is_empty() {
            Ok(build())
        } else {
            Err(self.issues)
        }
    }

    fn string(&mut self, key: &str) -> Option<&'a str> {
        let value = self.object.get(key);
        match value {
            Some(Value::String(text)) => Some(text.as_str()),
            _ => {
                self.issues
                    .push(Issue::at(key, "schema", "string", value).expecting("string", "type"));
                None
            }
        }
    }

    fn number(&mut self, key: &str) -> Option<Number> {
        let value = self.object.get(key);
        match value {
            Some(Value::Number(number)) => Some(number.clone()),
            _ => {
                self.issues
                    .push(Issue::at(key, "schema", "number", value).expecting("number", "type"));
                None
            }
        }
    }

    /// Absent and `null` both leave the field out of the record.
    fn present(&self, key: &str) -> bool {
        !matches!(self.object.get(key), None | Some(Value::Null))
    }

    fn optional_string(&mut self, key: &str) -> Option<String> {
        if !self.present(key) {
            return None;
        }
        self.string(key).map(str::to_string)
    }

    fn optional_number(&mut self, key: &str) -> Option<Number> {
        if !self.present(key) {
            return None;
        }
        self.number(key)
    }

    fn min_length(&mut self, key: &str, min: usize) -> Option<String> {
        let text = self.string(key)?;
        let length = text.chars().count();
        if length < min {
            let mut issue = Issue::at(key, "validation", "min_length", self.object.get(key));
            issue.received = length.to_string();
            self.issues.push(issue.expecting(format!(">={min}"), "length"));
        }
        Some(text.to_string())
    }

    fn number_between(&mut self, key: &str, min: f64, max: f64) -> Option<Number> {
        let number = self.number(key)?;
        let value = number.as_f64().unwrap_or(f64::NAN);
        if value.is_nan() || value < min {
            self.issues.push(
                Issue::at(key, "validation", "min_value", self.object.get(key))
                    .expecting(format!(">={min}"), "value"),
            );
        }
        if value.is_nan() || value > max {
            self.issues.push(
                Issue::at(key, "validation", "max_value", self.object.get(key))
                    .expecting(format!("<={max}"), "value"),
            );
        }
        Some(number)
    }

    fn pattern(
        &mut self,
        key: &str,
        pattern: &Regex,
        rule: &'static str,
        message: &str,
    ) -> Option<String> {
        let text = self.string(key)?;
        if !pattern.is_match(text) {
            self.issues.push(
                Issue::at(key, "validation", rule, self.object.get(key)).with_message(message),
            );
        }
        Some(text.to_string())
    }

    fn known_role(&mut self, key: &str) -> Option<Role> {
        if !self.present(key) {
            return None;
        }
        let role = Role::parse(self.string(key)?);
        if !role.is_known() {
            self.issues.push(
                Issue::at(key, "validation", "picklist", self.object.get(key))
                    .expecting("(\"admin\" | \"user\")", "option"),
            );
        }
        Some(role)
    }

    fn timestamp(&mut self, key: &str) -> Option<String> {
        let text = self.string(key)?;
        match DateTime::parse_from_rfc3339(text) {
            Ok(_) => Some(text.to_string()),
            Err(_) => {
                self.issues.push(
                    Issue::at(key, "schema", "timestamp", self.object.get(key))
                        .expecting("RFC 3339 timestamp", "type"),
                );
                None
            }
        }
    }
}

fn describe(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::String(text)) => format!("\"{text}\""),
        Some(Value::Array(_)) => "Array".to_string(),
        Some(Value::Object(_)) => "Object".to_string(),
    }
}
