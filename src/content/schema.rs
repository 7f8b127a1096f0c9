//! Post front-matter schema
//!
//! Each field has its own validation function with a typed default, so a
//! failure always names the field that caused it. Unknown keys are ignored.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_yaml::{Mapping, Value};
use url::Url;

use crate::error::SchemaError;
use crate::helpers::is_path_segment;

/// Tag applied to posts that declare none
pub const DEFAULT_TAG: &str = "security";

/// Validated front-matter of a post
#[derive(Debug, Clone, PartialEq)]
pub struct PostData {
    pub title: String,
    pub seo_title: Option<String>,
    pub description: Option<String>,
    pub slug: String,
    pub canonical: Option<Url>,
    pub og_image: Option<String>,
    pub tags: Vec<String>,
    pub noindex: bool,
    pub draft: bool,
    pub date: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// Inputs to validation that come from site configuration
#[derive(Debug, Clone, Copy)]
pub struct ValidateOptions {
    /// Timezone for date-times written without an offset
    pub timezone: Tz,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self { timezone: Tz::UTC }
    }
}

/// Validate raw front-matter into post data
pub fn validate(data: &Mapping, options: &ValidateOptions) -> Result<PostData, SchemaError> {
    let field = |name: &str| data.get(name).filter(|v| !v.is_null());

    Ok(PostData {
        title: required_string("title", field("title"))?,
        seo_title: optional_string("seo_title", field("seo_title"))?,
        description: optional_string("description", field("description"))?,
        slug: slug("slug", field("slug"))?,
        canonical: optional_url("canonical", field("canonical"))?,
        og_image: optional_string("og_image", field("og_image"))?,
        tags: tags("tags", field("tags"))?,
        noindex: boolean("noindex", field("noindex"), false)?,
        draft: boolean("draft", field("draft"), true)?,
        date: optional_date("date", field("date"), options.timezone)?,
        updated: optional_date("updated", field("updated"), options.timezone)?,
    })
}

fn required_string(name: &str, value: Option<&Value>) -> Result<String, SchemaError> {
    match optional_string(name, value)? {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(SchemaError::missing(name)),
    }
}

fn slug(name: &str, value: Option<&Value>) -> Result<String, SchemaError> {
    let slug = required_string(name, value)?;
    if !is_path_segment(slug.trim()) {
        return Err(SchemaError::invalid(
            name,
            format!("{:?} must be a single path segment without '/', '\\' or '..'", slug),
        ));
    }
    Ok(slug)
}

fn optional_string(name: &str, value: Option<&Value>) -> Result<Option<String>, SchemaError> {
    match value {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(SchemaError::invalid(
            name,
            format!("expected text, found {}", kind(other)),
        )),
    }
}

fn optional_url(name: &str, value: Option<&Value>) -> Result<Option<Url>, SchemaError> {
    let Some(raw) = optional_string(name, value)? else {
        return Ok(None);
    };
    Url::parse(raw.trim())
        .map(Some)
        .map_err(|e| SchemaError::invalid(name, format!("{:?} is not an absolute URL: {}", raw, e)))
}

fn tags(name: &str, value: Option<&Value>) -> Result<Vec<String>, SchemaError> {
    let tags = match value {
        None => Vec::new(),
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(SchemaError::invalid(
                    name,
                    format!("expected a list of text, found {} in list", kind(other)),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(SchemaError::invalid(
                name,
                format!("expected a list of text, found {}", kind(other)),
            ))
        }
    };

    if tags.is_empty() {
        Ok(vec![DEFAULT_TAG.to_string()])
    } else {
        Ok(tags)
    }
}

fn boolean(name: &str, value: Option<&Value>, default: bool) -> Result<bool, SchemaError> {
    match value {
        None => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(SchemaError::invalid(
            name,
            format!("expected true or false, found {}", kind(other)),
        )),
    }
}

fn optional_date(
    name: &str,
    value: Option<&Value>,
    tz: Tz,
) -> Result<Option<DateTime<Utc>>, SchemaError> {
    let parsed = match value {
        None => return Ok(None),
        Some(Value::String(s)) => parse_date_string(s, tz),
        Some(Value::Number(n)) => {
            // Integers are epoch milliseconds
            let millis = n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64));
            millis.and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        }
        Some(other) => {
            return Err(SchemaError::invalid(
                name,
                format!("expected a date, found {}", kind(other)),
            ))
        }
    };

    parsed.map(Some).ok_or_else(|| {
        let shown = match value {
            Some(Value::String(s)) => s.clone(),
            Some(v) => serde_yaml::to_string(v).unwrap_or_default().trim().to_string(),
            None => String::new(),
        };
        SchemaError::invalid(name, format!("{:?} is not a recognised date", shown))
    })
}

/// Parse a date string in the formats front-matter commonly uses
fn parse_date_string(s: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let offset_formats = [
        "%Y-%m-%d %H:%M:%S%z",
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
    ];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let naive_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in naive_formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            // Local times that fall in a DST gap do not exist
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
