//! Form payloads and their validation into engine types

use std::num::NonZeroUsize;

use serde::Deserialize;

use crate::game::{PlayerId, RoundParams, SessionOptions};

use super::routes::AppError;

/// HTML checkboxes submit a value only when ticked
fn checkbox(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(str::trim)
        .is_some_and(|v| !v.is_empty() && !v.eq_ignore_ascii_case("false"))
}

fn display_name(raw: &str, field: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(name.to_string())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateForm {
    #[serde(default)]
    pub host_name: String,
    pub use_random_secret: Option<String>,
    #[serde(alias = "randomChameleon")]
    pub random_chameleon_mode: Option<String>,
}

impl CreateForm {
    pub fn into_options(self) -> Result<SessionOptions, AppError> {
        Ok(SessionOptions {
            host_name: display_name(&self.host_name, "Host name")?,
            use_random_secret: checkbox(&self.use_random_secret),
            random_chameleon_mode: checkbox(&self.random_chameleon_mode),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct JoinForm {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
}

impl JoinForm {
    pub fn display_name(&self) -> Result<String, AppError> {
        display_name(&self.name, "Display name")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KickForm {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub player_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRoundForm {
    #[serde(default)]
    pub code: String,
    pub category: Option<String>,
    pub secret: Option<String>,
    /// One entry per ticked player checkbox
    #[serde(default)]
    pub chameleon: Vec<String>,
    pub random_count: Option<String>,
}

impl StartRoundForm {
    /// Blank, non-numeric and non-positive counts mean "not requested"
    pub fn round_params(&self) -> RoundParams {
        RoundParams {
            category: self.category.clone(),
            secret: self.secret.clone(),
            chameleon_ids: self
                .chameleon
                .iter()
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .map(PlayerId::from)
                .collect(),
            random_count: self
                .random_count
                .as_deref()
                .and_then(|raw| raw.trim().parse::<usize>().ok())
                .and_then(NonZeroUsize::new),
        }
    }
}

/// Forms that only carry a session code
#[derive(Debug, Deserialize)]
pub struct CodeForm {
    #[serde(default)]
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_form(random_count: Option<&str>, chameleon: &[&str]) -> StartRoundForm {
        StartRoundForm {
            code: "ABCD".into(),
            category: None,
            secret: None,
            chameleon: chameleon.iter().map(|s| s.to_string()).collect(),
            random_count: random_count.map(str::to_string),
        }
    }

    #[test]
    fn random_count_validation() {
        assert_eq!(start_form(Some("3"), &[]).round_params().random_count, NonZeroUsize::new(3));
        for raw in ["", "  ", "0", "-2", "two"] {
            assert!(start_form(Some(raw), &[]).round_params().random_count.is_none(), "{raw}");
        }
        assert!(start_form(None, &[]).round_params().random_count.is_none());
    }

    #[test]
    fn blank_chameleon_ids_are_dropped() {
        let params = start_form(None, &["abc123", " ", "abc123"]).round_params();
        assert_eq!(params.chameleon_ids.len(), 1);
        assert!(params.chameleon_ids.contains(&PlayerId::from("abc123")));
    }

    #[test]
    fn checkbox_values() {
        assert!(checkbox(&Some("true".into())));
        assert!(checkbox(&Some("on".into())));
        assert!(!checkbox(&Some("".into())));
        assert!(!checkbox(&Some("false".into())));
        assert!(!checkbox(&None));
    }

    #[test]
    fn create_form_requires_a_host_name() {
        let form = CreateForm {
            host_name: "   ".into(),
            use_random_secret: None,
            random_chameleon_mode: Some("true".into()),
        };
        assert!(matches!(form.into_options(), Err(AppError::BadRequest(_))));
    }
}
