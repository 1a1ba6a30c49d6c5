use web_sys::UrlSearchParams;

use crate::core::{DEFAULT_BUSINESS_NAME, DEFAULT_REVIEW_URL};
use hyoka_core::FEEDBACK_PATH;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct WidgetConfig {
    pub(crate) business_name: String,
    pub(crate) review_url: String,
    pub(crate) dispatch_url: String,
}

pub(crate) fn load_widget_config() -> WidgetConfig {
    let overrides = load_query_overrides();
    let review_url = overrides
        .review
        .or_else(|| {
            env_value(
                option_env!("HYOKA_REVIEW_URL")
                    .or(option_env!("TRUNK_PUBLIC_HYOKA_REVIEW_URL")),
            )
        })
        .unwrap_or_else(|| DEFAULT_REVIEW_URL.to_string());
    let dispatch_url = overrides
        .dispatch
        .map(|base| build_dispatch_url(&base))
        .or_else(default_dispatch_url)
        .unwrap_or_else(|| FEEDBACK_PATH.to_string());
    let business_name = overrides
        .business
        .or_else(|| env_value(option_env!("HYOKA_BUSINESS_NAME")))
        .unwrap_or_else(|| DEFAULT_BUSINESS_NAME.to_string());
    WidgetConfig {
        business_name,
        review_url,
        dispatch_url,
    }
}

pub(crate) fn build_dispatch_url(base: &str) -> String {
    let base = base.trim_end_matches('/');
    format!("{base}{FEEDBACK_PATH}")
}

fn default_dispatch_url() -> Option<String> {
    if let Some(base) = env_value(
        option_env!("HYOKA_DISPATCH_BASE").or(option_env!("TRUNK_PUBLIC_HYOKA_DISPATCH_BASE")),
    ) {
        return Some(build_dispatch_url(&base));
    }
    let window = web_sys::window()?;
    let origin = window.location().origin().ok()?;
    if origin.trim().is_empty() {
        return None;
    }
    Some(build_dispatch_url(&origin))
}

fn env_value(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct QueryOverrides {
    pub(crate) review: Option<String>,
    pub(crate) dispatch: Option<String>,
    pub(crate) business: Option<String>,
}

fn load_query_overrides() -> QueryOverrides {
    let Some(window) = web_sys::window() else {
        return QueryOverrides::default();
    };
    let Ok(search) = window.location().search() else {
        return QueryOverrides::default();
    };
    parse_query_overrides(&search)
}

pub(crate) fn parse_query_overrides(search: &str) -> QueryOverrides {
    let search = search.trim();
    if search.is_empty() {
        return QueryOverrides::default();
    }
    let Ok(params) = UrlSearchParams::new_with_str(search) else {
        return QueryOverrides::default();
    };
    QueryOverrides {
        review: query_value(&params, "review"),
        dispatch: query_value(&params, "dispatch"),
        business: query_value(&params, "business"),
    }
}

fn query_value(params: &UrlSearchParams, key: &str) -> Option<String> {
    let raw = params.get(key)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
