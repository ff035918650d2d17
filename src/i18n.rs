use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};

use gpui::SharedString;

mod generated {
    include!(concat!(env!("OUT_DIR"), "/folio_i18n_generated.rs"));
}

static CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::load);

#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub enum Locale {
    #[default]
    System,
    Tag(String),
}

impl From<&str> for Locale {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("system") {
            Self::System
        } else {
            Self::Tag(value.to_string())
        }
    }
}

impl From<String> for Locale {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

/// Message lookup against the catalogs compiled from `locales/*.toml`.
/// Unknown keys render as the key itself.
#[derive(Clone, Default)]
pub struct I18nManager {
    locale: Arc<RwLock<Locale>>,
}

impl I18nManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(locale: impl Into<Locale>) -> Self {
        let manager = Self::new();
        manager.set_locale(locale);
        manager
    }

    pub fn locale(&self) -> Locale {
        match self.locale.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_locale(&self, locale: impl Into<Locale>) {
        let mut guard = match self.locale.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = locale.into();
    }

    pub fn resolved_locale(&self) -> &'static str {
        CATALOG.resolve(self.requested_locale().as_deref())
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    pub fn t(&self, key: &str) -> SharedString {
        match self.lookup(key) {
            Some(value) => value.into(),
            None => key.to_string().into(),
        }
    }

    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> SharedString {
        let template = self.lookup(key).unwrap_or(key);
        format_template(template, params).into()
    }

    fn requested_locale(&self) -> Option<String> {
        match self.locale() {
            Locale::System => system_locale(),
            Locale::Tag(tag) => Some(tag),
        }
    }

    fn lookup(&self, key: &str) -> Option<&'static str> {
        let resolved = self.resolved_locale();
        CATALOG
            .lookup(resolved, key)
            .or_else(|| CATALOG.lookup(generated::DEFAULT_LOCALE, key))
    }
}

#[cfg(feature = "i18n")]
fn system_locale() -> Option<String> {
    sys_locale::get_locale()
}

#[cfg(not(feature = "i18n"))]
fn system_locale() -> Option<String> {
    None
}

struct Catalog {
    entries: HashMap<&'static str, HashMap<&'static str, &'static str>>,
    by_tag: HashMap<String, &'static str>,
    by_language: HashMap<String, &'static str>,
}

impl Catalog {
    fn load() -> Self {
        let mut entries = HashMap::new();
        let mut by_tag = HashMap::new();
        let mut by_language = HashMap::new();

        for (locale, messages) in generated::LOCALES.iter().copied() {
            let normalized = normalize_locale_tag(locale);
            let language = primary_language(&normalized).to_string();
            by_tag.insert(normalized, locale);
            by_language.entry(language).or_insert(locale);
            entries.insert(locale, messages.iter().copied().collect::<HashMap<_, _>>());
        }

        Self {
            entries,
            by_tag,
            by_language,
        }
    }

    fn resolve(&self, requested: Option<&str>) -> &'static str {
        let Some(requested) = requested else {
            return generated::DEFAULT_LOCALE;
        };
        let normalized = normalize_locale_tag(requested);
        if let Some(locale) = self.by_tag.get(&normalized).copied() {
            return locale;
        }
        self.by_language
            .get(primary_language(&normalized))
            .copied()
            .unwrap_or(generated::DEFAULT_LOCALE)
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&'static str> {
        self.entries
            .get(locale)
            .and_then(|messages| messages.get(key).copied())
    }
}

fn primary_language(normalized: &str) -> &str {
    normalized.split('-').next().unwrap_or_default()
}

/// `es_PE.UTF-8@euro` -> `es-pe`
fn normalize_locale_tag(tag: &str) -> String {
    let tag = tag.trim();
    let tag = tag.split('.').next().unwrap_or(tag);
    let tag = tag.split('@').next().unwrap_or(tag);
    tag.replace('_', "-")
        .split('-')
        .filter(|segment| !segment.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Replaces `{name}` placeholders; unknown placeholders are left untouched.
pub(crate) fn format_template(template: &str, params: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('}') else {
            output.push_str(&rest[open..]);
            return output;
        };
        let token = &after_open[..close];
        match params.iter().find(|(name, _)| *name == token) {
            Some((_, value)) => output.push_str(value),
            None => output.push_str(&rest[open..open + close + 2]),
        }
        rest = &after_open[close + 1..];
    }

    output.push_str(rest);
    output
}
