use std::{collections::HashMap, fmt, sync::Arc};

type TranslateFn = dyn Fn(&str) -> String + Send + Sync;

/// Translation capability handed to whatever needs user-facing strings.
///
/// Defaults to the identity translation, so source strings are shown as-is.
#[derive(Clone)]
pub struct I18n {
    translate: Arc<TranslateFn>,
}

impl I18n {
    pub fn new<F>(translate: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            translate: Arc::new(translate),
        }
    }

    pub fn identity() -> Self {
        Self::new(|text| text.to_string())
    }

    /// Flat source -> translation table, unknown strings pass through untouched.
    pub fn from_catalog(catalog: HashMap<String, String>) -> Self {
        if catalog.is_empty() {
            return Self::identity();
        }
        Self::new(move |text| {
            catalog
                .get(text)
                .cloned()
                .unwrap_or_else(|| text.to_string())
        })
    }

    pub fn gettext(&self, text: &str) -> String {
        (self.translate)(text)
    }

    /// Translates `text`, then substitutes a single `{name}` placeholder.
    pub fn format(&self, text: &str, name: &str, value: &str) -> String {
        self.gettext(text).replace(&format!("{{{}}}", name), value)
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for I18n {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I18n").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_returns_source_text() {
        assert_eq!(I18n::default().gettext("Correct"), "Correct");
    }

    #[test]
    fn catalog_translates_known_strings_only() {
        let mut catalog = HashMap::new();
        catalog.insert("Correct".to_string(), "Верно".to_string());
        let i18n = I18n::from_catalog(catalog);

        assert_eq!(i18n.gettext("Correct"), "Верно");
        assert_eq!(i18n.gettext("Wrong"), "Wrong");
    }

    #[test]
    fn format_substitutes_placeholder_after_translation() {
        let i18n = I18n::new(|text| text.replace("Tip for", "Hint for"));
        assert_eq!(
            i18n.format("Tip for {list_of_choices}", "list_of_choices", "A, B"),
            "Hint for A, B"
        );
    }
}
