//! Internationalization (i18n) support for excerpt labels

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Label key for the link that leads from an excerpt to the full post
pub const CONTINUE_READING: &str = "continue_reading";

/// Built-in translations: (lang, key, text)
const BUILTIN: &[(&str, &str, &str)] = &[
    ("en", CONTINUE_READING, "Continue reading"),
    ("zh-CN", CONTINUE_READING, "继续阅读"),
    ("de", CONTINUE_READING, "Weiterlesen"),
    ("fr", CONTINUE_READING, "Lire la suite"),
    ("es", CONTINUE_READING, "Seguir leyendo"),
    ("ja", CONTINUE_READING, "続きを読む"),
];

/// Internationalization handler
pub struct I18n {
    /// Current language
    language: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, HashMap<String, String>>,
}

impl I18n {
    /// Create a new i18n handler seeded with the built-in labels
    pub fn new(language: &str) -> Self {
        let mut translations: HashMap<String, HashMap<String, String>> = HashMap::new();
        for (lang, key, text) in BUILTIN {
            translations
                .entry(lang.to_string())
                .or_default()
                .insert(key.to_string(), text.to_string());
        }

        Self {
            language: language.to_string(),
            translations,
        }
    }

    /// Load language files from a directory; user labels override built-ins
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str());
            if !matches!(ext, Some("yml") | Some("yaml") | Some("json")) {
                continue;
            }

            let lang = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("en")
                .to_string();

            let content = fs::read_to_string(&path)?;

            // Skip invalid files
            let data = if ext == Some("json") {
                serde_json::from_str::<HashMap<String, serde_json::Value>>(&content)
                    .map(|map| {
                        map.into_iter()
                            .filter_map(|(k, v)| json_value_to_string(v).map(|v| (k, v)))
                            .collect::<HashMap<_, _>>()
                    })
                    .map_err(|e| e.to_string())
            } else {
                serde_yaml::from_str::<HashMap<String, serde_yaml::Value>>(&content)
                    .map(|map| {
                        map.into_iter()
                            .filter_map(|(k, v)| yaml_value_to_string(v).map(|v| (k, v)))
                            .collect::<HashMap<_, _>>()
                    })
                    .map_err(|e| e.to_string())
            };

            match data {
                Ok(data) => {
                    self.translations.entry(lang).or_default().extend(data);
                    tracing::debug!("Loaded language file: {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse language file {:?}: {}", path, e);
                }
            }
        }

        Ok(())
    }

    /// Get the current language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get a translation by key
    ///
    /// Lookup order: exact language, its base language (`de-AT` -> `de`),
    /// English, then the key itself.
    pub fn get(&self, key: &str) -> String {
        let base = self.language.split(['-', '_']).next().unwrap_or("");

        [self.language.as_str(), base, "en"]
            .into_iter()
            .filter(|lang| !lang.is_empty())
            .find_map(|lang| self.translations.get(lang)?.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

fn yaml_value_to_string(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_value_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
