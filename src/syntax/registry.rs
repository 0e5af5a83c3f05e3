//! Language registry
//!
//! Maps file extensions to compiled language specs. Built once from the
//! loaded configuration and read-only afterwards.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};

use super::language::{normalize_extension, LanguageSpec};
use crate::config::Config;
use crate::error::EditorError;

/// Compiled languages and the extension map
pub struct LanguageRegistry {
    /// Loaded language definitions, in declaration order
    languages: Vec<Arc<LanguageSpec>>,
    /// Extension to language mapping
    extension_map: HashMap<String, Arc<LanguageSpec>>,
    /// Zero-rule fallback
    plain: Arc<LanguageSpec>,
    /// Problems recovered from while compiling
    warnings: Vec<EditorError>,
}

impl LanguageRegistry {
    /// Create a registry that only knows plain text
    pub fn new() -> Self {
        Self {
            languages: Vec::new(),
            extension_map: HashMap::new(),
            plain: Arc::new(LanguageSpec::plain_text()),
            warnings: Vec::new(),
        }
    }

    /// Compile every configured language
    ///
    /// Languages are taken from `file_associations` first, then any language
    /// that only has `syntax` rules. When two languages claim an extension the
    /// later one keeps it, and the earlier spec is built without it.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();

        let mut names: Vec<&str> = Vec::new();
        let owners = registry.claim_extensions(config, &mut names);
        for syntax in &config.syntax {
            if !names.contains(&syntax.language.as_str()) {
                names.push(&syntax.language);
            }
        }

        for name in names {
            let extensions: Vec<String> = config
                .file_associations
                .iter()
                .filter(|a| a.language == name)
                .flat_map(|a| a.extensions.iter().map(|e| normalize_extension(e)))
                .filter(|e| owners.get(e).copied() == Some(name))
                .collect();
            let rules = config.syntax_for(name).map(|s| s.rules.as_slice()).unwrap_or(&[]);

            let (spec, warnings) = LanguageSpec::compile(name, &extensions, rules);
            registry.warnings.extend(warnings);
            registry.add_language(spec);
        }

        registry
    }

    /// Decide which language owns each extension, last claim winning
    ///
    /// Pushes every associated language onto `names` in declaration order.
    fn claim_extensions<'c>(
        &mut self,
        config: &'c Config,
        names: &mut Vec<&'c str>,
    ) -> HashMap<String, &'c str> {
        let mut owners: HashMap<String, &'c str> = HashMap::new();
        for association in &config.file_associations {
            let language = association.language.as_str();
            if !names.contains(&language) {
                names.push(language);
            }
            for ext in &association.extensions {
                let ext = normalize_extension(ext);
                if ext.is_empty() {
                    continue;
                }
                if let Some(previous) = owners.insert(ext.clone(), language) {
                    if previous != language {
                        let err = EditorError::DuplicateExtension {
                            extension: ext,
                            previous: previous.to_string(),
                            language: language.to_string(),
                        };
                        warn!("{}", err);
                        self.warnings.push(err);
                    }
                }
            }
        }
        owners
    }

    /// Add a language definition, claiming its extensions
    ///
    /// A language that already held one of the extensions is replaced by a
    /// copy without it, so no two specs ever list the same extension.
    pub fn add_language(&mut self, spec: LanguageSpec) {
        let spec = Arc::new(spec);
        for ext in &spec.extensions {
            let Some(previous) = self.extension_map.insert(ext.clone(), Arc::clone(&spec)) else {
                continue;
            };
            if previous.name == spec.name {
                continue;
            }
            let err = EditorError::DuplicateExtension {
                extension: ext.clone(),
                previous: previous.name.clone(),
                language: spec.name.clone(),
            };
            warn!("{}", err);
            self.warnings.push(err);
            self.release_extension(&previous, ext);
        }
        debug!(
            "registered language {} ({} rules, extensions {:?})",
            spec.name,
            spec.rules.len(),
            spec.extensions
        );
        self.languages.retain(|l| l.name != spec.name);
        self.languages.push(spec);
    }

    /// Swap `previous` for a copy that no longer lists `ext`
    fn release_extension(&mut self, previous: &Arc<LanguageSpec>, ext: &str) {
        let mut trimmed = LanguageSpec::clone(previous);
        trimmed.extensions.retain(|e| e != ext);
        let trimmed = Arc::new(trimmed);

        for slot in self.extension_map.values_mut().chain(self.languages.iter_mut()) {
            if Arc::ptr_eq(slot, previous) {
                *slot = Arc::clone(&trimmed);
            }
        }
    }

    /// Resolve an extension (with or without the leading dot)
    pub fn resolve(&self, extension: &str) -> Option<Arc<LanguageSpec>> {
        self.extension_map.get(&normalize_extension(extension)).cloned()
    }

    /// Resolve a file name through its extension
    pub fn resolve_path(&self, path: &Path) -> Option<Arc<LanguageSpec>> {
        let ext = path.extension()?.to_str()?;
        self.resolve(ext)
    }

    /// Resolve a file name, falling back to plain text
    pub fn resolve_path_or_plain(&self, path: &Path) -> Arc<LanguageSpec> {
        self.resolve_path(path).unwrap_or_else(|| self.plain_text())
    }

    /// Get a language definition by name
    pub fn language(&self, name: &str) -> Option<Arc<LanguageSpec>> {
        self.languages.iter().find(|l| l.name == name).cloned()
    }

    /// The zero-rule fallback spec
    pub fn plain_text(&self) -> Arc<LanguageSpec> {
        Arc::clone(&self.plain)
    }

    /// List available languages
    pub fn list_languages(&self) -> Vec<&str> {
        self.languages.iter().map(|l| l.name.as_str()).collect()
    }

    /// Problems recovered from while compiling
    pub fn warnings(&self) -> &[EditorError] {
        &self.warnings
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::tokens::Category;

    #[test]
    fn test_resolve_builtin() {
        let registry = LanguageRegistry::from_config(&Config::builtin());
        assert!(registry.warnings().is_empty());

        assert_eq!(registry.resolve(".go").unwrap().name, "go");
        assert_eq!(registry.resolve("go").unwrap().name, "go");
        assert_eq!(registry.resolve(".H").unwrap().name, "c");
        assert_eq!(registry.resolve_path(Path::new("src/main.cc")).unwrap().name, "c");
        assert!(registry.resolve(".rs").is_none());
        assert!(registry.resolve_path(Path::new("Makefile")).is_none());
        assert_eq!(registry.list_languages(), vec!["c", "go"]);
    }

    #[test]
    fn test_unknown_extension_falls_back_to_plain() {
        let registry = LanguageRegistry::from_config(&Config::builtin());
        let spec = registry.resolve_path_or_plain(Path::new("notes.txt"));
        assert!(spec.is_plain());
        assert_eq!(spec.classify("func"), (Category::Plain, None));
    }

    #[test]
    fn test_later_language_wins_extension() {
        let config = Config::parse(
            r#"
[file_associations.c]
extensions = [".h", ".c"]

[file_associations.cpp]
extensions = [".h", ".cpp"]
"#,
        )
        .unwrap();
        let registry = LanguageRegistry::from_config(&config);
        assert_eq!(registry.resolve(".h").unwrap().name, "cpp");
        assert_eq!(registry.resolve(".c").unwrap().name, "c");
        assert_eq!(registry.warnings().len(), 1);
        assert!(matches!(registry.warnings()[0], EditorError::DuplicateExtension { .. }));

        assert_eq!(registry.language("c").unwrap().extensions, vec!["c".to_string()]);
        assert_eq!(
            registry.language("cpp").unwrap().extensions,
            vec!["h".to_string(), "cpp".to_string()]
        );
    }

    #[test]
    fn test_added_language_takes_extension() {
        let mut registry = LanguageRegistry::from_config(&Config::builtin());
        let mut cpp = LanguageSpec::new("cpp");
        cpp.add_extension(".h");
        cpp.add_extension(".hpp");
        registry.add_language(cpp);

        assert_eq!(registry.resolve("h").unwrap().name, "cpp");
        let c = registry.language("c").unwrap();
        assert!(!c.extensions.contains(&"h".to_string()));
        assert!(Arc::ptr_eq(&c, &registry.resolve("c").unwrap()));
        assert!(matches!(registry.warnings(), [EditorError::DuplicateExtension { .. }]));
    }

    #[test]
    fn test_syntax_without_association() {
        let config = Config::parse(
            r#"
[syntax.lua.keyword]
match = ["local"]
"#,
        )
        .unwrap();
        let registry = LanguageRegistry::from_config(&config);
        let lua = registry.language("lua").unwrap();
        assert!(lua.extensions.is_empty());
        assert_eq!(lua.classify("local").0, Category::Keyword);
    }

    #[test]
    fn test_association_without_syntax() {
        let config = Config::parse("[file_associations.md]\nextensions = [\".md\"]\n").unwrap();
        let registry = LanguageRegistry::from_config(&config);
        assert!(registry.resolve("md").unwrap().is_plain());
    }

    #[test]
    fn test_shared_spec_instances() {
        let registry = LanguageRegistry::from_config(&Config::builtin());
        let a = registry.resolve(".c").unwrap();
        let b = registry.resolve(".h").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
