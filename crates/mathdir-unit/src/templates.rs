//! Equation templates for the editor palette.
//!
//! Template sources use placeholders:
//!
//! - `#0` and `#@` are replaced by the current selection;
//! - `#?` becomes an empty group `{}`.
//!
//! Extra templates can be loaded from a TOML file:
//!
//! ```toml
//! [[template]]
//! key = "binomial"
//! icon = "(ⁿₖ)"
//! label = "Binomial"
//! latex = "\\left(\\frac{#0}{#?}\\right)"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Palette entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Template {
    /// Lookup key.
    pub key: String,
    /// Short palette glyph.
    #[serde(default)]
    pub icon: String,
    /// English label.
    pub label: String,
    /// Arabic label.
    #[serde(default)]
    pub label_ar: Option<String>,
    /// Source with placeholders.
    pub latex: String,
}

impl Template {
    /// Substitute placeholders with `selection`.
    #[must_use]
    pub fn expand(&self, selection: &str) -> String {
        self.latex
            .replace("#0", selection)
            .replace("#@", selection)
            .replace("#?", "{}")
    }

    /// True when the template consumes the selection.
    #[must_use]
    pub fn uses_selection(&self) -> bool {
        self.latex.contains("#0") || self.latex.contains("#@")
    }
}

/// Template loading error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TemplateError {
    /// Failed to read the templates file.
    #[error("Failed to read templates from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to parse the templates file.
    #[error("Failed to parse templates in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// A template is missing a required field.
    #[error("Invalid template: {0}")]
    Invalid(String),
}

#[derive(Deserialize)]
struct TemplateFile {
    #[serde(default)]
    template: Vec<Template>,
}

/// `(key, icon, label, label_ar, latex)`
const BUILTIN: &[(&str, &str, &str, &str, &str)] = &[
    ("half", "½", "Half", "نصف", r"\frac{1}{2}"),
    ("third", "⅓", "Third", "ثلث", r"\frac{1}{3}"),
    ("quarter", "¼", "Quarter", "ربع", r"\frac{1}{4}"),
    ("two-thirds", "⅔", "Two thirds", "ثلثان", r"\frac{2}{3}"),
    ("three-quarters", "¾", "Three quarters", "ثلاثة أرباع", r"\frac{3}{4}"),
    ("fraction", "a/b", "Fraction", "كسر عام", r"\frac{#@}{#?}"),
    ("sqrt", "√", "Square root", "جذر تربيعي", r"\sqrt{#0}"),
    ("cbrt", "∛", "Cube root", "جذر تكعيبي", r"\sqrt[3]{#0}"),
    ("square", "x²", "Square", "تربيع", "#0^{2}"),
    ("cube", "x³", "Cube", "تكعيب", "#0^{3}"),
    ("power", "xⁿ", "Power", "أس", "#0^{#?}"),
    ("subscript-1", "x₁", "Subscript 1", "منخفض ١", "#0_{1}"),
    ("subscript", "xₙ", "Subscript", "منخفض", "#0_{#?}"),
    ("sum", "∑", "Sum", "مجموع", r"\sum_{#0}^{#?}"),
    ("integral", "∫", "Integral", "تكامل", r"\int_{#0}^{#?}"),
    ("limit", "lim", "Limit", "نهاية", r"\lim_{#0\to #?}"),
    ("parens", "()", "Parentheses", "أقواس", r"\left(#0\right)"),
    ("brackets", "[]", "Brackets", "أقواس مربعة", r"\left[#0\right]"),
    ("braces", "{}", "Braces", "أقواس معقوفة", r"\left\{#0\right\}"),
    ("div", "÷", "Division", "قسمة", r"\div"),
    ("times", "×", "Multiplication", "ضرب", r"\times"),
    ("plus", "+", "Addition", "جمع", "+"),
    ("minus", "−", "Subtraction", "طرح", "-"),
    ("equals", "=", "Equals", "يساوي", "="),
    ("neq", "≠", "Not equal", "لا يساوي", r"\neq"),
    ("leq", "≤", "Less or equal", "أقل أو يساوي", r"\leq"),
    ("geq", "≥", "Greater or equal", "أكبر أو يساوي", r"\geq"),
    ("lt", "<", "Less than", "أقل من", "<"),
    ("gt", ">", "Greater than", "أكبر من", ">"),
    ("pi", "π", "Pi", "باي", r"\pi"),
    ("pm", "±", "Plus/minus", "زائد/ناقص", r"\pm"),
    ("infty", "∞", "Infinity", "لا نهاية", r"\infty"),
];

/// Ordered template collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    templates: Vec<Template>,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateSet {
    /// The built-in palette.
    #[must_use]
    pub fn builtin() -> Self {
        let templates = BUILTIN
            .iter()
            .map(|&(key, icon, label, label_ar, latex)| Template {
                key: key.to_owned(),
                icon: icon.to_owned(),
                label: label.to_owned(),
                label_ar: Some(label_ar.to_owned()),
                latex: latex.to_owned(),
            })
            .collect();
        Self { templates }
    }

    /// Built-in palette extended with templates from a TOML file.
    ///
    /// Templates whose key matches a built-in one replace it in place.
    pub fn with_file(path: &Path) -> Result<Self, TemplateError> {
        let content = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: TemplateFile = toml::from_str(&content).map_err(|source| TemplateError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut set = Self::builtin();
        for template in file.template {
            set.insert(template)?;
        }
        tracing::debug!(path = %path.display(), count = set.len(), "Loaded templates");
        Ok(set)
    }

    /// Add a template, replacing one with the same key.
    pub fn insert(&mut self, template: Template) -> Result<(), TemplateError> {
        if template.key.trim().is_empty() {
            return Err(TemplateError::Invalid("template key cannot be empty".to_owned()));
        }
        if template.latex.trim().is_empty() {
            return Err(TemplateError::Invalid(format!(
                "template '{}' has empty latex",
                template.key
            )));
        }

        match self.templates.iter_mut().find(|t| t.key == template.key) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
        Ok(())
    }

    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
