//! Design tokens: color, typography, spacing, radius and shadow scalars.
//!
//! Tokens are immutable values. Theme variants and ad-hoc overrides are
//! derived by pure transformation and never mutate the base record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorTokens {
    pub primary: String,
    pub primary_light: String,
    pub primary_dark: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub border: String,
    pub success: String,
    pub warning: String,
    pub error: String,
    pub info: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyTokens {
    pub font_body: String,
    pub font_heading: String,
    pub font_mono: String,
    pub size_sm: String,
    pub size_md: String,
    pub size_lg: String,
    pub size_xl: String,
    pub line_height: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacingTokens {
    pub xs: String,
    pub sm: String,
    pub md: String,
    pub lg: String,
    pub xl: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadiusTokens {
    pub sm: String,
    pub md: String,
    pub lg: String,
    pub full: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowTokens {
    pub sm: String,
    pub md: String,
    pub lg: String,
}

/// The complete token record consumed by the renderer and the CSS emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignTokens {
    pub color: ColorTokens,
    pub typography: TypographyTokens,
    pub spacing: SpacingTokens,
    pub radius: RadiusTokens,
    pub shadow: ShadowTokens,
}

impl Default for DesignTokens {
    fn default() -> Self {
        DesignTokens::light()
    }
}

fn s(v: &str) -> String {
    v.to_string()
}

impl DesignTokens {
    pub fn light() -> Self {
        DesignTokens {
            color: ColorTokens {
                primary: s("#2563eb"),
                primary_light: s("#dbeafe"),
                primary_dark: s("#1e40af"),
                secondary: s("#64748b"),
                accent: s("#f59e0b"),
                background: s("#f8fafc"),
                surface: s("#ffffff"),
                text_primary: s("#0f172a"),
                text_secondary: s("#64748b"),
                border: s("#e2e8f0"),
                success: s("#16a34a"),
                warning: s("#d97706"),
                error: s("#dc2626"),
                info: s("#2563eb"),
            },
            typography: TypographyTokens {
                font_body: s("system-ui, -apple-system, 'Segoe UI', Roboto, sans-serif"),
                font_heading: s("system-ui, -apple-system, 'Segoe UI', Roboto, sans-serif"),
                font_mono: s("ui-monospace, 'Cascadia Code', 'Fira Code', monospace"),
                size_sm: s("12px"),
                size_md: s("14px"),
                size_lg: s("18px"),
                size_xl: s("24px"),
                line_height: s("1.5"),
            },
            spacing: SpacingTokens {
                xs: s("4px"),
                sm: s("8px"),
                md: s("16px"),
                lg: s("24px"),
                xl: s("32px"),
            },
            radius: RadiusTokens {
                sm: s("4px"),
                md: s("8px"),
                lg: s("12px"),
                full: s("9999px"),
            },
            shadow: ShadowTokens {
                sm: s("0 1px 2px rgba(0, 0, 0, 0.05)"),
                md: s("0 4px 6px rgba(0, 0, 0, 0.1)"),
                lg: s("0 10px 15px rgba(0, 0, 0, 0.1)"),
            },
        }
    }

    /// Dark variant: same scale, inverted surfaces and stronger shadows.
    pub fn dark() -> Self {
        let light = DesignTokens::light();
        DesignTokens {
            color: ColorTokens {
                primary: s("#3b82f6"),
                primary_light: s("#1e3a8a"),
                primary_dark: s("#93c5fd"),
                background: s("#0f172a"),
                surface: s("#1e293b"),
                text_primary: s("#f1f5f9"),
                text_secondary: s("#94a3b8"),
                border: s("#334155"),
                ..light.color
            },
            shadow: ShadowTokens {
                sm: s("0 1px 2px rgba(0, 0, 0, 0.4)"),
                md: s("0 4px 6px rgba(0, 0, 0, 0.5)"),
                lg: s("0 10px 15px rgba(0, 0, 0, 0.6)"),
            },
            ..light
        }
    }

    pub fn for_variant(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Light => DesignTokens::light(),
            ThemeVariant::Dark => DesignTokens::dark(),
        }
    }

    /// Derive a new token record with `overrides` merged over `self`.
    ///
    /// `overrides` is a JSON object keyed by section (`color`, `typography`,
    /// `spacing`, `radius`, `shadow`). Only string values for keys that
    /// already exist are applied; everything else is ignored.
    pub fn with_overrides(&self, overrides: &Value) -> DesignTokens {
        let Some(sections) = overrides.as_object() else {
            return self.clone();
        };
        let Ok(mut base) = serde_json::to_value(self) else {
            return self.clone();
        };
        if let Some(base_sections) = base.as_object_mut() {
            for (section, values) in sections {
                let (Some(target), Some(values)) = (
                    base_sections.get_mut(section).and_then(Value::as_object_mut),
                    values.as_object(),
                ) else {
                    continue;
                };
                for (key, value) in values {
                    if let (Some(slot), Some(v)) = (target.get_mut(key), value.as_str()) {
                        *slot = Value::from(v);
                    }
                }
            }
        }
        serde_json::from_value(base).unwrap_or_else(|_| self.clone())
    }
}

/// Emit the tokens as a `:root { --section-key: value; }` CSS block.
pub fn to_css_variables(tokens: &DesignTokens) -> String {
    let mut lines = vec![":root {".to_string()];
    if let Ok(Value::Object(sections)) = serde_json::to_value(tokens) {
        for (section, values) in &sections {
            let Some(values) = values.as_object() else {
                continue;
            };
            for (key, value) in values {
                if let Some(v) = value.as_str() {
                    lines.push(format!("  --{}-{}: {};", section, kebab(key), v));
                }
            }
        }
    }
    lines.push("}".to_string());
    lines.join("\n")
}

fn kebab(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dark_differs_only_where_declared() {
        let light = DesignTokens::light();
        let dark = DesignTokens::dark();
        assert_ne!(light.color.background, dark.color.background);
        assert_eq!(light.color.success, dark.color.success);
        assert_eq!(light.spacing, dark.spacing);
    }

    #[test]
    fn overrides_do_not_mutate_base() {
        let base = DesignTokens::light();
        let derived = base.with_overrides(&json!({
            "color": {"primary": "#ff0000", "unknown": "#000"},
            "spacing": {"md": 12},
            "nope": {"x": "y"}
        }));
        assert_eq!(derived.color.primary, "#ff0000");
        assert_eq!(derived.spacing.md, base.spacing.md);
        assert_eq!(base.color.primary, "#2563eb");
    }

    #[test]
    fn css_variables_use_kebab_keys() {
        let css = to_css_variables(&DesignTokens::light());
        assert!(css.starts_with(":root {"));
        assert!(css.contains("--color-primary-light: #dbeafe;"));
        assert!(css.contains("--radius-full: 9999px;"));
        assert!(css.ends_with('}'));
    }
}
