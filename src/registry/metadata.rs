use crate::{
    engine::params::{ParamValue, Parameters},
    foundation::error::{CanvasFxError, CanvasFxResult},
};

/// Broad visual family of an animation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Particle systems.
    Particles,
    /// Wave and oscillation effects.
    Waves,
    /// Geometric patterns.
    Geometric,
    /// Text and glyph effects.
    Text,
    /// Glitch and distortion effects.
    Glitch,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 5] = [
        Self::Particles,
        Self::Waves,
        Self::Geometric,
        Self::Text,
        Self::Glitch,
    ];

    /// Lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Particles => "particles",
            Self::Waves => "waves",
            Self::Geometric => "geometric",
            Self::Text => "text",
            Self::Glitch => "glitch",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = CanvasFxError;

    fn from_str(s: &str) -> CanvasFxResult<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CanvasFxError::validation(format!("unknown category \"{s}\"")))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty with a fixed ordinal order: easy < medium < hard.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Simple effect.
    Easy,
    /// Moderate effect.
    Medium,
    /// Involved effect.
    Hard,
}

impl Difficulty {
    /// Every difficulty in ordinal order.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = CanvasFxError;

    fn from_str(s: &str) -> CanvasFxResult<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CanvasFxError::validation(format!("unknown difficulty \"{s}\"")))
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editor control for one parameter. Bounds are UI hints and are not enforced by the engine.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParamKind {
    /// Numeric slider.
    Number {
        /// Lower bound hint.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Upper bound hint.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        /// Step hint.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
    },
    /// Hex color picker.
    Color,
    /// Toggle.
    Boolean,
    /// One of a fixed list of options.
    Select {
        /// Allowed values.
        options: Vec<String>,
    },
}

/// Declared parameter of an animation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParamSpec {
    /// Key used in [`Parameters`].
    pub name: String,
    /// Human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Control kind and hints.
    #[serde(flatten)]
    pub kind: ParamKind,
    /// Default value.
    pub default: ParamValue,
}

impl ParamSpec {
    /// Numeric parameter with bounds hints.
    pub fn number(name: &str, default: f64, min: f64, max: f64, step: f64) -> Self {
        Self {
            name: name.to_owned(),
            label: None,
            kind: ParamKind::Number {
                min: Some(min),
                max: Some(max),
                step: Some(step),
            },
            default: ParamValue::Number(default),
        }
    }

    /// Color parameter with a `#RRGGBB` default.
    pub fn color(name: &str, default: &str) -> Self {
        Self {
            name: name.to_owned(),
            label: None,
            kind: ParamKind::Color,
            default: ParamValue::Text(default.to_owned()),
        }
    }

    /// Boolean parameter.
    pub fn boolean(name: &str, default: bool) -> Self {
        Self {
            name: name.to_owned(),
            label: None,
            kind: ParamKind::Boolean,
            default: ParamValue::Bool(default),
        }
    }

    /// Select parameter; `default` should be one of `options`.
    pub fn select(name: &str, default: &str, options: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            label: None,
            kind: ParamKind::Select {
                options: options.iter().map(|s| (*s).to_owned()).collect(),
            },
            default: ParamValue::Text(default.to_owned()),
        }
    }

    /// Builder-style label.
    pub fn labeled(mut self, label: &str) -> Self {
        self.label = Some(label.to_owned());
        self
    }

    /// Check that the default value matches the declared kind.
    pub fn validate(&self) -> CanvasFxResult<()> {
        let ok = match (&self.kind, &self.default) {
            (ParamKind::Number { min, max, .. }, ParamValue::Number(v)) => {
                min.is_none_or(|m| *v >= m) && max.is_none_or(|m| *v <= m)
            }
            (ParamKind::Color, ParamValue::Text(s)) => {
                crate::foundation::core::Rgba8::from_hex(s).is_ok()
            }
            (ParamKind::Boolean, ParamValue::Bool(_)) => true,
            (ParamKind::Select { options }, ParamValue::Text(s)) => options.contains(s),
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(CanvasFxError::validation(format!(
                "parameter \"{}\" default does not match its declaration",
                self.name
            )))
        }
    }
}

/// Static description of an animation. `id` is the registry key and never changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationMetadata {
    /// Unique key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Visual family.
    pub category: Category,
    /// Difficulty.
    pub difficulty: Difficulty,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Declared parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParamSpec>,
    /// ISO-8601 creation date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// ISO-8601 last update date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl AnimationMetadata {
    /// Metadata with no tags, parameters or dates.
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        category: Category,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            description: description.to_owned(),
            category,
            difficulty,
            tags: Vec::new(),
            parameters: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Builder-style tags.
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| (*t).to_owned()).collect();
        self
    }

    /// Builder-style parameter schema.
    pub fn with_parameters(mut self, parameters: Vec<ParamSpec>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Builder-style dates.
    pub fn with_dates(mut self, created_at: &str, updated_at: &str) -> Self {
        self.created_at = Some(created_at.to_owned());
        self.updated_at = Some(updated_at.to_owned());
        self
    }

    /// Default values of every declared parameter.
    pub fn default_parameters(&self) -> Parameters {
        self.parameters
            .iter()
            .map(|p| (p.name.clone(), p.default.clone()))
            .collect()
    }

    /// Case-insensitive substring match against name, description and tags.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }

    /// Case-insensitive exact tag match.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Check id, schema defaults and duplicate parameter names.
    pub fn validate(&self) -> CanvasFxResult<()> {
        if self.id.trim().is_empty() {
            return Err(CanvasFxError::validation("animation id must not be empty"));
        }
        let mut seen = std::collections::HashSet::new();
        for p in &self.parameters {
            if !seen.insert(p.name.as_str()) {
                return Err(CanvasFxError::validation(format!(
                    "animation \"{}\" declares parameter \"{}\" twice",
                    self.id, p.name
                )));
            }
            p.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/metadata.rs"]
mod tests;
