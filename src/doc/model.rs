use serde::{Deserialize, Serialize};

use super::uniform::Uniform;
use crate::codec::Extras;
use crate::persist::{Boxed, Map};
use crate::store::Model;

/// Shader shown for a fresh document.
pub const DEFAULT_SHADER: &str = "\
#version 330 core
uniform float time;
out vec4 color;

void main() {
    color = vec4(0.5 + 0.5 * sin(time), 0.2, 0.4, 1.0);
}
";

/// The editable shader document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub uniforms: Map<String, Uniform>,
    /// Value (and so kind) of the uniform the editor will add next.
    #[serde(default)]
    pub new_uniform: Uniform,
    pub shader: Boxed<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shader_path: Option<String>,
    /// Bumped each time the shader text changes.
    #[serde(default)]
    pub shader_revision: u64,
    #[serde(flatten)]
    pub extras: Extras,
}

impl Default for Document {
    fn default() -> Self {
        Self::with_shader(DEFAULT_SHADER)
    }
}

impl Document {
    pub fn with_shader(shader: impl Into<String>) -> Self {
        Self {
            uniforms: Map::new(),
            new_uniform: Uniform::default(),
            shader: Boxed::new(shader.into()),
            shader_path: None,
            shader_revision: 0,
            extras: Extras::new(),
        }
    }
}

impl Model for Document {}

/// Application state: the document plus where it is saved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub doc: Document,
    pub path: Option<String>,
    /// Most recent effect failure, shown until dismissed.
    pub last_error: Option<String>,
}

impl Project {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            path: None,
            last_error: None,
        }
    }
}

impl Model for Project {}
