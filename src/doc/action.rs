use serde::{Deserialize, Serialize};

use super::model::Document;
use super::uniform::Uniform;
use crate::store::Action;

/// Actions on a [`Document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DocAction {
    /// Upload shader text and uniforms to the pipeline.
    SetShaderData,
    /// Rebuild the pipeline from its uploaded data.
    ResetPipeline,
    ChangedShaderInput { text: String },
    ChangedNewUniform { uniform: Uniform },
    LoadShader { file: String },
    SaveShader { file: String },
    AddTime,
    RemoveTime,
    ResetTime,
    TickTime,
    AddUniform { name: String, value: Uniform },
    RemoveUniform { name: String },
    UpdateUniform { name: String, value: Uniform },
}

impl Action for DocAction {}

/// Actions on a [`super::Project`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ProjectAction {
    Doc(DocAction),
    Save { file: String },
    Load { file: String },
    Loaded { file: String, doc: Document },
    EffectFailed { effect: String, message: String },
    DismissError,
}

impl Action for ProjectAction {}

impl From<DocAction> for ProjectAction {
    fn from(action: DocAction) -> Self {
        ProjectAction::Doc(action)
    }
}
