//! Stand-in for the GPU side: holds what was last uploaded and whether it
//! built.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::uniform::Uniform;
use crate::persist::Map;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum BuildStatus {
    #[default]
    Empty,
    Ready,
    Rejected(String),
}

/// Data currently held by the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub shader: String,
    pub uniforms: BTreeMap<String, Uniform>,
    pub uploads: u64,
    pub builds: u64,
    pub status: BuildStatus,
}

/// Shared pipeline service handed to effects through [`crate::store::Deps`].
#[derive(Debug, Default)]
pub struct Pipeline {
    program: RwLock<Program>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces shader text and uniforms. Takes effect on the next rebuild.
    pub fn upload(&self, shader: &str, uniforms: &Map<String, Uniform>) {
        let mut program = self.program.write();
        program.shader = shader.to_string();
        program.uniforms = uniforms.iter().map(|(k, v)| (k.clone(), *v)).collect();
        program.uploads += 1;
        tracing::debug!(uploads = program.uploads, uniforms = program.uniforms.len(), "shader data uploaded");
    }

    pub fn rebuild(&self) -> BuildStatus {
        let mut program = self.program.write();
        program.builds += 1;
        program.status = match check(&program.shader) {
            Ok(()) => BuildStatus::Ready,
            Err(reason) => {
                tracing::warn!(%reason, "shader rejected");
                BuildStatus::Rejected(reason)
            }
        };
        program.status.clone()
    }

    /// Updates one uniform without a rebuild. Unknown names are ignored.
    pub fn set_uniform(&self, name: &str, value: Uniform) -> bool {
        match self.program.write().uniforms.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> Program {
        self.program.read().clone()
    }
}

fn check(shader: &str) -> Result<(), String> {
    if shader.trim().is_empty() {
        return Err("shader is empty".into());
    }
    let mut depth: i64 = 0;
    for c in shader.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return Err("unexpected '}'".into());
        }
    }
    if depth != 0 {
        return Err("unbalanced braces".into());
    }
    if !shader.contains("main") {
        return Err("no entry point 'main'".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuild_checks_uploaded_shader() {
        let pipeline = Pipeline::new();
        assert_eq!(pipeline.rebuild(), BuildStatus::Rejected("shader is empty".into()));

        pipeline.upload("void main() { }", &Map::new());
        assert_eq!(pipeline.rebuild(), BuildStatus::Ready);

        pipeline.upload("void main() {", &Map::new());
        assert_eq!(pipeline.rebuild(), BuildStatus::Rejected("unbalanced braces".into()));
        assert_eq!(pipeline.snapshot().builds, 3);
    }

    #[test]
    fn set_uniform_only_touches_known_names() {
        let pipeline = Pipeline::new();
        let uniforms: Map<String, Uniform> = [("scale".to_string(), Uniform::Float(1.0))].into_iter().collect();
        pipeline.upload("void main() {}", &uniforms);

        assert!(pipeline.set_uniform("scale", Uniform::Float(2.0)));
        assert!(!pipeline.set_uniform("missing", Uniform::Float(2.0)));
        assert_eq!(pipeline.snapshot().uniforms["scale"], Uniform::Float(2.0));
    }
}
