use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the uniform driven by the shader clock.
pub const TIME_UNIFORM: &str = "time";

/// A shader uniform value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Uniform {
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Rgb([f32; 3]),
    Rgba([f32; 4]),
}

impl Default for Uniform {
    fn default() -> Self {
        Uniform::Float(0.0)
    }
}

impl Uniform {
    /// Every kind, in the order the editor cycles through them.
    pub const KINDS: [Uniform; 6] = [
        Uniform::Int(0),
        Uniform::Float(0.0),
        Uniform::Vec2([0.0; 2]),
        Uniform::Vec3([0.0; 3]),
        Uniform::Rgb([0.0; 3]),
        Uniform::Rgba([0.0, 0.0, 0.0, 1.0]),
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            Uniform::Int(_) => "int",
            Uniform::Float(_) => "float",
            Uniform::Vec2(_) => "vec2",
            Uniform::Vec3(_) => "vec3",
            Uniform::Rgb(_) => "rgb",
            Uniform::Rgba(_) => "rgba",
        }
    }

    /// The zero value of the next kind in [`Uniform::KINDS`].
    pub fn next_kind(&self) -> Uniform {
        let index = Self::KINDS
            .iter()
            .position(|kind| kind.kind() == self.kind())
            .unwrap_or(0);
        Self::KINDS[(index + 1) % Self::KINDS.len()]
    }

    /// Adds `delta` to every component. Colors stay within `0.0..=1.0`.
    ///
    /// Ints move by at least one in the direction of `delta`, so a fine step
    /// still changes them.
    pub fn nudged(&self, delta: f32) -> Uniform {
        let add = |values: &[f32]| values.iter().map(|v| v + delta).collect::<Vec<_>>();
        let clamp = |values: Vec<f32>| values.into_iter().map(|v| v.clamp(0.0, 1.0)).collect::<Vec<_>>();
        match *self {
            Uniform::Int(v) => Uniform::Int(v.saturating_add(int_step(delta))),
            Uniform::Float(v) => Uniform::Float(v + delta),
            Uniform::Vec2(v) => Uniform::Vec2(to_array(&add(&v))),
            Uniform::Vec3(v) => Uniform::Vec3(to_array(&add(&v))),
            Uniform::Rgb(v) => Uniform::Rgb(to_array(&clamp(add(&v)))),
            Uniform::Rgba(v) => Uniform::Rgba(to_array(&clamp(add(&v)))),
        }
    }
}

fn int_step(delta: f32) -> i32 {
    if delta == 0.0 || delta.is_nan() {
        return 0;
    }
    let step = delta.round() as i32;
    if step == 0 {
        delta.signum() as i32
    } else {
        step
    }
}

fn to_array<const N: usize>(values: &[f32]) -> [f32; N] {
    let mut out = [0.0; N];
    out.copy_from_slice(&values[..N]);
    out
}

impl fmt::Display for Uniform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |values: &[f32]| {
            values
                .iter()
                .map(|v| format!("{v:.3}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            Uniform::Int(v) => write!(f, "{v}"),
            Uniform::Float(v) => write!(f, "{v:.3}"),
            Uniform::Vec2(v) => write!(f, "({})", join(v)),
            Uniform::Vec3(v) | Uniform::Rgb(v) => write!(f, "({})", join(v)),
            Uniform::Rgba(v) => write!(f, "({})", join(v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_kind_cycles_through_all_kinds() {
        let mut uniform = Uniform::default();
        let mut seen = vec![uniform.kind()];
        for _ in 0..Uniform::KINDS.len() {
            uniform = uniform.next_kind();
            seen.push(uniform.kind());
        }
        assert_eq!(seen.first(), seen.last());
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn nudging_colors_clamps() {
        assert_eq!(Uniform::Rgb([0.75, 0.5, 0.0]).nudged(0.5), Uniform::Rgb([1.0, 1.0, 0.5]));
        assert_eq!(Uniform::Int(2).nudged(-1.0), Uniform::Int(1));
        assert_eq!(Uniform::Float(1.0).nudged(0.5), Uniform::Float(1.5));
    }

    #[test]
    fn fine_steps_still_move_ints() {
        assert_eq!(Uniform::Int(3).nudged(0.1), Uniform::Int(4));
        assert_eq!(Uniform::Int(3).nudged(-0.1), Uniform::Int(2));
        assert_eq!(Uniform::Int(3).nudged(2.6), Uniform::Int(6));
        assert_eq!(Uniform::Int(3).nudged(0.0), Uniform::Int(3));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_string(&Uniform::Vec2([1.0, 2.0])).unwrap();
        assert_eq!(json, r#"{"vec2":[1.0,2.0]}"#);
    }
}
