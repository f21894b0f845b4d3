//! GLSL ES 3.0 sources for running the compositors as fragment shaders.
//!
//! The shader bodies mirror the CPU implementations in [`crate::compositor`]
//! and read every tunable constant from a uniform, so the same
//! [`Compositor`] value configures both paths. These are plain strings; the
//! GL plumbing that compiles and draws them lives in `render` (feature
//! `render`).

use crate::compositor::Compositor;

/// Fullscreen triangle vertex shader.
///
/// Generates clip-space positions and `v_uv` from `gl_VertexID` alone, with
/// `v_uv.y = 0` on the top row so texture rows match [`crate::Field`] rows.
/// Draw three vertices with an empty VAO bound.
pub const FULLSCREEN_VERTEX_SHADER: &str = r#"#version 300 es
out vec2 v_uv;
void main() {
    vec2 corner = vec2((gl_VertexID << 1) & 2, gl_VertexID & 2);
    v_uv = vec2(corner.x, 1.0 - corner.y);
    gl_Position = vec4(corner * 2.0 - 1.0, 0.0, 1.0);
}
"#;

/// Smooth threshold fill with an accent outline band.
pub const OUTLINE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
uniform sampler2D u_field;
uniform vec2 u_fill_band;
uniform vec2 u_pulse;
uniform vec4 u_accent;
out vec4 frag_color;

float cubic_pulse(float c, float w, float x) {
    x = abs(x - c);
    if (x > w) return 0.0;
    x /= w;
    return 1.0 - x * x * (3.0 - 2.0 * x);
}

void main() {
    float d = texture(u_field, v_uv).r;
    float fill = smoothstep(u_fill_band.x, u_fill_band.y, d);
    float outline = cubic_pulse(u_pulse.x, u_pulse.y, d);
    frag_color = mix(vec4(vec3(fill), 1.0), u_accent, outline);
}
"#;

/// Flat `(c, c, blue, alpha)` tint.
pub const TINT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
uniform sampler2D u_field;
uniform vec2 u_tint;
out vec4 frag_color;

void main() {
    float c = texture(u_field, v_uv).r;
    frag_color = vec4(c, c, u_tint.x, u_tint.y);
}
"#;

/// Name of the sampler uniform both fragment shaders read the field from.
pub const FIELD_SAMPLER_UNIFORM: &str = "u_field";

/// A uniform value to upload before drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Vec2([f32; 2]),
    Vec4([f32; 4]),
}

/// A named uniform and its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    pub name: &'static str,
    pub value: UniformValue,
}

/// Returns the fragment shader source implementing `compositor`.
pub fn fragment_shader(compositor: &Compositor) -> &'static str {
    match compositor {
        Compositor::Outline(_) => OUTLINE_FRAGMENT_SHADER,
        Compositor::Tint(_) => TINT_FRAGMENT_SHADER,
    }
}

/// Returns the uniforms that configure [`fragment_shader`] for `compositor`.
///
/// Values are narrowed to `f32`, the precision of GLSL `highp float`.
pub fn uniforms(compositor: &Compositor) -> Vec<Uniform> {
    match compositor {
        Compositor::Outline(c) => {
            let config = c.config();
            let accent = config.accent;
            vec![
                Uniform {
                    name: "u_fill_band",
                    value: UniformValue::Vec2([config.fill_lo as f32, config.fill_hi as f32]),
                },
                Uniform {
                    name: "u_pulse",
                    value: UniformValue::Vec2([
                        config.pulse_center as f32,
                        config.pulse_half_width as f32,
                    ]),
                },
                Uniform {
                    name: "u_accent",
                    value: UniformValue::Vec4([
                        accent.r as f32,
                        accent.g as f32,
                        accent.b as f32,
                        accent.a as f32,
                    ]),
                },
            ]
        }
        Compositor::Tint(c) => {
            let config = c.config();
            vec![Uniform {
                name: "u_tint",
                value: UniformValue::Vec2([config.blue as f32, config.alpha as f32]),
            }]
        }
    }
}
