//! OpenGL / WebGL2 execution of the compositors.
//!
//! Only available with the `render` feature. The shader sources and uniform
//! values come from [`crate::glsl`]; this module owns the GL objects.
//!
//! - [`shader`] -- compilation, linking and error formatting.
//! - [`texture`] -- uploading a [`crate::Field`] as an R8 texture.
//! - [`program`] -- a linked compositor program that draws a fullscreen triangle.

pub mod program;
pub mod shader;
pub mod texture;

pub use program::CompositorProgram;
pub use shader::{compile_program, compile_shader, format_shader_error, ShaderError, ShaderStage};
pub use texture::{field_texels, gl_filter, FieldTexture};
