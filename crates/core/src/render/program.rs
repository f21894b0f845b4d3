//! A linked compositor program plus the empty VAO the fullscreen triangle needs.

use crate::compositor::Compositor;
use crate::glsl::{self, UniformValue, FIELD_SAMPLER_UNIFORM, FULLSCREEN_VERTEX_SHADER};

use super::shader::{compile_program, ShaderError};
use super::texture::FieldTexture;

/// GPU counterpart of [`Compositor::composite`] applied to a whole field.
///
/// Built once per material; [`CompositorProgram::draw`] re-applies the
/// compositor's uniforms each call so parameters can change between frames
/// without relinking, as long as the material stays the same.
#[derive(Debug)]
pub struct CompositorProgram {
    material: &'static str,
    program: glow::Program,
    vao: glow::VertexArray,
}

impl CompositorProgram {
    /// Compiles and links the fragment shader for `compositor`'s material.
    #[allow(unsafe_code)]
    pub fn new(gl: &glow::Context, compositor: &Compositor) -> Result<Self, ShaderError> {
        use glow::HasContext;

        let program = compile_program(
            gl,
            FULLSCREEN_VERTEX_SHADER,
            glsl::fragment_shader(compositor),
        )?;
        // SAFETY: glow marks raw GL calls unsafe. The program is released if
        // the VAO cannot be created.
        let vao = match unsafe { gl.create_vertex_array() } {
            Ok(vao) => vao,
            Err(reason) => {
                unsafe { gl.delete_program(program) };
                return Err(ShaderError::Resource {
                    object: "vertex array",
                    reason,
                });
            }
        };

        log::debug!("linked {} compositor program", compositor.name());
        Ok(Self {
            material: compositor.name(),
            program,
            vao,
        })
    }

    /// Material name this program was linked for.
    pub fn material(&self) -> &'static str {
        self.material
    }

    /// Draws `field` through the compositor into the bound framebuffer.
    ///
    /// The caller owns the framebuffer and viewport. Returns
    /// `ShaderError::MaterialMismatch` if `compositor` is a different material
    /// than the one this program was built for.
    #[allow(unsafe_code)]
    pub fn draw(
        &self,
        gl: &glow::Context,
        field: &FieldTexture,
        compositor: &Compositor,
    ) -> Result<(), ShaderError> {
        use glow::HasContext;

        if compositor.name() != self.material {
            return Err(ShaderError::MaterialMismatch {
                program: self.material,
                requested: compositor.name(),
            });
        }

        // SAFETY: every handle was created on this context and is still live.
        unsafe {
            gl.use_program(Some(self.program));
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(field.texture()));
            let sampler = gl.get_uniform_location(self.program, FIELD_SAMPLER_UNIFORM);
            gl.uniform_1_i32(sampler.as_ref(), 0);

            for uniform in glsl::uniforms(compositor) {
                let location = gl.get_uniform_location(self.program, uniform.name);
                match uniform.value {
                    UniformValue::Vec2([x, y]) => gl.uniform_2_f32(location.as_ref(), x, y),
                    UniformValue::Vec4([x, y, z, w]) => {
                        gl.uniform_4_f32(location.as_ref(), x, y, z, w)
                    }
                }
            }

            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(glow::TRIANGLES, 0, 3);
            gl.bind_vertex_array(None);
            gl.bind_texture(glow::TEXTURE_2D, None);
            gl.use_program(None);
        }
        Ok(())
    }

    /// Releases the program and VAO.
    #[allow(unsafe_code)]
    pub fn delete(self, gl: &glow::Context) {
        use glow::HasContext;
        // SAFETY: both handles were created on this context and are consumed here.
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_program(self.program);
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    #[ignore = "requires GL context"]
    fn outline_program_draws_default_field() {
        // Would test: a 0.45 field renders as (147, 20, 20, 255) after readback.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn draw_rejects_other_material() {
        // Would test: an outline program returns MaterialMismatch for a tint compositor.
    }
}
