//! Uploading a [`Field`] as a single-channel GL texture.
//!
//! Values are quantized to R8 so the fragment shader reads `texture(..).r`
//! in [0, 1]. Wrapping is clamp-to-edge and the filter follows the field's
//! own [`Filter`], matching what [`FieldSampler`](crate::FieldSampler) does
//! on the CPU.

use crate::field::{Field, Filter};

use super::shader::ShaderError;

/// GL min/mag filter equivalent to a [`Filter`].
pub fn gl_filter(filter: Filter) -> u32 {
    match filter {
        Filter::Nearest => glow::NEAREST,
        Filter::Linear => glow::LINEAR,
    }
}

/// Quantizes field values to R8 texels, row 0 first.
pub fn field_texels(field: &Field) -> Vec<u8> {
    field
        .data()
        .iter()
        .map(|&v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
        .collect()
}

/// A field resident on the GPU.
#[derive(Debug)]
pub struct FieldTexture {
    texture: glow::Texture,
    width: i32,
    height: i32,
}

impl FieldTexture {
    /// Allocates an R8 texture and uploads `field` into it.
    #[allow(unsafe_code)]
    pub fn upload(gl: &glow::Context, field: &Field) -> Result<Self, ShaderError> {
        use glow::HasContext;

        let too_large = || ShaderError::TextureTooLarge {
            width: field.width(),
            height: field.height(),
        };
        let width = i32::try_from(field.width()).map_err(|_| too_large())?;
        let height = i32::try_from(field.height()).map_err(|_| too_large())?;
        let texels = field_texels(field);
        let filter = gl_filter(field.filter()) as i32;

        // SAFETY: glow marks raw GL calls unsafe. `texels` holds exactly
        // width * height bytes and unpack alignment is set to 1 for R8 rows.
        let texture = unsafe { gl.create_texture() }.map_err(|reason| ShaderError::Resource {
            object: "texture",
            reason,
        })?;
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, filter);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, filter);
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::R8 as i32,
                width,
                height,
                0,
                glow::RED,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(texels.as_slice())),
            );
            gl.bind_texture(glow::TEXTURE_2D, None);
        }

        log::debug!("uploaded {width}x{height} field texture");
        Ok(Self {
            texture,
            width,
            height,
        })
    }

    pub fn texture(&self) -> glow::Texture {
        self.texture
    }

    /// Texture size in texels as `(width, height)`.
    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Releases the GL texture.
    #[allow(unsafe_code)]
    pub fn delete(self, gl: &glow::Context) {
        use glow::HasContext;
        // SAFETY: the handle was created on this context and is consumed here.
        unsafe { gl.delete_texture(self.texture) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gl_filter_follows_field_filter() {
        assert_eq!(gl_filter(Filter::Nearest), glow::NEAREST);
        assert_eq!(gl_filter(Filter::Linear), glow::LINEAR);
    }

    #[test]
    fn field_texels_round_to_nearest_byte() {
        let field = Field::from_data(4, 1, vec![0.0, 0.5, 0.2, 1.0]).unwrap();
        assert_eq!(field_texels(&field), vec![0, 128, 51, 255]);
    }

    #[test]
    fn field_texels_keep_row_major_order() {
        let field = Field::from_data(2, 2, vec![0.0, 1.0, 1.0, 0.0]).unwrap();
        assert_eq!(field_texels(&field), vec![0, 255, 255, 0]);
    }

    #[test]
    #[ignore = "requires GL context"]
    fn upload_creates_r8_texture() {
        // Would test: FieldTexture::upload returns a texture of the field's size.
    }
}
