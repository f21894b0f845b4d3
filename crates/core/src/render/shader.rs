//! Shader compilation and linking for the compositor programs.
//!
//! `format_shader_error` is pure string processing and always testable; the
//! compile/link functions need a live `glow::Context`.

use std::fmt;

use thiserror::Error;

/// Programmable pipeline stage a source string is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// The GL enum passed to `create_shader`.
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors raised while building or driving a GPU compositor.
#[derive(Debug, Clone, Error)]
pub enum ShaderError {
    /// A stage failed to compile; `log` holds the numbered source and driver log.
    #[error("shader compile error ({stage}):\n{log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("shader link error:\n{0}")]
    Link(String),
    /// The driver refused to allocate a GL object.
    #[error("failed to create {object}: {reason}")]
    Resource {
        object: &'static str,
        reason: String,
    },
    /// The field is larger than a GL texture dimension can address.
    #[error("field of {width}x{height} texels exceeds GL texture limits")]
    TextureTooLarge { width: usize, height: usize },
    #[error("program linked for {program} cannot draw {requested}")]
    MaterialMismatch {
        program: &'static str,
        requested: &'static str,
    },
}

/// Prefixes each source line with a right-aligned line number and appends
/// the driver log, so `0:LINE` references in the log can be read in place.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let width = lines.len().max(1).to_string().len();
    let numbered = lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, true) => String::new(),
        (true, false) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

/// Compiles one stage. The shader is deleted again if compilation fails.
#[allow(unsafe_code)]
pub fn compile_shader(
    gl: &glow::Context,
    stage: ShaderStage,
    source: &str,
) -> Result<glow::Shader, ShaderError> {
    use glow::HasContext;

    // SAFETY: glow marks raw GL calls unsafe. The stage enum and source are
    // valid and the handle is released on the failure path.
    let shader = unsafe { gl.create_shader(stage.gl_enum()) }.map_err(|reason| {
        ShaderError::Resource {
            object: "shader",
            reason,
        }
    })?;

    let compiled = unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        gl.get_shader_compile_status(shader)
    };
    if compiled {
        return Ok(shader);
    }

    let info_log = unsafe { gl.get_shader_info_log(shader) };
    unsafe { gl.delete_shader(shader) };
    Err(ShaderError::Compile {
        stage,
        log: format_shader_error(source, &info_log),
    })
}

/// Compiles both stages and links them into a program.
///
/// Stage objects are always deleted before returning; the linked program
/// keeps what it needs.
#[allow(unsafe_code)]
pub fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program, ShaderError> {
    use glow::HasContext;

    let vertex = compile_shader(gl, ShaderStage::Vertex, vertex_src)?;
    let fragment = match compile_shader(gl, ShaderStage::Fragment, fragment_src) {
        Ok(shader) => shader,
        Err(e) => {
            // SAFETY: `vertex` came from a successful compile above.
            unsafe { gl.delete_shader(vertex) };
            return Err(e);
        }
    };

    let result = link(gl, vertex, fragment);
    // SAFETY: both handles are live shaders compiled on this context.
    unsafe {
        gl.delete_shader(vertex);
        gl.delete_shader(fragment);
    }
    result
}

#[allow(unsafe_code)]
fn link(
    gl: &glow::Context,
    vertex: glow::Shader,
    fragment: glow::Shader,
) -> Result<glow::Program, ShaderError> {
    use glow::HasContext;

    // SAFETY: `vertex` and `fragment` are live shaders on this context; the
    // program is deleted if linking fails.
    let program = unsafe { gl.create_program() }.map_err(|reason| ShaderError::Resource {
        object: "program",
        reason,
    })?;

    let linked = unsafe {
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);
        gl.detach_shader(program, vertex);
        gl.detach_shader(program, fragment);
        gl.get_program_link_status(program)
    };
    if linked {
        return Ok(program);
    }

    let info_log = unsafe { gl.get_program_info_log(program) };
    unsafe { gl.delete_program(program) };
    Err(ShaderError::Link(info_log))
}
