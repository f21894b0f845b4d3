#![deny(unsafe_code)]
//! CLI binary for isoline.
//!
//! Subcommands:
//! - `render` -- composite a procedural field through a material, write PNG
//! - `probe <sample>` -- print fill, outline and final color for one sample
//! - `shader <material>` -- print the GLSL fragment shader and its uniforms
//! - `list` -- print available materials and shapes

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use isoline_core::glsl::{self, UniformValue};
use isoline_core::{Composite, Compositor, Shape};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "isoline", about = "Smooth threshold fill with a cubic pulse outline")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Composite a procedural field and write a PNG.
    Render {
        /// Material name (outline, tint).
        #[arg(short, long, default_value = "outline")]
        material: String,

        /// Field shape (gradient, disc, noise).
        #[arg(short, long, default_value = "disc")]
        shape: String,

        /// Image width in pixels.
        #[arg(short = 'W', long, default_value_t = 256)]
        width: usize,

        /// Image height in pixels.
        #[arg(short = 'H', long, default_value_t = 256)]
        height: usize,

        /// Material parameters as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Shape parameters as a JSON object.
        #[arg(long, default_value = "{}")]
        shape_params: String,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,
    },
    /// Composite a single field sample and print the result.
    Probe {
        /// Field sample in [0, 1].
        sample: f64,

        #[arg(short, long, default_value = "outline")]
        material: String,

        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Print the GLSL fragment shader and uniform values for a material.
    Shader {
        material: String,

        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// List available materials and shapes.
    List,
}

fn parse_json(flag: &str, raw: &str) -> Result<Value, CliError> {
    serde_json::from_str(raw).map_err(|e| CliError::Input(format!("invalid {flag} JSON: {e}")))
}

fn uniform_json(value: UniformValue) -> Value {
    match value {
        UniformValue::Vec2(v) => json!(v),
        UniformValue::Vec4(v) => json!(v),
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let materials = Compositor::list_names();
            let shapes = Shape::list_names();
            if cli.json {
                let info = json!({
                    "materials": materials,
                    "shapes": shapes,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Materials:");
                for name in materials {
                    println!("  {name}");
                }
                println!("Shapes:");
                println!("  {}", shapes.join(", "));
            }
        }
        Command::Probe {
            sample,
            material,
            params,
        } => {
            if !(0.0..=1.0).contains(&sample) {
                return Err(CliError::Input(format!(
                    "sample must be in [0, 1], got {sample}"
                )));
            }
            let params = parse_json("--params", &params)?;
            let compositor = Compositor::from_name(&material, &params)?;
            let color = compositor.composite(sample);

            let mut info = json!({
                "material": compositor.name(),
                "sample": sample,
                "color": color,
            });
            if let Compositor::Outline(outline) = &compositor {
                let detail = outline.evaluate(sample);
                info["fill"] = json!(detail.fill);
                info["outline"] = json!(detail.outline);
            }

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                if let Compositor::Outline(outline) = &compositor {
                    println!("fill     {:.6}", outline.fill(sample));
                    println!("outline  {:.6}", outline.outline(sample));
                }
                println!(
                    "color    ({:.6}, {:.6}, {:.6}, {:.6}) {}",
                    color.r,
                    color.g,
                    color.b,
                    color.a,
                    color.to_hex()
                );
            }
        }
        Command::Shader { material, params } => {
            let params = parse_json("--params", &params)?;
            let compositor = Compositor::from_name(&material, &params)?;
            let fragment = glsl::fragment_shader(&compositor);
            let uniforms = glsl::uniforms(&compositor);

            if cli.json {
                let uniforms: serde_json::Map<String, Value> = uniforms
                    .iter()
                    .map(|u| (u.name.to_string(), uniform_json(u.value)))
                    .collect();
                let info = json!({
                    "material": compositor.name(),
                    "vertex": glsl::FULLSCREEN_VERTEX_SHADER,
                    "fragment": fragment,
                    "uniforms": uniforms,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print!("{fragment}");
                println!();
                for u in &uniforms {
                    println!("// {} = {}", u.name, uniform_json(u.value));
                }
            }
        }
        Command::Render {
            material,
            shape,
            width,
            height,
            params,
            shape_params,
            output,
        } => {
            let params = parse_json("--params", &params)?;
            let shape_params = parse_json("--shape-params", &shape_params)?;

            let compositor = Compositor::from_name(&material, &params)?;
            let field = Shape::from_name(&shape, &shape_params)?;
            log::debug!("rendering {material} over {field:?}");

            let pixels = isoline_raster::composite_grid(width, height, &field, &compositor)?;
            isoline_raster::snapshot::write_png(width, height, &pixels, &output)?;

            if cli.json {
                let info = json!({
                    "material": compositor.name(),
                    "params": compositor.params(),
                    "shape": shape,
                    "width": width,
                    "height": height,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {material} over {shape} ({width}x{height}) -> {}",
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("isoline").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn render_defaults_to_outline_over_disc() {
        match parse(&["render"]).command {
            Command::Render {
                material,
                shape,
                width,
                height,
                ..
            } => {
                assert_eq!(material, "outline");
                assert_eq!(shape, "disc");
                assert_eq!((width, height), (256, 256));
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn parse_json_rejects_malformed_input() {
        let err = parse_json("--params", "{oops").unwrap_err();
        assert_eq!(err.exit_code(), 12);
        assert!(err.to_string().contains("--params"));
    }

    #[test]
    fn probe_rejects_sample_outside_unit_range() {
        let err = run(parse(&["probe", "1.5"])).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn probe_unknown_material_is_compositor_error() {
        let err = run(parse(&["probe", "0.5", "--material", "glass"])).unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn shader_rejects_invalid_params() {
        let cli = parse(&["shader", "outline", "--params", r#"{"pulse_half_width": 0}"#]);
        assert_eq!(run(cli).unwrap_err().exit_code(), 10);
    }

    #[test]
    fn render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disc.png");
        let cli = parse(&[
            "render",
            "-W",
            "8",
            "-H",
            "8",
            "-o",
            path.to_str().unwrap(),
        ]);
        run(cli).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn uniform_json_flattens_vectors() {
        assert_eq!(uniform_json(UniformValue::Vec2([0.5, 0.25])), json!([0.5, 0.25]));
    }
}
