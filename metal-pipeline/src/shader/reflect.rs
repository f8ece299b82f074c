use super::{ScalarKind, ShaderDataType, ShaderFunction, ShaderInterface, ShaderStage, VertexInput};
use crate::{PipelineError, Result};
use regex::Regex;
use std::collections::HashMap;

/*
Reflects the shader functions and vertex inputs declared in Metal Shading Language source, without
invoking the Metal compiler. Given...

    struct VertexIn {
      float4 position [[ attribute(0) ]];
    };

    vertex float4 vertex_main(const VertexIn vertex_in [[ stage_in ]]) { ... }
    fragment float4 fragment_main() { ... }

... this function returns...

    ShaderInterface {
        functions: vec![
            ShaderFunction {
                name: "vertex_main",
                stage: ShaderStage::Vertex,
                stage_in: vec![VertexInput { attribute: 0, name: "position", data_type: float4 }],
            },
            ShaderFunction { name: "fragment_main", stage: ShaderStage::Fragment, stage_in: vec![] },
        ]
    }

Only what pipeline validation needs is extracted: entry point names, their stage and the
`[[attribute(n)]]` members of the `[[stage_in]]` struct.
*/
pub fn reflect_shader(source: &str) -> Result<ShaderInterface> {
    // Example: /* ... */ or // ...
    let rx_comment = Regex::new(r"(?s)/\*.*?\*/|//[^\n]*").unwrap();

    // Example: struct VertexIn { float4 position [[ attribute(0) ]]; };
    let rx_struct = Regex::new(r"struct\s+(?P<name>\w+)\s*\{(?P<body>[^}]*)\}").unwrap();

    // Example: float4 position [[ attribute(0) ]]
    let rx_attribute = Regex::new(
        r"(?P<data_type>[\w:]+)\s+(?P<name>\w+)\s*\[\[\s*attribute\s*\(\s*(?P<index>\d+)\s*\)\s*\]\]",
    )
    .unwrap();

    // Example: vertex float4 vertex_main(
    // Example: [[vertex]] float4 vertex_main(
    let rx_fn = Regex::new(
        r"(?:\[\[\s*(?P<attr_stage>vertex|fragment|kernel)\s*\]\]|\b(?P<stage>vertex|fragment|kernel))\s+(?P<return_type>[\w:<>]+)\s+(?P<fn_name>\w+)\s*\(",
    )
    .unwrap();

    // Example: const VertexIn vertex_in [[ stage_in ]]
    let rx_stage_in = Regex::new(
        r"^\s*(?:const\s+)?(?P<data_type>[\w:]+)\s*&?\s*(?P<name>\w+)\s*\[\[\s*stage_in\s*\]\]",
    )
    .unwrap();

    let source = rx_comment.replace_all(source, "");

    let mut structs = HashMap::<&str, Vec<VertexInput>>::new();
    for c in rx_struct.captures_iter(&source) {
        let mut inputs = vec![];
        for a in rx_attribute.captures_iter(c.name("body").map_or("", |m| m.as_str())) {
            let attribute = a["index"].parse::<u32>().map_err(|e| {
                PipelineError::ShaderReflection(format!(
                    "Invalid attribute index ({}): {e}",
                    &a["index"]
                ))
            })?;
            inputs.push(VertexInput {
                attribute,
                name: a["name"].to_owned(),
                data_type: parse_data_type(&a["data_type"])?,
            });
        }
        if let Some(name) = c.name("name") {
            structs.insert(name.as_str(), inputs);
        }
    }

    let mut functions = vec![];
    for c in rx_fn.captures_iter(&source) {
        let stage = match c
            .name("attr_stage")
            .or_else(|| c.name("stage"))
            .map(|m| m.as_str())
        {
            Some("vertex") => ShaderStage::Vertex,
            Some("fragment") => ShaderStage::Fragment,
            _ => ShaderStage::Kernel,
        };
        let name = c["fn_name"].to_owned();
        let params_start = c.get(0).map_or(0, |m| m.end());
        let params = matching_params(&source[params_start..]).ok_or_else(|| {
            PipelineError::ShaderReflection(format!(
                "Unterminated parameter list for function '{name}'"
            ))
        })?;

        let mut stage_in = vec![];
        for param in split_top_level(params) {
            if let Some(p) = rx_stage_in.captures(param) {
                let data_type = &p["data_type"];
                let data_type = data_type.strip_prefix("metal::").unwrap_or(data_type);
                stage_in = structs.get(data_type).cloned().ok_or_else(|| {
                    PipelineError::ShaderReflection(format!(
                        "[[stage_in]] type '{data_type}' of '{name}' is not a struct declared in the source"
                    ))
                })?;
            }
        }
        functions.push(ShaderFunction {
            name,
            stage,
            stage_in,
        });
    }

    Ok(ShaderInterface { functions })
}

fn parse_data_type(data_type: &str) -> Result<ShaderDataType> {
    let name = data_type.strip_prefix("metal::").unwrap_or(data_type);
    let unpacked = name.strip_prefix("packed_").unwrap_or(name);
    let scalar_end = unpacked
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(unpacked.len());
    let (scalar, components) = unpacked.split_at(scalar_end);
    let kind = match scalar {
        "float" | "half" => ScalarKind::Float,
        "int" | "short" | "char" => ScalarKind::Int,
        "uint" | "ushort" | "uchar" => ScalarKind::UInt,
        _ => {
            return Err(PipelineError::ShaderReflection(format!(
                "Unsupported vertex input type '{data_type}'"
            )))
        }
    };
    let components = match components {
        "" => 1,
        "2" => 2,
        "3" => 3,
        "4" => 4,
        _ => {
            return Err(PipelineError::ShaderReflection(format!(
                "Unsupported vertex input vector width '{data_type}'"
            )))
        }
    };
    Ok(ShaderDataType {
        name: name.to_owned(),
        kind,
        components,
    })
}

// Returns the text up to the `)` closing an already opened parameter list.
fn matching_params(s: &str) -> Option<&str> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(&s[..i]),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn split_top_level(params: &str) -> impl Iterator<Item = &str> {
    let mut parts = vec![];
    let mut depth = 0isize;
    let mut start = 0;
    for (i, c) in params.char_indices() {
        match c {
            '(' | '[' | '<' => depth += 1,
            ')' | ']' | '>' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&params[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&params[start..]);
    parts.into_iter().filter(|p| !p.trim().is_empty())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shader::SPHERE_SHADER;
    use pretty_assertions::assert_eq;

    fn float(components: u8) -> ShaderDataType {
        ShaderDataType {
            name: match components {
                1 => "float".to_owned(),
                n => format!("float{n}"),
            },
            kind: ScalarKind::Float,
            components,
        }
    }

    #[test]
    fn test_sphere_shader() {
        assert_eq!(
            reflect_shader(SPHERE_SHADER),
            Ok(ShaderInterface {
                functions: vec![
                    ShaderFunction {
                        name: "vertex_main".to_owned(),
                        stage: ShaderStage::Vertex,
                        stage_in: vec![VertexInput {
                            attribute: 0,
                            name: "position".to_owned(),
                            data_type: float(4),
                        }],
                    },
                    ShaderFunction {
                        name: "fragment_main".to_owned(),
                        stage: ShaderStage::Fragment,
                        stage_in: vec![],
                    },
                ]
            })
        );
    }

    #[test]
    fn test_attribute_syntax_and_comments() {
        let source = r#"
#include <metal_stdlib>
using namespace metal;

// vertex float4 commented_out(const Nope n [[ stage_in ]]) {}
struct In {
    packed_float3 position [[attribute(0)]];
    metal::half2  uv       [[ attribute( 2 ) ]];
    uint          id       [[attribute(5)]];
    float         ignored;
};

/*
fragment float4 also_commented_out() {}
*/
[[vertex]] float4 main_vertex(In in [[stage_in]], constant float4x4 & m [[buffer(1)]]) {
    return float4(in.position, 1);
}

[[fragment]] half4 main_fragment(float4 p [[position]]) { return half4(1); }

kernel void compute_main(uint tid [[thread_position_in_grid]]) {}
"#;
        assert_eq!(
            reflect_shader(source),
            Ok(ShaderInterface {
                functions: vec![
                    ShaderFunction {
                        name: "main_vertex".to_owned(),
                        stage: ShaderStage::Vertex,
                        stage_in: vec![
                            VertexInput {
                                attribute: 0,
                                name: "position".to_owned(),
                                data_type: ShaderDataType {
                                    name: "packed_float3".to_owned(),
                                    kind: ScalarKind::Float,
                                    components: 3,
                                },
                            },
                            VertexInput {
                                attribute: 2,
                                name: "uv".to_owned(),
                                data_type: ShaderDataType {
                                    name: "half2".to_owned(),
                                    kind: ScalarKind::Float,
                                    components: 2,
                                },
                            },
                            VertexInput {
                                attribute: 5,
                                name: "id".to_owned(),
                                data_type: ShaderDataType {
                                    name: "uint".to_owned(),
                                    kind: ScalarKind::UInt,
                                    components: 1,
                                },
                            },
                        ],
                    },
                    ShaderFunction {
                        name: "main_fragment".to_owned(),
                        stage: ShaderStage::Fragment,
                        stage_in: vec![],
                    },
                    ShaderFunction {
                        name: "compute_main".to_owned(),
                        stage: ShaderStage::Kernel,
                        stage_in: vec![],
                    },
                ]
            })
        );
    }

    #[test]
    fn test_unknown_stage_in_struct() {
        let source = "vertex float4 v(const Missing m [[ stage_in ]]) { return 0; }";
        assert!(matches!(
            reflect_shader(source),
            Err(PipelineError::ShaderReflection(msg)) if msg.contains("'Missing'")
        ));
    }

    #[test]
    fn test_unsupported_input_type() {
        let source = "struct In { float4x4 m [[ attribute(0) ]]; };";
        assert!(matches!(
            reflect_shader(source),
            Err(PipelineError::ShaderReflection(msg)) if msg.contains("float4x4")
        ));
    }

    #[test]
    fn test_unterminated_params() {
        assert!(matches!(
            reflect_shader("fragment float4 f(float4 p [[position]]"),
            Err(PipelineError::ShaderReflection(_))
        ));
    }
}
