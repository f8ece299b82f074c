use metal_pipeline::{
    mesh::{generate_sphere, sphere_vertex_layout, SphereDescriptor},
    shader::{reflect_shader, SPHERE_SHADER},
    PipelineDescriptor, PipelineError, PixelFormat, PrimitiveType, VertexFormat,
};

#[test]
fn test_sphere_matches_shader_interface() {
    let mesh = generate_sphere(&SphereDescriptor {
        extent: [0.75, 0.75, 0.75],
        segments: [100, 100],
        ..Default::default()
    })
    .unwrap();
    assert!(!mesh.submeshes.is_empty());
    assert!(mesh.submeshes[0].indices.len() > 0);
    assert_eq!(mesh.submeshes[0].primitive, PrimitiveType::Triangle);

    let shader = reflect_shader(SPHERE_SHADER).unwrap();
    let desc = PipelineDescriptor::new(mesh.layout.clone(), PixelFormat::BGRA8Unorm);
    assert_eq!(desc.validate(&shader), Ok(()));
}

#[test]
fn test_layout_without_position_is_rejected() {
    let shader = reflect_shader(SPHERE_SHADER).unwrap();
    let mut layout = sphere_vertex_layout();
    for a in &mut layout.attributes {
        a.index += 1;
    }
    let desc = PipelineDescriptor::new(layout, PixelFormat::BGRA8Unorm);
    assert!(matches!(
        desc.validate(&shader),
        Err(PipelineError::VertexLayoutMismatch { .. })
    ));

    let mut layout = sphere_vertex_layout();
    layout.attributes[0].format = VertexFormat::Int4;
    layout.attributes[0].offset = 0;
    let desc = PipelineDescriptor::new(layout, PixelFormat::BGRA8Unorm);
    assert!(matches!(
        desc.validate(&shader),
        Err(PipelineError::VertexLayoutMismatch { .. })
    ));
}
