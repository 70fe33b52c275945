use std::collections::HashMap;

use crate::backend::types::{Primitive, ProgramId, VertexLayout};

use super::targets::{COLOR_FORMAT, DEPTH_FORMAT};

/// A program is only a pair of modules until it meets a vertex layout and a
/// primitive mode; the pipeline is built on first draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(super) struct PipelineKey {
    pub program: ProgramId,
    pub layout: VertexLayout,
    pub primitive: Primitive,
}

pub(super) struct PipelineCache {
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

impl PipelineCache {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen uniform block bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lumen pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        Self {
            bind_group_layout,
            pipeline_layout,
            pipelines: HashMap::new(),
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn get_or_create(
        &mut self,
        device: &wgpu::Device,
        key: PipelineKey,
        vertex: &wgpu::ShaderModule,
        fragment: &wgpu::ShaderModule,
    ) -> &wgpu::RenderPipeline {
        let layout = &self.pipeline_layout;
        self.pipelines
            .entry(key)
            .or_insert_with(|| create_pipeline(device, layout, key, vertex, fragment))
    }

    /// Drops every pipeline built for `program`.
    pub fn evict(&mut self, program: ProgramId) {
        self.pipelines.retain(|k, _| k.program != program);
    }

    pub fn clear(&mut self) {
        self.pipelines.clear();
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    key: PipelineKey,
    vertex: &wgpu::ShaderModule,
    fragment: &wgpu::ShaderModule,
) -> wgpu::RenderPipeline {
    log::debug!(
        "building pipeline: program {} stride {} {:?}",
        key.program.raw(),
        key.layout.stride,
        key.primitive
    );

    let attributes: Vec<wgpu::VertexAttribute> = key
        .layout
        .attributes
        .iter()
        .map(|a| wgpu::VertexAttribute {
            format: vertex_format(a.components),
            offset: u64::from(a.offset) * std::mem::size_of::<f32>() as u64,
            shader_location: a.location,
        })
        .collect();

    let topology = match key.primitive {
        Primitive::Triangles => wgpu::PrimitiveTopology::TriangleList,
        Primitive::Points => wgpu::PrimitiveTopology::PointList,
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("lumen draw pipeline"),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module: vertex,
            entry_point: None,
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: key.layout.stride_bytes(),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &attributes,
            }],
        },

        fragment: Some(wgpu::FragmentState {
            module: fragment,
            entry_point: None,
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: COLOR_FORMAT,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),

        multiview_mask: None,
        cache: None,
    })
}

fn vertex_format(components: u32) -> wgpu::VertexFormat {
    match components {
        1 => wgpu::VertexFormat::Float32,
        2 => wgpu::VertexFormat::Float32x2,
        3 => wgpu::VertexFormat::Float32x3,
        _ => wgpu::VertexFormat::Float32x4,
    }
}
