//! Render pipelines for each material/pass combination.

use crate::{
    frame::{Material, PassMode},
    vertex::{InstanceData, Vertex},
};

/// Depth/stencil format for the main pass. Stencil is cleared each frame with depth.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

/// The pipeline a draw is replayed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    Lit,
    /// Lit geometry seen through a mirror: the mirror matrix reverses winding, so the
    /// opposite faces are culled.
    LitMirrored,
    Sky,
    Unlit,
    Glass,
    Shadow,
}

impl PipelineKind {
    /// Pick the pipeline for a material drawn in a given pass.
    pub fn select(material: Material, mode: PassMode) -> Self {
        match (material, mode) {
            (_, PassMode::Shadow) => Self::Shadow,
            (Material::Sky, _) => Self::Sky,
            (Material::Unlit, _) => Self::Unlit,
            (Material::Glass, _) => Self::Glass,
            (Material::Lit, PassMode::Reflected) => Self::LitMirrored,
            (Material::Lit, PassMode::Direct) => Self::Lit,
        }
    }

    fn desc(self) -> PipelineDesc {
        let opaque = PipelineDesc {
            label: "Lit Pipeline",
            fragment_entry: "fs_lit",
            cull_mode: Some(wgpu::Face::Back),
            blend: Some(wgpu::BlendState::REPLACE),
            depth_write: true,
            depth_bias: wgpu::DepthBiasState::default(),
        };
        match self {
            Self::Lit => opaque,
            Self::LitMirrored => PipelineDesc {
                label: "Mirrored Lit Pipeline",
                cull_mode: Some(wgpu::Face::Front),
                ..opaque
            },
            Self::Sky => PipelineDesc {
                label: "Sky Pipeline",
                fragment_entry: "fs_unlit",
                cull_mode: None,
                ..opaque
            },
            Self::Unlit => PipelineDesc {
                label: "Unlit Pipeline",
                fragment_entry: "fs_unlit",
                cull_mode: None,
                ..opaque
            },
            Self::Glass => PipelineDesc {
                label: "Glass Pipeline",
                fragment_entry: "fs_unlit",
                cull_mode: None,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                ..opaque
            },
            // Shadows sit on their receiving plane: pull them forward and don't write depth.
            Self::Shadow => PipelineDesc {
                label: "Planar Shadow Pipeline",
                fragment_entry: "fs_shadow",
                cull_mode: None,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                depth_write: false,
                depth_bias: wgpu::DepthBiasState {
                    constant: -4,
                    slope_scale: -1.0,
                    clamp: 0.0,
                },
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PipelineDesc {
    label: &'static str,
    fragment_entry: &'static str,
    cull_mode: Option<wgpu::Face>,
    blend: Option<wgpu::BlendState>,
    depth_write: bool,
    depth_bias: wgpu::DepthBiasState,
}

/// Bind group layout for the projection uniform (group 0).
pub fn create_globals_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Globals Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Every pipeline the scene shader is used with.
pub struct Pipelines {
    lit: wgpu::RenderPipeline,
    lit_mirrored: wgpu::RenderPipeline,
    sky: wgpu::RenderPipeline,
    unlit: wgpu::RenderPipeline,
    glass: wgpu::RenderPipeline,
    shadow: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        globals_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[globals_layout],
            push_constant_ranges: &[],
        });
        let build = |kind: PipelineKind| {
            create_pipeline(device, &layout, &shader, color_format, kind.desc())
        };

        Self {
            lit: build(PipelineKind::Lit),
            lit_mirrored: build(PipelineKind::LitMirrored),
            sky: build(PipelineKind::Sky),
            unlit: build(PipelineKind::Unlit),
            glass: build(PipelineKind::Glass),
            shadow: build(PipelineKind::Shadow),
        }
    }

    pub fn get(&self, kind: PipelineKind) -> &wgpu::RenderPipeline {
        match kind {
            PipelineKind::Lit => &self.lit,
            PipelineKind::LitMirrored => &self.lit_mirrored,
            PipelineKind::Sky => &self.sky,
            PipelineKind::Unlit => &self.unlit,
            PipelineKind::Glass => &self.glass,
            PipelineKind::Shadow => &self.shadow,
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    desc: PipelineDesc,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout(), InstanceData::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(desc.fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: desc.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: desc.depth_write,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: desc.depth_bias,
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
