//! Rendering layer.
//!
//! Everything here is generic over [`GraphicsApi`](crate::backend::GraphicsApi):
//! the same code drives a real window or the recording test double.
//!
//! Convention:
//! - right-handed world space, camera looks down -Z when unrotated
//! - host quaternions are scalar-first `(w, x, y, z)`; uniforms get `(x, y, z, w)`
//! - GPU objects are released explicitly (`release(self, ..)`), never on drop

mod background;
mod camera;
mod capture;
mod context;
mod drawable;
mod light;
mod pose;
mod shader;

pub use background::BackgroundStyle;
pub use camera::{Camera, FAR_PLANE, NEAR_PLANE};
pub use capture::{row_stride, FrameReadback, CAPTURE_ROW_ALIGNMENT};
pub use context::{ContextConfig, RenderContext, Strictness};
pub use drawable::{Cloud, Mesh, CLOUD_LAYOUT, MESH_LAYOUT};
pub use light::{LightSet, PointLight};
pub use pose::Pose;
pub(crate) use pose::{quat_from_host, vec3_from_host};
pub use shader::ShaderProgram;
