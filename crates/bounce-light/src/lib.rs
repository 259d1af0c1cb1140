//! Bounce light synthesis: turns directly lit faces into area lights for the
//! final gather.
#![forbid(unsafe_code)]

mod bounce;
mod level;
mod patch;
mod registry;
mod settings;

pub use bounce::{
    COLOR_RANGE, FALLBACK_TEXTURE_COLOR, FaceEmission, average_patch_light, compute_face_emission,
    face_should_bounce, face_texture_color, make_bounce_lights,
};
pub use level::{
    DirectLighting, Face, Level, LightStyle, Model, NoVisibility, SKIP_TEXTURE, StyleColors,
    SurfaceFlags, TextureColors, Visibility,
};
pub use patch::{Patch, make_patch};
pub use registry::{BounceLight, BounceLights, BounceRegistry, BounceSource, BounceVisibility};
pub use settings::{BounceSettings, DEFAULT_PATCH_SIZE, SettingsError, VisApprox};
