//! Per-face bounce light synthesis and the parallel pass over a level.

use std::sync::atomic::{AtomicUsize, Ordering};

use bounce_geom::Vec3;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::level::{
    DirectLighting, Face, Level, SKIP_TEXTURE, StyleColors, TextureColors, Visibility,
};
use crate::patch::{Patch, make_patch};
use crate::registry::{BounceLights, BounceRegistry, BounceSource};
use crate::settings::BounceSettings;

/// Display range the direct light sampler works in.
pub const COLOR_RANGE: f32 = 255.0;
/// Texture color used when a face's texture cannot be resolved.
pub const FALLBACK_TEXTURE_COLOR: u8 = 127;

/// Whether a face takes part in bounce generation. Failing faces are skipped
/// silently.
pub fn face_should_bounce(level: &Level, face: &Face) -> bool {
    match level.model_for_face(face) {
        Some(m) if m.shadow => {}
        _ => return false,
    }
    if !face.lightmapped {
        return false;
    }
    if face.texture.eq_ignore_ascii_case(SKIP_TEXTURE) {
        return false;
    }
    !face.flags.no_bounce
}

/// Average texture color of a face scaled to 0..1, mid-gray when unknown.
pub fn face_texture_color<T: TextureColors + ?Sized>(textures: &T, face: &Face) -> Vec3 {
    let [r, g, b] = textures
        .average_color(&face.texture)
        .unwrap_or([FALLBACK_TEXTURE_COLOR; 3]);
    Vec3::new(r as f32, g as f32, b as f32) / COLOR_RANGE
}

/// What a single face emits, before it is registered.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceEmission {
    /// Face midpoint lifted one unit along the normal.
    pub pos: Vec3,
    pub normal: Vec3,
    /// Area of the whole face.
    pub area: f32,
    pub color_by_style: StyleColors,
}

/// Area-weighted average of the patch colors per style, divided down to a
/// 0..1 range. `None` when the patches cover less than one unit of area.
pub fn average_patch_light(patches: &[Patch]) -> Option<StyleColors> {
    let mut sum = StyleColors::new();
    let mut total_area = 0.0f32;
    for patch in patches {
        let patch_area = patch.area();
        total_area += patch_area;
        for (&style, &color) in &patch.light_by_style {
            *sum.entry(style).or_insert(Vec3::ZERO) += color * patch_area;
        }
    }

    // tiny or zero-area patch sets would divide into garbage
    if total_area < 1.0 {
        return None;
    }

    for color in sum.values_mut() {
        *color *= 1.0 / total_area;
        *color /= COLOR_RANGE;
    }
    Some(sum)
}

/// Runs the per-face steps short of registration: winding checks, dicing,
/// sampling, averaging and the texture blend. Eligibility is the caller's
/// concern.
pub fn compute_face_emission<L, T>(
    face: &Face,
    settings: &BounceSettings,
    lighting: &L,
    textures: &T,
) -> Option<FaceEmission>
where
    L: DirectLighting + ?Sized,
    T: TextureColors + ?Sized,
{
    let winding = face.winding();
    let face_area = winding.area();
    if face_area <= 0.0 || !face_area.is_finite() {
        log::trace!("bounce: degenerate face skipped");
        return None;
    }

    let Some(face_plane) = winding.surface_plane() else {
        log::trace!("bounce: face normal unresolved");
        return None;
    };
    let pos = winding.center() + face_plane.normal;

    let mut patches = Vec::new();
    winding.dice(settings.patch_size, &mut |w| patches.extend(make_patch(w, lighting)));

    let Some(averaged) = average_patch_light(&patches) else {
        log::trace!("bounce: patches cover under one unit of area");
        return None;
    };

    let total = averaged.values().fold(Vec3::ZERO, |acc, &c| acc + c);
    if total.is_zero_exact() {
        return None;
    }
    if !total.is_finite() {
        log::trace!("bounce: non-finite aggregate skipped");
        return None;
    }

    // 0 keeps the bounce gray, 1 tints it fully by the texture
    let gray = Vec3::splat(FALLBACK_TEXTURE_COLOR as f32 / COLOR_RANGE);
    let blended = gray.lerp(face_texture_color(textures, face), settings.color_scale);

    let color_by_style = averaged
        .into_iter()
        .map(|(style, color)| (style, color.mul_elem(blended)))
        .collect();

    Some(FaceEmission {
        pos,
        normal: face_plane.normal,
        area: face_area,
        color_by_style,
    })
}

fn make_bounce_lights_for_face<L, T, V>(
    level: &Level,
    face_num: usize,
    settings: &BounceSettings,
    lighting: &L,
    textures: &T,
    vis: &V,
    registry: &BounceRegistry,
) where
    L: DirectLighting + ?Sized,
    T: TextureColors + ?Sized,
    V: Visibility + ?Sized,
{
    let face = &level.faces[face_num];
    if !face_should_bounce(level, face) {
        return;
    }
    let Some(emission) = compute_face_emission(face, settings, lighting, textures) else {
        return;
    };
    registry.add(
        BounceSource {
            face: face_num,
            poly: &face.points,
            pos: emission.pos,
            color_by_style: emission.color_by_style,
            surf_normal: emission.normal,
            area: emission.area,
        },
        vis,
    );
}

/// Percent done when finishing face `done` of `total` crosses into a new
/// tenth of the pass.
pub(crate) fn progress_percent(done: usize, total: usize) -> Option<usize> {
    if done == 0 || done > total {
        return None;
    }
    if (done * 10) / total > ((done - 1) * 10) / total {
        Some(done * 100 / total)
    } else {
        None
    }
}

/// Builds bounce lights for every face of `level` in parallel. Each face is
/// processed on its own; the registry append is the only shared write.
pub fn make_bounce_lights<L, T, V>(
    level: &Level,
    settings: &BounceSettings,
    lighting: &L,
    textures: &T,
    vis: &V,
) -> Result<BounceLights, rayon::ThreadPoolBuildError>
where
    L: DirectLighting + ?Sized,
    T: TextureColors + ?Sized,
    V: Visibility + ?Sized,
{
    log::info!("--- MakeBounceLights ---");
    let registry = BounceRegistry::new(settings.visapprox);

    let pool = ThreadPoolBuilder::new()
        .num_threads(settings.threads)
        .thread_name(|i| format!("bounce-{i}"))
        .build()?;
    let total = level.faces.len();
    let done = AtomicUsize::new(0);
    pool.install(|| {
        (0..total).into_par_iter().for_each(|face_num| {
            make_bounce_lights_for_face(
                level, face_num, settings, lighting, textures, vis, &registry,
            );
            let n = done.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(pct) = progress_percent(n, total) {
                log::debug!("bounce: {}% ({}/{} faces)", pct, n, total);
            }
        });
    });

    let lights = registry.finish();
    log::info!("{} bounce lights created", lights.len());
    log::debug!(
        "bounce: {} faces, {:.1} units^2 emitting",
        total,
        lights.total_area()
    );
    Ok(lights)
}
