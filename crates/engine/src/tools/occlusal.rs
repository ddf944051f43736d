//! Occlusal proximity coloring.

use glam::Vec3;
use tracing::debug;

use dentsculpt_config::OcclusalConfig;

use crate::mesh::EditMesh;

/// Color every vertex by its distance to `reference`.
///
/// Vertices strictly closer than the contact threshold take the near color,
/// everything else (including distance exactly at the threshold) the far
/// color. The color attribute is overwritten and vertex coloring enabled.
/// Returns the number of near-contact vertices.
pub fn classify_occlusion(mesh: &mut EditMesh, reference: Vec3, config: &OcclusalConfig) -> usize {
    let mut near = 0;
    let colors: Vec<[f32; 3]> = mesh
        .positions()
        .iter()
        .map(|p| {
            if p.distance(reference) < config.contact_threshold {
                near += 1;
                config.near_color
            } else {
                config.far_color
            }
        })
        .collect();

    mesh.set_vertex_colors(colors);
    debug!(
        "occlusal: {}/{} vertices within {} of {:?}",
        near,
        mesh.vertex_count(),
        config.contact_threshold,
        reference
    );
    near
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::test_meshes::points;

    #[test]
    fn test_threshold_is_strict() {
        let config = OcclusalConfig::default();
        let mut mesh = points(&[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.49, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ]);

        let near = classify_occlusion(&mut mesh, Vec3::ZERO, &config);
        assert_eq!(near, 2);
        assert!(mesh.vertex_colors_enabled());
        let colors = mesh.colors().unwrap();
        assert_eq!(colors[0], config.near_color);
        assert_eq!(colors[1], config.near_color);
        assert_eq!(colors[2], config.far_color);
        assert_eq!(colors[3], config.far_color);
    }

    #[test]
    fn test_deterministic_and_overwrites() {
        let config = OcclusalConfig::default();
        let mut mesh = points(&[Vec3::ZERO, Vec3::X, Vec3::new(0.2, 0.1, 0.0)]);

        classify_occlusion(&mut mesh, Vec3::ZERO, &config);
        let first = mesh.colors().unwrap().to_vec();
        classify_occlusion(&mut mesh, Vec3::ZERO, &config);
        assert_eq!(mesh.colors().unwrap(), first.as_slice());

        // A new reference replaces the previous classification
        let near = classify_occlusion(&mut mesh, Vec3::X, &config);
        assert_eq!(near, 1);
        assert_eq!(mesh.colors().unwrap()[1], config.near_color);
        assert_eq!(mesh.colors().unwrap()[0], config.far_color);
    }
}
