/// The current solid, its transformed mesh and the active projection
use tracing::{info, warn};

use crate::action::{Action, TransformKind};
use crate::error::Result;
use crate::polyhedron::{Polyhedron, SolidKind};
use crate::projection::{Frame, ProjectionConfig, ProjectionMode, Viewport};

/// What the event loop should do after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

/// Owns the polyhedron being viewed; every mutation goes through here
#[derive(Debug, Clone)]
pub struct Scene {
    kind: SolidKind,
    polyhedron: Polyhedron,
    mode: ProjectionMode,
    config: ProjectionConfig,
}

impl Scene {
    pub fn new(kind: SolidKind, mode: ProjectionMode, config: ProjectionConfig) -> Self {
        Self {
            kind,
            polyhedron: Polyhedron::from_kind(kind),
            mode,
            config,
        }
    }

    pub fn kind(&self) -> SolidKind {
        self.kind
    }

    pub fn polyhedron(&self) -> &Polyhedron {
        &self.polyhedron
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Replace the mesh with a freshly built solid.
    pub fn set_solid(&mut self, kind: SolidKind) {
        self.kind = kind;
        self.polyhedron = Polyhedron::from_kind(kind);
        info!(solid = %kind, "switched solid");
    }

    pub fn set_projection(&mut self, mode: ProjectionMode) {
        self.mode = mode;
        info!(projection = %mode, "switched projection");
    }

    /// Discard all transforms applied to the current solid.
    pub fn reset(&mut self) {
        self.polyhedron = Polyhedron::from_kind(self.kind);
        info!(solid = %self.kind, "reset");
    }

    /// Build the matrix for `kind` against the current mesh and apply it.
    pub fn apply(&mut self, kind: &TransformKind) -> Result<()> {
        let matrix = kind.matrix(&self.polyhedron)?;
        self.polyhedron.apply_transform(&matrix)
    }

    /// Run one action. On failure the scene is left unchanged.
    pub fn handle(&mut self, action: &Action) -> Result<Outcome> {
        match action {
            Action::SwitchSolid(kind) => self.set_solid(*kind),
            Action::SwitchProjection(mode) => self.set_projection(*mode),
            Action::Reset => self.reset(),
            Action::Quit => return Ok(Outcome::Quit),
            Action::Apply(kind) => {
                if let Err(e) = self.apply(kind) {
                    warn!(action = %kind, error = %e, "transform rejected");
                    return Err(e);
                }
            }
        }
        Ok(Outcome::Continue)
    }

    pub fn frame(&self, viewport: Viewport) -> Frame {
        Frame::project(&self.polyhedron, self.mode, &self.config, viewport)
    }

    /// `"<solid> - V: <vertices> F: <faces>"`
    pub fn summary(&self) -> String {
        format!(
            "{} - V: {} F: {}",
            self.kind,
            self.polyhedron.vertices().len(),
            self.polyhedron.faces().len()
        )
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(
            SolidKind::Tetrahedron,
            ProjectionMode::Axonometric,
            ProjectionConfig::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{parse_script, Preset};
    use crate::error::GeometryError;
    use crate::geometry::Point;
    use approx::assert_abs_diff_eq;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn test_default_scene() {
        let scene = Scene::default();
        assert_eq!(scene.kind(), SolidKind::Tetrahedron);
        assert_eq!(scene.mode(), ProjectionMode::Axonometric);
        assert_eq!(scene.summary(), "Tetrahedron - V: 4 F: 4");
    }

    #[test]
    fn test_switch_and_reset() {
        let mut scene = Scene::default();
        scene.handle(&Action::SwitchSolid(SolidKind::Hexahedron)).unwrap();
        scene
            .handle(&Action::Apply(TransformKind::Translate {
                dx: 1.0,
                dy: 0.0,
                dz: 0.0,
            }))
            .unwrap();
        assert_eq!(scene.polyhedron().centroid(), Point::new(1.0, 0.0, 0.0));

        scene.handle(&Action::Reset).unwrap();
        assert_eq!(scene.kind(), SolidKind::Hexahedron);
        assert_eq!(scene.polyhedron(), &Polyhedron::hexahedron());
    }

    #[test]
    fn test_quit_outcome() {
        let mut scene = Scene::default();
        assert_eq!(scene.handle(&Action::Quit), Ok(Outcome::Quit));
        assert_eq!(
            scene.handle(&Action::SwitchProjection(ProjectionMode::Perspective)),
            Ok(Outcome::Continue)
        );
        assert_eq!(scene.mode(), ProjectionMode::Perspective);
    }

    #[test]
    fn test_failed_transform_keeps_mesh() {
        let mut scene = Scene::default();
        let before = scene.polyhedron().clone();
        let result = scene.handle(&Action::Apply(TransformKind::RotateLine {
            point: Point::origin(),
            direction: Vector3::zeros(),
            angle: 45.0,
        }));
        assert_eq!(result, Err(GeometryError::ZeroLengthDirection));
        assert_eq!(scene.polyhedron(), &before);
    }

    #[test]
    fn test_center_presets_keep_centroid() {
        let mut scene = Scene::default();
        scene
            .apply(&TransformKind::Translate {
                dx: 2.0,
                dy: -1.0,
                dz: 0.5,
            })
            .unwrap();
        for preset in [
            Preset::ScaleUp,
            Preset::ScaleDown,
            Preset::RotateCenterX,
            Preset::RotateCenterY,
            Preset::RotateCenterZ,
        ] {
            scene.apply(&preset.transform()).unwrap();
            assert_abs_diff_eq!(
                scene.polyhedron().centroid().position,
                Point3::new(2.0, -1.0, 0.5),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_every_preset_applies() {
        for kind in SolidKind::ALL {
            let mut scene = Scene::new(kind, ProjectionMode::Perspective, ProjectionConfig::default());
            for preset in Preset::ALL {
                scene.apply(&preset.transform()).unwrap();
            }
            let frame = scene.frame(Viewport::default());
            assert_eq!(frame.vertices.len(), scene.polyhedron().vertices().len());
        }
    }

    #[test]
    fn test_script_round() {
        let actions = parse_script("solid cube\nrotate-x 90\nprojection perspective\n").unwrap();
        let mut scene = Scene::default();
        for action in &actions {
            scene.handle(action).unwrap();
        }
        assert_abs_diff_eq!(
            scene.polyhedron().vertices()[7].position,
            Point3::new(1.0, -1.0, 1.0),
            epsilon = 1e-9
        );
        assert_eq!(scene.mode(), ProjectionMode::Perspective);
    }
}
