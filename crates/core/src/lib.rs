pub use animated::{AnimatedExt, MotionProperty, Property, ValueProvider};
pub use animator::{AnimatorEvent, FrameAnimator, Repeat};
pub use content::{resolve, ContentTree, ResolveOptions};
pub use error::Error;
pub use lerp::Lerp;
pub use renderer::{Brush, Canvas, Paint, PaintStyle, RecordingCanvas};
pub use stage::{Id, Stage, StagedContent, StagedLayer};
pub use transform::{RepeaterTransformProperty, TransformProperty};

mod animated;
mod animator;
mod content;
pub mod easing;
mod error;
mod lerp;
mod renderer;
pub mod shapes;
mod stage;
mod transform;

pub mod prelude {
    pub use crate::animated::{AnimatedExt, MotionProperty, Property};
    pub use crate::animator::{AnimatorEvent, FrameAnimator, Repeat};
    pub use crate::content::{ContentTree, ResolveOptions};
    pub use crate::renderer::{Brush, Canvas, Paint, PaintStyle};
    pub use crate::stage::{Id, Stage, StagedContent, StagedLayer};
    pub use kinetic_model::*;
}

use kinetic_model::Composition;

/// A composition staged for playback: the flattened layer tree plus a
/// frame animator sized to its range.
pub struct Animation {
    pub composition: Composition,
    stage: Stage,
    issues: Vec<String>,
}

impl Animation {
    pub fn new(composition: Composition, options: &ResolveOptions) -> Self {
        let stage = Stage::from_composition(&composition, options);
        let issues = stage.issues().to_vec();
        Animation {
            composition,
            stage,
            issues,
        }
    }

    /// Parses a document and stages it. Fatal document problems come
    /// back as the accumulated issue list.
    pub fn from_json(
        document: &serde_json::Value,
        options: &ResolveOptions,
    ) -> Result<(Self, Vec<String>), Vec<String>> {
        let (composition, mut issues) = kinetic_model::read(document);
        match composition {
            Some(composition) => {
                let animation = Animation::new(composition, options);
                issues.extend(animation.issues.iter().cloned());
                Ok((animation, issues))
            }
            None => Err(issues),
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    /// An animator spanning the composition's frame range.
    pub fn animator(&self) -> FrameAnimator {
        let mut animator = FrameAnimator::new();
        animator
            .set_composition_bounds(self.composition.start_frame, self.composition.end_frame);
        animator
    }

    /// Draws one frame onto the canvas.
    pub fn render(&self, frame: f64, canvas: &mut dyn Canvas) -> Result<(), Error> {
        self.stage.render(frame, canvas)
    }
}
