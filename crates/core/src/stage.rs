//! Flattens a composition into renderable layers: document order is
//! reversed so the top layer draws last, precompositions expand into
//! child layers, and parent references become stable slotmap ids.

use glam::Mat4;
use kinetic_model::{Asset, Composition, FillRule, Layer, LayerContent, Rgba, Vector2D};
use slotmap::SlotMap;

use crate::content::{resolve, ContentTree, ResolveOptions};
use crate::renderer::{Brush, Canvas, Paint, PaintStyle};
use crate::shapes;
use crate::transform::TransformProperty;
use crate::Error;

slotmap::new_key_type! {
    pub struct Id;
}

const MAX_PRECOMP_DEPTH: usize = 16;

pub enum StagedContent {
    Shape(ContentTree),
    Solid {
        color: Rgba,
        width: f32,
        height: f32,
    },
    /// Precomposition hosts and empty layers carry transform only.
    Group,
}

/// A layer lifted out of the document, ready for per-frame evaluation.
pub struct StagedLayer {
    pub id: Id,
    pub name: Option<String>,
    pub content: StagedContent,
    pub parent: Option<Id>,
    pub transform: TransformProperty,
    pub start_frame: f64,
    pub end_frame: f64,
    pub start_time: f64,
    pub time_stretch: f64,
}

impl StagedLayer {
    /// This layer's own frame counter: the composition frame shifted by
    /// the start time and divided by the stretch factor.
    pub fn local_frame(&self, frame: f64) -> f64 {
        let stretch = if self.time_stretch == 0.0 {
            1.0
        } else {
            self.time_stretch
        };
        (frame - self.start_time) / stretch
    }

    pub fn visible(&self, frame: f64) -> bool {
        let local = self.local_frame(frame);
        local >= self.start_frame && local < self.end_frame
    }
}

pub struct Stage {
    store: SlotMap<Id, StagedLayer>,
    order: Vec<Id>,
    issues: Vec<String>,
}

impl Stage {
    pub fn from_composition(composition: &Composition, options: &ResolveOptions) -> Stage {
        let mut stage = Stage {
            store: SlotMap::with_key(),
            order: Vec::new(),
            issues: Vec::new(),
        };
        stage.stage_layers(&composition.layers, composition, options, None, 0.0, 0);
        stage
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    /// Layers in render order, bottom first.
    pub fn layers(&self) -> impl Iterator<Item = &StagedLayer> {
        self.order.iter().filter_map(|id| self.store.get(*id))
    }

    pub fn layer(&self, id: Id) -> Option<&StagedLayer> {
        self.store.get(id)
    }

    fn stage_layers(
        &mut self,
        layers: &[Layer],
        composition: &Composition,
        options: &ResolveOptions,
        parent: Option<Id>,
        start_time: f64,
        depth: usize,
    ) {
        let mut index_map: Vec<(u32, Id)> = Vec::new();
        let mut deferred: Vec<(Id, u32)> = Vec::new();
        // Document order is top-to-bottom; render order is the reverse.
        for layer in layers.iter().rev() {
            if layer.hidden {
                continue;
            }
            let content = match &layer.content {
                LayerContent::Shape(group) => {
                    let (tree, mut issues) = resolve(&group.shapes, options);
                    self.issues.append(&mut issues);
                    StagedContent::Shape(tree)
                }
                LayerContent::SolidColor {
                    color,
                    width,
                    height,
                } => StagedContent::Solid {
                    color: *color,
                    width: *width,
                    height: *height,
                },
                _ => StagedContent::Group,
            };
            let transform = TransformProperty::new(
                layer.transform.clone().unwrap_or_default(),
                layer.auto_orient,
            );
            let id = self.store.insert_with_key(|key| StagedLayer {
                id: key,
                name: layer.name.clone(),
                content,
                parent,
                transform,
                start_frame: layer.start_frame,
                end_frame: layer.end_frame,
                start_time: start_time + layer.start_time,
                time_stretch: layer.time_stretch,
            });
            self.order.push(id);
            if let Some(index) = layer.index {
                index_map.push((index, id));
            }
            if let Some(parent_index) = layer.parent_index {
                if layer.index == Some(parent_index) {
                    log::warn!("layer {:?} parents itself; detached", layer.name);
                    self.issues
                        .push(format!("layer {:?} parents itself", layer.name));
                } else {
                    deferred.push((id, parent_index));
                }
            }
            if let LayerContent::PreComposition(reference) = &layer.content {
                self.expand_precomposition(&reference.ref_id, composition, options, id, depth);
            }
        }
        // Parent references resolve within this expansion scope only.
        for (child, parent_index) in deferred {
            match index_map.iter().find(|(index, _)| *index == parent_index) {
                Some((_, parent_id)) => {
                    if let Some(layer) = self.store.get_mut(child) {
                        layer.parent = Some(*parent_id);
                    }
                }
                None => self
                    .issues
                    .push(format!("parent index {parent_index} not found")),
            }
        }
    }

    fn expand_precomposition(
        &mut self,
        ref_id: &str,
        composition: &Composition,
        options: &ResolveOptions,
        host: Id,
        depth: usize,
    ) {
        if depth >= MAX_PRECOMP_DEPTH {
            self.issues
                .push(format!("precomposition {ref_id:?} nested too deeply"));
            return;
        }
        match composition.asset(ref_id) {
            Some(Asset::PreComposition(asset)) => {
                let start_time = self
                    .store
                    .get(host)
                    .map(|l| l.start_time)
                    .unwrap_or_default();
                self.stage_layers(
                    &asset.layers,
                    composition,
                    options,
                    Some(host),
                    start_time,
                    depth + 1,
                );
            }
            Some(Asset::Image(_)) | None => {
                self.issues
                    .push(format!("precomposition asset {ref_id:?} not found"));
            }
        }
    }

    /// Accumulated transform and opacity along the parent chain, or
    /// `None` when the layer or one of its ancestors is outside its
    /// visibility window.
    fn chain(&self, layer: &StagedLayer, frame: f64) -> Result<Option<(Mat4, f32)>, Error> {
        if !layer.visible(frame) {
            return Ok(None);
        }
        let mut matrix = layer.transform.matrix(layer.local_frame(frame))?;
        let mut alpha = layer.transform.opacity.sample(layer.local_frame(frame))? / 100.0;
        let mut current = layer.parent;
        while let Some(id) = current {
            let Some(parent) = self.store.get(id) else {
                break;
            };
            if !parent.visible(frame) {
                return Ok(None);
            }
            let local = parent.local_frame(frame);
            matrix = parent.transform.matrix(local)? * matrix;
            alpha *= parent.transform.opacity.sample(local)? / 100.0;
            current = parent.parent;
        }
        Ok(Some((matrix, alpha)))
    }

    /// Draws every visible layer at `frame`, bottom to top.
    pub fn render(&self, frame: f64, canvas: &mut dyn Canvas) -> Result<(), Error> {
        for id in &self.order {
            let Some(layer) = self.store.get(*id) else {
                continue;
            };
            let Some((matrix, alpha)) = self.chain(layer, frame)? else {
                continue;
            };
            match &layer.content {
                StagedContent::Shape(tree) => {
                    tree.evaluate(layer.local_frame(frame), canvas, matrix, alpha)?;
                }
                StagedContent::Solid {
                    color,
                    width,
                    height,
                } => {
                    let geometry = shapes::rectangle(
                        Vector2D::new(width / 2.0, height / 2.0),
                        Vector2D::new(*width, *height),
                        0.0,
                        Default::default(),
                    );
                    let mut builder = lyon_path::Path::builder();
                    shapes::to_path(&geometry, &mut builder);
                    let paint = Paint {
                        brush: Brush::Solid(*color),
                        style: PaintStyle::Fill {
                            rule: FillRule::NonZero,
                        },
                        alpha,
                    };
                    canvas.draw(&builder.build(), &paint, matrix);
                }
                StagedContent::Group => {}
            }
        }
        Ok(())
    }
}
