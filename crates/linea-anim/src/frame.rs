//! Resolved frames: what the rendering collaborator receives per tick.

use serde::Serialize;

use linea_core::{Color, ContentHash, ContentHasher, ObjectId, ObjectKind};
use linea_ir::{SceneGraph, Shape, Style};

/// One visible drawable with presence already applied: partially revealed
/// geometry and the effective (faded) style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderItem {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub shape: Shape,
    pub style: Style,
    pub z_index: i32,
}

/// A single rendered instant of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Index of the frame within the whole run.
    pub index: u64,
    /// Time since the start of the run, in seconds.
    pub time: f64,
    pub background: Color,
    /// Draw order: back to front.
    pub items: Vec<RenderItem>,
}

impl Frame {
    /// Snapshot the graph for a rendering pass. Groups carry no geometry of
    /// their own and are skipped; their members appear individually.
    pub fn resolve(index: u64, time: f64, background: Color, graph: &SceneGraph) -> Self {
        let items = graph
            .current_members()
            .into_iter()
            .filter(|e| e.object.kind() != ObjectKind::Group)
            .map(|e| {
                let mut style = e.object.style.clone();
                style.opacity *= e.presence.fade;
                style.fill_opacity *= e.presence.fade;
                RenderItem {
                    id: e.object.id,
                    kind: e.object.kind(),
                    shape: e.object.shape.partial(e.presence.reveal),
                    style,
                    z_index: e.object.z_index,
                }
            })
            .collect();
        Self {
            index,
            time,
            background,
            items,
        }
    }

    pub fn item(&self, id: ObjectId) -> Option<&RenderItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Contents of every text item, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|i| match &i.shape {
            Shape::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }

    /// Feed the visual content of the frame into `hasher`. Object identities
    /// are process-global counters and are left out, so equal timelines hash
    /// equally across runs.
    pub fn hash_into(&self, hasher: &mut ContentHasher) {
        hasher
            .u64(self.index)
            .f64(self.time)
            .color(&self.background)
            .u64(self.items.len() as u64);
        for item in &self.items {
            hash_shape(hasher, &item.shape);
            hasher
                .color(&item.style.color)
                .f64(item.style.stroke_width)
                .f64(item.style.opacity)
                .f64(item.style.fill_opacity)
                .u64(item.style.dashed as u64)
                .u64(item.z_index as i64 as u64);
        }
    }

    pub fn content_hash(&self) -> ContentHash {
        let mut hasher = ContentHasher::new();
        self.hash_into(&mut hasher);
        hasher.finish()
    }
}

fn hash_shape(h: &mut ContentHasher, shape: &Shape) {
    match shape {
        Shape::Point { center, radius } => {
            h.u64(0).point(center).f64(*radius);
        }
        Shape::Line { start, end } => {
            h.u64(1).point(start).point(end);
        }
        Shape::Path { segments, closed } => {
            h.u64(2).u64(segments.len() as u64);
            for seg in segments {
                h.u64(seg.len() as u64);
                for p in seg {
                    h.point(p);
                }
            }
            h.u64(*closed as u64);
        }
        Shape::Text {
            content,
            anchor,
            font_size,
            extent,
        } => {
            h.u64(3)
                .str(content)
                .point(anchor)
                .f64(*font_size)
                .f64(extent.width)
                .f64(extent.height);
        }
        Shape::Group { members } => {
            h.u64(4).u64(members.len() as u64);
        }
    }
}
