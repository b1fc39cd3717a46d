//! Step interpolation.
//!
//! The scheduler turns one [`AnimationStep`] into frames. Every tick it
//! moves trackers first, then refreshes bindings, then advances object
//! transitions, so bound geometry and its labels change in lock-step. When
//! the step's duration has elapsed a finish pass puts every transition at
//! exactly its end state before retirements (fade-out, replace, remove) are
//! applied.

use std::collections::HashSet;

use linea_core::{Color, FrameClock, LineaError, LineaResult, ObjectId, ObjectKind, TrackerId};
use linea_ir::{
    AnimationStep, DrawableObject, Presence, SceneGraph, Script, Shape, Style, StyleProperty,
    TrackerTable, TransformMode, Transition,
};

use crate::frame::Frame;
use crate::sink::FrameSink;

/// Mutable playback state owned by a run.
#[derive(Debug)]
pub struct Stage {
    pub graph: SceneGraph,
    pub trackers: TrackerTable,
    /// Index of the next frame to emit.
    pub frame_index: u64,
    /// Seconds since the start of the run.
    pub time: f64,
}

impl Stage {
    pub fn new(trackers: TrackerTable) -> Self {
        Self {
            graph: SceneGraph::new(),
            trackers,
            frame_index: 0,
            time: 0.0,
        }
    }
}

/// A transition resolved against the stage at step start.
#[derive(Debug)]
enum Action {
    Reveal(Vec<ObjectId>),
    FadeIn(Vec<ObjectId>),
    FadeOut(Vec<(ObjectId, f64)>),
    Transform {
        source: ObjectId,
        start: DrawableObject,
        target: ObjectId,
        target_state: DrawableObject,
        bound_target: bool,
        mode: TransformMode,
        presence: Presence,
    },
    Value {
        tracker: TrackerId,
        from: f64,
        to: f64,
    },
    Property {
        styles: Vec<(ObjectId, Style)>,
        property: StyleProperty,
    },
    Remove(ObjectId),
    /// Group containers of a fanned-out transform, settled at retire.
    Regroup {
        retire: Vec<ObjectId>,
        enter: Vec<DrawableObject>,
        extend: Option<(ObjectId, Vec<ObjectId>)>,
    },
}

#[derive(Debug)]
struct Planned {
    offset: f64,
    action: Action,
}

/// What a step did, for the runner's bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    pub frames: u64,
    pub evaluations: usize,
}

/// Plays steps of one script against a [`Stage`].
pub struct Scheduler<'a> {
    script: &'a Script,
    clock: FrameClock,
    background: Color,
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if t >= 1.0 {
        b
    } else {
        a + (b - a) * t
    }
}

impl<'a> Scheduler<'a> {
    pub fn new(script: &'a Script, clock: FrameClock, background: Color) -> Self {
        Self {
            script,
            clock,
            background,
        }
    }

    /// Play one step: interpolation frames, the finish pass, then the
    /// trailing pause frames.
    pub fn play(
        &self,
        stage: &mut Stage,
        index: usize,
        step: &AnimationStep,
        sink: &mut dyn FrameSink,
    ) -> LineaResult<StepOutcome> {
        tracing::info!(
            step = index,
            transitions = step.transitions.len(),
            duration = %step.duration,
            pause = %step.pause,
            "playing step"
        );
        let mut outcome = StepOutcome::default();

        let mut plan = Vec::with_capacity(step.transitions.len());
        let mut actions = Vec::new();
        for (transition, offset) in step.transitions.iter().zip(step.start_offsets()) {
            self.prepare(stage, transition, &mut actions)?;
            plan.extend(actions.drain(..).map(|action| Planned { offset, action }));
        }

        let start = stage.time;
        for t in self.clock.sample_times(step.duration) {
            outcome.evaluations += self.advance(stage, &mut plan, |offset| step.progress(offset, t))?;
            stage.time = start + t;
            self.emit(stage, sink)?;
            outcome.frames += 1;
        }

        // Whatever the sampling, every transition ends exactly at its end state.
        outcome.evaluations += self.advance(stage, &mut plan, |_| 1.0)?;
        self.retire(stage, plan)?;
        outcome.evaluations += self.refresh(stage)?;
        stage.time = start + step.duration.as_seconds();

        let pause_start = stage.time;
        for t in self.clock.sample_times(step.pause) {
            outcome.evaluations += self.refresh(stage)?;
            stage.time = pause_start + t;
            self.emit(stage, sink)?;
            outcome.frames += 1;
        }
        stage.time = pause_start + step.pause.as_seconds();

        tracing::debug!(
            step = index,
            frames = outcome.frames,
            evaluations = outcome.evaluations,
            visible = stage.graph.len(),
            "step finished"
        );
        Ok(outcome)
    }

    /// Emit the current graph as a frame without advancing time.
    pub fn emit(&self, stage: &mut Stage, sink: &mut dyn FrameSink) -> LineaResult<()> {
        let frame = Frame::resolve(stage.frame_index, stage.time, self.background, &stage.graph);
        sink.consume(&frame)?;
        stage.frame_index += 1;
        Ok(())
    }

    fn refresh(&self, stage: &mut Stage) -> LineaResult<usize> {
        self.script.bindings.refresh(&mut stage.graph, &stage.trackers)
    }

    /// Current state for `id`: a bound slot evaluates its binding, anything
    /// else must have been declared.
    fn instantiate(&self, id: ObjectId, trackers: &TrackerTable) -> LineaResult<DrawableObject> {
        if let Some(obj) = self.script.bindings.evaluate(id, trackers)? {
            return Ok(obj);
        }
        self.script
            .declarations
            .get(&id)
            .cloned()
            .ok_or(LineaError::UnknownObject(id))
    }

    /// Insert `root` and, for groups, every member recursively. Present
    /// objects keep their state unless `reset` asks for the new presence.
    fn insert_tree(
        &self,
        stage: &mut Stage,
        root: ObjectId,
        presence: Presence,
        reset: bool,
    ) -> LineaResult<Vec<ObjectId>> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            if !seen.insert(id) {
                continue;
            }
            let members = if stage.graph.contains(id) {
                if reset {
                    if let Some(p) = stage.graph.presence_mut(id) {
                        *p = presence;
                    }
                }
                stage
                    .graph
                    .get(id)
                    .map(|o| o.members().to_vec())
                    .unwrap_or_default()
            } else {
                let obj = self.instantiate(id, &stage.trackers)?;
                let members = obj.members().to_vec();
                stage.graph.add_with(obj, presence);
                members
            };
            out.push(id);
            pending.extend(members.into_iter().rev());
        }
        Ok(out)
    }

    /// `id` must be visible. A declared group that was never inserted as a
    /// whole counts as visible when any member is; it is adopted into the
    /// graph so the operation fans out to those members.
    fn present(&self, stage: &mut Stage, id: ObjectId) -> LineaResult<()> {
        if self.adopt(stage, id, &mut HashSet::new()) {
            Ok(())
        } else {
            Err(LineaError::UnknownObject(id))
        }
    }

    fn adopt(&self, stage: &mut Stage, id: ObjectId, seen: &mut HashSet<ObjectId>) -> bool {
        if stage.graph.contains(id) {
            return true;
        }
        if !seen.insert(id) {
            return false;
        }
        let Some(group) = self
            .script
            .declarations
            .get(&id)
            .filter(|o| o.kind() == ObjectKind::Group)
        else {
            return false;
        };
        let mut any = false;
        for member in group.members() {
            any |= self.adopt(stage, *member, seen);
        }
        if any {
            stage.graph.add(group.clone());
        }
        any
    }

    /// Declared (or bound) state of `root` and its descendants, split into
    /// leaves and group containers, depth first in member order.
    fn declared_tree(
        &self,
        root: ObjectId,
        trackers: &TrackerTable,
    ) -> LineaResult<(Vec<DrawableObject>, Vec<DrawableObject>)> {
        let (mut leaves, mut groups) = (Vec::new(), Vec::new());
        let mut seen = HashSet::new();
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            if !seen.insert(id) {
                continue;
            }
            let obj = self.instantiate(id, trackers)?;
            if obj.kind() == ObjectKind::Group {
                pending.extend(obj.members().iter().rev().copied());
                groups.push(obj);
            } else {
                leaves.push(obj);
            }
        }
        Ok((leaves, groups))
    }

    fn prepare(&self, stage: &mut Stage, transition: &Transition, out: &mut Vec<Action>) -> LineaResult<()> {
        match transition {
            Transition::Create(id) | Transition::Write(id) => {
                let hidden = Presence {
                    reveal: 0.0,
                    fade: 1.0,
                };
                out.push(Action::Reveal(self.insert_tree(stage, *id, hidden, true)?));
            }
            Transition::FadeIn(id) => {
                let hidden = Presence {
                    reveal: 1.0,
                    fade: 0.0,
                };
                out.push(Action::FadeIn(self.insert_tree(stage, *id, hidden, true)?));
            }
            Transition::FadeOut(id) => {
                self.present(stage, *id)?;
                out.push(fade_out(&stage.graph, stage.graph.subtree(*id)));
            }
            Transition::Transform {
                source,
                target,
                mode,
            } => {
                self.present(stage, *source)?;
                let target_state = self.instantiate(*target, &stage.trackers)?;
                let source_is_group = stage
                    .graph
                    .get(*source)
                    .is_some_and(|o| o.kind() == ObjectKind::Group);
                if source_is_group || target_state.kind() == ObjectKind::Group {
                    self.prepare_group_transform(stage, *source, *target, *mode, out)?;
                } else {
                    out.push(self.transform_action(stage, *source, target_state, *mode)?);
                }
            }
            Transition::ValueChange { tracker, to } => {
                if !to.is_finite() {
                    return Err(LineaError::InvalidStep(format!(
                        "{} cannot move to {}",
                        tracker, to
                    )));
                }
                out.push(Action::Value {
                    tracker: *tracker,
                    from: stage.trackers.get(*tracker)?,
                    to: *to,
                });
            }
            Transition::PropertyChange { target, property } => {
                self.present(stage, *target)?;
                let mut styles = Vec::new();
                for id in stage.graph.subtree(*target) {
                    if self.script.bindings.is_bound(id) {
                        tracing::warn!(
                            slot = %id,
                            "property change on a bound slot lasts until the step ends"
                        );
                    }
                    if let Some(obj) = stage.graph.get(id) {
                        styles.push((id, obj.style.clone()));
                    }
                }
                out.push(Action::Property {
                    styles,
                    property: *property,
                });
            }
            Transition::Add(id) => {
                self.insert_tree(stage, *id, Presence::FULL, false)?;
            }
            Transition::Remove(id) => {
                self.adopt(stage, *id, &mut HashSet::new());
                out.push(Action::Remove(*id));
            }
        }
        Ok(())
    }

    /// Transform between two leaves. The source must be visible.
    fn transform_action(
        &self,
        stage: &Stage,
        source: ObjectId,
        target_state: DrawableObject,
        mode: TransformMode,
    ) -> LineaResult<Action> {
        let start = stage
            .graph
            .get(source)
            .cloned()
            .ok_or(LineaError::UnknownObject(source))?;
        if mode == TransformMode::InPlace && self.script.bindings.is_bound(source) {
            tracing::warn!(
                slot = %source,
                "in-place transform of a bound slot is overwritten by its binding"
            );
        }
        let target = target_state.id;
        Ok(Action::Transform {
            source,
            start,
            target,
            target_state,
            bound_target: self.script.bindings.is_bound(target),
            mode,
            presence: stage.graph.presence(source).unwrap_or_default(),
        })
    }

    /// Fan a transform with a group on either side out to the leaves. Leaves
    /// pair up by index; leftover source leaves fade out and leftover target
    /// leaves fade in. Replace retires every source container and brings in
    /// the target's; in place, new leaves join the source group.
    fn prepare_group_transform(
        &self,
        stage: &mut Stage,
        source: ObjectId,
        target: ObjectId,
        mode: TransformMode,
        out: &mut Vec<Action>,
    ) -> LineaResult<()> {
        if source == target {
            return Ok(());
        }
        let (mut source_leaves, source_groups): (Vec<ObjectId>, Vec<ObjectId>) = stage
            .graph
            .subtree(source)
            .into_iter()
            .partition(|id| {
                stage
                    .graph
                    .get(*id)
                    .is_some_and(|o| o.kind() != ObjectKind::Group)
            });
        let (mut target_leaves, target_groups) = self.declared_tree(target, &stage.trackers)?;

        let paired = source_leaves.len().min(target_leaves.len());
        let extra_sources = source_leaves.split_off(paired);
        let extra_targets = target_leaves.split_off(paired);
        tracing::debug!(
            %source,
            %target,
            paired,
            fading_out = extra_sources.len(),
            fading_in = extra_targets.len(),
            "fanning out group transform"
        );

        for (from, to) in source_leaves.into_iter().zip(target_leaves) {
            out.push(self.transform_action(stage, from, to, mode)?);
        }
        if !extra_sources.is_empty() {
            out.push(fade_out(&stage.graph, extra_sources));
        }
        let mut entering = Vec::with_capacity(extra_targets.len());
        for leaf in extra_targets {
            let id = leaf.id;
            let hidden = Presence {
                reveal: 1.0,
                fade: 0.0,
            };
            if stage.graph.add_with(leaf, hidden) {
                entering.push(id);
            }
        }

        let source_is_group = !source_groups.is_empty();
        let regroup = match mode {
            TransformMode::Replace => Action::Regroup {
                retire: source_groups,
                enter: target_groups,
                extend: None,
            },
            TransformMode::InPlace => Action::Regroup {
                retire: Vec::new(),
                enter: Vec::new(),
                extend: source_is_group.then(|| (source, entering.clone())),
            },
        };
        if !entering.is_empty() {
            out.push(Action::FadeIn(entering));
        }
        out.push(regroup);
        Ok(())
    }

    /// Move every planned transition to its progress. `progress` maps a
    /// start offset to eased progress in [0, 1]. Returns binding evaluations.
    fn advance<F>(&self, stage: &mut Stage, plan: &mut [Planned], progress: F) -> LineaResult<usize>
    where
        F: Fn(f64) -> f64,
    {
        for p in plan.iter() {
            if let Action::Value { tracker, from, to } = &p.action {
                stage
                    .trackers
                    .set(*tracker, lerp(*from, *to, progress(p.offset)))?;
            }
        }

        let evaluations = self.refresh(stage)?;

        for p in plan.iter_mut() {
            let alpha = progress(p.offset);
            match &mut p.action {
                Action::Reveal(ids) => {
                    for id in ids.iter() {
                        if let Some(presence) = stage.graph.presence_mut(*id) {
                            presence.reveal = alpha;
                        }
                    }
                }
                Action::FadeIn(ids) => {
                    for id in ids.iter() {
                        if let Some(presence) = stage.graph.presence_mut(*id) {
                            presence.fade = alpha;
                        }
                    }
                }
                Action::FadeOut(fades) => {
                    for (id, from) in fades.iter() {
                        if let Some(presence) = stage.graph.presence_mut(*id) {
                            presence.fade = lerp(*from, 0.0, alpha);
                        }
                    }
                }
                Action::Transform {
                    source,
                    start,
                    target,
                    target_state,
                    bound_target,
                    ..
                } => {
                    if *bound_target {
                        *target_state = self.instantiate(*target, &stage.trackers)?;
                    }
                    if stage.graph.contains(*source) {
                        stage
                            .graph
                            .replace(start.interpolate(target_state, alpha), *source)?;
                    }
                }
                Action::Property { styles, property } => {
                    for (id, from) in styles.iter() {
                        if let Some(obj) = stage.graph.get_mut(*id) {
                            obj.style = blend_property(from, property, alpha);
                        }
                    }
                }
                Action::Value { .. } | Action::Remove(_) | Action::Regroup { .. } => {}
            }
        }
        Ok(evaluations)
    }

    /// Apply what happens once a step is over: faded objects leave, replaced
    /// sources hand over to their targets, removals take effect.
    fn retire(&self, stage: &mut Stage, plan: Vec<Planned>) -> LineaResult<()> {
        for p in plan {
            match p.action {
                Action::FadeOut(fades) => {
                    for (id, _) in fades {
                        stage.graph.remove(id);
                    }
                }
                Action::Transform {
                    source,
                    target,
                    target_state,
                    mode: TransformMode::Replace,
                    presence,
                    ..
                } if source != target => {
                    stage.graph.remove(source);
                    if stage.graph.contains(target) {
                        stage.graph.replace(target_state, target)?;
                    } else {
                        stage.graph.add_with(target_state, presence);
                    }
                }
                Action::Remove(id) => {
                    stage.graph.remove_tree(id);
                }
                Action::Regroup {
                    retire,
                    enter,
                    extend,
                } => {
                    for id in retire {
                        stage.graph.remove(id);
                    }
                    for group in enter {
                        stage.graph.add(group);
                    }
                    if let Some((root, joined)) = extend {
                        if let Some(Shape::Group { members }) =
                            stage.graph.get_mut(root).map(|o| &mut o.shape)
                        {
                            members.extend(joined);
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn fade_out(graph: &SceneGraph, ids: Vec<ObjectId>) -> Action {
    Action::FadeOut(
        ids.into_iter()
            .map(|id| (id, graph.presence(id).map_or(1.0, |p| p.fade)))
            .collect(),
    )
}

fn blend_property(from: &Style, property: &StyleProperty, alpha: f64) -> Style {
    let mut style = from.clone();
    match property {
        StyleProperty::Color(to) => {
            style.color = if alpha >= 1.0 {
                *to
            } else {
                from.color.lerp(to, alpha)
            };
        }
        StyleProperty::StrokeWidth(to) => {
            style.stroke_width = lerp(from.stroke_width, *to, alpha);
        }
        StyleProperty::Opacity(to) => {
            style.opacity = lerp(from.opacity, *to, alpha);
        }
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::FrameRecorder;
    use linea_core::Point2D;
    use linea_ir::ScriptBuilder;

    fn play_all(script: &Script, fps: f64) -> (Stage, FrameRecorder) {
        let scheduler = Scheduler::new(script, FrameClock::new(fps), Color::BLACK);
        let mut stage = Stage::new(script.trackers.clone());
        let mut sink = FrameRecorder::new();
        for (i, step) in script.timeline.steps.iter().enumerate() {
            scheduler.play(&mut stage, i, step, &mut sink).unwrap();
        }
        (stage, sink)
    }

    #[test]
    fn test_create_reveals_then_settles() {
        let mut b = ScriptBuilder::new("create");
        let line = b.declare(DrawableObject::line(Point2D::ORIGIN, Point2D::new(3.0, 0.0)));
        b.play_one(Transition::Create(line), 1.0);
        let script = b.build();
        let (stage, sink) = play_all(&script, 4.0);

        assert_eq!(sink.frames.len(), 4);
        let first = sink.frames[0].item(line).unwrap();
        assert_eq!(
            first.shape,
            linea_ir::Shape::Line {
                start: Point2D::ORIGIN,
                end: Point2D::new(0.75, 0.0)
            }
        );
        assert_eq!(stage.graph.presence(line), Some(Presence::FULL));
        assert!((stage.time - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_group_create_fans_out() {
        let mut b = ScriptBuilder::new("group");
        let a = b.declare(DrawableObject::point(Point2D::ORIGIN));
        let c = b.declare(DrawableObject::point(Point2D::UP));
        let g = b.group(&[a, c]);
        b.play_one(Transition::Create(g), 0.5);
        let script = b.build();
        let (stage, _) = play_all(&script, 10.0);
        assert!(stage.graph.contains(a));
        assert!(stage.graph.contains(c));
        assert!(stage.graph.contains(g));
    }

    #[test]
    fn test_fade_out_removes_at_end() {
        let mut b = ScriptBuilder::new("fade");
        let dot = b.declare(DrawableObject::point(Point2D::ORIGIN));
        b.add(&[dot]).play_one(Transition::FadeOut(dot), 1.0);
        let script = b.build();
        let (stage, sink) = play_all(&script, 2.0);
        let halfway = sink.frames[0].item(dot).unwrap();
        assert!((halfway.style.fill_opacity - 0.5).abs() < 1e-12);
        assert!(stage.graph.is_empty());
    }

    #[test]
    fn test_fade_out_of_invisible_object_is_unknown() {
        let mut b = ScriptBuilder::new("bad");
        let dot = b.declare(DrawableObject::point(Point2D::ORIGIN));
        b.play_one(Transition::FadeOut(dot), 1.0);
        let script = b.build();
        let scheduler = Scheduler::new(&script, FrameClock::default(), Color::BLACK);
        let mut stage = Stage::new(script.trackers.clone());
        let err = scheduler
            .play(&mut stage, 0, &script.timeline.steps[0], &mut FrameRecorder::new())
            .unwrap_err();
        assert!(matches!(err, LineaError::UnknownObject(id) if id == dot));
    }

    #[test]
    fn test_replace_transform_hands_over_identity() {
        let mut b = ScriptBuilder::new("transform");
        let from = b.declare(DrawableObject::line(Point2D::ORIGIN, Point2D::RIGHT));
        let to = b.declare(DrawableObject::line(Point2D::ORIGIN, Point2D::UP).with_color(Color::RED));
        b.add(&[from]).play_one(Transition::replace(from, to), 1.0);
        let script = b.build();
        let (stage, _) = play_all(&script, 5.0);
        assert!(!stage.graph.contains(from));
        assert_eq!(stage.graph.get(to), script.declaration(to));
    }

    #[test]
    fn test_in_place_transform_keeps_source() {
        let mut b = ScriptBuilder::new("morph");
        let from = b.declare(DrawableObject::line(Point2D::ORIGIN, Point2D::RIGHT));
        let to = b.declare(DrawableObject::line(Point2D::ORIGIN, Point2D::UP));
        b.add(&[from]).play_one(Transition::morph(from, to), 1.0);
        let script = b.build();
        let (stage, _) = play_all(&script, 5.0);
        assert!(!stage.graph.contains(to));
        let obj = stage.graph.get(from).unwrap();
        assert_eq!(obj.shape, script.declaration(to).unwrap().shape);
    }

    #[test]
    fn test_property_change_lands_exactly() {
        let mut b = ScriptBuilder::new("color");
        let dot = b.declare(DrawableObject::point(Point2D::ORIGIN).with_color(Color::WHITE));
        b.add(&[dot])
            .play_one(Transition::set_color(dot, Color::YELLOW_D), 0.7)
            .play_one(Transition::set_stroke_width(dot, 7.5), 0.3);
        let script = b.build();
        let (stage, _) = play_all(&script, 30.0);
        let style = &stage.graph.get(dot).unwrap().style;
        assert_eq!(style.color, Color::YELLOW_D);
        assert_eq!(style.stroke_width, 7.5);
    }

    #[test]
    fn test_remove_applies_at_step_end() {
        let mut b = ScriptBuilder::new("remove");
        let dot = b.declare(DrawableObject::point(Point2D::ORIGIN));
        let label = b.declare(DrawableObject::text("x", Point2D::UP));
        b.add(&[dot]);
        b.play(
            AnimationStep::new(1.0)
                .with(Transition::Remove(dot))
                .with(Transition::FadeIn(label)),
        );
        let script = b.build();
        let (stage, sink) = play_all(&script, 2.0);
        assert!(sink.frames.iter().all(|f| f.item(dot).is_some()));
        assert!(!stage.graph.contains(dot));
        assert!(stage.graph.contains(label));
    }

    #[test]
    fn test_pause_emits_frames_without_changes() {
        let mut b = ScriptBuilder::new("pause");
        let dot = b.declare(DrawableObject::point(Point2D::ORIGIN));
        b.add(&[dot]).wait(1.0);
        let script = b.build();
        let (stage, sink) = play_all(&script, 10.0);
        assert_eq!(sink.frames.len(), 10);
        assert_eq!(sink.frames[0].items, sink.frames[9].items);
        assert!((stage.time - 1.0).abs() < 1e-12);
        assert_eq!(stage.frame_index, 10);
    }

    #[test]
    fn test_fade_out_of_group_built_member_by_member() {
        let mut b = ScriptBuilder::new("adopt");
        let a = b.declare(DrawableObject::text("one", Point2D::UP));
        let c = b.declare(DrawableObject::text("two", Point2D::DOWN));
        b.play_one(Transition::FadeIn(a), 0.5)
            .play_one(Transition::Write(c), 0.5);
        let both = b.group(&[a, c]);
        b.play_one(Transition::FadeOut(both), 1.0);
        let script = b.build();
        let (stage, sink) = play_all(&script, 4.0);
        assert!(stage.graph.is_empty());
        let fading = &sink.frames[sink.frames.len() - 2];
        assert!((fading.item(a).unwrap().style.fill_opacity - 0.25).abs() < 1e-12);
        assert!((fading.item(c).unwrap().style.fill_opacity - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_remove_of_group_built_member_by_member() {
        let mut b = ScriptBuilder::new("adopt-remove");
        let a = b.declare(DrawableObject::point(Point2D::ORIGIN));
        let c = b.declare(DrawableObject::point(Point2D::UP));
        let other = b.declare(DrawableObject::point(Point2D::DOWN));
        b.add(&[a, c, other]);
        let g = b.group(&[a, c]);
        b.remove(&[g]);
        let (stage, _) = play_all(&b.build(), 4.0);
        assert_eq!(stage.graph.len(), 1);
        assert!(stage.graph.contains(other));
    }

    #[test]
    fn test_group_with_no_visible_member_is_unknown() {
        let mut b = ScriptBuilder::new("ghost");
        let a = b.declare(DrawableObject::point(Point2D::ORIGIN));
        let g = b.group(&[a]);
        b.play_one(Transition::FadeOut(g), 1.0);
        let script = b.build();
        let scheduler = Scheduler::new(&script, FrameClock::default(), Color::BLACK);
        let mut stage = Stage::new(script.trackers.clone());
        let err = scheduler
            .play(&mut stage, 0, &script.timeline.steps[0], &mut FrameRecorder::new())
            .unwrap_err();
        assert!(matches!(err, LineaError::UnknownObject(id) if id == g));
    }

    #[test]
    fn test_group_replace_pairs_members_by_index() {
        let mut b = ScriptBuilder::new("group-replace");
        let a = b.declare(DrawableObject::point(Point2D::ORIGIN));
        let c = b.declare(DrawableObject::line(Point2D::ORIGIN, Point2D::RIGHT));
        let g = b.group(&[a, c]);
        let a2 = b.declare(DrawableObject::point(Point2D::new(2.0, 2.0)).with_color(Color::RED));
        let c2 = b.declare(DrawableObject::line(Point2D::ORIGIN, Point2D::UP));
        let g2 = b.group(&[a2, c2]);
        b.add(&[g]).play_one(Transition::replace(g, g2), 1.0);
        let script = b.build();
        let (stage, sink) = play_all(&script, 4.0);

        for gone in [g, a, c] {
            assert!(!stage.graph.contains(gone));
        }
        assert!(stage.graph.contains(g2));
        assert_eq!(stage.graph.get(a2), script.declaration(a2));
        assert_eq!(stage.graph.get(c2), script.declaration(c2));
        // Halfway, the source point sits halfway to its partner.
        let center = match &sink.frames[1].item(a).unwrap().shape {
            linea_ir::Shape::Point { center, .. } => *center,
            other => panic!("expected a point, got {:?}", other),
        };
        assert!((center.x - 1.0).abs() < 1e-9 && (center.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_group_replace_fades_out_unmatched_sources() {
        let mut b = ScriptBuilder::new("shrink");
        let parts: Vec<ObjectId> = (0..3)
            .map(|i| b.declare(DrawableObject::point(Point2D::new(i as f64, 0.0))))
            .collect();
        let g = b.group(&parts);
        let single = b.declare(DrawableObject::line(Point2D::ORIGIN, Point2D::UP));
        b.add(&[g]).play_one(Transition::replace(g, single), 1.0);
        let script = b.build();
        let (stage, _) = play_all(&script, 4.0);
        assert_eq!(stage.graph.len(), 1);
        assert!(stage.graph.contains(single));
    }

    #[test]
    fn test_group_morph_keeps_identity_and_adopts_new_members() {
        let mut b = ScriptBuilder::new("grow");
        let a = b.declare(DrawableObject::text("x", Point2D::ORIGIN));
        let g = b.group(&[a]);
        let a2 = b.declare(DrawableObject::text("x", Point2D::new(-3.0, 0.0)));
        let extra = b.declare(DrawableObject::text("y", Point2D::new(-3.0, -1.0)));
        let g2 = b.group(&[a2, extra]);
        b.add(&[g]).play_one(Transition::morph(g, g2), 1.0);
        let script = b.build();
        let (stage, _) = play_all(&script, 4.0);

        assert!(!stage.graph.contains(a2) && !stage.graph.contains(g2));
        assert_eq!(
            stage.graph.get(a).unwrap().shape,
            script.declaration(a2).unwrap().shape
        );
        assert_eq!(stage.graph.presence(extra), Some(Presence::FULL));
        assert_eq!(stage.graph.get(g).unwrap().members(), &[a, extra]);

        // Fading the morphed group takes the joined member with it.
        let mut b = ScriptBuilder::new("grow-then-fade");
        let a = b.declare(DrawableObject::point(Point2D::ORIGIN));
        let g = b.group(&[a]);
        let a2 = b.declare(DrawableObject::point(Point2D::UP));
        let extra = b.declare(DrawableObject::point(Point2D::DOWN));
        let g2 = b.group(&[a2, extra]);
        b.add(&[g])
            .play_one(Transition::morph(g, g2), 1.0)
            .play_one(Transition::FadeOut(g), 1.0);
        let (stage, _) = play_all(&b.build(), 4.0);
        assert!(stage.graph.is_empty());
    }
}
