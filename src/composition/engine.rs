use std::collections::BTreeMap;
use std::fmt;

use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    analysis::{AnalysisDocument, EventTimeline, Trigger},
    animation::{keyframes::BASE_FRAME, AnimationContext, BaseState},
    config::{AnimationConfig, CompositionConfig},
    error::{ConfigError, Result},
    layout::{CanvasResolution, LayoutEngine, LayoutPosition, LayoutSpec},
    sink::{KeyframeSink, TransformKey},
    strip::{Capability, Strip, StripId},
};

/// Everything one composition run needs, passed in explicitly
#[derive(Debug, Clone)]
pub struct CompositionRequest {
    /// Strips in host order; layout positions are index-aligned with it
    pub strips: Vec<Strip>,

    pub analysis: AnalysisDocument,

    pub layout: LayoutSpec,

    pub animations: AnimationConfig,

    pub resolution: CanvasResolution,

    pub fps: u32,

    /// Seed for animation randomness; `None` draws one from entropy
    pub seed: Option<u64>,
}

impl CompositionRequest {
    /// Build a request from a validated configuration
    pub fn from_config(config: &CompositionConfig, strips: Vec<Strip>, analysis: AnalysisDocument) -> Self {
        Self {
            strips,
            analysis,
            layout: config.layout.clone(),
            animations: config.animations.clone(),
            resolution: config.project.resolution,
            fps: config.project.fps,
            seed: config.project.seed,
        }
    }
}

/// Why an animation did not run cleanly on a strip
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum IssueReason {
    /// The strip lacks the property family the animation writes
    CapabilityMismatch(String),

    /// The analysis document has no such event category
    MissingCategory(String),

    Failed(String),
}

impl fmt::Display for IssueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueReason::CapabilityMismatch(capability) => {
                write!(f, "strip lacks the '{}' capability", capability)
            }
            IssueReason::MissingCategory(category) => {
                write!(f, "analysis has no '{}' events", category)
            }
            IssueReason::Failed(message) => write!(f, "failed: {}", message),
        }
    }
}

/// Non-fatal problem recorded for one (strip, animation) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationIssue {
    pub strip: StripId,

    /// Animation name, or `placement` for the layout write
    pub animation: String,

    pub reason: IssueReason,
}

/// Outcome of a composition run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompositionResult {
    /// Targets validated and layout computed
    pub success: bool,

    /// Keyframe writes per strip, placement included
    pub keyframes: BTreeMap<StripId, usize>,

    pub issues: Vec<AnimationIssue>,

    /// Reason the run was aborted, if it was
    pub fatal: Option<String>,

    /// Layout positions, index-aligned with the request's strips
    pub positions: Vec<LayoutPosition>,
}

impl CompositionResult {
    fn aborted(reason: String) -> Self {
        Self {
            success: false,
            fatal: Some(reason),
            ..Default::default()
        }
    }

    fn started(strips: &[Strip], positions: Vec<LayoutPosition>) -> Self {
        Self {
            success: true,
            keyframes: strips.iter().map(|strip| (strip.id.clone(), 0)).collect(),
            issues: Vec::new(),
            fatal: None,
            positions,
        }
    }

    fn record(&mut self, strip: &Strip, animation: &str, reason: IssueReason) {
        self.issues.push(AnimationIssue {
            strip: strip.id.clone(),
            animation: animation.to_string(),
            reason,
        });
    }

    fn add_keyframes(&mut self, strip: &Strip, count: usize) {
        *self.keyframes.entry(strip.id.clone()).or_default() += count;
    }

    /// Keyframes written for one strip
    pub fn keyframes_for(&self, strip: &StripId) -> usize {
        self.keyframes.get(strip).copied().unwrap_or(0)
    }

    pub fn total_keyframes(&self) -> usize {
        self.keyframes.values().sum()
    }

    /// Issues recorded for one strip, in the order they occurred
    pub fn issues_for<'r>(&'r self, strip: &'r StripId) -> impl Iterator<Item = &'r AnimationIssue> {
        self.issues.iter().filter(move |issue| &issue.strip == strip)
    }
}

/// Composition driver: layout, placement, then per-strip animations
///
/// The pipeline:
/// 1. Target validation - every explicit strip key selects exactly one strip
/// 2. Layout - one position per strip
/// 3. Placement - offset and scale keyed at frame 1
/// 4. Resolution - explicit animations first, then wildcard ones
/// 5. Animation - each (strip, animation) pair runs in isolation
///
/// Steps 1 and 2 are fatal on error. Everything after only records issues.
#[derive(Debug, Default)]
pub struct Compositor;

impl Compositor {
    pub fn new() -> Self {
        Self
    }

    /// Run one composition against a sink
    pub fn compose(&self, request: &CompositionRequest, sink: &mut dyn KeyframeSink) -> CompositionResult {
        info!(
            "Starting composition: {} strips on {}x{} at {} fps",
            request.strips.len(),
            request.resolution.width,
            request.resolution.height,
            request.fps
        );

        match self.run(request, sink) {
            Ok(result) => {
                info!(
                    "Composition complete: {} keyframes, {} issues",
                    result.total_keyframes(),
                    result.issues.len()
                );
                result
            }
            Err(e) => {
                warn!("Composition aborted: {}", e);
                CompositionResult::aborted(e.user_message())
            }
        }
    }

    fn run(&self, request: &CompositionRequest, sink: &mut dyn KeyframeSink) -> Result<CompositionResult> {
        // ==========================================
        // STEP 1: TARGET VALIDATION
        // ==========================================
        info!("Step 1: Validating animation targets...");
        if request.fps == 0 {
            return Err(ConfigError::InvalidValue {
                key: "fps".to_string(),
                value: request.fps.to_string(),
            }
            .into());
        }
        request.animations.validate_targets(&request.strips)?;

        // ==========================================
        // STEP 2: LAYOUT
        // ==========================================
        info!("Step 2: Computing {} layout...", request.layout.name());
        let positions = LayoutEngine::compute(request.strips.len(), request.resolution, &request.layout)?;

        let mut result = CompositionResult::started(&request.strips, positions);

        // ==========================================
        // STEP 3: PLACEMENT
        // ==========================================
        info!("Step 3: Writing placements...");
        self.write_placements(request, sink, &mut result);

        // ==========================================
        // STEP 4: RESOLUTION
        // ==========================================
        info!("Step 4: Resolving animations per strip...");
        let plans = request.animations.resolve(&request.strips)?;

        // ==========================================
        // STEP 5: ANIMATION
        // ==========================================
        let seed = request.seed.unwrap_or_else(rand::random);
        info!("Step 5: Running animations (seed {})...", seed);

        for (strip_index, (strip, specs)) in request.strips.iter().zip(plans).enumerate() {
            let base = BaseState::from_position(result.positions[strip_index]);

            for (animation_index, spec) in specs.into_iter().enumerate() {
                let animation = spec.kind.as_animation();
                let capability = animation.required_capability();

                if !strip.supports(capability) {
                    warn!(
                        "Skipping {} on strip '{}': no {} capability",
                        animation.name(),
                        strip.id,
                        capability
                    );
                    result.record(
                        strip,
                        animation.name(),
                        IssueReason::CapabilityMismatch(capability.to_string()),
                    );
                    continue;
                }

                let timeline = EventTimeline::resolve(&request.analysis, spec.trigger);
                if let (true, Some(category)) = (timeline.missing, timeline.category) {
                    warn!(
                        "Analysis has no '{}' events for {} on strip '{}'",
                        category,
                        animation.name(),
                        strip.id
                    );
                    result.record(
                        strip,
                        animation.name(),
                        IssueReason::MissingCategory(category.to_string()),
                    );
                }
                if timeline.times.is_empty() && spec.trigger != Trigger::Continuous {
                    debug!(
                        "No {} events, leaving strip '{}' untouched by {}",
                        spec.trigger,
                        strip.id,
                        animation.name()
                    );
                    continue;
                }

                let mut ctx = AnimationContext::new(
                    strip,
                    strip_index,
                    base,
                    request.fps,
                    animation_rng(seed, strip_index, animation_index),
                    &mut *sink,
                );
                let outcome = animation.apply(&mut ctx, &timeline.times);
                let written = ctx.written();
                result.add_keyframes(strip, written);

                match outcome {
                    Ok(_) => debug!(
                        "Applied {} ({}, {} events) to strip '{}': {} keyframes",
                        animation.name(),
                        spec.trigger,
                        timeline.len(),
                        strip.id,
                        written
                    ),
                    Err(e) => {
                        warn!("{} failed on strip '{}': {}", animation.name(), strip.id, e);
                        result.record(strip, animation.name(), IssueReason::Failed(e.to_string()));
                    }
                }
            }
        }

        Ok(result)
    }

    fn write_placements(
        &self,
        request: &CompositionRequest,
        sink: &mut dyn KeyframeSink,
        result: &mut CompositionResult,
    ) {
        for (strip, position) in request.strips.iter().zip(result.positions.clone()) {
            if !strip.supports(Capability::Transform) {
                debug!("Strip '{}' has no transform, skipping placement", strip.id);
                continue;
            }

            match sink.set_transform(&strip.id, BASE_FRAME, &TransformKey::placement(&position)) {
                Ok(()) => result.add_keyframes(strip, 1),
                Err(e) => {
                    warn!("Placement failed for strip '{}': {}", strip.id, e);
                    result.record(strip, "placement", IssueReason::Failed(e.to_string()));
                }
            }
        }
    }
}

/// Independent random stream for one (strip, animation) pair
fn animation_rng(seed: u64, strip_index: usize, animation_index: usize) -> StdRng {
    let stream = ((strip_index as u64) << 32) | animation_index as u64;
    StdRng::seed_from_u64(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ stream)
}
