//! Yarn quantity estimator
//!
//! Maps a project type, size, and yarn weight to grams, meters, and a
//! skein count. Labels are matched exactly (lowercase, untrimmed). Anything
//! unrecognized falls back to a default instead of failing, so `estimate`
//! has no error path.

use serde::{Deserialize, Serialize};

/// Base amount used when the (project, size) pair is not in the table.
pub const FALLBACK_BASE_GRAMS: u32 = 300;

/// Multiplier used for an unrecognized yarn weight.
pub const DEFAULT_MULTIPLIER: f64 = 1.0;

/// Fixed length conversion; independent of weight and gauge.
pub const METERS_PER_GRAM: u32 = 4;

/// Retail skein size assumed by the estimator.
pub const GRAMS_PER_SKEIN: u32 = 50;

/// Gauge assumed when the caller does not send one (stitches per inch).
pub const DEFAULT_GAUGE: u32 = 4;

/// Kind of project being knitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectType {
    Hat,
    Scarf,
    Sweater,
    Blanket,
}

impl ProjectType {
    /// Parse an exact lowercase label (`"hat"`, `"scarf"`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hat" => Some(Self::Hat),
            "scarf" => Some(Self::Scarf),
            "sweater" => Some(Self::Sweater),
            "blanket" => Some(Self::Blanket),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hat => "hat",
            Self::Scarf => "scarf",
            Self::Sweater => "sweater",
            Self::Blanket => "blanket",
        }
    }

    /// Size labels with a table entry for this project type.
    pub fn sizes(&self) -> &'static [SizeLabel] {
        use SizeLabel::*;
        match self {
            Self::Hat | Self::Sweater => &[Baby, Child, Adult],
            Self::Scarf => &[Short, Medium, Long],
            Self::Blanket => &[Baby, Throw, Full],
        }
    }

    pub const ALL: [ProjectType; 4] = [Self::Hat, Self::Scarf, Self::Sweater, Self::Blanket];
}

/// Size label. Which labels are meaningful depends on the project type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeLabel {
    Baby,
    Child,
    Adult,
    Short,
    Medium,
    Long,
    Throw,
    Full,
}

impl SizeLabel {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "baby" => Some(Self::Baby),
            "child" => Some(Self::Child),
            "adult" => Some(Self::Adult),
            "short" => Some(Self::Short),
            "medium" => Some(Self::Medium),
            "long" => Some(Self::Long),
            "throw" => Some(Self::Throw),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baby => "baby",
            Self::Child => "child",
            Self::Adult => "adult",
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
            Self::Throw => "throw",
            Self::Full => "full",
        }
    }
}

/// Yarn thickness class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YarnWeight {
    Lace,
    Fingering,
    Dk,
    Worsted,
    Chunky,
}

impl YarnWeight {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lace" => Some(Self::Lace),
            "fingering" => Some(Self::Fingering),
            "dk" => Some(Self::Dk),
            "worsted" => Some(Self::Worsted),
            "chunky" => Some(Self::Chunky),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lace => "lace",
            Self::Fingering => "fingering",
            Self::Dk => "dk",
            Self::Worsted => "worsted",
            Self::Chunky => "chunky",
        }
    }

    /// Quantity multiplier relative to a dk-weight project.
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Lace => 0.7,
            Self::Fingering => 0.8,
            Self::Dk => 1.0,
            Self::Worsted => 1.2,
            Self::Chunky => 1.5,
        }
    }

    pub const ALL: [YarnWeight; 5] = [
        Self::Lace,
        Self::Fingering,
        Self::Dk,
        Self::Worsted,
        Self::Chunky,
    ];
}

/// Base grams for a (project, size) pair.
///
/// A size that belongs to a different project type (`hat` + `throw`) is
/// treated like an unknown size.
pub fn base_grams(project: Option<ProjectType>, size: Option<SizeLabel>) -> u32 {
    use ProjectType::*;
    use SizeLabel::*;

    match (project, size) {
        (Some(Hat), Some(Baby)) => 100,
        (Some(Hat), Some(Child)) => 150,
        (Some(Hat), Some(Adult)) => 200,
        (Some(Scarf), Some(Short)) => 200,
        (Some(Scarf), Some(Medium)) => 300,
        (Some(Scarf), Some(Long)) => 400,
        (Some(Sweater), Some(Baby)) => 400,
        (Some(Sweater), Some(Child)) => 600,
        (Some(Sweater), Some(Adult)) => 800,
        (Some(Blanket), Some(Baby)) => 800,
        (Some(Blanket), Some(Throw)) => 1200,
        (Some(Blanket), Some(Full)) => 1600,
        _ => FALLBACK_BASE_GRAMS,
    }
}

/// Multiplier for a yarn weight, `DEFAULT_MULTIPLIER` when unknown.
pub fn multiplier_for(weight: Option<YarnWeight>) -> f64 {
    match weight {
        Some(w) => w.multiplier(),
        None => DEFAULT_MULTIPLIER,
    }
}

fn default_gauge() -> u32 {
    DEFAULT_GAUGE
}

/// Estimator input as sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub pattern_type: String,
    pub size: String,
    pub yarn_weight: String,
    /// Accepted for compatibility; the calculation does not use it.
    #[serde(default = "default_gauge")]
    pub gauge: u32,
}

impl EstimateRequest {
    pub fn new(
        pattern_type: impl Into<String>,
        size: impl Into<String>,
        yarn_weight: impl Into<String>,
    ) -> Self {
        Self {
            pattern_type: pattern_type.into(),
            size: size.into(),
            yarn_weight: yarn_weight.into(),
            gauge: DEFAULT_GAUGE,
        }
    }

    pub fn with_gauge(mut self, gauge: u32) -> Self {
        self.gauge = gauge;
        self
    }
}

/// Estimated material quantities plus an echo of the labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YarnEstimate {
    pub estimated_grams: u32,
    pub estimated_meters: u32,
    pub recommended_skeins: u32,
    pub pattern_type: String,
    pub size: String,
    pub yarn_weight: String,
}

/// Compute the estimate for a request. Pure; never fails.
pub fn estimate(req: &EstimateRequest) -> YarnEstimate {
    let base = base_grams(ProjectType::parse(&req.pattern_type), SizeLabel::parse(&req.size));
    let multiplier = multiplier_for(YarnWeight::parse(&req.yarn_weight));

    // Truncates toward zero; every table product is exact in f64.
    let grams = (f64::from(base) * multiplier) as u32;

    YarnEstimate {
        estimated_grams: grams,
        estimated_meters: grams * METERS_PER_GRAM,
        recommended_skeins: (grams / GRAMS_PER_SKEIN).max(1),
        pattern_type: req.pattern_type.clone(),
        size: req.size.clone(),
        yarn_weight: req.yarn_weight.clone(),
    }
}

impl From<&EstimateRequest> for YarnEstimate {
    fn from(req: &EstimateRequest) -> Self {
        estimate(req)
    }
}
