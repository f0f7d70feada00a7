use std::{fmt, str::FromStr};

use pixelsort_imgproc::{blend::BlendMode, parallel::ExecutionStrategy};

use crate::{
    error::PixelSortError,
    partition::{Partitioning, DEFAULT_REGION_MAX, DEFAULT_REGION_MIN},
    skip::SkipPolicy,
};

/// The HSV channel pixels are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Hue, scaled to [0, 255].
    #[default]
    Hue,
    /// Saturation.
    Saturation,
    /// Value (brightness).
    Value,
}

impl SortKey {
    /// All sort keys.
    pub const ALL: [SortKey; 3] = [SortKey::Hue, SortKey::Saturation, SortKey::Value];

    /// Index of the key in an HSV triple.
    pub fn channel(&self) -> usize {
        match self {
            SortKey::Hue => 0,
            SortKey::Saturation => 1,
            SortKey::Value => 2,
        }
    }

    /// Extract the key from an HSV pixel.
    pub fn key_of(&self, hsv: &[u8; 3]) -> u8 {
        hsv[self.channel()]
    }

    /// The canonical name of the key.
    pub fn name(&self) -> &'static str {
        match self {
            SortKey::Hue => "hue",
            SortKey::Saturation => "saturation",
            SortKey::Value => "value",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortKey {
    type Err = PixelSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hue" | "h" => Ok(SortKey::Hue),
            "saturation" | "sat" | "s" => Ok(SortKey::Saturation),
            "value" | "v" => Ok(SortKey::Value),
            _ => Err(PixelSortError::UnknownSortField(s.to_string())),
        }
    }
}

/// Validated parameters of a pixel sort.
///
/// The default sorts by hue in ascending order, never skips, partitions every
/// span randomly between 10% and 30% of its length and returns the sorted
/// image as is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelSortConfig {
    /// The channel pixels are ordered by.
    pub sort_key: SortKey,
    /// Sort in non-increasing order.
    pub flipped: bool,
    /// Which rows are left untouched.
    pub skip: SkipPolicy,
    /// How active spans are split into regions.
    pub partitioning: Partitioning,
    /// How the sorted image is composited over the original.
    pub blend_mode: BlendMode,
    /// Base seed of the per-row generators, drawn from entropy when unset.
    pub seed: Option<u64>,
    /// How rows are scheduled.
    pub strategy: ExecutionStrategy,
}

impl PixelSortConfig {
    /// Default configuration sorting by `sort_key`.
    pub fn new(sort_key: SortKey) -> Self {
        Self {
            sort_key,
            ..Default::default()
        }
    }

    /// Set the sort order.
    pub fn with_flipped(mut self, flipped: bool) -> Self {
        self.flipped = flipped;
        self
    }

    /// Set the skip policy.
    pub fn with_skip(mut self, skip: SkipPolicy) -> Self {
        self.skip = skip;
        self
    }

    /// Set the partitioning.
    pub fn with_partitioning(mut self, partitioning: Partitioning) -> Self {
        self.partitioning = partitioning;
        self
    }

    /// Set the blend mode.
    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    /// Set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check every parameter, the fields are public and may be set directly.
    pub fn validate(&self) -> Result<(), PixelSortError> {
        self.skip.validate()?;
        self.partitioning.validate()?;
        self.strategy.validate()?;
        Ok(())
    }
}

/// Untyped parameters, as they come from a command line or a config file.
///
/// Converted into a [`PixelSortConfig`] with `TryFrom`.
///
/// # Example
///
/// ```
/// use pixelsort_engine::{PixelSortConfig, SkipPolicy, SortKey, SortOptions};
///
/// let options = SortOptions {
///     skip_interval: Some(3),
///     ..SortOptions::new("value")
/// };
/// let config = PixelSortConfig::try_from(&options).unwrap();
///
/// assert_eq!(config.sort_key, SortKey::Value);
/// assert_eq!(config.skip, SkipPolicy::Periodic(3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SortOptions {
    /// Name of the sort key: hue, saturation or value.
    pub sort_field: String,
    /// Sort in non-increasing order.
    pub flipped: bool,
    /// Name of the blend mode.
    pub mode: String,
    /// Skip every n-th row, mutually exclusive with `skip_probability`.
    pub skip_interval: Option<i64>,
    /// Skip rows at random, mutually exclusive with `skip_interval`.
    pub skip_probability: Option<f64>,
    /// Split spans into random regions instead of sorting them whole.
    pub partition: bool,
    /// Lower region bound.
    pub region_min: f64,
    /// Upper region bound.
    pub region_max: f64,
    /// Base seed.
    pub seed: Option<u64>,
    /// Number of worker threads, the global pool is used when unset.
    pub threads: Option<usize>,
}

impl SortOptions {
    /// Options sorting by `sort_field`, every other parameter at its default.
    pub fn new(sort_field: impl Into<String>) -> Self {
        Self {
            sort_field: sort_field.into(),
            flipped: false,
            mode: BlendMode::default().name().to_string(),
            skip_interval: None,
            skip_probability: None,
            partition: true,
            region_min: DEFAULT_REGION_MIN,
            region_max: DEFAULT_REGION_MAX,
            seed: None,
            threads: None,
        }
    }
}

impl TryFrom<&SortOptions> for PixelSortConfig {
    type Error = PixelSortError;

    fn try_from(options: &SortOptions) -> Result<Self, Self::Error> {
        let sort_key = options.sort_field.parse::<SortKey>()?;
        let blend_mode = options.mode.parse::<BlendMode>()?;

        let skip = match (options.skip_interval, options.skip_probability) {
            (Some(_), Some(_)) => return Err(PixelSortError::ConflictingSkipPolicies),
            (Some(interval), None) => SkipPolicy::periodic(interval)?,
            (None, Some(probability)) => SkipPolicy::probabilistic(probability)?,
            (None, None) => SkipPolicy::never(),
        };

        let partitioning = if options.partition {
            Partitioning::random(options.region_min, options.region_max)?
        } else {
            Partitioning::Whole
        };

        let strategy = match options.threads {
            None => ExecutionStrategy::ParallelRows,
            Some(1) => ExecutionStrategy::Serial,
            Some(n) => ExecutionStrategy::Fixed(n),
        };

        let config = PixelSortConfig {
            sort_key,
            flipped: options.flipped,
            skip,
            partitioning,
            blend_mode,
            seed: options.seed,
            strategy,
        };
        config.validate()?;

        Ok(config)
    }
}

impl TryFrom<SortOptions> for PixelSortConfig {
    type Error = PixelSortError;

    fn try_from(options: SortOptions) -> Result<Self, Self::Error> {
        PixelSortConfig::try_from(&options)
    }
}
