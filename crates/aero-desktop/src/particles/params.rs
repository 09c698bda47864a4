use serde::{Deserialize, Serialize};

/// Inclusive range of an adjustable parameter
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp `value` into the range; non-finite values fall back to `fallback`
    pub fn clamp(&self, value: f32, fallback: f32) -> f32 {
        if value.is_finite() {
            value.clamp(self.min, self.max)
        } else {
            fallback
        }
    }
}

pub const EXPANSION_SPEED_RANGE: ParamRange = ParamRange::new(10.0, 200.0);
pub const PARTICLE_SIZE_RANGE: ParamRange = ParamRange::new(1.0, 10.0);
pub const BLOOM_STRENGTH_RANGE: ParamRange = ParamRange::new(0.0, 5.0);
pub const BLOOM_RADIUS_RANGE: ParamRange = ParamRange::new(0.0, 1.0);
pub const BLOOM_THRESHOLD_RANGE: ParamRange = ParamRange::new(0.0, 1.0);

/// A user-adjustable animation parameter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationParam {
    ExpansionSpeed,
    ParticleSize,
    BloomStrength,
    BloomRadius,
    BloomThreshold,
}

impl AnimationParam {
    pub fn range(self) -> ParamRange {
        match self {
            AnimationParam::ExpansionSpeed => EXPANSION_SPEED_RANGE,
            AnimationParam::ParticleSize => PARTICLE_SIZE_RANGE,
            AnimationParam::BloomStrength => BLOOM_STRENGTH_RANGE,
            AnimationParam::BloomRadius => BLOOM_RADIUS_RANGE,
            AnimationParam::BloomThreshold => BLOOM_THRESHOLD_RANGE,
        }
    }

    /// Control label
    pub fn label(self) -> &'static str {
        match self {
            AnimationParam::ExpansionSpeed => "Expansion Speed",
            AnimationParam::ParticleSize => "Particle Size",
            AnimationParam::BloomStrength => "Bloom Strength",
            AnimationParam::BloomRadius => "Bloom Radius",
            AnimationParam::BloomThreshold => "Bloom Threshold",
        }
    }
}

/// Expansion animation settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpansionParams {
    pub expansion_speed: f32,
    pub particle_size: f32,
    pub bloom_strength: f32,
    pub bloom_radius: f32,
    pub bloom_threshold: f32,
    pub particle_count: usize,
}

impl Default for ExpansionParams {
    fn default() -> Self {
        Self {
            expansion_speed: 50.0,
            particle_size: 2.0,
            bloom_strength: 2.0,
            bloom_radius: 0.5,
            bloom_threshold: 0.0,
            particle_count: 20_000,
        }
    }
}

impl ExpansionParams {
    /// Copy with every adjustable value inside its range
    pub fn clamped(&self) -> Self {
        let d = Self::default();
        Self {
            expansion_speed: EXPANSION_SPEED_RANGE.clamp(self.expansion_speed, d.expansion_speed),
            particle_size: PARTICLE_SIZE_RANGE.clamp(self.particle_size, d.particle_size),
            bloom_strength: BLOOM_STRENGTH_RANGE.clamp(self.bloom_strength, d.bloom_strength),
            bloom_radius: BLOOM_RADIUS_RANGE.clamp(self.bloom_radius, d.bloom_radius),
            bloom_threshold: BLOOM_THRESHOLD_RANGE.clamp(self.bloom_threshold, d.bloom_threshold),
            particle_count: self.particle_count,
        }
    }

    pub fn get(&self, param: AnimationParam) -> f32 {
        match param {
            AnimationParam::ExpansionSpeed => self.expansion_speed,
            AnimationParam::ParticleSize => self.particle_size,
            AnimationParam::BloomStrength => self.bloom_strength,
            AnimationParam::BloomRadius => self.bloom_radius,
            AnimationParam::BloomThreshold => self.bloom_threshold,
        }
    }

    /// Set one parameter, clamped to its range; returns the stored value
    pub fn set(&mut self, param: AnimationParam, value: f32) -> f32 {
        let current = self.get(param);
        let value = param.range().clamp(value, current);
        let slot = match param {
            AnimationParam::ExpansionSpeed => &mut self.expansion_speed,
            AnimationParam::ParticleSize => &mut self.particle_size,
            AnimationParam::BloomStrength => &mut self.bloom_strength,
            AnimationParam::BloomRadius => &mut self.bloom_radius,
            AnimationParam::BloomThreshold => &mut self.bloom_threshold,
        };
        *slot = value;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = ExpansionParams::default();
        assert_eq!(p.particle_count, 20_000);
        assert!((p.expansion_speed - 50.0).abs() < 0.001);
        assert!((p.bloom_radius - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_set_clamps() {
        let mut p = ExpansionParams::default();
        assert!((p.set(AnimationParam::ExpansionSpeed, 500.0) - 200.0).abs() < 0.001);
        assert!((p.set(AnimationParam::ParticleSize, 0.0) - 1.0).abs() < 0.001);
        assert!((p.set(AnimationParam::BloomThreshold, 0.3) - 0.3).abs() < 0.001);
        // NaN keeps the current value
        assert!((p.set(AnimationParam::BloomStrength, f32::NAN) - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_clamped_copy() {
        let p = ExpansionParams {
            expansion_speed: 1.0,
            bloom_radius: 3.0,
            ..Default::default()
        }
        .clamped();
        assert!((p.expansion_speed - 10.0).abs() < 0.001);
        assert!((p.bloom_radius - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_partial_json() {
        let p: ExpansionParams = serde_json::from_str(r#"{"expansionSpeed": 80}"#).unwrap();
        assert!((p.expansion_speed - 80.0).abs() < 0.001);
        assert_eq!(p.particle_count, 20_000);
    }
}
