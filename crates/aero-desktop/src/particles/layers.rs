use rand::Rng;
use serde::Serialize;

/// Static star field that appears once the expansion has run for a while
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalaxyCluster {
    /// Flat xyz triples
    #[serde(skip)]
    pub positions: Vec<f32>,
    pub size: f32,
    pub opacity: f32,
    pub color: u32,
}

impl GalaxyCluster {
    pub const COUNT: usize = 5000;
    /// Edge length of the cube the points are spread over
    pub const EXTENT: f32 = 1000.0;
    pub const APPEARS_AFTER_S: f64 = 10.0;

    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let positions = (0..Self::COUNT * 3)
            .map(|_| (rng.gen::<f32>() - 0.5) * Self::EXTENT)
            .collect();
        Self {
            positions,
            size: 1.5,
            opacity: 0.5,
            color: 0xaaaaaa,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Textured back-face sphere around the scene
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Nebula {
    pub radius: f32,
    pub segments: u32,
    pub opacity: f32,
}

impl Nebula {
    pub const APPEARS_AFTER_S: f64 = 15.0;
}

impl Default for Nebula {
    fn default() -> Self {
        Self {
            radius: 500.0,
            segments: 32,
            opacity: 0.7,
        }
    }
}

/// Layer added during a step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerKind {
    GalaxyCluster,
    Nebula,
}
