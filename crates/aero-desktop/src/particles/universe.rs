use std::f32::consts::{PI, TAU};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{AnimationParam, ExpansionParams, GalaxyCluster, LayerKind, Nebula};

/// Slowly orbiting camera looking at the origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraOrbit {
    pub distance: f32,
    pub fov_deg: f32,
    /// Full turns per minute
    pub auto_rotate_speed: f32,
    azimuth: f32,
}

impl Default for CameraOrbit {
    fn default() -> Self {
        Self {
            distance: 200.0,
            fov_deg: 60.0,
            auto_rotate_speed: 0.5,
            azimuth: 0.0,
        }
    }
}

impl CameraOrbit {
    pub fn advance(&mut self, delta_s: f32) {
        self.azimuth = (self.azimuth + TAU / 60.0 * self.auto_rotate_speed * delta_s).rem_euclid(TAU);
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    /// Camera position on the horizontal circle
    pub fn position(&self) -> [f32; 3] {
        [
            self.distance * self.azimuth.sin(),
            0.0,
            self.distance * self.azimuth.cos(),
        ]
    }
}

/// Expansion simulation state
#[derive(Debug)]
pub struct Universe {
    params: ExpansionParams,
    positions: Vec<f32>,
    velocities: Vec<f32>,
    elapsed_s: f64,
    galaxy: Option<GalaxyCluster>,
    nebula: Option<Nebula>,
    camera: CameraOrbit,
    rng: StdRng,
}

impl Universe {
    /// Build a universe with every particle at the origin
    pub fn new(params: ExpansionParams, seed: u64) -> Self {
        let params = params.clamped();
        let mut rng = StdRng::seed_from_u64(seed);
        let count = params.particle_count;
        let mut velocities = Vec::with_capacity(count * 3);
        for _ in 0..count {
            let theta = rng.gen::<f32>() * 2.0 * PI;
            let phi = (rng.gen::<f32>() * 2.0 - 1.0).acos();
            let speed = rng.gen::<f32>() * 0.5 + 0.5;
            velocities.push(speed * phi.sin() * theta.cos());
            velocities.push(speed * phi.sin() * theta.sin());
            velocities.push(speed * phi.cos());
        }
        log::debug!("universe created with {} particles", count);
        Self {
            params,
            positions: vec![0.0; count * 3],
            velocities,
            elapsed_s: 0.0,
            galaxy: None,
            nebula: None,
            camera: CameraOrbit::default(),
            rng,
        }
    }

    /// Advance by `delta_s` seconds; returns layers that appeared this step
    pub fn step(&mut self, delta_s: f64) -> Vec<LayerKind> {
        if !delta_s.is_finite() || delta_s <= 0.0 {
            return Vec::new();
        }
        let scale = self.params.expansion_speed * delta_s as f32;
        for (p, v) in self.positions.iter_mut().zip(&self.velocities) {
            *p += v * scale;
        }
        self.camera.advance(delta_s as f32);
        self.elapsed_s += delta_s;

        let mut added = Vec::new();
        if self.elapsed_s > GalaxyCluster::APPEARS_AFTER_S && self.galaxy.is_none() {
            self.galaxy = Some(GalaxyCluster::generate(&mut self.rng));
            log::debug!("galaxy cluster added at {:.1}s", self.elapsed_s);
            added.push(LayerKind::GalaxyCluster);
        }
        if self.elapsed_s > Nebula::APPEARS_AFTER_S && self.nebula.is_none() {
            self.nebula = Some(Nebula::default());
            log::debug!("nebula added at {:.1}s", self.elapsed_s);
            added.push(LayerKind::Nebula);
        }
        added
    }

    /// Adjust a parameter; returns the clamped stored value
    pub fn set_param(&mut self, param: AnimationParam, value: f32) -> f32 {
        self.params.set(param, value)
    }

    pub fn params(&self) -> &ExpansionParams {
        &self.params
    }

    pub fn particle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Flat xyz triples
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn velocities(&self) -> &[f32] {
        &self.velocities
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed_s
    }

    pub fn galaxy(&self) -> Option<&GalaxyCluster> {
        self.galaxy.as_ref()
    }

    pub fn nebula(&self) -> Option<&Nebula> {
        self.nebula.as_ref()
    }

    pub fn camera(&self) -> &CameraOrbit {
        &self.camera
    }
}
