//! Per-vesicle metric series and population summaries.

use crate::entity::{Entity, EntityId, Kind, Particle};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One recorded data point for a vesicle
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Simulation clock at sampling time
    pub game_time: f32,
    pub radius: f32,
    pub life_timer: f32,
    pub distance_travelled: f32,
    pub volume_growth: f32,
    pub monomers_eaten: u32,
}

impl Snapshot {
    /// Capture the current state of a vesicle's particle
    pub fn of(clock: f32, particle: &Particle) -> Self {
        Self {
            game_time: clock,
            radius: particle.radius,
            life_timer: particle.metrics.life_timer,
            distance_travelled: particle.metrics.distance_travelled,
            volume_growth: particle.metrics.volume_growth,
            monomers_eaten: particle.metrics.monomers_eaten,
        }
    }
}

/// Append-only snapshot sequence for one vesicle id
#[derive(Clone, Debug, Default)]
pub struct VesicleSeries {
    pub snapshots: Vec<Snapshot>,
    /// Set when the id was sampled in the current period
    pub updated: bool,
}

/// Records one snapshot per active vesicle per simulated second.
///
/// Series are keyed by vesicle id. Fission daughters inherit the mother's
/// id, so a single series may splice two lineages under one key.
#[derive(Clone, Debug)]
pub struct MetricsRecorder {
    series: HashMap<EntityId, VesicleSeries>,
    period: f32,
    accumulator: f32,
}

impl MetricsRecorder {
    pub fn new(period: f32) -> Self {
        Self {
            series: HashMap::new(),
            period,
            accumulator: 0.0,
        }
    }

    /// Pre-create an empty series for a seeded vesicle
    pub fn register(&mut self, id: EntityId) {
        self.series.entry(id).or_default();
    }

    /// Advance the sampling clock; true when a period just elapsed
    pub fn tick(&mut self, dt: f32) -> bool {
        self.accumulator += dt;
        if self.accumulator > self.period {
            self.accumulator -= self.period;
            true
        } else {
            false
        }
    }

    /// Append one snapshot per active vesicle and flag its id as updated
    pub fn sample(&mut self, clock: f32, entities: &[Entity]) {
        for series in self.series.values_mut() {
            series.updated = false;
        }
        for entity in entities {
            if entity.particle.kind != Kind::Vesicle {
                continue;
            }
            let series = self.series.entry(entity.particle.id).or_default();
            series.snapshots.push(Snapshot::of(clock, &entity.particle));
            series.updated = true;
        }
    }

    pub fn series(&self, id: EntityId) -> Option<&VesicleSeries> {
        self.series.get(&id)
    }

    /// Ordered snapshots for a vesicle id, if it was ever tracked
    pub fn snapshots(&self, id: EntityId) -> Option<&[Snapshot]> {
        self.series.get(&id).map(|s| s.snapshots.as_slice())
    }

    /// Number of distinct vesicle ids ever tracked
    pub fn tracked_count(&self) -> usize {
        self.series.len()
    }

    /// Write one delimited file per tracked vesicle id into `dir`.
    /// Returns the number of files written.
    pub fn export_series<P: AsRef<Path>>(&self, dir: P) -> std::io::Result<usize> {
        let dir = dir.as_ref();
        let mut written = 0;
        let mut ids: Vec<&EntityId> = self.series.keys().collect();
        ids.sort();
        for id in ids {
            let series = &self.series[id];
            let mut file = File::create(dir.join(format!("vesicle_{id}.csv")))?;
            writeln!(file, "timer,radius,growth,distance,eaten")?;
            for snap in &series.snapshots {
                writeln!(
                    file,
                    "{:.3},{:.3},{:.3},{:.3},{}",
                    snap.life_timer,
                    snap.radius,
                    snap.volume_growth,
                    snap.distance_travelled,
                    snap.monomers_eaten,
                )?;
            }
            written += 1;
        }
        Ok(written)
    }
}

/// Population roll-up for a single point in time
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Summary {
    pub clock: f32,
    pub vesicles: usize,
    pub monomers: usize,
    /// Monomers bound inside vesicle chains
    pub chained_monomers: usize,
    pub radius_mean: f32,
    pub radius_max: f32,
    pub monomers_eaten: u64,
}

impl Summary {
    /// Measure the current population
    pub fn measure(clock: f32, entities: &[Entity]) -> Self {
        let mut summary = Self {
            clock,
            ..Self::default()
        };
        let mut radius_sum = 0.0f32;

        for entity in entities {
            match entity.particle.kind {
                Kind::Vesicle => {
                    summary.vesicles += 1;
                    radius_sum += entity.particle.radius;
                    summary.radius_max = summary.radius_max.max(entity.particle.radius);
                    summary.monomers_eaten += u64::from(entity.particle.metrics.monomers_eaten);
                    if let Some(body) = entity.as_vesicle() {
                        summary.chained_monomers +=
                            body.polymers.iter().map(|p| p.chain.len()).sum::<usize>();
                    }
                }
                Kind::Monomer => summary.monomers += 1,
                Kind::Absorbed => {}
            }
        }

        if summary.vesicles > 0 {
            summary.radius_mean = radius_sum / summary.vesicles as f32;
        }
        summary
    }

    /// Format as a one-line progress summary
    pub fn summary(&self) -> String {
        format!(
            "T:{:8.1} | Ves:{:4} | Mono:{:6} | Chained:{:6} | R mean/max:{:5.1}/{:5.1} | Eaten:{}",
            self.clock,
            self.vesicles,
            self.monomers,
            self.chained_monomers,
            self.radius_mean,
            self.radius_max,
            self.monomers_eaten,
        )
    }

    /// Save the summary to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Behavior;
    use glam::Vec2;

    fn vesicle(id: EntityId, radius: f32) -> Entity {
        Entity::vesicle(id, radius, Vec2::new(100.0, 100.0), Vec2::ZERO)
    }

    #[test]
    fn test_tick_cadence() {
        let mut recorder = MetricsRecorder::new(1.0);
        assert!(!recorder.tick(0.4));
        assert!(!recorder.tick(0.4));
        assert!(recorder.tick(0.4));
        // the accumulator keeps the remainder rather than resetting
        assert!(!recorder.tick(0.7));
        assert!(recorder.tick(0.2));
    }

    #[test]
    fn test_sample_appends_and_flags() {
        let mut recorder = MetricsRecorder::new(1.0);
        recorder.register(0);
        recorder.register(1);
        let entities = vec![vesicle(0, 12.0)];

        recorder.sample(1.0, &entities);

        let tracked = recorder.series(0).unwrap();
        assert_eq!(tracked.snapshots.len(), 1);
        assert_eq!(tracked.snapshots[0].radius, 12.0);
        assert_eq!(tracked.snapshots[0].game_time, 1.0);
        assert!(tracked.updated);
        // a registered id with no live vesicle stays stale this period
        assert!(!recorder.series(1).unwrap().updated);
    }

    #[test]
    fn test_flags_reset_each_period() {
        let mut recorder = MetricsRecorder::new(1.0);
        recorder.sample(1.0, &[vesicle(0, 12.0)]);
        assert!(recorder.series(0).unwrap().updated);

        recorder.sample(2.0, &[]);
        assert!(!recorder.series(0).unwrap().updated);
        assert_eq!(recorder.snapshots(0).unwrap().len(), 1);
    }

    #[test]
    fn test_reused_id_splices_series() {
        let mut recorder = MetricsRecorder::new(1.0);
        recorder.sample(1.0, &[vesicle(5, 60.0)]);
        // after fission two daughters share the mother's id
        recorder.sample(2.0, &[vesicle(5, 3.0), vesicle(5, 2.0)]);

        let snapshots = recorder.snapshots(5).unwrap();
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0].radius, 60.0);
    }

    #[test]
    fn test_monomers_are_not_tracked() {
        let mut recorder = MetricsRecorder::new(1.0);
        let m = Entity::monomer(9, Behavior::None, 0, Vec2::ZERO, Vec2::ZERO);
        recorder.sample(1.0, &[m]);
        assert!(recorder.series(9).is_none());
    }

    #[test]
    fn test_summary_measures_population() {
        let mut entities = vec![vesicle(0, 10.0), vesicle(1, 30.0)];
        entities[0].particle.metrics.monomers_eaten = 2;
        entities.push(Entity::monomer(2, Behavior::None, 0, Vec2::ZERO, Vec2::ZERO));

        let summary = Summary::measure(5.0, &entities);

        assert_eq!(summary.vesicles, 2);
        assert_eq!(summary.monomers, 1);
        assert_eq!(summary.radius_mean, 20.0);
        assert_eq!(summary.radius_max, 30.0);
        assert_eq!(summary.monomers_eaten, 2);
        assert!(summary.summary().contains("Ves:   2"));
    }

    #[test]
    fn test_export_series() {
        let mut recorder = MetricsRecorder::new(1.0);
        recorder.sample(1.0, &[vesicle(0, 12.0), vesicle(1, 15.0)]);

        let dir = std::env::temp_dir().join("protosoup_metrics_test");
        std::fs::create_dir_all(&dir).unwrap();
        let written = recorder.export_series(&dir).unwrap();
        assert_eq!(written, 2);

        let contents = std::fs::read_to_string(dir.join("vesicle_0.csv")).unwrap();
        assert!(contents.starts_with("timer,radius,growth,distance,eaten"));
        assert!(contents.lines().count() >= 2);

        std::fs::remove_dir_all(&dir).ok();
    }
}
