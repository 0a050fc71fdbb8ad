//! Scheduler - timed jobs for construction, research and ship builds

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::components::{BuildingLevels, ResearchLevels, ShipId};
use crate::fleet::Fleet;

/// Slack for the float sim clock when comparing against integer durations.
const COMPLETION_EPSILON_MS: f64 = 1e-6;

/// What a job will do when it completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobKind {
    Building { id: String, target_level: u32 },
    Research { id: String, target_level: u32 },
    Ship { ship: ShipId },
}

impl JobKind {
    pub fn target(&self) -> JobTarget {
        match self {
            Self::Building { id, .. } => JobTarget::Building(id.clone()),
            Self::Research { id, .. } => JobTarget::Research(id.clone()),
            Self::Ship { ship } => JobTarget::Ship(*ship),
        }
    }

    pub fn target_level(&self) -> Option<u32> {
        match self {
            Self::Building { target_level, .. } | Self::Research { target_level, .. } => {
                Some(*target_level)
            }
            Self::Ship { .. } => None,
        }
    }
}

/// Identifies a job by what it works on. At most one job exists per target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobTarget {
    Building(String),
    Research(String),
    Ship(ShipId),
}

impl fmt::Display for JobTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Building(id) => write!(f, "building `{}`", id),
            Self::Research(id) => write!(f, "research `{}`", id),
            Self::Ship(ship) => write!(f, "{}", ship),
        }
    }
}

/// An in-flight job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub kind: JobKind,
    /// Sim time (ms) when the job was accepted.
    pub started_at_ms: f64,
    pub duration_ms: u64,
}

impl Job {
    pub fn new(kind: JobKind, started_at_ms: f64, duration_ms: u64) -> Self {
        Self {
            kind,
            started_at_ms,
            duration_ms,
        }
    }

    pub fn target(&self) -> JobTarget {
        self.kind.target()
    }

    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.started_at_ms).max(0.0)
    }

    /// Percent complete in [0, 100]. A zero-length job reads as 100.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms == 0 {
            return 100.0;
        }
        (self.elapsed_ms(now_ms) / self.duration_ms as f64 * 100.0).min(100.0)
    }

    pub fn is_complete(&self, now_ms: f64) -> bool {
        now_ms + COMPLETION_EPSILON_MS >= self.finishes_at_ms()
    }

    /// Sim time (ms) at which the job completes.
    pub fn finishes_at_ms(&self) -> f64 {
        self.started_at_ms + self.duration_ms as f64
    }
}

/// In-flight jobs in acceptance order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobQueue {
    jobs: Vec<Job>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a job unless one already exists for its target.
    pub fn add_job(&mut self, job: Job) -> bool {
        if self.contains(&job.target()) {
            return false;
        }
        self.jobs.push(job);
        true
    }

    pub fn get(&self, target: &JobTarget) -> Option<&Job> {
        self.jobs.iter().find(|j| &j.target() == target)
    }

    /// Earliest sim time (ms) at which any in-flight job completes.
    pub fn next_completion_ms(&self) -> Option<f64> {
        self.jobs
            .iter()
            .map(Job::finishes_at_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn contains(&self, target: &JobTarget) -> bool {
        self.get(target).is_some()
    }

    /// True while a Building job for `id` is in flight.
    pub fn is_constructing(&self, id: &str) -> bool {
        self.jobs
            .iter()
            .any(|j| matches!(&j.kind, JobKind::Building { id: b, .. } if b == id))
    }

    /// Remove a job without applying it.
    pub fn cancel(&mut self, target: &JobTarget) -> Option<Job> {
        let index = self.jobs.iter().position(|j| &j.target() == target)?;
        Some(self.jobs.remove(index))
    }

    /// Remove and return every job finished at `now_ms`, in acceptance order.
    pub fn take_completed(&mut self, now_ms: f64) -> Vec<Job> {
        let (done, pending): (Vec<Job>, Vec<Job>) = std::mem::take(&mut self.jobs)
            .into_iter()
            .partition(|j| j.is_complete(now_ms));
        self.jobs = pending;
        done
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Complete every due job and apply its effect. Returns the completed jobs.
pub fn scheduler_system(
    jobs: &mut JobQueue,
    now_ms: f64,
    buildings: &mut BuildingLevels,
    research: &mut ResearchLevels,
    fleet: &mut Fleet,
) -> Vec<Job> {
    let completed = jobs.take_completed(now_ms);
    for job in &completed {
        match &job.kind {
            JobKind::Building { id, target_level } => {
                buildings.set_level(id, *target_level);
                log::debug!("building {} reached level {}", id, target_level);
            }
            JobKind::Research { id, target_level } => {
                research.set_level(id, *target_level);
                log::debug!("research {} reached level {}", id, target_level);
            }
            JobKind::Ship { ship } => {
                if fleet.update(*ship, |s| s.finish_construction()).is_some() {
                    log::debug!("{} construction finished", ship);
                } else {
                    log::warn!("completed build for missing {}", ship);
                }
            }
        }
    }
    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{LevelTable, ShipInstance, ShipStatus};

    fn building_job(id: &str, level: u32, start: f64, duration: u64) -> Job {
        Job::new(
            JobKind::Building {
                id: id.into(),
                target_level: level,
            },
            start,
            duration,
        )
    }

    #[test]
    fn test_progress_is_capped() {
        let job = building_job("iron_refinery", 1, 1_000.0, 10_000);
        assert_eq!(job.progress(1_000.0), 0.0);
        assert_eq!(job.progress(6_000.0), 50.0);
        assert_eq!(job.progress(50_000.0), 100.0);
        assert_eq!(job.progress(0.0), 0.0);
    }

    #[test]
    fn test_zero_duration_is_immediately_complete() {
        let job = building_job("x", 1, 500.0, 0);
        assert_eq!(job.progress(500.0), 100.0);
        assert!(job.is_complete(500.0));
    }

    #[test]
    fn test_completion_boundary() {
        let job = building_job("x", 1, 0.0, 6_141);
        assert!(!job.is_complete(6_140.0));
        assert!(job.is_complete(6.141 * 1000.0));
        assert!(job.is_complete(6_141.0));
    }

    #[test]
    fn test_complete_exactly_at_finish_instant() {
        // started late in a long session, where ms values carry little precision
        let job = building_job("x", 1, 3.7e10 + 0.3, 6_141);
        assert!(job.is_complete(job.finishes_at_ms()));
        assert!(!job.is_complete(job.finishes_at_ms() - 1.0));
    }

    #[test]
    fn test_next_completion() {
        let mut queue = JobQueue::new();
        assert_eq!(queue.next_completion_ms(), None);
        queue.add_job(building_job("a", 1, 500.0, 1_000));
        queue.add_job(building_job("b", 1, 0.0, 800));
        queue.add_job(building_job("c", 1, 100.0, 5_000));
        assert_eq!(queue.next_completion_ms(), Some(800.0));
    }

    #[test]
    fn test_one_job_per_target() {
        let mut queue = JobQueue::new();
        assert!(queue.add_job(building_job("iron_refinery", 1, 0.0, 10)));
        assert!(!queue.add_job(building_job("iron_refinery", 2, 0.0, 10)));
        assert!(queue.add_job(Job::new(
            JobKind::Research {
                id: "iron_refinery".into(),
                target_level: 1
            },
            0.0,
            10
        )));
        assert_eq!(queue.len(), 2);
        assert!(queue.is_constructing("iron_refinery"));
        assert!(!queue.is_constructing("copper_refinery"));
    }

    #[test]
    fn test_take_completed_keeps_pending() {
        let mut queue = JobQueue::new();
        queue.add_job(building_job("a", 1, 0.0, 100));
        queue.add_job(building_job("b", 1, 0.0, 300));
        queue.add_job(building_job("c", 1, 0.0, 200));
        let done = queue.take_completed(200.0);
        let ids: Vec<JobTarget> = done.iter().map(|j| j.target()).collect();
        assert_eq!(
            ids,
            vec![JobTarget::Building("a".into()), JobTarget::Building("c".into())]
        );
        assert_eq!(queue.len(), 1);
        assert!(queue.contains(&JobTarget::Building("b".into())));
    }

    #[test]
    fn test_cancel() {
        let mut queue = JobQueue::new();
        queue.add_job(building_job("a", 1, 0.0, 100));
        assert!(queue.cancel(&JobTarget::Building("b".into())).is_none());
        assert!(queue.cancel(&JobTarget::Building("a".into())).is_some());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_scheduler_applies_all_kinds() {
        let mut queue = JobQueue::new();
        let mut buildings = LevelTable::new();
        let mut research = LevelTable::new();
        let mut fleet = Fleet::new();
        let ship = fleet.allocate_id();
        fleet.spawn(ShipInstance::new(ship, "scout", "Scout #1".into(), 10.0));

        queue.add_job(building_job("iron_refinery", 2, 0.0, 100));
        queue.add_job(Job::new(
            JobKind::Research {
                id: "laser_tech".into(),
                target_level: 1,
            },
            0.0,
            100,
        ));
        queue.add_job(Job::new(JobKind::Ship { ship }, 0.0, 100));
        queue.add_job(building_job("solar_plant", 1, 0.0, 1_000));

        let done = scheduler_system(&mut queue, 100.0, &mut buildings, &mut research, &mut fleet);
        assert_eq!(done.len(), 3);
        assert_eq!(buildings.level("iron_refinery"), 2);
        assert_eq!(buildings.level("solar_plant"), 0);
        assert_eq!(research.level("laser_tech"), 1);
        assert_eq!(fleet.get(ship).unwrap().status, ShipStatus::Idle);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_target_display() {
        assert_eq!(
            JobTarget::Building("solar_plant".into()).to_string(),
            "building `solar_plant`"
        );
        assert_eq!(JobTarget::Ship(ShipId(4)).to_string(), "ship-4");
    }
}
