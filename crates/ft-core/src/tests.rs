//! Unit tests for ft-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, LaneId, VertexId};

    #[test]
    fn index_and_from_index_agree() {
        let id = VertexId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(VertexId::from_index(42), id);
    }

    #[test]
    fn ordering_follows_inner_value() {
        assert!(AgentId(0) < AgentId(1));
        assert!(VertexId(100) > VertexId(99));
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(AgentId::default(), AgentId::INVALID);
        assert_eq!(LaneId::INVALID.0, u32::MAX);
        assert!(!VertexId::default().is_valid());
        assert!(VertexId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(VertexId(3).to_string(), "VertexId(3)");
    }
}

#[cfg(test)]
mod geo {
    use crate::Point2;

    #[test]
    fn distance_345() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
        assert!((a.distance_sq(b) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn zero_distance() {
        let p = Point2::new(12.5, -3.0);
        assert_eq!(p.distance(p), 0.0);
    }
}

#[cfg(test)]
mod time {
    use crate::Tick;

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.next(), Tick(11));
        assert_eq!(Tick::ZERO.next(), Tick(1));
    }

    #[test]
    fn falls_on_interval() {
        assert!(Tick(0).falls_on(5));
        assert!(Tick(10).falls_on(5));
        assert!(!Tick(7).falls_on(5));
        assert!(!Tick(0).falls_on(0), "interval 0 means never");
    }

    #[test]
    fn display() {
        assert_eq!(Tick(4).to_string(), "T4");
    }
}

#[cfg(test)]
mod status {
    use crate::AgentStatus;

    #[test]
    fn default_is_unassigned() {
        assert_eq!(AgentStatus::default(), AgentStatus::Unassigned);
    }

    #[test]
    fn active_states() {
        assert!(!AgentStatus::Unassigned.is_active());
        assert!(AgentStatus::TaskAssigned.is_active());
        assert!(AgentStatus::Moving.is_active());
        assert!(AgentStatus::Waiting.is_active());
        assert!(!AgentStatus::TaskComplete.is_active());
    }

    #[test]
    fn labels() {
        assert_eq!(AgentStatus::TaskComplete.to_string(), "task_complete");
        assert_eq!(AgentStatus::Waiting.as_str(), "waiting");
    }
}

#[cfg(test)]
mod config {
    use crate::EngineConfig;

    #[test]
    fn default_is_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.resolve_deadlocks);
        assert_eq!(cfg.replan_after_wait_ticks, None);
    }

    #[test]
    fn zero_replan_threshold_rejected() {
        let cfg = EngineConfig { replan_after_wait_ticks: Some(0), ..EngineConfig::default() };
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: u32 = r1.gen_range(0..1000);
            let b: u32 = r2.gen_range(0..1000);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn choose_from_empty_is_none() {
        let mut rng = SimRng::new(0);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[9]), Some(&9));
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }
}
