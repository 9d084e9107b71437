use crate::data_types::drill::{Drill, DrillStats};

pub fn drill_stats(drills: &[Drill]) -> DrillStats {
    let mut stats = DrillStats {
        total_drills: drills.len(),
        ..Default::default()
    };

    for drill in drills {
        if drill.is_complete() {
            stats.completed_drills += 1;
        }
        stats.total_target_reps += drill.target_reps;
        stats.total_completed_reps += drill.completed_reps;

        let drill_type = if drill.r#type.is_empty() {
            "unknown".to_string()
        } else {
            drill.r#type.clone()
        };
        *stats.drill_types.entry(drill_type).or_insert(0) += 1;
    }

    if stats.total_drills > 0 {
        stats.completion_rate =
            stats.completed_drills as f64 / stats.total_drills as f64 * 100.0;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::drill::DEFAULT_TRAINING;

    #[test]
    fn counts_and_rates() {
        let mut drills: Vec<Drill> = DEFAULT_TRAINING
            .iter()
            .enumerate()
            .map(|(i, template)| {
                Drill::from_new(format!("d{}", i), "u1", "m1", &template.to_new_drill(), i as i64)
            })
            .collect();
        drills[0].completed_reps = 50;
        drills[1].completed_reps = 5;
        drills[3].r#type = "Push-ups".into();

        let stats = drill_stats(&drills);
        assert_eq!(stats.total_drills, 4);
        assert_eq!(stats.completed_drills, 1);
        assert_eq!(stats.total_target_reps, 105);
        assert_eq!(stats.total_completed_reps, 55);
        assert_eq!(stats.completion_rate, 25.0);
        assert_eq!(stats.drill_types.get("Push-ups"), Some(&2));
    }

    #[test]
    fn empty_match() {
        assert_eq!(drill_stats(&[]), DrillStats::default());
    }
}
