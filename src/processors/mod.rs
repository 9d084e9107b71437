pub mod drills;
pub mod fixture_id;
pub mod matcher;
pub mod preferences;
pub mod progress;
pub mod schedule;
pub mod statistics;
pub mod team_names;
