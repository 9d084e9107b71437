use clap::{Parser, Subcommand};
use serde::Serialize;

use fitzone::{
    data_types::drill::CUSTOM_DRILL,
    processors::schedule::ScheduleFilter,
    util::{config::Config, logging},
    App, Session,
};

#[derive(Parser, Debug)]
#[command(name = "fitzone", about = "Match schedule and training progress for your team")]
struct Cli {
    /// Id of the signed-in user
    #[arg(long, env = "FITZONE_USER")]
    user: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fixtures of the favorite team with training progress
    Schedule {
        #[arg(long, default_value = "all")]
        filter: ScheduleFilter,
    },
    /// Choose league and team
    Follow { league: String, team: String },
    /// Drills of a match
    Drills { match_id: String },
    /// Add a blank drill to a match
    AddDrill { match_id: String },
    /// Add the default training set to a match
    Generate { match_id: String },
    /// Increment (or decrement with a negative delta) a drill
    Reps {
        match_id: String,
        drill_id: String,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Stored completion of a match
    Progress { match_id: String },
    /// Delete finished matches older than the given days
    Cleanup {
        #[arg(long)]
        days: Option<i64>,
    },
}

fn print<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load()?;
    logging::init(&config.logging);

    let app = App::from_config(&config).await?;
    let session = Session::new(cli.user)?;

    match cli.command {
        Command::Schedule { filter } => print(&app.schedule(&session, filter).await?),
        Command::Follow { league, team } => {
            print(&app.save_preferences(&session, &league, &team).await?)
        }
        Command::Drills { match_id } => print(&app.list_drills(&session, &match_id).await?),
        Command::AddDrill { match_id } => print(
            &app.add_drill(&session, &match_id, &CUSTOM_DRILL.to_new_drill())
                .await?,
        ),
        Command::Generate { match_id } => {
            print(&app.generate_training(&session, &match_id).await?)
        }
        Command::Reps {
            match_id,
            drill_id,
            delta,
        } => print(&app.adjust_reps(&session, &match_id, &drill_id, delta).await?),
        Command::Progress { match_id } => {
            print(&app.match_progress(&session, &match_id).await?)
        }
        Command::Cleanup { days } => print(&app.cleanup_old_matches(&session, days).await?),
    }
}
