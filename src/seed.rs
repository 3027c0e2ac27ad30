use chrono::{DateTime, Duration, Utc};
use log::info;

use crate::errors::VotingError;
use crate::models::{Election, NewElection};
use crate::service::VotingService;

/// Replaces the stored elections with three demo elections relative to `now`:
/// one open, one upcoming, one already completed.
pub fn seed_sample_elections(
    service: &mut VotingService,
    now: DateTime<Utc>,
) -> Result<Vec<Election>, VotingError> {
    service.clear_elections();

    let council = service.create_election(sample(
        "University Student Council Election",
        "Vote for your representatives in the Student Council for the upcoming academic year.",
        now - Duration::days(1),
        now + Duration::days(7),
        &["Alex Johnson", "Maria Garcia", "David Smith", "Sarah Williams"],
    ))?;
    let council = service.activate_election(&council.id)?;

    let park = service.create_election(sample(
        "Community Park Development Project",
        "Vote on the proposed development plans for the new community park.",
        now + Duration::days(1),
        now + Duration::days(14),
        &[
            "Option A: Sports Facilities",
            "Option B: Playground & Gardens",
            "Option C: Both Projects",
        ],
    ))?;

    let board = service.create_election(sample(
        "Board of Directors Election",
        "Annual election for the Board of Directors positions.",
        now - Duration::days(7),
        now - Duration::days(1),
        &[
            "Jennifer Brown",
            "Michael Davis",
            "Robert Wilson",
            "Lisa Taylor",
            "James Miller",
        ],
    ))?;
    let board = service.deactivate_election(&board.id)?;

    info!("sample elections created");
    info!("1. {} - Active", council.title);
    info!("2. {} - Upcoming", park.title);
    info!("3. {} - Completed", board.title);

    Ok(vec![council, park, board])
}

fn sample(
    title: &str,
    description: &str,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    candidates: &[&str],
) -> NewElection {
    NewElection {
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        start_date: Some(start_date),
        end_date: Some(end_date),
        candidates: Some(candidates.iter().map(|c| c.to_string()).collect()),
        created_by: Some("admin".to_string()),
    }
}
