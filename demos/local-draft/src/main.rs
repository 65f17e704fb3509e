use matchforge::prelude::*;
use rand::seq::IndexedRandom;
use tracing_subscriber::EnvFilter;

const ROOM: &str = "K7QX2M";
const ADMIN: &str = "admin";

// ---------------------------------------------------------------------------
// Lobby
// ---------------------------------------------------------------------------

fn lobby() -> StaticRoster {
    let nicks = [
        "s1mple", "ZywOo", "NiKo", "m0NESY", "ropz", "donk", "sh1ro", "Twistzz", "broky",
        "karrigan",
    ];
    StaticRoster::new(
        nicks
            .iter()
            .enumerate()
            .map(|(i, nick)| Player::new(format!("p{i}"), *nick, format!("sess-{i}")))
            .collect(),
    )
}

async fn join(
    store: &MemoryStore,
    session_id: &SessionId,
) -> Result<DraftClient<MemoryStore>, MatchforgeError> {
    DraftClient::builder(store.clone())
        .connect(RoomId::new(ROOM), session_id.clone(), &SingleAdmin(SessionId::new(ADMIN)))
        .await
}

/// Picks a random active map for whichever captain holds the turn.
fn choose_map(session: &MatchSession) -> Option<MapId> {
    let active: Vec<&MapState> =
        session.maps.iter().filter(|m| m.status == MapStatus::Active).collect();
    let mut rng = rand::rng();
    active.choose(&mut rng).map(|m| m.id.clone())
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = MemoryStore::new(StoreConfig::default());
    let roster = lobby();

    let admin = join(&store, &SessionId::new(ADMIN)).await?;
    let spectator = join(&store, &SessionId::new("sess-9")).await?;
    let mut events = spectator.events();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match &event {
                DraftEvent::MapBanned { team, map_name, .. } => {
                    eprintln!("  {team} bans {map_name}");
                }
                DraftEvent::MapPicked { team, map_name, .. } => {
                    eprintln!("  {team} picks {map_name}");
                }
                DraftEvent::StepChanged { from, to } => eprintln!("step: {from} -> {to}"),
                DraftEvent::TeamsFormed { team_a, team_b } => {
                    for team in [team_a, team_b] {
                        let nicks: Vec<&str> =
                            team.players.iter().map(|p| p.nickname.as_str()).collect();
                        eprintln!("  {}: {}", team.name, nicks.join(", "));
                    }
                }
                DraftEvent::DraftComplete { .. } => break,
            }
        }
    });

    admin.set_team_format(TeamFormat::FiveVFive).await?;
    admin.set_match_format(MatchFormat::Md3).await?;
    admin.rename_team(TeamSide::TeamA, "Blue").await?;
    admin.rename_team(TeamSide::TeamB, "Orange").await?;
    admin.create_teams(&roster).await?;
    let started = admin.start_ban().await?;

    let session = started.session;
    let (Some(cap_a), Some(cap_b)) = (&session.team_a.captain_id, &session.team_b.captain_id)
    else {
        return Err("teams formed without captains".into());
    };
    let captain_a = join(&store, cap_a).await?;
    let captain_b = join(&store, cap_b).await?;

    while let Some(kind) = admin.current_action() {
        let captain = if captain_a.can_act() { &captain_a } else { &captain_b };
        let Some(map) = choose_map(&captain.session()) else {
            break;
        };
        let written = match kind {
            ActionKind::Ban => captain.ban(map.as_str()).await?,
            ActionKind::Pick => captain.pick(map.as_str()).await?,
        };
        for client in [&admin, &captain_a, &captain_b] {
            client.wait_for_version(written.version).await?;
        }
    }

    printer.await?;

    let finals: Vec<String> = admin
        .final_maps()
        .iter()
        .enumerate()
        .map(|(i, m)| format!("map {}: {} ({})", i + 1, m.id, m.status))
        .collect();
    eprintln!("{}", finals.join("\n"));
    println!("{}", serde_json::to_string_pretty(&admin.session())?);
    Ok(())
}
