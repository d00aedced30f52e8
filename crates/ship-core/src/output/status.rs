//! Status Reports
//!
//! Plain-text summaries of the ship and crew for the terminal.

use std::fmt::Write;

use crate::events::{VoyageOutcome, VoyageReport, VoyageSnapshot};

/// Ship and crew status, one block per character
pub fn render_status(snapshot: &VoyageSnapshot) -> String {
    let mut out = String::new();
    let ship = &snapshot.ship;

    let _ = writeln!(out, "=== DAY {} ===", snapshot.day);
    let _ = writeln!(out, "Heading: {:.0} (0=North/Danger, 180=South/Safety)", ship.heading);
    let _ = writeln!(out, "Temperature: {:.1}C", ship.temperature);
    let _ = writeln!(out, "Danger Level: {:.1}/100", ship.danger_level);
    let _ = writeln!(out, "Captain Authority: {:.1}/100", ship.captain_authority);
    let _ = writeln!(out, "Social Cohesion: {:.1}/100", ship.social_cohesion);
    let _ = writeln!(out, "Philosophical Tension: {:.1}/100", ship.philosophical_tension);

    let _ = writeln!(out, "\nCHARACTER STATUS:");
    for character in &snapshot.characters {
        let _ = writeln!(out, "\n  {} ({})", character.name, character.role);
        let _ = writeln!(out, "    Groups: {}", character.groups.join(", "));
        let _ = writeln!(out, "    Ideology: {}", character.ideology);
        let _ = writeln!(out, "    Satisfaction: {:.1}/100", character.satisfaction);
        let _ = writeln!(out, "    Stress: {:.1}/100", character.stress);
        let _ = writeln!(out, "    Trust in Captain: {:.1}/100", character.trust_in_captain);
        let _ = writeln!(out, "    Influence: {:.1}/100", character.influence);
        let _ = writeln!(out, "    State: {}", character.psychological_state);
        if !character.critical_needs.is_empty() {
            let _ = writeln!(out, "    Critical needs: {}", character.critical_needs.join(", "));
        }
        if !character.allies.is_empty() {
            let _ = writeln!(out, "    Allies: {}", character.allies.len());
        }
    }

    let active: Vec<_> = snapshot.active_alliances().collect();
    let _ = writeln!(out, "\nACTIVE ALLIANCES: {}", active.len());
    for (i, alliance) in active.iter().enumerate() {
        let members: Vec<&str> = alliance
            .members
            .iter()
            .filter_map(|id| snapshot.character(*id).map(|c| c.name.as_str()))
            .collect();
        let _ = writeln!(out, "  Alliance {}: {}", i + 1, members.join(", "));
        let _ = writeln!(out, "    Purpose: {}", alliance.purpose);
        let _ = writeln!(out, "    Strength: {:.1}/100", alliance.strength);
    }
    out
}

/// Closing summary printed when the voyage ends
pub fn render_epilogue(report: &VoyageReport) -> String {
    let mut out = String::new();

    let headline = match report.outcome {
        VoyageOutcome::Sunk => "THE SHIP HIT THE ICEBERGS AND SANK",
        VoyageOutcome::TurnedSouth => "THE SHIP TURNED SOUTH",
        VoyageOutcome::StillSailing => "THE SHIP SAILS ON NORTH",
    };
    let _ = writeln!(out, "=== {} ===", headline);
    if !report.unresolved_demands.is_empty() {
        let _ = writeln!(out, "\nThe passengers were still arguing about:");
        for demand in &report.unresolved_demands {
            let _ = writeln!(out, "  - {}", demand);
        }
    }

    let _ = writeln!(out, "\nFinal Statistics:");
    let _ = writeln!(out, "  Days survived: {}", report.days_survived);
    let _ = writeln!(out, "  Protests held: {}", report.protests);
    let _ = writeln!(
        out,
        "  Mutinies: {} attempted, {} succeeded",
        report.mutinies_attempted, report.mutinies_succeeded
    );
    let _ = writeln!(out, "  Leadership changes: {}", report.leadership_changes);
    let _ = writeln!(
        out,
        "  Alliances: {} formed, {} broken",
        report.alliances_formed, report.alliances_broken
    );
    let _ = writeln!(out, "  Captain's final authority: {:.1}/100", report.final_captain_authority);
    let _ = writeln!(out, "  Average stress level: {:.1}/100", report.average_stress);
    let _ = writeln!(out, "  Events recorded: {}", report.total_events);

    let _ = writeln!(out, "\nThis simulation demonstrates how:");
    for lesson in [
        "Groups focus on immediate grievances while ignoring existential threats",
        "Authority manipulates through small concessions",
        "Those warning about real danger are dismissed as extremists",
        "Conflicting memories and narratives prevent unified action",
        "The ship sinks while everyone argues about distribution of deck chairs",
    ] {
        let _ = writeln!(out, "- {}", lesson);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{AllianceSnapshot, CharacterSnapshot};
    use std::collections::BTreeMap;

    fn character(id: u32, name: &str) -> CharacterSnapshot {
        CharacterSnapshot {
            character_id: id,
            name: name.to_string(),
            role: "worker".to_string(),
            ideology: "anarchist".to_string(),
            groups: vec!["workers".to_string()],
            needs: BTreeMap::new(),
            critical_needs: vec!["warmth".to_string()],
            satisfaction: 30.0,
            stress: 80.0,
            trust_in_captain: 20.0,
            influence: 20.0,
            speaking_ability: 70.0,
            is_spokesperson: false,
            psychological_state: "angry".to_string(),
            emotions: Default::default(),
            hidden_agenda: "survive".to_string(),
            allies: vec![2],
            memory_count: 0,
        }
    }

    #[test]
    fn test_status_lists_crew_and_alliances() {
        let mut snapshot = VoyageSnapshot::new("status", 5, "status");
        snapshot.characters = vec![character(1, "Steward"), character(2, "Native Sailor")];
        snapshot.alliances = vec![
            AllianceSnapshot {
                alliance_id: "alliance_001".to_string(),
                members: vec![1, 2],
                purpose: "shared_grievances".to_string(),
                strength: 55.0,
                created_day: 2,
                broken: false,
            },
            AllianceSnapshot {
                alliance_id: "alliance_002".to_string(),
                members: vec![1],
                purpose: "shared_identity".to_string(),
                strength: 10.0,
                created_day: 3,
                broken: true,
            },
        ];

        let text = render_status(&snapshot);
        assert!(text.contains("=== DAY 5 ==="));
        assert!(text.contains("Steward (worker)"));
        assert!(text.contains("Critical needs: warmth"));
        assert!(text.contains("ACTIVE ALLIANCES: 1"));
        assert!(text.contains("Alliance 1: Steward, Native Sailor"));
    }

    #[test]
    fn test_epilogue_names_the_demands() {
        let report = VoyageReport {
            run_id: "run".to_string(),
            seed: 42,
            days_survived: 17,
            outcome: VoyageOutcome::Sunk,
            protests: 3,
            mutinies_attempted: 1,
            mutinies_succeeded: 0,
            leadership_changes: 0,
            alliances_formed: 4,
            alliances_broken: 1,
            final_captain_authority: 62.5,
            average_stress: 88.0,
            unresolved_demands: vec!["truth".to_string(), "warmth".to_string()],
            events_by_type: BTreeMap::new(),
            total_events: 40,
        };

        let text = render_epilogue(&report);
        assert!(text.starts_with("=== THE SHIP HIT THE ICEBERGS AND SANK ==="));
        assert!(text.contains("  - truth\n  - warmth"));
        assert!(text.contains("Days survived: 17"));
        assert!(text.contains("Protests held: 3"));
    }
}
