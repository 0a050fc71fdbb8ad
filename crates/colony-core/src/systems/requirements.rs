//! Prerequisite evaluation against current building and research levels.

use colony_logic::catalog::Requirement;

use crate::components::{BuildingLevels, ResearchLevels};

/// Whether one requirement holds. Unknown ids read as level 0.
pub fn requirement_met(
    requirement: &Requirement,
    buildings: &BuildingLevels,
    research: &ResearchLevels,
) -> bool {
    match requirement {
        Requirement::Research(id) => research.is_built(id),
        Requirement::Building(id) => buildings.is_built(id),
        Requirement::BuildingLevel { id, level } => buildings.level(id) >= *level,
    }
}

/// Conjunction of every requirement. An empty list is satisfied.
pub fn requirements_met(
    requirements: &[Requirement],
    buildings: &BuildingLevels,
    research: &ResearchLevels,
) -> bool {
    requirements
        .iter()
        .all(|r| requirement_met(r, buildings, research))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(entries: &[(&str, u32)]) -> crate::components::LevelTable {
        let mut table = crate::components::LevelTable::new();
        for (id, level) in entries {
            table.set_level(id, *level);
        }
        table
    }

    #[test]
    fn test_empty_list_is_met() {
        assert!(requirements_met(&[], &levels(&[]), &levels(&[])));
    }

    #[test]
    fn test_research_requirement() {
        let req = vec![Requirement::Research("laser_tech".into())];
        assert!(!requirements_met(&req, &levels(&[]), &levels(&[])));
        assert!(requirements_met(
            &req,
            &levels(&[]),
            &levels(&[("laser_tech", 1)])
        ));
    }

    #[test]
    fn test_building_requirement_ignores_research_table() {
        let req = vec![Requirement::Building("trade_port".into())];
        assert!(!requirements_met(
            &req,
            &levels(&[]),
            &levels(&[("trade_port", 1)])
        ));
        assert!(requirements_met(
            &req,
            &levels(&[("trade_port", 2)]),
            &levels(&[])
        ));
    }

    #[test]
    fn test_building_level_requirement() {
        let req = vec![Requirement::BuildingLevel {
            id: "colony_hub".into(),
            level: 3,
        }];
        assert!(!requirements_met(&req, &levels(&[("colony_hub", 2)]), &levels(&[])));
        assert!(requirements_met(&req, &levels(&[("colony_hub", 3)]), &levels(&[])));
    }

    #[test]
    fn test_conjunction_needs_every_entry() {
        let req = vec![
            Requirement::Research("laser_tech".into()),
            Requirement::Building("research_lab".into()),
        ];
        let buildings = levels(&[("research_lab", 1)]);
        assert!(!requirements_met(&req, &buildings, &levels(&[])));
        assert!(requirements_met(&req, &buildings, &levels(&[("laser_tech", 1)])));
    }

    #[test]
    fn test_unknown_id_is_unmet() {
        let req = vec![Requirement::Building("no_such_building".into())];
        assert!(!requirements_met(&req, &levels(&[]), &levels(&[])));
    }
}
