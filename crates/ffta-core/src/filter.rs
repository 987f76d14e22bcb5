//! Row filters applied to list requests
//!
//! Filtering is defined per entity. Jobs match a race against any of their
//! three race slots; abilities match race, job and name independently.
//! Races have no filters and always come back whole.

use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::table::{Row, Table};

/// Columns naming the races eligible for a job
pub const JOB_RACE_SLOTS: [&str; 3] = ["race1", "race2", "race3"];
/// Race column on abilities
pub const RACE_COLUMN: &str = "race";
/// Job column on abilities
pub const JOB_COLUMN: &str = "job";
/// Name column on jobs and abilities
pub const NAME_COLUMN: &str = "name";

/// Optional filter parameters taken from the query string
#[derive(Debug, Clone, Default)]
pub struct ListFilters {
    pub race: Option<String>,
    pub job: Option<String>,
    pub ability: Option<String>,
}

impl ListFilters {
    /// Collect filters from decoded query pairs.
    ///
    /// A repeated key keeps its first value; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut filters = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "race" => &mut filters.race,
                "job" => &mut filters.job,
                "ability" => &mut filters.ability,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        filters
    }

    pub fn with_race(mut self, race: impl Into<String>) -> Self {
        self.race = Some(race.into());
        self
    }

    pub fn with_job(mut self, job: impl Into<String>) -> Self {
        self.job = Some(job.into());
        self
    }

    pub fn with_ability(mut self, ability: impl Into<String>) -> Self {
        self.ability = Some(ability.into());
        self
    }

    fn race(&self) -> Option<&str> {
        active(&self.race)
    }

    fn job(&self) -> Option<&str> {
        active(&self.job)
    }

    fn ability(&self) -> Option<&str> {
        active(&self.ability)
    }
}

/// Blank parameters count as absent
fn active(param: &Option<String>) -> Option<&str> {
    param.as_deref().filter(|p| !p.trim().is_empty())
}

/// Strip all whitespace and lowercase
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A single condition a row must satisfy
#[derive(Debug)]
enum Predicate {
    /// Some column equals the value, ignoring case
    AnyEquals { columns: Vec<usize>, value: String },
    /// The normalized column contains the normalized needle
    Contains { column: usize, needle: String },
}

impl Predicate {
    fn matches(&self, row: &Row) -> bool {
        match self {
            Predicate::AnyEquals { columns, value } => columns.iter().any(|&col| {
                row.get(col)
                    .is_some_and(|cell| cell.to_string_value().trim().to_lowercase() == *value)
            }),
            Predicate::Contains { column, needle } => row
                .get(*column)
                .is_some_and(|cell| normalize(&cell.to_string_value()).contains(needle.as_str())),
        }
    }
}

struct PredicateBuilder<'a> {
    entity: Entity,
    table: &'a Table,
    predicates: Vec<Predicate>,
}

impl<'a> PredicateBuilder<'a> {
    fn new(entity: Entity, table: &'a Table) -> Self {
        Self {
            entity,
            table,
            predicates: Vec::new(),
        }
    }

    fn column(&self, name: &str) -> Result<usize> {
        self.table
            .find_column(name)
            .map(|c| c.index)
            .ok_or_else(|| Error::MissingColumn {
                entity: self.entity,
                column: name.to_string(),
            })
    }

    fn any_equals(&mut self, columns: &[&str], value: Option<&str>) -> Result<()> {
        let Some(value) = value else { return Ok(()) };
        let columns = columns
            .iter()
            .map(|name| self.column(name))
            .collect::<Result<Vec<_>>>()?;
        self.predicates.push(Predicate::AnyEquals {
            columns,
            value: value.trim().to_lowercase(),
        });
        Ok(())
    }

    fn contains(&mut self, column: &str, value: Option<&str>) -> Result<()> {
        let Some(value) = value else { return Ok(()) };
        let column = self.column(column)?;
        self.predicates.push(Predicate::Contains {
            column,
            needle: normalize(value),
        });
        Ok(())
    }
}

/// Indices of the rows of `table` that pass the entity's filters, in file order
pub fn matching_rows(entity: Entity, table: &Table, filters: &ListFilters) -> Result<Vec<usize>> {
    let mut builder = PredicateBuilder::new(entity, table);

    match entity {
        Entity::Races => {}
        Entity::Jobs => {
            builder.any_equals(&JOB_RACE_SLOTS, filters.race())?;
            builder.contains(NAME_COLUMN, filters.ability())?;
        }
        Entity::Abilities => {
            builder.any_equals(&[RACE_COLUMN], filters.race())?;
            builder.contains(JOB_COLUMN, filters.job())?;
            builder.contains(NAME_COLUMN, filters.ability())?;
        }
    }

    let predicates = builder.predicates;
    Ok(table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| predicates.iter().all(|p| p.matches(row)))
        .map(|(i, _)| i)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_csv_str;

    const JOBS: &str = "name,race1,race2,race3\n\
        Soldier,Human,Elf,\n\
        Paladin,Dwarf,Human,\n\
        Fencer,Viera,,\n";

    const ABILITIES: &str = "name,race,job\n\
        Fire Bolt,Human,Black Mage\n\
        Firebolt II,Nu Mou,Black Mage\n\
        Cure,Human,White Mage\n";

    fn jobs() -> Table {
        parse_csv_str(JOBS, "jobs.csv").unwrap()
    }

    fn abilities() -> Table {
        parse_csv_str(ABILITIES, "abilities.csv").unwrap()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(" Fire  Bolt\t"), "firebolt");
        assert_eq!(normalize("WHITE mage"), "whitemage");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_from_pairs_keeps_first_value() {
        let filters = ListFilters::from_pairs([
            ("race", "viera"),
            ("sort", "desc"),
            ("race", "human"),
            ("ability", "fen"),
        ]);
        assert_eq!(filters.race.as_deref(), Some("viera"));
        assert_eq!(filters.ability.as_deref(), Some("fen"));
        assert_eq!(filters.job, None);

        let rows = matching_rows(Entity::Jobs, &jobs(), &filters).unwrap();
        assert_eq!(rows, vec![2]);
    }

    #[test]
    fn test_no_filters_returns_everything() {
        let rows = matching_rows(Entity::Jobs, &jobs(), &ListFilters::default()).unwrap();
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_jobs_race_matches_any_slot() {
        let filters = ListFilters::default().with_race("human");
        let rows = matching_rows(Entity::Jobs, &jobs(), &filters).unwrap();
        assert_eq!(rows, vec![0, 1]);
    }

    #[test]
    fn test_jobs_race_is_equality_not_substring() {
        let filters = ListFilters::default().with_race("hum");
        let rows = matching_rows(Entity::Jobs, &jobs(), &filters).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_jobs_ability_matches_name_substring() {
        let filters = ListFilters::default().with_ability("PALA din");
        let rows = matching_rows(Entity::Jobs, &jobs(), &filters).unwrap();
        assert_eq!(rows, vec![1]);
    }

    #[test]
    fn test_jobs_ignores_job_param() {
        let filters = ListFilters::default().with_job("nothing matches this");
        let rows = matching_rows(Entity::Jobs, &jobs(), &filters).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_abilities_name_substring() {
        let exact = ListFilters::default().with_ability("fire bolt");
        let rows = matching_rows(Entity::Abilities, &abilities(), &exact).unwrap();
        // "firebolt" is also a substring of "fireboltii"
        assert_eq!(rows, vec![0, 1]);

        let prefix = ListFilters::default().with_ability("fire");
        let rows = matching_rows(Entity::Abilities, &abilities(), &prefix).unwrap();
        assert_eq!(rows, vec![0, 1]);

        let suffix = ListFilters::default().with_ability("bolt ii");
        let rows = matching_rows(Entity::Abilities, &abilities(), &suffix).unwrap();
        assert_eq!(rows, vec![1]);
    }

    #[test]
    fn test_abilities_filters_are_conjunctive() {
        let filters = ListFilters::default()
            .with_race("HUMAN")
            .with_job("mage");
        let rows = matching_rows(Entity::Abilities, &abilities(), &filters).unwrap();
        assert_eq!(rows, vec![0, 2]);

        let filters = filters.with_ability("cure");
        let rows = matching_rows(Entity::Abilities, &abilities(), &filters).unwrap();
        assert_eq!(rows, vec![2]);
    }

    #[test]
    fn test_blank_params_are_ignored() {
        let filters = ListFilters::default()
            .with_race("")
            .with_job("   ")
            .with_ability("");
        let rows = matching_rows(Entity::Abilities, &abilities(), &filters).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_races_are_never_filtered() {
        let races = parse_csv_str("name\nHuman\nBangaa\n", "races.csv").unwrap();
        let filters = ListFilters::default().with_race("viera").with_ability("x");
        let rows = matching_rows(Entity::Races, &races, &filters).unwrap();
        assert_eq!(rows, vec![0, 1]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let table = parse_csv_str("name,race1\nSoldier,Human\n", "jobs.csv").unwrap();
        let filters = ListFilters::default().with_race("human");
        let err = matching_rows(Entity::Jobs, &table, &filters).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingColumn { column, .. } if column == "race2"
        ));

        // inactive filters never look at columns
        assert!(matching_rows(Entity::Jobs, &table, &ListFilters::default()).is_ok());
    }
}
