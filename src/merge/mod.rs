//! Merge engine
//!
//! Joins the registry, the country facts and the year-partitioned indicator
//! tables into exactly one record per registry entry. This is a pure fold
//! over already-loaded inputs: no I/O, no shared state, and deterministic
//! output for identical inputs, so it is safe to re-run from a scheduler.
//!
//! The registry drives everything: the engine never fabricates a country
//! the registry does not list, never drops one it does, and never merges
//! across regions.

use crate::domain::{
    FactSource, IndicatorTable, MergeStats, MergedDataset, MergedRecord, MergedRegion, Registry,
    INDICATORS,
};
use std::collections::BTreeMap;

/// Merge the three sources. `tables` must be ordered most recent first, as
/// produced by the indicator loader.
pub fn merge_dataset(
    registry: &Registry,
    facts: &FactSource,
    tables: &[IndicatorTable],
) -> (MergedDataset, MergeStats) {
    let mut stats = MergeStats {
        regions: registry.regions.len(),
        years_scanned: tables.iter().map(|t| t.year).collect(),
        ..MergeStats::default()
    };
    let newest_year = tables.first().map(|t| t.year);

    let mut regions = Vec::with_capacity(registry.regions.len());
    for region in &registry.regions {
        let mut records = Vec::with_capacity(region.countries.len());
        for entry in &region.countries {
            stats.countries += 1;

            // Partial coverage is expected: a lookup miss leaves the fact
            // fields null and the merge continues.
            let fact = facts.lookup(&region.name, &entry.name);
            match fact {
                Some(_) => stats.facts_matched += 1,
                None => stats.facts_missing += 1,
            }

            let mut indicators = BTreeMap::new();
            for indicator in &INDICATORS {
                let resolved = resolve_indicator(tables, &entry.name, indicator.name);
                match resolved {
                    Some((_, year)) => {
                        stats.indicators_resolved += 1;
                        if Some(year) != newest_year {
                            stats.indicators_backfilled += 1;
                        }
                    }
                    None => stats.indicators_missing += 1,
                }
                indicators.insert(indicator.name.to_string(), resolved.map(|(value, _)| value));
            }

            records.push(MergedRecord {
                name: entry.name.clone(),
                localized_name: entry.localized_name.clone(),
                code: entry.code.clone(),
                source_url: entry.source_url.clone(),
                capital: fact.and_then(|f| f.capital.clone()),
                area: fact.and_then(|f| f.area),
                population: fact.and_then(|f| f.population),
                latitude: entry.latitude,
                longitude: entry.longitude,
                indicators,
            });
        }
        regions.push(MergedRegion { name: region.name.clone(), records });
    }

    (MergedDataset { regions }, stats)
}

/// Recency backfill for one (country, indicator) pair: scan newest→oldest and
/// take the first table where the country row exists and the value is
/// non-null. Returns the value with its source year. Each indicator resolves
/// independently, so one record may mix years.
fn resolve_indicator(
    tables: &[IndicatorTable],
    country: &str,
    indicator: &str,
) -> Option<(f64, i32)> {
    tables
        .iter()
        .find_map(|table| table.value(country, indicator).map(|value| (value, table.year)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CountryFact, Region, RegistryEntry};
    use similar_asserts::assert_eq;
    use std::collections::HashMap;

    const GDP: &str = "GDP (current US$)";
    const GROWTH: &str = "GDP growth (annual %)";

    fn entry(name: &str) -> RegistryEntry {
        RegistryEntry {
            name: name.to_string(),
            localized_name: format!("{name}-localized"),
            code: name[..2.min(name.len())].to_uppercase(),
            source_url: format!("https://example.org/{}", name.to_lowercase()),
            latitude: 10.0,
            longitude: 20.0,
        }
    }

    fn fact(name: &str, capital: &str) -> CountryFact {
        CountryFact {
            name: name.to_string(),
            capital: Some(capital.to_string()),
            area: Some(1000),
            population: Some(5_000_000),
        }
    }

    fn registry() -> Registry {
        Registry {
            regions: vec![
                Region {
                    name: "Europe".to_string(),
                    countries: vec![entry("France"), entry("Germany")],
                },
                Region { name: "Asia".to_string(), countries: vec![entry("Japan")] },
            ],
        }
    }

    fn table(year: i32, cells: &[(&str, &str, f64)]) -> IndicatorTable {
        let mut t = IndicatorTable::new(year, vec![GDP.to_string(), GROWTH.to_string()]);
        for (country, indicator, value) in cells {
            t.insert(country, indicator, *value);
        }
        t
    }

    #[test]
    fn one_record_per_registry_entry_in_registry_order() {
        let (dataset, stats) = merge_dataset(&registry(), &FactSource::empty(), &[]);

        assert_eq!(dataset.record_count(), 3);
        let regions: Vec<&str> = dataset.regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(regions, ["Europe", "Asia"]);
        let europe: Vec<&str> =
            dataset.regions[0].records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(europe, ["France", "Germany"]);
        assert_eq!(stats.countries, 3);
        assert_eq!(stats.facts_missing, 3);
    }

    #[test]
    fn no_country_is_fabricated() {
        let facts = FactSource::FlatList(vec![fact("Atlantis", "Poseidonia")]);
        let (dataset, _) = merge_dataset(&registry(), &facts, &[]);
        assert!(dataset
            .regions
            .iter()
            .flat_map(|r| &r.records)
            .all(|r| ["France", "Germany", "Japan"].contains(&r.name.as_str())));
    }

    #[test]
    fn fact_fields_attach_on_match_and_stay_null_on_miss() {
        let facts = FactSource::FlatList(vec![fact("France", "Paris")]);
        let (dataset, stats) = merge_dataset(&registry(), &facts, &[]);

        let france = &dataset.regions[0].records[0];
        assert_eq!(france.capital.as_deref(), Some("Paris"));
        assert_eq!(france.area, Some(1000));

        let germany = &dataset.regions[0].records[1];
        assert_eq!(germany.capital, None);
        assert_eq!(germany.area, None);
        assert_eq!(germany.population, None);

        assert_eq!(stats.facts_matched, 1);
        assert_eq!(stats.facts_missing, 2);
    }

    #[test]
    fn backfill_takes_first_non_null_scanning_newest_to_oldest() {
        let tables = vec![
            table(2023, &[]),
            table(2022, &[("France", GDP, 5.0)]),
            table(2021, &[("France", GDP, 4.0)]),
        ];
        let (dataset, _) = merge_dataset(&registry(), &FactSource::empty(), &tables);
        let france = &dataset.regions[0].records[0];
        assert_eq!(france.indicators[GDP], Some(5.0));
    }

    #[test]
    fn indicators_resolve_independently_per_indicator() {
        let tables = vec![
            table(2023, &[("France", GDP, 9.0)]),
            table(2021, &[("France", GDP, 4.0), ("France", GROWTH, 1.1)]),
        ];
        let (dataset, stats) = merge_dataset(&registry(), &FactSource::empty(), &tables);
        let france = &dataset.regions[0].records[0];
        // GDP from the newest table, growth backfilled two years.
        assert_eq!(france.indicators[GDP], Some(9.0));
        assert_eq!(france.indicators[GROWTH], Some(1.1));
        assert_eq!(stats.indicators_backfilled, 1);
    }

    #[test]
    fn full_miss_resolves_to_null_and_merge_completes() {
        let tables =
            vec![table(2023, &[("Germany", GDP, 7.0)]), table(2022, &[("Germany", GDP, 6.0)])];
        let (dataset, _) = merge_dataset(&registry(), &FactSource::empty(), &tables);
        let france = &dataset.regions[0].records[0];
        assert_eq!(france.indicators[GDP], None);
    }

    #[test]
    fn empty_table_set_yields_all_null_indicators() {
        let (dataset, stats) = merge_dataset(&registry(), &FactSource::empty(), &[]);
        let france = &dataset.regions[0].records[0];
        assert_eq!(france.indicators.len(), INDICATORS.len());
        assert!(france.indicators.values().all(Option::is_none));
        assert_eq!(stats.indicators_missing, 3 * INDICATORS.len());
        assert_eq!(stats.indicators_resolved, 0);
    }

    #[test]
    fn column_absent_from_newest_schema_continues_to_older_tables() {
        // 2023 table has no growth column at all; 2022 has the value.
        let mut newest = IndicatorTable::new(2023, vec![GDP.to_string()]);
        newest.insert("France", GDP, 9.0);
        let tables = vec![newest, table(2022, &[("France", GROWTH, 2.2)])];

        let (dataset, _) = merge_dataset(&registry(), &FactSource::empty(), &tables);
        let france = &dataset.regions[0].records[0];
        assert_eq!(france.indicators[GROWTH], Some(2.2));
    }

    #[test]
    fn flat_and_region_keyed_facts_produce_identical_output() {
        let flat = FactSource::FlatList(vec![fact("France", "Paris"), fact("Japan", "Tokyo")]);
        let mut by_region = HashMap::new();
        by_region.insert("Europe".to_string(), vec![fact("France", "Paris")]);
        by_region.insert("Asia".to_string(), vec![fact("Japan", "Tokyo")]);
        let keyed = FactSource::ByRegion(by_region);

        let tables = vec![table(2023, &[("France", GDP, 9.0)])];
        let (from_flat, _) = merge_dataset(&registry(), &flat, &tables);
        let (from_keyed, _) = merge_dataset(&registry(), &keyed, &tables);
        assert_eq!(from_flat, from_keyed);
    }

    #[test]
    fn region_keyed_lookup_has_no_cross_region_fallback() {
        // Fact filed under the wrong region: must not attach.
        let mut by_region = HashMap::new();
        by_region.insert("Asia".to_string(), vec![fact("France", "Paris")]);
        let (dataset, stats) =
            merge_dataset(&registry(), &FactSource::ByRegion(by_region), &[]);
        assert_eq!(dataset.regions[0].records[0].capital, None);
        assert_eq!(stats.facts_matched, 0);
    }

    #[test]
    fn rerunning_on_identical_inputs_is_idempotent() {
        let facts = FactSource::FlatList(vec![fact("France", "Paris")]);
        let tables = vec![table(2023, &[("France", GDP, 9.0)])];
        let first = merge_dataset(&registry(), &facts, &tables);
        let second = merge_dataset(&registry(), &facts, &tables);
        assert_eq!(first, second);
    }
}
