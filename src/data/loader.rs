//! Dataset loader
//!
//! Reads the static JSON tables from a directory:
//!
//! | File                  | Table |
//! |-----------------------|-------|
//! | `years.json`          | year labels, ascending |
//! | `partners.json`       | partner codes |
//! | `member_states.json`  | reporters with their new-member flag |
//! | `country_names.json`  | code -> display name |
//! | `heatmap.json`        | flow -> year -> matrix |
//! | `slopechart.json`     | flow -> partner -> line series |

use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::dataset::{Dataset, DatasetBuilder};
use super::error::{DataError, DataResult};
use super::types::{FlowType, HeatmapMatrix, LineSeries, MemberState};

pub const YEARS_FILE: &str = "years.json";
pub const PARTNERS_FILE: &str = "partners.json";
pub const MEMBER_STATES_FILE: &str = "member_states.json";
pub const COUNTRY_NAMES_FILE: &str = "country_names.json";
pub const HEATMAP_FILE: &str = "heatmap.json";
pub const SLOPECHART_FILE: &str = "slopechart.json";

/// Somewhere a complete `Dataset` can be loaded from
pub trait DatasetSource {
    /// Short description for logs
    fn describe(&self) -> String;

    /// Load and validate every table
    fn load(&self) -> DataResult<Dataset>;
}

/// Loads datasets from a directory of JSON files
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> DataResult<T> {
        let path = self.dir.join(file);
        let content = std::fs::read_to_string(&path).map_err(|source| DataError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| DataError::Parse { path, source })
    }
}

impl DatasetSource for JsonDirSource {
    fn describe(&self) -> String {
        format!("json directory {:?}", self.dir)
    }

    fn load(&self) -> DataResult<Dataset> {
        let years: Vec<String> = self.read_json(YEARS_FILE)?;
        let partners: Vec<String> = self.read_json(PARTNERS_FILE)?;
        let member_states: Vec<MemberState> = self.read_json(MEMBER_STATES_FILE)?;
        let country_names: HashMap<String, String> = self.read_json(COUNTRY_NAMES_FILE)?;
        let heatmaps: HashMap<String, HashMap<String, HeatmapMatrix>> =
            self.read_json(HEATMAP_FILE)?;
        let slopes: HashMap<String, HashMap<String, Vec<LineSeries>>> =
            self.read_json(SLOPECHART_FILE)?;

        let mut builder = Dataset::builder()
            .years(years)
            .partners(partners)
            .member_states(member_states)
            .country_names(country_names);

        builder = add_heatmaps(builder, heatmaps)?;
        builder = add_slopes(builder, slopes)?;

        let dataset = builder.build()?;
        tracing::debug!(source = %self.describe(), stats = %dataset.stats(), "Dataset loaded");
        Ok(dataset)
    }
}

fn parse_flow_key(key: &str, file: &str) -> DataResult<FlowType> {
    key.parse()
        .map_err(|e| DataError::Malformed(format!("{}: {}", file, e)))
}

/// Parse every top-level flow key; two spellings of one flow are rejected
fn parse_flow_keys<V>(
    table: HashMap<String, V>,
    file: &str,
) -> DataResult<Vec<(FlowType, V)>> {
    let mut seen = HashSet::new();
    let mut parsed = Vec::with_capacity(table.len());

    for (key, value) in table {
        let flow = parse_flow_key(&key, file)?;
        if !seen.insert(flow) {
            return Err(DataError::Malformed(format!(
                "{}: flow {} appears more than once",
                file, flow
            )));
        }
        parsed.push((flow, value));
    }

    Ok(parsed)
}

fn add_heatmaps(
    mut builder: DatasetBuilder,
    table: HashMap<String, HashMap<String, HeatmapMatrix>>,
) -> DataResult<DatasetBuilder> {
    for (flow, by_year) in parse_flow_keys(table, HEATMAP_FILE)? {
        for (year, matrix) in by_year {
            builder = builder.heatmap(flow, year, matrix);
        }
    }
    Ok(builder)
}

fn add_slopes(
    mut builder: DatasetBuilder,
    table: HashMap<String, HashMap<String, Vec<LineSeries>>>,
) -> DataResult<DatasetBuilder> {
    for (flow, by_partner) in parse_flow_keys(table, SLOPECHART_FILE)? {
        for (partner, lines) in by_partner {
            builder = builder.slope(flow, partner, lines);
        }
    }
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, file: &str, content: &str) {
        std::fs::write(dir.join(file), content).unwrap();
    }

    fn write_fixture(dir: &Path) {
        write(dir, YEARS_FILE, r#"["2016", "2017"]"#);
        write(dir, PARTNERS_FILE, r#"["RU", "ME"]"#);
        write(
            dir,
            MEMBER_STATES_FILE,
            r#"[{"code": "DE", "new_member": false}, {"code": "MT", "new_member": true}]"#,
        );
        write(dir, COUNTRY_NAMES_FILE, r#"{"RU": "Russia", "DE": "Germany"}"#);
        write(
            dir,
            HEATMAP_FILE,
            r#"{"EXPORT": {"2017": {"x": ["RU", "ME"], "y": ["DE", "MT"],
                                    "z": [[0.93, 0.61], [0.35, 0.2]]}}}"#,
        );
        write(
            dir,
            SLOPECHART_FILE,
            r#"{"EXPORT": {"RU": [{"name": "MT", "x": ["2016", "2017"], "y": [0.3, 0.35],
                                   "mode": "lines"}]}}"#,
        );
    }

    #[test]
    fn test_load_directory() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path());

        let dataset = JsonDirSource::new(dir.path()).load().unwrap();

        assert_eq!(dataset.years().len(), 2);
        assert_eq!(dataset.partners().get("RU").unwrap().name, "Russia");
        assert_eq!(dataset.partners().get("ME").unwrap().name, "ME");
        assert!(dataset.member_states().is_new_member("MT"));

        let matrix = dataset.heatmap(FlowType::Export, "2017").unwrap();
        assert_eq!(matrix.cell("DE", "RU"), Some(0.93));

        let lines = dataset.slope_series(FlowType::Export, "RU").unwrap();
        assert_eq!(lines[0].style["mode"], "lines");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path());
        std::fs::remove_file(dir.path().join(SLOPECHART_FILE)).unwrap();

        let err = JsonDirSource::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, DataError::Io { ref path, .. } if path.ends_with(SLOPECHART_FILE)));
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path());
        write(dir.path(), YEARS_FILE, "[2016, ");

        let err = JsonDirSource::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
    }

    #[test]
    fn test_unknown_flow_key() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path());
        write(dir.path(), HEATMAP_FILE, r#"{"TRANSIT": {}}"#);

        let err = JsonDirSource::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, DataError::Malformed(msg) if msg.contains("TRANSIT")));
    }

    #[test]
    fn test_repeated_flow_key() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path());
        write(
            dir.path(),
            SLOPECHART_FILE,
            r#"{"EXPORT": {"RU": []}, "export": {"ME": []}}"#,
        );

        let err = JsonDirSource::new(dir.path()).load().unwrap_err();
        assert!(matches!(
            err,
            DataError::Malformed(msg) if msg.contains(SLOPECHART_FILE) && msg.contains("EXPORT")
        ));
    }
}
