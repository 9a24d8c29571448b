//! Behavioural tests for the CSV dataset loaders.

use std::cell::RefCell;

use camino::{Utf8Path, Utf8PathBuf};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use shelter_core::{ShelterRegistry, StreetIndex};
use shelter_data::{
    ENRICHED_STREETS_FILE, ShelterLoadError, StreetLoadError, UNIQUE_STREETS_FILE,
    load_shelter_registry, load_street_index_from_dir,
};
use tempfile::TempDir;

const SHELTERS_FILE: &str = "rifugi_locations.csv";

type ShelterResult = RefCell<Option<Result<ShelterRegistry, ShelterLoadError>>>;
type StreetResult = RefCell<Option<Result<StreetIndex, StreetLoadError>>>;

fn root(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("temp dir is UTF-8")
}

fn write(dir: &Utf8Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents)
        .unwrap_or_else(|err| panic!("failed to write {name}: {err}"));
}

#[fixture]
fn data_dir() -> TempDir {
    TempDir::new().expect("temp dir")
}

#[fixture]
fn shelters() -> ShelterResult {
    RefCell::new(None)
}

#[fixture]
fn streets() -> StreetResult {
    RefCell::new(None)
}

#[given("a shelter dataset with one blank and one null-island row")]
fn given_mixed_shelters(#[from(data_dir)] data_dir: &TempDir) {
    write(
        &root(data_dir),
        SHELTERS_FILE,
        "Shelter_Name,Address,City,Latitude,Longitude\n\
         Long Beach Animal Care,7700 E Spring St,Long Beach,33.8117,-118.1386\n\
         Unknown,1 Nowhere Rd,Carson,,\n\
         Null Island,0 Zero St,Carson,0,0\n\
         Carson Shelter,216 W Victoria St,Gardena,33.8679,-118.2803\n",
    );
}

#[given("a shelter dataset without a City column")]
fn given_shelters_without_city(#[from(data_dir)] data_dir: &TempDir) {
    write(
        &root(data_dir),
        SHELTERS_FILE,
        "Shelter_Name,Address,Latitude,Longitude\nA,1 Main St,33.8,-118.2\n",
    );
}

#[given("a data directory with both street datasets")]
fn given_both_street_files(#[from(data_dir)] data_dir: &TempDir) {
    let dir = root(data_dir);
    write(&dir, UNIQUE_STREETS_FILE, "name,city,state\nElm St,Orange,CA\n");
    write(
        &dir,
        ENRICHED_STREETS_FILE,
        "name,city,state,lat,lon,postcode\nPine Ave,Long Beach,CA,33.7701,-118.1937,90802\n",
    );
}

#[when("I load the shelter dataset")]
fn when_load_shelters(
    #[from(data_dir)] data_dir: &TempDir,
    #[from(shelters)] shelters: &ShelterResult,
) {
    *shelters.borrow_mut() = Some(load_shelter_registry(&root(data_dir).join(SHELTERS_FILE)));
}

#[when("I load the streets from the data directory")]
fn when_load_streets(#[from(data_dir)] data_dir: &TempDir, #[from(streets)] streets: &StreetResult) {
    *streets.borrow_mut() = Some(load_street_index_from_dir(&root(data_dir)));
}

#[then("only the shelters with real coordinates are loaded")]
fn then_real_shelters(#[from(shelters)] shelters: &ShelterResult) {
    let borrowed = shelters.borrow();
    let Some(Ok(registry)) = borrowed.as_ref() else {
        panic!("expected a registry, got {borrowed:?}");
    };
    let names: Vec<&str> = registry.records().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Long Beach Animal Care", "Carson Shelter"]);
    assert_eq!(registry.excluded(), 1, "null island is excluded");
}

#[then("the load fails naming the City column")]
fn then_missing_city(#[from(shelters)] shelters: &ShelterResult) {
    let borrowed = shelters.borrow();
    match borrowed.as_ref() {
        Some(Err(ShelterLoadError::MissingColumns { missing, .. })) => {
            assert_eq!(missing, &["City"]);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

#[then("the enriched streets are loaded with their coordinates")]
fn then_enriched_streets(#[from(streets)] streets: &StreetResult) {
    let borrowed = streets.borrow();
    let Some(Ok(index)) = borrowed.as_ref() else {
        panic!("expected a street index, got {borrowed:?}");
    };
    assert_eq!(index.len(), 1);
    let pine = &index.entries()[0];
    assert_eq!(pine.display, "Pine Ave, Long Beach, CA");
    assert_eq!(pine.lat, Some(33.7701));
    assert_eq!(pine.postcode.as_deref(), Some("90802"));
}

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/shelter_dataset.feature", name = $title)]
        fn $fn_name(data_dir: TempDir, shelters: ShelterResult, streets: StreetResult) {
            let _ = (data_dir, shelters, streets);
        }
    };
}

register_scenario!(
    excludes_unusable_coordinates,
    "Shelters with unusable coordinates are excluded"
);
register_scenario!(
    rejects_missing_city_column,
    "A shelter dataset without a City column is rejected"
);
register_scenario!(
    prefers_enriched_streets,
    "The enriched street dataset is preferred"
);
