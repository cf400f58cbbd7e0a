//! Tests for grid dumps, projection and sorting through the public API.

use std::sync::Arc;

use lattice_probe::data::SortKey;
use lattice_probe::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Person {
    name: String,
    age: u32,
}

fn person(name: &str, age: u32) -> Person {
    Person {
        name: name.to_string(),
        age,
    }
}

fn seven_people() -> Vec<Person> {
    (0..7).map(|i| person(&format!("name {i}"), i)).collect()
}

fn people_grid(items: Vec<Person>) -> Arc<Grid<Person>> {
    ui_root()
        .unwrap()
        .base()
        .add_child(
            Grid::new()
                .with_column(
                    Column::text("name", "Name", |p: &Person| p.name.clone())
                        .sortable_by(|p: &Person| p.name.clone()),
                )
                .with_column(
                    Column::text("age", "Age", |p: &Person| p.age.to_string())
                        .sortable_by(|p: &Person| p.age),
                )
                .with_items(items),
        )
        .unwrap()
}

#[test]
fn test_dump_of_empty_range() {
    let _env = TestEnvironment::set_up(Routes::new()).unwrap();
    let grid = people_grid(seven_people());

    assert_eq!(dump(grid.as_ref(), 0..0).unwrap(), "--[Name]-[Age]--\n--and 7 more\n");
}

#[test]
fn test_dump_of_first_five_rows() {
    let _env = TestEnvironment::set_up(Routes::new()).unwrap();
    let grid = people_grid(seven_people());

    let expected = "--[Name]-[Age]--\n\
                    0: name 0, 0\n\
                    1: name 1, 1\n\
                    2: name 2, 2\n\
                    3: name 3, 3\n\
                    4: name 4, 4\n\
                    --and 2 more\n";
    assert_eq!(dump(grid.as_ref(), 0..5).unwrap(), expected);
}

#[test]
fn test_dump_of_all_rows_has_no_footer() {
    let _env = TestEnvironment::set_up(Routes::new()).unwrap();
    let grid = people_grid(seven_people());

    let dumped = dump(grid.as_ref(), 0..7).unwrap();
    assert_eq!(dumped.lines().count(), 8);
    assert!(dumped.ends_with("6: name 6, 6\n"));
    assert!(!dumped.contains("more"));
}

#[test]
fn test_sort_markers_in_header() {
    let _env = TestEnvironment::set_up(Routes::new()).unwrap();
    let grid = people_grid(seven_people());
    grid.sort(vec![
        ("name".to_string(), SortDirection::Ascending),
        ("age".to_string(), SortDirection::Descending),
    ])
    .unwrap();

    let dumped = dump(grid.as_ref(), 0..0).unwrap();
    assert!(dumped.starts_with("--[Name]^-[Age]v--\n"));
}

#[test]
fn test_descending_then_ascending_keeps_secondary_order() {
    let _env = TestEnvironment::set_up(Routes::new()).unwrap();
    let grid = people_grid(vec![
        person("b", 3),
        person("a", 2),
        person("b", 1),
        person("a", 4),
        person("b", 2),
    ]);
    grid.sort(vec![
        ("name".to_string(), SortDirection::Descending),
        ("age".to_string(), SortDirection::Ascending),
    ])
    .unwrap();

    assert_eq!(
        dump(grid.as_ref(), 0..10).unwrap(),
        "--[Name]v-[Age]^--\n\
         0: b, 1\n\
         1: b, 2\n\
         2: b, 3\n\
         3: a, 2\n\
         4: a, 4\n"
    );
}

#[test]
fn test_projector_get_matches_find_all() {
    let provider = ListDataProvider::new(seven_people());
    let projector = Projector::new(&provider).with_sort(vec![SortKey::by(
        "age",
        SortDirection::Descending,
        |p: &Person| p.age,
    )]);

    let all = projector.find_all().unwrap();
    for (index, item) in all.iter().enumerate() {
        assert_eq!(&projector.get(index).unwrap(), item);
    }
    assert!(matches!(
        projector.get(7),
        Err(HarnessError::IndexOutOfRange {
            requested: 7,
            actual: 7
        })
    ));
}

#[test]
fn test_unbounded_paged_grid() {
    let _env = TestEnvironment::set_up(Routes::new()).unwrap();
    let rows = seven_people();
    let provider = PagedDataProvider::new(3, move |offset, limit| {
        rows.iter().skip(offset).take(limit).cloned().collect()
    });
    let grid = people_grid(Vec::new());
    grid.set_provider(Arc::new(provider));

    assert!(matches!(grid.row_count(), Err(HarnessError::Unsupported { .. })));
    assert!(matches!(dump(grid.as_ref(), 0..3), Err(HarnessError::Unsupported { .. })));
    assert_eq!(grid.get_row(5).unwrap(), person("name 5", 5));

    assert!(matches!(
        grid.sort(vec![("age".to_string(), SortDirection::Descending)]),
        Err(HarnessError::Unsupported { .. })
    ));
    assert!(grid.sort_orders().is_empty());
    assert_eq!(grid.get_row(0).unwrap(), person("name 0", 0));
}

#[test]
fn test_bounded_paged_grid_sorts_in_memory() {
    let _env = TestEnvironment::set_up(Routes::new()).unwrap();
    let rows = seven_people();
    let total = rows.len();
    let provider = PagedDataProvider::new(2, move |offset, limit| {
        rows.iter().skip(offset).take(limit).cloned().collect()
    })
    .with_count(move || total);
    let grid = people_grid(Vec::new());
    grid.set_provider(Arc::new(provider));
    sort_by_key(grid.as_ref(), "age", SortDirection::Descending).unwrap();

    assert_eq!(
        dump(grid.as_ref(), 0..2).unwrap(),
        "--[Name]-[Age]v--\n0: name 6, 6\n1: name 5, 5\n--and 5 more\n"
    );
}

#[test]
fn test_default_dump_range_comes_from_config() {
    let config = HarnessConfig::from_toml_str("[dump]\ndefault_rows = 2").unwrap();
    let _env = TestEnvironment::builder().config(config).set_up().unwrap();
    let grid = people_grid(seven_people());

    assert_eq!(
        dump_default(grid.as_ref()).unwrap(),
        "--[Name]-[Age]--\n0: name 0, 0\n1: name 1, 1\n--and 5 more\n"
    );
}

#[test]
fn test_grid_is_found_but_its_cells_are_not() {
    let _env = TestEnvironment::set_up(Routes::new()).unwrap();
    let grid = ui_root()
        .unwrap()
        .base()
        .add_child(
            Grid::new()
                .with_caption("People")
                .with_column(Column::component("name", "Name", |p: &Person| Label::new(p.name.clone())))
                .with_items(seven_people()),
        )
        .unwrap();
    dump(grid.as_ref(), 0..7).unwrap();

    let found = ui_find1_as::<Grid<Person>>(&SearchSpec::new().caption("People")).unwrap();
    assert!(Arc::ptr_eq(&found, &grid));
    ui_expect_none(&SearchSpec::of::<Label>()).unwrap();

    let cell = get_component_at(grid.as_ref(), 3, "name").unwrap();
    assert_eq!(cell.text().as_deref(), Some("name 3"));
}
