use std::cell::RefCell;
use std::rc::Rc;

use prefsmith_core::{
    BooleanPreference, Dependency, DoublePreference, IntegerPreference, IntegerRangePreference, ListPreference,
    MultichoiceOption, MultichoicePreference, Preference, PreferenceData, StringOptions, StringPreference,
};
use prefsmith_engine::{
    Action, ManagedPreference, ManagerError, PreferenceGroup, PreferenceManager, PreferenceTree, RequestSummary, ResponseHandler,
    Status,
};
use prefsmith_io::{JsonFileBackend, MemoryBackend};

struct Foobars {
    insert: BooleanPreference,
    count: IntegerRangePreference,
}

fn foobars() -> Foobars {
    let insert = BooleanPreference::new(
        PreferenceData::new("insert_foobars", true)
            .with_label("Insert foobars")
            .with_description("Insert some foobars"),
    )
    .unwrap();
    let count = IntegerRangePreference::new(
        PreferenceData::new("number_of_foobars", 5.0)
            .with_label("Number of foobars")
            .with_dependency(Dependency::equals(&insert, true)),
        0.0,
        100.0,
    )
    .unwrap();
    Foobars { insert, count }
}

fn manager(prefs: &Foobars, backend: &MemoryBackend) -> PreferenceManager {
    let tree = PreferenceTree::new()
        .preference(prefs.insert.clone())
        .group(PreferenceGroup::new("Advanced").preference(prefs.count.clone()));
    PreferenceManager::new(&tree, "test.", backend.clone()).unwrap()
}

#[derive(Clone, Default)]
struct Recorder {
    seen: Rc<RefCell<Vec<(Action, String, Status)>>>,
}

impl ResponseHandler for Recorder {
    fn on_response(&self, request: &RequestSummary<'_>, status: Status) {
        self.seen.borrow_mut().push((request.action, request.key.to_string(), status));
    }
}

// -------------------------------------------------------------------------
// Get / set
// -------------------------------------------------------------------------

#[test]
fn get_with_nothing_stored_returns_default() {
    let prefs = foobars();
    let m = manager(&prefs, &MemoryBackend::new());

    let r = m.get(&prefs.count).unwrap();
    assert_eq!(r.status, Status::Ok);
    assert_eq!(r.value, 5.0);
    assert_eq!(r.saved, None);
}

#[test]
fn set_then_get_round_trips() {
    let prefs = foobars();
    let backend = MemoryBackend::new();
    let mut m = manager(&prefs, &backend);

    let r = m.set(&prefs.count, 42.0).unwrap();
    assert_eq!(r.status, Status::Ok);
    assert_eq!(r.value, 42.0);
    assert_eq!(backend.raw("test.number_of_foobars"), Some("42.0".to_string()));

    let r = m.get(&prefs.count).unwrap();
    assert_eq!((r.status, r.value), (Status::Ok, 42.0));
}

#[test]
fn invalid_set_changes_nothing() {
    let prefs = foobars();
    let backend = MemoryBackend::new();
    let mut m = manager(&prefs, &backend);

    let r = m.set(&prefs.count, 142.0).unwrap();
    assert_eq!(r.status, Status::InvalidValue);
    assert_eq!(r.value, 142.0);
    assert!(backend.is_empty());
    assert_eq!(m.get(&prefs.count).unwrap().value, 5.0);

    m.set(&prefs.count, 42.0).unwrap();
    assert_eq!(m.set(&prefs.count, 4.5).unwrap().status, Status::InvalidValue);
    assert_eq!(m.get(&prefs.count).unwrap().value, 42.0);
}

#[test]
fn invalid_stored_value_is_repaired() {
    let prefs = foobars();
    let backend = MemoryBackend::new();
    let m = manager(&prefs, &backend);
    backend.insert_raw("test.number_of_foobars", "142.7");

    let r = m.get(&prefs.count).unwrap();
    assert_eq!(r.status, Status::InvalidValue);
    assert_eq!(r.value, 100.0);
    assert_eq!(r.saved, Some(142.7));
}

#[test]
fn prefix_isolates_managers() {
    let prefs = foobars();
    let backend = MemoryBackend::new();
    let tree = PreferenceTree::new().preference(prefs.insert.clone());
    let mut a = PreferenceManager::new(&tree, "a.", backend.clone()).unwrap();
    let b = PreferenceManager::new(&tree, "b.", backend.clone()).unwrap();

    a.set(&prefs.insert, false).unwrap();
    assert_eq!(a.get(&prefs.insert).unwrap().value, false);
    assert_eq!(b.get(&prefs.insert).unwrap().value, true);
    assert_eq!(backend.keys(), ["a.insert_foobars"]);
}

// -------------------------------------------------------------------------
// Store failures degrade to the cache
// -------------------------------------------------------------------------

#[test]
fn wrong_shape_is_type_error() {
    let prefs = foobars();
    let backend = MemoryBackend::new();
    let mut m = manager(&prefs, &backend);
    m.set(&prefs.count, 7.0).unwrap();
    backend.insert_raw("test.number_of_foobars", "\"seven\"");

    let r = m.get(&prefs.count).unwrap();
    assert_eq!((r.status, r.value), (Status::TypeError, 7.0));
}

#[test]
fn undecodable_text_is_json_error() {
    let prefs = foobars();
    let backend = MemoryBackend::new();
    let m = manager(&prefs, &backend);
    backend.insert_raw("test.insert_foobars", "tru");

    let r = m.get(&prefs.insert).unwrap();
    assert_eq!((r.status, r.value), (Status::JsonError, true));
}

#[test]
fn failed_write_still_updates_cache() {
    let prefs = foobars();
    let backend = MemoryBackend::new();
    let mut m = manager(&prefs, &backend);
    backend.set_read_only(true);

    let r = m.set(&prefs.count, 12.0).unwrap();
    assert_eq!((r.status, r.value), (Status::StorageError, 12.0));
    assert!(backend.is_empty());

    // Nothing stored, so the read falls back to the cache.
    assert_eq!(m.get(&prefs.count).unwrap().value, 12.0);
}

#[test]
fn quota_exceeded_is_storage_error() {
    let notes = StringPreference::new(PreferenceData::new("notes", String::new()), StringOptions::multiline())
        .unwrap();
    let backend = MemoryBackend::with_quota(32);
    let tree = PreferenceTree::new().preference(notes.clone());
    let mut m = PreferenceManager::new(&tree, "", backend.clone()).unwrap();

    assert_eq!(m.set(&notes, "short".to_string()).unwrap().status, Status::Ok);
    let r = m.set(&notes, "x".repeat(64)).unwrap();
    assert_eq!(r.status, Status::StorageError);
    assert_eq!(backend.raw("notes"), Some("\"short\"".to_string()));
}

#[test]
fn failed_read_returns_cached_value() {
    let prefs = foobars();
    let backend = MemoryBackend::new();
    let mut m = manager(&prefs, &backend);
    assert_eq!(m.set(&prefs.count, 42.0).unwrap().status, Status::Ok);

    backend.set_unreadable(true);
    let r = m.get(&prefs.count).unwrap();
    assert_eq!((r.status, r.value), (Status::StorageError, 42.0));
    assert_eq!(r.saved, None);
}

#[test]
fn infinity_survives_the_store() {
    let limit = IntegerPreference::infinite(PreferenceData::new("limit", 10.0)).unwrap();
    let backend = MemoryBackend::new();
    let tree = PreferenceTree::new().preference(limit.clone());
    let mut m = PreferenceManager::new(&tree, "", backend.clone()).unwrap();

    let r = m.set(&limit, f64::INFINITY).unwrap();
    assert_eq!((r.status, r.value), (Status::Ok, f64::INFINITY));
    let r = m.get(&limit).unwrap();
    assert_eq!((r.status, r.value), (Status::Ok, f64::INFINITY));

    // A fresh manager over the same store reads it back too.
    m.set(&limit, f64::NEG_INFINITY).unwrap();
    let fresh = PreferenceManager::new(&tree, "", backend).unwrap();
    let r = fresh.get(&limit).unwrap();
    assert_eq!((r.status, r.value), (Status::Ok, f64::NEG_INFINITY));
}

// -------------------------------------------------------------------------
// Construction errors
// -------------------------------------------------------------------------

#[test]
fn duplicate_keys_rejected() {
    let a = BooleanPreference::new(PreferenceData::new("flag", true)).unwrap();
    let b = IntegerPreference::new(PreferenceData::new("flag", 1.0)).unwrap();
    let tree = PreferenceTree::new()
        .preference(a)
        .group(PreferenceGroup::new("More").preference(b));

    let err = PreferenceManager::new(&tree, "", MemoryBackend::new()).unwrap_err();
    assert_eq!(err, ManagerError::DuplicateKey { key: "flag".to_string() });
}

#[test]
fn dependency_outside_manager_rejected() {
    let outsider = BooleanPreference::new(PreferenceData::new("outsider", true)).unwrap();
    let dependent = BooleanPreference::new(
        PreferenceData::new("dependent", true).with_dependency(Dependency::equals(&outsider, true)),
    )
    .unwrap();
    let tree = PreferenceTree::new().preference(dependent);

    let err = PreferenceManager::new(&tree, "", MemoryBackend::new()).unwrap_err();
    assert!(matches!(err, ManagerError::UnknownDependency { ref target, .. } if target == "outsider"));
    assert!(err.to_string().contains("BooleanPreference 'dependent'"));
}

#[test]
fn group_dependency_outside_manager_rejected() {
    let outsider = BooleanPreference::new(PreferenceData::new("outsider", true)).unwrap();
    let member = BooleanPreference::new(PreferenceData::new("member", true)).unwrap();
    let tree = PreferenceTree::new().group(
        PreferenceGroup::new("Extras")
            .with_dependency(Dependency::equals(&outsider, true))
            .preference(member),
    );

    let err = PreferenceManager::new(&tree, "", MemoryBackend::new()).unwrap_err();
    assert!(err.to_string().starts_with("Group 'Extras'"));
}

#[test]
fn dependencies_may_point_forward() {
    let later = BooleanPreference::new(PreferenceData::new("later", true)).unwrap();
    let earlier = BooleanPreference::new(
        PreferenceData::new("earlier", true).with_dependency(Dependency::equals(&later, true)),
    )
    .unwrap();
    let tree = PreferenceTree::new().preference(earlier).preference(later);
    assert!(PreferenceManager::new(&tree, "", MemoryBackend::new()).is_ok());
}

#[test]
fn unknown_preference_is_an_error() {
    let prefs = foobars();
    let mut m = manager(&prefs, &MemoryBackend::new());
    let stranger = DoublePreference::new(PreferenceData::new("stranger", 1.5)).unwrap();

    assert!(!m.contains(&stranger));
    assert!(matches!(m.get(&stranger), Err(ManagerError::UnknownPreference { .. })));
    assert!(matches!(m.set(&stranger, 2.5), Err(ManagerError::UnknownPreference { .. })));
    assert!(matches!(m.remove(&stranger), Err(ManagerError::UnknownPreference { .. })));
    assert!(matches!(m.should_be_available(&stranger), Err(ManagerError::UnknownPreference { .. })));
}

// -------------------------------------------------------------------------
// Availability
// -------------------------------------------------------------------------

#[test]
fn availability_follows_current_value() {
    let prefs = foobars();
    let mut m = manager(&prefs, &MemoryBackend::new());

    assert!(m.should_be_available(&prefs.insert).unwrap());
    assert!(m.should_be_available(&prefs.count).unwrap());

    m.set(&prefs.insert, false).unwrap();
    assert!(!m.should_be_available(&prefs.count).unwrap());

    m.reset(&prefs.insert).unwrap();
    assert!(m.should_be_available(&prefs.count).unwrap());
}

#[test]
fn group_availability() {
    let mode = MultichoicePreference::new(
        PreferenceData::new("mode", "basic".to_string()),
        vec![
            MultichoiceOption::new("basic".to_string(), "Basic"),
            MultichoiceOption::new("expert".to_string(), "Expert"),
        ],
    )
    .unwrap();
    let paths = ListPreference::new(PreferenceData::new("paths", vec!["/usr/lib".to_string()])).unwrap();
    let expert = PreferenceGroup::new("Expert")
        .with_dependency(Dependency::equals(&mode, "expert".to_string()))
        .preference(paths);
    let tree = PreferenceTree::new().preference(mode.clone()).group(expert.clone());
    let mut m = PreferenceManager::new(&tree, "", MemoryBackend::new()).unwrap();

    assert!(!m.group_should_be_available(&expert).unwrap());
    m.set(&mode, "expert".to_string()).unwrap();
    assert!(m.group_should_be_available(&expert).unwrap());
}

// -------------------------------------------------------------------------
// Reset / remove / introspection
// -------------------------------------------------------------------------

#[test]
fn reset_all_in_flatten_order() {
    let prefs = foobars();
    let backend = MemoryBackend::new();
    let mut m = manager(&prefs, &backend);
    m.set(&prefs.insert, false).unwrap();
    m.set(&prefs.count, 99.0).unwrap();

    let statuses = m.reset_all().unwrap();
    assert_eq!(
        statuses,
        vec![
            ("insert_foobars".to_string(), Status::Ok),
            ("number_of_foobars".to_string(), Status::Ok),
        ]
    );
    assert_eq!(m.get(&prefs.insert).unwrap().value, true);
    assert_eq!(backend.raw("test.number_of_foobars"), Some("5.0".to_string()));
}

#[test]
fn remove_forgets_stored_value() {
    let prefs = foobars();
    let backend = MemoryBackend::new();
    let mut m = manager(&prefs, &backend);
    m.set(&prefs.count, 64.0).unwrap();

    m.remove(&prefs.count).unwrap();
    assert_eq!(backend.raw("test.number_of_foobars"), None);
    assert_eq!(m.get(&prefs.count).unwrap().value, 5.0);
}

#[test]
fn keys_and_len() {
    let prefs = foobars();
    let m = manager(&prefs, &MemoryBackend::new());
    assert_eq!(m.keys().collect::<Vec<_>>(), ["insert_foobars", "number_of_foobars"]);
    assert_eq!(m.len(), 2);
    assert!(!m.is_empty());
    assert_eq!(m.storage_key(&prefs.count), "test.number_of_foobars");
    assert_eq!(m.preferences()[1].class_name(), prefs.count.class_name());
}

// -------------------------------------------------------------------------
// Handler and backends
// -------------------------------------------------------------------------

#[test]
fn handler_sees_every_outcome() {
    let prefs = foobars();
    let backend = MemoryBackend::new();
    let recorder = Recorder::default();
    let mut m = manager(&prefs, &backend).with_handler(recorder.clone());

    m.set(&prefs.count, 500.0).unwrap();
    backend.insert_raw("test.insert_foobars", "{");
    m.get(&prefs.insert).unwrap();

    let seen = recorder.seen.borrow();
    assert_eq!(
        *seen,
        vec![
            (Action::Set, "number_of_foobars".to_string(), Status::InvalidValue),
            (Action::Get, "insert_foobars".to_string(), Status::JsonError),
        ]
    );
}

#[test]
fn json_file_backend_persists_across_managers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    let prefs = foobars();
    let tree = PreferenceTree::new().preference(prefs.insert.clone()).preference(prefs.count.clone());

    {
        let mut m = PreferenceManager::new(&tree, "app.", JsonFileBackend::open(&path).unwrap()).unwrap();
        m.set(&prefs.count, 17.0).unwrap();
    }

    let m = PreferenceManager::new(&tree, "app.", JsonFileBackend::open(&path).unwrap()).unwrap();
    let r = m.get(&prefs.count).unwrap();
    assert_eq!((r.status, r.value), (Status::Ok, 17.0));
}
