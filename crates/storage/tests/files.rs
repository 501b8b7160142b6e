use chrono::{TimeZone, Utc};
use std::fs;
use storage::models::{AddAttempt, AttemptState, AttemptStatus, GroupDescriptor, RequestSetFile};
use storage::{
    detect_request_set, load_state, persist_state, read_request_set, state_path_for,
    write_request_set, StorageError,
};
use tempfile::tempdir;

#[test]
fn detects_request_sets_by_marker() {
    let temp = tempdir().unwrap();
    let request = temp.path().join("a.json");
    fs::write(
        &request,
        r#"{"fga_request_set": {"123": ["group1 - Group One", "group2 - Group Two"]}}"#,
    )
    .unwrap();
    let other = temp.path().join("b.json");
    fs::write(&other, r#"{"something_else": true}"#).unwrap();
    let list = temp.path().join("c.json");
    fs::write(&list, r#"[1, 2, 3]"#).unwrap();

    let set = detect_request_set(&request).unwrap().unwrap();
    assert_eq!(
        set["123"],
        vec![
            GroupDescriptor::new("group1", "Group One"),
            GroupDescriptor::new("group2", "Group Two"),
        ]
    );
    assert!(detect_request_set(&other).unwrap().is_none());
    assert!(detect_request_set(&list).unwrap().is_none());
    assert!(matches!(
        read_request_set(&other),
        Err(StorageError::NotRequestSet(_))
    ));
}

#[test]
fn malformed_files_are_errors() {
    let temp = tempdir().unwrap();
    let broken = temp.path().join("broken.json");
    fs::write(&broken, "{not json").unwrap();
    assert!(matches!(
        detect_request_set(&broken),
        Err(StorageError::Parse { .. })
    ));

    let wrong_shape = temp.path().join("shape.json");
    fs::write(&wrong_shape, r#"{"fga_request_set": ["123"]}"#).unwrap();
    assert!(matches!(
        detect_request_set(&wrong_shape),
        Err(StorageError::Parse { .. })
    ));

    let missing = temp.path().join("missing.json");
    assert!(matches!(
        detect_request_set(&missing),
        Err(StorageError::Read { .. })
    ));
}

#[test]
fn state_round_trips_in_stable_layout() {
    let temp = tempdir().unwrap();
    let request = temp.path().join("fga_request_set_photo_123.json");
    let state_path = state_path_for(&request);
    assert_eq!(
        state_path.file_name().unwrap().to_str().unwrap(),
        "fga_request_set_photo_123.state.json"
    );

    let empty = load_state(&state_path).unwrap();
    assert!(empty.is_empty());

    let mut state = AttemptState::default();
    let entry = state.entry_mut("123", "group2");
    entry.photo_added = true;
    entry.attempts.push(AddAttempt {
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        status: AttemptStatus::SuccessAdded,
        error_message: None,
    });
    state.entry_mut("123", "group1").attempts.push(AddAttempt {
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 1).unwrap(),
        status: AttemptStatus::Fail,
        error_message: Some("Error: 2: Group not found".into()),
    });
    persist_state(&state_path, &state).unwrap();

    let written = fs::read_to_string(&state_path).unwrap();
    let expected = r#"{
    "photo_123_group_group1": {
        "fga_add_attempts": [
            {
                "error_message": "Error: 2: Group not found",
                "status": "fail",
                "timestamp": "2024-05-01T12:00:01+00:00"
            }
        ],
        "photo_added": false
    },
    "photo_123_group_group2": {
        "fga_add_attempts": [
            {
                "status": "success_added",
                "timestamp": "2024-05-01T12:00:00+00:00"
            }
        ],
        "photo_added": true
    }
}"#;
    assert_eq!(written, expected);
    assert_eq!(load_state(&state_path).unwrap(), state);
}

#[test]
fn request_set_is_written_per_photo() {
    let temp = tempdir().unwrap();
    let file = RequestSetFile::single(
        "53012345678",
        vec![GroupDescriptor::new("1234@N20", "Night Shots")],
    );
    let written = write_request_set(temp.path(), &file).unwrap();
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with("fga_request_set_photo_53012345678.json"));
    let back = read_request_set(&written[0]).unwrap();
    assert_eq!(back, file.request_set);
}
