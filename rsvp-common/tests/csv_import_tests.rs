//! Guest list files on disk

use std::io::Write;

use rsvp_common::import::load_guest_csv;
use rsvp_common::models::NewGuest;
use rsvp_common::Error;
use tempfile::NamedTempFile;

fn guest_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_guest_file() {
    let file = guest_file(
        "Name,Address\r\nAlice,123 St\r\nAlice,123 St\r\nBob,\"456 Ave, Apt 2\"\r\n",
    );

    let guests = load_guest_csv(file.path()).unwrap();
    assert_eq!(guests.len(), 3);
    assert_eq!(
        guests[2],
        NewGuest {
            name: "Bob".to_string(),
            address: "456 Ave, Apt 2".to_string(),
        }
    );
}

#[test]
fn test_header_only_file_is_empty() {
    let file = guest_file("Name,Address\n");
    assert!(load_guest_csv(file.path()).unwrap().is_empty());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_guest_csv(&dir.path().join("invite_list.csv"));
    assert!(matches!(result, Err(Error::Io(_))));
}
