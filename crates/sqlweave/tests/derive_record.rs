//! `#[derive(Record)]` payloads.

#![allow(dead_code)]

use sqlweave::{IntoRecord, Record, Value, table};

#[derive(Record)]
#[record(rename_all = "PascalCase")]
struct User {
    username: String,
    age: i64,
    #[record(rename = "Mail")]
    email: Option<String>,
    #[record(skip)]
    session_token: Vec<u8>,
}

#[derive(Record)]
struct Login<'a> {
    username: &'a str,
    #[record(rename = "-")]
    password: &'a str,
    r#type: i32,
}

#[derive(Record)]
#[record(rename_all = "PascalCase")]
struct Attachment {
    name: String,
    data: Vec<u8>,
}

fn alice() -> User {
    User {
        username: "alice".into(),
        age: 30,
        email: None,
        session_token: vec![1, 2, 3],
    }
}

#[test]
fn test_insert_uses_renamed_columns() {
    let q = table("Users").insert(alice()).build().unwrap();
    assert_eq!(
        q.sql,
        "INSERT INTO Users (Username, Age, Mail) VALUES (?, ?, ?)"
    );
    assert_eq!(
        q.params,
        vec![Value::from("alice"), Value::Int(30), Value::Null]
    );
}

#[test]
fn test_skipped_and_dashed_fields_are_dropped() {
    let record = Login {
        username: "bob",
        password: "secret",
        r#type: 2,
    }
    .into_record();
    assert_eq!(record.len(), 3);

    let q = table("Logins")
        .insert(record)
        .build()
        .unwrap();
    assert_eq!(q.sql, "INSERT INTO Logins (username, type) VALUES (?, ?)");
}

#[test]
fn test_patch_skips_zero_fields() {
    let user = User {
        username: String::new(),
        age: 31,
        email: None,
        session_token: Vec::new(),
    };
    let q = table("Users")
        .where_("ID", 1)
        .patch(user)
        .build()
        .unwrap();
    assert_eq!(q.sql, "UPDATE Users SET Age = ? WHERE ID = ?");
    assert_eq!(q.params, vec![Value::Int(31), Value::Int(1)]);
}

#[test]
fn test_omit_matches_field_or_column_name() {
    let q = table("Users")
        .omit(["age", "Mail"])
        .insert(alice())
        .build()
        .unwrap();
    assert_eq!(q.sql, "INSERT INTO Users (Username) VALUES (?)");
}

#[test]
fn test_insert_many_derived_records() {
    let rows: Vec<Record> = vec![alice().into_record(), alice().into_record()];
    let q = table("Users").insert_many(rows).build().unwrap();
    assert_eq!(
        q.sql,
        "INSERT INTO Users (Username, Age, Mail) VALUES (?, ?, ?), (?, ?, ?)"
    );
    assert_eq!(q.params.len(), 6);
}

#[test]
fn test_bytes_field_binds_one_value() {
    let file = Attachment {
        name: "logo.png".into(),
        data: vec![0x89, 0x50, 0x4e],
    };
    let q = table("Files").insert(file).build().unwrap();
    assert_eq!(q.sql, "INSERT INTO Files (Name, Data) VALUES (?, ?)");
    assert_eq!(
        q.params,
        vec![Value::from("logo.png"), Value::Bytes(vec![0x89, 0x50, 0x4e])]
    );
}
