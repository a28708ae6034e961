use crate::silent_logs;
use quarry::{Entity, Executor, MappingError, Projection, ValueSet};

#[derive(Debug, Default, Clone, PartialEq, Entity)]
#[quarry(name = "user")]
pub struct User {
    #[quarry(primary_key)]
    pub id: i64,
    #[quarry(unique, not_null)]
    pub email: String,
    pub nickname: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Entity)]
#[quarry(name = "role")]
pub struct Role {
    #[quarry(primary_key, auto_increment)]
    pub id: Option<i64>,
    #[quarry(name = "user", references = ("user", "id"), not_null)]
    pub user_id: i64,
    #[quarry(not_null)]
    pub name: String,
}

fn assert_constraint(error: &quarry::Error) {
    assert!(
        matches!(
            MappingError::of(error),
            Some(MappingError::Store { code: 19, .. })
        ),
        "Expected a constraint violation, got {:#}",
        error
    );
}

pub fn membership<E: Executor>(executor: &mut E) {
    // Setup, roles reference users so they go first
    Role::drop_table(executor).expect("Failed to drop Role table");
    User::create_table(executor, true).expect("Failed to create User table");
    Role::create_table(executor, false).expect("Failed to create Role table");

    // Users
    let users = [
        User {
            id: 1,
            email: "alice@example.com".into(),
            nickname: Some("alice".into()),
        },
        User {
            id: 2,
            email: "bob@example.com".into(),
            nickname: None,
        },
    ];
    for user in &users {
        user.insert(executor, None).expect("Failed to insert user");
    }
    let error = silent_logs! {
        User {
            id: 3,
            email: "alice@example.com".into(),
            nickname: None,
        }
        .insert(executor, None)
        .unwrap_err()
    };
    assert_constraint(&error);
    let found = User::find(executor, None, None).expect("Failed to find users");
    assert_eq!(found, users);

    // Roles
    for (user_id, name) in [(1, "admin"), (1, "editor"), (2, "viewer")] {
        Role {
            id: None,
            user_id,
            name: name.into(),
        }
        .insert(executor, Some(&Projection::of(["user_id", "name"])))
        .expect("Failed to insert role");
    }
    let error = silent_logs! {
        Role {
            id: None,
            user_id: 99,
            name: "ghost".into(),
        }
        .insert(executor, None)
        .unwrap_err()
    };
    assert_constraint(&error);
    let roles = Role::find_by(executor, &ValueSet::new().with("user_id", 1))
        .expect("Failed to find the roles of alice");
    assert_eq!(
        roles.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
        ["admin", "editor"]
    );
    let error = silent_logs! {
        Role::find_by(executor, &ValueSet::new().with("owner", 1)).unwrap_err()
    };
    assert!(matches!(
        MappingError::of(&error),
        Some(MappingError::Schema(..))
    ));

    // A referenced user cannot go
    let error = silent_logs! {
        users[0].delete(executor, Some(&Projection::of(["id"]))).unwrap_err()
    };
    assert_constraint(&error);
    let result = Role::delete_by(executor, &ValueSet::new().with("user_id", 1))
        .expect("Failed to delete the roles of alice");
    assert_eq!(result.rows_affected, 2);
    let result = users[0]
        .delete(executor, Some(&Projection::of(["id"])))
        .expect("Failed to delete alice");
    assert_eq!(result.rows_affected, 1);

    // Record conditions skip the fields without a value
    let result = User::update(
        executor,
        &User {
            nickname: Some("bobby".into()),
            ..Default::default()
        },
        Some(&Projection::of(["nickname"])),
        &User {
            id: 2,
            ..Default::default()
        },
        Some(&Projection::of(["id"])),
    )
    .expect("Failed to update bob");
    assert_eq!(result.rows_affected, 1);
    let bob = User::find_one(
        executor,
        Some(&User {
            email: "bob@example.com".into(),
            ..Default::default()
        }),
        None,
    );
    // `id: 0` is a value, it takes part in the condition
    assert_eq!(bob.expect("Failed to find bob"), None);
    let bob = User::find_one(
        executor,
        Some(&User {
            email: "bob@example.com".into(),
            ..Default::default()
        }),
        Some(&Projection::of(["email"])),
    )
    .expect("Failed to find bob")
    .expect("Bob exists");
    assert_eq!(bob.nickname.as_deref(), Some("bobby"));
}
