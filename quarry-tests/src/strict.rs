use crate::silent_logs;
use quarry::{Entity, Executor, MappingError, StorageType, Value, ValueSet};

#[derive(Debug, Default, Clone, PartialEq, Entity)]
#[quarry(name = "loose")]
struct Loose {
    amount: Option<i64>,
    ratio: Option<f64>,
}

pub fn strict<E: Executor>(executor: &mut E) {
    // Tables created from entities check the kind of every value
    let error = silent_logs! {
        executor
            .insert_row(
                "product",
                &ValueSet::new().with("name", "cheap").with("price", "not a number"),
            )
            .unwrap_err()
    };
    assert!(matches!(
        MappingError::of(&error),
        Some(MappingError::Store { code: 19, .. })
    ));

    // A table declared elsewhere may hold anything, hydration checks it
    executor
        .execute("DROP TABLE IF EXISTS loose".into())
        .expect("Failed to drop loose");
    executor
        .execute("CREATE TABLE loose (amount, ratio)".into())
        .expect("Failed to create loose");
    executor
        .insert_row("loose", &ValueSet::new().with("amount", 10).with("ratio", 3))
        .expect("Failed to insert into loose");
    let found = Loose::find(executor, None, None).expect("Failed to find loose");
    assert_eq!(
        found,
        [Loose {
            amount: Some(10),
            ratio: Some(3.0),
        }]
    );
    executor
        .insert_row("loose", &ValueSet::new().with("amount", "many"))
        .expect("Failed to insert into loose");
    let error = silent_logs! {
        Loose::find(executor, None, None).unwrap_err()
    };
    assert_eq!(
        MappingError::of(&error),
        Some(&MappingError::TypeMismatch {
            column: "amount".into(),
            expected: StorageType::Integer,
            found: "TEXT",
        })
    );
    let found = Loose::find_by(executor, &ValueSet::new().with("ratio", 2.5))
        .expect("Rows that do not match are never decoded");
    assert!(found.is_empty());

    // Reads through `Value` never fail
    let values = executor
        .find_rows("loose", &ValueSet::new().with("amount", "many"))
        .expect("Failed to read loose");
    assert_eq!(values[0].values(), [Value::Text("many".into()), Value::Null]);
}
