use crate::silent_logs;
use quarry::{Entity, Executor, MappingError, Projection, Value, ValueSet};

#[derive(Debug, Default, Clone, PartialEq, Entity)]
#[quarry(name = "product")]
pub struct Product {
    #[quarry(primary_key, auto_increment)]
    pub id: Option<i64>,
    #[quarry(not_null)]
    pub name: String,
    #[quarry(not_null)]
    pub price: f64,
    pub stock: Option<i32>,
}

pub fn products<E: Executor>(executor: &mut E) {
    // Setup
    Product::create_table(executor, true).expect("Failed to create Product table");

    // Insert
    let widget = Product {
        id: None,
        name: "widget".into(),
        price: 9.99,
        stock: Some(40),
    };
    let result = widget
        .insert(executor, Some(&Projection::of(["name", "price", "stock"])))
        .expect("Failed to insert widget");
    assert_eq!(result.rows_affected, 1);
    assert_eq!(result.last_affected_id, Some(1));
    let gear = Product {
        id: None,
        name: "gear".into(),
        price: 2.5,
        stock: None,
    };
    let result = gear.insert(executor, None).expect("Failed to insert gear");
    assert_eq!(result.rows_affected, 1);
    assert_eq!(result.last_affected_id, Some(2));

    // Find
    let template = Product {
        name: "widget".into(),
        ..Default::default()
    };
    let found = Product::find(executor, Some(&template), Some(&Projection::of(["name"])))
        .expect("Failed to find widget");
    assert_eq!(
        found,
        [Product {
            id: Some(1),
            ..widget.clone()
        }]
    );
    // Without a projection `price: 0.0` takes part and nothing matches
    let found = Product::find(executor, Some(&template), None).expect("Failed to find widget");
    assert!(found.is_empty());
    let all = Product::find(executor, None, None).expect("Failed to find all products");
    assert_eq!(all.len(), 2);
    let error = silent_logs! {
        Product::find_one(executor, None, None).unwrap_err()
    };
    assert!(matches!(
        MappingError::of(&error),
        Some(MappingError::MultipleRows { table, .. }) if table == "product"
    ));
    let first = Product::find_first(executor, None, None)
        .expect("Failed to find the first product")
        .expect("There are products");
    assert!(first.id.is_some());
    let gear_found = Product::find_by(executor, &ValueSet::new().with("stock", Value::Null))
        .expect("Failed to find by stock");
    assert_eq!(
        gear_found,
        [Product {
            id: Some(2),
            ..gear.clone()
        }]
    );

    // Update
    let result = Product::update(
        executor,
        &Product {
            price: 12.5,
            ..Default::default()
        },
        Some(&Projection::of(["price"])),
        &Product {
            id: Some(1),
            ..Default::default()
        },
        Some(&Projection::of(["id"])),
    )
    .expect("Failed to update the price");
    assert_eq!(result.rows_affected, 1);
    let result = Product::update_by(
        executor,
        &ValueSet::new().with("stock", 5),
        &ValueSet::new().with("name", "gear"),
    )
    .expect("Failed to update the stock");
    assert_eq!(result.rows_affected, 1);
    let widget = Product::find_one(
        executor,
        Some(&Product {
            id: Some(1),
            ..Default::default()
        }),
        Some(&Projection::of(["id"])),
    )
    .expect("Failed to find widget")
    .expect("Widget exists");
    assert_eq!(widget.price, 12.5);
    assert_eq!(widget.stock, Some(40));
    let error = silent_logs! {
        Product::update_by(executor, &ValueSet::new(), &ValueSet::new().with("id", 1)).unwrap_err()
    };
    assert!(matches!(
        MappingError::of(&error),
        Some(MappingError::EmptyAssignment { .. })
    ));

    // Delete
    let result = Product::delete_by(executor, &ValueSet::new().with("id", Value::Null))
        .expect("Failed to delete with id NULL");
    assert_eq!(result.rows_affected, 0);
    let error = silent_logs! {
        Product::delete_by(executor, &ValueSet::new()).unwrap_err()
    };
    assert_eq!(
        MappingError::of(&error),
        Some(&MappingError::EmptyCondition {
            table: "product".into()
        })
    );
    let result = widget
        .delete(executor, Some(&Projection::of(["id"])))
        .expect("Failed to delete widget");
    assert_eq!(result.rows_affected, 1);
    let rest = Product::find(executor, None, None).expect("Failed to find all products");
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].name, "gear");
    assert_eq!(rest[0].stock, Some(5));

    assert_eq!(
        Product::primary_key_column(executor).expect("Failed to get the primary key"),
        "id"
    );
}
