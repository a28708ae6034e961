use quarry::{Entity, Executor, Projection, Value, ValueSet};

#[derive(Debug, Default, Clone, PartialEq, Entity)]
#[quarry(name = "gadget")]
pub struct Gadget {
    #[quarry(primary_key)]
    pub code: String,
    pub label: Option<Box<str>>,
    pub weight: Option<f32>,
    pub enabled: bool,
    pub level: Option<u8>,
    pub picture: Option<Vec<u8>>,
    #[quarry(type = "ANY")]
    pub extra: Value,
}

pub fn nullability<E: Executor>(executor: &mut E) {
    Gadget::create_table(executor, true).expect("Failed to create Gadget table");

    let full = Gadget {
        code: "full".into(),
        label: Some("Everything set".into()),
        weight: Some(1.5),
        enabled: true,
        level: Some(255),
        picture: Some(vec![0xCA, 0xFE, 0x00]),
        extra: Value::Real(0.25),
    };
    let empty = Gadget {
        code: "empty".into(),
        ..Default::default()
    };
    let text = Gadget {
        code: "text".into(),
        picture: Some(Vec::new()),
        extra: Value::Text("free form".into()),
        ..Default::default()
    };
    for gadget in [&full, &empty, &text] {
        gadget.insert(executor, None).expect("Failed to insert gadget");
    }

    // Everything comes back as it went in
    let found = Gadget::find(executor, None, None).expect("Failed to find gadgets");
    assert_eq!(found, [full.clone(), empty.clone(), text.clone()]);

    // An explicit NULL matches with IS NULL
    let found = Gadget::find_by(executor, &ValueSet::new().with("label", Value::Null))
        .expect("Failed to find unlabeled gadgets");
    assert_eq!(found, [empty.clone(), text.clone()]);
    let found = Gadget::find(
        executor,
        Some(&Gadget::default()),
        Some(&Projection::of(["picture", "extra"])),
    )
    .expect("Failed to find the empty gadget");
    assert_eq!(found, [empty.clone()]);

    // Only the projected fields take part
    let template = Gadget {
        enabled: true,
        ..Default::default()
    };
    let found = Gadget::find(
        executor,
        Some(&template),
        Some(&Projection::of(["enabled"])),
    )
    .expect("Failed to find enabled gadgets");
    assert_eq!(found, [full.clone()]);

    // Setting a field to NULL
    Gadget::update_by(
        executor,
        &ValueSet::new().with("weight", Value::Null).with("level", Value::Null),
        &ValueSet::new().with("code", "full"),
    )
    .expect("Failed to clear the weight");
    let cleared = Gadget::find_one(
        executor,
        Some(&Gadget {
            code: "full".into(),
            ..Default::default()
        }),
        Some(&Projection::of(["code"])),
    )
    .expect("Failed to find the full gadget")
    .expect("The full gadget exists");
    assert_eq!(cleared.weight, None);
    assert_eq!(cleared.level, None);
    assert_eq!(cleared.label, full.label);
}
