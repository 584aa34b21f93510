//! End-to-end tests: build a world, write it, compare the emitted TypeScript.
//!
//! Outputs are additionally fed to `tsc` when it is installed (set `$TSC` to
//! point at a specific binary).

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use pretty_assertions::assert_eq;
use typegen_core::{
    Builtin, EnumDef, Entry, Error, Exports, FieldInfo, FieldPatch, FieldProvider, HostKind,
    HostRef, HostType, LabelSource, ModelDef, ModelField, ModelFieldKind, Registration, RelationTarget, SortKey,
    TypeConfiguration, TypeExpr, World, WriteOptions, Writer, load_world,
};

use support::Tsc;

/// Write `world` and, when a compiler is available, make sure it accepts the output.
fn write_and_check(world: &World, options: WriteOptions) -> String {
    let writer = Writer::new(world, options);
    match Tsc::find() {
        Some(tsc) => writer.write_checked(&tsc).unwrap(),
        None => {
            eprintln!("tsc not found, skipping the compiler check");
            writer.write().unwrap()
        }
    }
}

fn labels(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(name, label)| ((*name).to_string(), (*label).to_string()))
        .collect()
}

#[test]
fn test_struct_with_undefined_optional_field() {
    let mut world = World::new();
    world
        .register_with(
            HostType::record(
                "app.Widget",
                vec![
                    FieldInfo::new("count", Builtin::Int),
                    FieldInfo::new("label", TypeExpr::optional(Builtin::Str)),
                    FieldInfo::new("size", Builtin::Float).with_required(false),
                ],
            ),
            Registration::new().config(TypeConfiguration::new().null_is_undefined(true)),
        )
        .unwrap();

    let code = write_and_check(&world, WriteOptions::default());
    assert_eq!(
        code,
        "export interface Widget {\n  count: number;\n  label?: string;\n  size?: number;\n}\n"
    );
}

#[test]
fn test_non_required_fields_can_stay_mandatory() {
    let mut world = World::new();
    world
        .register_with(
            HostType::record(
                "app.Widget",
                vec![FieldInfo::new("size", Builtin::Float).with_required(false)],
            ),
            Registration::new()
                .config(TypeConfiguration::new().non_required_fields_optional(false)),
        )
        .unwrap();

    let code = world.to_typescript(&WriteOptions::default()).unwrap();
    assert_eq!(code, "export interface Widget {\n  size: number;\n}\n");
}

#[test]
fn test_union_members_collapse() {
    let mut world = World::new();
    world
        .register(HostType::keyed_dict(
            "app.DoublyNumber",
            vec![FieldInfo::new(
                "value",
                TypeExpr::union([Builtin::Float, Builtin::Str, Builtin::Int]),
            )],
        ))
        .unwrap();

    let code = write_and_check(&world, WriteOptions::default());
    assert_eq!(
        code,
        "export interface DoublyNumber {\n  value: number | string;\n}\n"
    );
}

#[test]
fn test_partial_keyed_dict_marks_every_key_optional() {
    let mut world = World::new();
    world
        .register(HostType::new(
            "app.Patch",
            HostKind::KeyedDict {
                fields: vec![
                    FieldInfo::new("title", Builtin::Str),
                    FieldInfo::new("done", Builtin::Bool),
                ],
                total: false,
            },
        ))
        .unwrap();

    let code = world.to_typescript(&WriteOptions::default()).unwrap();
    assert_eq!(
        code,
        "export interface Patch {\n  title?: string;\n  done?: boolean;\n}\n"
    );
}

#[test]
fn test_enum_with_namespace_labels() {
    let status = EnumDef::new([
        ("PENDING", "pending"),
        ("ACTIVE", "active"),
        ("INACTIVE", "inactive"),
    ])
    .with_labels(
        "Labels",
        LabelSource::Namespace(labels(&[
            ("PENDING", "Waiting for processing"),
            ("ACTIVE", "Currently active"),
            ("INACTIVE", "No longer active"),
        ])),
    );
    let mut world = World::new();
    world
        .register(HostType::enumeration("app.Status", status))
        .unwrap();

    let code = write_and_check(&world, WriteOptions::default());
    assert_eq!(
        code,
        r#"export const Status = {
  PENDING: "pending",
  ACTIVE: "active",
  INACTIVE: "inactive",
} as const;
export type Status = (typeof Status)[keyof typeof Status];

export const StatusLabels: Record<Status, string> = {
  [Status.PENDING]: "Waiting for processing",
  [Status.ACTIVE]: "Currently active",
  [Status.INACTIVE]: "No longer active",
};
"#
    );
}

#[test]
fn test_enum_labels_with_custom_field_and_suffix() {
    let priority = EnumDef::new([("LOW", 1), ("MEDIUM", 2), ("HIGH", 3)]).with_labels(
        "Descriptions",
        LabelSource::Namespace(labels(&[
            ("LOW", "Not urgent"),
            ("MEDIUM", "Somewhat urgent"),
            ("HIGH", "Very urgent"),
        ])),
    );
    let turtle = EnumDef::new([("WAITING", "waiting"), ("DITHERING", "dithering")]).with_labels(
        "__texts__",
        LabelSource::Table(labels(&[
            ("WAITING", "In a state of waiting"),
            ("DITHERING", "Unable to decide"),
        ])),
    );

    let mut world = World::new();
    world
        .register_with(
            HostType::enumeration("app.Priority", priority),
            Registration::new()
                .config(TypeConfiguration::new().enum_labels("Descriptions", "Texts")),
        )
        .unwrap();
    world
        .register_with(
            HostType::enumeration("app.TurtleStatus", turtle),
            Registration::new().config(TypeConfiguration::new().enum_labels("__texts__", "Prose")),
        )
        .unwrap();

    let code = write_and_check(&world, WriteOptions::default());
    assert!(code.contains("export const Priority = {\n  LOW: 1,\n  MEDIUM: 2,\n  HIGH: 3,\n} as const;\n"));
    assert!(code.contains("export const PriorityTexts: Record<Priority, string> = {\n"));
    assert!(code.contains("  [Priority.HIGH]: \"Very urgent\",\n"));
    assert!(code.contains("export const TurtleStatusProse: Record<TurtleStatus, string> = {\n"));
    assert!(code.contains("  [TurtleStatus.DITHERING]: \"Unable to decide\",\n"));
    assert!(!code.contains("PriorityLabels"));
}

#[test]
fn test_partially_labelled_enum_gets_partial_label_map() {
    let grade = EnumDef::new([("A", "a"), ("B", "b")])
        .with_labels("Labels", LabelSource::Table(labels(&[("A", "Aa")])));
    let mut world = World::new();
    world
        .register(HostType::enumeration("app.Grade", grade))
        .unwrap();

    let code = write_and_check(&world, WriteOptions::default());
    assert!(
        code.ends_with(
            "export const GradeLabels: Partial<Record<Grade, string>> = {\n  [Grade.A]: \"Aa\",\n};\n"
        ),
        "{code}"
    );
}

#[test]
fn test_enum_without_label_source_has_no_label_map() {
    let mut world = World::new();
    world
        .register(HostType::enumeration(
            "app.Color",
            EnumDef::new([("RED", "red"), ("BLUE", "blue")]),
        ))
        .unwrap();

    let code = world.to_typescript(&WriteOptions::default()).unwrap();
    assert!(!code.contains("ColorLabels"));
    assert!(code.ends_with("export type Color = (typeof Color)[keyof typeof Color];\n"));
}

#[test]
fn test_malformed_label_source_is_a_configuration_error() {
    let mut world = World::new();
    world
        .register(HostType::enumeration(
            "app.Color",
            EnumDef::new([("RED", "red")])
                .with_labels("Labels", LabelSource::Unsupported("list".into())),
        ))
        .unwrap();

    let err = world.to_typescript(&WriteOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }), "{err}");
}

#[test]
fn test_import_replaces_declaration() {
    let mut world = World::new();
    world
        .register_with(
            HostType::opaque("app.Thing"),
            Registration::new().config(TypeConfiguration::new().import_from("./mod", "Original")),
        )
        .unwrap();

    let code = world.to_typescript(&WriteOptions::default()).unwrap();
    assert_eq!(code, "import { Original as Thing } from \"./mod\";\n");
}

#[test]
fn test_imported_types_are_referenced_by_local_name() {
    let wibble = HostType::opaque("app.Wibblewobble");
    let toot = HostType::opaque("app.Toot");
    let mut world = World::new();
    world
        .register(HostType::record(
            "app.Foo",
            vec![
                FieldInfo::new("wibble", &wibble),
                FieldInfo::new("toot", &toot),
            ],
        ))
        .unwrap();
    world
        .register_with(
            wibble,
            Registration::new().config(TypeConfiguration::new().import_from("./webby", "WibWob")),
        )
        .unwrap();
    world
        .register_with(
            toot,
            Registration::new().config(TypeConfiguration::new().import_from("./webby", "Toot")),
        )
        .unwrap();

    let code = world.to_typescript(&WriteOptions::default()).unwrap();
    assert_eq!(
        code,
        r#"export interface Foo {
  wibble: Wibblewobble;
  toot: Toot;
}

import { WibWob as Wibblewobble } from "./webby";

import { Toot } from "./webby";
"#
    );
}

#[test]
fn test_unreferrable_type_produces_no_output() {
    let mut world = World::new();
    world
        .register(HostType::record(
            "app.Box",
            vec![FieldInfo::new("content", HostRef::new("app.Widget"))],
        ))
        .unwrap();

    let err = world.to_typescript(&WriteOptions::default()).unwrap_err();
    assert_eq!(
        err,
        Error::Unreferrable {
            ty: "app.Widget".into()
        }
    );
}

#[test]
fn test_utility_types_are_emitted_once_and_sorted() {
    let mut world = World::new();
    world
        .register(HostType::record(
            "app.Event",
            vec![
                FieldInfo::new("id", Builtin::Uuid),
                FieldInfo::new("parent", Builtin::Uuid),
                FieldInfo::new("owner", TypeExpr::optional(Builtin::Uuid)),
                FieldInfo::new("day", Builtin::Date),
            ],
        ))
        .unwrap();

    let code = write_and_check(&world, WriteOptions::default());
    assert_eq!(
        code,
        r#"export interface Event {
  id: UUID;
  parent: UUID;
  owner: UUID | null;
  day: ISO8601Date;
}

export type ISO8601Date = string;

export type UUID = string;
"#
    );
}

#[test]
fn test_types_ordered_by_name() {
    let mut world = World::new();
    world
        .register_many([
            HostType::record("app.Zebra", vec![FieldInfo::new("name", Builtin::Str)]),
            HostType::record("app.Apple", vec![FieldInfo::new("count", Builtin::Int)]),
            HostType::record("app.Mango", vec![FieldInfo::new("ripe", Builtin::Bool)]),
        ])
        .unwrap();

    let default = world.to_typescript(&WriteOptions::default()).unwrap();
    assert!(default.find("Zebra").unwrap() < default.find("Apple").unwrap());

    let code = write_and_check(&world, WriteOptions::new().order_by(SortKey::<Entry>::by_name()));
    let apple = code.find("Apple").unwrap();
    let mango = code.find("Mango").unwrap();
    let zebra = code.find("Zebra").unwrap();
    assert!(apple < mango && mango < zebra, "{code}");
}

fn person() -> HostType {
    HostType::record(
        "app.Person",
        vec![
            FieldInfo::new("zodiac_sign", Builtin::Str),
            FieldInfo::new("archenemy", Builtin::Str),
            FieldInfo::new("lucky_number", Builtin::Int),
        ],
    )
    .with_doc("All you need to know about a person.")
}

#[test]
fn test_fields_ordered_globally() {
    let mut world = World::new();
    world.register(person()).unwrap();

    let code = world
        .to_typescript(&WriteOptions::new().order_fields_by(SortKey::<FieldInfo>::by_name()))
        .unwrap();
    assert_eq!(
        code,
        r#"/** All you need to know about a person. */
export interface Person {
  archenemy: string;
  lucky_number: number;
  zodiac_sign: string;
}
"#
    );
}

#[test]
fn test_per_type_field_order_wins() {
    let robot = HostType::record(
        "app.Robot",
        vec![
            FieldInfo::new("zap_power", Builtin::Int),
            FieldInfo::new("arm_count", Builtin::Int),
            FieldInfo::new("model_name", Builtin::Str),
        ],
    );
    let mut world = World::new();
    world.register(person()).unwrap();
    world
        .register_with(
            robot,
            Registration::new()
                .config(TypeConfiguration::new().order_fields_by(SortKey::<FieldInfo>::by_name())),
        )
        .unwrap();

    let code = world.to_typescript(&WriteOptions::default()).unwrap();
    assert!(code.find("zodiac_sign").unwrap() < code.find("archenemy").unwrap());
    let arm = code.find("arm_count").unwrap();
    let model = code.find("model_name").unwrap();
    let zap = code.find("zap_power").unwrap();
    assert!(arm < model && model < zap, "{code}");
}

#[test]
fn test_selective_export() {
    let mut world = World::new();
    world
        .register_many([
            HostType::record("app.Foo", vec![FieldInfo::new("size", Builtin::Int)]),
            HostType::record("app.Bar", vec![FieldInfo::new("girth", Builtin::Int)]),
        ])
        .unwrap();

    let code = write_and_check(&world, WriteOptions::new().exported_types(Exports::only(["Foo"])));
    assert_eq!(
        code,
        "export interface Foo {\n  size: number;\n}\n\ninterface Bar {\n  girth: number;\n}\n"
    );
}

#[test]
fn test_multiline_docstrings() {
    let mut world = World::new();
    world
        .register(
            HostType::record(
                "app.Robot",
                vec![
                    FieldInfo::new("zap_power", Builtin::Int)
                        .with_doc("How hard it zaps.\n\n    Measured in zaps."),
                ],
            )
            .with_doc("A mechanical friend."),
        )
        .unwrap();
    world
        .register(HostType::alias("ListOfInts", TypeExpr::list(Builtin::Int)))
        .unwrap();

    let code = write_and_check(&world, WriteOptions::default());
    assert_eq!(
        code,
        r#"/** A mechanical friend. */
export interface Robot {
  /**
   * How hard it zaps.
   *
   * Measured in zaps.
   */
  zap_power: number;
}

export type ListOfInts = number[];
"#
    );
}

#[test]
fn test_field_overrides() {
    let config = TypeConfiguration::new()
        .override_field(
            "size",
            FieldPatch::new()
                .ty(TypeExpr::union([Builtin::Int, Builtin::Str]))
                .doc("Size of the foo"),
        )
        .override_field(
            "color_code",
            FieldInfo::new("väri", Builtin::Str).with_required(true),
        )
        .remove_field("skip_this")
        .override_field("extra", FieldPatch::new().ty(Builtin::Bool).required(false));

    let mut world = World::new();
    world
        .register_with(
            HostType::keyed_dict(
                "app.Foo",
                vec![
                    FieldInfo::new("size", Builtin::Int),
                    FieldInfo::new("color_code", Builtin::Int),
                    FieldInfo::new("skip_this", Builtin::Str),
                ],
            ),
            Registration::new().config(config),
        )
        .unwrap();

    let code = write_and_check(&world, WriteOptions::default());
    assert_eq!(
        code,
        r#"export interface Foo {
  /** Size of the foo */
  size: number | string;
  väri: string;
  extra?: boolean;
}
"#
    );
}

#[test]
fn test_model_relations() {
    let user = HostType::record("auth.User", vec![FieldInfo::new("username", Builtin::Str)]);
    let order = HostType::model(
        "shop.Order",
        ModelDef::new(vec![
            ModelField::new("tags", ModelFieldKind::ManyToMany(RelationTarget::SelfRef)),
            ModelField::new(
                "owner",
                ModelFieldKind::ForeignKey(RelationTarget::Model(user.to_ref())),
            )
            .null(),
            ModelField::new("status", ModelFieldKind::Char)
                .choices(["open", "closed"])
                .help_text("Current state"),
            ModelField::new("id", ModelFieldKind::Integer),
            ModelField::new("note", ModelFieldKind::Text).required(false),
            ModelField::new("items", ModelFieldKind::ReverseRelation),
        ]),
    );

    let mut world = World::new();
    world.register_many([user, order]).unwrap();

    let code = write_and_check(&world, WriteOptions::default());
    assert_eq!(
        code,
        r#"export interface User {
  username: string;
}

export interface Order {
  id: number;
  note?: string;
  owner: User | null /* foreign key relation */;
  /** Current state */
  status: "open" | "closed";
  tags: Order[] /* many-to-many relation */;
}
"#
    );
}

#[test]
fn test_unsupported_model_field() {
    let mut world = World::new();
    world
        .register(HostType::model(
            "geo.Region",
            ModelDef::new(vec![ModelField::new(
                "area",
                ModelFieldKind::Other("PolygonField".into()),
            )]),
        ))
        .unwrap();

    let err = world.to_typescript(&WriteOptions::default()).unwrap_err();
    assert!(
        matches!(&err, Error::UnsupportedField { field, field_type, .. } if field == "area" && field_type == "PolygonField"),
        "{err}"
    );
}

#[test]
fn test_document_round_trip_to_typescript() {
    let world = load_world(
        r#"{
            "types": {
                "pets.Species": {
                    "kind": "enum",
                    "members": [
                        { "name": "CAT", "value": "cat" },
                        { "name": "DOG", "value": "dog" }
                    ],
                    "labels": { "Labels": { "namespace": { "CAT": "Cat", "DOG": "Dog" } } }
                },
                "pets.Pet": {
                    "kind": "record",
                    "doc": "A pet.",
                    "fields": [
                        { "name": "species", "type": { "ref": "pets.Species" } },
                        { "name": "born", "type": "date" },
                        { "name": "nickname", "type": { "optional": "str" } }
                    ]
                }
            },
            "register": [
                "pets.Species",
                { "type": "pets.Pet", "config": { "null_is_undefined": true } }
            ]
        }"#,
    )
    .unwrap();

    let code = write_and_check(&world, WriteOptions::default());
    assert_eq!(
        code,
        r#"export const Species = {
  CAT: "cat",
  DOG: "dog",
} as const;
export type Species = (typeof Species)[keyof typeof Species];

export const SpeciesLabels: Record<Species, string> = {
  [Species.CAT]: "Cat",
  [Species.DOG]: "Dog",
};

/** A pet. */
export interface Pet {
  species: Species;
  born: ISO8601Date;
  nickname?: string;
}

export type ISO8601Date = string;
"#
    );
}

#[test]
fn test_options_file_drives_the_writer() {
    let mut world = World::new();
    world
        .register_many([
            HostType::record("app.Zebra", vec![FieldInfo::new("name", Builtin::Str)]),
            HostType::record("app.Apple", vec![FieldInfo::new("count", Builtin::Int)]),
        ])
        .unwrap();

    let options = WriteOptions::from_toml_str(
        r#"
        exported_types = ["Apple"]
        order_types_by = "name"
        "#,
    )
    .unwrap();
    let code = world.to_typescript(&options).unwrap();
    assert_eq!(
        code,
        "export interface Apple {\n  count: number;\n}\n\ninterface Zebra {\n  name: string;\n}\n"
    );
}

/// Answers for one host path with a fixed field list.
#[derive(Debug)]
struct FixedFields {
    path: &'static str,
}

impl FieldProvider for FixedFields {
    fn fields(&self, host: &HostType) -> typegen_core::Result<Option<Vec<FieldInfo>>> {
        Ok((host.path() == self.path).then(|| vec![FieldInfo::new("serial", Builtin::Str)]))
    }
}

fn device_world() -> World {
    let mut world = World::new();
    world
        .register(HostType::record(
            "app.Device",
            vec![FieldInfo::new("name", Builtin::Int)],
        ))
        .unwrap();
    world
}

#[test]
fn test_caller_provider_wins_over_builtin_providers() {
    let world = device_world();
    let code = Writer::new(&world, WriteOptions::default())
        .with_provider(FixedFields { path: "app.Device" })
        .write()
        .unwrap();
    assert_eq!(code, "export interface Device {\n  serial: string;\n}\n");
}

#[test]
fn test_declining_provider_falls_through_to_builtin_providers() {
    let world = device_world();
    let code = Writer::new(&world, WriteOptions::default())
        .with_provider(FixedFields { path: "app.Other" })
        .write()
        .unwrap();
    assert_eq!(code, "export interface Device {\n  name: number;\n}\n");
}

#[test]
fn test_caller_provider_turns_opaque_type_into_interface() {
    let mut world = World::new();
    world.register(HostType::opaque("app.Sensor")).unwrap();
    let code = Writer::new(&world, WriteOptions::default())
        .with_provider(FixedFields { path: "app.Sensor" })
        .write()
        .unwrap();
    assert_eq!(code, "export interface Sensor {\n  serial: string;\n}\n");
}
