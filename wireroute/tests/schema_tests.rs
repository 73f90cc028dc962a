//! Persistence tests: full document parsing and file round trips

use wireroute::schema::{DiagramDto, Gauge, Rotation, TerminalType};
use wireroute::{diagram_from_json, library_from_json, load_diagram, save_diagram, WireRouteError};

const DOCUMENT: &str = r#"{
    "components": [
        {"id": "bat", "partKey": "battery", "name": "Battery", "x": 0, "y": 0},
        {"id": "pdp", "partKey": "pdp", "name": "PDP", "x": 256, "y": 128, "rotation": 90}
    ],
    "wires": [
        {
            "id": "w1",
            "from": {"componentId": "bat", "terminalId": "plus"},
            "to": {"componentId": "pdp", "terminalId": "vin+"},
            "type": "power+",
            "gauge": 10,
            "netId": "main",
            "controlPoints": [{"x": 112.0, "y": 16.0}, {"x": 112.0, "y": 144.0}]
        },
        {
            "id": "w2",
            "from": {"componentId": "bat", "terminalId": "minus"},
            "to": {"componentId": "pdp", "terminalId": "vin-"},
            "type": "power-"
        }
    ],
    "labels": [
        {"id": "l1", "wireId": "w1", "text": "main feed"}
    ]
}"#;

#[test]
fn full_document_parses() {
    let dto = diagram_from_json(DOCUMENT).expect("document should parse");
    assert_eq!(dto.components.len(), 2);
    assert_eq!(dto.components[0].rotation, Rotation::R0);
    assert_eq!(dto.components[1].rotation, Rotation::R90);
    assert_eq!(dto.wires[0].wire_type, TerminalType::PowerPlus);
    assert_eq!(dto.wires[0].gauge, Gauge::Awg10);
    assert_eq!(dto.wires[0].control_points.len(), 2);
    // w2 exercises every optional-field default.
    assert_eq!(dto.wires[1].gauge, Gauge::Awg18);
    assert!(dto.wires[1].net_id.is_none());
    assert!(dto.wires[1].control_points.is_empty());
    assert_eq!(dto.labels.len(), 1);
}

#[test]
fn empty_object_is_an_empty_diagram() {
    let dto = diagram_from_json("{}").expect("empty document should parse");
    assert!(dto.components.is_empty());
    assert!(dto.wires.is_empty());
    assert!(dto.labels.is_empty());
}

#[test]
fn malformed_document_reports_parse_error() {
    let result = diagram_from_json("{\"wires\": [{\"id\": 42}]}");
    assert!(matches!(result, Err(WireRouteError::Parse(_))));
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("diagram.json");

    let dto = diagram_from_json(DOCUMENT).unwrap();
    save_diagram(&path, &dto).expect("save should succeed");
    let loaded = load_diagram(&path).expect("load should succeed");

    assert_eq!(loaded.components.len(), dto.components.len());
    assert_eq!(loaded.wires.len(), dto.wires.len());
    assert_eq!(
        loaded.wires[0].control_points,
        dto.wires[0].control_points
    );
    assert_eq!(loaded.labels[0].text, "main feed");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = load_diagram(&dir.path().join("nope.json"));
    assert!(matches!(result, Err(WireRouteError::Io(_))));
}

#[test]
fn library_parses_from_part_list() {
    let json = r#"[
        {
            "key": "battery",
            "name": "Battery",
            "width": 64,
            "height": 64,
            "terminals": [
                {"id": "plus", "label": "+", "type": "power+", "x": 64, "y": 16, "exit": "E"},
                {"id": "minus", "label": "-", "type": "power-", "x": 64, "y": 48}
            ]
        }
    ]"#;
    let lib = library_from_json(json).expect("library should parse");
    let battery = lib.get("battery").expect("battery part present");
    assert_eq!(battery.terminals.len(), 2);
    assert!(battery.terminal("plus").unwrap().exit.is_some());
    assert!(battery.terminal("minus").unwrap().exit.is_none());
}

#[test]
fn snap_all_normalizes_loaded_geometry() {
    let mut dto = diagram_from_json(
        r#"{
            "components": [
                {"id": "c", "partKey": "battery", "name": "B", "x": 7.0, "y": 250.0}
            ],
            "wires": [
                {
                    "id": "w",
                    "from": {"componentId": "c", "terminalId": "a"},
                    "to": {"componentId": "c", "terminalId": "b"},
                    "type": "usb",
                    "controlPoints": [{"x": 100.0, "y": 53.0}]
                }
            ]
        }"#,
    )
    .unwrap();
    dto.snap_all(16.0);
    assert_eq!(dto.components[0].x, 0.0);
    assert_eq!(dto.components[0].y, 256.0);
    assert_eq!(dto.wires[0].control_points[0].x, 96.0);
    assert_eq!(dto.wires[0].control_points[0].y, 48.0);
}
