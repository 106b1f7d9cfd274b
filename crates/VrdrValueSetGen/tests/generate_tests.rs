use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vrdr_valueset_gen::{EmitTarget, GenError, GeneratorConfig, generate};

const SNOMED: &str = "http://snomed.info/sct";
const NULL_FLAVOR: &str = "http://terminology.hl7.org/CodeSystem/v3-NullFlavor";
const VRDR_CS: &str = "http://hl7.org/fhir/us/vrdr/CodeSystem/vrdr-component-cs";

fn resources(ig_root: &Path) -> PathBuf {
    ig_root.join("fsh-generated").join("resources")
}

fn write_resource(ig_root: &Path, file_name: &str, value: Value) {
    let dir = resources(ig_root);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file_name), serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

fn build_ig(ig_root: &Path) {
    write_resource(
        ig_root,
        "ValueSet-vrdr-manner-of-death-vs.json",
        json!({
            "resourceType": "ValueSet",
            "id": "vrdr-manner-of-death-vs",
            "url": "http://hl7.org/fhir/us/vrdr/ValueSet/vrdr-manner-of-death-vs",
            "name": "MannerOfDeathVS",
            "status": "active",
            "compose": {
                "include": [
                    {
                        "system": SNOMED,
                        "concept": [
                            { "code": "38605008", "display": "Natural death" },
                            { "code": "7878000", "display": "Accidental death" },
                            { "code": "65037004", "display": "Death, manner undetermined" }
                        ]
                    },
                    {
                        "system": NULL_FLAVOR,
                        "concept": [{ "code": "UNK", "display": "unknown" }]
                    }
                ],
                "exclude": [
                    { "system": NULL_FLAVOR, "concept": [{ "code": "UNK" }] }
                ]
            }
        }),
    );
    write_resource(
        ig_root,
        "ValueSet-vrdr-component-vs.json",
        json!({
            "resourceType": "ValueSet",
            "url": "http://hl7.org/fhir/us/vrdr/ValueSet/vrdr-component-vs",
            "name": "ComponentVS",
            "compose": {
                "include": [
                    { "system": VRDR_CS },
                    { "system": "http://example.org/not-in-ig" }
                ],
                "exclude": [
                    { "system": VRDR_CS, "concept": [{ "code": "internal" }] }
                ]
            }
        }),
    );
    write_resource(
        ig_root,
        "CodeSystem-vrdr-component-cs.json",
        json!({
            "resourceType": "CodeSystem",
            "url": VRDR_CS,
            "name": "ComponentCS",
            "content": "complete",
            "concept": [
                { "code": "emerging", "display": "Emerging" },
                { "code": "internal", "display": "Internal" },
                { "code": "final", "display": "Final" }
            ]
        }),
    );
    // Matches neither discovery pattern.
    write_resource(
        ig_root,
        "ValueSet-other-example.json",
        json!({ "resourceType": "ValueSet" }),
    );
}

fn config(ig_root: &Path, output_dir: &Path) -> GeneratorConfig {
    GeneratorConfig {
        output_dir: output_dir.to_path_buf(),
        ..GeneratorConfig::new(ig_root)
    }
}

#[test]
fn test_generate_java_classes() {
    let ig = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    build_ig(ig.path());

    let report = generate(&config(ig.path(), out.path())).unwrap();
    assert_eq!(report.artifacts.len(), 2);
    // File-name order: component before manner-of-death.
    assert_eq!(report.artifacts[0].value_set_name, "ComponentVS");
    assert_eq!(report.artifacts[0].coding_count, 2);
    assert_eq!(report.artifacts[1].value_set_name, "MannerOfDeathVS");
    assert_eq!(report.artifacts[1].coding_count, 3);
    assert_eq!(report.total_codings(), 5);

    let manner = fs::read_to_string(out.path().join("MannerOfDeathVS.java")).unwrap();
    assert!(manner.contains("public class MannerOfDeathVS {"));
    assert!(manner.contains(
        "new Coding(\"http://snomed.info/sct\", \"65037004\", \"Death, manner undetermined\")"
    ));
    assert!(!manner.contains("UNK"));

    let component = fs::read_to_string(out.path().join("ComponentVS.java")).unwrap();
    let emerging = component.find("\"emerging\"").unwrap();
    let final_pos = component.find("\"final\"").unwrap();
    assert!(emerging < final_pos);
    assert!(!component.contains("\"internal\""));
    assert!(!component.contains("not-in-ig"));

    assert!(!out.path().join("ValueSet-other-example.java").exists());
}

#[test]
fn test_generate_is_idempotent() {
    let ig = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    build_ig(ig.path());

    generate(&config(ig.path(), out.path())).unwrap();
    let first = fs::read_to_string(out.path().join("ComponentVS.java")).unwrap();
    generate(&config(ig.path(), out.path())).unwrap();
    let second = fs::read_to_string(out.path().join("ComponentVS.java")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_scan_and_index_produce_same_output() {
    let ig = TempDir::new().unwrap();
    let cached = TempDir::new().unwrap();
    let scanned = TempDir::new().unwrap();
    build_ig(ig.path());

    generate(&config(ig.path(), cached.path())).unwrap();
    let mut uncached = config(ig.path(), scanned.path());
    uncached.cache_code_systems = false;
    generate(&uncached).unwrap();

    for name in ["ComponentVS.java", "MannerOfDeathVS.java"] {
        assert_eq!(
            fs::read_to_string(cached.path().join(name)).unwrap(),
            fs::read_to_string(scanned.path().join(name)).unwrap()
        );
    }
}

#[test]
fn test_generate_rust_modules() {
    let ig = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    build_ig(ig.path());

    let mut config = config(ig.path(), out.path());
    config.target = EmitTarget::Rust;
    generate(&config).unwrap();

    let module = fs::read_to_string(out.path().join("manner_of_death_vs.rs")).unwrap();
    assert!(syn::parse_file(&module).is_ok());
    assert!(module.contains("pub struct MannerOfDeathVS;"));

    let mod_rs = fs::read_to_string(out.path().join("mod.rs")).unwrap();
    assert!(mod_rs.contains("pub mod component_vs;"));
    assert!(mod_rs.contains("pub mod manner_of_death_vs;"));
}

#[test]
fn test_missing_resources_dir() {
    let ig = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let result = generate(&config(ig.path(), out.path()));
    assert!(matches!(result, Err(GenError::MissingResourceDir(_))));
}

#[test]
fn test_malformed_value_set_aborts_run() {
    let ig = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    build_ig(ig.path());
    fs::write(
        resources(ig.path()).join("ValueSet-vrdr-broken.json"),
        "{ \"resourceType\": \"ValueSet\", ",
    )
    .unwrap();

    match generate(&config(ig.path(), out.path())) {
        Err(GenError::MalformedResource { path, .. }) => {
            assert!(path.ends_with("ValueSet-vrdr-broken.json"));
        }
        other => panic!("expected MalformedResource, got {:?}", other),
    }
}

#[test]
fn test_whole_system_exclude_is_rejected() {
    let ig = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_resource(
        ig.path(),
        "ValueSet-vrdr-bad-exclude.json",
        json!({
            "resourceType": "ValueSet",
            "url": "http://example.org/vs",
            "name": "BadExcludeVS",
            "compose": {
                "include": [{ "system": SNOMED, "concept": [{ "code": "1" }] }],
                "exclude": [{ "system": SNOMED }]
            }
        }),
    );

    let result = generate(&config(ig.path(), out.path()));
    assert!(matches!(result, Err(GenError::UnsupportedExclude { .. })));
    assert!(!out.path().join("BadExcludeVS.java").exists());
}

#[test]
fn test_value_sets_in_subdirectories_are_found() {
    let ig = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let nested = resources(ig.path()).join("nested");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        nested.join("ValueSet-vrdr-nested.json"),
        json!({
            "resourceType": "ValueSet",
            "url": "http://example.org/nested",
            "name": "NestedVS",
            "compose": { "include": [{ "system": "S1", "concept": [{ "code": "A" }] }] }
        })
        .to_string(),
    )
    .unwrap();

    let report = generate(&config(ig.path(), out.path())).unwrap();
    assert_eq!(report.artifacts.len(), 1);
    let src = fs::read_to_string(out.path().join("NestedVS.java")).unwrap();
    assert!(src.contains("new Coding(\"S1\", \"A\", null)"));
}
