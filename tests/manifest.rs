use std::path::Path;

use apphost::{Error, Manifest, ManifestError};

fn fixture(name: &str) -> Manifest {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    Manifest::from_path(&path).expect("load fixture")
}

#[test]
fn shop_manifest_renders_exactly() {
    let composition = fixture("shop.json").compose().expect("compose");

    let expected = "#:sdk Aspire.AppHost.Sdk@13.0.1.0\n\
#:package Aspire.Hosting.PostgreSQL@13.0.1.0\n\
#:package Aspire.Hosting@13.0.1.0\n\
using System.Security.Cryptography.X509Certificates;\n\
\n\
var builder = DistributedApplication.CreateBuilder(new DistributedApplicationOptions { Args = args, DisableDashboard = true });\n\
\n\
var pg = builder.AddPostgres(name: \"pg\", port: null)\n    \
.WithDataVolume();\n\
var orders = pg.AddDatabase(name: \"orders\", databaseName: (string?)null);\n\
var api_key = builder.AddParameter(name: \"api-key\", secret: true);\n\
var api = builder.AddProject(name: \"api\", projectPath: \"../Api/Api.csproj\")\n    \
.WithEnvironment(name: \"API_KEY\", parameter: api_key)\n    \
.WaitFor(dependency: pg);\n\
api.WithReference(source: orders, connectionName: (string?)null, optional: false);\n\
api.WithHttpEndpoint(port: 5000, targetPort: null, name: \"public\", env: (string?)null, isProxied: true);\n\
\n\
builder.Build().Run();\n";
    assert_eq!(composition.render(), expected);
    assert_eq!(composition.resources().len(), 4);
}

#[test]
fn build_writes_to_configured_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut manifest = fixture("shop.json");
    manifest.settings.output_dir = Some(dir.path().to_path_buf());
    manifest.settings.file_name = "shop.cs".to_string();

    let apphost = manifest
        .compose()
        .expect("compose")
        .build()
        .expect("build");
    assert_eq!(apphost.path, dir.path().join("shop.cs"));
    let written = std::fs::read_to_string(&apphost.path).expect("read");
    assert!(written.ends_with("\n\nbuilder.Build().Run();\n"));
}

#[test]
fn forward_references_are_unknown() {
    let manifest: Manifest = r#"{
        "resources": [
            { "factory": "add_container", "name": "web", "args": ["nginx"],
              "named": { "wait_for": { "$ref": "db" } } },
            { "factory": "add_container", "name": "db", "args": ["postgres"] }
        ]
    }"#
    .parse()
    .expect("parse");
    let err = manifest.compose().expect_err("db is declared later");
    match err {
        Error::UnknownResource(ref name) => assert_eq!(name, "db"),
        _ => panic!("unexpected error: {err:?}"),
    }
}

#[test]
fn unknown_parent_is_reported() {
    let manifest: Manifest = r#"{
        "resources": [{ "factory": "add_database", "name": "orders", "parent": "pg" }]
    }"#
    .parse()
    .expect("parse");
    let err = manifest.compose().expect_err("no pg");
    match err {
        Error::UnknownResource(ref name) => assert_eq!(name, "pg"),
        _ => panic!("unexpected error: {err:?}"),
    }
}

#[test]
fn unknown_builder_options_are_rejected() {
    let manifest: Manifest = r#"{ "options": { "dashboard": false } }"#
        .parse()
        .expect("parse");
    let err = manifest.compose().expect_err("unknown option");
    match err {
        Error::UnexpectedOptions { ref keys, .. } => assert_eq!(keys, &vec!["dashboard".to_string()]),
        _ => panic!("unexpected error: {err:?}"),
    }
}

#[test]
fn missing_file_is_a_read_error() {
    let err = Manifest::from_path(Path::new("/nonexistent/apphost.json")).expect_err("missing");
    match err {
        ManifestError::Read { ref path, .. } => {
            assert_eq!(path, Path::new("/nonexistent/apphost.json"))
        }
        _ => panic!("unexpected error: {err:?}"),
    }
}

#[test]
fn invalid_bytes_marker_is_reported() {
    let manifest: Manifest = r#"{
        "resources": [{ "factory": "add_certificate_authority_collection", "name": "corp",
                        "named": { "certificate": { "$bytes": "not base64!" } } }]
    }"#
    .parse()
    .expect("parse");
    let err = manifest.compose().expect_err("bad base64");
    match err {
        Error::Manifest(ManifestError::Bytes(_)) => {}
        _ => panic!("unexpected error: {err:?}"),
    }
}
