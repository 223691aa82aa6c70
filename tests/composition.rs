use apphost::{Args, Composition, Error, GeneratorConfig, ResolveError, Value};

fn container(app: &mut Composition, name: &str, image: &str) -> apphost::Resource {
    app.add("add_container", Args::new().arg(name).arg(image))
        .expect("add container")
}

#[test]
fn connection_string_redirection_output() {
    let mut app = Composition::new();
    let primary = app
        .add("add_connection_string", Args::new().arg("primary"))
        .expect("primary");
    app.add(
        "add_connection_string",
        Args::new()
            .arg("secondary")
            .kwarg("connection_string_redirection", &primary),
    )
    .expect("secondary");

    let expected = "#:sdk Aspire.AppHost.Sdk@13.0.1.0\n\
#:package Aspire.Hosting@13.0.1.0\n\
using System.Security.Cryptography.X509Certificates;\n\
\n\
var builder = DistributedApplication.CreateBuilder(args);\n\
\n\
var primary = builder.AddConnectionString(name: \"primary\", environmentVariableName: (string?)null);\n\
var secondary = builder.AddConnectionString(name: \"secondary\", environmentVariableName: (string?)null)\n    \
.WithConnectionStringRedirection(resource: primary.Resource);\n\
\n\
builder.Build().Run();\n";
    assert_eq!(app.render(), expected);
}

#[test]
fn svc_scenario_is_ordered() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = GeneratorConfig {
        output_dir: Some(dir.path().to_path_buf()),
        ..GeneratorConfig::default()
    };
    let mut app = Composition::with_config(config);
    container(&mut app, "before", "redis");
    let svc = container(&mut app, "svc", "nginx");
    app.invoke(&svc, "with_http_endpoint", Args::new().kwarg("port", 8080))
        .expect("endpoint");
    container(&mut app, "after", "postgres");

    let apphost = app.build().expect("build");
    let source = std::fs::read_to_string(&apphost.path).expect("read output");
    assert_eq!(source, apphost.source);
    assert_eq!(apphost.path, dir.path().join("apphost.cs"));

    let package = "#:package Aspire.Hosting@13.0.1.0";
    assert_eq!(source.matches(package).count(), 1);

    let steps = [
        package,
        "var builder = DistributedApplication.CreateBuilder(args);",
        "var svc = builder.AddContainer(name: \"svc\", image: \"nginx\");",
        "svc.WithHttpEndpoint(port: 8080, targetPort: null, name: (string?)null, \
         env: (string?)null, isProxied: true);",
        "builder.Build().Run();",
    ];
    let mut cursor = 0;
    for step in steps {
        let found = source[cursor..]
            .find(step)
            .unwrap_or_else(|| panic!("missing or out of order: {step}"));
        cursor += found + step.len();
    }
}

#[test]
fn executable_with_references_and_wait() {
    let mut app = Composition::new();
    let primary = app
        .add(
            "add_connection_string",
            Args::new()
                .arg("primary")
                .kwarg("env_var_name", "PRIMARY_DB")
                .kwarg("icon_name", "database"),
        )
        .expect("primary");
    let replica = app
        .add("add_connection_string", Args::new().arg("replica"))
        .expect("replica");
    app.add(
        "add_executable",
        Args::new()
            .arg("api")
            .arg("python")
            .arg("/app")
            .arg(vec!["api.py"])
            .kwarg("wait_for_start", &replica)
            .kwarg("reference", &primary),
    )
    .expect("api");

    let source = app.render();
    assert!(source.contains(
        "\nvar primary = builder.AddConnectionString(name: \"primary\", \
         environmentVariableName: \"PRIMARY_DB\")\
         \n    .WithIconName(iconName: \"database\", iconVariant: IconVariant.Filled);"
    ));
    assert!(source.contains(
        "\nvar api = builder.AddExecutable(name: \"api\", command: \"python\", \
         workingDirectory: \"/app\", args: new string[] { \"api.py\" })\
         \n    .WithReference(source: primary, connectionName: (string?)null, optional: false)\
         \n    .WaitForStart(dependency: replica);"
    ));
}

#[test]
fn invalid_name_leaves_program_unchanged() {
    let mut app = Composition::new();
    container(&mut app, "web", "nginx");
    let before = app.render();

    let err = app
        .add("add_container", Args::new().arg("my_db").arg("postgres"))
        .expect_err("underscore is not allowed");
    match err {
        Error::InvalidName(ref name) => assert_eq!(name, "my_db"),
        _ => panic!("unexpected error: {err:?}"),
    }
    assert_eq!(app.render(), before);
    assert_eq!(app.resources().len(), 1);
}

#[test]
fn hyphenated_names_bind_underscored_variables() {
    let mut app = Composition::new();
    let cache = container(&mut app, "my-cache", "redis");
    assert_eq!(cache.variable(), "my_cache");
    assert!(app
        .render()
        .contains("var my_cache = builder.AddContainer(name: \"my-cache\", image: \"redis\");"));
}

#[test]
fn duplicate_names_are_rejected() {
    let mut app = Composition::new();
    container(&mut app, "web", "nginx");
    let err = app
        .add("add_parameter", Args::new().arg("web"))
        .expect_err("duplicate");
    match err {
        Error::DuplicateName(ref name) => assert_eq!(name, "web"),
        _ => panic!("unexpected error: {err:?}"),
    }
}

#[test]
fn duplicate_names_given_by_keyword_are_rejected() {
    let mut app = Composition::new();
    container(&mut app, "web", "nginx");
    let before = app.render();

    let err = app
        .add(
            "add_container",
            Args::new().kwarg("name", "web").kwarg("image", "redis"),
        )
        .expect_err("duplicate by keyword");
    match err {
        Error::DuplicateName(ref name) => assert_eq!(name, "web"),
        _ => panic!("unexpected error: {err:?}"),
    }
    assert_eq!(app.render(), before);
    assert_eq!(app.resources().len(), 1);

    let err = app
        .add("add_parameter", Args::new().kwarg("name", "my_key"))
        .expect_err("invalid name by keyword");
    assert!(matches!(err, Error::InvalidName(_)));
}

#[test]
fn failed_option_leaves_program_unchanged() {
    let mut app = Composition::new();
    let before = app.render();
    let err = app
        .add(
            "add_container",
            Args::new().arg("web").arg("nginx").kwarg("volume", 42),
        )
        .expect_err("volume must be a path");
    match err {
        Error::Resolve(ResolveError::NoMatchingOverload { ref operation }) => {
            assert_eq!(operation, "volume")
        }
        _ => panic!("unexpected error: {err:?}"),
    }
    assert_eq!(app.render(), before);
    assert!(app.get("web").is_none());
}

#[test]
fn unexpected_options_are_listed_sorted() {
    let mut app = Composition::new();
    let err = app
        .add(
            "add_container",
            Args::new()
                .arg("web")
                .arg("nginx")
                .kwarg("zoom", true)
                .kwarg("colour", "blue")
                .kwarg("explicit_start", true),
        )
        .expect_err("unknown options");
    match err {
        Error::UnexpectedOptions {
            ref operation,
            ref keys,
        } => {
            assert_eq!(operation, "add_container");
            assert_eq!(keys, &vec!["colour".to_string(), "zoom".to_string()]);
        }
        _ => panic!("unexpected error: {err:?}"),
    }
}

#[test]
fn null_options_are_absent() {
    let mut app = Composition::new();
    app.add(
        "add_container",
        Args::new()
            .arg("web")
            .arg("nginx")
            .kwarg("volume", Value::Null),
    )
    .expect("null option skipped");
    assert!(app
        .render()
        .contains("var web = builder.AddContainer(name: \"web\", image: \"nginx\");"));
}

#[test]
fn options_follow_catalog_order() {
    let mut app = Composition::new();
    app.add(
        "add_container",
        Args::new()
            .arg("web")
            .arg("nginx")
            .kwarg("exclude_from_manifest", true)
            .kwarg("lifetime", "Persistent")
            .kwarg("volume", "/data"),
    )
    .expect("add");
    assert!(app.render().contains(
        "\n    .WithVolume(target: \"/data\")\
         \n    .WithLifetime(lifetime: ContainerLifetime.Persistent)\
         \n    .ExcludeFromManifest();"
    ));
}

#[test]
fn packages_are_declared_once_and_sorted() {
    let mut app = Composition::new();
    let pg = app.add("add_postgres", Args::new().arg("pg")).expect("pg");
    container(&mut app, "a", "nginx");
    container(&mut app, "b", "nginx");
    app.add_child(&pg, "add_database", Args::new().arg("orders"))
        .expect("db");

    let source = app.render();
    assert!(source.starts_with(
        "#:sdk Aspire.AppHost.Sdk@13.0.1.0\n\
         #:package Aspire.Hosting.PostgreSQL@13.0.1.0\n\
         #:package Aspire.Hosting@13.0.1.0\n\
         using System"
    ));
}

#[test]
fn child_factories_use_the_parent_variable() {
    let mut app = Composition::new();
    let pg = app
        .add("add_postgres", Args::new().arg("pg").kwarg("pg_admin", true))
        .expect("pg");
    let db = app
        .add_child(
            &pg,
            "add_database",
            Args::new()
                .arg("orders-db")
                .kwarg("database_name", "orders")
                .kwarg("creation_script", "CREATE DATABASE orders;"),
        )
        .expect("db");
    assert_eq!(db.kind(), apphost::ResourceKind::PostgresDatabase);

    let source = app.render();
    assert!(source.contains(
        "\nvar pg = builder.AddPostgres(name: \"pg\", port: null)\n    .WithPgAdmin();"
    ));
    assert!(source.contains(
        "\nvar orders_db = pg.AddDatabase(name: \"orders-db\", databaseName: \"orders\")\
         \n    .WithCreationScript(script: \"CREATE DATABASE orders;\");"
    ));

    let err = app
        .add("add_database", Args::new().arg("stray"))
        .expect_err("needs a parent");
    match err {
        Error::UnknownOperation { ref operation, .. } => assert_eq!(operation, "add_database"),
        _ => panic!("unexpected error: {err:?}"),
    }
}

#[test]
fn configure_emits_a_setter_statement() {
    let mut app = Composition::new();
    let primary = app
        .add("add_connection_string", Args::new().arg("primary"))
        .expect("primary");
    let secondary = app
        .add("add_connection_string", Args::new().arg("secondary"))
        .expect("secondary");
    app.configure(&secondary, "connection_string_redirection", &primary)
        .expect("configure");
    assert!(app
        .render()
        .contains("\nsecondary.WithConnectionStringRedirection(resource: primary.Resource);"));

    let err = app
        .configure(&secondary, "volume", "/data")
        .expect_err("connection strings have no volumes");
    match err {
        Error::UnknownOperation { ref operation, .. } => assert_eq!(operation, "volume"),
        _ => panic!("unexpected error: {err:?}"),
    }
}

#[test]
fn experimental_codes_nest_factory_outermost() {
    let mut app = Composition::new();
    app.add(
        "add_csharp_app",
        Args::new()
            .arg("web")
            .arg("../web")
            .kwarg("http_probe", "Readiness"),
    )
    .expect("csharp app");

    let expected = "\n#pragma warning disable ASPIRECSHARPAPPS001\
\n#pragma warning disable ASPIREPROBES001\
\nvar web = builder.AddCSharpApp(name: \"web\", path: \"../web\")\
\n    .WithHttpProbe(type: ProbeType.Readiness, path: (string?)null, initialDelaySeconds: null, \
periodSeconds: null, timeoutSeconds: null, failureThreshold: null, successThreshold: null, \
endpointName: (string?)null);\
\n#pragma warning restore ASPIREPROBES001\
\n#pragma warning restore ASPIRECSHARPAPPS001";
    assert!(app.render().contains(expected));
}

#[test]
fn experimental_methods_are_wrapped() {
    let mut app = Composition::new();
    let web = container(&mut app, "web", "nginx");
    app.invoke(&web, "with_endpoint_proxy_support", Args::new().arg(false))
        .expect("invoke");
    assert!(app.render().contains(
        "\n#pragma warning disable ASPIREPROXYENDPOINTS001\
         \nweb.WithEndpointProxySupport(proxyEnabled: false);\
         \n#pragma warning restore ASPIREPROXYENDPOINTS001"
    ));
}

#[test]
fn method_overloads_resolve_first_match() {
    let mut app = Composition::new();
    let web = container(&mut app, "web", "nginx");
    app.invoke(&web, "with_volume", Args::new().arg("/data"))
        .expect("target only");
    app.invoke(
        &web,
        "with_volume",
        Args::new().arg("cache").arg("/cache").kwarg("is_read_only", true),
    )
    .expect("named volume");

    let source = app.render();
    assert!(source.contains("\nweb.WithVolume(target: \"/data\");"));
    assert!(source.contains(
        "\nweb.WithVolume(name: \"cache\", target: \"/cache\", isReadOnly: true);"
    ));

    let err = app
        .invoke(&web, "with_volume", Args::new().arg(1).arg(2))
        .expect_err("no overload takes numbers");
    match err {
        Error::Resolve(ResolveError::NoMatchingOverload { ref operation }) => {
            assert_eq!(operation, "with_volume")
        }
        _ => panic!("unexpected error: {err:?}"),
    }
}

#[test]
fn closed_composition_rejects_changes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = Composition::with_config(GeneratorConfig {
        output_dir: Some(dir.path().join("nested").join("out")),
        ..GeneratorConfig::default()
    });
    let web = container(&mut app, "web", "nginx");
    app.build().expect("first build");
    assert!(app.is_closed());
    assert!(dir.path().join("nested/out/apphost.cs").exists());

    assert!(matches!(
        app.add("add_container", Args::new().arg("late").arg("nginx")),
        Err(Error::Closed)
    ));
    assert!(matches!(
        app.invoke(&web, "with_explicit_start", Args::new()),
        Err(Error::Closed)
    ));
    assert!(matches!(app.build(), Err(Error::Closed)));

    let before = app.render();
    assert!(matches!(
        app.configure(&web, "explicit_start", true),
        Err(Error::Closed)
    ));
    assert_eq!(app.render(), before);
    let err = app
        .with_options(Value::map([("disable_dashboard", true)]))
        .expect_err("options after build");
    assert!(matches!(err, Error::Closed));
}

#[test]
fn certificates_render_loaders() {
    let mut app = Composition::new();
    app.add(
        "add_certificate_authority_collection",
        Args::new()
            .arg("corp")
            .kwarg("certificate", Value::bytes(vec![1u8, 2, 3])),
    )
    .expect("collection");
    let corp = app.get("corp").cloned().expect("registered");
    app.invoke(&corp, "with_certificates", Args::new().arg(vec!["/certs/root.pem"]))
        .expect("file list");

    let source = app.render();
    assert!(source.contains(
        "\n    .WithCertificate(certificate: \
         X509CertificateLoader.LoadCertificate(Convert.FromBase64String(\"AQID\")));"
    ));
    assert!(source.contains(
        "\ncorp.WithCertificates(certificates: new List<X509Certificate2> { \
         X509CertificateLoader.LoadCertificateFromFile(\"/certs/root.pem\") });"
    ));
}

#[test]
fn list_options_chain_one_call_per_element() {
    let mut app = Composition::new();
    let db = container(&mut app, "db", "postgres");
    let cache = container(&mut app, "cache", "redis");
    app.add(
        "add_container",
        Args::new()
            .arg("web")
            .arg("nginx")
            .kwarg(
                "wait_for",
                Value::List(vec![
                    Value::from(&db),
                    Value::from((&cache, "StopOnResourceUnavailable")),
                ]),
            )
            .kwarg(
                "bind_mounts",
                vec![("./conf", "/etc/nginx"), ("./html", "/usr/share/nginx/html")],
            ),
    )
    .expect("web");

    assert!(app.render().contains(
        "\nvar web = builder.AddContainer(name: \"web\", image: \"nginx\")\
         \n    .WithBindMount(source: \"./conf\", target: \"/etc/nginx\", isReadOnly: false)\
         \n    .WithBindMount(source: \"./html\", target: \"/usr/share/nginx/html\", isReadOnly: false)\
         \n    .WaitFor(dependency: db)\
         \n    .WaitFor(dependency: cache, waitBehavior: WaitBehavior.StopOnResourceUnavailable);"
    ));
}

#[test]
fn list_setters_emit_one_statement_per_element() {
    let mut app = Composition::new();
    let db = container(&mut app, "db", "postgres");
    let cache = container(&mut app, "cache", "redis");
    let web = container(&mut app, "web", "nginx");
    app.configure(&web, "reference_relationships", vec![&db, &cache])
        .expect("relationships");
    app.configure(&web, "environments", vec![("MODE", "prod"), ("LEVEL", "debug")])
        .expect("environments");

    let source = app.render();
    assert!(source.contains(
        "\nweb.WithReferenceRelationship(resource: db.Resource);\
         \nweb.WithReferenceRelationship(resource: cache.Resource);"
    ));
    assert!(source.contains(
        "\nweb.WithEnvironment(name: \"MODE\", value: \"prod\");\
         \nweb.WithEnvironment(name: \"LEVEL\", value: \"debug\");"
    ));

    let before = app.render();
    app.configure(&web, "references", Value::List(Vec::new()))
        .expect("empty list is absent");
    assert_eq!(app.render(), before);

    let err = app
        .configure(&web, "reference_relationships", &db)
        .expect_err("plural options take lists");
    assert!(matches!(err, Error::Resolve(_)));
    let err = app
        .configure(&web, "wait_for", vec![Value::from(&db), Value::Int(1)])
        .expect_err("bad element");
    assert!(matches!(err, Error::Resolve(_)));
    assert_eq!(app.render(), before);
}

fn replay() -> String {
    let mut app = Composition::new()
        .with_options(Value::map([("disable_dashboard", true)]))
        .expect("options");
    let pg = app
        .add("add_postgres", Args::new().arg("pg").kwarg("data_volume", true))
        .expect("pg");
    let orders = app
        .add_child(&pg, "add_database", Args::new().arg("orders"))
        .expect("orders");
    let web = app
        .add(
            "add_csharp_app",
            Args::new()
                .arg("web")
                .arg("../web")
                .kwarg("http_probe", "Liveness")
                .kwarg("references", vec![&orders]),
        )
        .expect("web");
    let proxy = container(&mut app, "proxy", "nginx");
    app.invoke(&proxy, "with_endpoint_proxy_support", Args::new().arg(true))
        .expect("proxy support");
    app.configure(&web, "wait_for", vec![&pg]).expect("wait");
    app.render()
}

#[test]
fn same_calls_render_identical_programs() {
    let first = replay();
    assert_eq!(first, replay());
    assert!(first.contains("#:package Aspire.Hosting.PostgreSQL@13.0.1.0"));
    assert!(first.contains("#pragma warning disable ASPIRECSHARPAPPS001"));
    assert!(first.contains("#pragma warning disable ASPIREPROXYENDPOINTS001"));
}
