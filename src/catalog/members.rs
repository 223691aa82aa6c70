//! Member tables, grouped the way resource types share them.

use apphost_types::{Capabilities as Cap, TypeDesc, Value};

use super::enums::{
    CERTIFICATE_TRUST_SCOPE, CONTAINER_LIFETIME, ICON_VARIANT, IMAGE_PULL_POLICY, OTLP_PROTOCOL,
    PROBE_TYPE, PROTOCOL_TYPE, REFERENCE_ENVIRONMENT_INJECTION_FLAGS, STORE_LOCATION, STORE_NAME,
    UNIX_FILE_MODE, WAIT_BEHAVIOR,
};
use super::params::{
    choice, handle, maybe_choice, maybe_number, maybe_strings, maybe_text, number, resource_of,
    strings, switch, text, typed_handle,
};
use super::{Member, ResourceKind};
use crate::format::Format;
use crate::resolve::Param;

const PARAMETER: &str = "ParameterResource";
const EXTERNAL_SERVICE: &str = "ExternalServiceResource";
const CA_COLLECTION: &str = "CertificateAuthorityCollection";

/// Members of `kind`: kind-specific first, shared groups next, base last.
pub(super) fn for_kind(kind: ResourceKind) -> Vec<Member> {
    let mut members = match kind {
        ResourceKind::ConnectionString => {
            let mut m = vec![connection_string_redirection()];
            m.extend(wait());
            m
        }
        ResourceKind::Container => runnable(container()),
        ResourceKind::Executable => runnable(executable()),
        ResourceKind::Project => runnable(project()),
        ResourceKind::PostgresServer => {
            let mut m = postgres_server();
            m.extend(runnable(container()));
            m
        }
        ResourceKind::PostgresDatabase => vec![
            Member::new("WithCreationScript")
                .option("creation_script")
                .method("with_creation_script")
                .shape([text("script")])
                .scalar(0),
            connection_string_redirection(),
        ],
        ResourceKind::ExternalService => vec![Member::new("WithHttpHealthCheck")
            .option("http_health_check")
            .method("with_http_health_check")
            .shape([
                maybe_text("path").keyword(),
                maybe_number("status_code").keyword(),
            ])
            .fields(0)
            .flag()],
        ResourceKind::Parameter => vec![Member::new("WithDescription")
            .option("description")
            .method("with_description")
            .shape([text("description"), switch("enable_markdown", false).keyword()])
            .scalar(0)
            .spread(0, 2)],
        ResourceKind::CertificateAuthorityCollection => certificates(),
    };
    members.extend(base());
    members
}

fn runnable(mut specific: Vec<Member>) -> Vec<Member> {
    specific.extend(environment());
    specific.extend(endpoints());
    specific.extend(wait());
    specific.extend(trust());
    specific.push(
        Member::new("WithComputeEnvironment")
            .option("compute_env")
            .method("with_compute_env")
            .shape([handle("compute_env_resource", Cap::COMPUTE_ENVIRONMENT)
                .renamed("computeEnvironmentResource")])
            .scalar(0),
    );
    specific.push(
        Member::new("WithHttpProbe")
            .option("http_probe")
            .method("with_http_probe")
            .experimental("ASPIREPROBES001")
            .shape([
                choice("type", PROBE_TYPE),
                maybe_text("path").keyword(),
                maybe_number("initial_delay_seconds").keyword(),
                maybe_number("period_seconds").keyword(),
                maybe_number("timeout_seconds").keyword(),
                maybe_number("failure_threshold").keyword(),
                maybe_number("success_threshold").keyword(),
                maybe_text("endpoint_name").keyword(),
            ])
            .scalar(0)
            .fields(0),
    );
    specific
}

/// The list-valued twin of `member`: option `key`, one call per element.
fn plural(member: &Member, key: &'static str) -> Member {
    let mut twin = member.clone();
    twin.option = Some(key);
    twin.method = None;
    twin.many()
}

fn maybe_switch(name: &'static str) -> Param {
    Param::new(name, TypeDesc::optional(TypeDesc::bool()), Format::Bool).default(Value::Null)
}

fn base() -> Vec<Member> {
    let relationship = Member::new("WithRelationship")
        .option("relationship")
        .method("with_relationship")
        .shape([resource_of("resource", Cap::RESOURCE), text("type")])
        .spread(0, 2);
    let reference_relationship = Member::new("WithReferenceRelationship")
        .option("reference_relationship")
        .method("with_reference_relationship")
        .shape([resource_of("resource", Cap::RESOURCE)])
        .scalar(0);
    let parent_relationship = Member::new("WithParentRelationship")
        .option("parent_relationship")
        .method("with_parent_relationship")
        .shape([handle("parent", Cap::RESOURCE)])
        .scalar(0);
    let child_relationship = Member::new("WithChildRelationship")
        .option("child_relationship")
        .method("with_child_relationship")
        .shape([handle("child", Cap::RESOURCE)])
        .scalar(0);
    vec![
        Member::new("WithDockerfileBaseImage")
            .option("dockerfile_base_image")
            .method("with_dockerfile_base_image")
            .experimental("ASPIREDOCKERFILEBUILDER001")
            .shape([
                maybe_text("build_image").keyword(),
                maybe_text("runtime_image").keyword(),
            ])
            .fields(0)
            .flag(),
        Member::new("WithUrl")
            .option("url")
            .method("with_url")
            .shape([text("url"), maybe_text("display_text").keyword()])
            .scalar(0)
            .spread(0, 2),
        Member::new("ExcludeFromManifest")
            .option("exclude_from_manifest")
            .method("exclude_from_manifest")
            .shape([])
            .flag(),
        Member::new("WithExplicitStart")
            .option("explicit_start")
            .method("with_explicit_start")
            .shape([])
            .flag(),
        Member::new("WithHealthCheck")
            .option("health_check")
            .method("with_health_check")
            .shape([text("key")])
            .scalar(0),
        relationship.clone(),
        plural(&relationship, "relationships"),
        reference_relationship.clone(),
        plural(&reference_relationship, "reference_relationships"),
        parent_relationship.clone(),
        plural(&parent_relationship, "parent_relationships"),
        child_relationship.clone(),
        plural(&child_relationship, "child_relationships"),
        Member::new("WithIconName")
            .option("icon_name")
            .method("with_icon_name")
            .shape([
                text("icon_name"),
                choice("icon_variant", ICON_VARIANT).default("Filled").keyword(),
            ])
            .scalar(0)
            .spread(0, 2),
        Member::new("ExcludeFromMcp")
            .option("exclude_from_mcp")
            .method("exclude_from_mcp")
            .shape([])
            .flag(),
    ]
}

fn connection_string_redirection() -> Member {
    Member::new("WithConnectionStringRedirection")
        .option("connection_string_redirection")
        .method("with_connection_string_redirection")
        .shape([resource_of("resource", Cap::CONNECTION_STRING)])
        .scalar(0)
}

fn wait() -> Vec<Member> {
    let waiting = |target: &'static str, name: &'static str| {
        Member::new(target)
            .option(name)
            .method(name)
            .shape([handle("dependency", Cap::RESOURCE)])
            .shape([
                handle("dependency", Cap::RESOURCE),
                choice("wait_behavior", WAIT_BEHAVIOR),
            ])
            .scalar(0)
            .spread(1, 2)
            .each()
    };
    vec![
        waiting("WaitFor", "wait_for"),
        waiting("WaitForStart", "wait_for_start"),
        Member::new("WaitForCompletion")
            .option("wait_for_completion")
            .method("wait_for_completion")
            .shape([
                handle("dependency", Cap::RESOURCE),
                number("exit_code").default(0).keyword(),
            ])
            .scalar(0)
            .spread(0, 2)
            .each(),
    ]
}

fn environment() -> Vec<Member> {
    let env = Member::new("WithEnvironment")
        .option("env")
        .method("with_env")
        .shape([
            text("name"),
            Param::new("value", TypeDesc::optional(TypeDesc::str()), Format::Str),
        ])
        .shape([
            text("name"),
            typed_handle("external_service", EXTERNAL_SERVICE),
        ])
        .shape([text("name"), typed_handle("parameter", PARAMETER)])
        .shape([
            text("env_var_name"),
            handle("resource", Cap::CONNECTION_STRING),
        ])
        .spread(0, 2)
        .spread(1, 2)
        .spread(2, 2)
        .spread(3, 2);
    let reference = Member::new("WithReference")
        .option("reference")
        .method("with_reference")
        .shape([
            handle("source", Cap::CONNECTION_STRING),
            maybe_text("connection_name").keyword(),
            switch("optional", false).keyword(),
        ])
        .shape([handle("source", Cap::SERVICE_DISCOVERY)])
        .shape([typed_handle("external_service", EXTERNAL_SERVICE)])
        .shape([handle("source", Cap::SERVICE_DISCOVERY), text("name")])
        .scalar(0)
        .fields(0)
        .scalar(1)
        .scalar(2)
        .spread(3, 2);
    vec![
        Member::new("WithOtlpExporter")
            .option("otlp_exporter")
            .method("with_otlp_exporter")
            .shape([])
            .shape([choice("protocol", OTLP_PROTOCOL)])
            .flag()
            .scalar(1),
        env.clone(),
        plural(&env, "environments"),
        Member::new("WithArgs")
            .option("args")
            .method("with_args")
            .shape([strings("args")])
            .scalar(0),
        Member::new("WithReferenceEnvironment")
            .option("reference_env")
            .method("with_reference_env")
            .shape([choice("flags", REFERENCE_ENVIRONMENT_INJECTION_FLAGS)])
            .scalar(0),
        reference.clone(),
        plural(&reference, "references"),
    ]
}

fn endpoints() -> Vec<Member> {
    let http = |target: &'static str, option: &'static str, method: &'static str| {
        Member::new(target)
            .option(option)
            .method(method)
            .shape([
                maybe_number("port").keyword(),
                maybe_number("target_port").keyword(),
                maybe_text("name").keyword(),
                maybe_text("env").keyword(),
                switch("is_proxied", true).keyword(),
            ])
            .fields(0)
            .flag()
    };
    vec![
        Member::new("WithEndpoint")
            .option("endpoint")
            .method("with_endpoint")
            .shape([
                maybe_number("port").keyword(),
                maybe_number("target_port").keyword(),
                maybe_text("scheme").keyword(),
                maybe_text("name").keyword(),
                maybe_text("env").keyword(),
                switch("is_proxied", true).keyword(),
                maybe_switch("is_external").keyword(),
                maybe_choice("protocol", PROTOCOL_TYPE).keyword(),
            ])
            .fields(0)
            .flag(),
        http("WithHttpEndpoint", "http_endpoint", "with_http_endpoint"),
        http("WithHttpsEndpoint", "https_endpoint", "with_https_endpoint"),
        Member::new("WithExternalHttpEndpoints")
            .option("external_http_endpoints")
            .method("with_external_http_endpoints")
            .shape([])
            .flag(),
        Member::new("AsHttp2Service")
            .option("as_http2_service")
            .method("as_http2_service")
            .shape([])
            .flag(),
        Member::new("WithHttpHealthCheck")
            .option("http_health_check")
            .method("with_http_health_check")
            .shape([
                maybe_text("path").keyword(),
                maybe_number("status_code").keyword(),
                maybe_text("endpoint_name").keyword(),
            ])
            .fields(0)
            .flag(),
        Member::new("WithHttpCommand")
            .option("http_command")
            .method("with_http_command")
            .shape([
                text("path"),
                text("display_name"),
                maybe_text("endpoint_name").keyword(),
                maybe_text("command_name").keyword(),
            ])
            .spread(0, 2)
            .fields(0),
    ]
}

fn trust() -> Vec<Member> {
    vec![
        Member::new("WithCertificateAuthorityCollection")
            .option("certificate_authority_collection")
            .method("with_certificate_authority_collection")
            .shape([typed_handle("certificate_authority_collection", CA_COLLECTION)])
            .scalar(0),
        Member::new("WithDeveloperCertificateTrust")
            .option("developer_certificate_trust")
            .method("with_developer_certificate_trust")
            .shape([Param::new("trust", TypeDesc::bool(), Format::Bool)])
            .scalar(0),
        Member::new("WithCertificateTrustScope")
            .option("certificate_trust_scope")
            .method("with_certificate_trust_scope")
            .shape([choice("scope", CERTIFICATE_TRUST_SCOPE)])
            .scalar(0),
    ]
}

fn container() -> Vec<Member> {
    let bind_mount = Member::new("WithBindMount")
        .option("bind_mount")
        .method("with_bind_mount")
        .shape([
            text("source"),
            text("target"),
            switch("is_read_only", false).keyword(),
        ])
        .spread(0, 2)
        .spread(0, 3)
        .fields(0);
    let build_arg = Member::new("WithBuildArg")
        .option("build_arg")
        .method("with_build_arg")
        .shape([text("name"), typed_handle("value", PARAMETER)])
        .spread(0, 2);
    let build_secret = Member::new("WithBuildSecret")
        .option("build_secret")
        .method("with_build_secret")
        .shape([text("name"), typed_handle("value", PARAMETER)])
        .spread(0, 2);
    vec![
        Member::new("WithVolume")
            .option("volume")
            .method("with_volume")
            .shape([text("target")])
            .shape([
                Param::new("name", TypeDesc::optional(TypeDesc::str()), Format::Str),
                text("target"),
                switch("is_read_only", false).keyword(),
            ])
            .scalar(0)
            .spread(1, 2)
            .fields(1),
        bind_mount.clone(),
        plural(&bind_mount, "bind_mounts"),
        Member::new("WithEntrypoint")
            .option("entrypoint")
            .method("with_entrypoint")
            .shape([text("entrypoint")])
            .scalar(0),
        Member::new("WithImageTag")
            .option("image_tag")
            .method("with_image_tag")
            .shape([text("tag")])
            .scalar(0),
        Member::new("WithImageRegistry")
            .option("image_registry")
            .method("with_image_registry")
            .shape([text("registry")])
            .scalar(0),
        Member::new("WithImage")
            .option("image")
            .method("with_image")
            .shape([text("image"), maybe_text("tag")])
            .scalar(0)
            .spread(0, 2),
        Member::new("WithImageSHA256")
            .option("image_sha256")
            .method("with_image_sha256")
            .shape([text("sha256")])
            .scalar(0),
        Member::new("WithContainerRuntimeArgs")
            .option("container_runtime_args")
            .method("with_container_runtime_args")
            .shape([strings("args")])
            .scalar(0),
        Member::new("WithLifetime")
            .option("lifetime")
            .method("with_lifetime")
            .shape([choice("lifetime", CONTAINER_LIFETIME)])
            .scalar(0),
        Member::new("WithImagePullPolicy")
            .option("image_pull_policy")
            .method("with_image_pull_policy")
            .shape([choice("pull_policy", IMAGE_PULL_POLICY)])
            .scalar(0),
        Member::new("PublishAsContainer")
            .option("publish_as_container")
            .method("publish_as_container")
            .shape([])
            .flag(),
        Member::new("WithDockerfile")
            .option("dockerfile")
            .method("with_dockerfile")
            .shape([
                text("context_path"),
                maybe_text("dockerfile_path").keyword(),
                maybe_text("stage").keyword(),
            ])
            .scalar(0)
            .fields(0),
        Member::new("WithContainerName")
            .option("container_name")
            .method("with_container_name")
            .shape([text("name")])
            .scalar(0),
        build_arg.clone(),
        plural(&build_arg, "build_args"),
        build_secret.clone(),
        plural(&build_secret, "build_secrets"),
        Member::new("WithContainerCertificatePaths")
            .option("container_certificate_paths")
            .method("with_container_certificate_paths")
            .shape([
                maybe_text("custom_certificates_destination").keyword(),
                maybe_strings("default_certificate_bundle_paths").keyword(),
                maybe_strings("default_certificate_dir_paths")
                    .keyword()
                    .renamed("defaultCertificateDirectoryPaths"),
            ])
            .fields(0)
            .flag(),
        Member::new("WithContainerFiles")
            .option("container_files")
            .method("with_container_files")
            .shape([
                text("destination_path"),
                text("source_path"),
                maybe_number("default_owner").keyword(),
                maybe_number("default_group").keyword(),
                maybe_choice("umask", UNIX_FILE_MODE).keyword(),
            ])
            .spread(0, 2)
            .fields(0),
        Member::new("WithEndpointProxySupport")
            .option("endpoint_proxy_support")
            .method("with_endpoint_proxy_support")
            .experimental("ASPIREPROXYENDPOINTS001")
            .shape([Param::new("proxy_enabled", TypeDesc::bool(), Format::Bool)])
            .scalar(0),
    ]
}

fn executable() -> Vec<Member> {
    vec![
        Member::new("PublishAsDockerFile")
            .option("publish_as_docker_file")
            .method("publish_as_docker_file")
            .shape([])
            .flag(),
        Member::new("WithCommand")
            .option("command")
            .method("with_command")
            .shape([text("command")])
            .scalar(0),
        Member::new("WithWorkingDirectory")
            .option("working_dir")
            .method("with_working_dir")
            .shape([text("working_dir").renamed("workingDirectory")])
            .scalar(0),
    ]
}

fn project() -> Vec<Member> {
    vec![
        Member::new("WithReplicas")
            .option("replicas")
            .method("with_replicas")
            .shape([number("replicas")])
            .scalar(0),
        Member::new("DisableForwardedHeaders")
            .option("disable_forwarded_headers")
            .method("disable_forwarded_headers")
            .shape([])
            .flag(),
        Member::new("PublishAsDockerFile")
            .option("publish_as_docker_file")
            .method("publish_as_docker_file")
            .shape([])
            .flag(),
    ]
}

fn certificates() -> Vec<Member> {
    let certificate = TypeDesc::union([TypeDesc::str(), TypeDesc::bytes()]);
    vec![
        Member::new("WithCertificate")
            .option("certificate")
            .method("with_certificate")
            .shape([Param::new(
                "certificate",
                certificate.clone(),
                Format::Certificate,
            )])
            .scalar(0),
        Member::new("WithCertificates")
            .option("certificates")
            .method("with_certificates")
            .shape([Param::new(
                "certificates",
                TypeDesc::seq(certificate),
                Format::Certificate,
            )])
            .scalar(0),
        Member::new("WithCertificatesFromStore")
            .option("certificates_from_store")
            .method("with_certificates_from_store")
            .shape([
                choice("store_name", STORE_NAME),
                choice("store_location", STORE_LOCATION),
            ])
            .spread(0, 2),
        Member::new("WithCertificatesFromFile")
            .option("certificates_from_file")
            .method("with_certificates_from_file")
            .shape([text("pem_file_path")])
            .scalar(0),
    ]
}

fn postgres_server() -> Vec<Member> {
    vec![
        Member::new("WithPgWeb")
            .option("pg_web")
            .method("with_pg_web")
            .shape([maybe_text("container_name").keyword()])
            .scalar(0)
            .flag(),
        Member::new("WithDataVolume")
            .option("data_volume")
            .method("with_data_volume")
            .shape([
                maybe_text("name").keyword(),
                switch("is_read_only", false).keyword(),
            ])
            .fields(0)
            .flag(),
        Member::new("WithDataBindMount")
            .option("data_bind_mount")
            .method("with_data_bind_mount")
            .shape([text("source"), switch("is_read_only", false).keyword()])
            .scalar(0)
            .spread(0, 2),
        Member::new("WithInitFiles")
            .option("init_files")
            .method("with_init_files")
            .shape([text("source")])
            .scalar(0),
        Member::new("WithPassword")
            .option("password")
            .method("with_password")
            .shape([typed_handle("password", PARAMETER)])
            .scalar(0),
        Member::new("WithUserName")
            .option("user_name")
            .method("with_user_name")
            .shape([typed_handle("user_name", PARAMETER)])
            .scalar(0),
        Member::new("WithHostPort")
            .option("host_port")
            .method("with_host_port")
            .shape([maybe_number("port")])
            .scalar(0),
        Member::new("WithPgAdmin")
            .option("pg_admin")
            .method("with_pg_admin")
            .shape([maybe_text("container_name").keyword()])
            .scalar(0)
            .flag(),
        connection_string_redirection(),
    ]
}
