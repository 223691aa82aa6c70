use super::params::{maybe_number, maybe_strings, maybe_text, switch, text, typed_handle};
use super::{Factory, Receiver, ResourceKind};
use crate::resolve::{Param, Shape};

fn factory(name: &'static str, target: &'static str, produces: ResourceKind) -> Factory {
    Factory {
        name,
        target,
        receiver: Receiver::Builder,
        produces,
        shapes: Vec::new(),
        experimental: None,
    }
}

impl Factory {
    fn shape(mut self, params: impl IntoIterator<Item = Param>) -> Self {
        let mut all = vec![text("name")];
        all.extend(params);
        self.shapes.push(Shape::new(all));
        self
    }

    fn on(mut self, parent: ResourceKind) -> Self {
        self.receiver = Receiver::Resource(parent);
        self
    }

    fn experimental(mut self, code: &'static str) -> Self {
        self.experimental = Some(code);
        self
    }
}

pub(super) fn all() -> Vec<Factory> {
    vec![
        factory(
            "add_connection_string",
            "AddConnectionString",
            ResourceKind::ConnectionString,
        )
        .shape([maybe_text("env_var_name")
            .keyword()
            .renamed("environmentVariableName")]),
        factory("add_container", "AddContainer", ResourceKind::Container)
            .shape([text("image")])
            .shape([text("image"), text("tag")]),
        factory("add_dockerfile", "AddDockerfile", ResourceKind::Container).shape([
            text("context_path"),
            maybe_text("dockerfile_path").keyword(),
            maybe_text("stage").keyword(),
        ]),
        factory("add_executable", "AddExecutable", ResourceKind::Executable).shape([
            text("command"),
            text("working_dir").renamed("workingDirectory"),
            maybe_strings("args"),
        ]),
        factory(
            "add_external_service",
            "AddExternalService",
            ResourceKind::ExternalService,
        )
        .shape([text("url")])
        .shape([typed_handle("url_parameter", "ParameterResource")]),
        factory("add_parameter", "AddParameter", ResourceKind::Parameter)
            .shape([switch("secret", false).keyword()])
            .shape([
                text("value"),
                switch("publish_value_as_default", false).keyword(),
                switch("secret", false).keyword(),
            ]),
        factory(
            "add_parameter_from_config",
            "AddParameterFromConfiguration",
            ResourceKind::Parameter,
        )
        .shape([
            text("config_key").renamed("configurationKey"),
            switch("secret", false).keyword(),
        ]),
        factory("add_project", "AddProject", ResourceKind::Project)
            .shape([text("project_path")])
            .shape([text("project_path"), maybe_text("launch_profile_name")]),
        factory("add_csharp_app", "AddCSharpApp", ResourceKind::Project)
            .experimental("ASPIRECSHARPAPPS001")
            .shape([text("path")]),
        factory(
            "add_certificate_authority_collection",
            "AddCertificateAuthorityCollection",
            ResourceKind::CertificateAuthorityCollection,
        )
        .shape([]),
        factory("add_postgres", "AddPostgres", ResourceKind::PostgresServer)
            .shape([maybe_number("port").keyword()]),
        factory("add_database", "AddDatabase", ResourceKind::PostgresDatabase)
            .on(ResourceKind::PostgresServer)
            .shape([maybe_text("database_name")]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{resolve, Args};

    fn find(name: &str) -> Factory {
        all()
            .into_iter()
            .find(|f| f.name == name)
            .expect("factory declared")
    }

    #[test]
    fn container_tag_selects_second_shape() {
        let container = find("add_container");
        let args = Args::new().arg("web").arg("nginx").arg("1.25");
        let resolved = resolve("add_container", &args, &container.shapes).expect("resolve");
        assert_eq!(resolved.index, 1);
        assert_eq!(
            container.shapes[1].render(&resolved.values),
            "name: \"web\", image: \"nginx\", tag: \"1.25\""
        );
    }

    #[test]
    fn keyword_params_are_factory_params() {
        let connection = find("add_connection_string");
        assert!(connection.takes_param("env_var_name"));
        assert!(!connection.takes_param("connection_string_redirection"));
    }

    #[test]
    fn database_is_created_on_a_server() {
        let database = find("add_database");
        assert_eq!(database.receiver, Receiver::Resource(ResourceKind::PostgresServer));
        assert_eq!(database.produces, ResourceKind::PostgresDatabase);
    }
}
