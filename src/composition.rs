//! The composition driver.
//!
//! A [`Composition`] owns the emission buffer, the package tracker and the
//! registry of created resources. Every public operation validates its
//! arguments, stages the fragments it would emit in a private buffer and
//! commits them only once nothing can fail any more, so a rejected call
//! leaves the program exactly as it was.
//!
//! # Example
//!
//! ```
//! use apphost::{Args, Composition};
//!
//! let mut app = Composition::new();
//! let cache = app.add("add_container", Args::new().arg("cache").arg("redis"))?;
//! app.invoke(&cache, "with_image_tag", Args::new().arg("7.2"))?;
//!
//! let source = app.render();
//! assert!(source.contains("var cache = builder.AddContainer(name: \"cache\", image: \"redis\");"));
//! assert!(source.contains("cache.WithImageTag(tag: \"7.2\");"));
//! # Ok::<(), apphost::Error>(())
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use apphost_types::{TypeDesc, Value};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Factory, Member, Receiver};
use crate::config::GeneratorConfig;
use crate::emit::{DependencyTracker, EmissionBuffer};
use crate::error::{Error, Result};
use crate::format::{format, Format};
use crate::resolve::{resolve, resolve_option, Args, Binding, BoundOption, Param, Shape};
use crate::resource::{variable_name, Resource};

const BUILDER_OPTIONS: &str = "DistributedApplicationOptions";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Closed,
}

/// A generated program written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppHost {
    pub path: PathBuf,
    pub source: String,
}

/// Builder for one AppHost program.
#[derive(Debug)]
pub struct Composition {
    config: GeneratorConfig,
    /// Rendered `Property = literal` assignments for the builder options.
    options: Vec<String>,
    buffer: EmissionBuffer,
    dependencies: DependencyTracker,
    resources: Vec<Resource>,
    state: State,
}

impl Default for Composition {
    fn default() -> Self {
        Self::new()
    }
}

impl Composition {
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default())
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            options: Vec::new(),
            buffer: EmissionBuffer::new(),
            dependencies: DependencyTracker::new(),
            resources: Vec::new(),
            state: State::Open,
        }
    }

    /// Pass `DistributedApplicationOptions` to `CreateBuilder`.
    ///
    /// `options` must be a map. Unknown keys fail with
    /// [`Error::UnexpectedOptions`]; mistyped values fail resolution.
    pub fn with_options(mut self, options: Value) -> Result<Self> {
        self.ensure_open()?;
        let Value::Map(entries) = options else {
            return Err(no_overload(BUILDER_OPTIONS));
        };
        let shape = builder_options();

        let mut unknown: Vec<String> = entries
            .iter()
            .filter(|(key, _)| !shape.params.iter().any(|p| p.name == key.as_str()))
            .map(|(key, _)| key.clone())
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(Error::UnexpectedOptions {
                operation: BUILDER_OPTIONS.to_string(),
                keys: unknown,
            });
        }

        let args = entries
            .into_iter()
            .fold(Args::new(), |args, (key, value)| args.kwarg(key, value));
        let resolved = resolve(BUILDER_OPTIONS, &args, std::slice::from_ref(&shape))?;

        let explicit_args = !resolved.values[1].is_null();
        self.options = shape
            .params
            .iter()
            .zip(&resolved.values)
            .filter(|(_, value)| !value.is_null())
            .map(|(param, value)| format!("{} = {}", param.target, format(value, param.format, None)))
            .collect();
        if !explicit_args && !self.options.is_empty() {
            self.options.insert(0, "Args = args".to_string());
        }
        Ok(self)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    /// Resources in creation order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name() == name)
    }

    /// Create a resource on the application builder.
    ///
    /// The first positional argument is the resource name. Named arguments
    /// that are not parameters of the factory are treated as keyword options
    /// of the produced resource and chained onto the creation statement.
    pub fn add(&mut self, factory: &str, args: Args) -> Result<Resource> {
        self.create(None, factory, args)
    }

    /// Create a resource on an existing resource, e.g. a database on a server.
    pub fn add_child(&mut self, parent: &Resource, factory: &str, args: Args) -> Result<Resource> {
        self.create(Some(parent), factory, args)
    }

    /// Call a fluent method on an existing resource.
    pub fn invoke(&mut self, resource: &Resource, method: &str, args: Args) -> Result<()> {
        self.ensure_open()?;
        self.ensure_known(resource)?;
        let member = Catalog::get()
            .method(resource.kind(), method)
            .ok_or_else(|| unknown_operation(resource, method))?;

        let resolved = resolve(method, &args, &member.shapes)?;
        let statement = format!(
            "\n{}.{}({});",
            resource.variable(),
            member.target,
            member.shapes[resolved.index].render(&resolved.values)
        );
        let codes: Vec<&str> = member.experimental.into_iter().collect();
        self.stage(&codes, |staged| staged.append(statement))?;
        debug!(resource = resource.name(), method, "method call emitted");
        Ok(())
    }

    /// Apply a keyword option to an existing resource as its own statement.
    ///
    /// A null value means the option was not given and emits nothing.
    pub fn configure(
        &mut self,
        resource: &Resource,
        option: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        self.ensure_open()?;
        self.ensure_known(resource)?;
        let member = Catalog::get()
            .option(resource.kind(), option)
            .ok_or_else(|| unknown_operation(resource, option))?;

        let value = value.into();
        if value.is_null() {
            debug!(resource = resource.name(), option, "null option skipped");
            return Ok(());
        }
        let bound = resolve_option(option, &value, &member.forms, &member.shapes)?;
        let statements: Vec<String> = bound
            .calls()
            .into_iter()
            .map(|call| format!("\n{}.{};", resource.variable(), chained_call(member, call)))
            .collect();
        if statements.is_empty() {
            debug!(resource = resource.name(), option, "empty list option skipped");
            return Ok(());
        }
        let codes: Vec<&str> = member.experimental.into_iter().collect();
        self.stage(&codes, |staged| {
            for statement in statements {
                staged.append(statement);
            }
        })?;
        debug!(resource = resource.name(), option, "option applied");
        Ok(())
    }

    /// The complete program as it would be written by [`Composition::build`].
    pub fn render(&self) -> String {
        let mut source = format!("#:sdk Aspire.AppHost.Sdk@{}\n", self.config.sdk_version);
        source.push_str(&self.dependencies.finalize().join("\n"));
        source.push_str("\nusing System.Security.Cryptography.X509Certificates;");
        source.push_str("\n\n");
        if self.options.is_empty() {
            source.push_str("var builder = DistributedApplication.CreateBuilder(args);\n");
        } else {
            source.push_str(&format!(
                "var builder = DistributedApplication.CreateBuilder(new {BUILDER_OPTIONS} {{ {} }});\n",
                self.options.join(", ")
            ));
        }
        source.push_str(&self.buffer.linearize());
        source.push_str("\n\nbuilder.Build().Run();\n");
        source
    }

    /// Write the program to the configured location and close the composition.
    pub fn build(&mut self) -> Result<AppHost> {
        self.ensure_open()?;
        let path = self.config.output_path()?;
        let source = self.render();

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| Error::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, &source).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;

        self.state = State::Closed;
        info!(path = %path.display(), resources = self.resources.len(), "apphost written");
        Ok(AppHost { path, source })
    }

    fn create(&mut self, parent: Option<&Resource>, name: &str, mut args: Args) -> Result<Resource> {
        self.ensure_open()?;
        if let Some(parent) = parent {
            self.ensure_known(parent)?;
        }
        let factory = Catalog::get()
            .factory(name)
            .filter(|f| receives(f, parent))
            .ok_or_else(|| Error::UnknownOperation {
                resource: parent.map_or("builder".to_string(), |p| p.kind().to_string()),
                operation: name.to_string(),
            })?;

        if let Some(resource_name) = args.positional().first().and_then(Value::as_str) {
            variable_name(resource_name)?;
            if self.get(resource_name).is_some() {
                return Err(Error::DuplicateName(resource_name.to_string()));
            }
        }

        let options = args.split_off_named(|key| factory.takes_param(key));
        let resolved = resolve(factory.name, &args, &factory.shapes)?;
        let resource_name = resolved.values[0].as_str().unwrap_or_default();
        if self.get(resource_name).is_some() {
            return Err(Error::DuplicateName(resource_name.to_string()));
        }
        let resource = Resource::new(resource_name, factory.produces)?;

        let chained = bind_options(factory, options)?;

        let mut codes: Vec<&str> = Vec::new();
        for code in factory
            .experimental
            .into_iter()
            .chain(chained.iter().filter_map(|(member, _)| member.experimental))
        {
            if !codes.contains(&code) {
                codes.push(code);
            }
        }

        let receiver = parent.map_or("builder", Resource::variable);
        let head = format!(
            "\nvar {} = {}.{}({})",
            resource.variable(),
            receiver,
            factory.target,
            factory.shapes[resolved.index].render(&resolved.values)
        );
        self.stage(&codes, |staged| {
            staged.append(head);
            for (member, bound) in &chained {
                for call in bound.calls() {
                    staged.append(format!("\n    .{}", chained_call(member, call)));
                }
            }
            staged.append(";");
        })?;

        self.dependencies.declare(format!(
            "#:package {}@{}",
            factory.produces.package(),
            self.config.sdk_version
        ));
        debug!(
            factory = factory.name,
            resource = resource.name(),
            options = chained.len(),
            "resource created"
        );
        self.resources.push(resource.clone());
        Ok(resource)
    }

    /// Emit into a private buffer inside nested pragma scopes, then commit.
    fn stage(&mut self, codes: &[&str], body: impl FnOnce(&mut EmissionBuffer)) -> Result<()> {
        for code in codes {
            warn!(code, "experimental feature used");
        }
        let mut staged = EmissionBuffer::new();
        wrap(&mut staged, codes, body)?;
        self.buffer.commit(staged);
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            State::Open => Ok(()),
            State::Closed => Err(Error::Closed),
        }
    }

    fn ensure_known(&self, resource: &Resource) -> Result<()> {
        match self.get(resource.name()) {
            Some(known) if known == resource => Ok(()),
            _ => Err(Error::UnknownResource(resource.name().to_string())),
        }
    }
}

fn wrap(
    buffer: &mut EmissionBuffer,
    codes: &[&str],
    body: impl FnOnce(&mut EmissionBuffer),
) -> Result<()> {
    match codes.split_first() {
        Some((&code, rest)) => buffer.scoped(Some(code), |inner| wrap(inner, rest, body)),
        None => {
            body(buffer);
            Ok(())
        }
    }
}

fn receives(factory: &Factory, parent: Option<&Resource>) -> bool {
    match (factory.receiver, parent) {
        (Receiver::Builder, None) => true,
        (Receiver::Resource(kind), Some(parent)) => parent.kind() == kind,
        _ => false,
    }
}

/// Resolve keyword options in catalog order. Null values and empty lists count as absent.
fn bind_options(
    factory: &Factory,
    mut options: BTreeMap<String, Value>,
) -> Result<Vec<(&'static Member, BoundOption)>> {
    let mut chained = Vec::new();
    for member in Catalog::get().members(factory.produces) {
        let Some(key) = member.option else { continue };
        let Some(value) = options.remove(key) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let bound = resolve_option(key, &value, &member.forms, &member.shapes)?;
        if !bound.calls().is_empty() {
            chained.push((member, bound));
        }
    }

    if !options.is_empty() {
        return Err(Error::UnexpectedOptions {
            operation: factory.name.to_string(),
            keys: options.into_keys().collect(),
        });
    }
    Ok(chained)
}

/// `WithVolume(name: "data", ...)`, or `Method()` for a flag.
fn chained_call(member: &Member, bound: &BoundOption) -> String {
    match bound.binding {
        Binding::Flag => format!("{}()", member.target),
        _ => format!(
            "{}({})",
            member.target,
            member.shapes[bound.overload].render(&bound.values)
        ),
    }
}

fn unknown_operation(resource: &Resource, operation: &str) -> Error {
    Error::UnknownOperation {
        resource: resource.kind().to_string(),
        operation: operation.to_string(),
    }
}

fn no_overload(operation: &str) -> Error {
    crate::resolve::ResolveError::NoMatchingOverload {
        operation: operation.to_string(),
    }
    .into()
}

fn builder_options() -> Shape {
    let flag = |name: &'static str, target: &str| {
        Param::new(name, TypeDesc::optional(TypeDesc::bool()), Format::Bool)
            .default(Value::Null)
            .renamed(target)
    };
    let text = |name: &'static str, target: &str| {
        Param::new(name, TypeDesc::optional(TypeDesc::str()), Format::Str)
            .default(Value::Null)
            .renamed(target)
    };
    Shape::new([
        flag("allow_unsecured_transport", "AllowUnsecuredTransport"),
        Param::new(
            "args",
            TypeDesc::optional(TypeDesc::seq(TypeDesc::str())),
            Format::StrArray,
        )
        .default(Value::Null)
        .renamed("Args"),
        text("container_registry_override", "ContainerRegistryOverride"),
        text("dashboard_application_name", "DashboardApplicationName"),
        flag("disable_dashboard", "DisableDashboard"),
        flag("enable_resource_logging", "EnableResourceLogging"),
        text("project_directory", "ProjectDirectory"),
        flag("trust_developer_certificate", "TrustDeveloperCertificate"),
    ])
}
