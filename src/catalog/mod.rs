//! Declarative tables of factories, methods and options.
//!
//! Every resource kind is described by an ordered list of [`Member`]s. A
//! member is one target method (`WithVolume`, `WaitFor`, ...) that may be
//! reachable as a fluent method call, as a keyword option at creation time,
//! or both. The tables are built once and shared for the life of the
//! process.

pub mod enums;
mod factories;
mod members;
mod params;

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use apphost_types::Capabilities;

use crate::resolve::{Binding, OptionForm, Shape};

/// One target method and the ways it can be invoked.
#[derive(Debug, Clone)]
pub struct Member {
    /// Target method name, e.g. `WithVolume`.
    pub target: &'static str,
    /// Fluent method name, e.g. `with_volume`.
    pub method: Option<&'static str>,
    /// Keyword option name, e.g. `volume`.
    pub option: Option<&'static str>,
    pub shapes: Vec<Shape>,
    pub forms: Vec<OptionForm>,
    /// Diagnostic code to suppress around uses of this member.
    pub experimental: Option<&'static str>,
}

impl Member {
    pub fn new(target: &'static str) -> Self {
        Self {
            target,
            method: None,
            option: None,
            shapes: Vec::new(),
            forms: Vec::new(),
            experimental: None,
        }
    }

    pub fn method(mut self, name: &'static str) -> Self {
        self.method = Some(name);
        self
    }

    pub fn option(mut self, key: &'static str) -> Self {
        self.option = Some(key);
        self
    }

    pub fn shape(mut self, params: impl IntoIterator<Item = crate::resolve::Param>) -> Self {
        self.shapes.push(Shape::new(params));
        self
    }

    pub fn experimental(mut self, code: &'static str) -> Self {
        self.experimental = Some(code);
        self
    }

    /// Accept `true` as the option value.
    pub fn flag(self) -> Self {
        self.form(Binding::Flag, 0)
    }

    /// Accept the first parameter of `overload` as the option value.
    pub fn scalar(self, overload: usize) -> Self {
        self.form(Binding::Scalar, overload)
    }

    /// Accept a tuple of the first `n` parameters of `overload`.
    pub fn spread(self, overload: usize, n: usize) -> Self {
        self.form(Binding::Spread(n), overload)
    }

    /// Accept a record of the parameters of `overload`.
    pub fn fields(self, overload: usize) -> Self {
        self.form(Binding::Fields, overload)
    }

    /// Also accept a list of any of the forms declared so far, one call per element.
    pub fn each(mut self) -> Self {
        let elements = self.forms.clone();
        self.forms.push(OptionForm::each(elements));
        self
    }

    /// Accept only a list of the forms declared so far.
    pub fn many(mut self) -> Self {
        let elements = std::mem::take(&mut self.forms);
        self.forms.push(OptionForm::each(elements));
        self
    }

    fn form(mut self, binding: Binding, overload: usize) -> Self {
        let shape = self.shapes.get(overload).cloned().unwrap_or_default();
        self.forms.push(OptionForm::new(binding, overload, &shape));
        self
    }
}

/// What a factory is invoked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// The application builder: `builder.AddX(...)`.
    Builder,
    /// An existing resource of this kind: `parent.AddX(...)`.
    Resource(ResourceKind),
}

/// An operation that creates a new resource.
#[derive(Debug, Clone)]
pub struct Factory {
    pub name: &'static str,
    pub target: &'static str,
    pub receiver: Receiver,
    pub produces: ResourceKind,
    /// Every shape starts with the resource name.
    pub shapes: Vec<Shape>,
    pub experimental: Option<&'static str>,
}

impl Factory {
    /// True when `name` is a parameter of any shape, as opposed to a keyword option.
    pub fn takes_param(&self, name: &str) -> bool {
        self.shapes
            .iter()
            .any(|shape| shape.params.iter().any(|p| p.name == name))
    }
}

/// Resource types the catalog knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    ConnectionString,
    Container,
    Executable,
    ExternalService,
    Parameter,
    Project,
    CertificateAuthorityCollection,
    PostgresServer,
    PostgresDatabase,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 9] = [
        ResourceKind::ConnectionString,
        ResourceKind::Container,
        ResourceKind::Executable,
        ResourceKind::ExternalService,
        ResourceKind::Parameter,
        ResourceKind::Project,
        ResourceKind::CertificateAuthorityCollection,
        ResourceKind::PostgresServer,
        ResourceKind::PostgresDatabase,
    ];

    /// Target SDK type name.
    pub fn type_name(self) -> &'static str {
        match self {
            ResourceKind::ConnectionString => "ConnectionStringResource",
            ResourceKind::Container => "ContainerResource",
            ResourceKind::Executable => "ExecutableResource",
            ResourceKind::ExternalService => "ExternalServiceResource",
            ResourceKind::Parameter => "ParameterResource",
            ResourceKind::Project => "ProjectResource",
            ResourceKind::CertificateAuthorityCollection => "CertificateAuthorityCollection",
            ResourceKind::PostgresServer => "PostgresServerResource",
            ResourceKind::PostgresDatabase => "PostgresDatabaseResource",
        }
    }

    /// NuGet package providing the resource.
    pub fn package(self) -> &'static str {
        match self {
            ResourceKind::PostgresServer | ResourceKind::PostgresDatabase => {
                "Aspire.Hosting.PostgreSQL"
            }
            _ => "Aspire.Hosting",
        }
    }

    pub fn capabilities(self) -> Capabilities {
        let runnable = Capabilities::ENVIRONMENT
            | Capabilities::ARGS
            | Capabilities::ENDPOINTS
            | Capabilities::WAIT_SUPPORT
            | Capabilities::COMPUTE
            | Capabilities::PROBES;
        let specific = match self {
            ResourceKind::ConnectionString => {
                Capabilities::CONNECTION_STRING | Capabilities::WAIT_SUPPORT
            }
            ResourceKind::Container => runnable | Capabilities::CONTAINER_FILES_DESTINATION,
            ResourceKind::Executable => runnable | Capabilities::SERVICE_DISCOVERY,
            ResourceKind::Project => {
                runnable
                    | Capabilities::SERVICE_DISCOVERY
                    | Capabilities::CONTAINER_FILES_DESTINATION
            }
            ResourceKind::PostgresServer => {
                runnable
                    | Capabilities::CONTAINER_FILES_DESTINATION
                    | Capabilities::CONNECTION_STRING
            }
            ResourceKind::PostgresDatabase => Capabilities::CONNECTION_STRING,
            ResourceKind::ExternalService
            | ResourceKind::Parameter
            | ResourceKind::CertificateAuthorityCollection => Capabilities::empty(),
        };
        Capabilities::RESOURCE | specific
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// All factories and per-kind member tables.
#[derive(Debug)]
pub struct Catalog {
    factories: Vec<Factory>,
    members: HashMap<ResourceKind, Vec<Member>>,
}

impl Catalog {
    /// The process-wide catalog.
    pub fn get() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(Catalog::build)
    }

    fn build() -> Catalog {
        let members = ResourceKind::ALL
            .iter()
            .map(|&kind| (kind, members::for_kind(kind)))
            .collect();
        Catalog {
            factories: factories::all(),
            members,
        }
    }

    pub fn factories(&self) -> &[Factory] {
        &self.factories
    }

    pub fn factory(&self, name: &str) -> Option<&Factory> {
        self.factories.iter().find(|f| f.name == name)
    }

    /// Members of `kind`, in option-processing order.
    pub fn members(&self, kind: ResourceKind) -> &[Member] {
        self.members.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn method(&self, kind: ResourceKind, name: &str) -> Option<&Member> {
        self.members(kind).iter().find(|m| m.method == Some(name))
    }

    pub fn option(&self, kind: ResourceKind, key: &str) -> Option<&Member> {
        self.members(kind).iter().find(|m| m.option == Some(key))
    }
}
