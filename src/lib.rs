//! AppHost: typed generation of .NET Aspire AppHost programs
//!
//! Resources are created and configured through a [`Composition`]. Each call
//! is checked against the overloads the target SDK declares for it and
//! turned into the equivalent C# statement. Building the composition writes a
//! single-file AppHost program that the `dotnet` toolchain can run.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │               Composition                │
//! │                                          │
//! │  catalog  - factories, methods, options  │
//! │  resolve  - first-match overloads        │
//! │  format   - C# argument literals         │
//! │  emit     - fragments and packages       │
//! │                                          │
//! ├──────────────────────────────────────────┤
//! │   apphost-types: Value, TypeDesc, match  │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Keyword options
//!
//! Named arguments to a factory that are not factory parameters are options
//! of the produced resource. Each option accepts a small set of value shapes:
//!
//! ```
//! use apphost::{Args, Composition, Value};
//!
//! let mut app = Composition::new();
//! app.add(
//!     "add_container",
//!     Args::new()
//!         .arg("svc")
//!         .arg("nginx")
//!         .kwarg("volume", ("data", "/usr/share/nginx/html"))
//!         .kwarg("explicit_start", true),
//! )?;
//! assert!(app.render().contains(
//!     "\n    .WithVolume(name: \"data\", target: \"/usr/share/nginx/html\", isReadOnly: false)"
//! ));
//! # Ok::<(), apphost::Error>(())
//! ```

pub mod catalog;
pub mod composition;
pub mod config;
pub mod emit;
pub mod error;
pub mod format;
pub mod manifest;
pub mod resolve;
pub mod resource;

pub use apphost_types::{Capabilities, ResourceRef, TypeDesc, Value};
pub use catalog::{Catalog, ResourceKind};
pub use composition::{AppHost, Composition};
pub use config::GeneratorConfig;
pub use error::{Error, Result};
pub use manifest::{Manifest, ManifestError};
pub use resolve::{Args, ResolveError};
pub use resource::Resource;
