mod model;
mod validate;

pub(crate) use model::write_json;
pub use model::{ExtensionManifest, PackageDescriptor};
pub use validate::{ValidationReport, is_valid_version, validate};
